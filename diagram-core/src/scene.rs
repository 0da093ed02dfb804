//! Board + style → ordered draw primitives.
//!
//! The primitive order is the paint order: squares (each dark square followed
//! by its hatch overlay), then labels, then piece glyphs, then the border.

use log::debug;

use crate::board::{Board, PieceKind, is_dark};
use crate::style::{Color, Layout, StyleConfig};

/// Side of the square coordinate system every glyph asset is drawn in.
pub const GLYPH_BOX: f64 = 210.0;
/// Id of the shared hatch pattern in the vector document.
pub const HATCH_ID: &str = "hatch";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Center,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    FilledRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: Color,
    },
    PatternFill {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        pattern: &'static str,
    },
    Label {
        x: f64,
        y: f64,
        text: String,
        anchor: Anchor,
    },
    Glyph {
        x: f64,
        y: f64,
        scale: f64,
        piece: PieceKind,
    },
    BorderRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        stroke: Color,
        stroke_width: f64,
    },
}

/// The single hatch tile shared by all dark squares.
#[derive(Clone, Debug, PartialEq)]
pub struct HatchPattern {
    pub id: &'static str,
    /// `cell_size / reference_tile`, keeps hatch density constant per square.
    pub scale: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelStyle {
    pub font_size: f64,
    pub font_weight: String,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub cell_size: f64,
    pub hatch: HatchPattern,
    pub label_style: LabelStyle,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    /// Distinct piece kinds drawn in this scene, sorted.
    pub fn piece_kinds(&self) -> Vec<PieceKind> {
        let mut kinds: Vec<PieceKind> = self
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Glyph { piece, .. } => Some(*piece),
                _ => None,
            })
            .collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }
}

fn file_letter(col: usize) -> String {
    char::from(b'A' + col as u8).to_string()
}

pub fn build_scene(board: &Board, style: &StyleConfig, layout: &Layout) -> Scene {
    let n = board.size();
    let cell = layout.board_px / n as f64;
    let (bx, by) = (layout.margin, layout.margin);
    let mut out = Vec::with_capacity(n * n * 2 + n * 2 + board.piece_count() + 1);

    for row in 0..n {
        for col in 0..n {
            let x = bx + col as f64 * cell;
            let y = by + row as f64 * cell;
            let dark = is_dark(row, col);
            out.push(Primitive::FilledRect {
                x,
                y,
                w: cell,
                h: cell,
                fill: if dark {
                    style.dark.clone()
                } else {
                    style.light.clone()
                },
            });
            if dark {
                out.push(Primitive::PatternFill {
                    x,
                    y,
                    w: cell,
                    h: cell,
                    pattern: HATCH_ID,
                });
            }
        }
    }

    for row in 0..n {
        out.push(Primitive::Label {
            x: layout.margin / 2.0,
            y: by + (row as f64 + 0.5) * cell,
            text: (n - row).to_string(),
            anchor: Anchor::Center,
        });
    }
    for col in 0..n {
        out.push(Primitive::Label {
            x: bx + (col as f64 + 0.5) * cell,
            y: by + layout.board_px + layout.label_band / 2.0,
            text: file_letter(col),
            anchor: Anchor::Center,
        });
    }

    let piece_px = cell * layout.piece_inset;
    let inset = (cell - piece_px) / 2.0;
    for (row, col, piece) in board.pieces() {
        out.push(Primitive::Glyph {
            x: bx + col as f64 * cell + inset,
            y: by + row as f64 * cell + inset,
            scale: piece_px / GLYPH_BOX,
            piece,
        });
    }

    out.push(Primitive::BorderRect {
        x: bx,
        y: by,
        w: layout.board_px,
        h: layout.board_px,
        stroke: layout.border_color.clone(),
        stroke_width: layout.border_width,
    });

    let scene = Scene {
        width: layout.board_px + layout.margin + layout.border_pad,
        height: layout.board_px + layout.margin + layout.label_band,
        cell_size: cell,
        hatch: HatchPattern {
            id: HATCH_ID,
            scale: cell / layout.reference_tile,
        },
        label_style: LabelStyle {
            font_size: layout.label_font_size,
            font_weight: layout.label_font_weight.clone(),
            color: layout.label_color.clone(),
        },
        primitives: out,
    };
    debug!(
        "built {}x{} scene: {} primitives, {} pieces",
        scene.width,
        scene.height,
        scene.primitives.len(),
        board.piece_count()
    );
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Rank, Side};

    #[derive(Default, Debug, PartialEq)]
    struct Counts {
        rects: usize,
        patterns: usize,
        labels: usize,
        glyphs: usize,
        borders: usize,
    }

    fn counts(scene: &Scene) -> Counts {
        let mut c = Counts::default();
        for p in &scene.primitives {
            match p {
                Primitive::FilledRect { .. } => c.rects += 1,
                Primitive::PatternFill { .. } => c.patterns += 1,
                Primitive::Label { .. } => c.labels += 1,
                Primitive::Glyph { .. } => c.glyphs += 1,
                Primitive::BorderRect { .. } => c.borders += 1,
            }
        }
        c
    }

    // 0 = square/pattern, 1 = label, 2 = glyph, 3 = border
    fn layer(p: &Primitive) -> u8 {
        match p {
            Primitive::FilledRect { .. } | Primitive::PatternFill { .. } => 0,
            Primitive::Label { .. } => 1,
            Primitive::Glyph { .. } => 2,
            Primitive::BorderRect { .. } => 3,
        }
    }

    #[test]
    fn empty_board_scene_counts() {
        for n in [6, 8, 10, 12] {
            let board = Board::new(n).unwrap();
            let scene = build_scene(&board, &StyleConfig::default(), &Layout::default());
            assert_eq!(
                Counts {
                    rects: n * n,
                    patterns: n * n / 2,
                    labels: 2 * n,
                    glyphs: 0,
                    borders: 1,
                },
                counts(&scene)
            );
        }
    }

    #[test]
    fn dimensions_follow_layout() {
        let board = Board::new(10).unwrap();
        let layout = Layout::default();
        let scene = build_scene(&board, &StyleConfig::default(), &layout);
        assert_eq!(660.0, scene.width);
        assert_eq!(660.0, scene.height);
        assert_eq!(60.0, scene.cell_size);
        assert_eq!(0.8, scene.hatch.scale);
    }

    #[test]
    fn layers_are_ordered_and_patterns_follow_their_square() {
        let mut board = Board::new(8).unwrap();
        board.set_piece(0, 1, Some(PieceKind::man(Side::Black))).unwrap();
        board.set_piece(7, 6, Some(PieceKind::new(Side::White, Rank::King))).unwrap();
        let scene = build_scene(&board, &StyleConfig::default(), &Layout::default());
        let layers: Vec<u8> = scene.primitives.iter().map(layer).collect();
        assert!(layers.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(Some(&3), layers.last());

        for pair in scene.primitives.windows(2) {
            if let Primitive::PatternFill { x, y, .. } = &pair[1] {
                match &pair[0] {
                    Primitive::FilledRect { x: rx, y: ry, fill, .. } => {
                        assert_eq!((rx, ry), (x, y));
                        assert_eq!(&Color::black(), fill);
                    }
                    other => panic!("pattern not preceded by its square: {other:?}"),
                }
            }
        }
    }

    #[test]
    fn labels_count_ranks_from_bottom() {
        let board = Board::new(8).unwrap();
        let scene = build_scene(&board, &StyleConfig::default(), &Layout::default());
        let texts: Vec<&str> = scene
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            vec![
                "8", "7", "6", "5", "4", "3", "2", "1", "A", "B", "C", "D", "E", "F", "G", "H"
            ],
            texts
        );
    }

    #[test]
    fn glyphs_sit_in_inset_box() {
        let mut board = Board::new(8).unwrap();
        let king = PieceKind::new(Side::White, Rank::King);
        board.set_piece(2, 3, Some(king)).unwrap();
        let scene = build_scene(&board, &StyleConfig::default(), &Layout::default());
        let glyph = scene
            .primitives
            .iter()
            .find(|p| matches!(p, Primitive::Glyph { .. }))
            .unwrap();
        // cell 75, piece box 60, inset 7.5
        assert_eq!(
            &Primitive::Glyph {
                x: 30.0 + 3.0 * 75.0 + 7.5,
                y: 30.0 + 2.0 * 75.0 + 7.5,
                scale: 60.0 / 210.0,
                piece: king,
            },
            glyph
        );
        assert_eq!(vec![king], scene.piece_kinds());
    }
}
