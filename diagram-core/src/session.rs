//! The editor session: sole owner of the board, the style and the selected
//! piece. Front ends translate user actions into [`Command`]s.
//!
//! Every operation goes through `&mut self`, so imports, edits and exports
//! never overlap; a second export simply runs after the first returns.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::assets::{AssetBundle, AssetStore, BuiltinAssets, CachedAssets};
use crate::board::{Board, PieceKind, Side};
use crate::error::{BoardError, DiagramError, NotationError, RenderError, StyleError};
use crate::notation::{self, SkippedToken};
use crate::raster::{PNG_FILE_NAME, to_raster};
use crate::render::{SVG_FILE_NAME, to_vector_document};
use crate::scene::{Scene, build_scene};
use crate::style::{Color, Layout, SquareShade, StyleConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Svg,
    Png,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Svg => SVG_FILE_NAME,
            ExportFormat::Png => PNG_FILE_NAME,
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Png => "image/png",
        }
    }
}

/// A finished export, ready to be saved under `file_name`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: &'static str,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Resize the board; always clears it.
    SetSize(usize),
    /// Choose the piece a click places; `None` is the eraser.
    #[serde(with = "crate::board::selection")]
    SelectPiece(Option<PieceKind>),
    /// Editor click: empty the square, then place the selected piece.
    ClickSquare { row: usize, col: usize },
    PlacePiece {
        row: usize,
        col: usize,
        #[serde(with = "crate::board::selection")]
        piece: Option<PieceKind>,
    },
    SetColor { target: SquareShade, color: Color },
    ImportNotation(String),
    Reset,
    Export(ExportFormat),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportReport {
    pub turn: Option<Side>,
    pub placed: usize,
    pub skipped: Vec<SkippedToken>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    Imported(ImportReport),
    Exported(Artifact),
}

pub struct Session<S = CachedAssets<BuiltinAssets>> {
    board: Board,
    style: StyleConfig,
    layout: Layout,
    selected: Option<PieceKind>,
    assets: S,
}

impl Session {
    /// Default 8×8 session backed by the built-in assets.
    pub fn new() -> Self {
        Session::with_assets(CachedAssets::new(BuiltinAssets))
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl<S: AssetStore> Session<S> {
    pub fn with_assets(assets: S) -> Self {
        Session {
            board: Board::default(),
            style: StyleConfig::default(),
            layout: Layout::default(),
            selected: None,
            assets,
        }
    }

    /// Replace the default geometry. Degenerate layouts are refused.
    pub fn with_layout(mut self, layout: Layout) -> Result<Self, StyleError> {
        layout.validate()?;
        self.layout = layout;
        Ok(self)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn selected(&self) -> Option<PieceKind> {
        self.selected
    }

    pub fn dispatch(&mut self, cmd: Command) -> Result<Outcome, DiagramError> {
        match cmd {
            Command::SetSize(n) => self.set_size(n)?,
            Command::SelectPiece(piece) => self.selected = piece,
            Command::ClickSquare { row, col } => self.click_square(row, col)?,
            Command::PlacePiece { row, col, piece } => self.board.set_piece(row, col, piece)?,
            Command::SetColor { target, color } => self.style.set_color(target, color),
            Command::ImportNotation(record) => {
                return Ok(Outcome::Imported(self.import_notation(&record)?));
            }
            Command::Reset => {
                info!("board reset");
                self.board.clear();
            }
            Command::Export(format) => return Ok(Outcome::Exported(self.export(format)?)),
        }
        Ok(Outcome::Updated)
    }

    /// Replace the board with an empty one of side `n`.
    pub fn set_size(&mut self, n: usize) -> Result<(), BoardError> {
        self.board = Board::new(n)?;
        self.style.board_size = n;
        info!("board resized to {n}x{n}");
        Ok(())
    }

    fn click_square(&mut self, row: usize, col: usize) -> Result<(), BoardError> {
        if self.selected.is_some() && !self.board.is_dark(row, col) {
            // Validate bounds before reporting the color problem.
            self.board.piece(row, col)?;
            return Err(BoardError::LightSquareOccupationDenied { row, col });
        }
        self.board.set_piece(row, col, self.selected)
    }

    /// Clear the board and load `record`. A malformed record leaves the board
    /// as it was.
    pub fn import_notation(&mut self, record: &str) -> Result<ImportReport, NotationError> {
        let pos = notation::decode(record, self.board.size())?;
        self.board.clear();
        for p in &pos.placements {
            // Decoded placements are already on dark squares of this board.
            if let Err(e) = self.board.set_piece(p.row, p.col, Some(p.piece)) {
                log::warn!("dropping decoded placement: {e}");
            }
        }
        info!(
            "imported {} pieces ({} tokens skipped)",
            self.board.piece_count(),
            pos.skipped.len()
        );
        Ok(ImportReport {
            turn: pos.turn,
            placed: self.board.piece_count(),
            skipped: pos.skipped,
        })
    }

    pub fn scene(&self) -> Scene {
        build_scene(&self.board, &self.style, &self.layout)
    }

    /// Build the scene, resolve its assets and produce the requested artifact.
    /// Failures leave the board untouched.
    pub fn export(&mut self, format: ExportFormat) -> Result<Artifact, RenderError> {
        let scene = self.scene();
        let bundle = AssetBundle::resolve(&scene, &self.assets)?;
        let svg = to_vector_document(&scene, &bundle)?;
        let bytes = match format {
            ExportFormat::Svg => svg.into_bytes(),
            ExportFormat::Png => {
                let (w, h) = (scene.width.ceil() as u32, scene.height.ceil() as u32);
                to_raster(&svg, w, h)?.to_png()?
            }
        };
        debug!("exported {} ({} bytes)", format.file_name(), bytes.len());
        Ok(Artifact {
            file_name: format.file_name(),
            media_type: format.media_type(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetName;
    use crate::board::Rank;
    use crate::error::AssetError;

    fn white() -> PieceKind {
        PieceKind::man(Side::White)
    }

    #[test]
    fn import_replaces_board_and_is_idempotent() {
        let mut s = Session::new();
        s.dispatch(Command::PlacePiece {
            row: 7,
            col: 0,
            piece: Some(PieceKind::new(Side::Black, Rank::King)),
        })
        .unwrap();
        let out = s
            .dispatch(Command::ImportNotation("W:Wb4,a3:Bb8,d8".into()))
            .unwrap();
        let Outcome::Imported(report) = out else {
            panic!("unexpected outcome {out:?}");
        };
        assert_eq!(4, report.placed);
        assert_eq!(None, s.board().piece(7, 0).unwrap());
        let first = s.board().clone();
        s.import_notation("W:Wb4,a3:Bb8,d8").unwrap();
        assert_eq!(&first, s.board());
    }

    #[test]
    fn malformed_import_keeps_previous_board() {
        let mut s = Session::new();
        s.import_notation("W:Wb4:Bd8").unwrap();
        let before = s.board().clone();
        let err = s.dispatch(Command::ImportNotation("W:Wb4".into()));
        assert!(matches!(
            err,
            Err(DiagramError::Notation(NotationError::MalformedRecord { .. }))
        ));
        assert_eq!(&before, s.board());
    }

    #[test]
    fn skipped_tokens_do_not_block_valid_ones() {
        let mut s = Session::new();
        let report = s.import_notation("W:Wb4,b9,q1:B").unwrap();
        assert_eq!(1, report.placed);
        assert_eq!(2, report.skipped.len());
        assert_eq!(Some(white()), s.board().piece(4, 1).unwrap());
    }

    #[test]
    fn resizing_always_clears() {
        let mut s = Session::new();
        s.import_notation("W:Wb4,a3:Bb8,d8").unwrap();
        s.dispatch(Command::SetSize(8)).unwrap();
        assert_eq!(0, s.board().piece_count());
        s.import_notation("W:Wb4:B").unwrap();
        s.dispatch(Command::SetSize(10)).unwrap();
        assert_eq!(10, s.board().size());
        assert_eq!(10, s.style().board_size);
        assert_eq!(0, s.board().piece_count());
    }

    #[test]
    fn invalid_size_keeps_board() {
        let mut s = Session::new();
        s.import_notation("W:Wb4:B").unwrap();
        assert!(matches!(
            s.dispatch(Command::SetSize(7)),
            Err(DiagramError::Board(BoardError::InvalidSize(7)))
        ));
        assert_eq!(8, s.board().size());
        assert_eq!(1, s.board().piece_count());
    }

    #[test]
    fn click_places_selected_piece_or_erases() {
        let mut s = Session::new();
        s.dispatch(Command::SelectPiece(Some(white()))).unwrap();
        s.dispatch(Command::ClickSquare { row: 5, col: 2 }).unwrap();
        assert_eq!(Some(white()), s.board().piece(5, 2).unwrap());

        assert!(matches!(
            s.dispatch(Command::ClickSquare { row: 5, col: 3 }),
            Err(DiagramError::Board(
                BoardError::LightSquareOccupationDenied { row: 5, col: 3 }
            ))
        ));
        assert!(matches!(
            s.dispatch(Command::ClickSquare { row: 8, col: 0 }),
            Err(DiagramError::Board(BoardError::IllegalSquare { .. }))
        ));

        s.dispatch(Command::SelectPiece(None)).unwrap();
        s.dispatch(Command::ClickSquare { row: 5, col: 2 }).unwrap();
        assert_eq!(0, s.board().piece_count());
    }

    #[test]
    fn colors_flow_into_the_scene() {
        let mut s = Session::new();
        s.dispatch(Command::SetColor {
            target: SquareShade::Dark,
            color: "#b58863".parse().unwrap(),
        })
        .unwrap();
        let doc = s.export(ExportFormat::Svg).unwrap();
        let text = String::from_utf8(doc.bytes).unwrap();
        assert_eq!(32, text.matches("fill=\"#b58863\"").count());
        assert_eq!("draughts-diagram.svg", doc.file_name);
    }

    struct Broken;

    impl AssetStore for Broken {
        fn load(&self, name: AssetName) -> Result<String, AssetError> {
            Err(AssetError::Load {
                name: name.file_name().to_string(),
                reason: "offline".to_string(),
            })
        }
    }

    #[test]
    fn asset_failure_aborts_export_only() {
        let mut s = Session::with_assets(Broken);
        s.import_notation("W:Wb4:Bd8").unwrap();
        let before = s.board().clone();
        let err = s.dispatch(Command::Export(ExportFormat::Svg)).unwrap_err();
        assert!(err.to_string().contains("hatch.svg"), "{err}");
        assert_eq!(&before, s.board());
    }

    #[test]
    fn commands_deserialize_from_json() {
        let cmds: Vec<Command> = serde_json::from_str(
            r##"[{"set_size":10},{"select_piece":"black-king"},{"click_square":{"row":0,"col":1}},
                {"set_color":{"target":"light","color":"#eee"}},"reset",{"export":"png"}]"##,
        )
        .unwrap();
        assert_eq!(Command::SetSize(10), cmds[0]);
        assert_eq!(
            Command::SelectPiece(Some(PieceKind::new(Side::Black, Rank::King))),
            cmds[1]
        );
        assert_eq!(Command::Reset, cmds[4]);
        assert_eq!(Command::Export(ExportFormat::Png), cmds[5]);
    }

    #[test]
    fn none_selects_the_eraser() {
        for json in [r#"{"select_piece":"none"}"#, r#"{"select_piece":null}"#] {
            assert_eq!(
                Command::SelectPiece(None),
                serde_json::from_str::<Command>(json).unwrap(),
                "{json}"
            );
        }
        let place: Command =
            serde_json::from_str(r#"{"place_piece":{"row":0,"col":1,"piece":"none"}}"#).unwrap();
        assert_eq!(
            Command::PlacePiece {
                row: 0,
                col: 1,
                piece: None
            },
            place
        );
        assert!(serde_json::from_str::<Command>(r#"{"select_piece":"queen"}"#).is_err());
        assert_eq!(
            r#"{"select_piece":"none"}"#,
            serde_json::to_string(&Command::SelectPiece(None)).unwrap()
        );
    }

    #[test]
    fn degenerate_layout_is_refused() {
        let layout = Layout {
            board_px: -100.0,
            ..Layout::default()
        };
        assert!(matches!(
            Session::new().with_layout(layout),
            Err(StyleError::InvalidLayout {
                field: "board_px",
                ..
            })
        ));
        let ok = Session::new()
            .with_layout(Layout {
                board_px: 400.0,
                ..Layout::default()
            })
            .unwrap();
        assert_eq!(460.0, ok.scene().width);
    }
}
