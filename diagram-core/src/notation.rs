//! Decoder for colon-delimited position records such as `W:Wb4,a3:Bb8,d8`.
//!
//! ```text
//! record    := turn ':' whiteList ':' blackList ( ':' extra )*
//! whiteList := 'W' square (',' square)* | ''
//! blackList := 'B' square (',' square)* | ''
//! square    := file rank
//! ```
//!
//! Files are letters from `a`, ranks count up from the bottom row. Every
//! decoded piece is a man; the record carries no rank information.

use std::fmt;

use log::warn;

use crate::board::{PieceKind, Side, is_dark};
use crate::error::NotationError;

/// Why a square token was left out of a decoded position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Unparseable,
    OutOfRange,
    LightSquare,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::Unparseable => "not a square",
            SkipReason::OutOfRange => "outside the board",
            SkipReason::LightSquare => "light square",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedToken {
    pub side: Side,
    pub token: String,
    pub reason: SkipReason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub piece: PieceKind,
}

/// Result of decoding one record against a board size.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Position {
    /// Side to move. Informational only.
    pub turn: Option<Side>,
    pub placements: Vec<Placement>,
    pub skipped: Vec<SkippedToken>,
}

/// Map a `file rank` token such as `b4` to `(row, col)` on a `size` board.
///
/// Returns `Err(SkipReason)` for tokens that do not name a square on the board.
/// Light squares are not rejected here.
pub fn square_coords(token: &str, size: usize) -> Result<(usize, usize), SkipReason> {
    let t = token.trim().to_ascii_lowercase();
    let mut chars = t.chars();
    let file = chars.next().ok_or(SkipReason::Unparseable)?;
    if !file.is_ascii_alphabetic() {
        return Err(SkipReason::Unparseable);
    }
    let digits = chars.as_str();
    let rank: i64 = digits.parse().map_err(|_| {
        // All digits but too long for any board.
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            SkipReason::OutOfRange
        } else {
            SkipReason::Unparseable
        }
    })?;
    let n = size as i64;
    let col = file as i64 - 'a' as i64;
    let row = n.checked_sub(rank).ok_or(SkipReason::OutOfRange)?;
    if !(0..n).contains(&row) || !(0..n).contains(&col) {
        return Err(SkipReason::OutOfRange);
    }
    Ok((row as usize, col as usize))
}

/// Parse a single square name for direct placement, e.g. from a config file.
pub fn parse_square(token: &str, size: usize) -> Result<(usize, usize), NotationError> {
    square_coords(token, size).map_err(|_| NotationError::InvalidSquare(token.to_string()))
}

fn square_list(field: &str, marker: char) -> Vec<&str> {
    match field.trim().strip_prefix(marker) {
        Some(rest) if rest.trim().is_empty() => Vec::new(),
        Some(rest) => rest.split(',').collect(),
        None => Vec::new(),
    }
}

fn parse_turn(field: &str) -> Option<Side> {
    match field.trim() {
        t if t.eq_ignore_ascii_case("w") => Some(Side::White),
        t if t.eq_ignore_ascii_case("b") => Some(Side::Black),
        other => {
            warn!("unrecognized turn field '{other}'");
            None
        }
    }
}

/// Decode `record` for a board of side `size`.
///
/// Fails only when the record has fewer than three fields. Tokens that do not
/// land on a dark square of the board are reported in [`Position::skipped`].
pub fn decode(record: &str, size: usize) -> Result<Position, NotationError> {
    let fields: Vec<&str> = record.trim().split(':').collect();
    if fields.len() < 3 {
        return Err(NotationError::MalformedRecord {
            record: record.to_string(),
            fields: fields.len(),
        });
    }

    let mut pos = Position {
        turn: parse_turn(fields[0]),
        ..Default::default()
    };
    let lists = [
        (Side::White, square_list(fields[1], 'W')),
        (Side::Black, square_list(fields[2], 'B')),
    ];
    for (side, tokens) in lists {
        for token in tokens {
            let checked = square_coords(token, size).and_then(|(row, col)| {
                if is_dark(row, col) {
                    Ok((row, col))
                } else {
                    Err(SkipReason::LightSquare)
                }
            });
            match checked {
                Ok((row, col)) => pos.placements.push(Placement {
                    row,
                    col,
                    piece: PieceKind::man(side),
                }),
                Err(reason) => {
                    warn!("skipping square '{}' ({reason})", token.trim());
                    pos.skipped.push(SkippedToken {
                        side,
                        token: token.trim().to_string(),
                        reason,
                    });
                }
            }
        }
    }
    Ok(pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(pos: &Position, row: usize, col: usize) -> Option<PieceKind> {
        pos.placements
            .iter()
            .rev()
            .find(|p| p.row == row && p.col == col)
            .map(|p| p.piece)
    }

    #[test]
    fn decodes_reference_record() {
        let pos = decode("W:Wb4,a3:Bb8,d8", 8).unwrap();
        assert_eq!(Some(Side::White), pos.turn);
        assert_eq!(4, pos.placements.len());
        assert!(pos.skipped.is_empty());
        let white = Some(PieceKind::man(Side::White));
        let black = Some(PieceKind::man(Side::Black));
        assert_eq!(white, at(&pos, 4, 1)); // b4
        assert_eq!(white, at(&pos, 5, 0)); // a3
        assert_eq!(black, at(&pos, 0, 1)); // b8
        assert_eq!(black, at(&pos, 0, 3)); // d8
    }

    #[test]
    fn rank_one_is_bottom_row() {
        assert_eq!(Ok((7, 0)), square_coords("a1", 8));
        assert_eq!(Ok((0, 7)), square_coords("H8", 8));
        assert_eq!(Ok((0, 9)), square_coords("j10", 10));
    }

    #[test]
    fn too_few_fields_is_malformed() {
        for rec in ["", "W", "W:Wb4", "Wb4,a3"] {
            assert!(matches!(
                decode(rec, 8),
                Err(NotationError::MalformedRecord { .. })
            ));
        }
    }

    #[test]
    fn out_of_range_tokens_are_skipped() {
        let pos = decode("B:Wb4,b10,z2:Bd8,a0", 8).unwrap();
        assert_eq!(Some(Side::Black), pos.turn);
        assert_eq!(2, pos.placements.len());
        assert_eq!(Some(PieceKind::man(Side::White)), at(&pos, 4, 1));
        assert_eq!(Some(PieceKind::man(Side::Black)), at(&pos, 0, 3));
        let skipped: Vec<_> = pos.skipped.iter().map(|s| s.token.as_str()).collect();
        assert_eq!(vec!["b10", "z2", "a0"], skipped);
        assert!(
            pos.skipped
                .iter()
                .all(|s| s.reason == SkipReason::OutOfRange)
        );
    }

    #[test]
    fn oversized_rank_is_out_of_range() {
        assert_eq!(
            Err(SkipReason::OutOfRange),
            square_coords("b99999999999999999999", 8)
        );
        assert_eq!(Err(SkipReason::Unparseable), square_coords("b 4", 8));
        assert_eq!(Err(SkipReason::Unparseable), square_coords("b4x", 8));
    }

    #[test]
    fn garbage_and_light_squares_are_skipped() {
        let pos = decode("W:W4b,,a4:B", 8).unwrap();
        assert!(pos.placements.is_empty());
        let reasons: Vec<_> = pos.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(
            vec![
                SkipReason::Unparseable,
                SkipReason::Unparseable,
                SkipReason::LightSquare
            ],
            reasons
        );
    }

    #[test]
    fn missing_markers_mean_empty_lists() {
        let pos = decode("W:b4,a3:d8:extra:fields", 8).unwrap();
        assert!(pos.placements.is_empty());
        assert!(pos.skipped.is_empty());
        let pos = decode("W::", 8).unwrap();
        assert!(pos.placements.is_empty());
    }

    #[test]
    fn tokens_are_case_insensitive_and_trimmed() {
        let pos = decode(" w : W B4 , A3 : BB8 ", 8).unwrap();
        assert_eq!(Some(Side::White), pos.turn);
        assert_eq!(3, pos.placements.len());
    }

    #[test]
    fn unknown_turn_is_not_fatal() {
        let pos = decode("X:Wb4:B", 8).unwrap();
        assert_eq!(None, pos.turn);
        assert_eq!(1, pos.placements.len());
    }

    #[test]
    fn parse_square_reports_token() {
        assert_eq!(Ok((4, 1)), parse_square("b4", 8));
        assert_eq!(
            Err(NotationError::InvalidSquare("k1".into())),
            parse_square("k1", 8)
        );
    }
}
