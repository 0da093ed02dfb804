//! Board model: an N×N draughts grid where pieces stand on dark squares only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, StyleError};

/// Smallest supported board side.
pub const MIN_SIZE: usize = 4;
/// Largest supported board side.
pub const MAX_SIZE: usize = 16;
/// Sizes offered by the editor.
pub const STANDARD_SIZES: [usize; 4] = [6, 8, 10, 12];
pub const DEFAULT_SIZE: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Man,
    King,
    /// Cosmetic variant; drawn with its own glyph.
    Star,
}

/// A piece as drawn on the diagram.
///
/// Parses from and prints as the editor's piece names: `white`, `black`,
/// `white-king`, `black-king`, `white-star`, `black-star`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PieceKind {
    pub side: Side,
    pub rank: Rank,
}

impl PieceKind {
    pub const fn new(side: Side, rank: Rank) -> Self {
        PieceKind { side, rank }
    }

    pub const fn man(side: Side) -> Self {
        PieceKind::new(side, Rank::Man)
    }

    pub const ALL: [PieceKind; 6] = [
        PieceKind::new(Side::White, Rank::Man),
        PieceKind::new(Side::Black, Rank::Man),
        PieceKind::new(Side::White, Rank::King),
        PieceKind::new(Side::Black, Rank::King),
        PieceKind::new(Side::White, Rank::Star),
        PieceKind::new(Side::Black, Rank::Star),
    ];

    pub fn name(self) -> &'static str {
        match (self.side, self.rank) {
            (Side::White, Rank::Man) => "white",
            (Side::Black, Rank::Man) => "black",
            (Side::White, Rank::King) => "white-king",
            (Side::Black, Rank::King) => "black-king",
            (Side::White, Rank::Star) => "white-star",
            (Side::Black, Rank::Star) => "black-star",
        }
    }

    /// Parse an editor selection, where `none` is the eraser.
    pub fn parse_selection(s: &str) -> Result<Option<PieceKind>, StyleError> {
        if s.trim().eq_ignore_ascii_case("none") {
            Ok(None)
        } else {
            s.parse().map(Some)
        }
    }

    fn symbol(self) -> char {
        match (self.side, self.rank) {
            (Side::White, Rank::Man) => 'w',
            (Side::Black, Rank::Man) => 'b',
            (Side::White, Rank::King) => 'W',
            (Side::Black, Rank::King) => 'B',
            (Side::White, Rank::Star) => '*',
            (Side::Black, Rank::Star) => '+',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PieceKind {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PieceKind::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| StyleError::UnknownPiece(s.to_string()))
    }
}

impl TryFrom<String> for PieceKind {
    type Error = StyleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PieceKind> for String {
    fn from(k: PieceKind) -> Self {
        k.name().to_string()
    }
}

/// Serde adapter for editor selections: a piece name, or `none`/`null` for the eraser.
pub(crate) mod selection {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::PieceKind;

    pub fn serialize<S: Serializer>(piece: &Option<PieceKind>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(piece.map_or("none", PieceKind::name))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<PieceKind>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(name) => PieceKind::parse_selection(&name).map_err(D::Error::custom),
            None => Ok(None),
        }
    }
}

/// `true` when the square at `(row, col)` is dark.
pub fn is_dark(row: usize, col: usize) -> bool {
    (row + col) % 2 == 1
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    squares: Vec<Option<PieceKind>>,
}

impl Default for Board {
    fn default() -> Self {
        Board {
            size: DEFAULT_SIZE,
            squares: vec![None; DEFAULT_SIZE * DEFAULT_SIZE],
        }
    }
}

impl Board {
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if size % 2 != 0 || !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(BoardError::InvalidSize(size));
        }
        Ok(Board {
            size,
            squares: vec![None; size * size],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        is_dark(row, col)
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, BoardError> {
        if row >= self.size || col >= self.size {
            return Err(BoardError::IllegalSquare {
                row,
                col,
                size: self.size,
            });
        }
        Ok(row * self.size + col)
    }

    /// Put `piece` on `(row, col)`, replacing any occupant. `None` empties the square.
    pub fn set_piece(
        &mut self,
        row: usize,
        col: usize,
        piece: Option<PieceKind>,
    ) -> Result<(), BoardError> {
        let i = self.index(row, col)?;
        if piece.is_some() && !is_dark(row, col) {
            return Err(BoardError::LightSquareOccupationDenied { row, col });
        }
        self.squares[i] = piece;
        Ok(())
    }

    pub fn piece(&self, row: usize, col: usize) -> Result<Option<PieceKind>, BoardError> {
        self.index(row, col).map(|i| self.squares[i])
    }

    pub fn clear(&mut self) {
        self.squares.iter_mut().for_each(|sq| *sq = None);
    }

    /// Occupied squares in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (usize, usize, PieceKind)> + '_ {
        let n = self.size;
        self.squares
            .iter()
            .enumerate()
            .filter_map(move |(i, sq)| sq.map(|k| (i / n, i % n, k)))
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().filter(|sq| sq.is_some()).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            let line: String = (0..self.size)
                .map(|col| match self.squares[row * self.size + col] {
                    Some(k) => k.symbol(),
                    None if is_dark(row, col) => '.',
                    None => ' ',
                })
                .collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
