//! Error types for the diagram pipeline.

use thiserror::Error;

/// Contract violations raised by the board model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("invalid board size {0}: expected an even size between 4 and 16")]
    InvalidSize(usize),

    #[error("square ({row}, {col}) is outside the {size}x{size} board")]
    IllegalSquare { row: usize, col: usize, size: usize },

    #[error("square ({row}, {col}) is light; pieces may only stand on dark squares")]
    LightSquareOccupationDenied { row: usize, col: usize },
}

/// Errors raised while decoding position records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("malformed record '{record}': expected at least 3 ':'-separated fields, found {fields}")]
    MalformedRecord { record: String, fields: usize },

    #[error("invalid square '{0}'")]
    InvalidSquare(String),
}

/// Errors raised while parsing style values and piece names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("invalid color '{0}': expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error("unknown piece '{0}'")]
    UnknownPiece(String),

    #[error("invalid layout: {field} = {value} ({expected})")]
    InvalidLayout {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Failure to resolve a vector asset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("failed to load asset {name}: {reason}")]
    Load { name: String, reason: String },

    #[error("failed to load asset {name}: no <svg> root element")]
    Malformed { name: String },
}

/// Errors raised while serializing or rasterizing a scene.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("svg serialization failed")]
    Write(#[from] std::fmt::Error),

    #[error("rasterization failed: {0}")]
    Rasterization(String),

    #[error("png encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Any failure surfaced by a [`Session`](crate::session::Session).
#[derive(Debug, Error)]
pub enum DiagramError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<AssetError> for DiagramError {
    fn from(e: AssetError) -> Self {
        DiagramError::Render(RenderError::Asset(e))
    }
}
