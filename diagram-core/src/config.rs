//! JSON diagram description consumed by the command-line tool.

use serde::{Deserialize, Serialize};

use crate::board::{DEFAULT_SIZE, PieceKind};
use crate::error::NotationError;
use crate::notation::parse_square;
use crate::session::{Command, ExportFormat};
use crate::style::{Color, Layout, SquareShade};

/// A piece placed by square name, e.g. `{"square": "b4", "piece": "white-king"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceSpec {
    pub square: String,
    pub piece: PieceKind,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramFile {
    pub size: Option<usize>,
    pub light: Option<Color>,
    pub dark: Option<Color>,
    /// Position record, applied before `pieces`.
    pub notation: Option<String>,
    pub pieces: Vec<PieceSpec>,
    /// Extra commands run after everything above.
    pub commands: Vec<Command>,
    pub layout: Option<Layout>,
    /// Defaults to both SVG and PNG.
    pub formats: Option<Vec<ExportFormat>>,
}

impl DiagramFile {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let file: DiagramFile = serde_json::from_str(text)?;
        if let Some(layout) = &file.layout {
            layout.validate().map_err(serde::de::Error::custom)?;
        }
        Ok(file)
    }

    pub fn formats(&self) -> Vec<ExportFormat> {
        self.formats
            .clone()
            .unwrap_or_else(|| vec![ExportFormat::Svg, ExportFormat::Png])
    }

    /// Session commands that reproduce this diagram, exports excluded.
    pub fn commands(&self) -> Result<Vec<Command>, NotationError> {
        let size = self.size.unwrap_or(DEFAULT_SIZE);
        let mut out = vec![Command::SetSize(size)];
        if let Some(c) = &self.light {
            out.push(Command::SetColor {
                target: SquareShade::Light,
                color: c.clone(),
            });
        }
        if let Some(c) = &self.dark {
            out.push(Command::SetColor {
                target: SquareShade::Dark,
                color: c.clone(),
            });
        }
        if let Some(record) = &self.notation {
            out.push(Command::ImportNotation(record.clone()));
        }
        for p in &self.pieces {
            let (row, col) = parse_square(&p.square, size)?;
            out.push(Command::PlacePiece {
                row,
                col,
                piece: Some(p.piece),
            });
        }
        out.extend(self.commands.iter().cloned());
        Ok(out)
    }
}
