//! Square colors and the fixed geometry of an exported diagram.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::DEFAULT_SIZE;
use crate::error::StyleError;

/// A CSS hex color, normalized to lowercase `#rrggbb`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn white() -> Self {
        Color("#ffffff".to_string())
    }

    pub fn black() -> Self {
        Color("#000000".to_string())
    }
}

impl FromStr for Color {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || StyleError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(bad)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let hex = hex.to_ascii_lowercase();
        match hex.len() {
            6 => Ok(Color(format!("#{hex}"))),
            3 => {
                let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
                Ok(Color(format!("#{expanded}")))
            }
            _ => Err(bad()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = StyleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which square color a `SetColor` command targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SquareShade {
    Light,
    Dark,
}

/// Current colors and board size. Read by the scene builder at export time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub light: Color,
    pub dark: Color,
    pub board_size: usize,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            light: Color::white(),
            dark: Color::black(),
            board_size: DEFAULT_SIZE,
        }
    }
}

impl StyleConfig {
    pub fn color(&self, shade: SquareShade) -> &Color {
        match shade {
            SquareShade::Light => &self.light,
            SquareShade::Dark => &self.dark,
        }
    }

    pub fn set_color(&mut self, shade: SquareShade, color: Color) {
        match shade {
            SquareShade::Light => self.light = color,
            SquareShade::Dark => self.dark = color,
        }
    }
}

/// Fixed geometry of the exported diagram, in SVG user units (pixels).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Width and height of the square board area.
    pub board_px: f64,
    /// Left label band; also the gap above the board.
    pub margin: f64,
    /// Bottom band holding the file letters.
    pub label_band: f64,
    /// Gap right of the board.
    pub border_pad: f64,
    /// Piece box size as a fraction of the cell.
    pub piece_inset: f64,
    /// Cell size at which the hatch pattern is drawn unscaled.
    pub reference_tile: f64,
    pub label_font_size: f64,
    pub label_font_weight: String,
    pub label_color: Color,
    pub border_color: Color,
    pub border_width: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            board_px: 600.0,
            margin: 30.0,
            label_band: 30.0,
            border_pad: 30.0,
            piece_inset: 0.8,
            reference_tile: 75.0,
            label_font_size: 16.0,
            label_font_weight: "bold".to_string(),
            label_color: Color("#333333".to_string()),
            border_color: Color("#333333".to_string()),
            border_width: 2.0,
        }
    }
}

impl Layout {
    /// Reject geometry that would produce an empty, inverted or mirrored drawing.
    pub fn validate(&self) -> Result<(), StyleError> {
        let checks: [(&'static str, f64, fn(f64) -> bool, &'static str); 8] = [
            ("board_px", self.board_px, |v| v > 0.0, "> 0"),
            ("margin", self.margin, |v| v >= 0.0, ">= 0"),
            ("label_band", self.label_band, |v| v >= 0.0, ">= 0"),
            ("border_pad", self.border_pad, |v| v >= 0.0, ">= 0"),
            ("piece_inset", self.piece_inset, |v| v > 0.0 && v <= 1.0, "in (0, 1]"),
            ("reference_tile", self.reference_tile, |v| v > 0.0, "> 0"),
            ("label_font_size", self.label_font_size, |v| v > 0.0, "> 0"),
            ("border_width", self.border_width, |v| v >= 0.0, ">= 0"),
        ];
        for (field, value, ok, expected) in checks {
            if !value.is_finite() || !ok(value) {
                return Err(StyleError::InvalidLayout {
                    field,
                    value: value.to_string(),
                    expected,
                });
            }
        }
        Ok(())
    }
}
