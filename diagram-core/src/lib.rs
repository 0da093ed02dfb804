//! Draughts board diagrams: board model, position-record decoding, scene
//! building and SVG/PNG export.
//!
//! ```no_run
//! use diagram_core::{Command, ExportFormat, Outcome, Session};
//!
//! let mut session = Session::new();
//! session.dispatch(Command::ImportNotation("W:Wb4,a3:Bb8,d8".into()))?;
//! if let Outcome::Exported(svg) = session.dispatch(Command::Export(ExportFormat::Svg))? {
//!     std::fs::write(svg.file_name, &svg.bytes)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assets;
pub mod board;
pub mod config;
pub mod error;
pub mod notation;
pub mod raster;
pub mod render;
pub mod scene;
pub mod session;
pub mod style;

pub use assets::{AssetBundle, AssetName, AssetStore, BuiltinAssets, CachedAssets};
pub use board::{Board, PieceKind, Rank, Side};
pub use config::{DiagramFile, PieceSpec};
pub use error::{AssetError, BoardError, DiagramError, NotationError, RenderError, StyleError};
pub use notation::{Position, decode};
pub use raster::{Bitmap, to_raster};
pub use render::to_vector_document;
pub use scene::{Primitive, Scene, build_scene};
pub use session::{Artifact, Command, ExportFormat, ImportReport, Outcome, Session};
pub use style::{Color, Layout, SquareShade, StyleConfig};
