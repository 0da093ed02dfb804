//! SVG → RGBA bitmap via resvg, and PNG encoding of the result.

use std::sync::{Arc, OnceLock};

use png::{BitDepth, ColorType, Encoder};

use crate::error::RenderError;

pub const PNG_FILE_NAME: &str = "draughts-diagram.png";

/// Straight-alpha RGBA pixels, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Bitmap {
    /// RGBA pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.rgba.get(i..i + 4)?.try_into().ok()
    }

    /// Deterministic 8-bit RGBA PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        Ok(encode_rgba_to_png_bytes(self.width, self.height, &self.rgba)?)
    }
}

pub fn encode_rgba_to_png_bytes(
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, width, height);
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        let mut writer = enc.write_header()?;
        writer.write_image_data(rgba)?;
    }
    Ok(buf)
}

// Loaded once per process: the embedded label font, or the system fonts when
// the build could not embed one.
fn font_database() -> Arc<usvg::fontdb::Database> {
    static DB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    DB.get_or_init(|| {
        let mut fontdb = usvg::fontdb::Database::new();
        if fonts::FONT_BYTES.is_empty() {
            log::debug!("no embedded font; loading system fonts");
            fontdb.load_system_fonts();
            return Arc::new(fontdb);
        }
        fontdb.load_font_data(fonts::FONT_BYTES.to_vec());
        // Map generic 'sans-serif' to the embedded font family
        let family_name = fontdb
            .faces()
            .next()
            .and_then(|face| face.families.first().map(|(n, _)| n.clone()));
        if let Some(name) = family_name {
            fontdb.set_sans_serif_family(name);
        }
        Arc::new(fontdb)
    })
    .clone()
}

/// Rasterize an SVG document to `width`×`height` pixels, stretching the
/// document's intrinsic size to fit.
pub fn to_raster(svg: &str, width: u32, height: u32) -> Result<Bitmap, RenderError> {
    let mut opt = usvg::Options::default();
    opt.fontdb = font_database();
    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| RenderError::Rasterization(format!("SVG parse error: {e}")))?;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| RenderError::Rasterization(format!("cannot allocate {width}x{height} pixmap")))?;
    let size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let rgba = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Ok(Bitmap {
        width,
        height,
        rgba,
    })
}
