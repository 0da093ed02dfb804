//! Label font embedded at build time.
//!
//! `FONT_BYTES` is empty when the build could not fetch a font; callers then
//! fall back to the system font database.

pub static FONT_BYTES: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/DejaVuSans-Bold.ttf"));
