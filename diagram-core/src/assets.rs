//! Glyph and pattern vector sources.
//!
//! Stores hand back raw SVG text. [`AssetBundle::resolve`] loads everything a
//! scene needs up front so serialization never touches the store.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use log::warn;

use crate::board::{PieceKind, Rank, Side};
use crate::error::AssetError;
use crate::scene::Scene;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetName {
    Glyph(PieceKind),
    Hatch,
}

impl AssetName {
    pub fn file_name(self) -> &'static str {
        match self {
            AssetName::Glyph(k) => match (k.side, k.rank) {
                (Side::White, Rank::Man) => "man-white.svg",
                (Side::Black, Rank::Man) => "man-black.svg",
                (Side::White, Rank::King) => "king-white.svg",
                (Side::Black, Rank::King) => "king-black.svg",
                (Side::White, Rank::Star) => "star-white.svg",
                (Side::Black, Rank::Star) => "star-black.svg",
            },
            AssetName::Hatch => "hatch.svg",
        }
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

pub trait AssetStore {
    fn load(&self, name: AssetName) -> Result<String, AssetError>;
}

impl<S: AssetStore + ?Sized> AssetStore for &S {
    fn load(&self, name: AssetName) -> Result<String, AssetError> {
        (**self).load(name)
    }
}

impl<S: AssetStore + ?Sized> AssetStore for Box<S> {
    fn load(&self, name: AssetName) -> Result<String, AssetError> {
        (**self).load(name)
    }
}

/// Assets compiled into the library.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinAssets;

impl AssetStore for BuiltinAssets {
    fn load(&self, name: AssetName) -> Result<String, AssetError> {
        let text = match name {
            AssetName::Glyph(k) => match (k.side, k.rank) {
                (Side::White, Rank::Man) => include_str!("../assets/man-white.svg"),
                (Side::Black, Rank::Man) => include_str!("../assets/man-black.svg"),
                (Side::White, Rank::King) => include_str!("../assets/king-white.svg"),
                (Side::Black, Rank::King) => include_str!("../assets/king-black.svg"),
                (Side::White, Rank::Star) => include_str!("../assets/star-white.svg"),
                (Side::Black, Rank::Star) => include_str!("../assets/star-black.svg"),
            },
            AssetName::Hatch => include_str!("../assets/hatch.svg"),
        };
        Ok(text.to_string())
    }
}

/// Memoizes a store by asset name. Entries are never invalidated.
pub struct CachedAssets<S> {
    inner: S,
    cache: RefCell<HashMap<AssetName, String>>,
}

impl<S: AssetStore> CachedAssets<S> {
    pub fn new(inner: S) -> Self {
        CachedAssets {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }
}

impl<S: AssetStore> AssetStore for CachedAssets<S> {
    fn load(&self, name: AssetName) -> Result<String, AssetError> {
        if let Some(hit) = self.cache.borrow().get(&name) {
            return Ok(hit.clone());
        }
        let text = self.inner.load(name)?;
        self.cache.borrow_mut().insert(name, text.clone());
        Ok(text)
    }
}

/// Root element of an asset: its `viewBox` and the markup inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgFragment {
    pub view_box: Option<[f64; 4]>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub body: String,
}

impl SvgFragment {
    /// Split `<svg …>body</svg>` into root attributes and body.
    pub fn parse(text: &str) -> Option<SvgFragment> {
        let start = find_root(text)?;
        let tag_end = tag_end(text, start)?;
        let tag = &text[start..tag_end];
        let self_closing = tag.ends_with('/');
        let body = if self_closing {
            String::new()
        } else {
            let close = text.rfind("</svg>")?;
            if close < tag_end {
                return None;
            }
            text[tag_end + 1..close].trim().to_string()
        };
        let view_box = attr(tag, "viewBox").and_then(|v| {
            let nums: Vec<f64> = v
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .filter_map(|s| s.parse().ok())
                .collect();
            <[f64; 4]>::try_from(nums).ok()
        });
        Some(SvgFragment {
            view_box,
            width: attr(tag, "width").and_then(|v| parse_length(&v)),
            height: attr(tag, "height").and_then(|v| parse_length(&v)),
            body,
        })
    }

    /// Width and height of the drawing's coordinate system.
    pub fn size(&self) -> Option<(f64, f64)> {
        match (self.view_box, self.width, self.height) {
            (Some([_, _, w, h]), _, _) => Some((w, h)),
            (None, Some(w), Some(h)) => Some((w, h)),
            _ => None,
        }
    }
}

// Index of the `<svg` root start tag, skipping a prolog, doctype and comments.
fn find_root(text: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(off) = text[from..].find('<') {
        let at = from + off;
        let rest = &text[at..];
        if let Some(comment) = rest.strip_prefix("<!--") {
            from = at + 4 + comment.find("-->")? + 3;
            continue;
        }
        if let Some(after) = rest.strip_prefix("<svg")
            && matches!(after.chars().next(), Some(c) if c.is_whitespace() || c == '>' || c == '/')
        {
            return Some(at);
        }
        from = at + 1;
    }
    None
}

// Index of the `>` closing the tag that starts at `start`, honoring quotes.
fn tag_end(text: &str, start: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in text[start..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(start + i),
            _ => {}
        }
    }
    None
}

fn attr(tag: &str, name: &str) -> Option<String> {
    let mut from = 0;
    while let Some(off) = tag[from..].find(name) {
        let at = from + off;
        from = at + name.len();
        let before = tag[..at].chars().next_back();
        if !matches!(before, Some(c) if c.is_whitespace()) {
            continue;
        }
        let rest = tag[from..].trim_start().strip_prefix('=')?.trim_start();
        let q = rest.chars().next()?;
        if q != '"' && q != '\'' {
            return None;
        }
        let value = &rest[1..];
        return value.find(q).map(|end| value[..end].to_string());
    }
    None
}

fn parse_length(v: &str) -> Option<f64> {
    v.trim().trim_end_matches("px").parse().ok()
}

/// All asset content one scene needs, parsed and keyed by name.
#[derive(Clone, Debug)]
pub struct AssetBundle {
    pub hatch: SvgFragment,
    pub glyphs: BTreeMap<PieceKind, SvgFragment>,
}

impl AssetBundle {
    pub fn resolve<S: AssetStore + ?Sized>(scene: &Scene, store: &S) -> Result<Self, AssetError> {
        let hatch = load_fragment(store, AssetName::Hatch)?;
        let mut glyphs = BTreeMap::new();
        for kind in scene.piece_kinds() {
            glyphs.insert(kind, load_fragment(store, AssetName::Glyph(kind))?);
        }
        Ok(AssetBundle { hatch, glyphs })
    }
}

fn load_fragment<S: AssetStore + ?Sized>(
    store: &S,
    name: AssetName,
) -> Result<SvgFragment, AssetError> {
    let text = store.load(name).inspect_err(|e| warn!("{e}"))?;
    SvgFragment::parse(&text).ok_or_else(|| AssetError::Malformed {
        name: name.file_name().to_string(),
    })
}
