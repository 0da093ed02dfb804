//! Scene → standalone SVG document.
//!
//! Assets are inlined: the hatch tile as a `<pattern>`, each piece glyph once
//! as a `<symbol>` referenced by `<use>`. The output never points at files.

use std::fmt::{self, Write};

use crate::assets::{AssetBundle, AssetName, SvgFragment};
use crate::board::PieceKind;
use crate::error::{AssetError, RenderError};
use crate::scene::{Anchor, GLYPH_BOX, Primitive, Scene};

pub const SVG_FILE_NAME: &str = "draughts-diagram.svg";

// Near-integers print as integers, everything else with up to 4 decimals.
fn fmt_num(v: f64) -> String {
    if (v - v.round()).abs() < 1e-6 {
        format!("{:.0}", v)
    } else {
        format!("{:.4}", v)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn glyph_id(piece: PieceKind) -> String {
    format!("glyph-{}", piece.name())
}

fn view_box_attr(frag: &SvgFragment, fallback: (f64, f64)) -> String {
    let [x, y, w, h] = frag
        .view_box
        .unwrap_or_else(|| [0.0, 0.0, fallback.0, fallback.1]);
    format!(
        "{} {} {} {}",
        fmt_num(x),
        fmt_num(y),
        fmt_num(w),
        fmt_num(h)
    )
}

fn write_defs(s: &mut String, scene: &Scene, bundle: &AssetBundle) -> Result<(), RenderError> {
    s.push_str("<defs>\n");
    let (tw, th) = bundle.hatch.size().ok_or_else(|| AssetError::Malformed {
        name: AssetName::Hatch.file_name().to_string(),
    })?;
    writeln!(
        s,
        "<pattern id=\"{}\" patternUnits=\"userSpaceOnUse\" width=\"{}\" height=\"{}\" viewBox=\"{}\" patternTransform=\"scale({})\">\n{}\n</pattern>",
        scene.hatch.id,
        fmt_num(tw),
        fmt_num(th),
        view_box_attr(&bundle.hatch, (tw, th)),
        fmt_num(scene.hatch.scale),
        bundle.hatch.body
    )?;
    for piece in scene.piece_kinds() {
        let frag = bundle.glyphs.get(&piece).ok_or_else(|| AssetError::Load {
            name: AssetName::Glyph(piece).file_name().to_string(),
            reason: "not resolved for this scene".to_string(),
        })?;
        writeln!(
            s,
            "<symbol id=\"{}\" viewBox=\"{}\">\n{}\n</symbol>",
            glyph_id(piece),
            view_box_attr(frag, (GLYPH_BOX, GLYPH_BOX)),
            frag.body
        )?;
    }
    s.push_str("</defs>\n");
    Ok(())
}

fn write_primitive(s: &mut String, scene: &Scene, p: &Primitive) -> fmt::Result {
    match p {
        Primitive::FilledRect { x, y, w, h, fill } => writeln!(
            s,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            fmt_num(*x),
            fmt_num(*y),
            fmt_num(*w),
            fmt_num(*h),
            fill
        ),
        Primitive::PatternFill {
            x,
            y,
            w,
            h,
            pattern,
        } => writeln!(
            s,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"url(#{})\"/>",
            fmt_num(*x),
            fmt_num(*y),
            fmt_num(*w),
            fmt_num(*h),
            pattern
        ),
        Primitive::Label { x, y, text, anchor } => {
            let anchor = match anchor {
                Anchor::Center => "middle",
            };
            writeln!(
                s,
                "<text x=\"{}\" y=\"{}\" text-anchor=\"{}\" dominant-baseline=\"central\" fill=\"{}\">{}</text>",
                fmt_num(*x),
                fmt_num(*y),
                anchor,
                scene.label_style.color,
                svg_escape(text)
            )
        }
        Primitive::Glyph { x, y, scale, piece } => writeln!(
            s,
            "<use xlink:href=\"#{}\" width=\"{}\" height=\"{}\" transform=\"translate({} {}) scale({})\"/>",
            glyph_id(*piece),
            fmt_num(GLYPH_BOX),
            fmt_num(GLYPH_BOX),
            fmt_num(*x),
            fmt_num(*y),
            fmt_num(*scale)
        ),
        Primitive::BorderRect {
            x,
            y,
            w,
            h,
            stroke,
            stroke_width,
        } => writeln!(
            s,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            fmt_num(*x),
            fmt_num(*y),
            fmt_num(*w),
            fmt_num(*h),
            stroke,
            fmt_num(*stroke_width)
        ),
    }
}

/// Serialize `scene` with the assets in `bundle` inlined.
pub fn to_vector_document(scene: &Scene, bundle: &AssetBundle) -> Result<String, RenderError> {
    let w = fmt_num(scene.width);
    let h = fmt_num(scene.height);
    let mut s = String::new();
    s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    writeln!(
        s,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\" font-size=\"{}\" font-weight=\"{}\">",
        fmt_num(scene.label_style.font_size),
        svg_escape(&scene.label_style.font_weight)
    )?;
    write_defs(&mut s, scene, bundle)?;
    for p in &scene.primitives {
        write_primitive(&mut s, scene, p)?;
    }
    s.push_str("</svg>\n");
    Ok(s)
}
