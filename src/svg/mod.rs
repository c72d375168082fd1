//! # Inline SVG
//!
//! An `SVG` node and its `PATH` children are serialized into standalone SVG
//! markup and embedded as an SVG image with the transparent PNG fallback.
//!
//! The markup is plain string concatenation: attribute values are written
//! as given, so callers are expected to pass well-formed path data and
//! colors. The markup is stored as its own media part and never spliced into
//! document XML.

use crate::docx::{ImageRun, ImageSource, ImageType, Paragraph};
use crate::image::{image_paragraph, transparent_png_fallback};
use crate::model::{Node, PathProps, SvgProps};
use crate::style::{cascade, resolve_floating, resolve_image_transformation, Style};
use crate::units::Length;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Serialize an `SVG` node to markup. Only `PATH` children are kept; zero and
/// empty attribute values are left out.
pub fn render_svg_markup(props: &SvgProps, children: &[Node]) -> String {
    let mut svg = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    svg.push_str(&format!(r#"<svg xmlns="{}""#, SVG_NAMESPACE));
    push_number_attr(&mut svg, "width", props.width);
    push_number_attr(&mut svg, "height", props.height);
    push_text_attr(&mut svg, "viewBox", props.view_box.as_deref());
    svg.push('>');

    for child in children {
        match child {
            Node::Path { props, .. } => push_path(&mut svg, props),
            other => log::debug!("Ignoring {} node inside SVG", other.type_name()),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn push_path(svg: &mut String, path: &PathProps) {
    svg.push_str(&format!(r#"<path d="{}""#, path.d));
    push_text_attr(svg, "fill", path.fill.as_deref());
    push_text_attr(svg, "stroke", path.stroke.as_deref());
    push_number_attr(svg, "stroke-width", path.stroke_width);
    svg.push_str(" />");
}

fn push_text_attr(svg: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        svg.push_str(&format!(r#" {}="{}""#, name, value));
    }
}

fn push_number_attr(svg: &mut String, name: &str, value: Option<f64>) {
    if let Some(value) = value.filter(|v| *v != 0.0 && !v.is_nan()) {
        svg.push_str(&format!(r#" {}="{}""#, name, value));
    }
}

/// Compile an `SVG` node into a paragraph holding an SVG image run.
///
/// The display size comes from the style when set, otherwise from the
/// node's own `width`/`height` (read as points).
pub fn create_svg_image_paragraph(props: &SvgProps, children: &[Node], inherited: Option<&Style>) -> Paragraph {
    let markup = render_svg_markup(props, children);
    let style = cascade(inherited, props.style.as_ref());
    let style = style.as_ref();

    let transformation = props.transformation.unwrap_or_else(|| {
        let width = style
            .and_then(|s| s.width.as_ref())
            .map(|w| w.as_length())
            .unwrap_or_else(|| props.width.map(Length::Points));
        let height = style
            .and_then(|s| s.height.as_ref())
            .map(|h| h.as_length())
            .unwrap_or_else(|| props.height.map(Length::Points));
        resolve_image_transformation(width.as_ref(), height.as_ref())
    });

    let image = ImageRun {
        kind: ImageType::Svg,
        data: ImageSource::Bytes(markup.into_bytes()),
        transformation,
        alt_text: props.alt_text.clone(),
        floating: props.floating.clone().or_else(|| resolve_floating(style)),
        fallback: Some(transparent_png_fallback()),
    };

    image_paragraph(image, style)
}
