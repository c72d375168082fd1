//! Derived properties: values computed from several style keys at once, or
//! mapped from a CSS-like token onto the format's vocabulary.

use crate::docx::{
    Alignment, BorderOptions, BordersOptions, Floating, HorizontalPosition,
    HorizontalPositionAlign, HorizontalRelativeFrom, Transformation, UnderlineOptions,
    VerticalAlign, VerticalPosition, VerticalRelativeFrom,
};
use crate::units::{
    length_to_twip, normalize_border_color, normalize_color, resolve_length, round_half_up,
    to_emu, to_pixels, Length, TWIPS_PER_POINT,
};

use super::{BorderSideStyle, FontWeight, Style};

/// Line heights up to this value are multipliers of the font size.
const MAX_LINE_HEIGHT_MULTIPLIER: f64 = 4.0;

pub fn resolve_font_size(style: Option<&Style>) -> Option<f64> {
    style.and_then(|s| s.font_size)
}

/// `"bold"` or a numeric weight of 600 and up.
pub fn resolve_font_weight(style: Option<&Style>) -> bool {
    match style.and_then(|s| s.font_weight.as_ref()) {
        Some(FontWeight::Keyword(keyword)) => keyword == "bold",
        Some(FontWeight::Numeric(weight)) => *weight >= 600.0,
        None => false,
    }
}

/// Line spacing in twips.
///
/// Small values read as multipliers when a font size is known: 1.5 at 12pt
/// is 360. Everything else is points. Zero means unset.
pub fn resolve_line_height(style: Option<&Style>, font_size: Option<f64>) -> Option<i64> {
    let line_height = style.and_then(|s| s.line_height)?;
    if line_height == 0.0 || line_height.is_nan() {
        return None;
    }

    match font_size {
        Some(size) if line_height <= MAX_LINE_HEIGHT_MULTIPLIER && size != 0.0 && !size.is_nan() => {
            Some(round_half_up(size * line_height * TWIPS_PER_POINT))
        }
        _ => Some(round_half_up(line_height * TWIPS_PER_POINT)),
    }
}

/// Whether a space separated `textDecoration` value contains `token`.
pub fn has_decoration(style: Option<&Style>, token: &str) -> bool {
    style
        .and_then(|s| s.text_decoration.as_deref())
        .is_some_and(|decoration| decoration.split_whitespace().any(|part| part == token))
}

/// A single underline, colored like the decoration (or the text).
///
/// An explicit `underline` flag wins over `textDecoration`, so
/// `underline: false` suppresses a decoration underline.
pub fn resolve_underline(style: Option<&Style>) -> Option<UnderlineOptions> {
    let underlined = style
        .and_then(|s| s.underline)
        .unwrap_or_else(|| has_decoration(style, "underline"));
    if !underlined {
        return None;
    }

    let color = style.and_then(|s| s.text_decoration_color.as_deref().or(s.color.as_deref()));
    Some(UnderlineOptions {
        kind: Some("single".to_string()),
        color: normalize_color(color),
    })
}

/// Map a `textAlign` token. Unknown and absent values align left.
pub fn to_alignment(value: Option<&str>) -> Alignment {
    match value {
        Some("center") => Alignment::Center,
        Some("right") => Alignment::Right,
        Some("justify") => Alignment::Both,
        _ => Alignment::Left,
    }
}

/// Map a cell `verticalAlign` token. Unknown and absent values align top.
pub fn to_vertical_align(value: Option<&str>) -> VerticalAlign {
    match value {
        Some("center") => VerticalAlign::Center,
        Some("bottom") => VerticalAlign::Bottom,
        _ => VerticalAlign::Top,
    }
}

/// Cell borders.
///
/// A `borders` record yields exactly the edges it names. Without one, all
/// four edges are emitted from the `border*Width`/`border*Color` keys, and an
/// edge with no positive width (or the color `none`) is switched off.
pub fn normalize_borders(style: Option<&Style>) -> Option<BordersOptions> {
    let style = style?;

    if let Some(borders) = &style.borders {
        return Some(BordersOptions {
            top: borders.top.as_ref().map(border_from_side),
            bottom: borders.bottom.as_ref().map(border_from_side),
            left: borders.left.as_ref().map(border_from_side),
            right: borders.right.as_ref().map(border_from_side),
            ..Default::default()
        });
    }

    Some(BordersOptions {
        top: Some(border_from_width(style.border_top_width, style.border_top_color.as_deref())),
        bottom: Some(border_from_width(
            style.border_bottom_width,
            style.border_bottom_color.as_deref(),
        )),
        left: Some(border_from_width(style.border_left_width, style.border_left_color.as_deref())),
        right: Some(border_from_width(
            style.border_right_width,
            style.border_right_color.as_deref(),
        )),
        ..Default::default()
    })
}

fn border_from_side(side: &BorderSideStyle) -> BorderOptions {
    BorderOptions {
        style: side.style.clone().unwrap_or_else(|| "none".to_string()),
        size: Some(side.size.unwrap_or(0.0)),
        color: Some(side.color.clone().unwrap_or_else(|| "auto".to_string())),
        space: None,
    }
}

fn border_from_width(width: Option<f64>, color: Option<&str>) -> BorderOptions {
    let visible = width.is_some_and(|w| w > 0.0) && color != Some("none");
    BorderOptions {
        style: if visible { "single" } else { "none" }.to_string(),
        size: Some(width.unwrap_or(0.0)),
        color: Some(normalize_border_color(color)),
        space: None,
    }
}

/// Floating placement for `position: "absolute"`, relative to the margins.
///
/// `left` wins over `right` and `top` over `bottom`. A `bottom` offset is
/// measured upwards, so it comes out negative.
pub fn resolve_floating(style: Option<&Style>) -> Option<Floating> {
    let style = style?;
    if style.position.as_deref() != Some("absolute") {
        return None;
    }

    let top = resolve_length(style.top.as_ref());
    let bottom = resolve_length(style.bottom.as_ref());
    let left = resolve_length(style.left.as_ref());
    let right = resolve_length(style.right.as_ref());

    let horizontal_position = match (left, right) {
        (Some(left), _) => HorizontalPosition {
            relative: Some(HorizontalRelativeFrom::Margin),
            align: None,
            offset: to_emu(Some(left)),
        },
        (None, Some(right)) => HorizontalPosition {
            relative: Some(HorizontalRelativeFrom::Margin),
            align: Some(HorizontalPositionAlign::Right),
            offset: to_emu(Some(right)),
        },
        (None, None) => HorizontalPosition {
            relative: Some(HorizontalRelativeFrom::Margin),
            align: None,
            offset: Some(0),
        },
    };

    let vertical_offset = match (top, bottom) {
        (Some(top), _) => to_emu(Some(top)),
        (None, Some(bottom)) => to_emu(Some(bottom)).map(|emu| -emu),
        (None, None) => Some(0),
    };
    let vertical_position = VerticalPosition {
        relative: Some(VerticalRelativeFrom::Margin),
        align: None,
        offset: vertical_offset,
    };

    Some(Floating {
        horizontal_position,
        vertical_position,
        behind_document: style.behind_document.filter(|behind| *behind),
        z_index: style.z_index,
        ..Default::default()
    })
}

/// Display size in pixels. An axis that does not resolve is 1px.
pub fn resolve_image_transformation(width: Option<&Length>, height: Option<&Length>) -> Transformation {
    let axis = |value: Option<&Length>| to_pixels(resolve_length(value)).map_or(1.0, |px| px as f64);
    Transformation {
        width: axis(width),
        height: axis(height),
    }
}

/// Padding edges in twips, each side resolved through the shorthand chain
/// `side ?? vertical/horizontal ?? padding`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddingEdges {
    pub top: Option<i64>,
    pub bottom: Option<i64>,
    pub left: Option<i64>,
    pub right: Option<i64>,
}

impl PaddingEdges {
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.bottom.is_none() && self.left.is_none() && self.right.is_none()
    }
}

pub fn resolve_padding_edges(style: Option<&Style>) -> PaddingEdges {
    let Some(style) = style else {
        return PaddingEdges::default();
    };
    let padding = style.padding.as_ref();
    let vertical = style.padding_vertical.as_ref().or(padding);
    let horizontal = style.padding_horizontal.as_ref().or(padding);

    PaddingEdges {
        top: length_to_twip(style.padding_top.as_ref().or(vertical)),
        bottom: length_to_twip(style.padding_bottom.as_ref().or(vertical)),
        left: length_to_twip(style.padding_left.as_ref().or(horizontal)),
        right: length_to_twip(style.padding_right.as_ref().or(horizontal)),
    }
}
