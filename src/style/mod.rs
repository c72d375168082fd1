//! # Style System
//!
//! A CSS-like style record for document nodes and the cascade that flattens
//! style inputs into one effective style.
//!
//! Styles compose the React Native way: a node's `style` is either a single
//! record or a list of records where later entries override earlier ones,
//! and `null`/`false` entries are skipped so callers can write conditional
//! styles inline. Merging is shallow: a key set on the later record replaces
//! the whole value, including nested ones like `borders`.
//!
//! Enumerated tokens (`textAlign`, `position`, ...) stay strings. An unknown
//! token degrades to the documented default when the derived property is
//! computed, instead of failing deserialization.

pub mod resolve;

use serde::{Deserialize, Serialize};

use crate::docx::{impl_merge, Merge};
use crate::units::{Dimension, Length};

pub use resolve::*;

/// The complete set of style properties for a node. Numbers are points
/// unless noted otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    // ── Color & Background ─────────────────────────────────────
    /// Text color, hex (`#FF0000`, `FF0000`) or a named color.
    pub color: Option<String>,
    /// Cell shading fill.
    pub background_color: Option<String>,
    /// Highlight color name (`yellow`, `green`, ...).
    pub highlight: Option<String>,

    // ── Typography ─────────────────────────────────────────────
    pub font_family: Option<String>,
    /// Font size in points.
    pub font_size: Option<f64>,
    /// `"bold"` or a CSS weight; 600 and up is bold.
    pub font_weight: Option<FontWeight>,
    /// `"normal"` or `"italic"`.
    pub font_style: Option<String>,
    /// A multiplier of the font size when 4 or less, otherwise points.
    pub line_height: Option<f64>,
    pub letter_spacing: Option<Length>,
    /// `left`, `center`, `right` or `justify`.
    pub text_align: Option<String>,
    /// First-line indent.
    pub text_indent: Option<Length>,
    /// Space separated decorations: `underline`, `line-through`.
    pub text_decoration: Option<String>,
    pub text_decoration_color: Option<String>,
    pub underline: Option<bool>,
    pub strike: Option<bool>,
    pub double_strike: Option<bool>,
    pub all_caps: Option<bool>,
    pub small_caps: Option<bool>,
    pub sub_script: Option<bool>,
    pub super_script: Option<bool>,

    // ── Box Model ──────────────────────────────────────────────
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub margin_top: Option<Length>,
    pub margin_bottom: Option<Length>,
    pub margin_left: Option<Length>,
    pub margin_right: Option<Length>,
    pub padding: Option<Length>,
    pub padding_vertical: Option<Length>,
    pub padding_horizontal: Option<Length>,
    pub padding_top: Option<Length>,
    pub padding_bottom: Option<Length>,
    pub padding_left: Option<Length>,
    pub padding_right: Option<Length>,

    // ── Border ─────────────────────────────────────────────────
    /// Per-edge borders. When present, the `border*Width`/`border*Color`
    /// fields are ignored.
    pub borders: Option<BordersStyle>,
    /// Border widths in eighths of a point, as the format stores them.
    pub border_top_width: Option<f64>,
    pub border_bottom_width: Option<f64>,
    pub border_left_width: Option<f64>,
    pub border_right_width: Option<f64>,
    pub border_top_color: Option<String>,
    pub border_bottom_color: Option<String>,
    pub border_left_color: Option<String>,
    pub border_right_color: Option<String>,

    // ── Positioning ────────────────────────────────────────────
    /// Only `"absolute"` has an effect: the image floats.
    pub position: Option<String>,
    pub top: Option<Length>,
    pub bottom: Option<Length>,
    pub left: Option<Length>,
    pub right: Option<Length>,
    pub z_index: Option<i64>,
    pub behind_document: Option<bool>,

    // ── Table Cell ─────────────────────────────────────────────
    /// `top`, `center` or `bottom`.
    pub vertical_align: Option<String>,
}

impl_merge!(Style {
    color,
    background_color,
    highlight,
    font_family,
    font_size,
    font_weight,
    font_style,
    line_height,
    letter_spacing,
    text_align,
    text_indent,
    text_decoration,
    text_decoration_color,
    underline,
    strike,
    double_strike,
    all_caps,
    small_caps,
    sub_script,
    super_script,
    width,
    height,
    margin_top,
    margin_bottom,
    margin_left,
    margin_right,
    padding,
    padding_vertical,
    padding_horizontal,
    padding_top,
    padding_bottom,
    padding_left,
    padding_right,
    borders,
    border_top_width,
    border_bottom_width,
    border_left_width,
    border_right_width,
    border_top_color,
    border_bottom_color,
    border_left_color,
    border_right_color,
    position,
    top,
    bottom,
    left,
    right,
    z_index,
    behind_document,
    vertical_align,
});

/// CSS font weight: a keyword or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Numeric(f64),
    Keyword(String),
}

/// Border configuration for a single edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BorderSideStyle {
    pub color: Option<String>,
    pub size: Option<f64>,
    /// `none`, `single`, `dashed`, `dotted`, `double`, ... passed to the
    /// format as-is.
    pub style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BordersStyle {
    pub top: Option<BorderSideStyle>,
    pub bottom: Option<BorderSideStyle>,
    pub left: Option<BorderSideStyle>,
    pub right: Option<BorderSideStyle>,
}

/// A style as written on a node: one record, or an ordered override list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleInput {
    List(Vec<StyleEntry>),
    Single(Style),
}

/// One entry of a style list. Anything but a style record is skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleEntry {
    Style(Style),
    Flag(bool),
    Null,
}

impl From<Style> for StyleInput {
    fn from(style: Style) -> Self {
        StyleInput::Single(style)
    }
}

impl From<Vec<Option<Style>>> for StyleInput {
    fn from(entries: Vec<Option<Style>>) -> Self {
        StyleInput::List(
            entries
                .into_iter()
                .map(|entry| entry.map_or(StyleEntry::Null, StyleEntry::Style))
                .collect(),
        )
    }
}

/// Flatten a style input into one effective style.
///
/// A list drops its falsy entries and folds the rest left to right; a list
/// with nothing left resolves to `None`.
pub fn resolve_style(input: Option<&StyleInput>) -> Option<Style> {
    match input? {
        StyleInput::Single(style) => Some(style.clone()),
        StyleInput::List(entries) => {
            let mut styles = entries.iter().filter_map(|entry| match entry {
                StyleEntry::Style(style) => Some(style),
                StyleEntry::Flag(_) | StyleEntry::Null => None,
            });
            let first = styles.next()?.clone();
            Some(styles.fold(first, |acc, style| acc.merge(style)))
        }
    }
}

/// Absence-safe projection of one property.
pub fn get_style_value<T>(style: Option<&Style>, project: impl FnOnce(&Style) -> Option<T>) -> Option<T> {
    style.and_then(project)
}

/// Resolve both inputs and merge them, `next` winning key by key.
pub fn merge_styles(base: Option<&StyleInput>, next: Option<&StyleInput>) -> Option<Style> {
    let base = resolve_style(base);
    cascade(base.as_ref(), next)
}

/// Merge a node's style input over an already effective inherited style.
pub fn cascade(inherited: Option<&Style>, next: Option<&StyleInput>) -> Option<Style> {
    let next = resolve_style(next);
    match (inherited, next) {
        (None, None) => None,
        (Some(base), None) => Some(base.clone()),
        (None, Some(next)) => Some(next),
        (Some(base), Some(next)) => Some(base.merge(&next)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font_size(size: f64) -> Style {
        Style {
            font_size: Some(size),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_single_and_absent() {
        assert_eq!(resolve_style(None), None);
        let single = StyleInput::Single(font_size(12.0));
        assert_eq!(resolve_style(Some(&single)), Some(font_size(12.0)));
    }

    #[test]
    fn test_list_folds_left_and_skips_falsy() {
        let json = r##"[
            { "fontSize": 1 },
            { "fontSize": 2, "color": "#111111" },
            false,
            null,
            { "color": "#222222" }
        ]"##;
        let input: StyleInput = serde_json::from_str(json).unwrap();
        let style = resolve_style(Some(&input)).unwrap();
        assert_eq!(style.font_size, Some(2.0));
        assert_eq!(style.color.as_deref(), Some("#222222"));
    }

    #[test]
    fn test_null_key_leaves_earlier_value() {
        let input: StyleInput =
            serde_json::from_str(r##"[{ "color": "#FF0000" }, { "color": null, "fontSize": 9 }]"##).unwrap();
        let style = resolve_style(Some(&input)).unwrap();
        assert_eq!(style.color.as_deref(), Some("#FF0000"));
        assert_eq!(style.font_size, Some(9.0));
    }

    #[test]
    fn test_list_of_only_falsy_entries_is_absent() {
        let input: StyleInput = serde_json::from_str("[false, null]").unwrap();
        assert_eq!(resolve_style(Some(&input)), None);
        assert_eq!(resolve_style(Some(&StyleInput::List(vec![]))), None);
    }

    #[test]
    fn test_merge_is_shallow() {
        let base = Style {
            borders: Some(BordersStyle {
                top: Some(BorderSideStyle::default()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let next = Style {
            borders: Some(BordersStyle {
                bottom: Some(BorderSideStyle::default()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge_styles(Some(&base.into()), Some(&next.into())).unwrap();
        let borders = merged.borders.unwrap();
        assert!(borders.top.is_none());
        assert!(borders.bottom.is_some());
    }

    #[test]
    fn test_cascade_keeps_inherited_keys() {
        let inherited = Style {
            color: Some("#333333".to_string()),
            ..font_size(10.0)
        };
        let input = StyleInput::from(font_size(14.0));
        let style = cascade(Some(&inherited), Some(&input)).unwrap();
        assert_eq!(style.font_size, Some(14.0));
        assert_eq!(style.color.as_deref(), Some("#333333"));
        assert_eq!(cascade(None, None), None);
        assert_eq!(cascade(Some(&inherited), None), Some(inherited));
    }

    #[test]
    fn test_get_style_value() {
        let style = font_size(9.0);
        assert_eq!(get_style_value(Some(&style), |s| s.font_size), Some(9.0));
        assert_eq!(get_style_value(None, |s: &Style| s.font_size), None);
    }

    #[test]
    fn test_deserializes_mixed_value_types() {
        let style: Style = serde_json::from_str(
            r#"{ "fontWeight": "bold", "marginTop": "12pt", "width": "50%", "padding": 4, "zIndex": 3 }"#,
        )
        .unwrap();
        assert_eq!(style.font_weight, Some(FontWeight::Keyword("bold".to_string())));
        assert_eq!(style.margin_top, Some(Length::Text("12pt".to_string())));
        assert_eq!(style.width, Some(Dimension::Text("50%".to_string())));
        assert_eq!(style.padding, Some(Length::Points(4.0)));
        assert_eq!(style.z_index, Some(3));
    }
}
