//! # Units and Lengths
//!
//! Style values arrive in whatever unit the author found convenient: bare
//! numbers (points), unit strings like `"1.5in"` or `"12px"`, percentages for
//! widths. WordprocessingML wants fixed-point integers in a handful of
//! different units depending on the field:
//!
//! | unit        | per point | used for                          |
//! |-------------|-----------|-----------------------------------|
//! | twip (dxa)  | 20        | spacing, indents, margins, widths |
//! | half-point  | 2         | font sizes                        |
//! | EMU         | 12700     | drawing offsets                   |
//! | pixel       | 96/72     | image transformations             |
//!
//! Every converter here is absence-preserving: an unresolved input yields
//! `None`, never an error, and the caller picks the default.

use serde::{Deserialize, Serialize};

use crate::docx::{TableWidth, WidthType};

pub const TWIPS_PER_POINT: f64 = 20.0;
pub const HALF_POINTS_PER_POINT: f64 = 2.0;
pub const EMU_PER_POINT: f64 = 12700.0;
pub const PIXELS_PER_POINT: f64 = 96.0 / 72.0;

const POINTS_PER_INCH: f64 = 72.0;
const POINTS_PER_PICA: f64 = 12.0;
const MILLIMETERS_PER_INCH: f64 = 25.4;
const CENTIMETERS_PER_INCH: f64 = 2.54;

/// A length as written in a style: a number of points, or a string with a
/// unit suffix (`pt`, `px`, `in`, `cm`, `mm`, `pc`, `pi`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Length {
    Points(f64),
    Text(String),
}

impl From<f64> for Length {
    fn from(points: f64) -> Self {
        Length::Points(points)
    }
}

impl From<&str> for Length {
    fn from(text: &str) -> Self {
        Length::Text(text.to_string())
    }
}

/// A width or height. On top of what [`Length`] accepts, widths take
/// percentages (`"50%"`), bare digit strings (pixels) and an explicit
/// `{ "size": .., "type": .. }` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Number(f64),
    Text(String),
    Explicit(TableWidth),
}

impl Dimension {
    /// View this dimension as a plain length. Explicit width records have no
    /// length reading.
    pub fn as_length(&self) -> Option<Length> {
        match self {
            Dimension::Number(n) => Some(Length::Points(*n)),
            Dimension::Text(t) => Some(Length::Text(t.clone())),
            Dimension::Explicit(_) => None,
        }
    }
}

impl From<f64> for Dimension {
    fn from(value: f64) -> Self {
        Dimension::Number(value)
    }
}

impl From<&str> for Dimension {
    fn from(text: &str) -> Self {
        Dimension::Text(text.to_string())
    }
}

/// Resolve a length to points.
pub fn resolve_length(value: Option<&Length>) -> Option<f64> {
    match value? {
        Length::Points(points) if points.is_nan() => None,
        Length::Points(points) => Some(*points),
        Length::Text(text) => parse_length(text),
    }
}

/// Parse `<number><unit>` with optional surrounding whitespace.
/// The number is `-?\d+(\.\d+)?`; the unit is case-insensitive.
fn parse_length(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let split = trimmed.len().checked_sub(2)?;
    if !trimmed.is_char_boundary(split) {
        return None;
    }
    let (number, unit) = trimmed.split_at(split);
    let number = number.trim_end();
    if !is_plain_decimal(number) {
        return None;
    }
    let numeric: f64 = number.parse().ok()?;

    match unit.to_ascii_lowercase().as_str() {
        "pt" => Some(numeric),
        "px" => Some(numeric * 72.0 / 96.0),
        "in" => Some(numeric * POINTS_PER_INCH),
        "cm" => Some(numeric / CENTIMETERS_PER_INCH * POINTS_PER_INCH),
        "mm" => Some(numeric / MILLIMETERS_PER_INCH * POINTS_PER_INCH),
        "pc" | "pi" => Some(numeric * POINTS_PER_PICA),
        _ => None,
    }
}

fn is_plain_decimal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && frac.map_or(true, all_digits)
}

/// Parse the longest leading decimal number, ignoring whatever trails it
/// (`"50abc"` → 50). Leading whitespace is skipped.
pub(crate) fn parse_float_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let sign_end = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - sign_end;
    let mut frac_digits = 0;
    if end < bytes.len() && bytes[end] == b'.' {
        let mut cursor = end + 1;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        frac_digits = cursor - end - 1;
        if frac_digits > 0 {
            end = cursor;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut cursor = end + 1;
        if cursor < bytes.len() && (bytes[cursor] == b'+' || bytes[cursor] == b'-') {
            cursor += 1;
        }
        let exp_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor > exp_start {
            end = cursor;
        }
    }

    let mut number = String::with_capacity(end + 1);
    number.push_str(&s[..sign_end]);
    if int_digits == 0 {
        number.push('0');
    }
    number.push_str(&s[sign_end..end]);
    number.parse().ok()
}

/// Round half up, matching how the format's reference tooling rounds
/// (`2.5 → 3`, `-2.5 → -2`).
pub(crate) fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn to_twip(points: Option<f64>) -> Option<i64> {
    points.map(|p| round_half_up(p * TWIPS_PER_POINT))
}

pub fn to_half_points(points: Option<f64>) -> Option<i64> {
    points.map(|p| round_half_up(p * HALF_POINTS_PER_POINT))
}

pub fn to_emu(points: Option<f64>) -> Option<i64> {
    points.map(|p| round_half_up(p * EMU_PER_POINT))
}

pub fn to_pixels(points: Option<f64>) -> Option<i64> {
    points.map(|p| round_half_up(p * PIXELS_PER_POINT))
}

/// Device pixels to twips (96 px = 1 in = 1440 twips).
pub fn to_twip_from_pixels(pixels: f64) -> Option<i64> {
    to_twip(Some(pixels / PIXELS_PER_POINT))
}

/// Resolve a length straight to twips.
pub fn length_to_twip(value: Option<&Length>) -> Option<i64> {
    to_twip(resolve_length(value))
}

pub fn inches_to_twip(inches: f64) -> i64 {
    round_half_up(inches * POINTS_PER_INCH * TWIPS_PER_POINT)
}

/// Millimeters to twips, truncating like the format's page-size presets do.
pub fn millimeters_to_twip(millimeters: f64) -> i64 {
    (millimeters / MILLIMETERS_PER_INCH * POINTS_PER_INCH * TWIPS_PER_POINT).floor() as i64
}

/// Strip the leading `#` from hex colors. Named colors and `auto` pass
/// through; empty strings count as absent.
pub fn normalize_color(color: Option<&str>) -> Option<String> {
    let color = color?;
    if color.is_empty() {
        return None;
    }
    Some(color.strip_prefix('#').unwrap_or(color).to_string())
}

/// Border colors fall back to the `auto` sentinel instead of disappearing.
pub fn normalize_border_color(color: Option<&str>) -> String {
    normalize_color(color).unwrap_or_else(|| "auto".to_string())
}

/// Resolve a table or cell width.
///
/// Unit strings are lengths (points). Numbers and bare digit strings are
/// device pixels: `96`, `"96"` and `"1in"` all come out as 1440 dxa.
pub fn resolve_width(value: Option<&Dimension>) -> Option<TableWidth> {
    match value? {
        Dimension::Explicit(width) => Some(width.clone()),
        Dimension::Number(pixels) => {
            if pixels.is_nan() {
                return None;
            }
            Some(dxa_from_pixels(*pixels))
        }
        Dimension::Text(text) => {
            let trimmed = text.trim();
            if let Some(percent) = trimmed.strip_suffix('%') {
                return parse_float_prefix(percent).map(|size| TableWidth {
                    size,
                    kind: WidthType::Pct,
                });
            }
            if let Some(points) = parse_length(trimmed) {
                return Some(TableWidth {
                    size: to_twip(Some(points)).map_or(points, |t| t as f64),
                    kind: WidthType::Dxa,
                });
            }
            parse_float_prefix(trimmed).map(dxa_from_pixels)
        }
    }
}

fn dxa_from_pixels(pixels: f64) -> TableWidth {
    TableWidth {
        size: to_twip_from_pixels(pixels).map_or(pixels, |t| t as f64),
        kind: WidthType::Dxa,
    }
}
