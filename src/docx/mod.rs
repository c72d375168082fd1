//! # Document Model
//!
//! The output of compilation and the input of the [`writer`]. Field names
//! mirror the WordprocessingML option surface (camelCase on the wire), so a
//! pass-through option bag written by a user and a value computed by the
//! compiler are the same type.
//!
//! Every option record is a partial record: all fields optional, merged
//! key-by-key through [`Merge`] with the argument winning. That is the whole
//! override story: compute a record, merge the user's record over it.

pub mod writer;
mod xml;

use serde::{Deserialize, Serialize};

pub use writer::DocxWriter;

/// Key-by-key merge of two partial records. Fields set on `next` win.
pub trait Merge: Clone {
    fn merge(&self, next: &Self) -> Self;
}

/// Merge two optional records; absent only when both are absent.
pub fn merge_options<T: Merge>(base: Option<&T>, next: Option<&T>) -> Option<T> {
    match (base, next) {
        (None, None) => None,
        (Some(base), None) => Some(base.clone()),
        (None, Some(next)) => Some(next.clone()),
        (Some(base), Some(next)) => Some(base.merge(next)),
    }
}

macro_rules! impl_merge {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl Merge for $ty {
            fn merge(&self, next: &Self) -> Self {
                Self {
                    $( $field: next.$field.clone().or_else(|| self.$field.clone()), )*
                }
            }
        }
    };
}

pub(crate) use impl_merge;

// ── Document ───────────────────────────────────────────────────

/// A compiled document: document-wide options plus one section per page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(flatten)]
    pub options: DocumentOptions,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentOptions {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub last_modified_by: Option<String>,
    pub revision: Option<u32>,
    pub styles: Option<StylesOptions>,
    pub even_and_odd_header_and_footers: Option<bool>,
    pub background: Option<DocumentBackground>,
    pub features: Option<DocumentFeatures>,
}

impl_merge!(DocumentOptions {
    title,
    subject,
    creator,
    keywords,
    description,
    last_modified_by,
    revision,
    styles,
    even_and_odd_header_and_footers,
    background,
    features,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentBackground {
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentFeatures {
    pub update_fields: Option<bool>,
}

/// Style definitions: document defaults plus named paragraph and character
/// styles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StylesOptions {
    pub default: Option<DefaultStyles>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paragraph_styles: Vec<StyleDefinition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub character_styles: Vec<StyleDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefaultStyles {
    pub document: Option<DocumentDefaults>,
}

impl_merge!(DefaultStyles { document });

/// Run and paragraph properties applied to the whole document
/// (`w:docDefaults`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentDefaults {
    pub run: Option<RunOptions>,
    pub paragraph: Option<ParagraphOptions>,
}

impl_merge!(DocumentDefaults { run, paragraph });

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDefinition {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub based_on: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub quick_format: Option<bool>,
    #[serde(default)]
    pub run: Option<RunOptions>,
    #[serde(default)]
    pub paragraph: Option<ParagraphOptions>,
}

// ── Sections ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    pub properties: SectionProperties,
    pub headers: HeaderFooterGroup,
    pub footers: HeaderFooterGroup,
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionProperties {
    pub page: Option<PageProperties>,
    pub title_page: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<SectionType>,
}

impl_merge!(SectionProperties { page, title_page, kind });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionType {
    NextPage,
    NextColumn,
    Continuous,
    EvenPage,
    OddPage,
}

impl SectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::NextPage => "nextPage",
            SectionType::NextColumn => "nextColumn",
            SectionType::Continuous => "continuous",
            SectionType::EvenPage => "evenPage",
            SectionType::OddPage => "oddPage",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageProperties {
    pub size: Option<PageSizeAttributes>,
    pub margin: Option<PageMargin>,
    pub page_numbers: Option<PageNumbers>,
}

impl_merge!(PageProperties { size, margin, page_numbers });

/// Page size in twips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSizeAttributes {
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub orientation: Option<PageOrientation>,
    pub code: Option<u32>,
}

impl_merge!(PageSizeAttributes {
    width,
    height,
    orientation,
    code,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageOrientation {
    Portrait,
    Landscape,
}

impl PageOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageOrientation::Portrait => "portrait",
            PageOrientation::Landscape => "landscape",
        }
    }
}

/// Page margins in twips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMargin {
    pub top: Option<i64>,
    pub right: Option<i64>,
    pub bottom: Option<i64>,
    pub left: Option<i64>,
    pub header: Option<i64>,
    pub footer: Option<i64>,
    pub gutter: Option<i64>,
}

impl_merge!(PageMargin {
    top,
    right,
    bottom,
    left,
    header,
    footer,
    gutter,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageNumbers {
    pub start: Option<u32>,
}

/// Which pages a header or footer applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderFooterSlot {
    #[default]
    Default,
    First,
    Even,
}

impl HeaderFooterSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderFooterSlot::Default => "default",
            HeaderFooterSlot::First => "first",
            HeaderFooterSlot::Even => "even",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderFooter {
    pub children: Vec<Block>,
}

/// Headers (or footers) of one section, keyed by slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderFooterGroup {
    pub default: Option<HeaderFooter>,
    pub first: Option<HeaderFooter>,
    pub even: Option<HeaderFooter>,
}

impl HeaderFooterGroup {
    pub fn get(&self, slot: HeaderFooterSlot) -> Option<&HeaderFooter> {
        match slot {
            HeaderFooterSlot::Default => self.default.as_ref(),
            HeaderFooterSlot::First => self.first.as_ref(),
            HeaderFooterSlot::Even => self.even.as_ref(),
        }
    }

    pub fn set(&mut self, slot: HeaderFooterSlot, value: HeaderFooter) {
        match slot {
            HeaderFooterSlot::Default => self.default = Some(value),
            HeaderFooterSlot::First => self.first = Some(value),
            HeaderFooterSlot::Even => self.even = Some(value),
        }
    }

    pub fn contains(&self, slot: HeaderFooterSlot) -> bool {
        self.get(slot).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.first.is_none() && self.even.is_none()
    }

    /// Populated slots in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (HeaderFooterSlot, &HeaderFooter)> {
        [
            HeaderFooterSlot::Default,
            HeaderFooterSlot::First,
            HeaderFooterSlot::Even,
        ]
        .into_iter()
        .filter_map(move |slot| self.get(slot).map(|value| (slot, value)))
    }
}

// ── Blocks ─────────────────────────────────────────────────────

/// A block-level element of a section, header, footer or table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(flatten)]
    pub options: ParagraphOptions,
    #[serde(default)]
    pub children: Vec<ParagraphChild>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ParagraphChild {
    Text(TextRun),
    Image(ImageRun),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParagraphOptions {
    pub alignment: Option<Alignment>,
    pub spacing: Option<SpacingOptions>,
    pub indent: Option<IndentOptions>,
    pub style: Option<String>,
    pub heading: Option<String>,
    pub keep_next: Option<bool>,
    pub keep_lines: Option<bool>,
    pub page_break_before: Option<bool>,
    pub widow_control: Option<bool>,
    pub bidirectional: Option<bool>,
    pub outline_level: Option<u8>,
    pub thematic_break: Option<bool>,
}

impl_merge!(ParagraphOptions {
    alignment,
    spacing,
    indent,
    style,
    heading,
    keep_next,
    keep_lines,
    page_break_before,
    widow_control,
    bidirectional,
    outline_level,
    thematic_break,
});

/// Paragraph (and table) justification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Start,
    Center,
    End,
    #[serde(alias = "justified")]
    Both,
    Distribute,
    Left,
    Right,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Start => "start",
            Alignment::Center => "center",
            Alignment::End => "end",
            Alignment::Both => "both",
            Alignment::Distribute => "distribute",
            Alignment::Left => "left",
            Alignment::Right => "right",
        }
    }
}

/// Spacing in twips. Without a `lineRule`, `line` is read in 240ths of a line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpacingOptions {
    pub before: Option<i64>,
    pub after: Option<i64>,
    pub line: Option<i64>,
    pub line_rule: Option<LineRule>,
}

impl_merge!(SpacingOptions {
    before,
    after,
    line,
    line_rule,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineRule {
    Auto,
    Exact,
    AtLeast,
}

impl LineRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineRule::Auto => "auto",
            LineRule::Exact => "exact",
            LineRule::AtLeast => "atLeast",
        }
    }
}

/// Indentation in twips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndentOptions {
    pub left: Option<i64>,
    pub right: Option<i64>,
    pub first_line: Option<i64>,
    pub hanging: Option<i64>,
}

impl_merge!(IndentOptions {
    left,
    right,
    first_line,
    hanging,
});

// ── Runs ───────────────────────────────────────────────────────

/// A run of text, or an explicit line break when `break` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "break", default, skip_serializing_if = "Option::is_none")]
    pub break_count: Option<u32>,
    #[serde(flatten)]
    pub options: RunOptions,
}

impl TextRun {
    pub fn new(text: impl Into<String>, options: RunOptions) -> Self {
        Self {
            text: Some(text.into()),
            break_count: None,
            options,
        }
    }

    /// A run holding nothing but a single line break.
    pub fn line_break() -> Self {
        Self {
            text: None,
            break_count: Some(1),
            options: RunOptions::default(),
        }
    }
}

/// Character formatting. Sizes in half-points, character spacing in twips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunOptions {
    pub bold: Option<bool>,
    pub italics: Option<bool>,
    pub underline: Option<UnderlineOptions>,
    pub strike: Option<bool>,
    pub double_strike: Option<bool>,
    pub all_caps: Option<bool>,
    pub small_caps: Option<bool>,
    pub sub_script: Option<bool>,
    pub super_script: Option<bool>,
    pub highlight: Option<String>,
    pub size: Option<i64>,
    pub font: Option<String>,
    pub color: Option<String>,
    pub character_spacing: Option<i64>,
    pub style: Option<String>,
    pub language: Option<LanguageOptions>,
    pub right_to_left: Option<bool>,
    pub vanish: Option<bool>,
}

impl_merge!(RunOptions {
    bold,
    italics,
    underline,
    strike,
    double_strike,
    all_caps,
    small_caps,
    sub_script,
    super_script,
    highlight,
    size,
    font,
    color,
    character_spacing,
    style,
    language,
    right_to_left,
    vanish,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnderlineOptions {
    /// Underline pattern (`single`, `double`, `dotted`, ...). Defaults to `single`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageOptions {
    pub value: Option<String>,
    pub east_asia: Option<String>,
    pub bidirectional: Option<String>,
}

// ── Images ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Png,
    Jpg,
    Gif,
    Bmp,
    Svg,
}

impl ImageType {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageType::Png => "png",
            ImageType::Jpg => "jpg",
            ImageType::Gif => "gif",
            ImageType::Bmp => "bmp",
            ImageType::Svg => "svg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageType::Png => "image/png",
            ImageType::Jpg => "image/jpeg",
            ImageType::Gif => "image/gif",
            ImageType::Bmp => "image/bmp",
            ImageType::Svg => "image/svg+xml",
        }
    }
}

/// Image bytes as handed over by the caller: raw bytes, or a string holding
/// a data URI, base64 data, or a file path. Decoded only by the writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageSource {
    Bytes(Vec<u8>),
    Text(String),
}

/// Display size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AltText {
    pub description: String,
    pub name: String,
    pub title: String,
}

/// Raster stand-in for an SVG image, for consumers without SVG support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFallback {
    #[serde(rename = "type")]
    pub kind: ImageType,
    pub data: ImageSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRun {
    #[serde(rename = "type")]
    pub kind: ImageType,
    pub data: ImageSource,
    pub transformation: Transformation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<AltText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floating: Option<Floating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<ImageFallback>,
}

/// Anchored (floating) placement of a drawing. Offsets in EMU.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Floating {
    pub horizontal_position: HorizontalPosition,
    pub vertical_position: VerticalPosition,
    pub behind_document: Option<bool>,
    pub z_index: Option<i64>,
    pub allow_overlap: Option<bool>,
    pub lock_anchor: Option<bool>,
    pub layout_in_cell: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HorizontalPosition {
    pub relative: Option<HorizontalRelativeFrom>,
    pub align: Option<HorizontalPositionAlign>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerticalPosition {
    pub relative: Option<VerticalRelativeFrom>,
    pub align: Option<VerticalPositionAlign>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HorizontalRelativeFrom {
    Character,
    Column,
    InsideMargin,
    LeftMargin,
    Margin,
    OutsideMargin,
    Page,
    RightMargin,
}

impl HorizontalRelativeFrom {
    pub fn as_str(&self) -> &'static str {
        match self {
            HorizontalRelativeFrom::Character => "character",
            HorizontalRelativeFrom::Column => "column",
            HorizontalRelativeFrom::InsideMargin => "insideMargin",
            HorizontalRelativeFrom::LeftMargin => "leftMargin",
            HorizontalRelativeFrom::Margin => "margin",
            HorizontalRelativeFrom::OutsideMargin => "outsideMargin",
            HorizontalRelativeFrom::Page => "page",
            HorizontalRelativeFrom::RightMargin => "rightMargin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalRelativeFrom {
    BottomMargin,
    InsideMargin,
    Line,
    Margin,
    OutsideMargin,
    Page,
    Paragraph,
    TopMargin,
}

impl VerticalRelativeFrom {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalRelativeFrom::BottomMargin => "bottomMargin",
            VerticalRelativeFrom::InsideMargin => "insideMargin",
            VerticalRelativeFrom::Line => "line",
            VerticalRelativeFrom::Margin => "margin",
            VerticalRelativeFrom::OutsideMargin => "outsideMargin",
            VerticalRelativeFrom::Page => "page",
            VerticalRelativeFrom::Paragraph => "paragraph",
            VerticalRelativeFrom::TopMargin => "topMargin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HorizontalPositionAlign {
    Center,
    Inside,
    Left,
    Outside,
    Right,
}

impl HorizontalPositionAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            HorizontalPositionAlign::Center => "center",
            HorizontalPositionAlign::Inside => "inside",
            HorizontalPositionAlign::Left => "left",
            HorizontalPositionAlign::Outside => "outside",
            HorizontalPositionAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalPositionAlign {
    Bottom,
    Center,
    Inside,
    Outside,
    Top,
}

impl VerticalPositionAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalPositionAlign::Bottom => "bottom",
            VerticalPositionAlign::Center => "center",
            VerticalPositionAlign::Inside => "inside",
            VerticalPositionAlign::Outside => "outside",
            VerticalPositionAlign::Top => "top",
        }
    }
}

// ── Tables ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthType {
    Auto,
    Dxa,
    Nil,
    #[serde(alias = "percentage")]
    Pct,
}

impl WidthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidthType::Auto => "auto",
            WidthType::Dxa => "dxa",
            WidthType::Nil => "nil",
            WidthType::Pct => "pct",
        }
    }
}

/// A table, cell or indent width. `dxa` sizes are twips, `pct` sizes are
/// percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableWidth {
    pub size: f64,
    #[serde(rename = "type")]
    pub kind: WidthType,
}

impl TableWidth {
    pub fn percent(size: f64) -> Self {
        Self {
            size,
            kind: WidthType::Pct,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(flatten)]
    pub options: TableOptions,
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableOptions {
    pub width: Option<TableWidth>,
    pub alignment: Option<Alignment>,
    pub column_widths: Option<Vec<i64>>,
    pub layout: Option<TableLayout>,
    pub borders: Option<BordersOptions>,
    pub margins: Option<MarginOptions>,
    pub indent: Option<TableWidth>,
    pub style: Option<String>,
}

impl_merge!(TableOptions {
    width,
    alignment,
    column_widths,
    layout,
    borders,
    margins,
    indent,
    style,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableLayout {
    Autofit,
    Fixed,
}

impl TableLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableLayout::Autofit => "autofit",
            TableLayout::Fixed => "fixed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(flatten)]
    pub options: TableRowOptions,
    #[serde(default)]
    pub children: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableRowOptions {
    pub height: Option<RowHeight>,
    pub cant_split: Option<bool>,
    pub table_header: Option<bool>,
}

impl_merge!(TableRowOptions {
    height,
    cant_split,
    table_header,
});

/// Row height in twips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowHeight {
    pub value: i64,
    #[serde(default)]
    pub rule: Option<HeightRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeightRule {
    Auto,
    AtLeast,
    Exact,
}

impl HeightRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeightRule::Auto => "auto",
            HeightRule::AtLeast => "atLeast",
            HeightRule::Exact => "exact",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(flatten)]
    pub options: TableCellOptions,
    #[serde(default)]
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableCellOptions {
    pub width: Option<TableWidth>,
    pub column_span: Option<u32>,
    pub row_span: Option<u32>,
    pub borders: Option<BordersOptions>,
    pub margins: Option<MarginOptions>,
    pub shading: Option<ShadingOptions>,
    pub vertical_align: Option<VerticalAlign>,
}

impl_merge!(TableCellOptions {
    width,
    column_span,
    row_span,
    borders,
    margins,
    shading,
    vertical_align,
});

/// One border edge. `size` is in eighths of a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderOptions {
    pub style: String,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub space: Option<i64>,
}

impl BorderOptions {
    pub fn none() -> Self {
        Self {
            style: "none".to_string(),
            size: Some(0.0),
            color: Some("auto".to_string()),
            space: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BordersOptions {
    pub top: Option<BorderOptions>,
    pub bottom: Option<BorderOptions>,
    pub left: Option<BorderOptions>,
    pub right: Option<BorderOptions>,
    pub inside_horizontal: Option<BorderOptions>,
    pub inside_vertical: Option<BorderOptions>,
}

/// Cell margins in twips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarginOptions {
    pub top: Option<i64>,
    pub bottom: Option<i64>,
    pub left: Option<i64>,
    pub right: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShadingOptions {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub color: Option<String>,
    pub fill: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
    Both,
}

impl VerticalAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalAlign::Top => "top",
            VerticalAlign::Center => "center",
            VerticalAlign::Bottom => "bottom",
            VerticalAlign::Both => "both",
        }
    }
}
