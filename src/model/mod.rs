//! # Node Tree
//!
//! The input representation: a tree of typed nodes, each with its own props
//! record and ordered children. This is what a component runtime (a React
//! reconciler, a template engine, or plain JSON) hands over once it has
//! finished building the document.
//!
//! ```json
//! { "type": "TEXT", "props": { "style": { "fontSize": 12 } },
//!   "children": [{ "type": "TEXT_INSTANCE", "text": "Hello" }] }
//! ```
//!
//! The tree is read-only during compilation and child order is significant.

use serde::{Deserialize, Serialize};

use crate::docx::{
    AltText, DocumentOptions, Floating, HeaderFooterSlot, ImageSource, PageOrientation,
    ParagraphOptions, RunOptions, SectionProperties, StylesOptions, TableCellOptions,
    TableOptions, TableRowOptions, Transformation,
};
use crate::style::{Style, StyleInput};
use crate::units::{Dimension, Length};

/// The top-level holder of a node tree. The compiler looks for the first
/// `DOCUMENT` node among its children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Container {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Node {
    /// The document root. Its `PAGE` children become sections.
    Document {
        #[serde(default)]
        props: DocumentProps,
        #[serde(default)]
        children: Vec<Node>,
    },

    /// One section: page geometry plus content, headers and footers.
    Page {
        #[serde(default)]
        props: PageProps,
        #[serde(default)]
        children: Vec<Node>,
    },

    /// A transparent grouping container. Its children are spliced into the
    /// parent's block list and inherit its style.
    View {
        #[serde(default)]
        props: ViewProps,
        #[serde(default)]
        children: Vec<Node>,
    },

    /// A paragraph at block level, a styled span when nested in another
    /// `TEXT`.
    Text {
        #[serde(default)]
        props: TextProps,
        #[serde(default)]
        children: Vec<Node>,
    },

    Image {
        props: ImageProps,
        #[serde(default)]
        children: Vec<Node>,
    },

    /// Inline vector graphics, embedded as an SVG image.
    Svg {
        #[serde(default)]
        props: SvgProps,
        #[serde(default)]
        children: Vec<Node>,
    },

    /// A path inside an `SVG`.
    Path {
        props: PathProps,
        #[serde(default)]
        children: Vec<Node>,
    },

    Table {
        #[serde(default)]
        props: TableProps,
        #[serde(default)]
        children: Vec<Node>,
    },

    TableRow {
        #[serde(default)]
        props: TableRowProps,
        #[serde(default)]
        children: Vec<Node>,
    },

    TableCell {
        #[serde(default)]
        props: TableCellProps,
        #[serde(default)]
        children: Vec<Node>,
    },

    Header {
        #[serde(default)]
        props: HeaderFooterProps,
        #[serde(default)]
        children: Vec<Node>,
    },

    Footer {
        #[serde(default)]
        props: HeaderFooterProps,
        #[serde(default)]
        children: Vec<Node>,
    },

    /// Raw text content.
    TextInstance { text: String },
}

/// Root document properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentProps {
    pub creator: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<Keywords>,
    /// Default language tag for all runs (e.g. `en-US`).
    pub language: Option<String>,
    /// Only `fontFamily` is read here: it becomes the default run font.
    pub style: Option<StyleInput>,
    pub styles: Option<StylesOptions>,
    pub subject: Option<String>,
    pub title: Option<String>,
    /// Any other document options, passed through.
    pub docx: Option<DocumentOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keywords {
    One(String),
    Many(Vec<String>),
}

impl Keywords {
    /// The single string the core properties part stores.
    pub fn joined(&self) -> String {
        match self {
            Keywords::One(keywords) => keywords.clone(),
            Keywords::Many(keywords) => keywords.join(", "),
        }
    }
}

/// Page (section) properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageProps {
    pub size: Option<PageSize>,
    /// Section properties merged over the computed ones.
    pub properties: Option<SectionProperties>,
    /// Padding becomes the page margins.
    pub style: Option<StyleInput>,
}

/// A named paper size (`A4`, `A3`, `A5`, `LETTER`, `LEGAL`) or explicit
/// dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageSize {
    Preset(String),
    Custom(CustomPageSize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPageSize {
    pub width: Length,
    pub height: Length,
    #[serde(default)]
    pub code: Option<u32>,
    #[serde(default)]
    pub orientation: Option<PageOrientation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewProps {
    pub style: Option<StyleInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextProps {
    pub paragraph: Option<ParagraphOptions>,
    pub run: Option<RunOptions>,
    pub style: Option<StyleInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProps {
    /// Raw bytes, base64, a data URI or a file path.
    pub src: ImageSource,
    /// `png`, `jpg`, `jpeg`, `gif`, `bmp` or `svg`. Defaults to `png`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub style: Option<StyleInput>,
    #[serde(default)]
    pub alt_text: Option<AltText>,
    /// Raster stand-in, used when `type` is `svg`.
    #[serde(default)]
    pub fallback: Option<FallbackProps>,
    #[serde(default)]
    pub floating: Option<Floating>,
    /// Width and height in pixels, overriding the style.
    #[serde(default)]
    pub transformation: Option<Transformation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackProps {
    pub data: ImageSource,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SvgProps {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub view_box: Option<String>,
    pub style: Option<StyleInput>,
    pub alt_text: Option<AltText>,
    pub floating: Option<Floating>,
    pub transformation: Option<Transformation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathProps {
    pub d: String,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableProps {
    pub style: Option<StyleInput>,
    pub docx: Option<TableOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableRowProps {
    pub style: Option<StyleInput>,
    pub docx: Option<TableRowOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableCellProps {
    pub style: Option<StyleInput>,
    pub width: Option<Dimension>,
    pub column_span: Option<u32>,
    pub row_span: Option<u32>,
    pub docx: Option<TableCellOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderFooterProps {
    #[serde(rename = "type")]
    pub kind: Option<HeaderFooterSlot>,
}

impl Node {
    /// Create a Document node.
    pub fn document(props: DocumentProps, children: Vec<Node>) -> Self {
        Node::Document { props, children }
    }

    /// Create a Page node with a style (padding becomes margins).
    pub fn page(style: Style, children: Vec<Node>) -> Self {
        Node::Page {
            props: PageProps {
                style: Some(style.into()),
                ..Default::default()
            },
            children,
        }
    }

    /// Create a View node.
    pub fn view(style: Style, children: Vec<Node>) -> Self {
        Node::View {
            props: ViewProps {
                style: Some(style.into()),
            },
            children,
        }
    }

    /// Create a Text node holding a single string.
    pub fn text(content: &str, style: Style) -> Self {
        Node::Text {
            props: TextProps {
                style: Some(style.into()),
                ..Default::default()
            },
            children: vec![Node::text_instance(content)],
        }
    }

    /// Create a Text node from inline children (strings and nested spans).
    pub fn span(style: Style, children: Vec<Node>) -> Self {
        Node::Text {
            props: TextProps {
                style: Some(style.into()),
                ..Default::default()
            },
            children,
        }
    }

    pub fn text_instance(text: &str) -> Self {
        Node::TextInstance {
            text: text.to_string(),
        }
    }

    /// Create an Image node of the given type.
    pub fn image(src: ImageSource, kind: &str, style: Style) -> Self {
        Node::Image {
            props: ImageProps {
                src,
                kind: Some(kind.to_string()),
                style: Some(style.into()),
                alt_text: None,
                fallback: None,
                floating: None,
                transformation: None,
            },
            children: vec![],
        }
    }

    pub fn table(style: Style, rows: Vec<Node>) -> Self {
        Node::Table {
            props: TableProps {
                style: Some(style.into()),
                docx: None,
            },
            children: rows,
        }
    }

    pub fn table_row(cells: Vec<Node>) -> Self {
        Node::TableRow {
            props: TableRowProps::default(),
            children: cells,
        }
    }

    pub fn table_cell(style: Style, children: Vec<Node>) -> Self {
        Node::TableCell {
            props: TableCellProps {
                style: Some(style.into()),
                ..Default::default()
            },
            children,
        }
    }

    pub fn header(slot: HeaderFooterSlot, children: Vec<Node>) -> Self {
        Node::Header {
            props: HeaderFooterProps { kind: Some(slot) },
            children,
        }
    }

    pub fn footer(slot: HeaderFooterSlot, children: Vec<Node>) -> Self {
        Node::Footer {
            props: HeaderFooterProps { kind: Some(slot) },
            children,
        }
    }

    /// The node's children. Text instances have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. }
            | Node::Page { children, .. }
            | Node::View { children, .. }
            | Node::Text { children, .. }
            | Node::Image { children, .. }
            | Node::Svg { children, .. }
            | Node::Path { children, .. }
            | Node::Table { children, .. }
            | Node::TableRow { children, .. }
            | Node::TableCell { children, .. }
            | Node::Header { children, .. }
            | Node::Footer { children, .. } => children,
            Node::TextInstance { .. } => &[],
        }
    }

    /// The node's type tag, as written in JSON.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Document { .. } => "DOCUMENT",
            Node::Page { .. } => "PAGE",
            Node::View { .. } => "VIEW",
            Node::Text { .. } => "TEXT",
            Node::Image { .. } => "IMAGE",
            Node::Svg { .. } => "SVG",
            Node::Path { .. } => "PATH",
            Node::Table { .. } => "TABLE",
            Node::TableRow { .. } => "TABLE_ROW",
            Node::TableCell { .. } => "TABLE_CELL",
            Node::Header { .. } => "HEADER",
            Node::Footer { .. } => "FOOTER",
            Node::TextInstance { .. } => "TEXT_INSTANCE",
        }
    }
}
