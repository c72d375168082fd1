//! # docform
//!
//! Compiles a tree of styled document nodes into a DOCX document.
//!
//! The input is the kind of tree a component renderer produces: `DOCUMENT`
//! → `PAGE` → views, text, images, tables, each with a CSS-like style. Word
//! has no notion of a cascading style or a nested box, so compilation is
//! mostly translation: styles cascade down the tree and are flattened onto
//! every paragraph and run, point and pixel lengths become twips, half-points
//! and EMUs, views dissolve into the block list, and pages become sections.
//!
//! Every compiled element can be overridden from the input through a
//! pass-through option bag (`docx`, `paragraph`, `run`, `properties`, ...)
//! merged key-by-key over the computed values.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]      — Node tree: typed nodes, props, children
//!       ↓
//!   [style]      — Cascade, merge, CSS value resolution
//!       ↓
//!   [assembler]  — Document root, pages → sections, headers/footers
//!   [blocks]     — Block composition (views are transparent)
//!   [text] [table] [image] [svg]
//!       ↓
//!   [docx]       — Document model (+ [units] for conversions)
//!       ↓
//!   [docx::writer] — Serialize to .docx bytes
//! ```

pub mod assembler;
pub mod blocks;
pub mod docx;
pub mod error;
pub mod image;
pub mod image_loader;
pub mod model;
pub mod style;
pub mod svg;
pub mod table;
pub mod text;
pub mod units;

use docx::{Document, DocxWriter};
use error::Result;
use model::{Container, Node};

pub use error::DocformError;

/// Compile a node tree into the document model.
///
/// Pure: no I/O happens here. Image sources are carried through untouched
/// and only resolved by the writer.
pub fn compile(container: &Container) -> Result<Document> {
    assembler::build_document(container)
}

/// Render a node tree to `.docx` bytes.
///
/// This is the primary entry point.
pub fn render(container: &Container) -> Result<Vec<u8>> {
    let document = compile(container)?;
    DocxWriter::new().write(&document)
}

/// Parse a JSON node tree. Accepts a container (`{ "children": [...] }`) or
/// a single node such as the `DOCUMENT` itself.
pub fn parse_json(json: &str) -> Result<Container> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.get("type").is_some() {
        let node: Node = serde_json::from_value(value)?;
        Ok(Container::new(vec![node]))
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

/// Compile a node tree described as JSON.
pub fn compile_json(json: &str) -> Result<Document> {
    compile(&parse_json(json)?)
}

/// Render a node tree described as JSON to `.docx` bytes.
pub fn render_json(json: &str) -> Result<Vec<u8>> {
    render(&parse_json(json)?)
}
