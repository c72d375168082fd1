//! # Table Compilation
//!
//! `TABLE` → rows → cells. Only `TABLE_ROW` children of a table and
//! `TABLE_CELL` children of a row count; anything else in those positions is
//! dropped. Tables and cells start a fresh style context: they read their own
//! style only, and a cell's style is what its content inherits.
//!
//! For every cell property there is a computed value and a pass-through
//! value from the `docx` prop. The pass-through wins, except for `width`,
//! `columnSpan` and `rowSpan`, where the dedicated node props win.

use crate::blocks::render_block_nodes;
use crate::docx::{
    MarginOptions, ShadingOptions, Table, TableCell, TableCellOptions, TableRow, TableWidth,
};
use crate::model::{Node, TableCellProps, TableProps, TableRowProps};
use crate::style::{
    normalize_borders, resolve_padding_edges, resolve_style, to_alignment, to_vertical_align,
};
use crate::units::{normalize_color, resolve_width};

/// Compile a `TABLE` node. Width defaults to the full text width (100%).
pub fn create_table(props: &TableProps, children: &[Node]) -> Table {
    let style = resolve_style(props.style.as_ref());
    let style = style.as_ref();
    let mut options = props.docx.clone().unwrap_or_default();

    if options.width.is_none() {
        let resolved = style
            .and_then(|s| s.width.as_ref())
            .and_then(|width| resolve_width(Some(width)));
        options.width = Some(resolved.unwrap_or_else(|| TableWidth::percent(100.0)));
    }
    if options.alignment.is_none() {
        options.alignment = Some(to_alignment(style.and_then(|s| s.text_align.as_deref())));
    }

    let rows = children
        .iter()
        .filter_map(|child| match child {
            Node::TableRow { props, children } => Some(create_table_row(props, children)),
            other => {
                log::debug!("Dropping {} node inside TABLE", other.type_name());
                None
            }
        })
        .collect();

    Table { options, rows }
}

fn create_table_row(props: &TableRowProps, children: &[Node]) -> TableRow {
    let cells = children
        .iter()
        .filter_map(|child| match child {
            Node::TableCell { props, children } => Some(create_table_cell(props, children)),
            other => {
                log::debug!("Dropping {} node inside TABLE_ROW", other.type_name());
                None
            }
        })
        .collect();

    TableRow {
        options: props.docx.clone().unwrap_or_default(),
        children: cells,
    }
}

/// Compile a `TABLE_CELL` node.
pub fn create_table_cell(props: &TableCellProps, children: &[Node]) -> TableCell {
    let style = resolve_style(props.style.as_ref());
    let style = style.as_ref();
    let overrides = props.docx.clone().unwrap_or_default();

    let padding = resolve_padding_edges(style);
    let margins = (!padding.is_empty()).then(|| MarginOptions {
        top: Some(padding.top.unwrap_or(0)),
        bottom: Some(padding.bottom.unwrap_or(0)),
        left: Some(padding.left.unwrap_or(0)),
        right: Some(padding.right.unwrap_or(0)),
    });

    let shading = normalize_color(style.and_then(|s| s.background_color.as_deref())).map(|fill| {
        ShadingOptions {
            kind: Some("clear".to_string()),
            color: Some("auto".to_string()),
            fill: Some(fill),
        }
    });

    let width = match &props.width {
        Some(width) => resolve_width(Some(width)),
        None => overrides.width.clone(),
    };

    let options = TableCellOptions {
        width,
        column_span: props.column_span.or(overrides.column_span),
        row_span: props.row_span.or(overrides.row_span),
        borders: overrides.borders.clone().or_else(|| normalize_borders(style)),
        margins: overrides.margins.clone().or(margins),
        shading: overrides.shading.clone().or(shading),
        vertical_align: overrides.vertical_align.or_else(|| {
            Some(to_vertical_align(style.and_then(|s| s.vertical_align.as_deref())))
        }),
    };

    TableCell {
        options,
        children: render_block_nodes(children, style),
    }
}
