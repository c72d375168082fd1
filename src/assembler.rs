//! # Document Assembly
//!
//! Walks the top of the node tree: finds the `DOCUMENT` root, turns every
//! `PAGE` into a section (geometry, headers, footers, content) and collects
//! the document-wide options.
//!
//! Headers, footers and page content start with no inherited style. Only
//! the document's `fontFamily` and `language` reach the content, through the
//! document default run properties.

use crate::blocks::render_block_nodes;
use crate::docx::{
    merge_options, DefaultStyles, Document, DocumentDefaults, HeaderFooter, HeaderFooterGroup,
    HeaderFooterSlot, LanguageOptions, Merge, PageMargin, PageSizeAttributes, RunOptions, Section,
    StylesOptions,
};
use crate::error::{DocformError, Result};
use crate::model::{Container, DocumentProps, Node, PageProps, PageSize};
use crate::style::{resolve_padding_edges, resolve_style, Style};
use crate::units::{inches_to_twip, length_to_twip, millimeters_to_twip};

/// Paper dimensions (width, height). ISO sizes are defined in millimeters,
/// US sizes in inches.
#[derive(Debug, Clone, Copy)]
enum Paper {
    Millimeters(f64, f64),
    Inches(f64, f64),
}

impl Paper {
    fn to_twips(self) -> (i64, i64) {
        match self {
            Paper::Millimeters(width, height) => {
                (millimeters_to_twip(width), millimeters_to_twip(height))
            }
            Paper::Inches(width, height) => (inches_to_twip(width), inches_to_twip(height)),
        }
    }
}

const PAGE_PRESETS: &[(&str, Paper)] = &[
    ("A3", Paper::Millimeters(297.0, 420.0)),
    ("A4", Paper::Millimeters(210.0, 297.0)),
    ("A5", Paper::Millimeters(148.0, 210.0)),
    ("LETTER", Paper::Inches(8.5, 11.0)),
    ("LEGAL", Paper::Inches(8.5, 14.0)),
];

const DEFAULT_PAGE_PRESET: &str = "A4";

/// Compile a node tree into a document model.
///
/// Fails only when the container holds no `DOCUMENT` node.
pub fn build_document(container: &Container) -> Result<Document> {
    let (props, children) = container
        .children
        .iter()
        .find_map(|node| match node {
            Node::Document { props, children } => Some((props, children)),
            _ => None,
        })
        .ok_or(DocformError::MissingDocumentRoot)?;

    let document_style = resolve_style(props.style.as_ref());
    let styles = resolve_document_styles(
        document_style.as_ref(),
        props.language.as_deref(),
        props.styles.as_ref(),
    );

    let sections: Vec<Section> = children
        .iter()
        .filter_map(|node| match node {
            Node::Page { props, children } => Some(build_section(props, children)),
            other => {
                log::debug!("Skipping {} node directly under DOCUMENT", other.type_name());
                None
            }
        })
        .collect();

    let needs_even_odd = sections.iter().any(|section| {
        section.headers.contains(HeaderFooterSlot::Even)
            || section.footers.contains(HeaderFooterSlot::Even)
    });

    let document = assemble_document(props, styles, sections, needs_even_odd);
    log::debug!(
        "Assembled document: {} section(s), even/odd headers: {:?}",
        document.sections.len(),
        document.options.even_and_odd_header_and_footers
    );
    Ok(document)
}

fn assemble_document(
    props: &DocumentProps,
    styles: Option<StylesOptions>,
    sections: Vec<Section>,
    needs_even_odd: bool,
) -> Document {
    let mut options = props.docx.clone().unwrap_or_default();
    options.creator = props.creator.clone();
    options.description = props.description.clone();
    options.keywords = props.keywords.as_ref().map(|keywords| keywords.joined());
    options.styles = styles;
    options.subject = props.subject.clone();
    options.title = props.title.clone();
    if options.even_and_odd_header_and_footers.is_none() && needs_even_odd {
        options.even_and_odd_header_and_footers = Some(true);
    }

    Document { options, sections }
}

/// Document-wide style definitions.
///
/// A document `fontFamily` or `language` becomes the default run font and
/// language. User styles are kept; at every level of
/// `default.document.run` the user's keys win over the synthesized ones.
pub fn resolve_document_styles(
    style: Option<&Style>,
    language: Option<&str>,
    styles: Option<&StylesOptions>,
) -> Option<StylesOptions> {
    let font = style.and_then(|s| s.font_family.clone());
    if font.is_none() && language.is_none() {
        return styles.cloned();
    }

    let base_run = RunOptions {
        font,
        language: language.map(|value| LanguageOptions {
            value: Some(value.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };

    let mut resolved = styles.cloned().unwrap_or_default();
    let user_document = resolved
        .default
        .as_ref()
        .and_then(|default| default.document.clone())
        .unwrap_or_default();

    let document = DocumentDefaults {
        run: merge_options(Some(&base_run), user_document.run.as_ref()),
        ..user_document
    };
    let default = resolved.default.take().unwrap_or_default();
    resolved.default = Some(default.merge(&DefaultStyles {
        document: Some(document),
    }));

    Some(resolved)
}

/// Resolve a page size to twips. Presets match case-insensitively; custom
/// sizes need both axes to resolve.
pub fn resolve_page_size(size: Option<&PageSize>) -> Option<PageSizeAttributes> {
    match size? {
        PageSize::Preset(name) => {
            let preset = PAGE_PRESETS
                .iter()
                .find(|(preset, _)| preset.eq_ignore_ascii_case(name.trim()));
            match preset {
                Some((_, paper)) => {
                    let (width, height) = paper.to_twips();
                    Some(PageSizeAttributes {
                        width: Some(width),
                        height: Some(height),
                        ..Default::default()
                    })
                }
                None => {
                    log::debug!("Unknown page size preset '{}'", name);
                    None
                }
            }
        }
        PageSize::Custom(custom) => {
            let width = length_to_twip(Some(&custom.width))?;
            let height = length_to_twip(Some(&custom.height))?;
            Some(PageSizeAttributes {
                width: Some(width),
                height: Some(height),
                orientation: custom.orientation,
                code: custom.code,
            })
        }
    }
}

/// Page margins from the page style's padding, or `None` when no side
/// resolves.
pub fn resolve_page_margins(style: Option<&Style>) -> Option<PageMargin> {
    let padding = resolve_padding_edges(style);
    if padding.is_empty() {
        return None;
    }
    Some(PageMargin {
        top: padding.top,
        bottom: padding.bottom,
        left: padding.left,
        right: padding.right,
        ..Default::default()
    })
}

fn build_section(props: &PageProps, children: &[Node]) -> Section {
    let mut headers = HeaderFooterGroup::default();
    let mut footers = HeaderFooterGroup::default();
    let mut content = Vec::new();

    for child in children {
        match child {
            Node::Header { props, children } => headers.set(
                props.kind.unwrap_or_default(),
                HeaderFooter {
                    children: render_block_nodes(children, None),
                },
            ),
            Node::Footer { props, children } => footers.set(
                props.kind.unwrap_or_default(),
                HeaderFooter {
                    children: render_block_nodes(children, None),
                },
            ),
            other => content.push(other.clone()),
        }
    }

    let page_style = resolve_style(props.style.as_ref());
    let page_overrides = props.properties.as_ref().and_then(|p| p.page.as_ref());
    let size_override = page_overrides.and_then(|page| page.size.as_ref());

    let base_size = resolve_page_size(props.size.as_ref());
    let merged_size = merge_options(base_size.as_ref(), size_override);
    let page_size = match merged_size {
        None if props.size.is_none() => {
            resolve_page_size(Some(&PageSize::Preset(DEFAULT_PAGE_PRESET.to_string())))
        }
        merged => merged,
    };

    let margins = resolve_page_margins(page_style.as_ref());
    let merged_margins = merge_options(margins.as_ref(), page_overrides.and_then(|page| page.margin.as_ref()));

    let mut properties = props.properties.clone().unwrap_or_default();
    if page_size.is_some() || merged_margins.is_some() || page_overrides.is_some() {
        let mut page = page_overrides.cloned().unwrap_or_default();
        if page_size.is_some() {
            page.size = page_size;
        }
        if merged_margins.is_some() {
            page.margin = merged_margins;
        }
        properties.page = Some(page);
    }

    let has_first = headers.contains(HeaderFooterSlot::First) || footers.contains(HeaderFooterSlot::First);
    if properties.title_page.is_none() && has_first {
        properties.title_page = Some(true);
    }

    Section {
        properties,
        headers,
        footers,
        children: render_block_nodes(&content, None),
    }
}
