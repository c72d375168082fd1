//! # DOCX Writer
//!
//! Serializes a compiled [`Document`] into a WordprocessingML package.
//!
//! ## Package layout
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! docProps/core.xml, docProps/app.xml
//! word/document.xml          <- body, one sectPr per section
//! word/styles.xml            <- docDefaults + named styles
//! word/settings.xml
//! word/headerN.xml, word/footerN.xml
//! word/_rels/*.rels          <- one per part that references others
//! word/media/imageN.ext
//! ```
//!
//! Headers and footers are written before the body so their relationship
//! ids exist by the time a section's `sectPr` references them. Relationship
//! ids, media names and drawing ids are handed out in document order, and
//! ZIP entries carry a fixed timestamp, so the same model always produces
//! the same bytes.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::xml::XmlWriter;
use super::*;
use crate::error::Result;
use crate::image::transparent_png_fallback;
use crate::image_loader::load_image;

const EMU_PER_PIXEL: f64 = 9525.0;

const DEFAULT_PAGE_WIDTH: i64 = 11906;
const DEFAULT_PAGE_HEIGHT: i64 = 16838;
const DEFAULT_PAGE_MARGIN: i64 = 1440;
const DEFAULT_HEADER_FOOTER_MARGIN: i64 = 708;

const DEFAULT_GRID_COLUMN_WIDTH: i64 = 100;
/// Word tables have at most 63 grid columns.
const MAX_GRID_SPAN: usize = 63;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const NS_ASVG: &str = "http://schemas.microsoft.com/office/drawing/2016/SVG/main";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const SVG_BLIP_EXTENSION: &str = "{96DAC541-7B7A-43D3-8B79-37D633B846F1}";

const BODY_NAMESPACES: [(&str, &str); 5] = [
    ("xmlns:w", NS_W),
    ("xmlns:r", NS_R),
    ("xmlns:wp", NS_WP),
    ("xmlns:a", NS_A),
    ("xmlns:pic", NS_PIC),
];

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_SETTINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";
const REL_HEADER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
const REL_FOOTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const CT_SETTINGS: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml";
const CT_HEADER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
const CT_FOOTER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";
const CT_CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_EXTENDED_PROPERTIES: &str =
    "application/vnd.openxmlformats-officedocument.extended-properties+xml";

pub struct DocxWriter;

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write a compiled document to `.docx` bytes.
    pub fn write(&self, document: &Document) -> Result<Vec<u8>> {
        let mut package = Package::default();
        let mut main = PartWriter::new()?;
        main.add_rel(REL_STYLES, "styles.xml");
        main.add_rel(REL_SETTINGS, "settings.xml");

        let mut section_refs = Vec::with_capacity(document.sections.len());
        for section in &document.sections {
            let mut refs = Vec::new();
            for (kind, group) in [
                (HeaderFooterKind::Header, &section.headers),
                (HeaderFooterKind::Footer, &section.footers),
            ] {
                for (slot, content) in group.iter() {
                    let target = package.write_header_footer(kind, content)?;
                    let id = main.add_rel(kind.relationship_type(), &target);
                    refs.push(HeaderFooterRef { kind, slot, id });
                }
            }
            section_refs.push(refs);
        }

        package.write_document(&mut main, document, &section_refs)?;

        log::debug!(
            "Writing package: {} section(s), {} header/footer part(s), {} media file(s)",
            document.sections.len(),
            package.parts.len(),
            package.media.len()
        );

        package.finish(document, main)
    }
}

// ── Parts ──────────────────────────────────────────────────────

struct Relationship {
    id: String,
    kind: &'static str,
    target: String,
}

/// An XML part being written, with the relationships it owns.
struct PartWriter {
    xml: XmlWriter,
    rels: Vec<Relationship>,
}

impl PartWriter {
    fn new() -> Result<Self> {
        Ok(Self {
            xml: XmlWriter::new()?,
            rels: Vec::new(),
        })
    }

    fn add_rel(&mut self, kind: &'static str, target: &str) -> String {
        let id = format!("rId{}", self.rels.len() + 1);
        self.rels.push(Relationship {
            id: id.clone(),
            kind,
            target: target.to_string(),
        });
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderFooterKind {
    Header,
    Footer,
}

impl HeaderFooterKind {
    fn prefix(&self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "header",
            HeaderFooterKind::Footer => "footer",
        }
    }

    fn root_element(&self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "w:hdr",
            HeaderFooterKind::Footer => "w:ftr",
        }
    }

    fn reference_element(&self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "w:headerReference",
            HeaderFooterKind::Footer => "w:footerReference",
        }
    }

    fn relationship_type(&self) -> &'static str {
        match self {
            HeaderFooterKind::Header => REL_HEADER,
            HeaderFooterKind::Footer => REL_FOOTER,
        }
    }

    fn content_type(&self) -> &'static str {
        match self {
            HeaderFooterKind::Header => CT_HEADER,
            HeaderFooterKind::Footer => CT_FOOTER,
        }
    }
}

struct HeaderFooterRef {
    kind: HeaderFooterKind,
    slot: HeaderFooterSlot,
    id: String,
}

/// A finished header or footer part.
struct StoredPart {
    name: String,
    kind: HeaderFooterKind,
    xml: Vec<u8>,
    rels: Vec<Relationship>,
}

struct MediaFile {
    name: String,
    kind: ImageType,
    bytes: Vec<u8>,
}

/// The `sectPr` payload of one section.
struct SectionBreak<'a> {
    properties: &'a SectionProperties,
    references: &'a [HeaderFooterRef],
}

#[derive(Debug, Clone, Copy)]
enum MergeMark {
    Restart,
    Continue,
}

/// A `rowSpan` cell still owed continuation cells in the following rows.
struct VerticalMerge {
    remaining: u32,
    options: TableCellOptions,
}

/// Package-wide state: everything numbered across parts.
#[derive(Default)]
struct Package {
    parts: Vec<StoredPart>,
    media: Vec<MediaFile>,
    header_count: usize,
    footer_count: usize,
    drawing_count: u32,
}

impl Package {
    fn write_header_footer(&mut self, kind: HeaderFooterKind, content: &HeaderFooter) -> Result<String> {
        let number = match kind {
            HeaderFooterKind::Header => {
                self.header_count += 1;
                self.header_count
            }
            HeaderFooterKind::Footer => {
                self.footer_count += 1;
                self.footer_count
            }
        };
        let name = format!("{}{}.xml", kind.prefix(), number);

        let mut part = PartWriter::new()?;
        part.xml.start(kind.root_element(), &BODY_NAMESPACES)?;
        self.write_blocks(&mut part, &content.children)?;
        if !ends_with_paragraph(&content.children) {
            part.xml.empty("w:p", &[])?;
        }
        part.xml.end(kind.root_element())?;

        self.parts.push(StoredPart {
            name: name.clone(),
            kind,
            xml: part.xml.into_bytes(),
            rels: part.rels,
        });
        Ok(name)
    }

    fn write_document(
        &mut self,
        part: &mut PartWriter,
        document: &Document,
        section_refs: &[Vec<HeaderFooterRef>],
    ) -> Result<()> {
        part.xml.start("w:document", &BODY_NAMESPACES)?;
        if let Some(color) = document.options.background.as_ref().and_then(|b| b.color.as_deref()) {
            part.xml.empty("w:background", &[("w:color", hex_color(color))])?;
        }
        part.xml.start("w:body", &[])?;

        let last = document.sections.len().saturating_sub(1);
        for (index, (section, references)) in document.sections.iter().zip(section_refs).enumerate() {
            let section_break = SectionBreak {
                properties: &section.properties,
                references,
            };
            if index == last {
                self.write_blocks(part, &section.children)?;
                write_section_properties(&mut part.xml, &section_break)?;
            } else {
                self.write_blocks_with_break(part, &section.children, &section_break)?;
            }
        }
        if document.sections.is_empty() {
            let properties = SectionProperties::default();
            write_section_properties(
                &mut part.xml,
                &SectionBreak {
                    properties: &properties,
                    references: &[],
                },
            )?;
        }

        part.xml.end("w:body")?;
        part.xml.end("w:document")
    }

    // ── Blocks ─────────────────────────────────────────────────

    fn write_blocks(&mut self, part: &mut PartWriter, blocks: &[Block]) -> Result<()> {
        for block in blocks {
            match block {
                Block::Paragraph(paragraph) => self.write_paragraph(part, paragraph, None)?,
                Block::Table(table) => self.write_table(part, table)?,
            }
        }
        Ok(())
    }

    /// Write a non-final section: its `sectPr` goes into the last
    /// paragraph, or into an extra empty one when the section does not end
    /// with a paragraph.
    fn write_blocks_with_break(
        &mut self,
        part: &mut PartWriter,
        blocks: &[Block],
        section_break: &SectionBreak,
    ) -> Result<()> {
        match blocks.split_last() {
            Some((Block::Paragraph(last), rest)) => {
                self.write_blocks(part, rest)?;
                self.write_paragraph(part, last, Some(section_break))
            }
            _ => {
                self.write_blocks(part, blocks)?;
                self.write_paragraph(part, &Paragraph::default(), Some(section_break))
            }
        }
    }

    fn write_paragraph(
        &mut self,
        part: &mut PartWriter,
        paragraph: &Paragraph,
        section_break: Option<&SectionBreak>,
    ) -> Result<()> {
        part.xml.start("w:p", &[])?;
        if paragraph.options != ParagraphOptions::default() || section_break.is_some() {
            part.xml.start("w:pPr", &[])?;
            write_paragraph_properties(&mut part.xml, &paragraph.options)?;
            if let Some(section_break) = section_break {
                write_section_properties(&mut part.xml, section_break)?;
            }
            part.xml.end("w:pPr")?;
        }
        for child in &paragraph.children {
            match child {
                ParagraphChild::Text(run) => write_text_run(&mut part.xml, run)?,
                ParagraphChild::Image(image) => self.write_image(part, image)?,
            }
        }
        part.xml.end("w:p")
    }

    // ── Tables ─────────────────────────────────────────────────

    fn write_table(&mut self, part: &mut PartWriter, table: &Table) -> Result<()> {
        part.xml.start("w:tbl", &[])?;
        part.xml.start("w:tblPr", &[])?;
        write_table_properties(&mut part.xml, &table.options)?;
        part.xml.end("w:tblPr")?;

        part.xml.start("w:tblGrid", &[])?;
        for width in grid_columns(table) {
            part.xml.empty("w:gridCol", &[("w:w", &width.to_string())])?;
        }
        part.xml.end("w:tblGrid")?;

        let mut merges: Vec<Option<VerticalMerge>> = Vec::new();
        for row in &table.rows {
            self.write_table_row(part, row, &mut merges)?;
        }
        part.xml.end("w:tbl")
    }

    fn write_table_row(
        &mut self,
        part: &mut PartWriter,
        row: &TableRow,
        merges: &mut Vec<Option<VerticalMerge>>,
    ) -> Result<()> {
        part.xml.start("w:tr", &[])?;
        write_row_properties(&mut part.xml, &row.options)?;

        let mut column = 0;
        for cell in &row.children {
            column = write_merge_continuations(&mut part.xml, merges, column)?;
            let span = grid_span(&cell.options);
            let row_span = cell.options.row_span.unwrap_or(1);
            let mark = if row_span > 1 {
                if merges.len() <= column {
                    merges.resize_with(column + 1, || None);
                }
                merges[column] = Some(VerticalMerge {
                    remaining: row_span - 1,
                    options: cell.options.clone(),
                });
                Some(MergeMark::Restart)
            } else {
                None
            };
            self.write_table_cell(part, cell, mark)?;
            column += span;
        }

        // Merges to the right of the last real cell
        while column < merges.len() {
            if merges[column].is_some() {
                column = write_merge_continuations(&mut part.xml, merges, column)?;
            } else {
                column += 1;
            }
        }

        part.xml.end("w:tr")
    }

    fn write_table_cell(&mut self, part: &mut PartWriter, cell: &TableCell, mark: Option<MergeMark>) -> Result<()> {
        part.xml.start("w:tc", &[])?;
        write_cell_properties(&mut part.xml, &cell.options, mark)?;
        self.write_blocks(part, &cell.children)?;
        if !ends_with_paragraph(&cell.children) {
            part.xml.empty("w:p", &[])?;
        }
        part.xml.end("w:tc")
    }

    // ── Images ─────────────────────────────────────────────────

    fn add_media(&mut self, kind: ImageType, bytes: Vec<u8>) -> String {
        let name = format!("image{}.{}", self.media.len() + 1, kind.extension());
        let target = format!("media/{}", name);
        self.media.push(MediaFile { name, kind, bytes });
        target
    }

    fn write_image(&mut self, part: &mut PartWriter, image: &ImageRun) -> Result<()> {
        let bytes = load_image(&image.data, image.kind)?;
        let target = self.add_media(image.kind, bytes);

        let (blip_id, svg_id) = if image.kind == ImageType::Svg {
            let svg_id = part.add_rel(REL_IMAGE, &target);
            let fallback = image.fallback.clone().unwrap_or_else(transparent_png_fallback);
            let fallback_bytes = load_image(&fallback.data, fallback.kind)?;
            let fallback_target = self.add_media(fallback.kind, fallback_bytes);
            (part.add_rel(REL_IMAGE, &fallback_target), Some(svg_id))
        } else {
            (part.add_rel(REL_IMAGE, &target), None)
        };

        self.drawing_count += 1;
        let drawing = Drawing {
            id: self.drawing_count,
            media_name: target.trim_start_matches("media/").to_string(),
            cx: pixels_to_emu(image.transformation.width),
            cy: pixels_to_emu(image.transformation.height),
            blip_id,
            svg_id,
        };
        write_drawing(&mut part.xml, image, &drawing)
    }

    // ── Package ────────────────────────────────────────────────

    fn finish(self, document: &Document, main: PartWriter) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        add_file(&mut zip, "[Content_Types].xml", &self.content_types_xml()?)?;
        add_file(&mut zip, "_rels/.rels", &package_relationships_xml()?)?;
        add_file(&mut zip, "docProps/core.xml", &core_properties_xml(&document.options)?)?;
        add_file(&mut zip, "docProps/app.xml", &app_properties_xml()?)?;
        add_file(&mut zip, "word/document.xml", &main.xml.into_bytes())?;
        add_file(
            &mut zip,
            "word/styles.xml",
            &styles_xml(document.options.styles.as_ref())?,
        )?;
        add_file(&mut zip, "word/settings.xml", &settings_xml(&document.options)?)?;
        add_file(&mut zip, "word/_rels/document.xml.rels", &relationships_xml(&main.rels)?)?;

        for part in &self.parts {
            add_file(&mut zip, &format!("word/{}", part.name), &part.xml)?;
            if !part.rels.is_empty() {
                add_file(
                    &mut zip,
                    &format!("word/_rels/{}.rels", part.name),
                    &relationships_xml(&part.rels)?,
                )?;
            }
        }
        for media in &self.media {
            add_file(&mut zip, &format!("word/media/{}", media.name), &media.bytes)?;
        }

        Ok(zip.finish()?.into_inner())
    }

    fn content_types_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlWriter::new()?;
        xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
        xml.empty("Default", &[("Extension", "rels"), ("ContentType", CT_RELATIONSHIPS)])?;
        xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;

        let mut kinds: Vec<ImageType> = Vec::new();
        for media in &self.media {
            if !kinds.contains(&media.kind) {
                kinds.push(media.kind);
            }
        }
        for kind in kinds {
            xml.empty(
                "Default",
                &[("Extension", kind.extension()), ("ContentType", kind.content_type())],
            )?;
        }

        let mut overrides = vec![
            ("/word/document.xml".to_string(), CT_DOCUMENT),
            ("/word/styles.xml".to_string(), CT_STYLES),
            ("/word/settings.xml".to_string(), CT_SETTINGS),
        ];
        for part in &self.parts {
            overrides.push((format!("/word/{}", part.name), part.kind.content_type()));
        }
        overrides.push(("/docProps/core.xml".to_string(), CT_CORE_PROPERTIES));
        overrides.push(("/docProps/app.xml".to_string(), CT_EXTENDED_PROPERTIES));
        for (name, content_type) in &overrides {
            xml.empty("Override", &[("PartName", name), ("ContentType", content_type)])?;
        }

        xml.end("Types")?;
        Ok(xml.into_bytes())
    }
}

fn file_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
}

fn add_file(zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, bytes: &[u8]) -> Result<()> {
    zip.start_file(name, file_options())?;
    zip.write_all(bytes)?;
    Ok(())
}

fn ends_with_paragraph(blocks: &[Block]) -> bool {
    matches!(blocks.last(), Some(Block::Paragraph(_)))
}

/// Colors are written as bare hex (`FF0000`) or `auto`.
fn hex_color(color: &str) -> &str {
    color.trim_start_matches('#')
}

fn pixels_to_emu(pixels: f64) -> i64 {
    (pixels * EMU_PER_PIXEL).round() as i64
}

// ── Properties ─────────────────────────────────────────────────

fn write_paragraph_properties(xml: &mut XmlWriter, options: &ParagraphOptions) -> Result<()> {
    if let Some(style) = options.style.as_deref().or(options.heading.as_deref()) {
        xml.val("w:pStyle", style)?;
    }
    xml.toggle("w:keepNext", options.keep_next)?;
    xml.toggle("w:keepLines", options.keep_lines)?;
    xml.toggle("w:pageBreakBefore", options.page_break_before)?;
    xml.toggle("w:widowControl", options.widow_control)?;
    if options.thematic_break == Some(true) {
        xml.start("w:pBdr", &[])?;
        xml.empty(
            "w:bottom",
            &[("w:val", "single"), ("w:sz", "6"), ("w:space", "1"), ("w:color", "auto")],
        )?;
        xml.end("w:pBdr")?;
    }
    xml.toggle("w:bidi", options.bidirectional)?;

    if let Some(spacing) = &options.spacing {
        let before = spacing.before.map(|v| v.to_string());
        let after = spacing.after.map(|v| v.to_string());
        let line = spacing.line.map(|v| v.to_string());
        let attrs: Vec<(&str, &str)> = [
            ("w:before", before.as_deref()),
            ("w:after", after.as_deref()),
            ("w:line", line.as_deref()),
            ("w:lineRule", spacing.line_rule.map(|rule| rule.as_str())),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect();
        xml.empty("w:spacing", &attrs)?;
    }

    if let Some(indent) = &options.indent {
        let values = [
            ("w:left", indent.left),
            ("w:right", indent.right),
            ("w:firstLine", indent.first_line),
            ("w:hanging", indent.hanging),
        ]
        .map(|(name, value)| (name, value.map(|v| v.to_string())));
        let attrs: Vec<(&str, &str)> = values
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (*name, v)))
            .collect();
        xml.empty("w:ind", &attrs)?;
    }

    if let Some(alignment) = options.alignment {
        xml.val("w:jc", alignment.as_str())?;
    }
    if let Some(level) = options.outline_level {
        xml.val("w:outlineLvl", &level.to_string())?;
    }
    Ok(())
}

fn write_run_properties(xml: &mut XmlWriter, run: &RunOptions) -> Result<()> {
    if let Some(style) = &run.style {
        xml.val("w:rStyle", style)?;
    }
    if let Some(font) = &run.font {
        xml.empty(
            "w:rFonts",
            &[("w:ascii", font), ("w:hAnsi", font), ("w:eastAsia", font), ("w:cs", font)],
        )?;
    }
    xml.toggle("w:b", run.bold)?;
    xml.toggle("w:bCs", run.bold)?;
    xml.toggle("w:i", run.italics)?;
    xml.toggle("w:iCs", run.italics)?;
    xml.toggle("w:caps", run.all_caps)?;
    xml.toggle("w:smallCaps", run.small_caps)?;
    xml.toggle("w:strike", run.strike)?;
    xml.toggle("w:dstrike", run.double_strike)?;
    xml.toggle("w:vanish", run.vanish)?;
    if let Some(color) = &run.color {
        xml.val("w:color", hex_color(color))?;
    }
    if let Some(spacing) = run.character_spacing {
        xml.val("w:spacing", &spacing.to_string())?;
    }
    if let Some(size) = run.size {
        let size = size.to_string();
        xml.val("w:sz", &size)?;
        xml.val("w:szCs", &size)?;
    }
    if let Some(highlight) = &run.highlight {
        xml.val("w:highlight", highlight)?;
    }
    if let Some(underline) = &run.underline {
        let kind = underline.kind.as_deref().unwrap_or("single");
        match &underline.color {
            Some(color) => xml.empty("w:u", &[("w:val", kind), ("w:color", hex_color(color))])?,
            None => xml.val("w:u", kind)?,
        }
    }
    if run.super_script == Some(true) {
        xml.val("w:vertAlign", "superscript")?;
    } else if run.sub_script == Some(true) {
        xml.val("w:vertAlign", "subscript")?;
    }
    xml.toggle("w:rtl", run.right_to_left)?;
    if let Some(language) = &run.language {
        let attrs: Vec<(&str, &str)> = [
            ("w:val", language.value.as_deref()),
            ("w:eastAsia", language.east_asia.as_deref()),
            ("w:bidi", language.bidirectional.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect();
        xml.empty("w:lang", &attrs)?;
    }
    Ok(())
}

fn write_text_run(xml: &mut XmlWriter, run: &TextRun) -> Result<()> {
    xml.start("w:r", &[])?;
    if run.options != RunOptions::default() {
        xml.start("w:rPr", &[])?;
        write_run_properties(xml, &run.options)?;
        xml.end("w:rPr")?;
    }
    for _ in 0..run.break_count.unwrap_or(0) {
        xml.empty("w:br", &[])?;
    }
    if let Some(text) = &run.text {
        xml.text_element("w:t", &[("xml:space", "preserve")], text)?;
    }
    xml.end("w:r")
}

fn write_section_properties(xml: &mut XmlWriter, section: &SectionBreak) -> Result<()> {
    let properties = section.properties;
    xml.start("w:sectPr", &[])?;
    for reference in section.references {
        xml.empty(
            reference.kind.reference_element(),
            &[("w:type", reference.slot.as_str()), ("r:id", &reference.id)],
        )?;
    }
    if let Some(kind) = properties.kind {
        xml.val("w:type", kind.as_str())?;
    }

    let page = properties.page.as_ref();
    let size = page.and_then(|p| p.size.as_ref());
    let width = size.and_then(|s| s.width).unwrap_or(DEFAULT_PAGE_WIDTH);
    let height = size.and_then(|s| s.height).unwrap_or(DEFAULT_PAGE_HEIGHT);
    let orientation = size.and_then(|s| s.orientation);
    let (width, height) = match orientation {
        Some(PageOrientation::Landscape) => (height, width),
        _ => (width, height),
    };
    let (width, height) = (width.to_string(), height.to_string());
    let code = size.and_then(|s| s.code).map(|c| c.to_string());
    let mut attrs = vec![("w:w", width.as_str()), ("w:h", height.as_str())];
    if let Some(orientation) = orientation {
        attrs.push(("w:orient", orientation.as_str()));
    }
    if let Some(code) = &code {
        attrs.push(("w:code", code.as_str()));
    }
    xml.empty("w:pgSz", &attrs)?;

    let margin = page.and_then(|p| p.margin.clone()).unwrap_or_default();
    let margins = [
        ("w:top", margin.top.unwrap_or(DEFAULT_PAGE_MARGIN)),
        ("w:right", margin.right.unwrap_or(DEFAULT_PAGE_MARGIN)),
        ("w:bottom", margin.bottom.unwrap_or(DEFAULT_PAGE_MARGIN)),
        ("w:left", margin.left.unwrap_or(DEFAULT_PAGE_MARGIN)),
        ("w:header", margin.header.unwrap_or(DEFAULT_HEADER_FOOTER_MARGIN)),
        ("w:footer", margin.footer.unwrap_or(DEFAULT_HEADER_FOOTER_MARGIN)),
        ("w:gutter", margin.gutter.unwrap_or(0)),
    ]
    .map(|(name, value)| (name, value.to_string()));
    let attrs: Vec<(&str, &str)> = margins.iter().map(|(name, value)| (*name, value.as_str())).collect();
    xml.empty("w:pgMar", &attrs)?;

    if let Some(start) = page.and_then(|p| p.page_numbers.as_ref()).and_then(|n| n.start) {
        xml.empty("w:pgNumType", &[("w:start", &start.to_string())])?;
    }
    if properties.title_page == Some(true) {
        xml.empty("w:titlePg", &[])?;
    }
    xml.end("w:sectPr")
}

// ── Table properties ───────────────────────────────────────────

/// `w:w` for a width: `pct` sizes are fiftieths of a percent.
fn width_value(width: &TableWidth) -> String {
    match width.kind {
        WidthType::Pct => ((width.size * 50.0).round() as i64).to_string(),
        _ => (width.size.round() as i64).to_string(),
    }
}

fn write_width(xml: &mut XmlWriter, name: &str, width: &TableWidth) -> Result<()> {
    xml.empty(name, &[("w:w", &width_value(width)), ("w:type", width.kind.as_str())])
}

fn write_border(xml: &mut XmlWriter, name: &str, border: &BorderOptions) -> Result<()> {
    let size = border.size.map(|s| (s.round() as i64).to_string());
    let space = border.space.map(|s| s.to_string());
    let attrs: Vec<(&str, &str)> = [
        ("w:val", Some(border.style.as_str())),
        ("w:sz", size.as_deref()),
        ("w:space", space.as_deref()),
        ("w:color", border.color.as_deref().map(hex_color)),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|v| (name, v)))
    .collect();
    xml.empty(name, &attrs)
}

fn write_borders(xml: &mut XmlWriter, name: &str, borders: &BordersOptions) -> Result<()> {
    xml.start(name, &[])?;
    for (side, border) in [
        ("w:top", &borders.top),
        ("w:left", &borders.left),
        ("w:bottom", &borders.bottom),
        ("w:right", &borders.right),
        ("w:insideH", &borders.inside_horizontal),
        ("w:insideV", &borders.inside_vertical),
    ] {
        if let Some(border) = border {
            write_border(xml, side, border)?;
        }
    }
    xml.end(name)
}

fn write_cell_margins(xml: &mut XmlWriter, name: &str, margins: &MarginOptions) -> Result<()> {
    xml.start(name, &[])?;
    for (side, value) in [
        ("w:top", margins.top),
        ("w:left", margins.left),
        ("w:bottom", margins.bottom),
        ("w:right", margins.right),
    ] {
        if let Some(value) = value {
            xml.empty(side, &[("w:w", &value.to_string()), ("w:type", "dxa")])?;
        }
    }
    xml.end(name)
}

fn write_table_properties(xml: &mut XmlWriter, options: &TableOptions) -> Result<()> {
    if let Some(style) = &options.style {
        xml.val("w:tblStyle", style)?;
    }
    if let Some(width) = &options.width {
        write_width(xml, "w:tblW", width)?;
    }
    if let Some(alignment) = options.alignment {
        xml.val("w:jc", alignment.as_str())?;
    }
    if let Some(indent) = &options.indent {
        write_width(xml, "w:tblInd", indent)?;
    }
    if let Some(borders) = &options.borders {
        write_borders(xml, "w:tblBorders", borders)?;
    }
    if let Some(layout) = options.layout {
        xml.empty("w:tblLayout", &[("w:type", layout.as_str())])?;
    }
    if let Some(margins) = &options.margins {
        write_cell_margins(xml, "w:tblCellMar", margins)?;
    }
    Ok(())
}

fn write_row_properties(xml: &mut XmlWriter, options: &TableRowOptions) -> Result<()> {
    if *options == TableRowOptions::default() {
        return Ok(());
    }
    xml.start("w:trPr", &[])?;
    xml.toggle("w:cantSplit", options.cant_split)?;
    if let Some(height) = &options.height {
        let value = height.value.to_string();
        match height.rule {
            Some(rule) => xml.empty("w:trHeight", &[("w:val", &value), ("w:hRule", rule.as_str())])?,
            None => xml.val("w:trHeight", &value)?,
        }
    }
    xml.toggle("w:tblHeader", options.table_header)?;
    xml.end("w:trPr")
}

fn write_cell_properties(xml: &mut XmlWriter, options: &TableCellOptions, mark: Option<MergeMark>) -> Result<()> {
    xml.start("w:tcPr", &[])?;
    if let Some(width) = &options.width {
        write_width(xml, "w:tcW", width)?;
    }
    let span = grid_span(options);
    if span > 1 {
        xml.val("w:gridSpan", &span.to_string())?;
    }
    match mark {
        Some(MergeMark::Restart) => xml.val("w:vMerge", "restart")?,
        Some(MergeMark::Continue) => xml.empty("w:vMerge", &[])?,
        None => {}
    }
    if let Some(borders) = &options.borders {
        write_borders(xml, "w:tcBorders", borders)?;
    }
    if let Some(shading) = &options.shading {
        let attrs: Vec<(&str, &str)> = [
            ("w:val", Some(shading.kind.as_deref().unwrap_or("clear"))),
            ("w:color", shading.color.as_deref().map(hex_color)),
            ("w:fill", shading.fill.as_deref().map(hex_color)),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect();
        xml.empty("w:shd", &attrs)?;
    }
    if let Some(margins) = &options.margins {
        write_cell_margins(xml, "w:tcMar", margins)?;
    }
    if let Some(align) = options.vertical_align {
        xml.val("w:vAlign", align.as_str())?;
    }
    xml.end("w:tcPr")
}

fn grid_span(options: &TableCellOptions) -> usize {
    (options.column_span.unwrap_or(1) as usize).clamp(1, MAX_GRID_SPAN)
}

/// Explicit column widths, or one default-width column per grid column of
/// the widest row.
fn grid_columns(table: &Table) -> Vec<i64> {
    if let Some(widths) = table.options.column_widths.as_ref().filter(|w| !w.is_empty()) {
        return widths.clone();
    }
    let count = table
        .rows
        .iter()
        .map(|row| row.children.iter().map(|cell| grid_span(&cell.options)).sum::<usize>())
        .max()
        .unwrap_or(0);
    vec![DEFAULT_GRID_COLUMN_WIDTH; count]
}

/// Emit the continuation cells owed at `column` and return the column
/// after them.
fn write_merge_continuations(
    xml: &mut XmlWriter,
    merges: &mut [Option<VerticalMerge>],
    mut column: usize,
) -> Result<usize> {
    while let Some(Some(merge)) = merges.get_mut(column) {
        xml.start("w:tc", &[])?;
        write_cell_properties(xml, &merge.options, Some(MergeMark::Continue))?;
        xml.empty("w:p", &[])?;
        xml.end("w:tc")?;

        let span = grid_span(&merge.options);
        merge.remaining -= 1;
        if merge.remaining == 0 {
            merges[column] = None;
        }
        column += span;
    }
    Ok(column)
}

// ── Drawings ───────────────────────────────────────────────────

struct Drawing {
    id: u32,
    media_name: String,
    cx: i64,
    cy: i64,
    blip_id: String,
    svg_id: Option<String>,
}

fn write_drawing(xml: &mut XmlWriter, image: &ImageRun, drawing: &Drawing) -> Result<()> {
    let cx = drawing.cx.to_string();
    let cy = drawing.cy.to_string();
    let distances = [("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")];

    xml.start("w:r", &[])?;
    xml.start("w:drawing", &[])?;

    let container = match &image.floating {
        Some(floating) => {
            let relative_height = floating.z_index.unwrap_or(0).max(0).to_string();
            let flag = |value: bool| if value { "1" } else { "0" };
            let mut attrs = distances.to_vec();
            attrs.extend([
                ("simplePos", "0"),
                ("relativeHeight", relative_height.as_str()),
                ("behindDoc", flag(floating.behind_document == Some(true))),
                ("locked", flag(floating.lock_anchor == Some(true))),
                ("layoutInCell", flag(floating.layout_in_cell != Some(false))),
                ("allowOverlap", flag(floating.allow_overlap != Some(false))),
            ]);
            xml.start("wp:anchor", &attrs)?;
            xml.empty("wp:simplePos", &[("x", "0"), ("y", "0")])?;

            let horizontal = &floating.horizontal_position;
            write_position(
                xml,
                "wp:positionH",
                horizontal.relative.map_or("column", |r| r.as_str()),
                horizontal.align.map(|a| a.as_str()),
                horizontal.offset,
            )?;
            let vertical = &floating.vertical_position;
            write_position(
                xml,
                "wp:positionV",
                vertical.relative.map_or("paragraph", |r| r.as_str()),
                vertical.align.map(|a| a.as_str()),
                vertical.offset,
            )?;
            xml.empty("wp:extent", &[("cx", &cx), ("cy", &cy)])?;
            xml.empty("wp:effectExtent", &[("l", "0"), ("t", "0"), ("r", "0"), ("b", "0")])?;
            xml.empty("wp:wrapNone", &[])?;
            "wp:anchor"
        }
        None => {
            xml.start("wp:inline", &distances)?;
            xml.empty("wp:extent", &[("cx", &cx), ("cy", &cy)])?;
            xml.empty("wp:effectExtent", &[("l", "0"), ("t", "0"), ("r", "0"), ("b", "0")])?;
            "wp:inline"
        }
    };

    let id = drawing.id.to_string();
    let default_name = format!("Picture {}", drawing.id);
    let alt_text = image.alt_text.as_ref();
    let name = alt_text
        .map(|alt| alt.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(default_name.as_str());
    let mut doc_pr = vec![("id", id.as_str()), ("name", name)];
    if let Some(alt) = alt_text {
        if !alt.description.is_empty() {
            doc_pr.push(("descr", alt.description.as_str()));
        }
        if !alt.title.is_empty() {
            doc_pr.push(("title", alt.title.as_str()));
        }
    }
    xml.empty("wp:docPr", &doc_pr)?;

    xml.start("wp:cNvGraphicFramePr", &[])?;
    xml.empty("a:graphicFrameLocks", &[("noChangeAspect", "1")])?;
    xml.end("wp:cNvGraphicFramePr")?;

    xml.start("a:graphic", &[])?;
    xml.start("a:graphicData", &[("uri", NS_PIC)])?;
    xml.start("pic:pic", &[])?;

    xml.start("pic:nvPicPr", &[])?;
    xml.empty("pic:cNvPr", &[("id", "0"), ("name", &drawing.media_name)])?;
    xml.empty("pic:cNvPicPr", &[])?;
    xml.end("pic:nvPicPr")?;

    xml.start("pic:blipFill", &[])?;
    match &drawing.svg_id {
        Some(svg_id) => {
            xml.start("a:blip", &[("r:embed", &drawing.blip_id)])?;
            xml.start("a:extLst", &[])?;
            xml.start("a:ext", &[("uri", SVG_BLIP_EXTENSION)])?;
            xml.empty("asvg:svgBlip", &[("xmlns:asvg", NS_ASVG), ("r:embed", svg_id)])?;
            xml.end("a:ext")?;
            xml.end("a:extLst")?;
            xml.end("a:blip")?;
        }
        None => xml.empty("a:blip", &[("r:embed", &drawing.blip_id)])?,
    }
    xml.empty("a:srcRect", &[])?;
    xml.start("a:stretch", &[])?;
    xml.empty("a:fillRect", &[])?;
    xml.end("a:stretch")?;
    xml.end("pic:blipFill")?;

    xml.start("pic:spPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:ext", &[("cx", &cx), ("cy", &cy)])?;
    xml.end("a:xfrm")?;
    xml.start("a:prstGeom", &[("prst", "rect")])?;
    xml.empty("a:avLst", &[])?;
    xml.end("a:prstGeom")?;
    xml.end("pic:spPr")?;

    xml.end("pic:pic")?;
    xml.end("a:graphicData")?;
    xml.end("a:graphic")?;

    xml.end(container)?;
    xml.end("w:drawing")?;
    xml.end("w:r")
}

/// `align` wins over `posOffset`; with neither the offset is 0.
fn write_position(
    xml: &mut XmlWriter,
    name: &str,
    relative: &str,
    align: Option<&str>,
    offset: Option<i64>,
) -> Result<()> {
    xml.start(name, &[("relativeFrom", relative)])?;
    match align {
        Some(align) => xml.text_element("wp:align", &[], align)?,
        None => xml.text_element("wp:posOffset", &[], &offset.unwrap_or(0).to_string())?,
    }
    xml.end(name)
}

// ── Package-level parts ────────────────────────────────────────

fn relationships_xml(rels: &[Relationship]) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;
    xml.start("Relationships", &[("xmlns", NS_RELS)])?;
    for rel in rels {
        xml.empty(
            "Relationship",
            &[("Id", &rel.id), ("Type", rel.kind), ("Target", &rel.target)],
        )?;
    }
    xml.end("Relationships")?;
    Ok(xml.into_bytes())
}

fn package_relationships_xml() -> Result<Vec<u8>> {
    let rels = [
        (REL_OFFICE_DOCUMENT, "word/document.xml"),
        (REL_CORE_PROPERTIES, "docProps/core.xml"),
        (REL_EXTENDED_PROPERTIES, "docProps/app.xml"),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (kind, target))| Relationship {
        id: format!("rId{}", index + 1),
        kind,
        target: target.to_string(),
    })
    .collect::<Vec<_>>();
    relationships_xml(&rels)
}

fn core_properties_xml(options: &DocumentOptions) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            ("xmlns:cp", "http://schemas.openxmlformats.org/package/2006/metadata/core-properties"),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    let fields = [
        ("dc:title", &options.title),
        ("dc:subject", &options.subject),
        ("dc:creator", &options.creator),
        ("cp:keywords", &options.keywords),
        ("dc:description", &options.description),
        ("cp:lastModifiedBy", &options.last_modified_by),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            xml.text_element(name, &[], value)?;
        }
    }
    xml.text_element("cp:revision", &[], &options.revision.unwrap_or(1).to_string())?;
    xml.end("cp:coreProperties")?;
    Ok(xml.into_bytes())
}

fn app_properties_xml() -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;
    xml.start(
        "Properties",
        &[("xmlns", "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties")],
    )?;
    xml.text_element("Application", &[], "docform")?;
    xml.end("Properties")?;
    Ok(xml.into_bytes())
}

fn settings_xml(options: &DocumentOptions) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;
    xml.start("w:settings", &[("xmlns:w", NS_W)])?;
    if options.background.is_some() {
        xml.empty("w:displayBackgroundShape", &[])?;
    }
    if options.even_and_odd_header_and_footers == Some(true) {
        xml.empty("w:evenAndOddHeaders", &[])?;
    }
    if options.features.as_ref().and_then(|f| f.update_fields) == Some(true) {
        xml.val("w:updateFields", "true")?;
    }
    xml.start("w:compat", &[])?;
    xml.empty(
        "w:compatSetting",
        &[
            ("w:name", "compatibilityMode"),
            ("w:uri", "http://schemas.microsoft.com/office/word"),
            ("w:val", "15"),
        ],
    )?;
    xml.end("w:compat")?;
    xml.end("w:settings")?;
    Ok(xml.into_bytes())
}

// ── Styles ─────────────────────────────────────────────────────

/// `Normal`, `Title` and `Heading1`..`Heading6`, so `heading` paragraph
/// options resolve to something. User definitions with the same id replace
/// them.
fn builtin_paragraph_styles() -> Vec<StyleDefinition> {
    let mut styles = vec![StyleDefinition {
        id: "Normal".to_string(),
        name: Some("Normal".to_string()),
        quick_format: Some(true),
        ..Default::default()
    }];
    let headings = [
        ("Title", "Title", 56, None),
        ("Heading1", "heading 1", 32, Some(0)),
        ("Heading2", "heading 2", 26, Some(1)),
        ("Heading3", "heading 3", 24, Some(2)),
        ("Heading4", "heading 4", 22, Some(3)),
        ("Heading5", "heading 5", 22, Some(4)),
        ("Heading6", "heading 6", 22, Some(5)),
    ];
    for (id, name, size, outline_level) in headings {
        styles.push(StyleDefinition {
            id: id.to_string(),
            name: Some(name.to_string()),
            based_on: Some("Normal".to_string()),
            next: Some("Normal".to_string()),
            quick_format: Some(true),
            run: Some(RunOptions {
                bold: outline_level.map(|_| true),
                size: Some(size),
                ..Default::default()
            }),
            paragraph: Some(ParagraphOptions {
                keep_next: Some(true),
                keep_lines: Some(true),
                outline_level,
                spacing: Some(SpacingOptions {
                    before: Some(240),
                    after: Some(120),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        });
    }
    styles
}

fn write_style_definition(xml: &mut XmlWriter, kind: &str, style: &StyleDefinition) -> Result<()> {
    let mut attrs = vec![("w:type", kind), ("w:styleId", style.id.as_str())];
    if style.id == "Normal" {
        attrs.push(("w:default", "1"));
    }
    xml.start("w:style", &attrs)?;
    xml.val("w:name", style.name.as_deref().unwrap_or(style.id.as_str()))?;
    if let Some(based_on) = &style.based_on {
        xml.val("w:basedOn", based_on)?;
    }
    if let Some(next) = &style.next {
        xml.val("w:next", next)?;
    }
    if style.quick_format == Some(true) {
        xml.empty("w:qFormat", &[])?;
    }
    if let Some(paragraph) = &style.paragraph {
        xml.start("w:pPr", &[])?;
        write_paragraph_properties(xml, paragraph)?;
        xml.end("w:pPr")?;
    }
    if let Some(run) = &style.run {
        xml.start("w:rPr", &[])?;
        write_run_properties(xml, run)?;
        xml.end("w:rPr")?;
    }
    xml.end("w:style")
}

fn styles_xml(styles: Option<&StylesOptions>) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;
    xml.start("w:styles", &[("xmlns:w", NS_W)])?;

    let defaults = styles
        .and_then(|s| s.default.as_ref())
        .and_then(|d| d.document.as_ref());
    xml.start("w:docDefaults", &[])?;
    xml.start("w:rPrDefault", &[])?;
    xml.start("w:rPr", &[])?;
    if let Some(run) = defaults.and_then(|d| d.run.as_ref()) {
        write_run_properties(&mut xml, run)?;
    }
    xml.end("w:rPr")?;
    xml.end("w:rPrDefault")?;
    xml.start("w:pPrDefault", &[])?;
    xml.start("w:pPr", &[])?;
    if let Some(paragraph) = defaults.and_then(|d| d.paragraph.as_ref()) {
        write_paragraph_properties(&mut xml, paragraph)?;
    }
    xml.end("w:pPr")?;
    xml.end("w:pPrDefault")?;
    xml.end("w:docDefaults")?;

    let paragraph_styles = styles.map(|s| s.paragraph_styles.as_slice()).unwrap_or_default();
    let character_styles = styles.map(|s| s.character_styles.as_slice()).unwrap_or_default();
    for builtin in builtin_paragraph_styles() {
        if !paragraph_styles.iter().any(|style| style.id == builtin.id) {
            write_style_definition(&mut xml, "paragraph", &builtin)?;
        }
    }
    for style in paragraph_styles {
        write_style_definition(&mut xml, "paragraph", style)?;
    }
    for style in character_styles {
        write_style_definition(&mut xml, "character", style)?;
    }

    xml.end("w:styles")?;
    Ok(xml.into_bytes())
}
