//! Integration tests for the docform pipeline.
//!
//! These tests exercise the full path from a node tree (built in Rust or
//! parsed from JSON) to the compiled document model and the `.docx` package.
//! They verify:
//! - JSON node trees deserialize and compile
//! - Styles cascade through views, spans, tables and pages
//! - Pages become sections with the right geometry, headers and footers
//! - The written package is a valid ZIP with the expected parts and content

use std::io::{Cursor, Read};

use docform::docx::*;
use docform::model::*;
use docform::style::Style;
use docform::DocformError;

// ─── Helpers ────────────────────────────────────────────────────

fn style(json: &str) -> Style {
    serde_json::from_str(json).unwrap()
}

fn make_doc(pages: Vec<Node>) -> Container {
    Container::new(vec![Node::document(DocumentProps::default(), pages)])
}

fn make_page(children: Vec<Node>) -> Node {
    Node::page(Style::default(), children)
}

fn compile(container: &Container) -> Document {
    docform::compile(container).unwrap()
}

fn first_section_blocks(document: &Document) -> &[Block] {
    &document.sections[0].children
}

fn paragraph(block: &Block) -> &Paragraph {
    match block {
        Block::Paragraph(paragraph) => paragraph,
        other => panic!("expected a paragraph, got {:?}", other),
    }
}

fn text_runs(paragraph: &Paragraph) -> Vec<&TextRun> {
    paragraph
        .children
        .iter()
        .filter_map(|child| match child {
            ParagraphChild::Text(run) => Some(run),
            ParagraphChild::Image(_) => None,
        })
        .collect()
}

fn read_part(docx: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    content
}

fn part_names(docx: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    archive.file_names().map(str::to_string).collect()
}

fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |_, _| image::Rgba([0, 128, 255, 255]));
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(encoder, img.as_raw(), width, height, image::ColorType::Rgba8)
        .unwrap();
    buf
}

fn jpeg_fixture() -> Vec<u8> {
    let img = image::RgbImage::from_fn(2, 2, |_, _| image::Rgb([200, 10, 10]));
    let mut buf = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new(&mut buf);
    image::ImageEncoder::write_image(encoder, img.as_raw(), 2, 2, image::ColorType::Rgb8).unwrap();
    buf
}

// ─── Basic Pipeline Tests ───────────────────────────────────────

#[test]
fn test_missing_document_root() {
    let container = Container::new(vec![make_page(vec![])]);
    let err = docform::compile(&container).unwrap_err();
    assert!(matches!(err, DocformError::MissingDocumentRoot));
    assert_eq!(err.to_string(), "Document root is missing.");
}

#[test]
fn test_single_styled_text_renders() {
    let container = make_doc(vec![make_page(vec![Node::text(
        "Hello docform",
        style(r##"{ "fontSize": 14, "color": "#336699", "fontWeight": "bold" }"##),
    )])]);
    let bytes = docform::render(&container).unwrap();
    assert!(!bytes.is_empty());
    assert!(bytes.starts_with(b"PK"));

    let body = read_part(&bytes, "word/document.xml");
    assert!(body.contains("Hello docform"));
    assert!(body.contains(r#"<w:color w:val="336699"/>"#));
    assert!(body.contains(r#"<w:sz w:val="28"/>"#));
}

#[test]
fn test_default_page_is_a4() {
    let document = compile(&make_doc(vec![make_page(vec![])]));
    let size = document.sections[0]
        .properties
        .page
        .as_ref()
        .and_then(|page| page.size.clone())
        .unwrap();
    assert_eq!(size.width, Some(11905));
    assert_eq!(size.height, Some(16837));
}

#[test]
fn test_compilation_is_deterministic() {
    let container = make_doc(vec![make_page(vec![
        Node::text("one\ntwo", style(r#"{ "fontSize": 12, "lineHeight": 1.5 }"#)),
        Node::table(
            Style::default(),
            vec![Node::table_row(vec![Node::table_cell(
                style(r#"{ "padding": 4 }"#),
                vec![Node::text_instance("cell")],
            )])],
        ),
    ])]);
    assert_eq!(compile(&container), compile(&container));
    assert_eq!(
        docform::render(&container).unwrap(),
        docform::render(&container).unwrap()
    );
}

// ─── Text Tests ─────────────────────────────────────────────────

#[test]
fn test_newlines_become_breaks() {
    let document = compile(&make_doc(vec![make_page(vec![Node::text(
        "a\nb\nc",
        style(r#"{ "fontStyle": "italic" }"#),
    )])]));
    let runs = text_runs(paragraph(&first_section_blocks(&document)[0]));
    assert_eq!(runs.len(), 5);
    assert_eq!(runs[0].text.as_deref(), Some("a"));
    assert_eq!(runs[1].break_count, Some(1));
    assert_eq!(runs[2].text.as_deref(), Some("b"));
    assert_eq!(runs[4].options.italics, Some(true));
}

#[test]
fn test_nested_spans_cascade() {
    let document = compile(&make_doc(vec![make_page(vec![Node::span(
        style(r#"{ "fontSize": 10, "color": "red" }"#),
        vec![
            Node::text_instance("plain "),
            Node::span(
                style(r#"{ "fontWeight": 700, "textDecoration": "underline line-through" }"#),
                vec![Node::text_instance("loud")],
            ),
        ],
    )])]));
    let runs = text_runs(paragraph(&first_section_blocks(&document)[0]));
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].options.bold, Some(false));
    assert_eq!(runs[1].options.bold, Some(true));
    assert_eq!(runs[1].options.size, Some(20));
    assert_eq!(runs[1].options.color.as_deref(), Some("red"));
    assert_eq!(runs[1].options.strike, Some(true));
    assert!(runs[1].options.underline.is_some());
}

#[test]
fn test_line_height_in_document() {
    let document = compile(&make_doc(vec![make_page(vec![
        Node::text("multiplier", style(r#"{ "fontSize": 12, "lineHeight": 1.5 }"#)),
        Node::text("points", style(r#"{ "fontSize": 12, "lineHeight": 20 }"#)),
    ])]));
    let blocks = first_section_blocks(&document);
    let line = |block: &Block| paragraph(block).options.spacing.as_ref().and_then(|s| s.line);
    assert_eq!(line(&blocks[0]), Some(360));
    assert_eq!(line(&blocks[1]), Some(400));
}

#[test]
fn test_paragraph_and_run_pass_through() {
    let json = r#"{
        "type": "DOCUMENT",
        "children": [{
            "type": "PAGE",
            "children": [{
                "type": "TEXT",
                "props": {
                    "style": { "marginTop": 10, "marginBottom": 5, "textAlign": "center" },
                    "paragraph": { "spacing": { "after": 0 }, "keepNext": true },
                    "run": { "font": "Courier New" }
                },
                "children": [{ "type": "TEXT_INSTANCE", "text": "code" }]
            }]
        }]
    }"#;
    let document = docform::compile_json(json).unwrap();
    let paragraph = paragraph(&first_section_blocks(&document)[0]);
    let spacing = paragraph.options.spacing.as_ref().unwrap();
    assert_eq!(spacing.before, Some(200));
    assert_eq!(spacing.after, Some(0));
    assert_eq!(paragraph.options.alignment, Some(Alignment::Center));
    assert_eq!(paragraph.options.keep_next, Some(true));
    assert_eq!(text_runs(paragraph)[0].options.font.as_deref(), Some("Courier New"));
}

// ─── View Tests ─────────────────────────────────────────────────

#[test]
fn test_views_are_transparent() {
    let document = compile(&make_doc(vec![make_page(vec![Node::view(
        style(r#"{ "fontFamily": "Georgia" }"#),
        vec![
            Node::text("first", Style::default()),
            Node::view(Style::default(), vec![Node::text_instance("second")]),
        ],
    )])]));
    let blocks = first_section_blocks(&document);
    assert_eq!(blocks.len(), 2);
    for block in blocks {
        let runs = text_runs(paragraph(block));
        assert_eq!(runs[0].options.font.as_deref(), Some("Georgia"));
    }
}

// ─── Table Tests ────────────────────────────────────────────────

fn make_simple_table(header: Vec<&str>, rows: Vec<Vec<&str>>) -> Node {
    let cell = |text: &str| {
        Node::table_cell(
            style(r##"{ "padding": 5, "borderBottomWidth": 1, "borderBottomColor": "#CCCCCC" }"##),
            vec![Node::text_instance(text)],
        )
    };
    let mut table_rows = vec![Node::table_row(header.into_iter().map(cell).collect())];
    for row in rows {
        table_rows.push(Node::table_row(row.into_iter().map(cell).collect()));
    }
    Node::table(style(r#"{ "width": "80%" }"#), table_rows)
}

#[test]
fn test_simple_table() {
    let document = compile(&make_doc(vec![make_page(vec![make_simple_table(
        vec!["Name", "Qty"],
        vec![vec!["Widget", "2"], vec!["Gadget", "5"]],
    )])]));
    let Block::Table(table) = &first_section_blocks(&document)[0] else {
        panic!("expected a table");
    };
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.options.width, Some(TableWidth::percent(80.0)));

    let cell = &table.rows[1].children[0];
    let margins = cell.options.margins.as_ref().unwrap();
    assert_eq!(margins.top, Some(100));
    assert_eq!(margins.left, Some(100));
    let bottom = cell.options.borders.as_ref().unwrap().bottom.clone().unwrap();
    assert_eq!(bottom.style, "single");
    assert_eq!(bottom.color.as_deref(), Some("CCCCCC"));
}

#[test]
fn test_table_renders_grid_and_cells() {
    let container = make_doc(vec![make_page(vec![make_simple_table(
        vec!["A", "B", "C"],
        vec![vec!["1", "2", "3"]],
    )])]);
    let body = read_part(&docform::render(&container).unwrap(), "word/document.xml");
    assert!(body.contains(r#"<w:tblW w:w="4000" w:type="pct"/>"#));
    assert_eq!(body.matches("<w:gridCol ").count(), 3);
    assert_eq!(body.matches("<w:tc>").count(), 6);
    assert!(body.contains(r#"<w:bottom w:val="single" w:sz="1" w:color="CCCCCC"/>"#));
    assert!(body.contains(r#"<w:top w:val="none" w:sz="0" w:color="auto"/>"#));
}

// ─── Image Tests ────────────────────────────────────────────────

#[test]
fn test_png_and_jpeg_images_land_in_media() {
    let container = make_doc(vec![make_page(vec![
        Node::image(
            ImageSource::Bytes(png_fixture(4, 4)),
            "png",
            style(r#"{ "width": 48, "height": 48 }"#),
        ),
        Node::image(ImageSource::Bytes(jpeg_fixture()), "jpeg", Style::default()),
    ])]);
    let bytes = docform::render(&container).unwrap();
    let names = part_names(&bytes);
    assert!(names.contains(&"word/media/image1.png".to_string()));
    assert!(names.contains(&"word/media/image2.jpg".to_string()));

    let types = read_part(&bytes, "[Content_Types].xml");
    assert!(types.contains(r#"<Default Extension="jpg" ContentType="image/jpeg"/>"#));

    // 48pt = 64px = 609600 EMU
    let body = read_part(&bytes, "word/document.xml");
    assert!(body.contains(r#"<wp:extent cx="609600" cy="609600"/>"#));
}

#[test]
fn test_data_uri_image() {
    use base64::Engine;
    let src = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png_fixture(1, 1))
    );
    let container = make_doc(vec![make_page(vec![Node::image(
        ImageSource::Text(src),
        "png",
        Style::default(),
    )])]);
    let bytes = docform::render(&container).unwrap();
    assert!(part_names(&bytes).contains(&"word/media/image1.png".to_string()));
}

#[test]
fn test_svg_node_renders_with_fallback() {
    let json = r##"{
        "type": "DOCUMENT",
        "children": [{
            "type": "PAGE",
            "children": [{
                "type": "SVG",
                "props": { "width": 30, "height": 30, "viewBox": "0 0 30 30" },
                "children": [{ "type": "PATH", "props": { "d": "M0 0 L30 30", "stroke": "#000" } }]
            }]
        }]
    }"##;
    let bytes = docform::render_json(json).unwrap();

    let svg = read_part(&bytes, "word/media/image1.svg");
    assert!(svg.contains(r##"<path d="M0 0 L30 30" stroke="#000" />"##));

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    let mut fallback = Vec::new();
    archive
        .by_name("word/media/image2.png")
        .unwrap()
        .read_to_end(&mut fallback)
        .unwrap();
    let decoded = image::load_from_memory(&fallback).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1, 1));

    assert!(read_part(&bytes, "word/document.xml").contains("asvg:svgBlip"));
}

#[test]
fn test_unreadable_image_fails_at_write_time() {
    let container = make_doc(vec![make_page(vec![Node::image(
        ImageSource::Text("./no/such/image.png".to_string()),
        "png",
        Style::default(),
    )])]);
    // Compilation never touches the source
    assert!(docform::compile(&container).is_ok());
    let err = docform::render(&container).unwrap_err();
    assert!(matches!(err, DocformError::Image(_)));
}

// ─── Page, Header and Footer Tests ──────────────────────────────

#[test]
fn test_pages_become_sections() {
    let json = r#"{
        "type": "DOCUMENT",
        "children": [
            { "type": "PAGE", "props": { "size": "LETTER", "style": { "padding": "0.5in" } },
              "children": [{ "type": "TEXT_INSTANCE", "text": "first" }] },
            { "type": "PAGE", "props": { "size": { "width": "210mm", "height": "99mm", "orientation": "landscape" } },
              "children": [{ "type": "TEXT_INSTANCE", "text": "second" }] }
        ]
    }"#;
    let document = docform::compile_json(json).unwrap();
    assert_eq!(document.sections.len(), 2);

    let first = document.sections[0].properties.page.as_ref().unwrap();
    let size = first.size.as_ref().unwrap();
    assert_eq!((size.width, size.height), (Some(12240), Some(15840)));
    assert_eq!(first.margin.as_ref().unwrap().top, Some(720));

    let second = document.sections[1].properties.page.as_ref().unwrap();
    assert_eq!(
        second.size.as_ref().unwrap().orientation,
        Some(PageOrientation::Landscape)
    );

    let body = read_part(&docform::render_json(json).unwrap(), "word/document.xml");
    assert_eq!(body.matches("<w:sectPr>").count(), 2);
    assert!(body.contains(r#"<w:pgSz w:w="12240" w:h="15840"/>"#));
}

#[test]
fn test_first_page_header_requests_title_page() {
    let container = make_doc(vec![make_page(vec![
        Node::header(HeaderFooterSlot::First, vec![Node::text_instance("Cover")]),
        Node::footer(HeaderFooterSlot::Default, vec![Node::text_instance("Footer")]),
        Node::text("content", Style::default()),
    ])]);
    let document = compile(&container);
    let section = &document.sections[0];
    assert_eq!(section.properties.title_page, Some(true));
    assert_eq!(section.children.len(), 1);
    assert!(section.headers.contains(HeaderFooterSlot::First));
    assert_eq!(document.options.even_and_odd_header_and_footers, None);

    let bytes = docform::render(&container).unwrap();
    assert!(read_part(&bytes, "word/header1.xml").contains("Cover"));
    assert!(read_part(&bytes, "word/footer1.xml").contains("Footer"));
    assert!(read_part(&bytes, "word/document.xml").contains("<w:titlePg/>"));
}

#[test]
fn test_even_header_enables_even_and_odd() {
    let container = make_doc(vec![
        make_page(vec![Node::text_instance("plain")]),
        make_page(vec![Node::footer(
            HeaderFooterSlot::Even,
            vec![Node::text_instance("even footer")],
        )]),
    ]);
    let document = compile(&container);
    assert_eq!(document.options.even_and_odd_header_and_footers, Some(true));

    let bytes = docform::render(&container).unwrap();
    assert!(read_part(&bytes, "word/settings.xml").contains("<w:evenAndOddHeaders/>"));
    assert!(read_part(&bytes, "word/document.xml")
        .contains(r#"<w:footerReference w:type="even" r:id="rId3"/>"#));
}

// ─── Document Options Tests ─────────────────────────────────────

#[test]
fn test_metadata_and_default_font() {
    let json = r#"{
        "children": [{
            "type": "DOCUMENT",
            "props": {
                "title": "Annual Report",
                "creator": "Finance",
                "keywords": ["annual", "report"],
                "language": "de-DE",
                "style": { "fontFamily": "Helvetica" }
            },
            "children": [{ "type": "PAGE" }]
        }]
    }"#;
    let document = docform::compile_json(json).unwrap();
    assert_eq!(document.options.title.as_deref(), Some("Annual Report"));
    assert_eq!(document.options.keywords.as_deref(), Some("annual, report"));
    let run = document.options.styles.as_ref().unwrap().default.as_ref().unwrap().document.as_ref().unwrap().run.clone().unwrap();
    assert_eq!(run.font.as_deref(), Some("Helvetica"));
    assert_eq!(run.language.unwrap().value.as_deref(), Some("de-DE"));

    let bytes = docform::render_json(json).unwrap();
    let core = read_part(&bytes, "docProps/core.xml");
    assert!(core.contains("<dc:creator>Finance</dc:creator>"));
    let styles = read_part(&bytes, "word/styles.xml");
    assert!(styles.contains(r#"<w:lang w:val="de-DE"/>"#));
}

// ─── JSON Deserialization Tests ─────────────────────────────────

#[test]
fn test_style_list_with_falsy_entries() {
    let json = r#"{
        "type": "DOCUMENT",
        "children": [{
            "type": "PAGE",
            "children": [{
                "type": "TEXT",
                "props": { "style": [{ "fontSize": 8 }, false, null, { "fontSize": 16 }] },
                "children": [{ "type": "TEXT_INSTANCE", "text": "big" }]
            }]
        }]
    }"#;
    let document = docform::compile_json(json).unwrap();
    let runs = text_runs(paragraph(&first_section_blocks(&document)[0]));
    assert_eq!(runs[0].options.size, Some(32));
}

#[test]
fn test_invalid_json_reports_parse_error() {
    let err = docform::render_json(r#"{ "type": "DOCUMENT", }"#).unwrap_err();
    assert!(matches!(err, DocformError::ParseError { .. }));
    assert!(err.to_string().contains("Hint"));
}

#[test]
fn test_unknown_node_type_is_rejected() {
    let err = docform::compile_json(r#"{ "type": "MARQUEE" }"#).unwrap_err();
    assert!(matches!(err, DocformError::ParseError { .. }));
}

#[test]
fn test_compiled_model_serializes() {
    let document = compile(&make_doc(vec![make_page(vec![Node::text("x", Style::default())])]));
    let json = serde_json::to_value(&document).unwrap();
    assert_eq!(json["sections"][0]["children"][0]["kind"], "Paragraph");
}
