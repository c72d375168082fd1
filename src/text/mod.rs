//! # Text Compilation
//!
//! Turns `TEXT` nodes into paragraphs and their inline content into runs.
//!
//! Inside a paragraph, nested `TEXT` nodes are spans: each one cascades its
//! style over the inherited one and merges its `run` options over the
//! inherited run options before descending. Strings become one run per line,
//! with an explicit break run between consecutive lines.

use crate::docx::{
    merge_options, IndentOptions, Merge, Paragraph, ParagraphChild, ParagraphOptions, RunOptions,
    SpacingOptions, TextRun,
};
use crate::model::{Node, TextProps};
use crate::style::{
    cascade, has_decoration, resolve_font_size, resolve_font_weight, resolve_line_height,
    resolve_underline, to_alignment, Style,
};
use crate::units::{length_to_twip, normalize_color, to_half_points, Length};

/// Character formatting computed from an effective style, with explicit
/// `run` options merged over it key by key.
pub fn resolve_run_options(style: Option<&Style>, run: Option<&RunOptions>) -> RunOptions {
    let flag = |project: fn(&Style) -> Option<bool>| style.and_then(project).filter(|on| *on);

    let double_strike = flag(|s| s.double_strike).is_some();
    let strike = style
        .and_then(|s| s.strike)
        .unwrap_or_else(|| has_decoration(style, "line-through"));

    let computed = RunOptions {
        bold: Some(resolve_font_weight(style)),
        italics: Some(style.and_then(|s| s.font_style.as_deref()) == Some("italic")),
        underline: resolve_underline(style),
        strike: (strike && !double_strike).then_some(true),
        double_strike: double_strike.then_some(true),
        all_caps: flag(|s| s.all_caps),
        small_caps: flag(|s| s.small_caps),
        sub_script: flag(|s| s.sub_script),
        super_script: flag(|s| s.super_script),
        highlight: style.and_then(|s| s.highlight.clone()),
        size: to_half_points(resolve_font_size(style)),
        font: style.and_then(|s| s.font_family.clone()),
        color: normalize_color(style.and_then(|s| s.color.as_deref())),
        character_spacing: length_to_twip(style.and_then(|s| s.letter_spacing.as_ref())),
        ..Default::default()
    };

    match run {
        Some(run) => computed.merge(run),
        None => computed,
    }
}

/// Split a string on newlines into runs, with a break run between lines.
pub fn create_text_runs(text: &str, style: Option<&Style>, run: Option<&RunOptions>) -> Vec<TextRun> {
    let options = resolve_run_options(style, run);
    let mut runs = Vec::new();

    for (index, segment) in text.split('\n').enumerate() {
        if index > 0 {
            runs.push(TextRun::line_break());
        }
        runs.push(TextRun::new(segment, options.clone()));
    }

    runs
}

/// Runs for one inline node. Only strings and nested `TEXT` spans produce
/// anything inside a paragraph.
pub fn render_inline_node(node: &Node, inherited: Option<&Style>, run: Option<&RunOptions>) -> Vec<TextRun> {
    match node {
        Node::TextInstance { text } => create_text_runs(text, inherited, run),
        Node::Text { props, children } => {
            let style = cascade(inherited, props.style.as_ref());
            let run = merge_options(run, props.run.as_ref());
            children
                .iter()
                .flat_map(|child| render_inline_node(child, style.as_ref(), run.as_ref()))
                .collect()
        }
        other => {
            log::debug!("Ignoring {} node inside text", other.type_name());
            Vec::new()
        }
    }
}

/// Compile a block-level `TEXT` node into a paragraph.
///
/// Margins become spacing (top/bottom) and indentation (left/right), with
/// `textIndent` as the first-line indent. The node's `paragraph` options are
/// merged over the computed ones; `spacing` and `indent` overrides merge
/// field by field.
pub fn create_paragraph_from_text(props: &TextProps, children: &[Node], inherited: Option<&Style>) -> Paragraph {
    let style = cascade(inherited, props.style.as_ref());
    let style = style.as_ref();
    let overrides = props.paragraph.clone().unwrap_or_default();

    let margin = |project: fn(&Style) -> Option<&Length>| length_to_twip(style.and_then(project));
    let margin_top = margin(|s| s.margin_top.as_ref());
    let margin_bottom = margin(|s| s.margin_bottom.as_ref());
    let margin_left = margin(|s| s.margin_left.as_ref());
    let margin_right = margin(|s| s.margin_right.as_ref());
    let text_indent = margin(|s| s.text_indent.as_ref());

    let spacing = SpacingOptions {
        before: Some(margin_top.unwrap_or(0)),
        after: Some(margin_bottom.unwrap_or(0)),
        line: resolve_line_height(style, resolve_font_size(style)),
        line_rule: None,
    };
    let spacing = match &overrides.spacing {
        Some(spacing_override) => spacing.merge(spacing_override),
        None => spacing,
    };

    let has_indent = text_indent.is_some()
        || margin_left.is_some()
        || margin_right.is_some()
        || overrides.indent.is_some();
    let indent = has_indent.then(|| {
        let computed = IndentOptions {
            first_line: text_indent,
            left: margin_left,
            right: margin_right,
            hanging: None,
        };
        match &overrides.indent {
            Some(indent_override) => computed.merge(indent_override),
            None => computed,
        }
    });

    let alignment = overrides
        .alignment
        .unwrap_or_else(|| to_alignment(style.and_then(|s| s.text_align.as_deref())));

    let options = ParagraphOptions {
        alignment: Some(alignment),
        spacing: Some(spacing),
        indent,
        ..overrides
    };

    let run = props.run.as_ref();
    let runs = children
        .iter()
        .flat_map(|child| render_inline_node(child, style, run))
        .map(ParagraphChild::Text)
        .collect();

    Paragraph {
        options,
        children: runs,
    }
}

/// A bare string at block level: a plain paragraph under the inherited style.
pub fn create_paragraph_from_string(text: &str, inherited: Option<&Style>) -> Paragraph {
    Paragraph {
        options: ParagraphOptions::default(),
        children: create_text_runs(text, inherited, None)
            .into_iter()
            .map(ParagraphChild::Text)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::Alignment;
    use crate::style::StyleInput;

    fn style(json: &str) -> Style {
        serde_json::from_str(json).unwrap()
    }

    fn text_runs(paragraph: &Paragraph) -> Vec<&TextRun> {
        paragraph
            .children
            .iter()
            .map(|child| match child {
                ParagraphChild::Text(run) => run,
                ParagraphChild::Image(_) => panic!("unexpected image"),
            })
            .collect()
    }

    #[test]
    fn test_run_options_from_style() {
        let s = style(
            r##"{ "fontWeight": 700, "fontStyle": "italic", "fontSize": 12, "fontFamily": "Georgia",
                 "color": "#112233", "letterSpacing": "1pt", "highlight": "yellow", "allCaps": true,
                 "smallCaps": false }"##,
        );
        let run = resolve_run_options(Some(&s), None);
        assert_eq!(run.bold, Some(true));
        assert_eq!(run.italics, Some(true));
        assert_eq!(run.size, Some(24));
        assert_eq!(run.font.as_deref(), Some("Georgia"));
        assert_eq!(run.color.as_deref(), Some("112233"));
        assert_eq!(run.character_spacing, Some(20));
        assert_eq!(run.highlight.as_deref(), Some("yellow"));
        assert_eq!(run.all_caps, Some(true));
        assert_eq!(run.small_caps, None);
    }

    #[test]
    fn test_unstyled_runs_are_explicitly_plain() {
        let run = resolve_run_options(None, None);
        assert_eq!(run.bold, Some(false));
        assert_eq!(run.italics, Some(false));
        assert_eq!(run.strike, None);
        assert_eq!(run.underline, None);
        assert_eq!(run.size, None);
    }

    #[test]
    fn test_double_strike_suppresses_strike() {
        let s = style(r#"{ "textDecoration": "line-through", "doubleStrike": true }"#);
        let run = resolve_run_options(Some(&s), None);
        assert_eq!(run.strike, None);
        assert_eq!(run.double_strike, Some(true));

        let s = style(r#"{ "textDecoration": "line-through" }"#);
        assert_eq!(resolve_run_options(Some(&s), None).strike, Some(true));
    }

    #[test]
    fn test_explicit_run_overrides_win() {
        let s = style(r#"{ "fontWeight": "bold", "fontSize": 10 }"#);
        let overrides = RunOptions {
            bold: Some(false),
            vanish: Some(true),
            ..Default::default()
        };
        let run = resolve_run_options(Some(&s), Some(&overrides));
        assert_eq!(run.bold, Some(false));
        assert_eq!(run.size, Some(20));
        assert_eq!(run.vanish, Some(true));
    }

    #[test]
    fn test_newlines_become_breaks() {
        let runs = create_text_runs("a\nb\nc", None, None);
        assert_eq!(runs.len(), 5);
        assert_eq!(runs.iter().filter(|r| r.break_count == Some(1)).count(), 2);
        let texts: Vec<_> = runs.iter().filter_map(|r| r.text.as_deref()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(runs[1], TextRun::line_break());
    }

    #[test]
    fn test_empty_string_is_one_empty_run() {
        let runs = create_text_runs("", None, None);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text.as_deref(), Some(""));
    }

    #[test]
    fn test_nested_spans_cascade() {
        let inner = Node::span(
            style(r#"{ "fontWeight": "bold" }"#),
            vec![Node::text_instance("bold")],
        );
        let props = TextProps {
            style: Some(style(r#"{ "fontSize": 10 }"#).into()),
            ..Default::default()
        };
        let children = vec![Node::text_instance("plain "), inner];
        let paragraph = create_paragraph_from_text(&props, &children, None);
        let runs = text_runs(&paragraph);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].options.bold, Some(false));
        assert_eq!(runs[0].options.size, Some(20));
        assert_eq!(runs[1].options.bold, Some(true));
        assert_eq!(runs[1].options.size, Some(20));
    }

    #[test]
    fn test_nested_run_options_merge_key_by_key() {
        let inner = Node::Text {
            props: TextProps {
                run: Some(RunOptions {
                    color: Some("FF0000".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            children: vec![Node::text_instance("x")],
        };
        let props = TextProps {
            run: Some(RunOptions {
                font: Some("Mono".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let paragraph = create_paragraph_from_text(&props, &[inner], None);
        let runs = text_runs(&paragraph);
        assert_eq!(runs[0].options.font.as_deref(), Some("Mono"));
        assert_eq!(runs[0].options.color.as_deref(), Some("FF0000"));
    }

    #[test]
    fn test_non_text_inline_nodes_are_ignored() {
        let props = TextProps::default();
        let children = vec![Node::view(Style::default(), vec![Node::text_instance("lost")])];
        let paragraph = create_paragraph_from_text(&props, &children, None);
        assert!(paragraph.children.is_empty());
    }

    #[test]
    fn test_paragraph_spacing_and_alignment() {
        let props = TextProps {
            style: Some(StyleInput::from(style(
                r#"{ "marginTop": 6, "fontSize": 12, "lineHeight": 1.5, "textAlign": "justify" }"#,
            ))),
            ..Default::default()
        };
        let paragraph = create_paragraph_from_text(&props, &[], None);
        let spacing = paragraph.options.spacing.unwrap();
        assert_eq!(spacing.before, Some(120));
        assert_eq!(spacing.after, Some(0));
        assert_eq!(spacing.line, Some(360));
        assert_eq!(paragraph.options.alignment, Some(Alignment::Both));
        assert_eq!(paragraph.options.indent, None);
    }

    #[test]
    fn test_paragraph_indent_from_margins() {
        let props = TextProps {
            style: Some(style(r#"{ "marginLeft": "1in", "textIndent": 18 }"#).into()),
            ..Default::default()
        };
        let indent = create_paragraph_from_text(&props, &[], None).options.indent.unwrap();
        assert_eq!(indent.left, Some(1440));
        assert_eq!(indent.first_line, Some(360));
        assert_eq!(indent.right, None);
    }

    #[test]
    fn test_paragraph_overrides_merge_field_by_field() {
        let props = TextProps {
            style: Some(style(r#"{ "marginTop": 6, "marginBottom": 3, "textAlign": "center" }"#).into()),
            paragraph: Some(ParagraphOptions {
                alignment: Some(Alignment::Right),
                spacing: Some(SpacingOptions {
                    after: Some(0),
                    ..Default::default()
                }),
                indent: Some(IndentOptions {
                    hanging: Some(200),
                    ..Default::default()
                }),
                keep_next: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let options = create_paragraph_from_text(&props, &[], None).options;
        assert_eq!(options.alignment, Some(Alignment::Right));
        let spacing = options.spacing.unwrap();
        assert_eq!(spacing.before, Some(120));
        assert_eq!(spacing.after, Some(0));
        assert_eq!(options.indent.unwrap().hanging, Some(200));
        assert_eq!(options.keep_next, Some(true));
    }

    #[test]
    fn test_inherited_style_reaches_paragraph() {
        let inherited = style(r#"{ "textAlign": "center", "fontSize": 8 }"#);
        let paragraph = create_paragraph_from_text(
            &TextProps::default(),
            &[Node::text_instance("x")],
            Some(&inherited),
        );
        assert_eq!(paragraph.options.alignment, Some(Alignment::Center));
        assert_eq!(text_runs(&paragraph)[0].options.size, Some(16));
    }
}
