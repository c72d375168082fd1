//! # Image Compilation
//!
//! `IMAGE` nodes become a paragraph holding a single image run. The source
//! bytes are carried through untouched; decoding them is the writer's job.
//!
//! SVG images always carry a raster fallback for consumers that cannot draw
//! SVG: the caller's fallback when one is given, otherwise a transparent
//! 1×1 PNG.

use crate::docx::{ImageFallback, ImageRun, ImageSource, ImageType, Paragraph, ParagraphChild, ParagraphOptions};
use crate::model::ImageProps;
use crate::style::{cascade, resolve_floating, resolve_image_transformation, to_alignment, Style};

/// A fully transparent 1×1 PNG.
pub const TRANSPARENT_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAAC0lEQVR42mNgAAIAAAUAAen63NgAAAAASUVORK5CYII=";

/// The fallback raster used when an SVG image has none of its own.
pub fn transparent_png_fallback() -> ImageFallback {
    ImageFallback {
        kind: ImageType::Png,
        data: ImageSource::Text(TRANSPARENT_PNG_BASE64.to_string()),
    }
}

/// Map an image type token. Absent means PNG and `jpeg` is spelled `jpg`.
pub fn normalize_image_type(kind: Option<&str>) -> ImageType {
    match kind {
        None | Some("png") => ImageType::Png,
        Some("jpg") | Some("jpeg") => ImageType::Jpg,
        Some("gif") => ImageType::Gif,
        Some("bmp") => ImageType::Bmp,
        Some("svg") => ImageType::Svg,
        Some(other) => {
            log::debug!("Unknown image type '{}', treating as png", other);
            ImageType::Png
        }
    }
}

/// Like [`normalize_image_type`], but a fallback is never an SVG.
pub fn normalize_fallback_type(kind: Option<&str>) -> ImageType {
    match normalize_image_type(kind) {
        ImageType::Svg => ImageType::Png,
        raster => raster,
    }
}

/// Compile an `IMAGE` node into a paragraph aligned by the effective
/// `textAlign`.
pub fn create_image_paragraph(props: &ImageProps, inherited: Option<&Style>) -> Paragraph {
    let style = cascade(inherited, props.style.as_ref());
    let style = style.as_ref();
    let kind = normalize_image_type(props.kind.as_deref());

    let transformation = props.transformation.unwrap_or_else(|| {
        let width = style.and_then(|s| s.width.as_ref()).and_then(|w| w.as_length());
        let height = style.and_then(|s| s.height.as_ref()).and_then(|h| h.as_length());
        resolve_image_transformation(width.as_ref(), height.as_ref())
    });
    let floating = props.floating.clone().or_else(|| resolve_floating(style));

    let fallback = match kind {
        ImageType::Svg => Some(
            props
                .fallback
                .as_ref()
                .map(|fallback| ImageFallback {
                    kind: normalize_fallback_type(fallback.kind.as_deref()),
                    data: fallback.data.clone(),
                })
                .unwrap_or_else(transparent_png_fallback),
        ),
        _ => None,
    };

    let image = ImageRun {
        kind,
        data: props.src.clone(),
        transformation,
        alt_text: props.alt_text.clone(),
        floating,
        fallback,
    };

    image_paragraph(image, style)
}

/// Wrap an image run in its own paragraph.
pub(crate) fn image_paragraph(image: ImageRun, style: Option<&Style>) -> Paragraph {
    Paragraph {
        options: ParagraphOptions {
            alignment: Some(to_alignment(style.and_then(|s| s.text_align.as_deref()))),
            ..Default::default()
        },
        children: vec![ParagraphChild::Image(image)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{Alignment, Transformation};
    use crate::model::FallbackProps;

    fn props(kind: Option<&str>) -> ImageProps {
        ImageProps {
            src: ImageSource::Bytes(vec![1, 2, 3]),
            kind: kind.map(str::to_string),
            style: None,
            alt_text: None,
            fallback: None,
            floating: None,
            transformation: None,
        }
    }

    #[test]
    fn test_transparent_png_decodes_to_one_clear_pixel() {
        use base64::Engine;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(TRANSPARENT_PNG_BASE64)
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (1, 1));
        assert_eq!(decoded.get_pixel(0, 0)[3], 0);
    }

    fn image_run(paragraph: &Paragraph) -> &ImageRun {
        match &paragraph.children[0] {
            ParagraphChild::Image(image) => image,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_type_normalization() {
        assert_eq!(normalize_image_type(None), ImageType::Png);
        assert_eq!(normalize_image_type(Some("jpeg")), ImageType::Jpg);
        assert_eq!(normalize_image_type(Some("gif")), ImageType::Gif);
        assert_eq!(normalize_image_type(Some("svg")), ImageType::Svg);
        assert_eq!(normalize_fallback_type(Some("svg")), ImageType::Png);
        assert_eq!(normalize_fallback_type(Some("jpeg")), ImageType::Jpg);
    }

    #[test]
    fn test_raster_image_has_no_fallback() {
        let paragraph = create_image_paragraph(&props(Some("jpeg")), None);
        let image = image_run(&paragraph);
        assert_eq!(image.kind, ImageType::Jpg);
        assert_eq!(image.fallback, None);
        assert_eq!(image.data, ImageSource::Bytes(vec![1, 2, 3]));
        assert_eq!(image.transformation, Transformation { width: 1.0, height: 1.0 });
        assert_eq!(paragraph.options.alignment, Some(Alignment::Left));
    }

    #[test]
    fn test_svg_image_gets_transparent_fallback() {
        let paragraph = create_image_paragraph(&props(Some("svg")), None);
        assert_eq!(image_run(&paragraph).fallback, Some(transparent_png_fallback()));
    }

    #[test]
    fn test_svg_image_keeps_explicit_fallback() {
        let mut svg = props(Some("svg"));
        svg.fallback = Some(FallbackProps {
            data: ImageSource::Bytes(vec![9]),
            kind: Some("jpeg".to_string()),
        });
        let paragraph = create_image_paragraph(&svg, None);
        let fallback = image_run(&paragraph).fallback.clone().unwrap();
        assert_eq!(fallback.kind, ImageType::Jpg);
        assert_eq!(fallback.data, ImageSource::Bytes(vec![9]));
    }

    #[test]
    fn test_size_alignment_and_floating_from_style() {
        let mut image = props(None);
        image.style = Some(
            serde_json::from_str::<Style>(
                r#"{ "width": "1in", "height": 36, "textAlign": "center", "position": "absolute", "top": 1 }"#,
            )
            .unwrap()
            .into(),
        );
        let paragraph = create_image_paragraph(&image, None);
        let run = image_run(&paragraph);
        assert_eq!(run.transformation, Transformation { width: 96.0, height: 48.0 });
        assert_eq!(run.floating.as_ref().unwrap().vertical_position.offset, Some(12700));
        assert_eq!(paragraph.options.alignment, Some(Alignment::Center));
    }

    #[test]
    fn test_explicit_transformation_wins() {
        let mut image = props(None);
        image.style = Some(serde_json::from_str::<Style>(r#"{ "width": 100 }"#).unwrap().into());
        image.transformation = Some(Transformation { width: 10.0, height: 20.0 });
        let paragraph = create_image_paragraph(&image, None);
        assert_eq!(
            image_run(&paragraph).transformation,
            Transformation { width: 10.0, height: 20.0 }
        );
    }

    #[test]
    fn test_inherited_alignment() {
        let inherited: Style = serde_json::from_str(r#"{ "textAlign": "right" }"#).unwrap();
        let paragraph = create_image_paragraph(&props(None), Some(&inherited));
        assert_eq!(paragraph.options.alignment, Some(Alignment::Right));
    }
}
