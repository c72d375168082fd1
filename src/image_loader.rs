//! # Image Loading
//!
//! Resolves an [`ImageSource`] to the bytes stored in the package's
//! `word/media` folder. Raster bytes are not decoded or re-encoded; the
//! `image` crate is only used to sniff the format so a mislabelled image
//! gets a warning instead of silently producing a broken document.
//!
//! Supported string sources:
//! - `data:<mime>;base64,...` data URI
//! - file path with an explicit `/`, `./` or `../` prefix
//! - SVG markup (strings starting with `<`), for SVG images only
//! - raw base64

use crate::docx::{ImageSource, ImageType};
use crate::error::{DocformError, Result};

/// Load the bytes for an image of the given type.
pub fn load_image(source: &ImageSource, kind: ImageType) -> Result<Vec<u8>> {
    let bytes = match source {
        ImageSource::Bytes(bytes) => bytes.clone(),
        ImageSource::Text(src) => read_source_bytes(src, kind)?,
    };

    if bytes.is_empty() {
        return Err(DocformError::Image("Image data is empty".to_string()));
    }
    check_format(&bytes, kind);
    Ok(bytes)
}

/// Resolve the source string to raw image bytes.
fn read_source_bytes(src: &str, kind: ImageType) -> Result<Vec<u8>> {
    // Data URI: data:image/png;base64,iVBOR...
    if src.starts_with("data:") {
        let comma_pos = src
            .find(',')
            .ok_or_else(|| DocformError::Image("Invalid data URI: missing comma".to_string()))?;
        return base64_decode(&src[comma_pos + 1..]);
    }

    // Only explicit path prefixes, base64 text contains '/' too
    if src.starts_with('/') || src.starts_with("./") || src.starts_with("../") {
        return std::fs::read(src)
            .map_err(|e| DocformError::Image(format!("Failed to read image file '{}': {}", src, e)));
    }

    if kind == ImageType::Svg && src.trim_start().starts_with('<') {
        return Ok(src.as_bytes().to_vec());
    }

    base64_decode(src)
}

fn base64_decode(input: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| DocformError::Image(format!("Base64 decode error: {}", e)))
}

/// Warn when the bytes are recognizably a different raster format than the
/// declared one.
fn check_format(data: &[u8], kind: ImageType) {
    let expected = match kind {
        ImageType::Png => image::ImageFormat::Png,
        ImageType::Jpg => image::ImageFormat::Jpeg,
        ImageType::Gif => image::ImageFormat::Gif,
        ImageType::Bmp => image::ImageFormat::Bmp,
        ImageType::Svg => return,
    };
    match image::guess_format(data) {
        Ok(actual) if actual != expected => {
            log::warn!(
                "Image declared as {} looks like {:?}",
                kind.extension(),
                actual
            );
        }
        Ok(_) => {}
        Err(_) => log::warn!("Image declared as {} has an unrecognized format", kind.extension()),
    }
}
