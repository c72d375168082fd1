//! Structured error types for docform.
//!
//! Compilation itself only fails on a structurally broken tree (no document
//! root). Everything else that can go wrong happens at the edges: parsing JSON
//! input, or packaging the compiled model into a `.docx` file.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DocformError>;

/// The unified error type returned by all public docform API functions.
#[derive(Debug, Error)]
pub enum DocformError {
    /// JSON input failed to parse as a valid node tree.
    #[error("Failed to parse document: {source}{}", format_hint(.hint))]
    ParseError {
        source: serde_json::Error,
        hint: String,
    },

    /// The node tree has no `DOCUMENT` node at the top level.
    #[error("Document root is missing.")]
    MissingDocumentRoot,

    /// An image source could not be turned into bytes.
    #[error("Image error: {0}")]
    Image(String),

    /// Writing a package part failed. XML serialization errors arrive here
    /// too, since the part writer only fails on its output sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The ZIP container could not be written.
    #[error("Package error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for DocformError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the node tree schema. Check type tags (e.g. \"TEXT\", \"TABLE_CELL\") and prop names.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input, is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        DocformError::ParseError { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_root_message() {
        assert_eq!(
            DocformError::MissingDocumentRoot.to_string(),
            "Document root is missing."
        );
    }

    #[test]
    fn test_parse_error_carries_hint() {
        let err: DocformError = serde_json::from_str::<serde_json::Value>("{\"a\": }")
            .unwrap_err()
            .into();
        let message = err.to_string();
        assert!(message.starts_with("Failed to parse document"));
        assert!(message.contains("Hint: Check for trailing commas"));
    }

    #[test]
    fn test_io_errors_convert() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::WriteZero, "sink closed"))?;
            Ok(())
        }
        let err = fails().unwrap_err();
        assert!(matches!(err, DocformError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: sink closed");
    }

    #[test]
    fn test_eof_hint() {
        let err: DocformError = serde_json::from_str::<serde_json::Value>("{\"a\": [1, 2")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("truncated"));
    }
}
