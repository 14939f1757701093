//! Document serialization back to JSON or YAML.

use std::path::Path;

use serde_json::Value;

use crate::error::DocumentError;
use crate::types::Format;

/// Render a document as text in the given format.
///
/// JSON is pretty-printed with two-space indentation and a trailing newline.
pub fn render_document(doc: &Value, format: Format) -> Result<String, DocumentError> {
    match format {
        Format::Json => serde_json::to_string_pretty(doc)
            .map(|mut text| {
                text.push('\n');
                text
            })
            .map_err(|e| DocumentError::Serialize {
                message: e.to_string(),
            }),
        Format::Yaml => serde_yaml::to_string(doc).map_err(|e| DocumentError::Serialize {
            message: e.to_string(),
        }),
    }
}

/// Write a document to `path`, choosing the format from its extension.
///
/// The destination is overwritten unconditionally.
///
/// # Errors
///
/// Returns `DocumentError::UnsupportedFormat` when the extension isn't
/// `.json`, `.yaml` or `.yml`, and `DocumentError::WriteError` when the
/// file can't be written.
pub fn write_document(doc: &Value, path: &Path) -> Result<(), DocumentError> {
    let format = Format::from_path(path).ok_or_else(|| DocumentError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let text = render_document(doc, format)?;
    std::fs::write(path, text).map_err(|source| DocumentError::WriteError {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), ?format, "wrote document");
    Ok(())
}
