//! Document loading from JSON and YAML files.
//!
//! Both formats end up in the same `serde_json::Value` tree. YAML is read
//! through `serde_yaml::Value` first so that non-string mapping keys, such as
//! unquoted `200:` response codes, survive as strings instead of failing.

use std::path::Path;

use serde_json::{Map, Number, Value};

use crate::error::DocumentError;
use crate::types::{json_type_name, Format};

/// Load an OpenAPI document from a file path.
///
/// The format comes from the extension (`.json`, `.yaml`, `.yml`).
///
/// # Errors
///
/// Returns `DocumentError::UnsupportedFormat` for any other extension,
/// `DocumentError::FileNotFound` / `ReadError` when the file can't be read,
/// and `InvalidJson` / `InvalidYaml` / `NotAMapping` for malformed content.
pub fn load_document(path: &Path) -> Result<Value, DocumentError> {
    let format = Format::from_path(path).ok_or_else(|| DocumentError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    if !path.exists() {
        return Err(DocumentError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| DocumentError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let doc = parse(&content, format, path)?;
    tracing::debug!(path = %path.display(), ?format, "loaded document");
    Ok(doc)
}

/// Parse document text already in memory.
///
/// # Errors
///
/// Returns `InvalidJson` / `InvalidYaml` for malformed content, or
/// `NotAMapping` when the root isn't a mapping.
pub fn parse_document(content: &str, format: Format) -> Result<Value, DocumentError> {
    parse(content, format, Path::new("<input>"))
}

fn parse(content: &str, format: Format, path: &Path) -> Result<Value, DocumentError> {
    let doc = match format {
        Format::Json => {
            serde_json::from_str(content).map_err(|source| DocumentError::InvalidJson {
                path: path.to_path_buf(),
                source,
            })?
        }
        Format::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|source| DocumentError::InvalidYaml {
                    path: path.to_path_buf(),
                    source,
                })?;
            yaml_to_json(yaml)
        }
    };

    if !doc.is_object() {
        return Err(DocumentError::NotAMapping {
            path: path.to_path_buf(),
            actual: json_type_name(&doc).to_string(),
        });
    }
    Ok(doc)
}

/// Convert a YAML tree into the JSON tree used everywhere else.
///
/// Tags are dropped (the tagged value is kept) and non-finite floats
/// become `null`, since JSON has no representation for either.
pub fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => {
            Value::Array(seq.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (k, v) in mapping {
                map.insert(yaml_key(k), yaml_to_json(v));
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Render a YAML mapping key as a string key.
fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
        // Complex keys have no natural string form; use their JSON text.
        other => yaml_to_json(other).to_string(),
    }
}
