//! Core types shared by the loader, comparator, and adapter.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level key holding path items.
pub const PATHS: &str = "paths";

/// Version 2 top-level schema container.
pub const DEFINITIONS: &str = "definitions";

/// Version 2 top-level security-scheme container.
pub const SECURITY_DEFINITIONS: &str = "securityDefinitions";

/// Version 3 parent of the schema and security-scheme containers.
pub const COMPONENTS: &str = "components";

/// Version 3 schema container, under `components`.
pub const COMPONENT_SCHEMAS: &str = "schemas";

/// Version 3 security-scheme container, under `components`.
pub const COMPONENT_SECURITY_SCHEMES: &str = "securitySchemes";

/// Version 2 marker key and the only value treated as version 2.
pub const SWAGGER_KEY: &str = "swagger";
pub const SWAGGER_VERSION: &str = "2.0";

/// Version 3 marker key and the value written on upgrade.
pub const OPENAPI_KEY: &str = "openapi";
pub const OPENAPI_VERSION: &str = "3.0.0";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Serialization format of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick the format from a file extension (`.json`, `.yaml`, `.yml`).
    ///
    /// Matching is case-insensitive. Returns `None` for anything else.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

/// Which container convention a document follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecVersion {
    /// `swagger: "2.0"` with flat `definitions` / `securityDefinitions`.
    Swagger2,
    /// `openapi: "3.x"` with containers nested under `components`.
    OpenApi3,
    /// No recognizable marker.
    Unknown,
}

impl SpecVersion {
    /// Classify a document by its top-level version marker.
    pub fn detect(doc: &Value) -> Self {
        if doc.get(SWAGGER_KEY).and_then(Value::as_str) == Some(SWAGGER_VERSION) {
            SpecVersion::Swagger2
        } else if doc.get(OPENAPI_KEY).and_then(Value::as_str).is_some() {
            SpecVersion::OpenApi3
        } else {
            SpecVersion::Unknown
        }
    }
}
