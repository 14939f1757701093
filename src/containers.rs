//! Version-independent access to the containers of an OpenAPI document.
//!
//! Version 2 documents keep schemas and security schemes in flat top-level
//! maps (`definitions`, `securityDefinitions`); version 3 nests them under
//! `components`. Callers ask for a [`ContainerKind`] and get a map back
//! without caring which convention the document uses. A missing container,
//! or one holding something other than a mapping, resolves to an empty map.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{
    json_type_name, COMPONENTS, COMPONENT_SCHEMAS, COMPONENT_SECURITY_SCHEMES, DEFINITIONS, PATHS,
    SECURITY_DEFINITIONS,
};

/// A named-definition container with a version-dependent location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Schemas,
    SecuritySchemes,
}

impl ContainerKind {
    /// Top-level key used by version 2 documents.
    pub fn legacy_key(&self) -> &'static str {
        match self {
            ContainerKind::Schemas => DEFINITIONS,
            ContainerKind::SecuritySchemes => SECURITY_DEFINITIONS,
        }
    }

    /// Key under `components` used by version 3 documents.
    pub fn component_key(&self) -> &'static str {
        match self {
            ContainerKind::Schemas => COMPONENT_SCHEMAS,
            ContainerKind::SecuritySchemes => COMPONENT_SECURITY_SCHEMES,
        }
    }
}

/// Where a container lives inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Top-level version 2 key.
    Legacy(ContainerKind),
    /// Version 3 key under `components`.
    Components(ContainerKind),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Legacy(kind) => f.write_str(kind.legacy_key()),
            Location::Components(kind) => write!(f, "{}.{}", COMPONENTS, kind.component_key()),
        }
    }
}

/// Find which container of `kind` a document uses, if any.
///
/// The top-level version 2 key wins whenever it is present, matching
/// [`resolve`].
pub fn locate(doc: &Value, kind: ContainerKind) -> Option<Location> {
    doc.as_object().and_then(|root| locate_in(root, kind))
}

/// [`locate`] over the root mapping of a document.
pub fn locate_in(root: &Map<String, Value>, kind: ContainerKind) -> Option<Location> {
    if root.contains_key(kind.legacy_key()) {
        Some(Location::Legacy(kind))
    } else if root
        .get(COMPONENTS)
        .and_then(|c| c.get(kind.component_key()))
        .is_some()
    {
        Some(Location::Components(kind))
    } else {
        None
    }
}

/// Resolve the container of `kind`, whichever convention holds it.
pub fn resolve(doc: &Value, kind: ContainerKind) -> Cow<'_, Map<String, Value>> {
    match doc {
        Value::Object(root) => resolve_in(root, kind),
        _ => Cow::Owned(Map::new()),
    }
}

/// [`resolve`] over the root mapping of a document.
pub fn resolve_in(root: &Map<String, Value>, kind: ContainerKind) -> Cow<'_, Map<String, Value>> {
    let found = match locate_in(root, kind) {
        Some(Location::Legacy(_)) => root.get(kind.legacy_key()),
        Some(Location::Components(_)) => root
            .get(COMPONENTS)
            .and_then(|c| c.get(kind.component_key())),
        None => None,
    };
    as_mapping(found, kind_label(kind))
}

/// Resolve the schema container (`definitions` or `components.schemas`).
pub fn resolve_schemas(doc: &Value) -> Cow<'_, Map<String, Value>> {
    resolve(doc, ContainerKind::Schemas)
}

/// Resolve the security-scheme container (`securityDefinitions` or
/// `components.securitySchemes`).
pub fn resolve_security_schemes(doc: &Value) -> Cow<'_, Map<String, Value>> {
    resolve(doc, ContainerKind::SecuritySchemes)
}

/// Resolve the top-level `paths` map. Paths have no version-dependent location.
pub fn resolve_paths(doc: &Value) -> Cow<'_, Map<String, Value>> {
    as_mapping(doc.get(PATHS), PATHS)
}

/// Resolve the operations of a single path item.
///
/// Returns an empty map when the path item isn't a mapping.
pub fn operations(path_item: &Value) -> Cow<'_, Map<String, Value>> {
    match path_item {
        Value::Object(map) => Cow::Borrowed(map),
        _ => Cow::Owned(Map::new()),
    }
}

fn kind_label(kind: ContainerKind) -> &'static str {
    match kind {
        ContainerKind::Schemas => "schemas",
        ContainerKind::SecuritySchemes => "security schemes",
    }
}

fn as_mapping<'a>(value: Option<&'a Value>, label: &str) -> Cow<'a, Map<String, Value>> {
    match value {
        Some(Value::Object(map)) => Cow::Borrowed(map),
        Some(other) => {
            tracing::warn!(
                container = label,
                actual = json_type_name(other),
                "container is not a mapping, treating it as empty"
            );
            Cow::Owned(Map::new())
        }
        None => Cow::Owned(Map::new()),
    }
}
