//! Adaptation of a local API document toward the reference conventions.
//!
//! The adapter works on a deep copy of the local document and applies four
//! rules in a fixed order:
//!
//! 1. merge the reference security schemes into the local container
//! 2. rename paths listed in [`RuleSet::path_renames`]
//! 3. import schemas listed in [`RuleSet::schema_imports`]
//! 4. upgrade a `swagger: "2.0"` document to `openapi: "3.0.0"`
//!
//! Rules 1-3 write into whichever container convention the copy already uses,
//! so rule 4 moves whatever is present at that point.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::containers::{
    locate_in, resolve_in, resolve_schemas, resolve_security_schemes, ContainerKind, Location,
};
use crate::types::{
    json_type_name, COMPONENTS, COMPONENT_SECURITY_SCHEMES, OPENAPI_KEY, OPENAPI_VERSION, PATHS,
    SECURITY_DEFINITIONS, SWAGGER_KEY, SWAGGER_VERSION,
};

/// Local path that the reference publishes under a versioned name.
pub const QUOTES_LOCAL_PATH: &str = "/cotacoes";

/// Reference name for [`QUOTES_LOCAL_PATH`].
pub const QUOTES_REFERENCE_PATH: &str = "/v1/market-data/quotes";

/// Reference schema copied into documents that lack it.
pub const CONTACT_SCHEMA: &str = "ContactApiModel";

/// Move the operations of one path to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathRename {
    pub from: String,
    pub to: String,
}

impl PathRename {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Rules applied by [`adapt_with_rules`].
///
/// Security-scheme merging and the version upgrade always run; the path
/// renames and schema imports are data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    pub path_renames: Vec<PathRename>,
    /// Schema names copied from the reference when missing locally.
    pub schema_imports: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            path_renames: vec![PathRename::new(QUOTES_LOCAL_PATH, QUOTES_REFERENCE_PATH)],
            schema_imports: vec![CONTACT_SCHEMA.to_string()],
        }
    }
}

impl RuleSet {
    /// A rule set with no renames or imports.
    pub fn empty() -> Self {
        Self {
            path_renames: Vec::new(),
            schema_imports: Vec::new(),
        }
    }
}

/// A change the adapter made to the copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum AppliedChange {
    SecuritySchemesMerged { location: Location, count: usize },
    PathRenamed { from: String, to: String },
    SchemaImported { name: String, location: Location },
    VersionUpgraded,
}

impl fmt::Display for AppliedChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppliedChange::SecuritySchemesMerged { location, count } => {
                write!(f, "merged {} security scheme(s) into {}", count, location)
            }
            AppliedChange::PathRenamed { from, to } => {
                write!(f, "renamed path '{}' to '{}'", from, to)
            }
            AppliedChange::SchemaImported { name, location } => {
                write!(f, "imported schema '{}' into {}", name, location)
            }
            AppliedChange::VersionUpgraded => write!(
                f,
                "upgraded {} {} to {} {}",
                SWAGGER_KEY, SWAGGER_VERSION, OPENAPI_KEY, OPENAPI_VERSION
            ),
        }
    }
}

/// Result of [`adapt_with_rules`].
#[derive(Debug, Clone, PartialEq)]
pub struct Adaptation {
    /// The adapted document, independent of both inputs.
    pub document: Value,
    /// What each rule did, in application order.
    pub applied: Vec<AppliedChange>,
}

/// Adapt `local` toward `reference` using the default rules.
///
/// Neither input is modified.
pub fn adapt(local: &Value, reference: &Value) -> Value {
    adapt_with_rules(local, reference, &RuleSet::default()).document
}

/// Adapt `local` toward `reference` using `rules`.
///
/// A local document whose root isn't a mapping is returned unchanged.
pub fn adapt_with_rules(local: &Value, reference: &Value, rules: &RuleSet) -> Adaptation {
    let Value::Object(mut copy) = local.clone() else {
        tracing::warn!(
            actual = json_type_name(local),
            "local document is not a mapping, nothing to adapt"
        );
        return Adaptation {
            document: local.clone(),
            applied: Vec::new(),
        };
    };
    let root = &mut copy;
    let mut applied = vec![merge_security_schemes(root, reference)];

    for rename in &rules.path_renames {
        if rename_path(root, rename) {
            applied.push(AppliedChange::PathRenamed {
                from: rename.from.clone(),
                to: rename.to.clone(),
            });
        }
    }

    for name in &rules.schema_imports {
        if let Some(location) = import_schema(root, reference, name) {
            applied.push(AppliedChange::SchemaImported {
                name: name.clone(),
                location,
            });
        }
    }

    if upgrade_version(root) {
        applied.push(AppliedChange::VersionUpgraded);
    }

    for change in &applied {
        tracing::debug!(%change, "applied adaptation rule");
    }

    Adaptation {
        document: Value::Object(copy),
        applied,
    }
}

/// Upsert the reference security schemes into the local container.
///
/// An existing `components.securitySchemes` takes precedence over
/// `securityDefinitions`; with neither, a version 3 container is created.
fn merge_security_schemes(root: &mut Map<String, Value>, reference: &Value) -> AppliedChange {
    let schemes = resolve_security_schemes(reference);
    let kind = ContainerKind::SecuritySchemes;

    let has_components_schemes = root
        .get(COMPONENTS)
        .and_then(|c| c.get(COMPONENT_SECURITY_SCHEMES))
        .is_some();
    let location = if !has_components_schemes && root.contains_key(SECURITY_DEFINITIONS) {
        Location::Legacy(kind)
    } else {
        Location::Components(kind)
    };

    let container = container_mut(root, location);
    for (name, scheme) in schemes.iter() {
        container.insert(name.clone(), scheme.clone());
    }

    AppliedChange::SecuritySchemesMerged {
        location,
        count: schemes.len(),
    }
}

/// Rename a path in place, keeping its position.
///
/// Skipped when the source is absent or the target already exists.
fn rename_path(root: &mut Map<String, Value>, rename: &PathRename) -> bool {
    let Some(Value::Object(paths)) = root.get_mut(PATHS) else {
        return false;
    };
    if !paths.contains_key(&rename.from) {
        return false;
    }
    if paths.contains_key(&rename.to) {
        tracing::debug!(
            from = %rename.from,
            to = %rename.to,
            "target path already exists, keeping source path"
        );
        return false;
    }

    let old = std::mem::take(paths);
    for (path, item) in old {
        if path == rename.from {
            paths.insert(rename.to.clone(), item);
        } else {
            paths.insert(path, item);
        }
    }
    true
}

/// Copy schema `name` from the reference when the local container lacks it.
fn import_schema(root: &mut Map<String, Value>, reference: &Value, name: &str) -> Option<Location> {
    let reference_schemas = resolve_schemas(reference);
    let schema = reference_schemas.get(name)?;

    if resolve_in(root, ContainerKind::Schemas).contains_key(name) {
        return None;
    }

    let location = locate_in(root, ContainerKind::Schemas)
        .unwrap_or(Location::Components(ContainerKind::Schemas));
    container_mut(root, location).insert(name.to_string(), schema.clone());
    Some(location)
}

/// Rewrite a version 2 document into the version 3 container layout.
///
/// The `openapi` marker takes the place of `swagger`. Top-level
/// `securityDefinitions` and `definitions` move under `components`; when the
/// target already holds a mapping the moved entries are merged over it.
fn upgrade_version(root: &mut Map<String, Value>) -> bool {
    if root.get(SWAGGER_KEY).and_then(Value::as_str) != Some(SWAGGER_VERSION) {
        return false;
    }

    let old = std::mem::take(root);
    for (key, value) in old {
        if key == SWAGGER_KEY {
            root.insert(
                OPENAPI_KEY.to_string(),
                Value::String(OPENAPI_VERSION.to_string()),
            );
        } else if key != OPENAPI_KEY {
            root.insert(key, value);
        }
    }

    for kind in [ContainerKind::SecuritySchemes, ContainerKind::Schemas] {
        let Some(moved) = root.shift_remove(kind.legacy_key()) else {
            continue;
        };
        let components = child_map(root, COMPONENTS);
        let key = kind.component_key();
        match components.get_mut(key) {
            Some(Value::Object(existing)) => match moved {
                Value::Object(entries) => {
                    for (name, entry) in entries {
                        existing.insert(name, entry);
                    }
                }
                other => {
                    tracing::warn!(
                        container = kind.legacy_key(),
                        actual = json_type_name(&other),
                        "dropping non-mapping container during upgrade"
                    );
                }
            },
            _ => {
                components.insert(key.to_string(), moved);
            }
        }
    }
    true
}

/// Mutable access to a container, creating it (and `components`) if needed.
fn container_mut(root: &mut Map<String, Value>, location: Location) -> &mut Map<String, Value> {
    match location {
        Location::Legacy(kind) => child_map(root, kind.legacy_key()),
        Location::Components(kind) => {
            child_map(child_map(root, COMPONENTS), kind.component_key())
        }
    }
}

/// Mutable access to `parent[key]` as a mapping.
///
/// A missing entry is created; a non-mapping entry is replaced.
fn child_map<'a>(parent: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let slot = parent
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        tracing::warn!(
            key,
            actual = json_type_name(slot),
            "replacing non-mapping value with an empty mapping"
        );
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot holds a mapping"),
    }
}
