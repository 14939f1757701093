//! Structural comparison of a local API document against a reference.
//!
//! Only names are compared: paths, the operations under shared paths,
//! schema names, and security scheme names. Same-named schemas are not
//! compared field by field.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::containers::{operations, resolve_paths, resolve_schemas, resolve_security_schemes};

/// How the local document is named in findings.
pub const LOCAL_LABEL: &str = "local API";

/// How the reference document is named in findings.
pub const REFERENCE_LABEL: &str = "B3 API";

/// Findings grouped by the part of the document they concern.
///
/// Entries are kept in discovery order and never deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Findings {
    pub paths: Vec<String>,
    pub schemas: Vec<String>,
    pub security: Vec<String>,
}

impl Findings {
    /// Total number of findings across all buckets.
    pub fn len(&self) -> usize {
        self.paths.len() + self.schemas.len() + self.security.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn buckets(&self) -> [(&'static str, &[String]); 3] {
        [
            ("paths", self.paths.as_slice()),
            ("schemas", self.schemas.as_slice()),
            ("security", self.security.as_slice()),
        ]
    }
}

/// Result of [`compare`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    /// Elements present in only one of the two documents.
    pub divergences: Findings,
    /// Elements present in both documents.
    pub similarities: Findings,
}

impl ComparisonReport {
    pub fn divergence_count(&self) -> usize {
        self.divergences.len()
    }

    pub fn similarity_count(&self) -> usize {
        self.similarities.len()
    }

    /// True when no divergences were found.
    pub fn is_aligned(&self) -> bool {
        self.divergences.is_empty()
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (title, findings) in [
            ("Divergences", &self.divergences),
            ("Similarities", &self.similarities),
        ] {
            writeln!(f, "{}:", title)?;
            for (bucket, entries) in findings.buckets() {
                if entries.is_empty() {
                    writeln!(f, "  {}: none", bucket)?;
                    continue;
                }
                writeln!(f, "  {}:", bucket)?;
                for entry in entries {
                    writeln!(f, "    - {}", entry)?;
                }
            }
        }
        write!(
            f,
            "{} divergence(s), {} similarity(ies)",
            self.divergence_count(),
            self.similarity_count()
        )
    }
}

/// Compare a local document against a reference document.
///
/// Runs three independent passes (paths, schemas, security schemes). Each
/// pass walks the local document first, then reports names that exist only
/// in the reference. Reference-only paths are reported as a single finding;
/// their operations are not listed individually.
///
/// Missing containers count as empty, so this never fails.
pub fn compare(local: &Value, reference: &Value) -> ComparisonReport {
    let mut report = ComparisonReport::default();

    compare_paths(
        &resolve_paths(local),
        &resolve_paths(reference),
        &mut report,
    );
    compare_names(
        "Schema",
        &resolve_schemas(local),
        &resolve_schemas(reference),
        &mut report.divergences.schemas,
        &mut report.similarities.schemas,
    );
    compare_names(
        "Security scheme",
        &resolve_security_schemes(local),
        &resolve_security_schemes(reference),
        &mut report.divergences.security,
        &mut report.similarities.security,
    );

    report
}

fn compare_paths(
    local: &Map<String, Value>,
    reference: &Map<String, Value>,
    report: &mut ComparisonReport,
) {
    let divergences = &mut report.divergences.paths;
    let similarities = &mut report.similarities.paths;

    for (path, item) in local {
        let Some(reference_item) = reference.get(path) else {
            divergences.push(format!(
                "Path '{}' in {} not found in {}.",
                path, LOCAL_LABEL, REFERENCE_LABEL
            ));
            continue;
        };

        similarities.push(format!("Path '{}' found in both APIs.", path));

        let reference_ops = operations(reference_item);
        for method in operations(item).keys() {
            if reference_ops.contains_key(method) {
                similarities.push(format!(
                    "Method '{}' for path '{}' found in both APIs.",
                    method, path
                ));
            } else {
                divergences.push(format!(
                    "Method '{}' for path '{}' in {} not found in {}.",
                    method, path, LOCAL_LABEL, REFERENCE_LABEL
                ));
            }
        }
    }

    for path in reference.keys() {
        if !local.contains_key(path) {
            divergences.push(format!(
                "Path '{}' in {} not found in {}.",
                path, REFERENCE_LABEL, LOCAL_LABEL
            ));
        }
    }
}

fn compare_names(
    noun: &str,
    local: &Map<String, Value>,
    reference: &Map<String, Value>,
    divergences: &mut Vec<String>,
    similarities: &mut Vec<String>,
) {
    for name in local.keys() {
        if reference.contains_key(name) {
            similarities.push(format!("{} '{}' found in both APIs.", noun, name));
        } else {
            divergences.push(format!(
                "{} '{}' in {} not found in {}.",
                noun, name, LOCAL_LABEL, REFERENCE_LABEL
            ));
        }
    }

    for name in reference.keys() {
        if !local.contains_key(name) {
            divergences.push(format!(
                "{} '{}' in {} not found in {}.",
                noun, name, REFERENCE_LABEL, LOCAL_LABEL
            ));
        }
    }
}
