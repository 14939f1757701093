//! OpenAPI conformance tooling
//!
//! Compares a local OpenAPI document against a reference ("B3") document and
//! adapts the local document toward the reference conventions.
//!
//! Documents are kept as generic `serde_json::Value` trees so that any shape
//! survives a load/write round trip; the comparator and adapter only look at
//! the paths, schema container, and security-scheme container, whichever
//! version convention (Swagger 2.0 or OpenAPI 3) holds them.
//!
//! # Example
//!
//! ```
//! use oas_conform::{adapt, compare};
//! use serde_json::json;
//!
//! let local = json!({
//!     "swagger": "2.0",
//!     "paths": { "/cotacoes": { "get": { "summary": "Get stock quotes" } } },
//!     "securityDefinitions": { "api_key": { "type": "apiKey" } }
//! });
//! let reference = json!({
//!     "openapi": "3.0.0",
//!     "paths": {},
//!     "components": { "securitySchemes": { "oauth2_client_credentials": { "type": "oauth2" } } }
//! });
//!
//! let report = compare(&local, &reference);
//! assert_eq!(report.divergences.paths.len(), 1);
//!
//! let adapted = adapt(&local, &reference);
//! assert!(adapted["paths"].get("/v1/market-data/quotes").is_some());
//! assert_eq!(adapted["openapi"], "3.0.0");
//! ```
//!
//! # Adaptation rules
//!
//! | Order | Rule | Effect |
//! |-------|------|--------|
//! | 1 | security merge | reference schemes upserted into the local container |
//! | 2 | path rename | `/cotacoes` becomes `/v1/market-data/quotes` |
//! | 3 | schema import | `ContactApiModel` copied from the reference if missing |
//! | 4 | version upgrade | `swagger: "2.0"` becomes `openapi: "3.0.0"`, containers move under `components` |

mod adapt;
mod compare;
mod conformance;
mod containers;
mod error;
mod loader;
mod types;
mod writer;

pub use adapt::{
    adapt, adapt_with_rules, Adaptation, AppliedChange, PathRename, RuleSet, CONTACT_SCHEMA,
    QUOTES_LOCAL_PATH, QUOTES_REFERENCE_PATH,
};
pub use compare::{compare, ComparisonReport, Findings, LOCAL_LABEL, REFERENCE_LABEL};
pub use conformance::{
    build_prompt, conformance_report, ChatConfig, ChatService, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT, FALLBACK_RESPONSE, STANDARDS_URL,
};
pub use containers::{
    locate, operations, resolve, resolve_paths, resolve_schemas, resolve_security_schemes,
    ContainerKind, Location,
};
pub use error::{ChatError, DocumentError};
pub use loader::{load_document, parse_document, yaml_to_json};
pub use types::{json_type_name, Format, SpecVersion};
pub use writer::{render_document, write_document};

#[cfg(feature = "remote")]
pub use conformance::HttpChatClient;
