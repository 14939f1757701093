//! Error types for loading, writing, and reviewing OpenAPI documents.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading or writing a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Format errors (exit code 2)
    #[error("unsupported file format for {path}: expected .json, .yaml or .yml")]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    InvalidYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{path} is not an OpenAPI document: expected a mapping at the root, got {actual}")]
    NotAMapping { path: PathBuf, actual: String },

    #[error("cannot serialize document: {message}")]
    Serialize { message: String },
}

impl DocumentError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DocumentError::FileNotFound { .. }
            | DocumentError::ReadError { .. }
            | DocumentError::WriteError { .. } => 3,
            _ => 2,
        }
    }

    /// True for the malformed-content family (JSON, YAML, root shape).
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            DocumentError::InvalidJson { .. }
                | DocumentError::InvalidYaml { .. }
                | DocumentError::NotAMapping { .. }
        )
    }
}

/// Errors from the hosted chat service.
///
/// Never shown raw to the user: callers fall back to a fixed message.
#[derive(Debug, Error)]
pub enum ChatError {
    #[cfg(feature = "remote")]
    #[error("chat request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("chat service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("chat service returned no text")]
    EmptyResponse,

    #[error("unexpected chat response: {message}")]
    InvalidResponse { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_error_exit_codes() {
        let err = DocumentError::FileNotFound {
            path: PathBuf::from("local.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = DocumentError::WriteError {
            path: PathBuf::from("out.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = DocumentError::UnsupportedFormat {
            path: PathBuf::from("local.txt"),
        };
        assert_eq!(err.exit_code(), 2);

        let err = DocumentError::NotAMapping {
            path: PathBuf::from("local.json"),
            actual: "array".into(),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.is_parse_error());
    }

    #[test]
    fn unsupported_format_display() {
        let err = DocumentError::UnsupportedFormat {
            path: PathBuf::from("api.toml"),
        };
        assert_eq!(
            err.to_string(),
            "unsupported file format for api.toml: expected .json, .yaml or .yml"
        );
        assert!(!err.is_parse_error());
    }

    #[test]
    fn chat_error_display() {
        let err = ChatError::Status {
            status: 401,
            body: "unauthorized".into(),
        };
        assert_eq!(err.to_string(), "chat service answered 401: unauthorized");
    }
}
