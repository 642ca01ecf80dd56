//! Error types with credential sanitization.
//!
//! Service-account key material never appears in error messages. Paths and
//! document identifiers are included so a failed run can be resumed by hand.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for bankdocs operations.
///
/// # Security
/// Private keys and access tokens are never included in error output.
#[derive(Debug, Error)]
pub enum BankDocsError {
    /// The service-account credential file does not exist
    #[error("Credential file not found: {}", path.display())]
    MissingCredential {
        /// Path that was checked
        path: PathBuf,
    },

    /// The credential file exists but cannot be used
    #[error("Invalid service-account credential: {context}")]
    InvalidCredential {
        /// What was wrong with the key file
        context: String,
    },

    /// An input file is not syntactically valid JSON
    #[error("Invalid JSON: {context}")]
    InvalidJson {
        /// Which input failed to parse
        context: String,
        /// Underlying parser error
        #[source]
        source: serde_json::Error,
    },

    /// Import document has the wrong shape
    #[error("Import document rejected with {} error(s): {}", errors.len(), errors.join("; "))]
    InvalidImport {
        /// Field-level shape violations
        errors: Vec<String>,
    },

    /// JWT signing or OAuth token exchange failed
    #[error("Authentication failed: {context}")]
    Authentication {
        /// Stage of the exchange that failed
        context: String,
        /// Underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A single remote document write failed
    #[error("Write to {collection}/{document_id} failed: {context}")]
    RemoteWrite {
        /// Target collection
        collection: String,
        /// Target document identifier
        document_id: String,
        /// Transport or server error description
        context: String,
    },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human readable description
        message: String,
    },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        /// Operation that failed
        context: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        /// What was being (de)serialized
        context: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with BankDocsError
pub type Result<T> = std::result::Result<T, BankDocsError>;

impl BankDocsError {
    /// Creates a missing credential error for the given path
    pub fn missing_credential(path: impl Into<PathBuf>) -> Self {
        Self::MissingCredential { path: path.into() }
    }

    /// Creates an invalid credential error
    pub fn invalid_credential(context: impl Into<String>) -> Self {
        Self::InvalidCredential {
            context: context.into(),
        }
    }

    /// Creates an invalid JSON error naming the offending file
    pub fn invalid_json(path: &Path, source: serde_json::Error) -> Self {
        Self::InvalidJson {
            context: format!("{} is not valid JSON", path.display()),
            source,
        }
    }

    /// Creates an authentication error with context
    pub fn authentication<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Authentication {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a remote write error for one document
    pub fn remote_write(
        collection: impl Into<String>,
        document_id: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::RemoteWrite {
            collection: collection.into(),
            document_id: document_id.into(),
            context: context.into(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error naming the path involved
    pub fn io(action: &str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            context: format!("Failed to {} {}", action, path.display()),
            source,
        }
    }

    /// Returns true when the process should exit with status 1 without a report.
    pub const fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_message() {
        let error = BankDocsError::missing_credential("serviceAccountKey.json");
        assert!(error.to_string().contains("serviceAccountKey.json"));
        assert!(error.is_missing_credential());
    }

    #[test]
    fn test_invalid_import_lists_errors() {
        let error = BankDocsError::InvalidImport {
            errors: vec!["users must be an object".into(), "bad id".into()],
        };
        let message = error.to_string();
        assert!(message.contains("2 error(s)"));
        assert!(message.contains("users must be an object; bad id"));
        assert!(!error.is_missing_credential());
    }

    #[test]
    fn test_invalid_json_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = BankDocsError::invalid_json(Path::new("data.json"), source);
        assert!(error.to_string().contains("data.json"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_remote_write_names_document() {
        let error = BankDocsError::remote_write("users", "u1", "HTTP 403");
        assert_eq!(error.to_string(), "Write to users/u1 failed: HTTP 403");
    }

    #[test]
    fn test_error_creation() {
        let error = BankDocsError::configuration("collections cannot be empty");
        assert!(error.to_string().contains("collections cannot be empty"));

        let error = BankDocsError::invalid_credential("not a service account");
        assert!(error.to_string().contains("not a service account"));
    }
}
