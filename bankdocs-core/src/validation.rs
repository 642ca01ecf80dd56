//! JSON Schema validation for import documents.
//!
//! Only the *shape* an import needs is checked: every recognized collection
//! must map document ids to objects, and ids must be usable as a single
//! path segment. Field contents are written verbatim and never validated.
//!
//! # Example
//! ```rust
//! use bankdocs_core::validation::validate_import_document;
//! use serde_json::json;
//!
//! let document = json!({ "users": { "u1": { "fullName": "A" } } });
//! let collections = vec!["users".to_string(), "accounts".to_string()];
//! assert!(validate_import_document(&document, &collections).is_ok());
//! ```

use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

/// Import shape validation errors with field-level reporting
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Embedded schema failed to compile
    #[error("JSON Schema compilation failed: {message}")]
    SchemaCompilation {
        /// Compiler message
        message: String,
    },

    /// Document violates the import shape
    #[error("Import validation failed with {} errors: {errors:?}", errors.len())]
    ValidationFailed {
        /// One message per violation, prefixed with its collection
        errors: Vec<String>,
    },
}

impl From<ValidationError> for crate::error::BankDocsError {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::SchemaCompilation { message } => Self::configuration(message),
            ValidationError::ValidationFailed { errors } => Self::InvalidImport { errors },
        }
    }
}

/// Shape of one recognized collection: document id -> document object
const COLLECTION_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Import collection",
  "type": "object",
  "propertyNames": {
    "type": "string",
    "pattern": "^[^/]+$"
  },
  "additionalProperties": { "type": "object" }
}"#;

/// Compiled collection schema (initialized once)
static COMPILED_SCHEMA: OnceLock<Validator> = OnceLock::new();

fn collection_validator() -> Result<&'static Validator, ValidationError> {
    if let Some(validator) = COMPILED_SCHEMA.get() {
        return Ok(validator);
    }

    let schema_json: Value =
        serde_json::from_str(COLLECTION_SCHEMA).map_err(|e| ValidationError::SchemaCompilation {
            message: format!("Failed to parse embedded schema: {}", e),
        })?;

    let compiled =
        jsonschema::validator_for(&schema_json).map_err(|e| ValidationError::SchemaCompilation {
            message: format!("Schema compilation error: {}", e),
        })?;

    // Another caller may have won the race; either instance is equivalent.
    let _ = COMPILED_SCHEMA.set(compiled);
    COMPILED_SCHEMA
        .get()
        .ok_or_else(|| ValidationError::SchemaCompilation {
            message: "Schema validator unavailable after initialization".to_string(),
        })
}

/// Validates the shape of an import document.
///
/// Keys that are not in `collections` are ignored, and recognized keys may be
/// absent.
///
/// # Errors
/// Returns `ValidationFailed` listing every violation found.
pub fn validate_import_document(
    document: &Value,
    collections: &[String],
) -> Result<(), ValidationError> {
    let Some(root) = document.as_object() else {
        return Err(ValidationError::ValidationFailed {
            errors: vec!["top-level value must be an object".to_string()],
        });
    };

    let validator = collection_validator()?;
    let mut errors = Vec::new();

    for name in collections {
        let Some(entries) = root.get(name) else {
            continue;
        };
        errors.extend(
            validator
                .iter_errors(entries)
                .map(|error| format!("'{}': {}", name, error)),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::ValidationFailed { errors })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recognized() -> Vec<String> {
        vec!["users".to_string(), "accounts".to_string()]
    }

    #[test]
    fn test_valid_document_passes() {
        let document = json!({
            "users": { "u1": { "fullName": "A" } },
            "accounts": {}
        });
        assert!(validate_import_document(&document, &recognized()).is_ok());
    }

    #[test]
    fn test_missing_and_unknown_keys_are_ignored() {
        let document = json!({ "branches": [1, 2, 3] });
        assert!(validate_import_document(&document, &recognized()).is_ok());
    }

    #[test]
    fn test_non_object_root_fails() {
        let err = validate_import_document(&json!([1, 2]), &recognized()).unwrap_err();
        assert!(err.to_string().contains("top-level"));
    }

    #[test]
    fn test_collection_must_be_object_of_objects() {
        let document = json!({
            "users": ["u1"],
            "accounts": { "a1": 5 }
        });
        let err = validate_import_document(&document, &recognized()).unwrap_err();
        assert!(matches!(
            &err,
            ValidationError::ValidationFailed { errors }
                if errors.len() == 2
                    && errors[0].starts_with("'users'")
                    && errors[1].starts_with("'accounts'")
        ));
    }

    #[test]
    fn test_document_ids_cannot_contain_slash_or_be_empty() {
        let slash = json!({ "users": { "a/b": {} } });
        assert!(validate_import_document(&slash, &recognized()).is_err());

        let empty = json!({ "accounts": { "": {} } });
        assert!(validate_import_document(&empty, &recognized()).is_err());

        let fine = json!({ "accounts": { "acc-01.main": {} } });
        assert!(validate_import_document(&fine, &recognized()).is_ok());
    }

    #[test]
    fn test_converts_into_invalid_import() {
        let err = validate_import_document(&json!("text"), &recognized()).unwrap_err();
        let converted: crate::error::BankDocsError = err.into();
        assert!(matches!(
            converted,
            crate::error::BankDocsError::InvalidImport { .. }
        ));
    }
}
