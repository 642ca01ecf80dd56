//! Data loader configuration.

use crate::Result;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Service-account key expected in the run directory
pub const DEFAULT_CREDENTIAL_FILE: &str = "serviceAccountKey.json";

/// Import file read when no path is given
pub const DEFAULT_IMPORT_FILE: &str = "test_account.json";

/// Firestore database written to unless overridden
pub const DEFAULT_DATABASE_ID: &str = "(default)";

/// Top-level keys recognized in import files, in write order
pub const DEFAULT_COLLECTIONS: [&str; 2] = ["users", "accounts"];

/// Configuration for a JSON import run.
///
/// # Security
/// Only the credential path is stored; the key is loaded on initialization.
///
/// # Example
/// ```rust
/// use bankdocs_core::config::ImportConfig;
///
/// let config = ImportConfig::new("seed.json".into())
///     .with_project_id("ibanking-ffbb9".to_string());
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.collections, ["users", "accounts"]);
/// ```
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Service-account key file
    pub credential_path: PathBuf,
    /// JSON file to import
    pub input_path: PathBuf,
    /// Project override; defaults to the key's project
    pub project_id: Option<String>,
    /// Firestore database identifier
    pub database_id: String,
    /// Recognized top-level keys, each written to the same-named collection
    pub collections: Vec<String>,
    /// Validate and count without writing
    pub dry_run: bool,
    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            credential_path: PathBuf::from(DEFAULT_CREDENTIAL_FILE),
            input_path: PathBuf::from(DEFAULT_IMPORT_FILE),
            project_id: None,
            database_id: DEFAULT_DATABASE_ID.to_string(),
            collections: DEFAULT_COLLECTIONS.iter().map(ToString::to_string).collect(),
            dry_run: false,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl std::fmt::Display for ImportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ImportConfig({} -> [{}]{}{})",
            self.input_path.display(),
            self.collections.join(", "),
            self.project_id
                .as_ref()
                .map_or_else(String::new, |p| format!(" in {}", p)),
            if self.dry_run { " dry-run" } else { "" }
        )
    }
}

impl ImportConfig {
    /// Creates an import config for `input_path` with default settings.
    pub fn new(input_path: PathBuf) -> Self {
        Self {
            input_path,
            ..Default::default()
        }
    }

    /// Validates configuration values.
    ///
    /// # Errors
    /// Returns `Configuration` if values are empty or out of range.
    pub fn validate(&self) -> Result<()> {
        if self.collections.is_empty() {
            return Err(crate::error::BankDocsError::configuration(
                "at least one collection must be recognized",
            ));
        }

        if let Some(bad) = self
            .collections
            .iter()
            .find(|c| c.trim().is_empty() || c.contains('/'))
        {
            return Err(crate::error::BankDocsError::configuration(format!(
                "invalid collection name '{}'",
                bad
            )));
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = self.collections.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(crate::error::BankDocsError::configuration(format!(
                "collection '{}' is listed more than once",
                duplicate
            )));
        }

        if self.database_id.trim().is_empty() {
            return Err(crate::error::BankDocsError::configuration(
                "database id cannot be empty",
            ));
        }

        if let Some(project) = &self.project_id
            && project.trim().is_empty()
        {
            return Err(crate::error::BankDocsError::configuration(
                "project id cannot be empty",
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(crate::error::BankDocsError::configuration(
                "request_timeout must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Builder method to set the credential file.
    pub fn with_credential_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credential_path = path.into();
        self
    }

    /// Builder method to override the project.
    pub fn with_project_id(mut self, project_id: String) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Builder method to set the database.
    pub fn with_database_id(mut self, database_id: String) -> Self {
        self.database_id = database_id;
        self
    }

    /// Builder method to replace the recognized collections.
    pub fn with_collections(mut self, collections: Vec<String>) -> Self {
        self.collections = collections;
        self
    }

    /// Builder method to enable dry-run mode.
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
