//! JSON file import into the document store.
//!
//! Each entry under a recognized top-level key becomes one document in the
//! same-named collection, keyed by its JSON key. Writes are sequential and
//! independent: there is no transaction, rollback or retry, so a failed write
//! leaves the documents before it in place and never attempts the ones after.

use crate::error::BankDocsError;
use crate::firestore::DocumentStore;
use crate::validation::validate_import_document;
use crate::Result;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, error, info};

/// Number of documents written per collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    collections: Vec<(String, usize)>,
}

impl ImportSummary {
    /// Documents written to `collection` (0 when it was absent or empty).
    pub fn written(&self, collection: &str) -> usize {
        self.collections
            .iter()
            .find(|(name, _)| name == collection)
            .map_or(0, |(_, count)| *count)
    }

    /// Documents written across all collections.
    pub fn total(&self) -> usize {
        self.collections
            .iter()
            .fold(0usize, |acc, (_, count)| acc.saturating_add(*count))
    }

    /// Per-collection counts in write order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.collections
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
    }

    fn record(&mut self, collection: &str, count: usize) {
        self.collections.push((collection.to_string(), count));
    }
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(name, count)| format!("{}: {}", name, count))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Parses import file contents.
///
/// # Errors
/// Returns `InvalidJson` naming `path` when the contents are not JSON.
pub fn parse_import_document(contents: &str, path: &Path) -> Result<Value> {
    serde_json::from_str(contents).map_err(|e| BankDocsError::invalid_json(path, e))
}

/// Reads, validates and imports the JSON file at `path`.
///
/// # Errors
/// - `Io` if the file cannot be read
/// - `InvalidJson` if it is not JSON (no writes are made)
/// - `InvalidImport` if a recognized collection has the wrong shape (no writes)
/// - `RemoteWrite` from the first failing write (earlier writes remain)
pub async fn import_file(
    path: &Path,
    store: &dyn DocumentStore,
    collections: &[String],
) -> Result<ImportSummary> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| BankDocsError::io("read", path, e))?;
    let document = parse_import_document(&contents, path)?;
    import_document(&document, store, collections).await
}

/// Imports an already-parsed document.
///
/// The shape of every recognized collection is validated before the first
/// write, so a non-object entry anywhere rejects the whole file. Absent and
/// empty collections are reported with a count of 0.
pub async fn import_document(
    document: &Value,
    store: &dyn DocumentStore,
    collections: &[String],
) -> Result<ImportSummary> {
    validate_import_document(document, collections)?;

    info!("Importing into {}", store.describe());
    let mut summary = ImportSummary::default();

    for collection in collections {
        let Some(entries) = document.get(collection).and_then(Value::as_object) else {
            debug!("No '{}' key in import file, skipping", collection);
            summary.record(collection, 0);
            continue;
        };

        // Entries were validated as objects above.
        let documents = entries
            .iter()
            .filter_map(|(id, data)| data.as_object().map(|fields| (id, fields)));

        let mut written = 0usize;
        for (document_id, fields) in documents {
            if let Err(e) = store.set_document(collection, document_id, fields).await {
                error!(
                    "Import aborted after {} successful write(s)",
                    summary.total().saturating_add(written)
                );
                return Err(e);
            }

            written = written.saturating_add(1);
            info!("✓ Imported {}/{}", collection, document_id);
        }

        summary.record(collection, written);
    }

    info!("✓ Import completed: {}", summary);
    Ok(summary)
}
