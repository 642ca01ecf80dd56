//! Remote document database access.
//!
//! # Module Structure
//! - `credentials`: Service-account key parsing with zeroized key material
//! - `auth`: JWT bearer token exchange and caching
//! - `value`: JSON to Firestore value encoding
//! - `client`: REST client implementing [`DocumentStore`]
//! - `slot`: Construct-once holder for the process's store handle

use crate::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;

pub mod auth;
pub mod client;
pub mod credentials;
pub mod slot;
pub mod value;

pub use client::FirestoreClient;
pub use credentials::ServiceAccountKey;
pub use slot::ClientSlot;

/// A collection-oriented document store.
///
/// # Object Safety
/// This trait is object-safe so the import pipeline can run against
/// `Arc<dyn DocumentStore>` and tests can substitute in-memory fakes.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes `fields` as the document `collection/document_id`.
    ///
    /// Any existing document at that identifier is fully replaced, never
    /// merged.
    ///
    /// # Errors
    /// Returns `RemoteWrite` when the store rejects or cannot receive the write.
    async fn set_document(
        &self,
        collection: &str,
        document_id: &str,
        fields: &Map<String, Value>,
    ) -> Result<()>;

    /// Short description of the target, for log lines.
    fn describe(&self) -> String;
}

/// Store that accepts every write without sending it anywhere.
///
/// Used by `--dry-run` to exercise parsing, validation and counting
/// without a credential.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunStore;

#[async_trait]
impl DocumentStore for DryRunStore {
    async fn set_document(
        &self,
        collection: &str,
        document_id: &str,
        fields: &Map<String, Value>,
    ) -> Result<()> {
        info!(
            "[dry-run] would write {}/{} ({} fields)",
            collection,
            document_id,
            fields.len()
        );
        Ok(())
    }

    fn describe(&self) -> String {
        "dry run (no remote writes)".to_string()
    }
}
