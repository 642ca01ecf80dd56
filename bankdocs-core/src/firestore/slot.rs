//! Construct-once holder for the document store handle.
//!
//! The binary owns exactly one [`ClientSlot`]. The first successful
//! initialization stores the handle; later calls are benign duplicates that
//! log and hand back the same handle.

use super::{DocumentStore, FirestoreClient, ServiceAccountKey};
use crate::config::ImportConfig;
use crate::Result;
use std::sync::Arc;
use tracing::info;

/// Optional, set-once document store handle.
#[derive(Default)]
pub struct ClientSlot {
    handle: Option<Arc<dyn DocumentStore>>,
}

impl std::fmt::Debug for ClientSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSlot")
            .field(
                "handle",
                &self.handle.as_ref().map(|store| store.describe()),
            )
            .finish()
    }
}

impl ClientSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a handle has been stored.
    pub fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    /// The stored handle, if any.
    pub fn handle(&self) -> Option<Arc<dyn DocumentStore>> {
        self.handle.clone()
    }

    /// Initializes the slot with a Firestore client built from the credential file.
    ///
    /// # Errors
    /// - `MissingCredential` if the key file does not exist
    /// - `InvalidCredential` if it cannot be used
    pub fn initialize(&mut self, config: &ImportConfig) -> Result<Arc<dyn DocumentStore>> {
        self.initialize_with(|| {
            let key = ServiceAccountKey::from_file(&config.credential_path)?;
            let client = FirestoreClient::new(key, config)?;
            info!("✓ Firestore client initialized with service account");
            Ok(Arc::new(client))
        })
    }

    /// Initializes the slot with a handle produced by `factory`.
    ///
    /// When the slot is already filled, `factory` is not called and the
    /// existing handle is returned.
    pub fn initialize_with<F>(&mut self, factory: F) -> Result<Arc<dyn DocumentStore>>
    where
        F: FnOnce() -> Result<Arc<dyn DocumentStore>>,
    {
        if let Some(existing) = &self.handle {
            info!("Client already initialized: {}", existing.describe());
            return Ok(Arc::clone(existing));
        }

        let store = factory()?;
        self.handle = Some(Arc::clone(&store));
        Ok(store)
    }
}
