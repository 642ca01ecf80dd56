//! Cloud Firestore REST client.
//!
//! # Security Features
//! - Access tokens are held in zeroizing buffers and never logged
//! - Request timeouts bound every remote call
//! - Error bodies are reduced to the server's status message

use super::DocumentStore;
use super::auth::TokenProvider;
use super::credentials::ServiceAccountKey;
use super::value::document_body;
use crate::config::ImportConfig;
use crate::error::BankDocsError;
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

/// Base URL of the Firestore REST API
pub const FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com/v1";

/// Authenticated handle to one Firestore database.
#[derive(Debug)]
pub struct FirestoreClient {
    http: reqwest::Client,
    auth: TokenProvider,
    base_url: Url,
    project_id: String,
    database_id: String,
}

impl FirestoreClient {
    /// Creates a client for the key's project (or the configured override).
    ///
    /// No network traffic happens until the first write.
    ///
    /// # Errors
    /// - `InvalidCredential` if the private key cannot be decoded
    /// - `Configuration` if the HTTP client cannot be built
    pub fn new(key: ServiceAccountKey, config: &ImportConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                BankDocsError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        let project_id = config
            .project_id
            .clone()
            .unwrap_or_else(|| key.project_id.clone());

        let base_url = Url::parse(FIRESTORE_API_BASE).map_err(|e| {
            BankDocsError::configuration(format!("Invalid Firestore API base URL: {}", e))
        })?;

        Ok(Self {
            auth: TokenProvider::new(key, http.clone())?,
            http,
            base_url,
            project_id,
            database_id: config.database_id.clone(),
        })
    }

    /// Project the client writes to.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn document_url(&self, collection: &str, document_id: &str) -> Result<Url> {
        document_url(
            &self.base_url,
            &self.project_id,
            &self.database_id,
            collection,
            document_id,
        )
    }
}

/// Builds the REST URL of a document; every segment is percent-encoded.
pub fn document_url(
    base: &Url,
    project_id: &str,
    database_id: &str,
    collection: &str,
    document_id: &str,
) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| BankDocsError::configuration("Firestore base URL cannot have a path"))?
        .pop_if_empty()
        .extend([
            "projects",
            project_id,
            "databases",
            database_id,
            "documents",
            collection,
            document_id,
        ]);
    Ok(url)
}

#[derive(Deserialize)]
struct GoogleErrorBody {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

/// Reduces an error response body to `STATUS: message` when it is Google's JSON shape.
fn summarize_error_body(body: &str) -> String {
    match serde_json::from_str::<GoogleErrorBody>(body) {
        Ok(parsed) if !parsed.error.status.is_empty() => {
            format!("{}: {}", parsed.error.status, parsed.error.message)
        }
        Ok(parsed) => parsed.error.message,
        Err(_) => body.trim().chars().take(200).collect(),
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn set_document(
        &self,
        collection: &str,
        document_id: &str,
        fields: &Map<String, Value>,
    ) -> Result<()> {
        let url = self.document_url(collection, document_id)?;
        let token = self.auth.access_token().await?;

        debug!("PATCH {}/{}", collection, document_id);
        // No updateMask: the document is created or fully replaced.
        let response = self
            .http
            .patch(url)
            .bearer_auth(token.as_str())
            .json(&document_body(fields))
            .send()
            .await
            .map_err(|e| BankDocsError::remote_write(collection, document_id, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(BankDocsError::remote_write(
            collection,
            document_id,
            format!("HTTP {}: {}", status, summarize_error_body(&body)),
        ))
    }

    fn describe(&self) -> String {
        format!(
            "Firestore project '{}' (database {})",
            self.project_id, self.database_id
        )
    }
}
