//! OAuth access tokens for a service account.
//!
//! A signed RS256 assertion is exchanged at the key's token endpoint using
//! the JWT bearer grant. The resulting token is cached and refreshed shortly
//! before it expires.

use super::credentials::ServiceAccountKey;
use crate::error::BankDocsError;
use crate::Result;
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;
use zeroize::Zeroizing;

/// OAuth scope granting Firestore access
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each assertion (the endpoint maximum)
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens closer than this to expiry are refreshed before use
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AssertionClaims {
    pub(crate) iss: String,
    pub(crate) scope: String,
    pub(crate) aud: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Token endpoint answered with a non-success status
#[derive(Debug, Error)]
#[error("token endpoint returned {status}: {body}")]
struct TokenRejected {
    status: reqwest::StatusCode,
    body: String,
}

struct CachedToken {
    value: Zeroizing<String>,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now.checked_add_signed(TimeDelta::seconds(REFRESH_MARGIN_SECS))
            .is_some_and(|deadline| deadline < self.expires_at)
    }
}

/// Issues and caches access tokens for one service account.
pub struct TokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("client_email", &self.key.client_email)
            .field("token_uri", &self.key.token_uri)
            .finish_non_exhaustive()
    }
}

impl TokenProvider {
    /// Prepares a provider; the PEM key is decoded once here.
    ///
    /// # Errors
    /// Returns `InvalidCredential` if the private key is not a valid RSA PEM.
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Result<Self> {
        let encoding_key =
            EncodingKey::from_rsa_pem(key.private_key_pem().as_bytes()).map_err(|e| {
                BankDocsError::invalid_credential(format!(
                    "private key is not a valid RSA PEM: {}",
                    e
                ))
            })?;

        Ok(Self {
            key,
            encoding_key,
            http,
            cached: Mutex::new(None),
        })
    }

    /// Signs the bearer assertion sent to the token endpoint.
    pub fn signed_assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: DATASTORE_SCOPE.to_string(),
            aud: self.key.token_uri.clone(),
            iat,
            exp: iat.saturating_add(ASSERTION_LIFETIME_SECS),
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.key.private_key_id);

        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| BankDocsError::authentication("failed to sign token assertion", e))
    }

    /// Returns a valid access token, exchanging a new one when needed.
    ///
    /// # Errors
    /// Returns `Authentication` if signing or the token exchange fails.
    pub async fn access_token(&self) -> Result<Zeroizing<String>> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref()
            && token.is_fresh(now)
        {
            return Ok(token.value.clone());
        }

        debug!("Requesting access token for {}", self.key.client_email);
        let token = self.exchange(now).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn exchange(&self, now: DateTime<Utc>) -> Result<CachedToken> {
        let assertion = Zeroizing::new(self.signed_assertion(now)?);

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| BankDocsError::authentication("token request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BankDocsError::authentication(
                "token exchange rejected",
                TokenRejected { status, body },
            ));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| BankDocsError::authentication("malformed token response", e))?;

        Ok(CachedToken {
            value: Zeroizing::new(parsed.access_token),
            expires_at: token_expiry(now, parsed.expires_in),
        })
    }
}

/// Expiry for a token issued at `now`. Lifetimes that cannot be represented
/// expire immediately, forcing a new exchange on next use.
fn token_expiry(now: DateTime<Utc>, expires_in: Option<i64>) -> DateTime<Utc> {
    TimeDelta::try_seconds(expires_in.unwrap_or(ASSERTION_LIFETIME_SECS))
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .unwrap_or(now)
}
