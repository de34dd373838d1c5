//! Bearer-token cache for the catalog API.
//!
//! Tokens come from a client-credentials exchange and are cached until
//! shortly before the server-declared expiry. The cache is a mutex-guarded
//! single slot; the lock is never held across an await, so concurrent
//! callers may race to refresh and the last write wins. That duplicate
//! exchange is tolerated at this call frequency.

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Refresh this long before the server-declared expiry.
const TOKEN_SAFETY_MARGIN: Duration = Duration::from_secs(300);

const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("token exchange request failed: {0}")]
    Transport(String),

    #[error("token endpoint returned status {0}")]
    Status(u16),

    #[error("malformed token response: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: Instant,
}

/// One token exchange against the authorization endpoint. Abstracted so
/// tests can count and fail exchanges without a network.
#[async_trait]
pub trait TokenTransport: Send + Sync {
    async fn request_token(&self) -> Result<TokenResponse, AuthenticationError>;
}

/// Production transport: `POST /api/token` with a basic-auth header built
/// from the client id and secret.
pub struct HttpTokenTransport {
    http: reqwest::Client,
    token_url: String,
    auth_header: String,
}

impl HttpTokenTransport {
    pub fn new(token_url: &str, client_id: &str, client_secret: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(TOKEN_REQUEST_TIMEOUT)
            .build()?;
        let credentials =
            base64::engine::general_purpose::STANDARD.encode(format!("{client_id}:{client_secret}"));
        Ok(Self {
            http,
            token_url: token_url.to_string(),
            auth_header: format!("Basic {credentials}"),
        })
    }
}

#[async_trait]
impl TokenTransport for HttpTokenTransport {
    async fn request_token(&self) -> Result<TokenResponse, AuthenticationError> {
        let response = self
            .http
            .post(&self.token_url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| AuthenticationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthenticationError::Status(response.status().as_u16()));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthenticationError::Malformed(e.to_string()))
    }
}

pub struct TokenCache {
    transport: Arc<dyn TokenTransport>,
    cached: Mutex<Option<AccessToken>>,
    safety_margin: Duration,
}

impl TokenCache {
    pub fn new(transport: Arc<dyn TokenTransport>) -> Self {
        Self::with_safety_margin(transport, TOKEN_SAFETY_MARGIN)
    }

    pub fn with_safety_margin(transport: Arc<dyn TokenTransport>, safety_margin: Duration) -> Self {
        Self {
            transport,
            cached: Mutex::new(None),
            safety_margin,
        }
    }

    /// Return a valid token, from cache when possible.
    ///
    /// A refresh failure is returned as-is, with no internal retry; the
    /// next call starts a fresh exchange.
    pub async fn access_token(&self) -> Result<String, AuthenticationError> {
        if let Some(token) = self.cached.lock().unwrap().as_ref() {
            if Instant::now() < token.expires_at {
                debug!("Using cached catalog token");
                return Ok(token.value.clone());
            }
        }

        info!("Fetching new catalog access token...");
        let response = self.transport.request_token().await?;
        let token = AccessToken {
            value: response.access_token,
            expires_at: Instant::now()
                + Duration::from_secs(response.expires_in).saturating_sub(self.safety_margin),
        };
        info!("New catalog token obtained (valid for {}s)", response.expires_in);

        let value = token.value.clone();
        *self.cached.lock().unwrap() = Some(token);
        Ok(value)
    }

    /// Drop any cached token; the next call refreshes.
    pub fn clear(&self) {
        *self.cached.lock().unwrap() = None;
        info!("Catalog token cache cleared");
    }
}
