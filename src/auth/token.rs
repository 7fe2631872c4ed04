use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::{Client, RequestBuilder, header};
use tokio::sync::Mutex;

use crate::auth::credentials::{
    basic_auth_header, fetch_client_credentials_token_with_expiry, now_secs,
};
use crate::config::AuthMethod;
use crate::error::{ConnectorError, Result};
use crate::resource::kind::API_PREFIX;

/// Seconds before expiry at which a cached token stops being reused.
pub const REFRESH_SKEW_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: u64,
}

impl CachedToken {
    pub fn is_valid_at(&self, now: u64) -> bool {
        now + REFRESH_SKEW_SECS < self.expires_at
    }
}

#[derive(Debug, Default)]
struct TokenState {
    cached: Option<CachedToken>,
    /// Outcome of the most recent refresh, handed to callers that queued
    /// behind it.
    last_outcome: Option<std::result::Result<String, String>>,
}

/// Client-credentials token cache.
///
/// The check-fetch-store sequence runs under one async mutex, so at most one
/// token request is in flight. Callers that queued while a refresh was
/// running receive that refresh's outcome instead of starting another.
pub struct TokenProvider {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    state: Mutex<TokenState>,
    refreshes: AtomicU64,
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl TokenProvider {
    pub fn new(client: Client, base_url: &str, client_id: &str, client_secret: &str) -> Self {
        Self {
            client,
            token_url: token_url(base_url),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            state: Mutex::new(TokenState::default()),
            refreshes: AtomicU64::new(0),
        }
    }

    /// Return a token valid for at least `REFRESH_SKEW_SECS`, fetching a new
    /// one if needed.
    pub async fn get_valid_token(&self) -> Result<String> {
        let observed = self.refreshes.load(Ordering::Acquire);
        let mut state = self.state.lock().await;

        if let Some(cached) = &state.cached {
            if cached.is_valid_at(now_secs()) {
                return Ok(cached.access_token.clone());
            }
        }

        if self.refreshes.load(Ordering::Acquire) != observed {
            if let Some(outcome) = &state.last_outcome {
                log::debug!("reusing outcome of concurrent token refresh");
                return outcome
                    .clone()
                    .map_err(|message| ConnectorError::TokenAcquisitionFailed { message });
            }
        }

        log::debug!("requesting access token from {}", self.token_url);
        let fetched = fetch_client_credentials_token_with_expiry(
            &self.client,
            &self.token_url,
            &self.client_id,
            &self.client_secret,
        )
        .await;

        let outcome = match fetched {
            Ok(token) => {
                let access_token = token.access_token.clone();
                state.cached = Some(CachedToken {
                    access_token: token.access_token,
                    expires_at: token.expires_at,
                });
                Ok(access_token)
            }
            Err(message) => {
                log::error!("access token request failed: {message}");
                state.cached = None;
                Err(message)
            }
        };

        state.last_outcome = Some(outcome.clone());
        self.refreshes.fetch_add(1, Ordering::AcqRel);

        outcome.map_err(|message| ConnectorError::TokenAcquisitionFailed { message })
    }
}

/// Token endpoint below the service address.
pub fn token_url(base_url: &str) -> String {
    format!("{}{}/oauth/token", base_url.trim_end_matches('/'), API_PREFIX)
}

/// Attaches the configured `Authorization` header to outbound requests.
/// The strategy is fixed at construction.
#[derive(Debug)]
pub enum CredentialProvider {
    None,
    Basic { header: String },
    OAuth2(TokenProvider),
}

impl CredentialProvider {
    pub fn new(method: &AuthMethod, client: &Client, base_url: &str) -> Self {
        match method {
            AuthMethod::None => CredentialProvider::None,
            AuthMethod::Basic { username, password } => CredentialProvider::Basic {
                header: basic_auth_header(username, password),
            },
            AuthMethod::OAuth2ClientCredentials {
                client_id,
                client_secret,
            } => CredentialProvider::OAuth2(TokenProvider::new(
                client.clone(),
                base_url,
                client_id,
                client_secret,
            )),
        }
    }

    /// `Authorization` header value for the next request, if any.
    pub async fn authorization_header(&self) -> Result<Option<String>> {
        match self {
            CredentialProvider::None => Ok(None),
            CredentialProvider::Basic { header } => Ok(Some(header.clone())),
            CredentialProvider::OAuth2(provider) => {
                let token = provider.get_valid_token().await?;
                Ok(Some(format!("Bearer {token}")))
            }
        }
    }

    pub async fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        Ok(match self.authorization_header().await? {
            Some(value) => builder.header(header::AUTHORIZATION, value),
            None => builder,
        })
    }
}
