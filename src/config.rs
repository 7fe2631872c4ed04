use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::LogLevel;
use crate::error::{ConnectorError, Result};

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;
const DEFAULT_PAGE_SIZE: usize = 50;

/// Connector settings, usually loaded from a JSON file.
#[derive(Clone, Deserialize)]
pub struct ConnectorConfig {
    /// Base address of the remote service, e.g. `https://library.example.org`.
    pub service_address: String,
    /// Skip certificate-chain and hostname validation. Insecure; off by default.
    #[serde(default)]
    pub trust_all_certificates: bool,
    /// `basic`, `oauth2` or `none`.
    pub auth_strategy: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// Records requested per search page when the caller gives no hint.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_read_timeout() -> u64 {
    DEFAULT_READ_TIMEOUT_SECS
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Authentication strategy resolved from a validated configuration.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    None,
    Basic {
        username: String,
        password: String,
    },
    OAuth2ClientCredentials {
        client_id: String,
        client_secret: String,
    },
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMethod::None => f.write_str("None"),
            AuthMethod::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            AuthMethod::OAuth2ClientCredentials { client_id, .. } => f
                .debug_struct("OAuth2ClientCredentials")
                .field("client_id", client_id)
                .field("client_secret", &"***")
                .finish(),
        }
    }
}

impl ConnectorConfig {
    /// Minimal configuration for a service address and strategy; the
    /// remaining fields take their defaults.
    pub fn new(service_address: impl Into<String>, auth_strategy: impl Into<String>) -> Self {
        Self {
            service_address: service_address.into(),
            trust_all_certificates: false,
            auth_strategy: auth_strategy.into(),
            username: None,
            password: None,
            client_id: None,
            client_secret: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            log_level: LogLevel::default(),
        }
    }

    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        self.auth_strategy = "basic".to_string();
        self.username = Some(username.to_string());
        self.password = Some(password.to_string());
        self
    }

    pub fn with_client_credentials(mut self, client_id: &str, client_secret: &str) -> Self {
        self.auth_strategy = "oauth2".to_string();
        self.client_id = Some(client_id.to_string());
        self.client_secret = Some(client_secret.to_string());
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn with_trust_all_certificates(mut self, trust_all: bool) -> Self {
        self.trust_all_certificates = trust_all;
        self
    }

    /// Service address without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.service_address.trim().trim_end_matches('/')
    }

    /// Check mandatory fields and resolve the authentication strategy.
    pub fn validate(&self) -> Result<AuthMethod> {
        let address = self.service_address.trim();
        if address.is_empty() {
            return Err(ConnectorError::invalid_config("service_address is required"));
        }
        if !(address.starts_with("http://") || address.starts_with("https://")) {
            return Err(ConnectorError::invalid_config(format!(
                "service_address must be an http(s) URL, got '{address}'"
            )));
        }
        if self.page_size == 0 {
            return Err(ConnectorError::invalid_config("page_size must be greater than zero"));
        }

        match self.auth_strategy.trim().to_ascii_lowercase().as_str() {
            "" => Err(ConnectorError::invalid_config("auth_strategy is required")),
            "none" => Ok(AuthMethod::None),
            "basic" => Ok(AuthMethod::Basic {
                username: required(&self.username, "username", "basic")?,
                password: required(&self.password, "password", "basic")?,
            }),
            "oauth2" => Ok(AuthMethod::OAuth2ClientCredentials {
                client_id: required(&self.client_id, "client_id", "oauth2")?,
                client_secret: required(&self.client_secret, "client_secret", "oauth2")?,
            }),
            other => Err(ConnectorError::invalid_config(format!(
                "unknown auth_strategy '{other}', expected basic, oauth2 or none"
            ))),
        }
    }
}

fn required(value: &Option<String>, field: &str, strategy: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(ConnectorError::invalid_config(format!(
            "{field} is required for the {strategy} auth strategy"
        ))),
    }
}

impl std::fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorConfig")
            .field("service_address", &self.service_address)
            .field("trust_all_certificates", &self.trust_all_certificates)
            .field("auth_strategy", &self.auth_strategy)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .field("page_size", &self.page_size)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// `<platform config dir>/ils-connector/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("ils-connector");
    path.push("config.json");
    Some(path)
}

/// Read and validate a JSON configuration file.
pub fn load_config(path: &Path) -> Result<ConnectorConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ConnectorError::invalid_config(format!("Failed to read {}: {e}", path.display()))
    })?;
    let config: ConnectorConfig = serde_json::from_str(&contents).map_err(|e| {
        ConnectorError::invalid_config(format!("Invalid {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}
