/// Bearer and static credential handling for the remote API.
pub mod auth;
/// Connector configuration and validation.
pub mod config;
/// Provisioning facade over the person and category resources.
pub mod connector;
/// Error taxonomy and HTTP status classification.
pub mod error;
/// Inbound search filters and their translation to query parameters.
pub mod filter;
/// Resource access, value coding and record mapping.
pub mod resource;
/// Attribute descriptor tables.
pub mod schema;

pub use config::ConnectorConfig;
pub use connector::Connector;
pub use error::{ConnectorError, ErrorKind, Result};

/// Logging verbosity for connector operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Emit verbose request tracing (urls, pages, payload keys).
    Debug,
    /// Emit standard informational output.
    #[default]
    Information,
}

impl LogLevel {
    pub(crate) fn is_debug(self) -> bool {
        matches!(self, LogLevel::Debug)
    }
}
