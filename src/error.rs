//! Error taxonomy shared by every connector operation.
//!
//! Failures are classified exactly once, where they are observed: the
//! resource client for HTTP exchanges and the token provider for the
//! credential endpoint. Everything above that boundary passes the error
//! through unchanged.

use thiserror::Error;

use crate::resource::kind::{ResourceKind, Verb};

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ConnectorError>;

/// Closed set of error categories reported to the provisioning orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ConnectionFailed,
    ProtocolError,
    InvalidInput,
    AlreadyExists,
    PermissionDenied,
    NotFound,
    EndpointOrResourceMissing,
    Timeout,
    PreconditionFailed,
    ServerUnavailable,
    TokenAcquisitionFailed,
    MalformedAttributeValue,
    UnsupportedOperation,
    InvalidConfiguration,
    Unclassified,
}

/// Stage of `test_connection` that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStage {
    /// The attribute tables could not be served.
    SchemaUnavailable,
    /// The probe search against the remote API failed.
    SearchFailed,
}

impl std::fmt::Display for TestStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestStage::SchemaUnavailable => f.write_str("schema unavailable"),
            TestStage::SearchFailed => f.write_str("search call failed"),
        }
    }
}

/// Error raised by connector operations.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("protocol error: {message}")]
    ProtocolError { message: String },

    #[error("invalid input for {resource}: {message}")]
    InvalidInput { resource: String, message: String },

    #[error("{resource} already exists: {message}")]
    AlreadyExists { resource: String, message: String },

    #[error("permission denied ({request}): {message}")]
    PermissionDenied { request: String, message: String },

    #[error("{resource} not found ({request})")]
    NotFound { resource: String, request: String },

    #[error("endpoint or resource missing ({request}): {message}")]
    EndpointOrResourceMissing { request: String, message: String },

    #[error("timeout: {message}")]
    Timeout { message: String },

    #[error("precondition failed ({request}): {message}")]
    PreconditionFailed { request: String, message: String },

    #[error("server unavailable ({request}, status {status}): {message}")]
    ServerUnavailable {
        request: String,
        status: u16,
        message: String,
    },

    #[error("token acquisition failed: {message}")]
    TokenAcquisitionFailed { message: String },

    #[error("malformed value '{value}' for attribute '{attribute}': {message}")]
    MalformedAttributeValue {
        attribute: String,
        value: String,
        message: String,
    },

    #[error("unsupported operation: {message}")]
    UnsupportedOperation { message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("test connection failed, {stage}: {source}")]
    ConnectionTest {
        stage: TestStage,
        #[source]
        source: Box<ConnectorError>,
    },

    #[error("unexpected response ({request}, status {status}): {message}")]
    Unclassified {
        request: String,
        status: u16,
        message: String,
    },
}

impl ConnectorError {
    /// Category of this error. `ConnectionTest` reports the category of the
    /// wrapped failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConnectorError::ConnectionFailed { .. } => ErrorKind::ConnectionFailed,
            ConnectorError::ProtocolError { .. } => ErrorKind::ProtocolError,
            ConnectorError::InvalidInput { .. } => ErrorKind::InvalidInput,
            ConnectorError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            ConnectorError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            ConnectorError::NotFound { .. } => ErrorKind::NotFound,
            ConnectorError::EndpointOrResourceMissing { .. } => {
                ErrorKind::EndpointOrResourceMissing
            }
            ConnectorError::Timeout { .. } => ErrorKind::Timeout,
            ConnectorError::PreconditionFailed { .. } => ErrorKind::PreconditionFailed,
            ConnectorError::ServerUnavailable { .. } => ErrorKind::ServerUnavailable,
            ConnectorError::TokenAcquisitionFailed { .. } => ErrorKind::TokenAcquisitionFailed,
            ConnectorError::MalformedAttributeValue { .. } => ErrorKind::MalformedAttributeValue,
            ConnectorError::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            ConnectorError::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            ConnectorError::ConnectionTest { source, .. } => source.kind(),
            ConnectorError::Unclassified { .. } => ErrorKind::Unclassified,
        }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        ConnectorError::ProtocolError {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        ConnectorError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Classify a transport-level failure (no HTTP status was received).
    pub(crate) fn from_transport(request: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ConnectorError::Timeout {
                message: format!("{request}: {err}"),
            }
        } else if err.is_body() || err.is_decode() {
            ConnectorError::ProtocolError {
                message: format!("{request}: {err}"),
            }
        } else {
            ConnectorError::ConnectionFailed {
                message: format!("{request}: {err}"),
            }
        }
    }
}

/// Map an HTTP status into the error taxonomy.
///
/// Returns `None` for 2xx. `request` is a short human description such as
/// `"GET /api/v1/patrons/42"` and `body` the raw response body.
pub fn classify(
    status: u16,
    kind: ResourceKind,
    verb: Verb,
    request: &str,
    body: &str,
) -> Option<ConnectorError> {
    if (200..300).contains(&status) {
        return None;
    }

    let resource = kind.label().to_string();
    let request = request.to_string();
    let message = body.trim().to_string();

    let error = match status {
        400 if kind.is_already_exists_message(body) => {
            ConnectorError::AlreadyExists { resource, message }
        }
        400 => ConnectorError::InvalidInput { resource, message },
        401 | 403 => ConnectorError::PermissionDenied { request, message },
        404 if verb.is_point_target() => ConnectorError::NotFound { resource, request },
        404 => ConnectorError::EndpointOrResourceMissing { request, message },
        408 => ConnectorError::Timeout {
            message: format!("{request}: {message}"),
        },
        409 => ConnectorError::AlreadyExists { resource, message },
        412 => ConnectorError::PreconditionFailed { request, message },
        500..=599 => ConnectorError::ServerUnavailable {
            request,
            status,
            message,
        },
        _ => ConnectorError::Unclassified {
            request,
            status,
            message,
        },
    };

    Some(error)
}
