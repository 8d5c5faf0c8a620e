//! Error types used throughout the gateway
//!
//! Every failure is built once, where it is detected, and handed to the
//! caller unchanged. Callers branch on [`GatewayError::kind`].

use std::collections::BTreeMap;

use thiserror::Error;

use crate::impl_tag_str;

/// Field name to message pairs reported by the server next to a failure.
pub type ErrorDetails = BTreeMap<String, String>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Categories of gateway errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid connection settings, or a call on a disposed gateway
    Configuration,
    /// Credential exchange failed, malformed token, or a 401 reply
    Authentication,
    /// 403 reply
    Authorization,
    /// Any other non-success status, or an envelope reporting failure
    Api,
    /// Reply body could not be decoded
    Serialization,
    /// Timeout, refused connection, DNS failure
    Network,
}

impl_tag_str!(ErrorKind {
    Configuration => "configuration",
    Authentication => "authentication",
    Authorization => "authorization",
    Api => "api",
    Serialization => "serialization",
    Network => "network",
});

/// Gateway operation errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        status: Option<u16>,
        details: ErrorDetails,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("Authorization denied: {message}")]
    Authorization { message: String, status: Option<u16>, details: ErrorDetails },

    #[error("API error: {message}")]
    Api { message: String, status: Option<u16>, details: ErrorDetails },

    #[error("Failed to decode response: {message}")]
    Serialization { message: String, body: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl GatewayError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Authentication failure with no HTTP status attached (malformed token,
    /// failed credential exchange).
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            status: None,
            details: ErrorDetails::new(),
            source: None,
        }
    }

    /// Authentication failure caused by another gateway error.
    ///
    /// Status and details of the cause are carried over so callers still see
    /// what the server said.
    pub fn authentication_caused_by(message: impl Into<String>, cause: Self) -> Self {
        let status = cause.status();
        let details = cause.details().cloned().unwrap_or_default();
        Self::Authentication {
            message: format!("{}: {}", message.into(), cause),
            status,
            details,
            source: Some(Box::new(cause)),
        }
    }

    pub fn api(message: impl Into<String>, status: Option<u16>, details: ErrorDetails) -> Self {
        Self::Api { message: message.into(), status, details }
    }

    pub fn serialization(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Serialization { message: message.into(), body: body.into() }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into(), source: None }
    }

    pub fn network_caused_by(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network { message: message.into(), source: Some(Box::new(source)) }
    }

    /// Get the category for this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Authorization { .. } => ErrorKind::Authorization,
            Self::Api { .. } => ErrorKind::Api,
            Self::Serialization { .. } => ErrorKind::Serialization,
            Self::Network { .. } => ErrorKind::Network,
        }
    }

    /// HTTP status that produced this error, if any
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. }
            | Self::Authorization { status, .. }
            | Self::Api { status, .. } => *status,
            Self::Configuration { .. } | Self::Serialization { .. } | Self::Network { .. } => None,
        }
    }

    /// Per-field error messages from the reply body, if any were sent
    pub const fn details(&self) -> Option<&ErrorDetails> {
        match self {
            Self::Authentication { details, .. }
            | Self::Authorization { details, .. }
            | Self::Api { details, .. } => Some(details),
            Self::Configuration { .. } | Self::Serialization { .. } | Self::Network { .. } => None,
        }
    }

    /// Raw reply body kept for diagnosis of decode failures
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Serialization { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether retrying the same call later could succeed without any change
    /// on the caller's side.
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Network)
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Join error details into one line, `field: message` pairs separated by `"; "`.
pub fn join_error_details(details: &ErrorDetails) -> String {
    details
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}
