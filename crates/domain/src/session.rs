//! Authentication state
//!
//! [`AuthSession`] is the secret material produced by one successful
//! authentication. It is replaced wholesale on re-authentication and never
//! updated in place.

use std::fmt;

use serde::Deserialize;

use crate::constants::{
    AUTHORIZATION_HEADER, COOKIE_HEADER, CSRF_HEADER, TICKET_COOKIE, TOKEN_SECRET_SEPARATOR,
};
use crate::errors::{GatewayError, Result};
use crate::impl_tag_str;

/// Credential scheme of a live session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScheme {
    /// Session ticket plus CSRF token from a credential exchange
    Ticket,
    /// Pre-issued API token, no exchange
    StaticToken,
}

impl_tag_str!(AuthScheme {
    Ticket => "ticket",
    StaticToken => "static-token",
});

/// Lifecycle of a gateway instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Disposed,
}

impl_tag_str!(GatewayState {
    Unauthenticated => "unauthenticated",
    Authenticating => "authenticating",
    Authenticated => "authenticated",
    Disposed => "disposed",
});

/// Static API token, `user@realm!tokenid=secret`.
///
/// Kept verbatim; the header value is the configured string unchanged.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken {
    raw: String,
    separator_at: usize,
}

impl ApiToken {
    /// Validate the token shape.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Authentication`] when the identifier/secret
    /// separator is missing or either side of it is empty.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let separator_at = raw.rfind(TOKEN_SECRET_SEPARATOR).ok_or_else(|| {
            GatewayError::authentication(format!(
                "API token must have the form user@realm!tokenid{TOKEN_SECRET_SEPARATOR}secret"
            ))
        })?;

        let (identifier, secret) = (&raw[..separator_at], &raw[separator_at + 1..]);
        if identifier.trim().is_empty() {
            return Err(GatewayError::authentication("API token identifier is empty"));
        }
        if secret.trim().is_empty() {
            return Err(GatewayError::authentication("API token secret is empty"));
        }

        Ok(Self { raw, separator_at })
    }

    /// Token identifier, everything before the secret.
    pub fn identifier(&self) -> &str {
        &self.raw[..self.separator_at]
    }

    /// The configured token string, unchanged.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiToken")
            .field("identifier", &self.identifier())
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Live authentication state
#[derive(Clone, PartialEq, Eq)]
pub enum AuthSession {
    Ticket { ticket: String, csrf_token: String },
    StaticToken { token: ApiToken },
}

impl AuthSession {
    pub const fn scheme(&self) -> AuthScheme {
        match self {
            Self::Ticket { .. } => AuthScheme::Ticket,
            Self::StaticToken { .. } => AuthScheme::StaticToken,
        }
    }

    /// Headers that authorize one request.
    ///
    /// The CSRF header is only added for requests that can change state.
    pub fn headers(&self, mutating: bool) -> Vec<(&'static str, String)> {
        match self {
            Self::Ticket { ticket, csrf_token } => {
                let mut headers = vec![(COOKIE_HEADER, format!("{TICKET_COOKIE}={ticket}"))];
                if mutating {
                    headers.push((CSRF_HEADER, csrf_token.clone()));
                }
                headers
            }
            Self::StaticToken { token } => {
                vec![(AUTHORIZATION_HEADER, token.as_str().to_string())]
            }
        }
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ticket { .. } => f
                .debug_struct("Ticket")
                .field("ticket", &"<redacted>")
                .field("csrf_token", &"<redacted>")
                .finish(),
            Self::StaticToken { token } => {
                f.debug_struct("StaticToken").field("token", token).finish()
            }
        }
    }
}

/// Payload of a successful credential exchange
#[derive(Clone, Deserialize)]
pub struct TicketData {
    pub ticket: String,
    #[serde(rename = "CSRFPreventionToken")]
    pub csrf_prevention_token: String,
}

impl From<TicketData> for AuthSession {
    fn from(data: TicketData) -> Self {
        Self::Ticket { ticket: data.ticket, csrf_token: data.csrf_prevention_token }
    }
}
