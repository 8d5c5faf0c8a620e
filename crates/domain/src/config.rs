//! Connection configuration
//!
//! [`ConnectionConfig`] is validated once by its builder and immutable
//! afterwards.

use std::fmt;
use std::time::Duration;

use crate::constants::{API_ROOT, DEFAULT_PORT, DEFAULT_REALM, DEFAULT_TIMEOUT_SECS};
use crate::errors::{GatewayError, Result};

/// Secret used to authenticate. Exactly one is configured.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Exchanged for a session ticket
    Password(String),
    /// Pre-issued API token, sent as-is
    Token(String),
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password(_) => f.write_str("Password(<redacted>)"),
            Self::Token(_) => f.write_str("Token(<redacted>)"),
        }
    }
}

/// Target host, credentials and transport options
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    username: String,
    realm: String,
    credential: Credential,
    use_https: bool,
    ignore_tls_errors: bool,
    timeout: Duration,
}

impl ConnectionConfig {
    /// Create a builder for fluent configuration
    pub fn builder() -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::default()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub const fn credential(&self) -> &Credential {
        &self.credential
    }

    pub const fn use_https(&self) -> bool {
        self.use_https
    }

    pub const fn ignore_tls_errors(&self) -> bool {
        self.ignore_tls_errors
    }

    /// Per-call timeout
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Login subject, `username@realm`
    pub fn user_id(&self) -> String {
        format!("{}@{}", self.username, self.realm)
    }

    /// `scheme://host:port`, IPv6 literals bracketed
    pub fn base_url(&self) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("{scheme}://[{}]:{}", self.host, self.port)
        } else {
            format!("{scheme}://{}:{}", self.host, self.port)
        }
    }

    /// Full URL of an API path such as `/nodes`.
    pub fn api_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}{}/{}", self.base_url(), API_ROOT, path)
    }
}

/// Builder for [`ConnectionConfig`]
#[derive(Debug, Clone)]
pub struct ConnectionConfigBuilder {
    host: Option<String>,
    port: u16,
    username: Option<String>,
    realm: String,
    password: Option<String>,
    token: Option<String>,
    use_https: bool,
    ignore_tls_errors: bool,
    timeout: Duration,
}

impl Default for ConnectionConfigBuilder {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            username: None,
            realm: DEFAULT_REALM.to_string(),
            password: None,
            token: None,
            use_https: true,
            ignore_tls_errors: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ConnectionConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Static API token, `user@realm!tokenid=secret`
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub const fn use_https(mut self, enabled: bool) -> Self {
        self.use_https = enabled;
        self
    }

    /// Accept self-signed or otherwise invalid server certificates.
    pub const fn ignore_tls_errors(mut self, enabled: bool) -> Self {
        self.ignore_tls_errors = enabled;
        self
    }

    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if host, username or realm is
    /// empty, if port or timeout is zero, or unless exactly one of password
    /// and token is set.
    pub fn build(self) -> Result<ConnectionConfig> {
        let host = non_empty(self.host)
            .ok_or_else(|| GatewayError::configuration("host must not be empty"))?;
        let username = non_empty(self.username)
            .ok_or_else(|| GatewayError::configuration("username must not be empty"))?;
        let realm = non_empty(Some(self.realm))
            .ok_or_else(|| GatewayError::configuration("realm must not be empty"))?;

        if self.port == 0 {
            return Err(GatewayError::configuration("port must not be zero"));
        }
        if self.timeout.is_zero() {
            return Err(GatewayError::configuration("timeout must be greater than zero"));
        }

        let password = self.password.filter(|p| !p.is_empty());
        let token = self.token.filter(|t| !t.is_empty());
        let credential = match (password, token) {
            (Some(password), None) => Credential::Password(password),
            (None, Some(token)) => Credential::Token(token),
            (None, None) => {
                return Err(GatewayError::configuration(
                    "either a password or an API token must be set",
                ))
            }
            (Some(_), Some(_)) => {
                return Err(GatewayError::configuration(
                    "password and API token are mutually exclusive",
                ))
            }
        };

        Ok(ConnectionConfig {
            host,
            port: self.port,
            username,
            realm,
            credential,
            use_https: self.use_https,
            ignore_tls_errors: self.ignore_tls_errors,
            timeout: self.timeout,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
