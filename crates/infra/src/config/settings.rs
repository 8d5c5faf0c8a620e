//! Serializable connection settings
//!
//! The on-disk and environment shape of a connection. Converting into a
//! [`ConnectionConfig`] runs the builder's validation.

use std::fmt;
use std::time::Duration;

use clustergate_domain::constants::{DEFAULT_PORT, DEFAULT_REALM, DEFAULT_TIMEOUT_SECS};
use clustergate_domain::{ConnectionConfig, GatewayError};
use serde::{Deserialize, Serialize};

/// Connection settings as read from a file or the environment
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(default = "default_realm")]
    pub realm: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    #[serde(default = "default_use_https")]
    pub use_https: bool,
    #[serde(default)]
    pub ignore_tls_errors: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_realm() -> String {
    DEFAULT_REALM.to_string()
}

const fn default_use_https() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ConnectionSettings {
    /// Settings for `host` and `username` with every other field defaulted.
    pub fn new(host: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            username: username.into(),
            realm: default_realm(),
            password: None,
            token: None,
            use_https: default_use_https(),
            ignore_tls_errors: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("realm", &self.realm)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("use_https", &self.use_https)
            .field("ignore_tls_errors", &self.ignore_tls_errors)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl TryFrom<ConnectionSettings> for ConnectionConfig {
    type Error = GatewayError;

    fn try_from(settings: ConnectionSettings) -> Result<Self, Self::Error> {
        let mut builder = ConnectionConfig::builder()
            .host(settings.host)
            .port(settings.port)
            .username(settings.username)
            .realm(settings.realm)
            .use_https(settings.use_https)
            .ignore_tls_errors(settings.ignore_tls_errors)
            .timeout(Duration::from_secs(settings.timeout_secs));

        if let Some(password) = settings.password {
            builder = builder.password(password);
        }
        if let Some(token) = settings.token {
            builder = builder.token(token);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use clustergate_domain::{Credential, ErrorKind};

    use super::*;

    #[test]
    fn test_defaults_from_minimal_toml() {
        let settings: ConnectionSettings = toml::from_str(
            r#"
host = "pve1.lab"
username = "root"
password = "secret"
"#,
        )
        .unwrap();

        assert_eq!(settings.port, 8006);
        assert_eq!(settings.realm, "pam");
        assert!(settings.use_https);
        assert!(!settings.ignore_tls_errors);
        assert_eq!(settings.timeout_secs, 30);
    }

    #[test]
    fn test_converts_into_validated_config() {
        let mut settings = ConnectionSettings::new("pve1.lab", "automation");
        settings.realm = "pve".to_string();
        settings.token = Some("automation@pve!ci=abc".to_string());
        settings.timeout_secs = 5;

        let config = ConnectionConfig::try_from(settings).unwrap();
        assert_eq!(config.user_id(), "automation@pve");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(matches!(config.credential(), Credential::Token(_)));
    }

    #[test]
    fn test_conversion_rejects_missing_credential() {
        let settings = ConnectionSettings::new("pve1.lab", "root");
        let err = ConnectionConfig::try_from(settings).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_secrets_stay_out_of_debug_and_serialization() {
        let mut settings = ConnectionSettings::new("pve1.lab", "root");
        settings.password = Some("hunter2".to_string());

        assert!(!format!("{settings:?}").contains("hunter2"));
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("password"));
    }
}
