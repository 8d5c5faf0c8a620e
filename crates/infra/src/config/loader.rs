//! Connection settings loader
//!
//! ## Loading Strategy
//! 1. Try environment variables
//! 2. If incomplete or invalid, fall back to a settings file
//! 3. Probe a few well-known paths when no file is given
//! 4. JSON and TOML are supported, chosen by file extension
//!
//! ## Environment Variables
//! - `CLUSTERGATE_HOST` (required)
//! - `CLUSTERGATE_USERNAME` (required)
//! - `CLUSTERGATE_PORT`: defaults to 8006
//! - `CLUSTERGATE_REALM`: defaults to `pam`
//! - `CLUSTERGATE_PASSWORD` / `CLUSTERGATE_TOKEN`: exactly one must be set
//! - `CLUSTERGATE_USE_HTTPS`: true/false, defaults to true
//! - `CLUSTERGATE_IGNORE_TLS_ERRORS`: true/false, defaults to false
//! - `CLUSTERGATE_TIMEOUT_SECS`: defaults to 30
//!
//! ## File Locations
//! Probed in order, first relative to the working directory, then relative
//! to the executable: `clustergate.toml`, `clustergate.json`,
//! `config.toml`, `config.json`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use clustergate_domain::{ConnectionConfig, GatewayError, Result};

use super::settings::ConnectionSettings;

const CANDIDATE_FILES: [&str; 4] =
    ["clustergate.toml", "clustergate.json", "config.toml", "config.json"];

/// Load a validated connection configuration.
///
/// Environment variables win; on any failure there, a settings file is
/// used instead.
///
/// # Errors
/// Returns [`GatewayError::Configuration`] if neither source yields a valid
/// configuration.
pub fn load() -> Result<ConnectionConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Connection settings loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load connection configuration from `CLUSTERGATE_*` environment variables.
///
/// # Errors
/// Returns [`GatewayError::Configuration`] if a required variable is
/// missing, a number does not parse, or the result fails validation.
pub fn load_from_env() -> Result<ConnectionConfig> {
    let mut settings =
        ConnectionSettings::new(env_var("CLUSTERGATE_HOST")?, env_var("CLUSTERGATE_USERNAME")?);

    if let Some(port) = env_parse("CLUSTERGATE_PORT")? {
        settings.port = port;
    }
    if let Ok(realm) = std::env::var("CLUSTERGATE_REALM") {
        settings.realm = realm;
    }
    settings.password = std::env::var("CLUSTERGATE_PASSWORD").ok();
    settings.token = std::env::var("CLUSTERGATE_TOKEN").ok();
    settings.use_https = env_bool("CLUSTERGATE_USE_HTTPS", true);
    settings.ignore_tls_errors = env_bool("CLUSTERGATE_IGNORE_TLS_ERRORS", false);
    if let Some(timeout_secs) = env_parse("CLUSTERGATE_TIMEOUT_SECS")? {
        settings.timeout_secs = timeout_secs;
    }

    ConnectionConfig::try_from(settings)
}

/// Load connection configuration from a settings file.
///
/// If `path` is `None`, [`probe_config_paths`] picks the file.
///
/// # Errors
/// Returns [`GatewayError::Configuration`] if the file is missing,
/// unreadable, malformed, or describes an invalid configuration.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ConnectionConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(GatewayError::configuration(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            GatewayError::configuration("No config file found in any of the standard locations")
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading connection settings from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| GatewayError::configuration(format!("Failed to read config file: {e}")))?;

    ConnectionConfig::try_from(parse_settings(&contents, &config_path)?)
}

/// Parse settings, choosing the format by the extension of `path`.
fn parse_settings(contents: &str, path: &Path) -> Result<ConnectionSettings> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| GatewayError::configuration(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| GatewayError::configuration(format!("Invalid JSON format: {e}"))),
        _ => Err(GatewayError::configuration(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing settings file among the well-known locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| CANDIDATE_FILES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        GatewayError::configuration(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional variable; set but unparsable is an error.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| GatewayError::configuration(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
