//! Connection settings loading
//!
//! Builds a validated [`ConnectionConfig`](clustergate_domain::ConnectionConfig)
//! from environment variables or a settings file. This is a convenience for
//! callers; [`ClusterGateway`](crate::ClusterGateway) only takes a built
//! configuration and never reads the environment or files itself.

pub mod loader;
pub mod settings;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
pub use settings::ConnectionSettings;
