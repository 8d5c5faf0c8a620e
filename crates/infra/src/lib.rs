//! # clustergate infrastructure
//!
//! I/O side of the cluster API gateway.
//!
//! This crate contains:
//! - The single-exchange HTTP transport
//! - [`ClusterGateway`]: authentication, request pipeline and lifecycle
//! - The `tracing`-backed diagnostic sink
//! - Connection settings loading from env or file
//!
//! ## Architecture
//! - Implements the ports defined in `clustergate-core`
//! - All network and filesystem access lives here

pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod gateway;
pub mod http;

// Re-export commonly used items
pub use config::ConnectionSettings;
pub use diagnostics::TracingSink;
pub use errors::InfraError;
pub use gateway::{ClusterGateway, ClusterGatewayBuilder};
pub use http::{HttpClient, HttpClientBuilder};
