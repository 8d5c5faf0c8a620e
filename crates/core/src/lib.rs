//! # clustergate core
//!
//! Port interfaces of the cluster API gateway.
//!
//! ## Architecture Principles
//! - Only depends on `clustergate-domain`
//! - No HTTP or platform code
//! - Resource modules and diagnostics plug in through traits

pub mod cluster_api_ports;
pub mod diagnostics_ports;

pub use cluster_api_ports::ClusterApi;
pub use diagnostics_ports::{DiagnosticSink, GatewayEvent, NoopSink};
