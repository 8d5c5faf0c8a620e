//! # clustergate domain
//!
//! Value types of the cluster API gateway.
//!
//! This crate contains:
//! - Connection configuration and its validation
//! - Authentication session and credential scheme types
//! - The reply envelope and status classification
//! - The gateway error taxonomy and Result alias
//!
//! ## Architecture
//! - No dependencies on other clustergate crates
//! - No I/O

pub mod classify;
pub mod config;
pub mod constants;
pub mod envelope;
pub mod errors;
pub mod macros;
pub mod session;
pub mod types;

// Re-export commonly used items
pub use classify::classify_status;
pub use config::*;
pub use envelope::{decode_envelope, decode_reply, error_details_from_body, ResponseEnvelope};
pub use errors::*;
pub use session::*;
pub use types::*;
