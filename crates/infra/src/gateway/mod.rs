//! Cluster API gateway
//!
//! Everything resource modules need to talk to the cluster: session
//! establishment, per-call security headers, and reply interpretation.
//!
//! # Concurrency
//!
//! A gateway is meant to be shared (`Arc<ClusterGateway>`) and reused for
//! many calls. Headers are derived per call from an immutable session
//! snapshot, so concurrent mutating calls do not race on CSRF state.
//! Re-authentication swaps the session atomically; calls already in flight
//! keep the credentials they started with.

pub mod auth;
pub mod client;
pub mod pipeline;

pub use client::{ClusterGateway, ClusterGatewayBuilder};
pub use pipeline::{interpret, Verb};
