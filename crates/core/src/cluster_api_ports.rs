//! Gateway port consumed by resource modules
//!
//! Node, guest, storage, network, backup and access modules build a path,
//! call one verb and map the decoded payload into their own records. They
//! depend on this trait only, never on the transport.
//!
//! # Example
//!
//! ```no_run
//! use clustergate_core::ClusterApi;
//! use clustergate_domain::Result;
//! use serde_json::Value;
//!
//! async fn list_nodes(api: &impl ClusterApi) -> Result<Vec<Value>> {
//!     let nodes: Option<Vec<Value>> = api.get("/nodes").await?;
//!     Ok(nodes.unwrap_or_default())
//! }
//! ```

use async_trait::async_trait;
use clustergate_domain::{RequestBody, Result, VersionInfo};
use serde::de::DeserializeOwned;

/// Authenticated access to the cluster management API.
///
/// Every verb returns `Ok(None)` when the server replies without a payload.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Establish (or replace) the session.
    async fn authenticate(&self) -> Result<()>;

    /// Read a resource.
    async fn get<T>(&self, path: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static;

    /// Create a resource (POST).
    async fn create<T>(&self, path: &str, body: Option<RequestBody>) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static;

    /// Replace a resource (PUT).
    async fn replace<T>(&self, path: &str, body: Option<RequestBody>) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static;

    /// Remove a resource (DELETE).
    async fn remove<T>(&self, path: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static;

    /// Server version, a cheap reachability and credential probe.
    async fn version(&self) -> Result<VersionInfo>;
}
