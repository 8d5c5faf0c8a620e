//! Authenticated gateway to the cluster management API
//!
//! One [`ClusterGateway`] owns one [`ConnectionConfig`], one transport and at
//! most one [`AuthSession`]. Every verb call performs exactly one exchange.
//!
//! Security headers are built per call from a snapshot of the session, so
//! concurrent calls on one gateway never share mutable header state, and a
//! call in flight during re-authentication finishes with the credentials it
//! started with.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use clustergate_core::{ClusterApi, DiagnosticSink, GatewayEvent};
use clustergate_domain::constants::VERSION_PATH;
use clustergate_domain::{
    AuthSession, ConnectionConfig, ErrorDetails, GatewayError, GatewayState, RequestBody, Result,
    VersionInfo,
};
use parking_lot::RwLock;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::pipeline::{interpret, Verb};
use crate::diagnostics::TracingSink;
use crate::http::HttpClient;

/// Mutable part of the gateway, swapped as a whole under one lock.
pub(super) struct Lifecycle {
    pub(super) state: GatewayState,
    pub(super) session: Option<Arc<AuthSession>>,
    pub(super) transport: Option<HttpClient>,
}

/// Gateway to the cluster management API
pub struct ClusterGateway {
    pub(super) config: ConnectionConfig,
    pub(super) lifecycle: RwLock<Lifecycle>,
    pub(super) diagnostics: Arc<dyn DiagnosticSink>,
}

impl ClusterGateway {
    /// Create a gateway that reports diagnostics through `tracing`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if the transport cannot be
    /// built from `config`.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        Self::with_diagnostics(config, Arc::new(TracingSink))
    }

    /// Create a gateway with an injected diagnostic sink.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if the transport cannot be
    /// built from `config`.
    pub fn with_diagnostics(
        config: ConnectionConfig,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Result<Self> {
        let transport = HttpClient::builder()
            .timeout(config.timeout())
            .accept_invalid_certs(config.ignore_tls_errors())
            .build()?;

        Ok(Self {
            config,
            lifecycle: RwLock::new(Lifecycle {
                state: GatewayState::Unauthenticated,
                session: None,
                transport: Some(transport),
            }),
            diagnostics,
        })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ClusterGatewayBuilder {
        ClusterGatewayBuilder::default()
    }

    pub const fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn state(&self) -> GatewayState {
        self.lifecycle.read().state
    }

    /// Current session, if authenticated.
    pub fn session(&self) -> Option<AuthSession> {
        self.lifecycle.read().session.as_deref().cloned()
    }

    /// Release the transport. Every later call fails with
    /// [`GatewayError::Configuration`]. Calling it twice is harmless.
    pub fn dispose(&self) {
        let was_disposed = {
            let mut lifecycle = self.lifecycle.write();
            let was_disposed = lifecycle.state == GatewayState::Disposed;
            lifecycle.state = GatewayState::Disposed;
            lifecycle.session = None;
            lifecycle.transport = None;
            was_disposed
        };

        if !was_disposed {
            self.diagnostics.record(&GatewayEvent::Disposed);
        }
    }

    /// Read a resource.
    ///
    /// # Errors
    ///
    /// Any [`GatewayError`]; see [`interpret`] for how replies are mapped.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.execute(Verb::Read, path, None).await
    }

    /// Create a resource (POST).
    ///
    /// # Errors
    ///
    /// Any [`GatewayError`]; see [`interpret`] for how replies are mapped.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn create<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<Option<T>> {
        self.execute(Verb::Create, path, body).await
    }

    /// Replace a resource (PUT).
    ///
    /// # Errors
    ///
    /// Any [`GatewayError`]; see [`interpret`] for how replies are mapped.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn replace<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<Option<T>> {
        self.execute(Verb::Replace, path, body).await
    }

    /// Remove a resource (DELETE).
    ///
    /// # Errors
    ///
    /// Any [`GatewayError`]; see [`interpret`] for how replies are mapped.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn remove<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.execute(Verb::Remove, path, None).await
    }

    /// Server version
    ///
    /// # Errors
    ///
    /// Any [`GatewayError`]; an empty reply is an [`GatewayError::Api`].
    pub async fn version(&self) -> Result<VersionInfo> {
        self.get::<VersionInfo>(VERSION_PATH).await?.ok_or_else(|| {
            GatewayError::api(
                format!("GET {VERSION_PATH} returned no payload"),
                None,
                ErrorDetails::new(),
            )
        })
    }

    /// Transport and session to use for one call.
    pub(super) fn snapshot(&self) -> Result<(HttpClient, Option<Arc<AuthSession>>)> {
        let lifecycle = self.lifecycle.read();
        match (&lifecycle.state, &lifecycle.transport) {
            (GatewayState::Disposed, _) | (_, None) => {
                Err(GatewayError::configuration("gateway has been disposed"))
            }
            (_, Some(transport)) => Ok((transport.clone(), lifecycle.session.clone())),
        }
    }

    pub(super) async fn execute<T: DeserializeOwned>(
        &self,
        verb: Verb,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<Option<T>> {
        let (transport, session) = self.snapshot()?;
        let context = format!("{verb} {path}");

        let mut request = transport.request(verb.method(), self.config.api_url(path));
        if let Some(session) = session.as_deref() {
            for (name, value) in session.headers(verb.is_mutating()) {
                request = request.header(name, value);
            }
        }
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, body.content_type()).body(body.encode());
        }

        self.diagnostics.record(&GatewayEvent::RequestSent { method: verb.as_str(), path });
        let started = Instant::now();

        let outcome = match self.exchange(&transport, request).await {
            Ok((status, text)) => {
                self.diagnostics.record(&GatewayEvent::ResponseReceived {
                    method: verb.as_str(),
                    path,
                    status,
                    elapsed: started.elapsed(),
                });
                interpret(status, &text, &context)
            }
            Err(err) => Err(err),
        };

        if let Err(err) = &outcome {
            self.diagnostics.record(&GatewayEvent::RequestFailed {
                method: verb.as_str(),
                path,
                kind: err.kind(),
            });
        }
        outcome
    }

    /// Send and read the whole body under the configured timeout.
    async fn exchange(
        &self,
        transport: &HttpClient,
        request: reqwest::RequestBuilder,
    ) -> Result<(u16, String)> {
        let timeout = self.config.timeout();
        let exchange = async {
            let response = transport.send(request).await?;
            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .map_err(|e| GatewayError::from(crate::errors::InfraError::from(e)))?;
            Ok::<_, GatewayError>((status, text))
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::network(format!("HTTP request timed out after {timeout:?}"))),
        }
    }
}

#[async_trait]
impl ClusterApi for ClusterGateway {
    async fn authenticate(&self) -> Result<()> {
        Self::authenticate(self).await
    }

    async fn get<T>(&self, path: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        Self::get(self, path).await
    }

    async fn create<T>(&self, path: &str, body: Option<RequestBody>) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        Self::create(self, path, body).await
    }

    async fn replace<T>(&self, path: &str, body: Option<RequestBody>) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        Self::replace(self, path, body).await
    }

    async fn remove<T>(&self, path: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        Self::remove(self, path).await
    }

    async fn version(&self) -> Result<VersionInfo> {
        Self::version(self).await
    }
}

/// Builder for [`ClusterGateway`]
#[derive(Default)]
pub struct ClusterGatewayBuilder {
    config: Option<ConnectionConfig>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl ClusterGatewayBuilder {
    /// Set the connection configuration
    pub fn config(mut self, config: ConnectionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the diagnostic sink (defaults to [`TracingSink`])
    pub fn diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Build the gateway
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if no configuration was given
    /// or the transport cannot be built.
    pub fn build(self) -> Result<ClusterGateway> {
        let config = self
            .config
            .ok_or_else(|| GatewayError::configuration("connection config not set"))?;
        let diagnostics = self.diagnostics.unwrap_or_else(|| Arc::new(TracingSink));

        ClusterGateway::with_diagnostics(config, diagnostics)
    }
}
