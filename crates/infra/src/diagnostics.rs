//! Default diagnostic sink backed by `tracing`

use clustergate_core::{DiagnosticSink, GatewayEvent};
use tracing::{debug, info, warn};

/// Forwards gateway events to the active `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: &GatewayEvent<'_>) {
        match event {
            GatewayEvent::AuthenticationStarted { scheme } => {
                debug!(scheme = %scheme, "authenticating");
            }
            GatewayEvent::Authenticated { scheme } => {
                info!(scheme = %scheme, "authenticated");
            }
            GatewayEvent::AuthenticationFailed { scheme, kind } => {
                warn!(scheme = %scheme, kind = %kind, "authentication failed");
            }
            GatewayEvent::RequestSent { method, path } => {
                debug!(%method, %path, "request sent");
            }
            GatewayEvent::ResponseReceived { method, path, status, elapsed } => {
                debug!(
                    %method,
                    %path,
                    status,
                    elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    "response received"
                );
            }
            GatewayEvent::RequestFailed { method, path, kind } => {
                warn!(%method, %path, kind = %kind, "request failed");
            }
            GatewayEvent::Disposed => {
                info!("gateway disposed");
            }
        }
    }
}
