//! Diagnostic sink port
//!
//! The gateway reports what it does through an injected sink instead of
//! reaching for process-wide state. Events never carry secrets.

use std::time::Duration;

use clustergate_domain::{AuthScheme, ErrorKind};

/// Something the gateway did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent<'a> {
    AuthenticationStarted { scheme: AuthScheme },
    Authenticated { scheme: AuthScheme },
    AuthenticationFailed { scheme: AuthScheme, kind: ErrorKind },
    RequestSent { method: &'a str, path: &'a str },
    ResponseReceived { method: &'a str, path: &'a str, status: u16, elapsed: Duration },
    RequestFailed { method: &'a str, path: &'a str, kind: ErrorKind },
    Disposed,
}

/// Receiver of gateway diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: &GatewayEvent<'_>);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _event: &GatewayEvent<'_>) {}
}
