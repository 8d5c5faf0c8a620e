//! Shared helpers for gateway integration tests.

use std::sync::Once;

use clustergate_domain::{ConnectionConfig, ConnectionConfigBuilder};
use clustergate_infra::ClusterGateway;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TICKET_URL: &str = "/api2/json/access/ticket";

static TRACING: Once = Once::new();

/// Install a test subscriber once so gateway spans show up with `--nocapture`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Builder pointed at the mock server over plain HTTP.
pub fn config_for(server: &MockServer) -> ConnectionConfigBuilder {
    ConnectionConfig::builder()
        .host(server.address().ip().to_string())
        .port(server.address().port())
        .use_https(false)
        .username("root")
        .realm("pam")
}

/// Mount a ticket endpoint that issues `TKT1` / `CSRF1`.
pub async fn mount_ticket_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TICKET_URL))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "ticket": "TKT1", "CSRFPreventionToken": "CSRF1" }
        })))
        .mount(server)
        .await;
}

/// Gateway already holding a ticket session against `server`.
pub async fn ticket_gateway(server: &MockServer) -> ClusterGateway {
    init_tracing();
    mount_ticket_success(server).await;
    let config = config_for(server).password("p").build().expect("valid config");
    let gateway = ClusterGateway::new(config).expect("gateway");
    gateway.authenticate().await.expect("ticket session");
    gateway
}
