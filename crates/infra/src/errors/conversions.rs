//! Conversions from transport errors into gateway errors.

use clustergate_domain::GatewayError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub GatewayError);

impl From<InfraError> for GatewayError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<GatewayError> for InfraError {
    fn from(value: GatewayError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoGatewayError {
    fn into_gateway(self) -> GatewayError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → GatewayError */
/* -------------------------------------------------------------------------- */

impl IntoGatewayError for HttpError {
    fn into_gateway(self) -> GatewayError {
        if self.is_builder() {
            return GatewayError::configuration(format!("invalid HTTP request: {self}"));
        }

        let message = if self.is_timeout() {
            "HTTP request timed out".to_string()
        } else if self.is_connect() {
            "HTTP connection failure".to_string()
        } else if self.is_body() || self.is_decode() {
            "failed to read HTTP response body".to_string()
        } else {
            format!("HTTP transport failure: {self}")
        };

        GatewayError::network_caused_by(message, self)
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_gateway())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
