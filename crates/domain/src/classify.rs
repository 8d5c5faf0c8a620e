//! Status classification for non-success replies
//!
//! The kind is decided by the status code alone. The body is only consulted
//! for an optional error-detail map, and a body that does not parse never
//! changes the outcome.

use crate::envelope::error_details_from_body;
use crate::errors::{join_error_details, GatewayError};

/// Map a non-success reply to its error.
///
/// `context` names the call for the message, e.g. `"GET /nodes"`.
///
/// 401 becomes [`GatewayError::Authentication`], 403 becomes
/// [`GatewayError::Authorization`], everything else becomes
/// [`GatewayError::Api`] carrying the status.
pub fn classify_status(status: u16, context: &str, body: &str) -> GatewayError {
    let details = error_details_from_body(body);
    let message = if details.is_empty() {
        format!("{context} returned status {status}")
    } else {
        format!("{context} returned status {status}: {}", join_error_details(&details))
    };

    match status {
        401 => GatewayError::Authentication {
            message,
            status: Some(status),
            details,
            source: None,
        },
        403 => GatewayError::Authorization { message, status: Some(status), details },
        _ => GatewayError::Api { message, status: Some(status), details },
    }
}
