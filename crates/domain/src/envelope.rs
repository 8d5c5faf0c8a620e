//! Reply envelope shared by every endpoint
//!
//! Bodies look like `{ "data": ..., "errors": {...}, "success": true }`.
//! `success` may be absent (treated as true) or sent as `0`/`1`. `errors`
//! may be absent or `null`.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{join_error_details, ErrorDetails, GatewayError, Result};

/// Decoded reply body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    /// Payload. Not to be trusted when `success` is false.
    #[serde(default = "Option::default")]
    pub data: Option<T>,

    #[serde(default, deserialize_with = "deserialize_error_details")]
    pub errors: ErrorDetails,

    #[serde(default = "default_success", deserialize_with = "deserialize_flag")]
    pub success: bool,
}

impl<T> ResponseEnvelope<T> {
    /// Unwrap the payload, or turn a failure report into an error.
    ///
    /// `status` is the HTTP status the envelope arrived with.
    pub fn into_result(self, status: u16) -> Result<Option<T>> {
        if self.success {
            return Ok(self.data);
        }

        let message = if self.errors.is_empty() {
            "server reported failure without details".to_string()
        } else {
            join_error_details(&self.errors)
        };
        Err(GatewayError::api(message, Some(status), self.errors))
    }
}

/// Decode a reply body as an envelope with its payload left untyped.
///
/// # Errors
///
/// Returns [`GatewayError::Serialization`] with the raw body when the text is
/// not an envelope.
pub fn decode_envelope(body: &str) -> Result<ResponseEnvelope<Value>> {
    serde_json::from_str(body).map_err(|e| {
        GatewayError::serialization(format!("Failed to parse response envelope: {e}"), body)
    })
}

/// Decode a successful reply into the caller's payload type.
///
/// The failure flag is checked before `data` is looked at as `T`, so a
/// failure report always becomes [`GatewayError::Api`] whatever `data`
/// holds.
///
/// # Errors
///
/// - [`GatewayError::Api`] when the envelope reports failure
/// - [`GatewayError::Serialization`] with the raw body when the text is not
///   an envelope or `data` does not fit `T`
pub fn decode_reply<T: DeserializeOwned>(status: u16, body: &str) -> Result<Option<T>> {
    decode_envelope(body)?
        .into_result(status)?
        .map(serde_json::from_value::<T>)
        .transpose()
        .map_err(|e| {
            GatewayError::serialization(format!("Failed to decode response payload: {e}"), body)
        })
}

/// Best-effort extraction of the error-detail map from any reply body.
///
/// Used on non-success replies, where an unparsable body must not change the
/// error kind. Returns an empty map when nothing usable is found.
pub fn error_details_from_body(body: &str) -> ErrorDetails {
    if body.trim().is_empty() {
        return ErrorDetails::new();
    }
    serde_json::from_str::<ResponseEnvelope<de::IgnoredAny>>(body)
        .map(|envelope| envelope.errors)
        .unwrap_or_default()
}

const fn default_success() -> bool {
    true
}

fn deserialize_error_details<'de, D>(deserializer: D) -> std::result::Result<ErrorDetails, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(field, value)| {
            let message = match value {
                Value::String(text) => text,
                other => other.to_string(),
            };
            (field, message)
        })
        .collect())
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl Visitor<'_> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean or 0/1")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<bool, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<bool, E> {
            Ok(default_success())
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Guest {
        vmid: u32,
        name: String,
        running: bool,
        memory_mb: u64,
        balloon: Option<f64>,
    }

    #[test]
    fn test_echoed_payload_decodes_to_original() {
        let original =
            Guest { vmid: 101, name: "web-1".into(), running: true, memory_mb: 2048, balloon: None };
        let echoed = serde_json::json!({ "data": &original, "success": true }).to_string();

        let decoded: Option<Guest> = decode_reply(200, &echoed).unwrap();
        assert_eq!(decoded, Some(original));
    }

    #[test]
    fn test_missing_success_counts_as_success() {
        let envelope = decode_envelope(r#"{"data":"UPID:pve:1"}"#).unwrap();
        assert!(envelope.success);
        assert!(envelope.errors.is_empty());

        let upid: Option<String> = decode_reply(200, r#"{"data":"UPID:pve:1"}"#).unwrap();
        assert_eq!(upid.as_deref(), Some("UPID:pve:1"));
    }

    #[test]
    fn test_numeric_success_flag() {
        let ok = decode_envelope(r#"{"data":null,"success":1}"#).unwrap();
        let failed = decode_envelope(r#"{"success":0}"#).unwrap();
        assert!(ok.success);
        assert!(!failed.success);
    }

    #[test]
    fn test_null_data_is_absent() {
        let decoded: Option<Guest> = decode_reply(200, r#"{"data":null,"success":true}"#).unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_failed_envelope_becomes_api_error() {
        let body = r#"{"success":false,"errors":{"vmid":"already in use"},"data":{"vmid":1}}"#;
        let err = decode_envelope(body).unwrap().into_result(200).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(err.to_string().contains("already in use"));
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn test_failed_envelope_ignores_mistyped_data() {
        let body = r#"{"success":false,"errors":{"vmid":"already in use"},"data":"UPID:partial"}"#;
        let err = decode_reply::<Guest>(200, body).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(err.to_string().contains("already in use"));
        let details = err.details().expect("details from the failure report");
        assert_eq!(details.get("vmid").map(String::as_str), Some("already in use"));
    }

    #[test]
    fn test_failed_envelope_without_details_still_fails() {
        let err = decode_reply::<Guest>(200, r#"{"success":false,"errors":null}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
    }

    #[test]
    fn test_non_string_error_values_are_rendered() {
        let envelope =
            decode_envelope(r#"{"success":false,"errors":{"net0":{"bridge":"missing"}}}"#).unwrap();
        assert_eq!(envelope.errors["net0"], r#"{"bridge":"missing"}"#);
    }

    #[test]
    fn test_decode_failure_keeps_raw_body() {
        let err = decode_reply::<Guest>(200, "<html>proxy error</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
        assert_eq!(err.raw_body(), Some("<html>proxy error</html>"));
    }

    #[test]
    fn test_payload_type_mismatch_is_serialization_error() {
        let body = r#"{"data":{"vmid":"abc"},"success":true}"#;
        let err = decode_reply::<Guest>(200, body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
        assert_eq!(err.raw_body(), Some(body));
    }

    #[test]
    fn test_error_details_from_unparsable_body_is_empty() {
        assert!(error_details_from_body("").is_empty());
        assert!(error_details_from_body("Internal Server Error").is_empty());
        assert_eq!(
            error_details_from_body(r#"{"errors":{"name":"too long"},"data":[1,2]}"#)["name"],
            "too long"
        );
    }
}
