//! Request payloads and small typed replies

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{GatewayError, Result};

/// Body of a mutating call
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Encoded as JSON on send
    Json(Value),
    /// Already `application/x-www-form-urlencoded`; sent unmodified
    Form(String),
}

impl RequestBody {
    /// Encode any serializable value as a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Serialization`] if the value cannot be
    /// represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| GatewayError::serialization(format!("Failed to serialize body: {e}"), ""))
    }

    /// Wrap a pre-encoded form payload.
    pub fn form(encoded: impl Into<String>) -> Self {
        Self::Form(encoded.into())
    }

    /// `Content-Type` header value for this body
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Json(_) => "application/json",
            Self::Form(_) => "application/x-www-form-urlencoded",
        }
    }

    /// Bytes put on the wire.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Json(value) => value.to_string().into_bytes(),
            Self::Form(encoded) => encoded.clone().into_bytes(),
        }
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// Reply of `GET /version`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default)]
    pub repoid: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct NewGuest<'a> {
        vmid: u32,
        name: &'a str,
    }

    #[test]
    fn test_json_body() {
        let body = RequestBody::json(&NewGuest { vmid: 100, name: "db" }).unwrap();
        assert_eq!(body.content_type(), "application/json");
        let sent: Value = serde_json::from_slice(&body.encode()).unwrap();
        assert_eq!(sent, serde_json::json!({ "vmid": 100, "name": "db" }));
    }

    #[test]
    fn test_form_body_is_untouched() {
        let body = RequestBody::form("username=root%40pam&password=a%26b");
        assert_eq!(body.content_type(), "application/x-www-form-urlencoded");
        assert_eq!(body.encode(), b"username=root%40pam&password=a%26b".to_vec());
    }

    #[test]
    fn test_version_info_optional_fields() {
        let info: VersionInfo = serde_json::from_str(r#"{"version":"8.2.4"}"#).unwrap();
        assert_eq!(info.version, "8.2.4");
        assert_eq!(info.release, None);
    }
}
