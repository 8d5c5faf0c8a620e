//! Verb dispatch and reply interpretation

use std::fmt;

use clustergate_domain::{classify_status, decode_reply, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;

/// The four calls resource modules can make
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Read,
    Create,
    Replace,
    Remove,
}

impl Verb {
    pub fn method(self) -> Method {
        match self {
            Self::Read => Method::GET,
            Self::Create => Method::POST,
            Self::Replace => Method::PUT,
            Self::Remove => Method::DELETE,
        }
    }

    /// Whether the call can change server state (and so needs the CSRF header).
    pub const fn is_mutating(self) -> bool {
        !matches!(self, Self::Read)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "GET",
            Self::Create => "POST",
            Self::Replace => "PUT",
            Self::Remove => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turn a completed exchange into the caller's result.
///
/// Order matters: a non-success status is classified before the body is
/// looked at, an empty body on success is an absent result, and the
/// envelope's failure flag is checked before `data` is decoded as `T`.
pub fn interpret<T: DeserializeOwned>(status: u16, body: &str, context: &str) -> Result<Option<T>> {
    if !(200..300).contains(&status) {
        return Err(classify_status(status, context, body));
    }

    if body.trim().is_empty() {
        return Ok(None);
    }

    decode_reply(status, body)
}

#[cfg(test)]
mod tests {
    use clustergate_domain::ErrorKind;
    use serde::Deserialize;
    use serde_json::Value;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Node {
        node: String,
        status: String,
    }

    #[test]
    fn test_verb_methods() {
        assert_eq!(Verb::Read.method(), Method::GET);
        assert_eq!(Verb::Create.method(), Method::POST);
        assert_eq!(Verb::Replace.method(), Method::PUT);
        assert_eq!(Verb::Remove.method(), Method::DELETE);
        assert!(!Verb::Read.is_mutating());
        assert!(Verb::Create.is_mutating() && Verb::Replace.is_mutating());
        assert!(Verb::Remove.is_mutating());
    }

    #[test]
    fn test_success_payload() {
        let body = r#"{"data":[{"node":"pve1","status":"online"}],"success":true}"#;
        let nodes: Option<Vec<Node>> = interpret(200, body, "GET /nodes").unwrap();
        assert_eq!(nodes, Some(vec![Node { node: "pve1".into(), status: "online".into() }]));
    }

    #[test]
    fn test_empty_body_is_absent() {
        let result: Option<Node> = interpret(200, "", "DELETE /pools/a").unwrap();
        assert!(result.is_none());
        let result: Option<Node> = interpret(204, "  \n", "DELETE /pools/a").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_status_wins_over_unparsable_body() {
        let err = interpret::<Node>(401, "not json at all", "GET /nodes").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);

        let err = interpret::<Node>(403, "{broken", "GET /nodes").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        let err = interpret::<Node>(502, "<html>bad gateway</html>", "GET /nodes").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_envelope_failure_on_success_status() {
        let body = r#"{"success":false,"errors":{"vmid":"already in use"}}"#;
        let err = interpret::<Value>(200, body, "POST /nodes/pve1/qemu").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(err.to_string().contains("already in use"));
    }

    #[test]
    fn test_failure_envelope_wins_over_mistyped_data() {
        let body =
            r#"{"success":false,"errors":{"vmid":"already in use"},"data":"UPID:partial"}"#;
        let err = interpret::<Node>(200, body, "POST /nodes/pve1/qemu").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status(), Some(200));
        assert!(err.to_string().contains("vmid: already in use"));
    }

    #[test]
    fn test_undecodable_success_body() {
        let err = interpret::<Node>(200, "<html>maintenance</html>", "GET /nodes").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
        assert_eq!(err.raw_body(), Some("<html>maintenance</html>"));
    }
}
