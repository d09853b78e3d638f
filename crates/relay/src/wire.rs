//! JSON envelopes exchanged between a relay server and [`ProxyRelay`](crate::ProxyRelay).

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// Name of the query parameter carrying the remote path on both endpoints.
pub const PATH_PARAM: &str = "thunderstore_url";
pub const HTML_ENDPOINT: &str = "/api/gethtml";
pub const BINARY_ENDPOINT: &str = "/api/getmod";

/// Response body of the HTML endpoint, for success and failure alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlEnvelope {
    pub error: bool,
    pub message: String,
    #[serde(default)]
    pub html: String,
    /// Upstream HTTP status, present only when the upstream rejected the
    /// request. Servers that predate this field never send it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}
impl HtmlEnvelope {
    pub fn success(html: String) -> Self {
        Self {
            error: false,
            message: "fetched".to_string(),
            html,
            status: None,
        }
    }

    pub fn failure(kind: &ErrorKind) -> Self {
        Self {
            error: true,
            message: kind.to_string(),
            html: String::new(),
            status: upstream_status(kind),
        }
    }
}

/// Failure body of the binary endpoint; success is the raw archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryFailure {
    pub error: bool,
    pub message: String,
    /// Always `null`; kept so the shape matches the HTML envelope's payload slot.
    #[serde(rename = "mod", default)]
    pub payload: Option<()>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}
impl BinaryFailure {
    pub fn new(kind: &ErrorKind) -> Self {
        Self {
            error: true,
            message: kind.to_string(),
            payload: None,
            status: upstream_status(kind),
        }
    }
}

/// Inverse of the envelope mapping: what a client should raise for a failed
/// envelope.
pub(crate) fn failure_kind(message: &str, status: Option<u16>) -> ErrorKind {
    match status {
        Some(status) => ErrorKind::Upstream(status),
        None => ErrorKind::Transport(message.to_string()),
    }
}

fn upstream_status(kind: &ErrorKind) -> Option<u16> {
    match kind {
        ErrorKind::Upstream(status) => Some(*status),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_html_failure_shape() {
        let value = serde_json::to_value(HtmlEnvelope::failure(&ErrorKind::Upstream(404))).unwrap();
        assert_eq!(
            value,
            json!({
                "error": true,
                "message": "upstream rejected the request with status 404",
                "html": "",
                "status": 404,
            })
        );
    }

    #[test]
    fn test_transport_failure_has_no_status() {
        let value = serde_json::to_value(BinaryFailure::new(&ErrorKind::transport("reset"))).unwrap();
        assert_eq!(value, json!({"error": true, "message": "transport failure: reset", "mod": null}));
    }

    #[test]
    fn test_envelope_without_status_field() {
        let envelope: HtmlEnvelope =
            serde_json::from_str(r#"{"error": true, "message": "Request failed", "html": ""}"#).unwrap();
        assert_eq!(envelope.status, None);
        assert_eq!(
            failure_kind(&envelope.message, envelope.status),
            ErrorKind::Transport("Request failed".into())
        );
        assert_eq!(failure_kind("", Some(503)), ErrorKind::Upstream(503));
    }
}
