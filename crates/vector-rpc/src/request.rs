//! Request model shared by every capability module.
//!
//! A request is a method name plus untyped `params`. The transport layer
//! hands requests over already decoded; [`Request::parse`] covers the common
//! case of one JSON object per line.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::RpcError;

/// JSON-RPC protocol version assumed when a request omits it.
pub const JSONRPC_VERSION: &str = "2.0";

fn default_jsonrpc() -> String {
    JSONRPC_VERSION.to_owned()
}

/// A single remote procedure call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Request {
    /// Caller-chosen correlation id, echoed in the response.
    #[serde(default)]
    pub id: Option<Value>,
    /// Protocol version tag.
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    /// Method name, e.g. `net_peerCount`.
    pub method: String,
    /// Positional parameters, decoded by the owning handler.
    #[serde(default)]
    pub params: Value,
}

impl Request {
    /// Builds a request without an id.
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            id: None,
            jsonrpc: default_jsonrpc(),
            method: method.into(),
            params,
        }
    }

    /// Sets the correlation id.
    #[must_use]
    pub fn with_id(mut self, id: Value) -> Self {
        self.id = Some(id);
        self
    }

    /// Parses one request line.
    ///
    /// Trailing whitespace (including the newline delimiter) is trimmed
    /// before parsing.
    ///
    /// # Errors
    ///
    /// Returns `MalformedRequest` if the line is empty or not valid JSON and
    /// `InvalidRequest` if the JSON does not describe a request.
    pub fn parse(line: &[u8]) -> Result<Self, RpcError> {
        let trimmed = trim_trailing_whitespace(line);
        if trimmed.is_empty() {
            return Err(RpcError::malformed("empty request line"));
        }

        let value: Value = serde_json::from_slice(trimmed).map_err(RpcError::from_json_error)?;
        serde_json::from_value(value).map_err(|error| RpcError::invalid_request(error.to_string()))
    }

    /// Validates that the method name is usable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the method is empty or only whitespace.
    pub fn validate(&self) -> Result<(), RpcError> {
        if self.method.trim().is_empty() {
            return Err(RpcError::invalid_request("method field is empty"));
        }
        Ok(())
    }
}

/// Trims trailing ASCII whitespace from a byte slice.
fn trim_trailing_whitespace(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |pos| pos + 1);
    bytes.get(..end).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_minimal_request() {
        let request = Request::parse(br#"{"method":"net_version"}"#).expect("parse minimal");
        assert_eq!(request.method, "net_version");
        assert_eq!(request.params, Value::Null);
        assert_eq!(request.jsonrpc, "2.0");
        assert_eq!(request.id, None);
    }

    #[test]
    fn parses_full_request() {
        let input = br#"{"jsonrpc":"2.0","id":7,"method":"miner_start","params":[4]}"#;
        let request = Request::parse(input).expect("parse full");
        assert_eq!(request.id, Some(json!(7)));
        assert_eq!(request.params, json!([4]));
    }

    #[test]
    fn trims_trailing_whitespace() {
        let request = Request::parse(b"{\"method\":\"net_listening\"}  \r\n").expect("parse");
        assert_eq!(request.method, "net_listening");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            Request::parse(b"   \n"),
            Err(RpcError::MalformedRequest { .. })
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            Request::parse(b"not json"),
            Err(RpcError::MalformedRequest { .. })
        ));
    }

    #[test]
    fn rejects_json_without_method() {
        assert!(matches!(
            Request::parse(br#"{"params":[]}"#),
            Err(RpcError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn validates_blank_method() {
        let request = Request::new("  ", json!([]));
        assert!(matches!(
            request.validate(),
            Err(RpcError::InvalidRequest { .. })
        ));
    }
}
