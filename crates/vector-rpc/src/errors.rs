//! Error types for request decoding and dispatch failures.
//!
//! Every failure the dispatcher can report is an [`RpcError`] value. The four
//! client-facing decode and routing kinds (`DecodeParam`, `InsufficientParams`,
//! `InvalidType`, `NotImplemented`) keep the wording existing clients match
//! on; the remaining variants cover handler validation, node handle failures,
//! and the line codec.

use std::io;

use serde_json::{Value, json};
use thiserror::Error;

use crate::node::NodeError;

/// JSON-RPC code for a request line that is not valid JSON.
pub const PARSE_ERROR: i64 = -32700;
/// JSON-RPC code for a structurally invalid request object.
pub const INVALID_REQUEST: i64 = -32600;
/// JSON-RPC code for an unknown method.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// JSON-RPC code for parameters that fail decoding or validation.
pub const INVALID_PARAMS: i64 = -32602;
/// JSON-RPC code for failures inside the node or the dispatcher itself.
pub const INTERNAL_ERROR: i64 = -32603;

/// Errors surfaced while decoding and dispatching a request.
#[derive(Debug, Error)]
pub enum RpcError {
    /// `params` is not a positional array.
    #[error("could not decode, {message}")]
    DecodeParam { message: String },

    /// `params` holds fewer elements than the method requires.
    #[error("insufficient params, want {want} have {got}")]
    InsufficientParams { got: usize, want: usize },

    /// An element has the wrong JSON type or fails a domain check.
    #[error("invalid type on field {field}: {reason}")]
    InvalidType { field: String, reason: String },

    /// No module owns the requested method.
    #[error("{method} method not implemented")]
    NotImplemented { method: String },

    /// A decoded argument is outside the range the handler accepts.
    #[error("{field} not valid, {reason}")]
    Validation { field: String, reason: String },

    /// The node handle reported a failure.
    #[error(transparent)]
    Node(#[from] NodeError),

    /// A request line could not be parsed as JSON.
    #[error("malformed request: {message}")]
    MalformedRequest {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A request parsed as JSON but is not a usable request object.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// A request line exceeded the configured limit.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge { size: usize, max_size: usize },

    /// IO error while reading a request or writing a response.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A response could not be serialized.
    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl RpcError {
    /// Creates a decode error.
    pub fn decode_param(message: impl Into<String>) -> Self {
        Self::DecodeParam {
            message: message.into(),
        }
    }

    /// Creates an insufficient params error.
    #[must_use]
    pub const fn insufficient_params(got: usize, want: usize) -> Self {
        Self::InsufficientParams { got, want }
    }

    /// Creates an invalid type error.
    pub fn invalid_type(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidType {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a not implemented error.
    pub fn not_implemented(method: impl Into<String>) -> Self {
        Self::NotImplemented {
            method: method.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a malformed request error from a serde error.
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedRequest {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed request error with a custom message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a request too large error.
    #[must_use]
    pub const fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }

    /// Returns the JSON-RPC error code for this error.
    ///
    /// Parameter problems share `-32602`, unknown methods map to `-32601`, and
    /// node or infrastructure failures map to `-32603`.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::DecodeParam { .. }
            | Self::InsufficientParams { .. }
            | Self::InvalidType { .. }
            | Self::Validation { .. } => INVALID_PARAMS,
            Self::NotImplemented { .. } => METHOD_NOT_FOUND,
            Self::MalformedRequest { .. } => PARSE_ERROR,
            Self::InvalidRequest { .. } | Self::RequestTooLarge { .. } => INVALID_REQUEST,
            Self::Node(_) | Self::Io(_) | Self::Serialize(_) => INTERNAL_ERROR,
        }
    }

    /// Stable, machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DecodeParam { .. } => "decode_param",
            Self::InsufficientParams { .. } => "insufficient_params",
            Self::InvalidType { .. } => "invalid_type",
            Self::NotImplemented { .. } => "not_implemented",
            Self::Validation { .. } => "validation",
            Self::Node(_) => "node",
            Self::MalformedRequest { .. } => "malformed_request",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::RequestTooLarge { .. } => "request_too_large",
            Self::Io(_) => "io",
            Self::Serialize(_) => "serialize",
        }
    }

    /// Structured detail for the `data` member of a JSON-RPC error object.
    ///
    /// The object always carries `kind`; the remaining keys mirror the
    /// variant's fields so clients need not parse the message text.
    #[must_use]
    pub fn data(&self) -> Value {
        let kind = self.kind();
        match self {
            Self::DecodeParam { message }
            | Self::MalformedRequest { message, .. }
            | Self::InvalidRequest { message } => json!({ "kind": kind, "message": message }),
            Self::InsufficientParams { got, want } => {
                json!({ "kind": kind, "got": got, "want": want })
            }
            Self::InvalidType { field, reason } | Self::Validation { field, reason } => {
                json!({ "kind": kind, "field": field, "reason": reason })
            }
            Self::NotImplemented { method } => json!({ "kind": kind, "method": method }),
            Self::RequestTooLarge { size, max_size } => {
                json!({ "kind": kind, "size": size, "max_size": max_size })
            }
            Self::Node(error) => json!({ "kind": kind, "message": error.message() }),
            Self::Io(_) | Self::Serialize(_) => json!({ "kind": kind }),
        }
    }
}
