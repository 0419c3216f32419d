//! JSON line codec for the dispatcher.
//!
//! One request is read per call to [`LineHandler::serve`]: a single JSON
//! object terminated by a newline (or EOF), bounded by the configured size
//! limit. The limit applies to the request bytes; the newline delimiter does
//! not count toward it. The reply is one JSON-RPC 2.0 response object followed by a
//! newline. The dispatcher itself never sees bytes; it only receives decoded
//! [`Request`] values.

use std::io::{self, Read, Write};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::RpcError;
use crate::module::{CapabilityModule, DISPATCH_TARGET};
use crate::request::{JSONRPC_VERSION, Request};

/// Error member of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorObject {
    /// JSON-RPC error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
    /// Structured detail, always tagged with `kind`.
    pub data: Value,
}

impl From<&RpcError> for ErrorObject {
    fn from(error: &RpcError) -> Self {
        Self {
            code: error.code(),
            message: error.to_string(),
            data: error.data(),
        }
    }
}

/// A JSON-RPC 2.0 response envelope.
///
/// Exactly one of `result` and `error` is present. A successful call whose
/// result is `null` still serializes `"result": null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// Protocol version echoed from the request.
    pub jsonrpc: String,
    /// Correlation id echoed from the request, `null` when unknown.
    pub id: Value,
    /// Handler output on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

impl Response {
    /// Builds a success response.
    #[must_use]
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id: id.unwrap_or(Value::Null),
            result: Some(result),
            error: None,
        }
    }

    /// Builds a failure response.
    #[must_use]
    pub fn failure(id: Option<Value>, error: &RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id: id.unwrap_or(Value::Null),
            result: None,
            error: Some(ErrorObject::from(error)),
        }
    }

    /// Wraps the outcome of executing `request`.
    #[must_use]
    pub fn for_request(request: &Request, outcome: Result<Value, RpcError>) -> Self {
        let mut response = match outcome {
            Ok(result) => Self::success(request.id.clone(), result),
            Err(error) => Self::failure(request.id.clone(), &error),
        };
        response.jsonrpc.clone_from(&request.jsonrpc);
        response
    }

    /// Whether this response carries an error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Parses and validates one request line, enforcing `max_request_bytes`.
///
/// A single trailing newline is not counted toward the limit.
///
/// # Errors
///
/// Returns `RequestTooLarge` when the line exceeds the limit, and otherwise
/// the errors of [`Request::parse`] and [`Request::validate`].
pub fn parse_request(line: &[u8], max_request_bytes: usize) -> Result<Request, RpcError> {
    let body = line.strip_suffix(b"\n").unwrap_or(line);
    enforce_limit(body.len(), max_request_bytes)?;
    let request = Request::parse(body)?;
    request.validate()?;
    Ok(request)
}

/// Writer that frames responses as JSON lines.
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Wraps an output stream.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes `response` followed by a newline and flushes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_response(&mut self, response: &Response) -> Result<(), RpcError> {
        serde_json::to_writer(&mut self.writer, response)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Serves one JSON line request per stream against a dispatcher.
#[derive(Clone)]
pub struct LineHandler {
    dispatcher: Arc<dyn CapabilityModule>,
    max_request_bytes: usize,
}

impl LineHandler {
    /// Creates a handler over a shared dispatcher.
    #[must_use]
    pub fn new(dispatcher: Arc<dyn CapabilityModule>, max_request_bytes: usize) -> Self {
        Self {
            dispatcher,
            max_request_bytes,
        }
    }

    /// Largest request line accepted, in bytes.
    #[must_use]
    pub const fn max_request_bytes(&self) -> usize {
        self.max_request_bytes
    }

    /// Decodes `line`, dispatches it, and builds the response.
    #[must_use]
    pub fn respond(&self, line: &[u8]) -> Response {
        let request = match parse_request(line, self.max_request_bytes) {
            Ok(request) => request,
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "rejected request line");
                return Response::failure(None, &error);
            }
        };

        let outcome = self.dispatcher.execute(&request);
        if let Err(error) = &outcome {
            warn!(
                target: DISPATCH_TARGET,
                method = request.method.as_str(),
                code = error.code(),
                %error,
                "request failed"
            );
        }
        Response::for_request(&request, outcome)
    }

    /// Reads one request line from `stream` and writes one response line.
    ///
    /// A stream that closes before sending any bytes gets no response.
    ///
    /// # Errors
    ///
    /// Returns an error only when the response cannot be written.
    pub fn serve<S: Read + Write>(&self, mut stream: S) -> Result<(), RpcError> {
        let response = match read_request_line(&mut stream, self.max_request_bytes) {
            Ok(Some(line)) => self.respond(&line),
            Ok(None) => {
                debug!(target: DISPATCH_TARGET, "client disconnected without request");
                return Ok(());
            }
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "failed to read request");
                Response::failure(None, &error)
            }
        };

        ResponseWriter::new(&mut stream).write_response(&response)
    }
}

impl std::fmt::Debug for LineHandler {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("LineHandler")
            .field("dispatcher", &self.dispatcher.name())
            .field("max_request_bytes", &self.max_request_bytes)
            .finish()
    }
}

/// Reads a bounded request line from the stream.
///
/// Returns `Ok(None)` if the stream ends before any data arrives, and
/// `Ok(Some(bytes))` once a newline (or EOF after partial data) is seen. The
/// returned bytes exclude the newline.
fn read_request_line<R: Read>(
    stream: &mut R,
    max_request_bytes: usize,
) -> Result<Option<Vec<u8>>, RpcError> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];

    loop {
        let bytes_read = read_with_retry(stream, &mut chunk)?;
        let received = chunk.get(..bytes_read).unwrap_or_default();

        if received.is_empty() {
            return Ok(if buffer.is_empty() {
                None
            } else {
                Some(buffer)
            });
        }

        if let Some(newline_pos) = received.iter().position(|b| *b == b'\n') {
            buffer.extend_from_slice(received.get(..newline_pos).unwrap_or_default());
            enforce_limit(buffer.len(), max_request_bytes)?;
            return Ok(Some(buffer));
        }

        buffer.extend_from_slice(received);
        enforce_limit(buffer.len(), max_request_bytes)?;
    }
}

/// Reads from the stream, retrying on interrupts.
fn read_with_retry<R: Read>(stream: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match stream.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}

fn enforce_limit(size: usize, max_request_bytes: usize) -> Result<(), RpcError> {
    if size > max_request_bytes {
        return Err(RpcError::request_too_large(size, max_request_bytes));
    }
    Ok(())
}
