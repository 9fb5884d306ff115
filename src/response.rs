//! response interpretation
//!
//! classifies a raw `(status, headers, body)` triple into a decoded payload,
//! an undecoded response, or a typed error.

use crate::error::{Error, ErrorKind, Result};
use crate::graph::GraphErrorDetail;
use crate::request::HttpComponent;
use reqwest::header::{HeaderMap, LOCATION};
use serde_json::Value;
use tracing::{debug, warn};

/// message returned in place of a `304 Not Modified`
pub const NOT_MODIFIED_MESSAGE: &str = "Response not modified";

/// an http response as returned by a transport
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// http status code
    pub status: u16,
    /// response headers
    pub headers: HeaderMap,
    /// response body
    pub body: String,
}

impl RawResponse {
    /// create a response
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// the `Location` header, if present and valid utf-8
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }
}

/// successful outcome of [`interpret`]
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// json body
    Json(Value),
    /// undecoded response, when [`HttpComponent::Response`] was requested
    Raw(RawResponse),
}

/// the fixed payload standing in for a `304`
pub(crate) fn not_modified() -> Value {
    serde_json::json!({
        "message": NOT_MODIFIED_MESSAGE,
        "response_code": "304",
    })
}

/// classify a raw response
///
/// status is checked first, then the body shape. a `304` is not an error.
pub fn interpret(raw: &RawResponse, component: HttpComponent) -> Result<Decoded> {
    let status = raw.status;
    debug!(status, ?component, "interpreting graph response");

    match status {
        304 => Ok(Decoded::Json(not_modified())),
        200..=299 => match component {
            HttpComponent::Response => Ok(Decoded::Raw(raw.clone())),
            HttpComponent::Body => decode_body(raw).map(Decoded::Json),
        },
        300..=399 if component == HttpComponent::Response && raw.location().is_some() => {
            Ok(Decoded::Raw(raw.clone()))
        }
        400..=499 => Err(client_error(raw)),
        _ => Err(server_error(raw)),
    }
}

/// decode a success body; empty bodies decode to `null`
pub(crate) fn decode_body(raw: &RawResponse) -> Result<Value> {
    let body = raw.body.trim();
    if body.is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(body).map_err(|err| {
        graph_error(
            ErrorKind::BadFacebookResponse,
            raw,
            None,
            format!("undecodable body: {err}"),
        )
    })
}

fn client_error(raw: &RawResponse) -> Error {
    let parsed = serde_json::from_str::<Value>(&raw.body).ok();
    match parsed
        .as_ref()
        .and_then(GraphErrorDetail::from_body)
        .map(|detail| detail.message)
    {
        Some(message) => graph_error(ErrorKind::OAuthError, raw, parsed, message),
        None => graph_error(
            ErrorKind::ClientError,
            raw,
            parsed,
            format!("graph http error: {}", raw.status),
        ),
    }
}

fn server_error(raw: &RawResponse) -> Error {
    let parsed = serde_json::from_str::<Value>(&raw.body).ok();
    let message = parsed
        .as_ref()
        .and_then(GraphErrorDetail::from_body)
        .map(|detail| detail.message)
        .unwrap_or_else(|| format!("graph http error: {}", raw.status));
    graph_error(ErrorKind::ServerError, raw, parsed, message)
}

fn graph_error(kind: ErrorKind, raw: &RawResponse, parsed: Option<Value>, message: String) -> Error {
    warn!(status = raw.status, %kind, %message, "graph call failed");
    Error::Graph {
        kind,
        status: raw.status,
        body: raw.body.clone(),
        parsed,
        message,
    }
}
