//! error types
//!
//! structured errors for config, transport, json, and graph api responses.

use crate::graph::GraphErrorDetail;
use std::fmt;

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// boxed error a [`crate::Transport`] reports for network failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// classification of a failed call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// network-level failure, no response to classify
    TransportError,
    /// 4xx without a structured error body
    ClientError,
    /// 4xx carrying an `error` object or a `{type, message}` pair
    OAuthError,
    /// 5xx or an unrecognized status
    ServerError,
    /// 2xx whose body could not be decoded
    BadFacebookResponse,
    /// local misconfiguration, never produced by a response
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::TransportError => "transport error",
            ErrorKind::ClientError => "client error",
            ErrorKind::OAuthError => "oauth error",
            ErrorKind::ServerError => "server error",
            ErrorKind::BadFacebookResponse => "bad facebook response",
            ErrorKind::Config => "config error",
        };
        f.write_str(name)
    }
}

/// error type for the graph client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind}: {message}")]
    Graph {
        /// classification of the response
        kind: ErrorKind,
        /// http status of the response
        status: u16,
        /// raw response body
        body: String,
        /// parsed body, when it was json
        parsed: Option<serde_json::Value>,
        /// top-level message
        message: String,
    },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(Box::new(err))
    }
}

impl Error {
    /// wrap a network failure from a custom transport
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Error::Transport(err.into())
    }

    /// classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(_) => ErrorKind::TransportError,
            Error::Graph { kind, .. } => *kind,
            Error::Config(_) | Error::Url(_) | Error::Json(_) => ErrorKind::Config,
        }
    }

    /// http status if the error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Graph { status, .. } => Some(*status),
            Error::Transport(err) => err
                .downcast_ref::<reqwest::Error>()
                .and_then(reqwest::Error::status)
                .map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// structured graph error detail, if the body carried one
    pub fn graph_error(&self) -> Option<GraphErrorDetail> {
        match self {
            Error::Graph {
                parsed: Some(parsed),
                ..
            } => GraphErrorDetail::from_body(parsed),
            _ => None,
        }
    }

    /// true if the error looks like an auth failure
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Error::Graph {
                kind: ErrorKind::OAuthError,
                ..
            }
        ) || matches!(self, Error::Graph { status: 401 | 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph_error(kind: ErrorKind, status: u16, parsed: Option<serde_json::Value>) -> Error {
        Error::Graph {
            kind,
            status,
            body: String::new(),
            parsed,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_is_auth_error() {
        assert!(graph_error(ErrorKind::OAuthError, 400, None).is_auth_error());
        assert!(graph_error(ErrorKind::ClientError, 401, None).is_auth_error());
        assert!(graph_error(ErrorKind::ClientError, 403, None).is_auth_error());
        assert!(!graph_error(ErrorKind::ServerError, 500, None).is_auth_error());
        assert!(!Error::Config("bad".to_string()).is_auth_error());
    }

    #[test]
    fn test_kind_and_status() {
        let err = graph_error(ErrorKind::BadFacebookResponse, 200, None);
        assert_eq!(err.kind(), ErrorKind::BadFacebookResponse);
        assert_eq!(err.status(), Some(200));

        let err = Error::Config("bad".to_string());
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_transport_error_from_any_source() {
        let err = Error::transport(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(err.kind(), ErrorKind::TransportError);
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "transport error: connection refused");

        let err = Error::transport("timed out");
        assert_eq!(err.kind(), ErrorKind::TransportError);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_graph_error_detail() {
        let err = graph_error(
            ErrorKind::OAuthError,
            400,
            Some(json!({
                "error": {
                    "message": "Invalid OAuth access token.",
                    "type": "OAuthException",
                    "code": 190,
                    "fbtrace_id": "abc"
                }
            })),
        );
        let detail = err.graph_error().unwrap();
        assert_eq!(detail.error_type.as_deref(), Some("OAuthException"));
        assert_eq!(detail.code, Some(190));
        assert_eq!(detail.fbtrace_id.as_deref(), Some("abc"));

        assert!(graph_error(ErrorKind::ClientError, 404, None)
            .graph_error()
            .is_none());
    }

    #[test]
    fn test_display() {
        let err = graph_error(ErrorKind::ServerError, 502, None);
        assert_eq!(err.to_string(), "server error: boom");
    }
}
