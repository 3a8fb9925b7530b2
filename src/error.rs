//! Error types for fetch-chain.
//!
//! # Taxonomy
//! - Construction: malformed URL, method or client configuration
//! - Transport: connection, timeout and cancellation failures (never retried here)
//! - Status: raised by a registered status-code error handler
//! - Body: I/O failures while draining or closing a response body

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Boxed error returned by user supplied error handlers and transports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`Client::fetch`](crate::Client::fetch) and the request builder.
#[derive(Debug, Error)]
pub enum Error {
    /// The target URL could not be parsed.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP method is not a valid token.
    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    /// The client builder rejected its configuration.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The transport failed before a response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A registered error handler rejected the response.
    #[error("response with status {status} rejected: {source}")]
    Status {
        status: u16,
        #[source]
        source: BoxError,
    },

    /// Reading or closing a body failed.
    #[error(transparent)]
    Body(#[from] BodyError),
}

impl Error {
    /// Status code of the rejected response, if this is a status error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the error came from the transport layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidUrl { .. } | Error::InvalidMethod(_) | Error::InvalidConfig(_) => {
                "construction"
            }
            Error::Transport(e) => e.kind(),
            Error::Status { .. } => "status",
            Error::Body(_) => "body",
        }
    }
}

/// Failures reported by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The call did not complete within its timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller's context was cancelled.
    #[error("request cancelled")]
    Cancelled,

    /// The connection could not be established (DNS, refused, TLS).
    #[error("connection failed: {0}")]
    Connect(String),

    /// The transport refused to build the request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Other(#[source] BoxError),
}

impl TransportError {
    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Timeout(_) => "timeout",
            TransportError::Cancelled => "cancelled",
            TransportError::Connect(_) => "connect",
            TransportError::InvalidRequest(_) => "invalid_request",
            TransportError::Other(_) => "other",
        }
    }
}

/// Failures while consuming a response body.
#[derive(Debug, Error)]
pub enum BodyError {
    /// The body was already consumed or closed.
    #[error("body is closed")]
    Closed,

    /// Reading from the underlying stream failed.
    #[error("failed to read body: {0}")]
    Read(#[from] io::Error),

    /// The body could not be decoded as JSON.
    #[error("failed to decode body: {0}")]
    Decode(#[from] serde_json::Error),
}
