//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! Request + CallOptions + Context
//!     → adapter.rs (effective timeout, header snapshot, cancellation)
//!     → Transport::execute (generic capability, e.g. reqwest_transport.rs)
//!     → TransportResponse
//!     → adapter.rs wraps it into a Response
//! ```
//!
//! # Design Decisions
//! - The timeout travels by value with each call; no transport state is mutated
//! - Transport failures are surfaced as-is, never retried at this layer
//! - `Transport` is the one trait seam, so tests can swap in a scripted transport

pub mod adapter;
pub mod reqwest_transport;

use std::collections::HashMap;
use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::Method;
use url::Url;

use crate::error::TransportError;
use crate::http::{BodyStream, Payload};

pub use adapter::TransportAdapter;
pub use reqwest_transport::ReqwestTransport;

/// A request as handed to the transport.
#[derive(Debug)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HashMap<String, Vec<String>>,
    pub body: Option<Payload>,
    /// Deadline for this call only.
    pub timeout: Duration,
}

/// A raw response as returned by the transport.
pub struct TransportResponse {
    pub status: u16,
    /// `None` when the length is unknown (chunked, streamed).
    pub content_length: Option<u64>,
    pub headers: HashMap<String, Vec<String>>,
    pub body: BodyStream,
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Generic HTTP transport capability.
///
/// Implementations own connection pooling, TLS and redirects. They should
/// honor [`TransportRequest::timeout`]; the adapter enforces it as well.
pub trait Transport: Send + Sync + 'static {
    /// Perform one HTTP exchange.
    fn execute(
        &self,
        request: TransportRequest,
    ) -> BoxFuture<'static, Result<TransportResponse, TransportError>>;
}
