//! Response value object.
//!
//! # Design Decisions
//! - Built once per completed transport call, or synthesized by a
//!   short-circuiting middleware through [`Response::new`]
//! - Headers are a private snapshot of the response headers
//! - The body stays owned by the response until consumed or closed

use crate::http::body::Body;
use crate::http::header::HeaderStore;

/// Result of an HTTP exchange.
#[derive(Debug)]
pub struct Response {
    status: u16,
    content_length: i64,
    headers: HeaderStore,
    body: Body,
}

impl Response {
    /// Assemble a response. Use `-1` for an unknown content length.
    pub fn new(status: u16, content_length: i64, headers: HeaderStore, body: Body) -> Self {
        Self {
            status,
            content_length,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Content length in bytes, `-1` if unknown.
    pub fn content_length(&self) -> i64 {
        self.content_length
    }

    pub fn headers(&self) -> &HeaderStore {
        &self.headers
    }

    pub fn body(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn into_body(self) -> Body {
        self.body
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
