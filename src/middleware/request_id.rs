//! Request ID propagation.
//!
//! # Responsibilities
//! - Attach a UUID v4 `X-Request-ID` to requests that lack one
//! - Mirror the id onto the response when the server does not echo it
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A caller-provided id is never replaced

use uuid::Uuid;

use crate::context::Context;
use crate::error::Result;
use crate::http::{Request, Response};
use crate::middleware::{Handler, Middleware};

/// Header carrying the correlation id.
pub const X_REQUEST_ID: &str = "X-Request-ID";

/// Correlation id for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new random request ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ensure every request carries an `X-Request-ID`.
pub fn request_id() -> Middleware {
    Middleware::from_fn(assign_request_id)
}

async fn assign_request_id(ctx: Context, req: Request, next: Handler) -> Result<Response> {
    let id = match req.headers().get(X_REQUEST_ID) {
        Some(existing) => RequestId(existing),
        None => {
            let id = RequestId::new();
            req.headers().set(X_REQUEST_ID, id.as_str());
            id
        }
    };

    let res = next.call(ctx, req).await?;
    if !res.headers().contains(X_REQUEST_ID) {
        res.headers().set(X_REQUEST_ID, id.0);
    }
    Ok(res)
}
