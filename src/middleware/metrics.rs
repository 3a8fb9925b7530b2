//! Metrics middleware.

use std::time::Instant;

use crate::context::Context;
use crate::error::Result;
use crate::http::{Request, Response};
use crate::middleware::{Handler, Middleware};
use crate::observability::metrics;

/// Record a counter and latency histogram for every call.
pub fn metrics() -> Middleware {
    Middleware::from_fn(measure)
}

async fn measure(ctx: Context, req: Request, next: Handler) -> Result<Response> {
    let method = req.method().to_string();
    let start = Instant::now();

    let result = next.call(ctx, req).await;
    match &result {
        Ok(res) => metrics::record_request(&method, res.status(), start),
        Err(e) => metrics::record_error(&method, e.kind()),
    }
    result
}
