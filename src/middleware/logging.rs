//! Request logging middleware.

use std::time::Instant;

use crate::context::Context;
use crate::error::Result;
use crate::http::{Request, Response};
use crate::middleware::request_id::X_REQUEST_ID;
use crate::middleware::{Handler, Middleware};

/// Log every call with method, URL, status and latency.
///
/// Register after [`request_id`](crate::middleware::request_id::request_id)
/// to have the id attached to the events.
pub fn logging() -> Middleware {
    Middleware::from_fn(log_call)
}

async fn log_call(ctx: Context, req: Request, next: Handler) -> Result<Response> {
    let method = req.method().clone();
    let url = req.url().clone();
    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .unwrap_or_else(|| "unknown".to_string());
    let start = Instant::now();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        url = %url,
        "Sending request"
    );

    match next.call(ctx, req).await {
        Ok(res) => {
            tracing::info!(
                request_id = %request_id,
                method = %method,
                url = %url,
                status = res.status(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Request completed"
            );
            Ok(res)
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                url = %url,
                kind = e.kind(),
                error = %e,
                "Request failed"
            );
            Err(e)
        }
    }
}
