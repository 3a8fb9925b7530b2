//! Transport adapter.
//!
//! # Responsibilities
//! - Resolve the effective timeout for one call (override, default, context deadline)
//! - Translate a [`Request`] into a [`TransportRequest`]
//! - Race the call against cancellation and the timeout
//! - Wrap the raw result into a [`Response`]

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::client::CallOptions;
use crate::context::Context;
use crate::error::{Result, TransportError};
use crate::http::{Body, HeaderStore, Request, Response};
use crate::transport::{Transport, TransportRequest};

/// Wraps a [`Transport`] with the client-wide default timeout.
#[derive(Clone)]
pub struct TransportAdapter {
    transport: Arc<dyn Transport>,
    default_timeout: Duration,
}

impl TransportAdapter {
    pub fn new(transport: Arc<dyn Transport>, default_timeout: Duration) -> Self {
        Self {
            transport,
            default_timeout,
        }
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Timeout applied to one call: the override if present, else the
    /// default, never beyond the context deadline.
    pub fn effective_timeout(&self, ctx: &Context, options: &CallOptions) -> Duration {
        let timeout = options.timeout().unwrap_or(self.default_timeout);
        match ctx.remaining() {
            Some(remaining) => remaining.min(timeout),
            None => timeout,
        }
    }

    /// Execute `request` through the transport.
    pub async fn execute(
        &self,
        ctx: &Context,
        mut request: Request,
        options: &CallOptions,
    ) -> Result<Response> {
        if ctx.is_cancelled() {
            return Err(TransportError::Cancelled.into());
        }

        let timeout = self.effective_timeout(ctx, options);
        let method = request.method().clone();
        let url = request.url().clone();

        tracing::debug!(
            method = %method,
            url = %url,
            timeout = ?timeout,
            "Dispatching request to transport"
        );

        let transport_request = TransportRequest {
            method,
            url,
            headers: request.headers().values(),
            body: request.take_payload(),
            timeout,
        };

        let start = Instant::now();
        let call = self.transport.execute(transport_request);

        let raw = tokio::select! {
            biased;
            _ = ctx.cancelled() => {
                tracing::debug!("Request cancelled by caller context");
                return Err(TransportError::Cancelled.into());
            }
            result = tokio::time::timeout(timeout, call) => match result {
                Ok(Ok(raw)) => raw,
                Ok(Err(e)) => {
                    tracing::debug!(error = %e, kind = e.kind(), "Transport failed");
                    return Err(e.into());
                }
                Err(_) => {
                    tracing::debug!(timeout = ?timeout, "Transport call timed out");
                    return Err(TransportError::Timeout(timeout).into());
                }
            },
        };

        tracing::debug!(
            status = raw.status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Transport returned response"
        );

        let content_length = raw
            .content_length
            .and_then(|len| i64::try_from(len).ok())
            .unwrap_or(-1);

        Ok(Response::new(
            raw.status,
            content_length,
            HeaderStore::from(raw.headers),
            Body::from_stream(raw.body),
        ))
    }
}

impl std::fmt::Debug for TransportAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportAdapter")
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}
