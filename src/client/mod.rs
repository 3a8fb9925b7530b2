//! Client orchestrator.
//!
//! # Data Flow
//! ```text
//! Client::fetch(ctx, request)
//!     → terminal handler (adapter + call options)
//!     → wrapped by the middleware chain, first registered outermost
//!     → handler invoked
//!     → status looked up in the error-handler map
//!     → Response, or Error::Status if the handler rejected it
//! ```
//!
//! # Design Decisions
//! - Configuration is frozen at build time and shared behind an `Arc`
//! - The terminal handler is built per call so call options never leak
//!   into concurrent calls
//! - Execution errors bypass the error-handler lookup

pub mod builder;
pub mod options;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub use builder::{ClientBuilder, DEFAULT_TIMEOUT};
pub use options::{CallOptions, ErrorHandler};

use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::http::{Request, Response};
use crate::middleware::{chain, Handler, Middleware};
use crate::transport::{ReqwestTransport, TransportAdapter};

/// HTTP client running every call through its middleware chain.
///
/// Cloning is cheap and clones share configuration.
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
pub(crate) struct ClientInner {
    pub(crate) adapter: TransportAdapter,
    pub(crate) middlewares: Vec<Middleware>,
    pub(crate) error_handlers: HashMap<u16, ErrorHandler>,
}

impl Client {
    /// Client over [`ReqwestTransport`] with no middlewares, no error
    /// handlers and the default timeout.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ClientInner {
                adapter: TransportAdapter::new(Arc::new(ReqwestTransport::new()), DEFAULT_TIMEOUT),
                middlewares: Vec::new(),
                error_handlers: HashMap::new(),
            }),
        }
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        ClientBuilder::from_config(config)?.build()
    }

    pub fn default_timeout(&self) -> Duration {
        self.inner.adapter.default_timeout()
    }

    /// Send `request` with the client defaults.
    pub async fn fetch(&self, ctx: &Context, request: Request) -> Result<Response> {
        self.fetch_with(ctx, request, CallOptions::default()).await
    }

    /// Send `request` with per-call options.
    pub async fn fetch_with(
        &self,
        ctx: &Context,
        request: Request,
        options: CallOptions,
    ) -> Result<Response> {
        let handler = chain(&self.inner.middlewares, self.terminal(options));
        let response = handler.call(ctx.clone(), request).await?;
        self.check_status(response)
    }

    fn terminal(&self, options: CallOptions) -> Handler {
        let adapter = self.inner.adapter.clone();
        Handler::new(move |ctx, req| {
            let adapter = adapter.clone();
            async move { adapter.execute(&ctx, req, &options).await }
        })
    }

    fn check_status(&self, response: Response) -> Result<Response> {
        let status = response.status();
        let Some(handler) = self.inner.error_handlers.get(&status) else {
            return Ok(response);
        };

        match handler.check(&response) {
            Ok(()) => Ok(response),
            Err(source) => {
                tracing::debug!(status, error = %source, "Response rejected by error handler");
                Err(Error::Status { status, source })
            }
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
