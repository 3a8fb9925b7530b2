//! Middleware pipeline.
//!
//! # Data Flow
//! ```text
//! chain([A, B, C], T):
//!
//!     A-before → B-before → C-before → T
//!                                      │
//!     A-after  ← B-after  ← C-after  ←─┘
//! ```
//!
//! A [`Middleware`] turns the next [`Handler`] into a new handler. It may
//! adjust the request before calling `next`, return early without calling
//! it, adjust the response afterwards, or replace the error.
//!
//! # Design Decisions
//! - Composition folds right-to-left, so registration order is "before" order
//! - Zero middlewares yield the terminal handler itself
//! - Handlers hold no per-call state; a composed chain is shareable across tasks
//! - Handler futures are `'static`, so `next.call(..)` never borrows `next`

pub mod auth;
pub mod logging;
pub mod metrics;
pub mod request_id;

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::context::Context;
use crate::error::Result;
use crate::http::{Request, Response};

type HandlerFn = dyn Fn(Context, Request) -> BoxFuture<'static, Result<Response>> + Send + Sync;

/// A function from `(Context, Request)` to a response future.
#[derive(Clone)]
pub struct Handler {
    inner: Arc<HandlerFn>,
}

impl Handler {
    /// Wrap an async function as a handler.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response>> + Send + 'static,
    {
        Self {
            inner: Arc::new(
                move |ctx: Context, req: Request| -> BoxFuture<'static, Result<Response>> {
                    Box::pin(f(ctx, req))
                },
            ),
        }
    }

    /// Invoke the handler.
    pub fn call(&self, ctx: Context, req: Request) -> BoxFuture<'static, Result<Response>> {
        (self.inner)(ctx, req)
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Handler")
    }
}

/// A handler-wrapping function.
#[derive(Clone)]
pub struct Middleware {
    wrap: Arc<dyn Fn(Handler) -> Handler + Send + Sync>,
}

impl Middleware {
    /// Build a middleware from a `next -> handler` function.
    pub fn new<F>(wrap: F) -> Self
    where
        F: Fn(Handler) -> Handler + Send + Sync + 'static,
    {
        Self {
            wrap: Arc::new(wrap),
        }
    }

    /// Build a middleware from an async function receiving `next` per call.
    ///
    /// ```ignore
    /// async fn api_key(ctx: Context, req: Request, next: Handler) -> Result<Response> {
    ///     req.headers().set("x-api-key", "secret");
    ///     next.call(ctx, req).await
    /// }
    ///
    /// let mw = Middleware::from_fn(api_key);
    /// ```
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Context, Request, Handler) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response>> + Send + 'static,
    {
        let f = Arc::new(f);
        Self::new(move |next| {
            let f = f.clone();
            Handler::new(move |ctx, req| f(ctx, req, next.clone()))
        })
    }

    /// Wrap `next`, producing the outer handler.
    pub fn wrap(&self, next: Handler) -> Handler {
        (self.wrap)(next)
    }
}

impl std::fmt::Debug for Middleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Middleware")
    }
}

/// Compose `middlewares` around `terminal`.
///
/// The last middleware wraps the terminal first; the first registered ends
/// up outermost.
pub fn chain(middlewares: &[Middleware], terminal: Handler) -> Handler {
    middlewares
        .iter()
        .rev()
        .fold(terminal, |next, middleware| middleware.wrap(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, TransportError};
    use crate::http::{Body, HeaderStore};
    use std::sync::Mutex;

    type Trace = Arc<Mutex<Vec<String>>>;

    fn recording(name: &'static str, trace: Trace) -> Middleware {
        Middleware::from_fn(move |ctx, req, next| {
            let trace = trace.clone();
            async move {
                trace.lock().unwrap().push(format!("{name}-before"));
                let res = next.call(ctx, req).await;
                trace.lock().unwrap().push(format!("{name}-after"));
                res
            }
        })
    }

    fn terminal(trace: Trace) -> Handler {
        Handler::new(move |_ctx, _req| {
            let trace = trace.clone();
            async move {
                trace.lock().unwrap().push("T".to_string());
                Ok::<_, Error>(Response::new(200, 0, HeaderStore::new(), Body::empty()))
            }
        })
    }

    async fn cached(_ctx: Context, _req: Request, _next: Handler) -> Result<Response> {
        Ok(Response::new(
            203,
            6,
            HeaderStore::new(),
            Body::from_bytes("cached"),
        ))
    }

    async fn add_header(ctx: Context, req: Request, next: Handler) -> Result<Response> {
        req.headers().set("x-api-key", "secret");
        let res = next.call(ctx, req).await?;
        res.headers().add("x-middleware", "seen");
        Ok(res)
    }

    async fn echo_key(_ctx: Context, req: Request) -> Result<Response> {
        let headers = HeaderStore::new();
        if let Some(key) = req.headers().get("X-Api-Key") {
            headers.set("x-echo-key", key);
        }
        Ok(Response::new(200, -1, headers, Body::empty()))
    }

    async fn refuse(_ctx: Context, _req: Request) -> Result<Response> {
        Err(TransportError::Connect("refused".into()).into())
    }

    async fn refused_as_unavailable(ctx: Context, req: Request, next: Handler) -> Result<Response> {
        match next.call(ctx, req).await {
            Err(Error::Transport(TransportError::Connect(_))) => {
                Ok(Response::new(503, 0, HeaderStore::new(), Body::empty()))
            }
            other => other,
        }
    }

    fn request() -> Request {
        Request::get("http://localhost/").unwrap()
    }

    #[tokio::test]
    async fn test_onion_order() {
        let trace: Trace = Arc::default();
        let middlewares = vec![
            recording("A", trace.clone()),
            recording("B", trace.clone()),
            recording("C", trace.clone()),
        ];

        let handler = chain(&middlewares, terminal(trace.clone()));
        handler.call(Context::background(), request()).await.unwrap();

        assert_eq!(
            *trace.lock().unwrap(),
            vec!["A-before", "B-before", "C-before", "T", "C-after", "B-after", "A-after"]
        );
    }

    #[tokio::test]
    async fn test_empty_chain_is_terminal() {
        let trace: Trace = Arc::default();
        let handler = chain(&[], terminal(trace.clone()));
        let res = handler.call(Context::background(), request()).await.unwrap();

        assert_eq!(res.status(), 200);
        assert_eq!(*trace.lock().unwrap(), vec!["T"]);
    }

    #[tokio::test]
    async fn test_short_circuit_skips_inner_layers() {
        let trace: Trace = Arc::default();
        let cache = Middleware::from_fn(cached);
        let middlewares = vec![recording("A", trace.clone()), cache, recording("C", trace.clone())];

        let handler = chain(&middlewares, terminal(trace.clone()));
        let mut res = handler.call(Context::background(), request()).await.unwrap();

        assert_eq!(res.status(), 203);
        assert_eq!(res.body().text().await.unwrap(), "cached");
        assert_eq!(*trace.lock().unwrap(), vec!["A-before", "A-after"]);
    }

    #[tokio::test]
    async fn test_request_and_response_mutation() {
        let res = chain(&[Middleware::from_fn(add_header)], Handler::new(echo_key))
            .call(Context::background(), request())
            .await
            .unwrap();

        assert_eq!(res.headers().get("X-Echo-Key").as_deref(), Some("secret"));
        assert_eq!(res.headers().get("X-Middleware").as_deref(), Some("seen"));
    }

    #[tokio::test]
    async fn test_error_replacement() {
        let replace = Middleware::from_fn(refused_as_unavailable);
        let res = chain(&[replace], Handler::new(refuse))
            .call(Context::background(), request())
            .await
            .unwrap();
        assert_eq!(res.status(), 503);
    }

    #[tokio::test]
    async fn test_chain_is_reusable_across_tasks() {
        let trace: Trace = Arc::default();
        let handler = chain(&[recording("A", trace.clone())], terminal(trace.clone()));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let handler = handler.clone();
                tokio::spawn(async move { handler.call(Context::background(), request()).await })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap().status(), 200);
        }

        assert_eq!(trace.lock().unwrap().len(), 8 * 3);
    }
}
