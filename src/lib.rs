//! Composable HTTP client pipeline.
//!
//! Requests flow through a right-to-left composed middleware chain into a
//! pluggable transport; responses may be rejected by status-code handlers.
//!
//! ```ignore
//! use fetch_chain::{Client, Context, Request};
//! use fetch_chain::middleware::{logging::logging, request_id::request_id};
//!
//! let client = Client::builder()
//!     .middleware(request_id())
//!     .middleware(logging())
//!     .error_handler(404, |_| Err("not found".into()))
//!     .build()?;
//!
//! let req = Request::builder("https://example.com/items", "GET")
//!     .query_param("page", "2")
//!     .build()?;
//! let mut res = client.fetch(&Context::background(), req).await?;
//! let text = res.body().text().await?;
//! ```

// Core pipeline
pub mod client;
pub mod context;
pub mod http;
pub mod middleware;
pub mod transport;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod observability;

pub use client::{CallOptions, Client, ClientBuilder, ErrorHandler};
pub use config::ClientConfig;
pub use context::Context;
pub use error::{BodyError, BoxError, Error, Result, TransportError};
pub use http::{Body, HeaderStore, Payload, Request, RequestBuilder, Response};
pub use middleware::{chain, Handler, Middleware};
pub use transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
