//! HTTP object model.
//!
//! # Data Flow
//! ```text
//! RequestBuilder (url, method, payload, query, headers)
//!     → Request (owned by caller until fetch)
//!     → [middleware chain, transport]
//!     → Response (status, content length, header snapshot, body)
//!     → Body (raw stream or buffered bytes, readable once)
//! ```

pub mod body;
pub mod header;
pub mod request;
pub mod response;

pub use body::{Body, BodyReader, BodyStream};
pub use header::{canonical_key, HeaderStore};
pub use request::{Payload, PayloadStream, Request, RequestBuilder};
pub use response::Response;
