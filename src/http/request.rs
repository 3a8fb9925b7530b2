//! Outbound request descriptor and its builder.
//!
//! # Responsibilities
//! - Parse the target URL and method at build time (construction errors)
//! - Collect payload, query parameters and headers before the request exists
//!
//! # Design Decisions
//! - URL, method and payload are fixed once built
//! - Headers live in a [`HeaderStore`] so middlewares can adjust them before `next`

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;
use reqwest::Method;
use url::Url;

use crate::error::{Error, Result};
use crate::http::header::HeaderStore;

/// A boxed stream of payload chunks.
pub type PayloadStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + Sync + 'static>>;

/// Request payload.
pub enum Payload {
    /// In-memory payload.
    Bytes(Bytes),
    /// Streamed payload, read once by the transport.
    Stream(PayloadStream),
}

impl Payload {
    /// Wrap a chunk stream as payload.
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + Sync + 'static,
    {
        Payload::Stream(Box::pin(stream))
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Payload::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(bytes.into())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Bytes(text.into())
    }
}

impl From<&'static str> for Payload {
    fn from(text: &'static str) -> Self {
        Payload::Bytes(Bytes::from_static(text.as_bytes()))
    }
}

/// An outbound HTTP call.
#[derive(Debug)]
pub struct Request {
    url: Url,
    method: Method,
    headers: HeaderStore,
    payload: Option<Payload>,
}

impl Request {
    /// Start building a request for `url` with `method` (e.g. `"GET"`).
    pub fn builder(url: impl Into<String>, method: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(url, method)
    }

    /// Shorthand for a bodiless GET request.
    pub fn get(url: impl Into<String>) -> Result<Self> {
        Self::builder(url, "GET").build()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn headers(&self) -> &HeaderStore {
        &self.headers
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Take the payload out of the request, leaving none behind.
    pub fn take_payload(&mut self) -> Option<Payload> {
        self.payload.take()
    }
}

/// Builder for [`Request`].
///
/// Options are recorded in call order and applied by [`RequestBuilder::build`]
/// after the URL has been parsed.
#[derive(Debug)]
pub struct RequestBuilder {
    url: String,
    method: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    payload: Option<Payload>,
}

impl RequestBuilder {
    fn new(url: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            query: Vec::new(),
            headers: Vec::new(),
            payload: None,
        }
    }

    /// Set the request payload.
    pub fn payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Append a query parameter to the URL.
    pub fn query_param(mut self, param: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((param.into(), value.into()));
        self
    }

    /// Add a single header value.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Add every value of a multi-value header mapping.
    pub fn headers(mut self, headers: HashMap<String, Vec<String>>) -> Self {
        for (key, values) in headers {
            for value in values {
                self.headers.push((key.clone(), value));
            }
        }
        self
    }

    /// Validate and construct the request.
    pub fn build(self) -> Result<Request> {
        let mut url = Url::parse(&self.url).map_err(|source| Error::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;

        let method = Method::from_bytes(self.method.as_bytes())
            .map_err(|_| Error::InvalidMethod(self.method.clone()))?;

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }

        Ok(Request {
            url,
            method,
            headers: self.headers.into_iter().collect(),
            payload: self.payload,
        })
    }
}
