//! Response body handle.
//!
//! # Consumption Modes
//! - `raw()`: streaming `AsyncRead` access; the caller closes the body
//! - `bytes()`: drains the stream into memory and closes it
//!
//! # Design Decisions
//! - A body is readable once; after `bytes()` or `close()` every read fails
//!   with [`BodyError::Closed`]
//! - Dropping an open body releases the underlying connection

use std::fmt;
use std::io;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::{stream, Stream};
use serde::de::DeserializeOwned;
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;

use crate::error::BodyError;

/// A boxed stream of body chunks.
pub type BodyStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + 'static>>;

/// Streaming reader returned by [`Body::raw`].
///
/// One reader lives as long as the body, so bytes it has buffered but not
/// yet handed out are still there on the next `raw()` or `bytes()`.
pub type BodyReader = StreamReader<BodyStream, Bytes>;

enum State {
    Open(BodyReader),
    Closed,
}

/// Lazily consumed byte stream owned by a [`Response`](crate::Response).
pub struct Body {
    state: State,
}

impl Body {
    /// Wrap a chunk stream.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        Self {
            state: State::Open(StreamReader::new(Box::pin(stream) as BodyStream)),
        }
    }

    /// A body holding `bytes` in memory.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self::from_stream(stream::once(async move { Ok(bytes) }))
    }

    /// An open body with no content.
    pub fn empty() -> Self {
        Self::from_stream(stream::empty())
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// Raw streaming access.
    ///
    /// The body stays open after reading; call [`Body::close`] (or drop the
    /// body) to release the connection.
    pub fn raw(&mut self) -> Result<&mut BodyReader, BodyError> {
        match &mut self.state {
            State::Open(reader) => Ok(reader),
            State::Closed => Err(BodyError::Closed),
        }
    }

    /// Release the underlying stream.
    ///
    /// Closing an already closed body fails with [`BodyError::Closed`].
    pub fn close(&mut self) -> Result<(), BodyError> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(_) => Ok(()),
            State::Closed => Err(BodyError::Closed),
        }
    }

    /// Read the whole body and close it.
    ///
    /// The body is closed even when a read fails midway.
    pub async fn bytes(&mut self) -> Result<Bytes, BodyError> {
        let mut reader = match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(reader) => reader,
            State::Closed => return Err(BodyError::Closed),
        };

        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(Bytes::from(buf))
    }

    /// Read the whole body as UTF-8 text (lossy) and close it.
    pub async fn text(&mut self) -> Result<String, BodyError> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read the whole body as JSON and close it.
    pub async fn json<T: DeserializeOwned>(&mut self) -> Result<T, BodyError> {
        let bytes = self.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("closed", &self.is_closed())
            .finish()
    }
}
