//! Call-scoped options and status-code error handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::error::BoxError;
use crate::http::Response;

/// Options applying to a single `fetch`, never shared between calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    timeout: Option<Duration>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `timeout` for this call instead of the client default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The timeout override, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

type CheckFn = dyn Fn(&Response) -> Result<(), BoxError> + Send + Sync;

/// Turns a received response with a given status into an error.
#[derive(Clone)]
pub struct ErrorHandler {
    check: Arc<CheckFn>,
}

impl ErrorHandler {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Response) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
        }
    }

    /// Run the handler; `Err` rejects the response.
    pub fn check(&self, response: &Response) -> Result<(), BoxError> {
        (self.check)(response)
    }
}

impl std::fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ErrorHandler")
    }
}
