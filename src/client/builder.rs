//! Client construction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::client::{Client, ClientInner, ErrorHandler};
use crate::config::ClientConfig;
use crate::config::validation::validate_config;
use crate::error::{BoxError, Error, Result};
use crate::http::Response;
use crate::middleware::{self, Middleware};
use crate::transport::{ReqwestTransport, Transport, TransportAdapter};

/// Default per-call timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Collects transport, middlewares, error handlers and the default timeout.
///
/// Nothing is validated until [`ClientBuilder::build`].
pub struct ClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    middlewares: Vec<Middleware>,
    error_handlers: HashMap<u16, ErrorHandler>,
    timeout: Duration,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            transport: None,
            middlewares: Vec::new(),
            error_handlers: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Seed a builder from a loaded configuration.
    ///
    /// Middlewares are registered in this order: request id and logging
    /// (when `log_requests`), metrics (when `metrics_enabled`), then
    /// default headers. Callers may append more before building.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        validate_config(config).map_err(|errors| {
            let joined = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Error::InvalidConfig(joined)
        })?;

        let transport = ReqwestTransport::with_settings(
            Duration::from_secs(config.timeouts.connect_secs),
            config.user_agent.as_deref(),
        )?;

        let mut builder = Self::new()
            .transport(transport)
            .timeout(Duration::from_secs(config.timeouts.request_secs));

        if config.observability.log_requests {
            builder = builder
                .middleware(middleware::request_id::request_id())
                .middleware(middleware::logging::logging());
        }
        if config.observability.metrics_enabled {
            builder = builder.middleware(middleware::metrics::metrics());
        }
        if !config.default_headers.is_empty() {
            builder = builder.middleware(middleware::auth::default_headers(
                config.default_headers.clone(),
            ));
        }

        Ok(builder)
    }

    /// Replace the transport. Defaults to [`ReqwestTransport`].
    pub fn transport(mut self, transport: impl Transport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Use an already shared transport.
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a caller-configured reqwest client as the transport.
    pub fn http_client(self, client: reqwest::Client) -> Self {
        self.transport(ReqwestTransport::from_client(client))
    }

    /// Append a middleware. The first appended runs outermost.
    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    pub fn middlewares(mut self, middlewares: impl IntoIterator<Item = Middleware>) -> Self {
        self.middlewares.extend(middlewares);
        self
    }

    /// Register a handler for responses with `status`.
    ///
    /// A later registration for the same status replaces the earlier one.
    pub fn error_handler<F>(mut self, status: u16, handler: F) -> Self
    where
        F: Fn(&Response) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.error_handlers.insert(status, ErrorHandler::new(handler));
        self
    }

    /// Client-wide default timeout for each call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Client> {
        if self.timeout.is_zero() {
            return Err(Error::InvalidConfig("timeout must be > 0".to_string()));
        }

        let mut statuses: Vec<u16> = self.error_handlers.keys().copied().collect();
        statuses.sort_unstable();
        if let Some(bad) = statuses.iter().find(|s| !(100..=599).contains(*s)) {
            return Err(Error::InvalidConfig(format!(
                "error handler registered for invalid status code {bad}"
            )));
        }

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));

        tracing::debug!(
            middlewares = self.middlewares.len(),
            error_handlers = ?statuses,
            timeout = ?self.timeout,
            "Client built"
        );

        Ok(Client {
            inner: Arc::new(ClientInner {
                adapter: TransportAdapter::new(transport, self.timeout),
                middlewares: self.middlewares,
                error_handlers: self.error_handlers,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("middlewares", &self.middlewares.len())
            .field("error_handlers", &self.error_handlers.keys().collect::<Vec<_>>())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ObservabilityConfig, TimeoutConfig};

    #[test]
    fn test_default_timeout() {
        let client = ClientBuilder::new().build().unwrap();
        assert_eq!(client.default_timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = ClientBuilder::new()
            .timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_status_rejected() {
        let err = ClientBuilder::new()
            .error_handler(42, |_| Ok(()))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("42"));

        let err = ClientBuilder::new()
            .error_handler(600, |_| Ok(()))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_from_config_registers_middlewares() {
        let config = ClientConfig {
            timeouts: TimeoutConfig {
                request_secs: 5,
                connect_secs: 1,
            },
            default_headers: HashMap::from([("Accept".to_string(), "*/*".to_string())]),
            observability: ObservabilityConfig {
                log_requests: true,
                metrics_enabled: true,
                ..ObservabilityConfig::default()
            },
            ..ClientConfig::default()
        };

        let builder = ClientBuilder::from_config(&config).unwrap();
        assert_eq!(builder.middlewares.len(), 4);
        assert_eq!(builder.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_config_reports_client_build_failure_as_config_error() {
        let config = ClientConfig {
            user_agent: Some("agent\r\nX-Injected: 1".to_string()),
            ..ClientConfig::default()
        };
        let err = ClientBuilder::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref msg) if msg.contains("HTTP client")));
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = ClientConfig {
            timeouts: TimeoutConfig {
                request_secs: 0,
                connect_secs: 1,
            },
            ..ClientConfig::default()
        };
        let err = ClientBuilder::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
