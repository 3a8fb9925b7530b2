//! Production transport implementation using reqwest.

use std::collections::HashMap;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::TryStreamExt;

use crate::error::{Error, TransportError};
use crate::http::Payload;
use crate::transport::{Transport, TransportRequest, TransportResponse};

/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with reqwest's default configuration.
    pub fn new() -> Self {
        Self::from_client(reqwest::Client::new())
    }

    /// Use a caller-configured client (proxies, TLS roots, pool sizes...).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Create a transport with a connect timeout and optional user agent.
    ///
    /// Settings reqwest refuses (an unencodable user agent, say) fail with
    /// [`Error::InvalidConfig`].
    pub fn with_settings(
        connect_timeout: Duration,
        user_agent: Option<&str>,
    ) -> crate::error::Result<Self> {
        let mut builder = reqwest::Client::builder().connect_timeout(connect_timeout);
        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent);
        }
        let client = builder
            .build()
            .map_err(|e| Error::InvalidConfig(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    fn execute(
        &self,
        request: TransportRequest,
    ) -> BoxFuture<'static, Result<TransportResponse, TransportError>> {
        Box::pin(send(self.client.clone(), request))
    }
}

async fn send(
    client: reqwest::Client,
    request: TransportRequest,
) -> Result<TransportResponse, TransportError> {
    let TransportRequest {
        method,
        url,
        headers,
        body,
        timeout,
    } = request;

    let mut builder = client.request(method, url).timeout(timeout);
    for (key, values) in &headers {
        for value in values {
            builder = builder.header(key.as_str(), value.as_str());
        }
    }
    if let Some(payload) = body {
        builder = builder.body(match payload {
            Payload::Bytes(bytes) => reqwest::Body::from(bytes),
            Payload::Stream(stream) => reqwest::Body::wrap_stream(stream),
        });
    }

    let response = builder
        .send()
        .await
        .map_err(|e| classify_error(e, timeout))?;

    let status = response.status().as_u16();
    let content_length = response.content_length();
    let headers = collect_headers(response.headers());
    let body = response
        .bytes_stream()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));

    Ok(TransportResponse {
        status,
        content_length,
        headers,
        body: Box::pin(body),
    })
}

fn collect_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        // Non-visible ASCII values are carried lossily
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        map.entry(name.as_str().to_string()).or_default().push(value);
    }
    map
}

fn classify_error(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else if err.is_builder() {
        TransportError::InvalidRequest(err.to_string())
    } else {
        TransportError::Other(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    #[test]
    fn test_collect_headers_groups_values() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let map = collect_headers(&headers);
        assert_eq!(map["set-cookie"], vec!["a=1", "b=2"]);
        assert_eq!(map["content-type"], vec!["application/json"]);
    }

    #[test]
    fn test_with_settings_builds() {
        let transport =
            ReqwestTransport::with_settings(Duration::from_secs(3), Some("fetch-chain-test"));
        assert!(transport.is_ok());
    }

    #[test]
    fn test_with_settings_rejects_unencodable_user_agent() {
        let err = ReqwestTransport::with_settings(Duration::from_secs(3), Some("bad\nagent"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert_eq!(err.kind(), "construction");
    }
}
