//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use futures_util::stream;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use fetch_chain::{Transport, TransportError, TransportRequest, TransportResponse};

/// A request as seen by the programmable backend.
#[derive(Debug, Clone, Default)]
pub struct ReceivedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Start a backend on an ephemeral loopback port that always answers 200
/// with `response`.
pub async fn start_mock_backend(response: &'static str) -> SocketAddr {
    start_programmable_backend(move |_req| async move { (200, response.to_string()) }).await
}

/// Start a programmable backend; `f` maps each received request to a
/// status and body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(ReceivedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let (read, mut write) = socket.split();
                        let Some(received) = read_request(BufReader::new(read)).await else {
                            return;
                        };

                        let (status, body) = f(received).await;
                        let reason = reqwest::StatusCode::from_u16(status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("Unknown");

                        let response_str = format!(
                            "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nX-Backend: mock\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason,
                            body.len(),
                            body
                        );
                        let _ = write.write_all(response_str.as_bytes()).await;
                        let _ = write.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_request<R>(mut reader: BufReader<R>) -> Option<ReceivedRequest>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut line = String::new();
    reader.read_line(&mut line).await.ok()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut headers = Vec::new();
    loop {
        line.clear();
        reader.read_line(&mut line).await.ok()?;
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some((k, v)) = trimmed.split_once(':') {
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }
    }

    let header = |name: &str| {
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    };
    let chunked = header("transfer-encoding")
        .is_some_and(|v| v.to_ascii_lowercase().contains("chunked"));

    let body = if chunked {
        read_chunked_body(&mut reader).await?
    } else {
        let length = header("content-length")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);
        let mut body = vec![0; length];
        reader.read_exact(&mut body).await.ok()?;
        body
    };

    Some(ReceivedRequest {
        method,
        target,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// Decode a `Transfer-Encoding: chunked` body, discarding any trailers.
async fn read_chunked_body<R>(reader: &mut BufReader<R>) -> Option<Vec<u8>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut body = Vec::new();
    let mut line = String::new();
    loop {
        line.clear();
        reader.read_line(&mut line).await.ok()?;
        let size = line.trim().split(';').next()?;
        let size = usize::from_str_radix(size.trim(), 16).ok()?;

        if size == 0 {
            loop {
                line.clear();
                reader.read_line(&mut line).await.ok()?;
                if line.trim_end().is_empty() {
                    return Some(body);
                }
            }
        }

        let start = body.len();
        body.resize(start + size, 0);
        reader.read_exact(&mut body[start..]).await.ok()?;
        line.clear();
        reader.read_line(&mut line).await.ok()?;
    }
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// What a [`MockTransport`] observed for one call.
#[derive(Debug, Clone)]
pub struct SeenCall {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, Vec<String>>,
    pub timeout: Duration,
}

type Responder = dyn Fn(&TransportRequest) -> Result<(u16, String), TransportError> + Send + Sync;

/// In-memory transport answering from a closure after an optional delay.
pub struct MockTransport {
    responder: Box<Responder>,
    delay: Duration,
    seen: Mutex<Vec<SeenCall>>,
}

impl MockTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&TransportRequest) -> Result<(u16, String), TransportError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            delay: Duration::ZERO,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Always answer `status` with `body`.
    pub fn fixed(status: u16, body: &'static str) -> Self {
        Self::new(move |_| Ok((status, body.to_string())))
    }

    /// Always fail with the error built by `error`.
    pub fn failing(error: fn() -> TransportError) -> Self {
        Self::new(move |_| Err(error()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn seen(&self) -> Vec<SeenCall> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn execute(
        &self,
        request: TransportRequest,
    ) -> BoxFuture<'static, Result<TransportResponse, TransportError>> {
        self.seen.lock().unwrap().push(SeenCall {
            method: request.method.to_string(),
            url: request.url.to_string(),
            headers: request.headers.clone(),
            timeout: request.timeout,
        });
        let outcome = (self.responder)(&request);
        let delay = self.delay;

        Box::pin(async move {
            tokio::time::sleep(delay).await;
            let (status, body) = match outcome {
                Ok(reply) => reply,
                Err(e) => return Err(e),
            };
            Ok(TransportResponse {
                status,
                content_length: Some(body.len() as u64),
                headers: HashMap::from([(
                    "X-Backend".to_string(),
                    vec!["memory".to_string()],
                )]),
                body: Box::pin(stream::iter(vec![Ok(Bytes::from(body))])),
            })
        })
    }
}
