//! One request in, one status code and body out.
//!
//! [`HttpTransport`] sends requests to `{api}/{version}{path}` with `reqwest`,
//! JSON-encoding the body when there is one. It does not retry, and no timeout
//! is configured. With the `test-util` feature, `MockTransport` replays
//! queued responses and records what was sent.

use std::fmt;
use std::future::Future;

use serde_json::Value;
use tracing::debug;

use crate::error::EngineError;

/// HTTP methods used by the Docker Engine API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single API request, relative to the versioned base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path including the encoded query string, e.g. `/containers/json?all=true`.
    pub path: String,
    /// JSON body; `None` sends no body.
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }

    /// Attaches a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw response: status code and undecoded body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Trait abstracting the HTTP round trip.
///
/// The trait is `Send + Sync + 'static`, so an engine holding it can be
/// shared across tasks behind an `Arc`.
///
/// # Errors
///
/// Implementations return `EngineError::Transport` only for connection-level
/// failures. Any HTTP status, including 4xx/5xx, is a successful round trip.
pub trait Transport: Send + Sync + 'static {
    /// Sends `request` to `{base_url}{request.path}`.
    fn send(
        &self,
        base_url: &str,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, EngineError>> + Send;
}

/// Production transport backed by `reqwest`.
///
/// Requests carry `Content-Type: application/json` when a body is present.
/// No request timeout is configured; a call waits as long as the engine does.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds a transport with a fresh HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Transport` if the client cannot be initialised
    /// (e.g. the TLS backend fails to load).
    pub fn new() -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| EngineError::Transport(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing client (custom TLS roots, proxies, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, base_url: &str, request: ApiRequest) -> Result<ApiResponse, EngineError> {
        let url = format!("{base_url}{}", request.path);
        debug!(method = %request.method, url = %url, "sending docker api request");

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Delete => self.client.delete(&url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            EngineError::Transport(format!("{} {url} failed: {e}", request.method))
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            EngineError::Transport(format!("reading body of {} {url} failed: {e}", request.method))
        })?;

        Ok(ApiResponse { status, body })
    }
}

/// 테스트용 Mock 전송 계층
///
/// 미리 지정한 응답을 순서대로 반환하고, 받은 요청을 기록합니다.
/// 큐가 비면 `EngineError::Transport`를 반환합니다.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: std::sync::Mutex<std::collections::VecDeque<ApiResponse>>,
    requests: std::sync::Mutex<Vec<(String, ApiRequest)>>,
}

#[cfg(any(test, feature = "test-util"))]
impl MockTransport {
    /// 빈 응답 큐로 mock 전송 계층을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 다음 호출에 반환할 응답을 추가합니다.
    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(ApiResponse::new(status, body));
        self
    }

    /// 지금까지 받은 요청 목록
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }

    /// 지금까지 받은 요청의 base URL 목록
    pub fn base_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(b, _)| b.clone())
            .collect()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Transport for MockTransport {
    async fn send(&self, base_url: &str, request: ApiRequest) -> Result<ApiResponse, EngineError> {
        self.requests
            .lock()
            .unwrap()
            .push((base_url.to_owned(), request));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| EngineError::Transport("mock has no scripted response".to_owned()))
    }
}
