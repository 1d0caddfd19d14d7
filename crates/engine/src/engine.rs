//! Request executor shared by every resource handle.
//!
//! [`DockerEngine`] owns the [`ConnectionConfig`] and a [`Transport`]. Each
//! operation on a handle is one call to [`DockerEngine::execute`]:
//!
//! ```text
//! guard::check → Transport::send → status branch → decode / EngineError::Remote
//! ```
//!
//! # Examples
//!
//! ```ignore
//! use dockwire_engine::{Container, ContainerSpec, DockerEngine, Image};
//!
//! let engine = DockerEngine::from_env()?;
//! let spec = ContainerSpec::new().image(Image::from_reference("ubuntu:latest"));
//! let container = Container::create(&engine, "web", &spec).await?;
//! container.start(&engine).await?;
//! # Ok::<(), dockwire_engine::EngineError>(())
//! ```

use std::sync::Arc;

use dockwire_core::metrics as m;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ConnectionConfig;
use crate::error::EngineError;
use crate::guard;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

/// Handle to a Docker Engine endpoint.
///
/// Cheap to clone; clones share the transport.
pub struct DockerEngine<T: Transport = HttpTransport> {
    transport: Arc<T>,
    config: ConnectionConfig,
}

impl<T: Transport> Clone for DockerEngine<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: self.config.clone(),
        }
    }
}

impl DockerEngine<HttpTransport> {
    /// Creates an engine talking HTTP to the configured endpoint.
    ///
    /// No request is sent; a disabled or incomplete configuration is reported
    /// by the first operation, not here.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Transport` if the HTTP client cannot be built.
    pub fn connect(config: ConnectionConfig) -> Result<Self, EngineError> {
        Ok(Self::with_transport(config, Arc::new(HttpTransport::new()?)))
    }

    /// Creates an engine from `DOCKER_API`, `DOCKER_VERSION` and `DOCKER_ENABLE`.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::connect(ConnectionConfig::from_env()?)
    }
}

impl<T: Transport> DockerEngine<T> {
    /// Creates an engine over an arbitrary transport.
    pub fn with_transport(config: ConnectionConfig, transport: Arc<T>) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Runs the guard without sending anything.
    ///
    /// Operations that validate caller input locally call this first, so a
    /// disabled integration is reported before any input error.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Configuration` if the guard rejects the call.
    pub fn ensure_ready(&self) -> Result<(), EngineError> {
        guard::check(&self.config)
    }

    /// Runs the guard and sends one request, returning the raw response.
    ///
    /// # Errors
    ///
    /// - `EngineError::Configuration` if the guard rejects the call (nothing is sent)
    /// - `EngineError::Transport` on connection failure
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, EngineError> {
        self.ensure_ready()?;

        let method = request.method;
        debug!(method = %method, path = %request.path, "docker api call");

        match self.transport.send(&self.config.base_url(), request).await {
            Ok(response) => {
                debug!(method = %method, status = response.status, "docker api responded");
                Ok(response)
            }
            Err(e) => {
                record(method.as_str(), "transport_error");
                Err(e)
            }
        }
    }

    /// Sends `request` and requires `expected` as the status code.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Remote` carrying the body's `message` field when the
    /// status differs.
    pub async fn expect_status(
        &self,
        request: ApiRequest,
        expected: u16,
    ) -> Result<ApiResponse, EngineError> {
        let method = request.method;
        let path = request.path.clone();
        let response = self.execute(request).await?;

        if response.status != expected {
            record(method.as_str(), "remote_error");
            warn!(
                method = %method,
                path = %path,
                expected,
                status = response.status,
                "unexpected docker api status"
            );
            return Err(remote_error(&response));
        }

        record(method.as_str(), "success");
        Ok(response)
    }

    /// Like [`expect_status`](Self::expect_status), decoding the body as JSON.
    pub async fn expect_json(&self, request: ApiRequest, expected: u16) -> Result<Value, EngineError> {
        let response = self.expect_status(request, expected).await?;
        decode_json(&response.body)
    }

    /// Like [`expect_json`](Self::expect_json), into a typed value.
    pub async fn expect_typed<D: DeserializeOwned>(
        &self,
        request: ApiRequest,
        expected: u16,
    ) -> Result<D, EngineError> {
        let response = self.expect_status(request, expected).await?;
        serde_json::from_str(&response.body).map_err(|e| EngineError::Decode(e.to_string()))
    }

    /// Like [`expect_status`](Self::expect_status), discarding the body.
    pub async fn expect_empty(&self, request: ApiRequest, expected: u16) -> Result<(), EngineError> {
        self.expect_status(request, expected).await.map(|_| ())
    }

    /// Existence probe: 200 → `true`, 404 → `false`, anything else is an error.
    pub async fn probe(&self, request: ApiRequest) -> Result<bool, EngineError> {
        let method = request.method;
        let response = self.execute(request).await?;
        match response.status {
            200 => {
                record(method.as_str(), "success");
                Ok(true)
            }
            404 => {
                record(method.as_str(), "success");
                Ok(false)
            }
            _ => {
                record(method.as_str(), "remote_error");
                Err(remote_error(&response))
            }
        }
    }

    /// Checks that the engine answers `GET /_ping`.
    pub async fn ping(&self) -> Result<(), EngineError> {
        self.expect_empty(ApiRequest::get("/_ping"), 200).await
    }

    /// Returns the engine's `GET /version` document.
    pub async fn version(&self) -> Result<Value, EngineError> {
        self.expect_json(ApiRequest::get("/version"), 200).await
    }
}

fn record(method: &'static str, result: &'static str) {
    metrics::counter!(
        m::DOCKER_API_REQUESTS_TOTAL,
        m::LABEL_METHOD => method,
        m::LABEL_RESULT => result
    )
    .increment(1);
}

/// Decodes a success body. An empty body decodes to `Value::Null`.
pub(crate) fn decode_json(body: &str) -> Result<Value, EngineError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| EngineError::Decode(e.to_string()))
}

/// Builds `EngineError::Remote` from a failed response.
///
/// The message is the JSON body's `message` field; failing that, the raw body;
/// failing that, a generic line naming the status.
pub(crate) fn remote_error(response: &ApiResponse) -> EngineError {
    EngineError::Remote {
        status: response.status,
        message: extract_message(response),
    }
}

fn extract_message(response: &ApiResponse) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&response.body) {
        if let Some(Value::String(message)) = map.get("message") {
            return message.clone();
        }
    }
    let raw = response.body.trim();
    if raw.is_empty() {
        format!("unexpected status {}", response.status)
    } else {
        raw.to_owned()
    }
}
