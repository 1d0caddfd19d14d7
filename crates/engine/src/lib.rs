#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`EngineError`)
//! - [`config`]: Connection settings (`ConnectionConfig`)
//! - [`guard`]: Pre-flight check run before every request
//! - [`name`]: Resource name validation
//! - [`query`]: Percent-encoded paths and query strings
//! - [`transport`]: HTTP abstraction (`Transport` trait, `HttpTransport`,
//!   `MockTransport` with the `test-util` feature)
//! - [`engine`]: Request executor (`DockerEngine`)
//! - [`port`]: Port binding value (`PortBinding`, `Protocol`)
//! - [`spec`]: Container spec and wire-schema translation (`ContainerSpec`)
//! - [`container`], [`volume`], [`image`]: Resource handles
//!
//! # Architecture
//!
//! ```text
//! Container / Volume / Image
//!          |
//!     engine.ensure_ready() -- guard::check (create, rename)
//!          |
//!     validate_name (create, rename), path segments (lookups)
//!          |
//!     ContainerSpec.translate() (container create)
//!          |
//!     DockerEngine.execute() -- guard::check
//!          |
//!     Transport.send() --HTTP--> {DOCKER_API}/{DOCKER_VERSION}{path}
//! ```

pub mod config;
pub mod container;
pub mod engine;
pub mod error;
pub mod guard;
pub mod image;
pub mod name;
pub mod port;
pub mod query;
pub mod spec;
pub mod transport;
pub mod volume;

// --- Public API Re-exports ---

// Engine
pub use engine::DockerEngine;

// Configuration
pub use config::ConnectionConfig;

// Error
pub use error::EngineError;

// Transport
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
#[cfg(feature = "test-util")]
pub use transport::MockTransport;

// Resources
pub use container::{Container, ListContainersOptions, LogsOptions, RemoveOptions};
pub use image::Image;
pub use volume::{Volume, VolumeOptions};

// Translation
pub use port::{PortBinding, Protocol};
pub use spec::{ContainerSpec, CreateContainerBody};

// Validation
pub use name::{NAME_PATTERN, validate_name};
