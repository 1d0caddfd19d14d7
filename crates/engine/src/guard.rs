//! Pre-flight configuration guard.
//!
//! Every remote operation runs [`check`] before anything touches the network.
//! The check reads only the engine's [`ConnectionConfig`], so it is cheap and
//! never consults the process environment.

use dockwire_core::config::{ENV_DOCKER_API, ENV_DOCKER_ENABLE, ENV_DOCKER_VERSION};
use dockwire_core::metrics as m;
use tracing::warn;

use crate::config::ConnectionConfig;
use crate::error::EngineError;

/// Verifies that the integration is enabled and fully configured.
///
/// # Errors
///
/// Returns `EngineError::Configuration` when:
/// - the integration is disabled (`DOCKER_ENABLE` was not literally `"true"`)
/// - the API version is empty
/// - the API base URL is empty
pub fn check(config: &ConnectionConfig) -> Result<(), EngineError> {
    if !config.enabled {
        return Err(reject("disabled", disabled_message(config)));
    }
    if config.api_version.is_empty() {
        return Err(reject(
            "missing_version",
            format!("You must declare the environment variable `{ENV_DOCKER_VERSION}` (for example `v1.43`)."),
        ));
    }
    if config.api_base_url.is_empty() {
        return Err(reject(
            "missing_api",
            format!("You must declare the environment variable `{ENV_DOCKER_API}` (for example `http://localhost:2375`)."),
        ));
    }
    Ok(())
}

fn disabled_message(config: &ConnectionConfig) -> String {
    format!(
        "docker integration is disabled. It expects the engine API at `{}/containers/json`; \
         change the endpoint with `{ENV_DOCKER_API}` and `{ENV_DOCKER_VERSION}`, \
         then set `{ENV_DOCKER_ENABLE}=true` to enable it.",
        config.base_url()
    )
}

fn reject(reason: &'static str, message: String) -> EngineError {
    metrics::counter!(m::GUARD_REJECTIONS_TOTAL, m::LABEL_REASON => reason).increment(1);
    warn!(reason, "docker call rejected by guard");
    EngineError::Configuration(message)
}
