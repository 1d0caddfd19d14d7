//! Docker Engine 연결 설정
//!
//! [`ConnectionConfig`]는 core의 [`DockerConfig`](dockwire_core::config::DockerConfig)를
//! 기반으로 엔진이 사용하는 연결 값을 제공합니다. 시작 시 한 번 생성되어
//! [`DockerEngine`](crate::engine::DockerEngine)이 소유하며 이후 변경되지 않습니다.
//!
//! # 사용 예시
//! ```ignore
//! use dockwire_core::config::DockwireConfig;
//! use dockwire_engine::config::ConnectionConfig;
//!
//! let core_config = DockwireConfig::from_env()?;
//! let config = ConnectionConfig::from_core(&core_config.docker);
//! ```

use serde::{Deserialize, Serialize};

use dockwire_core::config::{DockerConfig, DockwireConfig};

use crate::error::EngineError;

/// Docker Engine 연결 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// API 기본 주소 (예: `http://localhost:2375`)
    pub api_base_url: String,
    /// API 버전 경로 접두어 (예: `v1.43`)
    pub api_version: String,
    /// 연동 활성화 여부
    pub enabled: bool,
}

impl ConnectionConfig {
    /// 값을 직접 지정하여 설정을 생성합니다.
    pub fn new(
        api_base_url: impl Into<String>,
        api_version: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_version: api_version.into(),
            enabled,
        }
    }

    /// core의 `DockerConfig`에서 연결 설정을 생성합니다.
    pub fn from_core(core: &DockerConfig) -> Self {
        Self {
            api_base_url: core.api.clone(),
            api_version: core.version.clone(),
            enabled: core.enable,
        }
    }

    /// 기본값 + 환경변수(`DOCKER_API`, `DOCKER_VERSION`, `DOCKER_ENABLE`)로 설정을 생성합니다.
    ///
    /// 환경변수를 다시 읽어야 하는 호출자는 이 함수로 설정을 새로 만들고
    /// 엔진을 다시 구성합니다.
    pub fn from_env() -> Result<Self, EngineError> {
        let core = DockwireConfig::from_env()
            .map_err(|e| EngineError::Configuration(e.to_string()))?;
        Ok(Self::from_core(&core.docker))
    }

    /// 요청 경로 앞에 붙는 `{api}/{version}` 접두어를 반환합니다.
    pub fn base_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::from_core(&DockerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_core_preserves_values() {
        let core = DockerConfig {
            api: "http://10.0.0.5:2375".to_owned(),
            version: "v1.41".to_owned(),
            enable: true,
        };
        let config = ConnectionConfig::from_core(&core);
        assert_eq!(config.api_base_url, "http://10.0.0.5:2375");
        assert_eq!(config.api_version, "v1.41");
        assert!(config.enabled);
    }

    #[test]
    fn default_is_disabled() {
        let config = ConnectionConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.api_version, "v1.43");
    }

    #[test]
    fn base_url_joins_api_and_version() {
        let config = ConnectionConfig::new("http://localhost:2375", "v1.43", true);
        assert_eq!(config.base_url(), "http://localhost:2375/v1.43");
    }

    #[test]
    fn base_url_trims_redundant_slashes() {
        let config = ConnectionConfig::new("http://localhost:2375/", "/v1.43/", true);
        assert_eq!(config.base_url(), "http://localhost:2375/v1.43");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = ConnectionConfig::new("http://docker:2375", "v1.44", true);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ConnectionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
