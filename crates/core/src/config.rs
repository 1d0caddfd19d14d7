//! 설정 관리 — dockwire.toml 파싱 및 런타임 설정
//!
//! [`DockwireConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`DOCKER_API`, `DOCKER_VERSION`, `DOCKER_ENABLE`,
//!    `DOCKWIRE_GENERAL_LOG_LEVEL` 형식)
//! 3. 설정 파일 (`dockwire.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! 비어 있는 환경변수는 설정되지 않은 것으로 취급하여 파일 값을 유지합니다.
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), dockwire_core::error::DockwireError> {
//! use dockwire_core::config::DockwireConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = DockwireConfig::load("dockwire.toml").await?;
//!
//! // 파일 없이 환경변수만 사용
//! let config = DockwireConfig::from_env()?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = DockwireConfig::parse("[docker]\nenable = true")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, DockwireError};

/// Docker API 기본 주소 환경변수
pub const ENV_DOCKER_API: &str = "DOCKER_API";
/// Docker API 버전 환경변수
pub const ENV_DOCKER_VERSION: &str = "DOCKER_VERSION";
/// Docker 연동 활성화 환경변수
pub const ENV_DOCKER_ENABLE: &str = "DOCKER_ENABLE";

/// dockwire 통합 설정
///
/// `dockwire.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DockwireConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// Docker Engine 연결 설정
    #[serde(default)]
    pub docker: DockerConfig,
}

impl DockwireConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DockwireError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일 없이 기본값 + 환경변수로 설정을 구성합니다.
    pub fn from_env() -> Result<Self, DockwireError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, DockwireError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DockwireError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                DockwireError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, DockwireError> {
        toml::from_str(toml_str).map_err(|e| {
            DockwireError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// Docker 연결 값은 `DOCKER_API`, `DOCKER_VERSION`, `DOCKER_ENABLE`을,
    /// 일반 설정은 `DOCKWIRE_GENERAL_{FIELD}` 규칙을 따릅니다.
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(
            &mut self.general.log_level,
            "DOCKWIRE_GENERAL_LOG_LEVEL",
        );
        override_string(
            &mut self.general.log_format,
            "DOCKWIRE_GENERAL_LOG_FORMAT",
        );

        // Docker
        override_string(&mut self.docker.api, ENV_DOCKER_API);
        override_string(&mut self.docker.version, ENV_DOCKER_VERSION);
        override_flag(&mut self.docker.enable, ENV_DOCKER_ENABLE);
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// Docker 연결 값(api, version, enable)은 여기서 거부하지 않습니다.
    /// 연동이 꺼져 있거나 값이 비어 있으면 각 API 호출 직전 guard가 진단 메시지를 냅니다.
    pub fn validate(&self) -> Result<(), DockwireError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // api 주소 형식 검증 (비어 있으면 guard가 처리)
        if !self.docker.api.is_empty()
            && !(self.docker.api.starts_with("http://") || self.docker.api.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue {
                field: "docker.api".to_owned(),
                reason: "must start with http:// or https://".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// Docker Engine 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// API 기본 주소 (예: `http://localhost:2375`)
    pub api: String,
    /// API 버전 경로 접두어 (예: `v1.43`)
    pub version: String,
    /// 연동 활성화 여부
    pub enable: bool,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            api: "http://localhost:2375".to_owned(),
            version: "v1.43".to_owned(),
            enable: false,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        if val.is_empty() {
            debug!(env_key, "env var is empty, keeping file value");
            return;
        }
        *target = val;
    }
}

/// 값이 정확히 `"true"`일 때만 활성화합니다 (대소문자 구분).
///
/// `"TRUE"`, `"1"`, `"yes"` 등은 모두 비활성화로 취급합니다.
fn override_flag(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        if val.is_empty() {
            debug!(env_key, "env var is empty, keeping file value");
            return;
        }
        *target = val == "true";
    }
}
