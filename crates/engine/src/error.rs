//! engine 에러 타입
//!
//! [`EngineError`]는 Docker Engine 바인딩에서 발생하는 모든 에러를 표현합니다.
//! `From<EngineError> for DockwireError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use dockwire_core::error::{DockerError, DockwireError};

/// Docker Engine 바인딩 도메인 에러
///
/// 요청 전에 발생하는 로컬 에러(설정, 이름 검증)와
/// 요청 후에 발생하는 원격 에러(상태 코드, 전송, 디코딩)를 구분합니다.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// 연동 비활성화 또는 설정 누락 (요청 전)
    #[error("{0}")]
    Configuration(String),

    /// 리소스 이름 규칙 위반 (요청 전)
    #[error("invalid name '{name}': {reason}")]
    Validation {
        /// 거부된 이름
        name: String,
        /// 거부 사유
        reason: String,
    },

    /// 예상과 다른 HTTP 상태 코드
    #[error("docker api returned {status}: {message}")]
    Remote {
        /// 응답 상태 코드
        status: u16,
        /// 원격 응답 본문의 `message` 필드
        message: String,
    },

    /// 존재 확인 결과 리소스가 없음
    #[error("{kind} not found: {id}")]
    NotFound {
        /// 리소스 종류 (container, volume, image)
        kind: &'static str,
        /// 조회한 식별자
        id: String,
    },

    /// HTTP 전송 실패
    #[error("transport error: {0}")]
    Transport(String),

    /// 성공 응답 본문 디코딩 실패
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl EngineError {
    /// 요청을 보내기 전에 발생한 에러인지 여부
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Validation { .. })
    }

    /// 원격 응답의 상태 코드 (원격 에러가 아니면 `None`)
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<EngineError> for DockwireError {
    fn from(err: EngineError) -> Self {
        match &err {
            EngineError::Configuration(msg) => {
                DockwireError::Docker(DockerError::Unavailable(msg.clone()))
            }
            EngineError::Validation { .. } => {
                DockwireError::Docker(DockerError::InvalidName(err.to_string()))
            }
            EngineError::Remote { status, message } => DockwireError::Docker(DockerError::Api {
                status: *status,
                message: message.clone(),
            }),
            EngineError::NotFound { .. } => {
                DockwireError::Docker(DockerError::NotFound(err.to_string()))
            }
            EngineError::Transport(msg) => {
                DockwireError::Docker(DockerError::Transport(msg.clone()))
            }
            EngineError::Decode(_) => {
                DockwireError::Docker(DockerError::Transport(err.to_string()))
            }
        }
    }
}
