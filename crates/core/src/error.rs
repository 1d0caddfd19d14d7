//! 에러 타입 — 도메인별 에러 정의

/// dockwire 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum DockwireError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Docker Engine API 에러
    #[error("docker error: {0}")]
    Docker(#[from] DockerError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Docker Engine 연동 에러
#[derive(Debug, thiserror::Error)]
pub enum DockerError {
    /// 연동이 비활성화되었거나 설정이 누락됨
    #[error("docker integration unavailable: {0}")]
    Unavailable(String),

    /// 리소스 이름 규칙 위반
    #[error("invalid resource name: {0}")]
    InvalidName(String),

    /// 예상하지 못한 HTTP 상태 코드
    #[error("docker api returned {status}: {message}")]
    Api { status: u16, message: String },

    /// 리소스를 찾을 수 없음
    #[error("not found: {0}")]
    NotFound(String),

    /// 전송 계층 실패
    #[error("transport failed: {0}")]
    Transport(String),
}
