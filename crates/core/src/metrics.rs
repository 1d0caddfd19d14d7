//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! engine은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않으면 기록은 무시됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `dockwire_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use dockwire_core::metrics as m;
//!
//! metrics::counter!(m::DOCKER_API_REQUESTS_TOTAL, m::LABEL_METHOD => "GET").increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// HTTP 메서드 레이블 키 (GET, POST, DELETE)
pub const LABEL_METHOD: &str = "method";

/// 결과 레이블 키 (success, remote_error, transport_error)
pub const LABEL_RESULT: &str = "result";

/// guard 거부 사유 레이블 키 (disabled, missing_version, missing_api)
pub const LABEL_REASON: &str = "reason";

// ─── Docker API 메트릭 ─────────────────────────────────────────────

/// Docker API: 전송한 요청 수 (counter, label: method, result)
pub const DOCKER_API_REQUESTS_TOTAL: &str = "dockwire_docker_api_requests_total";

/// Guard: 요청 전에 거부된 호출 수 (counter, label: reason)
pub const GUARD_REJECTIONS_TOTAL: &str = "dockwire_guard_rejections_total";

/// 이름 검증: 거부된 이름 수 (counter)
pub const NAME_REJECTIONS_TOTAL: &str = "dockwire_name_rejections_total";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 직후 한 번 호출합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        DOCKER_API_REQUESTS_TOTAL,
        "Total number of requests sent to the Docker Engine API"
    );
    describe_counter!(
        GUARD_REJECTIONS_TOTAL,
        "Calls rejected by the configuration guard before any request was sent"
    );
    describe_counter!(
        NAME_REJECTIONS_TOTAL,
        "Resource names rejected by local validation"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_share_prefix() {
        for name in [
            DOCKER_API_REQUESTS_TOTAL,
            GUARD_REJECTIONS_TOTAL,
            NAME_REJECTIONS_TOTAL,
        ] {
            assert!(name.starts_with("dockwire_"), "{name}");
            assert!(name.ends_with("_total"), "{name}");
        }
    }

    #[test]
    fn describe_all_without_recorder_is_noop() {
        describe_all();
    }
}
