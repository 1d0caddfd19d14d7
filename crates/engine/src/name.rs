//! Resource name validation.
//!
//! Docker accepts container and volume names matching
//! `^/?[A-Za-z0-9][A-Za-z0-9_.-]+$`. Names are checked locally so that an
//! invalid name never reaches the network.

use std::sync::LazyLock;

use dockwire_core::metrics as m;
use regex::Regex;

use crate::error::EngineError;

/// Pattern every caller-chosen resource name must match.
pub const NAME_PATTERN: &str = r"^/?[A-Za-z0-9][A-Za-z0-9_.-]+$";

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NAME_PATTERN).expect("NAME_PATTERN is a valid regex literal"));

/// Validates a container or volume name.
///
/// # Errors
///
/// Returns `EngineError::Validation` if `name` does not match [`NAME_PATTERN`].
pub fn validate_name(name: &str) -> Result<(), EngineError> {
    if NAME_REGEX.is_match(name) {
        return Ok(());
    }
    metrics::counter!(m::NAME_REJECTIONS_TOTAL).increment(1);
    Err(EngineError::Validation {
        name: name.to_owned(),
        reason: format!("name must match regular expression `{NAME_PATTERN}`"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_names() {
        for name in [
            "web",
            "web-1",
            "web_1",
            "web.1",
            "/web",
            "0abc",
            "A.b-C_d",
            "db",
        ] {
            assert!(validate_name(name).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn rejects_disallowed_leading_character() {
        for name in ["-web", "_web", ".web", "//web", "/-web"] {
            assert!(validate_name(name).is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn rejects_disallowed_characters() {
        for name in [
            "web server",
            "web/1",
            "web:1",
            "web?x=1",
            "web&all=true",
            "wéb",
            "web\n",
        ] {
            assert!(validate_name(name).is_err(), "{name:?} should be rejected");
        }
    }

    #[test]
    fn rejects_too_short_and_empty() {
        // 패턴은 최소 두 글자를 요구합니다
        assert!(validate_name("").is_err());
        assert!(validate_name("a").is_err());
        assert!(validate_name("/a").is_err());
    }

    #[test]
    fn error_carries_name_and_pattern() {
        let err = validate_name("bad name").unwrap_err();
        match err {
            EngineError::Validation { name, reason } => {
                assert_eq!(name, "bad name");
                assert!(reason.contains(NAME_PATTERN));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
