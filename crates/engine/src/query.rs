//! Request path and query-string construction.
//!
//! Every caller-supplied value that ends up in a URL goes through
//! percent-encoding here, so a name or filter containing `&`, `=`, `?` or
//! spaces can never alter the shape of the request. Path segments that are
//! `.` or `..` are rejected outright: URL parsers collapse them (even when
//! written as `%2E`), which would move the request to another endpoint.

use std::fmt;

use crate::error::EngineError;

/// Ordered set of query parameters, rendered percent-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn push(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.push((key.to_owned(), value.to_string()));
        self
    }

    /// Appends a parameter only when `value` is `Some`.
    pub fn push_opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.push(key, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns `path` with this query appended (`path?k=v&...`).
    pub fn append_to(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_owned()
        } else {
            format!("{path}?{self}")
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(
                f,
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )?;
        }
        Ok(())
    }
}

/// Percent-encodes a single path segment (container id, volume name).
///
/// # Errors
///
/// Returns `EngineError::Validation` if `value` is a dot segment.
pub fn segment(value: &str) -> Result<String, EngineError> {
    reject_dot_segment(value, value)?;
    Ok(urlencoding::encode(value).into_owned())
}

/// Percent-encodes an image reference, keeping `/` separators intact.
///
/// The engine routes `/images/{name}/json` with a greedy `name`, so
/// `registry:5000/team/app:1.0` must keep its slashes.
///
/// # Errors
///
/// Returns `EngineError::Validation` if any `/`-separated component is a
/// dot segment.
pub fn image_segment(reference: &str) -> Result<String, EngineError> {
    reference
        .split('/')
        .map(|part| {
            reject_dot_segment(reference, part)?;
            Ok(urlencoding::encode(part).into_owned())
        })
        .collect::<Result<Vec<_>, EngineError>>()
        .map(|parts| parts.join("/"))
}

fn reject_dot_segment(value: &str, part: &str) -> Result<(), EngineError> {
    if part == "." || part == ".." {
        return Err(EngineError::Validation {
            name: value.to_owned(),
            reason: "identifier must not contain `.` or `..` path segments".to_owned(),
        });
    }
    Ok(())
}
