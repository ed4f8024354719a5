//! Request handlers for the `/api` surface and health checks.
//!
//! Resource handlers validate their parameters, derive a cache key and hand
//! an upstream fetch to the [`katastr_cache::CachedFetcher`]. The cached JSON
//! bytes are written back unchanged.

pub mod buildings;
pub mod health;
pub mod parcels;
pub mod proceedings;
pub mod units;
pub mod version;

use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// `Some` only for a present, non-empty parameter.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub(crate) fn parse_area(value: &str) -> Result<u32, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid area parameter"))
}

pub(crate) fn parse_id(value: &str) -> Result<i64, ApiError> {
    value.parse().map_err(|_| ApiError::BadRequest("invalid id"))
}

pub(crate) fn json_bytes(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], bytes).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("730955".into())), Some("730955".into()));
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_parse_area() {
        assert_eq!(parse_area("730955").unwrap(), 730955);
        assert!(parse_area("Dejvice").is_err());
        assert!(parse_area("-1").is_err());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("123456").unwrap(), 123456);
        assert_eq!(parse_id("-4").unwrap(), -4);
        assert!(parse_id("12a").is_err());
    }
}
