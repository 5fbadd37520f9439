//
//  bitbucket-branch-restrictions
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types
//!
//! Shared error and link types used by the transport and by every resource
//! module, plus the tolerant pagination envelope (see [`pagination`]).
//!
//! # Example
//!
//! ```rust
//! use bitbucket_branch_restrictions::api::common::ApiError;
//!
//! fn describe(result: Result<(), ApiError>) -> String {
//!     match result {
//!         Ok(()) => "ok".to_string(),
//!         Err(ApiError::NotFound(what)) => format!("missing: {}", what),
//!         Err(e) => e.to_string(),
//!     }
//! }
//!
//! assert_eq!(describe(Err(ApiError::NotFound("restriction 7".into()))), "missing: restriction 7");
//! ```

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Unified error type for all Bitbucket API operations.
///
/// # Variants
///
/// | Variant | Origin |
/// |---------|--------|
/// | `AuthFailed` | HTTP 401 |
/// | `Forbidden` | HTTP 403 |
/// | `NotFound` | HTTP 404 |
/// | `RateLimited` | HTTP 429 |
/// | `BadRequest` | HTTP 400 |
/// | `ServerError` | HTTP 5xx |
/// | `Network` | connection, TLS, timeout |
/// | `InvalidJson` | response body is not JSON |
/// | `MalformedEnvelope` | listing body without a `values` array |
/// | `PaginationLoop` | a `next` cursor points at a page already fetched |
/// | `Decode` | JSON does not match the record shape |
/// | `Encode` | request body could not be serialized |
/// | `MissingField` | option required to build the URL is absent |
/// | `InvalidUrl` | base URL or cursor cannot be parsed |
/// | `Unknown` | anything else |
#[derive(Error, Debug)]
pub enum ApiError {
    /// Authentication failed due to missing, invalid or expired credentials.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API rate limit has been exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The authenticated user may not perform the operation.
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// The service rejected the request parameters.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The service failed with a 5xx status.
    #[error("Server error: {0}")]
    ServerError(String),

    /// A network-level error occurred during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be parsed as JSON at all.
    #[error("Invalid JSON in response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A listing response lacked the `values` array.
    #[error("Malformed paginated response: {0}")]
    MalformedEnvelope(String),

    /// A listing handed back a `next` cursor that was already followed.
    #[error("Pagination loop: cursor {0} was already fetched")]
    PaginationLoop(String),

    /// The response was JSON but did not match the expected record.
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A field needed to address the resource was not supplied.
    #[error("Missing required option: {0}")]
    MissingField(&'static str),

    /// A URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// An unknown or unexpected error occurred.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ApiError {
    /// Maps a non-success HTTP response onto an error variant.
    ///
    /// Bitbucket Cloud reports failures as
    /// `{"type": "error", "error": {"message": "...", "detail": "..."}}`;
    /// the human readable message is pulled out of that shape when present,
    /// otherwise the raw body is kept.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_error_message(body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.to_string()
            }
        });

        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest(message),
            StatusCode::UNAUTHORIZED => Self::AuthFailed(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            s if s.is_server_error() => Self::ServerError(message),
            s => Self::Unknown(format!("API error ({}): {}", s, message)),
        }
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;

    // {"error": {"message": "..."}}
    if let Some(message) = json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return Some(message.to_string());
    }

    // {"error": {"detail": "..."}}
    if let Some(detail) = json
        .get("error")
        .and_then(|e| e.get("detail"))
        .and_then(|m| m.as_str())
    {
        return Some(detail.to_string());
    }

    json.get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

/// HATEOAS-style link, as found under every `links` object.
///
/// ```rust
/// use bitbucket_branch_restrictions::api::common::Link;
///
/// let link: Link = serde_json::from_str(r#"{"href": "https://bitbucket.org/ws/repo"}"#).unwrap();
/// assert_eq!(link.href, "https://bitbucket.org/ws/repo");
/// assert!(link.name.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// The URL of the linked resource.
    pub href: String,

    /// Optional descriptive name for the link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_extracts_cloud_message() {
        let body = r#"{"type": "error", "error": {"message": "Restriction not found"}}"#;
        match ApiError::from_status(StatusCode::NOT_FOUND, body) {
            ApiError::NotFound(msg) => assert_eq!(msg, "Restriction not found"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_from_status_uses_detail_and_raw_body() {
        let body = r#"{"error": {"detail": "kind is invalid"}}"#;
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, body),
            ApiError::BadRequest(msg) if msg == "kind is invalid"
        ));

        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream down"),
            ApiError::ServerError(msg) if msg == "upstream down"
        ));
    }

    #[test]
    fn test_from_status_maps_remaining_codes() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::AuthFailed(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, r#"{"message": "no admin"}"#),
            ApiError::Forbidden(msg) if msg == "no admin"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::CONFLICT, "dup"),
            ApiError::Unknown(_)
        ));
    }
}
