//
//  bitbucket-branch-restrictions
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for Bitbucket Cloud Responses
//!
//! Bitbucket Cloud wraps every collection in an envelope:
//!
//! ```json
//! {
//!     "page": 1,
//!     "pagelen": 10,
//!     "size": 25,
//!     "next": "https://api.bitbucket.org/2.0/...?page=2",
//!     "values": [ ... ]
//! }
//! ```
//!
//! [`decode_page`] reads that envelope leniently. Only `values` is mandatory;
//! each metadata field falls back to its zero value when it is absent or has
//! the wrong type. Elements of `values` are decoded one at a time, and the
//! ones that do not match `T` are reported in [`Page::skipped`] instead of
//! failing the whole page.
//!
//! # Example
//!
//! ```rust
//! use bitbucket_branch_restrictions::api::common::{decode_page, Page};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Named {
//!     name: String,
//! }
//!
//! let body = r#"{"page": 1, "values": [{"name": "a"}, {"id": 3}]}"#;
//! let page: Page<Named> = decode_page(body).unwrap();
//!
//! assert_eq!(page.values.len(), 1);
//! assert_eq!(page.skipped_count(), 1);
//! assert!(!page.has_next());
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::ApiError;

/// One page of results from a Bitbucket Cloud collection endpoint.
///
/// | Field | Missing or mistyped in the body |
/// |-------|---------------------------------|
/// | `page` | `0` |
/// | `pagelen` | `0` |
/// | `max_depth` | `0` |
/// | `size` | `0` |
/// | `next` | `""` |
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Current page number (1-indexed on the wire).
    pub page: u32,

    /// Requested number of items per page.
    pub pagelen: u32,

    /// Depth limit reported by the endpoint.
    pub max_depth: u32,

    /// Total number of items across all pages.
    pub size: u32,

    /// Opaque URL of the next page; empty on the last page.
    pub next: String,

    /// Items that decoded successfully, in response order.
    pub values: Vec<T>,

    /// Items that failed to decode.
    pub skipped: Vec<SkippedEntry>,
}

/// An element of `values` that could not be decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEntry {
    /// Position of the element in the `values` array.
    pub index: usize,

    /// Decoder error message.
    pub reason: String,
}

impl<T> Page<T> {
    /// Returns `true` when the service advertised another page.
    pub fn has_next(&self) -> bool {
        !self.next.is_empty()
    }

    /// Returns the cursor URL for the next page, if any.
    pub fn next_url(&self) -> Option<&str> {
        if self.next.is_empty() {
            None
        } else {
            Some(self.next.as_str())
        }
    }

    /// Number of elements dropped during decoding.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Returns `true` when every element of `values` decoded.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Appends the items of a following page.
    ///
    /// Skipped indices of `other` are shifted so that they stay unique across
    /// the merged sequence. Metadata is taken from `other`.
    pub fn extend(&mut self, other: Page<T>) {
        let offset = self.values.len() + self.skipped.len();

        self.skipped
            .extend(other.skipped.into_iter().map(|entry| SkippedEntry {
                index: entry.index + offset,
                reason: entry.reason,
            }));
        self.values.extend(other.values);

        self.page = other.page;
        self.pagelen = other.pagelen;
        self.max_depth = other.max_depth;
        self.size = other.size;
        self.next = other.next;
    }
}

/// Decodes a paginated response body into a [`Page`].
///
/// # Errors
///
/// - [`ApiError::InvalidJson`] when `body` is not JSON
/// - [`ApiError::MalformedEnvelope`] when the top level is not an object or
///   has no `values` array
pub fn decode_page<T: DeserializeOwned>(body: &str) -> Result<Page<T>, ApiError> {
    let envelope: Value = serde_json::from_str(body)?;

    let object = envelope.as_object().ok_or_else(|| {
        ApiError::MalformedEnvelope("response body is not a JSON object".to_string())
    })?;

    let entries = match object.get("values") {
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(ApiError::MalformedEnvelope(
                "`values` is not an array".to_string(),
            ))
        }
        None => {
            return Err(ApiError::MalformedEnvelope(
                "`values` is missing".to_string(),
            ))
        }
    };

    let mut values = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        match T::deserialize(entry) {
            Ok(value) => values.push(value),
            Err(e) => {
                warn!(index, error = %e, "skipping undecodable list entry");
                skipped.push(SkippedEntry {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(Page {
        page: number_field(object, "page"),
        pagelen: number_field(object, "pagelen"),
        max_depth: number_field(object, "max_depth"),
        size: number_field(object, "size"),
        next: object
            .get("next")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        values,
        skipped,
    })
}

// Any JSON number is accepted and truncated; everything else reads as 0.
fn number_field(object: &Map<String, Value>, key: &str) -> u32 {
    object
        .get(key)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .map(|n| n as u32)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    #[test]
    fn test_metadata_defaults_when_missing() {
        let page: Page<Item> = decode_page(r#"{"values": []}"#).unwrap();
        assert_eq!(page.page, 0);
        assert_eq!(page.pagelen, 0);
        assert_eq!(page.max_depth, 0);
        assert_eq!(page.size, 0);
        assert_eq!(page.next, "");
        assert!(page.values.is_empty());
        assert!(page.is_complete());
    }

    #[test]
    fn test_metadata_defaults_when_mistyped() {
        let body = r#"{"page": "2", "pagelen": null, "size": 7.0, "next": 5, "values": []}"#;
        let page: Page<Item> = decode_page(body).unwrap();
        assert_eq!(page.page, 0);
        assert_eq!(page.pagelen, 0);
        assert_eq!(page.size, 7);
        assert_eq!(page.next_url(), None);
    }

    #[test]
    fn test_values_must_be_an_array() {
        let missing = decode_page::<Item>(r#"{"page": 1}"#).unwrap_err();
        assert!(matches!(missing, ApiError::MalformedEnvelope(_)));

        let wrong = decode_page::<Item>(r#"{"values": {"id": 1}}"#).unwrap_err();
        assert!(matches!(wrong, ApiError::MalformedEnvelope(_)));

        let not_object = decode_page::<Item>("[1, 2]").unwrap_err();
        assert!(matches!(not_object, ApiError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_invalid_json_propagates() {
        let err = decode_page::<Item>("not json").unwrap_err();
        assert!(matches!(err, ApiError::InvalidJson(_)));
    }

    #[test]
    fn test_bad_entries_are_reported() {
        let body = r#"{"values": [{"id": 1}, {"id": "x"}, {"id": 3}, 4]}"#;
        let page: Page<Item> = decode_page(body).unwrap();
        assert_eq!(page.values, vec![Item { id: 1 }, Item { id: 3 }]);
        let indices: Vec<usize> = page.skipped.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn test_extend_rebases_skipped_indices() {
        let mut first: Page<Item> =
            decode_page(r#"{"page": 1, "next": "n2", "values": [{"id": 1}, {}]}"#).unwrap();
        let second: Page<Item> =
            decode_page(r#"{"page": 2, "values": [{}, {"id": 2}]}"#).unwrap();

        first.extend(second);

        assert_eq!(first.values, vec![Item { id: 1 }, Item { id: 2 }]);
        let indices: Vec<usize> = first.skipped.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(first.page, 2);
        assert!(!first.has_next());
    }
}
