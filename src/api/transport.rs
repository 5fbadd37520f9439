//
//  bitbucket-branch-restrictions
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The HTTP seam every resource talks through.
//!
//! Resources never touch `reqwest` directly. They hand a method, a URL and an
//! optional JSON body to a [`Transport`] and get the raw response body back.
//! [`BitbucketClient`](super::BitbucketClient) is the production
//! implementation; tests plug in recording fakes.

use async_trait::async_trait;
use reqwest::Method;

use super::common::ApiError;

/// Executes raw HTTP requests against the Bitbucket API.
///
/// `url` is either a path relative to the API base
/// (`/repositories/ws/repo/branch-restrictions`) or an absolute URL such as a
/// pagination cursor. `body`, when present, is already-encoded JSON.
///
/// Implementations must return the response body untouched on success and map
/// non-success statuses and network failures onto [`ApiError`].
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use bitbucket_branch_restrictions::api::common::ApiError;
/// use bitbucket_branch_restrictions::api::Transport;
/// use reqwest::Method;
///
/// struct Canned(&'static str);
///
/// #[async_trait]
/// impl Transport for Canned {
///     async fn execute_raw(
///         &self,
///         _method: Method,
///         _url: &str,
///         _body: Option<String>,
///     ) -> Result<String, ApiError> {
///         Ok(self.0.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns the response body.
    async fn execute_raw(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
    ) -> Result<String, ApiError>;
}
