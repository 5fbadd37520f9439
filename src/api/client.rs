//
//  bitbucket-branch-restrictions
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client for the Bitbucket API
//!
//! [`BitbucketClient`] is the default [`Transport`]. It owns a `reqwest`
//! client, the API base URL and an optional credential, and hands out
//! resource handles such as [`BitbucketClient::branch_restrictions`].
//!
//! ## Features
//!
//! - Relative paths are joined onto the base URL; absolute URLs (pagination
//!   cursors) are used as-is
//! - Authentication header injection
//! - Non-success statuses mapped onto [`ApiError`]
//! - Custom User-Agent header

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use tracing::debug;
use url::Url;

use super::cloud::BranchRestrictions;
use super::common::ApiError;
use super::transport::Transport;
use crate::auth::AuthCredential;
use crate::config::{normalize_api_url, HostConfig, BITBUCKET_API_URL};

/// The HTTP client for the Bitbucket Cloud API.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use bitbucket_branch_restrictions::api::BitbucketClient;
/// use bitbucket_branch_restrictions::auth::AuthCredential;
///
/// let client = BitbucketClient::cloud()?
///     .with_auth(AuthCredential::bearer("your-token"));
/// assert_eq!(client.base_url(), "https://api.bitbucket.org/2.0");
/// # Ok::<(), bitbucket_branch_restrictions::api::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BitbucketClient {
    /// The underlying HTTP client
    http: Client,
    /// API base URL without trailing slash
    base_url: String,
    /// Optional authentication credentials
    auth: Option<AuthCredential>,
}

impl BitbucketClient {
    /// Creates a client for `https://api.bitbucket.org/2.0`.
    pub fn cloud() -> Result<Self, ApiError> {
        Self::with_base_url(BITBUCKET_API_URL)
    }

    /// Creates a client for an arbitrary API base URL.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidUrl`] when `base_url` is not an absolute URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        let base_url = normalize_api_url(base_url);
        Url::parse(&base_url)?;

        Ok(Self {
            http: Client::builder()
                .user_agent(format!("bb-restrictions/{}", crate::VERSION))
                .build()?,
            base_url,
            auth: None,
        })
    }

    /// Creates a client from a host configuration.
    ///
    /// ```rust,no_run
    /// use bitbucket_branch_restrictions::api::BitbucketClient;
    /// use bitbucket_branch_restrictions::config::HostConfig;
    ///
    /// let config = HostConfig {
    ///     api_url: "http://localhost:8080/2.0".to_string(),
    ///     ..Default::default()
    /// };
    /// let client = BitbucketClient::from_config(&config)?;
    /// # Ok::<(), bitbucket_branch_restrictions::api::ApiError>(())
    /// ```
    pub fn from_config(config: &HostConfig) -> Result<Self, ApiError> {
        Self::with_base_url(&config.api_url)
    }

    /// Sets the authentication credentials for this client.
    pub fn with_auth(mut self, auth: AuthCredential) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves `path` against the base URL.
    ///
    /// Absolute `http(s)` URLs are returned unchanged.
    pub fn request_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Branch restriction operations bound to this client.
    pub fn branch_restrictions(&self) -> BranchRestrictions<'_> {
        BranchRestrictions::new(self)
    }
}

#[async_trait]
impl Transport for BitbucketClient {
    async fn execute_raw(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
    ) -> Result<String, ApiError> {
        let url = self.request_url(url);
        debug!(%method, %url, has_body = body.is_some(), "sending request");

        let mut request = self.http.request(method, &url);

        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        if let Some(auth) = &self.auth {
            request = auth.apply_to_request(request);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(%status, "received response");

        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_status(status, &text));
        }

        Ok(text)
    }
}
