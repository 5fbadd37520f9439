//
//  bitbucket-branch-restrictions
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Host Constants
//!
//! Well-known Bitbucket Cloud endpoints and the environment variable names
//! that override them.
//!
//! ```rust
//! use bitbucket_branch_restrictions::config::normalize_api_url;
//!
//! assert_eq!(normalize_api_url(" https://api.bitbucket.org/2.0/ "), "https://api.bitbucket.org/2.0");
//! ```

/// Base URL of the Bitbucket Cloud REST API 2.0.
pub const BITBUCKET_API_URL: &str = "https://api.bitbucket.org/2.0";

/// Overrides [`HostConfig::api_url`](super::HostConfig::api_url).
pub const API_URL_ENV: &str = "BB_API_URL";

/// Overrides [`HostConfig::user`](super::HostConfig::user).
pub const USER_ENV: &str = "BB_USER";

/// Trims whitespace and trailing slashes so paths can be appended directly.
pub fn normalize_api_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_api_url() {
        assert_eq!(normalize_api_url("http://x/2.0//"), "http://x/2.0");
        assert_eq!(normalize_api_url(BITBUCKET_API_URL), BITBUCKET_API_URL);
    }
}
