//
//  bitbucket-branch-restrictions
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Credentials are obtained elsewhere (OAuth flows, token stores) and handed
//! to the client ready to use. This module only knows how to attach them to
//! an outgoing request and how to pick them up from the environment.
//!
//! ## Environment
//!
//! | Variable | Credential |
//! |----------|------------|
//! | `BB_TOKEN` | [`AuthCredential::AccessToken`] (bearer) |
//! | `BB_USERNAME` + `BB_APP_PASSWORD` | [`AuthCredential::AppPassword`] (basic) |
//!
//! `BB_TOKEN` wins when both are set. Without `BB_USERNAME`, the app password
//! is paired with the configured `host.user` when the caller passes it to
//! [`AuthCredential::from_env_with_username`].

use reqwest::RequestBuilder;

/// Environment variable holding a bearer access token.
pub const TOKEN_ENV: &str = "BB_TOKEN";

/// Environment variable holding the Bitbucket username for app passwords.
pub const USERNAME_ENV: &str = "BB_USERNAME";

/// Environment variable holding an app password.
pub const APP_PASSWORD_ENV: &str = "BB_APP_PASSWORD";

/// Credentials accepted by Bitbucket Cloud.
///
/// # Example
///
/// ```rust
/// use bitbucket_branch_restrictions::auth::AuthCredential;
///
/// let token = AuthCredential::bearer("abc123");
/// let app = AuthCredential::AppPassword {
///     username: "alice".to_string(),
///     password: "app-pass".to_string(),
/// };
/// assert_ne!(format!("{:?}", token), format!("{:?}", app));
/// ```
#[derive(Clone, PartialEq)]
pub enum AuthCredential {
    /// OAuth, repository or workspace access token sent as `Bearer`.
    AccessToken {
        /// The token string.
        token: String,
    },
    /// Username and app password sent as HTTP Basic.
    AppPassword {
        /// The Bitbucket username.
        username: String,
        /// The app password generated from Bitbucket settings.
        password: String,
    },
}

impl AuthCredential {
    /// Shorthand for [`AuthCredential::AccessToken`].
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::AccessToken {
            token: token.into(),
        }
    }

    /// Reads a credential from the process environment.
    ///
    /// Returns `None` when no usable combination of variables is set; empty
    /// values count as unset.
    pub fn from_env() -> Option<Self> {
        Self::from_env_with_username(None)
    }

    /// Like [`from_env`](Self::from_env), but pairs `BB_APP_PASSWORD` with
    /// `username` when `BB_USERNAME` is unset.
    ///
    /// `username` is normally the configured `host.user`.
    pub fn from_env_with_username(username: Option<&str>) -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), username)
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        fallback_username: Option<&str>,
    ) -> Option<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(TOKEN_ENV) {
            return Some(Self::bearer(token));
        }

        let username = non_empty(USERNAME_ENV).or_else(|| {
            fallback_username
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        });

        match (username, non_empty(APP_PASSWORD_ENV)) {
            (Some(username), Some(password)) => Some(Self::AppPassword { username, password }),
            _ => None,
        }
    }

    /// Adds the matching `Authorization` header to `request`.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::AccessToken { token } => request.bearer_auth(token),
            Self::AppPassword { username, password } => {
                request.basic_auth(username, Some(password))
            }
        }
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessToken { .. } => f.debug_struct("AccessToken").finish_non_exhaustive(),
            Self::AppPassword { username, .. } => f
                .debug_struct("AppPassword")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_token_takes_precedence() {
        let cred = AuthCredential::from_lookup(
            lookup(&[
                (TOKEN_ENV, "tok"),
                (USERNAME_ENV, "alice"),
                (APP_PASSWORD_ENV, "pw"),
            ]),
            None,
        );
        assert_eq!(cred, Some(AuthCredential::bearer("tok")));
    }

    #[test]
    fn test_app_password_needs_both_parts() {
        assert_eq!(
            AuthCredential::from_lookup(lookup(&[(USERNAME_ENV, "alice")]), None),
            None
        );
        assert_eq!(
            AuthCredential::from_lookup(
                lookup(&[(USERNAME_ENV, "alice"), (APP_PASSWORD_ENV, "pw")]),
                None,
            ),
            Some(AuthCredential::AppPassword {
                username: "alice".to_string(),
                password: "pw".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_values_are_ignored() {
        assert_eq!(
            AuthCredential::from_lookup(lookup(&[(TOKEN_ENV, "  ")]), None),
            None
        );
    }

    #[test]
    fn test_app_password_falls_back_to_configured_user() {
        let vars = lookup(&[(APP_PASSWORD_ENV, "pw")]);
        assert_eq!(
            AuthCredential::from_lookup(&vars, Some("carol")),
            Some(AuthCredential::AppPassword {
                username: "carol".to_string(),
                password: "pw".to_string(),
            })
        );
        assert_eq!(AuthCredential::from_lookup(&vars, Some(" ")), None);

        // BB_USERNAME wins over the configured user
        assert_eq!(
            AuthCredential::from_lookup(
                lookup(&[(USERNAME_ENV, "alice"), (APP_PASSWORD_ENV, "pw")]),
                Some("carol"),
            ),
            Some(AuthCredential::AppPassword {
                username: "alice".to_string(),
                password: "pw".to_string(),
            })
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", AuthCredential::bearer("s3cret"));
        assert!(!rendered.contains("s3cret"));
    }
}
