//
//  bitbucket-branch-restrictions
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! ## Architecture
//!
//! - [`transport`]: the [`Transport`] trait every resource sends requests through
//! - [`client`]: [`BitbucketClient`], the reqwest-backed transport
//! - [`cloud`]: Bitbucket Cloud resources (branch restrictions)
//! - [`common`]: shared error, link and pagination types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_branch_restrictions::api::BitbucketClient;
//! use bitbucket_branch_restrictions::api::cloud::BranchRestrictionOptions;
//! use bitbucket_branch_restrictions::auth::AuthCredential;
//!
//! # async fn example() -> Result<(), bitbucket_branch_restrictions::api::ApiError> {
//! let client = BitbucketClient::cloud()?.with_auth(AuthCredential::bearer("your-token"));
//! let page = client
//!     .branch_restrictions()
//!     .list(&BranchRestrictionOptions::new("myworkspace", "myrepo"))
//!     .await?;
//!
//! for restriction in &page.values {
//!     println!("{} {}", restriction.kind, restriction.pattern);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`ApiError`]. HTTP failures map to
//! `AuthFailed` (401), `Forbidden` (403), `NotFound` (404),
//! `RateLimited` (429) and `ServerError` (5xx).

pub mod client;
pub mod cloud;
pub mod common;
pub mod transport;

pub use client::BitbucketClient;
pub use common::{ApiError, Page};
pub use transport::Transport;
