//
//  bitbucket-branch-restrictions
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Branch Restrictions
//!
//! A typed client for the Bitbucket Cloud branch restrictions API, the rules
//! that govern who may push to, merge into or delete matching branches.
//!
//! ## Module Structure
//!
//! - [`api`]: transport seam, HTTP client, branch restriction resource
//! - [`auth`]: credentials attached to outgoing requests
//! - [`config`]: configuration file and environment overrides
//! - [`output`]: table and JSON rendering for the binary
//! - [`cli`]: command-line interface definitions using clap
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bitbucket_branch_restrictions::api::BitbucketClient;
//! use bitbucket_branch_restrictions::api::cloud::{BranchRestrictionOptions, RestrictionKind};
//! use bitbucket_branch_restrictions::auth::AuthCredential;
//!
//! # async fn example() -> Result<(), bitbucket_branch_restrictions::api::ApiError> {
//! let client = BitbucketClient::cloud()?.with_auth(AuthCredential::bearer("token"));
//! let restrictions = client.branch_restrictions();
//!
//! let options = BranchRestrictionOptions::new("myworkspace", "myrepo")
//!     .with_kind(RestrictionKind::Push)
//!     .with_pattern("main")
//!     .with_groups(["admins"]);
//! let created = restrictions.create(&options).await?;
//!
//! let page = restrictions.list(&options).await?;
//! assert!(page.values.iter().any(|r| r.id == created.id));
//! # Ok(())
//! # }
//! ```

/// API layer: [`api::Transport`], [`api::BitbucketClient`] and the
/// branch restriction resource in [`api::cloud`].
pub mod api;

/// Authentication credentials.
pub mod auth;

/// Configuration file management.
pub mod config;

/// Output formatting for the binary.
pub mod output;

/// Command-line interface definitions.
pub mod cli;

pub use api::{ApiError, BitbucketClient};
pub use cli::Cli;
pub use config::Config;

/// Application version, taken from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the binary.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// Any failure; details are printed to stderr.
    pub const ERROR: i32 = 1;
}
