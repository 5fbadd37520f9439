//
//  bitbucket-branch-restrictions
//  api/cloud/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Bitbucket Cloud API v2.0 resources.
//!
//! # Module Organization
//!
//! - [`branch_restrictions`] - Branch permission and merge-check rules
//!
//! # Notes
//!
//! - All timestamps are in ISO 8601 format
//! - UUIDs are returned with curly braces (e.g., `{123e4567-e89b-...}`)
//! - Pagination uses cursor-based navigation with `next` links

pub mod branch_restrictions;

pub use branch_restrictions::*;
