//
//  bitbucket-branch-restrictions
//  api/cloud/branch_restrictions.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud branch restriction API.
//!
//! Branch restrictions are repository rules that limit who may push to,
//! merge into or delete branches matching a pattern, and set merge checks
//! such as a minimum number of approvals.
//!
//! # Endpoints
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | [`list`](BranchRestrictions::list) | GET | `/repositories/{owner}/{repo_slug}/branch-restrictions` |
//! | [`create`](BranchRestrictions::create) | POST | `/repositories/{owner}/{repo_slug}/branch-restrictions` |
//! | [`get`](BranchRestrictions::get) | GET | `/repositories/{owner}/{repo_slug}/branch-restrictions/{id}` |
//! | [`update`](BranchRestrictions::update) | PUT | `/repositories/{owner}/{repo_slug}/branch-restrictions/{id}` |
//! | [`delete`](BranchRestrictions::delete) | DELETE | `/repositories/{owner}/{repo_slug}/branch-restrictions/{id}` |
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_branch_restrictions::api::BitbucketClient;
//! use bitbucket_branch_restrictions::api::cloud::{BranchRestrictionOptions, RestrictionKind};
//!
//! # async fn example() -> Result<(), bitbucket_branch_restrictions::api::ApiError> {
//! let client = BitbucketClient::cloud()?;
//!
//! let options = BranchRestrictionOptions::new("myworkspace", "myrepo")
//!     .with_kind(RestrictionKind::RequireApprovalsToMerge)
//!     .with_pattern("main")
//!     .with_value(2);
//!
//! let created = client.branch_restrictions().create(&options).await?;
//! println!("Created restriction {}", created.id);
//! # Ok(())
//! # }
//! ```
//!
//! # Notes
//!
//! - Whether `value` means anything for a given `kind` is decided by
//!   Bitbucket, not checked here
//! - Kinds without a dedicated variant pass through as
//!   [`RestrictionKind::Other`]
//! - Listing tolerates individual bad records; see [`Page::skipped`]

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::api::common::{decode_page, ApiError, Link, Page};
use crate::api::transport::Transport;

/// The rule a branch restriction enforces.
///
/// Kinds Bitbucket documents get their own variant. Anything else the service
/// sends, or a caller asks for, is carried verbatim in [`RestrictionKind::Other`]
/// so it survives a decode and re-encode unchanged.
///
/// ```rust
/// use bitbucket_branch_restrictions::api::cloud::RestrictionKind;
///
/// assert_eq!("push".parse::<RestrictionKind>(), Ok(RestrictionKind::Push));
/// assert_eq!(
///     "require_signed_commits".parse::<RestrictionKind>(),
///     Ok(RestrictionKind::Other("require_signed_commits".to_string()))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RestrictionKind {
    /// Only listed users/groups may push.
    Push,
    /// Matching branches cannot be deleted.
    Delete,
    /// Force pushes are rejected.
    Force,
    /// Only listed users/groups may merge pull requests.
    RestrictMerges,
    RequireTasksToBeCompleted,
    /// At least `value` approvals before merging.
    RequireApprovalsToMerge,
    /// At least `value` default reviewer approvals before merging.
    RequireDefaultReviewerApprovalsToMerge,
    /// At least `value` approvals from each listed group before merging.
    RequireReviewGroupApprovalsToMerge,
    RequireNoChangesRequested,
    /// At least `value` successful builds before merging.
    RequirePassingBuildsToMerge,
    /// At most `value` commits behind the destination.
    RequireCommitsBehind,
    ResetPullrequestApprovalsOnChange,
    SmartResetPullrequestApprovals,
    ResetPullrequestChangesRequestedOnChange,
    RequireAllDependenciesMerged,
    EnforceMergeChecks,
    AllowAutoMergeWhenBuildsPass,
    RequireAllCommentsResolved,
    /// A kind with no dedicated variant, kept as sent.
    Other(String),
}

impl RestrictionKind {
    /// Every documented kind, in documentation order.
    pub const ALL: [RestrictionKind; 18] = [
        Self::Push,
        Self::Delete,
        Self::Force,
        Self::RestrictMerges,
        Self::RequireTasksToBeCompleted,
        Self::RequireApprovalsToMerge,
        Self::RequireDefaultReviewerApprovalsToMerge,
        Self::RequireReviewGroupApprovalsToMerge,
        Self::RequireNoChangesRequested,
        Self::RequirePassingBuildsToMerge,
        Self::RequireCommitsBehind,
        Self::ResetPullrequestApprovalsOnChange,
        Self::SmartResetPullrequestApprovals,
        Self::ResetPullrequestChangesRequestedOnChange,
        Self::RequireAllDependenciesMerged,
        Self::EnforceMergeChecks,
        Self::AllowAutoMergeWhenBuildsPass,
        Self::RequireAllCommentsResolved,
    ];

    /// Wire name of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Push => "push",
            Self::Delete => "delete",
            Self::Force => "force",
            Self::RestrictMerges => "restrict_merges",
            Self::RequireTasksToBeCompleted => "require_tasks_to_be_completed",
            Self::RequireApprovalsToMerge => "require_approvals_to_merge",
            Self::RequireDefaultReviewerApprovalsToMerge => {
                "require_default_reviewer_approvals_to_merge"
            }
            Self::RequireReviewGroupApprovalsToMerge => {
                "require_review_group_approvals_to_merge"
            }
            Self::RequireNoChangesRequested => "require_no_changes_requested",
            Self::RequirePassingBuildsToMerge => "require_passing_builds_to_merge",
            Self::RequireCommitsBehind => "require_commits_behind",
            Self::ResetPullrequestApprovalsOnChange => "reset_pullrequest_approvals_on_change",
            Self::SmartResetPullrequestApprovals => "smart_reset_pullrequest_approvals",
            Self::ResetPullrequestChangesRequestedOnChange => {
                "reset_pullrequest_changes_requested_on_change"
            }
            Self::RequireAllDependenciesMerged => "require_all_dependencies_merged",
            Self::EnforceMergeChecks => "enforce_merge_checks",
            Self::AllowAutoMergeWhenBuildsPass => "allow_auto_merge_when_builds_pass",
            Self::RequireAllCommentsResolved => "require_all_comments_resolved",
            Self::Other(kind) => kind,
        }
    }

    /// Returns `true` for kinds without a dedicated variant.
    pub fn is_other(&self) -> bool {
        matches!(self, Self::Other(_))
    }
}

impl From<String> for RestrictionKind {
    fn from(kind: String) -> Self {
        Self::ALL
            .iter()
            .find(|known| known.as_str() == kind)
            .cloned()
            .unwrap_or(Self::Other(kind))
    }
}

impl From<RestrictionKind> for String {
    fn from(kind: RestrictionKind) -> Self {
        match kind {
            RestrictionKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RestrictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses user input.
///
/// Documented kinds match case-insensitively with `-` for `_`. Any other
/// non-blank input becomes [`RestrictionKind::Other`] and is left for
/// Bitbucket to accept or reject.
impl FromStr for RestrictionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err("restriction kind cannot be empty".to_string());
        }

        let wanted = input.replace('-', "_");
        let kind = Self::ALL
            .iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(&wanted))
            .cloned()
            .unwrap_or_else(|| Self::Other(input.to_string()));
        Ok(kind)
    }
}

/// How `pattern` selects branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchMatchKind {
    /// `pattern` is a glob such as `release/*`.
    Glob,
    /// `branch_type` names a branching-model category.
    BranchingModel,
}

impl BranchMatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Glob => "glob",
            Self::BranchingModel => "branching_model",
        }
    }
}

/// Parameters for every branch restriction operation.
///
/// `owner` and `repo_slug` address the repository. `id` is needed by
/// [`get`](BranchRestrictions::get), [`update`](BranchRestrictions::update)
/// and [`delete`](BranchRestrictions::delete). The remaining fields form the
/// request body of [`create`](BranchRestrictions::create) and `update`.
///
/// # Example
///
/// ```rust
/// use bitbucket_branch_restrictions::api::cloud::{BranchRestrictionOptions, RestrictionKind};
///
/// let options = BranchRestrictionOptions {
///     owner: "ws".to_string(),
///     repo_slug: "repo".to_string(),
///     kind: Some(RestrictionKind::Push),
///     pattern: "main".to_string(),
///     users: vec!["alice".to_string()],
///     ..Default::default()
/// };
/// assert!(options.id.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchRestrictionOptions {
    /// Workspace slug or UUID owning the repository.
    pub owner: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Restriction id for single-item operations.
    pub id: Option<String>,
    /// Rule to enforce.
    pub kind: Option<RestrictionKind>,
    /// Numeric threshold for kinds that take one.
    pub value: Option<u64>,
    /// Branch glob.
    pub pattern: String,
    /// User identifiers, each sent as `users[].username`.
    pub users: Vec<String>,
    /// Group identifiers, each sent as `groups[].name`.
    pub groups: Vec<String>,
}

impl BranchRestrictionOptions {
    pub fn new(owner: impl Into<String>, repo_slug: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo_slug: repo_slug.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_kind(mut self, kind: RestrictionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_value(mut self, value: u64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users = users.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Builds the write-only request body.
    pub fn body(&self) -> BranchRestrictionBody {
        BranchRestrictionBody {
            kind: self.kind.clone(),
            pattern: self.pattern.clone(),
            value: self.value,
            users: self
                .users
                .iter()
                .map(|username| UserName {
                    username: username.clone(),
                })
                .collect(),
            groups: self
                .groups
                .iter()
                .map(|name| GroupName { name: name.clone() })
                .collect(),
        }
    }

    /// Serializes [`body`](Self::body) to JSON.
    ///
    /// # Errors
    ///
    /// [`ApiError::Encode`] if serialization fails.
    pub fn to_request_body(&self) -> Result<String, ApiError> {
        serde_json::to_string(&self.body()).map_err(ApiError::Encode)
    }

    fn collection_path(&self) -> String {
        format!(
            "/repositories/{}/{}/branch-restrictions",
            self.owner, self.repo_slug
        )
    }

    fn item_path(&self) -> Result<String, ApiError> {
        let id = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ApiError::MissingField("id"))?;

        Ok(format!("{}/{}", self.collection_path(), id))
    }
}

/// JSON body sent on create and update.
///
/// Only writable fields exist here; links, ids and profile data are filled in
/// by Bitbucket and never sent.
///
/// ```rust
/// use bitbucket_branch_restrictions::api::cloud::{BranchRestrictionOptions, RestrictionKind};
///
/// let body = BranchRestrictionOptions::new("ws", "repo")
///     .with_kind(RestrictionKind::Push)
///     .with_pattern("main")
///     .with_groups(["admins"])
///     .to_request_body()
///     .unwrap();
///
/// assert_eq!(
///     body,
///     r#"{"kind":"push","pattern":"main","value":null,"users":[],"groups":[{"name":"admins"}]}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRestrictionBody {
    pub kind: Option<RestrictionKind>,
    pub pattern: String,
    pub value: Option<u64>,
    pub users: Vec<UserName>,
    pub groups: Vec<GroupName>,
}

/// A user reference as written in a request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserName {
    pub username: String,
}

/// A group reference as written in a request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupName {
    pub name: String,
}

/// A branch restriction as returned by Bitbucket.
///
/// Documented fields are typed. Anything else the service adds is kept in
/// `extra` so it survives a re-serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRestriction {
    /// Numeric id, used as `{id}` in item URLs.
    #[serde(default)]
    pub id: u64,

    /// The rule enforced.
    pub kind: RestrictionKind,

    /// Branch glob; empty for branching-model matches.
    #[serde(default)]
    pub pattern: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_match_kind: Option<BranchMatchKind>,

    /// Branching-model category (`feature`, `release`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_type: Option<String>,

    /// Numeric threshold, for kinds that take one.
    #[serde(default)]
    pub value: Option<u64>,

    #[serde(default)]
    pub users: Vec<RestrictionUser>,

    #[serde(default)]
    pub groups: Vec<RestrictionGroup>,

    #[serde(default)]
    pub links: RestrictionLinks,

    /// Object type tag, normally `branchrestriction`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestrictionLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<Link>,
}

/// A user profile embedded in a restriction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestrictionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// ISO 8601 timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,

    #[serde(default)]
    pub links: UserLinks,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RestrictionUser {
    /// Best available human-facing identifier.
    pub fn label(&self) -> &str {
        self.username
            .as_deref()
            .or(self.nickname.as_deref())
            .or(self.display_name.as_deref())
            .or(self.uuid.as_deref())
            .unwrap_or("?")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repositories: Option<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following: Option<Link>,
}

/// A group embedded in a restriction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestrictionGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// `{owner}:{slug}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_slug: Option<String>,

    /// Member count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<u64>,

    #[serde(default)]
    pub links: GroupLinks,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RestrictionGroup {
    pub fn label(&self) -> &str {
        self.slug
            .as_deref()
            .or(self.name.as_deref())
            .or(self.full_slug.as_deref())
            .unwrap_or("?")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<Link>,
}

/// Decodes a paginated listing of branch restrictions.
///
/// Records that do not decode are listed in [`Page::skipped`].
///
/// # Errors
///
/// [`ApiError::InvalidJson`] or [`ApiError::MalformedEnvelope`].
pub fn decode_branch_restrictions(body: &str) -> Result<Page<BranchRestriction>, ApiError> {
    decode_page(body)
}

/// Decodes a single branch restriction.
///
/// # Errors
///
/// [`ApiError::InvalidJson`] when `body` is not JSON, [`ApiError::Decode`]
/// when it does not describe a restriction.
pub fn decode_branch_restriction(body: &str) -> Result<BranchRestriction, ApiError> {
    let value: Value = serde_json::from_str(body)?;
    serde_json::from_value(value).map_err(ApiError::Decode)
}

/// Branch restriction operations over a [`Transport`].
#[derive(Clone, Copy)]
pub struct BranchRestrictions<'c> {
    client: &'c dyn Transport,
}

impl<'c> BranchRestrictions<'c> {
    pub fn new(client: &'c dyn Transport) -> Self {
        Self { client }
    }

    /// Fetches the first page of restrictions for a repository.
    pub async fn list(
        &self,
        options: &BranchRestrictionOptions,
    ) -> Result<Page<BranchRestriction>, ApiError> {
        let body = self
            .client
            .execute_raw(Method::GET, &options.collection_path(), None)
            .await?;
        decode_branch_restrictions(&body)
    }

    /// Fetches the page behind a `next` cursor from an earlier listing.
    pub async fn list_page(&self, next_url: &str) -> Result<Page<BranchRestriction>, ApiError> {
        let body = self.client.execute_raw(Method::GET, next_url, None).await?;
        decode_branch_restrictions(&body)
    }

    /// Fetches every page and merges them into one [`Page`].
    ///
    /// The result carries the last page's metadata.
    ///
    /// # Errors
    ///
    /// [`ApiError::PaginationLoop`] when a `next` cursor repeats one that was
    /// already followed.
    pub async fn list_all(
        &self,
        options: &BranchRestrictionOptions,
    ) -> Result<Page<BranchRestriction>, ApiError> {
        let mut all = self.list(options).await?;
        let mut visited = HashSet::new();

        while let Some(next) = all.next_url().map(str::to_string) {
            if !visited.insert(next.clone()) {
                return Err(ApiError::PaginationLoop(next));
            }
            debug!(next = %next, fetched = all.values.len(), "following pagination cursor");
            let page = self.list_page(&next).await?;
            all.extend(page);
        }

        Ok(all)
    }

    /// Creates a restriction from the writable fields of `options`.
    pub async fn create(
        &self,
        options: &BranchRestrictionOptions,
    ) -> Result<BranchRestriction, ApiError> {
        let data = options.to_request_body()?;
        let body = self
            .client
            .execute_raw(Method::POST, &options.collection_path(), Some(data))
            .await?;
        decode_branch_restriction(&body)
    }

    /// Fetches the restriction `options.id`.
    pub async fn get(
        &self,
        options: &BranchRestrictionOptions,
    ) -> Result<BranchRestriction, ApiError> {
        let path = options.item_path()?;
        let body = self.client.execute_raw(Method::GET, &path, None).await?;
        decode_branch_restriction(&body)
    }

    /// Replaces the restriction `options.id` with the writable fields of `options`.
    pub async fn update(
        &self,
        options: &BranchRestrictionOptions,
    ) -> Result<BranchRestriction, ApiError> {
        let path = options.item_path()?;
        let data = options.to_request_body()?;
        let body = self
            .client
            .execute_raw(Method::PUT, &path, Some(data))
            .await?;
        decode_branch_restriction(&body)
    }

    /// Deletes the restriction `options.id`.
    ///
    /// Returns the raw response body, which Bitbucket leaves empty.
    pub async fn delete(&self, options: &BranchRestrictionOptions) -> Result<String, ApiError> {
        let path = options.item_path()?;
        self.client.execute_raw(Method::DELETE, &path, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_parsing() {
        assert_eq!(
            "require-approvals-to-merge".parse::<RestrictionKind>(),
            Ok(RestrictionKind::RequireApprovalsToMerge)
        );
        assert_eq!("PUSH".parse::<RestrictionKind>(), Ok(RestrictionKind::Push));
        assert_eq!(
            " require_signed_commits ".parse::<RestrictionKind>(),
            Ok(RestrictionKind::Other("require_signed_commits".to_string()))
        );
        assert!("  ".parse::<RestrictionKind>().is_err());
    }

    #[test]
    fn test_kind_wire_names_match_serde() {
        for kind in RestrictionKind::ALL {
            assert_eq!(serde_json::to_value(&kind).unwrap(), json!(kind.as_str()));
            let decoded: RestrictionKind = serde_json::from_value(json!(kind.as_str())).unwrap();
            assert_eq!(decoded, kind);
            assert!(!decoded.is_other());
        }
    }

    #[test]
    fn test_body_has_only_writable_fields() {
        let options = BranchRestrictionOptions::new("ws", "repo")
            .with_id(9)
            .with_kind(RestrictionKind::RequireApprovalsToMerge)
            .with_pattern("release/*")
            .with_value(2)
            .with_users(["alice", "bob"])
            .with_groups(["devs"]);

        let body: Value = serde_json::from_str(&options.to_request_body().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "kind": "require_approvals_to_merge",
                "pattern": "release/*",
                "value": 2,
                "users": [{"username": "alice"}, {"username": "bob"}],
                "groups": [{"name": "devs"}],
            })
        );
    }

    #[test]
    fn test_body_roundtrip_keeps_names() {
        let options = BranchRestrictionOptions::new("ws", "repo")
            .with_kind(RestrictionKind::RestrictMerges)
            .with_users(["alice", "bob"])
            .with_groups(["admins"]);

        let decoded: BranchRestrictionBody =
            serde_json::from_str(&options.to_request_body().unwrap()).unwrap();

        let users: Vec<&str> = decoded.users.iter().map(|u| u.username.as_str()).collect();
        let groups: Vec<&str> = decoded.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(users, vec!["alice", "bob"]);
        assert_eq!(groups, vec!["admins"]);
        assert_eq!(decoded.value, None);
    }

    #[test]
    fn test_item_path_requires_id() {
        let options = BranchRestrictionOptions::new("ws", "repo");
        assert!(matches!(options.item_path(), Err(ApiError::MissingField("id"))));
        assert!(matches!(
            options.clone().with_id("  ").item_path(),
            Err(ApiError::MissingField("id"))
        ));
        assert_eq!(
            options.with_id(42).item_path().unwrap(),
            "/repositories/ws/repo/branch-restrictions/42"
        );
    }

    #[test]
    fn test_decode_full_record() {
        let body = json!({
            "type": "branchrestriction",
            "id": 17,
            "kind": "push",
            "branch_match_kind": "glob",
            "pattern": "main",
            "value": null,
            "links": {
                "self": {"href": "https://api.bitbucket.org/2.0/repositories/ws/repo/branch-restrictions/17"}
            },
            "users": [{
                "type": "user",
                "display_name": "Alice",
                "nickname": "alice",
                "uuid": "{a1}",
                "links": {"avatar": {"href": "https://avatars/a1"}}
            }],
            "groups": [{
                "name": "Admins",
                "slug": "admins",
                "full_slug": "ws:admins",
                "members": 3
            }]
        })
        .to_string();

        let restriction = decode_branch_restriction(&body).unwrap();
        assert_eq!(restriction.id, 17);
        assert_eq!(restriction.kind, RestrictionKind::Push);
        assert_eq!(restriction.branch_match_kind, Some(BranchMatchKind::Glob));
        assert_eq!(restriction.object_type.as_deref(), Some("branchrestriction"));
        assert!(restriction.links.self_link.is_some());
        assert_eq!(restriction.users[0].label(), "alice");
        assert_eq!(
            restriction.users[0].extra.get("type"),
            Some(&json!("user"))
        );
        assert_eq!(restriction.groups[0].label(), "admins");
        assert_eq!(restriction.groups[0].members, Some(3));
        assert!(restriction.extra.is_empty());
    }

    #[test]
    fn test_decode_single_errors() {
        assert!(matches!(
            decode_branch_restriction("{"),
            Err(ApiError::InvalidJson(_))
        ));
        assert!(matches!(
            decode_branch_restriction(r#"{"kind": 7}"#),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(
            decode_branch_restriction(r#"{"pattern": "main"}"#),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_listing_example() {
        let body = r#"{"page":2,"pagelen":10,"size":25,"next":"http://x","values":[{"kind":"push","pattern":"main"},{"kind":"bogus_unparseable"}]}"#;
        let page = decode_branch_restrictions(body).unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.pagelen, 10);
        assert_eq!(page.max_depth, 0);
        assert_eq!(page.size, 25);
        assert_eq!(page.next, "http://x");
        assert_eq!(page.values.len(), 2);
        assert_eq!(page.values[0].pattern, "main");
        assert_eq!(
            page.values[1].kind,
            RestrictionKind::Other("bogus_unparseable".to_string())
        );
        assert!(page.is_complete());
    }

    #[test]
    fn test_decode_listing_skips_malformed_entries() {
        let body = r#"{"values":[{"kind":"push"},{"kind":["push"]},"oops",{"pattern":"main"}]}"#;
        let page = decode_branch_restrictions(body).unwrap();

        assert_eq!(page.values.len(), 1);
        let indices: Vec<usize> = page.skipped.iter().map(|entry| entry.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_unknown_kind_round_trips() {
        let body = r#"{"id":1,"kind":"require_review_group_approvals_to_merge","pattern":"main","value":1}"#;
        let restriction = decode_branch_restriction(body).unwrap();
        assert_eq!(
            restriction.kind,
            RestrictionKind::RequireReviewGroupApprovalsToMerge
        );
        assert_eq!(restriction.value, Some(1));

        let future =
            decode_branch_restriction(r#"{"id":2,"kind":"require_signed_commits"}"#).unwrap();
        assert_eq!(
            future.kind,
            RestrictionKind::Other("require_signed_commits".to_string())
        );
        assert_eq!(
            serde_json::to_value(&future).unwrap()["kind"],
            json!("require_signed_commits")
        );

        let request: Value = serde_json::from_str(
            &BranchRestrictionOptions::new("ws", "repo")
                .with_kind(future.kind.clone())
                .to_request_body()
                .unwrap(),
        )
        .unwrap();
        assert_eq!(request["kind"], json!("require_signed_commits"));
    }

    #[test]
    fn test_decode_listing_without_values_fails() {
        let err = decode_branch_restrictions(r#"{"page": 1, "size": 0}"#).unwrap_err();
        assert!(matches!(err, ApiError::MalformedEnvelope(_)));
    }
}
