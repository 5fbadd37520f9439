//
//  bitbucket-branch-restrictions
//  cli/restriction.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Branch restriction commands
//!
//! ## Examples
//!
//! ```bash
//! # List restrictions
//! bb-restrictions -R myworkspace/myrepo list --all
//!
//! # Require two approvals on main
//! bb-restrictions create --kind require_approvals_to_merge --pattern main --value 2
//!
//! # Only let admins push to release branches
//! bb-restrictions create --kind push --pattern 'release/*' --groups admins
//!
//! # Delete a restriction
//! bb-restrictions delete 42 --yes
//! ```

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;

use crate::api::cloud::{BranchRestriction, BranchRestrictionOptions, RestrictionKind};
use crate::api::BitbucketClient;
use crate::auth::AuthCredential;
use crate::config::Config;
use crate::output::{
    print_field, table_with_headers, truncate, OutputFormat, OutputWriter, TableOutput,
};

use super::{Commands, GlobalOptions};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Follow pagination and fetch every restriction
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Restriction ID
    pub id: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Restriction kind (e.g. push, restrict_merges, require_approvals_to_merge)
    #[arg(long, short = 'k')]
    pub kind: RestrictionKind,

    /// Branch glob pattern
    #[arg(long, short = 'p')]
    pub pattern: String,

    /// Numeric threshold for kinds that take one
    #[arg(long, short = 'v')]
    pub value: Option<u64>,

    /// Usernames, sent as `users[].username` (comma-separated)
    #[arg(long, short = 'u', value_delimiter = ',')]
    pub users: Vec<String>,

    /// Group names, sent as `groups[].name` (comma-separated)
    #[arg(long, short = 'g', value_delimiter = ',')]
    pub groups: Vec<String>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Restriction ID
    pub id: String,

    /// New restriction kind
    #[arg(long, short = 'k')]
    pub kind: Option<RestrictionKind>,

    /// New branch glob pattern
    #[arg(long, short = 'p')]
    pub pattern: Option<String>,

    /// New numeric threshold
    #[arg(long, short = 'v')]
    pub value: Option<u64>,

    /// Replace the user list with these usernames (comma-separated)
    #[arg(long, short = 'u', value_delimiter = ',')]
    pub users: Option<Vec<String>>,

    /// Replace the group list with these group names (comma-separated)
    #[arg(long, short = 'g', value_delimiter = ',')]
    pub groups: Option<Vec<String>>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Restriction ID
    pub id: String,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl TableOutput for BranchRestriction {
    fn print_table(&self, color: bool) {
        println!();
        if color {
            println!("{}", style(format!("Branch restriction {}", self.id)).bold());
        } else {
            println!("Branch restriction {}", self.id);
        }
        println!("{}", "-".repeat(60));
        print_field("Kind", self.kind.as_str(), color);
        print_field("Pattern", or_dash(&self.pattern), color);
        if let Some(match_kind) = self.branch_match_kind {
            print_field("Match kind", match_kind.as_str(), color);
        }
        if let Some(branch_type) = &self.branch_type {
            print_field("Branch type", branch_type, color);
        }
        print_field("Value", &format_value(self.value), color);
        print_field("Users", or_dash(&user_labels(self)), color);
        print_field("Groups", or_dash(&group_labels(self)), color);
        if let Some(link) = &self.links.self_link {
            print_field("URL", &link.href, color);
        }
        println!();
    }
}

impl Commands {
    /// Dispatches a parsed command.
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match self {
            Commands::List(args) => list(args, global).await,
            Commands::View(args) => view(args, global).await,
            Commands::Create(args) => create(args, global).await,
            Commands::Edit(args) => edit(args, global).await,
            Commands::Delete(args) => delete(args, global).await,
            Commands::Version => {
                println!("bb-restrictions version {}", crate::VERSION);
                Ok(())
            }
        }
    }
}

/// Resolved command context: where to send requests and for which repository.
struct CommandContext {
    client: BitbucketClient,
    owner: String,
    repo_slug: String,
}

impl CommandContext {
    fn resolve(global: &GlobalOptions) -> Result<Self> {
        let config = Config::load()?;

        let repo = global
            .repo
            .clone()
            .or_else(|| config.host.default_repo.clone())
            .context("No repository given. Use --repo WORKSPACE/REPO or set BB_REPO.")?;
        let (owner, repo_slug) = parse_repo(&repo)?;

        let auth = AuthCredential::from_env_with_username(config.host.user.as_deref()).context(
            "Not authenticated. Set BB_TOKEN, or BB_APP_PASSWORD with BB_USERNAME or host.user.",
        )?;
        let client = BitbucketClient::from_config(&config.host)?.with_auth(auth);

        Ok(Self {
            client,
            owner,
            repo_slug,
        })
    }

    fn options(&self) -> BranchRestrictionOptions {
        BranchRestrictionOptions::new(&self.owner, &self.repo_slug)
    }
}

fn parse_repo(repo: &str) -> Result<(String, String)> {
    match repo.trim().trim_matches('/').split_once('/') {
        Some((owner, slug)) if !owner.is_empty() && !slug.is_empty() && !slug.contains('/') => {
            Ok((owner.to_string(), slug.to_string()))
        }
        _ => bail!("Invalid repository '{}'. Expected WORKSPACE/REPO.", repo),
    }
}

fn writer(global: &GlobalOptions) -> OutputWriter {
    OutputWriter::new(if global.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    })
}

/// List branch restrictions
async fn list(args: &ListArgs, global: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::resolve(global)?;
    let resource = ctx.client.branch_restrictions();
    let options = ctx.options();

    let page = if args.all {
        resource.list_all(&options).await?
    } else {
        resource.list(&options).await?
    };

    let writer = writer(global);

    if writer.format() == OutputFormat::Json {
        return writer.write_json(&page);
    }

    if page.values.is_empty() && page.is_complete() {
        println!("No branch restrictions found.");
        return Ok(());
    }

    let color = console::colors_enabled();
    let mut table = table_with_headers(
        &["ID", "KIND", "PATTERN", "VALUE", "USERS", "GROUPS"],
        color,
    );
    for restriction in &page.values {
        table.add_row(vec![
            restriction.id.to_string(),
            restriction.kind.to_string(),
            or_dash(&restriction.pattern).to_string(),
            format_value(restriction.value),
            truncate(or_dash(&user_labels(restriction)), 30),
            truncate(or_dash(&group_labels(restriction)), 30),
        ]);
    }
    println!("{table}");

    println!("Showing {} restriction(s)", page.values.len());
    if page.has_next() {
        println!("More results available; use --all to fetch every page.");
    }
    for skipped in &page.skipped {
        writer.write_warning(&format!(
            "entry {} could not be read: {}",
            skipped.index, skipped.reason
        ));
    }

    Ok(())
}

/// View a branch restriction
async fn view(args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::resolve(global)?;
    let options = ctx.options().with_id(&args.id);

    let restriction = ctx.client.branch_restrictions().get(&options).await?;

    writer(global).write(&restriction)
}

/// Create a branch restriction
async fn create(args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::resolve(global)?;

    let mut options = ctx
        .options()
        .with_kind(args.kind.clone())
        .with_pattern(&args.pattern)
        .with_users(args.users.iter().map(String::as_str))
        .with_groups(args.groups.iter().map(String::as_str));
    options.value = args.value;

    let restriction = ctx.client.branch_restrictions().create(&options).await?;

    let writer = writer(global);
    if global.json {
        writer.write_json(&restriction)
    } else {
        writer.write_success(&format!(
            "Created {} restriction {} on '{}'",
            restriction.kind, restriction.id, restriction.pattern
        ));
        Ok(())
    }
}

/// Edit a branch restriction
async fn edit(args: &EditArgs, global: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::resolve(global)?;
    let resource = ctx.client.branch_restrictions();

    // Update replaces the whole rule, so start from the current one
    let current = resource.get(&ctx.options().with_id(&args.id)).await?;
    let options = merge_edit(ctx.options().with_id(&args.id), &current, args);

    let restriction = resource.update(&options).await?;

    let writer = writer(global);
    if global.json {
        writer.write_json(&restriction)
    } else {
        writer.write_success(&format!("Updated restriction {}", restriction.id));
        Ok(())
    }
}

/// Overlays the edit flags on the current restriction.
///
/// Users and groups left unset are sent back as they are. A user goes out
/// as its `username`, or its `uuid` when the profile has no username; a
/// group goes out as its `name`, or its `slug` when unnamed.
fn merge_edit(
    options: BranchRestrictionOptions,
    current: &BranchRestriction,
    args: &EditArgs,
) -> BranchRestrictionOptions {
    let users = args.users.clone().unwrap_or_else(|| {
        current
            .users
            .iter()
            .filter_map(|u| u.username.clone().or_else(|| u.uuid.clone()))
            .collect()
    });
    let groups = args.groups.clone().unwrap_or_else(|| {
        current
            .groups
            .iter()
            .filter_map(|g| g.name.clone().or_else(|| g.slug.clone()))
            .collect()
    });

    let mut options = options
        .with_kind(args.kind.clone().unwrap_or_else(|| current.kind.clone()))
        .with_pattern(args.pattern.clone().unwrap_or_else(|| current.pattern.clone()))
        .with_users(users)
        .with_groups(groups);
    options.value = args.value.or(current.value);
    options
}

/// Delete a branch restriction
async fn delete(args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::resolve(global)?;

    if !args.yes && !global.no_prompt {
        use dialoguer::Confirm;
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete branch restriction {}?", args.id))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{} Cancelled.", style("!").yellow());
            return Ok(());
        }
    }

    let options = ctx.options().with_id(&args.id);
    ctx.client.branch_restrictions().delete(&options).await?;

    let writer = writer(global);
    if global.json {
        writer.write_json(&serde_json::json!({
            "success": true,
            "id": args.id,
        }))
    } else {
        writer.write_success(&format!("Deleted restriction {}", args.id));
        Ok(())
    }
}

fn user_labels(restriction: &BranchRestriction) -> String {
    restriction
        .users
        .iter()
        .map(|u| u.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn group_labels(restriction: &BranchRestriction) -> String {
    restriction
        .groups
        .iter()
        .map(|g| g.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_value(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::cloud::decode_branch_restriction;

    #[test]
    fn test_parse_repo() {
        assert_eq!(
            parse_repo("ws/repo").unwrap(),
            ("ws".to_string(), "repo".to_string())
        );
        assert_eq!(
            parse_repo("/ws/repo/").unwrap(),
            ("ws".to_string(), "repo".to_string())
        );
        assert!(parse_repo("repo").is_err());
        assert!(parse_repo("a/b/c").is_err());
        assert!(parse_repo("ws/").is_err());
    }

    #[test]
    fn test_merge_edit_overlays_flags() {
        let current = decode_branch_restriction(
            r#"{
                "id": 5,
                "kind": "push",
                "pattern": "main",
                "value": null,
                "users": [{"username": "alice"}, {"uuid": "{b0b}"}],
                "groups": [{"name": "Admins", "slug": "admins"}]
            }"#,
        )
        .unwrap();

        let args = EditArgs {
            id: "5".to_string(),
            kind: None,
            pattern: Some("release/*".to_string()),
            value: None,
            users: None,
            groups: Some(vec!["ops".to_string()]),
        };

        let options = merge_edit(
            BranchRestrictionOptions::new("ws", "repo").with_id(5),
            &current,
            &args,
        );

        assert_eq!(options.kind, Some(RestrictionKind::Push));
        assert_eq!(options.pattern, "release/*");
        assert_eq!(options.value, None);
        assert_eq!(options.users, vec!["alice", "{b0b}"]);
        assert_eq!(options.groups, vec!["ops"]);
        assert_eq!(options.id.as_deref(), Some("5"));

        let keep_groups = EditArgs {
            groups: None,
            ..args
        };
        let options = merge_edit(
            BranchRestrictionOptions::new("ws", "repo").with_id(5),
            &current,
            &keep_groups,
        );
        assert_eq!(options.groups, vec!["Admins"]);
        assert_eq!(options.pattern, "release/*");
    }
}
