//
//  bitbucket-branch-restrictions
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod restriction;

pub use restriction::*;

use clap::{Parser, Subcommand};

/// Manage Bitbucket Cloud branch restrictions from the command line
#[derive(Parser, Debug)]
#[command(
    name = "bb-restrictions",
    version,
    about = "Manage Bitbucket Cloud branch restrictions",
    long_about = "bb-restrictions lists, creates, edits and deletes the branch permission\n\
                  and merge-check rules of a Bitbucket Cloud repository.",
    propagate_version = true,
    after_help = "Use 'bb-restrictions <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Repository in WORKSPACE/REPO format
    #[arg(long, short = 'R', global = true, env = "BB_REPO")]
    pub repo: Option<String>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable interactive prompts
    #[arg(long, global = true, env = "BB_NO_PROMPT")]
    pub no_prompt: bool,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List branch restrictions
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View a branch restriction
    View(ViewArgs),

    /// Create a branch restriction
    Create(CreateArgs),

    /// Replace the settings of a branch restriction
    Edit(EditArgs),

    /// Delete a branch restriction
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),

    /// Print version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::cloud::RestrictionKind;

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "bb-restrictions",
            "--repo",
            "ws/repo",
            "create",
            "--kind",
            "require_approvals_to_merge",
            "--pattern",
            "main",
            "--value",
            "2",
            "--users",
            "alice,bob",
        ])
        .unwrap();

        assert_eq!(cli.global.repo.as_deref(), Some("ws/repo"));
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.kind, RestrictionKind::RequireApprovalsToMerge);
                assert_eq!(args.value, Some(2));
                assert_eq!(args.users, vec!["alice", "bob"]);
                assert!(args.groups.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_edit_keeps_unset_lists() {
        let cli = Cli::try_parse_from(["bb-restrictions", "edit", "7", "--value", "3"]).unwrap();
        match cli.command {
            Commands::Edit(args) => {
                assert_eq!(args.id, "7");
                assert!(args.users.is_none());
                assert!(args.kind.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_is_passed_through() {
        let cli = Cli::try_parse_from([
            "bb-restrictions",
            "create",
            "--kind",
            "require_signed_commits",
            "--pattern",
            "main",
        ])
        .unwrap();
        match cli.command {
            Commands::Create(args) => assert_eq!(
                args.kind,
                RestrictionKind::Other("require_signed_commits".to_string())
            ),
            other => panic!("unexpected command: {other:?}"),
        }

        let blank = Cli::try_parse_from([
            "bb-restrictions",
            "create",
            "--kind",
            "",
            "--pattern",
            "main",
        ]);
        assert!(blank.is_err());
    }
}
