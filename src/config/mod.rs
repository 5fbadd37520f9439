//
//  bitbucket-branch-restrictions
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Settings are read from a TOML file in the platform configuration
//! directory and can be overridden from the environment.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/bb/restrictions.toml`
//! - **macOS**: `~/Library/Application Support/bb/restrictions.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\bb\restrictions.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [host]
//! api_url = "https://api.bitbucket.org/2.0"
//! user = "myusername"
//! default_repo = "myworkspace/myrepo"
//! ```
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `BB_API_URL` | `host.api_url` |
//! | `BB_USER` | `host.user` |

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

mod hosts;

pub use hosts::*;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "restrictions.toml";

/// Top-level configuration.
///
/// # Examples
///
/// ```rust
/// use bitbucket_branch_restrictions::config::{Config, BITBUCKET_API_URL};
///
/// let config = Config::default();
/// assert_eq!(config.host.api_url, BITBUCKET_API_URL);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Settings for the Bitbucket host being talked to.
    #[serde(default)]
    pub host: HostConfig,
}

/// Per-host settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostConfig {
    /// Base URL of the REST API, without a trailing slash.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Username used with app passwords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Repository used when `--repo` is not given, as `WORKSPACE/REPO`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_repo: Option<String>,
}

fn default_api_url() -> String {
    BITBUCKET_API_URL.to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user: None,
            default_repo: None,
        }
    }
}

impl Config {
    /// Returns the configuration directory (`.../bb`).
    pub fn config_dir() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "bb")
            .context("Could not determine configuration directory")?;
        Ok(dirs.config_dir().to_path_buf())
    }

    /// Returns the full path of the configuration file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Loads the configuration file and applies environment overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    /// Loads configuration from `path` without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.host.api_url = normalize_api_url(&config.host.api_url);
        Ok(config)
    }

    /// Writes the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Applies `BB_API_URL` and `BB_USER` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.is_empty()) {
            self.host.api_url = normalize_api_url(&url);
        }
        if let Some(user) = lookup(USER_ENV).filter(|v| !v.is_empty()) {
            self.host.user = Some(user);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let config = Config::from_toml_str(
            r#"
            [host]
            api_url = "https://bb.example.com/2.0/"
            user = "alice"
            default_repo = "ws/repo"
            "#,
        )
        .unwrap();

        assert_eq!(config.host.api_url, "https://bb.example.com/2.0");
        assert_eq!(config.host.user.as_deref(), Some("alice"));
        assert_eq!(config.host.default_repo.as_deref(), Some("ws/repo"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            API_URL_ENV => Some("http://localhost:8080/".to_string()),
            USER_ENV => Some("bob".to_string()),
            _ => None,
        });

        assert_eq!(config.host.api_url, "http://localhost:8080");
        assert_eq!(config.host.user.as_deref(), Some("bob"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = Config::default();
        config.host.default_repo = Some("ws/repo".to_string());
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
