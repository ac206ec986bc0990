//! Environment-driven configuration.
//!
//! Credentials come from the process environment, optionally seeded from a
//! `.env` file. The process never starts half-configured: missing required
//! variables fail [`GitcrewConfig::from_env`] with a typed error.

use std::path::Path;
use std::time::Duration;

use crate::domain::error::{GitcrewError, Result};

const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_BASE_BRANCH: &str = "main";
const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Template written to `.env.example` on first run.
pub const ENV_EXAMPLE: &str = "\
# GitHub Configuration
GITHUB_TOKEN=your_github_token_here
GITHUB_REPO=owner/repository_name
";

/// Runtime configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct GitcrewConfig {
    /// Bearer token for the GitHub REST API.
    pub token: String,
    /// Target repository as an `owner/name` slug.
    pub repo: String,
    /// Branch PRs are opened against.
    pub base_branch: String,
    /// Delay between orchestrator cycles.
    pub interval: Duration,
    /// REST API base URL; overridable for GitHub Enterprise and tests.
    pub api_url: String,
}

impl GitcrewConfig {
    /// Load configuration from the process environment, reading `.env`
    /// first when present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an injected lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup("GITHUB_TOKEN")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| GitcrewError::Config("GITHUB_TOKEN is not set".to_string()))?;
        let repo = lookup("GITHUB_REPO")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| GitcrewError::Config("GITHUB_REPO is not set".to_string()))?;
        validate_slug(&repo)?;

        let base_branch =
            lookup("GITCREW_BASE_BRANCH").unwrap_or_else(|| DEFAULT_BASE_BRANCH.to_string());
        let interval_secs = match lookup("GITCREW_INTERVAL_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                GitcrewError::Config(format!("GITCREW_INTERVAL_SECS is not an integer: {raw}"))
            })?,
            None => DEFAULT_INTERVAL_SECS,
        };
        let api_url = lookup("GITCREW_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            token,
            repo,
            base_branch,
            interval: Duration::from_secs(interval_secs),
            api_url,
        })
    }

    /// Write `.env.example` into `dir` unless `.env` or `.env.example`
    /// already exists there. Returns `true` when the file was written.
    pub fn write_env_example(dir: &Path) -> Result<bool> {
        if dir.join(".env").exists() || dir.join(".env.example").exists() {
            return Ok(false);
        }
        std::fs::write(dir.join(".env.example"), ENV_EXAMPLE)?;
        Ok(true)
    }
}

fn validate_slug(repo: &str) -> Result<()> {
    let mut parts = repo.splitn(2, '/');
    let owner = parts.next().unwrap_or_default();
    let name = parts.next().unwrap_or_default();
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return Err(GitcrewError::Config(format!(
            "GITHUB_REPO must be an owner/name slug, got: {repo}"
        )));
    }
    Ok(())
}
