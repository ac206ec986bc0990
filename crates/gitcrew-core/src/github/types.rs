//! Wire types for the subset of the GitHub REST v3 API gitcrew uses.

use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::github::error::{GithubError, GithubResult};

/// A GitHub account reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub login: String,
}

/// Head or base ref of a pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub branch: String,
    pub sha: String,
}

/// A pull request as returned by the list and get endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    /// `"open"` or `"closed"`.
    pub state: String,
    /// Set when the PR has been merged. The list endpoint does not include
    /// the `merged` boolean, so merge state is derived from this field.
    pub merged_at: Option<DateTime<Utc>>,
    pub html_url: String,
    pub user: Account,
    pub head: GitRef,
    pub base: GitRef,
    pub created_at: DateTime<Utc>,
}

impl PullRequest {
    pub fn is_open(&self) -> bool {
        self.state == "open"
    }

    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }
}

/// State filter for listing pull requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullFilter {
    Open,
    Closed,
    All,
}

impl PullFilter {
    pub fn as_query(self) -> &'static str {
        match self {
            PullFilter::Open => "open",
            PullFilter::Closed => "closed",
            PullFilter::All => "all",
        }
    }
}

/// Payload for creating a pull request.
#[derive(Debug, Clone, Serialize)]
pub struct NewPullRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

/// A submitted pull-request review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub user: Account,
    /// `"APPROVED"`, `"CHANGES_REQUESTED"`, `"COMMENTED"`, ...
    pub state: String,
    pub body: Option<String>,
}

/// Review event submitted with a new review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewEvent {
    Approve,
    RequestChanges,
    Comment,
}

impl ReviewEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewEvent::Approve => "APPROVE",
            ReviewEvent::RequestChanges => "REQUEST_CHANGES",
            ReviewEvent::Comment => "COMMENT",
        }
    }
}

/// One commit in a pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitEntry {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitDetail {
    pub message: String,
}

/// One changed file in a pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrFile {
    pub filename: String,
    /// `"added"`, `"modified"`, `"removed"`, ...
    pub status: String,
    /// Unified diff hunk; absent for binary or very large files.
    pub patch: Option<String>,
}

impl PrFile {
    /// Lines added by this file's patch, without the leading `+`.
    pub fn added_lines(&self) -> Vec<&str> {
        self.patch
            .as_deref()
            .unwrap_or("")
            .lines()
            .filter(|l| l.starts_with('+') && !l.starts_with("+++"))
            .map(|l| &l[1..])
            .collect()
    }
}

/// A check run attached to a commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRun {
    pub name: String,
    /// `"queued"`, `"in_progress"`, `"completed"`.
    pub status: String,
    /// `"success"`, `"failure"`, and so on; absent until completed.
    pub conclusion: Option<String>,
}

impl CheckRun {
    pub fn succeeded(&self) -> bool {
        self.conclusion.as_deref() == Some("success")
    }
}

/// Envelope for the check-runs list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRunList {
    pub total_count: u64,
    pub check_runs: Vec<CheckRun>,
}

/// A repository branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub commit: BranchCommit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchCommit {
    pub sha: String,
}

/// A file fetched from the contents endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentFile {
    pub path: String,
    /// Blob SHA, required when updating the file.
    pub sha: String,
    /// Base64 content with embedded newlines, per the API.
    pub content: Option<String>,
    pub encoding: Option<String>,
}

impl ContentFile {
    /// Decode the base64 payload into UTF-8 text.
    pub fn decoded(&self) -> GithubResult<String> {
        let raw = self.content.as_deref().unwrap_or("");
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|e| GithubError::Decode {
                endpoint: format!("contents/{}", self.path),
                message: e.to_string(),
            })?;
        String::from_utf8(bytes).map_err(|e| GithubError::Decode {
            endpoint: format!("contents/{}", self.path),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_file_decodes_wrapped_base64() {
        let file = ContentFile {
            path: "specifications/current.yaml".to_string(),
            sha: "abc".to_string(),
            // "version: 1.0.0\n" split across lines as the API does
            content: Some("dmVyc2lvbjogMS4w\nLjAK\n".to_string()),
            encoding: Some("base64".to_string()),
        };
        assert_eq!(file.decoded().unwrap(), "version: 1.0.0\n");
    }

    #[test]
    fn test_content_file_rejects_invalid_base64() {
        let file = ContentFile {
            path: "x".to_string(),
            sha: "abc".to_string(),
            content: Some("!!!not-base64!!!".to_string()),
            encoding: Some("base64".to_string()),
        };
        assert!(matches!(
            file.decoded(),
            Err(GithubError::Decode { .. })
        ));
    }

    #[test]
    fn test_added_lines_skips_file_header() {
        let file = PrFile {
            filename: "src/lib.rs".to_string(),
            status: "modified".to_string(),
            patch: Some("+++ b/src/lib.rs\n+pub fn answer() {}\n-old\n context".to_string()),
        };
        assert_eq!(file.added_lines(), vec!["pub fn answer() {}"]);
    }

    #[test]
    fn test_check_run_succeeded_requires_conclusion() {
        let running = CheckRun {
            name: "test".to_string(),
            status: "in_progress".to_string(),
            conclusion: None,
        };
        assert!(!running.succeeded());
    }

    #[test]
    fn test_pull_request_merge_state_from_merged_at() {
        let json = serde_json::json!({
            "number": 3,
            "title": "feat: user-auth - Implement User Authentication",
            "body": null,
            "state": "closed",
            "merged_at": "2024-05-01T12:00:00Z",
            "html_url": "https://github.com/o/r/pull/3",
            "user": { "login": "gitcrew-bot" },
            "head": { "ref": "feat/user-auth", "sha": "aaa" },
            "base": { "ref": "main", "sha": "bbb" },
            "created_at": "2024-04-30T09:00:00Z"
        });
        let pr: PullRequest = serde_json::from_value(json).unwrap();
        assert!(pr.is_merged());
        assert!(!pr.is_open());
    }
}
