//! The seam between agents and GitHub.
//!
//! Agents depend on this trait rather than on the REST client, so tests
//! inject an in-memory fake and production wires in [`crate::github::RestClient`].

use async_trait::async_trait;

use crate::github::error::GithubResult;
use crate::github::types::{
    Branch, CheckRun, CommitEntry, ContentFile, NewPullRequest, PrFile, PullFilter, PullRequest,
    Review, ReviewEvent,
};

/// Operations gitcrew performs against a single GitHub repository.
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// Login of the authenticated user (the bot identity).
    async fn authenticated_login(&self) -> GithubResult<String>;

    // Pull requests -------------------------------------------------------

    async fn list_pulls(&self, filter: PullFilter) -> GithubResult<Vec<PullRequest>>;

    async fn get_pull(&self, number: u64) -> GithubResult<PullRequest>;

    async fn create_pull(&self, pull: &NewPullRequest) -> GithubResult<PullRequest>;

    /// Merge the PR with the given commit message.
    async fn merge_pull(&self, number: u64, commit_message: &str) -> GithubResult<()>;

    async fn comment_on_pull(&self, number: u64, body: &str) -> GithubResult<()>;

    async fn list_reviews(&self, number: u64) -> GithubResult<Vec<Review>>;

    async fn create_review(
        &self,
        number: u64,
        body: &str,
        event: ReviewEvent,
    ) -> GithubResult<()>;

    async fn list_commits(&self, number: u64) -> GithubResult<Vec<CommitEntry>>;

    async fn list_files(&self, number: u64) -> GithubResult<Vec<PrFile>>;

    // Checks --------------------------------------------------------------

    /// Check runs attached to a commit SHA.
    async fn list_check_runs(&self, sha: &str) -> GithubResult<Vec<CheckRun>>;

    // Branches and contents ------------------------------------------------

    async fn get_branch(&self, name: &str) -> GithubResult<Branch>;

    /// Create `refs/heads/<name>` pointing at `from_sha`.
    async fn create_branch(&self, name: &str, from_sha: &str) -> GithubResult<()>;

    /// Fetch a file, optionally pinned to a ref (branch or SHA).
    async fn get_content(&self, path: &str, git_ref: Option<&str>) -> GithubResult<ContentFile>;

    async fn create_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
        branch: &str,
    ) -> GithubResult<()>;

    /// Update an existing file; `sha` is the current blob SHA.
    async fn update_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
        branch: &str,
    ) -> GithubResult<()>;
}
