//! In-memory [`GithubApi`] fake shared by the integration tests.
//!
//! State is a single mutex-guarded struct; helpers seed branches, files,
//! PRs, reviews, and check runs, and assertions read the recorded effects
//! (created PRs, submitted reviews, merges, comments).

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine as _;
use chrono::Utc;

use gitcrew_core::github::{
    Account, Branch, BranchCommit, CheckRun, CommitDetail, CommitEntry, ContentFile, GitRef,
    GithubApi, GithubError, GithubResult, NewPullRequest, PrFile, PullFilter, PullRequest, Review,
    ReviewEvent,
};

pub const BOT_LOGIN: &str = "gitcrew-bot";
pub const BASE_BRANCH: &str = "main";

#[derive(Default)]
struct State {
    /// branch or SHA -> file path -> content
    files: HashMap<String, HashMap<String, String>>,
    /// branch name -> head SHA
    branches: HashMap<String, String>,
    prs: Vec<PullRequest>,
    next_pr_number: u64,
    reviews: HashMap<u64, Vec<Review>>,
    commits: HashMap<u64, Vec<CommitEntry>>,
    pr_files: HashMap<u64, Vec<PrFile>>,
    check_runs: HashMap<String, Vec<CheckRun>>,
    merged: Vec<(u64, String)>,
    comments: HashMap<u64, Vec<String>>,
}

pub struct FakeGithub {
    state: Mutex<State>,
}

impl FakeGithub {
    /// A fake repository with an empty `main` branch.
    pub fn new() -> Self {
        let mut state = State {
            next_pr_number: 1,
            ..State::default()
        };
        state.branches.insert(BASE_BRANCH.to_string(), "sha-main".to_string());
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn seed_file(&self, git_ref: &str, path: &str, content: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .files
            .entry(git_ref.to_string())
            .or_default()
            .insert(path.to_string(), content.to_string());
    }

    /// Add a PR with explicit state; returns its number.
    pub fn add_pr(&self, title: &str, head: &str, head_sha: &str, open: bool, merged: bool) -> u64 {
        let mut state = self.state.lock().unwrap();
        let number = state.next_pr_number;
        state.next_pr_number += 1;
        let base_sha = state.branches.get(BASE_BRANCH).cloned().unwrap_or_default();
        state.prs.push(PullRequest {
            number,
            title: title.to_string(),
            body: Some(format!("body of {title}")),
            state: if open { "open" } else { "closed" }.to_string(),
            merged_at: merged.then(Utc::now),
            html_url: format!("https://github.com/owner/repo/pull/{number}"),
            user: Account {
                login: BOT_LOGIN.to_string(),
            },
            head: GitRef {
                branch: head.to_string(),
                sha: head_sha.to_string(),
            },
            base: GitRef {
                branch: BASE_BRANCH.to_string(),
                sha: base_sha,
            },
            created_at: Utc::now(),
        });
        number
    }

    pub fn set_commits(&self, number: u64, messages: &[&str]) {
        let mut state = self.state.lock().unwrap();
        let commits = messages
            .iter()
            .enumerate()
            .map(|(i, m)| CommitEntry {
                sha: format!("commit-{number}-{i}abcdef"),
                commit: CommitDetail {
                    message: m.to_string(),
                },
            })
            .collect();
        state.commits.insert(number, commits);
    }

    pub fn set_pr_files(&self, number: u64, files: Vec<PrFile>) {
        self.state.lock().unwrap().pr_files.insert(number, files);
    }

    pub fn add_review(&self, number: u64, login: &str, review_state: &str) {
        let mut state = self.state.lock().unwrap();
        state.reviews.entry(number).or_default().push(Review {
            user: Account {
                login: login.to_string(),
            },
            state: review_state.to_string(),
            body: None,
        });
    }

    pub fn set_check_runs(&self, sha: &str, runs: Vec<CheckRun>) {
        self.state.lock().unwrap().check_runs.insert(sha.to_string(), runs);
    }

    pub fn stale_base(&self, number: u64) {
        let mut state = self.state.lock().unwrap();
        if let Some(pr) = state.prs.iter_mut().find(|p| p.number == number) {
            pr.base.sha = "sha-stale".to_string();
        }
    }

    // Assertion helpers ----------------------------------------------------

    pub fn prs(&self) -> Vec<PullRequest> {
        self.state.lock().unwrap().prs.clone()
    }

    pub fn pr_titled(&self, title: &str) -> Option<PullRequest> {
        self.prs().into_iter().find(|p| p.title == title)
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.state.lock().unwrap().branches.contains_key(name)
    }

    pub fn branch_names(&self) -> Vec<String> {
        self.state.lock().unwrap().branches.keys().cloned().collect()
    }

    pub fn file_content(&self, git_ref: &str, path: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .files
            .get(git_ref)
            .and_then(|files| files.get(path).cloned())
    }

    pub fn reviews_for(&self, number: u64) -> Vec<Review> {
        self.state
            .lock()
            .unwrap()
            .reviews
            .get(&number)
            .cloned()
            .unwrap_or_default()
    }

    pub fn merges(&self) -> Vec<(u64, String)> {
        self.state.lock().unwrap().merged.clone()
    }

    pub fn comments_for(&self, number: u64) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .comments
            .get(&number)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl GithubApi for FakeGithub {
    async fn authenticated_login(&self) -> GithubResult<String> {
        Ok(BOT_LOGIN.to_string())
    }

    async fn list_pulls(&self, filter: PullFilter) -> GithubResult<Vec<PullRequest>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .prs
            .iter()
            .filter(|pr| match filter {
                PullFilter::Open => pr.is_open(),
                PullFilter::Closed => !pr.is_open(),
                PullFilter::All => true,
            })
            .cloned()
            .collect())
    }

    async fn get_pull(&self, number: u64) -> GithubResult<PullRequest> {
        let state = self.state.lock().unwrap();
        state
            .prs
            .iter()
            .find(|pr| pr.number == number)
            .cloned()
            .ok_or(GithubError::NotFound {
                resource: format!("pulls/{number}"),
            })
    }

    async fn create_pull(&self, pull: &NewPullRequest) -> GithubResult<PullRequest> {
        let mut state = self.state.lock().unwrap();
        let number = state.next_pr_number;
        state.next_pr_number += 1;
        let head_sha = state.branches.get(&pull.head).cloned().unwrap_or_default();
        let base_sha = state.branches.get(&pull.base).cloned().unwrap_or_default();
        let pr = PullRequest {
            number,
            title: pull.title.clone(),
            body: Some(pull.body.clone()),
            state: "open".to_string(),
            merged_at: None,
            html_url: format!("https://github.com/owner/repo/pull/{number}"),
            user: Account {
                login: BOT_LOGIN.to_string(),
            },
            head: GitRef {
                branch: pull.head.clone(),
                sha: head_sha,
            },
            base: GitRef {
                branch: pull.base.clone(),
                sha: base_sha,
            },
            created_at: Utc::now(),
        };
        state.prs.push(pr.clone());
        Ok(pr)
    }

    async fn merge_pull(&self, number: u64, commit_message: &str) -> GithubResult<()> {
        let mut state = self.state.lock().unwrap();
        let Some(pr) = state.prs.iter_mut().find(|pr| pr.number == number) else {
            return Err(GithubError::NotFound {
                resource: format!("pulls/{number}/merge"),
            });
        };
        pr.state = "closed".to_string();
        pr.merged_at = Some(Utc::now());
        let head_branch = pr.head.branch.clone();
        let base_branch = pr.base.branch.clone();
        state.merged.push((number, commit_message.to_string()));
        // Land the head branch's files on the base branch and advance its
        // head, like a real merge commit would.
        if let Some(head_files) = state.files.get(&head_branch).cloned() {
            state
                .files
                .entry(base_branch.clone())
                .or_default()
                .extend(head_files);
        }
        state
            .branches
            .insert(base_branch, format!("sha-merged-{number}"));
        Ok(())
    }

    async fn comment_on_pull(&self, number: u64, body: &str) -> GithubResult<()> {
        let mut state = self.state.lock().unwrap();
        state
            .comments
            .entry(number)
            .or_default()
            .push(body.to_string());
        Ok(())
    }

    async fn list_reviews(&self, number: u64) -> GithubResult<Vec<Review>> {
        let state = self.state.lock().unwrap();
        Ok(state.reviews.get(&number).cloned().unwrap_or_default())
    }

    async fn create_review(
        &self,
        number: u64,
        body: &str,
        event: ReviewEvent,
    ) -> GithubResult<()> {
        let review_state = match event {
            ReviewEvent::Approve => "APPROVED",
            ReviewEvent::RequestChanges => "CHANGES_REQUESTED",
            ReviewEvent::Comment => "COMMENTED",
        };
        let mut state = self.state.lock().unwrap();
        state.reviews.entry(number).or_default().push(Review {
            user: Account {
                login: BOT_LOGIN.to_string(),
            },
            state: review_state.to_string(),
            body: Some(body.to_string()),
        });
        Ok(())
    }

    async fn list_commits(&self, number: u64) -> GithubResult<Vec<CommitEntry>> {
        let state = self.state.lock().unwrap();
        Ok(state.commits.get(&number).cloned().unwrap_or_default())
    }

    async fn list_files(&self, number: u64) -> GithubResult<Vec<PrFile>> {
        let state = self.state.lock().unwrap();
        Ok(state.pr_files.get(&number).cloned().unwrap_or_default())
    }

    async fn list_check_runs(&self, sha: &str) -> GithubResult<Vec<CheckRun>> {
        let state = self.state.lock().unwrap();
        Ok(state.check_runs.get(sha).cloned().unwrap_or_default())
    }

    async fn get_branch(&self, name: &str) -> GithubResult<Branch> {
        let state = self.state.lock().unwrap();
        state
            .branches
            .get(name)
            .map(|sha| Branch {
                name: name.to_string(),
                commit: BranchCommit { sha: sha.clone() },
            })
            .ok_or(GithubError::NotFound {
                resource: format!("branches/{name}"),
            })
    }

    async fn create_branch(&self, name: &str, from_sha: &str) -> GithubResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.branches.contains_key(name) {
            return Err(GithubError::Http {
                status: 422,
                endpoint: "git/refs".to_string(),
                message: "Reference already exists".to_string(),
            });
        }
        state.branches.insert(name.to_string(), from_sha.to_string());
        // The new branch starts with the base branch's files.
        let base_files = state
            .files
            .iter()
            .find(|(r, _)| state.branches.get(*r).map(String::as_str) == Some(from_sha) || *r == from_sha)
            .map(|(_, files)| files.clone());
        if let Some(files) = base_files {
            state.files.insert(name.to_string(), files);
        }
        Ok(())
    }

    async fn get_content(&self, path: &str, git_ref: Option<&str>) -> GithubResult<ContentFile> {
        let state = self.state.lock().unwrap();
        let git_ref = git_ref.unwrap_or(BASE_BRANCH);
        let content = state
            .files
            .get(git_ref)
            .and_then(|files| files.get(path))
            .ok_or(GithubError::NotFound {
                resource: format!("contents/{path}"),
            })?;
        Ok(ContentFile {
            path: path.to_string(),
            sha: format!("blob-{path}"),
            content: Some(base64::engine::general_purpose::STANDARD.encode(content)),
            encoding: Some("base64".to_string()),
        })
    }

    async fn create_file(
        &self,
        path: &str,
        _message: &str,
        content: &str,
        branch: &str,
    ) -> GithubResult<()> {
        self.seed_file(branch, path, content);
        Ok(())
    }

    async fn update_file(
        &self,
        path: &str,
        _message: &str,
        content: &str,
        _sha: &str,
        branch: &str,
    ) -> GithubResult<()> {
        self.seed_file(branch, path, content);
        Ok(())
    }
}
