//! reqwest-backed implementation of [`GithubApi`] against the REST v3 API.

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::github::api::GithubApi;
use crate::github::error::{GithubError, GithubResult};
use crate::github::types::{
    Branch, CheckRun, CheckRunList, CommitEntry, ContentFile, NewPullRequest, PrFile, PullFilter,
    PullRequest, Review, ReviewEvent,
};

const API_VERSION: &str = "2022-11-28";

/// GitHub REST client scoped to a single repository.
pub struct RestClient {
    http: reqwest::Client,
    api_url: String,
    /// `owner/name` slug.
    repo: String,
}

impl RestClient {
    /// Build a client for `repo` (an `owner/name` slug) authenticated with
    /// `token`.
    pub fn new(api_url: &str, repo: &str, token: &str) -> GithubResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(API_VERSION),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| GithubError::Unauthorized)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("gitcrew/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            repo: repo.to_string(),
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}", self.api_url, self.repo, path)
    }

    /// Map non-success statuses onto the error taxonomy.
    async fn check(resp: Response, endpoint: &str) -> GithubResult<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let headers = resp.headers().clone();
        let message = resp.text().await.unwrap_or_default();
        Err(Self::classify_error(status, &headers, endpoint, message))
    }

    /// Classify a non-success response into [`GithubError`].
    ///
    /// 403/429 only counts as rate limiting when the rate-limit headers say
    /// so; a plain 403 (missing scope, branch protection) stays an HTTP
    /// error.
    fn classify_error(
        status: StatusCode,
        headers: &HeaderMap,
        endpoint: &str,
        message: String,
    ) -> GithubError {
        if status == StatusCode::UNAUTHORIZED {
            return GithubError::Unauthorized;
        }
        if status == StatusCode::NOT_FOUND {
            return GithubError::NotFound {
                resource: endpoint.to_string(),
            };
        }
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            let exhausted = headers
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .map(|v| v == "0")
                .unwrap_or(false);
            let retry_after = headers
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            if exhausted || retry_after.is_some() {
                return GithubError::RateLimited { retry_after };
            }
        }
        GithubError::Http {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
            message,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, endpoint: &str) -> GithubResult<T> {
        debug!(endpoint, "github GET");
        let resp = self.http.get(url).send().await?;
        let resp = Self::check(resp, endpoint).await?;
        resp.json::<T>().await.map_err(|e| GithubError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> GithubResult<T> {
        let resp = req.send().await?;
        let resp = Self::check(resp, endpoint).await?;
        resp.json::<T>().await.map_err(|e| GithubError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    async fn send_unit(&self, req: reqwest::RequestBuilder, endpoint: &str) -> GithubResult<()> {
        let resp = req.send().await?;
        Self::check(resp, endpoint).await?;
        Ok(())
    }
}

#[async_trait]
impl GithubApi for RestClient {
    async fn authenticated_login(&self) -> GithubResult<String> {
        #[derive(serde::Deserialize)]
        struct User {
            login: String,
        }
        let url = format!("{}/user", self.api_url);
        let user: User = self.get_json(&url, "user").await?;
        Ok(user.login)
    }

    async fn list_pulls(&self, filter: PullFilter) -> GithubResult<Vec<PullRequest>> {
        let url = format!(
            "{}?state={}&per_page=100",
            self.repo_url("pulls"),
            filter.as_query()
        );
        self.get_json(&url, "pulls").await
    }

    async fn get_pull(&self, number: u64) -> GithubResult<PullRequest> {
        let url = self.repo_url(&format!("pulls/{number}"));
        self.get_json(&url, &format!("pulls/{number}")).await
    }

    async fn create_pull(&self, pull: &NewPullRequest) -> GithubResult<PullRequest> {
        let url = self.repo_url("pulls");
        self.send_json(self.http.post(&url).json(pull), "pulls")
            .await
    }

    async fn merge_pull(&self, number: u64, commit_message: &str) -> GithubResult<()> {
        let url = self.repo_url(&format!("pulls/{number}/merge"));
        let body = serde_json::json!({ "commit_message": commit_message });
        self.send_unit(
            self.http.put(&url).json(&body),
            &format!("pulls/{number}/merge"),
        )
        .await
    }

    async fn comment_on_pull(&self, number: u64, body: &str) -> GithubResult<()> {
        // PR conversation comments go through the issues endpoint.
        let url = self.repo_url(&format!("issues/{number}/comments"));
        let payload = serde_json::json!({ "body": body });
        self.send_unit(
            self.http.post(&url).json(&payload),
            &format!("issues/{number}/comments"),
        )
        .await
    }

    async fn list_reviews(&self, number: u64) -> GithubResult<Vec<Review>> {
        let url = self.repo_url(&format!("pulls/{number}/reviews"));
        self.get_json(&url, &format!("pulls/{number}/reviews")).await
    }

    async fn create_review(
        &self,
        number: u64,
        body: &str,
        event: ReviewEvent,
    ) -> GithubResult<()> {
        let url = self.repo_url(&format!("pulls/{number}/reviews"));
        let payload = serde_json::json!({ "body": body, "event": event.as_str() });
        self.send_unit(
            self.http.post(&url).json(&payload),
            &format!("pulls/{number}/reviews"),
        )
        .await
    }

    async fn list_commits(&self, number: u64) -> GithubResult<Vec<CommitEntry>> {
        let url = self.repo_url(&format!("pulls/{number}/commits"));
        self.get_json(&url, &format!("pulls/{number}/commits")).await
    }

    async fn list_files(&self, number: u64) -> GithubResult<Vec<PrFile>> {
        let url = self.repo_url(&format!("pulls/{number}/files"));
        self.get_json(&url, &format!("pulls/{number}/files")).await
    }

    async fn list_check_runs(&self, sha: &str) -> GithubResult<Vec<CheckRun>> {
        let url = self.repo_url(&format!("commits/{sha}/check-runs"));
        let list: CheckRunList = self
            .get_json(&url, &format!("commits/{sha}/check-runs"))
            .await?;
        Ok(list.check_runs)
    }

    async fn get_branch(&self, name: &str) -> GithubResult<Branch> {
        let url = self.repo_url(&format!("branches/{name}"));
        self.get_json(&url, &format!("branches/{name}")).await
    }

    async fn create_branch(&self, name: &str, from_sha: &str) -> GithubResult<()> {
        let url = self.repo_url("git/refs");
        let payload = serde_json::json!({
            "ref": format!("refs/heads/{name}"),
            "sha": from_sha,
        });
        self.send_unit(self.http.post(&url).json(&payload), "git/refs")
            .await
    }

    async fn get_content(&self, path: &str, git_ref: Option<&str>) -> GithubResult<ContentFile> {
        let mut url = self.repo_url(&format!("contents/{path}"));
        if let Some(r) = git_ref {
            url.push_str(&format!("?ref={r}"));
        }
        self.get_json(&url, &format!("contents/{path}")).await
    }

    async fn create_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
        branch: &str,
    ) -> GithubResult<()> {
        let url = self.repo_url(&format!("contents/{path}"));
        let payload = serde_json::json!({
            "message": message,
            "content": base64::engine::general_purpose::STANDARD.encode(content),
            "branch": branch,
        });
        self.send_unit(
            self.http.put(&url).json(&payload),
            &format!("contents/{path}"),
        )
        .await
    }

    async fn update_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
        branch: &str,
    ) -> GithubResult<()> {
        let url = self.repo_url(&format!("contents/{path}"));
        let payload = serde_json::json!({
            "message": message,
            "content": base64::engine::general_purpose::STANDARD.encode(content),
            "sha": sha,
            "branch": branch,
        });
        self.send_unit(
            self.http.put(&url).json(&payload),
            &format!("contents/{path}"),
        )
        .await
    }
}
