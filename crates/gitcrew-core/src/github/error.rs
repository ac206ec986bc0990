//! GitHub client error taxonomy.
//!
//! Failures are typed and propagated to the caller; the orchestrator decides
//! what is fatal for a cycle. Rate-limit responses carry the reset delay so
//! callers can back off instead of hammering the API.

use std::time::Duration;

/// Errors produced by the GitHub REST client.
#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    /// Non-success HTTP status that is not a rate limit or a 404.
    #[error("github api returned {status} for {endpoint}: {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },

    /// The requested resource does not exist (HTTP 404).
    ///
    /// Distinct from [`GithubError::Http`] so callers can branch on
    /// "specification file absent" and similar lookups.
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// The primary or secondary rate limit was hit (HTTP 403/429 with an
    /// exhausted `x-ratelimit-remaining` or a `retry-after` header).
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// The token was rejected (HTTP 401).
    #[error("authentication failed: check GITHUB_TOKEN")]
    Unauthorized,

    /// Transport-level failure.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("decode error for {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl GithubError {
    /// `true` for transient conditions worth retrying in a later cycle.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GithubError::RateLimited { .. } | GithubError::Request(_)
        )
    }
}

/// Result type for GitHub client operations.
pub type GithubResult<T> = std::result::Result<T, GithubError>;
