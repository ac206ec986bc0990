//! GitHub REST integration: wire types, the [`GithubApi`] seam, and the
//! reqwest-backed client.

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use api::GithubApi;
pub use client::RestClient;
pub use error::{GithubError, GithubResult};
pub use types::{
    Account, Branch, BranchCommit, CheckRun, CheckRunList, CommitDetail, CommitEntry, ContentFile,
    GitRef, NewPullRequest, PrFile, PullFilter, PullRequest, Review, ReviewEvent,
};
