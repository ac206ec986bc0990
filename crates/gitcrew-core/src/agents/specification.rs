//! Agent that creates and maintains the feature specification document.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, instrument};

use crate::agents::{Agent, AgentRole};
use crate::domain::error::Result;
use crate::domain::spec::{PrStateView, SpecDocument, SPEC_PATH};
use crate::github::{GithubApi, GithubError, NewPullRequest, PullFilter};

const INITIAL_BRANCH: &str = "specs/initial-specifications";

const INITIAL_PR_BODY: &str = "\
# Initial Project Specifications

This PR introduces the initial project specifications including:
- User Authentication feature specification
- Test requirements
- Acceptance criteria

Please review the specifications and provide feedback.
";

const UPDATE_PR_BODY: &str = "\
# Specification Status Update

This PR updates the status of features based on implementation progress.
";

/// Maintains `specifications/current.yaml` in the target repository.
pub struct SpecificationAgent {
    api: Arc<dyn GithubApi>,
    base_branch: String,
}

impl SpecificationAgent {
    pub fn new(api: Arc<dyn GithubApi>, base_branch: impl Into<String>) -> Self {
        Self {
            api,
            base_branch: base_branch.into(),
        }
    }

    /// Fetch the current specification from the default branch, if any.
    async fn current_spec(&self) -> Result<Option<(SpecDocument, String)>> {
        match self.api.get_content(SPEC_PATH, None).await {
            Ok(file) => {
                let yaml = file.decoded()?;
                Ok(Some((SpecDocument::from_yaml(&yaml)?, file.sha)))
            }
            Err(GithubError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Seed the specification document via PR.
    ///
    /// The seed PR stays open until a human merges it, so later cycles see
    /// the bootstrap branch already in place and wait instead of recreating
    /// it.
    #[instrument(skip(self))]
    async fn bootstrap(&self) -> Result<()> {
        if self.api.get_branch(INITIAL_BRANCH).await.is_ok() {
            info!("initial specification branch already exists, awaiting merge");
            return Ok(());
        }

        let base = self.api.get_branch(&self.base_branch).await?;
        self.api
            .create_branch(INITIAL_BRANCH, &base.commit.sha)
            .await?;

        let doc = SpecDocument::seed();
        self.api
            .create_file(
                SPEC_PATH,
                "Initial project specifications",
                &doc.to_yaml()?,
                INITIAL_BRANCH,
            )
            .await?;

        let pr = self
            .api
            .create_pull(&NewPullRequest {
                title: "Initial Project Specifications".to_string(),
                body: INITIAL_PR_BODY.to_string(),
                head: INITIAL_BRANCH.to_string(),
                base: self.base_branch.clone(),
            })
            .await?;
        info!(number = pr.number, "opened initial specification PR");
        Ok(())
    }

    /// Reconcile feature statuses against PR state and push an update PR
    /// when anything changed.
    #[instrument(skip(self, doc))]
    async fn reconcile(&self, mut doc: SpecDocument, blob_sha: String) -> Result<()> {
        let prs = self.api.list_pulls(PullFilter::All).await?;
        let views: Vec<PrStateView> = prs
            .iter()
            .map(|pr| PrStateView {
                title: pr.title.clone(),
                open: pr.is_open(),
                merged: pr.is_merged(),
            })
            .collect();

        if !doc.reconcile(&views) {
            return Ok(());
        }

        let branch = format!("specs/update-{}", Utc::now().format("%Y%m%d-%H%M%S"));
        let base = self.api.get_branch(&self.base_branch).await?;
        self.api.create_branch(&branch, &base.commit.sha).await?;
        self.api
            .update_file(
                SPEC_PATH,
                "Update specifications status",
                &doc.to_yaml()?,
                &blob_sha,
                &branch,
            )
            .await?;

        let pr = self
            .api
            .create_pull(&NewPullRequest {
                title: "Update Specification Status".to_string(),
                body: UPDATE_PR_BODY.to_string(),
                head: branch,
                base: self.base_branch.clone(),
            })
            .await?;
        info!(number = pr.number, "opened specification update PR");
        Ok(())
    }
}

#[async_trait]
impl Agent for SpecificationAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Specification
    }

    async fn process(&self) -> Result<()> {
        match self.current_spec().await? {
            None => self.bootstrap().await,
            Some((doc, sha)) => self.reconcile(doc, sha).await,
        }
    }
}
