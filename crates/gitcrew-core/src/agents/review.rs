//! Agent that reviews open pull requests.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::agents::review_checks;
use crate::agents::{Agent, AgentRole};
use crate::domain::error::Result;
use crate::domain::review::{render_review_body, verdict_for, ReviewVerdict, APPROVAL_BODY};
use crate::github::{GithubApi, GithubError, PullFilter, PullRequest, ReviewEvent};
use crate::obs;

/// Reviews every open PR it has not yet reviewed.
pub struct ReviewAgent {
    api: Arc<dyn GithubApi>,
}

impl ReviewAgent {
    pub fn new(api: Arc<dyn GithubApi>) -> Self {
        Self { api }
    }

    async fn already_reviewed(&self, number: u64, login: &str) -> Result<bool> {
        let reviews = self.api.list_reviews(number).await?;
        Ok(reviews.iter().any(|r| r.user.login == login))
    }

    /// Fetch the head-pinned contents of each test file changed in the PR.
    async fn test_file_contents(&self, pr: &PullRequest) -> Result<Vec<(String, String)>> {
        let files = self.api.list_files(pr.number).await?;
        let mut contents = Vec::new();
        for file in files
            .iter()
            .filter(|f| f.filename.starts_with("tests/") && f.filename.ends_with(".rs"))
            .filter(|f| f.status != "removed")
        {
            match self.api.get_content(&file.filename, Some(&pr.head.sha)).await {
                Ok(content) => contents.push((file.filename.clone(), content.decoded()?)),
                // A listed file can disappear if the branch moved under us.
                Err(GithubError::NotFound { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(contents)
    }

    #[instrument(skip(self, pr), fields(number = pr.number))]
    async fn review(&self, pr: &PullRequest) -> Result<()> {
        let commits = self.api.list_commits(pr.number).await?;
        let files = self.api.list_files(pr.number).await?;
        let test_contents = self.test_file_contents(pr).await?;

        let mut findings = review_checks::check_commit_messages(&commits);
        findings.extend(review_checks::check_patch_hygiene(&files));
        findings.extend(review_checks::check_tests(&files, &test_contents));

        let verdict = verdict_for(&findings);
        let (body, event) = match verdict {
            ReviewVerdict::Approve => (APPROVAL_BODY.to_string(), ReviewEvent::Approve),
            ReviewVerdict::Comment => (render_review_body(&findings), ReviewEvent::Comment),
            ReviewVerdict::RequestChanges => {
                (render_review_body(&findings), ReviewEvent::RequestChanges)
            }
        };
        self.api.create_review(pr.number, &body, event).await?;

        let verdict_name = match verdict {
            ReviewVerdict::Approve => "approve",
            ReviewVerdict::Comment => "comment",
            ReviewVerdict::RequestChanges => "request_changes",
        };
        obs::emit_pr_reviewed(pr.number, verdict_name, findings.len());
        Ok(())
    }
}

#[async_trait]
impl Agent for ReviewAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Review
    }

    async fn process(&self) -> Result<()> {
        let login = self.api.authenticated_login().await?;
        let open = self.api.list_pulls(PullFilter::Open).await?;
        for pr in &open {
            if self.already_reviewed(pr.number, &login).await? {
                info!(number = pr.number, "already reviewed, skipping");
                continue;
            }
            self.review(pr).await?;
        }
        Ok(())
    }
}
