//! Agent that makes the final merge decision on approved pull requests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::agents::{Agent, AgentRole};
use crate::domain::error::Result;
use crate::domain::merge::MergeReport;
use crate::github::{GithubApi, PullFilter, PullRequest, Review};
use crate::obs;

const APPROVED: &str = "APPROVED";
const CHANGES_REQUESTED: &str = "CHANGES_REQUESTED";

/// Merges PRs that pass the merge gate; comments on the rest.
pub struct MergeAgent {
    api: Arc<dyn GithubApi>,
}

impl MergeAgent {
    pub fn new(api: Arc<dyn GithubApi>) -> Self {
        Self { api }
    }

    /// Build the merge gate report for one PR.
    async fn evaluate(&self, pr: &PullRequest, reviews: &[Review]) -> Result<MergeReport> {
        let mut reasons = Vec::new();

        let checks = self.api.list_check_runs(&pr.head.sha).await?;
        // Vacuously true with no CI configured; the dedicated test-run
        // criterion below still blocks in that case.
        let checks_passed = checks.iter().all(|c| c.succeeded());
        if !checks_passed {
            reasons.push("CI checks must pass".to_string());
        }

        let tests_passed = checks
            .iter()
            .any(|c| c.name.to_lowercase().starts_with("test") && c.succeeded());
        if !tests_passed {
            reasons.push("All tests must pass".to_string());
        }

        let reviews_approved = reviews.iter().any(|r| r.state == APPROVED)
            && !reviews.iter().any(|r| r.state == CHANGES_REQUESTED);
        if !reviews_approved {
            reasons.push("Required reviews must be approved".to_string());
        }

        let base = self.api.get_branch(&pr.base.branch).await?;
        let branch_up_to_date = pr.base.sha == base.commit.sha;
        if !branch_up_to_date {
            reasons.push("Branch must be up to date with base".to_string());
        }

        Ok(MergeReport {
            checks_passed,
            tests_passed,
            reviews_approved,
            branch_up_to_date,
            blocking_reasons: reasons,
        })
    }

    #[instrument(skip(self, pr), fields(number = pr.number))]
    async fn process_pull(&self, pr: &PullRequest) -> Result<()> {
        let reviews = self.api.list_reviews(pr.number).await?;
        if !is_approved(&reviews) {
            return Ok(());
        }

        let report = self.evaluate(pr, &reviews).await?;
        if report.can_merge() {
            let review_states: Vec<(String, String)> = reviews
                .iter()
                .map(|r| (r.user.login.clone(), r.state.clone()))
                .collect();
            let message = report.render_commit_message(
                pr.number,
                &pr.head.branch,
                &pr.title,
                pr.body.as_deref(),
                &review_states,
            );
            self.api.merge_pull(pr.number, &message).await?;
            obs::emit_pr_merged(pr.number);
        } else {
            self.api
                .comment_on_pull(pr.number, &report.render_blocking_comment())
                .await?;
            obs::emit_pr_blocked(pr.number, report.blocking_reasons.len());
        }
        Ok(())
    }
}

/// At least one approval and no change request, considering only each
/// reviewer's latest review.
fn is_approved(reviews: &[Review]) -> bool {
    let mut latest: HashMap<&str, &str> = HashMap::new();
    for review in reviews {
        latest.insert(&review.user.login, &review.state);
    }
    let approvals = latest.values().filter(|s| **s == APPROVED).count();
    approvals >= 1 && !latest.values().any(|s| *s == CHANGES_REQUESTED)
}

#[async_trait]
impl Agent for MergeAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Merge
    }

    async fn process(&self) -> Result<()> {
        let open = self.api.list_pulls(PullFilter::Open).await?;
        for pr in &open {
            self.process_pull(pr).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::Account;

    fn review(login: &str, state: &str) -> Review {
        Review {
            user: Account {
                login: login.to_string(),
            },
            state: state.to_string(),
            body: None,
        }
    }

    #[test]
    fn test_single_approval_is_approved() {
        assert!(is_approved(&[review("alice", APPROVED)]));
    }

    #[test]
    fn test_change_request_blocks_approval() {
        let reviews = vec![review("alice", APPROVED), review("bob", CHANGES_REQUESTED)];
        assert!(!is_approved(&reviews));
    }

    #[test]
    fn test_latest_review_per_reviewer_wins() {
        // Bob first requested changes, then approved.
        let reviews = vec![review("bob", CHANGES_REQUESTED), review("bob", APPROVED)];
        assert!(is_approved(&reviews));
    }

    #[test]
    fn test_comments_alone_are_not_approval() {
        assert!(!is_approved(&[review("alice", "COMMENTED")]));
    }

    #[test]
    fn test_no_reviews_is_not_approved() {
        assert!(!is_approved(&[]));
    }
}
