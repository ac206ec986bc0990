//! Merge gate report and its rendered artifacts.
//!
//! The merge agent evaluates an approved pull request against four criteria
//! and records the outcome in a [`MergeReport`]. A passing report is rendered
//! into the merge commit message; a failing one into the blocking comment
//! posted back on the PR.

use serde::{Deserialize, Serialize};

/// Outcome of evaluating a pull request against the merge criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Every check run on the head commit concluded successfully.
    pub checks_passed: bool,
    /// A check run named `test*` concluded successfully.
    pub tests_passed: bool,
    /// At least one approval and no outstanding change requests.
    pub reviews_approved: bool,
    /// The PR base SHA matches the current head of the base branch.
    pub branch_up_to_date: bool,
    /// Human-readable reasons collected for each failed criterion.
    pub blocking_reasons: Vec<String>,
}

impl MergeReport {
    /// `true` only when every criterion passed.
    pub fn can_merge(&self) -> bool {
        self.blocking_reasons.is_empty()
            && self.checks_passed
            && self.tests_passed
            && self.reviews_approved
            && self.branch_up_to_date
    }

    fn status_marker(passed: bool) -> &'static str {
        if passed {
            "✅"
        } else {
            "❌"
        }
    }

    /// Render the comment explaining why the PR cannot be merged.
    pub fn render_blocking_comment(&self) -> String {
        let mut lines = vec![
            "# 🚫 Cannot Merge Pull Request".to_string(),
            String::new(),
            "The following criteria must be met before merging:".to_string(),
            String::new(),
        ];
        for reason in &self.blocking_reasons {
            lines.push(format!("- ❌ {reason}"));
        }
        lines.push(String::new());
        lines.push("Please address these issues and request a new review.".to_string());
        lines.join("\n")
    }

    /// Render the merge commit message for a passing report.
    ///
    /// `reviews` is the (reviewer login, review state) list in submission
    /// order.
    pub fn render_commit_message(
        &self,
        pr_number: u64,
        head_ref: &str,
        title: &str,
        body: Option<&str>,
        reviews: &[(String, String)],
    ) -> String {
        let mut lines = vec![
            format!("Merge pull request #{pr_number} from {head_ref}"),
            String::new(),
            title.to_string(),
            String::new(),
            "# Merge Criteria".to_string(),
            format!("- CI Checks: {}", Self::status_marker(self.checks_passed)),
            format!("- Tests: {}", Self::status_marker(self.tests_passed)),
            format!("- Reviews: {}", Self::status_marker(self.reviews_approved)),
            format!(
                "- Branch Status: {}",
                Self::status_marker(self.branch_up_to_date)
            ),
            String::new(),
            "# Changes".to_string(),
            body.unwrap_or("No description provided.").to_string(),
            String::new(),
            "# Reviews".to_string(),
        ];
        for (login, state) in reviews {
            lines.push(format!("- {login}: {state}"));
        }
        lines.join("\n")
    }
}
