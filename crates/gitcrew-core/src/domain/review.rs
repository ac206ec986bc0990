//! Review findings and verdict derivation.
//!
//! The review agent accumulates [`ReviewFinding`]s from its checks and the
//! verdict is derived from the worst severity present: any blocking finding
//! forces a change request, warnings alone produce a comment, and an empty
//! finding list approves.

use serde::{Deserialize, Serialize};

/// Severity of a single review finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingSeverity {
    /// Must be fixed before the PR can be approved.
    Blocking,
    /// Should be addressed but does not block approval.
    Warning,
    /// Optional improvement.
    Suggestion,
}

impl FindingSeverity {
    /// The marker rendered in front of the finding in the review body.
    pub fn marker(self) -> &'static str {
        match self {
            FindingSeverity::Blocking => "❌",
            FindingSeverity::Warning => "⚠️",
            FindingSeverity::Suggestion => "💡",
        }
    }
}

/// A single finding produced by a review check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewFinding {
    pub severity: FindingSeverity,
    pub message: String,
}

impl ReviewFinding {
    pub fn blocking(message: impl Into<String>) -> Self {
        Self {
            severity: FindingSeverity::Blocking,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: FindingSeverity::Warning,
            message: message.into(),
        }
    }

    pub fn suggestion(message: impl Into<String>) -> Self {
        Self {
            severity: FindingSeverity::Suggestion,
            message: message.into(),
        }
    }
}

/// The review event submitted to GitHub for a set of findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewVerdict {
    Approve,
    Comment,
    RequestChanges,
}

/// Message used for a clean approval.
pub const APPROVAL_BODY: &str = "Code looks good! All checks passed.";

/// Derive the verdict for a set of findings.
pub fn verdict_for(findings: &[ReviewFinding]) -> ReviewVerdict {
    if findings.is_empty() {
        ReviewVerdict::Approve
    } else if findings
        .iter()
        .any(|f| f.severity == FindingSeverity::Blocking)
    {
        ReviewVerdict::RequestChanges
    } else {
        ReviewVerdict::Comment
    }
}

/// Render the review body for a non-empty set of findings.
pub fn render_review_body(findings: &[ReviewFinding]) -> String {
    let mut lines = vec!["## Code Review Feedback".to_string(), String::new()];
    for finding in findings {
        lines.push(format!("{} {}", finding.severity.marker(), finding.message));
    }
    lines.join("\n")
}
