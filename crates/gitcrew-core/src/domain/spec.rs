//! The feature specification document stored in the target repository.
//!
//! The document lives at [`SPEC_PATH`] on the default branch and is the
//! contract between the specification agent (which writes it) and the
//! developer agent (which implements `pending` features from it). The wire
//! format is YAML; status values use the kebab-case forms that downstream
//! tooling already expects (`pending`, `in-progress`, `completed`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::Result;

/// Repository path of the specification document.
pub const SPEC_PATH: &str = "specifications/current.yaml";

/// Lifecycle status of a single feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl std::fmt::Display for FeatureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FeatureStatus::Pending => "pending",
            FeatureStatus::InProgress => "in-progress",
            FeatureStatus::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// A single feature entry in the specification document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub title: String,
    pub priority: String,
    pub status: FeatureStatus,
    pub description: String,
    pub requirements: Vec<String>,
    pub acceptance_criteria: Vec<String>,
    pub test_requirements: Vec<String>,
}

/// The top-level specification document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecDocument {
    pub version: String,
    pub last_updated: DateTime<Utc>,
    pub features: Vec<Feature>,
}

/// The subset of pull-request state the reconciler needs.
///
/// Kept transport-free so status reconciliation is unit-testable without a
/// GitHub client.
#[derive(Debug, Clone)]
pub struct PrStateView {
    pub title: String,
    pub open: bool,
    pub merged: bool,
}

impl SpecDocument {
    /// The seed document committed when no specification exists yet.
    pub fn seed() -> Self {
        SpecDocument {
            version: "1.0.0".to_string(),
            last_updated: Utc::now(),
            features: vec![Feature {
                id: "user-auth".to_string(),
                title: "User Authentication".to_string(),
                priority: "high".to_string(),
                status: FeatureStatus::Pending,
                description: "Implement user authentication system".to_string(),
                requirements: vec![
                    "Email/password authentication".to_string(),
                    "Password reset functionality".to_string(),
                    "JWT token implementation".to_string(),
                    "User session management".to_string(),
                ],
                acceptance_criteria: vec![
                    "Users can register with email/password".to_string(),
                    "Users can login with credentials".to_string(),
                    "Users can reset passwords".to_string(),
                    "JWT tokens are properly handled".to_string(),
                ],
                test_requirements: vec![
                    "Unit tests for auth functions".to_string(),
                    "Integration tests for auth flow".to_string(),
                    "Security testing for password handling".to_string(),
                ],
            }],
        }
    }

    /// Parse a document from its YAML wire form.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serialize the document to its YAML wire form.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Returns the features currently in `pending` status.
    pub fn pending_features(&self) -> impl Iterator<Item = &Feature> {
        self.features
            .iter()
            .filter(|f| f.status == FeatureStatus::Pending)
    }

    /// Reconcile feature statuses against observed pull requests.
    ///
    /// A `pending` feature whose implementation PR (title prefix
    /// `feat: <id>`) has merged becomes `completed`; one with an open PR
    /// becomes `in-progress`. Returns `true` when any status changed;
    /// `last_updated` is only touched in that case.
    pub fn reconcile(&mut self, prs: &[PrStateView]) -> bool {
        let mut updated = false;
        for feature in &mut self.features {
            if feature.status != FeatureStatus::Pending {
                continue;
            }
            let prefix = format!("feat: {}", feature.id.to_lowercase());
            for pr in prs {
                if !pr.title.to_lowercase().starts_with(&prefix) {
                    continue;
                }
                if pr.merged {
                    feature.status = FeatureStatus::Completed;
                    updated = true;
                    break;
                } else if pr.open {
                    feature.status = FeatureStatus::InProgress;
                    updated = true;
                    break;
                }
            }
        }
        if updated {
            self.last_updated = Utc::now();
        }
        updated
    }
}
