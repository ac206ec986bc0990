//! Agent that opens implementation PRs for pending features.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::agents::scaffold;
use crate::agents::{Agent, AgentRole};
use crate::domain::error::Result;
use crate::domain::spec::{Feature, SpecDocument, SPEC_PATH};
use crate::github::{GithubApi, GithubError, NewPullRequest};

/// Implements `pending` features from the specification document.
pub struct DeveloperAgent {
    api: Arc<dyn GithubApi>,
    base_branch: String,
}

impl DeveloperAgent {
    pub fn new(api: Arc<dyn GithubApi>, base_branch: impl Into<String>) -> Self {
        Self {
            api,
            base_branch: base_branch.into(),
        }
    }

    async fn specification(&self) -> Result<Option<SpecDocument>> {
        match self.api.get_content(SPEC_PATH, None).await {
            Ok(file) => Ok(Some(SpecDocument::from_yaml(&file.decoded()?)?)),
            Err(GithubError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Open an implementation PR for one feature.
    ///
    /// A feature whose branch already exists is skipped: an earlier cycle is
    /// already working on it and the specification agent will pick up the PR
    /// state on its next pass.
    #[instrument(skip(self, feature), fields(feature = %feature.id))]
    async fn implement(&self, feature: &Feature) -> Result<()> {
        let Some(files) = scaffold::files_for(&feature.id) else {
            info!(feature = %feature.id, "no scaffold for feature, skipping");
            return Ok(());
        };

        let branch = format!("feat/{}", feature.id);
        if self.api.get_branch(&branch).await.is_ok() {
            info!(branch, "feature branch already exists, skipping");
            return Ok(());
        }

        let base = self.api.get_branch(&self.base_branch).await?;
        self.api.create_branch(&branch, &base.commit.sha).await?;

        for file in &files {
            self.api
                .create_file(file.path, &format!("Add {}", file.path), file.content, &branch)
                .await?;
        }

        let pr = self
            .api
            .create_pull(&NewPullRequest {
                title: render_pr_title(feature),
                body: render_pr_body(feature),
                head: branch,
                base: self.base_branch.clone(),
            })
            .await?;
        info!(number = pr.number, feature = %feature.id, "opened implementation PR");
        Ok(())
    }
}

/// Title format the specification agent matches on: the `feat: <id>` prefix
/// is how reconciliation finds a feature's implementation PR.
fn render_pr_title(feature: &Feature) -> String {
    format!("feat: {} - Implement {}", feature.id, feature.title)
}

fn render_pr_body(feature: &Feature) -> String {
    let mut lines = vec![
        format!("# {}", feature.title),
        String::new(),
        feature.description.clone(),
        String::new(),
        "## Requirements".to_string(),
    ];
    for req in &feature.requirements {
        lines.push(format!("- {req}"));
    }
    lines.push(String::new());
    lines.push("## Acceptance Criteria".to_string());
    for ac in &feature.acceptance_criteria {
        lines.push(format!("- {ac}"));
    }
    lines.push(String::new());
    lines.push("## Testing".to_string());
    for tr in &feature.test_requirements {
        lines.push(format!("- {tr}"));
    }
    lines.push(String::new());
    lines.push(format!("Closes #{}", feature.id));
    lines.join("\n")
}

#[async_trait]
impl Agent for DeveloperAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Developer
    }

    async fn process(&self) -> Result<()> {
        let Some(doc) = self.specification().await? else {
            info!("no specifications found to implement");
            return Ok(());
        };

        for feature in doc.pending_features() {
            self.implement(feature).await?;
        }
        Ok(())
    }
}
