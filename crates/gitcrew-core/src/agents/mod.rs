//! The four collaborating agents and their shared contract.
//!
//! Each agent is stateless between cycles: all durable state lives in the
//! target repository (branches, PRs, the specification file), so a crashed
//! process resumes cleanly on the next cycle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::error::Result;

pub mod developer;
pub mod merge;
pub mod review;
pub mod review_checks;
pub mod scaffold;
pub mod specification;

pub use developer::DeveloperAgent;
pub use merge::MergeAgent;
pub use review::ReviewAgent;
pub use specification::SpecificationAgent;

/// The four agent archetypes, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Specification,
    Developer,
    Review,
    Merge,
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgentRole::Specification => "specification",
            AgentRole::Developer => "developer",
            AgentRole::Review => "review",
            AgentRole::Merge => "merge",
        };
        write!(f, "{s}")
    }
}

/// A single agent in the system.
///
/// `process` runs one pass of the agent's work against the repository; the
/// orchestrator invokes the agents sequentially each cycle.
#[async_trait]
pub trait Agent: Send + Sync {
    /// The agent's role in the system.
    fn role(&self) -> AgentRole;

    /// Run one processing pass.
    async fn process(&self) -> Result<()>;
}
