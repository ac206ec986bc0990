//! gitcrew Core Library
//!
//! Multi-agent pull-request automation: four agents (specification,
//! developer, review, merge) collaborate on a GitHub repository, driven by a
//! polling orchestrator. Re-exports the components needed for programmatic
//! access.

pub mod agents;
pub mod config;
pub mod domain;
pub mod github;
pub mod obs;
pub mod orchestrator;
pub mod telemetry;

pub use agents::{
    Agent, AgentRole, DeveloperAgent, MergeAgent, ReviewAgent, SpecificationAgent,
};
pub use config::GitcrewConfig;
pub use domain::{
    Feature, FeatureStatus, GitcrewError, MergeReport, PrStateView, Result, ReviewFinding,
    ReviewVerdict, SpecDocument, SPEC_PATH,
};
pub use github::{GithubApi, GithubError, RestClient};
pub use orchestrator::{CycleReport, Orchestrator};
pub use telemetry::init_tracing;

/// gitcrew version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
