//! Cycle driver for the agent fleet.
//!
//! One cycle runs the agents sequentially in a fixed order: specification,
//! developer, review, merge. Agent failures are isolated: a failing agent
//! is logged and the cycle continues, so a GitHub hiccup in one agent never
//! starves the others. The continuous loop sleeps the configured interval
//! between cycles; agent failures never shorten that interval.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, Instrument};

use crate::agents::{Agent, DeveloperAgent, MergeAgent, ReviewAgent, SpecificationAgent};
use crate::config::GitcrewConfig;
use crate::domain::error::Result;
use crate::github::GithubApi;
use crate::obs;

/// Summary of one orchestrator cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    /// Roles that returned an error, as display strings.
    pub failed_agents: Vec<String>,
}

impl CycleReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed_agents.is_empty()
    }
}

/// Coordinates the execution of all agents in the system.
pub struct Orchestrator {
    agents: Vec<Box<dyn Agent>>,
    interval: Duration,
    cycles: AtomicU64,
}

impl Orchestrator {
    /// Build the standard four-agent fleet over one GitHub API handle.
    pub fn new(api: Arc<dyn GithubApi>, config: &GitcrewConfig) -> Self {
        let agents: Vec<Box<dyn Agent>> = vec![
            Box::new(SpecificationAgent::new(
                Arc::clone(&api),
                config.base_branch.clone(),
            )),
            Box::new(DeveloperAgent::new(
                Arc::clone(&api),
                config.base_branch.clone(),
            )),
            Box::new(ReviewAgent::new(Arc::clone(&api))),
            Box::new(MergeAgent::new(api)),
        ];
        Self {
            agents,
            interval: config.interval,
            cycles: AtomicU64::new(0),
        }
    }

    /// Build an orchestrator over an explicit agent list (tests).
    pub fn from_agents(agents: Vec<Box<dyn Agent>>, interval: Duration) -> Self {
        Self {
            agents,
            interval,
            cycles: AtomicU64::new(0),
        }
    }

    /// Run one cycle of all agents.
    pub async fn run_cycle(&self) -> CycleReport {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let span = tracing::info_span!("gitcrew.cycle", cycle);
        async {
            let started = Instant::now();
            obs::emit_cycle_started(cycle);

            let mut failed_agents = Vec::new();
            for agent in &self.agents {
                let role = agent.role();
                obs::emit_agent_started(role);
                let agent_started = Instant::now();
                match agent.process().await {
                    Ok(()) => {
                        obs::emit_agent_finished(role, agent_started.elapsed().as_millis() as u64);
                    }
                    Err(e) => {
                        obs::emit_agent_failed(role, &e);
                        failed_agents.push(role.to_string());
                    }
                }
            }

            obs::emit_cycle_finished(
                cycle,
                started.elapsed().as_millis() as u64,
                failed_agents.len(),
            );
            CycleReport {
                cycle,
                failed_agents,
            }
        }
        .instrument(span)
        .await
    }

    /// Run continuously until ctrl-c.
    ///
    /// Agent failures are already isolated and logged inside the cycle, so
    /// the loop keeps the full interval regardless of the cycle report. A
    /// persistently failing agent must not turn the poll into a hot loop
    /// against the API.
    pub async fn run(&self) -> Result<()> {
        info!(interval_secs = self.interval.as_secs(), "starting orchestrator");
        loop {
            self.run_cycle().await;
            info!(
                delay_secs = self.interval.as_secs(),
                "waiting before next cycle"
            );
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown requested, stopping orchestrator");
                    return Ok(());
                }
            }
        }
    }
}
