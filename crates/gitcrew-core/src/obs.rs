//! Structured observability hooks for orchestrator lifecycle events.
//!
//! Emission functions for the key lifecycle events: cycle start/finish,
//! agent start/finish/failure, PR reviewed/merged/blocked. The orchestrator
//! wraps each cycle in a `gitcrew.cycle` span so these events carry the
//! cycle number.
//!
//! Events are emitted at `info!` level (filterable via `RUST_LOG`).

use tracing::{info, warn};

use crate::agents::AgentRole;

/// Emit event: orchestrator cycle started.
pub fn emit_cycle_started(cycle: u64) {
    info!(event = "cycle.started", cycle = cycle);
}

/// Emit event: orchestrator cycle finished.
pub fn emit_cycle_finished(cycle: u64, duration_ms: u64, failed_agents: usize) {
    info!(
        event = "cycle.finished",
        cycle = cycle,
        duration_ms = duration_ms,
        failed_agents = failed_agents,
    );
}

/// Emit event: agent processing started.
pub fn emit_agent_started(role: AgentRole) {
    info!(event = "agent.started", role = %role);
}

/// Emit event: agent processing finished.
pub fn emit_agent_finished(role: AgentRole, duration_ms: u64) {
    info!(event = "agent.finished", role = %role, duration_ms = duration_ms);
}

/// Emit event: agent processing failed (warning level; the cycle continues).
pub fn emit_agent_failed(role: AgentRole, error: &dyn std::fmt::Display) {
    warn!(event = "agent.failed", role = %role, error = %error);
}

/// Emit event: a review was submitted on a PR.
pub fn emit_pr_reviewed(number: u64, verdict: &str, findings: usize) {
    info!(
        event = "pr.reviewed",
        number = number,
        verdict = verdict,
        findings = findings,
    );
}

/// Emit event: a PR was merged.
pub fn emit_pr_merged(number: u64) {
    info!(event = "pr.merged", number = number);
}

/// Emit event: a PR failed the merge gate.
pub fn emit_pr_blocked(number: u64, reasons: usize) {
    info!(event = "pr.blocked", number = number, reasons = reasons);
}
