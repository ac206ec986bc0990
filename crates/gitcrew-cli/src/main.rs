//! gitcrew - multi-agent pull-request automation CLI
//!
//! ## Commands
//!
//! - `run`: run the agent fleet continuously on an interval
//! - `cycle`: run a single cycle of all agents and exit
//! - `check-config`: validate the environment configuration

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use gitcrew_core::github::GithubApi;
use gitcrew_core::{GitcrewConfig, Orchestrator, RestClient};

#[derive(Parser)]
#[command(name = "gitcrew")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multi-agent pull-request automation for GitHub", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the agent fleet continuously until interrupted
    Run {
        /// Seconds between cycles (overrides GITCREW_INTERVAL_SECS)
        #[arg(long)]
        interval_secs: Option<u64>,
    },

    /// Run a single cycle of all agents and exit
    Cycle,

    /// Validate the environment configuration and exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    gitcrew_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Run { interval_secs } => cmd_run(interval_secs).await,
        Commands::Cycle => cmd_cycle().await,
        Commands::CheckConfig => cmd_check_config(),
    }
}

fn load_config() -> Result<GitcrewConfig> {
    GitcrewConfig::from_env().context("configuration error (see .env.example)")
}

fn build_orchestrator(config: &GitcrewConfig) -> Result<Orchestrator> {
    let client = RestClient::new(&config.api_url, &config.repo, &config.token)
        .context("failed to build GitHub client")?;
    let api: Arc<dyn GithubApi> = Arc::new(client);
    Ok(Orchestrator::new(api, config))
}

/// Run the agent fleet continuously until interrupted.
async fn cmd_run(interval_secs: Option<u64>) -> Result<()> {
    let mut config = load_config()?;
    if let Some(secs) = interval_secs {
        config.interval = std::time::Duration::from_secs(secs);
    }

    info!(repo = %config.repo, "starting gitcrew");
    let orchestrator = build_orchestrator(&config)?;
    orchestrator.run().await?;
    Ok(())
}

/// Run a single cycle of all agents and exit. Exits non-zero when any agent
/// failed, for cron-style invocations.
async fn cmd_cycle() -> Result<()> {
    let config = load_config()?;
    let orchestrator = build_orchestrator(&config)?;

    let report = orchestrator.run_cycle().await;
    if !report.all_succeeded() {
        anyhow::bail!("agents failed: {}", report.failed_agents.join(", "));
    }
    println!("Cycle {} completed", report.cycle);
    Ok(())
}

/// Validate the environment configuration. Writes `.env.example` into the
/// current directory when neither `.env` nor `.env.example` exists yet.
fn cmd_check_config() -> Result<()> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    if GitcrewConfig::write_env_example(&cwd)? {
        println!("Wrote .env.example - fill it in and rename to .env");
    }

    let config = load_config()?;
    println!("Repository:  {}", config.repo);
    println!("Base branch: {}", config.base_branch);
    println!("Interval:    {}s", config.interval.as_secs());
    println!("API URL:     {}", config.api_url);
    println!("Configuration OK");
    Ok(())
}
