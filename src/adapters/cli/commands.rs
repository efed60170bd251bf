//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the spreadlab optimizer.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::adapters::csv_data::CsvBarProvider;
use crate::adapters::report::{render_json, render_table};
use crate::application::optimizer::OptimizationSession;
use crate::config::loader::{load_config, Config};
use crate::domain::run_result::{ParamSet, RunResult};

/// Spreadlab - mean-reversion spread backtest and grid optimizer
#[derive(Parser, Debug)]
#[command(
    name = "spreadlab",
    version = env!("CARGO_PKG_VERSION"),
    about = "Mean-reversion spread trading backtest and parameter grid optimizer",
    long_about = "Spreadlab sweeps strategy parameter grids over historical spread \
                  series, backtests every combination in parallel, and prints the \
                  ranked survivors."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Optimize the two-asset z-score strategy
    Pair(SweepCmd),

    /// Optimize the dual-horizon z-score strategy
    Dual(SweepCmd),

    /// Optimize the triangular divergence strategy
    Triangular(SweepCmd),

    /// Print per-variant grid combination counts
    Grid(GridCmd),
}

/// Run one grid sweep
#[derive(Parser, Debug)]
pub struct SweepCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/optimizer.toml")]
    pub config: PathBuf,

    /// Override the number of ranked rows to keep
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Output format (table, json)
    #[arg(short, long, value_name = "FORMAT", default_value = "table")]
    pub format: String,
}

/// Inspect grid sizes without running anything
#[derive(Parser, Debug)]
pub struct GridCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/optimizer.toml")]
    pub config: PathBuf,
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    match app.command {
        Command::Pair(cmd) => pair_command(cmd).await,
        Command::Dual(cmd) => dual_command(cmd).await,
        Command::Triangular(cmd) => triangular_command(cmd).await,
        Command::Grid(cmd) => grid_command(cmd).await,
    }
}

fn load(cmd_config: &Path) -> Result<Config> {
    load_config(cmd_config)
        .with_context(|| format!("Failed to load configuration from {}", cmd_config.display()))
}

fn render<P: ParamSet + serde::Serialize>(
    ranked: &[RunResult<P>],
    format: &str,
) -> Result<String> {
    match format {
        "json" => render_json(ranked).context("Failed to serialize results"),
        _ => Ok(render_table(ranked)),
    }
}

async fn pair_command(cmd: SweepCmd) -> Result<()> {
    let mut config = load(&cmd.config)?;
    if let (Some(top), Some(section)) = (cmd.top, config.pair.as_mut()) {
        section.ranking.top_k = top;
    }

    let provider = CsvBarProvider::new(config.data.csv_dir.clone());
    let session = OptimizationSession::new(provider, config);
    let ranked = session.run_pair().await?;
    print!("{}", render(&ranked, &cmd.format)?);
    Ok(())
}

async fn dual_command(cmd: SweepCmd) -> Result<()> {
    let mut config = load(&cmd.config)?;
    if let (Some(top), Some(section)) = (cmd.top, config.dual.as_mut()) {
        section.ranking.top_k = top;
    }

    let provider = CsvBarProvider::new(config.data.csv_dir.clone());
    let session = OptimizationSession::new(provider, config);
    let ranked = session.run_dual().await?;
    print!("{}", render(&ranked, &cmd.format)?);
    Ok(())
}

async fn triangular_command(cmd: SweepCmd) -> Result<()> {
    let mut config = load(&cmd.config)?;
    if let (Some(top), Some(section)) = (cmd.top, config.triangular.as_mut()) {
        section.ranking.top_k = top;
    }

    let provider = CsvBarProvider::new(config.data.csv_dir.clone());
    let session = OptimizationSession::new(provider, config);
    let ranked = session.run_triangular().await?;
    print!("{}", render(&ranked, &cmd.format)?);
    Ok(())
}

async fn grid_command(cmd: GridCmd) -> Result<()> {
    let config = load(&cmd.config)?;

    if let Some(section) = &config.pair {
        let grid = section.grid().context("Invalid [pair] grid")?;
        println!("pair: {} combinations", grid.len());
    }
    if let Some(section) = &config.dual {
        let grid = section.grid().context("Invalid [dual] grid")?;
        println!("dual: {} combinations", grid.len());
    }
    if let Some(section) = &config.triangular {
        let grid = section.grid().context("Invalid [triangular] grid")?;
        println!("triangular: {} combinations", grid.len());
    }
    Ok(())
}
