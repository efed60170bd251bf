//! Spreadlab - Mean-Reversion Spread Backtest and Grid Optimizer

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use spreadlab::adapters::cli::{self, CliApp};

#[tokio::main]
async fn main() -> Result<()> {
    let app = CliApp::parse();
    init_logging(app.verbose, app.debug)?;

    cli::execute(app).await
}

fn init_logging(verbose: bool, debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}
