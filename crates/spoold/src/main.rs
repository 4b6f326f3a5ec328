#![forbid(unsafe_code)]

mod cli;
mod commands;
mod shutdown;
mod startup;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use infrastructure::config::SpoolerConfig;
use infrastructure::logging::init_logging;
use infrastructure::metrics::SpoolerMetrics;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::parse();

    match cli.command {
        Some(Command::Version) => {
            println!("spoold {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }

        Some(Command::CheckConfig) => commands::cmd_check_config(&load_config(&cli)?),

        Some(Command::Backlog) => commands::cmd_backlog(&load_config(&cli)?),

        Some(Command::Flush { ref sink }) => {
            let config = load_config(&cli)?;
            init_logging_for(&cli, &config)?;
            let pipeline = startup::build_pipeline(&config, Arc::new(SpoolerMetrics::new()))?;
            commands::cmd_flush(&pipeline, sink.as_deref()).await
        }

        None | Some(Command::Run) => {
            let config = load_config(&cli)?;
            init_logging_for(&cli, &config)?;
            commands::cmd_run(&config, Arc::new(SpoolerMetrics::new())).await
        }
    }
}

fn load_config(cli: &Cli) -> Result<SpoolerConfig> {
    SpoolerConfig::load(Path::new(&cli.config)).with_context(|| format!("loading {}", cli.config))
}

fn init_logging_for(cli: &Cli, config: &SpoolerConfig) -> Result<()> {
    let level = cli.log_level.map_or(config.logging.level, Into::into);
    let format = cli.log_format.map_or(config.logging.format, Into::into);
    init_logging(level, format)?;
    Ok(())
}
