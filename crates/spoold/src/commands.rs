use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use application::flush::FlushScheduler;
use application::pipeline::SpoolPipeline;
use infrastructure::config::SpoolerConfig;
use infrastructure::metrics::SpoolerMetrics;

use crate::shutdown;

/// Run the flush scheduler until a shutdown signal arrives.
pub async fn cmd_run(config: &SpoolerConfig, metrics: Arc<SpoolerMetrics>) -> Result<()> {
    let pipeline = Arc::new(crate::startup::build_pipeline(config, metrics.clone())?);
    let period = Duration::from_secs(config.spool.flush_interval_secs);
    tracing::info!(
        device = %config.device.name,
        spool_dir = %config.spool.directory,
        sinks = config.sinks.len(),
        flush_interval_secs = config.spool.flush_interval_secs,
        "spool daemon starting"
    );

    let token = shutdown::install();
    FlushScheduler::new(pipeline, period).run(token).await;

    tracing::debug!(snapshot = %metrics.encode_text(), "final metrics");
    tracing::info!("spool daemon stopped");
    Ok(())
}

/// Flush the backlog once, optionally restricted to one sink.
pub async fn cmd_flush(pipeline: &SpoolPipeline, sink: Option<&str>) -> Result<()> {
    let report = match sink {
        Some(name) => {
            let sink = pipeline
                .sinks()
                .iter()
                .find(|s| s.policy.name == name)
                .with_context(|| format!("no sink named '{name}' is configured"))?;
            pipeline.flush_sink(sink).await
        }
        None => pipeline.flush_backlog().await,
    };
    println!(
        "committed: {}  dead-lettered: {}  skipped: {}",
        report.committed, report.dead_lettered, report.skipped
    );
    Ok(())
}

/// Print backlog and dead-letter counts per configured sink.
pub fn cmd_backlog(config: &SpoolerConfig) -> Result<()> {
    let root = Path::new(&config.spool.directory);
    println!("{:<24} {:>8} {:>12}", "SINK", "BACKLOG", "DEAD-LETTER");
    for sink in &config.sinks {
        let (ready, dead) = count_spool_files(&root.join(&sink.name))?;
        println!("{:<24} {:>8} {:>12}", sink.name, ready, dead);
    }
    Ok(())
}

fn count_spool_files(dir: &Path) -> Result<(usize, usize)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((0, 0)),
        Err(e) => return Err(e).with_context(|| format!("reading {}", dir.display())),
    };
    let mut ready = 0;
    let mut dead = 0;
    for entry in entries {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(".failed") {
            dead += 1;
        } else {
            ready += 1;
        }
    }
    Ok((ready, dead))
}

/// Validate the configuration and print a short summary.
pub fn cmd_check_config(config: &SpoolerConfig) -> Result<()> {
    println!(
        "configuration ok: device '{}', {} sink(s), spool root {}",
        config.device.name,
        config.sinks.len(),
        config.spool.directory
    );
    for sink in &config.sinks {
        println!(
            "  sink '{}': installed={} mode={:?} suppress-rules={}",
            sink.name,
            sink.installed,
            sink.mode,
            sink.suppress.len()
        );
    }
    Ok(())
}
