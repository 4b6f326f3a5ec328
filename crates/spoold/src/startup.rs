use std::path::Path;
use std::sync::Arc;

use adapters::spool::fs_store::FsSpoolStore;
use adapters::transport::http_transport::HttpAuditTransport;
use adapters::transport::log_transport::LogAuditTransport;
use adapters::transport::tcp_transport::TcpAuditTransport;
use application::pipeline::{SinkRuntime, SpoolPipeline};
use application::registry::BuilderRegistry;
use infrastructure::config::{DestinationConfig, SpoolerConfig};
use ports::secondary::metrics_port::SpoolMetrics;
use ports::secondary::spool_store::SpoolStore;
use ports::secondary::transport::AuditTransport;

/// Wire the configured sinks into a ready pipeline.
///
/// Each sink gets a spool subdirectory named after it under the spool
/// root, and the transport its destination block selects.
pub fn build_pipeline(
    config: &SpoolerConfig,
    metrics: Arc<dyn SpoolMetrics>,
) -> anyhow::Result<SpoolPipeline> {
    let spool_root = Path::new(&config.spool.directory);
    let mut sinks = Vec::with_capacity(config.sinks.len());
    for sink in &config.sinks {
        let policy = sink.to_policy()?;
        let store: Arc<dyn SpoolStore> = Arc::new(FsSpoolStore::new(spool_root.join(&sink.name)));
        let transport: Arc<dyn AuditTransport> = match &sink.destination {
            DestinationConfig::Log => Arc::new(LogAuditTransport),
            DestinationConfig::Tcp { host, port } => {
                Arc::new(TcpAuditTransport::new(format!("{host}:{port}")))
            }
            DestinationConfig::Http { url, auth_header } => {
                Arc::new(HttpAuditTransport::new(url.clone(), auth_header.clone()))
            }
        };
        sinks.push(SinkRuntime {
            policy,
            store,
            transport,
        });
    }

    Ok(SpoolPipeline::new(
        sinks,
        Arc::new(BuilderRegistry::standard()),
        metrics,
        config.device.name.clone(),
        config.device.host.clone(),
    ))
}
