//! The spool pipeline: per-occurrence fan-out over configured sinks and
//! backlog flushing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use domain::event::entity::Occurrence;
use domain::record::aggregation::SpoolKey;
use domain::sink::entity::{DeliveryMode, SinkPolicy};
use ports::primary::audit_recorder::AuditRecorder;
use ports::secondary::metrics_port::SpoolMetrics;
use ports::secondary::spool_store::SpoolStore;
use ports::secondary::transport::AuditTransport;

use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::registry::BuilderRegistry;

/// One configured sink: its policy plus the store and transport bound to
/// it. Each sink owns a separate spool directory, so a broken sink never
/// blocks or corrupts another sink's delivery.
pub struct SinkRuntime {
    pub policy: SinkPolicy,
    pub store: Arc<dyn SpoolStore>,
    pub transport: Arc<dyn AuditTransport>,
}

/// Result counts of one backlog flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub committed: usize,
    pub dead_lettered: usize,
    pub skipped: usize,
}

impl FlushReport {
    fn absorb(&mut self, outcome: DispatchOutcome) {
        match outcome {
            DispatchOutcome::Committed => self.committed += 1,
            DispatchOutcome::DeadLettered => self.dead_lettered += 1,
            DispatchOutcome::Skipped => self.skipped += 1,
        }
    }

    fn merge(&mut self, other: FlushReport) {
        self.committed += other.committed;
        self.dead_lettered += other.dead_lettered;
        self.skipped += other.skipped;
    }
}

/// Captures occurrences into per-sink spool files and drives delivery.
///
/// Thread-safe and callable from any number of concurrent tasks; all
/// state beyond the configuration lives in the filesystem.
pub struct SpoolPipeline {
    sinks: Vec<SinkRuntime>,
    dispatcher: Dispatcher,
    metrics: Arc<dyn SpoolMetrics>,
}

impl SpoolPipeline {
    pub fn new(
        sinks: Vec<SinkRuntime>,
        registry: Arc<BuilderRegistry>,
        metrics: Arc<dyn SpoolMetrics>,
        device_name: impl Into<String>,
        local_host: impl Into<String>,
    ) -> Self {
        let dispatcher = Dispatcher::new(registry, Arc::clone(&metrics), device_name, local_host);
        Self {
            sinks,
            dispatcher,
            metrics,
        }
    }

    pub fn sinks(&self) -> &[SinkRuntime] {
        &self.sinks
    }

    /// Capture one occurrence: classify, resolve the aggregation key,
    /// and spool it once per installed, non-suppressing sink. Immediate
    /// sinks get closed (non-mergeable) units dispatched inline.
    ///
    /// Fire-and-forget: every failure is absorbed and logged here.
    pub async fn record(&self, occurrence: Occurrence) {
        let descriptor = occurrence.classify();
        let key = SpoolKey::resolve(&descriptor, &occurrence);
        let record = occurrence.to_spool_record();
        let category = descriptor.category.as_str();

        for sink in &self.sinks {
            if !sink.policy.installed {
                continue;
            }
            if sink
                .policy
                .suppresses(&descriptor, occurrence.calling_user_id())
            {
                self.metrics.record_suppressed(&sink.policy.name, category);
                tracing::debug!(sink = %sink.policy.name, category, "occurrence suppressed");
                continue;
            }
            let handle = match sink.store.spool(&key, &record) {
                Ok(handle) => handle,
                Err(e) => {
                    self.metrics.record_spool_error(&sink.policy.name);
                    tracing::warn!(
                        sink = %sink.policy.name,
                        category,
                        error = %e,
                        "failed to write spool file; occurrence dropped for this sink"
                    );
                    continue;
                }
            };
            self.metrics.record_spooled(&sink.policy.name, category);

            // Mergeable units stay open for further appends; only the
            // flush trigger closes them.
            if sink.policy.mode == DeliveryMode::Immediate && !key.mergeable() {
                self.dispatcher
                    .process(&sink.policy, sink.store.as_ref(), sink.transport.as_ref(), &handle)
                    .await;
            }
        }
    }

    /// Dispatch every backlog file of every installed sink. Used by the
    /// periodic flush scheduler and for crash recovery at startup: any
    /// file present in a spool directory is closed and eligible.
    pub async fn flush_backlog(&self) -> FlushReport {
        let mut report = FlushReport::default();
        for sink in &self.sinks {
            if sink.policy.installed {
                report.merge(self.flush_sink(sink).await);
            }
        }
        report
    }

    /// Dispatch one sink's backlog from a snapshot of its listing.
    pub async fn flush_sink(&self, sink: &SinkRuntime) -> FlushReport {
        let mut report = FlushReport::default();
        let handles = match sink.store.list_ready() {
            Ok(handles) => handles,
            Err(e) => {
                tracing::warn!(sink = %sink.policy.name, error = %e, "backlog listing failed");
                return report;
            }
        };
        self.metrics
            .set_backlog_files(&sink.policy.name, handles.len() as u64);
        for handle in &handles {
            let outcome = self
                .dispatcher
                .process(&sink.policy, sink.store.as_ref(), sink.transport.as_ref(), handle)
                .await;
            report.absorb(outcome);
        }
        report
    }
}

impl AuditRecorder for SpoolPipeline {
    fn record<'a>(
        &'a self,
        occurrence: Occurrence,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(self.record(occurrence))
    }
}
