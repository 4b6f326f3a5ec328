//! Dispatch of one spool file to one sink: consume → build → send,
//! committing on success and dead-lettering on any failure.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use domain::message::entity::BuildContext;
use domain::record::error::SpoolError;
use domain::sink::entity::SinkPolicy;
use ports::secondary::metrics_port::SpoolMetrics;
use ports::secondary::spool_store::{SpoolHandle, SpoolStore};
use ports::secondary::transport::AuditTransport;

use crate::registry::BuilderRegistry;

/// What happened to a spool file during one dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Delivered and deleted.
    Committed,
    /// Renamed with the dead-letter suffix for operator inspection.
    DeadLettered,
    /// Nothing to do: the file was empty or another dispatcher already
    /// owned it. Not an error under at-least-once semantics.
    Skipped,
}

pub struct Dispatcher {
    registry: Arc<BuilderRegistry>,
    metrics: Arc<dyn SpoolMetrics>,
    device_name: String,
    local_host: String,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<BuilderRegistry>,
        metrics: Arc<dyn SpoolMetrics>,
        device_name: impl Into<String>,
        local_host: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            metrics,
            device_name: device_name.into(),
            local_host: local_host.into(),
        }
    }

    /// Process one spool file against one sink.
    ///
    /// Never returns an error: every failure mode maps to an outcome
    /// value, and dead-letter marking failures are logged with the file
    /// left in place for a later pass.
    pub async fn process(
        &self,
        policy: &SinkPolicy,
        store: &dyn SpoolStore,
        transport: &dyn AuditTransport,
        handle: &SpoolHandle,
    ) -> DispatchOutcome {
        let record = match store.consume(handle) {
            Ok(record) => record,
            Err(SpoolError::Gone) => {
                tracing::debug!(
                    sink = %policy.name,
                    file = %handle.path.display(),
                    "spool file already consumed elsewhere"
                );
                return DispatchOutcome::Skipped;
            }
            Err(SpoolError::EmptyFile) => {
                tracing::warn!(
                    sink = %policy.name,
                    file = %handle.path.display(),
                    "discarding empty spool file"
                );
                self.commit(policy, store, handle);
                return DispatchOutcome::Skipped;
            }
            Err(e) => {
                tracing::warn!(
                    sink = %policy.name,
                    file = %handle.path.display(),
                    error = %e,
                    "spool file unreadable"
                );
                return self.dead_letter(policy, store, handle, "consume");
            }
        };

        let ctx = BuildContext {
            device_name: self.device_name.clone(),
            local_host: self.local_host.clone(),
            process_id: std::process::id().to_string(),
            event_time_ms: store.event_time_ms(handle).unwrap_or_else(now_ms),
        };

        let message = match self
            .registry
            .get(handle.category)
            .and_then(|builder| builder.build(&record, &ctx))
        {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(
                    sink = %policy.name,
                    file = %handle.path.display(),
                    error = %e,
                    "message build failed"
                );
                return self.dead_letter(policy, store, handle, "build");
            }
        };

        match tokio::time::timeout(policy.send_timeout, transport.send(&message)).await {
            Ok(Ok(())) => {
                self.commit(policy, store, handle);
                self.metrics
                    .record_emitted(&policy.name, handle.category.as_str());
                DispatchOutcome::Committed
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    sink = %policy.name,
                    file = %handle.path.display(),
                    error = %e,
                    "delivery failed"
                );
                self.dead_letter(policy, store, handle, "send")
            }
            Err(_elapsed) => {
                tracing::warn!(
                    sink = %policy.name,
                    file = %handle.path.display(),
                    timeout_secs = policy.send_timeout.as_secs(),
                    "delivery timed out"
                );
                self.dead_letter(policy, store, handle, "timeout")
            }
        }
    }

    fn commit(&self, policy: &SinkPolicy, store: &dyn SpoolStore, handle: &SpoolHandle) {
        if let Err(e) = store.commit(handle) {
            tracing::warn!(
                sink = %policy.name,
                file = %handle.path.display(),
                error = %e,
                "commit failed; file may be reprocessed"
            );
        }
    }

    fn dead_letter(
        &self,
        policy: &SinkPolicy,
        store: &dyn SpoolStore,
        handle: &SpoolHandle,
        reason: &str,
    ) -> DispatchOutcome {
        self.metrics.record_dead_lettered(&policy.name, reason);
        if let Err(e) = store.dead_letter(handle) {
            tracing::warn!(
                sink = %policy.name,
                file = %handle.path.display(),
                error = %e,
                "dead-letter rename failed; file left in place"
            );
        }
        DispatchOutcome::DeadLettered
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
