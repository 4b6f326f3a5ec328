//! Periodic backlog flush.
//!
//! When a mergeable aggregation window closes is a policy decision, not a
//! pipeline constant: this scheduler closes every open window each time
//! its configured period elapses. Library users with different policies
//! can call [`SpoolPipeline::flush_backlog`] from their own trigger.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::pipeline::SpoolPipeline;

pub struct FlushScheduler {
    pipeline: Arc<SpoolPipeline>,
    period: Duration,
}

impl FlushScheduler {
    pub fn new(pipeline: Arc<SpoolPipeline>, period: Duration) -> Self {
        Self { pipeline, period }
    }

    /// Flush on every tick until cancelled, then flush once more so a
    /// graceful shutdown leaves no closed unit behind.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick of `interval` fires immediately, which doubles
        // as the crash-recovery pass over files left by a previous run.
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.pipeline.flush_backlog().await;
                    if report.committed + report.dead_lettered + report.skipped > 0 {
                        tracing::info!(
                            committed = report.committed,
                            dead_lettered = report.dead_lettered,
                            skipped = report.skipped,
                            "backlog flush"
                        );
                    }
                }
                () = shutdown.cancelled() => {
                    let report = self.pipeline.flush_backlog().await;
                    tracing::info!(
                        committed = report.committed,
                        dead_lettered = report.dead_lettered,
                        "final flush before shutdown"
                    );
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use domain::event::entity::{InstanceRef, Occurrence, PatientRef, StudyRef, TransferSession};
    use domain::sink::entity::{DeliveryMode, SinkPolicy};
    use ports::secondary::metrics_port::NoopMetrics;
    use ports::secondary::spool_store::SpoolStore;
    use ports::secondary::transport::AuditTransport;
    use ports::test_utils::{CountingTransport, MemorySpoolStore};

    use crate::pipeline::SinkRuntime;
    use crate::registry::BuilderRegistry;

    fn stored() -> Occurrence {
        Occurrence::InstancesStored {
            session: TransferSession {
                calling_user_id: "STORESCU".to_string(),
                calling_host: None,
                called_user_id: "ARCHIVE".to_string(),
            },
            study: StudyRef {
                uid: "1.2.3".to_string(),
                accession_number: None,
                date: None,
            },
            patient: PatientRef {
                id: "P1".to_string(),
                name: None,
            },
            instance: InstanceRef {
                sop_class_uid: "cuid".to_string(),
                sop_instance_uid: "iuid".to_string(),
                mpps_uid: None,
                outcome: None,
                error_code: None,
            },
            warning: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_flushes_and_honours_cancellation() {
        let store = Arc::new(MemorySpoolStore::new());
        let transport = Arc::new(CountingTransport::new());
        let pipeline = Arc::new(SpoolPipeline::new(
            vec![SinkRuntime {
                policy: SinkPolicy {
                    name: "batch".to_string(),
                    installed: true,
                    mode: DeliveryMode::Aggregate,
                    send_timeout: Duration::from_secs(5),
                    suppress: vec![],
                },
                store: Arc::clone(&store) as Arc<dyn SpoolStore>,
                transport: Arc::clone(&transport) as Arc<dyn AuditTransport>,
            }],
            Arc::new(BuilderRegistry::standard()),
            Arc::new(NoopMetrics),
            "archive1",
            "archive1.example.org",
        ));

        pipeline.record(stored()).await;
        assert_eq!(transport.sent_count(), 0);

        let token = CancellationToken::new();
        let scheduler = FlushScheduler::new(Arc::clone(&pipeline), Duration::from_secs(60));
        let task = tokio::spawn(scheduler.run(token.clone()));

        // First (immediate) tick drains the backlog.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(transport.sent_count(), 1);

        // A unit spooled later is picked up by the shutdown flush.
        pipeline.record(stored()).await;
        token.cancel();
        task.await.unwrap();
        assert_eq!(transport.sent_count(), 2);
    }
}
