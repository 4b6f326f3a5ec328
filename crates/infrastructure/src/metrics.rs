use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;

use ports::secondary::metrics_port::SpoolMetrics;

// ── Label types ─────────────────────────────────────────────────────

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct SinkLabels {
    pub sink: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct SinkCategoryLabels {
    pub sink: String,
    pub category: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct SinkReasonLabels {
    pub sink: String,
    pub reason: String,
}

// ── Spooler metrics registry ────────────────────────────────────────

/// Prometheus metrics for the spool pipeline.
///
/// All metric families use interior mutability (atomics), so recording
/// only requires `&self`. The registry itself is NOT Clone — wrap in
/// `Arc` for multi-task sharing.
pub struct SpoolerMetrics {
    registry: Registry,
    spooled_total: Family<SinkCategoryLabels, Counter>,
    suppressed_total: Family<SinkCategoryLabels, Counter>,
    spool_errors_total: Family<SinkLabels, Counter>,
    emitted_total: Family<SinkCategoryLabels, Counter>,
    dead_lettered_total: Family<SinkReasonLabels, Counter>,
    backlog_files: Family<SinkLabels, Gauge>,
}

impl SpoolerMetrics {
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("audispool");

        let spooled_total = Family::<SinkCategoryLabels, Counter>::default();
        registry.register(
            "spooled",
            "Spooled units durably written per sink and category",
            spooled_total.clone(),
        );

        let suppressed_total = Family::<SinkCategoryLabels, Counter>::default();
        registry.register(
            "suppressed",
            "Occurrences suppressed before spooling per sink and category",
            suppressed_total.clone(),
        );

        let spool_errors_total = Family::<SinkLabels, Counter>::default();
        registry.register(
            "spool_errors",
            "Occurrences dropped because the spool write failed",
            spool_errors_total.clone(),
        );

        let emitted_total = Family::<SinkCategoryLabels, Counter>::default();
        registry.register(
            "emitted",
            "Messages delivered and committed per sink and category",
            emitted_total.clone(),
        );

        let dead_lettered_total = Family::<SinkReasonLabels, Counter>::default();
        registry.register(
            "dead_lettered",
            "Spool files dead-lettered per sink and failure reason",
            dead_lettered_total.clone(),
        );

        let backlog_files = Family::<SinkLabels, Gauge>::default();
        registry.register(
            "backlog_files",
            "Backlog files currently in a sink's spool directory",
            backlog_files.clone(),
        );

        Self {
            registry,
            spooled_total,
            suppressed_total,
            spool_errors_total,
            emitted_total,
            dead_lettered_total,
            backlog_files,
        }
    }

    /// Render the registry in Prometheus text exposition format.
    pub fn encode_text(&self) -> String {
        let mut out = String::new();
        // Encoding only fails on a formatter error, which String never produces.
        let _ = encode(&mut out, &self.registry);
        out
    }
}

impl Default for SpoolerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SpoolMetrics for SpoolerMetrics {
    fn record_spooled(&self, sink: &str, category: &str) {
        self.spooled_total
            .get_or_create(&SinkCategoryLabels {
                sink: sink.to_string(),
                category: category.to_string(),
            })
            .inc();
    }

    fn record_suppressed(&self, sink: &str, category: &str) {
        self.suppressed_total
            .get_or_create(&SinkCategoryLabels {
                sink: sink.to_string(),
                category: category.to_string(),
            })
            .inc();
    }

    fn record_spool_error(&self, sink: &str) {
        self.spool_errors_total
            .get_or_create(&SinkLabels {
                sink: sink.to_string(),
            })
            .inc();
    }

    fn record_emitted(&self, sink: &str, category: &str) {
        self.emitted_total
            .get_or_create(&SinkCategoryLabels {
                sink: sink.to_string(),
                category: category.to_string(),
            })
            .inc();
    }

    fn record_dead_lettered(&self, sink: &str, reason: &str) {
        self.dead_lettered_total
            .get_or_create(&SinkReasonLabels {
                sink: sink.to_string(),
                reason: reason.to_string(),
            })
            .inc();
    }

    fn set_backlog_files(&self, sink: &str, count: u64) {
        self.backlog_files
            .get_or_create(&SinkLabels {
                sink: sink.to_string(),
            })
            .set(count as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_appear_in_text_exposition() {
        let metrics = SpoolerMetrics::new();
        metrics.record_spooled("central", "store");
        metrics.record_emitted("central", "store");
        metrics.record_dead_lettered("central", "timeout");
        metrics.set_backlog_files("central", 7);

        let text = metrics.encode_text();
        assert!(text.contains("audispool_spooled_total"));
        assert!(text.contains("audispool_dead_lettered_total"));
        assert!(text.contains("reason=\"timeout\""));
        assert!(text.contains("audispool_backlog_files"));
    }

    #[test]
    fn recording_through_the_port_trait_works() {
        let metrics: &dyn SpoolMetrics = &SpoolerMetrics::new();
        metrics.record_suppressed("central", "query");
        metrics.record_spool_error("central");
    }
}
