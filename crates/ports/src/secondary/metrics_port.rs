// Pipeline metrics port. All methods take `&self`; the production
// implementation uses interior mutability (prometheus-client atomics).
// Every method defaults to a no-op so test mocks only implement what
// they assert on.

pub trait SpoolMetrics: Send + Sync {
    /// A spooled unit was durably written for a sink.
    fn record_spooled(&self, _sink: &str, _category: &str) {}

    /// An occurrence was suppressed for a sink before spooling.
    fn record_suppressed(&self, _sink: &str, _category: &str) {}

    /// Writing a spool file failed; the occurrence was dropped.
    fn record_spool_error(&self, _sink: &str) {}

    /// A message was delivered and its spool file committed.
    fn record_emitted(&self, _sink: &str, _category: &str) {}

    /// A spool file was dead-lettered (reason: "consume", "build",
    /// "send", "timeout").
    fn record_dead_lettered(&self, _sink: &str, _reason: &str) {}

    /// Current number of backlog files in a sink's spool directory.
    fn set_backlog_files(&self, _sink: &str, _count: u64) {}
}

/// Metrics sink that records nothing.
pub struct NoopMetrics;

impl SpoolMetrics for NoopMetrics {}
