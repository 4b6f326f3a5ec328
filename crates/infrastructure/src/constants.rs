use std::time::Duration;

// ── Paths ──────────────────────────────────────────────────────────

pub const DEFAULT_CONFIG_PATH: &str = "/etc/audispool/config.yaml";
pub const DEFAULT_SPOOL_DIRECTORY: &str = "/var/spool/audispool";

// ── Timing defaults ────────────────────────────────────────────────

pub const DEFAULT_SEND_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_FLUSH_INTERVAL_SECS: u64 = 60;
pub const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);
