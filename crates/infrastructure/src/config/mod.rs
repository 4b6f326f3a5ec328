//! Daemon configuration: structs, parsing, and validation.
//!
//! Split across sub-modules:
//! - `common`: shared helpers, `ConfigError`, logging knobs
//! - `sink`: per-sink delivery and suppression config

mod common;
mod sink;

pub use common::{ConfigError, LogFormat, LogLevel, warn_if_world_readable};
pub use sink::{DestinationConfig, SinkConfig, SuppressRuleConfig};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FLUSH_INTERVAL_SECS, DEFAULT_SPOOL_DIRECTORY};
use common::{MAX_SINKS, MAX_SUPPRESS_RULES, check_limit};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpoolerConfig {
    pub device: DeviceConfig,

    #[serde(default)]
    pub spool: SpoolConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    pub sinks: Vec<SinkConfig>,
}

/// Identity of the archive node emitting audit messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    pub name: String,
    pub host: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpoolConfig {
    /// Root of the spool tree; each sink gets a subdirectory named
    /// after it.
    #[serde(default = "default_spool_directory")]
    pub directory: String,

    /// Aggregate-mode merge windows close each time this period
    /// elapses.
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,
}

fn default_spool_directory() -> String {
    DEFAULT_SPOOL_DIRECTORY.to_string()
}

fn default_flush_interval_secs() -> u64 {
    DEFAULT_FLUSH_INTERVAL_SECS
}

impl Default for SpoolConfig {
    fn default() -> Self {
        Self {
            directory: default_spool_directory(),
            flush_interval_secs: default_flush_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub format: LogFormat,
}

impl SpoolerConfig {
    /// Load config from a YAML file, warning when the file is readable
    /// by other users (it may carry collector auth secrets).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        warn_if_world_readable(path, "config file");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Return a copy with collector auth secrets masked, for logging.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let mut sanitized = self.clone();
        for sink in &mut sanitized.sinks {
            if let DestinationConfig::Http {
                auth_header: Some(auth),
                ..
            } = &mut sink.destination
            {
                *auth = "***".to_string();
            }
        }
        sanitized
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.name.is_empty() {
            return Err(ConfigError::Validation {
                field: "device.name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.spool.directory.is_empty() {
            return Err(ConfigError::Validation {
                field: "spool.directory".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.spool.flush_interval_secs == 0 {
            return Err(ConfigError::Validation {
                field: "spool.flush_interval_secs".to_string(),
                message: "must be positive".to_string(),
            });
        }

        check_limit("sinks", self.sinks.len(), MAX_SINKS)?;
        for (i, sink) in self.sinks.iter().enumerate() {
            if sink.name.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("sinks[{i}].name"),
                    message: "must not be empty".to_string(),
                });
            }
            // Sink names become spool subdirectory names.
            if sink
                .name
                .chars()
                .any(|c| !c.is_alphanumeric() && c != '-' && c != '_')
            {
                return Err(ConfigError::Validation {
                    field: format!("sinks[{i}].name"),
                    message: "only alphanumerics, dashes, underscores allowed".to_string(),
                });
            }
            if sink.send_timeout_secs == 0 {
                return Err(ConfigError::Validation {
                    field: format!("sinks[{i}].send_timeout_secs"),
                    message: "must be positive".to_string(),
                });
            }
            check_limit(
                &format!("sinks[{i}].suppress"),
                sink.suppress.len(),
                MAX_SUPPRESS_RULES,
            )?;
            // Fail at load time, not at the first suppressed occurrence.
            sink.to_policy()?;
        }

        let mut names: Vec<&str> = self.sinks.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != self.sinks.len() {
            return Err(ConfigError::Validation {
                field: "sinks".to_string(),
                message: "sink names must be unique".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r"
device:
  name: archive1
  host: archive1.example.org
spool:
  directory: /var/spool/audispool
  flush_interval_secs: 30
sinks:
  - name: central
    mode: immediate
    destination:
      type: tcp
      host: collector.example.org
      port: 6514
  - name: mirror
    mode: aggregate
    destination:
      type: http
      url: https://mirror.example.org/audit
      auth_header: Bearer s3cret
";

    #[test]
    fn sample_config_parses_and_validates() {
        let config = SpoolerConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.device.name, "archive1");
        assert_eq!(config.sinks.len(), 2);
        assert_eq!(config.spool.flush_interval_secs, 30);
    }

    #[test]
    fn defaults_apply_when_sections_are_omitted() {
        let yaml = r"
device:
  name: archive1
  host: localhost
sinks: []
";
        let config = SpoolerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.spool.directory, DEFAULT_SPOOL_DIRECTORY);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn duplicate_sink_names_are_rejected() {
        let yaml = r"
device:
  name: archive1
  host: localhost
sinks:
  - name: central
    destination: { type: log }
  - name: central
    destination: { type: log }
";
        assert!(matches!(
            SpoolerConfig::from_yaml(yaml),
            Err(ConfigError::Validation { field, .. }) if field == "sinks"
        ));
    }

    #[test]
    fn sink_name_with_path_separator_is_rejected() {
        let yaml = r"
device:
  name: archive1
  host: localhost
sinks:
  - name: ../escape
    destination: { type: log }
";
        assert!(SpoolerConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let yaml = r"
device:
  name: archive1
  host: localhost
sinks:
  - name: central
    send_timeout_secs: 0
    destination: { type: log }
";
        assert!(SpoolerConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn sanitized_masks_auth_headers() {
        let config = SpoolerConfig::from_yaml(SAMPLE).unwrap();
        let sanitized = config.sanitized();
        let DestinationConfig::Http { auth_header, .. } = &sanitized.sinks[1].destination else {
            panic!("expected http destination");
        };
        assert_eq!(auth_header.as_deref(), Some("***"));
        // The original is untouched.
        let DestinationConfig::Http { auth_header, .. } = &config.sinks[1].destination else {
            panic!("expected http destination");
        };
        assert_eq!(auth_header.as_deref(), Some("Bearer s3cret"));
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = SpoolerConfig::load(file.path()).unwrap();
        assert_eq!(config.sinks[0].name, "central");
    }
}
