//! Per-sink configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use domain::event::entity::EventCategory;
use domain::sink::entity::{DeliveryMode, SinkPolicy, SuppressionRule};

use super::common::{ConfigError, default_true};
use crate::constants::DEFAULT_SEND_TIMEOUT_SECS;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SinkConfig {
    pub name: String,

    #[serde(default = "default_true")]
    pub installed: bool,

    #[serde(default = "default_mode")]
    pub mode: DeliveryMode,

    /// Upper bound on one delivery attempt, including connect time.
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,

    pub destination: DestinationConfig,

    #[serde(default)]
    pub suppress: Vec<SuppressRuleConfig>,
}

fn default_mode() -> DeliveryMode {
    DeliveryMode::Immediate
}

fn default_send_timeout_secs() -> u64 {
    DEFAULT_SEND_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DestinationConfig {
    /// Structured log lines on this node.
    Log,
    /// Length-prefixed JSON frames to a TCP collector.
    Tcp { host: String, port: u16 },
    /// JSON POSTs to an HTTP collector endpoint.
    Http {
        url: String,
        #[serde(default)]
        auth_header: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SuppressRuleConfig {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub calling_user_ids: Vec<String>,
}

impl SuppressRuleConfig {
    fn to_rule(&self, sink: &str) -> Result<SuppressionRule, ConfigError> {
        let categories = self
            .categories
            .iter()
            .map(|name| {
                EventCategory::parse_name(name).ok_or_else(|| ConfigError::InvalidValue {
                    field: format!("sinks.{sink}.suppress.categories"),
                    value: name.clone(),
                    expected: "an event category name".to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SuppressionRule {
            categories,
            calling_user_ids: self.calling_user_ids.clone(),
        })
    }
}

impl SinkConfig {
    /// Convert into the policy the pipeline consumes.
    pub fn to_policy(&self) -> Result<SinkPolicy, ConfigError> {
        let suppress = self
            .suppress
            .iter()
            .map(|rule| rule.to_rule(&self.name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SinkPolicy {
            name: self.name.clone(),
            installed: self.installed,
            mode: self.mode,
            send_timeout: Duration::from_secs(self.send_timeout_secs),
            suppress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_sink_config_fills_defaults() {
        let yaml = r"
name: central
destination:
  type: log
";
        let sink: SinkConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(sink.installed);
        assert_eq!(sink.mode, DeliveryMode::Immediate);
        assert_eq!(sink.send_timeout_secs, DEFAULT_SEND_TIMEOUT_SECS);
        assert!(sink.suppress.is_empty());
    }

    #[test]
    fn tagged_destination_variants_parse() {
        let yaml = r"
name: central
mode: aggregate
destination:
  type: tcp
  host: collector.example.org
  port: 6514
";
        let sink: SinkConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(matches!(
            sink.destination,
            DestinationConfig::Tcp { ref host, port: 6514 } if host == "collector.example.org"
        ));
        assert_eq!(sink.mode, DeliveryMode::Aggregate);
    }

    #[test]
    fn suppress_rules_convert_to_policy() {
        let yaml = r"
name: central
destination:
  type: log
suppress:
  - categories: [query, store]
    calling_user_ids: [PACS-PROBE]
";
        let sink: SinkConfig = serde_yaml_ng::from_str(yaml).unwrap();
        let policy = sink.to_policy().unwrap();
        assert_eq!(policy.suppress.len(), 1);
        assert_eq!(
            policy.suppress[0].categories,
            vec![EventCategory::Query, EventCategory::Store]
        );
    }

    #[test]
    fn unknown_suppress_category_is_rejected() {
        let yaml = r"
name: central
destination:
  type: log
suppress:
  - categories: [no-such-thing]
";
        let sink: SinkConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(matches!(
            sink.to_policy(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let yaml = r"
name: central
destination:
  type: log
retries: 5
";
        assert!(serde_yaml_ng::from_str::<SinkConfig>(yaml).is_err());
    }
}
