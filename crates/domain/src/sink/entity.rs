use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::event::entity::{EventCategory, EventDescriptor};

/// Per-sink delivery policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Dispatch inline right after spooling a closed (non-mergeable)
    /// unit. Mergeable units still wait for a flush.
    Immediate,
    /// Only ever append; an external flush trigger drains the backlog.
    Aggregate,
}

/// Pre-spool suppression rule. An empty list matches anything, so a rule
/// with both lists empty suppresses every occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuppressionRule {
    pub categories: Vec<EventCategory>,
    pub calling_user_ids: Vec<String>,
}

impl SuppressionRule {
    pub fn matches(&self, descriptor: &EventDescriptor, calling_user_id: Option<&str>) -> bool {
        let category_matches =
            self.categories.is_empty() || self.categories.contains(&descriptor.category);
        let caller_matches = self.calling_user_ids.is_empty()
            || calling_user_id
                .is_some_and(|caller| self.calling_user_ids.iter().any(|c| c == caller));
        category_matches && caller_matches
    }
}

/// Everything the pipeline needs to know about one configured sink.
#[derive(Debug, Clone)]
pub struct SinkPolicy {
    pub name: String,
    pub installed: bool,
    pub mode: DeliveryMode,
    pub send_timeout: Duration,
    pub suppress: Vec<SuppressionRule>,
}

impl SinkPolicy {
    /// Whether an occurrence must not be spooled for this sink at all.
    pub fn suppresses(&self, descriptor: &EventDescriptor, calling_user_id: Option<&str>) -> bool {
        self.suppress
            .iter()
            .any(|rule| rule.matches(descriptor, calling_user_id))
    }
}
