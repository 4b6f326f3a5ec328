//! Schema-agnostic outbound audit message.
//!
//! The pipeline rebuilds one of these from a spool record at dispatch
//! time; transports serialize it to whatever their collector expects
//! (JSON here — the wire/XML schema of a specific profile is a transport
//! concern).

use serde::{Deserialize, Serialize};

use crate::event::entity::{ActionCode, EventCategory, OutcomeIndicator, ParticipantRole};

/// Event identification block. Outcome and description are recomputed
/// from the spool record's own fields on every build, so re-dispatch of
/// the same file always reconstructs an identical message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventIdentification {
    pub category: EventCategory,
    pub action: ActionCode,
    /// Milliseconds since the UNIX epoch; taken from the spool file's
    /// modified time, i.e. the occurrence time, not the dispatch time.
    pub time_ms: u64,
    pub outcome: OutcomeIndicator,
    pub outcome_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveParticipant {
    pub user_id: String,
    /// Secondary identifier (e.g. the emitting process id).
    pub alt_user_id: Option<String>,
    pub host: Option<String>,
    pub requester: bool,
    pub roles: Vec<ParticipantRole>,
}

impl ActiveParticipant {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            alt_user_id: None,
            host: None,
            requester: false,
            roles: Vec::new(),
        }
    }

    #[must_use]
    pub fn on_host(mut self, host: Option<String>) -> Self {
        self.host = host;
        self
    }

    #[must_use]
    pub fn alt_user_id(mut self, alt: impl Into<String>) -> Self {
        self.alt_user_id = Some(alt.into());
        self
    }

    #[must_use]
    pub fn requester(mut self) -> Self {
        self.requester = true;
        self
    }

    #[must_use]
    pub fn role(mut self, role: ParticipantRole) -> Self {
        self.roles.push(role);
        self
    }

    #[must_use]
    pub fn role_opt(mut self, role: Option<ParticipantRole>) -> Self {
        if let Some(role) = role {
            self.roles.push(role);
        }
        self
    }
}

/// What kind of thing a subject identification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubjectType {
    Patient,
    Study,
    Query,
    Node,
    Task,
    SubmissionSet,
    Configuration,
}

/// Per-class instance rollup inside a study subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SopClassRollup {
    pub class_uid: String,
    pub instance_count: usize,
    /// Individual instance uids; listed only for failure reporting or
    /// multi-study commits, empty otherwise.
    pub instance_uids: Vec<String>,
}

/// Structured description of a study-type subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SubjectDescription {
    pub sop_classes: Vec<SopClassRollup>,
    pub accession_number: Option<String>,
    pub mpps_uids: Vec<String>,
    pub study_uids: Vec<String>,
}

/// Free-form typed detail attached to a subject (raw message bytes,
/// query keys, configuration diffs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectDetail {
    pub kind: String,
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectIdentification {
    pub id: String,
    pub subject_type: SubjectType,
    pub name: Option<String>,
    pub description: Option<SubjectDescription>,
    pub details: Vec<SubjectDetail>,
}

impl SubjectIdentification {
    pub fn new(id: impl Into<String>, subject_type: SubjectType) -> Self {
        Self {
            id: id.into(),
            subject_type,
            name: None,
            description: None,
            details: Vec::new(),
        }
    }

    #[must_use]
    pub fn named(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    #[must_use]
    pub fn described(mut self, description: SubjectDescription) -> Self {
        self.description = Some(description);
        self
    }

    #[must_use]
    pub fn detail(mut self, kind: impl Into<String>, value: Vec<u8>) -> Self {
        if !value.is_empty() {
            self.details.push(SubjectDetail {
                kind: kind.into(),
                value,
            });
        }
        self
    }
}

/// The audit node this message originates from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSource {
    pub device_name: String,
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditMessage {
    pub event: EventIdentification,
    pub participants: Vec<ActiveParticipant>,
    pub subjects: Vec<SubjectIdentification>,
    pub source: AuditSource,
}

/// Local context a message builder needs beyond the spool record itself.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub device_name: String,
    pub local_host: String,
    pub process_id: String,
    /// Occurrence time (spool file mtime) in ms since the UNIX epoch.
    pub event_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_builder_chains() {
        let p = ActiveParticipant::new("STORESCU")
            .on_host(Some("modality1".to_string()))
            .requester()
            .role(ParticipantRole::Source);
        assert!(p.requester);
        assert_eq!(p.roles, vec![ParticipantRole::Source]);
        assert_eq!(p.host.as_deref(), Some("modality1"));
    }

    #[test]
    fn empty_subject_detail_is_dropped() {
        let s = SubjectIdentification::new("P1", SubjectType::Patient).detail("message", vec![]);
        assert!(s.details.is_empty());
    }

    #[test]
    fn message_serializes_to_json() {
        let msg = AuditMessage {
            event: EventIdentification {
                category: EventCategory::Store,
                action: ActionCode::Create,
                time_ms: 1_700_000_000_000,
                outcome: OutcomeIndicator::Success,
                outcome_description: None,
            },
            participants: vec![ActiveParticipant::new("STORESCU").requester()],
            subjects: vec![SubjectIdentification::new("1.2.3", SubjectType::Study)],
            source: AuditSource {
                device_name: "archive1".to_string(),
                host: "archive1.example.org".to_string(),
            },
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"category\":\"store\""));
        assert!(json.contains("\"action\":\"Create\""));
    }
}
