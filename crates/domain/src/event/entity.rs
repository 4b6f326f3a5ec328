use serde::{Deserialize, Serialize};

/// The audit event category an occurrence is classified into.
///
/// The enumeration is closed: every occurrence kind maps to exactly one
/// category, and every category has a registered message builder (checked
/// at pipeline construction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventCategory {
    ApplicationActivity,
    ConnectionFailure,
    Store,
    Retrieve,
    Deletion,
    Query,
    PatientRecord,
    ProcedureRecord,
    ProvideAndRegister,
    StorageCommitment,
    ExternalRetrieve,
    ConfigurationChange,
    QueueEvent,
    Mismatch,
    AssociationFailure,
}

impl EventCategory {
    /// Every category, in a fixed order. Used for registry completeness
    /// checks and for metrics label enumeration.
    pub const ALL: [EventCategory; 15] = [
        Self::ApplicationActivity,
        Self::ConnectionFailure,
        Self::Store,
        Self::Retrieve,
        Self::Deletion,
        Self::Query,
        Self::PatientRecord,
        Self::ProcedureRecord,
        Self::ProvideAndRegister,
        Self::StorageCommitment,
        Self::ExternalRetrieve,
        Self::ConfigurationChange,
        Self::QueueEvent,
        Self::Mismatch,
        Self::AssociationFailure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationActivity => "application-activity",
            Self::ConnectionFailure => "connection-failure",
            Self::Store => "store",
            Self::Retrieve => "retrieve",
            Self::Deletion => "deletion",
            Self::Query => "query",
            Self::PatientRecord => "patient-record",
            Self::ProcedureRecord => "procedure-record",
            Self::ProvideAndRegister => "provide-and-register",
            Self::StorageCommitment => "storage-commitment",
            Self::ExternalRetrieve => "external-retrieve",
            Self::ConfigurationChange => "configuration-change",
            Self::QueueEvent => "queue-event",
            Self::Mismatch => "mismatch",
            Self::AssociationFailure => "association-failure",
        }
    }

    /// Parse a category name. Returns `None` for unrecognized values;
    /// spool filenames are the main input here and may be foreign.
    pub fn parse_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Recover the category from a spool filename, which starts with the
    /// category name followed by `-` and the rest of the identity.
    /// Category names themselves contain `-`, so the longest matching
    /// prefix wins.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|c| {
                name.strip_prefix(c.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
            })
            .max_by_key(|c| c.as_str().len())
    }

    /// The action code a record of this category carries unless the
    /// spooled record says otherwise (patient/procedure records vary by
    /// subtype and store the actual code in their main record).
    pub fn default_action(self) -> ActionCode {
        match self {
            Self::Store => ActionCode::Create,
            Self::Retrieve
            | Self::ProvideAndRegister
            | Self::StorageCommitment
            | Self::Mismatch => ActionCode::Read,
            Self::Deletion => ActionCode::Delete,
            Self::ConfigurationChange => ActionCode::Update,
            Self::ApplicationActivity
            | Self::ConnectionFailure
            | Self::Query
            | Self::PatientRecord
            | Self::ProcedureRecord
            | Self::ExternalRetrieve
            | Self::QueueEvent
            | Self::AssociationFailure => ActionCode::Execute,
        }
    }

    /// Whether spool files of this category carry a raw binary payload
    /// tail after the main record line (query keys, message + ack bytes,
    /// configuration diff). Payload-carrying categories never hold
    /// detail records; the spool reader relies on this to locate the
    /// text/binary boundary.
    pub fn carries_payload(self) -> bool {
        matches!(
            self,
            Self::Query | Self::PatientRecord | Self::ProcedureRecord | Self::ConfigurationChange
        )
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DICOM-style event action code carried in the emitted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionCode {
    Create,
    Read,
    Update,
    Delete,
    Execute,
}

impl ActionCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "C",
            Self::Read => "R",
            Self::Update => "U",
            Self::Delete => "D",
            Self::Execute => "E",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "C" => Some(Self::Create),
            "R" => Some(Self::Read),
            "U" => Some(Self::Update),
            "D" => Some(Self::Delete),
            "E" => Some(Self::Execute),
            _ => None,
        }
    }
}

/// Role tag attached to an active participant of the emitted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipantRole {
    Application,
    ApplicationLauncher,
    Source,
    Destination,
}

/// Outcome indicator of the emitted message. Numeric values follow the
/// audit trail convention (0 success, 4/8/12 escalating failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeIndicator {
    Success,
    MinorFailure,
    SeriousFailure,
    MajorFailure,
}

impl OutcomeIndicator {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::MinorFailure => 4,
            Self::SeriousFailure => 8,
            Self::MajorFailure => 12,
        }
    }
}

/// Immutable classification result for one occurrence.
///
/// Created once by [`Occurrence::classify`] and carried unchanged through
/// spooling and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDescriptor {
    pub category: EventCategory,
    pub action: ActionCode,
    pub source_role: Option<ParticipantRole>,
    pub destination_role: Option<ParticipantRole>,
    pub outcome: OutcomeIndicator,
}

/// The remote/local actor pair of a transfer-style exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSession {
    /// Remote application entity or authenticated web user.
    pub calling_user_id: String,
    pub calling_host: Option<String>,
    /// Local application entity title or request URI.
    pub called_user_id: String,
}

/// A user (or service) that triggered an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub user_id: String,
    pub host: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRef {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRef {
    pub uid: String,
    pub accession_number: Option<String>,
    pub date: Option<String>,
}

/// One stored/retrieved/committed composite instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRef {
    pub sop_class_uid: String,
    pub sop_instance_uid: String,
    pub mpps_uid: Option<String>,
    /// Per-instance failure text, if this particular sub-operation failed.
    pub outcome: Option<String>,
    pub error_code: Option<String>,
}

/// Raw request/response bytes of a message exchange (e.g. an HL7-style
/// patient feed), preserved verbatim in the spool file and the emitted
/// message detail section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageExchange {
    pub sender: String,
    pub receiver: String,
    /// `true` when this archive originated the message (forwarding),
    /// `false` for an inbound feed.
    pub outgoing: bool,
    pub message: Vec<u8>,
    pub ack: Vec<u8>,
}

/// Subtype of a record-level occurrence (patient or procedure record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordAction {
    Create,
    Read,
    Update,
    Delete,
}

/// Operator action on a queued background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskOperation {
    Cancel,
    Reschedule,
    Delete,
}

impl TaskOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Reschedule => "reschedule",
            Self::Delete => "delete",
        }
    }
}

/// How a query reached the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryKind {
    /// Association-based query; the matching keys travel as a binary
    /// payload in the spool file.
    Dicom { sop_class_uid: String, keys: Vec<u8> },
    /// Web query; the full query string is a plain field.
    Web { method: String, query_string: String },
}

/// A domain event that must produce an audit trail entry.
///
/// Field values arrive pre-flattened: payload parsing (image metadata,
/// message segments) happens upstream. The enumeration is closed — adding
/// a variant without extending [`Occurrence::classify`] and
/// [`Occurrence::to_spool_record`] is a compile error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occurrence {
    ApplicationStart {
        device_name: String,
        requester: Option<Requester>,
    },
    ApplicationStop {
        device_name: String,
        requester: Option<Requester>,
    },
    ConnectionFailure {
        device_name: String,
        remote_host: String,
        reason: String,
    },
    AssociationFailure {
        session: TransferSession,
        reason: String,
    },
    /// One composite instance received over one store session. Instances
    /// of the same study from the same actor pair merge into one spool
    /// unit.
    InstancesStored {
        session: TransferSession,
        study: StudyRef,
        patient: PatientRef,
        instance: InstanceRef,
        warning: Option<String>,
    },
    /// One instance served over a web retrieve. Mergeable like stores.
    WadoRetrieved {
        session: TransferSession,
        study: StudyRef,
        patient: PatientRef,
        instance: InstanceRef,
        outcome: Option<String>,
    },
    /// A completed batch retrieve (C-MOVE style): all sub-operations are
    /// known at once, so the batch spools as a single unit.
    Retrieved {
        session: TransferSession,
        destination_user_id: String,
        destination_host: Option<String>,
        study: StudyRef,
        patient: PatientRef,
        instances: Vec<InstanceRef>,
        outcome: Option<String>,
        warning: Option<String>,
    },
    /// Instances or a whole study rejected/deleted. `requester` is `None`
    /// when the scheduler (retention policy) triggered the deletion.
    Deletion {
        requester: Option<Requester>,
        device_name: String,
        session: Option<TransferSession>,
        study: StudyRef,
        patient: PatientRef,
        instances: Vec<InstanceRef>,
        outcome: Option<String>,
    },
    Query {
        session: TransferSession,
        kind: QueryKind,
    },
    PatientRecord {
        action: RecordAction,
        session: TransferSession,
        patient: PatientRef,
        exchange: Option<MessageExchange>,
        outcome: Option<String>,
    },
    ProcedureRecord {
        action: RecordAction,
        session: TransferSession,
        study: StudyRef,
        patient: Option<PatientRef>,
        exchange: Option<MessageExchange>,
        outcome: Option<String>,
    },
    ProvideAndRegister {
        session: TransferSession,
        destination_user_id: String,
        destination_host: Option<String>,
        patient: PatientRef,
        submission_set_uid: String,
        outcome: Option<String>,
    },
    /// Result of one storage commitment transaction. Failed and successful
    /// item sets arrive as separate occurrences sharing a transaction uid.
    StorageCommitment {
        session: TransferSession,
        transaction_uid: String,
        patient: PatientRef,
        study_uids: Vec<String>,
        instances: Vec<InstanceRef>,
        outcome: Option<String>,
    },
    /// A move of instances between two remote nodes, orchestrated here.
    ExternalRetrieve {
        requester: Requester,
        request_uri: String,
        remote_user_id: String,
        remote_host: Option<String>,
        destination_user_id: String,
        study: StudyRef,
        outcome: Option<String>,
        warning: Option<String>,
    },
    ConfigurationChange {
        device_name: String,
        requester: Option<Requester>,
        diff: String,
    },
    QueueEvent {
        requester: Requester,
        operation: TaskOperation,
        queue_name: String,
        task_id: String,
        outcome: Option<String>,
    },
    /// Received data contradicting the patient identity on file.
    PatientMismatch {
        session: TransferSession,
        study: StudyRef,
        patient: PatientRef,
        mismatch_code: String,
    },
}

impl Occurrence {
    /// Classify this occurrence into an immutable [`EventDescriptor`].
    ///
    /// Total over the enumeration: the match has no default arm, so an
    /// unhandled variant fails the build rather than surfacing at runtime.
    pub fn classify(&self) -> EventDescriptor {
        use EventCategory as C;
        use ParticipantRole as R;
        let outcome = if self.failed() {
            OutcomeIndicator::MinorFailure
        } else {
            OutcomeIndicator::Success
        };
        match self {
            Self::ApplicationStart { requester, .. } | Self::ApplicationStop { requester, .. } => {
                EventDescriptor {
                    category: C::ApplicationActivity,
                    action: ActionCode::Execute,
                    source_role: requester.as_ref().map(|_| R::ApplicationLauncher),
                    destination_role: Some(R::Application),
                    outcome,
                }
            }
            Self::ConnectionFailure { .. } => EventDescriptor {
                category: C::ConnectionFailure,
                action: ActionCode::Execute,
                source_role: Some(R::Source),
                destination_role: Some(R::Destination),
                outcome: OutcomeIndicator::MinorFailure,
            },
            Self::AssociationFailure { .. } => EventDescriptor {
                category: C::AssociationFailure,
                action: ActionCode::Execute,
                source_role: Some(R::Source),
                destination_role: Some(R::Destination),
                outcome: OutcomeIndicator::MinorFailure,
            },
            Self::InstancesStored { .. } => EventDescriptor {
                category: C::Store,
                action: ActionCode::Create,
                source_role: Some(R::Source),
                destination_role: Some(R::Destination),
                outcome,
            },
            Self::WadoRetrieved { .. } | Self::Retrieved { .. } => EventDescriptor {
                category: C::Retrieve,
                action: ActionCode::Read,
                source_role: Some(R::Source),
                destination_role: Some(R::Destination),
                outcome,
            },
            Self::Deletion { requester, .. } => EventDescriptor {
                category: C::Deletion,
                action: ActionCode::Delete,
                source_role: requester.as_ref().map(|_| R::Source),
                destination_role: Some(R::Destination),
                outcome,
            },
            Self::Query { .. } => EventDescriptor {
                category: C::Query,
                action: ActionCode::Execute,
                source_role: Some(R::Source),
                destination_role: Some(R::Destination),
                outcome,
            },
            Self::PatientRecord { action, .. } => EventDescriptor {
                category: C::PatientRecord,
                action: record_action_code(*action),
                source_role: Some(R::Source),
                destination_role: Some(R::Destination),
                outcome,
            },
            Self::ProcedureRecord { action, .. } => EventDescriptor {
                category: C::ProcedureRecord,
                action: record_action_code(*action),
                source_role: Some(R::Source),
                destination_role: Some(R::Destination),
                outcome,
            },
            Self::ProvideAndRegister { .. } => EventDescriptor {
                category: C::ProvideAndRegister,
                action: ActionCode::Read,
                source_role: Some(R::Source),
                destination_role: Some(R::Destination),
                outcome,
            },
            Self::StorageCommitment { .. } => EventDescriptor {
                category: C::StorageCommitment,
                action: ActionCode::Read,
                source_role: Some(R::Source),
                destination_role: Some(R::Destination),
                outcome,
            },
            Self::ExternalRetrieve { .. } => EventDescriptor {
                category: C::ExternalRetrieve,
                action: ActionCode::Execute,
                source_role: Some(R::Source),
                destination_role: Some(R::Destination),
                outcome,
            },
            Self::ConfigurationChange { .. } => EventDescriptor {
                category: C::ConfigurationChange,
                action: ActionCode::Update,
                source_role: None,
                destination_role: Some(R::Application),
                outcome,
            },
            Self::QueueEvent { .. } => EventDescriptor {
                category: C::QueueEvent,
                action: ActionCode::Execute,
                source_role: Some(R::Source),
                destination_role: Some(R::Destination),
                outcome,
            },
            Self::PatientMismatch { .. } => EventDescriptor {
                category: C::Mismatch,
                action: ActionCode::Read,
                source_role: Some(R::Source),
                destination_role: Some(R::Destination),
                outcome: OutcomeIndicator::MinorFailure,
            },
        }
    }

    /// Whether the occurrence carries a failure outcome. Drives both the
    /// descriptor's default outcome and the `-ERR` aggregation isolation
    /// marker.
    pub fn failed(&self) -> bool {
        match self {
            Self::ConnectionFailure { .. }
            | Self::AssociationFailure { .. }
            | Self::PatientMismatch { .. } => true,
            Self::ApplicationStart { .. }
            | Self::ApplicationStop { .. }
            | Self::Query { .. } => false,
            Self::InstancesStored { instance, .. } => instance.outcome.is_some(),
            Self::WadoRetrieved { outcome, .. }
            | Self::Retrieved { outcome, .. }
            | Self::Deletion { outcome, .. }
            | Self::PatientRecord { outcome, .. }
            | Self::ProcedureRecord { outcome, .. }
            | Self::ProvideAndRegister { outcome, .. }
            | Self::StorageCommitment { outcome, .. }
            | Self::ExternalRetrieve { outcome, .. }
            | Self::QueueEvent { outcome, .. } => outcome.is_some(),
            Self::ConfigurationChange { .. } => false,
        }
    }

    /// The remote/requesting user id, when the occurrence has one.
    /// Suppression rules match against this value.
    pub fn calling_user_id(&self) -> Option<&str> {
        match self {
            Self::ApplicationStart { requester, .. }
            | Self::ApplicationStop { requester, .. }
            | Self::ConfigurationChange { requester, .. }
            | Self::Deletion { requester, .. } => requester.as_ref().map(|r| r.user_id.as_str()),
            Self::ConnectionFailure { .. } => None,
            Self::AssociationFailure { session, .. }
            | Self::InstancesStored { session, .. }
            | Self::WadoRetrieved { session, .. }
            | Self::Retrieved { session, .. }
            | Self::Query { session, .. }
            | Self::PatientRecord { session, .. }
            | Self::ProcedureRecord { session, .. }
            | Self::ProvideAndRegister { session, .. }
            | Self::StorageCommitment { session, .. }
            | Self::PatientMismatch { session, .. } => Some(session.calling_user_id.as_str()),
            Self::ExternalRetrieve { requester, .. } | Self::QueueEvent { requester, .. } => {
                Some(requester.user_id.as_str())
            }
        }
    }
}

fn record_action_code(action: RecordAction) -> ActionCode {
    match action {
        RecordAction::Create => ActionCode::Create,
        RecordAction::Read => ActionCode::Read,
        RecordAction::Update => ActionCode::Update,
        RecordAction::Delete => ActionCode::Delete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TransferSession {
        TransferSession {
            calling_user_id: "STORESCU".to_string(),
            calling_host: Some("modality1".to_string()),
            called_user_id: "ARCHIVE".to_string(),
        }
    }

    fn instance(outcome: Option<&str>) -> InstanceRef {
        InstanceRef {
            sop_class_uid: "1.2.840.10008.5.1.4.1.1.2".to_string(),
            sop_instance_uid: "1.2.3.4.5".to_string(),
            mpps_uid: None,
            outcome: outcome.map(str::to_string),
            error_code: None,
        }
    }

    #[test]
    fn store_classifies_as_create() {
        let occ = Occurrence::InstancesStored {
            session: session(),
            study: StudyRef {
                uid: "1.2.3".to_string(),
                accession_number: None,
                date: None,
            },
            patient: PatientRef {
                id: "P1".to_string(),
                name: None,
            },
            instance: instance(None),
            warning: None,
        };
        let d = occ.classify();
        assert_eq!(d.category, EventCategory::Store);
        assert_eq!(d.action, ActionCode::Create);
        assert_eq!(d.outcome, OutcomeIndicator::Success);
    }

    #[test]
    fn failed_store_classifies_as_minor_failure() {
        let occ = Occurrence::InstancesStored {
            session: session(),
            study: StudyRef {
                uid: "1.2.3".to_string(),
                accession_number: None,
                date: None,
            },
            patient: PatientRef {
                id: "P1".to_string(),
                name: None,
            },
            instance: instance(Some("out of disk space")),
            warning: None,
        };
        assert!(occ.failed());
        assert_eq!(occ.classify().outcome, OutcomeIndicator::MinorFailure);
    }

    #[test]
    fn patient_record_action_follows_subtype() {
        for (action, expected) in [
            (RecordAction::Create, ActionCode::Create),
            (RecordAction::Read, ActionCode::Read),
            (RecordAction::Update, ActionCode::Update),
            (RecordAction::Delete, ActionCode::Delete),
        ] {
            let occ = Occurrence::PatientRecord {
                action,
                session: session(),
                patient: PatientRef {
                    id: "P1".to_string(),
                    name: None,
                },
                exchange: None,
                outcome: None,
            };
            assert_eq!(occ.classify().action, expected);
            assert_eq!(occ.classify().category, EventCategory::PatientRecord);
        }
    }

    #[test]
    fn scheduler_deletion_has_no_source_role() {
        let occ = Occurrence::Deletion {
            requester: None,
            device_name: "archive1".to_string(),
            session: None,
            study: StudyRef {
                uid: "1.2.3".to_string(),
                accession_number: None,
                date: None,
            },
            patient: PatientRef {
                id: "P1".to_string(),
                name: None,
            },
            instances: vec![instance(None)],
            outcome: None,
        };
        let d = occ.classify();
        assert_eq!(d.category, EventCategory::Deletion);
        assert_eq!(d.action, ActionCode::Delete);
        assert!(d.source_role.is_none());
    }

    #[test]
    fn connection_failure_is_always_a_failure() {
        let occ = Occurrence::ConnectionFailure {
            device_name: "archive1".to_string(),
            remote_host: "10.0.0.9".to_string(),
            reason: "TLS handshake rejected".to_string(),
        };
        assert!(occ.failed());
        assert_eq!(occ.classify().outcome, OutcomeIndicator::MinorFailure);
        assert!(occ.calling_user_id().is_none());
    }

    #[test]
    fn category_names_round_trip() {
        for category in EventCategory::ALL {
            assert_eq!(EventCategory::parse_name(category.as_str()), Some(category));
        }
        assert_eq!(EventCategory::parse_name("no-such-category"), None);
    }

    #[test]
    fn payload_categories_are_the_exchange_shaped_ones() {
        let with_payload: Vec<_> = EventCategory::ALL
            .into_iter()
            .filter(|c| c.carries_payload())
            .collect();
        assert_eq!(
            with_payload,
            vec![
                EventCategory::Query,
                EventCategory::PatientRecord,
                EventCategory::ProcedureRecord,
                EventCategory::ConfigurationChange,
            ]
        );
    }

    #[test]
    fn category_is_recovered_from_filenames() {
        assert_eq!(
            EventCategory::from_file_name("store-STORESCU-ARCHIVE-1.2.3"),
            Some(EventCategory::Store)
        );
        assert_eq!(
            EventCategory::from_file_name("storage-commitment-A-B-1.2.3-ERR"),
            Some(EventCategory::StorageCommitment)
        );
        assert_eq!(
            EventCategory::from_file_name("external-retrieve-00000001"),
            Some(EventCategory::ExternalRetrieve)
        );
        assert_eq!(
            EventCategory::from_file_name("connection-failure"),
            Some(EventCategory::ConnectionFailure)
        );
        assert_eq!(EventCategory::from_file_name("storefront-x"), None);
        assert_eq!(EventCategory::from_file_name("garbage"), None);
    }

    #[test]
    fn outcome_indicator_values() {
        assert_eq!(OutcomeIndicator::Success.as_u8(), 0);
        assert_eq!(OutcomeIndicator::MinorFailure.as_u8(), 4);
        assert_eq!(OutcomeIndicator::SeriousFailure.as_u8(), 8);
        assert_eq!(OutcomeIndicator::MajorFailure.as_u8(), 12);
    }

    #[test]
    fn suppression_key_is_the_session_caller() {
        let occ = Occurrence::Query {
            session: session(),
            kind: QueryKind::Web {
                method: "searchForStudies".to_string(),
                query_string: "/studies?PatientID=P1".to_string(),
            },
        };
        assert_eq!(occ.calling_user_id(), Some("STORESCU"));
    }
}
