//! Default message builders, one per event category.
//!
//! Each builder reconstructs the outbound message purely from the spool
//! record and the local build context. Outcome indicator and description
//! are recomputed from the record's own fields on every call, so a
//! rebuild after a failed delivery yields an identical message.

use std::collections::{BTreeMap, BTreeSet};

use domain::event::entity::{ActionCode, EventCategory, OutcomeIndicator, ParticipantRole};
use domain::message::entity::{
    ActiveParticipant, AuditMessage, AuditSource, BuildContext, EventIdentification,
    SopClassRollup, SubjectDescription, SubjectIdentification, SubjectType,
};
use domain::message::error::DispatchError;
use domain::record::fields::{AuditInfo, FieldKey};
use domain::record::spool_record::SpoolRecord;
use ports::secondary::message_builder::MessageBuilder;

/// Application start/stop.
pub struct ActivityBuilder;

impl MessageBuilder for ActivityBuilder {
    fn build(
        &self,
        record: &SpoolRecord,
        ctx: &BuildContext,
    ) -> Result<AuditMessage, DispatchError> {
        let mut participants = vec![local_participant(&record.main, ctx)
            .role(ParticipantRole::Application)];
        if let Some(calling) = remote_participant(&record.main) {
            participants.push(calling.role(ParticipantRole::ApplicationLauncher));
        }
        Ok(message(
            EventCategory::ApplicationActivity,
            record,
            ctx,
            participants,
            vec![],
        ))
    }
}

/// Connection and association failures: the subject is the remote node.
pub struct NetworkFailureBuilder {
    pub category: EventCategory,
}

impl MessageBuilder for NetworkFailureBuilder {
    fn build(
        &self,
        record: &SpoolRecord,
        ctx: &BuildContext,
    ) -> Result<AuditMessage, DispatchError> {
        let mut participants = Vec::new();
        if let Some(calling) = remote_participant(&record.main) {
            participants.push(calling.role(ParticipantRole::Source));
        }
        participants.push(local_participant(&record.main, ctx).role(ParticipantRole::Destination));
        let subjects = record
            .main
            .get(FieldKey::CallingHost)
            .map(|host| vec![SubjectIdentification::new(host, SubjectType::Node)])
            .unwrap_or_default();
        Ok(message(self.category, record, ctx, participants, subjects))
    }
}

/// Store, WADO retrieve, and batch retrieve.
pub struct TransferBuilder {
    pub category: EventCategory,
}

impl MessageBuilder for TransferBuilder {
    fn build(
        &self,
        record: &SpoolRecord,
        ctx: &BuildContext,
    ) -> Result<AuditMessage, DispatchError> {
        let main = &record.main;
        let mut participants = transfer_participants(main, ctx);
        if let Some(destination) = main.get(FieldKey::DestinationUserId) {
            participants.push(
                ActiveParticipant::new(destination)
                    .on_host(main.get(FieldKey::DestinationNapId).map(str::to_string))
                    .role(ParticipantRole::Destination),
            );
        }
        // Individual instance uids are reported only for failures.
        let failed = has_failure(record);
        let mut subjects = vec![study_subject(main, rollup(record, failed))];
        subjects.extend(patient_subject(main));
        Ok(message(self.category, record, ctx, participants, subjects))
    }
}

/// User- or scheduler-triggered deletion.
pub struct DeletionBuilder;

impl MessageBuilder for DeletionBuilder {
    fn build(
        &self,
        record: &SpoolRecord,
        ctx: &BuildContext,
    ) -> Result<AuditMessage, DispatchError> {
        let main = &record.main;
        let participants = transfer_participants(main, ctx);
        let mut subjects = vec![study_subject(main, rollup(record, has_failure(record)))];
        subjects.extend(patient_subject(main));
        Ok(message(
            EventCategory::Deletion,
            record,
            ctx,
            participants,
            subjects,
        ))
    }
}

/// DICOM and web queries; the matching keys or query string ride along
/// as a subject detail.
pub struct QueryBuilder;

impl MessageBuilder for QueryBuilder {
    fn build(
        &self,
        record: &SpoolRecord,
        ctx: &BuildContext,
    ) -> Result<AuditMessage, DispatchError> {
        let main = &record.main;
        let participants = transfer_participants(main, ctx);
        let poid = main
            .get(FieldKey::QueryPoid)
            .ok_or_else(|| DispatchError::Build("query record has no POID".to_string()))?;
        let mut subject = SubjectIdentification::new(poid, SubjectType::Query);
        subject = match main.get(FieldKey::QueryString) {
            Some(query_string) => subject.detail("query-string", query_string.as_bytes().to_vec()),
            None => {
                let keys = record.attachments.first().cloned().unwrap_or_default();
                subject.detail("query-keys", keys)
            }
        };
        Ok(message(
            EventCategory::Query,
            record,
            ctx,
            participants,
            vec![subject],
        ))
    }
}

/// Patient record create/read/update/delete, with optional raw message
/// exchange bytes as subject details.
pub struct PatientRecordBuilder;

impl MessageBuilder for PatientRecordBuilder {
    fn build(
        &self,
        record: &SpoolRecord,
        ctx: &BuildContext,
    ) -> Result<AuditMessage, DispatchError> {
        let main = &record.main;
        let mut participants = transfer_participants(main, ctx);
        participants.extend(exchange_participants(main));
        let patient = patient_subject(main).ok_or_else(|| {
            DispatchError::Build("patient record without patient id".to_string())
        })?;
        let subject = with_exchange_details(patient, record);
        Ok(message(
            EventCategory::PatientRecord,
            record,
            ctx,
            participants,
            vec![subject],
        ))
    }
}

/// Procedure record create/update/delete.
pub struct ProcedureRecordBuilder;

impl MessageBuilder for ProcedureRecordBuilder {
    fn build(
        &self,
        record: &SpoolRecord,
        ctx: &BuildContext,
    ) -> Result<AuditMessage, DispatchError> {
        let main = &record.main;
        let mut participants = transfer_participants(main, ctx);
        participants.extend(exchange_participants(main));
        let study = with_exchange_details(
            study_subject(
                main,
                SubjectDescription {
                    accession_number: main.get(FieldKey::AccessionNumber).map(str::to_string),
                    ..SubjectDescription::default()
                },
            ),
            record,
        );
        let mut subjects = vec![study];
        subjects.extend(patient_subject(main));
        Ok(message(
            EventCategory::ProcedureRecord,
            record,
            ctx,
            participants,
            subjects,
        ))
    }
}

/// Export to an XDS-style repository.
pub struct ProvideAndRegisterBuilder;

impl MessageBuilder for ProvideAndRegisterBuilder {
    fn build(
        &self,
        record: &SpoolRecord,
        ctx: &BuildContext,
    ) -> Result<AuditMessage, DispatchError> {
        let main = &record.main;
        let mut participants = transfer_participants(main, ctx);
        if let Some(destination) = main.get(FieldKey::DestinationUserId) {
            participants.push(
                ActiveParticipant::new(destination)
                    .on_host(main.get(FieldKey::DestinationNapId).map(str::to_string))
                    .role(ParticipantRole::Destination),
            );
        }
        let submission_set = main
            .get(FieldKey::SubmissionSetUid)
            .ok_or_else(|| DispatchError::Build("export without submission set uid".to_string()))?;
        let mut subjects = vec![SubjectIdentification::new(
            submission_set,
            SubjectType::SubmissionSet,
        )];
        subjects.extend(patient_subject(main));
        Ok(message(
            EventCategory::ProvideAndRegister,
            record,
            ctx,
            participants,
            subjects,
        ))
    }
}

/// Storage commitment result batches.
pub struct StorageCommitmentBuilder;

impl MessageBuilder for StorageCommitmentBuilder {
    fn build(
        &self,
        record: &SpoolRecord,
        ctx: &BuildContext,
    ) -> Result<AuditMessage, DispatchError> {
        let main = &record.main;
        let participants = transfer_participants(main, ctx);
        let study_uids: Vec<String> = main
            .get(FieldKey::StudyUid)
            .map(|joined| joined.split(';').map(str::to_string).collect())
            .unwrap_or_default();
        let first = study_uids
            .first()
            .cloned()
            .ok_or_else(|| DispatchError::Build("commitment without study uids".to_string()))?;
        // Instance uids are listed when the commit failed or spans
        // several studies; otherwise per-class counts suffice.
        let show_uids = has_failure(record) || study_uids.len() > 1;
        let mut description = rollup(record, show_uids);
        description.study_uids = study_uids;
        let mut subjects = vec![study_subject_with_id(&first, main, description)];
        subjects.extend(patient_subject(main));
        Ok(message(
            EventCategory::StorageCommitment,
            record,
            ctx,
            participants,
            subjects,
        ))
    }
}

/// Retrieve orchestrated between two remote nodes.
pub struct ExternalRetrieveBuilder;

impl MessageBuilder for ExternalRetrieveBuilder {
    fn build(
        &self,
        record: &SpoolRecord,
        ctx: &BuildContext,
    ) -> Result<AuditMessage, DispatchError> {
        let main = &record.main;
        let mut participants = Vec::new();
        if let Some(requester) = remote_participant(main) {
            participants.push(requester);
        }
        if let Some(move_uri) = main.get(FieldKey::MoveUserId) {
            participants.push(
                ActiveParticipant::new(move_uri)
                    .on_host(Some(ctx.local_host.clone()))
                    .alt_user_id(ctx.process_id.clone()),
            );
        }
        if let Some(remote) = main.get(FieldKey::CalledUserId) {
            participants.push(
                ActiveParticipant::new(remote)
                    .on_host(main.get(FieldKey::CalledHost).map(str::to_string))
                    .role(ParticipantRole::Source),
            );
        }
        if let Some(destination) = main.get(FieldKey::DestinationUserId) {
            participants.push(
                ActiveParticipant::new(destination).role(ParticipantRole::Destination),
            );
        }
        let mut subjects = Vec::new();
        if let Some(study_uid) = main.get(FieldKey::StudyUid) {
            subjects.push(SubjectIdentification::new(study_uid, SubjectType::Study));
        }
        Ok(message(
            EventCategory::ExternalRetrieve,
            record,
            ctx,
            participants,
            subjects,
        ))
    }
}

/// Software configuration change, diff attached as a subject detail.
pub struct ConfigurationChangeBuilder;

impl MessageBuilder for ConfigurationChangeBuilder {
    fn build(
        &self,
        record: &SpoolRecord,
        ctx: &BuildContext,
    ) -> Result<AuditMessage, DispatchError> {
        let main = &record.main;
        let mut participants = vec![local_participant(main, ctx).role(ParticipantRole::Application)];
        if let Some(calling) = remote_participant(main) {
            participants.push(calling);
        }
        let diff = record.attachments.first().cloned().unwrap_or_default();
        let subject = SubjectIdentification::new(&ctx.device_name, SubjectType::Configuration)
            .detail("configuration-diff", diff);
        Ok(message(
            EventCategory::ConfigurationChange,
            record,
            ctx,
            participants,
            vec![subject],
        ))
    }
}

/// Operator action on a queued background task.
pub struct QueueEventBuilder;

impl MessageBuilder for QueueEventBuilder {
    fn build(
        &self,
        record: &SpoolRecord,
        ctx: &BuildContext,
    ) -> Result<AuditMessage, DispatchError> {
        let main = &record.main;
        let mut participants = Vec::new();
        if let Some(requester) = remote_participant(main) {
            participants.push(requester.role(ParticipantRole::Source));
        }
        participants.push(local_participant(main, ctx).role(ParticipantRole::Destination));
        let task_id = main
            .get(FieldKey::TaskId)
            .ok_or_else(|| DispatchError::Build("queue event without task id".to_string()))?;
        let operation = main.get(FieldKey::TaskOperation).unwrap_or_default();
        let subject = SubjectIdentification::new(task_id, SubjectType::Task)
            .named(main.get(FieldKey::QueueName).map(str::to_string))
            .detail("task-operation", operation.as_bytes().to_vec());
        Ok(message(
            EventCategory::QueueEvent,
            record,
            ctx,
            participants,
            vec![subject],
        ))
    }
}

/// Received data contradicting the patient identity on file.
pub struct MismatchBuilder;

impl MessageBuilder for MismatchBuilder {
    fn build(
        &self,
        record: &SpoolRecord,
        ctx: &BuildContext,
    ) -> Result<AuditMessage, DispatchError> {
        let main = &record.main;
        let participants = transfer_participants(main, ctx);
        let mut subjects = Vec::new();
        if let Some(study_uid) = main.get(FieldKey::StudyUid) {
            subjects.push(SubjectIdentification::new(study_uid, SubjectType::Study));
        }
        subjects.extend(patient_subject(main));
        let mut message = message(EventCategory::Mismatch, record, ctx, participants, subjects);
        // A mismatch is a failure by definition; the code is its outcome.
        message.event.outcome = OutcomeIndicator::MinorFailure;
        if message.event.outcome_description.is_none() {
            message.event.outcome_description =
                main.get(FieldKey::MismatchCode).map(str::to_string);
        }
        Ok(message)
    }
}

// ── Shared construction helpers ────────────────────────────────────

fn message(
    category: EventCategory,
    record: &SpoolRecord,
    ctx: &BuildContext,
    participants: Vec<ActiveParticipant>,
    subjects: Vec<SubjectIdentification>,
) -> AuditMessage {
    let (outcome, outcome_description) = outcome_of(record);
    AuditMessage {
        event: EventIdentification {
            category,
            action: action_of(category, &record.main),
            time_ms: ctx.event_time_ms,
            outcome,
            outcome_description,
        },
        participants,
        subjects,
        source: AuditSource {
            device_name: ctx.device_name.clone(),
            host: ctx.local_host.clone(),
        },
    }
}

fn action_of(category: EventCategory, main: &AuditInfo) -> ActionCode {
    main.get(FieldKey::EventAction)
        .and_then(ActionCode::parse)
        .unwrap_or(category.default_action())
}

/// Recompute the outcome from the record's own fields: a main-record
/// outcome wins, else distinct per-instance outcomes are joined, else
/// the event succeeded (with an optional warning description).
fn outcome_of(record: &SpoolRecord) -> (OutcomeIndicator, Option<String>) {
    if let Some(outcome) = record.main.get(FieldKey::Outcome) {
        return (OutcomeIndicator::MinorFailure, Some(outcome.to_string()));
    }
    let failures: BTreeSet<&str> = record
        .details
        .iter()
        .filter_map(|detail| detail.get(FieldKey::Outcome))
        .collect();
    if !failures.is_empty() {
        let joined = failures.into_iter().collect::<Vec<_>>().join("; ");
        return (OutcomeIndicator::MinorFailure, Some(joined));
    }
    (
        OutcomeIndicator::Success,
        record.main.get(FieldKey::Warning).map(str::to_string),
    )
}

fn has_failure(record: &SpoolRecord) -> bool {
    record.main.get(FieldKey::Outcome).is_some()
        || record
            .details
            .iter()
            .any(|detail| detail.get(FieldKey::Outcome).is_some())
}

/// The remote/requesting participant, when the record names one.
fn remote_participant(main: &AuditInfo) -> Option<ActiveParticipant> {
    main.get(FieldKey::CallingUserId).map(|calling| {
        ActiveParticipant::new(calling)
            .on_host(main.get(FieldKey::CallingHost).map(str::to_string))
            .requester()
    })
}

/// The local archive participant.
fn local_participant(main: &AuditInfo, ctx: &BuildContext) -> ActiveParticipant {
    let user_id = main
        .get(FieldKey::CalledUserId)
        .unwrap_or(ctx.device_name.as_str());
    ActiveParticipant::new(user_id)
        .on_host(Some(ctx.local_host.clone()))
        .alt_user_id(ctx.process_id.clone())
}

fn transfer_participants(main: &AuditInfo, ctx: &BuildContext) -> Vec<ActiveParticipant> {
    let mut participants = Vec::new();
    if let Some(calling) = remote_participant(main) {
        participants.push(calling.role(ParticipantRole::Source));
    }
    participants.push(local_participant(main, ctx).role(ParticipantRole::Destination));
    participants
}

/// Sender/receiver of a forwarded message exchange, when present.
fn exchange_participants(main: &AuditInfo) -> Vec<ActiveParticipant> {
    if main.get(FieldKey::OutgoingExchange).is_none() {
        return Vec::new();
    }
    let mut participants = Vec::new();
    if let Some(sender) = main.get(FieldKey::ExchangeSender) {
        participants.push(ActiveParticipant::new(sender).role(ParticipantRole::Source));
    }
    if let Some(receiver) = main.get(FieldKey::ExchangeReceiver) {
        participants.push(ActiveParticipant::new(receiver).role(ParticipantRole::Destination));
    }
    participants
}

/// Roll detail records up into a per-SOP-class instance summary.
fn rollup(record: &SpoolRecord, show_instance_uids: bool) -> SubjectDescription {
    let mut classes: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut mpps: BTreeSet<&str> = BTreeSet::new();
    for detail in &record.details {
        if let Some(class_uid) = detail.get(FieldKey::SopClassUid) {
            let instances = classes.entry(class_uid).or_default();
            if let Some(instance_uid) = detail.get(FieldKey::SopInstanceUid) {
                instances.insert(instance_uid);
            }
        }
        if let Some(mpps_uid) = detail.get(FieldKey::MppsUid) {
            mpps.insert(mpps_uid);
        }
    }
    SubjectDescription {
        sop_classes: classes
            .into_iter()
            .map(|(class_uid, instances)| SopClassRollup {
                class_uid: class_uid.to_string(),
                instance_count: instances.len(),
                instance_uids: if show_instance_uids {
                    instances.into_iter().map(str::to_string).collect()
                } else {
                    Vec::new()
                },
            })
            .collect(),
        accession_number: record
            .main
            .get(FieldKey::AccessionNumber)
            .map(str::to_string),
        mpps_uids: mpps.into_iter().map(str::to_string).collect(),
        study_uids: Vec::new(),
    }
}

fn study_subject(main: &AuditInfo, description: SubjectDescription) -> SubjectIdentification {
    let study_uid = main.get(FieldKey::StudyUid).unwrap_or_default();
    study_subject_with_id(study_uid, main, description)
}

fn study_subject_with_id(
    study_uid: &str,
    main: &AuditInfo,
    description: SubjectDescription,
) -> SubjectIdentification {
    let mut subject =
        SubjectIdentification::new(study_uid, SubjectType::Study).described(description);
    if let Some(study_date) = main.get(FieldKey::StudyDate) {
        subject = subject.detail("study-date", study_date.as_bytes().to_vec());
    }
    subject
}

fn patient_subject(main: &AuditInfo) -> Option<SubjectIdentification> {
    main.get(FieldKey::PatientId).map(|patient_id| {
        SubjectIdentification::new(patient_id, SubjectType::Patient)
            .named(main.get(FieldKey::PatientName).map(str::to_string))
    })
}

fn with_exchange_details(
    subject: SubjectIdentification,
    record: &SpoolRecord,
) -> SubjectIdentification {
    let mut subject = subject;
    if let Some(message) = record.attachments.first() {
        subject = subject.detail("message", message.clone());
    }
    if let Some(ack) = record.attachments.get(1) {
        subject = subject.detail("acknowledgement", ack.clone());
    }
    subject
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::event::entity::{
        InstanceRef, Occurrence, PatientRef, QueryKind, StudyRef, TransferSession,
    };

    fn ctx() -> BuildContext {
        BuildContext {
            device_name: "archive1".to_string(),
            local_host: "archive1.example.org".to_string(),
            process_id: "4242".to_string(),
            event_time_ms: 1_700_000_000_000,
        }
    }

    fn session() -> TransferSession {
        TransferSession {
            calling_user_id: "STORESCU".to_string(),
            calling_host: Some("modality1".to_string()),
            called_user_id: "ARCHIVE".to_string(),
        }
    }

    fn stored_record(outcomes: &[Option<&str>]) -> SpoolRecord {
        let mut record = Occurrence::InstancesStored {
            session: session(),
            study: StudyRef {
                uid: "1.2.3".to_string(),
                accession_number: Some("ACC9".to_string()),
                date: None,
            },
            patient: PatientRef {
                id: "P1".to_string(),
                name: Some("DOE^JOHN".to_string()),
            },
            instance: InstanceRef {
                sop_class_uid: "1.2.840.10008.5.1.4.1.1.2".to_string(),
                sop_instance_uid: "1.2.3.1".to_string(),
                mpps_uid: None,
                outcome: outcomes[0].map(str::to_string),
                error_code: None,
            },
            warning: None,
        }
        .to_spool_record();
        for (i, outcome) in outcomes.iter().enumerate().skip(1) {
            record.details.push(
                AuditInfo::new()
                    .with(FieldKey::SopClassUid, "1.2.840.10008.5.1.4.1.1.2")
                    .with(FieldKey::SopInstanceUid, format!("1.2.3.{}", i + 1))
                    .with_opt(FieldKey::Outcome, *outcome),
            );
        }
        record
    }

    #[test]
    fn store_message_rolls_up_instances_by_class() {
        let record = stored_record(&[None, None, None]);
        let msg = TransferBuilder {
            category: EventCategory::Store,
        }
        .build(&record, &ctx())
        .unwrap();

        assert_eq!(msg.event.category, EventCategory::Store);
        assert_eq!(msg.event.action, ActionCode::Create);
        assert_eq!(msg.event.outcome, OutcomeIndicator::Success);
        let study = &msg.subjects[0];
        assert_eq!(study.id, "1.2.3");
        let description = study.description.as_ref().unwrap();
        assert_eq!(description.sop_classes.len(), 1);
        assert_eq!(description.sop_classes[0].instance_count, 3);
        // Success: counts only, no individual uids.
        assert!(description.sop_classes[0].instance_uids.is_empty());
        assert_eq!(description.accession_number.as_deref(), Some("ACC9"));
    }

    #[test]
    fn failed_store_lists_instance_uids_and_joins_outcomes() {
        let record = stored_record(&[Some("disk full"), Some("disk full"), None]);
        let msg = TransferBuilder {
            category: EventCategory::Store,
        }
        .build(&record, &ctx())
        .unwrap();

        assert_eq!(msg.event.outcome, OutcomeIndicator::MinorFailure);
        assert_eq!(msg.event.outcome_description.as_deref(), Some("disk full"));
        let description = msg.subjects[0].description.as_ref().unwrap();
        assert_eq!(description.sop_classes[0].instance_uids.len(), 3);
    }

    #[test]
    fn rebuild_from_same_record_is_identical() {
        let record = stored_record(&[None, None]);
        let builder = TransferBuilder {
            category: EventCategory::Store,
        };
        let first = builder.build(&record, &ctx()).unwrap();
        let second = builder.build(&record, &ctx()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn web_query_message_carries_the_query_string() {
        let record = Occurrence::Query {
            session: session(),
            kind: QueryKind::Web {
                method: "searchForStudies".to_string(),
                query_string: "/studies?PatientID=P1".to_string(),
            },
        }
        .to_spool_record();
        let msg = QueryBuilder.build(&record, &ctx()).unwrap();
        assert_eq!(msg.subjects[0].subject_type, SubjectType::Query);
        assert_eq!(msg.subjects[0].details[0].kind, "query-string");
        assert_eq!(msg.subjects[0].details[0].value, b"/studies?PatientID=P1");
    }

    #[test]
    fn participants_carry_local_process_identity() {
        let record = stored_record(&[None]);
        let msg = TransferBuilder {
            category: EventCategory::Store,
        }
        .build(&record, &ctx())
        .unwrap();
        let local = msg
            .participants
            .iter()
            .find(|p| p.user_id == "ARCHIVE")
            .unwrap();
        assert_eq!(local.alt_user_id.as_deref(), Some("4242"));
        assert_eq!(local.host.as_deref(), Some("archive1.example.org"));
        let remote = msg
            .participants
            .iter()
            .find(|p| p.user_id == "STORESCU")
            .unwrap();
        assert!(remote.requester);
    }

    #[test]
    fn mismatch_is_always_a_failure() {
        let record = Occurrence::PatientMismatch {
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
            mismatch_code: "(17,AGFA,Patient name mismatch)".to_string(),
        }
        .to_spool_record();
        let msg = MismatchBuilder.build(&record, &ctx()).unwrap();
        assert_eq!(msg.event.outcome, OutcomeIndicator::MinorFailure);
        assert_eq!(
            msg.event.outcome_description.as_deref(),
            Some("(17,AGFA,Patient name mismatch)")
        );
    }

    #[test]
    fn commitment_with_multiple_studies_lists_uids() {
        let record = Occurrence::StorageCommitment {
            session: session(),
            transaction_uid: "1.2.3.100".to_string(),
            patient: PatientRef {
                id: "P1".to_string(),
                name: None,
            },
            study_uids: vec!["1.2.3".to_string(), "1.2.4".to_string()],
            instances: vec![
                InstanceRef {
                    sop_class_uid: "cuid".to_string(),
                    sop_instance_uid: "iuid1".to_string(),
                    mpps_uid: None,
                    outcome: None,
                    error_code: None,
                },
                InstanceRef {
                    sop_class_uid: "cuid".to_string(),
                    sop_instance_uid: "iuid2".to_string(),
                    mpps_uid: None,
                    outcome: None,
                    error_code: None,
                },
            ],
            outcome: None,
        }
        .to_spool_record();
        let msg = StorageCommitmentBuilder.build(&record, &ctx()).unwrap();
        let description = msg.subjects[0].description.as_ref().unwrap();
        assert_eq!(description.study_uids, vec!["1.2.3", "1.2.4"]);
        assert_eq!(description.sop_classes[0].instance_uids.len(), 2);
    }
}
