//! Occurrence → [`SpoolRecord`] field mapping.
//!
//! The per-category mapping is a finite enumeration: each variant knows
//! which fields of its payload land in the main record, which become
//! per-subject detail records, and which raw bytes ride along as
//! attachments.

use crate::event::entity::{
    InstanceRef, MessageExchange, Occurrence, PatientRef, QueryKind, Requester, StudyRef,
    TransferSession,
};
use crate::record::fields::{AuditInfo, FieldKey};
use crate::record::spool_record::SpoolRecord;

impl Occurrence {
    /// Flatten this occurrence into the spooled unit it contributes.
    ///
    /// Mergeable occurrences produce a main record plus their own detail
    /// record; when appended to an existing file only the detail part is
    /// written. The classified action code is stamped into the main
    /// record so dispatch can rebuild the message from durable state
    /// alone.
    pub fn to_spool_record(&self) -> SpoolRecord {
        let mut record = self.spool_fields();
        record
            .main
            .set(FieldKey::EventAction, self.classify().action.as_str());
        record
    }

    fn spool_fields(&self) -> SpoolRecord {
        match self {
            Self::ApplicationStart {
                device_name,
                requester,
            }
            | Self::ApplicationStop {
                device_name,
                requester,
            } => {
                let mut main = AuditInfo::new().with(FieldKey::CalledUserId, device_name);
                apply_requester(&mut main, requester.as_ref());
                SpoolRecord::new(main)
            }
            Self::ConnectionFailure {
                device_name,
                remote_host,
                reason,
            } => SpoolRecord::new(
                AuditInfo::new()
                    .with(FieldKey::CalledUserId, device_name)
                    .with(FieldKey::CallingHost, remote_host)
                    .with(FieldKey::Outcome, reason),
            ),
            Self::AssociationFailure { session, reason } => {
                let mut main = session_info(session);
                main.set(FieldKey::Outcome, reason);
                SpoolRecord::new(main)
            }
            Self::InstancesStored {
                session,
                study,
                patient,
                instance,
                warning,
            } => {
                let mut main = session_info(session);
                apply_study(&mut main, study);
                apply_patient(&mut main, patient);
                main.set_opt(FieldKey::Warning, warning.as_deref());
                SpoolRecord::new(main).with_detail(instance_info(instance))
            }
            Self::WadoRetrieved {
                session,
                study,
                patient,
                instance,
                outcome,
            } => {
                let mut main = session_info(session);
                apply_study(&mut main, study);
                apply_patient(&mut main, patient);
                main.set_opt(FieldKey::Outcome, outcome.as_deref());
                SpoolRecord::new(main).with_detail(instance_info(instance))
            }
            Self::Retrieved {
                session,
                destination_user_id,
                destination_host,
                study,
                patient,
                instances,
                outcome,
                warning,
            } => {
                let mut main = session_info(session);
                apply_study(&mut main, study);
                apply_patient(&mut main, patient);
                main.set(FieldKey::DestinationUserId, destination_user_id);
                main.set_opt(FieldKey::DestinationNapId, destination_host.as_deref());
                main.set_opt(FieldKey::Outcome, outcome.as_deref());
                main.set_opt(FieldKey::Warning, warning.as_deref());
                with_instance_details(SpoolRecord::new(main), instances)
            }
            Self::Deletion {
                requester,
                device_name,
                session,
                study,
                patient,
                instances,
                outcome,
            } => {
                let mut main = match session {
                    Some(session) => session_info(session),
                    None => AuditInfo::new().with(FieldKey::CalledUserId, device_name),
                };
                apply_requester(&mut main, requester.as_ref());
                apply_study(&mut main, study);
                apply_patient(&mut main, patient);
                main.set_opt(FieldKey::Outcome, outcome.as_deref());
                with_instance_details(SpoolRecord::new(main), instances)
            }
            Self::Query { session, kind } => {
                let mut main = session_info(session);
                match kind {
                    QueryKind::Dicom {
                        sop_class_uid,
                        keys,
                    } => {
                        main.set(FieldKey::QueryPoid, sop_class_uid);
                        SpoolRecord::new(main).with_attachment(keys.clone())
                    }
                    QueryKind::Web {
                        method,
                        query_string,
                    } => {
                        main.set(FieldKey::QueryPoid, method);
                        main.set(FieldKey::QueryString, query_string);
                        SpoolRecord::new(main)
                    }
                }
            }
            Self::PatientRecord {
                session,
                patient,
                exchange,
                outcome,
                ..
            } => {
                let mut main = session_info(session);
                apply_patient(&mut main, patient);
                main.set_opt(FieldKey::Outcome, outcome.as_deref());
                apply_exchange(&mut main, exchange.as_ref());
                with_exchange_attachments(SpoolRecord::new(main), exchange.as_ref())
            }
            Self::ProcedureRecord {
                session,
                study,
                patient,
                exchange,
                outcome,
                ..
            } => {
                let mut main = session_info(session);
                apply_study(&mut main, study);
                if let Some(patient) = patient {
                    apply_patient(&mut main, patient);
                }
                main.set_opt(FieldKey::Outcome, outcome.as_deref());
                apply_exchange(&mut main, exchange.as_ref());
                with_exchange_attachments(SpoolRecord::new(main), exchange.as_ref())
            }
            Self::ProvideAndRegister {
                session,
                destination_user_id,
                destination_host,
                patient,
                submission_set_uid,
                outcome,
            } => {
                let mut main = session_info(session);
                apply_patient(&mut main, patient);
                main.set(FieldKey::DestinationUserId, destination_user_id);
                main.set_opt(FieldKey::DestinationNapId, destination_host.as_deref());
                main.set(FieldKey::SubmissionSetUid, submission_set_uid);
                main.set_opt(FieldKey::Outcome, outcome.as_deref());
                SpoolRecord::new(main)
            }
            Self::StorageCommitment {
                session,
                patient,
                study_uids,
                instances,
                outcome,
                ..
            } => {
                let mut main = session_info(session);
                apply_patient(&mut main, patient);
                main.set(FieldKey::StudyUid, study_uids.join(";"));
                main.set_opt(FieldKey::Outcome, outcome.as_deref());
                with_instance_details(SpoolRecord::new(main), instances)
            }
            Self::ExternalRetrieve {
                requester,
                request_uri,
                remote_user_id,
                remote_host,
                destination_user_id,
                study,
                outcome,
                warning,
            } => {
                let mut main = AuditInfo::new()
                    .with(FieldKey::CallingUserId, &requester.user_id)
                    .with_opt(FieldKey::CallingHost, requester.host.as_deref())
                    .with(FieldKey::CalledUserId, remote_user_id)
                    .with_opt(FieldKey::CalledHost, remote_host.as_deref())
                    .with(FieldKey::MoveUserId, request_uri)
                    .with(FieldKey::DestinationUserId, destination_user_id);
                apply_study(&mut main, study);
                main.set_opt(FieldKey::Outcome, outcome.as_deref());
                main.set_opt(FieldKey::Warning, warning.as_deref());
                SpoolRecord::new(main)
            }
            Self::ConfigurationChange {
                device_name,
                requester,
                diff,
            } => {
                let mut main = AuditInfo::new().with(FieldKey::CalledUserId, device_name);
                apply_requester(&mut main, requester.as_ref());
                SpoolRecord::new(main).with_attachment(diff.clone().into_bytes())
            }
            Self::QueueEvent {
                requester,
                operation,
                queue_name,
                task_id,
                outcome,
            } => SpoolRecord::new(
                AuditInfo::new()
                    .with(FieldKey::CallingUserId, &requester.user_id)
                    .with_opt(FieldKey::CallingHost, requester.host.as_deref())
                    .with(FieldKey::TaskOperation, operation.as_str())
                    .with(FieldKey::QueueName, queue_name)
                    .with(FieldKey::TaskId, task_id)
                    .with_opt(FieldKey::Outcome, outcome.as_deref()),
            ),
            Self::PatientMismatch {
                session,
                study,
                patient,
                mismatch_code,
            } => {
                let mut main = session_info(session);
                apply_study(&mut main, study);
                apply_patient(&mut main, patient);
                main.set(FieldKey::MismatchCode, mismatch_code);
                SpoolRecord::new(main)
            }
        }
    }
}

fn session_info(session: &TransferSession) -> AuditInfo {
    AuditInfo::new()
        .with(FieldKey::CallingUserId, &session.calling_user_id)
        .with_opt(FieldKey::CallingHost, session.calling_host.as_deref())
        .with(FieldKey::CalledUserId, &session.called_user_id)
}

fn apply_requester(main: &mut AuditInfo, requester: Option<&Requester>) {
    if let Some(requester) = requester {
        main.set(FieldKey::CallingUserId, &requester.user_id);
        main.set_opt(FieldKey::CallingHost, requester.host.as_deref());
    }
}

fn apply_study(main: &mut AuditInfo, study: &StudyRef) {
    main.set(FieldKey::StudyUid, &study.uid);
    main.set_opt(FieldKey::AccessionNumber, study.accession_number.as_deref());
    main.set_opt(FieldKey::StudyDate, study.date.as_deref());
}

fn apply_patient(main: &mut AuditInfo, patient: &PatientRef) {
    main.set(FieldKey::PatientId, &patient.id);
    main.set_opt(FieldKey::PatientName, patient.name.as_deref());
}

fn apply_exchange(main: &mut AuditInfo, exchange: Option<&MessageExchange>) {
    if let Some(exchange) = exchange {
        main.set(FieldKey::ExchangeSender, &exchange.sender);
        main.set(FieldKey::ExchangeReceiver, &exchange.receiver);
        if exchange.outgoing {
            main.set(FieldKey::OutgoingExchange, "true");
        }
    }
}

fn with_exchange_attachments(
    record: SpoolRecord,
    exchange: Option<&MessageExchange>,
) -> SpoolRecord {
    match exchange {
        Some(exchange) => record
            .with_attachment(exchange.message.clone())
            .with_attachment(exchange.ack.clone()),
        None => record,
    }
}

fn instance_info(instance: &InstanceRef) -> AuditInfo {
    AuditInfo::new()
        .with(FieldKey::SopClassUid, &instance.sop_class_uid)
        .with(FieldKey::SopInstanceUid, &instance.sop_instance_uid)
        .with_opt(FieldKey::MppsUid, instance.mpps_uid.as_deref())
        .with_opt(FieldKey::Outcome, instance.outcome.as_deref())
        .with_opt(FieldKey::ErrorCode, instance.error_code.as_deref())
}

fn with_instance_details(mut record: SpoolRecord, instances: &[InstanceRef]) -> SpoolRecord {
    for instance in instances {
        record.details.push(instance_info(instance));
    }
    record
}
