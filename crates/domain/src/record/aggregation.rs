//! Aggregation key resolution: decides whether an occurrence opens a new
//! spool file or appends to an existing one.

use crate::event::entity::{EventCategory, EventDescriptor, Occurrence};

/// Marker folded into the file identity of failure outcomes, so failed
/// and successful occurrences for the same subject never merge.
pub const FAILURE_MARKER: &str = "-ERR";

/// Identity of the spool file an occurrence lands in.
///
/// `identity` is `Some` for mergeable categories: occurrences resolving to
/// the same identity within one open window append to the same file. For
/// everything else it is `None` and the store creates a uniquely named
/// file per occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoolKey {
    pub category: EventCategory,
    pub identity: Option<String>,
}

impl SpoolKey {
    pub fn resolve(descriptor: &EventDescriptor, occurrence: &Occurrence) -> SpoolKey {
        let identity = match occurrence {
            Occurrence::InstancesStored { session, study, .. }
            | Occurrence::WadoRetrieved { session, study, .. } => Some(identity_of(
                descriptor.category,
                &session.calling_user_id,
                &session.called_user_id,
                &study.uid,
                occurrence.failed(),
            )),
            Occurrence::StorageCommitment {
                session,
                transaction_uid,
                ..
            } => Some(identity_of(
                descriptor.category,
                &session.calling_user_id,
                &session.called_user_id,
                transaction_uid,
                occurrence.failed(),
            )),
            _ => None,
        };
        SpoolKey {
            category: descriptor.category,
            identity,
        }
    }

    pub fn mergeable(&self) -> bool {
        self.identity.is_some()
    }
}

fn identity_of(
    category: EventCategory,
    calling: &str,
    called: &str,
    correlation: &str,
    failed: bool,
) -> String {
    let mut identity = format!(
        "{}-{}-{}-{}",
        category.as_str(),
        sanitize(calling),
        sanitize(called),
        sanitize(correlation),
    );
    if failed {
        identity.push_str(FAILURE_MARKER);
    }
    identity
}

/// Make an identity component filename-safe. Collisions after
/// sanitization are acceptable: they only widen a merge window.
fn sanitize(component: &str) -> String {
    component
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::entity::{InstanceRef, PatientRef, StudyRef, TransferSession};

    fn stored(study_uid: &str, outcome: Option<&str>) -> Occurrence {
        Occurrence::InstancesStored {
            session: TransferSession {
                calling_user_id: "STORESCU".to_string(),
                calling_host: Some("modality1".to_string()),
                called_user_id: "ARCHIVE".to_string(),
            },
            study: StudyRef {
                uid: study_uid.to_string(),
                accession_number: None,
                date: None,
            },
            patient: PatientRef {
                id: "P1".to_string(),
                name: None,
            },
            instance: InstanceRef {
                sop_class_uid: "1.2.840.10008.5.1.4.1.1.2".to_string(),
                sop_instance_uid: "1.2.3.4".to_string(),
                mpps_uid: None,
                outcome: outcome.map(str::to_string),
                error_code: None,
            },
            warning: None,
        }
    }

    #[test]
    fn same_study_same_actors_share_an_identity() {
        let a = stored("1.2.3", None);
        let b = stored("1.2.3", None);
        let ka = SpoolKey::resolve(&a.classify(), &a);
        let kb = SpoolKey::resolve(&b.classify(), &b);
        assert!(ka.mergeable());
        assert_eq!(ka, kb);
    }

    #[test]
    fn different_studies_get_different_identities() {
        let a = stored("1.2.3", None);
        let b = stored("1.2.4", None);
        assert_ne!(
            SpoolKey::resolve(&a.classify(), &a).identity,
            SpoolKey::resolve(&b.classify(), &b).identity
        );
    }

    #[test]
    fn failure_never_merges_with_success() {
        let ok = stored("1.2.3", None);
        let failed = stored("1.2.3", Some("disk full"));
        let k_ok = SpoolKey::resolve(&ok.classify(), &ok);
        let k_failed = SpoolKey::resolve(&failed.classify(), &failed);
        assert_ne!(k_ok.identity, k_failed.identity);
        assert!(k_failed.identity.unwrap().ends_with(FAILURE_MARKER));
    }

    #[test]
    fn query_is_not_mergeable() {
        let occ = Occurrence::Query {
            session: TransferSession {
                calling_user_id: "FINDSCU".to_string(),
                calling_host: None,
                called_user_id: "ARCHIVE".to_string(),
            },
            kind: crate::event::entity::QueryKind::Web {
                method: "searchForStudies".to_string(),
                query_string: "/studies".to_string(),
            },
        };
        let key = SpoolKey::resolve(&occ.classify(), &occ);
        assert!(!key.mergeable());
        assert_eq!(key.category, EventCategory::Query);
    }

    #[test]
    fn identity_components_are_sanitized() {
        let occ = Occurrence::InstancesStored {
            session: TransferSession {
                calling_user_id: "WEB|user@site".to_string(),
                calling_host: None,
                called_user_id: "/dicom-web/studies".to_string(),
            },
            study: StudyRef {
                uid: "1.2.3".to_string(),
                accession_number: None,
                date: None,
            },
            patient: PatientRef {
                id: "P1".to_string(),
                name: None,
            },
            instance: InstanceRef {
                sop_class_uid: "cuid".to_string(),
                sop_instance_uid: "iuid".to_string(),
                mpps_uid: None,
                outcome: None,
                error_code: None,
            },
            warning: None,
        };
        let identity = SpoolKey::resolve(&occ.classify(), &occ).identity.unwrap();
        assert!(!identity.contains('|'));
        assert!(!identity.contains('/'));
    }
}
