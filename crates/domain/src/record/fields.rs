use serde::{Deserialize, Serialize};

/// Fixed enumeration of audit record fields.
///
/// The declaration order here *is* the serialization order: the codec
/// always writes every field in `FieldKey::ALL` order, so a map survives
/// an encode/decode round trip regardless of insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    EventAction,
    CallingUserId,
    CallingHost,
    CalledUserId,
    CalledHost,
    PatientId,
    PatientName,
    StudyUid,
    AccessionNumber,
    StudyDate,
    SopClassUid,
    SopInstanceUid,
    MppsUid,
    QueryPoid,
    QueryString,
    MoveUserId,
    DestinationUserId,
    DestinationNapId,
    SubmissionSetUid,
    TaskId,
    QueueName,
    TaskOperation,
    ExchangeSender,
    ExchangeReceiver,
    OutgoingExchange,
    MismatchCode,
    ErrorCode,
    Warning,
    Outcome,
}

impl FieldKey {
    pub const ALL: [FieldKey; 29] = [
        Self::EventAction,
        Self::CallingUserId,
        Self::CallingHost,
        Self::CalledUserId,
        Self::CalledHost,
        Self::PatientId,
        Self::PatientName,
        Self::StudyUid,
        Self::AccessionNumber,
        Self::StudyDate,
        Self::SopClassUid,
        Self::SopInstanceUid,
        Self::MppsUid,
        Self::QueryPoid,
        Self::QueryString,
        Self::MoveUserId,
        Self::DestinationUserId,
        Self::DestinationNapId,
        Self::SubmissionSetUid,
        Self::TaskId,
        Self::QueueName,
        Self::TaskOperation,
        Self::ExchangeSender,
        Self::ExchangeReceiver,
        Self::OutgoingExchange,
        Self::MismatchCode,
        Self::ErrorCode,
        Self::Warning,
        Self::Outcome,
    ];

    pub const COUNT: usize = Self::ALL.len();

    fn index(self) -> usize {
        self as usize
    }
}

/// Ordered map from [`FieldKey`] to optional string values.
///
/// Empty strings and absent values are identified: setting a field to ""
/// unsets it, so decode never has to distinguish null from empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditInfo {
    values: [Option<String>; FieldKey::COUNT],
}

impl Default for AuditInfo {
    fn default() -> Self {
        Self {
            values: std::array::from_fn(|_| None),
        }
    }
}

impl AuditInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.values[key.index()].as_deref()
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        let value = value.into();
        self.values[key.index()] = if value.is_empty() { None } else { Some(value) };
    }

    pub fn set_opt(&mut self, key: FieldKey, value: Option<impl Into<String>>) {
        match value {
            Some(v) => self.set(key, v),
            None => self.values[key.index()] = None,
        }
    }

    /// Chained construction variant of [`AuditInfo::set`].
    #[must_use]
    pub fn with(mut self, key: FieldKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    #[must_use]
    pub fn with_opt(mut self, key: FieldKey, value: Option<impl Into<String>>) -> Self {
        self.set_opt(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Iterate all fields in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, Option<&str>)> {
        FieldKey::ALL
            .into_iter()
            .map(|key| (key, self.values[key.index()].as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut info = AuditInfo::new();
        info.set(FieldKey::CallingUserId, "STORESCU");
        assert_eq!(info.get(FieldKey::CallingUserId), Some("STORESCU"));
        assert_eq!(info.get(FieldKey::CalledUserId), None);
    }

    #[test]
    fn empty_string_unsets() {
        let mut info = AuditInfo::new();
        info.set(FieldKey::Outcome, "failed");
        info.set(FieldKey::Outcome, "");
        assert_eq!(info.get(FieldKey::Outcome), None);
        assert!(info.is_empty());
    }

    #[test]
    fn set_opt_none_clears() {
        let mut info = AuditInfo::new().with(FieldKey::Warning, "w");
        info.set_opt(FieldKey::Warning, None::<String>);
        assert!(info.is_empty());
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let info = AuditInfo::new()
            .with(FieldKey::Outcome, "z")
            .with(FieldKey::CallingUserId, "a");
        let set: Vec<_> = info.iter().filter(|(_, v)| v.is_some()).collect();
        assert_eq!(
            set,
            vec![
                (FieldKey::CallingUserId, Some("a")),
                (FieldKey::Outcome, Some("z")),
            ]
        );
    }

    #[test]
    fn all_is_dense_and_ordered() {
        for (i, key) in FieldKey::ALL.into_iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }
}
