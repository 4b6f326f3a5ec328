use domain::message::entity::{AuditMessage, BuildContext};
use domain::message::error::DispatchError;
use domain::record::spool_record::SpoolRecord;

/// Builds the outbound message for one event category.
///
/// Builders are pure over their inputs: outcome and severity are
/// recomputed from the record's own fields on every call, never trusted
/// from earlier state, so rebuilding after a failed delivery attempt
/// yields an identical message.
pub trait MessageBuilder: Send + Sync {
    fn build(
        &self,
        record: &SpoolRecord,
        ctx: &BuildContext,
    ) -> Result<AuditMessage, DispatchError>;
}
