use std::future::Future;
use std::pin::Pin;

use domain::message::entity::AuditMessage;
use domain::message::error::DispatchError;
use ports::secondary::transport::AuditTransport;

/// Transport that emits audit messages as structured JSON log lines via
/// `tracing`, tagged `event_type = "audit"` for easy filtering in log
/// aggregation systems. The default when a sink has no remote collector.
pub struct LogAuditTransport;

impl AuditTransport for LogAuditTransport {
    fn send<'a>(
        &'a self,
        message: &'a AuditMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send + 'a>> {
        Box::pin(async move {
            let payload = serde_json::to_string(message)
                .map_err(|e| DispatchError::Send(format!("serialization failed: {e}")))?;
            tracing::info!(
                event_type = "audit",
                category = message.event.category.as_str(),
                action = message.event.action.as_str(),
                outcome = message.event.outcome.as_u8(),
                time_ms = message.event.time_ms,
                device = %message.source.device_name,
                message = %payload,
                "audit"
            );
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::event::entity::{ActionCode, EventCategory, OutcomeIndicator};
    use domain::message::entity::{ActiveParticipant, AuditSource, EventIdentification};

    fn sample() -> AuditMessage {
        AuditMessage {
            event: EventIdentification {
                category: EventCategory::Store,
                action: ActionCode::Create,
                time_ms: 1_700_000_000_000,
                outcome: OutcomeIndicator::Success,
                outcome_description: None,
            },
            participants: vec![ActiveParticipant::new("STORESCU").requester()],
            subjects: vec![],
            source: AuditSource {
                device_name: "archive1".to_string(),
                host: "archive1.example.org".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn log_transport_succeeds() {
        assert!(LogAuditTransport.send(&sample()).await.is_ok());
    }

    #[tokio::test]
    async fn log_transport_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LogAuditTransport>();
    }
}
