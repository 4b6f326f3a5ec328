use std::future::Future;
use std::pin::Pin;

use domain::message::entity::AuditMessage;
use domain::message::error::DispatchError;

/// Secondary port for delivering an audit message to a sink's collector.
///
/// Uses `Pin<Box<dyn Future>>` return type (instead of RPITIT) so the
/// trait is dyn-compatible and can be used as `Arc<dyn AuditTransport>`.
/// Implementations do not bound their own runtime — the dispatcher wraps
/// every send in the sink's configured timeout.
pub trait AuditTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        message: &'a AuditMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummyTransport;

    impl AuditTransport for DummyTransport {
        fn send<'a>(
            &'a self,
            _message: &'a AuditMessage,
        ) -> Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send + 'a>> {
            Box::pin(async { Ok(()) })
        }
    }

    #[tokio::test]
    async fn transport_is_dyn_compatible() {
        use domain::event::entity::{ActionCode, EventCategory, OutcomeIndicator};
        use domain::message::entity::{AuditMessage, AuditSource, EventIdentification};

        let transport: Box<dyn AuditTransport> = Box::new(DummyTransport);
        let message = AuditMessage {
            event: EventIdentification {
                category: EventCategory::Store,
                action: ActionCode::Create,
                time_ms: 0,
                outcome: OutcomeIndicator::Success,
                outcome_description: None,
            },
            participants: vec![],
            subjects: vec![],
            source: AuditSource {
                device_name: "archive1".to_string(),
                host: "localhost".to_string(),
            },
        };
        assert!(transport.send(&message).await.is_ok());
    }
}
