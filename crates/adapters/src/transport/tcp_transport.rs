use std::future::Future;
use std::pin::Pin;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use domain::message::entity::AuditMessage;
use domain::message::error::DispatchError;
use ports::secondary::transport::AuditTransport;

/// Transport that ships each message to a TCP audit collector as one
/// length-prefixed JSON frame (`u32` big-endian length + payload).
///
/// A fresh connection per send keeps the adapter stateless; the
/// dispatcher's per-sink timeout bounds the whole exchange, and any
/// connection reuse belongs to the collector-specific deployment in
/// front of it.
pub struct TcpAuditTransport {
    addr: String,
}

impl TcpAuditTransport {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }
}

impl AuditTransport for TcpAuditTransport {
    fn send<'a>(
        &'a self,
        message: &'a AuditMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send + 'a>> {
        Box::pin(async move {
            let payload = serde_json::to_vec(message)
                .map_err(|e| DispatchError::Send(format!("serialization failed: {e}")))?;
            let len = u32::try_from(payload.len())
                .map_err(|_| DispatchError::Send("message exceeds frame limit".to_string()))?;

            let mut stream = TcpStream::connect(&self.addr)
                .await
                .map_err(|e| DispatchError::Send(format!("connect {}: {e}", self.addr)))?;
            stream
                .write_all(&len.to_be_bytes())
                .await
                .map_err(|e| DispatchError::Send(format!("write: {e}")))?;
            stream
                .write_all(&payload)
                .await
                .map_err(|e| DispatchError::Send(format!("write: {e}")))?;
            stream
                .shutdown()
                .await
                .map_err(|e| DispatchError::Send(format!("shutdown: {e}")))?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::event::entity::{ActionCode, EventCategory, OutcomeIndicator};
    use domain::message::entity::{AuditSource, EventIdentification};
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    fn sample() -> AuditMessage {
        AuditMessage {
            event: EventIdentification {
                category: EventCategory::Query,
                action: ActionCode::Execute,
                time_ms: 1_700_000_000_000,
                outcome: OutcomeIndicator::Success,
                outcome_description: None,
            },
            participants: vec![],
            subjects: vec![],
            source: AuditSource {
                device_name: "archive1".to_string(),
                host: "archive1.example.org".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn sends_one_length_prefixed_json_frame() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut len = [0u8; 4];
            socket.read_exact(&mut len).await.unwrap();
            let mut payload = vec![0u8; u32::from_be_bytes(len) as usize];
            socket.read_exact(&mut payload).await.unwrap();
            payload
        });

        let transport = TcpAuditTransport::new(addr.to_string());
        transport.send(&sample()).await.unwrap();

        let payload = server.await.unwrap();
        let parsed: AuditMessage = serde_json::from_slice(&payload).unwrap();
        assert_eq!(parsed, sample());
    }

    #[tokio::test]
    async fn unreachable_collector_is_a_send_error() {
        // Port 1 on localhost: nothing listens there.
        let transport = TcpAuditTransport::new("127.0.0.1:1");
        let err = transport.send(&sample()).await.unwrap_err();
        assert!(matches!(err, DispatchError::Send(_)));
    }
}
