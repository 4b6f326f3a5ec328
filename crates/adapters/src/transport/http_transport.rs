use std::future::Future;
use std::pin::Pin;

use domain::message::entity::AuditMessage;
use domain::message::error::DispatchError;
use ports::secondary::transport::AuditTransport;

/// Transport that POSTs audit messages as JSON to an HTTP collector
/// endpoint, with an optional static `Authorization` header value.
pub struct HttpAuditTransport {
    client: reqwest::Client,
    url: String,
    auth_header: Option<String>,
}

impl HttpAuditTransport {
    pub fn new(url: impl Into<String>, auth_header: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            auth_header,
        }
    }
}

impl AuditTransport for HttpAuditTransport {
    fn send<'a>(
        &'a self,
        message: &'a AuditMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send + 'a>> {
        Box::pin(async move {
            let mut request = self
                .client
                .post(&self.url)
                .header("Content-Type", "application/json");
            if let Some(auth) = &self.auth_header {
                request = request.header("Authorization", auth);
            }
            let body = serde_json::to_string(message)
                .map_err(|e| DispatchError::Send(format!("serialization failed: {e}")))?;
            let response = request
                .body(body)
                .send()
                .await
                .map_err(|e| DispatchError::Send(format!("POST {}: {e}", self.url)))?;
            if response.status().is_success() {
                Ok(())
            } else {
                Err(DispatchError::Send(format!(
                    "collector returned HTTP {}",
                    response.status()
                )))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_transport_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpAuditTransport>();
    }

    #[test]
    fn auth_header_is_optional() {
        let without = HttpAuditTransport::new("https://collector.example.org/audit", None);
        assert!(without.auth_header.is_none());
        let with = HttpAuditTransport::new(
            "https://collector.example.org/audit",
            Some("Bearer token".to_string()),
        );
        assert!(with.auth_header.is_some());
    }
}
