use std::future::Future;
use std::pin::Pin;

use domain::event::entity::Occurrence;

/// Primary port: occurrence sources push domain events here.
///
/// Fire-and-forget by contract — implementations absorb and log every
/// spooling or delivery failure internally; an audit problem must never
/// surface into the triggering clinical workflow.
pub trait AuditRecorder: Send + Sync {
    fn record<'a>(
        &'a self,
        occurrence: Occurrence,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}
