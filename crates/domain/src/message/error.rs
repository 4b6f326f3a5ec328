use thiserror::Error;

use crate::event::entity::EventCategory;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no message builder registered for category {0}")]
    MissingBuilder(EventCategory),

    #[error("message build failed: {0}")]
    Build(String),

    #[error("delivery failed: {0}")]
    Send(String),

    #[error("delivery timed out after {0} s")]
    Timeout(u64),
}
