pub mod message_builder;
pub mod metrics_port;
pub mod spool_store;
pub mod transport;
