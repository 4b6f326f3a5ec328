// Transport adapters: structured log, TCP collector, HTTP collector
pub mod http_transport;
pub mod log_transport;
pub mod tcp_transport;
