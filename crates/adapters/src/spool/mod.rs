// Durable spool storage on the local filesystem
pub mod fs_store;
