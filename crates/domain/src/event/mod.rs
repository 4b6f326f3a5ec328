// Event model: occurrence enumeration, classification, spool-record mapping
pub mod entity;
pub mod spooling;
