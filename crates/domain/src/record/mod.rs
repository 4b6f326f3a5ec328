// Spool record model: field map, line codec, on-disk unit, aggregation key
pub mod aggregation;
pub mod codec;
pub mod error;
pub mod fields;
pub mod spool_record;
