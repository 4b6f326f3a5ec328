use std::path::PathBuf;

use domain::event::entity::EventCategory;
use domain::record::aggregation::SpoolKey;
use domain::record::error::SpoolError;
use domain::record::spool_record::SpoolRecord;

/// Handle to one spool file inside a sink's spool directory.
///
/// The category is recovered from the filename prefix so that a fresh
/// pipeline instance can dispatch backlog files it did not create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoolHandle {
    pub path: PathBuf,
    pub category: EventCategory,
}

/// Durable spool directory of one sink.
///
/// The filesystem's atomic append and atomic rename/delete are the only
/// concurrency-control primitives; implementations hold no lock across an
/// I/O call. Losing a commit race to another dispatcher is the expected,
/// safe outcome and is reported as success.
pub trait SpoolStore: Send + Sync {
    /// Write one spooled unit. For a mergeable key whose file already
    /// exists, only the record's detail lines are appended — the main
    /// record is written exactly once, by whoever creates the file.
    fn spool(&self, key: &SpoolKey, record: &SpoolRecord) -> Result<SpoolHandle, SpoolError>;

    /// Snapshot of the files currently eligible for dispatch.
    /// Dead-lettered files are excluded. The listing is not restartable
    /// over concurrent mutation; callers iterate the snapshot.
    fn list_ready(&self) -> Result<Vec<SpoolHandle>, SpoolError>;

    /// Read a spool file back into its in-memory form.
    fn consume(&self, handle: &SpoolHandle) -> Result<SpoolRecord, SpoolError>;

    /// Delete a delivered spool file. A file already gone is success.
    fn commit(&self, handle: &SpoolHandle) -> Result<(), SpoolError>;

    /// Mark a spool file as permanently failed by renaming it with the
    /// dead-letter suffix. Never retried automatically; kept for manual
    /// operator inspection.
    fn dead_letter(&self, handle: &SpoolHandle) -> Result<(), SpoolError>;

    /// The occurrence time of a spooled unit in ms since the UNIX epoch
    /// (the file's modified time, where the backend has one).
    fn event_time_ms(&self, _handle: &SpoolHandle) -> Option<u64> {
        None
    }
}
