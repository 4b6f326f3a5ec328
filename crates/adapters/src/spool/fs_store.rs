//! Filesystem-backed [`SpoolStore`].
//!
//! One directory per sink. The filesystem's guarantees are the whole
//! concurrency story: `O_CREAT|O_EXCL` decides who writes the main
//! record, `O_APPEND` makes each detail append one bounded write, and
//! delete/rename atomicity makes sure at most one dispatcher owns a
//! file. No lock is held across any I/O call, and multiple processes
//! may share one directory.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use domain::event::entity::EventCategory;
use domain::record::aggregation::SpoolKey;
use domain::record::error::SpoolError;
use domain::record::spool_record::SpoolRecord;
use ports::secondary::spool_store::{SpoolHandle, SpoolStore};

/// Suffix appended to a spool file's name when delivery permanently
/// failed. Dead-lettered files are skipped by the backlog listing and
/// kept for manual operator inspection.
pub const DEAD_LETTER_SUFFIX: &str = ".failed";

pub struct FsSpoolStore {
    dir: PathBuf,
    seq: AtomicU64,
}

impl FsSpoolStore {
    /// A store rooted at `dir`. The directory is created lazily on the
    /// first write, so configuring a sink never touches the disk.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            seq: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Unique name for a non-mergeable unit: category prefix plus
    /// creation time, process id, and a process-local counter. Unique
    /// across processes sharing the directory without any coordination.
    fn unique_name(&self, category: EventCategory) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        format!(
            "{}-{:x}-{}-{:04}",
            category.as_str(),
            nanos,
            std::process::id(),
            self.seq.fetch_add(1, Ordering::Relaxed),
        )
    }
}

impl SpoolStore for FsSpoolStore {
    fn spool(&self, key: &SpoolKey, record: &SpoolRecord) -> Result<SpoolHandle, SpoolError> {
        fs::create_dir_all(&self.dir)?;
        let path = match &key.identity {
            Some(identity) => {
                let path = self.dir.join(identity);
                // O_EXCL decides the create-vs-append race: exactly one
                // writer creates the file and contributes the main
                // record, everyone else appends detail lines only.
                match OpenOptions::new().create_new(true).append(true).open(&path) {
                    Ok(mut file) => file.write_all(&record.to_bytes(key.category)?)?,
                    Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                        let mut file = OpenOptions::new().append(true).open(&path)?;
                        file.write_all(&record.detail_bytes()?)?;
                    }
                    Err(e) => return Err(e.into()),
                }
                path
            }
            None => {
                let path = self.dir.join(self.unique_name(key.category));
                let mut file = OpenOptions::new().create_new(true).append(true).open(&path)?;
                file.write_all(&record.to_bytes(key.category)?)?;
                path
            }
        };
        Ok(SpoolHandle {
            path,
            category: key.category,
        })
    }

    fn list_ready(&self) -> Result<Vec<SpoolHandle>, SpoolError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            // No directory yet means no backlog.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut handles = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.ends_with(DEAD_LETTER_SUFFIX) {
                continue;
            }
            match EventCategory::from_file_name(&name) {
                Some(category) => handles.push(SpoolHandle { path, category }),
                None => {
                    tracing::warn!(file = %path.display(), "foreign file in spool directory");
                }
            }
        }
        Ok(handles)
    }

    fn consume(&self, handle: &SpoolHandle) -> Result<SpoolRecord, SpoolError> {
        let bytes = match fs::read(&handle.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(SpoolError::Gone),
            Err(e) => return Err(e.into()),
        };
        SpoolRecord::from_bytes(handle.category, &bytes)
    }

    fn commit(&self, handle: &SpoolHandle) -> Result<(), SpoolError> {
        match fs::remove_file(&handle.path) {
            Ok(()) => Ok(()),
            // Another dispatcher won the race; the unit is delivered.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn dead_letter(&self, handle: &SpoolHandle) -> Result<(), SpoolError> {
        let mut dead = handle.path.clone().into_os_string();
        dead.push(DEAD_LETTER_SUFFIX);
        fs::rename(&handle.path, PathBuf::from(dead))?;
        Ok(())
    }

    fn event_time_ms(&self, handle: &SpoolHandle) -> Option<u64> {
        fs::metadata(&handle.path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64)
    }
}
