//! Shared mock implementations for tests in downstream crates.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Mutex;

use domain::message::entity::AuditMessage;
use domain::message::error::DispatchError;
use domain::record::aggregation::SpoolKey;
use domain::record::error::SpoolError;
use domain::record::spool_record::SpoolRecord;

use crate::secondary::spool_store::{SpoolHandle, SpoolStore};
use crate::secondary::transport::AuditTransport;

const DEAD_LETTER_SUFFIX: &str = ".failed";

#[derive(Default)]
struct MemoryState {
    files: BTreeMap<PathBuf, Vec<u8>>,
    seq: u64,
}

/// In-memory [`SpoolStore`] mirroring the filesystem adapter's naming and
/// dead-letter semantics, for tests that must not touch disk.
#[derive(Default)]
pub struct MemorySpoolStore {
    state: Mutex<MemoryState>,
}

impl MemorySpoolStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_count(&self) -> usize {
        self.state.lock().unwrap().files.len()
    }

    pub fn dead_letter_paths(&self) -> Vec<PathBuf> {
        self.state
            .lock()
            .unwrap()
            .files
            .keys()
            .filter(|p| is_dead_letter(p))
            .cloned()
            .collect()
    }

    pub fn raw_contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(path).cloned()
    }
}

fn is_dead_letter(path: &Path) -> bool {
    path.to_string_lossy().ends_with(DEAD_LETTER_SUFFIX)
}

impl SpoolStore for MemorySpoolStore {
    fn spool(&self, key: &SpoolKey, record: &SpoolRecord) -> Result<SpoolHandle, SpoolError> {
        let mut state = self.state.lock().unwrap();
        let path = match &key.identity {
            Some(identity) => PathBuf::from(identity),
            None => {
                state.seq += 1;
                PathBuf::from(format!("{}-{:08}", key.category.as_str(), state.seq))
            }
        };
        match state.files.entry(path.clone()) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().extend_from_slice(&record.detail_bytes()?);
            }
            Entry::Vacant(slot) => {
                slot.insert(record.to_bytes(key.category)?);
            }
        }
        Ok(SpoolHandle {
            path,
            category: key.category,
        })
    }

    fn list_ready(&self) -> Result<Vec<SpoolHandle>, SpoolError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .files
            .keys()
            .filter(|path| !is_dead_letter(path))
            .filter_map(|path| {
                let category =
                    domain::event::entity::EventCategory::from_file_name(&path.to_string_lossy())?;
                Some(SpoolHandle {
                    path: path.clone(),
                    category,
                })
            })
            .collect())
    }

    fn consume(&self, handle: &SpoolHandle) -> Result<SpoolRecord, SpoolError> {
        let state = self.state.lock().unwrap();
        let bytes = state.files.get(&handle.path).ok_or(SpoolError::Gone)?;
        SpoolRecord::from_bytes(handle.category, bytes)
    }

    fn commit(&self, handle: &SpoolHandle) -> Result<(), SpoolError> {
        self.state.lock().unwrap().files.remove(&handle.path);
        Ok(())
    }

    fn dead_letter(&self, handle: &SpoolHandle) -> Result<(), SpoolError> {
        let mut state = self.state.lock().unwrap();
        if let Some(bytes) = state.files.remove(&handle.path) {
            let mut dead = handle.path.clone().into_os_string();
            dead.push(DEAD_LETTER_SUFFIX);
            state.files.insert(PathBuf::from(dead), bytes);
        }
        Ok(())
    }
}

/// Transport that records every message it was asked to send.
#[derive(Default)]
pub struct CountingTransport {
    pub sent: Mutex<Vec<AuditMessage>>,
}

impl CountingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl AuditTransport for CountingTransport {
    fn send<'a>(
        &'a self,
        message: &'a AuditMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send + 'a>> {
        Box::pin(async move {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        })
    }
}

/// Transport that rejects every message.
pub struct FailingTransport;

impl AuditTransport for FailingTransport {
    fn send<'a>(
        &'a self,
        _message: &'a AuditMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send + 'a>> {
        Box::pin(async { Err(DispatchError::Send("collector unreachable".to_string())) })
    }
}

/// Transport that never completes; exercises the dispatcher's timeout.
pub struct HangingTransport;

impl AuditTransport for HangingTransport {
    fn send<'a>(
        &'a self,
        _message: &'a AuditMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send + 'a>> {
        Box::pin(std::future::pending())
    }
}
