//! Run identity and the append-only step ledger.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::step::{ResultCode, StepRecord};

/// Get the current Unix timestamp in milliseconds.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Unique identifier of one engine run, used to correlate log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new random run ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered, append-only list of executed step records.
///
/// The lock is held only for the duration of one call, never across a step
/// body, so bodies can append nested steps to the ledger they run under.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    records: RwLock<Vec<StepRecord>>,
}

impl Ledger {
    pub(crate) fn append(&self, record: StepRecord) {
        self.records.write().push(record);
    }

    pub(crate) fn len(&self) -> usize {
        self.records.read().len()
    }

    pub(crate) fn records(&self) -> Vec<StepRecord> {
        self.records.read().clone()
    }

    pub(crate) fn with_code(&self, code: ResultCode) -> Vec<StepRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.is(code))
            .cloned()
            .collect()
    }

    pub(crate) fn any(&self, code: ResultCode) -> bool {
        self.records.read().iter().any(|r| r.is(code))
    }

    pub(crate) fn all(&self, code: ResultCode) -> bool {
        self.records.read().iter().all(|r| r.is(code))
    }
}
