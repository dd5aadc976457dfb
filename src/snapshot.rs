//! Serializable export of an engine's ledger for diagnostics.

use serde::{Deserialize, Serialize};

use crate::ledger::RunId;
use crate::step::{ResultCode, StepRecord, StepTiming};

/// One recorded step, as plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSnapshot {
    /// Diagnostic id of the step.
    pub id: Option<String>,
    /// Result code at snapshot time.
    pub code: ResultCode,
    /// Message set by the body.
    pub message: Option<String>,
    /// Rendered contained error.
    pub error: Option<String>,
    /// Step timing.
    pub timing: StepTiming,
}

impl From<&StepRecord> for StepSnapshot {
    fn from(record: &StepRecord) -> Self {
        let outcome = record.outcome();
        Self {
            id: record.id().map(|id| id.to_string()),
            code: outcome.code,
            message: outcome.message,
            error: outcome.error.map(|e| e.detail()),
            timing: record.timing(),
        }
    }
}

/// Every step of one run, in ledger order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Run the steps belong to.
    pub run_id: RunId,
    /// Engine name, if configured.
    pub name: Option<String>,
    /// Recorded steps.
    pub steps: Vec<StepSnapshot>,
}

impl LedgerSnapshot {
    /// Number of steps with the given code.
    pub fn count(&self, code: ResultCode) -> usize {
        self.steps.iter().filter(|s| s.code == code).count()
    }
}
