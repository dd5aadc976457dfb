//! Step outcome types and the shared step record.
//!
//! A [`StepRecord`] is a handle: cloning it shares the same outcome. Any
//! holder may read or overwrite the result code, including step bodies that
//! reach back into an enclosing step after running a nested chain.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{BoxError, StepError};
use crate::ledger::now_millis;

/// Outcome code of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResultCode {
    /// The step never ran, or a guard was false.
    #[default]
    NotExecuted,
    /// The step completed successfully.
    Success,
    /// The step failed or its body raised an error.
    Failed,
    /// The step completed with a warning.
    Warning,
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotExecuted => "NotExecuted",
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Warning => "Warning",
        };
        f.write_str(name)
    }
}

/// Everything recorded about how a step ended.
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    /// The result code.
    pub code: ResultCode,
    /// Error contained at the step boundary, if the body raised.
    pub error: Option<Arc<StepError>>,
    /// Free-form message set by the body.
    pub message: Option<String>,
}

impl StepOutcome {
    /// Human-readable block: message first, then error detail.
    ///
    /// Empty when neither is set.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        if let Some(message) = self.message.as_deref().filter(|m| !m.is_empty()) {
            out.push_str(message);
            out.push('\n');
        }
        if let Some(error) = &self.error {
            out.push_str(&error.detail());
            out.push('\n');
        }
        out
    }
}

/// Wall-clock timing of a step (Unix millis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepTiming {
    /// When the body was invoked.
    pub started_at: u64,
    /// When the outcome was settled, if it was.
    pub completed_at: Option<u64>,
}

impl StepTiming {
    fn start() -> Self {
        Self {
            started_at: now_millis(),
            completed_at: None,
        }
    }

    fn complete(&mut self) {
        self.completed_at = Some(now_millis());
    }

    /// Get the duration in milliseconds, if completed.
    pub fn duration_ms(&self) -> Option<u64> {
        self.completed_at
            .map(|end| end.saturating_sub(self.started_at))
    }
}

#[derive(Debug, Default)]
struct RecordState {
    id: Option<Arc<str>>,
    outcome: StepOutcome,
    timing: StepTiming,
    // Set by `set_code`; lets a void body's own write beat the implicit Success.
    code_written: bool,
}

/// Shared handle to the record of one executed step.
///
/// Clones point at the same record. Locks are only taken for the duration of
/// a single accessor call, so bodies may freely use the record they were
/// handed while they run.
#[derive(Debug, Clone, Default)]
pub struct StepRecord {
    inner: Arc<RwLock<RecordState>>,
}

impl StepRecord {
    /// A `NotExecuted` record with no id, returned when a guard is false.
    ///
    /// Placeholders are never appended to a ledger.
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub(crate) fn begin(id: Arc<str>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RecordState {
                id: Some(id),
                timing: StepTiming::start(),
                ..RecordState::default()
            })),
        }
    }

    /// Diagnostic id; `None` for placeholders.
    pub fn id(&self) -> Option<Arc<str>> {
        self.inner.read().id.clone()
    }

    /// Current result code.
    pub fn code(&self) -> ResultCode {
        self.inner.read().outcome.code
    }

    /// Returns `true` if the current code equals `code`.
    pub fn is(&self, code: ResultCode) -> bool {
        self.code() == code
    }

    /// Overwrite the result code.
    ///
    /// Allowed from any holder at any time. Later guards on this record, and
    /// forks that contain it, observe the new value.
    pub fn set_code(&self, code: ResultCode) {
        let mut state = self.inner.write();
        state.outcome.code = code;
        state.code_written = true;
    }

    /// Attach a message to the outcome.
    pub fn set_message(&self, message: impl Into<String>) {
        self.inner.write().outcome.message = Some(message.into());
    }

    /// Message attached to the outcome, if any.
    pub fn message(&self) -> Option<String> {
        self.inner.read().outcome.message.clone()
    }

    /// Error contained at the step boundary, if any.
    pub fn error(&self) -> Option<Arc<StepError>> {
        self.inner.read().outcome.error.clone()
    }

    /// Copy of the full outcome.
    pub fn outcome(&self) -> StepOutcome {
        self.inner.read().outcome.clone()
    }

    /// Timing of the step.
    pub fn timing(&self) -> StepTiming {
        self.inner.read().timing
    }

    /// Returns `true` if both handles point at the same record.
    pub fn ptr_eq(&self, other: &StepRecord) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Settle the outcome after the body finished.
    pub(crate) fn settle(&self, returned: Result<Option<ResultCode>, StepError>) {
        let mut state = self.inner.write();
        match returned {
            Ok(Some(code)) => state.outcome.code = code,
            Ok(None) => {
                if !state.code_written {
                    state.outcome.code = ResultCode::Success;
                }
            }
            Err(error) => {
                state.outcome.error = Some(Arc::new(error));
                state.outcome.code = ResultCode::Failed;
            }
        }
        state.timing.complete();
    }
}

/// Conversion from a step body's return value into an outcome.
///
/// - `()` is the void form: recorded `Success` on normal return.
/// - [`ResultCode`] is recorded exactly as returned.
/// - `Result<T, E>` lets bodies use `?`; `Err` is contained and recorded as
///   `Failed`.
pub trait IntoOutcome {
    /// `Ok(None)` means "void body returned normally".
    fn into_outcome(self) -> Result<Option<ResultCode>, BoxError>;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<Option<ResultCode>, BoxError> {
        Ok(None)
    }
}

impl IntoOutcome for ResultCode {
    fn into_outcome(self) -> Result<Option<ResultCode>, BoxError> {
        Ok(Some(self))
    }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: IntoOutcome,
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<Option<ResultCode>, BoxError> {
        match self {
            Ok(value) => value.into_outcome(),
            Err(err) => Err(err.into()),
        }
    }
}
