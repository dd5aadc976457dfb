//! Step execution protocol shared by [`Chain`](crate::Chain) and
//! [`Fork`](crate::Fork).
//!
//! [`contain`] is the step boundary: whatever the body does, it returns a
//! [`Contained`] value and never lets an error or (by default) a panic escape.
//! [`run_step`] wraps it with record creation, settlement, logging and the
//! ledger append.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::engine::Engine;
use crate::error::{BoxError, StepError};
use crate::step::{ResultCode, StepRecord};

/// What came out of invoking a step body.
#[derive(Debug)]
pub enum Contained {
    /// The body returned. `None` is the void form.
    Returned(Option<ResultCode>),
    /// The body returned `Err` or panicked.
    Caught(StepError),
}

impl From<Contained> for Result<Option<ResultCode>, StepError> {
    fn from(contained: Contained) -> Self {
        match contained {
            Contained::Returned(code) => Ok(code),
            Contained::Caught(err) => Err(err),
        }
    }
}

/// Invoke `body` against `record`, converting errors and panics into
/// [`Contained::Caught`].
///
/// With `catch_panics` off, a panicking body unwinds through this call.
pub fn contain<F>(body: F, record: &StepRecord, catch_panics: bool) -> Contained
where
    F: FnOnce(&StepRecord) -> Result<Option<ResultCode>, BoxError>,
{
    let returned = if catch_panics {
        match panic::catch_unwind(AssertUnwindSafe(|| body(record))) {
            Ok(returned) => returned,
            Err(payload) => return Contained::Caught(StepError::from_panic(payload)),
        }
    } else {
        body(record)
    };

    match returned {
        Ok(code) => Contained::Returned(code),
        Err(err) => Contained::Caught(StepError::Raised(err)),
    }
}

/// Execute one step on `engine` and append its record to the ledger.
///
/// The record is appended after the body finishes, so steps the body itself
/// runs on the same engine land in the ledger first.
pub(crate) fn run_step<F>(engine: &Engine, label: Option<Arc<str>>, body: F) -> StepRecord
where
    F: FnOnce(&StepRecord) -> Result<Option<ResultCode>, BoxError>,
{
    let id = engine.next_step_id(label.as_deref());
    let record = StepRecord::begin(id.clone());

    #[cfg(feature = "tracing")]
    tracing::info!(run = %engine.run_id(), step = %id, "step.start");

    let contained = contain(body, &record, engine.config().catch_panics);

    #[cfg(feature = "tracing")]
    trace_caught(engine, &id, &contained);

    record.settle(contained.into());

    #[cfg(feature = "tracing")]
    tracing::info!(
        run = %engine.run_id(),
        step = %id,
        code = %record.code(),
        duration_ms = record.timing().duration_ms().unwrap_or_default(),
        "step.end"
    );

    engine.ledger().append(record.clone());
    record
}

#[cfg(feature = "tracing")]
fn trace_caught(engine: &Engine, id: &str, contained: &Contained) {
    if let Contained::Caught(err) = contained {
        tracing::warn!(run = %engine.run_id(), step = id, error = %err, "step.failed");
    }
}
