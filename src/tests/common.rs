//! Counting step bodies for tests.

use std::cell::Cell;

use crate::StepRecord;

/// Error returned by the failing step.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("Bad things happen")]
pub struct Boom;

/// Counts how many good and bad steps ran.
#[derive(Debug, Default)]
pub struct Counters {
    good: Cell<usize>,
    bad: Cell<usize>,
}

impl Counters {
    /// Succeeds.
    pub fn good(&self, _step: &StepRecord) {
        self.good.set(self.good.get() + 1);
    }

    /// Fails with `Boom`.
    pub fn bad(&self, _step: &StepRecord) -> Result<(), Boom> {
        self.bad.set(self.bad.get() + 1);
        Err(Boom)
    }

    pub fn good_count(&self) -> usize {
        self.good.get()
    }

    pub fn bad_count(&self) -> usize {
        self.bad.get()
    }

    pub fn total(&self) -> usize {
        self.good_count() + self.bad_count()
    }
}
