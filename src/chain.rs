//! Single-cursor continuation combinators.
//!
//! Every combinator consumes the chain, runs zero or one step, and returns a
//! new chain wrapping what it produced. A guard that evaluates `false` yields
//! a chain over an unrecorded `NotExecuted` placeholder, so only
//! [`Chain::if_not_executed`], [`Chain::continue_with`] and custom
//! [`Chain::when`] predicates can fire after it.

use std::sync::Arc;

use crate::engine::Engine;
use crate::execution::run_step;
use crate::fork::{Branches, Fork};
use crate::step::{IntoOutcome, ResultCode, StepRecord};

/// Cursor over the step most recently produced on an engine.
#[derive(Debug, Clone)]
pub struct Chain {
    engine: Engine,
    current: StepRecord,
    label: Option<Arc<str>>,
}

impl Chain {
    pub(crate) fn new(engine: Engine, current: StepRecord) -> Self {
        Self {
            engine,
            current,
            label: None,
        }
    }

    /// Attach `label` to the id of the next step this chain runs.
    pub fn label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The step this chain points at.
    pub fn current(&self) -> &StepRecord {
        &self.current
    }

    /// Result code of the current step.
    pub fn code(&self) -> ResultCode {
        self.current.code()
    }

    /// Engine this chain records into.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Give up the chain, keeping its current record.
    pub fn into_record(self) -> StepRecord {
        self.current
    }

    /// Run `body` unconditionally.
    pub fn continue_with<F, R>(self, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        self.run(body)
    }

    /// Run `body` if the current step is `Success`.
    pub fn if_success<F, R>(self, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        self.if_code(ResultCode::Success, body)
    }

    /// Run `body` if the current step is `Failed`.
    pub fn if_failed<F, R>(self, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        self.if_code(ResultCode::Failed, body)
    }

    /// Run `body` if the current step is `Warning`.
    pub fn if_warning<F, R>(self, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        self.if_code(ResultCode::Warning, body)
    }

    /// Run `body` if the current step is `NotExecuted`.
    pub fn if_not_executed<F, R>(self, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        self.if_code(ResultCode::NotExecuted, body)
    }

    /// Run `body` if `predicate` holds for the current step.
    pub fn when<P, F, R>(self, predicate: P, body: F) -> Chain
    where
        P: FnOnce(&StepRecord) -> bool,
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        if predicate(&self.current) {
            self.run(body)
        } else {
            self.skip()
        }
    }

    /// Run every branch whose predicate holds for the current step.
    ///
    /// Predicates are evaluated in order against the same current step, each
    /// matching body runs as its own step, and the resulting records become
    /// the members of the returned [`Fork`]. No match gives an empty fork.
    pub fn fork(self, branches: Branches<'_>) -> Fork {
        let mut members = Vec::with_capacity(branches.len());
        for arm in branches.into_arms() {
            if (arm.guard)(&self.current) {
                let label = arm.label.or_else(|| self.label.clone());
                members.push(run_step(&self.engine, label, arm.body));
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            run = %self.engine.run_id(),
            matched = members.len(),
            "fork.created"
        );
        Fork::new(self.engine, members)
    }

    fn if_code<F, R>(self, code: ResultCode, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        if self.current.is(code) {
            self.run(body)
        } else {
            self.skip()
        }
    }

    fn run<F, R>(self, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        let record = run_step(&self.engine, self.label, |r| body(r).into_outcome());
        Chain::new(self.engine, record)
    }

    fn skip(self) -> Chain {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            run = %self.engine.run_id(),
            code = %self.current.code(),
            "guard.miss"
        );
        Chain::new(self.engine, StepRecord::placeholder())
    }
}
