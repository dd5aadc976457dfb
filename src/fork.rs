//! Multi-cursor combinators over the steps produced by [`Chain::fork`].
//!
//! Aggregate predicates are evaluated when the combinator is called, against
//! the members' current codes. A member whose code was overwritten after the
//! fork was created is seen with its new code.
//!
//! For an empty fork, `if_all_*` guards are vacuously true and `if_any_*`
//! guards are false.
//!
//! [`Chain::fork`]: crate::Chain::fork

use std::fmt;
use std::sync::Arc;

use crate::chain::Chain;
use crate::engine::Engine;
use crate::error::BoxError;
use crate::execution::run_step;
use crate::step::{IntoOutcome, ResultCode, StepRecord};

type Guard<'a> = Box<dyn FnOnce(&StepRecord) -> bool + 'a>;
type Body<'a> = Box<dyn FnOnce(&StepRecord) -> Result<Option<ResultCode>, BoxError> + 'a>;

pub(crate) struct Arm<'a> {
    pub(crate) label: Option<Arc<str>>,
    pub(crate) guard: Guard<'a>,
    pub(crate) body: Body<'a>,
}

/// Ordered list of predicate/body pairs for [`Chain::fork`].
///
/// Usually built with the [`branches!`](crate::branches) macro.
#[derive(Default)]
pub struct Branches<'a> {
    arms: Vec<Arm<'a>>,
}

impl<'a> Branches<'a> {
    /// Empty list.
    pub fn new() -> Self {
        Self { arms: Vec::new() }
    }

    /// Append a pair: `body` runs if `predicate` holds for the current step.
    pub fn arm<P, F, R>(self, predicate: P, body: F) -> Self
    where
        P: FnOnce(&StepRecord) -> bool + 'a,
        F: FnOnce(&StepRecord) -> R + 'a,
        R: IntoOutcome,
    {
        self.push(None, predicate, body)
    }

    /// Like [`arm`](Self::arm), attaching `label` to the step id.
    pub fn labeled_arm<P, F, R>(self, label: impl Into<Arc<str>>, predicate: P, body: F) -> Self
    where
        P: FnOnce(&StepRecord) -> bool + 'a,
        F: FnOnce(&StepRecord) -> R + 'a,
        R: IntoOutcome,
    {
        self.push(Some(label.into()), predicate, body)
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.arms.len()
    }

    /// `true` if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }

    pub(crate) fn into_arms(self) -> Vec<Arm<'a>> {
        self.arms
    }

    fn push<P, F, R>(mut self, label: Option<Arc<str>>, predicate: P, body: F) -> Self
    where
        P: FnOnce(&StepRecord) -> bool + 'a,
        F: FnOnce(&StepRecord) -> R + 'a,
        R: IntoOutcome,
    {
        self.arms.push(Arm {
            label,
            guard: Box::new(predicate),
            body: Box::new(move |record: &StepRecord| body(record).into_outcome()),
        });
        self
    }
}

impl fmt::Debug for Branches<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Branches")
            .field("len", &self.arms.len())
            .finish()
    }
}

/// Cursor over the fixed set of steps a fork produced.
#[derive(Debug, Clone)]
pub struct Fork {
    engine: Engine,
    members: Vec<StepRecord>,
    label: Option<Arc<str>>,
}

impl Fork {
    pub(crate) fn new(engine: Engine, members: Vec<StepRecord>) -> Self {
        Self {
            engine,
            members,
            label: None,
        }
    }

    /// Attach `label` to the id of the next step this fork runs.
    pub fn label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Steps captured when the fork was created, in branch order.
    pub fn members(&self) -> &[StepRecord] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// `true` if no branch matched.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Engine this fork records into.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// `true` if at least one member currently has `code`.
    pub fn any(&self, code: ResultCode) -> bool {
        self.members.iter().any(|m| m.is(code))
    }

    /// `true` if every member currently has `code`, or there are none.
    pub fn all(&self, code: ResultCode) -> bool {
        self.members.iter().all(|m| m.is(code))
    }

    /// Run `body` unconditionally.
    pub fn continue_with<F, R>(self, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        self.gate(true, body)
    }

    /// Run `body` if any member is `Success`.
    pub fn if_any_success<F, R>(self, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        let hit = self.any(ResultCode::Success);
        self.gate(hit, body)
    }

    /// Run `body` if every member is `Success`.
    pub fn if_all_success<F, R>(self, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        let hit = self.all(ResultCode::Success);
        self.gate(hit, body)
    }

    /// Run `body` if any member is `Failed`.
    pub fn if_any_failed<F, R>(self, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        let hit = self.any(ResultCode::Failed);
        self.gate(hit, body)
    }

    /// Run `body` if every member is `Failed`.
    pub fn if_all_failed<F, R>(self, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        let hit = self.all(ResultCode::Failed);
        self.gate(hit, body)
    }

    /// Run `body` if any member is `Warning`.
    pub fn if_any_warning<F, R>(self, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        let hit = self.any(ResultCode::Warning);
        self.gate(hit, body)
    }

    /// Run `body` if every member is `Warning`.
    pub fn if_all_warning<F, R>(self, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        let hit = self.all(ResultCode::Warning);
        self.gate(hit, body)
    }

    /// Run `body` if any member is `NotExecuted`.
    pub fn if_any_not_executed<F, R>(self, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        let hit = self.any(ResultCode::NotExecuted);
        self.gate(hit, body)
    }

    /// Run `body` if `predicate` holds for the member list.
    pub fn when<P, F, R>(self, predicate: P, body: F) -> Chain
    where
        P: FnOnce(&[StepRecord]) -> bool,
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        let hit = predicate(&self.members);
        self.gate(hit, body)
    }

    fn gate<F, R>(self, hit: bool, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        if !hit {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                run = %self.engine.run_id(),
                members = self.members.len(),
                "guard.miss"
            );
            return Chain::new(self.engine, StepRecord::placeholder());
        }
        let record = run_step(&self.engine, self.label, |r| body(r).into_outcome());
        Chain::new(self.engine, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fork_of(engine: &Engine, codes: &[ResultCode]) -> Fork {
        let mut branches = Branches::new();
        for &code in codes {
            branches = branches.arm(|_| true, move |_| code);
        }
        engine.start(|_| ()).fork(branches)
    }

    #[test]
    fn empty_fork_is_vacuous() {
        let engine = Engine::new();
        let fork = fork_of(&engine, &[]);
        assert!(fork.is_empty());
        assert!(fork.all(ResultCode::Success));
        assert!(fork.all(ResultCode::Failed));
        assert!(!fork.any(ResultCode::Success));

        let chain = fork.clone().if_all_warning(|_| ());
        assert_eq!(chain.code(), ResultCode::Success);
        let chain = fork.if_any_not_executed(|_| ());
        assert_eq!(chain.code(), ResultCode::NotExecuted);
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn mixed_members() {
        let engine = Engine::new();
        let fork = fork_of(&engine, &[ResultCode::Success, ResultCode::Warning]);
        assert_eq!(fork.len(), 2);

        assert_eq!(
            fork.clone().if_any_warning(|_| ()).code(),
            ResultCode::Success
        );
        assert_eq!(
            fork.clone().if_all_warning(|_| ()).code(),
            ResultCode::NotExecuted
        );
        assert_eq!(
            fork.clone().if_any_success(|_| ()).code(),
            ResultCode::Success
        );
        assert_eq!(
            fork.clone().if_all_success(|_| ()).code(),
            ResultCode::NotExecuted
        );
        assert_eq!(
            fork.clone().if_any_failed(|_| ()).code(),
            ResultCode::NotExecuted
        );
        assert_eq!(
            fork.clone().if_all_failed(|_| ()).code(),
            ResultCode::NotExecuted
        );
        assert_eq!(fork.continue_with(|_| ()).code(), ResultCode::Success);
        // start + 2 members + 3 fired guards
        assert_eq!(engine.len(), 6);
    }

    #[test]
    fn custom_aggregate_predicate() {
        let engine = Engine::new();
        let fork = fork_of(
            &engine,
            &[ResultCode::Success, ResultCode::Failed, ResultCode::Success],
        );
        let chain = fork.when(
            |members| members.iter().filter(|m| m.is(ResultCode::Success)).count() >= 2,
            |_| ResultCode::Warning,
        );
        assert_eq!(chain.code(), ResultCode::Warning);
    }

    #[test]
    fn branches_debug_shows_len() {
        let branches = Branches::new().arm(|_| true, |_| ());
        assert_eq!(format!("{branches:?}"), "Branches { len: 1 }");
        assert!(!branches.is_empty());
    }
}
