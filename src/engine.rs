//! The engine: entry point of a run and owner of its ledger.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::execution::run_step;
use crate::ledger::{Ledger, RunId};
use crate::snapshot::{LedgerSnapshot, StepSnapshot};
use crate::step::{IntoOutcome, ResultCode, StepRecord};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name used in logs and snapshots.
    pub name: Option<String>,
    /// Contain panics raised by step bodies and record them as `Failed`.
    ///
    /// When off, a panicking body unwinds through the combinator call.
    pub catch_panics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: None,
            catch_panics: true,
        }
    }
}

impl EngineConfig {
    /// Default configuration with a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set whether panics are contained.
    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }
}

#[derive(Debug)]
struct EngineInner {
    run_id: RunId,
    config: EngineConfig,
    ledger: Ledger,
    seq: AtomicUsize,
}

/// Owner of one run's ledger.
///
/// `Engine` is a cheap handle; clones share the same ledger. A step body can
/// start chains on the engine it runs under, or create and drive a separate
/// engine whose ledger never merges with this one.
#[derive(Debug, Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with the given configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                run_id: RunId::new(),
                config,
                ledger: Ledger::default(),
                seq: AtomicUsize::new(0),
            }),
        }
    }

    /// Identifier of this run.
    pub fn run_id(&self) -> RunId {
        self.inner.run_id
    }

    /// Configuration the engine was created with.
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Run `body` as the first step of a new chain.
    pub fn start<F, R>(&self, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        self.start_step(None, body)
    }

    /// Like [`start`](Self::start), attaching `label` to the step id.
    pub fn start_labeled<F, R>(&self, label: impl Into<Arc<str>>, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        self.start_step(Some(label.into()), body)
    }

    fn start_step<F, R>(&self, label: Option<Arc<str>>, body: F) -> Chain
    where
        F: FnOnce(&StepRecord) -> R,
        R: IntoOutcome,
    {
        let record = run_step(self, label, |r| body(r).into_outcome());
        Chain::new(self.clone(), record)
    }

    /// `true` if any recorded step is `Failed`.
    pub fn something_was_wrong(&self) -> bool {
        self.inner.ledger.any(ResultCode::Failed)
    }

    /// `true` if every recorded step is `Success`.
    ///
    /// `Warning` and `NotExecuted` records make this `false`. An empty ledger
    /// is all good.
    pub fn all_was_good(&self) -> bool {
        self.inner.ledger.all(ResultCode::Success)
    }

    /// Recorded steps whose code is `Failed`, in ledger order.
    pub fn failed_steps(&self) -> Vec<StepRecord> {
        self.inner.ledger.with_code(ResultCode::Failed)
    }

    /// Message and error detail of every failed step, one block per step.
    pub fn error_list(&self) -> String {
        self.failed_steps()
            .iter()
            .map(|r| r.outcome().describe())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All recorded steps, in ledger order.
    pub fn steps(&self) -> Vec<StepRecord> {
        self.inner.ledger.records()
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.inner.ledger.len()
    }

    /// `true` if no step has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of recorded steps with the given code.
    pub fn count(&self, code: ResultCode) -> usize {
        self.inner.ledger.with_code(code).len()
    }

    /// Serializable view of the ledger.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            run_id: self.run_id(),
            name: self.config().name.clone(),
            steps: self.steps().iter().map(StepSnapshot::from).collect(),
        }
    }

    pub(crate) fn ledger(&self) -> &Ledger {
        &self.inner.ledger
    }

    pub(crate) fn next_step_id(&self, label: Option<&str>) -> Arc<str> {
        let seq = self.inner.seq.fetch_add(1, Ordering::Relaxed) + 1;
        match label {
            Some(label) => format!("{seq}:{label}").into(),
            None => seq.to_string().into(),
        }
    }
}
