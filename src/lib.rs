#![deny(missing_docs)]

//! Stepchain — fluent step chaining with outcome-based branching.
//!
//! # Design Goals
//!
//! - **Contained failures**: a step body that returns `Err` or panics is recorded
//!   as `Failed`; nothing escapes the step boundary
//! - **Outcome branching**: later steps run or skip based on the code of the step
//!   before them
//! - **Shared records**: a [`StepRecord`] is a handle, so a body may overwrite
//!   the code of any record it holds and later guards see the new value
//!
//! # Core Concepts
//!
//! - [`Engine`]: owns the append-only ledger of one run
//! - [`Chain`]: cursor over the last step, with `if_success`, `if_failed`, ...
//! - [`Fork`]: cursor over the steps produced by [`Chain::fork`], with
//!   `if_all_success`, `if_any_failed`, ...
//!
//! ```
//! use stepchain::{Engine, ResultCode};
//!
//! let engine = Engine::new();
//! engine
//!     .start(|_| ())
//!     .continue_with(|_| Err::<(), _>("disk full"))
//!     .if_failed(|s| s.set_message("cleanup"))
//!     .if_success(|_| ResultCode::Warning);
//!
//! assert_eq!(engine.len(), 4);
//! assert!(engine.something_was_wrong());
//! assert!(!engine.all_was_good());
//! ```

// Modules
pub mod chain;
pub mod engine;
pub mod error;
pub mod execution;
pub mod fork;
pub mod ledger;
mod macros;
pub mod snapshot;
pub mod step;

// Re-exports for convenience
pub use chain::Chain;
pub use engine::{Engine, EngineConfig};
pub use error::{BoxError, StepError};
pub use execution::Contained;
pub use fork::{Branches, Fork};
pub use ledger::RunId;
pub use snapshot::{LedgerSnapshot, StepSnapshot};
pub use step::{IntoOutcome, ResultCode, StepOutcome, StepRecord, StepTiming};

#[cfg(test)]
mod tests;
