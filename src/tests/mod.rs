//! Behavioural tests for chains, forks and the engine ledger.
//!
//! ## Test Organization
//!
//! - `common`: Counting step bodies shared by the other modules
//! - `basic`: Unconditional chains and ledger predicates
//! - `conditions`: Guard short-circuiting on a single chain
//! - `fork`: Branch lists and aggregate guards
//! - `subflow`: Nested chains, same-engine and separate-engine
//! - `report`: Error list, ids and snapshots
//!
//! ## Step Bodies
//!
//! - `Counters::good`: counts a run and succeeds
//! - `Counters::bad`: counts a run and returns `Err(Boom)`

mod common;

mod basic;
