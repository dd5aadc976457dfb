//! Unconditional chains and ledger predicates.

use crate::{Engine, EngineConfig, ResultCode, StepError};

use super::common::{Boom, Counters};

/// Every step of an unconditional chain is recorded.
#[test]
fn simple_flow() {
    let c = Counters::default();
    let engine = Engine::new();

    engine
        .start(|a| c.good(a))
        .continue_with(|a| c.good(a))
        .continue_with(|a| c.good(a));

    assert_eq!(c.good_count(), 3);
    assert_eq!(engine.len(), 3);
    assert!(engine.all_was_good());
    assert!(!engine.something_was_wrong());
}

/// Chains started on the same engine from inside a body share its ledger.
#[test]
fn nested_starts_on_same_engine() {
    let c = Counters::default();
    let engine = Engine::new();

    engine
        .start(|a| c.good(a))
        .continue_with(|a| c.good(a))
        .continue_with(|a| {
            c.good(a);
            engine
                .start(|b| c.good(b))
                .if_success(|b| c.good(b))
                .continue_with(|b| c.good(b));
            engine.start(|b| c.good(b)).continue_with(|b| c.good(b));
        })
        .continue_with(|a| {
            c.good(a);
            engine
                .start(|b| c.good(b))
                .continue_with(|b| c.good(b))
                .continue_with(|b| c.good(b))
                .continue_with(|b| c.good(b));
        });

    assert_eq!(c.good_count(), 13);
    assert_eq!(engine.len(), c.good_count());
    assert!(engine.all_was_good());
}

/// The enclosing step is appended after the steps its body ran.
#[test]
fn enclosing_step_is_appended_last() {
    let engine = Engine::new();
    let outer = engine
        .start(|_| {
            engine.start(|_| ResultCode::Warning);
        })
        .into_record();

    let steps = engine.steps();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].code(), ResultCode::Warning);
    assert!(steps[1].ptr_eq(&outer));
    assert_eq!(outer.id().as_deref(), Some("1"));
    assert_eq!(steps[0].id().as_deref(), Some("2"));
}

/// One failing step does not stop the chain.
#[test]
fn count_bad() {
    let c = Counters::default();
    let engine = Engine::new();

    engine
        .start(|a| c.good(a))
        .continue_with(|a| c.bad(a))
        .continue_with(|a| c.good(a));

    assert_eq!(c.total(), engine.len());
    assert_eq!(c.good_count(), engine.len() - c.bad_count());
    assert_eq!(engine.count(ResultCode::Failed), 1);
    assert!(!engine.all_was_good());
    assert!(engine.something_was_wrong());
}

/// Result-returning bodies are recorded with the code they return.
#[test]
fn returned_codes_are_recorded() {
    let engine = Engine::new();
    let chain = engine
        .start(|_| ResultCode::Warning)
        .continue_with(|_| ResultCode::NotExecuted)
        .continue_with(|_| Ok::<_, Boom>(ResultCode::Success));

    assert_eq!(chain.code(), ResultCode::Success);
    assert_eq!(engine.count(ResultCode::Warning), 1);
    assert_eq!(engine.count(ResultCode::NotExecuted), 1);
    assert!(!engine.all_was_good());
    assert!(!engine.something_was_wrong());
}

/// A body returning `Failed` without an error records no error.
#[test]
fn returned_failure_has_no_error() {
    let engine = Engine::new();
    let record = engine.start(|_| ResultCode::Failed).into_record();

    assert!(engine.something_was_wrong());
    assert!(record.error().is_none());
}

/// Errors propagated with `?` are captured on the record.
#[test]
fn question_mark_errors_are_captured() {
    fn parse(input: &str) -> Result<u32, std::num::ParseIntError> {
        input.parse()
    }

    let engine = Engine::new();
    let record = engine
        .start(|_| -> Result<(), crate::BoxError> {
            parse("12")?;
            parse("x")?;
            Ok(())
        })
        .into_record();

    assert_eq!(record.code(), ResultCode::Failed);
    let error = record.error().expect("error should be captured");
    assert!(matches!(*error, StepError::Raised(_)));
    assert_eq!(error.to_string(), "invalid digit found in string");
}

/// Panicking bodies are contained by default.
#[test]
fn panics_are_contained() {
    let c = Counters::default();
    let engine = Engine::new();

    let chain = engine
        .start(|_| -> () { panic!("step exploded") })
        .if_failed(|a| c.good(a));

    assert_eq!(chain.code(), ResultCode::Success);
    assert_eq!(engine.len(), 2);
    let failed = engine.failed_steps();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].error().is_some_and(|e| e.is_panic()));
}

/// With panic containment off, the panic reaches the caller.
#[test]
#[should_panic(expected = "step exploded")]
fn panics_escape_when_configured() {
    let engine = Engine::with_config(EngineConfig::default().with_catch_panics(false));
    engine.start(|_| -> () { panic!("step exploded") });
}

/// Ledger queries are read-only.
#[test]
fn queries_are_idempotent() {
    let c = Counters::default();
    let engine = Engine::new();
    engine
        .start(|a| c.good(a))
        .continue_with(|a| c.bad(a))
        .continue_with(|_| ResultCode::Warning);

    let first = (
        engine.something_was_wrong(),
        engine.all_was_good(),
        engine.failed_steps().len(),
        engine.error_list(),
    );
    for _ in 0..3 {
        let again = (
            engine.something_was_wrong(),
            engine.all_was_good(),
            engine.failed_steps().len(),
            engine.error_list(),
        );
        assert_eq!(again, first);
    }
    assert_eq!(engine.len(), 3);
}
