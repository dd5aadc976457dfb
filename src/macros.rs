//! Macros for building fork branch lists.
//!
//! - `branches!`: predicate/body pairs for [`Chain::fork`](crate::Chain::fork)

/// Build a [`Branches`](crate::Branches) list from `predicate => body` pairs.
///
/// Each predicate and body is a closure taking `&StepRecord`. Pairs are kept
/// in the order written.
///
/// ```
/// use stepchain::{branches, Engine, ResultCode};
///
/// let engine = Engine::new();
/// let fork = engine
///     .start(|_| Err::<(), _>("boom"))
///     .fork(branches![
///         |s| s.is(ResultCode::Success) => |_| (),
///         |s| s.is(ResultCode::Failed) => |s| s.set_message("recovered"),
///     ]);
/// assert_eq!(fork.len(), 1);
/// ```
#[macro_export]
macro_rules! branches {
    ( $( $predicate:expr => $body:expr ),* $(,)? ) => {
        $crate::Branches::new() $( .arm($predicate, $body) )*
    };
}
