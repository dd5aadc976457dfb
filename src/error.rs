//! Errors captured at the step boundary.
//!
//! Nothing in the chaining API returns these to the caller. They are stored
//! inside the [`StepOutcome`](crate::StepOutcome) of the step that produced
//! them and surface through [`Engine::error_list`](crate::Engine::error_list)
//! or per-record inspection.

use std::error::Error as _;

/// Boxed error accepted from step bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error contained by the step execution wrapper.
#[derive(thiserror::Error, Debug)]
pub enum StepError {
    /// The body returned `Err`.
    #[error("{0}")]
    Raised(BoxError),

    /// The body panicked and the panic was caught.
    #[error("step panicked: {0}")]
    Panicked(String),
}

impl StepError {
    /// Build a `Panicked` error from a payload returned by `catch_unwind`.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = match payload.downcast::<&'static str>() {
            Ok(s) => (*s).to_owned(),
            Err(payload) => match payload.downcast::<String>() {
                Ok(s) => *s,
                Err(_) => "non-string panic payload".to_owned(),
            },
        };
        Self::Panicked(message)
    }

    /// Returns `true` if the error came from a caught panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }

    /// Render the error with its source chain, one cause per line.
    pub fn detail(&self) -> String {
        let mut out = self.to_string();
        if let Self::Raised(err) = self {
            let mut source = err.source();
            while let Some(cause) = source {
                out.push_str("\ncaused by: ");
                out.push_str(&cause.to_string());
                source = cause.source();
            }
        }
        out
    }
}
