//! Control-flow signals and the evaluator result type.
//!
//! `return`, `break`, and runtime errors unwind evaluation. They are not
//! values: they ride the `Err` side of [`Outcome`] so `?` propagates them
//! and the bounding constructs (function calls for `Return`, loops for
//! `Break`, the program for failures) must consume them explicitly.

use std::fmt;

use crate::value::Value;

/// An unwinding signal produced during evaluation.
#[derive(Debug, Clone)]
pub enum Signal {
    /// A `return` statement carrying its value up to the nearest call
    /// boundary (or the program itself).
    Return(Value),
    /// A `break` statement, consumed by the nearest `while`, `do-while`,
    /// or `foreach` boundary.
    Break,
    /// A runtime error with a human-readable message. Never caught
    /// in-language; the program's result.
    Failure(String),
}

impl Signal {
    pub fn failure(message: impl Into<String>) -> Self {
        Signal::Failure(message.into())
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Return(value) => write!(f, "return {}", value.inspect()),
            Signal::Break => write!(f, "break"),
            Signal::Failure(message) => write!(f, "ERROR: {message}"),
        }
    }
}

/// What evaluating a node produces: a value, or a signal unwinding past it.
pub type Outcome = Result<Value, Signal>;

/// Converts a `Return` signal into its carried value at a call boundary.
/// Other signals keep unwinding.
pub fn unwrap_return(outcome: Outcome) -> Outcome {
    match outcome {
        Err(Signal::Return(value)) => Ok(value),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_return_extracts_value() {
        let outcome = unwrap_return(Err(Signal::Return(Value::integer(7))));
        assert_eq!(outcome.unwrap().inspect(), "7");
    }

    #[test]
    fn unwrap_return_passes_other_signals() {
        assert!(matches!(
            unwrap_return(Err(Signal::Break)),
            Err(Signal::Break)
        ));
        assert!(matches!(
            unwrap_return(Err(Signal::failure("boom"))),
            Err(Signal::Failure(_))
        ));
        assert!(unwrap_return(Ok(Value::Null)).is_ok());
    }
}
