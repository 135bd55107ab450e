//! Match results and the callback layer.
//!
//! Attempting a pattern at a stream position yields a [`MatchResult`]: a
//! plain value either way. Failure is the *expected* outcome of trying an
//! alternative that does not apply, so it travels as data; the `Result`
//! wrapper around matching is reserved for the fatal errors of
//! [`crate::error::Error`].

use std::rc::Rc;

use crate::error::Error;
use crate::source::Mark;
use crate::value::ParseValue;

/// The outcome of one match attempt.
///
/// Equality ignores marks: two successes are equal when their values are,
/// two failures when their messages are. That is what grammar tests want
/// to compare.
#[derive(Debug, Clone)]
pub enum MatchResult<V: ParseValue> {
    Success { mark: Mark, value: V },
    Failure { mark: Mark, message: String },
}

impl<V: ParseValue> MatchResult<V> {
    pub fn is_success(&self) -> bool {
        matches!(self, MatchResult::Success { .. })
    }

    pub fn mark(&self) -> &Mark {
        match self {
            MatchResult::Success { mark, .. } => mark,
            MatchResult::Failure { mark, .. } => mark,
        }
    }

    /// Unwraps the success value, converting a failure into the syntax
    /// error a top-level caller reports.
    pub fn into_value(self) -> Result<V, Error> {
        match self {
            MatchResult::Success { value, .. } => Ok(value),
            MatchResult::Failure { mark, message } => Err(Error::syntax(vec![mark], message)),
        }
    }
}

impl<V: ParseValue + PartialEq> PartialEq for MatchResult<V> {
    fn eq(&self, other: &MatchResult<V>) -> bool {
        match (self, other) {
            (
                MatchResult::Success { value: a, .. },
                MatchResult::Success { value: b, .. },
            ) => a == b,
            (
                MatchResult::Failure { message: a, .. },
                MatchResult::Failure { message: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}

/// A post-processing step attached to a pattern. Fallible so that the
/// list-shape transforms can report grammar misuse instead of panicking.
pub type ResultCallback<V> = Rc<dyn Fn(MatchResult<V>) -> Result<MatchResult<V>, Error>>;

/// Runs a fused callback chain over a result.
pub(crate) fn apply_callbacks<V: ParseValue>(
    mut result: MatchResult<V>,
    callbacks: &[ResultCallback<V>],
) -> Result<MatchResult<V>, Error> {
    for callback in callbacks {
        result = callback(result)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use crate::value::Value;

    fn mark(at: usize) -> Mark {
        Mark::point(Source::from_string("abcdef"), at)
    }

    #[test]
    fn test_equality_ignores_marks() {
        let a: MatchResult<Value> = MatchResult::Success {
            mark: mark(0),
            value: Value::Int(1),
        };
        let b = MatchResult::Success {
            mark: mark(3),
            value: Value::Int(1),
        };
        assert_eq!(a, b);

        let fail_a: MatchResult<Value> = MatchResult::Failure {
            mark: mark(0),
            message: "nope".to_string(),
        };
        let fail_b = MatchResult::Failure {
            mark: mark(5),
            message: "nope".to_string(),
        };
        assert_eq!(fail_a, fail_b);
        assert_ne!(a, fail_a);
    }

    #[test]
    fn test_into_value() {
        let ok: MatchResult<Value> = MatchResult::Success {
            mark: mark(0),
            value: Value::Int(7),
        };
        assert_eq!(ok.into_value().unwrap(), Value::Int(7));

        let bad: MatchResult<Value> = MatchResult::Failure {
            mark: mark(2),
            message: "Expected INT but got EOF".to_string(),
        };
        assert!(matches!(bad.into_value(), Err(Error::Syntax(_))));
    }
}
