//! Error types.
//!
//! Ordinary failed matches are *values* ([`crate::combinator::MatchResult::Failure`])
//! and never pass through here. [`Error`] is reserved for the fatal cases:
//! lexing dead ends, malformed stream structure, grammar bugs, and the
//! deliberate [`required`](crate::combinator::Pattern::required) escape hatch.

use std::fmt;

use thiserror::Error;

use crate::source::Mark;

/// Marks plus a message, rendered with source excerpts and carets.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub marks: Vec<Mark>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(marks: Vec<Mark>, message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            marks,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for mark in &self.marks {
            write!(f, "\n{}", mark.info())?;
        }
        Ok(())
    }
}

/// Every fatal failure the lexing/parsing pipeline can produce.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// No lexer rule matched at the current offset.
    #[error("{0}")]
    Lex(Diagnostic),
    /// A string literal contained an undecodable escape sequence.
    #[error("{0}")]
    InvalidEscape(Diagnostic),
    /// The bracket-tracking adapter saw unbalanced or mismatched grouping.
    #[error("{0}")]
    InvalidGrouping(Diagnostic),
    /// The indentation adapter saw an inconsistent indent.
    #[error("{0}")]
    InvalidIndent(Diagnostic),
    /// Malformed input: an unresolved parse failure surfaced at the top
    /// level or at a `required` checkpoint.
    #[error("{0}")]
    Syntax(Diagnostic),
    /// A grammar that can never terminate: left recursion without a base
    /// case, or indirect left recursion caught at match time.
    #[error("{0}")]
    LeftRecursion(Diagnostic),
    /// Grammar-authoring misuse: indexing a non-list value, a missing named
    /// field, an undefined or doubly-defined forward rule, a bad rule regex.
    #[error("{0}")]
    Grammar(Diagnostic),
}

impl Error {
    pub fn lex(marks: Vec<Mark>, message: impl Into<String>) -> Error {
        Error::Lex(Diagnostic::new(marks, message))
    }

    pub fn invalid_escape(marks: Vec<Mark>, message: impl Into<String>) -> Error {
        Error::InvalidEscape(Diagnostic::new(marks, message))
    }

    pub fn invalid_grouping(marks: Vec<Mark>, message: impl Into<String>) -> Error {
        Error::InvalidGrouping(Diagnostic::new(marks, message))
    }

    pub fn invalid_indent(marks: Vec<Mark>, message: impl Into<String>) -> Error {
        Error::InvalidIndent(Diagnostic::new(marks, message))
    }

    pub fn syntax(marks: Vec<Mark>, message: impl Into<String>) -> Error {
        Error::Syntax(Diagnostic::new(marks, message))
    }

    pub fn left_recursion(marks: Vec<Mark>, message: impl Into<String>) -> Error {
        Error::LeftRecursion(Diagnostic::new(marks, message))
    }

    pub fn grammar(marks: Vec<Mark>, message: impl Into<String>) -> Error {
        Error::Grammar(Diagnostic::new(marks, message))
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            Error::Lex(d)
            | Error::InvalidEscape(d)
            | Error::InvalidGrouping(d)
            | Error::InvalidIndent(d)
            | Error::Syntax(d)
            | Error::LeftRecursion(d)
            | Error::Grammar(d) => d,
        }
    }
}
