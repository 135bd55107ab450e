//! Lexical tokens.
//!
//! A token is a kind tag (`"ID"`, `"+"`, `"EOF"`, ...), an optional decoded
//! payload, and the [`Mark`] of the text it came from. Kinds are open
//! strings rather than a closed enum: lexers are assembled from user rule
//! tables at runtime, so the set of kinds is not known to this crate.

use std::rc::Rc;

use serde::Serialize;

use crate::source::{Mark, Source};

/// The kind of the synthetic terminator every token stream ends with.
pub const EOF: &str = "EOF";

/// A decoded literal payload.
///
/// Punctuation and keyword tokens carry [`TokenValue::None`]; literal rules
/// decode their text into one of the typed variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// One lexical unit.
///
/// Equality compares kind and payload only; marks are provenance, not
/// identity.
#[derive(Debug, Clone)]
pub struct Token {
    pub mark: Mark,
    pub kind: String,
    value: TokenValue,
}

impl Token {
    pub fn new(mark: Mark, kind: impl Into<String>, value: TokenValue) -> Token {
        Token {
            mark,
            kind: kind.into(),
            value,
        }
    }

    /// A token with no payload, for punctuation and keywords.
    pub fn bare(mark: Mark, kind: impl Into<String>) -> Token {
        Token::new(mark, kind, TokenValue::None)
    }

    /// The zero-width terminator at end of input.
    pub fn eof(source: Rc<Source>) -> Token {
        let at = source.data.len();
        Token::bare(Mark::point(source, at), EOF)
    }

    /// The effective value: the decoded payload, or the kind itself when the
    /// payload is absent (so `"+"` tokens are worth the string `"+"`).
    pub fn value(&self) -> TokenValue {
        match &self.value {
            TokenValue::None => TokenValue::Str(self.kind.clone()),
            explicit => explicit.clone(),
        }
    }

    /// The payload exactly as the lexer produced it.
    pub fn raw_value(&self) -> &TokenValue {
        &self.value
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Token) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(at: usize) -> Mark {
        Mark::point(Source::from_string("dummy"), at)
    }

    #[test]
    fn test_equality_ignores_marks() {
        let a = Token::new(mark(0), "INT", TokenValue::Int(3));
        let b = Token::new(mark(4), "INT", TokenValue::Int(3));
        assert_eq!(a, b);
        assert_ne!(a, Token::new(mark(0), "INT", TokenValue::Int(4)));
    }

    #[test]
    fn test_value_falls_back_to_kind() {
        let plus = Token::bare(mark(0), "+");
        assert_eq!(plus.value(), TokenValue::Str("+".to_string()));
        assert_eq!(*plus.raw_value(), TokenValue::None);

        let lit = Token::new(mark(0), "STR", TokenValue::Str("hi".to_string()));
        assert_eq!(lit.value(), TokenValue::Str("hi".to_string()));
    }

    #[test]
    fn test_eof_is_zero_width() {
        let source = Source::from_string("abc");
        let eof = Token::eof(source);
        assert_eq!(eof.kind, EOF);
        assert_eq!(eof.mark.start, 3);
        assert_eq!(eof.mark.end, 3);
    }
}
