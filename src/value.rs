//! Parse values.
//!
//! The combinator engine is generic over the value type grammars produce.
//! [`ParseValue`] is the small contract it needs: build a value from a
//! consumed token, collect sub-values into one, and take such a collection
//! apart again for the list-shaped transforms (`pick`, `flatten`,
//! `separated_by`). Consumers with a typed AST implement it on their own
//! node type; everyone else uses the stock dynamic [`Value`].

use std::fmt;

use crate::token::{Token, TokenValue};

/// The value contract the engine requires.
pub trait ParseValue: Clone + fmt::Debug + 'static {
    /// The value of a consumed terminal token.
    fn from_token(token: &Token) -> Self;

    /// The value of a sequence or repetition of sub-matches.
    fn from_list(items: Vec<Self>) -> Self;

    /// Deconstructs a value built by [`ParseValue::from_list`]. Returns the
    /// value unchanged in the error position when it is not list-shaped.
    fn into_list(self) -> Result<Vec<Self>, Self>;
}

/// The stock dynamic value: what a grammar produces when it has no AST of
/// its own. Mirrors the payload kinds tokens carry, plus lists.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl ParseValue for Value {
    fn from_token(token: &Token) -> Value {
        match token.value() {
            TokenValue::None => Value::Str(token.kind.clone()),
            TokenValue::Bool(b) => Value::Bool(b),
            TokenValue::Int(n) => Value::Int(n),
            TokenValue::Float(x) => Value::Float(x),
            TokenValue::Str(s) => Value::Str(s),
        }
    }

    fn from_list(items: Vec<Value>) -> Value {
        Value::List(items)
    }

    fn into_list(self) -> Result<Vec<Value>, Value> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(other),
        }
    }
}

impl Value {
    /// Convenience for building expected values in tests and callbacks.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Value {
        Value::List(items.into_iter().collect())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Value {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s)
    }
}
