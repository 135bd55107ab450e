//! The parser combinator engine.
//!
//! Grammars are built by composing [`Pattern`] values over the token kinds
//! a lexer produces, then matched against a [`crate::stream::TokenStream`]:
//!
//! ```
//! use beck::combinator::{tok, Forward};
//! use beck::value::Value;
//! use beck::{alt, seq};
//!
//! // expr := expr '+' NAME | NAME     (left-recursive on purpose)
//! let expr: Forward<Value> = Forward::declare("expr");
//! expr.define(alt![seq![&expr, "+", tok("NAME")], tok("NAME")]).unwrap();
//! ```
//!
//! Every pattern upholds one contract: match and leave the stream at the
//! end of the consumed input, or fail and leave the stream exactly where it
//! was. Alternation, repetition, and node construction are all built on
//! that guarantee; [`Forward`] adds memoization and the direct-left-
//! recursion rewrite on top.

pub mod combinators;
pub mod core;
pub mod forward;

pub use self::combinators::{
    any_token_but, bare, choice, many, many1, named, node, optional, peek, required,
    separated_list, sequence, tok, tok_value, Field, IntoPattern, NodeArgs, Pattern, UNBOUNDED,
};
pub use self::core::{MatchResult, ResultCallback};
pub use self::forward::Forward;
