//! # beck: a token-stream parser combinator engine
//!
//! beck parses by composing small patterns over a lexed token stream:
//!
//! ```text
//! Source → Lexer (rules + adapters) → Vec<Token> → TokenStream → Pattern → value
//! ```
//!
//! ## Pipeline components
//!
//! * **Lexing** ([`lexer`]): ordered first-match-wins regex rules produce
//!   tokens; stream adapters then reshape the token vector (newline
//!   suppression inside brackets, INDENT/DEDENT synthesis, ...).
//! * **Matching** ([`combinator`]): sequencing, alternation, repetition,
//!   mapping, and node construction over a rewindable [`stream::TokenStream`].
//!   Failed matches are ordinary values that restore the stream position,
//!   which is all backtracking needs.
//! * **Left recursion** ([`combinator::Forward`]): grammars may reference
//!   themselves; a directly left-recursive rule (`expr := expr '+' term |
//!   term`) is structurally rewritten into an iterative seed-and-grow loop
//!   when it is defined, and forward-rule matches are memoized per stream
//!   position. Unsupported (indirect) left recursion is detected and
//!   reported rather than looping.
//! * **Values** ([`value`]): grammars produce any type implementing
//!   [`value::ParseValue`]; the stock [`value::Value`] covers the common
//!   dynamic case.
//! * **Errors** ([`error`]): expected parse failures stay values; fatal
//!   conditions (lex dead ends, grammar bugs, `required` checkpoints)
//!   surface as one [`error::Error`] enum rendered with source excerpts
//!   and carets.
//!
//! ## A small grammar
//!
//! ```
//! use beck::combinator::{tok, Forward};
//! use beck::value::Value;
//! use beck::{alt, seq};
//!
//! let tokens = beck::lexers::arithmetic().lex_str("1 + 2 + 3").unwrap();
//!
//! let expr: Forward<Value> = Forward::declare("expr");
//! expr.define(alt![seq![&expr, "+", tok("INT")], tok("INT")]).unwrap();
//!
//! let value = expr.pattern().parse(tokens).unwrap();
//! // Left-associative: ((1 + 2) + 3)
//! assert_eq!(
//!     value,
//!     Value::list([
//!         Value::list([Value::Int(1), "+".into(), Value::Int(2)]),
//!         "+".into(),
//!         Value::Int(3),
//!     ])
//! );
//! ```

pub mod combinator;
pub mod error;
pub mod lexer;
pub mod lexers;
pub mod prelude;
pub mod source;
pub mod stream;
pub mod token;
pub mod value;

pub use error::{Diagnostic, Error};
pub use source::{Mark, Source};
pub use stream::TokenStream;
pub use token::{Token, TokenValue};
pub use value::{ParseValue, Value};
