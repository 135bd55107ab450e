//! Everything a grammar author needs in one import.
//!
//! ```
//! use beck::prelude::*;
//!
//! let number: Pattern<Value> = tok("INT");
//! let pair = seq![number.clone(), ",", number].pick(0);
//! # let _ = pair;
//! ```

pub use crate::combinator::{
    any_token_but, bare, choice, many, many1, named, node, optional, peek, required,
    separated_list, sequence, tok, tok_value, Field, Forward, IntoPattern, MatchResult, NodeArgs,
    Pattern, UNBOUNDED,
};
pub use crate::error::Error;
pub use crate::lexer::{adapters, Lexer, LexerBuilder};
pub use crate::source::{Mark, Source};
pub use crate::stream::TokenStream;
pub use crate::token::{Token, TokenValue, EOF};
pub use crate::value::{ParseValue, Value};
pub use crate::{alt, seq};
