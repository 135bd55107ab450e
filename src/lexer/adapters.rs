//! Stock stream adapters.
//!
//! Adapters run after raw tokenization, in the order the lexer declared
//! them, each transforming the whole token vector. The three here implement
//! the newline/indentation discipline of an off-side-rule language:
//!
//! 1. [`suppress_grouped_newlines`] drops NEWLINE tokens inside bracket
//!    groups (except `{}` blocks, which keep their line structure), and
//!    rejects mismatched brackets while it is at it.
//! 2. [`collapse_newlines`] reduces each run of NEWLINE tokens to its last
//!    element, whose payload is the indentation of the line that follows.
//! 3. [`indentation`] turns those payloads into INDENT/DEDENT tokens.
//!
//! A lexer that wants Python-like structure chains them in that order; see
//! [`crate::lexers::script`].

use std::sync::Arc;

use crate::error::Error;
use crate::token::{Token, TokenValue, EOF};

use super::Adapter;

/// The kind of line-break tokens, carrying the following line's raw
/// indentation as their payload.
pub const NEWLINE: &str = "NEWLINE";
/// Synthesized when a line indents deeper than the one before it.
pub const INDENT: &str = "INDENT";
/// Synthesized when a line returns to a shallower indentation.
pub const DEDENT: &str = "DEDENT";

fn closer_for(opener: &str) -> &'static str {
    match opener {
        "(" => ")",
        "[" => "]",
        _ => "}",
    }
}

/// Drops NEWLINE tokens inside `(...)` and `[...]` groups while keeping
/// them inside `{...}`, and errors on unbalanced or mismatched brackets.
pub fn suppress_grouped_newlines() -> Adapter {
    Arc::new(|tokens| {
        let mut stack: Vec<Token> = Vec::new();
        let mut out = Vec::with_capacity(tokens.len());
        for token in tokens {
            match token.kind.as_str() {
                "(" | "[" | "{" => {
                    stack.push(token.clone());
                    out.push(token);
                }
                ")" | "]" | "}" => {
                    let Some(opener) = stack.pop() else {
                        return Err(Error::invalid_grouping(
                            vec![token.mark.clone()],
                            "Unmatched closing symbol",
                        ));
                    };
                    if closer_for(&opener.kind) != token.kind {
                        return Err(Error::invalid_grouping(
                            vec![opener.mark.clone(), token.mark.clone()],
                            "Mismatched grouping symbols",
                        ));
                    }
                    out.push(token);
                }
                NEWLINE if stack.last().is_some_and(|top| top.kind != "{") => {}
                _ => out.push(token),
            }
        }
        Ok(out)
    })
}

/// Collapses each run of consecutive NEWLINE tokens to its last element,
/// the one whose payload reflects the indentation of the next line.
pub fn collapse_newlines() -> Adapter {
    Arc::new(|tokens| {
        let mut out = Vec::with_capacity(tokens.len());
        for (index, token) in tokens.iter().enumerate() {
            let next_is_newline = tokens
                .get(index + 1)
                .is_some_and(|next| next.kind == NEWLINE);
            if token.kind == NEWLINE && next_is_newline {
                continue;
            }
            out.push(token.clone());
        }
        Ok(out)
    })
}

/// Synthesizes INDENT/DEDENT tokens from the raw-indent payloads of
/// NEWLINE tokens, re-emitting the NEWLINEs themselves bare. Maintains a
/// stack of indent strings; an indentation that matches no enclosing level
/// is an error. Open levels are closed with DEDENTs before EOF.
pub fn indentation() -> Adapter {
    Arc::new(|tokens| {
        let mut stack: Vec<String> = vec![String::new()];
        let mut out = Vec::with_capacity(tokens.len());
        for token in tokens {
            if token.kind == EOF {
                while stack.len() > 1 {
                    stack.pop();
                    out.push(Token::bare(token.mark.clone(), DEDENT));
                }
                out.push(token);
            } else if token.kind == NEWLINE {
                let indent = match token.raw_value() {
                    TokenValue::Str(s) => s.clone(),
                    _ => String::new(),
                };
                out.push(Token::bare(token.mark.clone(), NEWLINE));
                let current = stack.last().cloned().unwrap_or_default();
                if indent != current {
                    if indent.starts_with(&current) {
                        out.push(Token::bare(token.mark.clone(), INDENT));
                        stack.push(indent.clone());
                    } else {
                        while stack
                            .last()
                            .is_some_and(|top| *top != indent && top.starts_with(&indent))
                        {
                            stack.pop();
                            out.push(Token::bare(token.mark.clone(), DEDENT));
                        }
                    }
                }
                if stack.last().map(String::as_str) != Some(indent.as_str()) {
                    return Err(Error::invalid_indent(
                        vec![token.mark.clone()],
                        "Invalid indent",
                    ));
                }
            } else {
                out.push(token);
            }
        }
        Ok(out)
    })
}
