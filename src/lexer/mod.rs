//! Rule-table lexing.
//!
//! A [`Lexer`] is an ordered list of `(regex, callback)` rules plus a chain
//! of stream [adapters](crate::lexer::adapters). At each offset the *first*
//! rule whose pattern matches wins: ordering is the disambiguation
//! mechanism, so more specific patterns go earlier. A rule callback gets the
//! matched text and its [`Mark`] and returns zero or more tokens (zero for
//! skipped whitespace and comments). When no rule matches, lexing stops with
//! an "Unrecognized token" error pointing at the offset.
//!
//! ```
//! use beck::lexer::Lexer;
//! use beck::token::{Token, TokenValue};
//!
//! let lexer = Lexer::builder()
//!     .rule(r"\s+", |_, _| Ok(vec![]))
//!     .rule(r"\w+", |text, mark| {
//!         Ok(vec![Token::new(mark.clone(), "NAME", TokenValue::Str(text.to_string()))])
//!     })
//!     .build()
//!     .unwrap();
//! let tokens = lexer.lex_str("a b cc").unwrap();
//! assert_eq!(tokens.len(), 4); // three names and EOF
//! ```
//!
//! Rule patterns are compiled anchored (`\A`) with dot-matches-newline, and
//! a zero-width match is treated as a non-match so lexing always advances.

pub mod adapters;

use std::rc::Rc;
use std::sync::Arc;

use regex::Regex;

use crate::error::Error;
use crate::source::{Mark, Source};
use crate::token::Token;

/// A rule callback: matched text and mark in, tokens out.
pub type RuleAction = Arc<dyn Fn(&str, &Mark) -> Result<Vec<Token>, Error> + Send + Sync>;

/// A post-tokenization transform over the whole token vector. Adapters may
/// delete, insert, or rewrite tokens, and must preserve the trailing EOF.
pub type Adapter = Arc<dyn Fn(Vec<Token>) -> Result<Vec<Token>, Error> + Send + Sync>;

struct Rule {
    regex: Regex,
    action: RuleAction,
}

struct RuleSpec {
    pattern: String,
    action: RuleAction,
}

/// Collects rules and adapters, then compiles them into a [`Lexer`].
#[derive(Default)]
pub struct LexerBuilder {
    rules: Vec<RuleSpec>,
    adapters: Vec<Adapter>,
}

impl LexerBuilder {
    pub fn new() -> LexerBuilder {
        LexerBuilder::default()
    }

    /// Appends a rule; earlier rules win ties.
    pub fn rule(
        mut self,
        pattern: &str,
        action: impl Fn(&str, &Mark) -> Result<Vec<Token>, Error> + Send + Sync + 'static,
    ) -> LexerBuilder {
        self.rules.push(RuleSpec {
            pattern: pattern.to_string(),
            action: Arc::new(action),
        });
        self
    }

    /// Appends an adapter; adapters run in declaration order.
    pub fn adapter(mut self, adapter: Adapter) -> LexerBuilder {
        self.adapters.push(adapter);
        self
    }

    /// Compiles every rule pattern, surfacing the first bad regex.
    pub fn build(self) -> Result<Lexer, Error> {
        let mut rules = Vec::with_capacity(self.rules.len());
        for spec in self.rules {
            let anchored = format!(r"\A(?s:{})", spec.pattern);
            let regex = Regex::new(&anchored).map_err(|error| {
                Error::grammar(vec![], format!("invalid lexer rule {:?}: {error}", spec.pattern))
            })?;
            rules.push(Rule {
                regex,
                action: spec.action,
            });
        }
        Ok(Lexer {
            rules,
            adapters: self.adapters,
        })
    }
}

pub struct Lexer {
    rules: Vec<Rule>,
    adapters: Vec<Adapter>,
}

impl Lexer {
    pub fn builder() -> LexerBuilder {
        LexerBuilder::new()
    }

    /// Tokenizes a source: rules, then the EOF terminator, then adapters.
    /// Pure: lexing the same source twice gives the same tokens.
    pub fn lex(&self, source: Rc<Source>) -> Result<Vec<Token>, Error> {
        let data = &source.data;
        let mut tokens = Vec::new();
        let mut offset = 0;
        'scan: while offset < data.len() {
            for rule in &self.rules {
                let Some(found) = rule.regex.find(&data[offset..]) else {
                    continue;
                };
                if found.is_empty() {
                    continue;
                }
                let end = offset + found.end();
                let mark = Mark::new(source.clone(), offset, end);
                tokens.extend((rule.action)(found.as_str(), &mark)?);
                offset = end;
                continue 'scan;
            }
            return Err(Error::lex(
                vec![Mark::point(source.clone(), offset)],
                "Unrecognized token",
            ));
        }
        tokens.push(Token::eof(source));

        for adapter in &self.adapters {
            tokens = adapter(tokens)?;
        }
        Ok(tokens)
    }

    /// Tokenizes an in-memory string under the `<string>` path.
    pub fn lex_str(&self, text: &str) -> Result<Vec<Token>, Error> {
        self.lex(Source::from_string(text))
    }
}
