//! The rewindable token cursor.
//!
//! A [`TokenStream`] wraps the materialized lexer output with an integer
//! position that combinators save and restore to backtrack. It also owns
//! the memoization cache used exclusively by forward-rule matching: entries
//! are keyed by `(position, rule id)` and double as the re-entrancy guard
//! that turns unsupported left recursion into an error instead of a hang.
//!
//! A stream belongs to exactly one top-level parse; starting a new parse
//! means building a new stream (and with it, a fresh cache).

use std::collections::HashMap;

use crate::combinator::MatchResult;
use crate::token::Token;
use crate::value::ParseValue;

/// A memoization slot for one `(position, rule id)` pair.
#[derive(Debug, Clone)]
pub(crate) enum CacheEntry<V: ParseValue> {
    /// The rule is currently being matched at this position; hitting this
    /// again means the grammar recursed without consuming input.
    InProgress,
    /// The rule already ran here: restore `end` and replay `result`.
    Done { end: usize, result: MatchResult<V> },
}

pub struct TokenStream<V: ParseValue> {
    tokens: Vec<Token>,
    pos: usize,
    cache: HashMap<(usize, u64), CacheEntry<V>>,
}

impl<V: ParseValue> TokenStream<V> {
    /// Wraps lexer output. The vector must end with the EOF terminator.
    pub fn new(tokens: Vec<Token>) -> TokenStream<V> {
        assert!(
            !tokens.is_empty(),
            "a token stream requires at least the EOF terminator"
        );
        TokenStream {
            tokens,
            pos: 0,
            cache: HashMap::new(),
        }
    }

    /// The current token. Never fails: past the end, this stays on EOF.
    pub fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the current token and steps past it.
    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// The backtracking primitive: the saved position...
    pub fn state(&self) -> usize {
        self.pos
    }

    /// ...and its restoration.
    pub fn set_state(&mut self, state: usize) {
        self.pos = state;
    }

    pub(crate) fn cache_lookup(&self, key: (usize, u64)) -> Option<CacheEntry<V>> {
        self.cache.get(&key).cloned()
    }

    pub(crate) fn cache_mark_in_progress(&mut self, key: (usize, u64)) {
        self.cache.insert(key, CacheEntry::InProgress);
    }

    pub(crate) fn cache_store(&mut self, key: (usize, u64), end: usize, result: MatchResult<V>) {
        self.cache.insert(key, CacheEntry::Done { end, result });
    }

    pub(crate) fn cache_remove(&mut self, key: (usize, u64)) {
        self.cache.remove(&key);
    }
}
