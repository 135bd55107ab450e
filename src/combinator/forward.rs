//! Forward rule declarations and direct left recursion.
//!
//! A [`Forward`] breaks the chicken-and-egg problem of self-referential
//! grammars: declare a named cell, hand out [`Forward::pattern`] references
//! (including inside the cell's own definition), then wire the definition in
//! with [`Forward::define`].
//!
//! `define` immediately analyzes the definition's shape. A choice whose
//! alternative starts with the cell itself,
//!
//! ```text
//! expr := expr '+' term
//!       | expr '-' term
//!       | term
//! ```
//!
//! would recurse forever under naive descent, so it is rewritten once,
//! structurally, into a seed-and-grow rule: match the non-recursive
//! alternatives for a seed, then iteratively extend it with the postfix of
//! each recursive alternative (`'+' term`, `'-' term`) for as long as one
//! applies. The result is the same left-associative shape recursive descent
//! cannot produce, at constant stack depth.
//!
//! Matching a forward rule is also memoized in the stream's cache keyed by
//! `(position, cell id)`. The in-progress sentinel that protects the cache
//! doubles as the detector for recursion the rewrite does not support
//! (indirect cycles, or recursion hidden behind a nullable prefix): hitting
//! a slot that is still in progress means the grammar recursed without
//! consuming anything, which is reported instead of looping.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Error;
use crate::source::Mark;
use crate::stream::{CacheEntry, TokenStream};
use crate::value::ParseValue;

use super::combinators::{choice, Pattern, PatternKind};
use super::core::{apply_callbacks, MatchResult, ResultCallback};

static NEXT_RULE_ID: AtomicU64 = AtomicU64::new(0);

/// A declared, possibly not-yet-defined grammar rule.
#[derive(Clone)]
pub struct Forward<V: ParseValue> {
    cell: Rc<ForwardCell<V>>,
}

pub(crate) struct ForwardCell<V: ParseValue> {
    pub(crate) id: u64,
    pub(crate) name: String,
    resolved: RefCell<Option<Pattern<V>>>,
}

impl<V: ParseValue> Forward<V> {
    /// Declares an empty cell. The name only appears in diagnostics.
    pub fn declare(name: impl Into<String>) -> Forward<V> {
        Forward {
            cell: Rc::new(ForwardCell {
                id: NEXT_RULE_ID.fetch_add(1, Ordering::Relaxed),
                name: name.into(),
                resolved: RefCell::new(None),
            }),
        }
    }

    /// A pattern referencing this cell, usable before `define` runs.
    pub fn pattern(&self) -> Pattern<V> {
        Pattern::from_kind(PatternKind::Forward(self.cell.clone()))
    }

    /// Wires in the definition, analyzing and rewriting direct left
    /// recursion on the spot so malformed grammars fail here, not mid-parse.
    pub fn define(&self, definition: Pattern<V>) -> Result<(), Error> {
        if self.cell.resolved.borrow().is_some() {
            return Err(Error::grammar(
                vec![],
                format!("rule {} defined twice", self.cell.name),
            ));
        }
        let resolved = rewrite_left_recursion(&self.cell, definition)?;
        *self.cell.resolved.borrow_mut() = Some(resolved);
        Ok(())
    }
}

/// One recursive alternative, reduced to what happens after the
/// self-reference.
pub(crate) struct GrowArm<V: ParseValue> {
    postfix: Vec<Pattern<V>>,
    callbacks: Vec<ResultCallback<V>>,
}

/// The rewritten form of a directly left-recursive rule.
pub(crate) struct LeftRecursiveRule<V: ParseValue> {
    name: String,
    base: Pattern<V>,
    outer: Vec<ResultCallback<V>>,
    arms: Vec<GrowArm<V>>,
}

fn rewrite_left_recursion<V: ParseValue>(
    cell: &Rc<ForwardCell<V>>,
    definition: Pattern<V>,
) -> Result<Pattern<V>, Error> {
    let (alternation, outer) = match &*definition.kind {
        PatternKind::Mapped { inner, callbacks } => (inner.clone(), callbacks.clone()),
        _ => (definition.clone(), Vec::new()),
    };
    let alternatives = match &*alternation.kind {
        PatternKind::Choice(alternatives) => alternatives.clone(),
        _ => return Ok(definition),
    };

    let mut bases = Vec::new();
    let mut arms = Vec::new();
    for alternative in alternatives {
        let (sub, callbacks) = match &*alternative.kind {
            PatternKind::Mapped { inner, callbacks } => (inner.clone(), callbacks.clone()),
            _ => (alternative.clone(), Vec::new()),
        };
        let elements = match &*sub.kind {
            PatternKind::Sequence(elements) if leads_with_cell(cell, elements) => elements.clone(),
            _ => {
                bases.push(alternative);
                continue;
            }
        };
        if elements.len() == 1 {
            return Err(Error::left_recursion(
                vec![],
                format!("problematic reduction {0} -> {0}", cell.name),
            ));
        }
        arms.push(GrowArm {
            postfix: elements[1..].to_vec(),
            callbacks,
        });
    }

    if arms.is_empty() {
        return Ok(definition);
    }
    if bases.is_empty() {
        return Err(Error::left_recursion(
            vec![],
            format!("non-terminal left recursion ({})", cell.name),
        ));
    }
    tracing::debug!(
        target: "beck::combinator",
        rule = %cell.name,
        bases = bases.len(),
        arms = arms.len(),
        "rewrote direct left recursion"
    );
    Ok(Pattern::from_kind(PatternKind::LeftRecursive(
        LeftRecursiveRule {
            name: cell.name.clone(),
            base: choice(bases),
            outer,
            arms,
        },
    )))
}

fn leads_with_cell<V: ParseValue>(cell: &Rc<ForwardCell<V>>, elements: &[Pattern<V>]) -> bool {
    matches!(
        elements.first().map(|p| &*p.kind),
        Some(PatternKind::Forward(other)) if other.id == cell.id
    )
}

/// Matches a forward reference through the stream's memoization cache.
pub(crate) fn match_forward<V: ParseValue>(
    cell: &Rc<ForwardCell<V>>,
    stream: &mut TokenStream<V>,
) -> Result<MatchResult<V>, Error> {
    let resolved = cell.resolved.borrow().clone();
    let Some(resolved) = resolved else {
        return Err(Error::grammar(
            vec![stream.peek().mark.clone()],
            format!("rule {} used before being defined", cell.name),
        ));
    };

    let key = (stream.state(), cell.id);
    match stream.cache_lookup(key) {
        Some(CacheEntry::InProgress) => {
            return Err(Error::left_recursion(
                vec![stream.peek().mark.clone()],
                format!("unsupported left recursion involving rule {}", cell.name),
            ));
        }
        Some(CacheEntry::Done { end, result }) => {
            tracing::trace!(
                target: "beck::combinator",
                rule = %cell.name,
                position = key.0,
                "memoized match replayed"
            );
            stream.set_state(end);
            return Ok(result);
        }
        None => {}
    }

    stream.cache_mark_in_progress(key);
    match resolved.match_at(stream) {
        Ok(result) => {
            stream.cache_store(key, stream.state(), result.clone());
            Ok(result)
        }
        Err(error) => {
            stream.cache_remove(key);
            Err(error)
        }
    }
}

impl<V: ParseValue> LeftRecursiveRule<V> {
    pub(crate) fn match_at(&self, stream: &mut TokenStream<V>) -> Result<MatchResult<V>, Error> {
        let seed = self.base.match_at(stream)?;
        let mut result = apply_callbacks(seed, &self.outer)?;

        'grow: loop {
            let (seed_mark, seed_value) = match &result {
                MatchResult::Success { mark, value } => (mark.clone(), value.clone()),
                MatchResult::Failure { .. } => break,
            };
            let round_state = stream.state();
            let round_mark = stream.peek().mark.clone();

            for arm in &self.arms {
                let mut values = vec![seed_value.clone()];
                let mut end_mark = None;
                for postfix in &arm.postfix {
                    match postfix.match_at(stream)? {
                        MatchResult::Success { mark, value } => {
                            values.push(value);
                            end_mark = Some(mark);
                        }
                        MatchResult::Failure { .. } => {
                            end_mark = None;
                            break;
                        }
                    }
                }
                if values.len() == arm.postfix.len() + 1 {
                    let mark = match &end_mark {
                        Some(end) => Mark {
                            source: seed_mark.source.clone(),
                            start: seed_mark.start,
                            end: end.end,
                            main: Some(round_mark.i()),
                        },
                        None => seed_mark.clone(),
                    };
                    let candidate = MatchResult::Success {
                        mark,
                        value: V::from_list(values),
                    };
                    let candidate = apply_callbacks(candidate, &arm.callbacks)?;
                    let candidate = apply_callbacks(candidate, &self.outer)?;
                    if candidate.is_success() {
                        tracing::trace!(
                            target: "beck::combinator",
                            rule = %self.name,
                            "extended left-recursive match"
                        );
                        result = candidate;
                        // An extension that consumed nothing would grow
                        // forever; keep it and stop.
                        if stream.state() == round_state {
                            break 'grow;
                        }
                        continue 'grow;
                    }
                }
                // This arm (or its callbacks) did not pan out; rewind for
                // the next one.
                stream.set_state(round_state);
            }
            // No arm extended the match: the accumulated result stands.
            break;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::{sequence, tok};
    use crate::source::Source;
    use crate::token::Token;
    use crate::value::Value;
    use crate::{alt, seq};

    fn tokens(kinds: &[&str]) -> Vec<Token> {
        let source = Source::from_string(kinds.join(" "));
        let mut offset = 0;
        let mut out: Vec<Token> = Vec::new();
        for kind in kinds {
            let mark = Mark::new(source.clone(), offset, offset + kind.len());
            out.push(Token::bare(mark, *kind));
            offset += kind.len() + 1;
        }
        out.push(Token::eof(source));
        out
    }

    #[test]
    fn test_plain_definition_passes_through() {
        let rule: Forward<Value> = Forward::declare("greeting");
        rule.define(seq!["hello", "world"]).unwrap();
        assert_eq!(
            rule.pattern().parse(tokens(&["hello", "world"])).unwrap(),
            Value::list(["hello".into(), "world".into()])
        );
    }

    #[test]
    fn test_use_before_define_is_grammar_error() {
        let rule: Forward<Value> = Forward::declare("ghost");
        assert!(matches!(
            rule.pattern().parse(tokens(&["x"])),
            Err(Error::Grammar(_))
        ));
    }

    #[test]
    fn test_define_twice_is_grammar_error() {
        let rule: Forward<Value> = Forward::declare("dup");
        rule.define(tok("x")).unwrap();
        assert!(matches!(rule.define(tok("y")), Err(Error::Grammar(_))));
    }

    #[test]
    fn test_left_recursion_is_rewritten() {
        let expr: Forward<Value> = Forward::declare("expr");
        expr.define(alt![seq![&expr, "+", tok("n")], tok("n")])
            .unwrap();
        let resolved = expr.cell.resolved.borrow().clone().unwrap();
        assert!(matches!(
            &*resolved.kind,
            PatternKind::LeftRecursive(_)
        ));
    }

    #[test]
    fn test_no_base_case_fails_at_define() {
        let expr: Forward<Value> = Forward::declare("expr");
        let err = expr
            .define(alt![seq![&expr, "+"], seq![&expr, "-"]])
            .unwrap_err();
        assert!(matches!(err, Error::LeftRecursion(_)));
        assert_eq!(
            err.diagnostic().message,
            "non-terminal left recursion (expr)"
        );
    }

    #[test]
    fn test_self_reduction_fails_at_define() {
        let expr: Forward<Value> = Forward::declare("expr");
        let err = expr
            .define(alt![sequence(vec![expr.pattern()]), tok("n")])
            .unwrap_err();
        assert!(matches!(err, Error::LeftRecursion(_)));
        assert_eq!(err.diagnostic().message, "problematic reduction expr -> expr");
    }
}
