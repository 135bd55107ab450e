//! The pattern algebra.
//!
//! A [`Pattern`] is an immutable, cheaply clonable handle onto a node of the
//! grammar graph. Matching one against a [`TokenStream`] upholds the single
//! contract everything else depends on: on success the stream is left at the
//! end of the consumed input, on failure it is restored to where the attempt
//! started. Compound patterns get backtracking for free from that contract.
//!
//! Construction is by free functions ([`tok`], [`sequence`], [`choice`],
//! [`node`], ...) plus the [`seq!`](crate::seq) / [`alt!`](crate::alt)
//! macros, and refinement methods (`map`, `pick`, `many`, `required`, ...)
//! that wrap a pattern in further processing.

use std::rc::Rc;

use crate::error::Error;
use crate::source::Mark;
use crate::stream::TokenStream;
use crate::token::{Token, TokenValue, EOF};
use crate::value::ParseValue;

use super::core::{apply_callbacks, MatchResult, ResultCallback};
use super::forward::{self, ForwardCell, LeftRecursiveRule};

/// No upper bound for [`Pattern::repeat`].
pub const UNBOUNDED: usize = usize::MAX;

/// A handle onto one node of a grammar graph.
#[derive(Clone)]
pub struct Pattern<V: ParseValue> {
    pub(crate) kind: Rc<PatternKind<V>>,
}

pub(crate) enum PatternKind<V: ParseValue> {
    /// Matches one token by kind (and payload, when given).
    Terminal {
        kind: String,
        value: Option<TokenValue>,
    },
    /// Matches any one token whose kind is not listed; never consumes EOF.
    AnyTokenBut { kinds: Vec<String> },
    /// Ordered conjunction; collects sub-values into a list.
    Sequence(Vec<Pattern<V>>),
    /// Ordered alternation; first success wins.
    Choice(Vec<Pattern<V>>),
    /// Greedy bounded repetition.
    Repeat {
        inner: Pattern<V>,
        min: usize,
        max: usize,
    },
    /// A pattern with a fused chain of post-processing callbacks.
    Mapped {
        inner: Pattern<V>,
        callbacks: Vec<ResultCallback<V>>,
    },
    /// Matches without consuming.
    Peek(Pattern<V>),
    /// A sequence over named/bare fields that builds one node value.
    Node {
        fields: Vec<Field<V>>,
        build: Rc<dyn Fn(NodeArgs<V>) -> Result<V, Error>>,
    },
    /// A reference to a (possibly not yet defined) forward rule.
    Forward(Rc<ForwardCell<V>>),
    /// The rewritten form of a directly left-recursive forward rule.
    LeftRecursive(LeftRecursiveRule<V>),
}

/// One element of a [`node`] pattern: matched and kept under a name, or
/// matched and discarded.
pub struct Field<V: ParseValue> {
    pub(crate) name: Option<String>,
    pub(crate) pattern: Pattern<V>,
}

/// Binds a field pattern's value to `name` in the built node.
pub fn named<V: ParseValue>(name: &str, pattern: impl IntoPattern<V>) -> Field<V> {
    Field {
        name: Some(name.to_string()),
        pattern: pattern.into_pattern(),
    }
}

/// A field that must match but whose value is discarded. The first bare
/// field anchors the node's mark (so an operator node points at its
/// operator).
pub fn bare<V: ParseValue>(pattern: impl IntoPattern<V>) -> Field<V> {
    Field {
        name: None,
        pattern: pattern.into_pattern(),
    }
}

/// What a [`node`] build function receives: the covering mark and the named
/// sub-values, in match order.
pub struct NodeArgs<V: ParseValue> {
    pub mark: Mark,
    fields: Vec<(String, V)>,
}

impl<V: ParseValue> NodeArgs<V> {
    /// Removes and returns the value captured under `name`.
    pub fn take(&mut self, name: &str) -> Result<V, Error> {
        match self.fields.iter().position(|(n, _)| n == name) {
            Some(index) => Ok(self.fields.remove(index).1),
            None => Err(Error::grammar(
                vec![self.mark.clone()],
                format!("node field {name} was not captured"),
            )),
        }
    }
}

/// Conversion into a pattern, so grammars can mention token kinds as plain
/// strings the way they mention sub-rules.
pub trait IntoPattern<V: ParseValue> {
    fn into_pattern(self) -> Pattern<V>;
}

impl<V: ParseValue> IntoPattern<V> for Pattern<V> {
    fn into_pattern(self) -> Pattern<V> {
        self
    }
}

impl<V: ParseValue> IntoPattern<V> for &Pattern<V> {
    fn into_pattern(self) -> Pattern<V> {
        self.clone()
    }
}

impl<V: ParseValue> IntoPattern<V> for &str {
    fn into_pattern(self) -> Pattern<V> {
        tok(self)
    }
}

impl<V: ParseValue> IntoPattern<V> for String {
    fn into_pattern(self) -> Pattern<V> {
        tok(&self)
    }
}

impl<V: ParseValue> IntoPattern<V> for &super::forward::Forward<V> {
    fn into_pattern(self) -> Pattern<V> {
        self.pattern()
    }
}

/// Builds a sequence pattern; elements may be patterns or token-kind
/// strings. `seq![]` matches nothing and produces an empty list.
#[macro_export]
macro_rules! seq {
    ($($element:expr),* $(,)?) => {
        $crate::combinator::sequence(vec![
            $($crate::combinator::IntoPattern::into_pattern($element)),*
        ])
    };
}

/// Builds a choice pattern; alternatives may be patterns or token-kind
/// strings.
#[macro_export]
macro_rules! alt {
    ($($alternative:expr),* $(,)?) => {
        $crate::combinator::choice(vec![
            $($crate::combinator::IntoPattern::into_pattern($alternative)),*
        ])
    };
}

/// Matches one token of the given kind.
pub fn tok<V: ParseValue>(kind: &str) -> Pattern<V> {
    Pattern::from_kind(PatternKind::Terminal {
        kind: kind.to_string(),
        value: None,
    })
}

/// Matches one token of the given kind carrying the given effective value.
pub fn tok_value<V: ParseValue>(kind: &str, value: TokenValue) -> Pattern<V> {
    Pattern::from_kind(PatternKind::Terminal {
        kind: kind.to_string(),
        value: Some(value),
    })
}

/// Matches any single token whose kind is not listed. EOF never matches,
/// so unbounded skips terminate.
pub fn any_token_but<V: ParseValue>(kinds: &[&str]) -> Pattern<V> {
    Pattern::from_kind(PatternKind::AnyTokenBut {
        kinds: kinds.iter().map(|k| k.to_string()).collect(),
    })
}

/// Ordered conjunction of `elements`; the value is the list of sub-values.
pub fn sequence<V: ParseValue>(elements: Vec<Pattern<V>>) -> Pattern<V> {
    Pattern::from_kind(PatternKind::Sequence(elements))
}

/// Ordered alternation; nested choices are flattened at construction so a
/// grammar's alternatives stay visible to left-recursion analysis.
pub fn choice<V: ParseValue>(alternatives: Vec<Pattern<V>>) -> Pattern<V> {
    let mut flat = Vec::with_capacity(alternatives.len());
    for alternative in alternatives {
        match &*alternative.kind {
            PatternKind::Choice(inner) => flat.extend(inner.iter().cloned()),
            _ => flat.push(alternative),
        }
    }
    Pattern::from_kind(PatternKind::Choice(flat))
}

/// Matches `pattern` without consuming input.
pub fn peek<V: ParseValue>(pattern: impl IntoPattern<V>) -> Pattern<V> {
    Pattern::from_kind(PatternKind::Peek(pattern.into_pattern()))
}

/// Runs the field patterns in order like a sequence, then hands the named
/// values and covering mark to `build`. The mark anchors at the first bare
/// field's match when there is one.
pub fn node<V: ParseValue>(
    build: impl Fn(NodeArgs<V>) -> Result<V, Error> + 'static,
    fields: Vec<Field<V>>,
) -> Pattern<V> {
    Pattern::from_kind(PatternKind::Node {
        fields,
        build: Rc::new(build),
    })
}

/// Free-function form of [`Pattern::many`].
pub fn many<V: ParseValue>(pattern: impl IntoPattern<V>) -> Pattern<V> {
    pattern.into_pattern().many()
}

/// Free-function form of [`Pattern::many1`].
pub fn many1<V: ParseValue>(pattern: impl IntoPattern<V>) -> Pattern<V> {
    pattern.into_pattern().many1()
}

/// Free-function form of [`Pattern::optional`].
pub fn optional<V: ParseValue>(pattern: impl IntoPattern<V>) -> Pattern<V> {
    pattern.into_pattern().optional()
}

/// Free-function form of [`Pattern::separated_by`].
pub fn separated_list<V: ParseValue>(
    item: impl IntoPattern<V>,
    separator: impl IntoPattern<V>,
) -> Pattern<V> {
    item.into_pattern().separated_by(separator)
}

/// Free-function form of [`Pattern::required`].
pub fn required<V: ParseValue>(pattern: impl IntoPattern<V>) -> Pattern<V> {
    pattern.into_pattern().required()
}

impl<V: ParseValue> Pattern<V> {
    pub(crate) fn from_kind(kind: PatternKind<V>) -> Pattern<V> {
        Pattern {
            kind: Rc::new(kind),
        }
    }

    /// Attempts this pattern at the stream's current position.
    ///
    /// Returns `Ok(Failure)` for an ordinary non-match (with the stream
    /// restored); `Err` only for the fatal cases of [`Error`].
    pub fn match_at(&self, stream: &mut TokenStream<V>) -> Result<MatchResult<V>, Error> {
        match &*self.kind {
            PatternKind::Terminal { kind, value } => {
                let token = stream.peek().clone();
                let kind_ok = token.kind == *kind;
                let value_ok = value.as_ref().map_or(true, |v| token.value() == *v);
                if kind_ok && value_ok {
                    stream.advance();
                    Ok(MatchResult::Success {
                        mark: token.mark.clone(),
                        value: V::from_token(&token),
                    })
                } else {
                    let message = match value {
                        Some(v) if kind_ok => format!(
                            "Expected {} {:?} but got {:?}",
                            kind,
                            v,
                            token.value()
                        ),
                        _ => format!("Expected {} but got {}", kind, token.kind),
                    };
                    Ok(MatchResult::Failure {
                        mark: token.mark,
                        message,
                    })
                }
            }
            PatternKind::AnyTokenBut { kinds } => {
                let token = stream.peek().clone();
                if token.kind == EOF {
                    Ok(MatchResult::Failure {
                        mark: token.mark,
                        message: "Unexpected end of input".to_string(),
                    })
                } else if kinds.contains(&token.kind) {
                    Ok(MatchResult::Failure {
                        mark: token.mark.clone(),
                        message: format!("Unexpected {}", token.kind),
                    })
                } else {
                    stream.advance();
                    Ok(MatchResult::Success {
                        mark: token.mark.clone(),
                        value: V::from_token(&token),
                    })
                }
            }
            PatternKind::Sequence(elements) => {
                let start = stream.state();
                let entry_mark = stream.peek().mark.clone();
                let mut values = Vec::with_capacity(elements.len());
                let mut span: Option<(Mark, Mark)> = None;
                for element in elements {
                    match element.match_at(stream)? {
                        MatchResult::Success { mark, value } => {
                            values.push(value);
                            span = Some(match span {
                                Some((first, _)) => (first, mark),
                                None => (mark.clone(), mark),
                            });
                        }
                        failure => {
                            stream.set_state(start);
                            return Ok(failure);
                        }
                    }
                }
                Ok(MatchResult::Success {
                    mark: span_mark(&entry_mark, span),
                    value: V::from_list(values),
                })
            }
            PatternKind::Choice(alternatives) => {
                let entry_mark = stream.peek().mark.clone();
                let mut best: Option<MatchResult<V>> = None;
                for alternative in alternatives {
                    let result = alternative.match_at(stream)?;
                    if result.is_success() {
                        return Ok(result);
                    }
                    // Keep the failure that progressed furthest; ties go to
                    // the later alternative, which is usually the most
                    // specific one.
                    let further = best
                        .as_ref()
                        .map_or(true, |b| result.mark().i() >= b.mark().i());
                    if further {
                        best = Some(result);
                    }
                }
                Ok(best.unwrap_or(MatchResult::Failure {
                    mark: entry_mark,
                    message: "empty choice".to_string(),
                }))
            }
            PatternKind::Repeat { inner, min, max } => {
                let start = stream.state();
                let entry_mark = stream.peek().mark.clone();
                let mut values = Vec::new();
                let mut span: Option<(Mark, Mark)> = None;
                while values.len() < *max {
                    let before = stream.state();
                    match inner.match_at(stream)? {
                        MatchResult::Success { mark, value } => {
                            values.push(value);
                            span = Some(match span {
                                Some((first, _)) => (first, mark),
                                None => (mark.clone(), mark),
                            });
                            // A match that consumed nothing would repeat
                            // forever; one is enough.
                            if stream.state() == before {
                                break;
                            }
                        }
                        failure => {
                            if values.len() < *min {
                                stream.set_state(start);
                                return Ok(failure);
                            }
                            tracing::debug!(
                                target: "beck::combinator",
                                collected = values.len(),
                                "repetition stopped collecting"
                            );
                            break;
                        }
                    }
                }
                Ok(MatchResult::Success {
                    mark: span_mark(&entry_mark, span),
                    value: V::from_list(values),
                })
            }
            PatternKind::Mapped { inner, callbacks } => {
                let start = stream.state();
                let result = apply_callbacks(inner.match_at(stream)?, callbacks)?;
                // A callback may turn a success into a failure; the
                // backtracking contract still has to hold.
                if !result.is_success() {
                    stream.set_state(start);
                }
                Ok(result)
            }
            PatternKind::Peek(inner) => {
                let start = stream.state();
                let result = inner.match_at(stream)?;
                stream.set_state(start);
                Ok(result)
            }
            PatternKind::Node { fields, build } => {
                let start = stream.state();
                let entry_mark = stream.peek().mark.clone();
                let mut captured = Vec::new();
                let mut anchor: Option<Mark> = None;
                let mut span: Option<(Mark, Mark)> = None;
                for field in fields {
                    match field.pattern.match_at(stream)? {
                        MatchResult::Success { mark, value } => {
                            if field.name.is_none() && anchor.is_none() {
                                anchor = Some(mark.clone());
                            }
                            if let Some(name) = &field.name {
                                captured.push((name.clone(), value));
                            }
                            span = Some(match span {
                                Some((first, _)) => (first, mark),
                                None => (mark.clone(), mark),
                            });
                        }
                        failure => {
                            stream.set_state(start);
                            return Ok(failure);
                        }
                    }
                }
                let mut mark = span_mark(&entry_mark, span);
                if let Some(anchor) = anchor {
                    mark = mark.with_main(anchor.i());
                }
                let value = build(NodeArgs {
                    mark: mark.clone(),
                    fields: captured,
                })?;
                Ok(MatchResult::Success { mark, value })
            }
            PatternKind::Forward(cell) => forward::match_forward(cell, stream),
            PatternKind::LeftRecursive(rule) => rule.match_at(stream),
        }
    }

    /// Matches against a fresh stream over `tokens`.
    pub fn match_tokens(&self, tokens: Vec<Token>) -> Result<MatchResult<V>, Error> {
        let mut stream = TokenStream::new(tokens);
        self.match_at(&mut stream)
    }

    /// The top-level entry point: matches `tokens` and converts an
    /// unresolved failure into a syntax error.
    pub fn parse(&self, tokens: Vec<Token>) -> Result<V, Error> {
        self.match_tokens(tokens)?.into_value()
    }

    /// Greedy repetition between `min` and `max` matches.
    pub fn repeat(&self, min: usize, max: usize) -> Pattern<V> {
        Pattern::from_kind(PatternKind::Repeat {
            inner: self.clone(),
            min,
            max,
        })
    }

    /// Zero or more matches; never fails.
    pub fn many(&self) -> Pattern<V> {
        self.repeat(0, UNBOUNDED)
    }

    /// One or more matches.
    pub fn many1(&self) -> Pattern<V> {
        self.repeat(1, UNBOUNDED)
    }

    /// Zero or one match, as a zero- or one-element list.
    pub fn optional(&self) -> Pattern<V> {
        self.repeat(0, 1)
    }

    /// A possibly empty `separator`-separated list of this pattern, with no
    /// trailing separator.
    pub fn separated_by(&self, separator: impl IntoPattern<V>) -> Pattern<V> {
        let rest = sequence(vec![separator.into_pattern(), self.clone()])
            .pick(1)
            .many();
        let nonempty = sequence(vec![self.clone(), rest]).map_result(|result| match result {
            MatchResult::Success { mark, value } => {
                let mut parts = list_shape(&mark, value, "separated_by")?;
                let (Some(tail), Some(first)) = (parts.pop(), parts.pop()) else {
                    return Err(Error::grammar(
                        vec![mark],
                        "separated_by applied to malformed sequence value",
                    ));
                };
                let mut items = vec![first];
                items.extend(list_shape(&mark, tail, "separated_by")?);
                Ok(MatchResult::Success {
                    mark,
                    value: V::from_list(items),
                })
            }
            failure => Ok(failure),
        });
        choice(vec![nonempty, sequence(vec![])])
    }

    fn with_callback(&self, callback: ResultCallback<V>) -> Pattern<V> {
        // Fuse onto an existing chain so analysis sees one wrapper deep.
        let (inner, mut callbacks) = match &*self.kind {
            PatternKind::Mapped { inner, callbacks } => (inner.clone(), callbacks.clone()),
            _ => (self.clone(), Vec::new()),
        };
        callbacks.push(callback);
        Pattern::from_kind(PatternKind::Mapped { inner, callbacks })
    }

    /// Raw fallible transform of the whole match result. All the other
    /// mapping helpers are built on this.
    pub fn map_result(
        &self,
        f: impl Fn(MatchResult<V>) -> Result<MatchResult<V>, Error> + 'static,
    ) -> Pattern<V> {
        self.with_callback(Rc::new(f))
    }

    /// Transforms the value of a success.
    pub fn map(&self, f: impl Fn(V) -> V + 'static) -> Pattern<V> {
        self.map_result(move |result| {
            Ok(match result {
                MatchResult::Success { mark, value } => MatchResult::Success {
                    mark,
                    value: f(value),
                },
                failure => failure,
            })
        })
    }

    /// Like [`Pattern::map`], but the covering mark is available, the form
    /// node builders want.
    pub fn map_with_mark(&self, f: impl Fn(&Mark, V) -> V + 'static) -> Pattern<V> {
        self.map_result(move |result| {
            Ok(match result {
                MatchResult::Success { mark, value } => {
                    let value = f(&mark, value);
                    MatchResult::Success { mark, value }
                }
                failure => failure,
            })
        })
    }

    /// Replaces the value of a success with a constant.
    pub fn to(&self, value: V) -> Pattern<V> {
        self.map(move |_| value.clone())
    }

    /// Selects one element of a list-shaped value.
    pub fn pick(&self, index: usize) -> Pattern<V> {
        self.map_result(move |result| match result {
            MatchResult::Success { mark, value } => {
                let mut items = list_shape(&mark, value, "pick")?;
                if index >= items.len() {
                    return Err(Error::grammar(
                        vec![mark],
                        format!(
                            "pick({index}) out of range for a {}-element match",
                            items.len()
                        ),
                    ));
                }
                Ok(MatchResult::Success {
                    mark,
                    value: items.swap_remove(index),
                })
            }
            failure => Ok(failure),
        })
    }

    /// Splices one level of nested lists; non-list elements pass through.
    pub fn flatten(&self) -> Pattern<V> {
        self.map_result(|result| match result {
            MatchResult::Success { mark, value } => {
                let items = list_shape(&mark, value, "flatten")?;
                let mut flat = Vec::with_capacity(items.len());
                for item in items {
                    match item.into_list() {
                        Ok(mut sub) => flat.append(&mut sub),
                        Err(single) => flat.push(single),
                    }
                }
                Ok(MatchResult::Success {
                    mark,
                    value: V::from_list(flat),
                })
            }
            failure => Ok(failure),
        })
    }

    /// Transforms a failure, e.g. to substitute a friendlier message.
    pub fn recover(&self, f: impl Fn(Mark, String) -> MatchResult<V> + 'static) -> Pattern<V> {
        self.map_result(move |result| {
            Ok(match result {
                MatchResult::Failure { mark, message } => f(mark, message),
                success => success,
            })
        })
    }

    /// Converts a failure into a returned [`Error::Syntax`]: the sanctioned
    /// point where backtracking stops. Put this after the input is
    /// committed, e.g. after an opening delimiter has been consumed.
    pub fn required(&self) -> Pattern<V> {
        self.map_result(|result| match result {
            MatchResult::Failure { mark, message } => Err(Error::syntax(vec![mark], message)),
            success => Ok(success),
        })
    }
}

fn span_mark(entry: &Mark, span: Option<(Mark, Mark)>) -> Mark {
    match span {
        Some((first, last)) => Mark::new(first.source.clone(), first.start, last.end),
        None => Mark::point(entry.source.clone(), entry.start),
    }
}

fn list_shape<V: ParseValue>(mark: &Mark, value: V, operation: &str) -> Result<Vec<V>, Error> {
    value.into_list().map_err(|value| {
        Error::grammar(
            vec![mark.clone()],
            format!("{operation} applied to non-list value {value:?}"),
        )
    })
}
