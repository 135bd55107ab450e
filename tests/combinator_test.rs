//! End-to-end grammar scenarios over the stock lexers.

mod common;

use beck::prelude::*;
use pretty_assertions::assert_eq;

use common::{arith_expr, word_lexer};

fn parse_arith(text: &str) -> Result<Value, Error> {
    let program = seq![arith_expr(), peek(tok(EOF))].pick(0);
    program.parse(beck::lexers::arithmetic().lex_str(text)?)
}

#[test]
fn test_arithmetic_precedence() {
    // Multiplication binds tighter than the additive layer above it.
    assert_eq!(parse_arith("1 + 2 - 7 * 2").unwrap(), Value::Int(-11));
    assert_eq!(parse_arith("12 + 3").unwrap(), Value::Int(15));
    assert_eq!(parse_arith("12 + 3 * 5").unwrap(), Value::Int(27));
    assert_eq!(parse_arith("(12 + 3) * 5").unwrap(), Value::Int(75));
    assert_eq!(parse_arith("(12 - 3) * 5").unwrap(), Value::Int(45));
}

#[test]
fn test_arithmetic_rejects_trailing_input() {
    assert!(matches!(parse_arith("1 +"), Err(Error::Syntax(_))));
}

#[test]
fn test_sexpr_nesting() {
    let sexpr: Forward<Value> = Forward::declare("sexpr");
    let expr = alt![tok("NAME"), &sexpr];
    let program = seq![expr.many(), tok(EOF)].pick(0);
    sexpr
        .define(seq!["(", expr.many(), ")"].pick(1))
        .unwrap();

    let value = program
        .parse(word_lexer().lex_str("(1) (begin (a b c))").unwrap())
        .unwrap();
    assert_eq!(
        value,
        Value::list([
            Value::list(["1".into()]),
            Value::list([
                "begin".into(),
                Value::list(["a".into(), "b".into(), "c".into()]),
            ]),
        ])
    );
}

#[test]
fn test_separated_list() {
    let list = seq!["(", arith_expr().separated_by(","), ")"].pick(1);

    let empty = list
        .parse(beck::lexers::arithmetic().lex_str("()").unwrap())
        .unwrap();
    assert_eq!(empty, Value::list([]));

    let two = list
        .parse(beck::lexers::arithmetic().lex_str("(1, 1 + 2)").unwrap())
        .unwrap();
    assert_eq!(two, Value::list([Value::Int(1), Value::Int(3)]));
}

#[test]
fn test_node_mark_anchors_at_operator() {
    let pattern: Pattern<Value> = node(
        |mut args| {
            let abc = args.take("abc")?;
            let xyz = args.take("xyz")?;
            Ok(Value::list([abc, xyz]))
        },
        vec![
            named("abc", tok("INT")),
            bare(tok("+")),
            named("xyz", tok("NAME")),
        ],
    );

    let tokens = beck::lexers::arithmetic().lex_str("924 + hi").unwrap();
    let MatchResult::Success { mark, value } = pattern.match_tokens(tokens).unwrap() else {
        panic!("expected a match");
    };
    assert_eq!(value, Value::list([Value::Int(924), "hi".into()]));
    // The node points at the `+`, not at either operand.
    assert_eq!(mark.i(), 4);
    assert_eq!((mark.start, mark.end), (0, 8));
}

#[test]
fn test_required_stops_backtracking_with_rendered_error() {
    let group: Pattern<Value> = seq!["(", tok("INT"), required(tok(")"))].pick(1);
    let err = group
        .parse(beck::lexers::arithmetic().lex_str("(1 ;").unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::Syntax(_)));
    assert_eq!(
        err.to_string(),
        "Expected ) but got ;\n<string> line 1\n(1 ;\n   *\n"
    );
}

#[test]
fn test_failure_propagates_to_top_level() {
    let err = parse_arith("+ 1").unwrap_err();
    let Error::Syntax(diagnostic) = &err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert!(diagnostic.message.starts_with("Expected"));
}
