//! Shared fixtures: a tiny word/symbol lexer and arithmetic grammar
//! helpers used across the integration suites.
#![allow(dead_code)]

use beck::prelude::*;

/// NAME tokens (`\w+`, so digits lex as names too) plus the handful of
/// symbols the S-expression and memoization tests need.
pub fn word_lexer() -> Lexer {
    Lexer::builder()
        .rule(r"\s+", |_, _| Ok(vec![]))
        .rule(r"\w+", |text, mark| {
            Ok(vec![Token::new(
                mark.clone(),
                "NAME",
                TokenValue::Str(text.to_string()),
            )])
        })
        .rule(r"[()+\-,]", |text, mark| {
            Ok(vec![Token::bare(mark.clone(), text)])
        })
        .build()
        .expect("word lexer rules are valid")
}

/// Folds the `[first, [[op, rhs], ...]]` shape produced by
/// `seq![operand, seq![op, operand].many()]` into a single integer value,
/// applying operators left to right.
pub fn fold_arith(value: Value) -> Value {
    let Value::List(mut parts) = value else {
        return value;
    };
    let (Some(steps), Some(mut acc)) = (parts.pop(), parts.pop()) else {
        return Value::Null;
    };
    let Value::List(steps) = steps else {
        return Value::Null;
    };
    for step in steps {
        let Value::List(pair) = step else {
            return Value::Null;
        };
        let mut pair = pair.into_iter();
        let (Some(op), Some(rhs)) = (pair.next(), pair.next()) else {
            return Value::Null;
        };
        acc = apply(acc, &op, rhs);
    }
    acc
}

fn apply(lhs: Value, op: &Value, rhs: Value) -> Value {
    let (Value::Int(a), Value::Int(b)) = (&lhs, &rhs) else {
        return Value::Null;
    };
    let (a, b) = (*a, *b);
    match op {
        Value::Str(op) => match op.as_str() {
            "+" => Value::Int(a + b),
            "-" => Value::Int(a - b),
            "*" => Value::Int(a * b),
            "/" => Value::Int(a / b),
            "%" => Value::Int(a % b),
            _ => Value::Null,
        },
        _ => Value::Null,
    }
}

/// The classic two-level expression grammar over the stock arithmetic
/// lexer: addition/subtraction over multiplication/division over atoms,
/// evaluated on the fly. Consumes input up to EOF.
pub fn arith_expr() -> Pattern<Value> {
    let expr: Forward<Value> = Forward::declare("expr");
    let atom = alt![tok("INT"), seq!["(", &expr, ")"].pick(1)];
    let mul = seq![&atom, seq![alt!["*", "/", "%"], &atom].many()].map(fold_arith);
    let add = seq![&mul, seq![alt!["+", "-"], &mul].many()].map(fold_arith);
    expr.define(add.clone()).expect("expression grammar is well formed");
    add
}
