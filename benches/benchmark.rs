use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use beck::combinator::{tok, Forward, Pattern};
use beck::value::Value;
use beck::{alt, seq};

fn chain_grammar() -> Pattern<Value> {
    let expr: Forward<Value> = Forward::declare("expr");
    expr.define(alt![
        seq![&expr, "+", tok("INT")].map(|value| {
            let Value::List(parts) = value else {
                return Value::Null;
            };
            match (&parts[0], &parts[2]) {
                (Value::Int(lhs), Value::Int(rhs)) => Value::Int(lhs + rhs),
                _ => Value::Null,
            }
        }),
        tok("INT"),
    ])
    .expect("chain grammar is well formed");
    expr.pattern()
}

fn bench_left_recursive_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("left_recursive_chain");
    for terms in [100usize, 1000, 5000] {
        let text = vec!["1"; terms].join(" + ");
        let tokens = beck::lexers::arithmetic()
            .lex_str(&text)
            .expect("chain input lexes");
        group.bench_with_input(BenchmarkId::from_parameter(terms), &tokens, |b, tokens| {
            let grammar = chain_grammar();
            b.iter(|| {
                grammar
                    .parse(tokens.clone())
                    .expect("chain input parses")
            });
        });
    }
    group.finish();
}

fn bench_lexing(c: &mut Criterion) {
    let text = "def foo(a, b):\n    return a + b\n".repeat(200);
    c.bench_function("script_lex", |b| {
        b.iter(|| beck::lexers::script().lex_str(&text).expect("script input lexes"))
    });
}

criterion_group!(benches, bench_left_recursive_chain, bench_lexing);
criterion_main!(benches);
