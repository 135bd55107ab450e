//! Stock lexers.
//!
//! Two ready-made rule tables: a small arithmetic lexer for
//! expression-shaped input, and a Python-style "script" lexer exercising
//! the full adapter chain (bracket-aware newline suppression, newline
//! collapsing, INDENT/DEDENT synthesis). Both are shared statics; rule
//! tables compile once per process.

use lazy_static::lazy_static;

use crate::error::Error;
use crate::lexer::{adapters, Lexer};
use crate::source::Mark;
use crate::token::{Token, TokenValue};

lazy_static! {
    static ref ARITHMETIC: Lexer =
        build_arithmetic().expect("arithmetic lexer rules are valid");
    static ref SCRIPT: Lexer = build_script().expect("script lexer rules are valid");
}

/// INT/FLOAT/NAME tokens and basic expression punctuation; whitespace
/// skipped.
pub fn arithmetic() -> &'static Lexer {
    &ARITHMETIC
}

/// A Python-style lexer: NEWLINE tokens carrying raw indentation, `#`
/// comments, keywords as bare-kind tokens, string literals with escape
/// decoding, and the indentation adapter chain.
pub fn script() -> &'static Lexer {
    &SCRIPT
}

fn int_token(text: &str, mark: &Mark) -> Result<Vec<Token>, Error> {
    let digits: String = text.chars().filter(|c| *c != '_').collect();
    let value = digits
        .parse::<i64>()
        .map_err(|_| Error::lex(vec![mark.clone()], "Integer literal out of range"))?;
    Ok(vec![Token::new(mark.clone(), "INT", TokenValue::Int(value))])
}

fn float_token(text: &str, mark: &Mark) -> Result<Vec<Token>, Error> {
    let value = text
        .parse::<f64>()
        .map_err(|_| Error::lex(vec![mark.clone()], "Malformed float literal"))?;
    Ok(vec![Token::new(mark.clone(), "FLOAT", TokenValue::Float(value))])
}

fn build_arithmetic() -> Result<Lexer, Error> {
    Lexer::builder()
        .rule(r"\s+", |_, _| Ok(vec![]))
        .rule(r"\d*\.\d+|\d+\.", float_token)
        .rule(r"\d+", int_token)
        .rule(r"[A-Za-z_]\w*", |text, mark| {
            Ok(vec![Token::new(
                mark.clone(),
                "NAME",
                TokenValue::Str(text.to_string()),
            )])
        })
        .rule(r"[()+\-*/%,;]", |text, mark| {
            Ok(vec![Token::bare(mark.clone(), text)])
        })
        .build()
}

const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else",
    "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "not", "or", "pass", "raise", "return", "try", "while", "with", "yield", "True",
    "False", "None",
];

const SYMBOLS: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "->", "**", "//", "<<", ">>", "<=", ">=", "==", "!=",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "(", ")", "[", "]", "{", "}", ",",
    ":", ".", ";", "@", "=", "+", "-", "*", "/", "%", "<", ">", "&", "|", "^", "~",
];

const ESCAPES: &[(char, char)] = &[
    ('b', '\u{8}'),
    ('t', '\t'),
    ('n', '\n'),
    ('f', '\u{c}'),
    ('r', '\r'),
    ('"', '"'),
    ('\'', '\''),
    ('\\', '\\'),
];

fn decode_escapes(text: &str, mark: &Mark) -> Result<String, Error> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(&next) = chars.peek() else {
            return Err(Error::invalid_escape(
                vec![mark.clone()],
                "Incomplete escape",
            ));
        };
        if next.is_ascii_digit() {
            let mut code = 0u32;
            let mut digits = 0;
            while digits < 3 {
                let Some(&d) = chars.peek() else { break };
                let Some(value) = d.to_digit(8) else { break };
                code = code * 8 + value;
                chars.next();
                digits += 1;
            }
            if digits == 0 {
                return Err(Error::invalid_escape(
                    vec![mark.clone()],
                    format!("Invalid escape {next}"),
                ));
            }
            match char::from_u32(code) {
                Some(decoded) => out.push(decoded),
                None => {
                    return Err(Error::invalid_escape(
                        vec![mark.clone()],
                        "Escape out of range",
                    ))
                }
            }
        } else if let Some((_, decoded)) = ESCAPES.iter().find(|(raw, _)| *raw == next) {
            out.push(*decoded);
            chars.next();
        } else {
            return Err(Error::invalid_escape(
                vec![mark.clone()],
                format!("Invalid escape {next}"),
            ));
        }
    }
    Ok(out)
}

fn string_token(text: &str, mark: &Mark) -> Result<Vec<Token>, Error> {
    let inner = &text[1..text.len() - 1];
    let value = decode_escapes(inner, mark)?;
    Ok(vec![Token::new(mark.clone(), "STR", TokenValue::Str(value))])
}

fn build_script() -> Result<Lexer, Error> {
    let symbols = {
        let mut sorted: Vec<&str> = SYMBOLS.to_vec();
        sorted.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        sorted
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|")
    };

    Lexer::builder()
        .rule(r"\n[ \t]*", |text, mark| {
            Ok(vec![Token::new(
                mark.clone(),
                adapters::NEWLINE,
                TokenValue::Str(text[1..].to_string()),
            )])
        })
        .rule(r"[ \t\r]+", |_, _| Ok(vec![]))
        .rule(r"#[^\n]*", |_, _| Ok(vec![]))
        .rule(r"\d*\.\d+|\d+\.", float_token)
        .rule(r"0|[1-9](?:_?\d)*", int_token)
        .rule(r#""(?:\\.|[^"\\\n])*""#, string_token)
        .rule(r"'(?:\\.|[^'\\\n])*'", string_token)
        .rule(&symbols, |text, mark| {
            Ok(vec![Token::bare(mark.clone(), text)])
        })
        .rule(r"(?:[^\W\d]|\$)[\w$]*", |text, mark| {
            if KEYWORDS.contains(&text) {
                Ok(vec![Token::bare(mark.clone(), text)])
            } else {
                Ok(vec![Token::new(
                    mark.clone(),
                    "ID",
                    TokenValue::Str(text.to_string()),
                )])
            }
        })
        .adapter(adapters::suppress_grouped_newlines())
        .adapter(adapters::collapse_newlines())
        .adapter(adapters::indentation())
        .build()
}
