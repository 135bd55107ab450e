//! Lexer and adapter scenarios over the stock script lexer.

use beck::prelude::*;
use pretty_assertions::assert_eq;

fn script_kinds(text: &str) -> Vec<String> {
    beck::lexers::script()
        .lex_str(text)
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_newlines_suppressed_in_parens_kept_in_braces() {
    assert_eq!(
        script_kinds("(\n){\n}\n"),
        vec!["(", ")", "{", "NEWLINE", "}", "NEWLINE", "EOF"]
    );
}

#[test]
fn test_newlines_inside_nested_groups_follow_innermost() {
    // The innermost open bracket decides: a `{` inside `(` keeps its line
    // structure, the surrounding `(` does not.
    assert_eq!(
        script_kinds("({\n})"),
        vec!["(", "{", "NEWLINE", "}", ")", "EOF"]
    );
    assert_eq!(
        script_kinds("{(\n)}"),
        vec!["{", "(", ")", "}", "EOF"]
    );
}

#[test]
fn test_mismatched_groupings_are_rejected() {
    let err = beck::lexers::script().lex_str("( ]").unwrap_err();
    assert!(matches!(err, Error::InvalidGrouping(_)));

    let err = beck::lexers::script().lex_str("]").unwrap_err();
    assert!(matches!(err, Error::InvalidGrouping(_)));

    assert!(beck::lexers::script().lex_str("[ ]").is_ok());
}

#[test]
fn test_mismatch_error_carries_both_marks() {
    let err = beck::lexers::script().lex_str("( ]").unwrap_err();
    let diagnostic = err.diagnostic();
    assert_eq!(diagnostic.message, "Mismatched grouping symbols");
    assert_eq!(diagnostic.marks.len(), 2);
    assert_eq!(diagnostic.marks[0].start, 0);
    assert_eq!(diagnostic.marks[1].start, 2);
}

#[test]
fn test_indent_dedent_synthesis() {
    assert_eq!(
        script_kinds("def foo(\n\n        ):\n    pass\n"),
        vec![
            "def", "ID", "(", ")", ":", "NEWLINE", "INDENT", "pass", "NEWLINE",
            "DEDENT", "EOF"
        ]
    );
}

#[test]
fn test_dedents_close_at_eof() {
    assert_eq!(
        script_kinds("foo\n    bar"),
        vec!["ID", "NEWLINE", "INDENT", "ID", "DEDENT", "EOF"]
    );
}

#[test]
fn test_inconsistent_indent_is_rejected() {
    let err = beck::lexers::script()
        .lex_str("a\n        b\n    c\n")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidIndent(_)));
}

#[test]
fn test_comments_and_blank_lines_collapse() {
    assert_eq!(
        script_kinds("a\n# note\n\nb\n"),
        vec!["ID", "NEWLINE", "ID", "NEWLINE", "EOF"]
    );
}

#[test]
fn test_unrecognized_token_rendering() {
    let err = beck::lexers::arithmetic().lex_str("1 & 2").unwrap_err();
    assert!(matches!(err, Error::Lex(_)));
    assert_eq!(
        err.to_string(),
        "Unrecognized token\n<string> line 1\n1 & 2\n  *\n"
    );
}

#[test]
fn test_marks_are_monotonic_and_eof_terminated() {
    let tokens = beck::lexers::arithmetic().lex_str("1 + (2 * 3)").unwrap();
    let mut previous = 0;
    for token in &tokens {
        assert!(token.mark.start >= previous);
        assert!(token.mark.start <= token.mark.end);
        previous = token.mark.start;
    }
    assert_eq!(tokens.last().unwrap().kind, EOF);
    assert_eq!(tokens.iter().filter(|t| t.kind == EOF).count(), 1);
}
