use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use crate::{
    error::ErrorKind,
    extjson::lexer::{Lexer, TokenKind},
};

fn kinds(input: &str) -> Vec<TokenKind<'_>> {
    let mut lexer = Lexer::new(input);
    let mut kinds = Vec::new();
    loop {
        let token = lexer.next_token().unwrap();
        if token.kind == TokenKind::Eof {
            return kinds;
        }
        kinds.push(token.kind);
    }
}

fn string(input: &str) -> String {
    match Lexer::new(input).next_token().unwrap().kind {
        TokenKind::String(s) => s,
        other => panic!("expected a string, got {other:?}"),
    }
}

fn syntax_offset(input: &str) -> usize {
    let mut lexer = Lexer::new(input);
    loop {
        match lexer.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => panic!("{input:?} lexed cleanly"),
            Ok(_) => continue,
            Err(error) => match error.kind {
                ErrorKind::Syntax { offset, .. } => return offset,
                other => panic!("expected a syntax error, got {other:?}"),
            },
        }
    }
}

#[test]
fn punctuation_and_words() {
    assert_eq!(
        kinds(r#"{a: [1, -2.5e3], "b": new Date($x_1)}"#),
        vec![
            TokenKind::ObjectOpen,
            TokenKind::Identifier("a"),
            TokenKind::Colon,
            TokenKind::ArrayOpen,
            TokenKind::Number("1"),
            TokenKind::Comma,
            TokenKind::Number("-2.5e3"),
            TokenKind::ArrayClose,
            TokenKind::Comma,
            TokenKind::String("b".to_string()),
            TokenKind::Colon,
            TokenKind::Identifier("new"),
            TokenKind::Identifier("Date"),
            TokenKind::ParenOpen,
            TokenKind::Identifier("$x_1"),
            TokenKind::ParenClose,
            TokenKind::ObjectClose,
        ]
    );
}

#[test]
fn whitespace_is_skipped() {
    assert_eq!(
        kinds(" \t\r\n[ \n1\t]\r\n"),
        vec![
            TokenKind::ArrayOpen,
            TokenKind::Number("1"),
            TokenKind::ArrayClose,
        ]
    );
    assert_eq!(kinds("   "), vec![]);
}

#[test]
fn spans() {
    let mut lexer = Lexer::new(r#"  "ab" 12 "#);
    let token = lexer.next_token().unwrap();
    assert_eq!((token.start, token.end), (2, 6));
    let token = lexer.next_token().unwrap();
    assert_eq!((token.start, token.end), (7, 9));
    let token = lexer.next_token().unwrap();
    assert_eq!(token.kind, TokenKind::Eof);
    assert_eq!((token.start, token.end), (10, 10));
}

#[test]
fn peek_does_not_advance() {
    let mut lexer = Lexer::new("a b");
    assert_eq!(lexer.peek().unwrap().kind, TokenKind::Identifier("a"));
    assert_eq!(lexer.peek().unwrap().kind, TokenKind::Identifier("a"));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Identifier("a"));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Identifier("b"));
}

#[test]
fn numbers() {
    for n in ["0", "-0", "12", "-12", "1.5", "0.25", "1e9", "1E+9", "1e-9", "-0.5E10"] {
        assert_eq!(kinds(n), vec![TokenKind::Number(n)]);
    }
    // A leading zero ends the number; what follows is a second token.
    assert_eq!(kinds("01"), vec![TokenKind::Number("0"), TokenKind::Number("1")]);

    assert_eq!(syntax_offset("-"), 1);
    assert_eq!(syntax_offset("-x"), 1);
    assert_eq!(syntax_offset("1."), 2);
    assert_eq!(syntax_offset("1.e5"), 2);
    assert_eq!(syntax_offset("1e"), 2);
    assert_eq!(syntax_offset("1e+"), 3);
}

#[test]
fn escapes() {
    assert_eq!(
        string(r#""a\"b\\c\/d\b\f\n\r\t""#),
        "a\"b\\c/d\u{8}\u{c}\n\r\t"
    );
    assert_eq!(string(r#""\u00e9\u20AC""#), "é€");
    assert_eq!(string(r#""\ud83d\ude00""#), "😀");
    assert_eq!(string(r#""héllo wörld""#), "héllo wörld");
}

#[test]
fn lone_surrogates_are_replaced() {
    assert_eq!(string(r#""\ud800x""#), "\u{fffd}x");
    assert_eq!(string(r#""\udc00""#), "\u{fffd}");
    assert_eq!(string(r#""\ud800A""#), "\u{fffd}A");
}

#[test]
fn bad_strings() {
    assert_eq!(syntax_offset(r#"  "abc"#), 2);
    assert_eq!(syntax_offset("\"a\nb\""), 2);
    assert_eq!(syntax_offset(r#""\x""#), 1);
    assert_eq!(syntax_offset(r#""\u12""#), 3);
    assert_eq!(syntax_offset(r#""\"#), 1);
}

#[test]
fn unexpected_characters() {
    assert_eq!(syntax_offset("[1, #]"), 4);
    assert_eq!(syntax_offset(".5"), 0);
    assert_matches!(
        Lexer::new("'single'").next_token().unwrap_err().kind,
        ErrorKind::Syntax { offset: 0, .. }
    );
}
