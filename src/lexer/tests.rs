//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Integer and character literals with escape sequences
//! - Operators and punctuation, longest match first
//! - Comments and preprocessor lines
//! - Error cases

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.cpp".to_string()))
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    let source = "int bool char void class public virtual return if else while true false this new operator const nullptr NULL".to_string();
    let tokens = tokenize(source, Some("test.cpp".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Int);
    assert_eq!(tokens[1].kind, TokenKind::Bool);
    assert_eq!(tokens[2].kind, TokenKind::Char);
    assert_eq!(tokens[3].kind, TokenKind::Void);
    assert_eq!(tokens[4].kind, TokenKind::Class);
    assert_eq!(tokens[5].kind, TokenKind::Public);
    assert_eq!(tokens[6].kind, TokenKind::Virtual);
    assert_eq!(tokens[7].kind, TokenKind::Return);
    assert_eq!(tokens[8].kind, TokenKind::If);
    assert_eq!(tokens[9].kind, TokenKind::Else);
    assert_eq!(tokens[10].kind, TokenKind::While);
    assert_eq!(tokens[11].kind, TokenKind::True);
    assert_eq!(tokens[12].kind, TokenKind::False);
    assert_eq!(tokens[13].kind, TokenKind::This);
    assert_eq!(tokens[14].kind, TokenKind::New);
    assert_eq!(tokens[15].kind, TokenKind::Operator);
    assert_eq!(tokens[16].kind, TokenKind::Const);
    assert_eq!(tokens[17].kind, TokenKind::Null);
    assert_eq!(tokens[18].kind, TokenKind::Null);
    assert_eq!(tokens[19].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo baz_123 _underscore integer".to_string();
    let tokens = tokenize(source, Some("test.cpp".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].value, "baz_123");
    assert_eq!(tokens[2].value, "_underscore");
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].value, "integer");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("0 42 1234".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "0");
    assert_eq!(tokens[1].value, "42");
    assert_eq!(tokens[2].value, "1234");
}

#[test]
fn test_tokenize_char_literals() {
    let tokens = tokenize(r"'a' '\n' '\0' '\'' '\\'".to_string(), None).unwrap();

    assert!(tokens[..5]
        .iter()
        .all(|token| token.kind == TokenKind::CharLiteral));
    assert_eq!(tokens[0].value, "a");
    assert_eq!(tokens[1].value, "\n");
    assert_eq!(tokens[2].value, "\0");
    assert_eq!(tokens[3].value, "'");
    assert_eq!(tokens[4].value, "\\");
}

#[test]
fn test_tokenize_operators_longest_first() {
    assert_eq!(
        kinds("++ += + -- -= -> - == = != ! <= < >= > && & || *= * /= / %"),
        vec![
            TokenKind::PlusPlus,
            TokenKind::PlusEquals,
            TokenKind::Plus,
            TokenKind::MinusMinus,
            TokenKind::MinusEquals,
            TokenKind::Arrow,
            TokenKind::Dash,
            TokenKind::Equals,
            TokenKind::Assignment,
            TokenKind::NotEquals,
            TokenKind::Not,
            TokenKind::LessEquals,
            TokenKind::Less,
            TokenKind::GreaterEquals,
            TokenKind::Greater,
            TokenKind::And,
            TokenKind::Ampersand,
            TokenKind::Or,
            TokenKind::StarEquals,
            TokenKind::Star,
            TokenKind::SlashEquals,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("{ } ( ) [ ] ; : , . ~"),
        vec![
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::Tilde,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_skips_comments_and_preprocessor() {
    let source = "#include <iostream>\nint x; // trailing\n/* block\n comment */ x = 1;";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Int,
            TokenKind::Identifier,
            TokenKind::Semicolon,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_token_positions() {
    let tokens = tokenize("int  abc".to_string(), Some("pos.cpp".to_string())).unwrap();

    assert_eq!(tokens[1].span.start.0, 5);
    assert_eq!(tokens[1].span.end.0, 8);
    assert_eq!(tokens[1].span.start.1.as_str(), "pos.cpp");
}

#[test]
fn test_tokenize_unrecognised() {
    let result = tokenize("int x = @;".to_string(), None);

    let error = result.unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 8);
}
