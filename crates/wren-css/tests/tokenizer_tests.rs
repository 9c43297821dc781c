//! Integration tests for the selector tokenizer.

use wren_css::{LexError, SelectorTokenizer, Token, TokenKind};

/// Helper to tokenize a selector
fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokenizer = SelectorTokenizer::new(input);
    tokenizer.run()?;
    Ok(tokenizer.into_tokens())
}

/// Helper to get just the token kinds
fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

/// Helper to get the token values
fn values(input: &str) -> Vec<String> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .filter_map(|token| token.value)
        .collect()
}

#[test]
fn test_whitespace_between_compounds_is_descendant() {
    assert_eq!(
        kinds("a b"),
        vec![TokenKind::Ident, TokenKind::Space, TokenKind::Ident]
    );
    assert_eq!(kinds("ab"), vec![TokenKind::Ident]);
}

#[test]
fn test_whitespace_around_combinators_is_dropped() {
    assert_eq!(
        kinds("a  >  b"),
        vec![TokenKind::Ident, TokenKind::Child, TokenKind::Ident]
    );
    assert_eq!(
        kinds("a+b ~c"),
        vec![
            TokenKind::Ident,
            TokenKind::Plus,
            TokenKind::Ident,
            TokenKind::Tilde,
            TokenKind::Ident,
        ]
    );
}

#[test]
fn test_leading_and_trailing_whitespace_is_dropped() {
    assert_eq!(kinds("  a \n"), vec![TokenKind::Ident]);
    assert!(kinds("   ").is_empty());
}

#[test]
fn test_space_token_position() {
    let tokens = tokenize("a  b").unwrap();
    assert_eq!((tokens[1].line, tokens[1].column), (1, 2));
    assert_eq!((tokens[2].line, tokens[2].column), (1, 4));
}

#[test]
fn test_id_and_class() {
    assert_eq!(
        kinds("foo#bar.baz"),
        vec![
            TokenKind::Ident,
            TokenKind::Hash,
            TokenKind::Dot,
            TokenKind::Ident,
        ]
    );
    assert_eq!(values("foo#bar.baz"), vec!["foo", "bar", "baz"]);
}

#[test]
fn test_hash_may_start_with_digit() {
    assert_eq!(values("#1a"), vec!["1a"]);
}

#[test]
fn test_attribute_operators() {
    for (input, operator) in [
        ("[a=b]", TokenKind::Equals),
        ("[a~=b]", TokenKind::Includes),
        ("[a^=b]", TokenKind::PrefixMatch),
        ("[a$=b]", TokenKind::SuffixMatch),
        ("[a*=b]", TokenKind::SubstringMatch),
        ("[a|=b]", TokenKind::DashMatch),
    ] {
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::LeftBracket,
                TokenKind::Ident,
                operator,
                TokenKind::Ident,
                TokenKind::RightBracket,
            ],
            "input: {input}"
        );
    }
}

#[test]
fn test_quoted_attribute_values() {
    assert_eq!(values(r#"[title="a b"]"#), vec!["title", "a b"]);
    assert_eq!(values(r"[title='it\'s']"), vec!["title", "it's"]);
    assert_eq!(values(r#"[title="say \"hi\""]"#), vec!["title", "say \"hi\""]);
}

#[test]
fn test_unquoted_numeric_attribute_value() {
    assert_eq!(values("[data-level=10]"), vec!["data-level", "10"]);
}

#[test]
fn test_whitespace_inside_brackets_is_not_a_combinator() {
    assert_eq!(
        kinds("a[ href ]"),
        vec![
            TokenKind::Ident,
            TokenKind::LeftBracket,
            TokenKind::Ident,
            TokenKind::RightBracket,
        ]
    );
    // but a space before `[` still separates two compounds
    assert_eq!(
        kinds("a [href]"),
        vec![
            TokenKind::Ident,
            TokenKind::Space,
            TokenKind::LeftBracket,
            TokenKind::Ident,
            TokenKind::RightBracket,
        ]
    );
}

#[test]
fn test_namespaces() {
    assert_eq!(
        kinds("svg|rect *|a |b"),
        vec![
            TokenKind::Ident,
            TokenKind::Pipe,
            TokenKind::Ident,
            TokenKind::Space,
            TokenKind::Star,
            TokenKind::Pipe,
            TokenKind::Ident,
            TokenKind::Space,
            TokenKind::Pipe,
            TokenKind::Ident,
        ]
    );
}

#[test]
fn test_pseudo_class_argument_is_captured_raw() {
    let tokens = tokenize("li:nth-child( 2n + 1 )").unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::Colon,
            TokenKind::Ident,
            TokenKind::LeftParen,
            TokenKind::Argument,
            TokenKind::RightParen,
        ]
    );
    assert_eq!(tokens[4].text(), "2n + 1");
}

#[test]
fn test_nested_parentheses_stay_in_argument() {
    assert_eq!(values("a:x(f(b))"), vec!["a", "x", "f(b)"]);
}

#[test]
fn test_empty_argument_has_no_argument_token() {
    assert_eq!(
        kinds("a:x()"),
        vec![
            TokenKind::Ident,
            TokenKind::Colon,
            TokenKind::Ident,
            TokenKind::LeftParen,
            TokenKind::RightParen,
        ]
    );
}

#[test]
fn test_escaped_identifier() {
    assert_eq!(values(r"a\.b"), vec!["a.b"]);
    assert_eq!(values(r"\-x"), vec!["-x"]);
    assert_eq!(values("-foo"), vec!["-foo"]);
}

#[test]
fn test_unterminated_string() {
    assert_eq!(
        tokenize(r#"a[href="x"#).unwrap_err(),
        LexError::UnterminatedString { line: 1, column: 8 }
    );
}

#[test]
fn test_newline_ends_string() {
    assert_eq!(
        tokenize("a\n\"b\nc\"").unwrap_err(),
        LexError::UnterminatedString { line: 2, column: 1 }
    );
}

#[test]
fn test_unterminated_argument() {
    assert_eq!(
        tokenize("a:nth-child(2").unwrap_err(),
        LexError::UnterminatedArgument {
            line: 1,
            column: 12
        }
    );
}

#[test]
fn test_unexpected_character() {
    assert_eq!(
        tokenize("a ! b").unwrap_err(),
        LexError::UnexpectedCharacter {
            character: '!',
            line: 1,
            column: 3
        }
    );
    assert_eq!(
        tokenize("a#").unwrap_err(),
        LexError::UnexpectedCharacter {
            character: '#',
            line: 1,
            column: 2
        }
    );
    assert!(matches!(
        tokenize("a, b"),
        Err(LexError::UnexpectedCharacter { character: ',', .. })
    ));
}

#[test]
fn test_token_kind_display() {
    assert_eq!(TokenKind::Child.to_string(), "`>`");
    assert_eq!(TokenKind::Ident.to_string(), "identifier");
    assert_eq!(TokenKind::Space.to_string(), "whitespace");
}

#[test]
fn test_token_serializes_to_json() {
    let tokens = tokenize("a").unwrap();
    assert_eq!(
        serde_json::to_value(&tokens[0]).unwrap(),
        serde_json::json!({"kind": "ident", "value": "a", "line": 1, "column": 1})
    );
}
