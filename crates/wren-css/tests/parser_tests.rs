//! Integration tests for selector parsing.

use wren_css::{
    AttributeOperator, AttributePredicate, CombinatorKind, CompileError, NodeTest, Nth,
    ParseError, PseudoClass, Selector, TokenKind, parse_selector,
};

fn parse(input: &str) -> Selector {
    parse_selector(input).unwrap()
}

fn parse_error(input: &str) -> ParseError {
    match parse_selector(input) {
        Err(CompileError::Parse(error)) => error,
        other => panic!("expected a parse error for {input:?}, got {other:?}"),
    }
}

fn test_with(test: NodeTest, predicates: Vec<AttributePredicate>) -> Selector {
    Selector::Test { test, predicates }
}

#[test]
fn test_parse_type_selector() {
    assert_eq!(parse("foo"), Selector::element("foo"));
}

#[test]
fn test_parse_universal_selector() {
    assert_eq!(parse("*"), test_with(NodeTest::any(), vec![]));
}

#[test]
fn test_parse_id_and_class() {
    assert_eq!(
        parse("foo#bar.baz"),
        test_with(
            NodeTest::named("foo"),
            vec![AttributePredicate::id("bar"), AttributePredicate::class("baz")]
        )
    );
}

#[test]
fn test_compound_without_type_matches_any_element() {
    assert_eq!(
        parse(".a"),
        test_with(NodeTest::any(), vec![AttributePredicate::class("a")])
    );
    assert_eq!(
        parse(":root"),
        test_with(NodeTest::any(), vec![]).with_pseudo(PseudoClass::Root)
    );
}

#[test]
fn test_parse_namespaced_type_selectors() {
    assert_eq!(
        parse("svg|rect"),
        test_with(NodeTest::named("rect").in_namespace("svg"), vec![])
    );
    assert_eq!(
        parse("*|rect"),
        test_with(NodeTest::named("rect").in_namespace("*"), vec![])
    );
    assert_eq!(
        parse("|rect"),
        test_with(NodeTest::named("rect").in_namespace(""), vec![])
    );
    assert_eq!(
        parse("svg|*"),
        test_with(NodeTest::any().in_namespace("svg"), vec![])
    );
}

#[test]
fn test_parse_attribute_selectors() {
    assert_eq!(
        parse("a[href]"),
        test_with(NodeTest::named("a"), vec![AttributePredicate::exists("href")])
    );
    assert_eq!(
        parse(r#"a[href^="https"][rel~=nofollow]"#),
        test_with(
            NodeTest::named("a"),
            vec![
                AttributePredicate::compare("href", AttributeOperator::StartsWith, "https"),
                AttributePredicate::compare("rel", AttributeOperator::ContainsWord, "nofollow"),
            ]
        )
    );
    assert_eq!(
        parse("[xlink|href$='.png']"),
        test_with(
            NodeTest::any(),
            vec![
                AttributePredicate::compare("href", AttributeOperator::EndsWith, ".png")
                    .in_namespace("xlink")
            ]
        )
    );
}

#[test]
fn test_parse_every_attribute_operator() {
    for (source, operator) in [
        ("=", AttributeOperator::Equals),
        ("~=", AttributeOperator::ContainsWord),
        ("^=", AttributeOperator::StartsWith),
        ("$=", AttributeOperator::EndsWith),
        ("*=", AttributeOperator::Contains),
        ("|=", AttributeOperator::HyphenPrefix),
    ] {
        let selector = parse(&format!("[lang{source}en]"));
        assert_eq!(
            selector,
            test_with(
                NodeTest::any(),
                vec![AttributePredicate::compare("lang", operator, "en")]
            )
        );
    }
}

#[test]
fn test_parse_pseudo_class() {
    assert_eq!(
        parse("x:root"),
        Selector::element("x").with_pseudo(PseudoClass::Root)
    );
}

#[test]
fn test_pseudo_class_names_are_case_insensitive() {
    assert_eq!(
        parse("li:First-Child"),
        Selector::element("li").with_pseudo(PseudoClass::FirstChild)
    );
}

#[test]
fn test_parse_nth_child_keeps_written_argument() {
    assert_eq!(
        parse("li:nth-child( odd )"),
        Selector::Pseudo {
            target: Box::new(Selector::element("li")),
            name: PseudoClass::NthChild(Nth::new(2, 1)),
            argument: Some("odd".to_string()),
        }
    );
}

#[test]
fn test_predicates_after_pseudo_attach_to_test() {
    assert_eq!(
        parse("a:first-child.b:last-child"),
        test_with(NodeTest::named("a"), vec![AttributePredicate::class("b")])
            .with_pseudo(PseudoClass::FirstChild)
            .with_pseudo(PseudoClass::LastChild)
    );
}

#[test]
fn test_parse_each_combinator() {
    for (source, kind) in [
        ("a b", CombinatorKind::Descendant),
        ("a > b", CombinatorKind::Child),
        ("a ~ b", CombinatorKind::GeneralSibling),
        ("a + b", CombinatorKind::AdjacentSibling),
    ] {
        assert_eq!(
            parse(source),
            Selector::combine(kind, Selector::element("a"), Selector::element("b")),
            "input: {source}"
        );
    }
}

#[test]
fn test_combinators_associate_left() {
    assert_eq!(
        parse("a + b + c"),
        Selector::combine(
            CombinatorKind::AdjacentSibling,
            Selector::combine(
                CombinatorKind::AdjacentSibling,
                Selector::element("a"),
                Selector::element("b"),
            ),
            Selector::element("c"),
        )
    );
}

#[test]
fn test_mixed_combinators_associate_left() {
    assert_eq!(
        parse("x ~ y z"),
        Selector::combine(
            CombinatorKind::Descendant,
            Selector::combine(
                CombinatorKind::GeneralSibling,
                Selector::element("x"),
                Selector::element("y"),
            ),
            Selector::element("z"),
        )
    );
}

#[test]
fn test_child_with_id() {
    assert_eq!(
        parse("x > foo#bar"),
        Selector::combine(
            CombinatorKind::Child,
            Selector::element("x"),
            test_with(NodeTest::named("foo"), vec![AttributePredicate::id("bar")]),
        )
    );
}

#[test]
fn test_selector_helpers() {
    let selector = parse("a > b:first-child ~ c");
    assert!(selector.contains_pseudo());
    assert_eq!(selector.compound_count(), 3);
    assert!(!parse("a > b ~ c").contains_pseudo());
}

#[test]
fn test_display_is_canonical() {
    assert_eq!(
        parse("a  >b.c:NTH-CHILD( 2n+1 )  d").to_string(),
        "a > b.c:nth-child(2n+1) d"
    );
    assert_eq!(
        parse(r##"svg|*[xlink|href="#x"]"##).to_string(),
        r##"svg|*[xlink|href="#x"]"##
    );
}

#[test]
fn test_display_escapes_and_reparses() {
    for (source, canonical) in [
        (r#"a[title="p\a q"]"#, r#"a[title="p\a q"]"#),
        (r#"a[title='say "hi" \\o/']"#, r#"a[title="say \"hi\" \\o/"]"#),
        (r"\31 a", r"\31 a"),
        (r"\-2x > b\.c", r"-\32 x > b\.c"),
    ] {
        let selector = parse(source);
        assert_eq!(selector.to_string(), canonical, "input: {source}");
        assert_eq!(parse(&selector.to_string()), selector, "input: {source}");
    }
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_empty_selector() {
    assert_eq!(parse_error(""), ParseError::EmptySelector);
    assert_eq!(parse_error("   "), ParseError::EmptySelector);
}

#[test]
fn test_missing_operand() {
    assert_eq!(
        parse_error("> a"),
        ParseError::MissingOperand {
            combinator: TokenKind::Child,
            line: 1,
            column: 1
        }
    );
    assert_eq!(
        parse_error("a +"),
        ParseError::MissingOperand {
            combinator: TokenKind::Plus,
            line: 1,
            column: 3
        }
    );
    assert_eq!(
        parse_error("a > ~ b"),
        ParseError::MissingOperand {
            combinator: TokenKind::Child,
            line: 1,
            column: 3
        }
    );
}

#[test]
fn test_unknown_pseudo_class() {
    assert_eq!(
        parse_error("a:hover"),
        ParseError::UnknownPseudoClass {
            name: "hover".to_string(),
            line: 1,
            column: 3
        }
    );
}

#[test]
fn test_pseudo_class_arguments() {
    assert_eq!(
        parse_error("a:nth-child"),
        ParseError::MissingArgument {
            name: "nth-child".to_string(),
            line: 1,
            column: 3
        }
    );
    assert_eq!(
        parse_error("a:nth-child()"),
        ParseError::MissingArgument {
            name: "nth-child".to_string(),
            line: 1,
            column: 3
        }
    );
    assert_eq!(
        parse_error("a:root(1)"),
        ParseError::UnexpectedArgument {
            name: "root".to_string(),
            line: 1,
            column: 3
        }
    );
    assert_eq!(
        parse_error("a:root()"),
        ParseError::UnexpectedArgument {
            name: "root".to_string(),
            line: 1,
            column: 3
        }
    );
    assert_eq!(
        parse_error("a:nth-child(first)"),
        ParseError::InvalidArgument {
            name: "nth-child".to_string(),
            argument: "first".to_string(),
            line: 1,
            column: 3
        }
    );
}

#[test]
fn test_unterminated_bracket() {
    assert_eq!(
        parse_error("a[href"),
        ParseError::UnterminatedBracket { line: 1, column: 2 }
    );
    assert_eq!(
        parse_error("a[href=x"),
        ParseError::UnterminatedBracket { line: 1, column: 2 }
    );
}

#[test]
fn test_unexpected_tokens() {
    assert_eq!(
        parse_error("a)"),
        ParseError::UnexpectedToken {
            found: TokenKind::RightParen,
            line: 1,
            column: 2
        }
    );
    assert_eq!(
        parse_error("a[=b]"),
        ParseError::UnexpectedToken {
            found: TokenKind::Equals,
            line: 1,
            column: 3
        }
    );
    assert_eq!(
        parse_error("a::before"),
        ParseError::UnexpectedToken {
            found: TokenKind::Colon,
            line: 1,
            column: 3
        }
    );
}

#[test]
fn test_unexpected_end() {
    assert_eq!(
        parse_error("a:"),
        ParseError::UnexpectedEnd {
            expected: "pseudo-class name",
            line: 1,
            column: 2
        }
    );
    assert_eq!(
        parse_error("a."),
        ParseError::UnexpectedEnd {
            expected: "class name",
            line: 1,
            column: 2
        }
    );
}

#[test]
fn test_lex_errors_surface_through_parse_selector() {
    assert!(matches!(
        parse_selector("a[href='x]"),
        Err(CompileError::Lex(_))
    ));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        parse_error("a:hover").to_string(),
        "1:3: unknown pseudo-class :hover"
    );
    assert_eq!(
        parse_selector("> a").unwrap_err().to_string(),
        "parse error: 1:1: combinator `>` is missing an operand"
    );
}

#[test]
fn test_selector_serializes_to_json() {
    assert_eq!(
        serde_json::to_value(parse("foo")).unwrap(),
        serde_json::json!({
            "type": "test",
            "test": {"namespace": null, "name": {"named": "foo"}},
            "predicates": []
        })
    );
}
