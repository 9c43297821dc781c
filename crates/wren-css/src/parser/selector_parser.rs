use log::trace;

use crate::error::ParseError;
use crate::selector::{
    AttributeOperator, AttributePredicate, CombinatorKind, NodeTest, PseudoClass,
    PseudoClassError, Selector,
};
use crate::tokenizer::{Token, TokenKind};

/// Recursive-descent parser over the tokens of one selector.
///
/// ```text
/// selector  := compound ( combinator compound )*
/// compound  := type? ( hash | class | attribute | pseudo )*
/// type      := ( namespace? "|" )? ( ident | "*" )
/// attribute := "[" ( namespace? "|" )? ident ( operator ( ident | string ) )? "]"
/// pseudo    := ":" ident ( "(" argument? ")" )?
/// ```
///
/// Combinators associate to the left. Parsing never recovers: the first
/// malformed construct is returned as an error.
pub struct SelectorParser {
    tokens: Vec<Token>,
    position: usize,
}

impl SelectorParser {
    /// Create a new parser from a list of tokens.
    #[must_use]
    pub const fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    ///
    /// "A complex selector is a chain of one or more compound selectors
    /// separated by combinators."
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for an empty selector, a combinator missing
    /// an operand, an unknown or misused pseudo-class, an unterminated
    /// attribute selector, or any token out of place.
    pub fn parse(mut self) -> Result<Selector, ParseError> {
        let mut selector = self.parse_operand(None)?;

        while let Some(token) = self.consume().cloned() {
            let kind = match token.kind {
                TokenKind::Space => CombinatorKind::Descendant,
                TokenKind::Child => CombinatorKind::Child,
                TokenKind::Tilde => CombinatorKind::GeneralSibling,
                TokenKind::Plus => CombinatorKind::AdjacentSibling,
                found => return Err(unexpected(found, &token)),
            };
            let right = self.parse_operand(Some(&token))?;
            trace!("selector combinator {kind:?} at {}:{}", token.line, token.column);
            selector = Selector::combine(kind, selector, right);
        }

        Ok(selector)
    }

    /// Parse the compound on one side of `combinator` (or the first compound
    /// when there is none).
    fn parse_operand(&mut self, combinator: Option<&Token>) -> Result<Selector, ParseError> {
        let missing_operand = |token: &Token| ParseError::MissingOperand {
            combinator: token.kind,
            line: token.line,
            column: token.column,
        };

        match (self.peek(), combinator) {
            (None, None) => Err(ParseError::EmptySelector),
            (None, Some(combinator)) => Err(missing_operand(combinator)),
            (Some(next), Some(combinator)) if next.kind.is_combinator() => {
                Err(missing_operand(combinator))
            }
            (Some(next), None) if next.kind.is_combinator() => Err(missing_operand(next)),
            (Some(next), _) if !starts_compound(next.kind) => Err(unexpected(next.kind, next)),
            (Some(_), _) => self.parse_compound(),
        }
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    ///
    /// "A compound selector is a sequence of simple selectors that are not
    /// separated by a combinator... If it contains a type selector or
    /// universal selector, that selector must come first in the sequence."
    ///
    /// Without a type selector the compound matches any element. Attribute
    /// predicates always attach to the name test, even when written after a
    /// pseudo-class.
    fn parse_compound(&mut self) -> Result<Selector, ParseError> {
        let test = self.parse_type_selector()?.unwrap_or_else(NodeTest::any);
        let mut predicates = Vec::new();
        let mut pseudo_classes = Vec::new();

        while let Some(token) = self.peek().cloned() {
            match token.kind {
                // [§ 6.7 ID selectors](https://www.w3.org/TR/selectors-4/#id-selectors)
                TokenKind::Hash => {
                    self.position += 1;
                    predicates.push(AttributePredicate::id(token.text()));
                }
                // [§ 6.6 Class selectors](https://www.w3.org/TR/selectors-4/#class-html)
                TokenKind::Dot => {
                    self.position += 1;
                    let name = self.expect_ident(&token, "class name")?;
                    predicates.push(AttributePredicate::class(name));
                }
                // [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
                TokenKind::LeftBracket => {
                    self.position += 1;
                    predicates.push(self.parse_attribute(&token)?);
                }
                TokenKind::Colon => {
                    self.position += 1;
                    pseudo_classes.push(self.parse_pseudo_class(&token)?);
                }
                _ => break,
            }
        }

        let compound = Selector::Test { test, predicates };
        Ok(pseudo_classes
            .into_iter()
            .fold(compound, |target, (name, argument)| Selector::Pseudo {
                target: Box::new(target),
                name,
                argument,
            }))
    }

    /// [§ 5.3 Namespaces in Elemental Selectors](https://www.w3.org/TR/selectors-4/#type-nmsp)
    ///
    /// `name`, `*`, `ns|name`, `*|name`, `|name` and the `*` forms of each.
    fn parse_type_selector(&mut self) -> Result<Option<NodeTest>, ParseError> {
        let Some(first) = self.peek().cloned() else {
            return Ok(None);
        };
        if !matches!(first.kind, TokenKind::Ident | TokenKind::Star | TokenKind::Pipe) {
            return Ok(None);
        }

        let namespace = self.parse_namespace_prefix();
        let mut test = match self.consume().cloned() {
            Some(token) if token.kind == TokenKind::Ident => NodeTest::named(token.text()),
            Some(token) if token.kind == TokenKind::Star => NodeTest::any(),
            Some(token) => return Err(unexpected(token.kind, &token)),
            None => return Err(end_after(&first, "element name")),
        };
        test.namespace = namespace;
        Ok(Some(test))
    }

    /// `ns|`, `*|` or a bare `|` ahead of a name. Consumed only if present.
    fn parse_namespace_prefix(&mut self) -> Option<String> {
        let first = self.peek()?;
        let prefix = match (first.kind, self.peek_at(1).map(|token| token.kind)) {
            (TokenKind::Ident, Some(TokenKind::Pipe)) => first.text().to_string(),
            (TokenKind::Star, Some(TokenKind::Pipe)) => "*".to_string(),
            (TokenKind::Pipe, _) => {
                self.position += 1;
                return Some(String::new());
            }
            _ => return None,
        };
        self.position += 2;
        Some(prefix)
    }

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// `open` is the `[`, already consumed.
    fn parse_attribute(&mut self, open: &Token) -> Result<AttributePredicate, ParseError> {
        let unterminated = ParseError::UnterminatedBracket {
            line: open.line,
            column: open.column,
        };

        let namespace = self.parse_namespace_prefix();
        let name = match self.consume().cloned() {
            Some(token) if token.kind == TokenKind::Ident => token.text().to_string(),
            Some(token) => return Err(unexpected(token.kind, &token)),
            None => return Err(unterminated),
        };

        let operator = match self.consume().cloned() {
            None => return Err(unterminated),
            Some(token) => match token.kind {
                TokenKind::RightBracket => {
                    let mut predicate = AttributePredicate::exists(name);
                    predicate.namespace = namespace;
                    return Ok(predicate);
                }
                TokenKind::Equals => AttributeOperator::Equals,
                TokenKind::Includes => AttributeOperator::ContainsWord,
                TokenKind::PrefixMatch => AttributeOperator::StartsWith,
                TokenKind::SuffixMatch => AttributeOperator::EndsWith,
                TokenKind::SubstringMatch => AttributeOperator::Contains,
                TokenKind::DashMatch => AttributeOperator::HyphenPrefix,
                found => return Err(unexpected(found, &token)),
            },
        };

        let value = match self.consume().cloned() {
            Some(token) if matches!(token.kind, TokenKind::Ident | TokenKind::String) => {
                token.text().to_string()
            }
            Some(token) => return Err(unexpected(token.kind, &token)),
            None => return Err(unterminated),
        };

        match self.consume().cloned() {
            Some(token) if token.kind == TokenKind::RightBracket => {}
            Some(token) => return Err(unexpected(token.kind, &token)),
            None => return Err(unterminated),
        }

        let mut predicate = AttributePredicate::compare(name, operator, value);
        predicate.namespace = namespace;
        Ok(predicate)
    }

    /// [§ 3.6.2 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// "A pseudo-class always consists of a colon (:) followed by the name of
    /// the pseudo-class and optionally by a value between parentheses."
    ///
    /// `colon` is the `:`, already consumed.
    fn parse_pseudo_class(
        &mut self,
        colon: &Token,
    ) -> Result<(PseudoClass, Option<String>), ParseError> {
        let name_token = match self.consume().cloned() {
            Some(token) if token.kind == TokenKind::Ident => token,
            Some(token) => return Err(unexpected(token.kind, &token)),
            None => return Err(end_after(colon, "pseudo-class name")),
        };
        let name = name_token.text();

        // An empty `()` still counts as an argument list.
        let mut argument = None;
        if self.peek().is_some_and(|token| token.kind == TokenKind::LeftParen) {
            self.position += 1;
            argument = Some(String::new());
            if self.peek().is_some_and(|token| token.kind == TokenKind::Argument) {
                argument = self.consume().map(|token| token.text().to_string());
            }
            match self.consume().cloned() {
                Some(token) if token.kind == TokenKind::RightParen => {}
                Some(token) => return Err(unexpected(token.kind, &token)),
                None => return Err(end_after(&name_token, "`)`")),
            }
        }

        match PseudoClass::from_parts(name, argument.as_deref()) {
            Ok(class) => Ok((class, argument.filter(|argument| !argument.is_empty()))),
            Err(error) => Err(pseudo_class_error(error, &name_token, argument)),
        }
    }

    /// Consume an identifier following `previous`.
    fn expect_ident(
        &mut self,
        previous: &Token,
        expected: &'static str,
    ) -> Result<String, ParseError> {
        match self.consume().cloned() {
            Some(token) if token.kind == TokenKind::Ident => Ok(token.text().to_string()),
            Some(token) => Err(unexpected(token.kind, &token)),
            None => Err(end_after(previous, expected)),
        }
    }

    fn consume(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.position + offset)
    }
}

/// Whether a token of this kind can begin a compound selector.
const fn starts_compound(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::Star
            | TokenKind::Pipe
            | TokenKind::Hash
            | TokenKind::Dot
            | TokenKind::LeftBracket
            | TokenKind::Colon
    )
}

fn unexpected(found: TokenKind, token: &Token) -> ParseError {
    ParseError::UnexpectedToken {
        found,
        line: token.line,
        column: token.column,
    }
}

fn end_after(token: &Token, expected: &'static str) -> ParseError {
    ParseError::UnexpectedEnd {
        expected,
        line: token.line,
        column: token.column,
    }
}

fn pseudo_class_error(
    error: PseudoClassError,
    name: &Token,
    argument: Option<String>,
) -> ParseError {
    let (line, column) = (name.line, name.column);
    let name = name.text().to_string();
    match error {
        PseudoClassError::Unknown => ParseError::UnknownPseudoClass { name, line, column },
        PseudoClassError::MissingArgument => ParseError::MissingArgument { name, line, column },
        PseudoClassError::UnexpectedArgument => {
            ParseError::UnexpectedArgument { name, line, column }
        }
        PseudoClassError::InvalidArgument => ParseError::InvalidArgument {
            name,
            argument: argument.unwrap_or_default(),
            line,
            column,
        },
    }
}
