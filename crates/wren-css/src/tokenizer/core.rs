use log::trace;

use super::token::{Token, TokenKind};
use crate::error::LexError;

/// [Selectors Level 4 § 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar)
///
/// Tokenizer for a single selector.
///
/// Whitespace is only kept where it means something: between two compound
/// selectors with no explicit combinator it becomes a [`TokenKind::Space`]
/// token, so `a b` and `ab` stay distinct. Whitespace next to `>`, `+` or
/// `~`, at either end of the input, or inside `[...]` is dropped.
pub struct SelectorTokenizer {
    /// The input string being tokenized
    input: Vec<char>,
    /// Current position in the input
    position: usize,
    /// 1-based line of the next character
    line: usize,
    /// 1-based column of the next character
    column: usize,
    /// Collected tokens
    tokens: Vec<Token>,
    /// Start of the whitespace run seen since the last token, if any
    pending_space: Option<(usize, usize)>,
    /// Nesting depth of `[`
    bracket_depth: usize,
}

impl SelectorTokenizer {
    /// Create a new tokenizer over `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            pending_space: None,
            bracket_depth: 0,
        }
    }

    /// Tokenize the whole input.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] for an unterminated string or pseudo-class
    /// argument, or for a character no selector token starts with.
    pub fn run(&mut self) -> Result<(), LexError> {
        while let Some(c) = self.peek() {
            let (line, column) = (self.line, self.column);
            if is_whitespace(c) {
                self.consume_whitespace();
                if self.bracket_depth == 0 && self.pending_space.is_none() {
                    self.pending_space = Some((line, column));
                }
                continue;
            }
            self.consume_token(line, column)?;
        }
        Ok(())
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Consume one token starting at `line:column`.
    fn consume_token(&mut self, line: usize, column: usize) -> Result<(), LexError> {
        let Some(c) = self.consume() else {
            return Ok(());
        };

        match c {
            '"' | '\'' => {
                let value = self.consume_string_token(c, line, column)?;
                self.emit(TokenKind::String, Some(value), line, column);
            }

            // [§ 6.7 ID selectors](https://www.w3.org/TR/selectors-4/#id-selectors)
            // "An ID selector is a hash (#, U+0023) immediately followed by the
            // ID value, which is an identifier."
            '#' if self.peek().is_some_and(is_ident_code_point)
                || is_valid_escape(self.peek(), self.peek_at(1)) =>
            {
                let value = self.consume_ident_sequence();
                self.emit(TokenKind::Hash, Some(value), line, column);
            }

            '.' => self.emit(TokenKind::Dot, None, line, column),

            '[' => {
                self.bracket_depth += 1;
                self.emit(TokenKind::LeftBracket, None, line, column);
            }
            ']' => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                self.emit(TokenKind::RightBracket, None, line, column);
            }

            // [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
            '=' => self.emit(TokenKind::Equals, None, line, column),
            '~' | '^' | '$' | '*' | '|' if self.peek() == Some('=') => {
                let _ = self.consume();
                let kind = match c {
                    '~' => TokenKind::Includes,
                    '^' => TokenKind::PrefixMatch,
                    '$' => TokenKind::SuffixMatch,
                    '*' => TokenKind::SubstringMatch,
                    _ => TokenKind::DashMatch,
                };
                self.emit(kind, None, line, column);
            }

            // [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
            '>' => self.emit(TokenKind::Child, None, line, column),
            '+' => self.emit(TokenKind::Plus, None, line, column),
            '~' => self.emit(TokenKind::Tilde, None, line, column),

            '*' => self.emit(TokenKind::Star, None, line, column),
            '|' => self.emit(TokenKind::Pipe, None, line, column),
            ':' => self.emit(TokenKind::Colon, None, line, column),
            '(' => self.consume_argument(line, column)?,
            ')' => self.emit(TokenKind::RightParen, None, line, column),

            // Unquoted attribute values may start with a digit.
            c if self.starts_ident_with(c) || (self.bracket_depth > 0 && c.is_ascii_digit()) => {
                let mut value = String::new();
                if c == '\\' {
                    value.push(self.consume_escaped_code_point());
                } else {
                    value.push(c);
                }
                value.push_str(&self.consume_ident_sequence());
                self.emit(TokenKind::Ident, Some(value), line, column);
            }

            character => {
                return Err(LexError::UnexpectedCharacter {
                    character,
                    line,
                    column,
                });
            }
        }
        Ok(())
    }

    /// Push a token, first turning any pending whitespace into a descendant
    /// combinator when it separates two compound selectors.
    fn emit(&mut self, kind: TokenKind, value: Option<String>, line: usize, column: usize) {
        if let Some((space_line, space_column)) = self.pending_space.take() {
            let separates_compounds = self
                .tokens
                .last()
                .is_some_and(|previous| !previous.kind.is_combinator());
            if separates_compounds && !kind.is_combinator() {
                trace!("selector whitespace at {space_line}:{space_column} is a descendant combinator");
                self.tokens.push(Token::new(TokenKind::Space, None, space_line, space_column));
            }
        }
        self.tokens.push(Token::new(kind, value, line, column));
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    ///
    /// The opening quote has been consumed. A newline or the end of input
    /// before the closing quote is an error rather than a `<bad-string-token>`.
    fn consume_string_token(
        &mut self,
        ending_code_point: char,
        line: usize,
        column: usize,
    ) -> Result<String, LexError> {
        let mut value = String::new();

        loop {
            match self.consume() {
                // "ending code point"
                Some(c) if c == ending_code_point => return Ok(value),

                None | Some('\n') => return Err(LexError::UnterminatedString { line, column }),

                // "U+005C REVERSE SOLIDUS (\)"
                Some('\\') => match self.peek() {
                    // "If the next input code point is EOF, do nothing."
                    None => {}
                    // "Otherwise, if the next input code point is a newline, consume it."
                    Some('\n') => {
                        let _ = self.consume();
                    }
                    // "Otherwise, (the stream starts with a valid escape) consume an
                    // escaped code point and append the returned code point to the
                    // <string-token>'s value."
                    Some(_) => value.push(self.consume_escaped_code_point()),
                },

                // "anything else"
                Some(c) => value.push(c),
            }
        }
    }

    /// Capture the raw text of a pseudo-class argument up to the matching `)`.
    ///
    /// The `(` has been consumed. Nested parentheses are kept in the argument.
    fn consume_argument(&mut self, line: usize, column: usize) -> Result<(), LexError> {
        self.emit(TokenKind::LeftParen, None, line, column);

        let (argument_line, argument_column) = (self.line, self.column);
        let mut argument = String::new();
        let mut depth = 0_usize;
        loop {
            let (close_line, close_column) = (self.line, self.column);
            match self.consume() {
                None => return Err(LexError::UnterminatedArgument { line, column }),
                Some(')') if depth == 0 => {
                    let trimmed = argument.trim();
                    if !trimmed.is_empty() {
                        let value = trimmed.to_string();
                        self.tokens.push(Token::new(
                            TokenKind::Argument,
                            Some(value),
                            argument_line,
                            argument_column,
                        ));
                    }
                    self.tokens.push(Token::new(
                        TokenKind::RightParen,
                        None,
                        close_line,
                        close_column,
                    ));
                    return Ok(());
                }
                Some(c) => {
                    match c {
                        '(' => depth += 1,
                        ')' => depth -= 1,
                        _ => {}
                    }
                    argument.push(c);
                }
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        // "Let result initially be an empty string."
        let mut result = String::new();

        loop {
            match self.peek() {
                // "ident code point"
                // "Append the code point to result."
                Some(c) if is_ident_code_point(c) => {
                    result.push(c);
                    let _ = self.consume();
                }

                // "the stream starts with a valid escape"
                Some('\\') if is_valid_escape(Some('\\'), self.peek_at(1)) => {
                    let _ = self.consume();
                    result.push(self.consume_escaped_code_point());
                }

                // "anything else"
                // "Return result."
                _ => return result,
            }
        }
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// The `\` has been consumed.
    fn consume_escaped_code_point(&mut self) -> char {
        match self.consume() {
            // "hex digit"
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = c.to_string();
                // "Consume as many hex digits as possible, but no more than 5."
                while hex.len() < 6 {
                    match self.peek() {
                        Some(digit) if digit.is_ascii_hexdigit() => {
                            hex.push(digit);
                            let _ = self.consume();
                        }
                        _ => break,
                    }
                }
                // "If the next input code point is whitespace, consume it."
                if self.peek().is_some_and(is_whitespace) {
                    let _ = self.consume();
                }
                // "If this number is zero, or is for a surrogate, or is greater than
                // the maximum allowed code point, return U+FFFD REPLACEMENT CHARACTER."
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|&code_point| code_point != 0)
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER)
            }
            // "EOF"
            None => char::REPLACEMENT_CHARACTER,
            // "anything else"
            // "Return the current input code point."
            Some(c) => c,
        }
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    ///
    /// `first` has already been consumed; the other two are the next
    /// characters of the input.
    fn starts_ident_with(&self, first: char) -> bool {
        match first {
            // "U+002D HYPHEN-MINUS"
            '-' => {
                let second = self.peek();
                second.is_some_and(|c| is_ident_start_code_point(c) || c == '-')
                    || is_valid_escape(second, self.peek_at(1))
            }
            // "U+005C REVERSE SOLIDUS (\)"
            '\\' => is_valid_escape(Some('\\'), self.peek()),
            // "ident-start code point"
            c => is_ident_start_code_point(c),
        }
    }

    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
    }

    /// Consume and return the next character, tracking line and column.
    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Peek at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    /// Peek at a character at an offset from current position.
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ' | '\r' | '\x0C')
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    // "If the first code point is not U+005C REVERSE SOLIDUS (\), return false.
    // Otherwise, if the second code point is a newline, return false."
    first == Some('\\') && second.is_some_and(|c| c != '\n')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
///
/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
///
/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut tokenizer = SelectorTokenizer::new(input);
        tokenizer.run().unwrap();
        tokenizer.tokens().iter().map(|token| token.kind).collect()
    }

    #[test]
    fn test_hex_escape_in_identifier() {
        let mut tokenizer = SelectorTokenizer::new(r"\31 a");
        tokenizer.run().unwrap();
        assert_eq!(tokenizer.tokens()[0].text(), "1a");
    }

    #[test]
    fn test_null_escape_is_replaced() {
        let mut tokenizer = SelectorTokenizer::new(r"a\0 b");
        tokenizer.run().unwrap();
        assert_eq!(tokenizer.tokens()[0].text(), "a\u{FFFD}b");
    }

    #[test]
    fn test_whitespace_inside_brackets_is_dropped() {
        assert_eq!(
            kinds("[ a = b ]"),
            vec![
                TokenKind::LeftBracket,
                TokenKind::Ident,
                TokenKind::Equals,
                TokenKind::Ident,
                TokenKind::RightBracket,
            ]
        );
    }

    #[test]
    fn test_column_tracking_across_lines() {
        let mut tokenizer = SelectorTokenizer::new("a\n  > b");
        tokenizer.run().unwrap();
        let child = &tokenizer.tokens()[1];
        assert_eq!((child.kind, child.line, child.column), (TokenKind::Child, 2, 3));
    }
}
