//! Helper functions for the markup lexer.
//!
//! This module contains utility functions used throughout the lexer:
//! - State transitions
//! - Input/character handling (consume, peek, lookahead)
//! - Token emission
//! - Raw-text end tag detection

use log::trace;

use super::core::{LexerState, MarkupLexer};
use super::token::{Token, TokenKind};
use crate::error::LexError;

// =============================================================================
// State Transition Helpers
// =============================================================================

impl MarkupLexer {
    /// Transition to a new state. The next step dispatches on it.
    pub(super) fn switch_to(&mut self, new_state: LexerState) {
        if self.state != new_state {
            trace!("markup lexer: {} -> {new_state}", self.state);
        }
        self.state = new_state;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl MarkupLexer {
    /// Consume and return the next character, tracking line numbers.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Peek at the next character without consuming it.
    pub(super) fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    /// Peek at a character at an offset from the current position.
    pub(super) fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    /// Check if the next few characters match the target string exactly.
    pub(super) fn next_few_characters_are(&self, target: &str) -> bool {
        target
            .chars()
            .enumerate()
            .all(|(i, expected)| self.peek_at(i) == Some(expected))
    }

    /// Check if the characters at `offset` match `target` using ASCII
    /// case-insensitive comparison.
    pub(super) fn characters_at_match_ignore_case(&self, offset: usize, target: &str) -> bool {
        target.chars().enumerate().all(|(i, expected)| {
            self.peek_at(offset + i)
                .is_some_and(|c| c.eq_ignore_ascii_case(&expected))
        })
    }

    /// `<!DOCTYPE`, with the keyword matched case-insensitively.
    pub(super) fn starts_doctype(&self) -> bool {
        self.next_few_characters_are("<!") && self.characters_at_match_ignore_case(2, "DOCTYPE")
    }

    /// Whether the `<` at the current position opens markup rather than
    /// being plain text.
    pub(super) fn opens_markup(&self) -> bool {
        self.next_few_characters_are("<!--")
            || self.next_few_characters_are("<![CDATA[")
            || self.starts_doctype()
            || self.next_few_characters_are("<?")
            || self.next_few_characters_are("</")
            || (self.peek() == Some('<') && self.peek_at(1).is_some_and(is_name_start_char))
    }

    /// Consume the given string from the input.
    /// Caller must have already verified the characters are present.
    pub(super) fn consume_string(&mut self, target: &str) {
        self.advance(target.chars().count());
    }

    /// Consume `count` characters.
    pub(super) fn advance(&mut self, count: usize) {
        for _ in 0..count {
            let _ = self.consume();
        }
    }

    /// Consume as much whitespace as possible.
    pub(super) fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
    }

    /// [XML 1.0 § 2.3 Common Syntactic Constructs](https://www.w3.org/TR/xml/#sec-common-syn)
    ///
    /// `Name ::= NameStartChar (NameChar)*`
    pub(super) fn consume_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            let accepted = if name.is_empty() {
                is_name_start_char(c)
            } else {
                is_name_char(c)
            };
            if !accepted {
                break;
            }
            name.push(c);
            let _ = self.consume();
        }
        name
    }

    /// Consume a string delimited by `quote`, which must be the next character.
    pub(super) fn consume_quoted(&mut self, quote: char) -> Result<String, LexError> {
        let line = self.line;
        let _ = self.consume(); // opening quote
        let mut value = String::new();
        loop {
            match self.consume() {
                Some(c) if c == quote => return Ok(value),
                Some(c) => value.push(c),
                None => return Err(LexError::UnterminatedString { line }),
            }
        }
    }

    /// Consume everything up to and including `terminator`, returning what
    /// came before it. Returns `None` when the input ends first.
    pub(super) fn consume_until(&mut self, terminator: &str) -> Option<String> {
        let mut body = String::new();
        loop {
            if self.next_few_characters_are(terminator) {
                self.consume_string(terminator);
                return Some(body);
            }
            body.push(self.consume()?);
        }
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl MarkupLexer {
    /// Queue a token that carries no value.
    pub(super) fn emit_marker(&mut self, kind: TokenKind, line: usize) {
        self.pending.push_back(Token::marker(kind, line));
    }

    /// Queue a token with a value.
    pub(super) fn emit_value(&mut self, kind: TokenKind, value: String, line: usize) {
        self.pending.push_back(Token::new(kind, value, line));
    }

    /// Queue `prefix:local` as a namespace token followed by a name token, or
    /// just the name token when there is no prefix.
    pub(super) fn emit_qualified_name(
        &mut self,
        ns_kind: TokenKind,
        name_kind: TokenKind,
        name: &str,
        line: usize,
    ) {
        match split_qualified_name(name) {
            (Some(prefix), local) => {
                self.emit_value(ns_kind, prefix.to_string(), line);
                self.emit_value(name_kind, local.to_string(), line);
            }
            (None, local) => self.emit_value(name_kind, local.to_string(), line),
        }
    }
}

// =============================================================================
// Raw Text Helpers
// =============================================================================

impl MarkupLexer {
    /// If the input continues with the end tag of `element`
    /// (`</element`, optional whitespace, `>`), return its length in characters.
    pub(super) fn matching_end_tag_length(&self, element: &str) -> Option<usize> {
        let name_matches = element.chars().enumerate().all(|(i, expected)| {
            self.peek_at(2 + i).is_some_and(|c| {
                if self.options.html {
                    c.eq_ignore_ascii_case(&expected)
                } else {
                    c == expected
                }
            })
        });
        if !name_matches {
            return None;
        }

        let mut offset = 2 + element.chars().count();
        while self.peek_at(offset).is_some_and(is_whitespace) {
            offset += 1;
        }
        (self.peek_at(offset) == Some('>')).then_some(offset + 1)
    }

    /// Report an end tag for some other element found inside a raw-text body.
    pub(super) fn warn_foreign_end_tag(&mut self, element: &str) {
        let name: String = (2..)
            .map_while(|offset| self.peek_at(offset).filter(|&c| is_name_char(c)))
            .collect();
        if !name.is_empty() {
            let _ = self.warnings.warn_once(
                "Markup",
                &format!("end tag </{name}> inside <{element}> kept as text"),
            );
        }
    }
}

/// Split `prefix:local` on the first colon. Names with an empty prefix or
/// local part are returned whole.
#[must_use]
pub fn split_qualified_name(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => (Some(prefix), local),
        _ => (None, name),
    }
}

/// [XML 1.0 § 2.3 White Space](https://www.w3.org/TR/xml/#NT-S)
///
/// `S ::= (#x20 | #x9 | #xD | #xA)+`, plus form feed for HTML input.
#[must_use]
pub const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// [XML 1.0 § 2.3](https://www.w3.org/TR/xml/#NT-NameStartChar)
///
/// `NameStartChar ::= ":" | [A-Z] | "_" | [a-z] | ...` (non-ASCII ranges
/// approximated by "any non-ASCII code point").
#[must_use]
pub const fn is_name_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == ':' || !c.is_ascii()
}

/// [XML 1.0 § 2.3](https://www.w3.org/TR/xml/#NT-NameChar)
///
/// `NameChar ::= NameStartChar | "-" | "." | [0-9] | ...`
#[must_use]
pub const fn is_name_char(c: char) -> bool {
    is_name_start_char(c) || c.is_ascii_digit() || c == '-' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_qualified_name() {
        assert_eq!(split_qualified_name("svg:rect"), (Some("svg"), "rect"));
        assert_eq!(split_qualified_name("rect"), (None, "rect"));
        assert_eq!(split_qualified_name(":rect"), (None, ":rect"));
        assert_eq!(split_qualified_name("a:b:c"), (Some("a"), "b:c"));
    }

    #[test]
    fn test_end_tag_length_allows_whitespace() {
        let mut lexer = MarkupLexer::new("</script  >rest");
        assert_eq!(lexer.matching_end_tag_length("script"), Some(11));
        assert_eq!(lexer.matching_end_tag_length("style"), None);
        lexer.advance(11);
        assert_eq!(lexer.peek(), Some('r'));
    }

    #[test]
    fn test_end_tag_must_be_closed() {
        let lexer = MarkupLexer::new("</scripts>");
        assert_eq!(lexer.matching_end_tag_length("script"), None);
    }

    #[test]
    fn test_consume_tracks_lines() {
        let mut lexer = MarkupLexer::new("a\nb\nc");
        lexer.advance(4);
        assert_eq!(lexer.line, 3);
    }
}
