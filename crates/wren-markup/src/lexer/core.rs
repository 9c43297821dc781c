use std::collections::VecDeque;
use std::iter::FusedIterator;

use log::debug;
use strum_macros::Display;
use wren_common::warning::Warnings;

use super::helpers::{is_name_start_char, is_whitespace};
use super::token::{Token, TokenKind};
use crate::error::LexError;
use crate::options::LexerOptions;

/// The lexer state machine.
///
/// `Normal` dispatches on what follows the current position, `TagOpen` lexes
/// attributes until the tag is closed, and `RawText` copies an element body
/// verbatim up to its end tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LexerState {
    /// Scanning for `<`, text runs, and comment/CDATA/doctype openers.
    Normal,
    /// Inside a start tag or XML declaration, expecting attributes.
    TagOpen,
    /// Inside the body of a raw-text element.
    RawText,
    /// Input exhausted or a lex error was produced.
    Finished,
}

/// Which construct `TagOpen` is lexing attributes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TagContext {
    /// `<name ...>` or `<name .../>`
    Element,
    /// `<?xml ...?>`
    XmlDecl,
}

/// Lazy, single-pass markup lexer.
///
/// The lexer is an iterator of `Result<Token, LexError>`. Tokens lexed before
/// a failure are yielded first, then the error, then nothing: the sequence is
/// finite and cannot be restarted.
///
/// ```
/// use wren_markup::{MarkupLexer, TokenKind};
///
/// let kinds: Vec<TokenKind> = MarkupLexer::new("<p>hi</p>")
///     .map(|token| token.map(|t| t.kind))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(
///     kinds,
///     [TokenKind::ElemStart, TokenKind::ElemName, TokenKind::Text, TokenKind::ElemEnd]
/// );
/// ```
pub struct MarkupLexer {
    pub(super) state: LexerState,
    pub(super) options: LexerOptions,
    pub(super) input: Vec<char>,
    pub(super) position: usize,
    /// 1-based line of the next unconsumed character.
    pub(super) line: usize,
    pub(super) pending: VecDeque<Token>,
    pub(super) error: Option<LexError>,
    pub(super) tag_context: TagContext,
    /// Line of the `<` that opened the tag currently in `TagOpen`.
    pub(super) tag_line: usize,
    /// Qualified name of the most recent start tag.
    pub(super) current_element: String,
    /// Warnings reported by this run only.
    pub(super) warnings: Warnings,
}

impl MarkupLexer {
    /// Create a lexer over `input` with the default (XML) options.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self::with_options(input, LexerOptions::default())
    }

    /// Create a lexer over `input` with explicit options.
    #[must_use]
    pub fn with_options(input: &str, options: LexerOptions) -> Self {
        Self {
            state: LexerState::Normal,
            options,
            input: input.chars().collect(),
            position: 0,
            line: 1,
            pending: VecDeque::new(),
            error: None,
            tag_context: TagContext::Element,
            tag_line: 1,
            current_element: String::new(),
            warnings: Warnings::new(),
        }
    }

    /// The current state of the state machine.
    #[must_use]
    pub const fn state(&self) -> LexerState {
        self.state
    }

    /// The options this lexer was created with.
    #[must_use]
    pub const fn options(&self) -> &LexerOptions {
        &self.options
    }

    /// The warnings reported so far.
    #[must_use]
    pub const fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    /// Lex one construct, queueing the tokens it produces.
    fn step(&mut self) -> Result<(), LexError> {
        match self.state {
            LexerState::Normal => self.lex_normal(),
            LexerState::TagOpen => self.lex_tag_open(),
            LexerState::RawText => self.lex_raw_text(),
            LexerState::Finished => Ok(()),
        }
    }

    /// [XML 1.0 § 2.4 Character Data and Markup](https://www.w3.org/TR/xml/#syntax)
    ///
    /// "Text consists of intermingled character data and markup."
    fn lex_normal(&mut self) -> Result<(), LexError> {
        match self.peek() {
            None => {
                self.switch_to(LexerState::Finished);
                Ok(())
            }
            Some('<') if self.next_few_characters_are("<!--") => self.lex_comment(),
            Some('<') if self.next_few_characters_are("<![CDATA[") => self.lex_cdata(),
            Some('<') if self.starts_doctype() => self.lex_doctype(),
            Some('<') if self.next_few_characters_are("<?") => self.lex_processing_instruction(),
            Some('<') if self.next_few_characters_are("</") => self.lex_end_tag(),
            Some('<') if self.peek_at(1).is_some_and(is_name_start_char) => {
                self.lex_start_tag();
                Ok(())
            }
            Some(_) => {
                self.lex_text();
                Ok(())
            }
        }
    }

    /// Consume character data up to the next `<` that opens markup.
    ///
    /// A `<` that cannot start markup (`a < b`) stays part of the text.
    fn lex_text(&mut self) {
        let line = self.line;
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '<' && self.opens_markup() {
                break;
            }
            text.push(c);
            let _ = self.consume();
        }
        self.emit_value(TokenKind::Text, text, line);
    }

    /// [XML 1.0 § 2.5 Comments](https://www.w3.org/TR/xml/#sec-comments)
    ///
    /// "Comments may appear anywhere in a document outside other markup."
    fn lex_comment(&mut self) -> Result<(), LexError> {
        let line = self.line;
        self.consume_string("<!--");
        let body = self
            .consume_until("-->")
            .ok_or(LexError::UnterminatedComment { line })?;
        self.emit_value(TokenKind::Comment, body, line);
        Ok(())
    }

    /// [XML 1.0 § 2.7 CDATA Sections](https://www.w3.org/TR/xml/#sec-cdata-sect)
    ///
    /// "CDATA sections may occur anywhere character data may occur; they are
    /// used to escape blocks of text containing characters which would
    /// otherwise be recognized as markup."
    fn lex_cdata(&mut self) -> Result<(), LexError> {
        let line = self.line;
        self.consume_string("<![CDATA[");
        let body = self
            .consume_until("]]>")
            .ok_or(LexError::UnterminatedCdata { line })?;
        self.emit_value(TokenKind::Cdata, body, line);
        Ok(())
    }

    /// [XML 1.0 § 2.8 Prolog and Document Type Declaration](https://www.w3.org/TR/xml/#sec-prolog-dtd)
    ///
    /// `<!DOCTYPE name (PUBLIC|SYSTEM) "id" "id" [subset]>`. The first bare
    /// word is the root element name, later ones are the external ID keyword.
    fn lex_doctype(&mut self) -> Result<(), LexError> {
        let line = self.line;
        self.advance("<!DOCTYPE".len());
        self.emit_marker(TokenKind::DoctypeStart, line);

        let mut seen_name = false;
        loop {
            self.skip_whitespace();
            let token_line = self.line;
            match self.peek() {
                None => return Err(LexError::UnterminatedDoctype { line }),
                Some('>') => {
                    let _ = self.consume();
                    self.emit_marker(TokenKind::DoctypeEnd, token_line);
                    return Ok(());
                }
                Some(quote @ ('"' | '\'')) => {
                    let value = self.consume_quoted(quote)?;
                    self.emit_value(TokenKind::String, value, token_line);
                }
                Some('[') => {
                    let _ = self.consume();
                    let subset = self
                        .consume_until("]")
                        .ok_or(LexError::UnterminatedDoctype { line })?;
                    self.emit_value(TokenKind::DoctypeInline, subset, token_line);
                }
                Some(c) if is_name_start_char(c) => {
                    let word = self.consume_name();
                    let kind = if seen_name {
                        TokenKind::DoctypeType
                    } else {
                        TokenKind::DoctypeName
                    };
                    seen_name = true;
                    self.emit_value(kind, word, token_line);
                }
                Some(c) => {
                    return Err(LexError::UnexpectedCharacter {
                        character: c,
                        line: token_line,
                    });
                }
            }
        }
    }

    /// [XML 1.0 § 2.6 Processing Instructions](https://www.w3.org/TR/xml/#sec-pi)
    ///
    /// "Processing instructions (PIs) allow documents to contain instructions
    /// for applications."
    ///
    /// The target `xml` is the XML declaration, whose pseudo-attributes are
    /// lexed like element attributes.
    fn lex_processing_instruction(&mut self) -> Result<(), LexError> {
        let line = self.line;
        self.consume_string("<?");
        let name = match self.peek() {
            Some(c) if is_name_start_char(c) => self.consume_name(),
            Some(c) => {
                return Err(LexError::UnexpectedCharacter {
                    character: c,
                    line: self.line,
                });
            }
            None => return Err(LexError::UnterminatedProcessingInstruction { line }),
        };

        if name == "xml" {
            self.emit_marker(TokenKind::XmlDeclStart, line);
            self.current_element.clear();
            self.tag_context = TagContext::XmlDecl;
            self.tag_line = line;
            self.switch_to(LexerState::TagOpen);
            return Ok(());
        }

        self.emit_marker(TokenKind::ProcInsStart, line);
        self.emit_value(TokenKind::ProcInsName, name, line);
        self.skip_whitespace();
        let body_line = self.line;
        let body = self
            .consume_until("?>")
            .ok_or(LexError::UnterminatedProcessingInstruction { line })?;
        if !body.is_empty() {
            self.emit_value(TokenKind::ProcInsBody, body, body_line);
        }
        self.emit_marker(TokenKind::ProcInsEnd, self.line);
        Ok(())
    }

    /// [XML 1.0 § 3.1 Start-Tags, End-Tags, and Empty-Element Tags](https://www.w3.org/TR/xml/#sec-starttags)
    ///
    /// Emits the start marker and the (possibly prefixed) name, then hands
    /// over to `TagOpen` for the attributes.
    fn lex_start_tag(&mut self) {
        let line = self.line;
        let _ = self.consume(); // <
        self.emit_marker(TokenKind::ElemStart, line);

        let name = self.consume_name();
        self.emit_qualified_name(TokenKind::ElemNs, TokenKind::ElemName, &name, line);

        self.current_element = name;
        self.tag_context = TagContext::Element;
        self.tag_line = line;
        self.switch_to(LexerState::TagOpen);
    }

    /// [XML 1.0 § 3.1](https://www.w3.org/TR/xml/#sec-starttags)
    ///
    /// "The end of every element that begins with a start-tag must be marked
    /// by an end-tag containing a name that echoes the element's type."
    ///
    /// Matching the echoed name is the tree builder's job; the lexer only
    /// checks the tag is well formed.
    fn lex_end_tag(&mut self) -> Result<(), LexError> {
        let line = self.line;
        self.consume_string("</");
        match self.peek() {
            Some(c) if is_name_start_char(c) => {
                let _ = self.consume_name();
            }
            Some(c) => {
                return Err(LexError::UnexpectedCharacter {
                    character: c,
                    line: self.line,
                });
            }
            None => return Err(LexError::UnterminatedTag { line }),
        }

        self.skip_whitespace();
        match self.consume() {
            Some('>') => {
                self.emit_marker(TokenKind::ElemEnd, line);
                Ok(())
            }
            Some(c) => Err(LexError::UnexpectedCharacter {
                character: c,
                line: self.line,
            }),
            None => Err(LexError::UnterminatedTag { line }),
        }
    }

    /// Attributes up to `>`, `/>` or, for an XML declaration, `?>`.
    fn lex_tag_open(&mut self) -> Result<(), LexError> {
        self.skip_whitespace();
        let line = self.line;
        match (self.tag_context, self.peek()) {
            (_, None) => Err(LexError::UnterminatedTag {
                line: self.tag_line,
            }),
            (TagContext::Element, Some('>')) => {
                let _ = self.consume();
                if self.options.is_raw_text_element(&self.current_element) {
                    self.switch_to(LexerState::RawText);
                } else {
                    self.switch_to(LexerState::Normal);
                }
                Ok(())
            }
            (TagContext::Element, Some('/')) if self.next_few_characters_are("/>") => {
                self.consume_string("/>");
                self.emit_marker(TokenKind::ElemEnd, line);
                self.switch_to(LexerState::Normal);
                Ok(())
            }
            (TagContext::XmlDecl, Some('?')) if self.next_few_characters_are("?>") => {
                self.consume_string("?>");
                self.emit_marker(TokenKind::XmlDeclEnd, line);
                self.switch_to(LexerState::Normal);
                Ok(())
            }
            (_, Some(c)) if is_name_start_char(c) => self.lex_attribute(),
            (_, Some(c)) => Err(LexError::UnexpectedCharacter { character: c, line }),
        }
    }

    /// [XML 1.0 § 3.1](https://www.w3.org/TR/xml/#sec-starttags)
    ///
    /// `Attribute ::= Name Eq AttValue`. HTML mode also accepts a bare name
    /// and unquoted values.
    fn lex_attribute(&mut self) -> Result<(), LexError> {
        let line = self.line;
        let name = self.consume_name();
        self.emit_qualified_name(TokenKind::AttrNs, TokenKind::Attr, &name, line);

        self.skip_whitespace();
        match self.peek() {
            Some('=') => {
                let _ = self.consume();
            }
            _ if self.options.html => return Ok(()),
            Some(c) => {
                return Err(LexError::UnexpectedCharacter {
                    character: c,
                    line: self.line,
                });
            }
            None => {
                return Err(LexError::UnterminatedTag {
                    line: self.tag_line,
                });
            }
        }

        self.skip_whitespace();
        let value_line = self.line;
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let value = self.consume_quoted(quote)?;
                self.emit_value(TokenKind::String, value, value_line);
                Ok(())
            }
            Some(c) if self.options.html && c != '>' => {
                let mut value = String::new();
                while let Some(c) = self.peek() {
                    if is_whitespace(c) || c == '>' {
                        break;
                    }
                    value.push(c);
                    let _ = self.consume();
                }
                self.emit_value(TokenKind::String, value, value_line);
                Ok(())
            }
            Some(c) => Err(LexError::UnexpectedCharacter {
                character: c,
                line: value_line,
            }),
            None => Err(LexError::UnterminatedTag {
                line: self.tag_line,
            }),
        }
    }

    /// [WHATWG § 13.1.2.6 Restrictions on the contents of raw text elements](https://html.spec.whatwg.org/multipage/syntax.html#cdata-rcdata-restrictions)
    ///
    /// "The text in raw text and escapable raw text elements must not contain
    /// any occurrences of the string "</" followed by characters that
    /// case-insensitively match the tag name of the element followed by one of
    /// U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF), U+000C FORM
    /// FEED (FF), U+000D CARRIAGE RETURN (CR), U+0020 SPACE, U+003E
    /// GREATER-THAN SIGN (>), or U+002F SOLIDUS (/)."
    ///
    /// Everything up to that end tag, comment openers included, becomes one
    /// text token.
    fn lex_raw_text(&mut self) -> Result<(), LexError> {
        let line = self.line;
        let element = std::mem::take(&mut self.current_element);
        let mut body = String::new();

        loop {
            if self.next_few_characters_are("</") {
                if let Some(length) = self.matching_end_tag_length(&element) {
                    let end_line = self.line;
                    self.advance(length);
                    if !body.is_empty() {
                        self.emit_value(TokenKind::Text, body, line);
                    }
                    self.emit_marker(TokenKind::ElemEnd, end_line);
                    self.switch_to(LexerState::Normal);
                    return Ok(());
                }
                self.warn_foreign_end_tag(&element);
            }

            match self.consume() {
                Some(c) => body.push(c),
                None => return Err(LexError::UnterminatedRawText { element, line }),
            }
        }
    }
}

impl Iterator for MarkupLexer {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }
            if let Some(error) = self.error.take() {
                return Some(Err(error));
            }
            if self.state == LexerState::Finished {
                return None;
            }
            if let Err(error) = self.step() {
                debug!("markup lexer stopped in {} state: {error}", self.state);
                self.switch_to(LexerState::Finished);
                self.error = Some(error);
            }
        }
    }
}

impl FusedIterator for MarkupLexer {}
