//! Markup lexer for the wren selector toolkit.
//!
//! # Scope
//!
//! This crate implements:
//! - **Markup Lexer** ([XML 1.0 § 2](https://www.w3.org/TR/xml/#sec-documents))
//!   - Elements, namespaced names, and attributes
//!   - Text, comments, CDATA sections, doctypes
//!   - XML declarations and processing instructions
//!   - Raw-text elements (`<script>`, `<style>`) whose bodies are lexed verbatim
//!
//! # Not Implemented
//!
//! - Tree construction (the token stream is handed to an external builder)
//! - Entity and character reference decoding
//! - Namespace resolution

/// Lexer failures.
pub mod error;
/// Markup lexer state machine and token types.
pub mod lexer;
/// Lexer configuration.
pub mod options;

pub use error::LexError;
pub use lexer::{LexerState, MarkupLexer, Token, TokenKind};
pub use options::LexerOptions;

/// Lex `input` with the default (XML) options, collecting every token.
///
/// # Errors
///
/// Returns the first [`LexError`] encountered; no partial token list is
/// returned. Use [`MarkupLexer`] directly to keep the tokens produced before
/// the error.
pub fn lex(input: &str) -> Result<Vec<Token>, LexError> {
    lex_with(input, LexerOptions::default())
}

/// Lex `input` with explicit options, collecting every token.
///
/// # Errors
///
/// Returns the first [`LexError`] encountered.
pub fn lex_with(input: &str, options: LexerOptions) -> Result<Vec<Token>, LexError> {
    MarkupLexer::with_options(input, options).collect()
}
