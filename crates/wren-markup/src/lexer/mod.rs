//! Markup lexer module.
//!
//! Implements a lazy, single-pass lexer over
//! [XML 1.0 § 2 Documents](https://www.w3.org/TR/xml/#sec-documents), with the
//! raw-text element handling of
//! [WHATWG § 13.1.2.6](https://html.spec.whatwg.org/multipage/syntax.html#cdata-rcdata-restrictions).

/// Input and emission helpers shared by the lexer states.
pub mod helpers;
/// Token types produced by the lexer.
pub mod token;
/// Lexer state machine implementation.
pub mod core;

pub use self::core::{LexerState, MarkupLexer};
pub use token::{Token, TokenKind};
