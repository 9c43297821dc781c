//! Selector tokenizer module.

/// Tokenizer implementation.
pub mod core;
/// Selector token types.
pub mod token;

pub use self::core::SelectorTokenizer;
pub use token::{Token, TokenKind};
