//! Selector parser module.

/// Selector parser implementation per [Selectors Level 4 § 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar).
pub mod selector_parser;

pub use selector_parser::SelectorParser;
