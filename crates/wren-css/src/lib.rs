//! CSS selector compiler for the wren selector toolkit.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selector Tokenizer** ([CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - Identifiers with escapes, quoted strings, attribute operators
//!   - Significant whitespace as the descendant combinator
//!   - Raw pseudo-class arguments
//!
//! - **Selector Parser** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, universal, namespaced, ID, class and attribute selectors
//!   - Structural pseudo-classes, including `An+B` arguments
//!   - Descendant, child, next-sibling and subsequent-sibling combinators
//!
//! - **Translator**
//!   - Native [XPath 1.0](https://www.w3.org/TR/xpath-10/) location paths
//!     wherever an axis expresses the selector
//!   - `following` / `following-direct` relations for the sibling
//!     relationships that need direct traversal
//!
//! # Not Implemented
//!
//! - Selector lists (`a, b`)
//! - Pseudo-elements and non-structural pseudo-classes (`:hover`, `:not()`)
//! - Evaluating queries against a tree
//!
//! ```
//! let query = wren_css::compile("x > foo#bar").unwrap();
//! assert_eq!(query.to_string(), r#"descendant-or-self::x/foo[@id="bar"]"#);
//! ```

/// Tokenizer, parser and compiler failures.
pub mod error;
/// Selector parser.
pub mod parser;
/// Selector AST.
pub mod selector;
/// Selector tokenizer.
pub mod tokenizer;
/// Selector-to-query translation.
pub mod translator;

pub use error::{CompileError, LexError, ParseError};
pub use parser::SelectorParser;
pub use selector::{
    AttributeOperator, AttributePredicate, CombinatorKind, Name, NodeTest, Nth, PseudoClass,
    Selector,
};
pub use tokenizer::{SelectorTokenizer, Token, TokenKind};
pub use translator::{
    Axis, NativePath, Query, Relation, RelationKind, Step, StepPredicate, translate,
};

/// Tokenize and parse a selector.
///
/// # Errors
///
/// Returns [`CompileError::Lex`] when the selector cannot be tokenized and
/// [`CompileError::Parse`] when the tokens do not form a selector.
pub fn parse_selector(selector: &str) -> Result<Selector, CompileError> {
    let mut tokenizer = SelectorTokenizer::new(selector);
    tokenizer.run()?;
    let parser = SelectorParser::new(tokenizer.into_tokens());
    Ok(parser.parse()?)
}

/// Compile a selector into a query.
///
/// # Errors
///
/// Fails only when [`parse_selector`] fails; translation itself cannot fail.
pub fn compile(selector: &str) -> Result<Query, CompileError> {
    let selector = parse_selector(selector)?;
    Ok(translate(&selector))
}
