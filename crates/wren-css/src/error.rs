use thiserror::Error;

use crate::tokenizer::TokenKind;

/// A selector tokenizing failure.
///
/// Positions are 1-based and point at the character that opened the
/// offending construct.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A quoted string without its closing quote on the same line.
    #[error("{line}:{column}: unterminated string")]
    UnterminatedString {
        /// Line of the opening quote.
        line: usize,
        /// Column of the opening quote.
        column: usize,
    },

    /// `(` without a matching `)`.
    #[error("{line}:{column}: unterminated pseudo-class argument")]
    UnterminatedArgument {
        /// Line of the `(`.
        line: usize,
        /// Column of the `(`.
        column: usize,
    },

    /// A character that cannot start any selector token.
    #[error("{line}:{column}: unexpected character {character:?}")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Line on which it appeared.
        line: usize,
        /// Column on which it appeared.
        column: usize,
    },
}

/// A selector grammar failure.
///
/// Every variant except [`ParseError::EmptySelector`] carries the position of
/// the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input contained no selector at all.
    #[error("empty selector")]
    EmptySelector,

    /// `:name` where `name` is not a supported pseudo-class.
    #[error("{line}:{column}: unknown pseudo-class :{name}")]
    UnknownPseudoClass {
        /// The pseudo-class name as written.
        name: String,
        /// Line of the name.
        line: usize,
        /// Column of the name.
        column: usize,
    },

    /// A combinator with nothing on one of its sides, e.g. `> a` or `a +`.
    #[error("{line}:{column}: combinator {combinator} is missing an operand")]
    MissingOperand {
        /// The combinator.
        combinator: TokenKind,
        /// Line of the combinator.
        line: usize,
        /// Column of the combinator.
        column: usize,
    },

    /// `[` without a closing `]`.
    #[error("{line}:{column}: unterminated attribute selector")]
    UnterminatedBracket {
        /// Line of the `[`.
        line: usize,
        /// Column of the `[`.
        column: usize,
    },

    /// A token that cannot appear at this point of the selector.
    #[error("{line}:{column}: unexpected {found}")]
    UnexpectedToken {
        /// The kind of token found.
        found: TokenKind,
        /// Line of the token.
        line: usize,
        /// Column of the token.
        column: usize,
    },

    /// The input ended while more of a construct was expected.
    #[error("{line}:{column}: expected {expected} after this")]
    UnexpectedEnd {
        /// What was expected.
        expected: &'static str,
        /// Line of the last token.
        line: usize,
        /// Column of the last token.
        column: usize,
    },

    /// An `nth-*` pseudo-class written without its argument.
    #[error("{line}:{column}: :{name} requires an argument")]
    MissingArgument {
        /// The pseudo-class name.
        name: String,
        /// Line of the name.
        line: usize,
        /// Column of the name.
        column: usize,
    },

    /// A pseudo-class that takes no argument written with one.
    #[error("{line}:{column}: :{name} does not take an argument")]
    UnexpectedArgument {
        /// The pseudo-class name.
        name: String,
        /// Line of the name.
        line: usize,
        /// Column of the name.
        column: usize,
    },

    /// An `nth-*` argument that is not `odd`, `even`, an integer or `an+b`.
    #[error("{line}:{column}: invalid argument {argument:?} for :{name}")]
    InvalidArgument {
        /// The pseudo-class name.
        name: String,
        /// The argument as written.
        argument: String,
        /// Line of the name.
        line: usize,
        /// Column of the name.
        column: usize,
    },
}

/// Any failure of [`compile`](crate::compile) or
/// [`parse_selector`](crate::parse_selector).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The selector could not be tokenized.
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    /// The tokens did not form a valid selector.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}
