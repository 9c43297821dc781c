//! Selector token types.
//!
//! The selector grammar is a small subset of
//! [Selectors Level 4 § 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar),
//! so instead of the generic `<delim-token>` of CSS Syntax every piece of
//! punctuation gets its own kind.

use serde::Serialize;
use strum_macros::Display;

/// The kind of a selector token.
///
/// `Display` renders the token the way it is written, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Element, attribute, class, namespace or pseudo-class name.
    #[strum(serialize = "identifier")]
    Ident,
    /// `#name`. The value is the name without the `#`.
    #[strum(serialize = "`#`")]
    Hash,
    /// `.`, introducing a class name.
    #[strum(serialize = "`.`")]
    Dot,
    /// `[`
    #[strum(serialize = "`[`")]
    LeftBracket,
    /// `]`
    #[strum(serialize = "`]`")]
    RightBracket,
    /// `=`
    #[strum(serialize = "`=`")]
    Equals,
    /// `~=`
    #[strum(serialize = "`~=`")]
    Includes,
    /// `^=`
    #[strum(serialize = "`^=`")]
    PrefixMatch,
    /// `$=`
    #[strum(serialize = "`$=`")]
    SuffixMatch,
    /// `*=`
    #[strum(serialize = "`*=`")]
    SubstringMatch,
    /// `|=`
    #[strum(serialize = "`|=`")]
    DashMatch,
    /// `:`
    #[strum(serialize = "`:`")]
    Colon,
    /// `(`
    #[strum(serialize = "`(`")]
    LeftParen,
    /// `)`
    #[strum(serialize = "`)`")]
    RightParen,
    /// Raw, trimmed text between `(` and its matching `)`.
    #[strum(serialize = "argument")]
    Argument,
    /// Quoted string. The value has quotes removed and escapes resolved.
    #[strum(serialize = "string")]
    String,
    /// `>`
    #[strum(serialize = "`>`")]
    Child,
    /// `+`
    #[strum(serialize = "`+`")]
    Plus,
    /// `~`
    #[strum(serialize = "`~`")]
    Tilde,
    /// Significant whitespace: the descendant combinator.
    #[strum(serialize = "whitespace")]
    Space,
    /// `*`
    #[strum(serialize = "`*`")]
    Star,
    /// `|`, separating a namespace prefix from a name.
    #[strum(serialize = "`|`")]
    Pipe,
}

impl TokenKind {
    /// Whether this token joins two compound selectors.
    #[must_use]
    pub const fn is_combinator(self) -> bool {
        matches!(self, Self::Space | Self::Child | Self::Plus | Self::Tilde)
    }

    /// Whether this token is an attribute matching operator.
    #[must_use]
    pub const fn is_attribute_operator(self) -> bool {
        matches!(
            self,
            Self::Equals
                | Self::Includes
                | Self::PrefixMatch
                | Self::SuffixMatch
                | Self::SubstringMatch
                | Self::DashMatch
        )
    }
}

/// A single selector token with its 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// What was lexed.
    pub kind: TokenKind,
    /// Payload for identifiers, hashes, strings and arguments.
    pub value: Option<String>,
    /// Line of the first character.
    pub line: usize,
    /// Column of the first character.
    pub column: usize,
}

impl Token {
    /// Create a token.
    #[must_use]
    pub const fn new(kind: TokenKind, value: Option<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            value,
            line,
            column,
        }
    }

    /// The payload as a string slice, or `""` for punctuation.
    #[must_use]
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}
