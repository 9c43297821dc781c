use thiserror::Error;

/// A markup lexing failure.
///
/// Lexing never recovers: once one of these is produced the lexer yields no
/// further tokens. Every variant carries the 1-based line on which the
/// offending construct *started*.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// `<!--` without a closing `-->`.
    #[error("line {line}: unterminated comment")]
    UnterminatedComment {
        /// Line of the `<!--` opener.
        line: usize,
    },

    /// `<![CDATA[` without a closing `]]>`.
    #[error("line {line}: unterminated CDATA section")]
    UnterminatedCdata {
        /// Line of the `<![CDATA[` opener.
        line: usize,
    },

    /// A raw-text element body without its matching end tag.
    #[error("line {line}: unterminated raw text in <{element}>")]
    UnterminatedRawText {
        /// The raw-text element whose end tag is missing.
        element: String,
        /// Line on which the body started.
        line: usize,
    },

    /// A quoted attribute value or doctype identifier without its closing quote.
    #[error("line {line}: unterminated string")]
    UnterminatedString {
        /// Line of the opening quote.
        line: usize,
    },

    /// End of input inside a start or end tag.
    #[error("line {line}: unterminated tag")]
    UnterminatedTag {
        /// Line of the `<` that opened the tag.
        line: usize,
    },

    /// End of input inside a doctype declaration.
    #[error("line {line}: unterminated doctype")]
    UnterminatedDoctype {
        /// Line of the `<!DOCTYPE` opener.
        line: usize,
    },

    /// `<?` without a closing `?>`.
    #[error("line {line}: unterminated processing instruction")]
    UnterminatedProcessingInstruction {
        /// Line of the `<?` opener.
        line: usize,
    },

    /// A character that cannot appear at this point of a tag or declaration.
    #[error("line {line}: unexpected character {character:?}")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Line on which it appeared.
        line: usize,
    },
}

impl LexError {
    /// The line number carried by this error.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnterminatedComment { line }
            | Self::UnterminatedCdata { line }
            | Self::UnterminatedRawText { line, .. }
            | Self::UnterminatedString { line }
            | Self::UnterminatedTag { line }
            | Self::UnterminatedDoctype { line }
            | Self::UnterminatedProcessingInstruction { line }
            | Self::UnexpectedCharacter { line, .. } => *line,
        }
    }
}
