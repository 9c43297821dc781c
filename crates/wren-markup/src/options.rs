//! Lexer configuration.
//!
//! Options derive `serde` so a host can keep them alongside its own settings,
//! e.g. `{"html": true, "raw_text_elements": ["script", "style"]}`.

use serde::{Deserialize, Serialize};

/// Elements whose bodies are lexed verbatim unless configured otherwise.
pub const DEFAULT_RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Options controlling how markup is lexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerOptions {
    /// HTML mode: raw-text element names match ASCII case-insensitively,
    /// attributes may omit their value, and attribute values may be unquoted.
    pub html: bool,

    /// Elements whose body is emitted as a single text token up to the
    /// matching end tag.
    pub raw_text_elements: Vec<String>,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            html: false,
            raw_text_elements: DEFAULT_RAW_TEXT_ELEMENTS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl LexerOptions {
    /// Default options with HTML mode switched on.
    #[must_use]
    pub fn html() -> Self {
        Self {
            html: true,
            ..Self::default()
        }
    }

    /// Replace the raw-text element set.
    #[must_use]
    pub fn with_raw_text_elements<I, S>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.raw_text_elements = elements.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a start tag named `name` switches the lexer into raw-text mode.
    #[must_use]
    pub fn is_raw_text_element(&self, name: &str) -> bool {
        self.raw_text_elements.iter().any(|element| {
            if self.html {
                element.eq_ignore_ascii_case(name)
            } else {
                element == name
            }
        })
    }
}
