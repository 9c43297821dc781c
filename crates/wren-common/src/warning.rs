//! Lexer and compiler warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the markup lexer and the selector compiler to report input that is
//! accepted but probably not what the author meant.
//!
//! Each lexer run or translation owns its own [`Warnings`], so nothing is
//! shared between calls: the same input always prints the same warnings.

use std::collections::HashSet;

use owo_colors::OwoColorize;

/// The warnings reported during one lexer run or one translation.
#[derive(Debug, Clone, Default)]
pub struct Warnings {
    /// Messages already printed, keyed by `[component] message`.
    seen: HashSet<String>,
}

impl Warnings {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Warn about questionable input (prints once per unique message)
    ///
    /// Returns whether the message was new and printed.
    ///
    /// # Example
    /// ```
    /// let mut warnings = wren_common::warning::Warnings::new();
    /// assert!(warnings.warn_once("Markup", "end tag </div> inside <script> kept as text"));
    /// assert!(!warnings.warn_once("Markup", "end tag </div> inside <script> kept as text"));
    /// ```
    pub fn warn_once(&mut self, component: &str, message: &str) -> bool {
        let is_new = self.seen.insert(format!("[{component}] {message}"));
        if is_new {
            eprintln!("{}", format!("[wren {component}] ⚠ {message}").yellow());
        }
        is_new
    }

    /// Number of distinct warnings reported.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_warnings_are_recorded_once() {
        let mut warnings = Warnings::new();
        assert!(warnings.warn_once("Test", "duplicate warning"));
        assert!(!warnings.warn_once("Test", "duplicate warning"));
        assert!(warnings.warn_once("Other", "duplicate warning"));
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_separate_sets_do_not_share_state() {
        let mut first = Warnings::new();
        let mut second = Warnings::new();
        assert!(first.warn_once("Test", "same message"));
        assert!(second.warn_once("Test", "same message"));
        assert!(Warnings::new().is_empty());
    }
}
