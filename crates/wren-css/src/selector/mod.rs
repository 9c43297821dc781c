//! Selector AST
//!
//! The parser produces one immutable [`Selector`] tree per input. Compound
//! selectors are [`Selector::Test`] nodes, optionally wrapped in
//! [`Selector::Pseudo`] nodes; compounds are joined by left-associative
//! [`Selector::Combinator`] nodes, so `a + b + c` is
//! `Combinator(+, Combinator(+, a, b), c)`.

mod pseudo;

use core::fmt;

use serde::Serialize;
use strum_macros::{Display, EnumIter};

pub use pseudo::{Nth, PseudoClass, PseudoClassError};

/// The local-name part of a [`NodeTest`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Name {
    /// A specific local name.
    Named(String),
    /// `*`, any local name.
    Wildcard,
}

/// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
/// [§ 5.3 Namespaces in Elemental Selectors](https://www.w3.org/TR/selectors-4/#type-nmsp)
///
/// An element name test. The namespace is `None` when no `|` was written,
/// `Some("")` for `|name` (no namespace), and `Some("*")` for `*|name`
/// (any namespace).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NodeTest {
    /// Namespace prefix.
    pub namespace: Option<String>,
    /// Local name or wildcard.
    pub name: Name,
}

impl NodeTest {
    /// A test for a local name in the default namespace.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: Name::Named(name.into()),
        }
    }

    /// `*`
    #[must_use]
    pub const fn any() -> Self {
        Self {
            namespace: None,
            name: Name::Wildcard,
        }
    }

    /// Set the namespace prefix.
    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// The local name, or `None` for the wildcard.
    #[must_use]
    pub fn local_name(&self) -> Option<&str> {
        match &self.name {
            Name::Named(name) => Some(name),
            Name::Wildcard => None,
        }
    }
}

impl fmt::Display for NodeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace.as_deref() {
            None => {}
            Some("*") => f.write_str("*|")?,
            Some(namespace) => {
                write_identifier(f, namespace)?;
                f.write_str("|")?;
            }
        }
        match &self.name {
            Name::Named(name) => write_identifier(f, name),
            Name::Wildcard => f.write_str("*"),
        }
    }
}

/// [CSSOM § 2.1 Serialize an identifier](https://drafts.csswg.org/cssom/#serialize-an-identifier)
fn write_identifier(f: &mut fmt::Formatter<'_>, identifier: &str) -> fmt::Result {
    let starts_with_hyphen = identifier.starts_with('-');
    for (index, c) in identifier.chars().enumerate() {
        match c {
            // "If the character is NULL (U+0000), then the REPLACEMENT CHARACTER (U+FFFD)."
            '\0' => write!(f, "{}", char::REPLACEMENT_CHARACTER)?,
            // "If the character is in the range [\1-\1f] (U+0001 to U+001F) or is
            // U+007F, then the character escaped as code point."
            c if c.is_ascii_control() => write_code_point_escape(f, c)?,
            // "If the character is the first character and is in the range [0-9]
            // (U+0030 to U+0039), then the character escaped as code point."
            // "If the character is the second character and is in the range [0-9]
            // (U+0030 to U+0039) and the first character is a "-" (U+002D), then
            // the character escaped as code point."
            c if c.is_ascii_digit() && (index == 0 || (index == 1 && starts_with_hyphen)) => {
                write_code_point_escape(f, c)?;
            }
            // "If the character is the first character and is a "-" (U+002D), and
            // there is no second character, then the escaped character."
            '-' if identifier.len() == 1 => f.write_str("\\-")?,
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() => {
                write!(f, "{c}")?;
            }
            // "Otherwise, the escaped character."
            c => write!(f, "\\{c}")?,
        }
    }
    Ok(())
}

/// [CSSOM § 2.1 Serialize a string](https://drafts.csswg.org/cssom/#serialize-a-string)
fn write_string(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in value.chars() {
        match c {
            '\0' => write!(f, "{}", char::REPLACEMENT_CHARACTER)?,
            c if c.is_ascii_control() => write_code_point_escape(f, c)?,
            '"' | '\\' => write!(f, "\\{c}")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

/// "To escape a character as code point means to create a string of "\"
/// (U+005C), followed by the code point as the smallest possible number of
/// hexadecimal digits in the range 0-9 a-f (U+0030 to U+0039 and U+0061 to
/// U+0066) to represent the code point in base 16, followed by a single
/// SPACE (U+0020)."
fn write_code_point_escape(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    write!(f, "\\{:x} ", u32::from(c))
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeOperator {
    /// `[att]` "Represents an element with the att attribute, whatever the
    /// value of the attribute."
    #[strum(serialize = "")]
    Exists,
    /// `[att=val]` "Represents an element with the att attribute whose value
    /// is exactly 'val'."
    #[strum(serialize = "=")]
    Equals,
    /// `[att~=val]` and `.class`: "Represents an element with the att
    /// attribute whose value is a whitespace-separated list of words, one of
    /// which is exactly 'val'."
    #[strum(serialize = "~=")]
    ContainsWord,
    /// `[att^=val]` "begins with the prefix 'val'"
    #[strum(serialize = "^=")]
    StartsWith,
    /// `[att$=val]` "ends with the suffix 'val'"
    #[strum(serialize = "$=")]
    EndsWith,
    /// `[att*=val]` "contains at least one instance of the substring 'val'"
    #[strum(serialize = "*=")]
    Contains,
    /// `[att|=val]` "either being exactly 'val' or beginning with 'val'
    /// immediately followed by '-'"
    #[strum(serialize = "|=")]
    HyphenPrefix,
}

/// A condition on one attribute of the element matched by a [`NodeTest`].
///
/// `#id` and `.class` are shorthands for `[id=value]` and `[class~=value]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AttributePredicate {
    /// Namespace prefix of the attribute name.
    pub namespace: Option<String>,
    /// Local name of the attribute.
    pub name: String,
    /// How the value is compared.
    pub operator: AttributeOperator,
    /// The value to compare with; `None` only for [`AttributeOperator::Exists`].
    pub value: Option<String>,
}

impl AttributePredicate {
    /// `[name]`
    #[must_use]
    pub fn exists(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
            operator: AttributeOperator::Exists,
            value: None,
        }
    }

    /// `[name OP value]`
    #[must_use]
    pub fn compare(
        name: impl Into<String>,
        operator: AttributeOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            namespace: None,
            name: name.into(),
            operator,
            value: Some(value.into()),
        }
    }

    /// `#value`
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self::compare("id", AttributeOperator::Equals, value)
    }

    /// `.value`
    #[must_use]
    pub fn class(value: impl Into<String>) -> Self {
        Self::compare("class", AttributeOperator::ContainsWord, value)
    }

    /// Set the namespace prefix of the attribute name.
    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

impl fmt::Display for AttributePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shorthand = match (self.namespace.as_deref(), self.name.as_str(), self.operator) {
            (None, "id", AttributeOperator::Equals) => Some('#'),
            (None, "class", AttributeOperator::ContainsWord) => Some('.'),
            _ => None,
        };
        if let (Some(prefix), Some(value)) = (shorthand, self.value.as_deref())
            && is_plain_identifier(value)
        {
            return write!(f, "{prefix}{value}");
        }

        f.write_str("[")?;
        if let Some(namespace) = &self.namespace {
            write_identifier(f, namespace)?;
            f.write_str("|")?;
        }
        write_identifier(f, &self.name)?;
        if let Some(value) = &self.value {
            write!(f, "{}", self.operator)?;
            write_string(f, value)?;
        }
        f.write_str("]")
    }
}

/// Whether `value` can be written after `#` or `.` without escaping.
fn is_plain_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || !c.is_ascii())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii())
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CombinatorKind {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    #[strum(serialize = " ")]
    Descendant,
    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is a
    /// direct child of element A."
    #[strum(serialize = " > ")]
    Child,
    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A selector of the form 'A ~ B' represents an element B that follows
    /// element A (not necessarily immediately), where A and B share the same
    /// parent."
    #[strum(serialize = " ~ ")]
    GeneralSibling,
    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A selector of the form 'A + B' represents an element B that
    /// immediately follows element A, where A and B share the same parent."
    #[strum(serialize = " + ")]
    AdjacentSibling,
}

/// A parsed selector.
///
/// `Display` writes the selector back as canonical CSS text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Selector {
    /// A compound selector without pseudo-classes: a name test plus
    /// attribute predicates.
    Test {
        /// The element name test.
        test: NodeTest,
        /// Attribute conditions, in source order.
        predicates: Vec<AttributePredicate>,
    },

    /// A pseudo-class applied to the compound selector `target`.
    Pseudo {
        /// The selector the pseudo-class restricts.
        target: Box<Self>,
        /// The pseudo-class.
        name: PseudoClass,
        /// The argument as written, for the `nth-*` pseudo-classes.
        argument: Option<String>,
    },

    /// Two selectors joined by a combinator. `right` is matched relative to
    /// each element matched by `left`.
    Combinator {
        /// The relationship between the two sides.
        kind: CombinatorKind,
        /// The context side.
        left: Box<Self>,
        /// The subject side.
        right: Box<Self>,
    },
}

impl Selector {
    /// A type selector with no predicates.
    #[must_use]
    pub fn element(name: impl Into<String>) -> Self {
        Self::Test {
            test: NodeTest::named(name),
            predicates: Vec::new(),
        }
    }

    /// Wrap `self` in a pseudo-class.
    #[must_use]
    pub fn with_pseudo(self, name: PseudoClass) -> Self {
        Self::Pseudo {
            target: Box::new(self),
            name,
            argument: name.nth().map(|nth| nth.to_string()),
        }
    }

    /// Join `left` and `right` with a combinator.
    #[must_use]
    pub fn combine(kind: CombinatorKind, left: Self, right: Self) -> Self {
        Self::Combinator {
            kind,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Whether a pseudo-class appears anywhere in this subtree.
    #[must_use]
    pub fn contains_pseudo(&self) -> bool {
        match self {
            Self::Test { .. } => false,
            Self::Pseudo { .. } => true,
            Self::Combinator { left, right, .. } => left.contains_pseudo() || right.contains_pseudo(),
        }
    }

    /// The number of compound selectors in this subtree.
    #[must_use]
    pub fn compound_count(&self) -> usize {
        match self {
            Self::Test { .. } | Self::Pseudo { .. } => 1,
            Self::Combinator { left, right, .. } => left.compound_count() + right.compound_count(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Test { test, predicates } => {
                write!(f, "{test}")?;
                predicates.iter().try_for_each(|predicate| write!(f, "{predicate}"))
            }
            Self::Pseudo { target, name, .. } => write!(f, "{target}:{name}"),
            Self::Combinator { kind, left, right } => write!(f, "{left}{kind}{right}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_display_uses_shorthand_when_possible() {
        assert_eq!(AttributePredicate::id("bar").to_string(), "#bar");
        assert_eq!(AttributePredicate::class("x-y").to_string(), ".x-y");
        assert_eq!(AttributePredicate::id("1st").to_string(), "[id=\"1st\"]");
        assert_eq!(
            AttributePredicate::compare("lang", AttributeOperator::HyphenPrefix, "en").to_string(),
            "[lang|=\"en\"]"
        );
        assert_eq!(AttributePredicate::exists("href").to_string(), "[href]");
    }

    #[test]
    fn test_display_escapes_strings() {
        assert_eq!(
            AttributePredicate::compare("title", AttributeOperator::Equals, "p\nq").to_string(),
            r#"[title="p\a q"]"#
        );
        assert_eq!(
            AttributePredicate::compare("title", AttributeOperator::Equals, r#"a"b\c"#).to_string(),
            r#"[title="a\"b\\c"]"#
        );
    }

    #[test]
    fn test_display_escapes_identifiers() {
        assert_eq!(NodeTest::named("1a").to_string(), r"\31 a");
        assert_eq!(NodeTest::named("-2").to_string(), r"-\32 ");
        assert_eq!(NodeTest::named("-").to_string(), r"\-");
        assert_eq!(NodeTest::named("a.b").to_string(), r"a\.b");
        assert_eq!(NodeTest::named("rect").in_namespace("*").to_string(), "*|rect");
        assert_eq!(NodeTest::named("-x_y").to_string(), "-x_y");
    }

    #[test]
    fn test_selector_helpers() {
        let selector = Selector::combine(
            CombinatorKind::Child,
            Selector::element("a"),
            Selector::element("b").with_pseudo(PseudoClass::FirstChild),
        );
        assert!(selector.contains_pseudo());
        assert_eq!(selector.compound_count(), 2);
        assert_eq!(selector.to_string(), "a > b:first-child");
    }
}
