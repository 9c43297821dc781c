//! Structural pseudo-classes per
//! [Selectors Level 4 § 14 Tree-Structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos).

use core::fmt;

use serde::Serialize;

/// [§ 14.4 Child-indexed Pseudo-classes](https://www.w3.org/TR/selectors-4/#child-index)
///
/// "The :nth-child(An+B [of S]? ) pseudo-class notation represents elements
/// that are among An+Bth elements from the list composed of their inclusive
/// siblings."
///
/// `step` is `A` and `offset` is `B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Nth {
    /// The cycle size `A`.
    pub step: i32,
    /// The offset `B`.
    pub offset: i32,
}

impl Nth {
    /// Create an `An+B` expression.
    #[must_use]
    pub const fn new(step: i32, offset: i32) -> Self {
        Self { step, offset }
    }

    /// [CSS Syntax Level 3 § 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
    ///
    /// Accepts `odd`, `even`, an integer, or `An+B` in any of its short forms
    /// (`n`, `-n+3`, `2n`, `+3n - 1`). Whitespace is only allowed around the
    /// sign of `B`.
    #[must_use]
    pub fn parse(argument: &str) -> Option<Self> {
        let argument = argument.trim().to_ascii_lowercase();
        match argument.as_str() {
            // "odd: Represents every element with an odd index. Same as 2n+1."
            "odd" => return Some(Self::new(2, 1)),
            // "even: Represents every element with an even index. Same as 2n."
            "even" => return Some(Self::new(2, 0)),
            _ => {}
        }

        let Some((step, offset)) = argument.split_once('n') else {
            return parse_integer(&argument).map(|offset| Self::new(0, offset));
        };

        let step = match step {
            "" | "+" => 1,
            "-" => -1,
            digits => parse_integer(digits)?,
        };

        let offset = offset.trim_start();
        let mut chars = offset.chars();
        let offset = match chars.next() {
            None => 0,
            Some(sign @ ('+' | '-')) => {
                let magnitude = parse_unsigned(chars.as_str().trim_start())?;
                if sign == '-' { -magnitude } else { magnitude }
            }
            Some(_) => return None,
        };

        Some(Self::new(step, offset))
    }
}

/// An optionally signed decimal integer with no inner whitespace.
fn parse_integer(text: &str) -> Option<i32> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn parse_unsigned(text: &str) -> Option<i32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl fmt::Display for Nth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.step, self.offset) {
            (0, offset) => write!(f, "{offset}"),
            (step, offset) => {
                match step {
                    1 => write!(f, "n")?,
                    -1 => write!(f, "-n")?,
                    step => write!(f, "{step}n")?,
                }
                match offset {
                    0 => Ok(()),
                    offset if offset > 0 => write!(f, "+{offset}"),
                    offset => write!(f, "{offset}"),
                }
            }
        }
    }
}

/// [§ 14 Tree-Structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos)
///
/// The pseudo-classes a selector may use. Each one is a condition on an
/// element's position among its siblings, so every one of them can be
/// expressed as a path predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PseudoClass {
    /// [§ 14.1 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    /// "The :root pseudo-class represents an element that is the root of the document."
    Root,
    /// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    /// "The :empty pseudo-class represents an element that has no children except,
    /// optionally, document white space characters."
    Empty,
    /// [§ 14.4.3 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    FirstChild,
    /// [§ 14.4.4 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,
    /// [§ 14.4.5 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    OnlyChild,
    /// [§ 14.5.3 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
    FirstOfType,
    /// [§ 14.5.4 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
    LastOfType,
    /// [§ 14.5.5 :only-of-type](https://www.w3.org/TR/selectors-4/#the-only-of-type-pseudo)
    OnlyOfType,
    /// [§ 14.4.1 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
    NthChild(Nth),
    /// [§ 14.4.2 :nth-last-child()](https://www.w3.org/TR/selectors-4/#the-nth-last-child-pseudo)
    NthLastChild(Nth),
    /// [§ 14.5.1 :nth-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-of-type-pseudo)
    NthOfType(Nth),
    /// [§ 14.5.2 :nth-last-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-last-of-type-pseudo)
    NthLastOfType(Nth),
}

/// Why a `:name(argument)` pair is not a [`PseudoClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoClassError {
    /// No pseudo-class has this name.
    Unknown,
    /// The pseudo-class needs an argument.
    MissingArgument,
    /// The pseudo-class takes no argument.
    UnexpectedArgument,
    /// The argument is not a valid `An+B` expression.
    InvalidArgument,
}

impl PseudoClass {
    /// Resolve a pseudo-class from its name (ASCII case-insensitive) and
    /// optional argument. An empty argument list `()` is passed as `Some("")`.
    ///
    /// # Errors
    ///
    /// Returns a [`PseudoClassError`] when the name is unknown or the
    /// argument does not fit the pseudo-class.
    pub fn from_parts(name: &str, argument: Option<&str>) -> Result<Self, PseudoClassError> {
        let name = name.to_ascii_lowercase();
        let nth: fn(Nth) -> Self = match name.as_str() {
            "nth-child" => Self::NthChild,
            "nth-last-child" => Self::NthLastChild,
            "nth-of-type" => Self::NthOfType,
            "nth-last-of-type" => Self::NthLastOfType,
            _ => {
                let class = match name.as_str() {
                    "root" => Self::Root,
                    "empty" => Self::Empty,
                    "first-child" => Self::FirstChild,
                    "last-child" => Self::LastChild,
                    "only-child" => Self::OnlyChild,
                    "first-of-type" => Self::FirstOfType,
                    "last-of-type" => Self::LastOfType,
                    "only-of-type" => Self::OnlyOfType,
                    _ => return Err(PseudoClassError::Unknown),
                };
                return match argument {
                    Some(_) => Err(PseudoClassError::UnexpectedArgument),
                    None => Ok(class),
                };
            }
        };

        let argument = argument
            .filter(|argument| !argument.trim().is_empty())
            .ok_or(PseudoClassError::MissingArgument)?;
        Nth::parse(argument)
            .map(nth)
            .ok_or(PseudoClassError::InvalidArgument)
    }

    /// The canonical (lowercase) name, without the colon or argument.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Empty => "empty",
            Self::FirstChild => "first-child",
            Self::LastChild => "last-child",
            Self::OnlyChild => "only-child",
            Self::FirstOfType => "first-of-type",
            Self::LastOfType => "last-of-type",
            Self::OnlyOfType => "only-of-type",
            Self::NthChild(_) => "nth-child",
            Self::NthLastChild(_) => "nth-last-child",
            Self::NthOfType(_) => "nth-of-type",
            Self::NthLastOfType(_) => "nth-last-of-type",
        }
    }

    /// The `An+B` argument of the `nth-*` pseudo-classes.
    #[must_use]
    pub const fn nth(&self) -> Option<Nth> {
        match self {
            Self::NthChild(nth)
            | Self::NthLastChild(nth)
            | Self::NthOfType(nth)
            | Self::NthLastOfType(nth) => Some(*nth),
            _ => None,
        }
    }
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.nth() {
            Some(nth) => write!(f, "{}({nth})", self.name()),
            None => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_keywords() {
        assert_eq!(Nth::parse("odd"), Some(Nth::new(2, 1)));
        assert_eq!(Nth::parse(" EVEN "), Some(Nth::new(2, 0)));
    }

    #[test]
    fn test_nth_forms() {
        assert_eq!(Nth::parse("3"), Some(Nth::new(0, 3)));
        assert_eq!(Nth::parse("-2"), Some(Nth::new(0, -2)));
        assert_eq!(Nth::parse("n"), Some(Nth::new(1, 0)));
        assert_eq!(Nth::parse("-n+3"), Some(Nth::new(-1, 3)));
        assert_eq!(Nth::parse("+5n"), Some(Nth::new(5, 0)));
        assert_eq!(Nth::parse("2n + 1"), Some(Nth::new(2, 1)));
        assert_eq!(Nth::parse("3n- 2"), Some(Nth::new(3, -2)));
    }

    #[test]
    fn test_nth_rejects_garbage() {
        assert_eq!(Nth::parse(""), None);
        assert_eq!(Nth::parse("2 n"), None);
        assert_eq!(Nth::parse("2n3"), None);
        assert_eq!(Nth::parse("2n+"), None);
        assert_eq!(Nth::parse("first"), None);
        assert_eq!(Nth::parse("--n"), None);
    }

    #[test]
    fn test_nth_display() {
        assert_eq!(Nth::new(2, 1).to_string(), "2n+1");
        assert_eq!(Nth::new(-1, 3).to_string(), "-n+3");
        assert_eq!(Nth::new(3, -2).to_string(), "3n-2");
        assert_eq!(Nth::new(1, 0).to_string(), "n");
        assert_eq!(Nth::new(0, 4).to_string(), "4");
    }

    #[test]
    fn test_pseudo_class_from_parts() {
        assert_eq!(PseudoClass::from_parts("ROOT", None), Ok(PseudoClass::Root));
        assert_eq!(
            PseudoClass::from_parts("nth-child", Some("odd")),
            Ok(PseudoClass::NthChild(Nth::new(2, 1)))
        );
        assert_eq!(
            PseudoClass::from_parts("nth-of-type", None),
            Err(PseudoClassError::MissingArgument)
        );
        assert_eq!(
            PseudoClass::from_parts("first-child", Some("2")),
            Err(PseudoClassError::UnexpectedArgument)
        );
        assert_eq!(
            PseudoClass::from_parts("nth-child", Some("x")),
            Err(PseudoClassError::InvalidArgument)
        );
        assert_eq!(PseudoClass::from_parts("hover", None), Err(PseudoClassError::Unknown));
    }
}
