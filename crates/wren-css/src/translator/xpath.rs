//! Text rendering of compiled queries.
//!
//! Native paths render as [XPath 1.0](https://www.w3.org/TR/xpath-10/)
//! location paths. Relations render as `following(<left>, <right>)` and
//! `following-direct(<left>, <right>)`, which a relation evaluator parses
//! back into its own call.

use core::fmt;

use super::query::{Axis, NativePath, Query, Relation, Step, StepPredicate};
use crate::selector::{AttributeOperator, AttributePredicate, Name, NodeTest, Nth, PseudoClass};

/// [XPath 1.0 § 3.7 Lexical Structure](https://www.w3.org/TR/xpath-10/#exprlex)
///
/// `Literal ::= '"' [^"]* '"' | "'" [^']* "'"`
///
/// XPath 1.0 literals have no escapes, so a value containing both quote
/// characters is spelled as a `concat()` of pieces.
#[must_use]
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    if !value.contains('\'') {
        return format!("'{value}'");
    }

    let pieces: Vec<String> = value
        .split('"')
        .map(|piece| format!("\"{piece}\""))
        .collect();
    format!("concat({})", pieces.join(", '\"', "))
}

/// A node test as an XPath `NameTest`.
fn name_test(test: &NodeTest) -> String {
    let local = match &test.name {
        Name::Named(name) => name.as_str(),
        Name::Wildcard => "*",
    };
    match test.namespace.as_deref() {
        None | Some("") => local.to_string(),
        Some("*") if local == "*" => local.to_string(),
        Some(prefix) => format!("{prefix}:{local}"),
    }
}

/// The attribute reference `@name` or `@prefix:name`.
fn attribute_reference(predicate: &AttributePredicate) -> String {
    match predicate.namespace.as_deref() {
        None | Some("") => format!("@{}", predicate.name),
        Some(prefix) => format!("@{prefix}:{}", predicate.name),
    }
}

/// [XPath 1.0 § 4.2 String Functions](https://www.w3.org/TR/xpath-10/#section-String-Functions)
fn attribute_expression(predicate: &AttributePredicate) -> String {
    let attribute = attribute_reference(predicate);
    let Some(value) = predicate.value.as_deref() else {
        return attribute;
    };
    let literal = xpath_literal(value);

    match predicate.operator {
        AttributeOperator::Exists => attribute,
        AttributeOperator::Equals => format!("{attribute}={literal}"),
        // "If 'val' contains whitespace, it will never represent anything (since
        // the words are separated by spaces). Also if 'val' is the empty string,
        // it will never represent anything."
        AttributeOperator::ContainsWord
            if value.is_empty() || value.chars().any(is_whitespace) =>
        {
            "false()".to_string()
        }
        // normalize-space() turns tabs and newlines between the words into
        // single spaces.
        AttributeOperator::ContainsWord => format!(
            "contains(concat(\" \",normalize-space({attribute}),\" \"),{})",
            xpath_literal(&format!(" {value} "))
        ),
        // "If 'val' is the empty string, it will never represent anything."
        AttributeOperator::StartsWith | AttributeOperator::EndsWith | AttributeOperator::Contains
            if value.is_empty() =>
        {
            "false()".to_string()
        }
        AttributeOperator::StartsWith => format!("starts-with({attribute},{literal})"),
        // XPath 1.0 has no ends-with().
        AttributeOperator::EndsWith => format!(
            "substring({attribute},string-length({attribute})-string-length({literal})+1)={literal}"
        ),
        AttributeOperator::Contains => format!("contains({attribute},{literal})"),
        AttributeOperator::HyphenPrefix => format!(
            "{attribute}={literal} or starts-with({attribute},{})",
            xpath_literal(&format!("{value}-"))
        ),
    }
}

/// [CSS Syntax Level 3 § 4.2 whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// `count(<axis>::<test>) + 1`: the 1-based index of the context node among
/// the siblings matched by `test`, counted from the start (`preceding-sibling`)
/// or from the end (`following-sibling`).
fn sibling_index(axis: &str, test: &str) -> String {
    format!("count({axis}::{test}) + 1")
}

/// [§ 14.4 Child-indexed Pseudo-classes](https://www.w3.org/TR/selectors-4/#child-index)
///
/// An element matches `An+B` when its index is `A*n + B` for some `n >= 0`.
fn nth_expression(index: &str, nth: Nth) -> String {
    let Nth { step, offset } = nth;
    match step {
        0 => format!("{index} = {offset}"),
        step if step > 0 => {
            format!("({index}) >= {offset} and (({index}) - {offset}) mod {step} = 0")
        }
        step => format!(
            "({index}) <= {offset} and ({offset} - ({index})) mod {} = 0",
            step.unsigned_abs()
        ),
    }
}

/// [§ 14 Tree-Structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos)
///
/// `test` is the name test of the step, used by the `*-of-type` family.
fn pseudo_expression(pseudo: PseudoClass, test: &NodeTest) -> String {
    let of_type = name_test(test);
    let first = |sibling: &str| format!("count(preceding-sibling::{sibling}) = 0");
    let last = |sibling: &str| format!("count(following-sibling::{sibling}) = 0");

    match pseudo {
        PseudoClass::Root => "not(parent::*)".to_string(),
        PseudoClass::Empty => "not(node())".to_string(),
        PseudoClass::FirstChild => first("*"),
        PseudoClass::LastChild => last("*"),
        PseudoClass::OnlyChild => format!("{} and {}", first("*"), last("*")),
        PseudoClass::FirstOfType => first(&of_type),
        PseudoClass::LastOfType => last(&of_type),
        PseudoClass::OnlyOfType => format!("{} and {}", first(&of_type), last(&of_type)),
        PseudoClass::NthChild(nth) => nth_expression(&sibling_index("preceding-sibling", "*"), nth),
        PseudoClass::NthLastChild(nth) => {
            nth_expression(&sibling_index("following-sibling", "*"), nth)
        }
        PseudoClass::NthOfType(nth) => {
            nth_expression(&sibling_index("preceding-sibling", &of_type), nth)
        }
        PseudoClass::NthLastOfType(nth) => {
            nth_expression(&sibling_index("following-sibling", &of_type), nth)
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The child axis is the default and is written without a prefix.
        if self.axis != Axis::Child {
            write!(f, "{}::", self.axis)?;
        }
        f.write_str(&name_test(&self.test))?;
        for predicate in &self.predicates {
            let expression = match predicate {
                StepPredicate::Attribute(attribute) => attribute_expression(attribute),
                StepPredicate::Pseudo(pseudo) => pseudo_expression(*pseudo, &self.test),
            };
            write!(f, "[{expression}]")?;
        }
        Ok(())
    }
}

impl fmt::Display for NativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{context}")?;
            if !self.steps.is_empty() {
                f.write_str("/")?;
            }
        }
        for (index, step) in self.steps.iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.kind, self.left, self.right)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(path) => write!(f, "{path}"),
            Self::Relation(relation) => write!(f, "{relation}"),
        }
    }
}
