//! The compiled query model.
//!
//! A [`Query`] is either a [`NativePath`], an ordered list of location steps
//! any XPath 1.0 evaluator can run, or a [`Relation`] that a dedicated
//! evaluator computes by walking siblings directly. Relations nest: either
//! operand may itself be a relation, and a native path may continue from the
//! result set of a relation through its `context`.

use serde::Serialize;
use strum_macros::Display;

use crate::selector::{AttributePredicate, NodeTest, PseudoClass};

/// [XPath 1.0 § 2.2 Axes](https://www.w3.org/TR/xpath-10/#axes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Axis {
    /// "the descendant-or-self axis contains the context node and the
    /// descendants of the context node"
    #[strum(serialize = "descendant-or-self")]
    DescendantOrSelf,
    /// "the child axis contains the children of the context node"
    #[strum(serialize = "child")]
    Child,
    /// "the following-sibling axis contains all the following siblings of the
    /// context node"
    #[strum(serialize = "following-sibling")]
    FollowingSibling,
    /// "the self axis contains just the context node itself"
    #[strum(serialize = "self")]
    SelfNode,
}

/// A condition attached to a [`Step`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPredicate {
    /// An attribute condition.
    Attribute(AttributePredicate),
    /// A structural pseudo-class.
    Pseudo(PseudoClass),
}

/// [XPath 1.0 § 2.1 Location Steps](https://www.w3.org/TR/xpath-10/#section-Location-Steps)
///
/// "A location step has three parts: an axis, ... a node test, ... and zero
/// or more predicates."
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Step {
    /// The tree relationship between the context node and the selected nodes.
    pub axis: Axis,
    /// The element name test.
    pub test: NodeTest,
    /// Conditions every selected node must satisfy, attributes first.
    pub predicates: Vec<StepPredicate>,
}

impl Step {
    /// A step without predicates.
    #[must_use]
    pub const fn new(axis: Axis, test: NodeTest) -> Self {
        Self {
            axis,
            test,
            predicates: Vec::new(),
        }
    }

    /// Add a predicate.
    #[must_use]
    pub fn with_predicate(mut self, predicate: StepPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }
}

/// A native location path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NativePath {
    /// Relation whose result set the first step starts from. `None` means
    /// the path starts at the evaluation context.
    pub context: Option<Box<Relation>>,
    /// Location steps, in evaluation order.
    pub steps: Vec<Step>,
}

impl NativePath {
    /// A path starting at the evaluation context.
    #[must_use]
    pub const fn new(steps: Vec<Step>) -> Self {
        Self {
            context: None,
            steps,
        }
    }

    /// A path continuing from the result set of `relation`.
    #[must_use]
    pub fn after(relation: Relation, steps: Vec<Step>) -> Self {
        Self {
            context: Some(Box::new(relation)),
            steps,
        }
    }
}

/// The sibling relationships no native axis expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    /// `~` involving a pseudo-class: for each context node, scan the
    /// following siblings and keep every one the right operand matches.
    #[strum(serialize = "following")]
    GeneralSiblingFallback,
    /// `+`: for each context node, test only the next element sibling
    /// against the right operand. The scan never continues past it.
    #[strum(serialize = "following-direct")]
    AdjacentSiblingFallback,
}

/// A relationship evaluated by tree traversal rather than by a native path.
///
/// `left` establishes the context nodes; `right` is tested against the
/// siblings of each context node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relation {
    /// Which sibling relationship.
    pub kind: RelationKind,
    /// The context operand.
    pub left: Box<Query>,
    /// The subject operand.
    pub right: Box<Query>,
}

impl Relation {
    /// Create a relation.
    #[must_use]
    pub fn new(kind: RelationKind, left: Query, right: Query) -> Self {
        Self {
            kind,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// The result of compiling a selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// Runs on a native path evaluator as-is.
    Native(NativePath),
    /// Needs the sibling-relation evaluator.
    Relation(Relation),
}

impl Query {
    /// Whether the whole query is a native path with no relation inside.
    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(path) if path.context.is_none())
    }

    /// The native path, if this query is one.
    #[must_use]
    pub const fn as_native(&self) -> Option<&NativePath> {
        match self {
            Self::Native(path) => Some(path),
            Self::Relation(_) => None,
        }
    }

    /// The relation, if this query is one.
    #[must_use]
    pub const fn as_relation(&self) -> Option<&Relation> {
        match self {
            Self::Relation(relation) => Some(relation),
            Self::Native(_) => None,
        }
    }

    /// Append `step`, evaluated relative to every node this query selects.
    #[must_use]
    pub fn then(self, step: Step) -> Self {
        match self {
            Self::Native(mut path) => {
                path.steps.push(step);
                Self::Native(path)
            }
            Self::Relation(relation) => Self::Native(NativePath::after(relation, vec![step])),
        }
    }
}
