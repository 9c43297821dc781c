//! Selector-to-query translation.
//!
//! The translator walks a [`Selector`] bottom-up. Each combinator either
//! extends the native path built for its left operand with one more step, or,
//! when no native axis expresses the relationship, wraps both operands in a
//! [`Relation`]:
//!
//! | Combinator | Result                                                        |
//! |------------|---------------------------------------------------------------|
//! | `a b`      | `descendant-or-self::b` step                                  |
//! | `a > b`    | `child::b` step                                               |
//! | `a ~ b`    | `following-sibling::b` step, or `following(a, b)` when either side has a pseudo-class |
//! | `a + b`    | always `following-direct(a, b)`                               |
//!
//! Translation is total: every selector yields a [`Query`].

/// Compiled query types.
pub mod query;
/// Text rendering of compiled queries.
pub mod xpath;

use log::debug;
use wren_common::warning::Warnings;

use crate::selector::{CombinatorKind, Name, Selector};

pub use query::{Axis, NativePath, Query, Relation, RelationKind, Step, StepPredicate};
pub use xpath::xpath_literal;

/// Translate a selector into a query.
#[must_use]
pub fn translate(selector: &Selector) -> Query {
    let mut warnings = Warnings::new();
    let query = translate_node(&source_order(selector), &mut warnings);
    debug!("selector `{selector}` compiled to `{query}`");
    query
}

fn translate_node(selector: &Selector, warnings: &mut Warnings) -> Query {
    match selector {
        Selector::Combinator { kind, left, right } => {
            translate_combinator(*kind, left, right, warnings)
        }
        compound => Query::Native(NativePath::new(vec![compound_step(
            compound,
            Axis::DescendantOrSelf,
            warnings,
        )])),
    }
}

/// `right` is a compound selector.
fn translate_combinator(
    kind: CombinatorKind,
    left: &Selector,
    right: &Selector,
    warnings: &mut Warnings,
) -> Query {
    let context = translate_node(left, warnings);
    match kind {
        CombinatorKind::Descendant => {
            context.then(compound_step(right, Axis::DescendantOrSelf, warnings))
        }
        CombinatorKind::Child => context.then(compound_step(right, Axis::Child, warnings)),
        CombinatorKind::GeneralSibling if !left.contains_pseudo() && !right.contains_pseudo() => {
            context.then(compound_step(right, Axis::FollowingSibling, warnings))
        }
        CombinatorKind::GeneralSibling => {
            debug!("`{left} ~ {right}` has a pseudo-class, falling back to a following relation");
            relation(RelationKind::GeneralSiblingFallback, context, right, warnings)
        }
        CombinatorKind::AdjacentSibling => {
            relation(RelationKind::AdjacentSiblingFallback, context, right, warnings)
        }
    }
}

/// The right operand of a relation is tested against each candidate
/// sibling, so it is a single step on the self axis.
fn relation(
    kind: RelationKind,
    context: Query,
    right: &Selector,
    warnings: &mut Warnings,
) -> Query {
    let subject = Query::Native(NativePath::new(vec![compound_step(
        right,
        Axis::SelfNode,
        warnings,
    )]));
    Query::Relation(Relation::new(kind, context, subject))
}

/// One location step for a compound selector: its name test, then its
/// attribute predicates, then its pseudo-classes in source order.
fn compound_step(selector: &Selector, axis: Axis, warnings: &mut Warnings) -> Step {
    let mut pseudo_classes = Vec::new();
    let mut current = selector;
    loop {
        match current {
            Selector::Pseudo { target, name, .. } => {
                pseudo_classes.push(*name);
                current = target;
            }
            // Not reached for selectors in source order; the subject of a
            // combinator is its right operand.
            Selector::Combinator { right, .. } => current = right,
            Selector::Test { test, predicates } => {
                if test.namespace.as_deref() == Some("*")
                    && let Name::Named(name) = &test.name
                {
                    let _ = warnings.warn_once(
                        "CSS",
                        &format!("`*|{name}` renders as `*:{name}`, which needs an XPath 2.0 evaluator"),
                    );
                }

                let attributes = predicates.iter().cloned().map(StepPredicate::Attribute);
                let pseudos = pseudo_classes.into_iter().rev().map(StepPredicate::Pseudo);
                return Step {
                    axis,
                    test: test.clone(),
                    predicates: attributes.chain(pseudos).collect(),
                };
            }
        }
    }
}

/// Rewrite `selector` so that every combinator's right operand and every
/// pseudo-class target is a compound selector, keeping the order in which
/// the compounds would be written.
///
/// Parsed selectors already have this shape. Hand-built trees may not:
/// `a > (b c)` is read as `(a > b) c`, and a pseudo-class applied to
/// `a b` applies to its subject `b`.
fn source_order(selector: &Selector) -> Selector {
    match selector {
        Selector::Test { .. } => selector.clone(),
        Selector::Pseudo {
            target,
            name,
            argument,
        } => match source_order(target) {
            Selector::Combinator { kind, left, right } => Selector::Combinator {
                kind,
                left,
                right: Box::new(Selector::Pseudo {
                    target: right,
                    name: *name,
                    argument: argument.clone(),
                }),
            },
            target => Selector::Pseudo {
                target: Box::new(target),
                name: *name,
                argument: argument.clone(),
            },
        },
        Selector::Combinator { kind, left, right } => {
            let left = source_order(left);
            match source_order(right) {
                Selector::Combinator {
                    kind: inner,
                    left: middle,
                    right: last,
                } => source_order(&Selector::Combinator {
                    kind: inner,
                    left: Box::new(Selector::combine(*kind, left, *middle)),
                    right: last,
                }),
                right => Selector::combine(*kind, left, right),
            }
        }
    }
}
