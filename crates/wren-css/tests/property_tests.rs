//! Property tests for selector compilation.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use strum::IntoEnumIterator;
use wren_css::{CombinatorKind, RelationKind, Selector, compile, parse_selector, translate};

/// A lowercase ASCII identifier of one to eight letters.
#[derive(Debug, Clone)]
struct Identifier(String);

impl Arbitrary for Identifier {
    fn arbitrary(g: &mut Gen) -> Self {
        const LETTERS: &[char] = &[
            'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q',
            'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
        ];
        let length = usize::arbitrary(g) % 8 + 1;
        Self(
            (0..length)
                .map(|_| *g.choose(LETTERS).unwrap_or(&'a'))
                .collect(),
        )
    }
}

/// One of the four combinators, as written in a selector.
#[derive(Debug, Clone, Copy)]
struct Combinator(CombinatorKind);

impl Arbitrary for Combinator {
    fn arbitrary(g: &mut Gen) -> Self {
        let kinds: Vec<CombinatorKind> = CombinatorKind::iter().collect();
        Self(*g.choose(&kinds).unwrap_or(&CombinatorKind::Descendant))
    }
}

#[quickcheck]
fn child_is_always_native(Identifier(a): Identifier, Identifier(b): Identifier) -> bool {
    let query = compile(&format!("{a} > {b}")).unwrap();
    query.is_native() && query.to_string() == format!("descendant-or-self::{a}/{b}")
}

#[quickcheck]
fn general_sibling_without_pseudo_is_native(
    Identifier(a): Identifier,
    Identifier(b): Identifier,
) -> bool {
    let query = compile(&format!("{a} ~ {b}")).unwrap();
    query.is_native()
        && query.to_string() == format!("descendant-or-self::{a}/following-sibling::{b}")
}

#[quickcheck]
fn adjacent_sibling_is_always_a_relation(
    Identifier(a): Identifier,
    Identifier(b): Identifier,
    left_pseudo: bool,
) -> bool {
    let left = if left_pseudo { format!("{a}:first-child") } else { a };
    compile(&format!("{left} + {b}"))
        .unwrap()
        .as_relation()
        .is_some_and(|relation| relation.kind == RelationKind::AdjacentSiblingFallback)
}

#[quickcheck]
fn pseudo_on_either_side_of_general_sibling_is_a_relation(
    Identifier(a): Identifier,
    Identifier(b): Identifier,
    on_left: bool,
) -> bool {
    let selector = if on_left {
        format!("{a}:last-child ~ {b}")
    } else {
        format!("{a} ~ {b}:last-child")
    };
    compile(&selector)
        .unwrap()
        .as_relation()
        .is_some_and(|relation| relation.kind == RelationKind::GeneralSiblingFallback)
}

#[quickcheck]
fn combinators_associate_left(
    names: Vec<(Combinator, Identifier)>,
    Identifier(first): Identifier,
) -> bool {
    let mut expected = Selector::element(first.as_str());
    let mut source = first;
    for (Combinator(kind), Identifier(name)) in names {
        source.push_str(&format!("{kind}{name}"));
        expected = Selector::combine(kind, expected, Selector::element(name));
    }
    parse_selector(&source).unwrap() == expected
}

#[quickcheck]
fn display_round_trips(
    names: Vec<(Combinator, Identifier)>,
    Identifier(first): Identifier,
) -> bool {
    let compounds = names.len() + 1;
    let mut source = format!("{first}:nth-child(odd)");
    for (Combinator(kind), Identifier(name)) in names {
        source.push_str(&format!("{kind}{name}.c"));
    }
    let selector = parse_selector(&source).unwrap();
    let reparsed = parse_selector(&selector.to_string()).unwrap();
    selector.compound_count() == compounds && translate(&selector) == translate(&reparsed)
}
