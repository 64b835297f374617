use std::collections::HashMap;

use proptest::prelude::*;

use super::strategies;
use crate::{
    term::{Name, Term, TermPair},
    unification::Strategy as _,
};

fn arb_term() -> impl Strategy<Value = Term> {
    let leaf = prop_oneof![
        (1..=3u8).prop_map(|index| Term::variable(format!("x{index}"))),
        (1..=2u8).prop_map(|index| Term::constant(format!("c{index}"))),
    ];
    leaf.prop_recursive(4, 24, 3, |inner| {
        (1..=2u8, prop::collection::vec(inner, 1..=3)).prop_map(
            |(index, children)| {
                Term::compound(format!("f{index}"), children)
                    .unwrap_or_else(|| Term::constant("c1"))
            },
        )
    })
}

// Structural equality where variables may be consistently renamed
fn equal_up_to_renaming(left: &Term, right: &Term) -> bool {
    let mut forward = HashMap::<&Name, &Name>::new();
    let mut backward = HashMap::<&Name, &Name>::new();
    let mut left_nodes = left.pre_order();
    let mut right_nodes = right.pre_order();
    loop {
        match (left_nodes.next(), right_nodes.next()) {
            (None, None) => return true,
            (Some(Term::Variable(left)), Some(Term::Variable(right))) => {
                let to = *forward.entry(left).or_insert(right);
                let from = *backward.entry(right).or_insert(left);
                if to != right || from != left {
                    return false;
                }
            }
            (Some(left), Some(right))
                if !left.is_variable()
                    && left.kind() == right.kind()
                    && left.name() == right.name()
                    && left.children().len() == right.children().len() => {}
            _ => return false,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn unifiers_are_sound(term1 in arb_term(), term2 in arb_term()) {
        let pair = TermPair::new(&term1, &term2);
        for strategy in strategies() {
            let result = strategy.find_unifier(&pair);
            if result.is_unifiable() {
                let unifier = result.unifier();
                prop_assert_eq!(
                    unifier.instantiate_variables(&term1),
                    unifier.instantiate_variables(&term2),
                    "{}",
                    strategy.name()
                );
            }
        }
    }

    #[test]
    fn strategies_agree(term1 in arb_term(), term2 in arb_term()) {
        let pair = TermPair::new(&term1, &term2);
        let results = strategies()
            .into_iter()
            .map(|strategy| (strategy.name(), strategy.find_unifier(&pair)))
            .collect::<Vec<_>>();
        let (_, expected) = &results[0];
        let expected = expected.unified_term(&pair);
        for (name, result) in &results {
            let unified = result.unified_term(&pair);
            let agree = match (&expected, &unified) {
                (Some(expected), Some(unified)) => {
                    equal_up_to_renaming(expected, unified)
                }
                (None, None) => true,
                _ => false,
            };
            prop_assert!(agree, "{} found {:?} on {}", name, unified, pair);
        }
    }

    #[test]
    fn unifiers_are_idempotent(term1 in arb_term(), term2 in arb_term()) {
        let pair = TermPair::new(&term1, &term2);
        for strategy in strategies() {
            let unifier = strategy.find_unifier(&pair).into_unifier();
            for term in [&term1, &term2] {
                let once = unifier.instantiate_variables(term);
                let twice = unifier.instantiate_variables(&once);
                prop_assert_eq!(&once, &twice, "{}", strategy.name());
            }
        }
    }

    #[test]
    fn unifiers_only_bind_pair_variables(
        term1 in arb_term(),
        term2 in arb_term()
    ) {
        let pair = TermPair::new(&term1, &term2);
        let mut variables = term1.domain();
        variables.extend(term2.domain());
        for strategy in strategies() {
            let result = strategy.find_unifier(&pair);
            for (variable, term) in result.unifier().bindings() {
                prop_assert!(variables.contains(variable));
                prop_assert!(term.domain().is_subset(&variables));
            }
        }
    }

    #[test]
    fn in_place_matches_copying(term1 in arb_term(), term2 in arb_term()) {
        let pair = TermPair::new(&term1, &term2);
        let unifier = super::Robinson.find_unifier(&pair).into_unifier();
        let copied = unifier.instantiate_variables(&term1);
        let kept = term1.clone();
        prop_assert_eq!(
            copied,
            unifier.instantiate_variables_in_place(term1)
        );
        prop_assert_eq!(kept, pair.term1());
    }

    #[test]
    fn pair_is_left_alone(term1 in arb_term(), term2 in arb_term()) {
        let pair = TermPair::new(&term1, &term2);
        let before = pair.to_string();
        for strategy in strategies() {
            let _ = strategy.find_unifier(&pair);
            prop_assert_eq!(&term1, &pair.term1());
            prop_assert_eq!(&term2, &pair.term2());
        }
        prop_assert_eq!(before, pair.to_string());
    }
}
