use super::{Mismatch, Strategy, UnificationResult, conclude};
use crate::{
    substitution::Substitution,
    term::{Term, TermPair},
};

/// Unification by repeatedly resolving the first disagreement pair
///
/// Both terms are rescanned from the root after every binding, which makes
/// this quadratic at best. Not registered with [`Algorithm`](super::Algorithm),
/// it exists to cross check the other strategies.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisagreementSet;

impl Strategy for DisagreementSet {
    fn name(&self) -> &'static str {
        "Disagreement set"
    }

    fn find_unifier(&self, pair: &TermPair) -> UnificationResult {
        let (term1, term2) = pair.terms();
        conclude(self.name(), unify(&term1, &term2))
    }
}

fn agree(left: &Term, right: &Term) -> bool {
    left.kind() == right.kind()
        && left.name() == right.name()
        && left.children().len() == right.children().len()
}

// First pair of subterms, in pre-order, whose top symbols differ
fn disagreement<'a>(
    left: &'a Term,
    right: &'a Term,
) -> Option<(&'a Term, &'a Term)> {
    left.pre_order()
        .zip(right.pre_order())
        .find(|(left, right)| !agree(left, right))
}

fn unify(term1: &Term, term2: &Term) -> Result<Substitution, Mismatch> {
    let mut unifier = Substitution::identity();
    let mut left = term1.clone();
    let mut right = term2.clone();
    while let Some((first, second)) = disagreement(&left, &right) {
        let (variable, term) = match (first, second) {
            (Term::Variable(variable), term)
            | (term, Term::Variable(variable)) => (variable, term),
            _ => {
                return Err(Mismatch::SymbolClash {
                    left: first.clone(),
                    right: second.clone(),
                });
            }
        };
        if term.contains(&Term::Variable(variable.clone())) {
            return Err(Mismatch::OccursCheck {
                variable: variable.clone(),
                term: term.clone(),
            });
        }
        tracing::trace!(%variable, %term, "Binding");
        let binding = Substitution::of(variable.clone(), term.clone());
        unifier = unifier.composition(&binding);
        left = unifier.instantiate_variables(term1);
        right = unifier.instantiate_variables(term2);
    }
    Ok(unifier)
}
