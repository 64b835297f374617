use super::{Mismatch, Strategy, UnificationResult, conclude};
use crate::{
    substitution::Substitution,
    term::{Term, TermPair},
};

/// Textbook recursive descent over trees
///
/// Worst case exponential, terms are copied every time a binding is
/// applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct Robinson;

impl Strategy for Robinson {
    fn name(&self) -> &'static str {
        "Robinson"
    }

    fn find_unifier(&self, pair: &TermPair) -> UnificationResult {
        let (term1, term2) = pair.terms();
        conclude(self.name(), unify(term1, term2))
    }
}

// Bound variables are replaced by their binding as they come off the stack so
// only unbound variables ever reach the occurs check
fn resolve(unifier: &Substitution, term: Term) -> Term {
    let bound = match &term {
        Term::Variable(name) => unifier.get(name).cloned(),
        _ => None,
    };
    bound.unwrap_or(term)
}

fn unify(term1: Term, term2: Term) -> Result<Substitution, Mismatch> {
    let mut unifier = Substitution::identity();
    let mut stack = vec![(term1, term2)];
    while let Some((left, right)) = stack.pop() {
        let left = resolve(&unifier, left);
        let right = resolve(&unifier, right);
        match (left, right) {
            (Term::Variable(left), Term::Variable(right)) if left == right => {}
            (Term::Compound(left), Term::Compound(right)) => {
                if left.name() != right.name() || left.arity() != right.arity()
                {
                    return Err(Mismatch::SymbolClash {
                        left: Term::Compound(left),
                        right: Term::Compound(right),
                    });
                }
                let pairs = left
                    .children()
                    .iter()
                    .cloned()
                    .zip(right.children().iter().cloned());
                // Reversed so the leftmost arguments are unified first
                stack.extend(pairs.rev());
            }
            (Term::Constant(left), Term::Constant(right)) if left == right => {}
            (Term::Variable(variable), term)
            | (term, Term::Variable(variable)) => {
                let term = unifier.instantiate_variables(&term);
                if term.contains(&Term::Variable(variable.clone())) {
                    return Err(Mismatch::OccursCheck { variable, term });
                }
                tracing::trace!(%variable, %term, "Binding");
                unifier = unifier.bind(variable, term);
            }
            (left, right) => return Err(Mismatch::SymbolClash { left, right }),
        }
    }
    Ok(unifier)
}
