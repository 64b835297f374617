use std::{collections::HashMap, sync::Arc};

use super::Substitution;
use crate::term::{Compound, Name, Term};

impl Substitution {
    /// Resolve a triangular substitution into an idempotent one
    ///
    /// In triangular form a binding may mention variables that are
    /// themselves bound, so `{x1 -> f1(x2), x2 -> c1}` stands for
    /// `{x1 -> f1(c1), x2 -> c1}`. The chains must be acyclic. Subterms shared
    /// between bindings are resolved once and stay shared in the result.
    #[must_use]
    pub fn from_triangular_form(
        bindings: impl IntoIterator<Item = (Name, Term)>,
    ) -> Self {
        let chain = bindings.into_iter().collect::<HashMap<_, _>>();
        let mut resolver = Resolver {
            chain: &chain,
            variables: HashMap::new(),
            compounds: HashMap::new(),
        };
        let resolved = chain
            .keys()
            .map(|variable| (variable.clone(), resolver.variable(variable)))
            .collect::<Vec<_>>();
        Self::from_map(resolved)
    }
}

struct Resolver<'a> {
    chain: &'a HashMap<Name, Term>,
    variables: HashMap<Name, Term>,
    // Keyed on allocation so every shared subterm is rebuilt once
    compounds: HashMap<*const Compound, Term>,
}

impl Resolver<'_> {
    fn variable(&mut self, name: &Name) -> Term {
        if let Some(term) = self.variables.get(name) {
            return term.clone();
        }
        let term = match self.chain.get(name) {
            Some(bound) => self.descend(bound),
            None => Term::Variable(name.clone()),
        };
        let _ = self.variables.insert(name.clone(), term.clone());
        term
    }

    fn descend(&mut self, term: &Term) -> Term {
        match term {
            Term::Constant(_) => term.clone(),
            Term::Variable(name) => self.variable(name),
            Term::Compound(compound) => {
                let key = Arc::as_ptr(compound);
                if let Some(term) = self.compounds.get(&key) {
                    return term.clone();
                }
                let children = compound
                    .children()
                    .iter()
                    .map(|child| self.descend(child))
                    .collect::<Vec<_>>();
                let unchanged = children
                    .iter()
                    .zip(compound.children())
                    .all(|(new, old)| new.is_same(old));
                let resolved = if unchanged {
                    term.clone()
                } else {
                    Term::from_parts(compound.name().clone(), children)
                };
                let _ = self.compounds.insert(key, resolved.clone());
                resolved
            }
        }
    }
}
