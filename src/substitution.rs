//! Substitutions from variables to terms

use std::{borrow::Borrow, collections::BTreeMap, fmt, mem, sync::Arc};

use crate::term::{Name, Term};

mod triangular;

/// Finite mapping from variable names to terms
///
/// Bindings of a variable to itself are never stored. Equality compares the
/// bindings, not the representation.
#[derive(Debug, Clone, Default)]
pub struct Substitution(Repr);

#[derive(Debug, Clone, Default)]
enum Repr {
    #[default]
    Identity,
    Single(Name, Term),
    Map(BTreeMap<Name, Term>),
}

impl Substitution {
    /// The substitution with an empty domain
    #[must_use]
    pub fn identity() -> Self {
        Self(Repr::Identity)
    }

    /// Substitution with a single binding
    #[must_use]
    pub fn of(variable: impl Into<Name>, term: Term) -> Self {
        let variable = variable.into();
        if term.is_variable_named(&variable) {
            return Self::identity();
        }
        Self(Repr::Single(variable, term))
    }

    /// Substitution from a collection of bindings. If a variable is bound more
    /// than once the last binding wins
    #[must_use]
    pub fn from_map(bindings: impl IntoIterator<Item = (Name, Term)>) -> Self {
        let mut bindings = bindings
            .into_iter()
            .filter(|(variable, term)| !term.is_variable_named(variable))
            .collect::<BTreeMap<_, _>>();
        match bindings.len() {
            0 => Self::identity(),
            1 => match bindings.pop_first() {
                Some((variable, term)) => Self(Repr::Single(variable, term)),
                None => Self::identity(),
            },
            _ => Self(Repr::Map(bindings)),
        }
    }

    /// Look up the binding of a variable
    #[must_use]
    pub fn get<Q>(&self, variable: &Q) -> Option<&Term>
    where
        Name: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match &self.0 {
            Repr::Identity => None,
            Repr::Single(bound, term) => {
                (Borrow::<Q>::borrow(bound) == variable).then_some(term)
            }
            Repr::Map(bindings) => bindings.get(variable),
        }
    }

    /// Every binding, ordered by variable name
    pub fn bindings(&self) -> impl Iterator<Item = (&Name, &Term)> {
        let (single, map) = match &self.0 {
            Repr::Identity => (None, None),
            Repr::Single(variable, term) => (Some((variable, term)), None),
            Repr::Map(bindings) => (None, Some(bindings.iter())),
        };
        single.into_iter().chain(map.into_iter().flatten())
    }

    /// The bound variables
    pub fn domain(&self) -> impl Iterator<Item = &Name> {
        self.bindings().map(|(variable, _)| variable)
    }

    /// Number of bindings
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.0 {
            Repr::Identity => 0,
            Repr::Single(..) => 1,
            Repr::Map(bindings) => bindings.len(),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.is_empty()
    }

    fn into_map(self) -> BTreeMap<Name, Term> {
        match self.0 {
            Repr::Identity => BTreeMap::new(),
            Repr::Single(variable, term) => BTreeMap::from([(variable, term)]),
            Repr::Map(bindings) => bindings,
        }
    }

    /// Replace every bound variable in `term` with its binding
    ///
    /// This is a single pass, the replacements are not themselves
    /// instantiated. The argument is left untouched.
    #[must_use]
    pub fn instantiate_variables(&self, term: &Term) -> Term {
        if self.is_identity() {
            return term.clone();
        }
        match term {
            Term::Constant(_) => term.clone(),
            Term::Variable(name) => {
                self.get(name).unwrap_or(term).clone()
            }
            Term::Compound(compound) => {
                let children = compound
                    .children()
                    .iter()
                    .map(|child| self.instantiate_variables(child))
                    .collect();
                Term::from_parts(compound.name().clone(), children)
            }
        }
    }

    /// As [`Substitution::instantiate_variables`] but reuses the nodes of
    /// `term`
    ///
    /// Compound nodes which are not shared with anything else are rewritten
    /// in place. Shared compound nodes are copied first so other holders never
    /// observe the change.
    #[must_use]
    pub fn instantiate_variables_in_place(&self, term: Term) -> Term {
        if self.is_identity() {
            return term;
        }
        match term {
            Term::Constant(_) => term,
            Term::Variable(name) => match self.get(&name) {
                Some(bound) => bound.clone(),
                None => Term::Variable(name),
            },
            Term::Compound(mut compound) => {
                let children = Arc::make_mut(&mut compound).children_mut();
                *children = mem::take(children)
                    .into_iter()
                    .map(|child| self.instantiate_variables_in_place(child))
                    .collect();
                Term::Compound(compound)
            }
        }
    }

    /// Composition, the substitution which acts like applying `self` and then
    /// `other`
    ///
    /// Every binding `v -> t` of `self` becomes `v -> other(t)` and is dropped
    /// if that is `v` itself. Bindings of `other` for variables outside the
    /// domain of `self` are then added.
    #[must_use]
    pub fn composition(&self, other: &Substitution) -> Substitution {
        let composed = self.bindings().map(|(variable, term)| {
            (variable.clone(), other.instantiate_variables(term))
        });
        let added = other
            .bindings()
            .filter(|(variable, _)| self.get(*variable).is_none())
            .map(|(variable, term)| (variable.clone(), term.clone()));
        Self::from_map(composed.chain(added))
    }

    /// Composition with the single binding `variable -> term`, consuming
    /// `self` so its terms can be rewritten in place
    #[must_use]
    pub fn bind(self, variable: Name, term: Term) -> Self {
        let binding = Self::of(variable.clone(), term.clone());
        let already_bound = self.get(&variable).is_some();
        let composed = self.into_map().into_iter().map(|(bound, image)| {
            (bound, binding.instantiate_variables_in_place(image))
        });
        let added = (!already_bound).then_some((variable, term));
        Self::from_map(composed.chain(added))
    }
}

impl PartialEq for Substitution {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .bindings()
                .all(|(variable, term)| other.get(variable) == Some(term))
    }
}

impl Eq for Substitution {}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (variable, term)) in self.bindings().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{variable} -> {term}")?;
        }
        f.write_str("}")
    }
}

impl FromIterator<(Name, Term)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (Name, Term)>>(iter: I) -> Self {
        Self::from_map(iter)
    }
}
