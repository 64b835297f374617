//! First order terms
//!
//! Terms exist in two shapes:
//! * [`Term`] is a persistent tree. Compound nodes are reference counted so
//!   cloning a term is cheap and clones share structure. Substitutions store
//!   and produce terms in this shape.
//! * [`TermGraph`] is an arena holding a hash-consed DAG where every node
//!   records the nodes that point at it. The destructive unification
//!   strategies work on this shape.
//!
//! [`TermPair`] holds two roots in a single graph and is the input to every
//! [`Strategy`](crate::unification::Strategy).

use std::{
    borrow::Borrow,
    collections::BTreeSet,
    fmt,
    str::FromStr,
    sync::Arc,
};

pub use self::{
    graph::{GraphBuilder, Node, NodeId, TermGraph},
    iter::SymbolsFirst,
    pair::TermPair,
    parser::ParseError,
};

mod graph;
mod iter;
mod pair;
mod parser;

/// Symbol text, shared between every node that carries it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(Arc<str>);

impl Name {
    /// Constructor
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self(Arc::from(text))
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Name {
    fn from(text: String) -> Self {
        Self(Arc::from(text))
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three flavours of term node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    #[allow(missing_docs)]
    Constant,
    #[allow(missing_docs)]
    Variable,
    /// Functional symbol applied to at least one argument
    Compound,
}

/// Tree shaped term
///
/// Equality and hashing are structural. Leaves are identified by their kind
/// and name, see [`Term::is_same`] for the identity relation used by the
/// occurs check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    #[allow(missing_docs)]
    Constant(Name),
    #[allow(missing_docs)]
    Variable(Name),
    #[allow(missing_docs)]
    Compound(Arc<Compound>),
}

/// Functional symbol node, always has at least one child
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Compound {
    name: Name,
    children: Vec<Term>,
}

impl Compound {
    #[allow(missing_docs)]
    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn children(&self) -> &[Term] {
        &self.children
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.children.len()
    }

    // Callers must leave at least one child behind
    pub(crate) fn children_mut(&mut self) -> &mut Vec<Term> {
        &mut self.children
    }
}

impl Term {
    #[allow(missing_docs)]
    pub fn constant(name: impl Into<Name>) -> Self {
        Self::Constant(name.into())
    }

    #[allow(missing_docs)]
    pub fn variable(name: impl Into<Name>) -> Self {
        Self::Variable(name.into())
    }

    /// Leaf named by a single constant or variable token such as `c1` or
    /// `x2`. Anything else, including functional symbols which need
    /// arguments, gives `None`
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let index = token.get(1..)?;
        if !index.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        match token.as_bytes().first()? {
            b'c' => Some(Self::constant(token)),
            b'x' => Some(Self::variable(token)),
            _ => None,
        }
    }

    /// Apply a functional symbol to some arguments
    ///
    /// Returns `None` if `children` is empty, a functional symbol without
    /// arguments is not a term
    pub fn compound(name: impl Into<Name>, children: Vec<Term>) -> Option<Self> {
        if children.is_empty() {
            return None;
        }
        Some(Self::from_parts(name.into(), children))
    }

    // Callers guarantee children is non-empty
    pub(crate) fn from_parts(name: Name, children: Vec<Term>) -> Self {
        Self::Compound(Arc::new(Compound { name, children }))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn name(&self) -> &Name {
        match self {
            Term::Constant(name) | Term::Variable(name) => name,
            Term::Compound(compound) => &compound.name,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Term::Constant(_) => Kind::Constant,
            Term::Variable(_) => Kind::Variable,
            Term::Compound(_) => Kind::Compound,
        }
    }

    /// Arguments of a compound, empty for leaves
    #[must_use]
    pub fn children(&self) -> &[Term] {
        match self {
            Term::Constant(_) | Term::Variable(_) => &[],
            Term::Compound(compound) => &compound.children,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub(crate) fn is_variable_named(&self, name: &Name) -> bool {
        matches!(self, Term::Variable(own) if own == name)
    }

    /// Identity test
    ///
    /// Compounds are the same if they are the same allocation. Constants and
    /// variables are the same if they have the same name, within a
    /// [`TermPair`] a name always denotes a single node.
    #[must_use]
    pub fn is_same(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Constant(left), Term::Constant(right))
            | (Term::Variable(left), Term::Variable(right)) => left == right,
            (Term::Compound(left), Term::Compound(right)) => {
                Arc::ptr_eq(left, right)
            }
            _ => false,
        }
    }

    /// Check if `other` occurs anywhere in this term, using
    /// [identity](Term::is_same) rather than structural equality
    #[must_use]
    pub fn contains(&self, other: &Term) -> bool {
        self.is_same(other)
            || self.children().iter().any(|child| child.contains(other))
    }

    /// Names of the variables occurring in this term
    #[must_use]
    pub fn domain(&self) -> BTreeSet<Name> {
        self.pre_order()
            .filter_map(|term| match term {
                Term::Variable(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(name) | Term::Variable(name) => name.fmt(f),
            Term::Compound(compound) => {
                write!(f, "{}(", compound.name)?;
                for (index, child) in compound.children.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    child.fmt(f)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl FromStr for Term {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut builder = GraphBuilder::new();
        let root = parser::parse(&mut builder, s)?;
        Ok(builder.finish().to_term(root))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use super::{Kind, Name, ParseError, Term};

    #[test]
    fn display() -> Result<(), ParseError> {
        for text in ["c1", "x1", "f1(x1,c1)", "f1(x1,f2(c1))", "fNamed(xVar)"] {
            assert_eq!(text, text.parse::<Term>()?.to_string());
        }
        Ok(())
    }

    #[test]
    fn from_token() {
        assert_eq!(Some(Term::constant("c1")), Term::from_token("c1"));
        assert_eq!(Some(Term::variable("xA2")), Term::from_token("xA2"));
        assert_eq!(None, Term::from_token("f1"));
        assert_eq!(None, Term::from_token("x1("));
        assert_eq!(None, Term::from_token(""));
    }

    #[test]
    fn compound_requires_arguments() {
        assert!(Term::compound("f1", vec![]).is_none());
        let term = Term::compound("f1", vec![Term::constant("c1")]);
        assert_eq!(Some(Kind::Compound), term.map(|term| term.kind()));
    }

    #[test]
    fn domain() -> Result<(), ParseError> {
        let term = "f1(x1,f2(c1,x2),x1)".parse::<Term>()?;
        assert_eq!(
            BTreeSet::from([Name::from("x1"), Name::from("x2")]),
            term.domain()
        );
        assert!("f1(c1,c2)".parse::<Term>()?.domain().is_empty());
        Ok(())
    }

    #[test]
    fn contains_uses_identity() -> Result<(), ParseError> {
        let term = "f1(x1,f2(c1))".parse::<Term>()?;
        assert!(term.contains(&Term::variable("x1")));
        assert!(term.contains(&Term::constant("c1")));
        assert!(!term.contains(&Term::variable("c1")));
        assert!(term.contains(&term.children()[1]));
        // Structurally equal but a different allocation
        let lookalike = "f2(c1)".parse::<Term>()?;
        assert_eq!(lookalike, term.children()[1]);
        assert!(!term.contains(&lookalike));
        Ok(())
    }
}
