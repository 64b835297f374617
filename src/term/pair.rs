use std::{collections::HashMap, fmt};

use super::{
    Term,
    graph::{GraphBuilder, NodeId, TermGraph},
    parser::{self, ParseError},
};

/// Two terms to be unified, held in one graph
///
/// Both sides are built in the same hash-consing session so a variable name
/// occurring on both sides denotes a single node, as does any subterm which
/// occurs more than once.
#[derive(Debug, Clone)]
pub struct TermPair {
    graph: TermGraph,
    term1: NodeId,
    term2: NodeId,
}

impl TermPair {
    /// Build a pair from two trees
    #[must_use]
    pub fn new(term1: &Term, term2: &Term) -> Self {
        let mut builder = GraphBuilder::new();
        let mut memo = HashMap::new();
        let term1 = builder.intern_with(term1, &mut memo);
        let term2 = builder.intern_with(term2, &mut memo);
        Self {
            graph: builder.finish(),
            term1,
            term2,
        }
    }

    /// Parse both sides of a pair
    ///
    /// ```
    /// # use mgu::term::TermPair;
    /// let pair = TermPair::from_strings("f1(x1)", "x1")?;
    /// let graph = pair.graph();
    /// assert_eq!(graph.children(pair.term1_id())[0], pair.term2_id());
    /// # Ok::<_, mgu::term::ParseError>(())
    /// ```
    pub fn from_strings(term1: &str, term2: &str) -> Result<Self, ParseError> {
        let mut builder = GraphBuilder::new();
        let term1 = parser::parse(&mut builder, term1)?;
        let term2 = parser::parse(&mut builder, term2)?;
        Ok(Self {
            graph: builder.finish(),
            term1,
            term2,
        })
    }

    /// Copy the pair into a fresh graph. Nodes shared before the copy are
    /// shared after it, including across the two sides
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn graph(&self) -> &TermGraph {
        &self.graph
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn term1_id(&self) -> NodeId {
        self.term1
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn term2_id(&self) -> NodeId {
        self.term2
    }

    /// Left side as a tree
    #[must_use]
    pub fn term1(&self) -> Term {
        self.graph.to_term(self.term1)
    }

    /// Right side as a tree
    #[must_use]
    pub fn term2(&self) -> Term {
        self.graph.to_term(self.term2)
    }

    /// Both sides as trees, sharing any subtrees the graph shares
    #[must_use]
    pub fn terms(&self) -> (Term, Term) {
        let mut memo = HashMap::new();
        let term1 = self.graph.to_term_with(self.term1, &mut memo);
        let term2 = self.graph.to_term_with(self.term2, &mut memo);
        (term1, term2)
    }

    pub(crate) fn into_parts(self) -> (TermGraph, NodeId, NodeId) {
        (self.graph, self.term1, self.term2)
    }
}

impl fmt::Display for TermPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (term1, term2) = self.terms();
        write!(f, "{term1} = {term2}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::TermPair;
    use crate::term::{Kind, ParseError, Term};

    #[test]
    fn variables_are_shared_across_sides() -> Result<(), ParseError> {
        let pair = TermPair::from_strings("f(x)", "x")?;
        let graph = pair.graph();
        assert_eq!(&[pair.term2_id()], graph.children(pair.term1_id()));
        assert_eq!(&[pair.term1_id()], graph.parents(pair.term2_id()));
        assert_eq!(2, graph.len());
        Ok(())
    }

    #[test]
    fn subterms_are_shared_across_sides() -> Result<(), ParseError> {
        let pair = TermPair::from_strings("f1(f2(c1),x1)", "f3(f2(c1))")?;
        let graph = pair.graph();
        let left = graph.children(pair.term1_id())[0];
        let right = graph.children(pair.term2_id())[0];
        assert_eq!(left, right);
        assert_eq!(Kind::Compound, graph.kind(left));
        assert_eq!(2, graph.parents(left).len());

        let (term1, term2) = pair.terms();
        assert!(term1.children()[0].is_same(&term2.children()[0]));
        Ok(())
    }

    #[test]
    fn deep_copy_is_independent() -> Result<(), ParseError> {
        let pair = TermPair::from_strings("f1(x1,x2)", "f1(c1,x1)")?;
        let (mut graph, term1, term2) = pair.deep_copy().into_parts();
        let x1 = graph.children(term2)[1];
        let c1 = graph.children(term2)[0];
        graph.replace_child(term1, x1, c1);
        graph.replace_child(term2, x1, c1);

        assert_eq!("f1(c1,x2)", graph.to_term(term1).to_string());
        assert_eq!("f1(x1,x2)", pair.term1().to_string());
        assert_eq!("f1(c1,x1)", pair.term2().to_string());
        Ok(())
    }

    #[test]
    fn deeply_shared_trees() {
        let mut term = Term::variable("x1");
        for _ in 0..48 {
            let Some(doubled) =
                Term::compound("f1", vec![term.clone(), term.clone()])
            else {
                panic!("compounds need arguments");
            };
            term = doubled;
        }
        let pair = TermPair::new(&term, &term.children()[0]);
        let graph = pair.graph();
        assert_eq!(49, graph.len());
        assert_eq!(&[pair.term2_id(); 2], graph.children(pair.term1_id()));
        let (term1, term2) = pair.terms();
        assert!(term1.children()[0].is_same(&term2));
    }

    #[test]
    fn from_trees() -> Result<(), ParseError> {
        let term1 = "f1(x1,f2(x2))".parse::<Term>()?;
        let term2 = "f2(x2)".parse::<Term>()?;
        let pair = TermPair::new(&term1, &term2);
        assert_eq!(
            pair.graph().children(pair.term1_id())[1],
            pair.term2_id()
        );
        assert_eq!(term1, pair.term1());
        assert_eq!(term2, pair.term2());
        assert_eq!("f1(x1,f2(x2)) = f2(x2)", pair.to_string());
        Ok(())
    }
}
