//! Term traversals

use std::collections::VecDeque;

use genawaiter::rc::{Co, Gen};

use super::{
    Kind, Term,
    graph::{NodeId, TermGraph},
    pair::TermPair,
};

impl Term {
    /// Visit every node of the tree, parents before children and children
    /// left to right
    pub fn pre_order(&self) -> impl Iterator<Item = &Term> {
        Gen::new(|co| async move { pre_order(self, &co).await }).into_iter()
    }
}

async fn pre_order<'a>(term: &'a Term, co: &Co<&'a Term>) {
    co.yield_(term).await;
    for child in term.children() {
        Box::pin(pre_order(child, co)).await;
    }
}

/// Breadth first traversal of both sides of a [`TermPair`] which yields
/// every constant and compound node before any variable
///
/// Shared nodes are yielded once per path that reaches them.
#[derive(Debug)]
pub struct SymbolsFirst<'a> {
    graph: &'a TermGraph,
    nodes: VecDeque<NodeId>,
    variables: VecDeque<NodeId>,
}

impl<'a> SymbolsFirst<'a> {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new(pair: &'a TermPair) -> Self {
        Self {
            graph: pair.graph(),
            nodes: VecDeque::from([pair.term1_id(), pair.term2_id()]),
            variables: VecDeque::new(),
        }
    }
}

impl Iterator for SymbolsFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(id) = self.nodes.pop_front() {
            // Variables are leaves, deferring them does not lose any children
            if self.graph.kind(id) == Kind::Variable {
                self.variables.push_back(id);
                continue;
            }
            self.nodes.extend(self.graph.children(id));
            return Some(id);
        }
        self.variables.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::SymbolsFirst;
    use crate::term::{ParseError, Term, TermPair};

    #[test]
    fn pre_order() -> Result<(), ParseError> {
        let term = "f1(f2(x1,c1),x2,f3(c2))".parse::<Term>()?;
        let names = term
            .pre_order()
            .map(|term| term.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, ["f1", "f2", "x1", "c1", "x2", "f3", "c2"]);
        Ok(())
    }

    #[test]
    fn pre_order_leaf() -> Result<(), ParseError> {
        let term = "x1".parse::<Term>()?;
        assert_eq!(vec![&term], term.pre_order().collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn symbols_first() -> Result<(), ParseError> {
        let pair = TermPair::from_strings("f1(x1,f2(x2,c1))", "f1(x3,c2)")?;
        let graph = pair.graph();
        let names = SymbolsFirst::new(&pair)
            .map(|id| graph.name(id).to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, ["f1", "f1", "f2", "c2", "c1", "x1", "x3", "x2"]);
        Ok(())
    }
}
