use std::collections::HashMap;

use super::{Mismatch, Strategy, UnificationResult, conclude};
use crate::{
    substitution::Substitution,
    term::{Kind, NodeId, TermGraph, TermPair},
};

/// Robinson's algorithm on the shared graph
///
/// Binding a variable splices its binding into every parent of the variable
/// node, so no term is ever copied and a binding becomes visible everywhere
/// at once. Works on a private copy of the pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolynomialRobinson;

impl Strategy for PolynomialRobinson {
    fn name(&self) -> &'static str {
        "Polynomial Robinson"
    }

    fn find_unifier(&self, pair: &TermPair) -> UnificationResult {
        let (graph, term1, term2) = pair.deep_copy().into_parts();
        let mut splicer = Splicer {
            graph,
            bindings: HashMap::new(),
        };
        let outcome = splicer
            .unify(term1, term2)
            .map(|()| splicer.into_substitution());
        conclude(self.name(), outcome)
    }
}

struct Splicer {
    graph: TermGraph,
    // Variable node to the node it was replaced by
    bindings: HashMap<NodeId, NodeId>,
}

impl Splicer {
    fn unify(&mut self, left: NodeId, right: NodeId) -> Result<(), Mismatch> {
        if left == right {
            return Ok(());
        }
        match (self.graph.kind(left), self.graph.kind(right)) {
            (Kind::Compound, Kind::Compound)
                if self.graph.name(left) == self.graph.name(right)
                    && self.graph.children(left).len()
                        == self.graph.children(right).len() =>
            {
                for index in 0..self.graph.children(left).len() {
                    // Earlier arguments may have rewritten these slots
                    let left = self.graph.children(left)[index];
                    let right = self.graph.children(right)[index];
                    self.unify(left, right)?;
                }
                Ok(())
            }
            (Kind::Constant, Kind::Constant)
                if self.graph.name(left) == self.graph.name(right) =>
            {
                Ok(())
            }
            (Kind::Variable, _) => self.eliminate(left, right),
            (_, Kind::Variable) => self.eliminate(right, left),
            _ => Err(Mismatch::SymbolClash {
                left: self.graph.to_term(left),
                right: self.graph.to_term(right),
            }),
        }
    }

    fn eliminate(
        &mut self,
        variable: NodeId,
        term: NodeId,
    ) -> Result<(), Mismatch> {
        if self.graph.contains(term, variable) {
            return Err(Mismatch::OccursCheck {
                variable: self.graph.name(variable).clone(),
                term: self.graph.to_term(term),
            });
        }
        tracing::trace!(
            variable = %self.graph.name(variable),
            term = %self.graph.to_term(term),
            "Splicing"
        );
        let _ = self.bindings.insert(variable, term);
        let parents = self.graph.take_parents(variable);
        for &parent in &parents {
            self.graph.replace_child(parent, variable, term);
        }
        self.graph.add_parents(term, &parents);
        Ok(())
    }

    fn into_substitution(self) -> Substitution {
        let mut memo = HashMap::new();
        let bindings = self
            .bindings
            .keys()
            .map(|&variable| {
                // A variable bound to a variable that was bound later still
                // names the old node
                let mut bound = self.bindings[&variable];
                while let Some(&next) = self.bindings.get(&bound) {
                    bound = next;
                }
                (
                    self.graph.name(variable).clone(),
                    self.graph.to_term_with(bound, &mut memo),
                )
            })
            .collect::<Vec<_>>();
        Substitution::from_map(bindings)
    }
}
