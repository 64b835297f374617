use std::collections::{HashMap, HashSet};

use super::{Mismatch, Strategy, UnificationResult, conclude};
use crate::{
    substitution::Substitution,
    term::{Node, NodeId, SymbolsFirst, TermGraph, TermPair},
};

/// Linear unification by Paterson and Wegman
///
/// Nodes which must be equal are joined by undirected links and each
/// equivalence class is collapsed onto a representative once all of its
/// parents have been dealt with. Meeting a node whose class is still being
/// collapsed means the terms are cyclic. The graph itself is only read.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatersonWegman;

impl Strategy for PatersonWegman {
    fn name(&self) -> &'static str {
        "Paterson-Wegman"
    }

    fn find_unifier(&self, pair: &TermPair) -> UnificationResult {
        let mut linker = Linker::new(pair.graph());
        linker.link(pair.term1_id(), pair.term2_id());
        let outcome = SymbolsFirst::new(pair)
            .try_for_each(|id| linker.finish(id))
            .map(|()| linker.into_substitution());
        conclude(self.name(), outcome)
    }
}

struct Linker<'a> {
    graph: &'a TermGraph,
    links: HashMap<NodeId, Vec<NodeId>>,
    // Node to the representative of the class currently claiming it
    pointers: HashMap<NodeId, NodeId>,
    finished: HashSet<NodeId>,
    // Triangular form, variable node to the representative of its class
    bindings: Vec<(NodeId, NodeId)>,
}

impl<'a> Linker<'a> {
    fn new(graph: &'a TermGraph) -> Self {
        Self {
            graph,
            links: HashMap::new(),
            pointers: HashMap::new(),
            finished: HashSet::new(),
            bindings: Vec::new(),
        }
    }

    fn link(&mut self, left: NodeId, right: NodeId) {
        self.links.entry(left).or_default().push(right);
        self.links.entry(right).or_default().push(left);
    }

    // Nodes are finished constants and compounds first, so a variable only
    // ends up representing a class made entirely of variables
    fn finish(&mut self, term: NodeId) -> Result<(), Mismatch> {
        if self.finished.contains(&term) {
            return Ok(());
        }
        if self.pointers.contains_key(&term) {
            return Err(Mismatch::Cycle {
                term: self.graph.to_term(term),
            });
        }
        let _ = self.pointers.insert(term, term);
        let graph = self.graph;
        let mut stack = vec![term];
        while let Some(current) = stack.pop() {
            self.check_compatible(current, term)?;
            for &parent in graph.parents(current) {
                self.finish(parent)?;
            }
            let links = self.links.get(&current).cloned().unwrap_or_default();
            for link in links {
                if link == term || self.finished.contains(&link) {
                    continue;
                }
                match self.pointers.get(&link) {
                    None => {
                        let _ = self.pointers.insert(link, term);
                        stack.push(link);
                    }
                    Some(&claimed) if claimed != term => {
                        return Err(Mismatch::Cycle {
                            term: graph.to_term(link),
                        });
                    }
                    Some(_) => {}
                }
            }
            if current != term {
                match graph.node(current) {
                    Node::Variable(variable) => {
                        tracing::trace!(
                            %variable,
                            representative = %graph.name(term),
                            "Binding"
                        );
                        self.bindings.push((current, term));
                    }
                    Node::Compound(_, children) => {
                        let pairs = children.iter().zip(graph.children(term));
                        for (&child, &other) in pairs {
                            self.link(child, other);
                        }
                    }
                    Node::Constant(_) => {}
                }
                let _ = self.finished.insert(current);
            }
        }
        let _ = self.finished.insert(term);
        Ok(())
    }

    fn check_compatible(
        &self,
        current: NodeId,
        term: NodeId,
    ) -> Result<(), Mismatch> {
        let compatible = match (self.graph.node(current), self.graph.node(term))
        {
            (Node::Variable(_), _) | (_, Node::Variable(_)) => true,
            (Node::Constant(left), Node::Constant(right)) => left == right,
            (
                Node::Compound(left, left_children),
                Node::Compound(right, right_children),
            ) => left == right && left_children.len() == right_children.len(),
            _ => false,
        };
        if compatible {
            Ok(())
        } else {
            Err(Mismatch::SymbolClash {
                left: self.graph.to_term(current),
                right: self.graph.to_term(term),
            })
        }
    }

    fn into_substitution(self) -> Substitution {
        let mut memo = HashMap::new();
        let bindings = self
            .bindings
            .into_iter()
            .map(|(variable, term)| {
                (
                    self.graph.name(variable).clone(),
                    self.graph.to_term_with(term, &mut memo),
                )
            })
            .collect::<Vec<_>>();
        Substitution::from_triangular_form(bindings)
    }
}
