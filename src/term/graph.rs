//! Hash-consed term DAG with parent back-links
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Every node
//! records the set of nodes which have it as a child so destructive
//! algorithms can walk upwards from a node to everything that mentions it
//! and splice in a replacement without re-traversing the graph.
//!
//! Graphs are only ever built through a [`GraphBuilder`], which owns the
//! hash-consing table for one construction session. Once a graph has been
//! [finished](GraphBuilder::finish) it can be mutated but never extended, so
//! the table cannot go stale.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    mem,
    sync::Arc,
};

use value_type::value_type;

use super::{Compound, Kind, Name, Term};

/// Handle to a node in a [`TermGraph`]
#[value_type(Copy)]
pub struct NodeId(usize);

/// Node payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    #[allow(missing_docs)]
    Constant(Name),
    #[allow(missing_docs)]
    Variable(Name),
    #[allow(missing_docs)]
    Compound(Name, Vec<NodeId>),
}

impl Node {
    #[allow(missing_docs)]
    #[must_use]
    pub fn name(&self) -> &Name {
        match self {
            Node::Constant(name)
            | Node::Variable(name)
            | Node::Compound(name, _) => name,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Node::Constant(_) => Kind::Constant,
            Node::Variable(_) => Kind::Variable,
            Node::Compound(..) => Kind::Compound,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Constant(_) | Node::Variable(_) => &[],
            Node::Compound(_, children) => children,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    parents: Vec<NodeId>,
}

/// Arena of term nodes
///
/// Cloning a graph is a deep copy which preserves the identity isomorphism:
/// every [`NodeId`] denotes the corresponding node in the clone.
#[derive(Debug, Clone, Default)]
pub struct TermGraph {
    slots: Vec<Slot>,
}

impl TermGraph {
    #[track_caller]
    fn slot(&self, NodeId(index): NodeId) -> &Slot {
        &self.slots[index]
    }

    #[track_caller]
    fn slot_mut(&mut self, NodeId(index): NodeId) -> &mut Slot {
        &mut self.slots[index]
    }

    /// Number of nodes in the arena
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Every node in the arena, in allocation order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.slots.len()).map(NodeId)
    }

    #[allow(missing_docs)]
    #[track_caller]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.slot(id).node
    }

    #[allow(missing_docs)]
    #[track_caller]
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Kind {
        self.node(id).kind()
    }

    #[allow(missing_docs)]
    #[track_caller]
    #[must_use]
    pub fn name(&self, id: NodeId) -> &Name {
        self.node(id).name()
    }

    #[allow(missing_docs)]
    #[track_caller]
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    /// Nodes which currently have `id` as a child
    #[track_caller]
    #[must_use]
    pub fn parents(&self, id: NodeId) -> &[NodeId] {
        &self.slot(id).parents
    }

    /// Record `parent` as referencing `id`. Parents form a set, recording the
    /// same parent twice is a no-op
    #[track_caller]
    pub fn add_parent(&mut self, id: NodeId, parent: NodeId) {
        let parents = &mut self.slot_mut(id).parents;
        if !parents.contains(&parent) {
            parents.push(parent);
        }
    }

    #[allow(missing_docs)]
    #[track_caller]
    pub fn add_parents(&mut self, id: NodeId, parents: &[NodeId]) {
        for &parent in parents {
            self.add_parent(id, parent);
        }
    }

    /// Remove and return every parent link of `id`, isolating it from the
    /// rest of the graph
    #[track_caller]
    pub fn take_parents(&mut self, id: NodeId) -> Vec<NodeId> {
        mem::take(&mut self.slot_mut(id).parents)
    }

    /// Point every child slot of `parent` which currently holds `from` at
    /// `to` instead
    ///
    /// Parent links are left alone, maintaining them is up to the caller
    #[track_caller]
    pub fn replace_child(&mut self, parent: NodeId, from: NodeId, to: NodeId) {
        if let Node::Compound(_, children) = &mut self.slot_mut(parent).node {
            for child in children.iter_mut().filter(|child| **child == from) {
                *child = to;
            }
        }
    }

    /// Overwrite a single child slot, returning the node that used to be
    /// there. Returns `None` if `parent` is a leaf or `index` is out of range
    #[track_caller]
    pub fn set_child(
        &mut self,
        parent: NodeId,
        index: usize,
        to: NodeId,
    ) -> Option<NodeId> {
        match &mut self.slot_mut(parent).node {
            Node::Compound(_, children) => {
                children.get_mut(index).map(|child| mem::replace(child, to))
            }
            Node::Constant(_) | Node::Variable(_) => None,
        }
    }

    /// Check if `needle` is reachable from `haystack` by following child
    /// links. Shared nodes are only visited once
    #[must_use]
    pub fn contains(&self, haystack: NodeId, needle: NodeId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![haystack];
        while let Some(id) = stack.pop() {
            if id == needle {
                return true;
            }
            if visited.insert(id) {
                stack.extend_from_slice(self.children(id));
            }
        }
        false
    }

    /// Names of the variables reachable from `id`
    #[must_use]
    pub fn domain(&self, id: NodeId) -> BTreeSet<Name> {
        let mut visited = HashSet::new();
        let mut stack = vec![id];
        let mut domain = BTreeSet::new();
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            match self.node(id) {
                Node::Variable(name) => {
                    let _ = domain.insert(name.clone());
                }
                Node::Constant(_) => {}
                Node::Compound(_, children) => {
                    stack.extend_from_slice(children);
                }
            }
        }
        domain
    }

    /// Read the term rooted at `id` out of the graph
    ///
    /// Shared nodes map to shared subtrees
    #[must_use]
    pub fn to_term(&self, id: NodeId) -> Term {
        self.to_term_with(id, &mut HashMap::new())
    }

    /// As [`TermGraph::to_term`], reusing `memo` across calls so that nodes
    /// shared between several roots come out as the same subtree
    pub(crate) fn to_term_with(
        &self,
        id: NodeId,
        memo: &mut HashMap<NodeId, Term>,
    ) -> Term {
        if let Some(term) = memo.get(&id) {
            return term.clone();
        }
        let term = match self.node(id) {
            Node::Constant(name) => Term::Constant(name.clone()),
            Node::Variable(name) => Term::Variable(name.clone()),
            Node::Compound(name, children) => {
                let children = children
                    .iter()
                    .map(|&child| self.to_term_with(child, memo))
                    .collect();
                Term::from_parts(name.clone(), children)
            }
        };
        let _ = memo.insert(id, term.clone());
        term
    }
}

/// One hash-consing session
///
/// Requesting a node structurally identical to one already built returns the
/// existing node, so equal subterms (and in particular equally named
/// variables) are shared across everything built with the same builder.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: TermGraph,
    interned: HashMap<Node, NodeId>,
}

impl GraphBuilder {
    /// Constructor
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn intern_node(&mut self, node: Node) -> NodeId {
        if let Some(&id) = self.interned.get(&node) {
            return id;
        }
        let id = NodeId(self.graph.slots.len());
        for &child in node.children() {
            self.graph.add_parent(child, id);
        }
        self.graph.slots.push(Slot {
            node: node.clone(),
            parents: Vec::new(),
        });
        let _ = self.interned.insert(node, id);
        id
    }

    #[allow(missing_docs)]
    pub fn constant(&mut self, name: impl Into<Name>) -> NodeId {
        self.intern_node(Node::Constant(name.into()))
    }

    #[allow(missing_docs)]
    pub fn variable(&mut self, name: impl Into<Name>) -> NodeId {
        self.intern_node(Node::Variable(name.into()))
    }

    /// Returns `None` if `children` is empty
    ///
    /// The children must have been produced by this builder
    pub fn compound(
        &mut self,
        name: impl Into<Name>,
        children: Vec<NodeId>,
    ) -> Option<NodeId> {
        if children.is_empty() {
            return None;
        }
        Some(self.intern_node(Node::Compound(name.into(), children)))
    }

    /// Copy a tree into the graph, sharing it with everything already built
    ///
    /// Subtrees shared by allocation are only walked once.
    pub fn intern(&mut self, term: &Term) -> NodeId {
        self.intern_with(term, &mut HashMap::new())
    }

    /// As [`GraphBuilder::intern`], reusing `memo` across calls. The memo is
    /// keyed on allocations so every term interned with it must outlive it
    pub(crate) fn intern_with(
        &mut self,
        term: &Term,
        memo: &mut HashMap<*const Compound, NodeId>,
    ) -> NodeId {
        match term {
            Term::Constant(name) => self.constant(name.clone()),
            Term::Variable(name) => self.variable(name.clone()),
            Term::Compound(compound) => {
                let key = Arc::as_ptr(compound);
                if let Some(&id) = memo.get(&key) {
                    return id;
                }
                let children = compound
                    .children()
                    .iter()
                    .map(|child| self.intern_with(child, memo))
                    .collect();
                let name = compound.name().clone();
                let id = self.intern_node(Node::Compound(name, children));
                let _ = memo.insert(key, id);
                id
            }
        }
    }

    /// End the session
    #[must_use]
    pub fn finish(self) -> TermGraph {
        self.graph
    }
}
