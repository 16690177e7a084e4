//! Graph fragments returned by engine operations.

use std::collections::HashSet;

use serde::Serialize;

use super::node::Node;
use super::relation::{Relation, RelationKey};

/// A normalized piece of the graph: nodes plus the edges between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphFragment {
    /// Nodes, in the order the producing operation ranked them.
    pub nodes: Vec<Node>,
    /// Edges, each at most once.
    pub edges: Vec<Relation>,
}

impl GraphFragment {
    /// Create an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the fragment has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Names of the nodes, in order.
    pub fn names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    /// Whether a node with this name is part of the fragment.
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    /// Append a node unless one with the same name is already present.
    pub fn push_node(&mut self, node: Node) -> bool {
        if self.contains(&node.name) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Append an edge unless one with the same identity is already present.
    pub fn push_edge(&mut self, edge: Relation) -> bool {
        let key = edge.key();
        if self.edges.iter().any(|e| e.key() == key) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    /// Merge another fragment into this one, keeping first occurrences.
    pub fn extend(&mut self, other: GraphFragment) {
        let mut names: HashSet<String> = self.nodes.iter().map(|n| n.name.clone()).collect();
        for node in other.nodes {
            if names.insert(node.name.clone()) {
                self.nodes.push(node);
            }
        }
        let mut keys: HashSet<RelationKey> = self.edges.iter().map(Relation::key).collect();
        for edge in other.edges {
            if keys.insert(edge.key()) {
                self.edges.push(edge);
            }
        }
    }
}

/// A node with a relevance or similarity score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredNode {
    pub node: Node,
    pub score: f32,
}
