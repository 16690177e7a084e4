//! Fluent API for building MemoryGraph instances.

use crate::types::{
    EventAttrs, KgResult, Node, NodeData, NodeKind, Relation, RelationType, SourceType,
    ThoughtAttrs,
};

use super::MemoryGraph;

/// Fluent builder for constructing a MemoryGraph.
///
/// Nodes are upserted in insertion order, then edges, so a later node with
/// the same name merges into the earlier one.
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Relation>,
}

impl GraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Add a prepared node.
    pub fn node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Add a node of the given kind with no attributes.
    pub fn add(&mut self, name: &str, kind: NodeKind) -> &mut Self {
        self.node(Node::of_kind(name, kind))
    }

    /// Add a Source with the given reliability.
    pub fn add_source(&mut self, name: &str, reliability: f32) -> &mut Self {
        self.node(Node::source(name, SourceType::Document, reliability))
    }

    /// Add a Proposition with a statement and confidence.
    pub fn add_proposition(&mut self, name: &str, statement: &str, confidence: f32) -> &mut Self {
        self.node(Node::proposition(name, statement).with_confidence(confidence))
    }

    /// Add an Event stamped with the given timestamp.
    pub fn add_event(&mut self, name: &str, timestamp: &str) -> &mut Self {
        self.node(Node::new(
            name,
            NodeData::Event(EventAttrs {
                timestamp: Some(timestamp.to_string()),
                ..Default::default()
            }),
        ))
    }

    /// Add a Thought with its content.
    pub fn add_thought(&mut self, name: &str, content: &str) -> &mut Self {
        self.node(Node::new(
            name,
            NodeData::Thought(ThoughtAttrs {
                thought_content: Some(content.to_string()),
                ..Default::default()
            }),
        ))
    }

    /// Add an edge between two nodes.
    pub fn link(
        &mut self,
        from: &str,
        to: &str,
        relation_type: RelationType,
        weight: f32,
    ) -> &mut Self {
        self.edges
            .push(Relation::new(from, to, relation_type).with_weight(weight));
        self
    }

    /// Add a prepared edge.
    pub fn relation(&mut self, relation: Relation) -> &mut Self {
        self.edges.push(relation);
        self
    }

    /// Record that `node` was derived from `source` (DERIVED_FROM edge).
    pub fn derived_from(&mut self, node: &str, source: &str) -> &mut Self {
        self.edges
            .push(Relation::new(node, source, RelationType::DerivedFrom));
        self
    }

    /// Build the final MemoryGraph. Fails if an edge names a missing node.
    pub fn build(&mut self) -> KgResult<MemoryGraph> {
        MemoryGraph::from_parts(
            std::mem::take(&mut self.nodes),
            std::mem::take(&mut self.edges),
        )
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
