//! The graph store adapter: the boundary between the engine and a physical backend.

use crate::types::{KgError, KgResult, Node, NodeKind, Relation, RelationType, ScoredNode};

/// Primitive reads and writes the reasoning engine needs from a graph backend.
///
/// Every method takes `&self`: implementations own their concurrency control,
/// and a single node or edge upsert must be atomic. Expansion and path search
/// are done by the engine on top of [`edges_from`](Self::edges_from) and
/// [`edges_to`](Self::edges_to), so any backend that can list adjacency works.
pub trait GraphStore: Send + Sync {
    /// Insert a node, or merge it into the existing node of the same name.
    /// Returns the stored node after the write.
    fn upsert_node(&self, node: Node) -> KgResult<Node>;

    /// Insert an edge, or merge it into the existing edge with the same
    /// (from, to, type). Fails with `NotFound` if an endpoint is missing.
    fn upsert_edge(&self, relation: Relation) -> KgResult<Relation>;

    /// Look up a node by exact name.
    fn get_node(&self, name: &str) -> KgResult<Option<Node>>;

    /// Relevance-ranked free-text match. An empty `kinds` slice means all kinds.
    /// A blank query with a non-empty `kinds` slice lists those kinds by name.
    fn find_nodes(&self, query: &str, kinds: &[NodeKind], limit: usize)
        -> KgResult<Vec<ScoredNode>>;

    /// Nodes similar to the named node, best first, excluding the node itself.
    /// Backends without a similarity capability return nothing.
    fn similar_nodes(&self, _name: &str, _limit: usize) -> KgResult<Vec<ScoredNode>> {
        Ok(Vec::new())
    }

    /// Outgoing edges of a node, in insertion order.
    fn edges_from(&self, name: &str) -> KgResult<Vec<Relation>>;

    /// Incoming edges of a node, in insertion order.
    fn edges_to(&self, name: &str) -> KgResult<Vec<Relation>>;

    /// All edges of one relation type, in insertion order.
    fn edges_of_type(&self, relation_type: RelationType) -> KgResult<Vec<Relation>>;

    /// Delete a node and its incident edges. Returns whether it existed.
    fn delete_node(&self, name: &str) -> KgResult<bool>;

    /// Delete one edge. Returns whether it existed.
    fn delete_edge(&self, from: &str, to: &str, relation_type: RelationType) -> KgResult<bool>;

    /// Number of nodes.
    fn node_count(&self) -> KgResult<usize>;

    /// Number of edges.
    fn edge_count(&self) -> KgResult<usize>;

    /// Look up a node that must exist.
    fn require_node(&self, name: &str) -> KgResult<Node> {
        self.get_node(name)?
            .ok_or_else(|| KgError::NotFound(name.to_string()))
    }

    /// Outgoing and incoming edges of a node: outgoing first, each in insertion order.
    fn incident_edges(&self, name: &str) -> KgResult<Vec<Relation>> {
        let mut edges = self.edges_from(name)?;
        edges.extend(self.edges_to(name)?);
        Ok(edges)
    }
}
