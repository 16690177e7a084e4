//! In-memory graph store: nodes + edges with adjacency indexes.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::index::{KindIndex, TextIndex};
use crate::types::{
    KgError, KgResult, Node, NodeKind, Relation, RelationCategory, RelationKey, RelationType,
    ScoredNode,
};

use super::GraphStore;

/// Node and edge counts broken down by kind and relation category.
#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub kinds: BTreeMap<NodeKind, usize>,
    pub categories: BTreeMap<RelationCategory, usize>,
}

/// The reference [`GraphStore`]: the whole graph held in memory behind a lock.
#[derive(Debug)]
pub struct MemoryGraph {
    inner: RwLock<GraphData>,
}

#[derive(Debug)]
struct GraphData {
    /// All nodes, in insertion order.
    nodes: Vec<Node>,
    /// name -> index in `nodes`.
    positions: HashMap<String, usize>,
    /// All edges, in insertion order.
    edges: Vec<Relation>,
    /// identity -> index in `edges`.
    edge_positions: HashMap<RelationKey, usize>,
    /// from -> edge indexes, ascending.
    adjacency: HashMap<String, Vec<usize>>,
    /// to -> edge indexes, ascending.
    reverse_adjacency: HashMap<String, Vec<usize>>,
    kind_index: KindIndex,
    text_index: TextIndex,
}

impl GraphData {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            positions: HashMap::new(),
            edges: Vec::new(),
            edge_positions: HashMap::new(),
            adjacency: HashMap::new(),
            reverse_adjacency: HashMap::new(),
            kind_index: KindIndex::new(),
            text_index: TextIndex::new(),
        }
    }

    fn get(&self, name: &str) -> Option<&Node> {
        self.positions.get(name).map(|&idx| &self.nodes[idx])
    }

    fn upsert_node(&mut self, node: Node) -> Node {
        if let Some(&idx) = self.positions.get(&node.name) {
            let existing = &mut self.nodes[idx];
            let old_kind = existing.kind();
            if !existing.merge(node) {
                log::warn!(
                    "Node '{}' changed kind from {} to {}; attributes replaced",
                    existing.name,
                    old_kind,
                    existing.kind()
                );
                self.kind_index.remove(&existing.name, old_kind);
                self.kind_index.add(&existing.name, existing.kind());
            }
            let stored = existing.clone();
            self.text_index
                .insert(&stored.name, &stored.searchable_text());
            return stored;
        }

        self.kind_index.add(&node.name, node.kind());
        self.text_index.insert(&node.name, &node.searchable_text());
        self.positions.insert(node.name.clone(), self.nodes.len());
        self.nodes.push(node.clone());
        node
    }

    fn upsert_edge(&mut self, relation: Relation) -> KgResult<Relation> {
        if !self.positions.contains_key(&relation.from) {
            return Err(KgError::NotFound(relation.from));
        }
        if !self.positions.contains_key(&relation.to) {
            return Err(KgError::NotFound(relation.to));
        }

        let key = relation.key();
        if let Some(&idx) = self.edge_positions.get(&key) {
            self.edges[idx].merge(relation);
            return Ok(self.edges[idx].clone());
        }

        let idx = self.edges.len();
        self.adjacency
            .entry(relation.from.clone())
            .or_default()
            .push(idx);
        self.reverse_adjacency
            .entry(relation.to.clone())
            .or_default()
            .push(idx);
        self.edge_positions.insert(key, idx);
        self.edges.push(relation.clone());
        Ok(relation)
    }

    fn remove_node(&mut self, name: &str) -> bool {
        let Some(pos) = self.positions.get(name).copied() else {
            return false;
        };
        let removed = self.nodes.remove(pos);
        self.kind_index.remove(&removed.name, removed.kind());
        self.text_index.remove(&removed.name);

        // Remove all edges involving this node
        self.edges.retain(|e| !e.touches(name));

        self.rebuild_positions();
        self.rebuild_adjacency();
        true
    }

    fn remove_edge(&mut self, key: &RelationKey) -> bool {
        let Some(pos) = self.edge_positions.get(key).copied() else {
            return false;
        };
        self.edges.remove(pos);
        self.rebuild_adjacency();
        true
    }

    fn rebuild_positions(&mut self) {
        self.positions = self
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.name.clone(), idx))
            .collect();
    }

    /// Rebuild adjacency indexes from the current edge list, keeping insertion order.
    fn rebuild_adjacency(&mut self) {
        self.adjacency.clear();
        self.reverse_adjacency.clear();
        self.edge_positions.clear();
        for (idx, edge) in self.edges.iter().enumerate() {
            self.adjacency.entry(edge.from.clone()).or_default().push(idx);
            self.reverse_adjacency
                .entry(edge.to.clone())
                .or_default()
                .push(idx);
            self.edge_positions.insert(edge.key(), idx);
        }
    }

    fn edges_at(&self, indexes: Option<&Vec<usize>>) -> Vec<Relation> {
        indexes
            .map(|list| list.iter().map(|&i| self.edges[i].clone()).collect())
            .unwrap_or_default()
    }
}

impl MemoryGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(GraphData::new()),
        }
    }

    /// Create from pre-existing data (used by the snapshot reader).
    ///
    /// Nodes are upserted in order, then edges; an edge with a missing
    /// endpoint fails the whole load.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Relation>) -> KgResult<Self> {
        let mut data = GraphData::new();
        for node in nodes {
            data.upsert_node(node);
        }
        for edge in edges {
            data.upsert_edge(edge)?;
        }
        Ok(Self {
            inner: RwLock::new(data),
        })
    }

    fn read(&self) -> KgResult<RwLockReadGuard<'_, GraphData>> {
        self.inner
            .read()
            .map_err(|_| KgError::BackendUnavailable("graph lock poisoned".to_string()))
    }

    fn write(&self) -> KgResult<RwLockWriteGuard<'_, GraphData>> {
        self.inner
            .write()
            .map_err(|_| KgError::BackendUnavailable("graph lock poisoned".to_string()))
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> KgResult<Vec<Node>> {
        Ok(self.read()?.nodes.clone())
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> KgResult<Vec<Relation>> {
        Ok(self.read()?.edges.clone())
    }

    /// Names of all nodes of one kind, sorted.
    pub fn names_of_kind(&self, kind: NodeKind) -> KgResult<Vec<String>> {
        Ok(self.read()?.kind_index.get(kind).to_vec())
    }

    /// Counts per node kind and relation category.
    pub fn stats(&self) -> KgResult<GraphStats> {
        let data = self.read()?;
        let mut kinds = BTreeMap::new();
        for kind in NodeKind::ALL {
            let count = data.kind_index.count(kind);
            if count > 0 {
                kinds.insert(kind, count);
            }
        }
        let mut categories = BTreeMap::new();
        for edge in &data.edges {
            *categories
                .entry(edge.relation_type.category())
                .or_insert(0usize) += 1;
        }
        Ok(GraphStats {
            node_count: data.nodes.len(),
            edge_count: data.edges.len(),
            kinds,
            categories,
        })
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore for MemoryGraph {
    fn upsert_node(&self, node: Node) -> KgResult<Node> {
        Ok(self.write()?.upsert_node(node))
    }

    fn upsert_edge(&self, relation: Relation) -> KgResult<Relation> {
        self.write()?.upsert_edge(relation)
    }

    fn get_node(&self, name: &str) -> KgResult<Option<Node>> {
        Ok(self.read()?.get(name).cloned())
    }

    fn find_nodes(
        &self,
        query: &str,
        kinds: &[NodeKind],
        limit: usize,
    ) -> KgResult<Vec<ScoredNode>> {
        let data = self.read()?;
        if query.trim().is_empty() && !kinds.is_empty() {
            return Ok(data
                .kind_index
                .get_any(kinds)
                .into_iter()
                .filter_map(|name| data.get(&name).cloned())
                .map(|node| ScoredNode { node, score: 1.0 })
                .take(limit)
                .collect());
        }
        let mut results = Vec::new();

        // An exact name always ranks first, even when it has no indexable terms.
        if let Some(node) = data.get(query.trim()) {
            if kinds.is_empty() || kinds.contains(&node.kind()) {
                results.push(ScoredNode {
                    node: node.clone(),
                    score: 2.0,
                });
            }
        }

        for (name, score) in data.text_index.search(query) {
            if results.len() >= limit {
                break;
            }
            if results.iter().any(|r| r.node.name == name) {
                continue;
            }
            if let Some(node) = data.get(&name) {
                if kinds.is_empty() || kinds.contains(&node.kind()) {
                    results.push(ScoredNode {
                        node: node.clone(),
                        score,
                    });
                }
            }
        }

        results.truncate(limit);
        Ok(results)
    }

    fn similar_nodes(&self, name: &str, limit: usize) -> KgResult<Vec<ScoredNode>> {
        let data = self.read()?;
        Ok(data
            .text_index
            .similar_to(name)
            .into_iter()
            .filter_map(|(other, score)| {
                data.get(&other).map(|node| ScoredNode {
                    node: node.clone(),
                    score,
                })
            })
            .take(limit)
            .collect())
    }

    fn edges_from(&self, name: &str) -> KgResult<Vec<Relation>> {
        let data = self.read()?;
        Ok(data.edges_at(data.adjacency.get(name)))
    }

    fn edges_to(&self, name: &str) -> KgResult<Vec<Relation>> {
        let data = self.read()?;
        Ok(data.edges_at(data.reverse_adjacency.get(name)))
    }

    fn edges_of_type(&self, relation_type: RelationType) -> KgResult<Vec<Relation>> {
        Ok(self
            .read()?
            .edges
            .iter()
            .filter(|e| e.relation_type == relation_type)
            .cloned()
            .collect())
    }

    fn delete_node(&self, name: &str) -> KgResult<bool> {
        Ok(self.write()?.remove_node(name))
    }

    fn delete_edge(&self, from: &str, to: &str, relation_type: RelationType) -> KgResult<bool> {
        let key = RelationKey {
            from: from.to_string(),
            to: to.to_string(),
            relation_type,
        };
        Ok(self.write()?.remove_edge(&key))
    }

    fn node_count(&self) -> KgResult<usize> {
        Ok(self.read()?.nodes.len())
    }

    fn edge_count(&self) -> KgResult<usize> {
        Ok(self.read()?.edges.len())
    }
}
