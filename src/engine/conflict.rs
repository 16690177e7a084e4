//! Contradiction detection over CONTRADICTS edges.

use std::collections::HashSet;

use serde::Serialize;

use crate::graph::GraphStore;
use crate::types::{KgResult, Relation, RelationType};

use super::QueryEngine;

/// How a conflict was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// Recorded as a CONTRADICTS edge.
    Explicit,
}

/// Two nodes that contradict each other. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictPair {
    pub first: String,
    pub second: String,
    pub conflict_type: ConflictType,
    pub reason: String,
}

impl ConflictPair {
    fn from_edge(edge: &Relation) -> Self {
        let reason = match edge.context.as_deref().map(str::trim) {
            Some(context) if !context.is_empty() => context.to_string(),
            _ => format!("`{}` contradicts `{}`", edge.from, edge.to),
        };
        Self {
            first: edge.from.clone(),
            second: edge.to.clone(),
            conflict_type: ConflictType::Explicit,
            reason,
        }
    }

    /// Whether the pair involves the named node.
    pub fn involves(&self, name: &str) -> bool {
        self.first == name || self.second == name
    }

    /// The endpoints as an order-independent key.
    fn unordered(&self) -> (String, String) {
        if self.first <= self.second {
            (self.first.clone(), self.second.clone())
        } else {
            (self.second.clone(), self.first.clone())
        }
    }
}

/// Collect CONTRADICTS pairs, deduplicated by unordered endpoints.
///
/// With a scope, only edges touching one of the scoped names count.
pub fn collect_conflicts(
    store: &dyn GraphStore,
    scope: Option<&[String]>,
) -> KgResult<Vec<ConflictPair>> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for edge in store.edges_of_type(RelationType::Contradicts)? {
        if let Some(scope) = scope {
            if !scope.iter().any(|name| edge.touches(name)) {
                continue;
            }
        }
        let pair = ConflictPair::from_edge(&edge);
        if seen.insert(pair.unordered()) {
            pairs.push(pair);
        }
    }
    Ok(pairs)
}

/// Number of distinct nodes the named node contradicts, in either direction.
pub fn conflict_count(store: &dyn GraphStore, name: &str) -> KgResult<usize> {
    let partners: HashSet<String> = store
        .incident_edges(name)?
        .into_iter()
        .filter(|e| e.relation_type == RelationType::Contradicts)
        .map(|e| e.other_end(name).to_string())
        .collect();
    Ok(partners.len())
}

impl QueryEngine {
    /// All contradictions, or only those touching the scoped names.
    pub fn detect_conflicts(
        &self,
        store: &dyn GraphStore,
        scope: Option<&[String]>,
    ) -> KgResult<Vec<ConflictPair>> {
        collect_conflicts(store, scope)
    }
}
