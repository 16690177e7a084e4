//! Index by node kind: maps each NodeKind to sorted node names.

use std::collections::HashMap;

use crate::types::NodeKind;

/// Maps each NodeKind to a sorted list of node names.
#[derive(Debug)]
pub struct KindIndex {
    index: HashMap<NodeKind, Vec<String>>,
}

impl KindIndex {
    /// Create a new, empty kind index.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
        }
    }

    /// Get all node names of a given kind.
    pub fn get(&self, kind: NodeKind) -> &[String] {
        self.index.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Get all node names matching any of the given kinds, merged and sorted.
    pub fn get_any(&self, kinds: &[NodeKind]) -> Vec<String> {
        let mut result: Vec<String> = Vec::new();
        for kind in kinds {
            if let Some(names) = self.index.get(kind) {
                result.extend(names.iter().cloned());
            }
        }
        result.sort_unstable();
        result.dedup();
        result
    }

    /// Count nodes of a given kind.
    pub fn count(&self, kind: NodeKind) -> usize {
        self.index.get(&kind).map(|v| v.len()).unwrap_or(0)
    }

    /// Incrementally add a node name under a kind.
    pub fn add(&mut self, name: &str, kind: NodeKind) {
        let list = self.index.entry(kind).or_default();
        if let Err(pos) = list.binary_search_by(|n| n.as_str().cmp(name)) {
            list.insert(pos, name.to_string());
        }
    }

    /// Remove a node name from a kind.
    pub fn remove(&mut self, name: &str, kind: NodeKind) {
        if let Some(list) = self.index.get_mut(&kind) {
            if let Ok(pos) = list.binary_search_by(|n| n.as_str().cmp(name)) {
                list.remove(pos);
            }
        }
    }
}

impl Default for KindIndex {
    fn default() -> Self {
        Self::new()
    }
}
