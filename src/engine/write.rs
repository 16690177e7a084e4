//! Write engine: batch upserts of nodes, relations and sources, and deletion.

use serde::Serialize;

use crate::graph::GraphStore;
use crate::types::{KgError, KgResult, Node, NodeData, Relation, RelationType, SourceAttrs};

/// One item of a batch that could not be written.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    /// Name (or `from -TYPE-> to`) of the item.
    pub item: String,
    pub error: String,
}

/// Outcome of a batch write. Items are independent; failures do not roll back.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult<T> {
    pub created: Vec<T>,
    pub failures: Vec<BatchFailure>,
}

impl<T> BatchResult<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            created: Vec::with_capacity(capacity),
            failures: Vec::new(),
        }
    }

    fn record(&mut self, item: String, outcome: KgResult<T>) {
        match outcome {
            Ok(value) => self.created.push(value),
            Err(e) => {
                log::warn!("Batch item '{item}' failed: {e}");
                self.failures.push(BatchFailure {
                    item,
                    error: e.to_string(),
                });
            }
        }
    }

    /// Whether every item was written.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The written items, or `PartialBatchFailure` if any item failed.
    pub fn into_result(self) -> KgResult<Vec<T>> {
        if self.failures.is_empty() {
            return Ok(self.created);
        }
        Err(KgError::PartialBatchFailure {
            requested: self.created.len() + self.failures.len(),
            failed: self.failures.len(),
        })
    }
}

/// A source to record, and the nodes derived from it.
#[derive(Debug, Clone, Default)]
pub struct SourceSpec {
    pub name: String,
    pub attrs: SourceAttrs,
    /// Nodes that get a DERIVED_FROM edge to this source.
    pub derived: Vec<String>,
}

/// Outcome of [`WriteEngine::add_sources`].
#[derive(Debug, Clone, Serialize)]
pub struct SourcesAdded {
    pub sources: BatchResult<Node>,
    pub links: BatchResult<Relation>,
}

/// The write engine applies validated upserts through a graph store.
#[derive(Debug, Clone, Default)]
pub struct WriteEngine;

impl WriteEngine {
    /// Create a new write engine.
    pub fn new() -> Self {
        Self
    }

    /// Upsert a node after validating its name and ranges.
    ///
    /// An upsert that changes the node's kind is rejected with `TypeMismatch`
    /// when an incident edge constrains that endpoint to the old kind.
    pub fn create_node(&self, store: &dyn GraphStore, node: Node) -> KgResult<Node> {
        node.validate()?;
        if let Some(existing) = store.get_node(&node.name)? {
            if existing.kind() != node.kind() {
                check_incident_edges(store, &node)?;
            }
        }
        store.upsert_node(node)
    }

    /// Upsert a batch of nodes. Each item succeeds or fails on its own.
    pub fn create_nodes(&self, store: &dyn GraphStore, nodes: Vec<Node>) -> BatchResult<Node> {
        let mut result = BatchResult::with_capacity(nodes.len());
        for node in nodes {
            let item = node.name.clone();
            result.record(item, self.create_node(store, node));
        }
        result
    }

    /// Upsert one relation. Both endpoints must exist and match the kinds
    /// the relation type expects.
    pub fn create_relation(
        &self,
        store: &dyn GraphStore,
        relation: Relation,
    ) -> KgResult<Relation> {
        relation.validate()?;
        let from = store.require_node(&relation.from)?;
        let to = store.require_node(&relation.to)?;
        check_endpoint_kinds(&relation, &from, &to)?;
        store.upsert_edge(relation)
    }

    /// Upsert a batch of relations. Each item succeeds or fails on its own.
    pub fn create_relations(
        &self,
        store: &dyn GraphStore,
        relations: Vec<Relation>,
    ) -> BatchResult<Relation> {
        let mut result = BatchResult::with_capacity(relations.len());
        for relation in relations {
            let item = describe(&relation);
            result.record(item, self.create_relation(store, relation));
        }
        result
    }

    /// Record sources and link each listed node to its source via DERIVED_FROM.
    pub fn add_sources(&self, store: &dyn GraphStore, specs: Vec<SourceSpec>) -> SourcesAdded {
        let mut sources = BatchResult::with_capacity(specs.len());
        let mut links = BatchResult::with_capacity(specs.len());
        for spec in specs {
            let node = Node::new(spec.name.clone(), NodeData::Source(spec.attrs));
            let outcome = self.create_node(store, node);
            let ok = outcome.is_ok();
            sources.record(spec.name.clone(), outcome);
            if !ok {
                continue;
            }
            for derived in spec.derived {
                let relation = Relation::new(derived, spec.name.clone(), RelationType::DerivedFrom);
                let item = describe(&relation);
                links.record(item, self.create_relation(store, relation));
            }
        }
        SourcesAdded { sources, links }
    }

    /// Delete a node and its incident edges. NotFound if it does not exist.
    pub fn delete_node(&self, store: &dyn GraphStore, name: &str) -> KgResult<()> {
        if !store.delete_node(name)? {
            return Err(KgError::NotFound(name.to_string()));
        }
        log::debug!("Deleted node '{name}'");
        Ok(())
    }

    /// Delete one relation. NotFound if it does not exist.
    pub fn delete_relation(
        &self,
        store: &dyn GraphStore,
        from: &str,
        to: &str,
        relation_type: RelationType,
    ) -> KgResult<()> {
        if !store.delete_edge(from, to, relation_type)? {
            return Err(KgError::NotFound(format!("{from} -{relation_type}-> {to}")));
        }
        Ok(())
    }
}

/// Reject a relation whose endpoints are not of the kinds its type requires.
pub fn check_endpoint_kinds(relation: &Relation, from: &Node, to: &Node) -> KgResult<()> {
    let (from_kinds, to_kinds) = relation.relation_type.endpoint_kinds();
    for (allowed, node) in [(from_kinds, from), (to_kinds, to)] {
        let Some(allowed) = allowed else {
            continue;
        };
        if !allowed.contains(&node.kind()) {
            return Err(KgError::TypeMismatch {
                relation: relation.relation_type.name().to_string(),
                node: node.name.clone(),
                expected: allowed
                    .iter()
                    .map(|k| k.name())
                    .collect::<Vec<_>>()
                    .join("|"),
                found: node.kind().name().to_string(),
            });
        }
    }
    Ok(())
}

/// Check every edge touching `node.name` as if `node` replaced the stored node.
fn check_incident_edges(store: &dyn GraphStore, node: &Node) -> KgResult<()> {
    for edge in store.incident_edges(&node.name)? {
        let from = if edge.from == node.name {
            node.clone()
        } else {
            store.require_node(&edge.from)?
        };
        let to = if edge.to == node.name {
            node.clone()
        } else {
            store.require_node(&edge.to)?
        };
        check_endpoint_kinds(&edge, &from, &to)?;
    }
    Ok(())
}

fn describe(relation: &Relation) -> String {
    format!("{} -{}-> {}", relation.from, relation.relation_type, relation.to)
}
