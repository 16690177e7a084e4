//! Reasoning chains: creation, step linking and retrieval.

use std::collections::HashSet;

use serde::Serialize;

use crate::graph::GraphStore;
use crate::types::{
    GraphFragment, KgError, KgResult, Node, NodeData, NodeKind, ReasoningChainAttrs,
    ReasoningStepAttrs, Relation, RelationType,
};

use super::write::check_endpoint_kinds;
use super::{QueryEngine, WriteEngine};

/// A reasoning chain to create or update.
#[derive(Debug, Clone, Default)]
pub struct ChainSpec {
    pub name: String,
    /// `source_thought` names the Thought this chain elaborates.
    pub attrs: ReasoningChainAttrs,
}

/// A step to add to an existing chain.
#[derive(Debug, Clone, Default)]
pub struct StepSpec {
    pub chain: String,
    pub name: String,
    /// `step_number` sets the step's order; when absent the step is appended.
    pub attrs: ReasoningStepAttrs,
    /// Steps this one follows from (LEADS_TO edges into this step).
    pub previous_steps: Vec<String>,
}

/// Outcome of [`WriteEngine::create_chain`].
#[derive(Debug, Clone, Serialize)]
pub struct ChainCreated {
    pub chain: Node,
    pub linked_thought: Option<String>,
    pub warnings: Vec<String>,
}

/// Outcome of [`WriteEngine::add_step`].
#[derive(Debug, Clone, Serialize)]
pub struct StepAdded {
    pub step: Node,
    pub order: u32,
    pub linked_references: Vec<String>,
    pub linked_previous: Vec<String>,
    pub warnings: Vec<String>,
}

/// How to select chains for retrieval.
#[derive(Debug, Clone)]
pub enum ChainQuery {
    /// One chain by exact name.
    Name(String),
    /// Every chain matching any of these topics by relevance.
    Topics(Vec<String>),
}

fn warn(warnings: &mut Vec<String>, message: String) {
    log::warn!("{message}");
    warnings.push(message);
}

fn not_a_chain(node: &Node) -> KgError {
    KgError::TypeMismatch {
        relation: RelationType::ContainsStep.name().to_string(),
        node: node.name.clone(),
        expected: NodeKind::ReasoningChain.name().to_string(),
        found: node.kind().name().to_string(),
    }
}

fn not_a_step(node: &Node) -> KgError {
    KgError::TypeMismatch {
        relation: RelationType::ContainsStep.name().to_string(),
        node: node.name.clone(),
        expected: NodeKind::ReasoningStep.name().to_string(),
        found: node.kind().name().to_string(),
    }
}

impl WriteEngine {
    /// Create or update a reasoning chain, linking it to its source Thought
    /// when that Thought exists.
    pub fn create_chain(&self, store: &dyn GraphStore, spec: ChainSpec) -> KgResult<ChainCreated> {
        let source_thought = spec.attrs.source_thought.clone();
        let chain = self.create_node(
            store,
            Node::new(spec.name, NodeData::ReasoningChain(spec.attrs)),
        )?;

        let mut warnings = Vec::new();
        let mut linked_thought = None;
        if let Some(thought) = source_thought {
            match store.get_node(&thought)? {
                Some(node) if node.kind() == NodeKind::Thought => {
                    let link = Relation::new(&node.name, &chain.name, RelationType::HasReasoning);
                    match store.upsert_edge(link) {
                        Ok(_) => linked_thought = Some(node.name),
                        Err(e) => warn(
                            &mut warnings,
                            format!("Could not link thought '{thought}': {e}"),
                        ),
                    }
                }
                Some(node) => warn(
                    &mut warnings,
                    format!(
                        "Source thought '{thought}' is a {}, not a thought; chain left unlinked",
                        node.kind()
                    ),
                ),
                None => warn(
                    &mut warnings,
                    format!("Source thought '{thought}' not found; chain left unlinked"),
                ),
            }
        }

        Ok(ChainCreated {
            chain,
            linked_thought,
            warnings,
        })
    }

    /// Add a step to a chain.
    ///
    /// The chain must exist. The step is linked with CONTAINS_STEP{order} and
    /// the chain's `numberOfSteps` becomes the larger of its current value and
    /// the step number. REFERENCES and LEADS_TO links are best effort: missing
    /// targets become warnings and do not fail the step.
    ///
    /// A step name already held by a node of another kind (the chain itself
    /// included) is rejected with `TypeMismatch`.
    pub fn add_step(&self, store: &dyn GraphStore, spec: StepSpec) -> KgResult<StepAdded> {
        let chain = store.require_node(&spec.chain)?;
        let NodeData::ReasoningChain(chain_attrs) = &chain.data else {
            return Err(not_a_chain(&chain));
        };
        let current = chain_attrs.number_of_steps.unwrap_or(0);
        if let Some(existing) = store.get_node(&spec.name)? {
            if existing.kind() != NodeKind::ReasoningStep {
                return Err(not_a_step(&existing));
            }
        }

        let mut attrs = spec.attrs;
        let order = match attrs.step_number {
            Some(order) => order,
            None => current.checked_add(1).ok_or_else(|| KgError::ValidationFailed {
                node: chain.name.clone(),
                issues: vec![format!("numberOfSteps {current} has no successor")],
            })?,
        };
        attrs.step_number = Some(order);
        let references = attrs.supporting_references.clone();
        let step = Node::new(spec.name, NodeData::ReasoningStep(attrs));

        let contains = Relation::new(&chain.name, &step.name, RelationType::ContainsStep)
            .with_order(order);
        check_endpoint_kinds(&contains, &chain, &step)?;
        let step = self.create_node(store, step)?;
        store.upsert_edge(contains)?;

        if order > current {
            let update = ReasoningChainAttrs {
                number_of_steps: Some(order),
                ..Default::default()
            };
            store.upsert_node(Node::new(&chain.name, NodeData::ReasoningChain(update)))?;
        }

        let mut warnings = Vec::new();
        let mut linked_references = Vec::new();
        for reference in references {
            if store.get_node(&reference)?.is_none() {
                warn(
                    &mut warnings,
                    format!("Supporting reference '{reference}' not found; skipped"),
                );
                continue;
            }
            let link = Relation::new(&step.name, &reference, RelationType::References);
            match store.upsert_edge(link) {
                Ok(_) => linked_references.push(reference),
                Err(e) => warn(
                    &mut warnings,
                    format!("Could not link reference '{reference}': {e}"),
                ),
            }
        }

        let mut linked_previous = Vec::new();
        for previous in spec.previous_steps {
            match store.get_node(&previous)? {
                Some(node) if node.kind() == NodeKind::ReasoningStep => {
                    let link = Relation::new(&node.name, &step.name, RelationType::LeadsTo);
                    match store.upsert_edge(link) {
                        Ok(_) => linked_previous.push(previous),
                        Err(e) => warn(
                            &mut warnings,
                            format!("Could not link previous step '{previous}': {e}"),
                        ),
                    }
                }
                Some(node) => warn(
                    &mut warnings,
                    format!(
                        "Previous step '{previous}' is a {}, not a reasoning step; skipped",
                        node.kind()
                    ),
                ),
                None => warn(
                    &mut warnings,
                    format!("Previous step '{previous}' not found; skipped"),
                ),
            }
        }

        Ok(StepAdded {
            step,
            order,
            linked_references,
            linked_previous,
            warnings,
        })
    }
}

impl QueryEngine {
    /// A chain (or every chain matching some topics) with its ordered steps.
    pub fn reasoning_chain(
        &self,
        store: &dyn GraphStore,
        query: &ChainQuery,
    ) -> KgResult<GraphFragment> {
        let mut fragment = GraphFragment::new();
        match query {
            ChainQuery::Name(name) => {
                let chain = store.require_node(name)?;
                if chain.kind() != NodeKind::ReasoningChain {
                    return Err(not_a_chain(&chain));
                }
                expand_chain(store, chain, &mut fragment)?;
            }
            ChainQuery::Topics(topics) => {
                let mut seen = HashSet::new();
                for topic in topics {
                    let hits = self.search(store, topic, &[NodeKind::ReasoningChain], None)?;
                    for hit in hits {
                        if seen.insert(hit.node.name.clone()) {
                            expand_chain(store, hit.node, &mut fragment)?;
                        }
                    }
                }
            }
        }
        Ok(fragment)
    }
}

/// Append a chain, its steps in order and their step-level links to `fragment`.
fn expand_chain(store: &dyn GraphStore, chain: Node, fragment: &mut GraphFragment) -> KgResult<()> {
    let mut contains: Vec<Relation> = store
        .edges_from(&chain.name)?
        .into_iter()
        .filter(|e| e.relation_type == RelationType::ContainsStep)
        .collect();
    contains.sort_by_key(|e| e.order.unwrap_or(u32::MAX));

    let chain_name = chain.name.clone();
    fragment.push_node(chain);

    let mut steps = Vec::with_capacity(contains.len());
    for edge in contains {
        if let Some(step) = store.get_node(&edge.to)? {
            steps.push(step.name.clone());
            fragment.push_node(step);
            fragment.push_edge(edge);
        }
    }
    log::debug!("Chain '{chain_name}' has {} step(s)", steps.len());

    let step_set: HashSet<&str> = steps.iter().map(String::as_str).collect();
    for step in &steps {
        for edge in store.edges_from(step)? {
            match edge.relation_type {
                RelationType::LeadsTo if step_set.contains(edge.to.as_str()) => {
                    fragment.push_edge(edge);
                }
                RelationType::References => {
                    if let Some(target) = store.get_node(&edge.to)? {
                        fragment.push_node(target);
                        fragment.push_edge(edge);
                    }
                }
                _ => {}
            }
        }
    }
    Ok(())
}
