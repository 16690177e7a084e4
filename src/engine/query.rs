//! Query executor: search, exploration, path finding and validation.

use serde::Serialize;

use crate::config::EngineConfig;
use crate::graph::traversal::{dijkstra, weighted_dfs, ExpansionLimits, TraversalDirection};
use crate::graph::GraphStore;
use crate::types::{
    GraphFragment, KgError, KgResult, Node, NodeKind, Relation, RelationType, ScoredNode,
};

use super::provenance::{validate_node, ValidationReport};

/// Inclusion/exclusion of node kinds. Empty `include` means every kind.
#[derive(Debug, Clone, Default)]
pub struct KindFilter {
    pub include: Vec<NodeKind>,
    pub exclude: Vec<NodeKind>,
}

impl KindFilter {
    /// Build a filter from include and exclude lists.
    pub fn new(include: &[NodeKind], exclude: &[NodeKind]) -> Self {
        Self {
            include: include.to_vec(),
            exclude: exclude.to_vec(),
        }
    }

    /// Whether a node of this kind passes the filter.
    pub fn admits(&self, kind: NodeKind) -> bool {
        (self.include.is_empty() || self.include.contains(&kind)) && !self.exclude.contains(&kind)
    }
}

/// Parameters for context exploration.
#[derive(Debug, Clone, Default)]
pub struct ExploreParams {
    /// Seed names; each resolves by exact name, then by relevance search.
    pub seeds: Vec<String>,
    /// Maximum hops from a seed (config default when `None`).
    pub max_depth: Option<u32>,
    /// Edges lighter than this are ignored (config default when `None`).
    pub min_weight: Option<f32>,
    /// Only these kinds appear in the result. Empty = all kinds.
    pub include_kinds: Vec<NodeKind>,
    /// These kinds never appear in the result.
    pub exclude_kinds: Vec<NodeKind>,
    /// Maximum result nodes (config default when `None`).
    pub max_nodes: Option<usize>,
    /// Only follow these relation types. Empty = all types.
    pub relation_types: Vec<RelationType>,
    /// Which way edges are followed.
    pub direction: TraversalDirection,
}

impl ExploreParams {
    /// Explore around the given seeds with configured defaults.
    pub fn new<S: Into<String>>(seeds: impl IntoIterator<Item = S>) -> Self {
        Self {
            seeds: seeds.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// Parameters for a shortest-path query.
#[derive(Debug, Clone, Default)]
pub struct PathParams {
    pub from: String,
    pub to: String,
    /// Maximum edges on the path (config default when `None`).
    pub max_hops: Option<u32>,
    /// Every node on the path must be one of these kinds. Empty = all kinds.
    pub include_kinds: Vec<NodeKind>,
    /// Traverse path-bearing edges against their direction as well.
    pub bidirectional: bool,
}

/// Result of a shortest-path query. An empty fragment means no path.
#[derive(Debug, Clone, Serialize)]
pub struct PathResult {
    /// Path nodes in order, and the edges joining them.
    pub fragment: GraphFragment,
    /// Sum of `1/weight` over the path.
    pub total_cost: f32,
    /// Number of edges on the path.
    pub hops: usize,
}

impl PathResult {
    fn none() -> Self {
        Self {
            fragment: GraphFragment::new(),
            total_cost: 0.0,
            hops: 0,
        }
    }

    /// Whether a path was found.
    pub fn found(&self) -> bool {
        !self.fragment.is_empty()
    }
}

/// The query engine supports all read operations.
///
/// It holds only configuration; every call reads through the given store.
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    config: EngineConfig,
}

impl QueryEngine {
    /// Create a new query engine.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The configuration this engine runs with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve a name: exact match first, then the best relevance hit.
    pub fn resolve(&self, store: &dyn GraphStore, name: &str) -> KgResult<Option<Node>> {
        if let Some(node) = store.get_node(name)? {
            return Ok(Some(node));
        }
        let hit = store.find_nodes(name, &[], 1)?.into_iter().next();
        if let Some(hit) = &hit {
            log::debug!("Resolved '{}' to '{}' by relevance", name, hit.node.name);
        }
        Ok(hit.map(|h| h.node))
    }

    /// Relevance-ranked search, optionally restricted to some kinds.
    pub fn search(
        &self,
        store: &dyn GraphStore,
        query: &str,
        kinds: &[NodeKind],
        limit: Option<usize>,
    ) -> KgResult<Vec<ScoredNode>> {
        store.find_nodes(query, kinds, limit.unwrap_or(self.config.search_limit))
    }

    /// Cost-weighted neighbourhood exploration around a set of seeds.
    pub fn explore(
        &self,
        store: &dyn GraphStore,
        params: &ExploreParams,
    ) -> KgResult<GraphFragment> {
        let mut seeds = Vec::with_capacity(params.seeds.len());
        for seed in &params.seeds {
            match self.resolve(store, seed)? {
                Some(node) => seeds.push(node),
                None => log::warn!("Explore seed '{seed}' not found; skipped"),
            }
        }
        if seeds.is_empty() {
            return Err(KgError::NotFound(params.seeds.join(", ")));
        }

        let limits = ExpansionLimits {
            max_depth: params.max_depth.unwrap_or(self.config.default_max_depth),
            min_weight: params.min_weight.unwrap_or(self.config.default_min_weight),
            max_results: params.max_nodes.unwrap_or(self.config.default_max_nodes),
        };
        let kinds = KindFilter::new(&params.include_kinds, &params.exclude_kinds);
        let relation_types = &params.relation_types;

        let traversal = weighted_dfs(
            store,
            &seeds,
            params.direction,
            limits,
            &|edge: &Relation| {
                relation_types.is_empty() || relation_types.contains(&edge.relation_type)
            },
            &|node: &Node| kinds.admits(node.kind()),
        )?;

        Ok(GraphFragment {
            nodes: traversal.nodes,
            edges: traversal.edges,
        })
    }

    /// Cheapest path between two nodes over path-bearing relations.
    pub fn shortest_path(
        &self,
        store: &dyn GraphStore,
        params: &PathParams,
    ) -> KgResult<PathResult> {
        let from = store.require_node(&params.from)?;
        let to = store.require_node(&params.to)?;
        let kinds = KindFilter::new(&params.include_kinds, &[]);

        if from.name == to.name {
            if !kinds.admits(from.kind()) {
                return Ok(PathResult::none());
            }
            return Ok(PathResult {
                fragment: GraphFragment {
                    nodes: vec![from],
                    edges: Vec::new(),
                },
                total_cost: 0.0,
                hops: 0,
            });
        }

        let direction = if params.bidirectional {
            TraversalDirection::Both
        } else {
            TraversalDirection::Forward
        };
        let outcome = dijkstra(
            store,
            &from.name,
            &to.name,
            params.max_hops.unwrap_or(self.config.default_max_hops),
            direction,
            &|edge: &Relation| edge.relation_type.is_path_bearing(),
            &|node: &Node| kinds.admits(node.kind()),
        )?;

        let Some(outcome) = outcome else {
            return Ok(PathResult::none());
        };

        let mut fragment = GraphFragment::new();
        for name in &outcome.nodes {
            fragment.push_node(store.require_node(name)?);
        }
        let hops = outcome.edges.len();
        for edge in outcome.edges {
            fragment.push_edge(edge);
        }
        Ok(PathResult {
            fragment,
            total_cost: outcome.cost,
            hops,
        })
    }

    /// Provenance and confidence checks for one node. Never mutates.
    pub fn validate(&self, store: &dyn GraphStore, name: &str) -> KgResult<ValidationReport> {
        let node = store.require_node(name)?;
        validate_node(store, &node, self.config.candidate_threshold)
    }
}
