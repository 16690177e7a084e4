//! Direction-aware temporal sequencing.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::graph::traversal::{bfs_walk, TraversalDirection};
use crate::graph::GraphStore;
use crate::types::{
    GraphFragment, KgError, KgResult, Node, NodeKind, Relation, ScoredNode, TemporalOrientation,
};

use super::QueryEngine;

/// Parameters for a temporal sequence query.
#[derive(Debug, Clone, Default)]
pub struct TemporalParams {
    /// Start node; exact name, then relevance search.
    pub start: String,
    /// Forward, backward or both ways in time.
    pub direction: TraversalDirection,
    /// Maximum nodes returned, start included (config default when `None`).
    pub max_events: Option<usize>,
    /// Only these kinds are returned after the start node. Empty = all kinds.
    pub kinds: Vec<NodeKind>,
}

/// Where a sequence's nodes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceOrigin {
    /// Walked over temporal relations.
    Relations,
    /// No temporal relations; similar nodes ordered by their timestamps.
    Similarity,
}

/// A temporal sequence: the start node first, then events in walk or time order.
#[derive(Debug, Clone, Serialize)]
pub struct TemporalSequence {
    pub fragment: GraphFragment,
    pub origin: SequenceOrigin,
}

/// Temporal edges at `name` to follow in `direction`, paired with the node they lead to.
pub fn temporal_steps(
    store: &dyn GraphStore,
    name: &str,
    direction: TraversalDirection,
) -> KgResult<Vec<(String, Relation)>> {
    let forward = direction != TraversalDirection::Backward;
    let backward = direction != TraversalDirection::Forward;
    let mut steps = Vec::new();

    for edge in store.edges_from(name)? {
        let follow = match edge.relation_type.temporal_orientation() {
            Some(TemporalOrientation::Forward) => forward,
            Some(TemporalOrientation::Backward) => backward,
            None => false,
        };
        if follow {
            steps.push((edge.to.clone(), edge));
        }
    }
    // Incoming edges read the other way: X -PREVIOUS-> start puts X after start.
    for edge in store.edges_to(name)? {
        let follow = match edge.relation_type.temporal_orientation() {
            Some(TemporalOrientation::Backward) => forward,
            Some(TemporalOrientation::Forward) => backward,
            None => false,
        };
        if follow {
            steps.push((edge.from.clone(), edge));
        }
    }
    Ok(steps)
}

/// Parse a time key; RFC 3339, ISO date-time, ISO date or bare year.
pub fn parse_time_key(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(year) = raw.parse::<i32>() {
        return NaiveDate::from_ymd_opt(year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
    }
    None
}

/// Chronological order of two time keys. Unparsable keys sort after parsable
/// ones, and among themselves by text.
pub fn compare_time_keys(a: &str, b: &str) -> Ordering {
    match (parse_time_key(a), parse_time_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

impl QueryEngine {
    /// Events before and/or after a start node.
    ///
    /// Walks temporal relations breadth-first. When the start has none in the
    /// requested direction, similar timestamped nodes are ordered
    /// chronologically instead.
    pub fn temporal_sequence(
        &self,
        store: &dyn GraphStore,
        params: &TemporalParams,
    ) -> KgResult<TemporalSequence> {
        let start = self
            .resolve(store, &params.start)?
            .ok_or_else(|| KgError::NotFound(params.start.clone()))?;
        let max_events = params
            .max_events
            .unwrap_or(self.config().default_max_events);
        let cap = self.config().temporal_candidate_cap;
        let direction = params.direction;
        let admits = |node: &Node| params.kinds.is_empty() || params.kinds.contains(&node.kind());

        let mut fragment = GraphFragment::new();
        fragment.push_node(start.clone());
        if max_events <= 1 {
            let origin = SequenceOrigin::Relations;
            return Ok(TemporalSequence { fragment, origin });
        }

        if temporal_steps(store, &start.name, direction)?.is_empty() {
            let candidates = self.similarity_candidates(store, &start, direction)?;
            for candidate in candidates {
                if fragment.nodes.len() >= max_events {
                    break;
                }
                if admits(&candidate.node) {
                    fragment.push_node(candidate.node);
                }
            }
            log::info!(
                "No temporal relations at '{}'; ordered {} similar node(s) by time",
                start.name,
                fragment.nodes.len() - 1
            );
            return Ok(TemporalSequence {
                fragment,
                origin: SequenceOrigin::Similarity,
            });
        }

        let step = |s: &dyn GraphStore, name: &str| temporal_steps(s, name, direction);
        let (found, edges) = bfs_walk(store, &start.name, cap, &step)?;
        for (name, _depth) in found {
            if fragment.nodes.len() >= max_events {
                break;
            }
            if let Some(node) = store.get_node(&name)? {
                if admits(&node) {
                    fragment.push_node(node);
                }
            }
        }

        let kept: HashSet<String> = fragment.nodes.iter().map(|n| n.name.clone()).collect();
        for edge in edges {
            if kept.contains(&edge.from) && kept.contains(&edge.to) {
                fragment.push_edge(edge);
            }
        }

        Ok(TemporalSequence {
            fragment,
            origin: SequenceOrigin::Relations,
        })
    }

    /// Similar nodes that carry a time key, in chronological order for the
    /// direction, capped before any kind filtering.
    fn similarity_candidates(
        &self,
        store: &dyn GraphStore,
        start: &Node,
        direction: TraversalDirection,
    ) -> KgResult<Vec<ScoredNode>> {
        let mut candidates: Vec<ScoredNode> = store
            .similar_nodes(&start.name, self.config().fallback_similarity_limit)?
            .into_iter()
            .filter(|c| c.node.time_key().is_some())
            .take(self.config().temporal_candidate_cap)
            .collect();

        let descending = direction == TraversalDirection::Backward;
        candidates.sort_by(|a, b| {
            let (ka, kb) = (a.node.time_key().unwrap_or(""), b.node.time_key().unwrap_or(""));
            let by_time = compare_time_keys(ka, kb);
            let by_time = if descending { by_time.reverse() } else { by_time };
            by_time.then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
        });
        Ok(candidates)
    }
}
