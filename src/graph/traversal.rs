//! Graph traversal algorithms: cost-weighted DFS expansion, hop-bounded Dijkstra
//! and breadth-first directional walks.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::types::{KgResult, Node, Relation, RelationKey};

use super::GraphStore;

/// Direction for graph traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalDirection {
    /// Follow outgoing edges (from -> to).
    Forward,
    /// Follow incoming edges (to <- from).
    Backward,
    /// Follow edges in both directions.
    #[default]
    Both,
}

impl TraversalDirection {
    /// Parse a direction from a string name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "forward" | "out" | "outgoing" => Some(Self::Forward),
            "backward" | "in" | "incoming" => Some(Self::Backward),
            "both" | "any" => Some(Self::Both),
            _ => None,
        }
    }
}

/// Edges leaving `name` in the given direction, paired with the node at the other end.
/// Outgoing edges come first, each group in insertion order.
pub fn neighbors(
    store: &dyn GraphStore,
    name: &str,
    direction: TraversalDirection,
) -> KgResult<Vec<(String, Relation)>> {
    let mut result = Vec::new();
    if direction != TraversalDirection::Backward {
        for edge in store.edges_from(name)? {
            result.push((edge.to.clone(), edge));
        }
    }
    if direction != TraversalDirection::Forward {
        for edge in store.edges_to(name)? {
            result.push((edge.from.clone(), edge));
        }
    }
    Ok(result)
}

/// Bounds for a weighted expansion.
#[derive(Debug, Clone, Copy)]
pub struct ExpansionLimits {
    /// Maximum hops from a seed.
    pub max_depth: u32,
    /// Edges lighter than this are never followed.
    pub min_weight: f32,
    /// Maximum number of result nodes.
    pub max_results: usize,
}

/// Outcome of a weighted expansion.
#[derive(Debug, Default)]
pub struct WeightedTraversal {
    /// Result nodes in visit order, seeds first.
    pub nodes: Vec<Node>,
    /// Edges examined during expansion whose endpoints are both result nodes.
    pub edges: Vec<Relation>,
    /// Hops from the seed each result node was reached at.
    pub depths: HashMap<String, u32>,
    /// Accumulated `1/weight` cost each result node was reached with.
    pub costs: HashMap<String, f32>,
}

/// Depth-first, cost-ordered expansion from a set of seed nodes.
///
/// Each node is visited at most once across all seeds. Among a node's
/// neighbours the cheapest edge (`1/weight`) is explored first; equal costs
/// keep edge insertion order. `include` decides which visited nodes enter the
/// result; excluded nodes are still expanded through. Seeds are always part
/// of the result.
pub fn weighted_dfs(
    store: &dyn GraphStore,
    seeds: &[Node],
    direction: TraversalDirection,
    limits: ExpansionLimits,
    edge_filter: &dyn Fn(&Relation) -> bool,
    include: &dyn Fn(&Node) -> bool,
) -> KgResult<WeightedTraversal> {
    let mut out = WeightedTraversal::default();
    let mut visited: HashSet<String> = HashSet::new();
    let mut examined: Vec<Relation> = Vec::new();
    let mut examined_keys: HashSet<RelationKey> = HashSet::new();

    for seed in seeds {
        if out.nodes.len() >= limits.max_results {
            break;
        }
        if visited.insert(seed.name.clone()) {
            out.depths.insert(seed.name.clone(), 0);
            out.costs.insert(seed.name.clone(), 0.0);
            out.nodes.push(seed.clone());
        }
    }

    // (name, depth, cost, already visited)
    let mut stack: Vec<(String, u32, f32, bool)> = out
        .nodes
        .iter()
        .rev()
        .map(|n| (n.name.clone(), 0, 0.0, true))
        .collect();

    'walk: while let Some((name, depth, cost, seen)) = stack.pop() {
        if !seen {
            if !visited.insert(name.clone()) {
                continue;
            }
            let Some(node) = store.get_node(&name)? else {
                continue;
            };
            if include(&node) {
                if out.nodes.len() >= limits.max_results {
                    break 'walk;
                }
                out.depths.insert(name.clone(), depth);
                out.costs.insert(name.clone(), cost);
                out.nodes.push(node);
                if out.nodes.len() >= limits.max_results {
                    break 'walk;
                }
            }
        }

        if depth >= limits.max_depth {
            continue;
        }

        let mut candidates: Vec<(String, f32)> = Vec::new();
        for (neighbor, edge) in neighbors(store, &name, direction)? {
            if !edge_filter(&edge) || edge.weight() < limits.min_weight {
                continue;
            }
            let Some(edge_cost) = edge.cost() else {
                continue;
            };
            if examined_keys.insert(edge.key()) {
                examined.push(edge);
            }
            if !visited.contains(&neighbor) {
                candidates.push((neighbor, edge_cost));
            }
        }

        // Stable: equal costs keep discovery order.
        candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        for (neighbor, edge_cost) in candidates.into_iter().rev() {
            stack.push((neighbor, depth + 1, cost + edge_cost, false));
        }
    }

    let in_result: HashSet<&str> = out.nodes.iter().map(|n| n.name.as_str()).collect();
    out.edges = examined
        .into_iter()
        .filter(|e| in_result.contains(e.from.as_str()) && in_result.contains(e.to.as_str()))
        .collect();
    Ok(out)
}

/// A cheapest path found by [`dijkstra`].
#[derive(Debug, Clone)]
pub struct PathOutcome {
    /// Node names from start to goal.
    pub nodes: Vec<String>,
    /// The edges along the path, in order.
    pub edges: Vec<Relation>,
    /// Sum of `1/weight` over the path.
    pub cost: f32,
}

struct Label {
    node: String,
    cost: f32,
    hops: u32,
    parent: Option<usize>,
    via: Option<Relation>,
}

/// Heap entry; ordering is reversed so BinaryHeap (max-heap) becomes a min-heap.
struct QueueEntry {
    cost: f32,
    seq: u64,
    label: usize,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Cheapest path from `start` to `goal` using at most `max_hops` edges.
///
/// Edge cost is `1/weight`. `admit` decides which nodes may appear on the
/// path (endpoints included); rejected nodes are never relaxed, so the search
/// continues through alternatives. A label is only expanded when it reaches
/// its node with fewer hops than any cheaper label did before it.
pub fn dijkstra(
    store: &dyn GraphStore,
    start: &str,
    goal: &str,
    max_hops: u32,
    direction: TraversalDirection,
    edge_filter: &dyn Fn(&Relation) -> bool,
    admit: &dyn Fn(&Node) -> bool,
) -> KgResult<Option<PathOutcome>> {
    let mut admitted: HashMap<String, bool> = HashMap::new();
    let mut is_admitted = |name: &str| -> KgResult<bool> {
        if let Some(&ok) = admitted.get(name) {
            return Ok(ok);
        }
        let ok = store.get_node(name)?.map(|n| admit(&n)).unwrap_or(false);
        admitted.insert(name.to_string(), ok);
        Ok(ok)
    };

    if !is_admitted(start)? || !is_admitted(goal)? {
        return Ok(None);
    }

    let mut labels: Vec<Label> = vec![Label {
        node: start.to_string(),
        cost: 0.0,
        hops: 0,
        parent: None,
        via: None,
    }];
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;
    heap.push(QueueEntry {
        cost: 0.0,
        seq,
        label: 0,
    });
    let mut best_hops: HashMap<String, u32> = HashMap::new();

    while let Some(entry) = heap.pop() {
        let idx = entry.label;
        let (node, cost, hops) = {
            let label = &labels[idx];
            (label.node.clone(), label.cost, label.hops)
        };

        if node == goal {
            return Ok(Some(reconstruct(&labels, idx)));
        }
        if best_hops.get(&node).is_some_and(|&h| hops >= h) {
            continue;
        }
        best_hops.insert(node.clone(), hops);
        if hops >= max_hops {
            continue;
        }

        for (neighbor, edge) in neighbors(store, &node, direction)? {
            if !edge_filter(&edge) {
                continue;
            }
            let Some(edge_cost) = edge.cost() else {
                continue;
            };
            if best_hops.get(&neighbor).is_some_and(|&h| hops + 1 >= h) {
                continue;
            }
            if !is_admitted(&neighbor)? {
                continue;
            }
            seq += 1;
            labels.push(Label {
                node: neighbor,
                cost: cost + edge_cost,
                hops: hops + 1,
                parent: Some(idx),
                via: Some(edge),
            });
            heap.push(QueueEntry {
                cost: cost + edge_cost,
                seq,
                label: labels.len() - 1,
            });
        }
    }

    Ok(None)
}

fn reconstruct(labels: &[Label], goal_idx: usize) -> PathOutcome {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut cursor = Some(goal_idx);
    while let Some(idx) = cursor {
        let label = &labels[idx];
        nodes.push(label.node.clone());
        if let Some(edge) = &label.via {
            edges.push(edge.clone());
        }
        cursor = label.parent;
    }
    nodes.reverse();
    edges.reverse();
    PathOutcome {
        nodes,
        edges,
        cost: labels[goal_idx].cost,
    }
}

/// Breadth-first walk from `start` where `step` picks, for each node, the
/// edges to follow and the node each leads to. Returns visited nodes (start
/// excluded) with their hop distance, in discovery order, plus the edges used.
pub fn bfs_walk(
    store: &dyn GraphStore,
    start: &str,
    max_candidates: usize,
    step: &dyn Fn(&dyn GraphStore, &str) -> KgResult<Vec<(String, Relation)>>,
) -> KgResult<(Vec<(String, u32)>, Vec<Relation>)> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut order: Vec<(String, u32)> = Vec::new();
    let mut edges: Vec<Relation> = Vec::new();
    let mut queue: VecDeque<(String, u32)> = VecDeque::new();

    visited.insert(start.to_string());
    queue.push_back((start.to_string(), 0));

    while let Some((current, depth)) = queue.pop_front() {
        if order.len() >= max_candidates {
            break;
        }
        for (next, edge) in step(store, &current)? {
            if order.len() >= max_candidates {
                break;
            }
            if !visited.insert(next.clone()) {
                continue;
            }
            order.push((next.clone(), depth + 1));
            edges.push(edge);
            queue.push_back((next, depth + 1));
        }
    }

    Ok((order, edges))
}
