//! Effective confidence from stored confidence, source reliability and conflicts.

use serde::Serialize;

use crate::graph::GraphStore;
use crate::types::{KgResult, Node, NodeKind, RelationType};

use super::conflict::{collect_conflicts, conflict_count, ConflictPair};
use super::QueryEngine;

/// A source backing a claim and how reliable it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReliability {
    pub source: String,
    pub reliability: f32,
}

/// How much a single node can be trusted.
#[derive(Debug, Clone, Serialize)]
pub struct ConfidenceReport {
    pub node: String,
    /// The confidence attribute as written, if any.
    pub stored_confidence: Option<f32>,
    pub effective_confidence: f32,
    pub sources: Vec<SourceReliability>,
    pub conflict_count: usize,
}

/// Which claims to assess.
#[derive(Debug, Clone)]
pub enum ClaimQuery {
    /// The top relevance hits for a query.
    Search { query: String, limit: Option<usize> },
    /// An explicit list of node names.
    Names(Vec<String>),
}

/// Per-node entry of a [`ClaimAssessment`].
#[derive(Debug, Clone, Serialize)]
pub struct NodeAssessment {
    pub kind: NodeKind,
    #[serde(flatten)]
    pub report: ConfidenceReport,
    /// Stored confidence below the candidate threshold.
    pub candidate: bool,
}

/// Confidence reports for a set of claims and the conflicts among them.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimAssessment {
    pub assessments: Vec<NodeAssessment>,
    pub conflicts: Vec<ConflictPair>,
    pub summary: String,
}

/// `base * support * (1 - penalty)^conflicts`, clamped to [0, 1].
///
/// `base` is the stored confidence (1.0 when absent) and `support` the mean
/// source reliability (1.0 with no sources).
pub fn combine_confidence(
    stored: Option<f32>,
    reliabilities: &[f32],
    conflicts: usize,
    penalty: f32,
) -> f32 {
    let base = stored.unwrap_or(1.0).clamp(0.0, 1.0);
    let support = if reliabilities.is_empty() {
        1.0
    } else {
        let sum: f32 = reliabilities.iter().map(|r| r.clamp(0.0, 1.0)).sum();
        sum / reliabilities.len() as f32
    };
    let damping = (1.0 - penalty.clamp(0.0, 1.0)).powi(conflicts as i32);
    (base * support * damping).clamp(0.0, 1.0)
}

/// Sources reached from `node` over outgoing DERIVED_FROM edges.
pub fn node_sources(store: &dyn GraphStore, node: &Node) -> KgResult<Vec<SourceReliability>> {
    let mut sources = Vec::new();
    for edge in store.edges_from(&node.name)? {
        if edge.relation_type != RelationType::DerivedFrom {
            continue;
        }
        let Some(target) = store.get_node(&edge.to)? else {
            continue;
        };
        if let Some(reliability) = target.reliability() {
            sources.push(SourceReliability {
                source: target.name,
                reliability,
            });
        }
    }
    Ok(sources)
}

impl QueryEngine {
    /// Confidence of one node adjusted for its sources and contradictions.
    pub fn effective_confidence(
        &self,
        store: &dyn GraphStore,
        name: &str,
    ) -> KgResult<ConfidenceReport> {
        let node = store.require_node(name)?;
        self.confidence_report(store, &node)
    }

    fn confidence_report(&self, store: &dyn GraphStore, node: &Node) -> KgResult<ConfidenceReport> {
        let sources = node_sources(store, node)?;
        let conflicts = conflict_count(store, &node.name)?;
        let reliabilities: Vec<f32> = sources.iter().map(|s| s.reliability).collect();
        let stored_confidence = node.confidence();
        Ok(ConfidenceReport {
            node: node.name.clone(),
            stored_confidence,
            effective_confidence: combine_confidence(
                stored_confidence,
                &reliabilities,
                conflicts,
                self.config().conflict_penalty,
            ),
            sources,
            conflict_count: conflicts,
        })
    }

    /// Assess a batch of claims: per-node confidence plus the conflicts among them.
    pub fn assess_claims(
        &self,
        store: &dyn GraphStore,
        query: &ClaimQuery,
    ) -> KgResult<ClaimAssessment> {
        let nodes: Vec<Node> = match query {
            ClaimQuery::Search { query, limit } => self
                .search(store, query, &[], *limit)?
                .into_iter()
                .map(|hit| hit.node)
                .collect(),
            ClaimQuery::Names(names) => {
                let mut found = Vec::with_capacity(names.len());
                for name in names {
                    match store.get_node(name)? {
                        Some(node) => found.push(node),
                        None => log::warn!("Claim '{name}' not found; skipped"),
                    }
                }
                found
            }
        };

        let threshold = self.config().candidate_threshold;
        let mut assessments = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let report = self.confidence_report(store, node)?;
            let candidate = report
                .stored_confidence
                .is_some_and(|c| c < threshold);
            assessments.push(NodeAssessment {
                kind: node.kind(),
                report,
                candidate,
            });
        }

        let scope: Vec<String> = nodes.iter().map(|n| n.name.clone()).collect();
        let conflicts = collect_conflicts(store, Some(scope.as_slice()))?;
        let summary = summarize(&assessments, conflicts.len());

        Ok(ClaimAssessment {
            assessments,
            conflicts,
            summary,
        })
    }
}

fn summarize(assessments: &[NodeAssessment], conflicts: usize) -> String {
    if assessments.is_empty() {
        return "No claims matched.".to_string();
    }
    let candidates = assessments.iter().filter(|a| a.candidate).count();
    let unsourced = assessments
        .iter()
        .filter(|a| a.report.sources.is_empty())
        .count();
    let mean: f32 = assessments
        .iter()
        .map(|a| a.report.effective_confidence)
        .sum::<f32>()
        / assessments.len() as f32;

    let mut summary = format!(
        "Assessed {} claim(s); mean effective confidence {:.2}.",
        assessments.len(),
        mean
    );
    if candidates > 0 {
        summary.push_str(&format!(" {candidates} candidate fact(s) below threshold."));
    }
    if unsourced > 0 {
        summary.push_str(&format!(" {unsourced} without sources."));
    }
    if conflicts > 0 {
        summary.push_str(&format!(" {conflicts} conflict(s) found."));
    }
    summary
}
