//! Provenance and confidence checks for knowledge nodes.

use std::fmt;

use serde::Serialize;

use crate::graph::GraphStore;
use crate::types::{KgError, KgResult, Node, NodeKind, RelationType};

/// One problem found by [`validate_node`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// The kind needs a derivation edge to a Source and has none.
    MissingProvenance { relation: RelationType },
    /// Stored confidence is below the candidate threshold.
    CandidateFact { confidence: f32, threshold: f32 },
    /// Stored confidence lies outside [0, 1].
    ConfidenceOutOfRange { confidence: f32 },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingProvenance { relation } => {
                write!(f, "missing {relation} relation to a source")
            }
            Self::CandidateFact {
                confidence,
                threshold,
            } => write!(
                f,
                "confidence {confidence} is below {threshold}; candidate fact"
            ),
            Self::ConfidenceOutOfRange { confidence } => {
                write!(f, "confidence {confidence} is outside [0, 1]")
            }
        }
    }
}

/// Outcome of validating one node. `valid` iff `issues` is empty.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub node: String,
    pub kind: NodeKind,
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Turn a report with issues into `ValidationFailed`.
    pub fn into_result(self) -> KgResult<Self> {
        if self.valid {
            return Ok(self);
        }
        Err(KgError::ValidationFailed {
            node: self.node,
            issues: self.issues.iter().map(ToString::to_string).collect(),
        })
    }
}

/// Whether `node` has an outgoing DERIVED_FROM edge that ends at a Source.
pub fn has_provenance(store: &dyn GraphStore, node: &Node) -> KgResult<bool> {
    for edge in store.edges_from(&node.name)? {
        if edge.relation_type != RelationType::DerivedFrom {
            continue;
        }
        if let Some(target) = store.get_node(&edge.to)? {
            if target.kind() == NodeKind::Source {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Check provenance for kinds that require it, then the confidence value.
pub fn validate_node(
    store: &dyn GraphStore,
    node: &Node,
    candidate_threshold: f32,
) -> KgResult<ValidationReport> {
    let mut issues = Vec::new();

    if node.kind().requires_provenance() && !has_provenance(store, node)? {
        issues.push(ValidationIssue::MissingProvenance {
            relation: RelationType::DerivedFrom,
        });
    }

    if let Some(confidence) = node.confidence() {
        if !(0.0..=1.0).contains(&confidence) {
            issues.push(ValidationIssue::ConfidenceOutOfRange { confidence });
        }
        if confidence < candidate_threshold {
            issues.push(ValidationIssue::CandidateFact {
                confidence,
                threshold: candidate_threshold,
            });
        }
    }

    Ok(ValidationReport {
        node: node.name.clone(),
        kind: node.kind(),
        valid: issues.is_empty(),
        issues,
    })
}
