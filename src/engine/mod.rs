//! High-level operations: write engine and query engine.
//!
//! Both engines are stateless apart from configuration and operate on any
//! [`GraphStore`](crate::graph::GraphStore).

pub mod confidence;
pub mod conflict;
pub mod provenance;
pub mod query;
pub mod reasoning;
pub mod temporal;
pub mod write;

pub use confidence::{
    combine_confidence, ClaimAssessment, ClaimQuery, ConfidenceReport, NodeAssessment,
    SourceReliability,
};
pub use conflict::{ConflictPair, ConflictType};
pub use provenance::{ValidationIssue, ValidationReport};
pub use query::{ExploreParams, KindFilter, PathParams, PathResult, QueryEngine};
pub use reasoning::{ChainCreated, ChainQuery, ChainSpec, StepAdded, StepSpec};
pub use temporal::{SequenceOrigin, TemporalParams, TemporalSequence};
pub use write::{BatchFailure, BatchResult, SourceSpec, SourcesAdded, WriteEngine};
