//! AgenticKnowledge: typed knowledge graph memory with a reasoning engine for AI agents.
//!
//! Nodes are named and typed (entities, events, propositions, thoughts, reasoning
//! chains, sources, ...) and joined by typed, weighted relations. The engines read and
//! write through any [`GraphStore`]: weighted exploration, shortest paths, temporal
//! sequencing, reasoning chains, conflict detection and confidence propagation.

pub mod cli;
pub mod config;
pub mod engine;
pub mod format;
pub mod graph;
pub mod index;
pub mod types;

// Re-export commonly used types at the crate root
pub use config::EngineConfig;
pub use engine::{
    ClaimAssessment, ClaimQuery, ConfidenceReport, ConflictPair, ExploreParams, PathParams,
    PathResult, QueryEngine, TemporalParams, TemporalSequence, ValidationReport, WriteEngine,
};
pub use format::{GraphDocument, SnapshotReader, SnapshotWriter};
pub use graph::{GraphBuilder, GraphStore, MemoryGraph, TraversalDirection};
pub use types::{
    now_micros, GraphFragment, KgError, KgResult, Node, NodeData, NodeKind, Relation,
    RelationType, ScoredNode,
};
