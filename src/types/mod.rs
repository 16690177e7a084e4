//! All data types for the knowledge graph library.

pub mod error;
pub mod fragment;
pub mod header;
pub mod node;
pub mod relation;

pub use error::{KgError, KgResult};
pub use fragment::{GraphFragment, ScoredNode};
pub use header::{SnapshotHeader, HEADER_SIZE};
pub use node::{
    AgentAttrs, AttributeAttrs, ConceptAttrs, EmotionAttrs, EmotionalEventAttrs, EntityAttrs,
    EventAttrs, LawAttrs, LocationAttrs, Node, NodeData, NodeKind, PropositionAttrs,
    ReasoningChainAttrs, ReasoningStepAttrs, ScientificInsightAttrs, SourceAttrs, SourceType,
    StepType, ThoughtAttrs,
};
pub use relation::{Relation, RelationCategory, RelationKey, RelationType, TemporalOrientation};

/// Magic bytes at the start of every .akg snapshot.
pub const AKG_MAGIC: [u8; 4] = [0x41, 0x4B, 0x47, 0x52]; // "AKGR"

/// Current snapshot format version.
pub const FORMAT_VERSION: u32 = 1;

/// Weight of an edge that does not specify one.
pub const DEFAULT_EDGE_WEIGHT: f32 = 0.5;

/// Reliability of a Source that does not specify one.
pub const DEFAULT_RELIABILITY: f32 = 1.0;

/// Returns the current time as Unix epoch microseconds.
pub fn now_micros() -> u64 {
    chrono::Utc::now().timestamp_micros() as u64
}
