//! Error types for the knowledge graph library.

use thiserror::Error;

/// All errors that can occur in the knowledge graph library.
#[derive(Error, Debug)]
pub enum KgError {
    /// A referenced node, chain or step does not exist.
    #[error("Node '{0}' not found")]
    NotFound(String),

    /// Provenance or confidence issues, when a caller treats them as blocking.
    #[error("Validation failed for '{node}': {}", issues.join("; "))]
    ValidationFailed { node: String, issues: Vec<String> },

    /// An edge endpoint does not have the kind its relation type requires.
    #[error("{relation} expects {expected} at '{node}', found {found}")]
    TypeMismatch {
        relation: String,
        node: String,
        expected: String,
        found: String,
    },

    /// Node names must be non-empty.
    #[error("Invalid node name: {0:?}")]
    InvalidName(String),

    /// Confidence value out of valid range.
    #[error("Confidence value out of range [0.0, 1.0]: {0}")]
    InvalidConfidence(f32),

    /// Weight value out of valid range.
    #[error("Weight value out of range [0.0, 1.0]: {0}")]
    InvalidWeight(f32),

    /// One or more items of a batch write failed.
    #[error("{failed} of {requested} batch items failed")]
    PartialBatchFailure { requested: usize, failed: usize },

    /// The graph store cannot serve the request.
    #[error("Graph store unavailable: {0}")]
    BackendUnavailable(String),

    /// Configuration could not be loaded or is out of range.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Compression error.
    #[error("Compression error: {0}")]
    Compression(String),

    /// Invalid magic bytes in snapshot header.
    #[error("Invalid magic bytes in snapshot header")]
    InvalidMagic,

    /// Unsupported snapshot version.
    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),

    /// Snapshot is empty or truncated.
    #[error("Snapshot is empty or truncated")]
    Truncated,
}

/// Convenience result type for knowledge graph operations.
pub type KgResult<T> = Result<T, KgError>;
