//! Snapshot file I/O for .akg files.
//!
//! A snapshot is a 32-byte [`SnapshotHeader`](crate::types::SnapshotHeader)
//! followed by the LZ4-compressed JSON encoding of every node and edge.

pub mod compression;
pub mod reader;
pub mod writer;

use serde::{Deserialize, Serialize};

use crate::types::{Node, Relation};

pub use reader::SnapshotReader;
pub use writer::SnapshotWriter;

/// The decoded body of a snapshot, also the JSON import/export document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Relation>,
}
