//! Writes .akg snapshots from an in-memory graph.

use std::io::Write;
use std::path::Path;

use crate::graph::MemoryGraph;
use crate::types::error::KgResult;
use crate::types::header::SnapshotHeader;

use super::compression::compress_payload;
use super::GraphDocument;

/// Writer for .akg snapshot files.
#[derive(Debug, Default)]
pub struct SnapshotWriter;

impl SnapshotWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self
    }

    /// Write a complete MemoryGraph to an .akg file, creating parent directories.
    pub fn write_to_file(&self, graph: &MemoryGraph, path: &Path) -> KgResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        self.write_to(graph, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write a complete MemoryGraph to any writer.
    pub fn write_to(&self, graph: &MemoryGraph, writer: &mut impl Write) -> KgResult<()> {
        let document = GraphDocument {
            nodes: graph.nodes()?,
            edges: graph.edges()?,
        };
        let json = serde_json::to_vec(&document)?;
        let payload = compress_payload(&json);

        let header = SnapshotHeader::new(
            document.nodes.len() as u64,
            document.edges.len() as u64,
            payload.len() as u64,
        );
        header.write_to(writer)?;
        writer.write_all(&payload)?;
        log::debug!(
            "Wrote snapshot: {} nodes, {} edges, {} payload bytes",
            header.node_count,
            header.edge_count,
            header.payload_len
        );
        Ok(())
    }
}
