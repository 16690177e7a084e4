//! Reads .akg snapshots into an in-memory graph.

use std::io::Read;
use std::path::Path;

use crate::graph::MemoryGraph;
use crate::types::error::{KgError, KgResult};
use crate::types::header::{SnapshotHeader, HEADER_SIZE};

use super::compression::decompress_payload;
use super::GraphDocument;

/// Reader for .akg snapshot files.
pub struct SnapshotReader;

impl SnapshotReader {
    /// Read an .akg file into a MemoryGraph.
    pub fn read_from_file(path: &Path) -> KgResult<MemoryGraph> {
        let data = std::fs::read(path)?;
        let mut cursor = std::io::Cursor::new(data);
        Self::read_from(&mut cursor)
    }

    /// Read from any reader into a MemoryGraph.
    pub fn read_from(reader: &mut impl Read) -> KgResult<MemoryGraph> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        if data.len() < HEADER_SIZE {
            return Err(KgError::Truncated);
        }
        let header = SnapshotHeader::read_from(&mut std::io::Cursor::new(&data[..HEADER_SIZE]))?;

        let payload_end = HEADER_SIZE
            .checked_add(header.payload_len as usize)
            .ok_or(KgError::Truncated)?;
        if payload_end > data.len() {
            return Err(KgError::Truncated);
        }

        let json = decompress_payload(&data[HEADER_SIZE..payload_end])?;
        let document: GraphDocument = serde_json::from_slice(&json)?;

        if document.nodes.len() as u64 != header.node_count
            || document.edges.len() as u64 != header.edge_count
        {
            return Err(KgError::Compression(format!(
                "payload holds {} nodes and {} edges, header says {} and {}",
                document.nodes.len(),
                document.edges.len(),
                header.node_count,
                header.edge_count
            )));
        }

        MemoryGraph::from_parts(document.nodes, document.edges)
    }
}
