//! File header for .akg snapshot files.

use std::io::{Read, Write};

use crate::types::error::{KgError, KgResult};
use crate::types::{AKG_MAGIC, FORMAT_VERSION};

/// Header of an .akg snapshot. Fixed size: 32 bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotHeader {
    /// Magic bytes: "AKGR".
    pub magic: [u8; 4],
    /// Format version (currently 1).
    pub version: u32,
    /// Number of nodes in the payload.
    pub node_count: u64,
    /// Number of edges in the payload.
    pub edge_count: u64,
    /// Length of the compressed payload following the header.
    pub payload_len: u64,
}

/// The fixed size of a SnapshotHeader on disk: 32 bytes.
pub const HEADER_SIZE: usize = 32;

impl SnapshotHeader {
    /// Create a header for a payload with the given counts.
    pub fn new(node_count: u64, edge_count: u64, payload_len: u64) -> Self {
        Self {
            magic: AKG_MAGIC,
            version: FORMAT_VERSION,
            node_count,
            edge_count,
            payload_len,
        }
    }

    /// Write this header. Writes exactly 32 bytes.
    ///
    /// Layout (all little-endian):
    /// - 0x00..0x04: magic
    /// - 0x04..0x08: version (u32)
    /// - 0x08..0x10: node_count (u64)
    /// - 0x10..0x18: edge_count (u64)
    /// - 0x18..0x20: payload_len (u64)
    pub fn write_to(&self, writer: &mut impl Write) -> KgResult<()> {
        writer.write_all(&self.magic)?;
        writer.write_all(&self.version.to_le_bytes())?;
        writer.write_all(&self.node_count.to_le_bytes())?;
        writer.write_all(&self.edge_count.to_le_bytes())?;
        writer.write_all(&self.payload_len.to_le_bytes())?;
        Ok(())
    }

    /// Read a header. Reads exactly 32 bytes.
    pub fn read_from(reader: &mut impl Read) -> KgResult<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        reader.read_exact(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                KgError::Truncated
            } else {
                KgError::Io(e)
            }
        })?;

        let magic = [buf[0], buf[1], buf[2], buf[3]];
        if magic != AKG_MAGIC {
            return Err(KgError::InvalidMagic);
        }

        let version = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        if version != FORMAT_VERSION {
            return Err(KgError::UnsupportedVersion(version));
        }

        Ok(Self {
            magic,
            version,
            node_count: read_u64(&buf[8..16]),
            edge_count: read_u64(&buf[16..24]),
            payload_len: read_u64(&buf[24..32]),
        })
    }
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(bytes);
    u64::from_le_bytes(word)
}
