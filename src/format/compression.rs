//! LZ4 payload compression/decompression.

use crate::types::error::{KgError, KgResult};

/// Compress payload bytes with LZ4 (prepend size for decompression).
pub fn compress_payload(payload: &[u8]) -> Vec<u8> {
    lz4_flex::compress_prepend_size(payload)
}

/// Upper bound on the LZ4 block expansion ratio.
const MAX_EXPANSION: usize = 255;

/// Decompress LZ4-compressed payload bytes.
///
/// The prepended size is checked against what `data` could possibly expand
/// to before anything is allocated.
pub fn decompress_payload(data: &[u8]) -> KgResult<Vec<u8>> {
    let Some(prefix) = data.get(..4) else {
        return Err(KgError::Compression("payload shorter than its size prefix".into()));
    };
    let declared = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
    let limit = (data.len() - 4).saturating_mul(MAX_EXPANSION);
    if declared > limit {
        return Err(KgError::Compression(format!(
            "declared size {declared} exceeds the {limit} bytes a {}-byte block can hold",
            data.len() - 4
        )));
    }
    lz4_flex::decompress_size_prepended(data).map_err(|e| KgError::Compression(e.to_string()))
}
