//! FAISS flat index reader
//!
//! Layout written by `faiss.write_index` for `IndexFlatL2` (little-endian):
//!
//! ```text
//! fourcc   "IxF2" (or "IxFl" with an L2 metric)
//! d        i32
//! ntotal   i64
//! dummy    i64 x2
//! trained  u8
//! metric   i32    (+ f32 metric_arg when metric > 1)
//! count    u64    number of floats that follow, d * ntotal
//! codes    f32 x count
//! ```

use super::{FlatIndex, VectorIndex};
use crate::error::{RagError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const FOURCC_FLAT_L2: &[u8; 4] = b"IxF2";
const FOURCC_FLAT_IP: &[u8; 4] = b"IxFI";
const FOURCC_FLAT: &[u8; 4] = b"IxFl";

const METRIC_INNER_PRODUCT: i32 = 0;
const METRIC_L2: i32 = 1;

/// Upper bound FAISS itself enforces on vector sizes
const MAX_CODE_FLOATS: u64 = 1 << 40;

/// Read a FAISS flat L2 index file
pub fn read_index(path: &Path) -> Result<FlatIndex> {
    let file = File::open(path).map_err(|e| RagError::resource(path, e.to_string()))?;
    let mut reader = BufReader::new(file);

    let index = read_index_from(&mut reader).map_err(|reason| RagError::resource(path, reason))?;

    log::info!(
        "Loaded FAISS index from {} ({} vectors, {}d)",
        path.display(),
        index.len(),
        index.dimension()
    );

    Ok(index)
}

/// Parse a FAISS flat index from any reader
///
/// Errors are plain descriptions; callers attach the file path.
pub fn read_index_from<R: Read>(reader: &mut R) -> std::result::Result<FlatIndex, String> {
    let fourcc = read_array::<4, _>(reader)?;
    if &fourcc == FOURCC_FLAT_IP {
        return Err("inner-product indexes are not supported, rebuild with IndexFlatL2".into());
    }
    if &fourcc != FOURCC_FLAT_L2 && &fourcc != FOURCC_FLAT {
        return Err(format!(
            "unsupported index type {:?}, expected a flat L2 index",
            String::from_utf8_lossy(&fourcc)
        ));
    }

    let d = i32::from_le_bytes(read_array(reader)?);
    let ntotal = i64::from_le_bytes(read_array(reader)?);
    let _ = read_array::<8, _>(reader)?;
    let _ = read_array::<8, _>(reader)?;
    let _is_trained = read_array::<1, _>(reader)?;
    let metric = i32::from_le_bytes(read_array(reader)?);
    if metric > 1 {
        let _metric_arg = read_array::<4, _>(reader)?;
    }

    if metric == METRIC_INNER_PRODUCT {
        return Err("inner-product metric is not supported, rebuild with IndexFlatL2".into());
    }
    if metric != METRIC_L2 {
        return Err(format!("unsupported metric type {}", metric));
    }
    if d <= 0 {
        return Err(format!("invalid dimension {}", d));
    }
    if ntotal < 0 {
        return Err(format!("invalid vector count {}", ntotal));
    }

    let count = u64::from_le_bytes(read_array(reader)?);
    if count >= MAX_CODE_FLOATS {
        return Err(format!("code vector too large ({} floats)", count));
    }
    let expected = (d as u64)
        .checked_mul(ntotal as u64)
        .ok_or_else(|| "vector table size overflows".to_string())?;
    if count != expected {
        return Err(format!(
            "header declares {} vectors of {}d but file holds {} floats",
            ntotal, d, count
        ));
    }

    // The header count is untrusted; only buffer bytes that are present
    let byte_len = count * 4;
    let mut bytes = Vec::new();
    reader
        .by_ref()
        .take(byte_len)
        .read_to_end(&mut bytes)
        .map_err(|e| format!("failed to read vector data: {}", e))?;
    if bytes.len() as u64 != byte_len {
        return Err(format!(
            "truncated vector data: expected {} bytes, found {}",
            byte_len,
            bytes.len()
        ));
    }

    let vectors = bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    FlatIndex::new(d as usize, vectors).map_err(|e| e.to_string())
}

fn read_array<const N: usize, R: Read>(reader: &mut R) -> std::result::Result<[u8; N], String> {
    let mut buf = [0u8; N];
    reader
        .read_exact(&mut buf)
        .map_err(|e| format!("truncated header: {}", e))?;
    Ok(buf)
}
