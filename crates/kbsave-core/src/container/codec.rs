//! `slcb` payload container
//!
//! ```text
//! offset  size  field
//! 0       4     magic "slcb"
//! 4       4     decompressed length (u32 LE)
//! 8       4     compressed length (u32 LE)
//! 12      N     zlib stream
//! ```

use std::io::Read;

use flate2::read::ZlibDecoder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::scan::utils::read_u32_le;

/// Container magic
pub const MAGIC: [u8; 4] = *b"slcb";
/// Header size preceding the zlib stream
pub const HEADER_SIZE: usize = 12;

const MAX_PREALLOC: usize = 64 * 1024 * 1024;

/// Parsed container header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub decompressed_len: usize,
    pub compressed_len: usize,
}

impl ContainerHeader {
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < HEADER_SIZE {
            return Err(Error::TruncatedContainer {
                needed: HEADER_SIZE,
                actual: buffer.len(),
            });
        }

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&buffer[0..4]);
        if magic != MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let decompressed_len = read_u32_le(buffer, 4).unwrap_or(0) as usize;
        let compressed_len = read_u32_le(buffer, 8).unwrap_or(0) as usize;

        Ok(Self {
            decompressed_len,
            compressed_len,
        })
    }
}

/// Validate and inflate a container into the raw save blob
pub fn decode(buffer: &[u8]) -> Result<Vec<u8>> {
    let header = ContainerHeader::parse(buffer)?;

    let end = HEADER_SIZE + header.compressed_len;
    if end > buffer.len() {
        return Err(Error::TruncatedContainer {
            needed: end,
            actual: buffer.len(),
        });
    }

    // One byte past the declared length is enough to detect an overrun
    let limit = header.decompressed_len as u64 + 1;
    let mut decoder = ZlibDecoder::new(&buffer[HEADER_SIZE..end]).take(limit);
    let mut data = Vec::with_capacity(header.decompressed_len.min(MAX_PREALLOC));
    decoder
        .read_to_end(&mut data)
        .map_err(|e| Error::Decompress(e.to_string()))?;

    if data.len() != header.decompressed_len {
        return Err(Error::SizeMismatch {
            expected: header.decompressed_len,
            actual: data.len(),
        });
    }

    debug!(
        "Decoded container: {} -> {} bytes",
        header.compressed_len,
        data.len()
    );
    Ok(data)
}

/// Build a container around `data`.
///
/// The decoder never needs this; it exists so tests and tools can produce
/// well-formed payloads.
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;

    let mut out = Vec::with_capacity(HEADER_SIZE + compressed.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
    out.extend_from_slice(&compressed);
    Ok(out)
}
