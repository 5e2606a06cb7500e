use crate::error::FrameError;
use crate::util::crc32::crc32;
use tracing::warn;

pub const HEADER_LEN: usize = 8;
pub const CHECKSUM_LEN: usize = 4;
/// Smallest valid frame: header plus checksum, empty payload.
pub const MIN_FRAME_LEN: usize = HEADER_LEN + CHECKSUM_LEN;

/// One validated fragment of the transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    index: u32,
    declared_total: u32,
    payload: Vec<u8>,
    checksum: u32,
}

impl Chunk {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn declared_total(&self) -> u32 {
        self.declared_total
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

#[inline]
fn le32(x: &[u8]) -> u32 {
    u32::from_le_bytes([x[0], x[1], x[2], x[3]])
}

/// Validate framing and checksum of one decoded symbol.
///
/// Layout (little-endian): `[0..4]=declared_total`, `[4..8]=index`,
/// `[8..N-4]=payload`, `[N-4..N]=crc32(payload)`.
pub fn parse_chunk(bytes: &[u8]) -> Result<Chunk, FrameError> {
    if bytes.len() < MIN_FRAME_LEN {
        return Err(FrameError::TooShort { len: bytes.len() });
    }
    let declared_total = le32(&bytes[0..4]);
    let index = le32(&bytes[4..8]);
    let tail = bytes.len() - CHECKSUM_LEN;
    let payload = &bytes[HEADER_LEN..tail];
    let expected = le32(&bytes[tail..]);
    let computed = crc32(payload);
    if computed != expected {
        return Err(FrameError::ChecksumMismatch {
            index,
            expected,
            computed,
        });
    }
    Ok(Chunk {
        index,
        declared_total,
        payload: payload.to_vec(),
        checksum: expected,
    })
}

/// Parse, logging and discarding anything invalid.
pub fn parse_chunk_logged(bytes: &[u8]) -> Option<Chunk> {
    match parse_chunk(bytes) {
        Ok(c) => Some(c),
        Err(e) => {
            warn!(error = %e, "dropping invalid frame");
            None
        }
    }
}

/// Build the wire bytes for one chunk.
pub fn encode_chunk(declared_total: u32, index: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(MIN_FRAME_LEN + payload.len());
    out.extend_from_slice(&declared_total.to_le_bytes());
    out.extend_from_slice(&index.to_le_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(&crc32(payload).to_le_bytes());
    out
}
