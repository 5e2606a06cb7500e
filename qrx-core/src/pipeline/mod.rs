pub mod artifact;
pub mod container;

pub use artifact::ReconstructedArtifact;

use crate::assemble::ChunkAssembler;
use crate::codec;
use crate::error::PipelineError;
use tracing::info;

/// Concatenate payloads for indices `0..total`, in index order.
pub fn concat_in_order(assembler: &ChunkAssembler) -> Result<Vec<u8>, PipelineError> {
    let total = assembler.total().ok_or(PipelineError::Incomplete)?;
    if !assembler.is_complete() {
        return Err(PipelineError::Incomplete);
    }
    let mut joined = Vec::new();
    for i in 0..total {
        let part = assembler.payload(i).ok_or(PipelineError::MissingChunk(i))?;
        joined.extend_from_slice(part);
    }
    Ok(joined)
}

/// Turn a complete chunk set back into the transferred file:
/// concatenate, decompress, unpack, keep the first archive entry.
pub fn reconstruct(assembler: &ChunkAssembler) -> Result<ReconstructedArtifact, PipelineError> {
    let joined = concat_in_order(assembler)?;
    info!(bytes = joined.len(), "reconstructing file from chunks");

    let archive = codec::inflate(&joined).map_err(|e| PipelineError::Decompression(e.to_string()))?;
    info!(bytes = archive.len(), "decompressed archive");

    let (name, bytes) = container::first_entry(&archive)?;
    info!(name = %name, bytes = bytes.len(), "extracted first archive entry");
    Ok(ReconstructedArtifact::new(name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{encode_chunk, parse_chunk};

    fn feed(a: &mut ChunkAssembler, total: u32, parts: &[(u32, &[u8])]) {
        for (i, p) in parts {
            a.insert(parse_chunk(&encode_chunk(total, *i, p)).unwrap());
        }
    }

    #[test]
    fn concatenates_by_index_not_arrival() {
        let mut a = ChunkAssembler::default();
        feed(&mut a, 3, &[(2, &b"C"[..]), (0, &b"A"[..]), (1, &b"B"[..])]);
        assert_eq!(concat_in_order(&a).unwrap(), b"ABC");
    }

    #[test]
    fn incomplete_set_is_refused() {
        let mut a = ChunkAssembler::default();
        assert_eq!(concat_in_order(&a), Err(PipelineError::Incomplete));
        feed(&mut a, 2, &[(0, &b"A"[..])]);
        assert_eq!(reconstruct(&a), Err(PipelineError::Incomplete));
    }

    #[test]
    fn undecodable_payload_fails_at_decompress() {
        let mut a = ChunkAssembler::default();
        feed(&mut a, 1, &[(0, &[0xFFu8, 0xFF, 0xFF][..])]);
        let err = reconstruct(&a).unwrap_err();
        assert_eq!(err.stage(), "decompress");
    }

    #[test]
    fn non_archive_fails_at_unpack() {
        let mut blob = Vec::new();
        codec::for_id(codec::CodecId::Zlib)
            .compress(&mut &b"plain text, no archive"[..], &mut blob, 6)
            .unwrap();
        let mut a = ChunkAssembler::default();
        feed(&mut a, 1, &[(0, &blob[..])]);
        let err = reconstruct(&a).unwrap_err();
        assert!(matches!(err, PipelineError::Container(_)));
        assert_eq!(err.stage(), "unpack");
    }
}
