use super::{CodecId, Compressor};
use crate::error::Result;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use std::io::{Read, Write};

/// Bare deflate stream, no header or trailer.
pub struct RawDeflate;

impl Compressor for RawDeflate {
    fn id(&self) -> CodecId {
        CodecId::RawDeflate
    }

    fn compress(&self, src: &mut dyn Read, dst: &mut dyn Write, level: u32) -> Result<u64> {
        let mut enc = DeflateEncoder::new(dst, Compression::new(level.min(9)));
        let written_uncompressed = std::io::copy(src, &mut enc)?;
        enc.finish()?;
        Ok(written_uncompressed)
    }

    fn decompress(&self, src: &mut dyn Read, dst: &mut dyn Write) -> Result<u64> {
        let mut dec = DeflateDecoder::new(src);
        let written_uncompressed = std::io::copy(&mut dec, dst)?;
        Ok(written_uncompressed)
    }
}
