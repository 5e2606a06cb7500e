use super::{CodecId, Compressor};
use crate::error::Result;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use std::io::{Read, Write};

pub struct Zlib;

impl Compressor for Zlib {
    fn id(&self) -> CodecId {
        CodecId::Zlib
    }

    fn compress(&self, src: &mut dyn Read, dst: &mut dyn Write, level: u32) -> Result<u64> {
        let mut enc = ZlibEncoder::new(dst, Compression::new(level.min(9)));
        let written_uncompressed = std::io::copy(src, &mut enc)?;
        enc.finish()?;
        Ok(written_uncompressed)
    }

    fn decompress(&self, src: &mut dyn Read, dst: &mut dyn Write) -> Result<u64> {
        let mut dec = ZlibDecoder::new(src);
        let written_uncompressed = std::io::copy(&mut dec, dst)?;
        Ok(written_uncompressed)
    }
}
