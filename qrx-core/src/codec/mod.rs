use crate::error::Result;
use std::io::{Read, Write};
use tracing::debug;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CodecId {
    RawDeflate = 0,
    Zlib = 1,
}

pub trait Compressor: Send + Sync {
    fn id(&self) -> CodecId;
    fn compress(&self, src: &mut dyn Read, dst: &mut dyn Write, level: u32) -> Result<u64>;
    fn decompress(&self, src: &mut dyn Read, dst: &mut dyn Write) -> Result<u64>;
}

pub mod deflate;
pub mod zlib;

/// Pick the codec for a compressed blob: a valid zlib header selects zlib,
/// anything else is taken as a bare deflate stream.
pub fn detect(bytes: &[u8]) -> CodecId {
    match bytes {
        [cmf, flg, ..] if cmf & 0x0F == 8 && (u16::from(*cmf) << 8 | u16::from(*flg)) % 31 == 0 => {
            CodecId::Zlib
        }
        _ => CodecId::RawDeflate,
    }
}

pub fn for_id(id: CodecId) -> &'static dyn Compressor {
    match id {
        CodecId::RawDeflate => &deflate::RawDeflate,
        CodecId::Zlib => &zlib::Zlib,
    }
}

/// Decompress a blob in memory, auto-detecting the wrapper.
pub fn inflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let codec = for_id(detect(bytes));
    debug!(codec = ?codec.id(), bytes = bytes.len(), "inflating");
    let mut out = Vec::with_capacity(bytes.len() * 4);
    codec.decompress(&mut &bytes[..], &mut out)?;
    Ok(out)
}
