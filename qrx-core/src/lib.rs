#![forbid(unsafe_code)]

pub mod error;
pub mod options;
pub mod stats;

pub mod util {
    pub mod crc32;
    pub mod hash_forward;
}

pub mod assemble;
pub mod codec;
pub mod detect;
pub mod frame;
pub mod pipeline;
pub mod scan;
pub mod session;

pub mod pack {
    pub mod writer;
}

// Re-exports: stable API surface
pub use assemble::{ChunkAssembler, InsertOutcome, Phase};
pub use detect::{Frame, FrameBuf, Region, detect_region};
pub use error::{FrameError, PipelineError, QrxError, Result};
pub use frame::{Chunk, DecodedSymbol, encode_chunk, parse_chunk};
pub use options::{DetectionParams, PackOptions, ScanOptions, SessionOptions};
pub use pack::writer::{pack_bytes, pack_file};
pub use pipeline::{ReconstructedArtifact, reconstruct};
pub use session::{FrameOutcome, Session, SessionStatus, SymbolDecoder, SymbolOutcome};
