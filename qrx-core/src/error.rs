use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Why a single decoded symbol was not accepted as a chunk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame too short: {len} bytes (minimum 12)")]
    TooShort { len: usize },

    #[error("checksum mismatch for chunk {index}: expected {expected:#010x}, got {computed:#010x}")]
    ChecksumMismatch {
        index: u32,
        expected: u32,
        computed: u32,
    },
}

/// Terminal failures of the reconstruction pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("assembly is not complete")]
    Incomplete,

    #[error("missing chunk {0}")]
    MissingChunk(u32),

    #[error("decompression failed: {0}")]
    Decompression(String),

    #[error("archive unpack failed: {0}")]
    Container(String),
}

impl PipelineError {
    /// Name of the pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Incomplete | PipelineError::MissingChunk(_) => "assemble",
            PipelineError::Decompression(_) => "decompress",
            PipelineError::Container(_) => "unpack",
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, QrxError>;
