use crate::error::Result;
use crate::util::hash_forward::HashingForward;
use std::io::Write;

/// The file recovered from a completed transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconstructedArtifact {
    name: String,
    bytes: Vec<u8>,
}

impl ReconstructedArtifact {
    pub fn new(name: String, bytes: Vec<u8>) -> Self {
        Self { name, bytes }
    }

    /// Entry name as stored in the archive (may contain directories).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.name, self.bytes)
    }

    /// Stream the bytes to `w`, returning their BLAKE3 digest.
    pub fn write_to<W: Write>(&self, w: W) -> Result<[u8; 32]> {
        let mut fwd = HashingForward::new(w);
        fwd.write_all(&self.bytes)?;
        fwd.flush()?;
        let (_, digest) = fwd.finalize();
        Ok(digest)
    }

    pub fn digest(&self) -> [u8; 32] {
        *blake3::hash(&self.bytes).as_bytes()
    }
}
