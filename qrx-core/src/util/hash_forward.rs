use std::io::{Result, Write};

/// Writer adapter that hashes everything passing through with BLAKE3.
pub struct HashingForward<W: Write> {
    inner: W,
    hasher: blake3::Hasher,
}

impl<W: Write> HashingForward<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: blake3::Hasher::new(),
        }
    }

    pub fn finalize(self) -> (W, [u8; 32]) {
        (self.inner, *self.hasher.finalize().as_bytes())
    }
}

impl<W: Write> Write for HashingForward<W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let k = self.inner.write(buf)?;
        self.hasher.update(&buf[..k]);
        Ok(k)
    }
    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }
}
