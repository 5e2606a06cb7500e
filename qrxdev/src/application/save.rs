use qrx_core::ReconstructedArtifact;
use qrx_core::error::{QrxError, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Reduce an archive entry name to a bare file name that is safe to write.
pub fn safe_file_name(entry: &str) -> Result<&str> {
    let base = entry
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(entry);
    if base.is_empty() || base == "." || base == ".." {
        return Err(QrxError::Format(format!("unsafe entry name: {entry:?}")));
    }
    Ok(base)
}

/// Write the artifact into `dest`, returning its path and BLAKE3 digest.
pub fn save_artifact(artifact: &ReconstructedArtifact, dest: &Path) -> Result<(PathBuf, [u8; 32])> {
    let name = safe_file_name(artifact.name())?;
    fs::create_dir_all(dest)?;
    let path = dest.join(name);
    let out = BufWriter::new(File::create(&path)?);
    let digest = artifact.write_to(out)?;
    Ok((path, digest))
}
