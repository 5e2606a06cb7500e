use crate::codec::Compressor;
use crate::codec::zlib::Zlib;
use crate::error::{QrxError, Result};
use crate::frame::chunk::{MIN_FRAME_LEN, encode_chunk};
use crate::options::PackOptions;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Package `data` as a single-entry ZIP archive named `name`.
pub fn zip_single(name: &str, data: &[u8], level: u32) -> Result<Vec<u8>> {
    let opts = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(i64::from(level.min(9))));
    let mut w = ZipWriter::new(Cursor::new(Vec::new()));
    w.start_file(name, opts)
        .map_err(|e| QrxError::Format(format!("zip entry {name}: {e}")))?;
    w.write_all(data)?;
    let cur = w
        .finish()
        .map_err(|e| QrxError::Format(format!("zip finish: {e}")))?;
    Ok(cur.into_inner())
}

/// Cut a compressed blob into wire frames of at most `frame_capacity` bytes.
pub fn split_frames(blob: &[u8], frame_capacity: usize) -> Result<Vec<Vec<u8>>> {
    if frame_capacity <= MIN_FRAME_LEN {
        return Err(QrxError::Format(format!(
            "frame capacity {frame_capacity} leaves no payload room (minimum {MIN_FRAME_LEN})"
        )));
    }
    let chunk_size = frame_capacity - MIN_FRAME_LEN;
    let count = blob.len().div_ceil(chunk_size).max(1);
    let total = u32::try_from(count)
        .map_err(|_| QrxError::Format(format!("{count} chunks do not fit a u32 total")))?;

    let frames: Vec<Vec<u8>> = (0..total)
        .map(|i| {
            let start = i as usize * chunk_size;
            let end = (start + chunk_size).min(blob.len());
            encode_chunk(total, i, &blob[start..end])
        })
        .collect();
    info!(bytes = blob.len(), chunk_size, total, "split payload into frames");
    Ok(frames)
}

/// Zip, compress and frame an in-memory file.
pub fn pack_bytes(name: &str, data: &[u8], opts: &PackOptions) -> Result<Vec<Vec<u8>>> {
    let archive = zip_single(name, data, opts.level)?;
    let mut compressed = Vec::new();
    Zlib.compress(&mut &archive[..], &mut compressed, opts.level)?;
    info!(
        name,
        original = data.len(),
        archive = archive.len(),
        compressed = compressed.len(),
        "packaged file"
    );
    split_frames(&compressed, opts.frame_capacity)
}

/// Same as [`pack_bytes`], reading the file and naming the entry after its base name.
pub fn pack_file(path: &Path, opts: &PackOptions) -> Result<Vec<Vec<u8>>> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| QrxError::Format(format!("no file name in {}", path.display())))?;
    let data = fs::read(path)?;
    pack_bytes(&name, &data, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::parse_chunk;

    #[test]
    fn frames_respect_capacity_and_cover_blob() {
        let blob: Vec<u8> = (0..100u8).collect();
        let frames = split_frames(&blob, 42).unwrap();
        assert_eq!(frames.len(), 4); // 30 + 30 + 30 + 10
        let mut joined = Vec::new();
        for (i, f) in frames.iter().enumerate() {
            assert!(f.len() <= 42);
            let c = parse_chunk(f).unwrap();
            assert_eq!(c.index(), i as u32);
            assert_eq!(c.declared_total(), 4);
            joined.extend_from_slice(c.payload());
        }
        assert_eq!(joined, blob);
    }

    #[test]
    fn default_capacity_gives_1248_byte_payloads() {
        let blob = vec![7u8; 1248 * 2 + 1];
        let frames = split_frames(&blob, PackOptions::default().frame_capacity).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].len(), 1260);
        assert_eq!(frames[2].len(), 13);
    }

    #[test]
    fn capacity_must_leave_room_for_payload() {
        assert!(split_frames(b"abc", 12).is_err());
        assert!(split_frames(b"abc", 13).is_ok());
    }

    #[test]
    fn pack_bytes_produces_zlib_stream() {
        let frames = pack_bytes("a.txt", b"hello", &PackOptions::default()).unwrap();
        assert_eq!(frames.len(), 1);
        let c = parse_chunk(&frames[0]).unwrap();
        assert_eq!(c.payload()[0], 0x78);
    }
}
