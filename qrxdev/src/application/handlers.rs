use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use qrx_core::error::{QrxError, Result};
use qrx_core::scan::{MonotonicClock, ScanLoop};
use qrx_core::{
    DecodedSymbol, DetectionParams, PackOptions, ScanOptions, Session, SessionOptions,
    SessionStatus, pack_file, parse_chunk,
};
use tracing::info;

use super::frames::{ImageDirSource, RqrrDecoder, list_files};
use super::save::save_artifact;
use crate::presentation::cli::DetectionArgs;

pub const FRAME_EXT: &str = "bin";

fn frame_file_name(index: usize) -> String {
    format!("frame_{index:05}.{FRAME_EXT}")
}

pub fn handle_split(input: PathBuf, out_dir: PathBuf, capacity: usize, level: u32) -> Result<()> {
    let opts = PackOptions {
        frame_capacity: capacity,
        level,
    };
    let frames = pack_file(&input, &opts)?;
    fs::create_dir_all(&out_dir)?;
    for (i, f) in frames.iter().enumerate() {
        fs::write(out_dir.join(frame_file_name(i)), f)?;
    }
    eprintln!(
        "split: {} -> {} frames in {}",
        input.display(),
        frames.len(),
        out_dir.display()
    );
    Ok(())
}

pub fn handle_join(frames_dir: PathBuf, out_dir: PathBuf, strict_total: bool) -> Result<()> {
    let mut session = Session::new(SessionOptions {
        strict_total,
        ..Default::default()
    });
    for path in list_files(&frames_dir, &[FRAME_EXT])? {
        if session.is_finished() {
            break;
        }
        let bytes = fs::read(&path)?;
        session.accept_symbol(DecodedSymbol::Binary(bytes));
    }
    deliver(session, &out_dir)
}

pub fn handle_scan(
    images_dir: PathBuf,
    out_dir: PathBuf,
    detection: DetectionArgs,
    interval_ms: u64,
    strict_total: bool,
    stats_json: bool,
) -> Result<()> {
    let session = Session::new(SessionOptions {
        detection: DetectionParams {
            border_threshold: detection.border_threshold,
            green_threshold: detection.green_threshold,
            min_border_ratio: detection.min_border_ratio,
        },
        strict_total,
    });
    let scan = ScanOptions {
        interval: Duration::from_millis(interval_ms),
    };
    let source = ImageDirSource::open(&images_dir)?;
    let mut scan_loop = ScanLoop::new(
        session,
        MonotonicClock::default(),
        source,
        RqrrDecoder,
        scan,
    );
    scan_loop.run(std::thread::sleep);

    let session = scan_loop.into_session();
    if stats_json {
        let json = serde_json::to_string_pretty(session.stats())
            .map_err(|e| QrxError::Format(format!("stats encode: {e}")))?;
        println!("{json}");
    }
    deliver(session, &out_dir)
}

pub fn handle_inspect(frame: PathBuf) -> Result<()> {
    let bytes = fs::read(&frame)?;
    match parse_chunk(&bytes) {
        Ok(c) => {
            println!(
                "#{:<5} total={:<6} payload={} crc={:#010x} ok",
                c.index(),
                c.declared_total(),
                c.payload().len(),
                c.checksum()
            );
            Ok(())
        }
        Err(e) => Err(QrxError::Format(format!("{}: {e}", frame.display()))),
    }
}

/// Save the artifact or explain why there is none.
fn deliver(mut session: Session, out_dir: &Path) -> Result<()> {
    if let Some(artifact) = session.take_artifact() {
        let (path, digest) = save_artifact(&artifact, out_dir)?;
        info!(path = %path.display(), "artifact saved");
        println!(
            "{}  {} bytes  blake3={}",
            path.display(),
            artifact.len(),
            hex::encode(digest)
        );
        return Ok(());
    }
    match session.status() {
        SessionStatus::Failed { .. } => match session.failure() {
            Some(e) => Err(e.clone().into()),
            None => Err(QrxError::Format("reconstruction failed".into())),
        },
        SessionStatus::Collecting { scanned, total } => {
            let percent = session.progress().percent();
            let missing = session.assembler().missing();
            Err(QrxError::Format(format!(
                "incomplete transfer: {scanned}/{total} chunks ({percent:.0}%), missing {missing:?}"
            )))
        }
        _ => Err(QrxError::Format("no valid chunks found".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise(n: usize) -> Vec<u8> {
        let mut x: u32 = 0x9E37_79B9;
        (0..n)
            .map(|_| {
                x ^= x << 13;
                x ^= x >> 17;
                x ^= x << 5;
                (x >> 24) as u8
            })
            .collect()
    }

    #[test]
    fn split_then_join_roundtrip() {
        let work = tempfile::tempdir().unwrap();
        let input = work.path().join("source.dat");
        let content = noise(20_000);
        fs::write(&input, &content).unwrap();

        let frames = work.path().join("frames");
        handle_split(input, frames.clone(), 400, 9).unwrap();
        assert!(list_files(&frames, &[FRAME_EXT]).unwrap().len() > 1);

        let out = work.path().join("out");
        handle_join(frames, out.clone(), false).unwrap();
        assert_eq!(fs::read(out.join("source.dat")).unwrap(), content);
    }

    #[test]
    fn join_reports_missing_chunks() {
        let work = tempfile::tempdir().unwrap();
        let input = work.path().join("source.dat");
        let content = noise(5_000);
        fs::write(&input, &content).unwrap();

        let frames = work.path().join("frames");
        handle_split(input, frames.clone(), 200, 9).unwrap();
        fs::remove_file(frames.join(frame_file_name(1))).unwrap();

        let err = handle_join(frames, work.path().join("out"), false).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("missing [1]"), "{msg}");
        assert!(msg.contains("%)"), "{msg}");
    }

    #[test]
    fn inspect_flags_corruption() {
        let work = tempfile::tempdir().unwrap();
        let good = work.path().join("good.bin");
        let mut bytes = qrx_core::encode_chunk(2, 1, b"abc");
        fs::write(&good, &bytes).unwrap();
        assert!(handle_inspect(good).is_ok());

        bytes[8] ^= 0xFF;
        let bad = work.path().join("bad.bin");
        fs::write(&bad, &bytes).unwrap();
        assert!(handle_inspect(bad).is_err());
    }
}
