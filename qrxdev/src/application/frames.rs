use qrx_core::detect::Channels;
use qrx_core::error::{QrxError, Result};
use qrx_core::scan::{Capture, FrameSource};
use qrx_core::{DecodedSymbol, Frame, FrameBuf, SymbolDecoder};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg"];

/// Regular files directly under `dir` whose extension matches, sorted by name.
pub fn list_files(dir: &Path, exts: &[&str]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for e in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let e = e.map_err(|e| std::io::Error::other(e.to_string()))?;
        if !e.file_type().is_file() {
            continue;
        }
        let p = e.path();
        let matches = p
            .extension()
            .map(|x| x.to_string_lossy().to_lowercase())
            .is_some_and(|x| exts.contains(&x.as_str()));
        if matches {
            out.push(p.to_path_buf());
        }
    }
    out.sort();
    Ok(out)
}

pub fn load_image(path: &Path) -> Result<FrameBuf> {
    let img = image::open(path)
        .map_err(|e| QrxError::Format(format!("{}: {e}", path.display())))?
        .to_rgba8();
    Ok(FrameBuf {
        width: img.width() as usize,
        height: img.height() as usize,
        channels: Channels::Rgba,
        data: img.into_raw(),
    })
}

/// Captured frames replayed from a directory of still images.
pub struct ImageDirSource {
    pending: VecDeque<PathBuf>,
}

impl ImageDirSource {
    pub fn open(dir: &Path) -> Result<Self> {
        let pending: VecDeque<PathBuf> = list_files(dir, IMAGE_EXTS)?.into();
        if pending.is_empty() {
            return Err(QrxError::Format(format!(
                "no images found in {}",
                dir.display()
            )));
        }
        Ok(Self { pending })
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> Capture {
        let Some(path) = self.pending.pop_front() else {
            return Capture::Ended;
        };
        match load_image(&path) {
            Ok(buf) => {
                debug!(path = %path.display(), "loaded frame");
                Capture::Frame(buf)
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable frame");
                Capture::NotReady
            }
        }
    }
}

/// QR reader backed by rqrr; yields the raw segment bytes.
#[derive(Default)]
pub struct RqrrDecoder;

fn luma(frame: &Frame<'_>) -> Vec<u8> {
    let (w, h) = (frame.width(), frame.height());
    let mut grey = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let [r, g, b] = frame.rgb(x, y).map(u32::from);
            // BT.601 in integer math
            grey.push(((77 * r + 150 * g + 29 * b) >> 8) as u8);
        }
    }
    grey
}

impl SymbolDecoder for RqrrDecoder {
    fn decode(&mut self, frame: Frame<'_>) -> Option<DecodedSymbol> {
        let w = frame.width();
        let grey = luma(&frame);
        let mut img = rqrr::PreparedImage::prepare_from_greyscale(w, frame.height(), |x, y| {
            grey[y * w + x]
        });
        for grid in img.detect_grids() {
            let mut bytes = Vec::new();
            match grid.decode_to(&mut bytes) {
                Ok(_) => return Some(DecodedSymbol::Binary(bytes)),
                Err(e) => debug!(error = ?e, "grid found but not decodable"),
            }
        }
        None
    }
}
