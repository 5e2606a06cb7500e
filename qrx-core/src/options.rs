use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Marker-border heuristic thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionParams {
    /// Depth in pixels of each border strip that gets sampled.
    pub border_threshold: usize,
    /// Minimum green channel value for a marker pixel.
    pub green_threshold: u8,
    /// Every strip must exceed this fraction of marker pixels.
    pub min_border_ratio: f64,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            border_threshold: 20,
            green_threshold: 100,
            min_border_ratio: 0.30,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionOptions {
    pub detection: DetectionParams,
    /// Reject chunks whose declared total disagrees with the first one seen.
    pub strict_total: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Minimum spacing between two scans.
    pub interval: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
        }
    }
}

/// Sender-side packaging knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackOptions {
    /// Largest frame, header and checksum included, a symbol can carry.
    pub frame_capacity: usize,
    /// Deflate level (0-9) for both the archive entry and the outer zlib stream.
    pub level: u32,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            frame_capacity: 1260,
            level: 9,
        }
    }
}
