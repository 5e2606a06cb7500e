use super::pixels::{Frame, Region};
use crate::options::DetectionParams;
use std::ops::Range;
use tracing::trace;

/// Bounds for the estimated border width, in pixels.
pub const MIN_BORDER: usize = 5;
pub const MAX_BORDER: usize = 20;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct StripCount {
    marker: usize,
    total: usize,
}

impl StripCount {
    fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.marker as f64 / self.total as f64
        }
    }
}

#[inline]
fn is_marker(rgb: [u8; 3], green_threshold: u8) -> bool {
    let [r, g, b] = rgb.map(f64::from);
    g > f64::from(green_threshold) && g > r * 1.5 && g > b * 1.5
}

fn count_rect(frame: &Frame<'_>, xs: Range<usize>, ys: Range<usize>, gt: u8) -> StripCount {
    let mut c = StripCount::default();
    for y in ys {
        for x in xs.clone() {
            c.total += 1;
            if is_marker(frame.rgb(x, y), gt) {
                c.marker += 1;
            }
        }
    }
    c
}

/// Locate the symbol inside a uniform marker-coloured border.
///
/// Samples the four border strips (`border_threshold` deep, clamped to the
/// smaller frame side). When every strip's marker ratio exceeds `min_border_ratio`, returns
/// the frame inset by the estimated border width; otherwise `None`, meaning
/// the caller should scan the whole frame.
pub fn detect_region(frame: &Frame<'_>, params: &DetectionParams) -> Option<Region> {
    let (w, h) = (frame.width(), frame.height());
    if w == 0 || h == 0 {
        return None;
    }
    let depth = params.border_threshold.min(w).min(h);
    let gt = params.green_threshold;

    let strips = [
        count_rect(frame, 0..w, 0..depth, gt),
        count_rect(frame, 0..w, h - depth..h, gt),
        count_rect(frame, 0..depth, 0..h, gt),
        count_rect(frame, w - depth..w, 0..h, gt),
    ];
    trace!(
        top = strips[0].ratio(),
        bottom = strips[1].ratio(),
        left = strips[2].ratio(),
        right = strips[3].ratio(),
        "border strip ratios"
    );

    if !strips.iter().all(|s| s.ratio() > params.min_border_ratio) {
        return None;
    }

    let marker: usize = strips.iter().map(|s| s.marker).sum();
    let total: usize = strips.iter().map(|s| s.total).sum();
    if total == 0 {
        return None;
    }
    let estimate = marker * depth / total;
    let border = estimate.clamp(MIN_BORDER, MAX_BORDER);

    if w <= 2 * border || h <= 2 * border {
        return None;
    }
    Some(Region {
        x: border,
        y: border,
        width: w - 2 * border,
        height: h - 2 * border,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::pixels::FrameBuf;

    const GREEN: [u8; 3] = [0, 255, 0];
    const WHITE: [u8; 3] = [255, 255, 255];

    #[test]
    fn marker_classification() {
        assert!(is_marker([0, 255, 0], 100));
        assert!(is_marker([60, 101, 60], 100));
        assert!(!is_marker([0, 100, 0], 100));
        assert!(!is_marker([70, 101, 0], 100));
        assert!(!is_marker([255, 255, 255], 100));
    }

    #[test]
    fn bordered_frame_yields_inset_region() {
        // 10px border on 100x100: each 20px strip is 60% marker, estimate 12.
        let buf = FrameBuf::filled(100, 100, WHITE).with_border(10, GREEN);
        let r = detect_region(&buf.view().unwrap(), &DetectionParams::default()).unwrap();
        assert_eq!(
            r,
            Region {
                x: 12,
                y: 12,
                width: 76,
                height: 76
            }
        );
    }

    #[test]
    fn non_square_frame_with_thin_border() {
        // 7px on 400x300: strips at 0.373 (rows) and 0.380 (cols), estimate 7.
        let buf = FrameBuf::filled(400, 300, WHITE).with_border(7, GREEN);
        let r = detect_region(&buf.view().unwrap(), &DetectionParams::default()).unwrap();
        assert_eq!(
            r,
            Region {
                x: 7,
                y: 7,
                width: 386,
                height: 286
            }
        );
    }

    #[test]
    fn border_below_ratio_is_ignored() {
        // 5px on 400x300 leaves the row strips at 0.269
        let buf = FrameBuf::filled(400, 300, WHITE).with_border(5, GREEN);
        assert!(detect_region(&buf.view().unwrap(), &DetectionParams::default()).is_none());
    }

    #[test]
    fn fully_green_frame_is_clamped_to_max() {
        let buf = FrameBuf::filled(64, 64, GREEN);
        let r = detect_region(&buf.view().unwrap(), &DetectionParams::default()).unwrap();
        assert_eq!(r.x, MAX_BORDER);
        assert_eq!(r.width, 24);
    }

    #[test]
    fn oversized_threshold_is_clamped_to_frame() {
        let buf = FrameBuf::filled(64, 64, GREEN);
        let params = DetectionParams {
            border_threshold: usize::MAX / 2,
            ..Default::default()
        };
        let r = detect_region(&buf.view().unwrap(), &params).unwrap();
        assert_eq!(r.x, MAX_BORDER);
        assert_eq!(r.width, 24);
    }

    #[test]
    fn zero_threshold_finds_nothing() {
        let buf = FrameBuf::filled(64, 64, GREEN);
        let params = DetectionParams {
            border_threshold: 0,
            ..Default::default()
        };
        assert!(detect_region(&buf.view().unwrap(), &params).is_none());
    }

    #[test]
    fn plain_frame_has_no_region() {
        let buf = FrameBuf::filled(80, 60, WHITE);
        assert!(detect_region(&buf.view().unwrap(), &DetectionParams::default()).is_none());
    }

    #[test]
    fn missing_side_means_no_region() {
        let mut buf = FrameBuf::filled(100, 100, WHITE).with_border(10, GREEN);
        // wipe the right-hand strip
        for y in 0..100 {
            for x in 80..100 {
                let i = (y * 100 + x) * 4;
                buf.data[i..i + 3].copy_from_slice(&WHITE);
            }
        }
        assert!(detect_region(&buf.view().unwrap(), &DetectionParams::default()).is_none());
    }

    #[test]
    fn tiny_frame_cannot_hold_an_interior() {
        let buf = FrameBuf::filled(8, 8, GREEN);
        assert!(detect_region(&buf.view().unwrap(), &DetectionParams::default()).is_none());
    }
}
