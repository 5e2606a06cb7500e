use crate::error::{QrxError, Result};

/// Sample layout of a row-major pixel buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Channels {
    Rgb = 3,
    Rgba = 4,
}

impl Channels {
    pub fn stride(self) -> usize {
        self as usize
    }
}

/// Borrowed view of a captured frame.
#[derive(Copy, Clone, Debug)]
pub struct Frame<'a> {
    width: usize,
    height: usize,
    channels: Channels,
    data: &'a [u8],
}

impl<'a> Frame<'a> {
    pub fn new(width: usize, height: usize, channels: Channels, data: &'a [u8]) -> Result<Self> {
        let need = width
            .checked_mul(height)
            .and_then(|px| px.checked_mul(channels.stride()))
            .ok_or_else(|| QrxError::Format("frame dimensions overflow".into()))?;
        if data.len() != need {
            return Err(QrxError::Format(format!(
                "frame buffer size mismatch: got {} bytes, expected {} ({}x{}x{})",
                data.len(),
                need,
                width,
                height,
                channels.stride()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn rgba(width: usize, height: usize, data: &'a [u8]) -> Result<Self> {
        Self::new(width, height, Channels::Rgba, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * self.channels.stride();
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Copy out a sub-rectangle. The region must lie inside the frame.
    pub fn crop(&self, region: &Region) -> FrameBuf {
        let stride = self.channels.stride();
        let mut data = Vec::with_capacity(region.width * region.height * stride);
        for y in region.y..region.y + region.height {
            let start = (y * self.width + region.x) * stride;
            data.extend_from_slice(&self.data[start..start + region.width * stride]);
        }
        FrameBuf {
            width: region.width,
            height: region.height,
            channels: self.channels,
            data,
        }
    }
}

/// Owned frame, as produced by a capture source or a crop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuf {
    pub width: usize,
    pub height: usize,
    pub channels: Channels,
    pub data: Vec<u8>,
}

impl FrameBuf {
    pub fn view(&self) -> Result<Frame<'_>> {
        Frame::new(self.width, self.height, self.channels, &self.data)
    }

    /// Solid frame of one colour.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 4);
        for _ in 0..width * height {
            data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        Self {
            width,
            height,
            channels: Channels::Rgba,
            data,
        }
    }

    /// Paint a uniform border `b` pixels deep on all four sides.
    pub fn with_border(mut self, b: usize, rgb: [u8; 3]) -> Self {
        let stride = self.channels.stride();
        for y in 0..self.height {
            for x in 0..self.width {
                let edge = x < b || y < b || x + b >= self.width || y + b >= self.height;
                if edge {
                    let i = (y * self.width + x) * stride;
                    self.data[i..i + 3].copy_from_slice(&rgb);
                }
            }
        }
        self
    }
}

/// Axis-aligned rectangle in frame pixel coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(Frame::rgba(2, 2, &[0u8; 15]).is_err());
        assert!(Frame::new(2, 2, Channels::Rgb, &[0u8; 12]).is_ok());
    }

    #[test]
    fn crop_copies_rows() {
        let mut buf = FrameBuf::filled(4, 3, [0, 0, 0]);
        // mark pixel (2,1)
        let i = (4 + 2) * 4;
        buf.data[i] = 9;
        let view = buf.view().unwrap();
        let sub = view.crop(&Region {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
        });
        assert_eq!((sub.width, sub.height), (2, 2));
        assert_eq!(sub.view().unwrap().rgb(1, 0), [9, 0, 0]);
        assert_eq!(sub.view().unwrap().rgb(0, 1), [0, 0, 0]);
    }

    #[test]
    fn border_painting() {
        let buf = FrameBuf::filled(10, 10, [255, 255, 255]).with_border(2, [0, 255, 0]);
        let v = buf.view().unwrap();
        assert_eq!(v.rgb(0, 0), [0, 255, 0]);
        assert_eq!(v.rgb(9, 5), [0, 255, 0]);
        assert_eq!(v.rgb(1, 8), [0, 255, 0]);
        assert_eq!(v.rgb(2, 2), [255, 255, 255]);
        assert_eq!(v.rgb(7, 7), [255, 255, 255]);
    }
}
