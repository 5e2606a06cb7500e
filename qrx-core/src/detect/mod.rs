pub mod pixels;
pub mod region;

pub use pixels::{Channels, Frame, FrameBuf, Region};
pub use region::detect_region;
