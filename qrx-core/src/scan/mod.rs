pub mod clock;
pub mod driver;
pub mod source;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use driver::{ScanLoop, Tick};
pub use source::{Capture, FrameSource, QueuedFrames};
