use crate::detect::FrameBuf;
use std::collections::VecDeque;

/// What a capture source has for the loop right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Capture {
    Frame(FrameBuf),
    /// Nothing new yet (camera warming up, no fresh frame).
    NotReady,
    /// The source will never produce another frame.
    Ended,
}

pub trait FrameSource {
    fn next_frame(&mut self) -> Capture;
}

/// Replays a fixed list of frames, then ends.
#[derive(Clone, Debug, Default)]
pub struct QueuedFrames {
    frames: VecDeque<FrameBuf>,
}

impl QueuedFrames {
    pub fn new(frames: impl IntoIterator<Item = FrameBuf>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl FrameSource for QueuedFrames {
    fn next_frame(&mut self) -> Capture {
        match self.frames.pop_front() {
            Some(f) => Capture::Frame(f),
            None => Capture::Ended,
        }
    }
}
