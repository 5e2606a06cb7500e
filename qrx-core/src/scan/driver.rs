use super::clock::Clock;
use super::source::{Capture, FrameSource};
use crate::options::ScanOptions;
use crate::session::{FrameOutcome, Session, SymbolDecoder};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Loop is stopped; nothing done.
    Stopped,
    /// Called before the interval elapsed; nothing done.
    Throttled,
    /// Scan slot used but the source had no frame.
    NoFrame,
    /// Source is exhausted; loop stopped.
    SourceEnded,
    Scanned(FrameOutcome),
}

/// Throttled capture loop driving a [`Session`].
///
/// Call [`ScanLoop::tick`] once per display refresh (or in a tight loop); it
/// does real work at most once per `interval`. The loop stops itself once the
/// session finishes; stopping never clears session state.
pub struct ScanLoop<C, S, D> {
    session: Session,
    clock: C,
    source: S,
    decoder: D,
    options: ScanOptions,
    last_scan: Option<Duration>,
    running: bool,
}

impl<C: Clock, S: FrameSource, D: SymbolDecoder> ScanLoop<C, S, D> {
    pub fn new(session: Session, clock: C, source: S, decoder: D, options: ScanOptions) -> Self {
        Self {
            session,
            clock,
            source,
            decoder,
            options,
            last_scan: None,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        if self.running {
            info!("scanning stopped");
        }
        self.running = false;
    }

    pub fn resume(&mut self) {
        info!("scanning resumed");
        self.running = true;
    }

    /// Time left before the next tick may scan.
    pub fn until_due(&self) -> Duration {
        match self.last_scan {
            Some(last) => self
                .options
                .interval
                .saturating_sub(self.clock.now().saturating_sub(last)),
            None => Duration::ZERO,
        }
    }

    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Stopped;
        }
        let now = self.clock.now();
        if let Some(last) = self.last_scan
            && now.saturating_sub(last) < self.options.interval
        {
            return Tick::Throttled;
        }
        self.last_scan = Some(now);

        let buf = match self.source.next_frame() {
            Capture::Frame(buf) => buf,
            Capture::NotReady => return Tick::NoFrame,
            Capture::Ended => {
                info!("frame source ended");
                self.running = false;
                return Tick::SourceEnded;
            }
        };
        let frame = match buf.view() {
            Ok(f) => f,
            Err(e) => {
                warn!(error = %e, "skipping malformed frame");
                return Tick::NoFrame;
            }
        };

        let outcome = self.session.scan_frame(frame, &mut self.decoder);
        debug!(?outcome, "frame scanned");
        if self.session.is_finished() {
            self.stop();
        }
        Tick::Scanned(outcome)
    }

    /// Tick until the loop stops, calling `wait` with the remaining delay
    /// whenever a tick is throttled.
    pub fn run<W: FnMut(Duration)>(&mut self, mut wait: W) {
        loop {
            match self.tick() {
                Tick::Stopped | Tick::SourceEnded => break,
                Tick::Throttled => wait(self.until_due()),
                Tick::NoFrame | Tick::Scanned(_) => {}
            }
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{Frame, FrameBuf};
    use crate::frame::DecodedSymbol;
    use crate::scan::clock::ManualClock;
    use crate::scan::source::QueuedFrames;

    fn never(_: Frame<'_>) -> Option<DecodedSymbol> {
        None
    }

    fn blank() -> FrameBuf {
        FrameBuf::filled(4, 4, [0, 0, 0])
    }

    #[test]
    fn throttles_between_scans() {
        let clock = ManualClock::new();
        let source = QueuedFrames::new([blank(), blank()]);
        let mut l = ScanLoop::new(
            Session::default(),
            clock.clone(),
            source,
            never,
            ScanOptions::default(),
        );
        assert_eq!(l.tick(), Tick::Scanned(FrameOutcome::NoSymbol));
        clock.advance(Duration::from_millis(40));
        assert_eq!(l.tick(), Tick::Throttled);
        assert_eq!(l.until_due(), Duration::from_millis(60));
        clock.advance(Duration::from_millis(60));
        assert_eq!(l.tick(), Tick::Scanned(FrameOutcome::NoSymbol));
        clock.advance(Duration::from_millis(100));
        assert_eq!(l.tick(), Tick::SourceEnded);
        assert_eq!(l.tick(), Tick::Stopped);
        assert_eq!(l.session().stats().frames_scanned, 2);
    }

    #[test]
    fn stop_and_resume_keep_session() {
        let clock = ManualClock::new();
        let mut l = ScanLoop::new(
            Session::default(),
            clock.clone(),
            QueuedFrames::new([blank()]),
            never,
            ScanOptions::default(),
        );
        l.stop();
        assert_eq!(l.tick(), Tick::Stopped);
        l.resume();
        assert!(matches!(l.tick(), Tick::Scanned(_)));
        assert_eq!(l.session().stats().frames_scanned, 1);
    }

    #[test]
    fn run_waits_out_the_throttle() {
        let clock = ManualClock::new();
        let waiter = clock.clone();
        let mut l = ScanLoop::new(
            Session::default(),
            clock,
            QueuedFrames::new([blank(), blank(), blank()]),
            never,
            ScanOptions::default(),
        );
        let mut waits = 0;
        l.run(|d| {
            waits += 1;
            waiter.advance(d);
        });
        assert_eq!(l.session().stats().frames_scanned, 3);
        assert_eq!(waits, 3);
        assert!(!l.is_running());
    }
}
