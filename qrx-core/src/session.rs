use crate::assemble::{ChunkAssembler, InsertOutcome, Phase, Progress};
use crate::detect::{Frame, detect_region};
use crate::error::PipelineError;
use crate::frame::DecodedSymbol;
use crate::frame::chunk::parse_chunk_logged;
use crate::options::SessionOptions;
use crate::pipeline::{self, ReconstructedArtifact};
use crate::stats::SessionStats;
use tracing::{debug, error, info, warn};

/// Turns a rectangular pixel buffer into at most one decoded symbol.
pub trait SymbolDecoder {
    fn decode(&mut self, frame: Frame<'_>) -> Option<DecodedSymbol>;
}

impl<F> SymbolDecoder for F
where
    F: FnMut(Frame<'_>) -> Option<DecodedSymbol>,
{
    fn decode(&mut self, frame: Frame<'_>) -> Option<DecodedSymbol> {
        self(frame)
    }
}

/// Result of handing one symbol's bytes to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolOutcome {
    Accepted(InsertOutcome),
    /// Failed framing or checksum; dropped.
    Invalid,
    /// Session already finished (artifact ready or pipeline failed).
    Closed,
}

/// Result of scanning one captured frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    NoSymbol,
    Symbol(SymbolOutcome),
}

#[derive(Clone, Debug)]
enum Outcome {
    Pending,
    Ready(ReconstructedArtifact),
    Taken,
    Failed(PipelineError),
}

/// Coarse session state for status display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Waiting,
    Collecting { scanned: usize, total: u32 },
    Reconstructed { name: String, len: usize },
    Delivered,
    Failed { stage: &'static str, message: String },
}

/// One transfer: chunk assembly plus the one-shot reconstruction.
///
/// The pipeline runs exactly once, on the insert that completes assembly.
/// After that the session is closed to new symbols until [`Session::reset`].
#[derive(Clone, Debug)]
pub struct Session {
    options: SessionOptions,
    assembler: ChunkAssembler,
    stats: SessionStats,
    outcome: Outcome,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        let assembler = ChunkAssembler::new(options.strict_total);
        Self {
            options,
            assembler,
            stats: SessionStats::default(),
            outcome: Outcome::Pending,
        }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Drop all collected state and start a fresh transfer.
    pub fn reset(&mut self) {
        info!("session reset");
        self.assembler = ChunkAssembler::new(self.options.strict_total);
        self.stats = SessionStats::default();
        self.outcome = Outcome::Pending;
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self.outcome, Outcome::Pending)
    }

    /// Scan one frame: try the bordered region first, then the whole frame.
    pub fn scan_frame(
        &mut self,
        frame: Frame<'_>,
        decoder: &mut dyn SymbolDecoder,
    ) -> FrameOutcome {
        self.stats.frames_scanned += 1;

        let mut symbol = None;
        if let Some(region) = detect_region(&frame, &self.options.detection) {
            self.stats.regions_found += 1;
            debug!(?region, "marker border found");
            let inner = frame.crop(&region);
            match inner.view() {
                Ok(view) => symbol = decoder.decode(view),
                Err(e) => warn!(error = %e, "cropped region unusable"),
            }
        }
        if symbol.is_none() {
            self.stats.full_frame_fallbacks += 1;
            symbol = decoder.decode(frame);
        }

        match symbol {
            Some(s) => FrameOutcome::Symbol(self.accept_symbol(s)),
            None => FrameOutcome::NoSymbol,
        }
    }

    pub fn accept_symbol(&mut self, symbol: DecodedSymbol) -> SymbolOutcome {
        self.accept_bytes(&symbol.into_bytes())
    }

    /// Parse and store one frame's bytes; runs reconstruction on completion.
    pub fn accept_bytes(&mut self, bytes: &[u8]) -> SymbolOutcome {
        self.stats.symbols_decoded += 1;
        if self.is_finished() {
            debug!("session finished; ignoring symbol");
            return SymbolOutcome::Closed;
        }

        let Some(chunk) = parse_chunk_logged(bytes) else {
            self.stats.invalid_frames += 1;
            return SymbolOutcome::Invalid;
        };
        // counted whether or not strict mode rejects the chunk
        if self
            .assembler
            .total()
            .is_some_and(|t| t != chunk.declared_total())
        {
            self.stats.total_mismatches += 1;
        }

        let outcome = self.assembler.insert(chunk);
        match outcome {
            InsertOutcome::Stored { .. } => self.stats.chunks_accepted += 1,
            InsertOutcome::Completed { .. } => {
                self.stats.chunks_accepted += 1;
                self.finish();
            }
            InsertOutcome::Duplicate { .. } => self.stats.duplicates += 1,
            InsertOutcome::OutOfRange { .. } => self.stats.out_of_range += 1,
            InsertOutcome::TotalMismatch { .. } | InsertOutcome::Sealed => {}
        }
        SymbolOutcome::Accepted(outcome)
    }

    fn finish(&mut self) {
        self.outcome = match pipeline::reconstruct(&self.assembler) {
            Ok(artifact) => {
                info!(name = artifact.name(), bytes = artifact.len(), "file reconstructed");
                Outcome::Ready(artifact)
            }
            Err(e) => {
                error!(stage = e.stage(), error = %e, "reconstruction failed");
                Outcome::Failed(e)
            }
        };
    }

    pub fn phase(&self) -> Phase {
        self.assembler.phase()
    }

    pub fn progress(&self) -> Progress {
        self.assembler.progress()
    }

    pub fn assembler(&self) -> &ChunkAssembler {
        &self.assembler
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn artifact(&self) -> Option<&ReconstructedArtifact> {
        match &self.outcome {
            Outcome::Ready(a) => Some(a),
            _ => None,
        }
    }

    /// Hand the artifact to the caller; the session keeps only the fact it was delivered.
    pub fn take_artifact(&mut self) -> Option<ReconstructedArtifact> {
        match std::mem::replace(&mut self.outcome, Outcome::Taken) {
            Outcome::Ready(a) => Some(a),
            other => {
                self.outcome = other;
                None
            }
        }
    }

    pub fn failure(&self) -> Option<&PipelineError> {
        match &self.outcome {
            Outcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        match &self.outcome {
            Outcome::Ready(a) => SessionStatus::Reconstructed {
                name: a.name().to_string(),
                len: a.len(),
            },
            Outcome::Taken => SessionStatus::Delivered,
            Outcome::Failed(e) => SessionStatus::Failed {
                stage: e.stage(),
                message: e.to_string(),
            },
            Outcome::Pending => match self.assembler.total() {
                Some(total) => SessionStatus::Collecting {
                    scanned: self.assembler.count(),
                    total,
                },
                None => SessionStatus::Waiting,
            },
        }
    }
}
