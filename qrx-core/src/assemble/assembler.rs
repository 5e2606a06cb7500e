use std::collections::BTreeMap;

use crate::frame::Chunk;
use tracing::{debug, info, warn};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Collecting,
    Complete,
}

/// What happened to one chunk offered to the assembler.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Stored; assembly still needs more.
    Stored { index: u32 },
    /// Stored and it was the last missing index.
    Completed { index: u32 },
    /// Index already present; nothing changed.
    Duplicate { index: u32 },
    /// Index does not fit below the total; discarded.
    OutOfRange { index: u32, total: u32 },
    /// Declared total disagrees with the established one (strict mode only).
    TotalMismatch { index: u32, declared: u32, total: u32 },
    /// Assembly already complete; nothing changes any more.
    Sealed,
}

/// Index-keyed chunk store with a once-set total.
#[derive(Clone, Debug)]
pub struct ChunkAssembler {
    total: Option<u32>,
    chunks: BTreeMap<u32, Vec<u8>>,
    complete: bool,
    strict_total: bool,
}

impl Default for ChunkAssembler {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ChunkAssembler {
    pub fn new(strict_total: bool) -> Self {
        Self {
            total: None,
            chunks: BTreeMap::new(),
            complete: false,
            strict_total,
        }
    }

    pub fn insert(&mut self, chunk: Chunk) -> InsertOutcome {
        if self.complete {
            return InsertOutcome::Sealed;
        }
        let index = chunk.index();
        let declared = chunk.declared_total();
        let total = self.total.unwrap_or(declared);

        if declared != total {
            if self.strict_total {
                warn!(index, declared, total, "rejecting chunk with conflicting total");
                return InsertOutcome::TotalMismatch {
                    index,
                    declared,
                    total,
                };
            }
            // first total wins
            warn!(index, declared, total, "chunk declares a different total; keeping the first");
        }
        if index >= total {
            warn!(index, total, "chunk index out of range");
            return InsertOutcome::OutOfRange { index, total };
        }
        if self.chunks.contains_key(&index) {
            debug!(index, "duplicate chunk ignored");
            return InsertOutcome::Duplicate { index };
        }

        if self.total.is_none() {
            info!(total, "detected total chunks");
            self.total = Some(total);
        }
        self.chunks.insert(index, chunk.into_payload());
        info!(index, count = self.chunks.len(), total, "stored chunk");

        if self.chunks.len() == total as usize {
            self.complete = true;
            info!(total, "all chunks collected");
            InsertOutcome::Completed { index }
        } else {
            InsertOutcome::Stored { index }
        }
    }

    pub fn phase(&self) -> Phase {
        if self.complete {
            Phase::Complete
        } else if self.chunks.is_empty() {
            Phase::Empty
        } else {
            Phase::Collecting
        }
    }

    pub fn count(&self) -> usize {
        self.chunks.len()
    }

    pub fn total(&self) -> Option<u32> {
        self.total
    }

    pub fn contains(&self, index: u32) -> bool {
        self.chunks.contains_key(&index)
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn payload(&self, index: u32) -> Option<&[u8]> {
        self.chunks.get(&index).map(Vec::as_slice)
    }

    /// Indices below the total that have not arrived yet.
    pub fn missing(&self) -> Vec<u32> {
        match self.total {
            Some(t) => (0..t).filter(|i| !self.chunks.contains_key(i)).collect(),
            None => Vec::new(),
        }
    }

    /// Per-index presence for progress display.
    pub fn progress(&self) -> Progress {
        let slots = match self.total {
            Some(t) => (0..t)
                .map(|index| Slot {
                    index,
                    present: self.chunks.contains_key(&index),
                })
                .collect(),
            None => Vec::new(),
        };
        Progress {
            scanned: self.chunks.len(),
            total: self.total,
            slots,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub index: u32,
    pub present: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    pub scanned: usize,
    pub total: Option<u32>,
    pub slots: Vec<Slot>,
}

impl Progress {
    pub fn percent(&self) -> f32 {
        match self.total {
            Some(t) if t > 0 => self.scanned as f32 * 100.0 / t as f32,
            _ => 0.0,
        }
    }
}
