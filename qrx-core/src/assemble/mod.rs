pub mod assembler;

pub use assembler::{ChunkAssembler, InsertOutcome, Phase, Progress, Slot};
