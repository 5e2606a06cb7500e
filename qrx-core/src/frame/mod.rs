pub mod chunk;
pub mod symbol;

pub use chunk::{Chunk, encode_chunk, parse_chunk};
pub use symbol::DecodedSymbol;
