//! Core data structures for the seed search
//! Contains the game's random engine and chunk coordinate types.

pub mod position;
pub mod random;

// Re-export commonly used types
pub use position::{BlockPos, ChunkPos, ChunkRect};
pub use random::{MersenneTwister, gen_nums};
