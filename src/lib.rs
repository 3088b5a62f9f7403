// Core module with the random engine and coordinate types
pub mod core;

// World module with structure placement and chest loot
pub mod world;

// Search module with conditions, evaluation and the coordinator
pub mod search;

// Command-line front end
pub mod app;

// Other modules
pub mod constants;
pub mod error;
pub mod save;

// Re-exports
pub use constants::*;
pub use core::{BlockPos, ChunkPos, ChunkRect, MersenneTwister, gen_nums};
pub use error::{Error, Result};
pub use save::{SearchCheckpoint, default_checkpoint_path, load_checkpoint, save_checkpoint};
pub use search::{
    Comparator, CompletionReason, ContainerScope, ProgressSnapshot, RequiredItem, SearchEvent,
    SearchOptions, SearchRequest, SearchResult, SearchState, Searcher, SeedEvaluator, StopMode,
    StructureTarget, TargetArea,
};
pub use world::{
    DESERT_PYRAMID, LootItem, LootTable, StructureConfig, generate_loot, generate_loot_by_chest,
};
