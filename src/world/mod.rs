//! World generation modules
//! Contains structure placement and chest loot generation.

pub mod loot;
pub mod structures;

// Re-export commonly used types
pub use loot::{LootItem, LootTable, generate_loot, generate_loot_by_chest};
pub use structures::{DESERT_PYRAMID, StructureConfig};
