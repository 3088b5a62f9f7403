//! Loot tables and chest loot generation

pub mod generator;
pub mod table;

pub use generator::{
    LootItem, chest_seeds, generate_loot, generate_loot_by_chest, roll_loot, summarize,
};
pub use table::{EntryKind, IntRange, LootEntry, LootFunction, LootPool, LootTable, Rolls};
