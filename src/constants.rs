// Seed space
pub const SEED_SPACE: u64 = 1 << 32;

// Chunk geometry
pub const CHUNK_SIZE: i32 = 16;
pub const CHUNK_CENTER_OFFSET: i32 = 8;

// Loot containers per structure
pub const CONTAINER_COUNT: usize = 4;
pub const ITEM_NAMESPACE: &str = "minecraft:";

// Placement grid multipliers (applied to grid z and grid x)
pub const GRID_Z_MULTIPLIER: i32 = 245_998_635;
pub const GRID_X_MULTIPLIER: i32 = 1_724_254_968;

// Search defaults
pub const PROGRESS_INTERVAL_MS: u64 = 500;
pub const CHECKPOINT_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_CHECKPOINT_FILE: &str = "checkpoint.tsck";
