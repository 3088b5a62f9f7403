use serde::{Deserialize, Serialize};

use crate::core::position::ChunkPos;
use crate::world::loot::LootItem;

/// A seed whose generated structures satisfy every target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub seed: u32,
    pub position: ChunkPos,
    pub loot: Vec<LootItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub percent_complete: f64,
    /// Last seed touched by any worker; advisory only
    pub current_seed: u64,
    pub seeds_per_second: u64,
    pub elapsed_ms: u64,
    pub seeds_processed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionReason {
    /// Every worker ran out of seeds
    Exhausted,
    /// Graceful stop: in-flight seeds were finished
    Stopped,
    /// Forced stop: in-flight seeds may have been abandoned
    Aborted,
}

/// Everything a run reports, in one stream ending with `Completed`
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Progress(ProgressSnapshot),
    Found(SearchResult),
    Completed(CompletionReason),
}
