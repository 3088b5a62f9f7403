use serde::{Deserialize, Serialize};

use super::condition::RequiredItem;
use crate::constants::SEED_SPACE;
use crate::core::position::{ChunkPos, ChunkRect};
use crate::error::{Error, Result};

/// Where a structure is expected: one chunk, or anywhere inside a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetArea {
    Exact(ChunkPos),
    Area(ChunkRect),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureTarget {
    pub area: TargetArea,
    #[serde(default)]
    pub required: Vec<RequiredItem>,
}

impl StructureTarget {
    pub fn exact(pos: ChunkPos) -> Self {
        Self {
            area: TargetArea::Exact(pos),
            required: Vec::new(),
        }
    }

    pub fn area(rect: ChunkRect) -> Self {
        Self {
            area: TargetArea::Area(rect),
            required: Vec::new(),
        }
    }

    pub fn with_required(mut self, item: RequiredItem) -> Self {
        self.required.push(item);
        self
    }

    pub fn has_constraints(&self) -> bool {
        !self.required.is_empty()
    }

    /// The chunk used to label this target: the exact chunk or the area's min corner
    pub fn representative(&self) -> ChunkPos {
        match self.area {
            TargetArea::Exact(pos) => pos,
            TargetArea::Area(rect) => rect.min(),
        }
    }
}

/// One run's input: targets plus the half-open seed range `[start_seed, end_seed)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub targets: Vec<StructureTarget>,
    pub worker_count: usize,
    pub start_seed: u64,
    pub end_seed: u64,
}

impl SearchRequest {
    pub fn new(targets: Vec<StructureTarget>) -> Self {
        Self {
            targets,
            worker_count: num_cpus::get().max(1),
            start_seed: 0,
            end_seed: SEED_SPACE,
        }
    }

    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_start_seed(mut self, start_seed: u64) -> Self {
        self.start_seed = start_seed;
        self
    }

    pub fn with_end_seed(mut self, end_seed: u64) -> Self {
        self.end_seed = end_seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(Error::NoTargets);
        }
        if !self.targets.iter().any(StructureTarget::has_constraints) {
            return Err(Error::NoConstraints);
        }
        if self.worker_count == 0 {
            return Err(Error::NoWorkers);
        }
        if self.start_seed >= SEED_SPACE {
            return Err(Error::SeedOutOfRange(self.start_seed));
        }
        if self.end_seed > SEED_SPACE {
            return Err(Error::SeedOutOfRange(self.end_seed));
        }
        if self.start_seed >= self.end_seed {
            return Err(Error::EmptySeedRange {
                start: self.start_seed,
                end: self.end_seed,
            });
        }
        Ok(())
    }

    pub fn seed_count(&self) -> u64 {
        self.end_seed.saturating_sub(self.start_seed)
    }
}
