use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{CHUNK_CENTER_OFFSET, CHUNK_SIZE};
use crate::error::{Error, Result};

/// Chunk-space coordinate; everything inside the search works in chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Block at the centre of the chunk
    pub fn to_block(self) -> BlockPos {
        BlockPos::new(
            self.x * CHUNK_SIZE + CHUNK_CENTER_OFFSET,
            self.z * CHUNK_SIZE + CHUNK_CENTER_OFFSET,
        )
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CPos{{x={}, z={}}}", self.x, self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    // Truncating division, matching how positions are typed in by users
    pub fn to_chunk(self) -> ChunkPos {
        ChunkPos::new(self.x / CHUNK_SIZE, self.z / CHUNK_SIZE)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BPos{{x={}, z={}}}", self.x, self.z)
    }
}

/// Inclusive axis-aligned rectangle of chunks with `min <= max` on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRect")]
pub struct ChunkRect {
    min_x: i32,
    min_z: i32,
    max_x: i32,
    max_z: i32,
}

#[derive(Deserialize)]
struct RawRect {
    min_x: i32,
    min_z: i32,
    max_x: i32,
    max_z: i32,
}

impl TryFrom<RawRect> for ChunkRect {
    type Error = Error;

    fn try_from(raw: RawRect) -> Result<Self> {
        ChunkRect::new(raw.min_x, raw.min_z, raw.max_x, raw.max_z)
    }
}

impl ChunkRect {
    pub fn new(min_x: i32, min_z: i32, max_x: i32, max_z: i32) -> Result<Self> {
        if min_x > max_x || min_z > max_z {
            return Err(Error::InvalidArea {
                min_x,
                min_z,
                max_x,
                max_z,
            });
        }
        Ok(Self {
            min_x,
            min_z,
            max_x,
            max_z,
        })
    }

    pub fn single(pos: ChunkPos) -> Self {
        Self {
            min_x: pos.x,
            min_z: pos.z,
            max_x: pos.x,
            max_z: pos.z,
        }
    }

    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    pub fn min_z(&self) -> i32 {
        self.min_z
    }

    pub fn max_x(&self) -> i32 {
        self.max_x
    }

    pub fn max_z(&self) -> i32 {
        self.max_z
    }

    pub fn min(&self) -> ChunkPos {
        ChunkPos::new(self.min_x, self.min_z)
    }

    pub fn max(&self) -> ChunkPos {
        ChunkPos::new(self.max_x, self.max_z)
    }

    pub fn is_single(&self) -> bool {
        self.min_x == self.max_x && self.min_z == self.max_z
    }

    pub fn contains(&self, pos: ChunkPos) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.z >= self.min_z && pos.z <= self.max_z
    }
}
