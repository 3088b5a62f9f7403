//! Declarative loot-table model
//!
//! Mirrors the game's JSON loot tables closely enough that the shipped
//! `desert_pyramid.json` deserializes as-is. Tables are read-only once loaded.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

const DESERT_PYRAMID_JSON: &str = include_str!("../../../assets/loot_tables/desert_pyramid.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    pub pools: Vec<LootPool>,
}

impl LootTable {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The desert pyramid chest table bundled with the binary
    pub fn desert_pyramid() -> Result<Self> {
        Self::from_json_str(DESERT_PYRAMID_JSON)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootPool {
    pub rolls: Rolls,
    pub entries: Vec<LootEntry>,
}

impl LootPool {
    /// Sum of entry weights in 32-bit signed arithmetic, wrapping like the game.
    /// A pool whose total is not positive never rolls.
    pub fn total_weight(&self) -> i32 {
        self.entries
            .iter()
            .fold(0i32, |total, e| total.wrapping_add(e.weight as i32))
    }
}

/// Roll count: a plain number or an inclusive `{min, max}` range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rolls {
    Fixed(i32),
    Range(IntRange),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub functions: Vec<LootFunction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Item,
    Empty,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "function", rename_all = "snake_case")]
pub enum LootFunction {
    SetCount { count: IntRange },
    EnchantRandomly,
    #[serde(other)]
    Unknown,
}
