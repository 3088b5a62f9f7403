//! Loot constraints and the matcher that checks generated loot against them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{CONTAINER_COUNT, ITEM_NAMESPACE};
use crate::error::{Error, Result};
use crate::world::loot::LootItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "==")]
    Equal,
    #[default]
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
}

impl Comparator {
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Equal => "==",
            Comparator::GreaterOrEqual => ">=",
            Comparator::LessOrEqual => "<=",
        }
    }

    pub fn parse_symbol(symbol: &str) -> Option<Self> {
        [
            Comparator::Equal,
            Comparator::GreaterOrEqual,
            Comparator::LessOrEqual,
        ]
        .into_iter()
        .find(|c| c.symbol() == symbol)
    }

    /// Lenient lookup: anything unrecognised means "at least"
    pub fn from_symbol(symbol: &str) -> Self {
        Self::parse_symbol(symbol).unwrap_or_default()
    }

    pub fn test(self, actual: u32, target: u32) -> bool {
        match self {
            Comparator::Equal => actual == target,
            Comparator::GreaterOrEqual => actual >= target,
            Comparator::LessOrEqual => actual <= target,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Which chest a requirement looks at; `All` sums over every chest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ContainerScope {
    #[default]
    All,
    Chest(usize),
}

impl TryFrom<i32> for ContainerScope {
    type Error = Error;

    fn try_from(index: i32) -> Result<Self> {
        match index {
            -1 => Ok(ContainerScope::All),
            i if (0..CONTAINER_COUNT as i32).contains(&i) => Ok(ContainerScope::Chest(i as usize)),
            other => Err(Error::InvalidContainer(other)),
        }
    }
}

impl From<ContainerScope> for i32 {
    fn from(scope: ContainerScope) -> i32 {
        match scope {
            ContainerScope::All => -1,
            ContainerScope::Chest(i) => i as i32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredItem {
    pub name: String,
    pub count: u32,
    #[serde(default)]
    pub comparator: Comparator,
    #[serde(default)]
    pub container: ContainerScope,
}

impl RequiredItem {
    pub fn new(
        name: impl Into<String>,
        count: u32,
        comparator: Comparator,
        container: ContainerScope,
    ) -> Self {
        Self {
            name: name.into(),
            count,
            comparator,
            container,
        }
    }

    pub fn matches_count(&self, actual: u32) -> bool {
        self.comparator.test(actual, self.count)
    }
}

impl fmt::Display for RequiredItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, self.comparator, self.count)?;
        if let ContainerScope::Chest(i) = self.container {
            write!(f, "@{}", i)?;
        }
        Ok(())
    }
}

/// Parses `NAME OP COUNT [@CHEST]`, e.g. `diamond>=2` or `minecraft:emerald==1@3`
impl FromStr for RequiredItem {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidRequirement(text.to_string());

        let (body, container) = match text.trim().rsplit_once('@') {
            Some((body, chest)) => {
                let index: i32 = chest.trim().parse().map_err(|_| invalid())?;
                (body, ContainerScope::try_from(index)?)
            }
            None => (text.trim(), ContainerScope::All),
        };

        let op_at = body.find(['=', '>', '<']).ok_or_else(invalid)?;
        let (name, rest) = body.split_at(op_at);
        let symbol = rest.get(..2).ok_or_else(invalid)?;
        let count = &rest[symbol.len()..];
        let comparator = Comparator::parse_symbol(symbol).ok_or_else(invalid)?;
        let count: u32 = count.trim().parse().map_err(|_| invalid())?;

        let name = name.trim();
        if name.is_empty() {
            return Err(invalid());
        }
        let name = if name.contains(':') {
            name.to_string()
        } else {
            format!("{}{}", ITEM_NAMESPACE, name)
        };

        Ok(RequiredItem::new(name, count, comparator, container))
    }
}

/// Cut flat loot into four consecutive buckets of `ceil(n / 4)` items.
///
/// This approximates chest membership after the fact and does not follow the
/// real per-chest rolls; trailing buckets may be short or empty.
pub fn split_into_containers(loot: &[LootItem]) -> [&[LootItem]; CONTAINER_COUNT] {
    let mut buckets: [&[LootItem]; CONTAINER_COUNT] = [&[]; CONTAINER_COUNT];
    if loot.is_empty() {
        return buckets;
    }
    let size = loot.len().div_ceil(CONTAINER_COUNT);
    for (bucket, chunk) in buckets.iter_mut().zip(loot.chunks(size)) {
        *bucket = chunk;
    }
    buckets
}

fn count_named(items: &[LootItem], name: &str) -> u32 {
    items
        .iter()
        .filter(|item| item.name == name)
        .map(|item| item.count)
        .sum()
}

/// Whether `loot` satisfies every requirement (conjunction)
pub fn matches(required: &[RequiredItem], loot: &[LootItem]) -> bool {
    if required.is_empty() {
        return true;
    }
    if loot.is_empty() {
        return false;
    }

    let buckets = split_into_containers(loot);
    required.iter().all(|req| {
        let actual = match req.container {
            ContainerScope::All => buckets.iter().map(|b| count_named(b, &req.name)).sum(),
            ContainerScope::Chest(i) => count_named(buckets[i], &req.name),
        };
        req.matches_count(actual)
    })
}
