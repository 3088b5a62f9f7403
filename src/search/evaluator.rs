//! Per-seed verification: placement first, then loot

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rustc_hash::FxHashMap;

use super::condition::matches;
use super::events::SearchResult;
use super::request::{StructureTarget, TargetArea};
use crate::core::position::ChunkPos;
use crate::world::loot::{LootItem, LootTable, generate_loot};
use crate::world::structures::StructureConfig;

/// Checks one seed against every target. Holds no mutable state, so a single
/// instance is shared by all workers.
pub struct SeedEvaluator {
    structure: StructureConfig,
    table: Arc<LootTable>,
    targets: Vec<StructureTarget>,
}

impl SeedEvaluator {
    pub fn new(
        structure: StructureConfig,
        table: Arc<LootTable>,
        targets: Vec<StructureTarget>,
    ) -> Self {
        Self {
            structure,
            table,
            targets,
        }
    }

    pub fn targets(&self) -> &[StructureTarget] {
        &self.targets
    }

    /// Structure positions for `target` under `seed`, in scan order
    pub fn candidates(&self, seed: u32, target: &StructureTarget) -> Vec<ChunkPos> {
        let single = match target.area {
            TargetArea::Exact(pos) => pos,
            TargetArea::Area(rect) if rect.is_single() => rect.min(),
            TargetArea::Area(rect) => return self.structure.scan_rect(seed, &rect),
        };
        if self.structure.is_structure_chunk(seed, single) {
            vec![single]
        } else {
            Vec::new()
        }
    }

    pub fn evaluate(&self, seed: u32) -> Option<SearchResult> {
        self.evaluate_until(seed, &AtomicBool::new(false))
    }

    /// Like `evaluate`, but gives up (returning `None`) as soon as `abort` is
    /// seen set between loot generations.
    pub fn evaluate_until(&self, seed: u32, abort: &AtomicBool) -> Option<SearchResult> {
        // Placement is cheap, loot is not: reject on placement before rolling anything.
        let mut resolved = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let positions = self.candidates(seed, target);
            if positions.is_empty() {
                return None;
            }
            resolved.push(positions);
        }

        let mut loot_cache: FxHashMap<ChunkPos, Vec<LootItem>> = FxHashMap::default();
        let mut winner = None;

        for (target, positions) in self.targets.iter().zip(&resolved) {
            if !target.has_constraints() {
                continue;
            }

            let mut satisfied = None;
            for &pos in positions {
                if abort.load(Ordering::Relaxed) {
                    return None;
                }
                let loot = loot_cache
                    .entry(pos)
                    .or_insert_with(|| generate_loot(&self.table, seed, pos.x, pos.z));
                if matches(&target.required, loot) {
                    satisfied = Some(pos);
                    break;
                }
            }

            let pos = satisfied?;
            winner.get_or_insert(pos);
        }

        let position = match winner {
            Some(pos) => pos,
            None => *resolved.first()?.first()?,
        };
        let loot = loot_cache
            .remove(&position)
            .unwrap_or_else(|| generate_loot(&self.table, seed, position.x, position.z));

        Some(SearchResult {
            seed,
            position,
            loot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::position::ChunkRect;
    use crate::search::condition::{Comparator, ContainerScope, RequiredItem};
    use crate::world::structures::DESERT_PYRAMID;

    fn evaluator(targets: Vec<StructureTarget>) -> SeedEvaluator {
        let table = Arc::new(LootTable::desert_pyramid().unwrap());
        SeedEvaluator::new(DESERT_PYRAMID, table, targets)
    }

    fn any_bone() -> RequiredItem {
        RequiredItem::new("minecraft:bone", 0, Comparator::GreaterOrEqual, ContainerScope::All)
    }

    fn seeds_with_pyramid_at(pos: ChunkPos, limit: usize) -> Vec<u32> {
        (0u32..)
            .filter(|&seed| DESERT_PYRAMID.is_structure_chunk(seed, pos))
            .take(limit)
            .collect()
    }

    #[test]
    fn missing_placement_rejects_seed() {
        let origin = ChunkPos::new(0, 0);
        let eval = evaluator(vec![StructureTarget::exact(origin).with_required(any_bone())]);
        let miss = (0u32..)
            .find(|&seed| !DESERT_PYRAMID.is_structure_chunk(seed, origin))
            .unwrap();
        assert!(eval.evaluate(miss).is_none());
    }

    #[test]
    fn unconstrained_target_is_satisfied_by_placement_alone() {
        let origin = ChunkPos::new(0, 0);
        for seed in seeds_with_pyramid_at(origin, 5) {
            let eval = evaluator(vec![
                StructureTarget::exact(origin),
                StructureTarget::area(ChunkRect::new(-64, -64, 64, 64).unwrap())
                    .with_required(any_bone()),
            ]);
            let result = eval.evaluate(seed).expect("placement resolves, constraint is trivial");
            assert_eq!(result.seed, seed);
            // Winner comes from the first constrained target, in scan order
            let first_in_area = DESERT_PYRAMID.scan_area(seed, -64, -64, 64, 64)[0];
            assert_eq!(result.position, first_in_area);
            let table = LootTable::desert_pyramid().unwrap();
            assert_eq!(
                result.loot,
                generate_loot(&table, seed, first_in_area.x, first_in_area.z)
            );
        }
    }

    #[test]
    fn result_loot_satisfies_requirements() {
        let rect = ChunkRect::new(-96, -96, 96, 96).unwrap();
        let want = RequiredItem::new(
            "minecraft:gold_ingot",
            4,
            Comparator::GreaterOrEqual,
            ContainerScope::All,
        );
        let eval = evaluator(vec![StructureTarget::area(rect).with_required(want.clone())]);

        let mut hits = 0;
        for seed in 0..200u32 {
            if let Some(result) = eval.evaluate(seed) {
                hits += 1;
                assert!(rect.contains(result.position));
                assert!(DESERT_PYRAMID.is_structure_chunk(seed, result.position));
                assert!(matches(std::slice::from_ref(&want), &result.loot));
                // No earlier candidate in scan order may satisfy the requirement
                let table = LootTable::desert_pyramid().unwrap();
                for pos in DESERT_PYRAMID.scan_rect(seed, &rect) {
                    if pos == result.position {
                        break;
                    }
                    let loot = generate_loot(&table, seed, pos.x, pos.z);
                    assert!(!matches(std::slice::from_ref(&want), &loot));
                }
            }
        }
        assert!(hits > 0, "a wide area should yield gold for some seed");
    }

    #[test]
    fn single_point_area_equals_exact_target() {
        let pos = ChunkPos::new(5, 7);
        let exact = evaluator(vec![StructureTarget::exact(pos).with_required(any_bone())]);
        let point = evaluator(vec![
            StructureTarget::area(ChunkRect::single(pos)).with_required(any_bone()),
        ]);
        for seed in 0..3_000u32 {
            assert_eq!(exact.evaluate(seed), point.evaluate(seed));
        }
    }

    #[test]
    fn no_targets_matches_nothing() {
        let eval = evaluator(Vec::new());
        for seed in 0..10u32 {
            assert!(eval.evaluate(seed).is_none());
        }
    }

    #[test]
    fn abort_flag_abandons_evaluation() {
        let origin = ChunkPos::new(0, 0);
        let seed = seeds_with_pyramid_at(origin, 1)[0];
        let eval = evaluator(vec![StructureTarget::exact(origin).with_required(any_bone())]);
        assert!(eval.evaluate(seed).is_some());
        assert!(eval.evaluate_until(seed, &AtomicBool::new(true)).is_none());
    }
}
