use crate::constants::{GRID_X_MULTIPLIER, GRID_Z_MULTIPLIER};
use crate::core::position::{ChunkPos, ChunkRect};
use crate::core::random::gen_nums;

/// Placement rule for a structure type spread on a fixed grid.
///
/// The world is cut into `spacing`-chunk square cells. Each cell holds exactly
/// one candidate placement, at an offset in `[0, separation)` on both axes
/// derived from the world seed and the cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureConfig {
    pub name: &'static str,
    pub salt: i32,
    pub spacing: i32,
    pub separation: i32,
    pub derived_count: usize,
}

impl StructureConfig {
    fn cell_seed(&self, world_seed: u32, grid_x: i32, grid_z: i32) -> u32 {
        let z_factor = GRID_Z_MULTIPLIER.wrapping_mul(grid_z);
        let x_factor = GRID_X_MULTIPLIER.wrapping_mul(grid_x);
        self.salt
            .wrapping_add(world_seed as i32)
            .wrapping_sub(z_factor)
            .wrapping_sub(x_factor) as u32
    }

    /// Offset of the placement inside cell (`grid_x`, `grid_z`)
    fn cell_offset(&self, world_seed: u32, grid_x: i32, grid_z: i32) -> (i32, i32) {
        let nums = gen_nums(self.cell_seed(world_seed, grid_x, grid_z), self.derived_count);
        let sep = self.separation as u32;
        ((nums[0] % sep) as i32, (nums[1] % sep) as i32)
    }

    /// Whether this structure generates exactly at `pos` for `world_seed`
    pub fn is_structure_chunk(&self, world_seed: u32, pos: ChunkPos) -> bool {
        let grid_x = pos.x.div_euclid(self.spacing);
        let grid_z = pos.z.div_euclid(self.spacing);
        let (off_x, off_z) = self.cell_offset(world_seed, grid_x, grid_z);
        off_x == pos.x.rem_euclid(self.spacing) && off_z == pos.z.rem_euclid(self.spacing)
    }

    /// Every placement inside the inclusive rectangle.
    ///
    /// Cells are visited grid-x major, grid-z minor, so the output order is
    /// stable for a given seed and rectangle.
    pub fn scan_area(
        &self,
        world_seed: u32,
        min_x: i32,
        min_z: i32,
        max_x: i32,
        max_z: i32,
    ) -> Vec<ChunkPos> {
        let reach = self.separation - 1;
        let min_grid_x = min_x.saturating_sub(reach).div_euclid(self.spacing);
        let max_grid_x = max_x.div_euclid(self.spacing);
        let min_grid_z = min_z.saturating_sub(reach).div_euclid(self.spacing);
        let max_grid_z = max_z.div_euclid(self.spacing);

        let mut found = Vec::new();
        for grid_x in min_grid_x..=max_grid_x {
            for grid_z in min_grid_z..=max_grid_z {
                let (off_x, off_z) = self.cell_offset(world_seed, grid_x, grid_z);
                let x = grid_x.wrapping_mul(self.spacing).wrapping_add(off_x);
                let z = grid_z.wrapping_mul(self.spacing).wrapping_add(off_z);
                if x >= min_x && x <= max_x && z >= min_z && z <= max_z {
                    found.push(ChunkPos::new(x, z));
                }
            }
        }
        found
    }

    pub fn scan_rect(&self, world_seed: u32, rect: &ChunkRect) -> Vec<ChunkPos> {
        self.scan_area(world_seed, rect.min_x(), rect.min_z(), rect.max_x(), rect.max_z())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::structures::DESERT_PYRAMID;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn point_scan_agrees_with_single_check() {
        let mut rng = StdRng::seed_from_u64(0x7e57_5eed);
        for _ in 0..2_000 {
            let seed: u32 = rng.r#gen();
            let pos = ChunkPos::new(rng.gen_range(-200..200), rng.gen_range(-200..200));
            let scanned = DESERT_PYRAMID.scan_area(seed, pos.x, pos.z, pos.x, pos.z);
            assert_eq!(
                DESERT_PYRAMID.is_structure_chunk(seed, pos),
                scanned == vec![pos],
                "seed {seed} pos {pos}"
            );
        }
    }

    #[test]
    fn scan_matches_brute_force_including_negative_chunks() {
        for seed in [0u32, 1, 42, 123_456_789, u32::MAX] {
            let (min_x, min_z, max_x, max_z) = (-70, -45, 60, 75);
            let scanned = DESERT_PYRAMID.scan_area(seed, min_x, min_z, max_x, max_z);

            let mut brute = Vec::new();
            for x in min_x..=max_x {
                for z in min_z..=max_z {
                    let pos = ChunkPos::new(x, z);
                    if DESERT_PYRAMID.is_structure_chunk(seed, pos) {
                        brute.push(pos);
                    }
                }
            }

            let mut sorted = scanned.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), scanned.len(), "duplicates for seed {seed}");
            brute.sort();
            assert_eq!(sorted, brute, "seed {seed}");
        }
    }

    #[test]
    fn one_placement_per_cell() {
        let seed = 987_654;
        let spacing = DESERT_PYRAMID.spacing;
        for grid_x in -3..3 {
            for grid_z in -3..3 {
                let found = DESERT_PYRAMID.scan_area(
                    seed,
                    grid_x * spacing,
                    grid_z * spacing,
                    grid_x * spacing + spacing - 1,
                    grid_z * spacing + spacing - 1,
                );
                assert_eq!(found.len(), 1);
                let pos = found[0];
                assert!(pos.x.rem_euclid(spacing) < DESERT_PYRAMID.separation);
                assert!(pos.z.rem_euclid(spacing) < DESERT_PYRAMID.separation);
            }
        }
    }

    #[test]
    fn scan_is_deterministic_and_grid_x_major() {
        let first = DESERT_PYRAMID.scan_area(31_337, -100, -100, 100, 100);
        assert_eq!(first, DESERT_PYRAMID.scan_area(31_337, -100, -100, 100, 100));
        let cells: Vec<(i32, i32)> = first
            .iter()
            .map(|p| (p.x.div_euclid(32), p.z.div_euclid(32)))
            .collect();
        let mut ordered = cells.clone();
        ordered.sort();
        assert_eq!(cells, ordered);
    }

    #[test]
    fn scan_rect_delegates() {
        let rect = ChunkRect::new(-40, -40, 40, 40).unwrap();
        assert_eq!(
            DESERT_PYRAMID.scan_rect(5, &rect),
            DESERT_PYRAMID.scan_area(5, -40, -40, 40, 40)
        );
    }
}
