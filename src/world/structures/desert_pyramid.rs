use super::StructureConfig;

/// Desert pyramid placement: one per 32x32-chunk cell, offset within 24 chunks
pub const DESERT_PYRAMID: StructureConfig = StructureConfig {
    name: "desert_pyramid",
    salt: 14_357_617,
    spacing: 32,
    separation: 24,
    derived_count: 2,
};
