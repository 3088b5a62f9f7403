//! Structure placement rules

pub mod desert_pyramid;
pub mod structure;

pub use desert_pyramid::DESERT_PYRAMID;
pub use structure::StructureConfig;
