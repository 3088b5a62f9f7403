use thiserror::Error;

/// Errors surfaced by request validation, configuration loading and checkpoints.
///
/// Nothing here is raised mid-run: a search either starts with a valid request
/// or is rejected before any worker is spawned.
#[derive(Debug, Error)]
pub enum Error {
    #[error("search request has no targets")]
    NoTargets,

    #[error("at least one target must carry required items")]
    NoConstraints,

    #[error("malformed area: min ({min_x}, {min_z}) exceeds max ({max_x}, {max_z})")]
    InvalidArea {
        min_x: i32,
        min_z: i32,
        max_x: i32,
        max_z: i32,
    },

    #[error("seed {0} is outside [0, 2^32)")]
    SeedOutOfRange(u64),

    #[error("empty seed range: start {start} is not below end {end}")]
    EmptySeedRange { start: u64, end: u64 },

    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("container index {0} must be -1 or 0..=3")]
    InvalidContainer(i32),

    #[error("cannot parse requirement '{0}' (expected NAME>=COUNT[@CHEST])")]
    InvalidRequirement(String),

    #[error("a search is already running")]
    AlreadyRunning,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("checkpoint encoding error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("invalid checkpoint: {0}")]
    Checkpoint(String),
}

pub type Result<T> = std::result::Result<T, Error>;
