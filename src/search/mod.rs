//! Seed search: constraints, requests, per-seed evaluation and the
//! multi-threaded coordinator.

pub mod condition;
pub mod coordinator;
pub mod evaluator;
pub mod events;
pub mod request;

// Re-export commonly used types
pub use condition::{Comparator, ContainerScope, RequiredItem, matches, split_into_containers};
pub use coordinator::{SearchOptions, SearchState, Searcher, StopMode};
pub use evaluator::SeedEvaluator;
pub use events::{CompletionReason, ProgressSnapshot, SearchEvent, SearchResult};
pub use request::{SearchRequest, StructureTarget, TargetArea};
