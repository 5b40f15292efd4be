//! Single-flight generation of tiles and metas.
//!
//! Requests are keyed by a fingerprint. Concurrent requests with the same
//! fingerprint share one generation and all receive its result. Nothing is
//! kept once the generation has finished.

mod coordinator;
mod fingerprint;

pub use coordinator::{CoordinatorStats, GenerationCoordinator, GenerationResult};
pub use fingerprint::{meta_fingerprint, tile_fingerprint};
