//! Line splitting for chunked byte streams.
//!
//! - [`LineAccumulator`] - Stateful splitter with `ingest()`/`finalize()` API
//! - [`LineIter`] - Pull-based iterator over a [`ChunkSource`](crate::ChunkSource)

mod engine;
mod iter;

pub use engine::LineAccumulator;
pub use iter::LineIter;
