//! Line types.
//!
//! - [`Line`] - Decoded text of one line with its position in the stream

mod data;

pub use data::Line;
