//! Vector search for euphony.
//!
//! Standardizes catalog feature vectors and answers "which tracks sound
//! most like this one" from a seeded random-projection forest.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod distance;
pub mod error;
pub mod index;
pub mod normalize;
pub mod slot;

pub use distance::Metric;
pub use error::{SearchError, SearchResult};
pub use index::{AnnIndex, IndexParams, Neighbor};
pub use normalize::NormParams;
pub use slot::IndexSlot;
