//! Record post-processing
//!
//! Steps applied to each raw record before schema conformance: key
//! normalization, parent-context injection, derived fields, and exclusion.

mod steps;
mod types;

pub use steps::{normalize_key, Pipeline};
pub use types::{PostProcessStep, PostProcessor};
