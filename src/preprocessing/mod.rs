//! Feature standardization
//!
//! Per-feature z-score statistics computed once over a training slice and
//! embedded in the trained model, so inference standardizes queries with
//! exactly the numbers training saw.

mod standardizer;

pub use standardizer::{FeatureStats, Standardizer};
