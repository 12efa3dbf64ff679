//! Trained models and the classification surface
//!
//! [`MultiLabelModel`] is the terminal artifact of training: immutable,
//! shareable across threads without locks, reconstructable from persisted
//! bytes. [`Classifier`] is the capability seam — new learner types plug in
//! behind it without touching composition or persistence call sites.

mod model;

pub use model::{BinaryModel, MultiLabelModel};
pub(crate) use model::sigmoid;

use std::collections::BTreeMap;

use crate::dataset::FeatureMap;
use crate::error::Result;

/// What every trained classifier can do.
pub trait Classifier: Send + Sync {
    /// Most probable label for the given features.
    fn classify(&self, features: &FeatureMap) -> &str;

    /// Per-label probability estimates for the given features.
    fn label_probabilities(&self, features: &FeatureMap) -> BTreeMap<String, f64>;

    /// Encode the trained model for storage.
    fn to_bytes(&self) -> Result<Vec<u8>>;
}
