//! Veloz - Self-tuning logistic regression
//!
//! This crate trains and serves a supervised classifier:
//! - L2-regularized logistic regression fit by full-batch gradient descent
//! - Per-feature z-score standardization over sparse, name-keyed features
//! - Automatic regularization-strength selection on a held-out split
//! - k-fold cross-validation for an accuracy estimate
//! - One-vs-rest composition for more than two labels
//! - A checked binary persistence format
//!
//! Training is single-threaded, synchronous, and deterministic: the same
//! ordered example sequence with the same configuration produces a
//! bit-identical model. A finished model is immutable and can be shared
//! across threads for inference without locks.
//!
//! # Modules
//!
//! - [`dataset`] - Bias-augmented examples and the collections that hold them
//! - [`preprocessing`] - Per-feature standardization statistics
//! - [`training`] - Gradient descent, regularization search, cross-validation
//! - [`inference`] - Trained models and the [`Classifier`](inference::Classifier) seam
//! - [`export`] - Model persistence

// Core error handling
pub mod error;

// Data model
pub mod dataset;

// Training pipeline
pub mod preprocessing;
pub mod training;

// Trained models
pub mod inference;

// Persistence
pub mod export;

pub use error::{Result, VelozError};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{Result, VelozError};

    // Data model
    pub use crate::dataset::{Dataset, Example, FeatureMap, BIAS_FEATURE};

    // Training
    pub use crate::training::{Regularization, TrainEngine, TrainingConfig};

    // Inference
    pub use crate::inference::{BinaryModel, Classifier, MultiLabelModel};

    // Persistence
    pub use crate::export::{load_classifier, load_model, save_model};
}
