//! Model training
//!
//! [`TrainEngine`] drives a whole run: an optional regularization sweep on a
//! held-out split, a k-fold cross-validation for the accuracy estimate, and
//! a final pass over every example. [`GradientDescent`] fits one binary
//! weight vector per call. Every partition is deterministic index
//! arithmetic, so identical input yields an identical model.

mod config;
mod engine;
mod optimizer;
pub mod cross_validation;

pub use config::{Regularization, TrainingConfig};
pub use cross_validation::{modulo_folds, CVSplit};
pub use engine::TrainEngine;
pub use optimizer::GradientDescent;
