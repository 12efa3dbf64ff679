//! Training configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, VelozError};

/// How the L2 regularization strength is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Regularization {
    /// Use the given strength as-is: no validation split, and the accuracy
    /// estimate cross-validates over the full dataset.
    Fixed(f64),
    /// Hold out every 5th example and sweep a ladder of candidate
    /// strengths, keeping the one with the lowest validation cost.
    Search,
}

impl Default for Regularization {
    fn default() -> Self {
        Regularization::Search
    }
}

/// Configuration for a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Initial gradient-descent step size; halved whenever cost regresses.
    pub learning_rate: f64,
    /// Number of folds for the cross-validated accuracy estimate.
    pub cv_folds: usize,
    /// L2 strength selection strategy.
    pub regularization: Regularization,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            cv_folds: 10,
            regularization: Regularization::Search,
        }
    }
}

impl TrainingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the number of cross-validation folds.
    pub fn with_cv_folds(mut self, cv_folds: usize) -> Self {
        self.cv_folds = cv_folds;
        self
    }

    /// Set the regularization strategy.
    pub fn with_regularization(mut self, regularization: Regularization) -> Self {
        self.regularization = regularization;
        self
    }

    /// Reject values the optimizer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(VelozError::InvalidParameter {
                name: "learning_rate".to_string(),
                value: self.learning_rate.to_string(),
                reason: "must be positive and finite".to_string(),
            });
        }
        if self.cv_folds < 2 {
            return Err(VelozError::InvalidParameter {
                name: "cv_folds".to_string(),
                value: self.cv_folds.to_string(),
                reason: "must be at least 2".to_string(),
            });
        }
        if let Regularization::Fixed(lambda) = self.regularization {
            if !(lambda >= 0.0 && lambda.is_finite()) {
                return Err(VelozError::InvalidParameter {
                    name: "regularization".to_string(),
                    value: lambda.to_string(),
                    reason: "fixed strength must be non-negative and finite".to_string(),
                });
            }
        }
        Ok(())
    }
}
