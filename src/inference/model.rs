//! Binary and multi-label model types

use std::collections::BTreeMap;

use crate::dataset::FeatureMap;
use crate::error::{Result, VelozError};
use crate::inference::Classifier;
use crate::preprocessing::Standardizer;

/// Logistic sigmoid.
pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// One trained positive-vs-rest weight vector plus the standardization
/// statistics it was trained under.
///
/// Weights are sparse: only features observed during this model's training
/// appear. Once constructed the model is immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryModel {
    weights: BTreeMap<String, f64>,
    standardizer: Standardizer,
}

impl BinaryModel {
    /// Build a model from learned weights and their statistics.
    ///
    /// Every weighted feature must carry statistics; scoring standardizes
    /// each query value with them.
    pub fn new(weights: BTreeMap<String, f64>, standardizer: Standardizer) -> Result<Self> {
        for name in weights.keys() {
            if !standardizer.contains(name) {
                return Err(VelozError::ConfigError(format!(
                    "weight for feature '{}' has no standardization statistics",
                    name
                )));
            }
        }
        Ok(Self {
            weights,
            standardizer,
        })
    }

    /// Probability that this model's positive label applies.
    ///
    /// Only features present in both the query and the learned weights
    /// contribute; unknown query features are ignored. The learned intercept
    /// participates only when the caller includes the bias feature
    /// (`"_bias" = 1.0`) in the query — training-side callers always do,
    /// external callers usually pass raw feature maps without it.
    pub fn predict_proba(&self, features: &FeatureMap) -> f64 {
        let mut score = 0.0;
        for (name, value) in features {
            if let Some(weight) = self.weights.get(name) {
                if let Some(z) = self.standardizer.standardized(name, *value) {
                    score += weight * z;
                }
            }
        }
        sigmoid(score)
    }

    pub fn weights(&self) -> &BTreeMap<String, f64> {
        &self.weights
    }

    pub fn standardizer(&self) -> &Standardizer {
        &self.standardizer
    }
}

/// A trained classifier over two or more labels.
///
/// Two labels are served by a single [`BinaryModel`] whose positive class is
/// `labels[1]`; more than two labels get one model per label, trained
/// positive-vs-rest. Labels are stored in lexicographic order and that order
/// is the tie-break order at classification time.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiLabelModel {
    labels: Vec<String>,
    models: Vec<BinaryModel>,
    accuracy: f64,
}

impl MultiLabelModel {
    /// Assemble a classifier; fails unless the label/model cardinality
    /// invariant holds (2 labels ⇒ 1 model, N > 2 labels ⇒ N models).
    pub fn new(labels: Vec<String>, models: Vec<BinaryModel>, accuracy: f64) -> Result<Self> {
        if labels.len() < 2 {
            return Err(VelozError::ConfigError(format!(
                "a classifier requires at least 2 distinct labels, got {}",
                labels.len()
            )));
        }
        let expected = if labels.len() == 2 { 1 } else { labels.len() };
        if models.len() != expected {
            return Err(VelozError::ConfigError(format!(
                "{} labels require {} binary models, got {}",
                labels.len(),
                expected,
                models.len()
            )));
        }
        Ok(Self {
            labels,
            models,
            accuracy,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn binary_models(&self) -> &[BinaryModel] {
        &self.models
    }

    /// Cross-validated accuracy estimate attached at training time.
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Per-label probabilities.
    ///
    /// Two labels: the single model's probability and its complement, so the
    /// pair sums to 1. More than two: each one-vs-rest model's sigmoid,
    /// reported independently — deliberately not normalized into a softmax,
    /// so the values need not sum to 1.
    pub fn label_probabilities(&self, features: &FeatureMap) -> BTreeMap<String, f64> {
        let mut probabilities = BTreeMap::new();
        if self.labels.len() == 2 {
            let p = self.models[0].predict_proba(features);
            probabilities.insert(self.labels[1].clone(), p);
            probabilities.insert(self.labels[0].clone(), 1.0 - p);
        } else {
            for (label, model) in self.labels.iter().zip(&self.models) {
                probabilities.insert(label.clone(), model.predict_proba(features));
            }
        }
        probabilities
    }

    /// Label with the highest probability; exact ties go to the first label
    /// in stored order.
    pub fn classify(&self, features: &FeatureMap) -> &str {
        let probabilities = self.label_probabilities(features);
        let mut best_label = "";
        let mut best_p = f64::NEG_INFINITY;
        for label in &self.labels {
            if let Some(p) = probabilities.get(label.as_str()) {
                if *p > best_p {
                    best_label = label.as_str();
                    best_p = *p;
                }
            }
        }
        best_label
    }

    /// Decode a model previously produced by [`Classifier::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        crate::export::model_from_bytes(bytes)
    }
}

impl Classifier for MultiLabelModel {
    fn classify(&self, features: &FeatureMap) -> &str {
        MultiLabelModel::classify(self, features)
    }

    fn label_probabilities(&self, features: &FeatureMap) -> BTreeMap<String, f64> {
        MultiLabelModel::label_probabilities(self, features)
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        crate::export::model_to_bytes(self)
    }
}
