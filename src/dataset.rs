//! Training examples and the ordered collections that hold them

use std::collections::{BTreeMap, BTreeSet};

/// Name of the synthetic bias feature appended to every example.
///
/// Giving every example a constant `_bias = 1.0` feature lets the linear
/// model learn an intercept term without special-casing it anywhere in the
/// optimizer.
pub const BIAS_FEATURE: &str = "_bias";

/// Ordered feature container used across the crate.
///
/// A `BTreeMap` rather than a `HashMap`: iteration order is the feature-name
/// order, so every floating-point accumulation (and every serialized byte)
/// comes out the same on every run.
pub type FeatureMap = BTreeMap<String, f64>;

/// A single labelled training example.
///
/// Construction appends the [`BIAS_FEATURE`]; a caller-supplied `_bias`
/// value is replaced with 1.0. Examples are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    label: String,
    features: FeatureMap,
}

impl Example {
    /// Build an example from a label and a feature-value map.
    pub fn new(label: &str, features: FeatureMap) -> Self {
        let mut features = features;
        features.insert(BIAS_FEATURE.to_string(), 1.0);
        Self {
            label: label.to_string(),
            features,
        }
    }

    /// Build an example from a label and a set of present feature names,
    /// each implicitly valued 1.0.
    pub fn from_indicators<I, S>(label: &str, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let map: FeatureMap = features.into_iter().map(|name| (name.into(), 1.0)).collect();
        Self::new(label, map)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn features(&self) -> &FeatureMap {
        &self.features
    }
}

/// An ordered sequence of training examples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    examples: Vec<Example>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a (label, feature-map) example.
    pub fn add_example(&mut self, label: &str, features: FeatureMap) -> &mut Self {
        self.examples.push(Example::new(label, features));
        self
    }

    /// Append a (label, feature-set) example; each named feature gets 1.0.
    pub fn add_indicator_example<I, S>(&mut self, label: &str, features: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples.push(Example::from_indicators(label, features));
        self
    }

    /// Append an already-built example.
    pub fn push(&mut self, example: Example) -> &mut Self {
        self.examples.push(example);
        self
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Distinct labels in lexicographic order.
    ///
    /// This ordering is a contract: it fixes which label the single binary
    /// model treats as positive in the two-label case, the sub-model
    /// assignment in the one-vs-rest case, and the tie-break order at
    /// classification time.
    pub fn distinct_labels(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.examples.iter().map(|e| e.label()).collect();
        set.into_iter().map(|s| s.to_string()).collect()
    }
}
