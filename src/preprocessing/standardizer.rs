//! Per-feature standardization statistics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{Example, BIAS_FEATURE};

/// Mean and standard deviation of one feature over the training slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// Standardization table for every feature observed during training.
///
/// Sums accumulate over the examples where a feature is present, divided by
/// the size of the whole training slice; the variance is the population
/// variance (`E[x²] − E[x]²`). Partial presence therefore pulls the mean
/// toward zero and widens the variance — which is what lets indicator
/// features (1.0 whenever present) carry signal at all. The synthetic
/// [`BIAS_FEATURE`] is pinned to mean 0 and std 1 so its standardized value
/// is always the raw 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    stats: BTreeMap<String, FeatureStats>,
}

impl Standardizer {
    /// Compute statistics over a training slice.
    pub fn fit(examples: &[&Example]) -> Self {
        let mut sums: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        for example in examples {
            for (name, value) in example.features() {
                if name == BIAS_FEATURE {
                    continue;
                }
                let entry = sums.entry(name.as_str()).or_insert((0.0, 0.0));
                entry.0 += value;
                entry.1 += value * value;
            }
        }

        let n = examples.len() as f64;
        let mut stats = BTreeMap::new();
        for (name, (sum, sum_sq)) in sums {
            let mean = sum / n;
            // Rounding can push E[x²] − E[x]² a hair below zero for a
            // constant feature; clamp so the zero-variance rule applies.
            let variance = (sum_sq / n - mean * mean).max(0.0);
            stats.insert(
                name.to_string(),
                FeatureStats {
                    mean,
                    std_dev: variance.sqrt(),
                },
            );
        }
        if !examples.is_empty() {
            stats.insert(
                BIAS_FEATURE.to_string(),
                FeatureStats {
                    mean: 0.0,
                    std_dev: 1.0,
                },
            );
        }

        Self { stats }
    }

    /// Rebuild a standardizer from already-known statistics (model load).
    pub fn from_stats(stats: BTreeMap<String, FeatureStats>) -> Self {
        Self { stats }
    }

    /// Standardized value for a named feature, or `None` when the feature
    /// was never observed during fit. A zero-variance feature standardizes
    /// to 0.0 — it carries no signal and must never divide by zero.
    pub fn standardized(&self, name: &str, raw: f64) -> Option<f64> {
        let stats = self.stats.get(name)?;
        if stats.std_dev == 0.0 {
            return Some(0.0);
        }
        Some((raw - stats.mean) / stats.std_dev)
    }

    pub fn get(&self, name: &str) -> Option<&FeatureStats> {
        self.stats.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stats.contains_key(name)
    }

    pub fn stats(&self) -> &BTreeMap<String, FeatureStats> {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}
