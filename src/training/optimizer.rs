//! Batch gradient descent for a single binary weight vector

use std::collections::{BTreeMap, BTreeSet, HashMap};

use ndarray::Array1;
use tracing::{debug, trace};

use crate::dataset::Example;
use crate::error::{Result, VelozError};
use crate::inference::{sigmoid, BinaryModel};
use crate::preprocessing::Standardizer;

/// Maximum number of full-batch epochs
const MAX_EPOCHS: usize = 1000;
/// Cost improvement below this counts as a stagnant epoch
const STALL_THRESHOLD: f64 = 0.001;
/// Training stops on the epoch that pushes the stagnation count past this
const STALL_LIMIT: u32 = 2;

/// L2-regularized logistic regression fit by full-batch gradient descent.
///
/// One instance trains one positive-vs-rest weight vector. Feature indices
/// are assigned in lexicographic name order and the inner loops run over a
/// dense weight array; the sparse, name-keyed weight map is rebuilt only for
/// the returned model. Given the same examples in the same order, two runs
/// produce bit-identical weights.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    l2_penalty: f64,
    learning_rate: f64,
}

impl GradientDescent {
    pub fn new(l2_penalty: f64, learning_rate: f64) -> Self {
        Self {
            l2_penalty,
            learning_rate,
        }
    }

    /// Train a binary model treating `positive_label` as the positive class
    /// and every other label as negative.
    ///
    /// Runs at most [`MAX_EPOCHS`] epochs. The learning rate halves whenever
    /// the cost regresses (the offending update is kept); an improvement
    /// smaller than [`STALL_THRESHOLD`] bumps a stagnation counter that
    /// never resets, and the third stagnant epoch stops training.
    pub fn train(&self, positive_label: &str, examples: &[&Example]) -> Result<BinaryModel> {
        if examples.is_empty() {
            return Err(VelozError::DataError(
                "cannot train on zero examples".to_string(),
            ));
        }

        // Deterministic feature index assignment: lexicographic name order.
        let names: BTreeSet<&str> = examples
            .iter()
            .flat_map(|e| e.features().keys().map(|k| k.as_str()))
            .collect();
        let names: Vec<&str> = names.into_iter().collect();
        let index: HashMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (*name, i))
            .collect();

        let standardizer = Standardizer::fit(examples);
        let n = examples.len() as f64;

        let mut weights: Array1<f64> = Array1::zeros(names.len());
        let mut gradient: Array1<f64> = Array1::zeros(names.len());
        let mut learning_rate = self.learning_rate;
        let mut previous_cost = 0.0;
        let mut stalled: u32 = 0;

        debug!(
            examples = examples.len(),
            features = names.len(),
            positive = positive_label,
            l2_penalty = self.l2_penalty,
            "starting gradient descent"
        );

        for epoch in 0..MAX_EPOCHS {
            gradient.fill(0.0);
            let mut cost = 0.0;

            for example in examples {
                let mut score = 0.0;
                for (name, value) in example.features() {
                    if let Some(idx) = index.get(name.as_str()) {
                        if let Some(z) = standardizer.standardized(name, *value) {
                            score += weights[*idx] * z;
                        }
                    }
                }
                let h = sigmoid(score);

                let y = if example.label() == positive_label {
                    cost += -h.ln() / n;
                    1.0
                } else {
                    cost += -(1.0 - h).ln() / n;
                    0.0
                };

                for (name, value) in example.features() {
                    if let Some(idx) = index.get(name.as_str()) {
                        if let Some(z) = standardizer.standardized(name, *value) {
                            gradient[*idx] += (h - y) * z;
                        }
                    }
                }
            }

            // The L2 cost term reflects the pre-update weights; each index
            // is penalized, then stepped.
            for (w, g) in weights.iter_mut().zip(gradient.iter()) {
                cost += self.l2_penalty * *w * *w;
                *w -= learning_rate * (g / n + self.l2_penalty / n * *w);
            }

            trace!(epoch, cost, "epoch complete");

            if epoch > 0 {
                let delta = previous_cost - cost;
                if delta < 0.0 {
                    learning_rate *= 0.5;
                    debug!(epoch, learning_rate, "cost regressed, halving learning rate");
                } else if delta < STALL_THRESHOLD {
                    stalled += 1;
                    if stalled > STALL_LIMIT {
                        debug!(epoch, cost, "cost stagnated, stopping");
                        break;
                    }
                }
            }
            previous_cost = cost;
        }

        let weight_map: BTreeMap<String, f64> = names
            .iter()
            .zip(weights.iter())
            .map(|(name, w)| (name.to_string(), *w))
            .collect();
        BinaryModel::new(weight_map, standardizer)
    }
}
