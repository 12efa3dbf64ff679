//! Model selection: regularization search, cross-validation, final fit

use tracing::debug;

use crate::dataset::{Dataset, Example};
use crate::error::{Result, VelozError};
use crate::inference::MultiLabelModel;
use crate::training::config::{Regularization, TrainingConfig};
use crate::training::cross_validation::modulo_folds;
use crate::training::optimizer::GradientDescent;

/// Every `VALIDATION_STRIDE`-th example is held out when sweeping λ.
const VALIDATION_STRIDE: usize = 5;
/// Candidate strengths are `2^p` for `p` in `[SWEEP_MIN_EXP, SWEEP_MAX_EXP)`.
const SWEEP_MIN_EXP: i32 = -6;
const SWEEP_MAX_EXP: i32 = 6;

/// Trains a [`MultiLabelModel`] from a [`Dataset`].
///
/// A fit runs up to three stages: an optional sweep that picks the L2
/// strength by held-out validation cost, a k-fold cross-validation of the
/// chosen configuration for the accuracy estimate, and a final pass over
/// every example that produces the returned model. All partitions are
/// deterministic index arithmetic, so a fit is reproducible bit for bit.
#[derive(Debug, Clone)]
pub struct TrainEngine {
    config: TrainingConfig,
}

impl TrainEngine {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train a classifier over every distinct label in the dataset.
    ///
    /// Fails on an empty dataset, fewer than two distinct labels, or a
    /// config that does not validate.
    pub fn fit(&self, data: &Dataset) -> Result<MultiLabelModel> {
        self.config.validate()?;
        if data.is_empty() {
            return Err(VelozError::DataError(
                "no training examples supplied".to_string(),
            ));
        }
        let labels = data.distinct_labels();
        if labels.len() < 2 {
            return Err(VelozError::ConfigError(format!(
                "training requires at least 2 distinct labels, got {}",
                labels.len()
            )));
        }

        let all: Vec<&Example> = data.examples().iter().collect();
        debug!(
            examples = all.len(),
            labels = labels.len(),
            "starting training run"
        );

        // Pick λ; cross-validation runs over the examples λ was chosen on.
        let (lambda, cv_base) = match self.config.regularization {
            Regularization::Fixed(lambda) => (lambda, all.clone()),
            Regularization::Search => {
                let (training, validation) = stride_split(&all, VALIDATION_STRIDE);
                let lambda = self.sweep_lambda(&labels, &training, &validation)?;
                (lambda, training)
            }
        };

        let accuracy = self.cross_validate(&labels, &cv_base, lambda)?;
        debug!(lambda, accuracy, "final full-data fit");
        self.train_composite(&labels, &all, lambda, accuracy)
    }

    /// Sweep the candidate ladder, training each candidate on the training
    /// partition and scoring it on the validation partition.
    ///
    /// The incumbent starts at λ = 0 with infinite cost, so a sweep in which
    /// every candidate scores non-finite falls back to unregularized.
    fn sweep_lambda(
        &self,
        labels: &[String],
        training: &[&Example],
        validation: &[&Example],
    ) -> Result<f64> {
        let mut best_lambda = 0.0;
        let mut best_cost = f64::INFINITY;
        for exp in SWEEP_MIN_EXP..SWEEP_MAX_EXP {
            let candidate = 2.0_f64.powi(exp);
            let model = self.train_composite(labels, training, candidate, 0.0)?;
            let cost = validation_cost(&model, validation);
            debug!(lambda = candidate, cost, "sweep candidate scored");
            if cost < best_cost {
                best_cost = cost;
                best_lambda = candidate;
            }
        }
        debug!(
            lambda = best_lambda,
            cost = best_cost,
            "selected regularization strength"
        );
        Ok(best_lambda)
    }

    /// k-fold accuracy estimate: correct / tries over every held-out slice.
    fn cross_validate(&self, labels: &[String], examples: &[&Example], lambda: f64) -> Result<f64> {
        let splits = modulo_folds(examples.len(), self.config.cv_folds)?;
        let mut correct = 0usize;
        let mut tries = 0usize;
        for split in &splits {
            let training: Vec<&Example> =
                split.train_indices.iter().map(|&i| examples[i]).collect();
            if training.is_empty() {
                continue;
            }
            let model = self.train_composite(labels, &training, lambda, 0.0)?;
            for &i in &split.test_indices {
                let example = examples[i];
                if model.classify(example.features()) == example.label() {
                    correct += 1;
                }
                tries += 1;
            }
        }
        // A one-example fold base leaves nothing to both train and test on.
        let accuracy = if tries > 0 {
            correct as f64 / tries as f64
        } else {
            0.0
        };
        debug!(correct, tries, accuracy, "cross-validation complete");
        Ok(accuracy)
    }

    /// Train the full label set with one shared λ and learning rate: a
    /// single binary model for two labels, one model per label otherwise.
    fn train_composite(
        &self,
        labels: &[String],
        examples: &[&Example],
        lambda: f64,
        accuracy: f64,
    ) -> Result<MultiLabelModel> {
        let optimizer = GradientDescent::new(lambda, self.config.learning_rate);
        let models = if labels.len() == 2 {
            vec![optimizer.train(&labels[1], examples)?]
        } else {
            labels
                .iter()
                .map(|label| optimizer.train(label, examples))
                .collect::<Result<Vec<_>>>()?
        };
        MultiLabelModel::new(labels.to_vec(), models, accuracy)
    }
}

/// Deterministic holdout: every `stride`-th example lands in the second
/// partition (validation), the rest in the first (training).
fn stride_split<'a>(
    examples: &[&'a Example],
    stride: usize,
) -> (Vec<&'a Example>, Vec<&'a Example>) {
    let mut training = Vec::new();
    let mut validation = Vec::new();
    for (i, example) in examples.iter().enumerate() {
        if i % stride == 0 {
            validation.push(*example);
        } else {
            training.push(*example);
        }
    }
    (training, validation)
}

/// Averaged log-loss of a model over held-out examples.
///
/// For each example and each (label, p) entry of its probabilities, the
/// matching label contributes −ln(p) and every other label −ln(1 − p),
/// scaled by 1/(4·|validation|).
fn validation_cost(model: &MultiLabelModel, validation: &[&Example]) -> f64 {
    let scale = 4.0 * validation.len() as f64;
    let mut cost = 0.0;
    for example in validation {
        let probabilities = model.label_probabilities(example.features());
        for (label, p) in &probabilities {
            if label.as_str() == example.label() {
                cost -= p.ln() / scale;
            } else {
                cost -= (1.0 - p).ln() / scale;
            }
        }
    }
    cost
}
