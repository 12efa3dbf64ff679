//! Deterministic cross-validation splits

use crate::error::{Result, VelozError};

/// A single train/held-out split
#[derive(Debug, Clone)]
pub struct CVSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub fold_idx: usize,
}

/// Partition `0..n_samples` into folds by index arithmetic: sample `i` is
/// held out in fold `i % n_folds`.
///
/// No shuffling and no seeds — the same dataset always yields the same
/// folds, which keeps whole training runs reproducible. Folds whose
/// held-out slice comes up empty (possible only when `n_folds > n_samples`)
/// are dropped.
pub fn modulo_folds(n_samples: usize, n_folds: usize) -> Result<Vec<CVSplit>> {
    if n_folds < 2 {
        return Err(VelozError::InvalidParameter {
            name: "cv_folds".to_string(),
            value: n_folds.to_string(),
            reason: "must be at least 2".to_string(),
        });
    }
    if n_samples == 0 {
        return Err(VelozError::DataError(
            "cannot split zero samples".to_string(),
        ));
    }

    let mut splits = Vec::with_capacity(n_folds);
    for fold_idx in 0..n_folds {
        let mut train_indices = Vec::new();
        let mut test_indices = Vec::new();
        for i in 0..n_samples {
            if i % n_folds == fold_idx {
                test_indices.push(i);
            } else {
                train_indices.push(i);
            }
        }
        if test_indices.is_empty() {
            continue;
        }
        splits.push(CVSplit {
            train_indices,
            test_indices,
            fold_idx,
        });
    }
    Ok(splits)
}
