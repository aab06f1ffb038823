//! Model selection utilities for cross-validation and train/test splitting.
//!
//! This module provides tools for:
//! - Stratified, seeded train/test splitting
//! - Stratified K-Fold cross-validation
//! - Cross-validated scoring of any [`Classifier`]
//! - Exhaustive, parallel grid search over candidate configurations

mod grid_search;

pub use grid_search::{grid_search, GridPoint, GridSearchResult};

use crate::error::{BeneishError, Result};
use crate::primitives::Matrix;
use crate::traits::Classifier;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Results from cross-validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossValidationResult {
    /// Score for each fold
    pub scores: Vec<f32>,
}

impl CrossValidationResult {
    /// Calculate mean score across folds
    #[must_use]
    pub fn mean(&self) -> f32 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f32>() / self.scores.len() as f32
    }

    /// Calculate population standard deviation of scores
    #[must_use]
    pub fn std(&self) -> f32 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .scores
            .iter()
            .map(|&score| (score - mean).powi(2))
            .sum::<f32>()
            / self.scores.len() as f32;
        variance.sqrt()
    }

    /// Get minimum score
    #[must_use]
    pub fn min(&self) -> f32 {
        self.scores.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Get maximum score
    #[must_use]
    pub fn max(&self) -> f32 {
        self.scores
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

/// Fits a fresh model on every training fold and scores its positive-class
/// probabilities on the matching held-out fold.
///
/// # Errors
///
/// Returns an error if the folds cannot be built or a fold fails to fit.
///
/// # Example
///
/// ```
/// use beneish::prelude::*;
/// use beneish::metrics::roc_auc_or_zero;
/// use beneish::model_selection::{cross_validate, StratifiedKFold};
///
/// let x = Matrix::from_vec(6, 1, vec![0.0, 0.1, 0.2, 5.0, 5.1, 5.2]).unwrap();
/// let y = vec![0, 0, 0, 1, 1, 1];
///
/// let result = cross_validate(&x, &y, &StratifiedKFold::new(3), GaussianNB::new, roc_auc_or_zero)
///     .unwrap();
/// assert_eq!(result.scores.len(), 3);
/// ```
pub fn cross_validate<M, F, S>(
    x: &Matrix<f32>,
    y: &[usize],
    cv: &StratifiedKFold,
    make_model: F,
    scorer: S,
) -> Result<CrossValidationResult>
where
    M: Classifier,
    F: Fn() -> M,
    S: Fn(&[usize], &[f32]) -> f32,
{
    if x.n_rows() != y.len() {
        return Err(BeneishError::dimension_mismatch(
            "labels",
            x.n_rows(),
            y.len(),
        ));
    }

    let mut scores = Vec::with_capacity(cv.n_splits());
    for (train_idx, test_idx) in cv.split(y)? {
        let (x_train, y_train) = extract_samples(x, y, &train_idx);
        let (x_test, y_test) = extract_samples(x, y, &test_idx);

        let mut model = make_model();
        model.fit(&x_train, &y_train)?;
        let proba = model.predict_proba(&x_test)?;
        scores.push(scorer(&y_test, &proba));
    }

    Ok(CrossValidationResult { scores })
}

/// Stratified K-Fold cross-validator for binary labels.
///
/// Each class is cut into `n_splits` contiguous chunks (shuffled first if
/// requested) and fold `i` takes chunk `i` of every class, so every fold keeps
/// approximately the overall class ratio.
///
/// # Example
///
/// ```rust
/// use beneish::model_selection::StratifiedKFold;
///
/// let y = vec![0, 0, 0, 0, 1, 1, 1, 0, 0];
/// let skfold = StratifiedKFold::new(3);
/// let splits = skfold.split(&y).unwrap();
/// assert_eq!(splits.len(), 3);
/// assert!(splits.iter().all(|(_, test)| test.len() == 3));
/// ```
#[derive(Debug, Clone)]
pub struct StratifiedKFold {
    n_splits: usize,
    shuffle: bool,
    random_state: Option<u64>,
}

impl StratifiedKFold {
    /// Create a new Stratified K-Fold cross-validator. Folds are taken in
    /// row order unless shuffling is enabled.
    #[must_use]
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            random_state: None,
        }
    }

    /// Set random state for reproducible shuffling (implies shuffling).
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self.shuffle = true;
        self
    }

    /// Number of folds.
    #[must_use]
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Generate stratified (train, test) index pairs, one per fold.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_splits < 2` or exceeds the number of samples.
    pub fn split(&self, y: &[usize]) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        let n_samples = y.len();
        if self.n_splits < 2 {
            return Err(BeneishError::InvalidHyperparameter {
                param: "n_splits".to_string(),
                value: self.n_splits.to_string(),
                constraint: ">= 2".to_string(),
            });
        }
        if self.n_splits > n_samples {
            return Err(BeneishError::InvalidHyperparameter {
                param: "n_splits".to_string(),
                value: self.n_splits.to_string(),
                constraint: format!("<= number of samples ({n_samples})"),
            });
        }

        let mut class_indices = group_by_class(y);

        if self.shuffle {
            let mut rng = match self.random_state {
                Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
                None => rand::rngs::StdRng::from_entropy(),
            };
            for indices in &mut class_indices {
                indices.shuffle(&mut rng);
            }
        }

        let mut fold_indices: Vec<Vec<usize>> = vec![Vec::new(); self.n_splits];

        for indices in &class_indices {
            let class_size = indices.len();
            let fold_size = class_size / self.n_splits;
            let remainder = class_size % self.n_splits;

            let mut start = 0;
            for (i, fold) in fold_indices.iter_mut().enumerate() {
                let current_size = if i < remainder {
                    fold_size + 1
                } else {
                    fold_size
                };
                let end = start + current_size;
                fold.extend_from_slice(&indices[start..end]);
                start = end;
            }
        }

        let mut result = Vec::with_capacity(self.n_splits);
        for i in 0..self.n_splits {
            let mut test_indices = fold_indices[i].clone();
            test_indices.sort_unstable();

            let mut train_indices = Vec::with_capacity(n_samples - test_indices.len());
            for (j, fold) in fold_indices.iter().enumerate() {
                if i != j {
                    train_indices.extend_from_slice(fold);
                }
            }
            train_indices.sort_unstable();

            result.push((train_indices, test_indices));
        }

        Ok(result)
    }
}

/// Row indices of a stratified train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    /// Rows assigned to training.
    pub train: Vec<usize>,
    /// Rows assigned to the held-out test set.
    pub test: Vec<usize>,
}

/// Partitions row indices so both sides keep the class ratio of `y`.
///
/// The test set holds `ceil(test_size * n)` rows. Each class contributes
/// `floor(count * n_test / n)` test rows and the leftover slots go to the
/// classes with the largest remainder. Rows are drawn from a per-class
/// shuffle seeded with `seed`, so the same inputs always give the same split.
///
/// # Errors
///
/// Returns an error if `test_size` is outside (0, 1), the split leaves no
/// training row, or a class has fewer than two rows.
///
/// # Example
///
/// ```
/// use beneish::model_selection::stratified_split;
///
/// let y: Vec<usize> = (0..100).map(|i| usize::from(i % 5 == 0)).collect();
/// let split = stratified_split(&y, 0.25, 42).unwrap();
/// assert_eq!(split.test.len(), 25);
/// assert_eq!(split.test.iter().filter(|&&i| y[i] == 1).count(), 5);
/// ```
pub fn stratified_split(y: &[usize], test_size: f64, seed: u64) -> Result<SplitIndices> {
    let n = y.len();
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(BeneishError::InvalidHyperparameter {
            param: "test_size".to_string(),
            value: test_size.to_string(),
            constraint: "0 < test_size < 1".to_string(),
        });
    }

    // Guard against representation error, e.g. 0.1 * 100 landing above 10.
    let n_test = ((test_size * n as f64) - 1e-9).ceil().max(1.0) as usize;
    if n_test >= n {
        return Err(BeneishError::InvalidHyperparameter {
            param: "test_size".to_string(),
            value: test_size.to_string(),
            constraint: format!("a split leaving training rows out of {n}"),
        });
    }

    let mut class_indices = group_by_class(y);
    for (class, indices) in class_indices.iter().enumerate() {
        if indices.len() < 2 {
            return Err(BeneishError::Other(format!(
                "Class {class} has {} row(s); stratified splitting needs at least 2 per class",
                indices.len()
            )));
        }
    }

    let per_class_test = allocate_test_counts(&class_indices, n, n_test);

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n - n_test);
    let mut test = Vec::with_capacity(n_test);
    for (indices, &n_class_test) in class_indices.iter_mut().zip(&per_class_test) {
        indices.shuffle(&mut rng);
        test.extend_from_slice(&indices[..n_class_test]);
        train.extend_from_slice(&indices[n_class_test..]);
    }
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    tracing::debug!(
        n_train = train.len(),
        n_test = test.len(),
        ?per_class_test,
        seed,
        "stratified split"
    );

    Ok(SplitIndices { train, test })
}

/// Per-class test counts: floors first, leftovers by largest remainder.
/// Every class keeps at least one training row.
fn allocate_test_counts(class_indices: &[Vec<usize>; 2], n: usize, n_test: usize) -> [usize; 2] {
    let counts = [class_indices[0].len(), class_indices[1].len()];
    let mut alloc = [counts[0] * n_test / n, counts[1] * n_test / n];
    let remainders = [counts[0] * n_test % n, counts[1] * n_test % n];

    let mut leftover = n_test - alloc[0] - alloc[1];
    let mut order = [0, 1];
    order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]));
    for &class in order.iter().cycle().take(2 * leftover.max(1)) {
        if leftover == 0 {
            break;
        }
        if alloc[class] < counts[class] - 1 {
            alloc[class] += 1;
            leftover -= 1;
        }
    }

    for class in 0..2 {
        let other = 1 - class;
        while alloc[class] > counts[class] - 1 && alloc[other] < counts[other] - 1 {
            alloc[class] -= 1;
            alloc[other] += 1;
        }
    }

    alloc
}

fn group_by_class(y: &[usize]) -> [Vec<usize>; 2] {
    let mut groups = [Vec::new(), Vec::new()];
    for (i, &label) in y.iter().enumerate() {
        groups[label.min(1)].push(i);
    }
    groups
}

/// Gathers the given rows of `x` and `y` in index order.
#[must_use]
pub fn extract_samples(x: &Matrix<f32>, y: &[usize], indices: &[usize]) -> (Matrix<f32>, Vec<usize>) {
    let x_sub = x.select_rows(indices);
    let y_sub = indices.iter().map(|&i| y[i]).collect();
    (x_sub, y_sub)
}


#[cfg(test)]
mod tests_kfold_contract;
