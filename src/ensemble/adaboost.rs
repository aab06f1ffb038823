//! AdaBoost (SAMME) over decision stumps.

use crate::classification::check_training_data;
use crate::error::{BeneishError, Result};
use crate::primitives::Matrix;
use crate::traits::Classifier;
use crate::tree::DecisionTreeClassifier;

/// AdaBoost classifier with depth-1 CART stumps.
///
/// Each round fits a stump to the current sample weights, weighs it by
/// `learning_rate * ln((1 - err) / err)` and up-weights the rows it got
/// wrong. Boosting stops early on a perfect stump, or when a stump is no
/// better than chance.
///
/// The decision value is the weighted vote `Σ αₘ·(±1) / Σ αₘ` in [-1, 1];
/// the positive-class probability is its sigmoid.
///
/// # Example
///
/// ```
/// use beneish::ensemble::AdaBoostClassifier;
/// use beneish::prelude::*;
///
/// let x = Matrix::from_vec(6, 1, vec![0.0, 1.0, 2.0, 7.0, 8.0, 9.0]).expect("6x1");
/// let y = vec![0, 0, 0, 1, 1, 1];
///
/// let mut ada = AdaBoostClassifier::new().with_n_estimators(10);
/// ada.fit(&x, &y).expect("fit");
/// assert_eq!(ada.predict(&x).expect("fitted"), y);
/// ```
#[derive(Debug, Clone)]
pub struct AdaBoostClassifier {
    n_estimators: usize,
    learning_rate: f32,
    estimators: Vec<DecisionTreeClassifier>,
    estimator_weights: Vec<f64>,
}

impl AdaBoostClassifier {
    /// Creates a classifier with 50 rounds and learning rate 1.0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_estimators: 50,
            learning_rate: 1.0,
            estimators: Vec::new(),
            estimator_weights: Vec::new(),
        }
    }

    /// Sets the maximum number of boosting rounds.
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Sets the shrinkage applied to every stump weight.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Number of stumps kept after early stopping.
    #[must_use]
    pub fn n_fitted(&self) -> usize {
        self.estimators.len()
    }

    /// Weight of each kept stump.
    #[must_use]
    pub fn estimator_weights(&self) -> &[f64] {
        &self.estimator_weights
    }

    /// Normalized weighted vote per row, in [-1, 1].
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or dimensions mismatch.
    pub fn decision_function(&self, x: &Matrix<f32>) -> Result<Vec<f64>> {
        if self.estimators.is_empty() {
            return Err("Model not fitted".into());
        }
        let total: f64 = self.estimator_weights.iter().sum();
        let mut votes = vec![0.0; x.n_rows()];

        for (stump, &alpha) in self.estimators.iter().zip(&self.estimator_weights) {
            for (vote, label) in votes.iter_mut().zip(stump.predict(x)?) {
                *vote += if label == 1 { alpha } else { -alpha };
            }
        }

        if total > 0.0 {
            votes.iter_mut().for_each(|v| *v /= total);
        }
        Ok(votes)
    }
}

impl Default for AdaBoostClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for AdaBoostClassifier {
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        check_training_data(x, y)?;
        if self.n_estimators == 0 {
            return Err(BeneishError::InvalidHyperparameter {
                param: "n_estimators".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        if !(self.learning_rate > 0.0) {
            return Err(BeneishError::InvalidHyperparameter {
                param: "learning_rate".to_string(),
                value: self.learning_rate.to_string(),
                constraint: "> 0".to_string(),
            });
        }

        let n = y.len();
        let learning_rate = f64::from(self.learning_rate);
        let mut weights = vec![1.0 / n as f64; n];
        self.estimators.clear();
        self.estimator_weights.clear();

        for round in 0..self.n_estimators {
            let mut stump = DecisionTreeClassifier::new().with_max_depth(1);
            stump.fit_weighted(x, y, &weights)?;
            let incorrect: Vec<bool> = stump
                .predict(x)?
                .into_iter()
                .zip(y)
                .map(|(p, &t)| p != t)
                .collect();

            let total: f64 = weights.iter().sum();
            let error: f64 = weights
                .iter()
                .zip(&incorrect)
                .filter(|(_, wrong)| **wrong)
                .map(|(w, _)| w)
                .sum::<f64>()
                / total;

            if error <= 0.0 {
                self.estimators.push(stump);
                self.estimator_weights.push(1.0);
                tracing::debug!(round, "perfect stump, stopping early");
                break;
            }
            if error >= 0.5 {
                if self.estimators.is_empty() {
                    return Err("AdaBoost stump is no better than chance".into());
                }
                tracing::debug!(round, error, "stump no better than chance, stopping");
                break;
            }

            let alpha = learning_rate * ((1.0 - error) / error).ln();
            self.estimators.push(stump);
            self.estimator_weights.push(alpha);

            if round + 1 < self.n_estimators {
                for (w, &wrong) in weights.iter_mut().zip(&incorrect) {
                    if wrong && *w > 0.0 {
                        *w *= alpha.exp();
                    }
                }
                let sum: f64 = weights.iter().sum();
                if !(sum > 0.0) || !sum.is_finite() {
                    break;
                }
                weights.iter_mut().for_each(|w| *w /= sum);
            }
        }

        tracing::debug!(stumps = self.estimators.len(), "adaboost fitted");
        Ok(())
    }

    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Vec<f32>> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|d| (1.0 / (1.0 + (-d).exp())) as f32)
            .collect())
    }

    /// Sign of the weighted vote.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|d| usize::from(d > 0.0))
            .collect())
    }
}
