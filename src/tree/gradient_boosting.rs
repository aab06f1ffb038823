//! Gradient Boosting Classifier implementation.
//!
//! Second-order boosting of regression trees on the logistic loss.

use super::{GrowParams, RegressionTree};
use crate::classification::check_training_data;
use crate::error::{BeneishError, Result};
use crate::primitives::Matrix;
use crate::traits::Classifier;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Gradient Boosting Classifier.
///
/// # Algorithm
///
/// 1. Initialize the margin with the log-odds of the positive rate
/// 2. For each boosting round:
///    - Compute gradients `g = p - y` and hessians `h = p(1 - p)`
///    - Sample rows (`subsample`) and features (`colsample_bytree`)
///    - Grow a tree maximizing `½ Σ G²/(H+λ)` gain, leaves `-G/(H+λ)`
///    - Add `learning_rate` × leaf value to the margin
/// 3. Probability = sigmoid(margin)
///
/// Defaults: 100 trees, learning rate 0.3, depth 6, λ = 1, no sampling.
///
/// # Example
///
/// ```
/// use beneish::prelude::*;
/// use beneish::tree::GradientBoostingClassifier;
///
/// let x = Matrix::from_vec(6, 1, vec![0.0, 0.5, 1.0, 5.0, 5.5, 6.0]).expect("6x1");
/// let y = vec![0, 0, 0, 1, 1, 1];
///
/// let mut gbm = GradientBoostingClassifier::new()
///     .with_n_estimators(20)
///     .with_max_depth(2)
///     .with_min_child_weight(0.0);
/// gbm.fit(&x, &y).expect("fit");
/// assert_eq!(gbm.predict(&x).expect("fitted"), y);
/// ```
#[derive(Debug, Clone)]
pub struct GradientBoostingClassifier {
    /// Number of boosting rounds (trees)
    n_estimators: usize,
    /// Shrinkage applied to every leaf
    learning_rate: f32,
    /// Maximum depth of each tree
    max_depth: usize,
    /// Fraction of rows sampled per tree
    subsample: f32,
    /// Fraction of features sampled per tree
    colsample_bytree: f32,
    /// L2 penalty on leaf weights
    reg_lambda: f32,
    /// Minimum gain required to split
    gamma: f32,
    /// Minimum hessian mass in a child
    min_child_weight: f32,
    seed: u64,
    /// Margin before any tree (log-odds)
    base_margin: f64,
    trees: Vec<RegressionTree>,
    n_features: Option<usize>,
}

impl GradientBoostingClassifier {
    /// Creates a new classifier with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.3,
            max_depth: 6,
            subsample: 1.0,
            colsample_bytree: 1.0,
            reg_lambda: 1.0,
            gamma: 0.0,
            min_child_weight: 1.0,
            seed: 0,
            base_margin: 0.0,
            trees: Vec::new(),
            n_features: None,
        }
    }

    /// Sets the number of boosting rounds (trees).
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Sets the learning rate (shrinkage parameter).
    ///
    /// Lower values require more trees but often lead to better generalization.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the maximum depth of each tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the row sampling fraction per tree, in (0, 1].
    #[must_use]
    pub fn with_subsample(mut self, subsample: f32) -> Self {
        self.subsample = subsample;
        self
    }

    /// Sets the feature sampling fraction per tree, in (0, 1].
    #[must_use]
    pub fn with_colsample_bytree(mut self, colsample_bytree: f32) -> Self {
        self.colsample_bytree = colsample_bytree;
        self
    }

    /// Sets the L2 regularization on leaf weights.
    #[must_use]
    pub fn with_reg_lambda(mut self, reg_lambda: f32) -> Self {
        self.reg_lambda = reg_lambda;
        self
    }

    /// Sets the minimum hessian mass each child must carry.
    #[must_use]
    pub fn with_min_child_weight(mut self, min_child_weight: f32) -> Self {
        self.min_child_weight = min_child_weight;
        self
    }

    /// Sets the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of boosting rounds.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    /// Learning rate.
    #[must_use]
    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Maximum tree depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Fitted trees, in boosting order.
    #[must_use]
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Margin every prediction starts from.
    #[must_use]
    pub fn base_margin(&self) -> f64 {
        self.base_margin
    }

    /// Number of features seen during fit.
    #[must_use]
    pub fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    /// Sigmoid function: σ(x) = 1 / (1 + e^(-x))
    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    fn check_hyperparameters(&self) -> Result<()> {
        let invalid = |param: &str, value: String, constraint: &str| {
            Err(BeneishError::InvalidHyperparameter {
                param: param.to_string(),
                value,
                constraint: constraint.to_string(),
            })
        };
        if self.n_estimators == 0 {
            return invalid("n_estimators", "0".to_string(), ">= 1");
        }
        if self.max_depth == 0 {
            return invalid("max_depth", "0".to_string(), ">= 1");
        }
        if !(self.learning_rate > 0.0) {
            return invalid("learning_rate", self.learning_rate.to_string(), "> 0");
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return invalid("subsample", self.subsample.to_string(), "in (0, 1]");
        }
        if !(self.colsample_bytree > 0.0 && self.colsample_bytree <= 1.0) {
            return invalid(
                "colsample_bytree",
                self.colsample_bytree.to_string(),
                "in (0, 1]",
            );
        }
        if !(self.reg_lambda >= 0.0) {
            return invalid("reg_lambda", self.reg_lambda.to_string(), ">= 0");
        }
        Ok(())
    }

    /// Raw margins (log-odds of class 1), one per row.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or the feature count differs.
    pub fn decision_function(&self, x: &Matrix<f32>) -> Result<Vec<f64>> {
        let n_features = self.n_features.ok_or("Model not fitted")?;
        if x.n_cols() != n_features {
            return Err(BeneishError::dimension_mismatch("features", n_features, x.n_cols()));
        }
        Ok((0..x.n_rows())
            .map(|i| {
                let row = x.row_slice(i);
                self.base_margin + self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>()
            })
            .collect())
    }
}

impl Default for GradientBoostingClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for GradientBoostingClassifier {
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        check_training_data(x, y)?;
        self.check_hyperparameters()?;

        let (n_samples, n_features) = x.shape();
        let positive_rate = y.iter().filter(|&&l| l == 1).count() as f64 / n_samples as f64;
        let clamped = positive_rate.clamp(1e-6, 1.0 - 1e-6);
        self.base_margin = (clamped / (1.0 - clamped)).ln();

        let params = GrowParams {
            max_depth: self.max_depth,
            learning_rate: f64::from(self.learning_rate),
            reg_lambda: f64::from(self.reg_lambda),
            gamma: f64::from(self.gamma),
            min_child_weight: f64::from(self.min_child_weight),
        };
        let n_rows_per_tree =
            ((f64::from(self.subsample) * n_samples as f64).round() as usize).clamp(1, n_samples);
        let n_cols_per_tree = ((f64::from(self.colsample_bytree) * n_features as f64).round()
            as usize)
            .clamp(1, n_features);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut margins = vec![self.base_margin; n_samples];
        let mut grad = vec![0.0; n_samples];
        let mut hess = vec![0.0; n_samples];
        let mut all_rows: Vec<usize> = (0..n_samples).collect();
        let mut all_features: Vec<usize> = (0..n_features).collect();

        self.trees = Vec::with_capacity(self.n_estimators);
        for round in 0..self.n_estimators {
            for i in 0..n_samples {
                let p = Self::sigmoid(margins[i]);
                grad[i] = p - y[i] as f64;
                hess[i] = (p * (1.0 - p)).max(1e-16);
            }

            let mut rows = if n_rows_per_tree < n_samples {
                all_rows.shuffle(&mut rng);
                all_rows[..n_rows_per_tree].to_vec()
            } else {
                all_rows.clone()
            };
            rows.sort_unstable();

            let mut features = if n_cols_per_tree < n_features {
                all_features.shuffle(&mut rng);
                all_features[..n_cols_per_tree].to_vec()
            } else {
                all_features.clone()
            };
            features.sort_unstable();

            let tree = RegressionTree::grow(x, &grad, &hess, &rows, &features, &params);
            for (i, margin) in margins.iter_mut().enumerate() {
                *margin += tree.predict_row(x.row_slice(i));
            }
            tracing::trace!(round, leaves = tree.n_leaves(), "boosting round");
            self.trees.push(tree);
        }

        self.n_features = Some(n_features);
        tracing::debug!(
            trees = self.trees.len(),
            base_margin = self.base_margin,
            "gradient boosting fitted"
        );
        Ok(())
    }

    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Vec<f32>> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|m| Self::sigmoid(m) as f32)
            .collect())
    }
}
