//! Model Interpretability and Explainability.
//!
//! Per-feature, per-row attributions for the boosted tree ensemble.
//!
//! # Methods
//!
//! - **TreeSHAP**: exact Shapley values for tree ensembles, computed on the
//!   margin (log-odds) the ensemble adds up before the sigmoid.
//!
//! # Example
//!
//! ```
//! use beneish::interpret::{Explainer, TreeExplainer};
//! use beneish::prelude::*;
//! use beneish::tree::GradientBoostingClassifier;
//!
//! let x = Matrix::from_vec(6, 2, vec![
//!     0.0, 1.0,  0.5, 0.0,  1.0, 1.0,
//!     5.0, 0.0,  5.5, 1.0,  6.0, 0.0,
//! ]).expect("6x2");
//! let y = vec![0, 0, 0, 1, 1, 1];
//! let mut model = GradientBoostingClassifier::new()
//!     .with_n_estimators(5)
//!     .with_min_child_weight(0.0);
//! model.fit(&x, &y).expect("fit");
//!
//! let explainer = TreeExplainer::new(&model).expect("fitted model");
//! let sample = Vector::from_slice(&[5.5, 1.0]);
//! let phi = explainer.explain(&sample).expect("explain");
//! // Feature 0 pushes towards the positive class.
//! assert!(phi[0] > 0.0);
//! ```
//!
//! # References
//!
//! - Lundberg, S. M., & Lee, S. I. (2017). A Unified Approach to Interpreting
//!   Model Predictions. `NeurIPS`.
//! - Lundberg, S. M., et al. (2020). From local explanations to global
//!   understanding with explainable AI for trees. Nature Machine Intelligence.

mod tree_shap;

use crate::error::{BeneishError, Result};
use crate::primitives::{Matrix, Vector};
use crate::tree::GradientBoostingClassifier;
use rayon::prelude::*;

/// Trait for model explainers.
///
/// Explainers compute feature attributions for predictions.
pub trait Explainer {
    /// Explain a single prediction.
    ///
    /// Returns a vector of feature contributions where:
    /// - Positive values indicate features that increase the prediction
    /// - Negative values indicate features that decrease the prediction
    /// - Sum of contributions + `expected_value` = prediction
    ///
    /// # Errors
    ///
    /// Returns an error if the sample has the wrong number of features.
    fn explain(&self, sample: &Vector<f32>) -> Result<Vector<f32>>;

    /// Get the expected value (baseline prediction).
    fn expected_value(&self) -> f32;
}

/// Exact TreeSHAP explainer for [`GradientBoostingClassifier`].
///
/// Attributions are in margin space: for every row,
/// `expected_value + Σ φ = decision_function(row)`.
#[derive(Debug, Clone, Copy)]
pub struct TreeExplainer<'a> {
    model: &'a GradientBoostingClassifier,
    n_features: usize,
    expected_value: f64,
}

impl<'a> TreeExplainer<'a> {
    /// Builds an explainer over a fitted model.
    ///
    /// # Errors
    ///
    /// Returns an error if the model has not been fitted.
    pub fn new(model: &'a GradientBoostingClassifier) -> Result<Self> {
        let n_features = model.n_features().ok_or("Model not fitted")?;
        let expected_value = model.base_margin()
            + model
                .trees()
                .iter()
                .map(crate::tree::RegressionTree::expected_value)
                .sum::<f64>();
        Ok(Self {
            model,
            n_features,
            expected_value,
        })
    }

    fn explain_row(&self, sample: &[f32]) -> Vec<f64> {
        let mut phi = vec![0.0; self.n_features];
        for tree in self.model.trees() {
            tree_shap::accumulate(tree.root(), sample, &mut phi);
        }
        phi
    }

    /// Attributions for every row of `x`, computed in parallel.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` has the wrong number of columns.
    pub fn shap_values(&self, x: &Matrix<f32>) -> Result<ShapValues> {
        if x.n_cols() != self.n_features {
            return Err(BeneishError::dimension_mismatch(
                "features",
                self.n_features,
                x.n_cols(),
            ));
        }

        let rows: Vec<Vec<f64>> = (0..x.n_rows())
            .into_par_iter()
            .map(|i| self.explain_row(x.row_slice(i)))
            .collect();
        let data = rows.into_iter().flatten().map(|v| v as f32).collect();
        let values = Matrix::from_vec(x.n_rows(), self.n_features, data)?;

        tracing::debug!(rows = x.n_rows(), "attributions computed");
        Ok(ShapValues {
            values,
            expected_value: self.expected_value as f32,
        })
    }
}

impl Explainer for TreeExplainer<'_> {
    fn explain(&self, sample: &Vector<f32>) -> Result<Vector<f32>> {
        if sample.len() != self.n_features {
            return Err(BeneishError::dimension_mismatch(
                "features",
                self.n_features,
                sample.len(),
            ));
        }
        let phi = self.explain_row(sample.as_slice());
        Ok(Vector::from_vec(phi.into_iter().map(|v| v as f32).collect()))
    }

    fn expected_value(&self) -> f32 {
        self.expected_value as f32
    }
}

/// Attribution matrix (rows × features) plus the shared baseline.
#[derive(Debug, Clone)]
pub struct ShapValues {
    values: Matrix<f32>,
    expected_value: f32,
}

impl ShapValues {
    /// Signed attributions, one row per explained sample.
    #[must_use]
    pub fn values(&self) -> &Matrix<f32> {
        &self.values
    }

    /// Baseline margin shared by every row.
    #[must_use]
    pub fn expected_value(&self) -> f32 {
        self.expected_value
    }

    /// Mean absolute attribution per feature.
    #[must_use]
    pub fn mean_abs(&self) -> Vec<f32> {
        let (n_rows, n_cols) = self.values.shape();
        (0..n_cols)
            .map(|j| {
                if n_rows == 0 {
                    return 0.0;
                }
                (0..n_rows).map(|i| self.values.get(i, j).abs()).sum::<f32>() / n_rows as f32
            })
            .collect()
    }

    /// Feature indices by descending mean |attribution|; ties keep column order.
    #[must_use]
    pub fn ranking(&self) -> Vec<usize> {
        let importance = self.mean_abs();
        let mut indices: Vec<usize> = (0..importance.len()).collect();
        indices.sort_by(|&a, &b| importance[b].total_cmp(&importance[a]));
        indices
    }

    /// Bins each feature's signed attributions for a beeswarm view.
    ///
    /// Rows follow [`ShapValues::ranking`]. Every bin records how many rows
    /// fall into it and the mean of their feature values, rescaled to [0, 1]
    /// over the feature's observed range (0.5 for a constant feature).
    ///
    /// # Errors
    ///
    /// Returns an error if `features` does not match the attribution shape
    /// or `n_bins` is zero.
    pub fn beeswarm(&self, features: &Matrix<f32>, n_bins: usize) -> Result<Vec<BeeswarmRow>> {
        if features.shape() != self.values.shape() {
            return Err(BeneishError::DimensionMismatch {
                expected: format!("{:?}", self.values.shape()),
                actual: format!("{:?}", features.shape()),
            });
        }
        if n_bins == 0 {
            return Err(BeneishError::InvalidHyperparameter {
                param: "n_bins".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }

        let n_rows = self.values.n_rows();
        Ok(self
            .ranking()
            .into_iter()
            .map(|feature| {
                let phi: Vec<f32> = (0..n_rows).map(|i| self.values.get(i, feature)).collect();
                let raw: Vec<f32> = (0..n_rows).map(|i| features.get(i, feature)).collect();
                let (min, max) = bounds(&phi);
                let (f_min, f_max) = bounds(&raw);

                let mut counts = vec![0usize; n_bins];
                let mut sums = vec![0.0f32; n_bins];
                for (&v, &f) in phi.iter().zip(&raw) {
                    let bin = if max > min {
                        (((v - min) / (max - min)) * n_bins as f32) as usize
                    } else {
                        n_bins / 2
                    }
                    .min(n_bins - 1);
                    counts[bin] += 1;
                    sums[bin] += if f_max > f_min {
                        (f - f_min) / (f_max - f_min)
                    } else {
                        0.5
                    };
                }

                BeeswarmRow {
                    feature,
                    min,
                    max,
                    bins: counts
                        .into_iter()
                        .zip(sums)
                        .map(|(count, sum)| BeeswarmBin {
                            count,
                            color: (count > 0).then(|| sum / count as f32),
                        })
                        .collect(),
                }
            })
            .collect())
    }
}

fn bounds(values: &[f32]) -> (f32, f32) {
    values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// One feature's attribution distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct BeeswarmRow {
    /// Feature column index
    pub feature: usize,
    /// Smallest attribution
    pub min: f32,
    /// Largest attribution
    pub max: f32,
    /// Equal-width bins from `min` to `max`
    pub bins: Vec<BeeswarmBin>,
}

/// Rows whose attribution falls in one bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeeswarmBin {
    /// Number of rows
    pub count: usize,
    /// Mean rescaled feature value (0 = low, 1 = high); `None` when empty
    pub color: Option<f32>,
}
