//! Classification algorithms.
//!
//! This module implements the non-tree members of the model roster:
//! - `SVC`: RBF-kernel support vector classifier with Platt probabilities
//! - `KNearestNeighbors`: instance-based learning
//! - `GaussianNB`: Gaussian Naive Bayes
//!
//! All three take binary labels (0/1) and implement [`Classifier`].

mod svm;

pub use svm::{Gamma, SVC};

use crate::error::{BeneishError, Result};
use crate::primitives::Matrix;
use crate::traits::Classifier;

/// Rejects empty input, label/row count mismatch and non-binary labels.
pub(crate) fn check_training_data(x: &Matrix<f32>, y: &[usize]) -> Result<()> {
    let n_samples = x.n_rows();
    if n_samples == 0 {
        return Err("Cannot fit with zero samples".into());
    }
    if y.len() != n_samples {
        return Err(BeneishError::dimension_mismatch("labels", n_samples, y.len()));
    }
    if let Some(row) = y.iter().position(|&l| l > 1) {
        return Err(BeneishError::InvalidLabel {
            row,
            value: y[row].to_string(),
        });
    }
    Ok(())
}

/// K-Nearest Neighbors classifier.
///
/// Euclidean distance, uniform vote. The positive-class probability is the
/// fraction of the `k` nearest training rows labelled 1; equidistant rows are
/// taken in training order.
///
/// # Example
///
/// ```
/// use beneish::classification::KNearestNeighbors;
/// use beneish::prelude::*;
///
/// let x = Matrix::from_vec(6, 2, vec![
///     0.0, 0.0,  // class 0
///     0.0, 1.0,  // class 0
///     1.0, 0.0,  // class 0
///     5.0, 5.0,  // class 1
///     5.0, 6.0,  // class 1
///     6.0, 5.0,  // class 1
/// ]).expect("6x2 matrix with 12 values");
/// let y = vec![0, 0, 0, 1, 1, 1];
///
/// let mut knn = KNearestNeighbors::new(3);
/// knn.fit(&x, &y).expect("Valid training data with 6 samples");
///
/// let test = Matrix::from_vec(1, 2, vec![0.5, 0.5]).expect("1x2 test matrix");
/// assert_eq!(knn.predict(&test).expect("fitted"), vec![0]);
/// ```
#[derive(Debug, Clone)]
pub struct KNearestNeighbors {
    /// Number of neighbors to use
    k: usize,
    /// Training feature matrix (stored during fit)
    x_train: Option<Matrix<f32>>,
    /// Training labels (stored during fit)
    y_train: Option<Vec<usize>>,
}

impl KNearestNeighbors {
    /// Creates a new K-Nearest Neighbors classifier voting over `k` rows.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            x_train: None,
            y_train: None,
        }
    }

    /// Number of neighbours consulted.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(p, q)| (p - q) * (p - q)).sum()
    }
}

impl Default for KNearestNeighbors {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Classifier for KNearestNeighbors {
    /// Stores the training data; computation is deferred to prediction.
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        check_training_data(x, y)?;

        if self.k == 0 {
            return Err(BeneishError::InvalidHyperparameter {
                param: "k".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        if self.k > x.n_rows() {
            return Err("k cannot be larger than number of training samples".into());
        }

        self.x_train = Some(x.clone());
        self.y_train = Some(y.to_vec());
        Ok(())
    }

    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Vec<f32>> {
        let x_train = self.x_train.as_ref().ok_or("Model not fitted")?;
        let y_train = self.y_train.as_ref().ok_or("Model not fitted")?;

        if x.n_cols() != x_train.n_cols() {
            return Err(BeneishError::dimension_mismatch(
                "features",
                x_train.n_cols(),
                x.n_cols(),
            ));
        }

        let mut proba = Vec::with_capacity(x.n_rows());
        let mut distances: Vec<(f32, usize)> = Vec::with_capacity(y_train.len());

        for i in 0..x.n_rows() {
            let query = x.row_slice(i);
            distances.clear();
            distances.extend(
                y_train
                    .iter()
                    .enumerate()
                    .map(|(j, &label)| (Self::squared_distance(query, x_train.row_slice(j)), label)),
            );

            // Stable sort keeps training order among equal distances.
            distances.sort_by(|a, b| a.0.total_cmp(&b.0));
            let positives = distances[..self.k].iter().filter(|(_, l)| *l == 1).count();
            proba.push(positives as f32 / self.k as f32);
        }

        Ok(proba)
    }
}

/// Gaussian Naive Bayes classifier.
///
/// Assumes features follow a Gaussian distribution within each class and are
/// independent given the class. Every class variance is inflated by
/// `var_smoothing` times the largest feature variance of the training data.
///
/// # Example
///
/// ```
/// use beneish::classification::GaussianNB;
/// use beneish::prelude::*;
///
/// let x = Matrix::from_vec(4, 2, vec![
///     0.0, 0.0,
///     0.0, 1.0,
///     1.0, 0.0,
///     1.0, 1.0,
/// ]).expect("4x2 matrix with 8 values");
/// let y = vec![0, 0, 1, 1];
///
/// let mut model = GaussianNB::new();
/// model.fit(&x, &y).expect("Valid training data");
/// let predictions = model.predict(&x).expect("Model is fitted");
/// assert_eq!(predictions, vec![0, 0, 1, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct GaussianNB {
    /// Class prior probabilities P(y=c)
    class_priors: Option<[f32; 2]>,
    /// Feature means per class: means[class][feature]
    means: Option<[Vec<f32>; 2]>,
    /// Feature variances per class: variances[class][feature]
    variances: Option<[Vec<f32>; 2]>,
    /// Portion of the largest feature variance added to all variances
    var_smoothing: f32,
}

impl GaussianNB {
    /// Creates a new Gaussian Naive Bayes classifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            class_priors: None,
            means: None,
            variances: None,
            var_smoothing: 1e-9,
        }
    }

    /// Sets the variance smoothing parameter.
    #[must_use]
    pub fn with_var_smoothing(mut self, var_smoothing: f32) -> Self {
        self.var_smoothing = var_smoothing;
        self
    }

    /// Per-class feature means, once fitted.
    #[must_use]
    pub fn means(&self) -> Option<&[Vec<f32>; 2]> {
        self.means.as_ref()
    }

    /// Class priors `[P(y=0), P(y=1)]`, once fitted.
    #[must_use]
    pub fn class_priors(&self) -> Option<[f32; 2]> {
        self.class_priors
    }
}

impl Default for GaussianNB {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for GaussianNB {
    /// Computes class priors, feature means, and variances for each class.
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        check_training_data(x, y)?;

        let (n_samples, n_features) = x.shape();
        let epsilon = self.var_smoothing
            * x.column_variances()
                .into_iter()
                .fold(0.0_f32, f32::max);

        let mut priors = [0.0; 2];
        let mut means = [vec![0.0; n_features], vec![0.0; n_features]];
        let mut variances = [vec![0.0; n_features], vec![0.0; n_features]];

        for class in 0..2 {
            let rows: Vec<usize> = (0..n_samples).filter(|&i| y[i] == class).collect();
            if rows.is_empty() {
                return Err("Need at least 2 classes".into());
            }
            let subset = x.select_rows(&rows);
            priors[class] = rows.len() as f32 / n_samples as f32;
            means[class] = subset.column_means();
            variances[class] = subset
                .column_variances()
                .into_iter()
                .map(|v| v + epsilon)
                .collect();
        }

        self.class_priors = Some(priors);
        self.means = Some(means);
        self.variances = Some(variances);
        Ok(())
    }

    /// Bayes' theorem with Gaussian likelihoods, normalized in log space:
    /// P(y=c|X) ∝ P(y=c) * ∏ `P(x_i|y=c)`
    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Vec<f32>> {
        let means = self.means.as_ref().ok_or("Model not fitted")?;
        let variances = self.variances.as_ref().ok_or("Model not fitted")?;
        let priors = self.class_priors.ok_or("Model not fitted")?;

        let (n_samples, n_features) = x.shape();
        if n_features != means[0].len() {
            return Err(BeneishError::dimension_mismatch(
                "features",
                means[0].len(),
                n_features,
            ));
        }

        let mut proba = Vec::with_capacity(n_samples);
        for i in 0..n_samples {
            let mut log_probs = [0.0_f64; 2];
            for class in 0..2 {
                let mut lp = f64::from(priors[class]).ln();
                for j in 0..n_features {
                    let var = f64::from(variances[class][j]).max(1e-12);
                    let diff = f64::from(x.get(i, j)) - f64::from(means[class][j]);
                    // Log of Gaussian PDF: -0.5 * log(2π*σ²) - (x-μ)² / (2σ²)
                    lp += -0.5 * (2.0 * std::f64::consts::PI * var).ln() - diff * diff / (2.0 * var);
                }
                log_probs[class] = lp;
            }

            let max = log_probs[0].max(log_probs[1]);
            let e0 = (log_probs[0] - max).exp();
            let e1 = (log_probs[1] - max).exp();
            proba.push((e1 / (e0 + e1)) as f32);
        }

        Ok(proba)
    }
}

#[cfg(test)]
mod tests;
#[cfg(test)]
mod tests_knn_contract;
#[cfg(test)]
mod tests_nb_contract;
