//! Core traits for classifiers and transformers.
//!
//! These traits define the API contracts shared by every model family on the
//! bench and by the feature scaler.

use crate::error::Result;
use crate::primitives::Matrix;

/// Uniform capability of every benched model family.
///
/// Labels are binary class indices (0 = not a manipulator, 1 = manipulator).
///
/// # Examples
///
/// ```
/// use beneish::prelude::*;
///
/// let x = Matrix::from_vec(4, 1, vec![0.0, 0.2, 5.0, 5.2]).unwrap();
/// let y = vec![0, 0, 1, 1];
///
/// let mut model = GaussianNB::new();
/// model.fit(&x, &y).unwrap();
/// let proba = model.predict_proba(&x).unwrap();
/// assert!(proba[3] > 0.5);
/// assert_eq!(model.predict(&x).unwrap(), vec![0, 0, 1, 1]);
/// ```
pub trait Classifier {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (dimension mismatch, a single class, etc.).
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()>;

    /// Probability of the positive class (label 1) for each row.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or dimensions mismatch.
    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Vec<f32>>;

    /// Hard 0/1 predictions at the standard decision threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or dimensions mismatch.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        Ok(self
            .predict_proba(x)?
            .iter()
            .map(|&p| usize::from(p > 0.5))
            .collect())
    }
}

/// Trait for data transformers (scalers).
///
/// ```text
/// let mut scaler = StandardScaler::new();
/// let x_scaled = scaler.fit_transform(&x)?;
/// let x_test_scaled = scaler.transform(&x_test)?;
/// ```
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()>;

    /// Transforms data using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if transformer is not fitted.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        self.fit(x)?;
        self.transform(x)
    }
}
