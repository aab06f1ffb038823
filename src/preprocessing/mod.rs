//! Feature standardization and the split/scale stage.
//!
//! [`PreparedSplit`] partitions a validated dataset with a seeded stratified
//! split, fits a [`StandardScaler`] on the training rows only and keeps both
//! the raw and the scaled partitions.
//!
//! # Example
//!
//! ```
//! use beneish::prelude::*;
//! use beneish::preprocessing::StandardScaler;
//!
//! let data = Matrix::from_vec(4, 2, vec![
//!     1.0, 100.0,
//!     2.0, 200.0,
//!     3.0, 300.0,
//!     4.0, 400.0,
//! ]).expect("valid matrix dimensions");
//!
//! let mut scaler = StandardScaler::new();
//! let scaled = scaler.fit_transform(&data).expect("fit_transform should succeed");
//! assert!(scaled.get(0, 0) < 0.0);
//! ```

mod split;

pub use split::{FeatureSpace, PreparedSplit};

use crate::error::{BeneishError, Result};
use crate::primitives::Matrix;
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};

/// Standard deviations at or below this are treated as a constant column.
const STD_EPSILON: f32 = 1e-10;

/// Standardizes features by removing the mean and scaling to unit variance.
///
/// The standard score of a sample x is `z = (x - mean) / std`, where `std` is
/// the population standard deviation. Constant columns are centred but not
/// scaled.
///
/// Fitted statistics come only from the matrix passed to `fit`; `transform`
/// never updates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Vec<f32>>,
    std: Option<Vec<f32>>,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    /// Creates an unfitted scaler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
        }
    }

    /// Per-feature means, once fitted.
    #[must_use]
    pub fn mean(&self) -> Option<&[f32]> {
        self.mean.as_deref()
    }

    /// Per-feature population standard deviations, once fitted.
    #[must_use]
    pub fn std(&self) -> Option<&[f32]> {
        self.std.as_deref()
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    /// Transforms standardized data back to the original scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaler is not fitted or dimensions mismatch.
    pub fn inverse_transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let (mean, std) = self.fitted()?;
        let (n_samples, n_features) = x.shape();
        if n_features != mean.len() {
            return Err(BeneishError::dimension_mismatch(
                "features",
                mean.len(),
                n_features,
            ));
        }

        let mut result = Vec::with_capacity(n_samples * n_features);
        for i in 0..n_samples {
            for j in 0..n_features {
                let scale = if std[j] > STD_EPSILON { std[j] } else { 1.0 };
                result.push(x.get(i, j) * scale + mean[j]);
            }
        }

        Matrix::from_vec(n_samples, n_features, result).map_err(Into::into)
    }

    fn fitted(&self) -> Result<(&[f32], &[f32])> {
        match (self.mean.as_deref(), self.std.as_deref()) {
            (Some(mean), Some(std)) => Ok((mean, std)),
            _ => Err("Scaler not fitted".into()),
        }
    }
}

impl Transformer for StandardScaler {
    /// Computes the mean and standard deviation of each feature.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        if x.n_rows() == 0 {
            return Err(BeneishError::empty_input("scaler fit"));
        }

        let mean = x.column_means();
        let std = x.column_variances().into_iter().map(f32::sqrt).collect();

        self.mean = Some(mean);
        self.std = Some(std);
        Ok(())
    }

    /// Standardizes the data using fitted mean and std.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let (mean, std) = self.fitted()?;
        let (n_samples, n_features) = x.shape();
        if n_features != mean.len() {
            return Err(BeneishError::dimension_mismatch(
                "features",
                mean.len(),
                n_features,
            ));
        }

        let mut result = Vec::with_capacity(n_samples * n_features);
        for i in 0..n_samples {
            for j in 0..n_features {
                let centred = x.get(i, j) - mean[j];
                let val = if std[j] > STD_EPSILON {
                    centred / std[j]
                } else {
                    centred
                };
                result.push(val);
            }
        }

        Matrix::from_vec(n_samples, n_features, result).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests_standardization_contract;
