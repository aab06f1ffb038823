use super::StandardScaler;
use crate::error::Result;
use crate::model_selection::{extract_samples, stratified_split, SplitIndices};
use crate::primitives::Matrix;
use crate::traits::Transformer;
use crate::validation::Dataset;

/// Which version of the features a model family consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSpace {
    /// Ratios as loaded
    Raw,
    /// Standardized with the training-partition scaler
    Scaled,
}

/// Train/test partitions in raw and scaled form.
///
/// The scaler is fitted on the training features only and applied, unchanged,
/// to both partitions.
///
/// # Example
///
/// ```
/// use beneish::preprocessing::{FeatureSpace, PreparedSplit};
/// use beneish::prelude::*;
/// use beneish::validation::Dataset;
///
/// let x = Matrix::from_vec(8, 1, (0..8).map(|i| i as f32).collect()).unwrap();
/// let ds = Dataset::new(x, vec![0, 0, 0, 0, 1, 1, 1, 1]).unwrap();
/// let split = PreparedSplit::new(&ds, 0.25, 42).unwrap();
///
/// assert_eq!(split.y_test().len(), 2);
/// let (train, _) = split.features(FeatureSpace::Scaled);
/// assert!(train.column_means()[0].abs() < 1e-5);
/// ```
#[derive(Debug, Clone)]
pub struct PreparedSplit {
    indices: SplitIndices,
    x_train: Matrix<f32>,
    x_test: Matrix<f32>,
    y_train: Vec<usize>,
    y_test: Vec<usize>,
    x_train_scaled: Matrix<f32>,
    x_test_scaled: Matrix<f32>,
    scaler: StandardScaler,
}

impl PreparedSplit {
    /// Splits `dataset` and scales the result.
    ///
    /// # Errors
    ///
    /// Propagates split errors (fraction outside (0, 1), a class with fewer
    /// than two rows) and scaler errors.
    pub fn new(dataset: &Dataset, test_size: f64, seed: u64) -> Result<Self> {
        let indices = stratified_split(dataset.labels(), test_size, seed)?;
        let (x_train, y_train) = extract_samples(dataset.features(), dataset.labels(), &indices.train);
        let (x_test, y_test) = extract_samples(dataset.features(), dataset.labels(), &indices.test);

        let mut scaler = StandardScaler::new();
        let x_train_scaled = scaler.fit_transform(&x_train)?;
        let x_test_scaled = scaler.transform(&x_test)?;

        tracing::info!(
            train = y_train.len(),
            test = y_test.len(),
            test_size,
            seed,
            "data split and scaled"
        );

        Ok(Self {
            indices,
            x_train,
            x_test,
            y_train,
            y_test,
            x_train_scaled,
            x_test_scaled,
            scaler,
        })
    }

    /// Dataset row indices on each side.
    #[must_use]
    pub fn indices(&self) -> &SplitIndices {
        &self.indices
    }

    /// `(train, test)` features in the requested space.
    #[must_use]
    pub fn features(&self, space: FeatureSpace) -> (&Matrix<f32>, &Matrix<f32>) {
        match space {
            FeatureSpace::Raw => (&self.x_train, &self.x_test),
            FeatureSpace::Scaled => (&self.x_train_scaled, &self.x_test_scaled),
        }
    }

    /// Raw training features.
    #[must_use]
    pub fn x_train(&self) -> &Matrix<f32> {
        &self.x_train
    }

    /// Raw test features.
    #[must_use]
    pub fn x_test(&self) -> &Matrix<f32> {
        &self.x_test
    }

    /// Training labels.
    #[must_use]
    pub fn y_train(&self) -> &[usize] {
        &self.y_train
    }

    /// Test labels.
    #[must_use]
    pub fn y_test(&self) -> &[usize] {
        &self.y_test
    }

    /// Scaler fitted on the training partition.
    #[must_use]
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }
}
