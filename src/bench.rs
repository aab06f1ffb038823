//! Model Bench: the fixed roster of classifier families.
//!
//! Each family carries its own hyperparameters and feature space. SVM and
//! KNN consume the scaled partitions; the rest consume raw ratios.
//!
//! # Example
//!
//! ```
//! use beneish::bench::ModelFamily;
//! use beneish::preprocessing::FeatureSpace;
//!
//! assert_eq!(ModelFamily::ROSTER.len(), 5);
//! assert_eq!(ModelFamily::Knn.feature_space(), FeatureSpace::Scaled);
//! assert_eq!(ModelFamily::XgBoost.name(), "XGBoost");
//! ```

use crate::classification::{GaussianNB, Gamma, KNearestNeighbors, SVC};
use crate::config::Variant;
use crate::ensemble::AdaBoostClassifier;
use crate::error::Result;
use crate::metrics::{column_maxima, evaluate, Metric, MetricRecord};
use crate::preprocessing::{FeatureSpace, PreparedSplit};
use crate::primitives::Matrix;
use crate::traits::Classifier;
use crate::tree::GradientBoostingClassifier;
use serde::Serialize;
use std::fmt;

/// Seed shared by every seeded family.
pub const MODEL_SEED: u64 = 42;

/// One entry of the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ModelFamily {
    /// RBF-kernel support vector classifier
    Svm,
    /// k-nearest neighbours
    Knn,
    /// Gaussian naive Bayes
    NaiveBayes,
    /// SAMME boosting over stumps
    AdaBoost,
    /// Gradient-boosted regression trees
    XgBoost,
}

impl ModelFamily {
    /// Every family, in table order.
    pub const ROSTER: [ModelFamily; 5] = [
        ModelFamily::Svm,
        ModelFamily::Knn,
        ModelFamily::NaiveBayes,
        ModelFamily::AdaBoost,
        ModelFamily::XgBoost,
    ];

    /// Display name used in tables and charts.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ModelFamily::Svm => "SVM",
            ModelFamily::Knn => "KNN",
            ModelFamily::NaiveBayes => "Naive Bayes",
            ModelFamily::AdaBoost => "AdaBoost",
            ModelFamily::XgBoost => "XGBoost",
        }
    }

    /// Partitions this family trains and predicts on.
    #[must_use]
    pub fn feature_space(self) -> FeatureSpace {
        match self {
            ModelFamily::Svm | ModelFamily::Knn => FeatureSpace::Scaled,
            ModelFamily::NaiveBayes | ModelFamily::AdaBoost | ModelFamily::XgBoost => {
                FeatureSpace::Raw
            }
        }
    }

    /// Unfitted model with this family's fixed hyperparameters.
    #[must_use]
    pub fn build(self, variant: Variant) -> Model {
        match self {
            ModelFamily::Svm => Model::Svm(
                SVC::new()
                    .with_c(1.0)
                    .with_gamma(Gamma::Scale)
                    .with_seed(MODEL_SEED),
            ),
            ModelFamily::Knn => Model::Knn(KNearestNeighbors::new(5)),
            ModelFamily::NaiveBayes => Model::NaiveBayes(GaussianNB::new()),
            ModelFamily::AdaBoost => Model::AdaBoost(
                AdaBoostClassifier::new()
                    .with_n_estimators(200)
                    .with_learning_rate(0.05),
            ),
            ModelFamily::XgBoost => Model::XgBoost(bench_xgboost(variant)),
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bench configuration of the boosted-tree family.
fn bench_xgboost(variant: Variant) -> GradientBoostingClassifier {
    let model = GradientBoostingClassifier::new().with_seed(MODEL_SEED);
    match variant {
        Variant::Baseline => model
            .with_n_estimators(300)
            .with_learning_rate(0.05)
            .with_max_depth(4)
            .with_subsample(0.9)
            .with_colsample_bytree(0.9),
        Variant::Comparison => model,
    }
}

/// A benched model of any family.
#[derive(Debug, Clone)]
pub enum Model {
    /// See [`SVC`]
    Svm(SVC),
    /// See [`KNearestNeighbors`]
    Knn(KNearestNeighbors),
    /// See [`GaussianNB`]
    NaiveBayes(GaussianNB),
    /// See [`AdaBoostClassifier`]
    AdaBoost(AdaBoostClassifier),
    /// See [`GradientBoostingClassifier`]
    XgBoost(GradientBoostingClassifier),
}

impl Model {
    /// Family this model belongs to.
    #[must_use]
    pub fn family(&self) -> ModelFamily {
        match self {
            Model::Svm(_) => ModelFamily::Svm,
            Model::Knn(_) => ModelFamily::Knn,
            Model::NaiveBayes(_) => ModelFamily::NaiveBayes,
            Model::AdaBoost(_) => ModelFamily::AdaBoost,
            Model::XgBoost(_) => ModelFamily::XgBoost,
        }
    }

    fn as_classifier(&self) -> &dyn Classifier {
        match self {
            Model::Svm(m) => m,
            Model::Knn(m) => m,
            Model::NaiveBayes(m) => m,
            Model::AdaBoost(m) => m,
            Model::XgBoost(m) => m,
        }
    }

    fn as_classifier_mut(&mut self) -> &mut dyn Classifier {
        match self {
            Model::Svm(m) => m,
            Model::Knn(m) => m,
            Model::NaiveBayes(m) => m,
            Model::AdaBoost(m) => m,
            Model::XgBoost(m) => m,
        }
    }
}

impl Classifier for Model {
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        self.as_classifier_mut().fit(x, y)
    }

    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Vec<f32>> {
        self.as_classifier().predict_proba(x)
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        self.as_classifier().predict(x)
    }
}

/// Fits `model` on the training side and scores it on the test side.
///
/// # Errors
///
/// Propagates fitting and prediction errors.
pub fn fit_and_evaluate(
    name: &str,
    model: &mut dyn Classifier,
    x_train: &Matrix<f32>,
    y_train: &[usize],
    x_test: &Matrix<f32>,
    y_test: &[usize],
) -> Result<MetricRecord> {
    model.fit(x_train, y_train)?;
    let y_pred = model.predict(x_test)?;
    let y_score = model.predict_proba(x_test)?;
    evaluate(name, y_test, &y_pred, &y_score)
}

/// One metric record per family, in roster order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchResults {
    /// Held-out metrics, one per family
    pub records: Vec<MetricRecord>,
}

impl BenchResults {
    /// Maximum of each metric column, in [`Metric::ALL`] order.
    #[must_use]
    pub fn maxima(&self) -> [f32; 5] {
        column_maxima(&self.records)
    }

    /// Whether row `row` holds the column maximum for `metric`.
    #[must_use]
    pub fn is_max(&self, row: usize, metric: Metric) -> bool {
        let Some(record) = self.records.get(row) else {
            return false;
        };
        let max = self
            .records
            .iter()
            .map(|r| r.get(metric))
            .fold(f32::NEG_INFINITY, f32::max);
        record.get(metric) >= max
    }

    /// Highest accuracy; the earliest family wins ties.
    #[must_use]
    pub fn best_by_accuracy(&self) -> Option<&MetricRecord> {
        self.records
            .iter()
            .reduce(|best, r| if r.accuracy > best.accuracy { r } else { best })
    }
}

/// Trains every family on its feature space and evaluates it on the test partition.
///
/// # Errors
///
/// Returns the first family's fitting or prediction error.
pub fn run_bench(split: &PreparedSplit, variant: Variant) -> Result<BenchResults> {
    let mut records = Vec::with_capacity(ModelFamily::ROSTER.len());
    for family in ModelFamily::ROSTER {
        let (x_train, x_test) = split.features(family.feature_space());
        let mut model = family.build(variant);
        let record = fit_and_evaluate(
            family.name(),
            &mut model,
            x_train,
            split.y_train(),
            x_test,
            split.y_test(),
        )?;
        tracing::debug!(
            model = family.name(),
            accuracy = record.accuracy,
            roc_auc = record.roc_auc,
            "model evaluated"
        );
        records.push(record);
    }
    tracing::info!(models = records.len(), %variant, "bench finished");
    Ok(BenchResults { records })
}
