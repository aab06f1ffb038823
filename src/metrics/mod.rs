//! Evaluation metrics for the benched classifiers.
//!
//! Includes binary classification metrics (accuracy, precision, recall,
//! F1-score), ROC AUC, and the per-model [`MetricRecord`].

pub mod classification;
pub mod ranking;

pub use classification::{accuracy, f1_score, precision, recall, ConfusionCounts};
pub use ranking::{roc_auc, roc_auc_or_zero, roc_curve, RocPoint};

use crate::error::{BeneishError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One column of the results table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Fraction of correct predictions.
    Accuracy,
    /// Positive predictive value.
    Precision,
    /// True positive rate.
    Recall,
    /// Harmonic mean of precision and recall.
    F1,
    /// Area under the ROC curve.
    RocAuc,
}

impl Metric {
    /// Every metric in table column order.
    pub const ALL: [Metric; 5] = [
        Metric::Accuracy,
        Metric::Precision,
        Metric::Recall,
        Metric::F1,
        Metric::RocAuc,
    ];

    /// Column header.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Metric::Accuracy => "Accuracy",
            Metric::Precision => "Precision",
            Metric::Recall => "Recall",
            Metric::F1 => "F1-score",
            Metric::RocAuc => "ROC-AUC",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Held-out metrics for one trained model.
///
/// Always built fresh from a model's predictions on the test partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Display name of the model.
    pub model: String,
    /// Fraction of correct 0/1 predictions.
    pub accuracy: f32,
    /// TP / (TP + FP), 0 when nothing is predicted positive.
    pub precision: f32,
    /// TP / (TP + FN), 0 when the test set has no positives.
    pub recall: f32,
    /// Harmonic mean of precision and recall.
    #[serde(rename = "f1_score")]
    pub f1: f32,
    /// Area under ROC from positive-class probabilities; 0 on a single-class test set.
    pub roc_auc: f32,
}

impl MetricRecord {
    /// Value of one metric column.
    #[must_use]
    pub fn get(&self, metric: Metric) -> f32 {
        match metric {
            Metric::Accuracy => self.accuracy,
            Metric::Precision => self.precision,
            Metric::Recall => self.recall,
            Metric::F1 => self.f1,
            Metric::RocAuc => self.roc_auc,
        }
    }
}

/// Computes the five metrics for one model.
///
/// `y_pred` are 0/1 decisions, `y_score` positive-class probabilities.
///
/// # Errors
///
/// Returns an error if the inputs are empty or their lengths differ.
///
/// # Examples
///
/// ```
/// use beneish::metrics::evaluate;
///
/// let record = evaluate("demo", &[0, 1, 1, 0], &[0, 1, 0, 0], &[0.2, 0.9, 0.4, 0.1]).unwrap();
/// assert_eq!(record.accuracy, 0.75);
/// assert_eq!(record.roc_auc, 1.0);
/// ```
pub fn evaluate(
    model: &str,
    y_true: &[usize],
    y_pred: &[usize],
    y_score: &[f32],
) -> Result<MetricRecord> {
    if y_true.is_empty() {
        return Err(BeneishError::empty_input("metric evaluation"));
    }
    if y_pred.len() != y_true.len() {
        return Err(BeneishError::dimension_mismatch(
            "predictions",
            y_true.len(),
            y_pred.len(),
        ));
    }
    if y_score.len() != y_true.len() {
        return Err(BeneishError::dimension_mismatch(
            "scores",
            y_true.len(),
            y_score.len(),
        ));
    }

    let roc_auc = match ranking::roc_auc(y_true, y_score) {
        Some(auc) => auc,
        None => {
            tracing::debug!(model, "single-class test partition, ROC AUC reported as 0");
            0.0
        }
    };

    Ok(MetricRecord {
        model: model.to_string(),
        accuracy: accuracy(y_pred, y_true),
        precision: precision(y_pred, y_true),
        recall: recall(y_pred, y_true),
        f1: f1_score(y_pred, y_true),
        roc_auc,
    })
}

/// Maximum of each metric column, in [`Metric::ALL`] order.
#[must_use]
pub fn column_maxima(records: &[MetricRecord]) -> [f32; 5] {
    let mut maxima = [f32::NEG_INFINITY; 5];
    for record in records {
        for (slot, metric) in maxima.iter_mut().zip(Metric::ALL) {
            *slot = slot.max(record.get(metric));
        }
    }
    maxima
}


#[cfg(test)]
mod tests_classification_contract;
#[cfg(test)]
mod tests_ranking_contract;
