//! Binary classification metrics.
//!
//! The positive class is label 1. Ratios with an empty denominator are 0.

/// Counts of a binary confusion matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    /// Predicted 1, actually 1.
    pub tp: usize,
    /// Predicted 1, actually 0.
    pub fp: usize,
    /// Predicted 0, actually 0.
    pub tn: usize,
    /// Predicted 0, actually 1.
    pub fn_: usize,
}

impl ConfusionCounts {
    /// Tallies predictions against truth.
    ///
    /// # Panics
    ///
    /// Panics if the slices have different lengths.
    #[must_use]
    pub fn from_predictions(y_pred: &[usize], y_true: &[usize]) -> Self {
        assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");

        let mut counts = Self::default();
        for (&p, &t) in y_pred.iter().zip(y_true) {
            match (p == 1, t == 1) {
                (true, true) => counts.tp += 1,
                (true, false) => counts.fp += 1,
                (false, false) => counts.tn += 1,
                (false, true) => counts.fn_ += 1,
            }
        }
        counts
    }

    /// Total number of samples.
    #[must_use]
    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_
    }
}

fn ratio(num: usize, den: usize) -> f32 {
    if den == 0 {
        0.0
    } else {
        num as f32 / den as f32
    }
}

/// Compute classification accuracy.
///
/// accuracy = `correct_predictions` / `total_predictions`
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use beneish::metrics::classification::accuracy;
///
/// let y_true = vec![0, 1, 1, 0, 1, 0];
/// let y_pred = vec![0, 1, 0, 0, 0, 1];
/// let acc = accuracy(&y_pred, &y_true);
/// assert!((acc - 0.5).abs() < 1e-6);
/// ```
#[must_use]
pub fn accuracy(y_pred: &[usize], y_true: &[usize]) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| p == t)
        .count();

    correct as f32 / y_true.len() as f32
}

/// Compute precision for the positive class.
///
/// precision = TP / (TP + FP), 0 when nothing is predicted positive.
///
/// # Panics
///
/// Panics if vectors have different lengths.
///
/// # Examples
///
/// ```
/// use beneish::metrics::classification::precision;
///
/// let y_true = vec![0, 1, 1, 0];
/// let y_pred = vec![1, 1, 0, 0];
/// assert!((precision(&y_pred, &y_true) - 0.5).abs() < 1e-6);
/// assert_eq!(precision(&[0, 0], &[1, 0]), 0.0);
/// ```
#[must_use]
pub fn precision(y_pred: &[usize], y_true: &[usize]) -> f32 {
    let c = ConfusionCounts::from_predictions(y_pred, y_true);
    ratio(c.tp, c.tp + c.fp)
}

/// Compute recall for the positive class.
///
/// recall = TP / (TP + FN), 0 when there are no actual positives.
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[must_use]
pub fn recall(y_pred: &[usize], y_true: &[usize]) -> f32 {
    let c = ConfusionCounts::from_predictions(y_pred, y_true);
    ratio(c.tp, c.tp + c.fn_)
}

/// Compute F1 for the positive class.
///
/// F1 = 2·TP / (2·TP + FP + FN), the harmonic mean of precision and recall;
/// 0 when both are 0.
///
/// # Panics
///
/// Panics if vectors have different lengths.
///
/// # Examples
///
/// ```
/// use beneish::metrics::classification::f1_score;
///
/// let y_true = vec![1, 1, 0, 0];
/// let y_pred = vec![1, 0, 1, 0];
/// assert!((f1_score(&y_pred, &y_true) - 0.5).abs() < 1e-6);
/// ```
#[must_use]
pub fn f1_score(y_pred: &[usize], y_true: &[usize]) -> f32 {
    let c = ConfusionCounts::from_predictions(y_pred, y_true);
    ratio(2 * c.tp, 2 * c.tp + c.fp + c.fn_)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confusion_counts() {
        let c = ConfusionCounts::from_predictions(&[1, 0, 1, 0, 1], &[1, 1, 0, 0, 1]);
        assert_eq!(
            c,
            ConfusionCounts {
                tp: 2,
                fp: 1,
                tn: 1,
                fn_: 1
            }
        );
        assert_eq!(c.total(), 5);
    }

    #[test]
    fn test_precision_recall_f1() {
        let y_true = vec![1, 1, 1, 0, 0, 0];
        let y_pred = vec![1, 1, 0, 1, 0, 0];
        assert!((precision(&y_pred, &y_true) - 2.0 / 3.0).abs() < 1e-6);
        assert!((recall(&y_pred, &y_true) - 2.0 / 3.0).abs() < 1e-6);
        assert!((f1_score(&y_pred, &y_true) - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_division_yields_zero() {
        let y_true = vec![0, 0, 0];
        let y_pred = vec![0, 0, 0];
        assert_eq!(precision(&y_pred, &y_true), 0.0);
        assert_eq!(recall(&y_pred, &y_true), 0.0);
        assert_eq!(f1_score(&y_pred, &y_true), 0.0);
        assert_eq!(accuracy(&y_pred, &y_true), 1.0);
    }

    #[test]
    #[should_panic(expected = "Vectors must have same length")]
    fn test_accuracy_length_mismatch() {
        let _ = accuracy(&[0, 1], &[0]);
    }
}
