//! Threshold-free ranking quality for binary scores.

/// One point of a ROC curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RocPoint {
    /// Scores at or above this are predicted positive.
    pub threshold: f32,
    /// False positive rate: FP / (FP + TN).
    pub fpr: f32,
    /// True positive rate (recall): TP / (TP + FN).
    pub tpr: f32,
}

/// Computes the ROC curve from binary labels and positive-class scores.
///
/// Walks thresholds in descending score order; tied scores advance together,
/// which makes the trapezoidal area equal to the rank-based AUC with ties
/// counted as one half. Starts at (0, 0) and ends at (1, 1).
///
/// Returns `None` when either class is absent, since the curve is undefined.
///
/// # Panics
///
/// Panics if the slices have different lengths.
#[must_use]
pub fn roc_curve(y_true: &[usize], scores: &[f32]) -> Option<Vec<RocPoint>> {
    assert_eq!(y_true.len(), scores.len(), "Vectors must have same length");

    let total_pos = y_true.iter().filter(|&&l| l == 1).count();
    let total_neg = y_true.len() - total_pos;
    if total_pos == 0 || total_neg == 0 {
        return None;
    }

    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let p = total_pos as f32;
    let n = total_neg as f32;

    let mut points = Vec::with_capacity(scores.len() + 1);
    points.push(RocPoint {
        threshold: f32::INFINITY,
        fpr: 0.0,
        tpr: 0.0,
    });

    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut i = 0;
    while i < indices.len() {
        let current = scores[indices[i]];
        while i < indices.len() && scores[indices[i]] == current {
            if y_true[indices[i]] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push(RocPoint {
            threshold: current,
            fpr: fp as f32 / n,
            tpr: tp as f32 / p,
        });
    }

    Some(points)
}

/// Area under the ROC curve, or `None` for a single-class input.
///
/// # Examples
///
/// ```
/// use beneish::metrics::ranking::roc_auc;
///
/// let y = vec![0, 0, 1, 1];
/// let s = vec![0.1, 0.4, 0.35, 0.8];
/// assert!((roc_auc(&y, &s).unwrap() - 0.75).abs() < 1e-6);
/// assert!(roc_auc(&[1, 1], &[0.2, 0.9]).is_none());
/// ```
///
/// # Panics
///
/// Panics if the slices have different lengths.
#[must_use]
pub fn roc_auc(y_true: &[usize], scores: &[f32]) -> Option<f32> {
    let points = roc_curve(y_true, scores)?;
    let auc = points
        .windows(2)
        .map(|w| (w[1].fpr - w[0].fpr).abs() * (w[1].tpr + w[0].tpr) / 2.0)
        .sum::<f32>();
    Some(auc.clamp(0.0, 1.0))
}

/// ROC AUC with the undefined single-class case reported as 0.
///
/// This is the form used for metric records and cross-validation scoring.
#[must_use]
pub fn roc_auc_or_zero(y_true: &[usize], scores: &[f32]) -> f32 {
    roc_auc(y_true, scores).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_and_inverted() {
        let y = [0, 0, 1, 1];
        assert_eq!(roc_auc(&y, &[0.1, 0.2, 0.8, 0.9]), Some(1.0));
        assert_eq!(roc_auc(&y, &[0.9, 0.8, 0.2, 0.1]), Some(0.0));
    }

    #[test]
    fn test_all_tied_is_half() {
        let y = [0, 1, 0, 1];
        let auc = roc_auc(&y, &[0.5; 4]).expect("both classes");
        assert!((auc - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_curve_endpoints() {
        let points = roc_curve(&[0, 1, 1], &[0.3, 0.6, 0.9]).expect("curve");
        assert_eq!(points.first().map(|p| (p.fpr, p.tpr)), Some((0.0, 0.0)));
        assert_eq!(points.last().map(|p| (p.fpr, p.tpr)), Some((1.0, 1.0)));
    }

    #[test]
    fn test_single_class() {
        assert!(roc_curve(&[0, 0], &[0.1, 0.2]).is_none());
        assert_eq!(roc_auc_or_zero(&[1], &[0.7]), 0.0);
    }
}
