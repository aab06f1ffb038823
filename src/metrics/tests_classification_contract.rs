// =========================================================================
// FALSIFY-MC: binary classification metrics contract
//
// References:
//   - Sokolova & Lapalme (2009) "A systematic analysis of performance measures"
// =========================================================================

use super::classification::*;

const Y_TRUE: [usize; 8] = [0, 1, 1, 0, 1, 0, 0, 1];
const Y_PRED: [usize; 8] = [0, 1, 0, 1, 1, 0, 1, 1];

/// FALSIFY-MC-001: Every metric lies in [0, 1]
#[test]
fn falsify_mc_001_bounded() {
    for value in [
        accuracy(&Y_PRED, &Y_TRUE),
        precision(&Y_PRED, &Y_TRUE),
        recall(&Y_PRED, &Y_TRUE),
        f1_score(&Y_PRED, &Y_TRUE),
    ] {
        assert!(
            (0.0..=1.0).contains(&value),
            "FALSIFIED MC-001: metric={value} not in [0, 1]"
        );
    }
}

/// FALSIFY-MC-002: Perfect predictions score 1 on every metric
#[test]
fn falsify_mc_002_perfect() {
    for value in [
        accuracy(&Y_TRUE, &Y_TRUE),
        precision(&Y_TRUE, &Y_TRUE),
        recall(&Y_TRUE, &Y_TRUE),
        f1_score(&Y_TRUE, &Y_TRUE),
    ] {
        assert!(
            (value - 1.0).abs() < 1e-6,
            "FALSIFIED MC-002: metric={value} for perfect predictions"
        );
    }
}

/// FALSIFY-MC-003: F1 is the harmonic mean of precision and recall
#[test]
fn falsify_mc_003_f1_harmonic_mean() {
    let p = precision(&Y_PRED, &Y_TRUE);
    let r = recall(&Y_PRED, &Y_TRUE);
    let f1 = f1_score(&Y_PRED, &Y_TRUE);
    let expected = 2.0 * p * r / (p + r);
    assert!(
        (f1 - expected).abs() < 1e-6,
        "FALSIFIED MC-003: f1={f1}, harmonic mean={expected}"
    );
}

/// FALSIFY-MC-004: Predicting no positives gives precision 0, not NaN
#[test]
fn falsify_mc_004_zero_division() {
    let none = [0usize; 8];
    let p = precision(&none, &Y_TRUE);
    assert!(p == 0.0, "FALSIFIED MC-004: precision={p}");
    assert!(f1_score(&none, &Y_TRUE) == 0.0, "FALSIFIED MC-004: f1 not 0");
}
