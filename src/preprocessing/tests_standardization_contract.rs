// =========================================================================
// FALSIFY-PS: StandardScaler contract
//
// References:
//   - z = (x - mean_train) / std_train, population std
// =========================================================================

use super::*;

/// FALSIFY-PS-001: Training output has zero mean per column
#[test]
fn falsify_ps_001_zero_mean() {
    let x = Matrix::from_vec(
        5,
        2,
        vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0, 4.0, 40.0, 5.0, 50.0],
    )
    .expect("valid");

    let mut scaler = StandardScaler::new();
    let transformed = scaler.fit_transform(&x).expect("fit_transform");

    let (n, p) = transformed.shape();
    for j in 0..p {
        let mean: f32 = (0..n).map(|i| transformed.get(i, j)).sum::<f32>() / n as f32;
        assert!(
            mean.abs() < 1e-5,
            "FALSIFIED PS-001: column {j} mean={mean}, expected 0"
        );
    }
}

/// FALSIFY-PS-002: Training output has unit population variance per column
#[test]
fn falsify_ps_002_unit_variance() {
    let x = Matrix::from_vec(4, 1, vec![0.5, 1.5, 9.0, -3.0]).expect("valid");

    let mut scaler = StandardScaler::new();
    let transformed = scaler.fit_transform(&x).expect("fit_transform");

    let var = transformed.column_variances()[0];
    assert!(
        (var - 1.0).abs() < 1e-4,
        "FALSIFIED PS-002: variance={var}, expected 1"
    );
}

/// FALSIFY-PS-003: Scaling is order-preserving within a column
#[test]
fn falsify_ps_003_monotone() {
    let x = Matrix::from_vec(4, 1, vec![3.0, -1.0, 7.0, 2.0]).expect("valid");
    let mut scaler = StandardScaler::new();
    let t = scaler.fit_transform(&x).expect("fit_transform");
    for a in 0..4 {
        for b in 0..4 {
            if x.get(a, 0) < x.get(b, 0) {
                assert!(
                    t.get(a, 0) < t.get(b, 0),
                    "FALSIFIED PS-003: order broken between rows {a} and {b}"
                );
            }
        }
    }
}
