// =========================================================================
// FALSIFY-VE: Vector primitives contract
//
// References:
//   - Population variance: Var(x) = E[(x - mean)^2]
// =========================================================================

use super::*;

/// FALSIFY-VE-001: Mean lies between the extremes
#[test]
fn falsify_ve_001_mean_bounded() {
    let v = Vector::from_slice(&[0.4, 1.7, 0.9, 1.1]);
    let mean = v.mean();
    assert!(
        (0.4..=1.7).contains(&mean),
        "FALSIFIED VE-001: mean {mean} outside [0.4, 1.7]"
    );
}

/// FALSIFY-VE-002: Variance is non-negative and zero for constants
#[test]
fn falsify_ve_002_variance_non_negative() {
    let v = Vector::from_slice(&[-3.0, 0.5, 9.0, 2.0]);
    assert!(v.variance() >= 0.0, "FALSIFIED VE-002: negative variance");

    let c = Vector::from_slice(&[4.2, 4.2, 4.2]);
    assert!(
        c.variance().abs() < 1e-6,
        "FALSIFIED VE-002: constant vector variance {}",
        c.variance()
    );
}

/// FALSIFY-VE-003: Empty vector statistics are defined
#[test]
fn falsify_ve_003_empty_statistics() {
    let v = Vector::<f32>::from_vec(vec![]);
    assert!(v.is_empty());
    assert_eq!(v.mean(), 0.0, "FALSIFIED VE-003: empty mean");
    assert_eq!(v.variance(), 0.0, "FALSIFIED VE-003: empty variance");
}

/// FALSIFY-VE-004: Indexing writes through
#[test]
fn falsify_ve_004_index_mut() {
    let mut v = Vector::from_vec(vec![1.0_f32, 2.0]);
    v[1] = 7.0;
    assert_eq!(v.as_slice(), &[1.0, 7.0], "FALSIFIED VE-004");
}
