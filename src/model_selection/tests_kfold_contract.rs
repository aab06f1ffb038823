// =========================================================================
// FALSIFY-KF: Stratified K-Fold and stratified split contract
//
// References:
//   - Stone (1974) "Cross-Validatory Choice and Assessment of Predictions"
//   - Kohavi (1995) "A Study of Cross-Validation and Bootstrap"
// =========================================================================

use super::*;

fn imbalanced(n_neg: usize, n_pos: usize) -> Vec<usize> {
    // Interleave so positives are not a contiguous block.
    let mut y = Vec::with_capacity(n_neg + n_pos);
    let (mut neg, mut pos) = (n_neg, n_pos);
    while neg + pos > 0 {
        if neg > 0 {
            y.push(0);
            neg -= 1;
        }
        if pos > 0 && neg % 3 == 0 {
            y.push(1);
            pos -= 1;
        }
    }
    y
}

/// FALSIFY-KF-001: Stratified K-Fold produces exactly K splits
#[test]
fn falsify_kf_001_produces_k_splits() {
    let y = imbalanced(60, 15);
    let splits = StratifiedKFold::new(3).split(&y).expect("split");
    assert_eq!(splits.len(), 3, "FALSIFIED KF-001: splits={}", splits.len());
}

/// FALSIFY-KF-002: Every sample appears in exactly one test fold
#[test]
fn falsify_kf_002_every_sample_in_one_test_fold() {
    let y = imbalanced(20, 7);
    let splits = StratifiedKFold::new(3).split(&y).expect("split");

    let mut test_counts = vec![0usize; y.len()];
    for (train, test) in &splits {
        assert_eq!(train.len() + test.len(), y.len());
        for &idx in test {
            test_counts[idx] += 1;
            assert!(!train.contains(&idx), "FALSIFIED KF-002: {idx} leaked into train");
        }
    }

    for (i, &count) in test_counts.iter().enumerate() {
        assert_eq!(
            count, 1,
            "FALSIFIED KF-002: sample {i} appeared in {count} test folds (expected 1)"
        );
    }
}

/// FALSIFY-KF-003: Each fold's positive count is within one of an even share
#[test]
fn falsify_kf_003_folds_are_stratified() {
    let y = imbalanced(60, 15);
    let splits = StratifiedKFold::new(3).split(&y).expect("split");
    for (_, test) in &splits {
        let pos = test.iter().filter(|&&i| y[i] == 1).count();
        assert!(
            pos == 5,
            "FALSIFIED KF-003: fold holds {pos} positives, expected 5"
        );
    }
}

/// FALSIFY-KF-004: Unshuffled folds are deterministic
#[test]
fn falsify_kf_004_unshuffled_deterministic() {
    let y = imbalanced(30, 9);
    let a = StratifiedKFold::new(3).split(&y).expect("split");
    let b = StratifiedKFold::new(3).split(&y).expect("split");
    assert_eq!(a, b, "FALSIFIED KF-004: folds changed between calls");
}

/// FALSIFY-KF-005: Invalid fold counts are rejected
#[test]
fn falsify_kf_005_invalid_n_splits() {
    let y = imbalanced(3, 1);
    assert!(StratifiedKFold::new(1).split(&y).is_err(), "FALSIFIED KF-005: k=1");
    assert!(StratifiedKFold::new(5).split(&y).is_err(), "FALSIFIED KF-005: k>n");
}

/// FALSIFY-KF-006: Stratified split ratio stays within one row of the input
#[test]
fn falsify_kf_006_split_ratio_within_one_row() {
    for &(neg, pos, frac) in &[(80, 20, 0.25), (47, 13, 0.3), (100, 9, 0.1), (12, 12, 0.5)] {
        let y = imbalanced(neg, pos);
        let n = y.len() as f64;
        let split = stratified_split(&y, frac, 42).expect("split");
        let test_pos = split.test.iter().filter(|&&i| y[i] == 1).count() as f64;
        let expected = pos as f64 * split.test.len() as f64 / n;
        assert!(
            (test_pos - expected).abs() < 1.0,
            "FALSIFIED KF-006: test positives {test_pos}, expected about {expected}"
        );
    }
}
