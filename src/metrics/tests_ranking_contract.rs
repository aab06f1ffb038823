// =========================================================================
// FALSIFY-RA: ROC AUC contract
//
// References:
//   - Hanley & McNeil (1982) "The meaning and use of the area under a ROC curve"
//   - Fawcett (2006) "An introduction to ROC analysis"
// =========================================================================

use super::ranking::*;

/// FALSIFY-RA-001: AUC equals the pairwise concordance probability
#[test]
fn falsify_ra_001_matches_mann_whitney() {
    let y = [0, 1, 0, 1, 1, 0, 0, 1, 0];
    let s = [0.1, 0.8, 0.4, 0.35, 0.9, 0.35, 0.2, 0.6, 0.7];

    let mut concordant = 0.0_f32;
    let mut pairs = 0.0_f32;
    for i in 0..y.len() {
        for j in 0..y.len() {
            if y[i] == 1 && y[j] == 0 {
                pairs += 1.0;
                if s[i] > s[j] {
                    concordant += 1.0;
                } else if s[i] == s[j] {
                    concordant += 0.5;
                }
            }
        }
    }

    let auc = roc_auc(&y, &s).expect("both classes present");
    assert!(
        (auc - concordant / pairs).abs() < 1e-6,
        "FALSIFIED RA-001: auc={auc}, concordance={}",
        concordant / pairs
    );
}

/// FALSIFY-RA-002: AUC is invariant to strictly increasing score transforms
#[test]
fn falsify_ra_002_rank_invariance() {
    let y = [0, 0, 1, 1, 0, 1];
    let s = [0.2_f32, 0.5, 0.4, 0.9, 0.1, 0.7];
    let t: Vec<f32> = s.iter().map(|v| v.powi(3) * 10.0 - 4.0).collect();
    let a = roc_auc(&y, &s).expect("auc");
    let b = roc_auc(&y, &t).expect("auc");
    assert!((a - b).abs() < 1e-6, "FALSIFIED RA-002: {a} != {b}");
}

/// FALSIFY-RA-003: Single-class input has no AUC and scores 0
#[test]
fn falsify_ra_003_single_class_is_zero() {
    let y = [0, 0, 0];
    let s = [0.1, 0.9, 0.5];
    assert!(roc_auc(&y, &s).is_none(), "FALSIFIED RA-003: defined for one class");
    assert_eq!(roc_auc_or_zero(&y, &s), 0.0, "FALSIFIED RA-003: not exactly 0");
}

/// FALSIFY-RA-004: Reversed scores give 1 - AUC
#[test]
fn falsify_ra_004_complement() {
    let y = [1, 0, 1, 0, 0, 1, 1];
    let s = [0.3_f32, 0.1, 0.8, 0.5, 0.45, 0.2, 0.9];
    let neg: Vec<f32> = s.iter().map(|v| -v).collect();
    let a = roc_auc(&y, &s).expect("auc");
    let b = roc_auc(&y, &neg).expect("auc");
    assert!((a + b - 1.0).abs() < 1e-6, "FALSIFIED RA-004: {a} + {b} != 1");
}
