// =========================================================================
// FALSIFY-KN: k-nearest neighbours contract
//
// References:
//   - Cover & Hart (1967) "Nearest neighbor pattern classification"
// =========================================================================

use super::*;

/// FALSIFY-KN-001: Probabilities are multiples of 1/k
#[test]
fn falsify_kn_001_probability_lattice() {
    let x = Matrix::from_vec(7, 1, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid");
    let y = vec![0, 1, 0, 1, 1, 0, 1];
    let mut knn = KNearestNeighbors::new(5);
    knn.fit(&x, &y).expect("fit");

    for p in knn.predict_proba(&x).expect("proba") {
        let scaled = p * 5.0;
        assert!(
            (scaled - scaled.round()).abs() < 1e-5,
            "FALSIFIED KN-001: probability {p} not a multiple of 1/5"
        );
    }
}

/// FALSIFY-KN-002: k = 1 reproduces training labels
#[test]
fn falsify_kn_002_one_nn_memorizes() {
    let x = Matrix::from_vec(4, 2, vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0]).expect("valid");
    let y = vec![1, 0, 1, 0];
    let mut knn = KNearestNeighbors::new(1);
    knn.fit(&x, &y).expect("fit");
    assert_eq!(knn.predict(&x).expect("predict"), y, "FALSIFIED KN-002");
}

/// FALSIFY-KN-003: k = n predicts the majority everywhere
#[test]
fn falsify_kn_003_k_equals_n() {
    let x = Matrix::from_vec(5, 1, vec![0.0, 1.0, 2.0, 3.0, 4.0]).expect("valid");
    let y = vec![1, 1, 1, 0, 0];
    let mut knn = KNearestNeighbors::new(5);
    knn.fit(&x, &y).expect("fit");
    let proba = knn.predict_proba(&x).expect("proba");
    assert!(
        proba.iter().all(|&p| (p - 0.6).abs() < 1e-6),
        "FALSIFIED KN-003: {proba:?}"
    );
}
