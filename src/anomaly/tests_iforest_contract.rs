// =========================================================================
// FALSIFY-IF: Isolation Forest contract
//
// Each test names a property that must hold for any valid input; a failing
// assertion reads "FALSIFIED IF-xxx".
//
// References:
//   - Liu, Ting, Zhou (2008) "Isolation Forest"
// =========================================================================

use super::*;
use crate::primitives::Matrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn tight_cluster() -> Matrix<f64> {
    Matrix::from_vec(
        8,
        2,
        vec![
            1.0, 1.0, 1.1, 1.0, 1.0, 1.1, 0.9, 0.9, 1.1, 1.1, 1.0, 0.9, 0.9, 1.1, 1.0, 1.0,
        ],
    )
    .expect("valid matrix")
}

/// 95 clustered rows followed by 5 far away rows in different directions.
fn hundred_with_five_outliers() -> Matrix<f64> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut data = Vec::with_capacity(200);
    for _ in 0..95 {
        data.push(rng.gen_range(-1.0..1.0));
        data.push(rng.gen_range(-1.0..1.0));
    }
    for (x, y) in [(8.0, 8.0), (-8.0, 8.0), (8.0, -8.0), (-8.0, -8.0), (10.0, 0.0)] {
        data.push(x);
        data.push(y);
    }
    Matrix::from_vec(100, 2, data).expect("valid matrix")
}

/// FALSIFY-IF-001: Anomaly scores are in [-1, 0] (negated convention)
#[test]
fn falsify_if_001_scores_bounded() {
    let data = tight_cluster();
    let mut iforest = IsolationForest::new()
        .with_n_estimators(50)
        .with_random_state(42);
    iforest.fit(&data).expect("fit succeeds");

    let scores = iforest.score_samples(&data);
    for (i, &score) in scores.iter().enumerate() {
        assert!(
            (-1.0..=0.0).contains(&score),
            "FALSIFIED IF-001: score[{i}]={score}, expected in [-1,0]"
        );
    }
}

/// FALSIFY-IF-002: Predictions are either 1 (normal) or -1 (anomaly)
#[test]
fn falsify_if_002_predictions_binary() {
    let data = tight_cluster();
    let mut iforest = IsolationForest::new()
        .with_n_estimators(50)
        .with_random_state(42)
        .with_contamination(0.1);
    iforest.fit(&data).expect("fit succeeds");

    let preds = iforest.predict(&data);
    assert_eq!(preds.len(), 8, "FALSIFIED IF-002: one label per row");
    for (i, &p) in preds.iter().enumerate() {
        assert!(
            p == 1 || p == -1,
            "FALSIFIED IF-002: prediction[{i}]={p}, expected 1 or -1"
        );
    }
}

/// FALSIFY-IF-003: A fixed seed gives identical scores across fits
#[test]
fn falsify_if_003_seed_determinism() {
    let data = hundred_with_five_outliers();
    let fit = || {
        let mut iforest = IsolationForest::new().with_random_state(42);
        iforest.fit(&data).expect("fit succeeds");
        iforest.score_samples(&data)
    };
    assert_eq!(fit(), fit(), "FALSIFIED IF-003: same seed, different scores");
}

/// FALSIFY-IF-004: Flag count tracks contamination on 100 rows at 5%
#[test]
fn falsify_if_004_flag_count_near_contamination() {
    let data = hundred_with_five_outliers();
    let mut iforest = IsolationForest::new()
        .with_contamination(0.05)
        .with_random_state(42);
    let labels = iforest.fit_predict(&data).expect("fit succeeds");
    let flagged = labels.iter().filter(|&&l| l == -1).count();
    assert!(
        (3..=8).contains(&flagged),
        "FALSIFIED IF-004: flagged={flagged}, expected 3..=8"
    );
}

/// FALSIFY-IF-005: Far points score lower than cluster points
#[test]
fn falsify_if_005_outliers_score_lower() {
    let data = hundred_with_five_outliers();
    let mut iforest = IsolationForest::new().with_random_state(42);
    iforest.fit(&data).expect("fit succeeds");
    let scores = iforest.score_samples(&data);

    let worst_inlier = scores[..95].iter().copied().fold(f64::INFINITY, f64::min);
    let best_outlier = scores[95..].iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!(
        best_outlier < worst_inlier,
        "FALSIFIED IF-005: outlier score {best_outlier} >= inlier score {worst_inlier}"
    );
}

/// FALSIFY-IF-006: decision_function is score_samples shifted by offset
#[test]
fn falsify_if_006_decision_is_shifted_score() {
    let data = tight_cluster();
    let mut iforest = IsolationForest::new()
        .with_n_estimators(20)
        .with_random_state(3);
    iforest.fit(&data).expect("fit succeeds");

    let offset = iforest.offset().expect("fitted");
    let scores = iforest.score_samples(&data);
    let decision = iforest.decision_function(&data);
    for (i, (s, d)) in scores.iter().zip(&decision).enumerate() {
        assert!(
            (s - offset - d).abs() < 1e-12,
            "FALSIFIED IF-006: row {i} decision {d} != score {s} - offset {offset}"
        );
    }
}
