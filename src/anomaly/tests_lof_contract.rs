// =========================================================================
// FALSIFY-LF: Local Outlier Factor contract
//
// Each test names a property that must hold for any valid input; a failing
// assertion reads "FALSIFIED LF-xxx".
//
// References:
//   - Breunig et al. (2000) "LOF: Identifying Density-Based Local Outliers"
// =========================================================================

use super::*;
use crate::primitives::Matrix;

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

/// A 10x10 grid plus one distant point.
fn grid_with_outlier() -> Matrix<f64> {
    let mut data = Vec::with_capacity(202);
    for i in 0..10 {
        for j in 0..10 {
            data.push(f64::from(i));
            data.push(f64::from(j));
        }
    }
    data.push(30.0);
    data.push(30.0);
    Matrix::from_vec(101, 2, data).expect("valid matrix")
}

/// FALSIFY-LF-001: Outlier factors are positive
#[test]
fn falsify_lf_001_factors_positive() {
    let mut lof = LocalOutlierFactor::new()
        .with_n_neighbors(3)
        .with_contamination(0.1);
    lof.fit(&tight_cluster()).expect("fit succeeds");

    let factors = lof.outlier_factor().expect("fitted");
    for (i, &f) in factors.iter().enumerate() {
        assert!(f > 0.0, "FALSIFIED LF-001: lof[{i}]={f}, expected > 0.0");
    }
}

/// FALSIFY-LF-002: Predictions are either 1 (normal) or -1 (anomaly)
#[test]
fn falsify_lf_002_predictions_binary() {
    let mut lof = LocalOutlierFactor::new()
        .with_n_neighbors(3)
        .with_contamination(0.1);
    let preds = lof.fit_predict(&tight_cluster()).expect("fit succeeds");
    assert_eq!(preds.len(), 8, "FALSIFIED LF-002: one label per row");
    for (i, &p) in preds.iter().enumerate() {
        assert!(
            p == 1 || p == -1,
            "FALSIFIED LF-002: prediction[{i}]={p}, expected 1 or -1"
        );
    }
}

/// FALSIFY-LF-003: The isolated point has the largest factor and is flagged
#[test]
fn falsify_lf_003_isolated_point_flagged() {
    let data = grid_with_outlier();
    let mut lof = LocalOutlierFactor::new().with_contamination(0.01);
    let labels = lof.fit_predict(&data).expect("fit succeeds");

    let factors = lof.outlier_factor().expect("fitted");
    let max_idx = factors
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i);
    assert_eq!(max_idx, Some(100), "FALSIFIED LF-003: argmax lof != outlier");
    assert_eq!(labels[100], -1, "FALSIFIED LF-003: outlier not flagged");
}

/// FALSIFY-LF-004: Fitting is deterministic
#[test]
fn falsify_lf_004_deterministic() {
    let data = grid_with_outlier();
    let run = || {
        let mut lof = LocalOutlierFactor::new().with_contamination(0.05);
        lof.fit_predict(&data).expect("fit succeeds")
    };
    assert_eq!(run(), run(), "FALSIFIED LF-004: labels differ between fits");
}

/// FALSIFY-LF-005: Flag count stays within the contamination share
#[test]
fn falsify_lf_005_flag_count_bounded() {
    let data = grid_with_outlier();
    let mut lof = LocalOutlierFactor::new().with_contamination(0.05);
    let labels = lof.fit_predict(&data).expect("fit succeeds");
    let flagged = labels.iter().filter(|&&l| l == -1).count();
    assert!(
        (1..=6).contains(&flagged),
        "FALSIFIED LF-005: flagged={flagged}, expected 1..=6"
    );
}
