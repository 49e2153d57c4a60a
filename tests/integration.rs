//! Integration tests for the fakemetrics library.
//!
//! These tests verify end-to-end workflows combining multiple components.

use fakemetrics::data::csv::{read_csv, write_csv};
use fakemetrics::error::MetricsError;
use fakemetrics::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_synthesize_score_workflow() {
    // 100 synthetic rows, 5 injected, scored at 5% contamination
    let raw = simulate(&SyntheticConfig::default(), 100).expect("valid config");
    let ds = preprocess(raw).expect("non-degenerate");

    let scored = score(ds, DetectionMethod::IsolationForest, 0.05, &SilentObserver)
        .expect("scoring succeeds");
    let flagged = scored.count_flagged(ANOMALY).expect("flag column");
    assert!((3..=8).contains(&flagged), "flagged = {flagged}");
}

#[test]
fn test_flagged_fraction_tracks_contamination() {
    let raw = simulate(&SyntheticConfig::default(), 1000).expect("valid config");
    let ds = preprocess(raw).expect("non-degenerate");

    for contamination in [0.02, 0.05, 0.1] {
        let scored = score(
            ds.clone(),
            DetectionMethod::IsolationForest,
            contamination,
            &SilentObserver,
        )
        .expect("scoring succeeds");
        let fraction = scored.count_flagged(ANOMALY).expect("flags") as f64 / 1000.0;
        assert!(
            (fraction - contamination).abs() <= 0.03,
            "contamination {contamination}: flagged fraction {fraction}"
        );
    }
}

#[test]
fn test_pipeline_persist_then_cache() {
    let dir = TempDir::new().expect("tempdir");
    let config = PipelineConfig::default()
        .with_raw_path(dir.path().join("raw").join("dataset.csv"))
        .with_clean_path(dir.path().join("processed").join("clean.csv"))
        .with_sample_count(250)
        .with_persist(true);

    let first = run(&config, &SilentObserver).expect("first run");
    assert!(config.raw_path.exists());
    assert!(config.clean_path.exists());

    // The raw file is no longer needed once the clean cache exists.
    fs::remove_file(&config.raw_path).expect("remove raw");
    let second = run(&config, &SilentObserver).expect("cached run");
    assert!(!config.raw_path.exists());
    assert_eq!(first.dataset, second.dataset);
    assert_eq!(first.summary, second.summary);
}

#[test]
fn test_clean_file_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("clean.csv");

    let ds = add_ratio(clean(
        simulate(&SyntheticConfig::default().with_seed(3), 64).expect("valid config"),
    ))
    .expect("raw dataset");
    write_csv(&ds, &path).expect("write");

    let text = fs::read_to_string(&path).expect("read");
    assert!(text.starts_with("views,likes,like_view_ratio\n"));
    assert_eq!(read_csv(&path).expect("reload"), ds);
}

#[test]
fn test_both_methods_side_by_side() {
    let ds = preprocess(simulate(&SyntheticConfig::default(), 300).expect("valid config"))
        .expect("non-degenerate");
    let ds = score(ds, DetectionMethod::IsolationForest, 0.05, &SilentObserver).expect("iforest");
    let ds = AnomalyScorer::new(DetectionMethod::LocalOutlierFactor)
        .with_n_neighbors(20)
        .score(ds, &SilentObserver)
        .expect("lof");

    for column in [ANOMALY, ANOMALY_LOF] {
        let flags = ds.values(column).expect("flags");
        assert_eq!(flags.len(), 300);
        assert!(flags.iter().all(|&f| f == 0.0 || f == 1.0));
    }
}

#[test]
fn test_summary_matches_describe() {
    let dir = TempDir::new().expect("tempdir");
    let raw_path = dir.path().join("raw.csv");
    let raw = simulate(&SyntheticConfig::default(), 120).expect("valid config");
    write_csv(&raw, &raw_path).expect("write");

    let out = run(
        &PipelineConfig::default()
            .with_raw_path(&raw_path)
            .with_clean_path(dir.path().join("clean.csv")),
        &SilentObserver,
    )
    .expect("run");

    let views = raw.column_summary(VIEWS).expect("views stats");
    assert!((out.summary.total_views - views.mean * views.count as f64).abs() < 1e-6);
    let expected_ratio = out.summary.total_likes / out.summary.total_views;
    assert_eq!(out.summary.like_view_ratio, expected_ratio);

    let json = serde_json::to_value(out.summary).expect("serialize");
    assert_eq!(json["anomaly_count"], out.summary.anomaly_count);
}

#[test]
fn test_malformed_file_is_an_error_not_a_panic() {
    let dir = TempDir::new().expect("tempdir");
    let raw_path = dir.path().join("raw.csv");
    fs::write(&raw_path, "views,likes\n1,2,3\n").expect("write");

    let result = run(
        &PipelineConfig::default()
            .with_raw_path(&raw_path)
            .with_clean_path(dir.path().join("clean.csv")),
        &SilentObserver,
    );
    assert!(matches!(result, Err(MetricsError::Load { .. })));
}

#[test]
fn test_scaler_matches_standardize() {
    let raw = Dataset::from_counts(&[10.0, 40.0, 25.0, 70.0], &[1.0, 8.0, 5.0, 30.0]).expect("valid");
    let x = raw.to_matrix(&[VIEWS, LIKES]).expect("complete");

    let mut scaler = StandardScaler::new();
    let scaled = scaler.fit_transform(&x).expect("fit");
    let ds = standardize(raw).expect("non-constant");

    assert_eq!(ds.values(VIEWS).expect("views"), scaled.column(0));
    assert_eq!(ds.values(LIKES).expect("likes"), scaled.column(1));
}
