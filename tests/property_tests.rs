//! Property-based tests using proptest.
//!
//! These tests verify invariants of cleaning, the ratio feature,
//! standardization, synthesis and scoring.

use fakemetrics::prelude::*;
use proptest::prelude::*;

// Strategy for a raw views/likes table with optional gaps
fn gappy_dataset_strategy() -> impl Strategy<Value = Dataset> {
    (1usize..40).prop_flat_map(|n| {
        (
            proptest::collection::vec(proptest::option::weighted(0.85, 0u32..2000), n),
            proptest::collection::vec(proptest::option::weighted(0.85, 0u32..2000), n),
        )
            .prop_map(|(views, likes)| {
                Dataset::new(vec![
                    (
                        VIEWS.to_string(),
                        views.into_iter().map(|v| v.map(f64::from)).collect(),
                    ),
                    (
                        LIKES.to_string(),
                        likes.into_iter().map(|l| l.map(f64::from)).collect(),
                    ),
                ])
                .expect("Test data should be valid")
            })
    })
}

// Strategy for complete raw counts with at least two distinct values per column
fn counts_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (3usize..60)
        .prop_flat_map(|n| {
            (
                proptest::collection::vec(0u32..5000, n),
                proptest::collection::vec(0u32..5000, n),
            )
        })
        .prop_filter("columns must not be constant", |(v, l)| {
            v.iter().any(|&x| x != v[0]) && l.iter().any(|&x| x != l[0])
        })
        .prop_map(|(v, l)| {
            (
                v.into_iter().map(f64::from).collect(),
                l.into_iter().map(f64::from).collect(),
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn clean_removes_all_missing(ds in gappy_dataset_strategy()) {
        let cleaned = clean(ds);
        prop_assert!(!cleaned.has_missing());
    }

    #[test]
    fn clean_is_idempotent(ds in gappy_dataset_strategy()) {
        let once = clean(ds);
        let twice = clean(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn ratio_is_always_defined((views, likes) in counts_strategy()) {
        let ds = add_ratio(Dataset::from_counts(&views, &likes).expect("valid")).expect("raw");
        let ratio = ds.values(LIKE_VIEW_RATIO).expect("ratio");
        for ((v, l), r) in views.iter().zip(&likes).zip(&ratio) {
            prop_assert!(r.is_finite());
            if *v == 0.0 {
                prop_assert_eq!(*r, 0.0);
            } else {
                prop_assert_eq!(*r, l / v);
            }
        }
    }

    #[test]
    fn standardize_gives_zero_mean_unit_std((views, likes) in counts_strategy()) {
        let ds = standardize(Dataset::from_counts(&views, &likes).expect("valid")).expect("non-constant");
        for name in [VIEWS, LIKES] {
            let z = ds.values(name).expect("column");
            let n = z.len() as f64;
            let mean = z.iter().sum::<f64>() / n;
            let std = (z.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();
            prop_assert!(mean.abs() < 1e-6, "{} mean {}", name, mean);
            prop_assert!((std - 1.0).abs() < 1e-6, "{} std {}", name, std);
        }
    }

    #[test]
    fn simulate_is_deterministic(seed in any::<u64>(), n in 0usize..300) {
        let config = SyntheticConfig::default().with_seed(seed);
        prop_assert_eq!(
            simulate(&config, n).expect("valid"),
            simulate(&config, n).expect("valid")
        );
    }

    #[test]
    fn flags_are_binary_and_repeatable(seed in 0u64..1000, n in 20usize..150) {
        let ds = preprocess(simulate(&SyntheticConfig::default().with_seed(seed), n).expect("valid"))
            .expect("non-degenerate");
        let a = score(ds.clone(), DetectionMethod::IsolationForest, 0.05, &SilentObserver).expect("score");
        let b = score(ds, DetectionMethod::IsolationForest, 0.05, &SilentObserver).expect("score");
        let flags = a.values(ANOMALY).expect("flags");
        prop_assert!(flags.iter().all(|&f| f == 0.0 || f == 1.0));
        prop_assert_eq!(flags, b.values(ANOMALY).expect("flags"));
    }
}
