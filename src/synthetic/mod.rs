//! Synthetic views/likes data with injected anomalies.
//!
//! Views are drawn uniformly from an integer range and likes as a uniform
//! fraction of views. A fixed share of rows, chosen without replacement, is
//! then rewritten so that likes exceed views by a small positive offset.
//! Generation is fully determined by [`SyntheticConfig::seed`].
//!
//! # Quick Start
//!
//! ```
//! use fakemetrics::synthetic::{simulate, SyntheticConfig};
//!
//! let config = SyntheticConfig::default().with_seed(7);
//! let ds = simulate(&config, 100).expect("valid config");
//! assert_eq!(ds.n_rows(), 100);
//! assert_eq!(config.injected_count(100), 5);
//! ```

use crate::data::{Dataset, LIKES, VIEWS};
use crate::error::{MetricsError, Result};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Parameters of the synthetic generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// RNG seed.
    pub seed: u64,
    /// Smallest view count (inclusive).
    pub views_min: u32,
    /// Largest view count (exclusive).
    pub views_max: u32,
    /// Lower bound of likes as a fraction of views.
    pub like_fraction_min: f64,
    /// Upper bound of likes as a fraction of views (exclusive).
    pub like_fraction_max: f64,
    /// Share of rows rewritten so that likes exceed views.
    pub anomaly_fraction: f64,
    /// Injected rows get likes = views + offset, offset in `1..anomaly_offset_max`.
    pub anomaly_offset_max: u32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            views_min: 50,
            views_max: 1000,
            like_fraction_min: 0.1,
            like_fraction_max: 0.9,
            anomaly_fraction: 0.05,
            anomaly_offset_max: 50,
        }
    }
}

impl SyntheticConfig {
    /// Sets the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the view count range `[min, max)`.
    #[must_use]
    pub fn with_views_range(mut self, min: u32, max: u32) -> Self {
        self.views_min = min;
        self.views_max = max;
        self
    }

    /// Sets the likes-per-view fraction range `[min, max)`.
    #[must_use]
    pub fn with_like_fraction(mut self, min: f64, max: f64) -> Self {
        self.like_fraction_min = min;
        self.like_fraction_max = max;
        self
    }

    /// Sets the share of injected anomalies.
    #[must_use]
    pub fn with_anomaly_fraction(mut self, fraction: f64) -> Self {
        self.anomaly_fraction = fraction;
        self
    }

    /// Number of rows rewritten for `n_samples` rows.
    #[must_use]
    pub fn injected_count(&self, n_samples: usize) -> usize {
        ((self.anomaly_fraction * n_samples as f64).floor() as usize).min(n_samples)
    }

    /// Checks that every range is non-empty and every fraction is in bounds.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::InvalidHyperparameter`] for the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.views_min >= self.views_max {
            return Err(MetricsError::invalid_hyperparameter(
                "views_min",
                self.views_min,
                "< views_max",
            ));
        }
        let fractions_ok = (0.0..=1.0).contains(&self.like_fraction_min)
            && self.like_fraction_min < self.like_fraction_max
            && self.like_fraction_max <= 1.0;
        if !fractions_ok {
            return Err(MetricsError::invalid_hyperparameter(
                "like_fraction",
                format!("[{}, {})", self.like_fraction_min, self.like_fraction_max),
                "0 <= min < max <= 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.anomaly_fraction) {
            return Err(MetricsError::invalid_hyperparameter(
                "anomaly_fraction",
                self.anomaly_fraction,
                "in [0, 1]",
            ));
        }
        if self.anomaly_offset_max < 2 {
            return Err(MetricsError::invalid_hyperparameter(
                "anomaly_offset_max",
                self.anomaly_offset_max,
                ">= 2",
            ));
        }
        Ok(())
    }
}

/// Generates `n_samples` raw `views,likes` rows.
///
/// Identical configs and sample counts always produce identical datasets.
///
/// # Errors
///
/// Returns an error if the config is invalid.
pub fn simulate(config: &SyntheticConfig, n_samples: usize) -> Result<Dataset> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);

    let views: Vec<u32> = (0..n_samples)
        .map(|_| rng.gen_range(config.views_min..config.views_max))
        .collect();
    let mut likes: Vec<f64> = views
        .iter()
        .map(|&v| f64::from(v) * rng.gen_range(config.like_fraction_min..config.like_fraction_max))
        .collect();

    let injected = config.injected_count(n_samples);
    for idx in index::sample(&mut rng, n_samples, injected) {
        let offset = rng.gen_range(1..config.anomaly_offset_max);
        likes[idx] = f64::from(views[idx]) + f64::from(offset);
    }

    let views: Vec<f64> = views.into_iter().map(f64::from).collect();
    let likes: Vec<f64> = likes.into_iter().map(f64::trunc).collect();
    Dataset::new(vec![
        (VIEWS.to_string(), views.into_iter().map(Some).collect()),
        (LIKES.to_string(), likes.into_iter().map(Some).collect()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_is_deterministic() {
        let config = SyntheticConfig::default();
        let a = simulate(&config, 200).expect("valid");
        let b = simulate(&config, 200).expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = simulate(&SyntheticConfig::default().with_seed(1), 50).expect("valid");
        let b = simulate(&SyntheticConfig::default().with_seed(2), 50).expect("valid");
        assert_ne!(a, b);
    }

    #[test]
    fn test_views_within_range_and_integral() {
        let ds = simulate(&SyntheticConfig::default(), 500).expect("valid");
        for v in ds.values(VIEWS).expect("views") {
            assert!((50.0..1000.0).contains(&v));
            assert_eq!(v.fract(), 0.0);
        }
        for l in ds.values(LIKES).expect("likes") {
            assert_eq!(l.fract(), 0.0);
            assert!(l >= 0.0);
        }
    }

    #[test]
    fn test_injected_rows_exceed_views() {
        let config = SyntheticConfig::default();
        let ds = simulate(&config, 1000).expect("valid");
        let views = ds.values(VIEWS).expect("views");
        let likes = ds.values(LIKES).expect("likes");
        let exceeding = views.iter().zip(&likes).filter(|(v, l)| l > v).count();
        // Regular rows have likes < 0.9 * views, so only injected rows exceed.
        assert_eq!(exceeding, config.injected_count(1000));
        assert_eq!(exceeding, 50);
    }

    #[test]
    fn test_injected_offset_is_small() {
        let ds = simulate(&SyntheticConfig::default(), 400).expect("valid");
        let views = ds.values(VIEWS).expect("views");
        let likes = ds.values(LIKES).expect("likes");
        for (v, l) in views.iter().zip(&likes) {
            if l > v {
                assert!(l - v >= 1.0 && l - v < 50.0);
            }
        }
    }

    #[test]
    fn test_zero_samples() {
        let ds = simulate(&SyntheticConfig::default(), 0).expect("valid");
        assert!(ds.is_empty());
        assert_eq!(ds.column_names(), vec![VIEWS, LIKES]);
    }

    #[test]
    fn test_no_injection_when_fraction_zero() {
        let config = SyntheticConfig::default().with_anomaly_fraction(0.0);
        let ds = simulate(&config, 300).expect("valid");
        let views = ds.values(VIEWS).expect("views");
        let likes = ds.values(LIKES).expect("likes");
        assert!(views.iter().zip(&likes).all(|(v, l)| l < v));
    }

    #[test]
    fn test_injection_near_u32_max_does_not_overflow() {
        let config = SyntheticConfig::default()
            .with_views_range(u32::MAX - 2, u32::MAX)
            .with_anomaly_fraction(1.0);
        assert!(config.validate().is_ok());
        let ds = simulate(&config, 20).expect("valid");
        let views = ds.values(VIEWS).expect("views");
        let likes = ds.values(LIKES).expect("likes");
        assert!(views.iter().zip(&likes).all(|(v, l)| l > v));
        assert!(likes.iter().all(|&l| l > f64::from(u32::MAX - 2)));
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        assert!(SyntheticConfig::default()
            .with_views_range(10, 10)
            .validate()
            .is_err());
        assert!(SyntheticConfig::default()
            .with_like_fraction(0.9, 0.1)
            .validate()
            .is_err());
        assert!(SyntheticConfig::default()
            .with_anomaly_fraction(1.5)
            .validate()
            .is_err());
        assert!(SyntheticConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_from_partial_toml() {
        let config: SyntheticConfig = toml::from_str("seed = 9\nviews_max = 500").expect("parse");
        assert_eq!(config.seed, 9);
        assert_eq!(config.views_max, 500);
        assert_eq!(config.views_min, 50);
    }
}
