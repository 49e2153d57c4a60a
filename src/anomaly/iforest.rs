//! Isolation Forest.
//!
//! Anomalies are few and different, so random axis-aligned splits isolate
//! them in fewer steps than regular points. The anomaly score of a sample
//! is derived from its average path length over an ensemble of randomly
//! built trees.
//!
//! # References
//!
//! - Liu, Ting, Zhou (2008) "Isolation Forest"

use crate::error::{MetricsError, Result};
use crate::primitives::Matrix;
use crate::stats::percentile;
use crate::traits::{OutlierDetector, UnsupervisedEstimator};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

/// Euler–Mascheroni constant, for the harmonic number approximation.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Default subsample size per tree.
const DEFAULT_MAX_SAMPLES: usize = 256;

/// Isolation Forest anomaly detector.
///
/// Scores follow the negated convention: `score_samples` returns values in
/// `[-1, 0]`, lower is more anomalous. `predict` returns `-1` for outliers
/// and `1` for inliers, thresholded at the `contamination` percentile of
/// the training scores.
///
/// # Examples
///
/// ```
/// use fakemetrics::prelude::*;
///
/// let data = Matrix::from_vec(10, 2, vec![
///     2.0, 2.0, 2.1, 2.0, 1.9, 2.1, 2.0, 1.9, 2.1, 2.1,
///     1.8, 2.0, 2.2, 2.0, 2.0, 2.2, 10.0, 10.0, -10.0, -10.0,
/// ]).unwrap();
///
/// let mut iforest = IsolationForest::new()
///     .with_n_estimators(100)
///     .with_contamination(0.2)
///     .with_random_state(42);
/// iforest.fit(&data).unwrap();
///
/// let labels = iforest.predict(&data);
/// assert_eq!(labels[8], -1);
/// assert_eq!(labels[9], -1);
/// ```
#[derive(Debug, Clone)]
pub struct IsolationForest {
    /// Number of trees.
    n_estimators: usize,
    /// Subsample size per tree (clamped to the number of samples).
    max_samples: Option<usize>,
    /// Expected proportion of outliers.
    contamination: f64,
    /// Random seed; tree `i` uses `seed + i`.
    random_state: Option<u64>,
    /// Fitted trees.
    trees: Vec<IsolationTree>,
    /// Subsample size actually used.
    sample_size: usize,
    /// Decision threshold on `score_samples`.
    offset: Option<f64>,
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::new()
    }
}

impl IsolationForest {
    /// Creates an Isolation Forest with 100 trees and 10% contamination.
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_estimators: 100,
            max_samples: None,
            contamination: 0.1,
            random_state: None,
            trees: Vec::new(),
            sample_size: 0,
            offset: None,
        }
    }

    /// Sets the number of trees.
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Sets the subsample size per tree.
    #[must_use]
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = Some(max_samples);
        self
    }

    /// Sets the expected proportion of outliers.
    #[must_use]
    pub fn with_contamination(mut self, contamination: f64) -> Self {
        self.contamination = contamination;
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.offset.is_some()
    }

    /// Returns the fitted decision threshold.
    #[must_use]
    pub fn offset(&self) -> Option<f64> {
        self.offset
    }

    /// Anomaly score of each row in `[-1, 0]`; lower is more anomalous.
    ///
    /// # Panics
    ///
    /// Panics if the model is not fitted.
    #[must_use]
    pub fn score_samples(&self, x: &Matrix<f64>) -> Vec<f64> {
        assert!(
            !self.trees.is_empty(),
            "Model not fitted. Call fit() first."
        );

        let norm = average_path_length(self.sample_size);
        (0..x.n_rows())
            .map(|i| {
                let point = x.row(i);
                let mean_depth = self
                    .trees
                    .iter()
                    .map(|tree| tree.path_length(point))
                    .sum::<f64>()
                    / self.trees.len() as f64;
                if norm > 0.0 {
                    -(2.0_f64).powf(-mean_depth / norm)
                } else {
                    -1.0
                }
            })
            .collect()
    }

    /// Score minus the threshold; negative values are outliers.
    ///
    /// # Panics
    ///
    /// Panics if the model is not fitted.
    #[must_use]
    pub fn decision_function(&self, x: &Matrix<f64>) -> Vec<f64> {
        let offset = self.offset.expect("Model not fitted. Call fit() first.");
        self.score_samples(x)
            .into_iter()
            .map(|s| s - offset)
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(MetricsError::invalid_hyperparameter(
                "n_estimators",
                self.n_estimators,
                ">= 1",
            ));
        }
        if self.max_samples == Some(0) {
            return Err(MetricsError::invalid_hyperparameter(
                "max_samples",
                0,
                ">= 1",
            ));
        }
        if !(0.0..=0.5).contains(&self.contamination) {
            return Err(MetricsError::invalid_hyperparameter(
                "contamination",
                self.contamination,
                "in [0, 0.5]",
            ));
        }
        Ok(())
    }
}

impl UnsupervisedEstimator for IsolationForest {
    type Labels = Vec<i32>;

    /// Builds the trees and calibrates the threshold on `x`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid hyperparameters, empty data or
    /// non-finite values.
    fn fit(&mut self, x: &Matrix<f64>) -> Result<()> {
        self.validate()?;
        let n_samples = x.n_rows();
        if n_samples == 0 {
            return Err(MetricsError::empty_input("Cannot fit with zero samples"));
        }
        if !x.is_finite() {
            return Err(MetricsError::DegenerateInput(
                "isolation forest input contains non-finite values".to_string(),
            ));
        }

        self.sample_size = self
            .max_samples
            .unwrap_or(DEFAULT_MAX_SAMPLES)
            .min(n_samples);
        let height_limit = (self.sample_size as f64).log2().ceil().max(0.0) as usize;

        self.trees = (0..self.n_estimators)
            .map(|i| {
                let mut rng = match self.random_state {
                    Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(i as u64)),
                    None => StdRng::from_entropy(),
                };
                let sample = index::sample(&mut rng, n_samples, self.sample_size).into_vec();
                IsolationTree::build(x, sample, height_limit, &mut rng)
            })
            .collect();

        let scores = self.score_samples(x);
        self.offset = Some(percentile(&scores, 100.0 * self.contamination)?);
        Ok(())
    }

    /// Labels rows `-1` (outlier) or `1` (inlier).
    fn predict(&self, x: &Matrix<f64>) -> Vec<i32> {
        self.decision_function(x)
            .into_iter()
            .map(|d| if d < 0.0 { -1 } else { 1 })
            .collect()
    }
}

impl OutlierDetector for IsolationForest {
    fn fit_predict(&mut self, x: &Matrix<f64>) -> Result<Vec<i32>> {
        self.fit(x)?;
        Ok(self.predict(x))
    }
}

#[derive(Debug, Clone)]
enum Node {
    Internal {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    External {
        size: usize,
    },
}

/// One isolation tree, stored as a flat arena of nodes (root at 0).
#[derive(Debug, Clone)]
struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    fn build(x: &Matrix<f64>, sample: Vec<usize>, height_limit: usize, rng: &mut StdRng) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow(x, sample, 0, height_limit, rng);
        tree
    }

    /// Appends the subtree for `rows` and returns its node index.
    fn grow(
        &mut self,
        x: &Matrix<f64>,
        rows: Vec<usize>,
        depth: usize,
        height_limit: usize,
        rng: &mut StdRng,
    ) -> usize {
        let id = self.nodes.len();
        if depth >= height_limit || rows.len() <= 1 {
            self.nodes.push(Node::External { size: rows.len() });
            return id;
        }

        // Only features that can still separate these rows.
        let candidates: Vec<(usize, f64, f64)> = (0..x.n_cols())
            .filter_map(|j| {
                let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                    let v = x.get(r, j);
                    (lo.min(v), hi.max(v))
                });
                (lo < hi).then_some((j, lo, hi))
            })
            .collect();
        if candidates.is_empty() {
            self.nodes.push(Node::External { size: rows.len() });
            return id;
        }

        let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
        let threshold = rng.gen_range(lo..hi);
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
            rows.into_iter().partition(|&r| x.get(r, feature) <= threshold);

        // Placeholder, patched once both children exist.
        self.nodes.push(Node::External { size: 0 });
        let left = self.grow(x, left_rows, depth + 1, height_limit, rng);
        let right = self.grow(x, right_rows, depth + 1, height_limit, rng);
        self.nodes[id] = Node::Internal {
            feature,
            threshold,
            left,
            right,
        };
        id
    }

    fn path_length(&self, point: &[f64]) -> f64 {
        let mut idx = 0;
        let mut depth = 0.0;
        loop {
            match self.nodes[idx] {
                Node::Internal {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if point[feature] <= threshold { left } else { right };
                    depth += 1.0;
                }
                Node::External { size } => return depth + average_path_length(size),
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points, c(n).
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[cfg(test)]
#[path = "tests_iforest_contract.rs"]
mod tests_iforest_contract;
