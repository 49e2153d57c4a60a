//! Local Outlier Factor.
//!
//! Compares the local reachability density of each point with that of its
//! k nearest neighbours. Points sitting in sparser regions than their
//! neighbours get a factor well above 1.
//!
//! Only the training set is scored: there is no `predict` for unseen rows.
//!
//! # References
//!
//! - Breunig et al. (2000) "LOF: Identifying Density-Based Local Outliers"

use crate::error::{MetricsError, Result};
use crate::primitives::Matrix;
use crate::stats::percentile;
use crate::traits::OutlierDetector;

/// Guards the reachability density against exact duplicates.
const DENSITY_EPS: f64 = 1e-10;

/// Local Outlier Factor detector (outlier detection on the fitted set).
///
/// After [`fit`](Self::fit), [`negative_outlier_factor`](Self::negative_outlier_factor)
/// holds `-LOF` for every training row; rows below the `contamination`
/// percentile of those values are labelled `-1`.
///
/// # Examples
///
/// ```
/// use fakemetrics::anomaly::LocalOutlierFactor;
/// use fakemetrics::prelude::*;
///
/// let data = Matrix::from_vec(6, 2, vec![
///     0.0, 0.0, 0.1, 0.0, 0.0, 0.1, 0.1, 0.1, 0.05, 0.05, 5.0, 5.0,
/// ]).unwrap();
///
/// let mut lof = LocalOutlierFactor::new()
///     .with_n_neighbors(3)
///     .with_contamination(0.15);
/// let labels = lof.fit_predict(&data).unwrap();
/// assert_eq!(labels[5], -1);
/// ```
#[derive(Debug, Clone)]
pub struct LocalOutlierFactor {
    n_neighbors: usize,
    contamination: f64,
    /// `-LOF` per training row.
    negative_outlier_factor: Option<Vec<f64>>,
    offset: Option<f64>,
}

impl Default for LocalOutlierFactor {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalOutlierFactor {
    /// Creates a detector with 20 neighbours and 10% contamination.
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_neighbors: 20,
            contamination: 0.1,
            negative_outlier_factor: None,
            offset: None,
        }
    }

    /// Sets the neighbourhood size (clamped to `n - 1` at fit time).
    #[must_use]
    pub fn with_n_neighbors(mut self, n_neighbors: usize) -> Self {
        self.n_neighbors = n_neighbors;
        self
    }

    /// Sets the expected proportion of outliers.
    #[must_use]
    pub fn with_contamination(mut self, contamination: f64) -> Self {
        self.contamination = contamination;
        self
    }

    /// Returns true once `fit` has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.offset.is_some()
    }

    /// `-LOF` of each training row; lower is more anomalous.
    #[must_use]
    pub fn negative_outlier_factor(&self) -> Option<&[f64]> {
        self.negative_outlier_factor.as_deref()
    }

    /// LOF of each training row (positive, about 1 for inliers).
    #[must_use]
    pub fn outlier_factor(&self) -> Option<Vec<f64>> {
        self.negative_outlier_factor
            .as_ref()
            .map(|nof| nof.iter().map(|v| -v).collect())
    }

    /// Decision threshold on `negative_outlier_factor`, set by `fit`.
    #[must_use]
    pub fn offset(&self) -> Option<f64> {
        self.offset
    }

    /// Labels of the training rows, `-1` outlier or `1` inlier.
    #[must_use]
    pub fn labels(&self) -> Option<Vec<i32>> {
        let offset = self.offset?;
        self.negative_outlier_factor.as_ref().map(|nof| {
            nof.iter()
                .map(|&v| if v < offset { -1 } else { 1 })
                .collect()
        })
    }

    /// Computes outlier factors for `x` and calibrates the threshold.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid hyperparameters, fewer than two rows or
    /// non-finite values.
    pub fn fit(&mut self, x: &Matrix<f64>) -> Result<()> {
        if self.n_neighbors == 0 {
            return Err(MetricsError::invalid_hyperparameter(
                "n_neighbors",
                self.n_neighbors,
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
        let n = x.n_rows();
        if n < 2 {
            return Err(MetricsError::DegenerateInput(format!(
                "local outlier factor needs at least 2 rows, got {n}"
            )));
        }
        if !x.is_finite() {
            return Err(MetricsError::DegenerateInput(
                "local outlier factor input contains non-finite values".to_string(),
            ));
        }

        let k = self.n_neighbors.min(n - 1);
        let neighbors = k_nearest(x, k);
        let k_distance: Vec<f64> = neighbors
            .iter()
            .map(|nn| nn.last().map_or(0.0, |&(_, d)| d))
            .collect();

        let lrd: Vec<f64> = neighbors
            .iter()
            .map(|nn| {
                let mean_reach = nn
                    .iter()
                    .map(|&(o, d)| k_distance[o].max(d))
                    .sum::<f64>()
                    / nn.len() as f64;
                1.0 / (mean_reach + DENSITY_EPS)
            })
            .collect();

        let nof: Vec<f64> = neighbors
            .iter()
            .zip(&lrd)
            .map(|(nn, &own)| {
                let mean_lrd = nn.iter().map(|&(o, _)| lrd[o]).sum::<f64>() / nn.len() as f64;
                -(mean_lrd / own)
            })
            .collect();

        self.offset = Some(percentile(&nof, 100.0 * self.contamination)?);
        self.negative_outlier_factor = Some(nof);
        Ok(())
    }
}

impl OutlierDetector for LocalOutlierFactor {
    fn fit_predict(&mut self, x: &Matrix<f64>) -> Result<Vec<i32>> {
        self.fit(x)?;
        self.labels()
            .ok_or_else(|| MetricsError::InvalidState("LOF labels unavailable after fit".to_string()))
    }
}

/// For every row, its `k` nearest other rows as `(index, distance)`,
/// ordered by distance then index.
fn k_nearest(x: &Matrix<f64>, k: usize) -> Vec<Vec<(usize, f64)>> {
    let n = x.n_rows();
    (0..n)
        .map(|i| {
            let mut others: Vec<(usize, f64)> = (0..n)
                .filter(|&j| j != i)
                .map(|j| (j, x.row_distance(i, j)))
                .collect();
            others.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
            others.truncate(k);
            others
        })
        .collect()
}

#[cfg(test)]
#[path = "tests_lof_contract.rs"]
mod tests_lof_contract;
