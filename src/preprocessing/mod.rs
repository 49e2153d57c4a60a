//! Preprocessing: cleaning, the like/view ratio feature and standardization.
//!
//! The canonical order is [`clean`] → [`add_ratio`] → [`standardize`]
//! (bundled as [`preprocess`]). The ratio is always computed on raw counts;
//! calling [`add_ratio`] on a standardized dataset is rejected.
//!
//! # Example
//!
//! ```
//! use fakemetrics::data::{Dataset, Scale, LIKE_VIEW_RATIO};
//! use fakemetrics::preprocessing::preprocess;
//!
//! let raw = Dataset::from_counts(&[100.0, 200.0, 400.0], &[10.0, 50.0, 100.0]).expect("valid");
//! let ds = preprocess(raw).expect("non-degenerate data");
//!
//! assert_eq!(ds.scale(), Scale::Standardized);
//! assert_eq!(ds.values(LIKE_VIEW_RATIO).expect("ratio")[1], 0.25);
//! ```

use crate::data::{Dataset, Scale, LIKES, LIKE_VIEW_RATIO, VIEWS};
use crate::error::{MetricsError, Result};
use crate::primitives::Matrix;
use crate::stats::mean_std;
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};

/// Standard deviations at or below this are treated as zero.
const ZERO_VARIANCE_EPS: f64 = 1e-12;

/// Drops every row that has a missing value in any column.
///
/// Pure and idempotent: an already clean dataset is returned unchanged.
#[must_use]
pub fn clean(dataset: Dataset) -> Dataset {
    let n_rows = dataset.n_rows();
    let mut keep = vec![true; n_rows];
    for (_, col) in dataset.iter_columns() {
        for (k, cell) in keep.iter_mut().zip(col) {
            *k &= cell.is_some();
        }
    }

    if keep.iter().all(|&k| k) {
        return dataset;
    }
    dataset.retain_rows(&keep)
}

/// Appends (or refreshes) `like_view_ratio = likes / views`, 0 when
/// `views <= 0`.
///
/// # Errors
///
/// Returns [`MetricsError::InvalidState`] if the dataset is already
/// standardized, or an error if `views` / `likes` are absent or incomplete.
pub fn add_ratio(mut dataset: Dataset) -> Result<Dataset> {
    if dataset.scale() == Scale::Standardized {
        return Err(MetricsError::InvalidState(
            "like_view_ratio must be computed on raw counts, before standardization".to_string(),
        ));
    }

    let views = dataset.values(VIEWS)?;
    let likes = dataset.values(LIKES)?;
    let ratio = views
        .iter()
        .zip(&likes)
        .map(|(&v, &l)| if v > 0.0 { l / v } else { 0.0 })
        .collect();

    dataset.set_column(LIKE_VIEW_RATIO, ratio)?;
    Ok(dataset)
}

/// Replaces `views` and `likes` with z-scores fitted on this dataset.
///
/// Scaling parameters live only for the duration of the call. Any other
/// column (ratio, flags) is left untouched.
///
/// # Errors
///
/// Returns [`MetricsError::DegenerateInput`] for an empty dataset or a
/// constant column, and an error if either column is absent or incomplete.
pub fn standardize(mut dataset: Dataset) -> Result<Dataset> {
    if dataset.is_empty() {
        return Err(MetricsError::empty_input("standardize"));
    }

    let x = dataset.to_matrix(&[VIEWS, LIKES])?;
    let mut scaler = StandardScaler::new();
    scaler.fit(&x)?;

    if let Some(&j) = scaler.zero_variance_features().first() {
        let name = [VIEWS, LIKES][j];
        return Err(MetricsError::DegenerateInput(format!(
            "column '{name}' has zero variance"
        )));
    }

    let scaled = scaler.transform(&x)?;
    dataset.set_column(VIEWS, scaled.column(0))?;
    dataset.set_column(LIKES, scaled.column(1))?;
    dataset.set_scale(Scale::Standardized);
    Ok(dataset)
}

/// Clean, add the raw ratio, then standardize.
///
/// # Errors
///
/// Propagates the errors of [`add_ratio`] and [`standardize`].
pub fn preprocess(dataset: Dataset) -> Result<Dataset> {
    standardize(add_ratio(clean(dataset))?)
}

/// Standardizes features by removing mean and scaling to unit variance.
///
/// The standard score of a sample x is: z = (x - mean) / std, with the
/// population standard deviation. Constant features are centred but not
/// scaled, so they come out as 0; [`StandardScaler::zero_variance_features`]
/// lists them for callers that must reject such input.
///
/// # Example
///
/// ```
/// use fakemetrics::prelude::*;
/// use fakemetrics::preprocessing::StandardScaler;
///
/// let data = Matrix::from_vec(3, 2, vec![
///     0.0, 0.0,
///     1.0, 10.0,
///     2.0, 20.0,
/// ]).expect("valid matrix dimensions");
///
/// let mut scaler = StandardScaler::new();
/// let scaled = scaler.fit_transform(&data).expect("fit_transform should succeed");
/// assert!((scaled.get(0, 1) + 1.224_744_871).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each feature (computed during fit).
    mean: Option<Vec<f64>>,
    /// Standard deviation of each feature (computed during fit).
    std: Option<Vec<f64>>,
}

impl StandardScaler {
    /// Creates an unfitted scaler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the fitted means, if any.
    #[must_use]
    pub fn mean(&self) -> Option<&[f64]> {
        self.mean.as_deref()
    }

    /// Returns the fitted population standard deviations, if any.
    #[must_use]
    pub fn std(&self) -> Option<&[f64]> {
        self.std.as_deref()
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    /// Indices of fitted features with (numerically) zero variance.
    #[must_use]
    pub fn zero_variance_features(&self) -> Vec<usize> {
        self.std
            .iter()
            .flatten()
            .enumerate()
            .filter(|&(_, &s)| s <= ZERO_VARIANCE_EPS)
            .map(|(j, _)| j)
            .collect()
    }

    /// Transforms data back to original scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaler is not fitted or dimensions mismatch.
    pub fn inverse_transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        let (mean, std) = self.params(x.n_cols())?;
        let (n_samples, n_features) = x.shape();

        let mut result = Matrix::zeros(n_samples, n_features);
        for i in 0..n_samples {
            for j in 0..n_features {
                let mut val = x.get(i, j);
                if std[j] > ZERO_VARIANCE_EPS {
                    val *= std[j];
                }
                result.set(i, j, val + mean[j]);
            }
        }
        Ok(result)
    }

    fn params(&self, n_features: usize) -> Result<(&[f64], &[f64])> {
        let (Some(mean), Some(std)) = (self.mean.as_deref(), self.std.as_deref()) else {
            return Err(MetricsError::InvalidState("Scaler not fitted".to_string()));
        };
        if n_features != mean.len() {
            return Err(MetricsError::dimension_mismatch(
                "n_features",
                mean.len(),
                n_features,
            ));
        }
        Ok((mean, std))
    }
}

impl Transformer for StandardScaler {
    /// Computes the mean and population standard deviation of each feature.
    fn fit(&mut self, x: &Matrix<f64>) -> Result<()> {
        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err(MetricsError::empty_input("Cannot fit with zero samples"));
        }

        let mut mean = Vec::with_capacity(n_features);
        let mut std = Vec::with_capacity(n_features);
        for j in 0..n_features {
            let (m, s) = mean_std(&x.column(j)).ok_or("Cannot fit with zero samples")?;
            mean.push(m);
            std.push(s);
        }

        self.mean = Some(mean);
        self.std = Some(std);
        Ok(())
    }

    /// Standardizes the data using fitted mean and std.
    fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        let (mean, std) = self.params(x.n_cols())?;
        let (n_samples, n_features) = x.shape();

        let mut result = Matrix::zeros(n_samples, n_features);
        for i in 0..n_samples {
            for j in 0..n_features {
                let val = if std[j] > ZERO_VARIANCE_EPS {
                    (x.get(i, j) - mean[j]) / std[j]
                } else {
                    0.0
                };
                result.set(i, j, val);
            }
        }
        Ok(result)
    }
}
