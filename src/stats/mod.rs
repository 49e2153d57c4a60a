//! Descriptive statistics used by the detectors and the scaler.
//!
//! - Quantiles and percentiles using the R-7 method (Hyndman & Fan 1996),
//!   the default of R, `NumPy` and Pandas
//! - Population mean / standard deviation
//!
//! # Examples
//!
//! ```
//! use fakemetrics::stats::percentile;
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0];
//! assert_eq!(percentile(&data, 50.0).expect("median"), 3.0);
//! assert_eq!(percentile(&data, 0.0).expect("min"), 1.0);
//! ```

use crate::error::{MetricsError, Result};

/// Computes the `p`-th percentile with linear interpolation (R-7 method).
///
/// # Errors
///
/// Returns an error if `data` is empty, contains NaN, or `p` is outside
/// `[0, 100]`.
pub fn percentile(data: &[f64], p: f64) -> Result<f64> {
    if data.is_empty() {
        return Err(MetricsError::empty_input("percentile of empty slice"));
    }
    if !(0.0..=100.0).contains(&p) {
        return Err(MetricsError::invalid_hyperparameter(
            "percentile",
            p,
            "in [0, 100]",
        ));
    }
    if data.iter().any(|v| v.is_nan()) {
        return Err(MetricsError::DegenerateInput(
            "percentile input contains NaN".to_string(),
        ));
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    if n == 1 {
        return Ok(sorted[0]);
    }

    // R-7: h = (n - 1) * q, 0-indexed
    let h = (n - 1) as f64 * (p / 100.0);
    let h_floor = h.floor() as usize;
    let h_ceil = h.ceil() as usize;

    if h_floor == h_ceil {
        return Ok(sorted[h_floor]);
    }
    let fraction = h - h_floor as f64;
    Ok(sorted[h_floor] + fraction * (sorted[h_ceil] - sorted[h_floor]))
}

/// Mean and population standard deviation (divide by n).
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn mean_std(data: &[f64]) -> Option<(f64, f64)> {
    if data.is_empty() {
        return None;
    }
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let var = data.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    Some((mean, var.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0];
        // h = 3 * 0.25 = 0.75 -> 1.75
        assert!((percentile(&data, 25.0).expect("valid") - 1.75).abs() < 1e-12);
        assert!((percentile(&data, 100.0).expect("valid") - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_unsorted_input() {
        let data = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert!((percentile(&data, 50.0).expect("valid") - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_single_element() {
        assert!((percentile(&[7.0], 5.0).expect("valid") - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_rejects_bad_input() {
        assert!(percentile(&[], 50.0).is_err());
        assert!(percentile(&[1.0], 101.0).is_err());
        assert!(percentile(&[1.0, f64::NAN], 50.0).is_err());
    }

    #[test]
    fn test_mean_std_population() {
        let (mean, std) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).expect("non-empty");
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);
        assert!(mean_std(&[]).is_none());
    }
}
