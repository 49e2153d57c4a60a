//! Core traits for transformers and outlier detectors.
//!
//! These traits define the API contracts shared by the preprocessing and
//! anomaly modules.

use crate::error::Result;
use crate::primitives::Matrix;

/// Trait for unsupervised models that can label new data after fitting.
///
/// # Examples
///
/// ```
/// use fakemetrics::prelude::*;
///
/// let data = Matrix::from_vec(6, 2, vec![
///     0.0, 0.0, 0.1, 0.1, 0.2, 0.0,
///     0.1, 0.0, 0.0, 0.2, 9.0, 9.0,
/// ]).unwrap();
///
/// let mut forest = IsolationForest::new().with_random_state(42);
/// forest.fit(&data).unwrap();
/// let labels = forest.predict(&data);
/// assert_eq!(labels.len(), 6);
/// ```
pub trait UnsupervisedEstimator {
    /// The type of labels produced.
    type Labels;

    /// Fits the model to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (empty data, invalid parameters, etc.).
    fn fit(&mut self, x: &Matrix<f64>) -> Result<()>;

    /// Predicts labels for data.
    fn predict(&self, x: &Matrix<f64>) -> Self::Labels;
}

/// Trait for data transformers (scalers).
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, x: &Matrix<f64>) -> Result<()>;

    /// Transforms data using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if transformer is not fitted.
    fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        self.fit(x)?;
        self.transform(x)
    }
}

/// Outlier detectors that label the very set they are fitted on.
///
/// Labels follow the `1` (inlier) / `-1` (outlier) convention. Every call
/// refits from scratch; nothing learned in one call is reused by the next.
pub trait OutlierDetector {
    /// Fits on `x` and labels each of its rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be fitted.
    fn fit_predict(&mut self, x: &Matrix<f64>) -> Result<Vec<i32>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetricsError;

    // Mock transformer to test trait default methods
    struct MockTransformer {
        offset: Option<f64>,
    }

    impl Transformer for MockTransformer {
        fn fit(&mut self, x: &Matrix<f64>) -> Result<()> {
            if x.n_rows() == 0 {
                return Err(MetricsError::empty_input("mock fit"));
            }
            let sum: f64 = x.as_slice().iter().sum();
            self.offset = Some(sum / x.as_slice().len() as f64);
            Ok(())
        }

        fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
            let offset = self.offset.ok_or("not fitted")?;
            let data = x.as_slice().iter().map(|v| v - offset).collect();
            Matrix::from_vec(x.n_rows(), x.n_cols(), data).map_err(Into::into)
        }
    }

    #[test]
    fn test_fit_transform_default_fits_first() {
        let mut t = MockTransformer { offset: None };
        let x = Matrix::from_vec(2, 1, vec![1.0, 3.0]).expect("2x1");
        let out = t.fit_transform(&x).expect("fit_transform");
        assert_eq!(out.as_slice(), &[-1.0, 1.0]);
    }

    #[test]
    fn test_transform_unfitted_errors() {
        let t = MockTransformer { offset: None };
        let x = Matrix::from_vec(1, 1, vec![1.0]).expect("1x1");
        assert!(t.transform(&x).is_err());
    }

    #[test]
    fn test_fit_transform_empty_errors() {
        let mut t = MockTransformer { offset: None };
        assert!(t.fit_transform(&Matrix::zeros(0, 1)).is_err());
    }
}
