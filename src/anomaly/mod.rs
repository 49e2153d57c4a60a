//! Anomaly scoring of standardized views/likes data.
//!
//! Two unsupervised detectors are available:
//!
//! - [`IsolationForest`]: random partitioning, short paths mean anomalies
//! - [`LocalOutlierFactor`]: density relative to the k nearest neighbours
//!
//! [`AnomalyScorer`] runs one of them on the `views` and `likes` columns
//! and appends a 0/1 flag column named after the method.

mod iforest;
mod lof;

pub use iforest::IsolationForest;
pub use lof::LocalOutlierFactor;

use crate::data::{Dataset, Scale, ANOMALY, ANOMALY_LOF, LIKES, VIEWS};
use crate::error::{MetricsError, Result};
use crate::observe::{PipelineEvent, PipelineObserver};
use crate::traits::OutlierDetector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which detector to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Isolation Forest, flag column `anomaly`.
    #[default]
    IsolationForest,
    /// Local Outlier Factor, flag column `anomaly_lof`.
    #[serde(rename = "lof")]
    LocalOutlierFactor,
}

impl DetectionMethod {
    /// Name of the flag column this method writes.
    #[must_use]
    pub fn column_name(self) -> &'static str {
        match self {
            Self::IsolationForest => ANOMALY,
            Self::LocalOutlierFactor => ANOMALY_LOF,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::IsolationForest => "isolation_forest",
            Self::LocalOutlierFactor => "lof",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionMethod {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "isolation_forest" | "iforest" => Ok(Self::IsolationForest),
            "lof" | "local_outlier_factor" => Ok(Self::LocalOutlierFactor),
            other => Err(MetricsError::invalid_hyperparameter(
                "method",
                other,
                "one of isolation_forest, lof",
            )),
        }
    }
}

/// Configured anomaly scorer.
///
/// # Examples
///
/// ```
/// use fakemetrics::anomaly::{AnomalyScorer, DetectionMethod};
/// use fakemetrics::data::ANOMALY;
/// use fakemetrics::observe::SilentObserver;
/// use fakemetrics::preprocessing::preprocess;
/// use fakemetrics::synthetic::{simulate, SyntheticConfig};
///
/// let raw = simulate(&SyntheticConfig::default(), 200).expect("valid config");
/// let ds = preprocess(raw).expect("non-degenerate");
///
/// let scorer = AnomalyScorer::new(DetectionMethod::IsolationForest).with_contamination(0.05);
/// let scored = scorer.score(ds, &SilentObserver).expect("standardized input");
/// assert!(scored.count_flagged(ANOMALY).expect("flag column") > 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyScorer {
    method: DetectionMethod,
    contamination: f64,
    n_estimators: usize,
    max_samples: Option<usize>,
    random_state: u64,
    n_neighbors: usize,
}

impl Default for AnomalyScorer {
    fn default() -> Self {
        Self::new(DetectionMethod::default())
    }
}

impl AnomalyScorer {
    /// Creates a scorer with 5% contamination, 100 trees, 20 neighbours and seed 42.
    #[must_use]
    pub fn new(method: DetectionMethod) -> Self {
        Self {
            method,
            contamination: 0.05,
            n_estimators: 100,
            max_samples: None,
            random_state: 42,
            n_neighbors: 20,
        }
    }

    /// Sets the expected proportion of outliers.
    #[must_use]
    pub fn with_contamination(mut self, contamination: f64) -> Self {
        self.contamination = contamination;
        self
    }

    /// Sets the number of isolation trees.
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Sets the per-tree subsample size (default `min(256, n)`).
    #[must_use]
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = Some(max_samples);
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Sets the LOF neighbourhood size.
    #[must_use]
    pub fn with_n_neighbors(mut self, n_neighbors: usize) -> Self {
        self.n_neighbors = n_neighbors;
        self
    }

    /// Returns the configured detection method.
    #[must_use]
    pub fn method(&self) -> DetectionMethod {
        self.method
    }

    /// Returns the configured contamination.
    #[must_use]
    pub fn contamination(&self) -> f64 {
        self.contamination
    }

    /// Flags anomalous rows of a standardized dataset.
    ///
    /// The flag column ([`DetectionMethod::column_name`]) is 1.0 for
    /// outliers and 0.0 otherwise; it replaces a previous column of the same
    /// name. Every other column is returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`MetricsError::DegenerateInput`] for fewer than two rows
    /// - [`MetricsError::InvalidState`] if the dataset is not standardized
    /// - [`MetricsError::InvalidHyperparameter`] if contamination is not in `(0, 0.5]`
    /// - an error if `views` / `likes` are absent or incomplete
    pub fn score(&self, mut dataset: Dataset, observer: &dyn PipelineObserver) -> Result<Dataset> {
        let rows = dataset.n_rows();
        if rows < 2 {
            return Err(MetricsError::DegenerateInput(format!(
                "anomaly scoring needs at least 2 rows, got {rows}"
            )));
        }
        if dataset.scale() != Scale::Standardized {
            return Err(MetricsError::InvalidState(
                "anomaly scoring requires a standardized dataset".to_string(),
            ));
        }
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(MetricsError::invalid_hyperparameter(
                "contamination",
                self.contamination,
                "in (0, 0.5]",
            ));
        }

        let x = dataset.to_matrix(&[VIEWS, LIKES])?;
        let labels = self.detector().fit_predict(&x)?;
        let flags: Vec<f64> = labels
            .iter()
            .map(|&l| if l == -1 { 1.0 } else { 0.0 })
            .collect();
        let flagged = labels.iter().filter(|&&l| l == -1).count();

        dataset.set_column(self.method.column_name(), flags)?;
        observer.on_event(&PipelineEvent::AnomaliesDetected {
            method: self.method,
            flagged,
            rows,
        });
        Ok(dataset)
    }

    fn detector(&self) -> Box<dyn OutlierDetector> {
        match self.method {
            DetectionMethod::IsolationForest => {
                let mut iforest = IsolationForest::new()
                    .with_n_estimators(self.n_estimators)
                    .with_contamination(self.contamination)
                    .with_random_state(self.random_state);
                if let Some(max_samples) = self.max_samples {
                    iforest = iforest.with_max_samples(max_samples);
                }
                Box::new(iforest)
            }
            DetectionMethod::LocalOutlierFactor => Box::new(
                LocalOutlierFactor::new()
                    .with_n_neighbors(self.n_neighbors)
                    .with_contamination(self.contamination),
            ),
        }
    }
}

/// Scores `dataset` with `method` and default detector settings.
///
/// # Errors
///
/// See [`AnomalyScorer::score`].
pub fn score(
    dataset: Dataset,
    method: DetectionMethod,
    contamination: f64,
    observer: &dyn PipelineObserver,
) -> Result<Dataset> {
    AnomalyScorer::new(method)
        .with_contamination(contamination)
        .score(dataset, observer)
}
