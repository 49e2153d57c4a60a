//! End-to-end run: obtain → clean → ratio → standardize → score.
//!
//! All locations and parameters come from a [`PipelineConfig`]; nothing is
//! read from process-wide state, so runs are independent and repeatable.
//!
//! # Example
//!
//! ```
//! use fakemetrics::observe::SilentObserver;
//! use fakemetrics::pipeline::{run, PipelineConfig};
//!
//! let dir = tempfile::tempdir().expect("tempdir");
//! let config = PipelineConfig::default()
//!     .with_raw_path(dir.path().join("raw.csv"))
//!     .with_clean_path(dir.path().join("clean.csv"))
//!     .with_sample_count(200);
//!
//! let out = run(&config, &SilentObserver).expect("pipeline run");
//! assert_eq!(out.dataset.n_rows(), 200);
//! assert!(out.summary.anomaly_count > 0);
//! ```

use crate::anomaly::{AnomalyScorer, DetectionMethod};
use crate::data::{Dataset, LIKES, LIKE_VIEW_RATIO, VIEWS};
use crate::error::{MetricsError, Result};
use crate::observe::{PipelineEvent, PipelineObserver};
use crate::preprocessing::{add_ratio, clean, standardize};
use crate::source::DataSource;
use crate::synthetic::SyntheticConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Parameters of one pipeline run.
///
/// Every field has a default, so a TOML file only needs the keys it
/// changes:
///
/// ```
/// use fakemetrics::anomaly::DetectionMethod;
/// use fakemetrics::pipeline::PipelineConfig;
///
/// let config = PipelineConfig::from_toml_str(r#"
///     sample_count = 500
///     methods = ["isolation_forest", "lof"]
///
///     [synthetic]
///     seed = 7
/// "#).expect("valid toml");
///
/// assert_eq!(config.sample_count, 500);
/// assert_eq!(config.methods[1], DetectionMethod::LocalOutlierFactor);
/// assert_eq!(config.synthetic.seed, 7);
/// assert_eq!(config.contamination, 0.05);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw `views,likes` file, loaded if present.
    pub raw_path: PathBuf,
    /// Cleaned file; when present it short-circuits synthesis and cleaning.
    pub clean_path: PathBuf,
    /// Rows to synthesize when no raw file exists.
    pub sample_count: usize,
    /// Write synthesized and cleaned datasets to disk.
    pub persist: bool,
    /// Expected outlier share, in `(0, 0.5]`.
    pub contamination: f64,
    /// Detectors to run, in order. The first one drives the summary count.
    pub methods: Vec<DetectionMethod>,
    /// Neighbourhood size for LOF.
    pub n_neighbors: usize,
    /// Trees in the isolation forest.
    pub n_estimators: usize,
    /// Seed of the isolation forest.
    pub random_state: u64,
    /// Synthetic data generator.
    pub synthetic: SyntheticConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from("data/raw/dataset.csv"),
            clean_path: PathBuf::from("data/processed/fake_metrics_clean.csv"),
            sample_count: 1000,
            persist: false,
            contamination: 0.05,
            methods: vec![DetectionMethod::IsolationForest],
            n_neighbors: 20,
            n_estimators: 100,
            random_state: 42,
            synthetic: SyntheticConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parses a TOML document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Config`] on a syntax or type error.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| MetricsError::Config(e.to_string()))
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Config`] if the file is unreadable or invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| MetricsError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
            .map_err(|e| MetricsError::Config(format!("{}: {e}", path.display())))
    }

    /// Sets the raw dataset location.
    #[must_use]
    pub fn with_raw_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.raw_path = path.into();
        self
    }

    /// Sets the cleaned dataset cache location.
    #[must_use]
    pub fn with_clean_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.clean_path = path.into();
        self
    }

    /// Sets the number of rows synthesized when no raw file exists.
    #[must_use]
    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Writes synthesized and cleaned data back to disk when true.
    #[must_use]
    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Sets the expected proportion of outliers.
    #[must_use]
    pub fn with_contamination(mut self, contamination: f64) -> Self {
        self.contamination = contamination;
        self
    }

    /// Sets the detectors to run, in order.
    #[must_use]
    pub fn with_methods(mut self, methods: Vec<DetectionMethod>) -> Self {
        self.methods = methods;
        self
    }

    /// Sets the LOF neighbourhood size.
    #[must_use]
    pub fn with_n_neighbors(mut self, n_neighbors: usize) -> Self {
        self.n_neighbors = n_neighbors;
        self
    }

    /// Sets the number of isolation trees.
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Seeds both the generator and the isolation forest.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self.synthetic.seed = seed;
        self
    }

    /// Replaces the synthetic data settings.
    #[must_use]
    pub fn with_synthetic(mut self, synthetic: SyntheticConfig) -> Self {
        self.synthetic = synthetic;
        self
    }

    /// Checks every parameter before any file is touched.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::InvalidHyperparameter`] or
    /// [`MetricsError::Config`] for the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(MetricsError::invalid_hyperparameter(
                "contamination",
                self.contamination,
                "in (0, 0.5]",
            ));
        }
        if self.methods.is_empty() {
            return Err(MetricsError::Config(
                "at least one detection method is required".to_string(),
            ));
        }
        if self.n_neighbors == 0 {
            return Err(MetricsError::invalid_hyperparameter("n_neighbors", 0, ">= 1"));
        }
        if self.n_estimators == 0 {
            return Err(MetricsError::invalid_hyperparameter("n_estimators", 0, ">= 1"));
        }
        self.synthetic.validate()
    }

    fn scorer(&self, method: DetectionMethod) -> AnomalyScorer {
        AnomalyScorer::new(method)
            .with_contamination(self.contamination)
            .with_n_estimators(self.n_estimators)
            .with_random_state(self.random_state)
            .with_n_neighbors(self.n_neighbors)
    }
}

/// The four scalars handed to reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSummary {
    /// Sum of raw views.
    pub total_views: f64,
    /// Sum of raw likes.
    pub total_likes: f64,
    /// Rows flagged by the first configured method.
    pub anomaly_count: usize,
    /// `total_likes / total_views`, 0 when there are no views.
    pub like_view_ratio: f64,
}

impl MetricsSummary {
    /// Totals from a raw (unstandardized) dataset.
    fn from_raw(raw: &Dataset) -> Result<Self> {
        let total_views: f64 = raw.values(VIEWS)?.iter().sum();
        let total_likes: f64 = raw.values(LIKES)?.iter().sum();
        let like_view_ratio = if total_views > 0.0 {
            total_likes / total_views
        } else {
            0.0
        };
        Ok(Self {
            total_views,
            total_likes,
            anomaly_count: 0,
            like_view_ratio,
        })
    }
}

/// Output of [`run`].
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Standardized dataset with one flag column per method.
    pub dataset: Dataset,
    /// Raw-unit totals and the anomaly count.
    pub summary: MetricsSummary,
}

/// Runs the whole pipeline once.
///
/// Models are fitted inside this call and dropped at its end.
///
/// # Errors
///
/// Returns config errors before touching the filesystem, load errors for a
/// malformed existing file, and [`MetricsError::DegenerateInput`] when the
/// cleaned data cannot be standardized or scored.
pub fn run(config: &PipelineConfig, observer: &dyn PipelineObserver) -> Result<PipelineRun> {
    config.validate()?;

    let source = DataSource::new(&config.synthetic, observer);
    let mut dataset = clean(source.obtain_clean(
        &config.raw_path,
        &config.clean_path,
        config.sample_count,
        config.persist,
    )?);
    if !dataset.has_column(LIKE_VIEW_RATIO) {
        dataset = add_ratio(dataset)?;
    }

    let mut summary = MetricsSummary::from_raw(&dataset)?;

    let rows = dataset.n_rows();
    dataset = standardize(dataset)?;
    observer.on_event(&PipelineEvent::Standardized { rows });

    for &method in &config.methods {
        dataset = config.scorer(method).score(dataset, observer)?;
    }
    if let Some(primary) = config.methods.first() {
        summary.anomaly_count = dataset.count_flagged(primary.column_name())?;
    }

    Ok(PipelineRun { dataset, summary })
}
