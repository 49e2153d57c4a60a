//! Data source: load a dataset from disk or synthesize one.
//!
//! Loading is strict (a present but malformed file is an error). Persisting
//! is best-effort: a failed write is reported through the observer as
//! [`PipelineEvent::PersistFailed`] and the in-memory dataset is returned.

use crate::data::csv::{read_csv, write_csv};
use crate::data::{Dataset, LIKES, VIEWS};
use crate::error::Result;
use crate::observe::{PipelineEvent, PipelineObserver};
use crate::preprocessing::{add_ratio, clean};
use crate::synthetic::{simulate, SyntheticConfig};
use std::path::Path;

/// Produces raw and cleaned datasets.
///
/// # Examples
///
/// ```
/// use fakemetrics::observe::SilentObserver;
/// use fakemetrics::source::DataSource;
/// use fakemetrics::synthetic::SyntheticConfig;
///
/// let dir = tempfile::tempdir().expect("tempdir");
/// let raw = dir.path().join("raw.csv");
///
/// let config = SyntheticConfig::default();
/// let source = DataSource::new(&config, &SilentObserver);
/// let ds = source.obtain(&raw, 50, false).expect("synthesized");
/// assert_eq!(ds.n_rows(), 50);
/// assert!(!raw.exists());
/// ```
#[derive(Clone, Copy)]
pub struct DataSource<'o> {
    synthetic: &'o SyntheticConfig,
    observer: &'o dyn PipelineObserver,
}

impl std::fmt::Debug for DataSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSource")
            .field("synthetic", self.synthetic)
            .finish_non_exhaustive()
    }
}

impl<'o> DataSource<'o> {
    /// Creates a source that synthesizes with `synthetic` and reports to `observer`.
    #[must_use]
    pub fn new(synthetic: &'o SyntheticConfig, observer: &'o dyn PipelineObserver) -> Self {
        Self {
            synthetic,
            observer,
        }
    }

    /// Reads `path` verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Load`](crate::error::MetricsError::Load) if
    /// the file is unreadable or malformed.
    pub fn load(&self, path: &Path) -> Result<Dataset> {
        let dataset = read_csv(path)?;
        self.observer.on_event(&PipelineEvent::DatasetLoaded {
            path: path.to_path_buf(),
            rows: dataset.n_rows(),
        });
        Ok(dataset)
    }

    /// Loads `path` if it exists, otherwise synthesizes `sample_count` rows.
    ///
    /// A synthesized dataset is written to `path` only when `persist` is set.
    ///
    /// # Errors
    ///
    /// Returns a load error for a malformed existing file, or a config error
    /// if synthesis parameters are invalid. Write failures are not errors.
    pub fn obtain(&self, path: &Path, sample_count: usize, persist: bool) -> Result<Dataset> {
        if path.exists() {
            return self.load(path);
        }

        let dataset = simulate(self.synthetic, sample_count)?;
        self.observer.on_event(&PipelineEvent::DatasetSynthesized {
            rows: dataset.n_rows(),
            injected: self.synthetic.injected_count(sample_count),
        });
        if persist {
            self.persist(&dataset, path);
        }
        Ok(dataset)
    }

    /// Returns the cleaned dataset, preferring a cached copy at `clean_path`.
    ///
    /// On a cache miss the raw dataset is obtained (forwarding `persist`),
    /// cleaned, given the raw `like_view_ratio` column, and written to
    /// `clean_path` when `persist` is set.
    ///
    /// # Errors
    ///
    /// Propagates load errors, and errors from [`add_ratio`] if the raw data
    /// lacks `views` or `likes`.
    pub fn obtain_clean(
        &self,
        raw_path: &Path,
        clean_path: &Path,
        sample_count: usize,
        persist: bool,
    ) -> Result<Dataset> {
        if clean_path.exists() {
            let dataset = self.load(clean_path)?;
            self.observer.on_event(&PipelineEvent::CleanCacheHit {
                path: clean_path.to_path_buf(),
            });
            return Ok(dataset);
        }

        let raw = self.obtain(raw_path, sample_count, persist)?;
        raw.require_columns(&[VIEWS, LIKES])?;

        let before = raw.n_rows();
        let cleaned = clean(raw);
        self.observer.on_event(&PipelineEvent::Cleaned {
            before,
            after: cleaned.n_rows(),
        });

        let dataset = add_ratio(cleaned)?;
        let zero_views = dataset.values(VIEWS)?.iter().filter(|&&v| v <= 0.0).count();
        self.observer
            .on_event(&PipelineEvent::RatioAdded { zero_views });

        if persist {
            self.persist(&dataset, clean_path);
        }
        Ok(dataset)
    }

    fn persist(&self, dataset: &Dataset, path: &Path) {
        let event = match write_csv(dataset, path) {
            Ok(()) => PipelineEvent::DatasetPersisted {
                path: path.to_path_buf(),
                rows: dataset.n_rows(),
            },
            Err(e) => PipelineEvent::PersistFailed {
                path: path.to_path_buf(),
                error: e.to_string(),
            },
        };
        self.observer.on_event(&event);
    }
}
