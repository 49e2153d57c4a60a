//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use fakemetrics::prelude::*;
//! ```

pub use crate::anomaly::{score, AnomalyScorer, DetectionMethod, IsolationForest, LocalOutlierFactor};
pub use crate::data::{Dataset, Scale, ANOMALY, ANOMALY_LOF, LIKES, LIKE_VIEW_RATIO, VIEWS};
pub use crate::observe::{PipelineObserver, SilentObserver, TracingObserver};
pub use crate::pipeline::{run, MetricsSummary, PipelineConfig, PipelineRun};
pub use crate::preprocessing::{add_ratio, clean, preprocess, standardize, StandardScaler};
pub use crate::primitives::Matrix;
pub use crate::source::DataSource;
pub use crate::synthetic::{simulate, SyntheticConfig};
pub use crate::traits::{OutlierDetector, Transformer, UnsupervisedEstimator};
