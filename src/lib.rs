//! Fakemetrics: preparation and outlier scoring for views/likes metrics.
//!
//! A dataset of `views` and `likes` counts is loaded from CSV (or
//! synthesized with a fixed seed and a share of injected rows whose likes
//! exceed their views), cleaned of missing values, given a raw
//! `like_view_ratio` feature, standardized, and labelled by an unsupervised
//! outlier detector.
//!
//! # Quick Start
//!
//! ```
//! use fakemetrics::prelude::*;
//!
//! let raw = simulate(&SyntheticConfig::default(), 300).unwrap();
//! let ds = preprocess(raw).unwrap();
//!
//! let scored = score(ds, DetectionMethod::IsolationForest, 0.05, &SilentObserver).unwrap();
//! let flagged = scored.count_flagged(ANOMALY).unwrap();
//! assert!(flagged > 0 && flagged < 30);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Row-major `Matrix`
//! - [`data`]: `Dataset` of named nullable columns, CSV I/O
//! - [`synthetic`]: Seeded views/likes generator with injected anomalies
//! - [`source`]: Load-or-synthesize data source with a clean-file cache
//! - [`preprocessing`]: Cleaning, ratio feature, standardization
//! - [`anomaly`]: Isolation Forest, Local Outlier Factor, scorer
//! - [`pipeline`]: Configured end-to-end run and summary
//! - [`observe`]: Event hook for logging
//! - [`stats`]: Percentiles and moments

pub mod anomaly;
pub mod data;
pub mod error;
pub mod observe;
pub mod pipeline;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod source;
pub mod stats;
pub mod synthetic;
pub mod traits;

pub use error::{MetricsError, Result};
pub use primitives::Matrix;
pub use traits::{OutlierDetector, Transformer, UnsupervisedEstimator};
