//! Observability hook for the pipeline stages.
//!
//! Stages never print. They report what happened as a [`PipelineEvent`] to
//! an injected [`PipelineObserver`]; [`TracingObserver`] turns those into
//! structured `tracing` events and [`SilentObserver`] drops them.

use crate::anomaly::DetectionMethod;
use std::path::PathBuf;

/// Something a pipeline stage did.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A dataset was read from disk.
    DatasetLoaded {
        /// Source file
        path: PathBuf,
        /// Rows read
        rows: usize,
    },
    /// A dataset was synthesized because no file existed.
    DatasetSynthesized {
        /// Rows generated
        rows: usize,
        /// Rows perturbed so that likes exceed views
        injected: usize,
    },
    /// A dataset was written to disk.
    DatasetPersisted {
        /// Destination file
        path: PathBuf,
        /// Rows written
        rows: usize,
    },
    /// Writing a dataset failed; the in-memory copy is still used.
    PersistFailed {
        /// Destination file
        path: PathBuf,
        /// Rendered cause
        error: String,
    },
    /// A pre-cleaned file was found and returned as-is.
    CleanCacheHit {
        /// Cached file
        path: PathBuf,
    },
    /// Rows with missing values were dropped.
    Cleaned {
        /// Rows before cleaning
        before: usize,
        /// Rows after cleaning
        after: usize,
    },
    /// The like/view ratio column was computed.
    RatioAdded {
        /// Rows whose views were not positive (ratio set to 0)
        zero_views: usize,
    },
    /// `views` and `likes` were replaced by z-scores.
    Standardized {
        /// Rows standardized
        rows: usize,
    },
    /// A detector labelled the dataset.
    AnomaliesDetected {
        /// Detector used
        method: DetectionMethod,
        /// Rows flagged as outliers
        flagged: usize,
        /// Rows scored
        rows: usize,
    },
}

/// Receives pipeline events.
pub trait PipelineObserver {
    /// Called once per event, synchronously, from the stage that caused it.
    fn on_event(&self, event: &PipelineEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::DatasetLoaded { path, rows } => {
                tracing::info!(path = %path.display(), rows, "dataset loaded");
            }
            PipelineEvent::DatasetSynthesized { rows, injected } => {
                tracing::info!(rows, injected, "dataset synthesized");
            }
            PipelineEvent::DatasetPersisted { path, rows } => {
                tracing::info!(path = %path.display(), rows, "dataset persisted");
            }
            PipelineEvent::PersistFailed { path, error } => {
                tracing::warn!(path = %path.display(), %error, "dataset not persisted, continuing in memory");
            }
            PipelineEvent::CleanCacheHit { path } => {
                tracing::info!(path = %path.display(), "clean dataset loaded from cache");
            }
            PipelineEvent::Cleaned { before, after } => {
                tracing::debug!(before, after, dropped = before - after, "rows with missing values dropped");
            }
            PipelineEvent::RatioAdded { zero_views } => {
                tracing::debug!(zero_views, "like/view ratio added");
            }
            PipelineEvent::Standardized { rows } => {
                tracing::debug!(rows, "views and likes standardized");
            }
            PipelineEvent::AnomaliesDetected {
                method,
                flagged,
                rows,
            } => {
                tracing::info!(method = %method, flagged, rows, "anomalies detected");
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl PipelineObserver for SilentObserver {
    fn on_event(&self, _event: &PipelineEvent) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{PipelineEvent, PipelineObserver};
    use std::cell::RefCell;

    /// Keeps every event for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingObserver {
        pub(crate) events: RefCell<Vec<PipelineEvent>>,
    }

    impl PipelineObserver for RecordingObserver {
        fn on_event(&self, event: &PipelineEvent) {
            self.events.borrow_mut().push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingObserver;
    use super::*;

    #[test]
    fn test_recording_observer_keeps_order() {
        let obs = RecordingObserver::default();
        obs.on_event(&PipelineEvent::Standardized { rows: 3 });
        obs.on_event(&PipelineEvent::Cleaned {
            before: 4,
            after: 3,
        });
        let events = obs.events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], PipelineEvent::Standardized { rows: 3 });
    }

    #[test]
    fn test_builtin_observers_accept_every_event() {
        let events = [
            PipelineEvent::DatasetSynthesized {
                rows: 10,
                injected: 0,
            },
            PipelineEvent::PersistFailed {
                path: PathBuf::from("x.csv"),
                error: "denied".to_string(),
            },
            PipelineEvent::AnomaliesDetected {
                method: DetectionMethod::IsolationForest,
                flagged: 1,
                rows: 10,
            },
        ];
        for event in &events {
            TracingObserver.on_event(event);
            SilentObserver.on_event(event);
        }
    }
}
