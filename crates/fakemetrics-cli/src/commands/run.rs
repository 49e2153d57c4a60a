//! `fakemetrics run`: configure, run the pipeline, print the summary.

use crate::error::Result;
use crate::output;
use fakemetrics::anomaly::DetectionMethod;
use fakemetrics::observe::TracingObserver;
use fakemetrics::pipeline::{self, MetricsSummary, PipelineConfig};
use std::path::PathBuf;

/// Command-line overrides, applied on top of the config file (or defaults).
#[derive(Debug, Default)]
pub(crate) struct RunArgs {
    pub(crate) config: Option<PathBuf>,
    pub(crate) samples: Option<usize>,
    pub(crate) seed: Option<u64>,
    pub(crate) contamination: Option<f64>,
    pub(crate) methods: Vec<DetectionMethod>,
    pub(crate) persist: bool,
    pub(crate) raw: Option<PathBuf>,
    pub(crate) clean: Option<PathBuf>,
}

impl RunArgs {
    fn resolve(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(samples) = self.samples {
            config = config.with_sample_count(samples);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(contamination) = self.contamination {
            config = config.with_contamination(contamination);
        }
        if !self.methods.is_empty() {
            config = config.with_methods(self.methods.clone());
        }
        if self.persist {
            config = config.with_persist(true);
        }
        if let Some(raw) = &self.raw {
            config = config.with_raw_path(raw);
        }
        if let Some(clean) = &self.clean {
            config = config.with_clean_path(clean);
        }
        Ok(config)
    }
}

pub(crate) fn run(args: &RunArgs, json: bool) -> Result<()> {
    let config = args.resolve()?;
    tracing::debug!(?config, "resolved pipeline configuration");

    let out = pipeline::run(&config, &TracingObserver)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&out.summary)?);
    } else {
        print_summary(&out.summary, out.dataset.n_rows(), &config);
    }
    Ok(())
}

fn print_summary(summary: &MetricsSummary, rows: usize, config: &PipelineConfig) {
    output::section("Summary");
    output::kv("rows", rows);
    output::kv("total_views", summary.total_views);
    output::kv("total_likes", summary.total_likes);
    output::kv("like_view_ratio", format!("{:.4}", summary.like_view_ratio));
    output::kv("anomaly_count", summary.anomaly_count);

    let methods: Vec<String> = config.methods.iter().map(ToString::to_string).collect();
    output::kv("methods", methods.join(", "));
    output::kv("contamination", config.contamination);
}
