//! `fakemetrics describe`: per-column statistics of a CSV file.

use crate::error::{CliError, Result};
use crate::output;
use fakemetrics::data::csv::read_csv;
use fakemetrics::data::ColumnStats;
use std::path::Path;

pub(crate) fn run(path: &Path, json: bool) -> Result<()> {
    if !path.is_file() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }

    let dataset = read_csv(path)?;
    let stats = dataset.describe();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        output::section(&format!("{} ({} rows)", path.display(), dataset.n_rows()));
        print_table(&stats);
    }
    Ok(())
}

fn print_table(stats: &[ColumnStats]) {
    let width = stats.iter().map(|s| s.name.len()).max().unwrap_or(0).max(6);
    println!(
        "  {:<width$} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "column", "count", "mean", "std", "min", "median", "max"
    );
    for s in stats {
        println!(
            "  {:<width$} {:>8} {} {} {} {} {}",
            s.name,
            s.count,
            output::stat(s.mean),
            output::stat(s.std),
            output::stat(s.min),
            output::stat(s.median),
            output::stat(s.max),
        );
    }
}
