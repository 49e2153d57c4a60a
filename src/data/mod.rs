//! `Dataset` module for named, nullable metric columns.
//!
//! A [`Dataset`] is the table that flows through the pipeline:
//! source → clean → ratio → standardize → score. Cells are `Option<f64>` so
//! that missing values read from disk survive until the cleaner drops them.

pub mod csv;

use crate::error::{MetricsError, Result};
use crate::primitives::Matrix;

/// Raw (or standardized) view count.
pub const VIEWS: &str = "views";
/// Raw (or standardized) like count.
pub const LIKES: &str = "likes";
/// Raw likes / raw views, 0 when views is not positive.
pub const LIKE_VIEW_RATIO: &str = "like_view_ratio";
/// Isolation forest flag (1 = outlier).
pub const ANOMALY: &str = "anomaly";
/// Local outlier factor flag (1 = outlier).
pub const ANOMALY_LOF: &str = "anomaly_lof";

/// A nullable column of values.
pub type Column = Vec<Option<f64>>;

/// Units of the `views` / `likes` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    /// Original counts.
    #[default]
    Raw,
    /// Z-scores fitted on this dataset.
    Standardized,
}

/// An ordered table of named, equally long, nullable columns.
///
/// # Examples
///
/// ```
/// use fakemetrics::data::{Dataset, VIEWS, LIKES};
///
/// let ds = Dataset::from_counts(&[100.0, 200.0], &[10.0, 50.0]).expect("two equal columns");
/// assert_eq!(ds.shape(), (2, 2));
/// assert_eq!(ds.column_names(), vec![VIEWS, LIKES]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<(String, Column)>,
    n_rows: usize,
    scale: Scale,
}

impl Dataset {
    /// Creates a new raw-scale `Dataset` from named columns.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no columns, if columns have different
    /// lengths, or if names are empty or duplicated.
    pub fn new(columns: Vec<(String, Column)>) -> Result<Self> {
        if columns.is_empty() {
            return Err("Dataset must have at least one column".into());
        }

        let n_rows = columns[0].1.len();

        for (name, col) in &columns {
            if col.len() != n_rows {
                return Err(MetricsError::dimension_mismatch(name, n_rows, col.len()));
            }
            if name.is_empty() {
                return Err("Column names cannot be empty".into());
            }
        }

        let mut names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        names.sort_unstable();
        if names.windows(2).any(|w| w[0] == w[1]) {
            return Err("Duplicate column names not allowed".into());
        }

        Ok(Self {
            columns,
            n_rows,
            scale: Scale::Raw,
        })
    }

    /// Creates a raw `views,likes` dataset from complete values.
    ///
    /// # Errors
    ///
    /// Returns an error if the slices differ in length.
    pub fn from_counts(views: &[f64], likes: &[f64]) -> Result<Self> {
        Self::new(vec![
            (VIEWS.to_string(), views.iter().copied().map(Some).collect()),
            (LIKES.to_string(), likes.iter().copied().map(Some).collect()),
        ])
    }

    /// Returns the shape as (`n_rows`, `n_cols`).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Returns the units of `views` / `likes`.
    #[must_use]
    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub(crate) fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    /// Returns the column names in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Returns true if a column with this name exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Returns a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::MissingColumn`] if the column doesn't exist.
    pub fn column(&self, name: &str) -> Result<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
            .ok_or_else(|| MetricsError::MissingColumn {
                name: name.to_string(),
            })
    }

    /// Returns the complete values of a column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is absent or holds a missing value.
    pub fn values(&self, name: &str) -> Result<Vec<f64>> {
        self.column(name)?
            .iter()
            .enumerate()
            .map(|(row, v)| {
                v.ok_or_else(|| MetricsError::MissingValue {
                    column: name.to_string(),
                    row,
                })
            })
            .collect()
    }

    /// Fails with [`MetricsError::MissingColumn`] for the first absent name.
    ///
    /// # Errors
    ///
    /// Returns an error if any column is absent.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.column(name)?;
        }
        Ok(())
    }

    /// Returns a row as a vector of cells.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of bounds.
    pub fn row(&self, idx: usize) -> Result<Vec<Option<f64>>> {
        if idx >= self.n_rows {
            return Err(format!("row index {idx} out of bounds (len={})", self.n_rows).into());
        }
        Ok(self.columns.iter().map(|(_, col)| col[idx]).collect())
    }

    /// Returns true if any cell in any column is missing.
    #[must_use]
    pub fn has_missing(&self) -> bool {
        self.columns
            .iter()
            .any(|(_, col)| col.iter().any(Option::is_none))
    }

    /// Stacks the named columns into a feature matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if a column is absent or holds a missing value.
    pub fn to_matrix(&self, names: &[&str]) -> Result<Matrix<f64>> {
        let values = names
            .iter()
            .map(|name| self.values(name))
            .collect::<Result<Vec<_>>>()?;
        let slices: Vec<&[f64]> = values.iter().map(Vec::as_slice).collect();
        Matrix::from_columns(&slices).map_err(Into::into)
    }

    /// Iterates over columns as (name, cells) pairs.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Sets a complete column, replacing an existing one of the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if the length doesn't match or the name is empty.
    pub fn set_column(&mut self, name: &str, data: Vec<f64>) -> Result<()> {
        if data.len() != self.n_rows {
            return Err(MetricsError::dimension_mismatch(name, self.n_rows, data.len()));
        }
        if name.is_empty() {
            return Err("Column name cannot be empty".into());
        }

        let cells: Column = data.into_iter().map(Some).collect();
        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some((_, col)) => *col = cells,
            None => self.columns.push((name.to_string(), cells)),
        }
        Ok(())
    }

    /// Drops a column by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the column doesn't exist or is the last column.
    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        if self.columns.len() == 1 {
            return Err("Cannot drop the last column".into());
        }

        let idx = self
            .columns
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| MetricsError::MissingColumn {
                name: name.to_string(),
            })?;

        self.columns.remove(idx);
        Ok(())
    }

    /// Keeps the rows whose mask entry is true.
    pub(crate) fn retain_rows(mut self, keep: &[bool]) -> Self {
        debug_assert_eq!(keep.len(), self.n_rows);
        for (_, col) in &mut self.columns {
            let mut mask = keep.iter();
            col.retain(|_| mask.next().copied().unwrap_or(false));
        }
        self.n_rows = keep.iter().filter(|&&k| k).count();
        self
    }

    /// Counts the ones in a 0/1 flag column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column doesn't exist.
    pub fn count_flagged(&self, name: &str) -> Result<usize> {
        Ok(self
            .column(name)?
            .iter()
            .filter(|v| matches!(v, Some(f) if *f == 1.0))
            .count())
    }

    /// Returns descriptive statistics for all columns.
    #[must_use]
    pub fn describe(&self) -> Vec<ColumnStats> {
        self.columns
            .iter()
            .map(|(name, col)| ColumnStats::from_cells(name, col))
            .collect()
    }

    /// Returns descriptive statistics for one column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column doesn't exist.
    pub fn column_summary(&self, name: &str) -> Result<ColumnStats> {
        Ok(ColumnStats::from_cells(name, self.column(name)?))
    }
}

/// Descriptive statistics for a column, ignoring missing cells.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ColumnStats {
    /// Column name.
    pub name: String,
    /// Number of present values.
    pub count: usize,
    /// Mean value.
    pub mean: f64,
    /// Sample standard deviation (n - 1).
    pub std: f64,
    /// Minimum value.
    pub min: f64,
    /// Median value.
    pub median: f64,
    /// Maximum value.
    pub max: f64,
}

impl ColumnStats {
    fn from_cells(name: &str, cells: &[Option<f64>]) -> Self {
        let mut sorted: Vec<f64> = cells.iter().flatten().copied().collect();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        if count == 0 {
            return Self {
                name: name.to_string(),
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                median: f64::NAN,
                max: f64::NAN,
            };
        }

        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Self {
            name: name.to_string(),
            count,
            mean,
            std,
            min: sorted[0],
            median,
            max: sorted[count - 1],
        }
    }
}

#[cfg(test)]
#[path = "data_tests.rs"]
mod tests;
