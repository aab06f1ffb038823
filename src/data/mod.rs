//! `DataFrame` module for named column containers.
//!
//! Holds the uploaded spreadsheet as it was read: every column kept, numeric
//! columns as `f32` (blanks as `NaN`), everything else as text.

mod loader;

use crate::error::{BeneishError, Result};
use crate::primitives::{Matrix, Vector};

/// One named column of a [`DataFrame`].
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Every non-empty cell parsed as a number; blanks are `NaN`.
    Numeric(Vector<f32>),
    /// Any column with at least one non-numeric cell.
    Text(Vec<String>),
}

impl Column {
    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    /// Returns true if the column has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true for numeric columns.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// Renders one cell for display; blanks render as an empty string.
    #[must_use]
    pub fn display_cell(&self, idx: usize) -> String {
        match self {
            Column::Numeric(v) => {
                let value = v[idx];
                if value.is_nan() {
                    String::new()
                } else {
                    format!("{value:.4}")
                }
            }
            Column::Text(v) => v[idx].clone(),
        }
    }
}

/// A minimal `DataFrame` with named columns.
///
/// # Examples
///
/// ```
/// use beneish::data::{Column, DataFrame};
/// use beneish::primitives::Vector;
///
/// let df = DataFrame::new(vec![
///     ("DSRI".to_string(), Column::Numeric(Vector::from_slice(&[1.0, 1.2]))),
///     ("Manipulator".to_string(), Column::Text(vec!["No".into(), "Yes".into()])),
/// ])
/// .expect("DataFrame creation should succeed with valid columns");
/// assert_eq!(df.shape(), (2, 2));
/// ```
#[derive(Debug, Clone)]
pub struct DataFrame {
    columns: Vec<(String, Column)>,
    n_rows: usize,
    source: String,
}

impl DataFrame {
    /// Creates a new `DataFrame` from named columns.
    ///
    /// # Errors
    ///
    /// Returns an error if columns have different lengths, a name is empty or
    /// duplicated, or no column is given.
    pub fn new(columns: Vec<(String, Column)>) -> Result<Self> {
        if columns.is_empty() {
            return Err("DataFrame must have at least one column".into());
        }

        let n_rows = columns[0].1.len();

        for (name, col) in &columns {
            if col.len() != n_rows {
                return Err("All columns must have the same length".into());
            }
            if name.is_empty() {
                return Err("Column names cannot be empty".into());
            }
        }

        let mut names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        names.sort_unstable();
        for i in 1..names.len() {
            if names[i] == names[i - 1] {
                return Err(format!("Duplicate column name '{}'", names[i]).into());
            }
        }

        Ok(Self {
            columns,
            n_rows,
            source: "<memory>".to_string(),
        })
    }

    /// Records where the table was read from, for error messages.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Where the table was read from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
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

    /// Returns the column names in file order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Whether a column with this exact name exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Returns a reference to a column by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the column doesn't exist.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| BeneishError::Schema {
                missing: vec![name.to_string()],
            })
    }

    /// Stacks the named numeric columns into a row-major matrix.
    ///
    /// Column order follows `names`.
    ///
    /// # Errors
    ///
    /// Returns `Schema` if a column is absent, `Load` if a column is text or
    /// holds a blank cell.
    pub fn to_matrix(&self, names: &[&str]) -> Result<Matrix<f32>> {
        let mut selected = Vec::with_capacity(names.len());
        for &name in names {
            match self.column(name)? {
                Column::Numeric(v) => selected.push((name, v)),
                Column::Text(_) => {
                    return Err(BeneishError::Load {
                        path: self.source.clone(),
                        message: format!("column '{name}' contains non-numeric values"),
                    })
                }
            }
        }

        let mut data = Vec::with_capacity(self.n_rows * names.len());
        for row in 0..self.n_rows {
            for (name, col) in &selected {
                let value = col[row];
                if value.is_nan() {
                    return Err(BeneishError::Load {
                        path: self.source.clone(),
                        message: format!("row {row}, column '{name}' is empty"),
                    });
                }
                data.push(value);
            }
        }

        Matrix::from_vec(self.n_rows, names.len(), data).map_err(Into::into)
    }

    /// Returns the first `n` rows rendered as strings, for the preview table.
    #[must_use]
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        (0..n.min(self.n_rows))
            .map(|row| {
                self.columns
                    .iter()
                    .map(|(_, col)| col.display_cell(row))
                    .collect()
            })
            .collect()
    }

    /// Returns descriptive statistics for the numeric columns.
    #[must_use]
    pub fn describe(&self) -> Vec<ColumnStats> {
        self.columns
            .iter()
            .filter_map(|(name, col)| match col {
                Column::Numeric(v) => Some((name, v)),
                Column::Text(_) => None,
            })
            .map(|(name, col)| {
                let mut present: Vec<f32> =
                    col.iter().copied().filter(|v| !v.is_nan()).collect();
                let values = Vector::from_slice(&present);
                let mean = values.mean();
                let std = values.variance().sqrt();

                present.sort_by(f32::total_cmp);

                let min = present.first().copied().unwrap_or(0.0);
                let max = present.last().copied().unwrap_or(0.0);
                let median = if present.is_empty() {
                    0.0
                } else if present.len() % 2 == 0 {
                    (present[present.len() / 2 - 1] + present[present.len() / 2]) / 2.0
                } else {
                    present[present.len() / 2]
                };

                ColumnStats {
                    name: name.clone(),
                    count: present.len(),
                    missing: col.len() - present.len(),
                    mean,
                    std,
                    min,
                    median,
                    max,
                }
            })
            .collect()
    }
}

/// Descriptive statistics for a numeric column.
#[derive(Debug, Clone)]
pub struct ColumnStats {
    /// Column name.
    pub name: String,
    /// Number of non-blank elements.
    pub count: usize,
    /// Number of blank cells.
    pub missing: usize,
    /// Mean value.
    pub mean: f32,
    /// Standard deviation.
    pub std: f32,
    /// Minimum value.
    pub min: f32,
    /// Median value.
    pub median: f32,
    /// Maximum value.
    pub max: f32,
}

#[cfg(test)]
#[path = "data_tests.rs"]
mod tests;
