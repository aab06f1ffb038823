//! Spreadsheet ingestion into a [`DataFrame`]: CSV and Excel workbooks.

use super::{Column, DataFrame};
use crate::error::{BeneishError, Result};
use crate::primitives::Vector;
use calamine::{open_workbook_auto, Data, Reader};
use std::io::Read;
use std::path::Path;

/// File extensions read as workbooks; anything else is read as CSV.
const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

impl DataFrame {
    /// Reads a table, choosing the reader from the file extension.
    ///
    /// `.xlsx`, `.xlsm`, `.xls` and `.ods` files are read as workbooks (first
    /// sheet); everything else as CSV.
    ///
    /// # Errors
    ///
    /// Returns [`BeneishError::Load`] under the conditions of the chosen reader.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension {
            Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) => {
                Self::from_workbook_path(path)
            }
            _ => Self::from_csv_path(path),
        }
    }

    /// Reads the first sheet of a workbook. The first used row is the header.
    ///
    /// Cells go through the same inference as CSV fields, so a column of
    /// numbers with gaps is numeric and anything else is text. Rows with no
    /// value in any cell are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`BeneishError::Load`] if the workbook cannot be opened or
    /// parsed, has no sheet, or the first sheet has no header or data rows.
    pub fn from_workbook_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let load_err = |message: String| BeneishError::Load {
            path: source.clone(),
            message,
        };

        let mut workbook = open_workbook_auto(path)
            .map_err(|e| load_err(format!("Failed to open workbook: {e}")))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| load_err("workbook has no sheets".to_string()))?
            .map_err(|e| load_err(format!("Failed to read first sheet: {e}")))?;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|row| row.iter().map(cell_text).collect())
            .unwrap_or_default();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for row in rows.filter(|row| row.iter().any(|c| !matches!(c, Data::Empty))) {
            for (col, cell) in cells.iter_mut().zip(row) {
                col.push(cell_text(cell));
            }
        }

        let df = Self::from_cells(headers, cells, &source)?;
        tracing::debug!(
            source = %source,
            rows = df.n_rows(),
            cols = df.n_cols(),
            "parsed workbook sheet"
        );
        Ok(df)
    }

    /// Reads a CSV file with a header row.
    ///
    /// Every column is kept. A column whose non-empty cells all parse as
    /// numbers becomes [`Column::Numeric`] with blanks stored as `NaN`; any
    /// other column becomes [`Column::Text`].
    ///
    /// # Errors
    ///
    /// Returns [`BeneishError::Load`] if the file cannot be opened, a row has
    /// the wrong number of fields, or the file has no data rows.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();

        let file = std::fs::File::open(path).map_err(|e| BeneishError::Load {
            path: source.clone(),
            message: format!("Failed to open CSV: {e}"),
        })?;

        Self::from_csv_reader(file, &source)
    }

    /// Reads CSV from any reader; `source` names it in error messages.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DataFrame::from_csv_path`].
    pub fn from_csv_reader<R: Read>(reader: R, source: &str) -> Result<Self> {
        let load_err = |message: String| BeneishError::Load {
            path: source.to_string(),
            message,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| load_err(format!("Failed to read headers: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        let mut line = 2;
        for result in reader.records() {
            let record =
                result.map_err(|e| load_err(format!("Failed to read row at line {line}: {e}")))?;
            for (col, value) in cells.iter_mut().zip(record.iter()) {
                col.push(value.to_string());
            }
            line += 1;
        }

        let df = Self::from_cells(headers, cells, source)?;
        tracing::debug!(
            source,
            rows = df.n_rows(),
            cols = df.n_cols(),
            "parsed CSV table"
        );
        Ok(df)
    }

    fn from_cells(headers: Vec<String>, cells: Vec<Vec<String>>, source: &str) -> Result<Self> {
        let load_err = |message: String| BeneishError::Load {
            path: source.to_string(),
            message,
        };

        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(load_err("file has no header row".to_string()));
        }
        if cells.first().map_or(true, Vec::is_empty) {
            return Err(load_err("file contains no data rows".to_string()));
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| (name, infer_column(raw)))
            .collect();

        let df = DataFrame::new(columns).map_err(|e| load_err(e.to_string()))?;
        Ok(df.with_source(source))
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        other => other.to_string(),
    }
}

fn infer_column(raw: Vec<String>) -> Column {
    let mut values = Vec::with_capacity(raw.len());
    let mut any_number = false;

    for cell in &raw {
        if cell.is_empty() {
            values.push(f32::NAN);
            continue;
        }
        match cell.parse::<f32>() {
            Ok(v) if v.is_finite() => {
                any_number = true;
                values.push(v);
            }
            _ => return Column::Text(raw),
        }
    }

    if any_number {
        Column::Numeric(Vector::from_vec(values))
    } else {
        Column::Text(raw)
    }
}
