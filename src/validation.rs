//! Input validation: required columns and target encoding.
//!
//! # Example
//!
//! ```
//! use beneish::data::DataFrame;
//! use beneish::validation::validate;
//!
//! let csv = "DSRI,GMI,AQI,SGI,DEPI,SGAI,ACCR,LEVI,Manipulator\n\
//!            1.1,0.9,1.0,1.2,1.0,0.9,0.02,1.0,No\n\
//!            1.9,1.3,1.4,1.7,1.1,1.0,0.09,1.1,Yes\n";
//! let df = DataFrame::from_csv_reader(csv.as_bytes(), "inline").expect("parse");
//! let dataset = validate(&df).expect("all columns present");
//! assert_eq!(dataset.labels(), &[0, 1]);
//! assert_eq!(dataset.features().shape(), (2, 8));
//! ```

use crate::data::{Column, DataFrame};
use crate::error::{BeneishError, Result};
use crate::primitives::Matrix;

/// The eight Beneish M-Score ratios, in model input order.
pub const FEATURE_COLUMNS: [&str; 8] = [
    "DSRI", "GMI", "AQI", "SGI", "DEPI", "SGAI", "ACCR", "LEVI",
];

/// The binary target column.
pub const TARGET_COLUMN: &str = "Manipulator";

/// Text label encoded as 1.
pub const POSITIVE_LABEL: &str = "Yes";

/// Text label encoded as 0.
pub const NEGATIVE_LABEL: &str = "No";

/// Validated feature matrix and 0/1 labels.
#[derive(Debug, Clone)]
pub struct Dataset {
    features: Matrix<f32>,
    labels: Vec<usize>,
}

impl Dataset {
    /// Pairs a feature matrix with labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the row counts differ or a label is not 0/1.
    pub fn new(features: Matrix<f32>, labels: Vec<usize>) -> Result<Self> {
        if features.n_rows() != labels.len() {
            return Err(BeneishError::dimension_mismatch(
                "labels",
                features.n_rows(),
                labels.len(),
            ));
        }
        if let Some(row) = labels.iter().position(|&l| l > 1) {
            return Err(BeneishError::InvalidLabel {
                row,
                value: labels[row].to_string(),
            });
        }
        Ok(Self { features, labels })
    }

    /// Features in [`FEATURE_COLUMNS`] order.
    #[must_use]
    pub fn features(&self) -> &Matrix<f32> {
        &self.features
    }

    /// Encoded labels.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.labels.len()
    }

    /// Rows per class as `[negatives, positives]`.
    #[must_use]
    pub fn class_counts(&self) -> [usize; 2] {
        let positives = self.labels.iter().filter(|&&l| l == 1).count();
        [self.labels.len() - positives, positives]
    }
}

/// Names every required column absent from `df`, features first.
#[must_use]
pub fn missing_columns(df: &DataFrame) -> Vec<String> {
    FEATURE_COLUMNS
        .iter()
        .chain(std::iter::once(&TARGET_COLUMN))
        .filter(|name| !df.has_column(name))
        .map(|name| (*name).to_string())
        .collect()
}

/// Checks the schema, extracts the features and encodes the target.
///
/// # Errors
///
/// - [`BeneishError::Schema`] listing every missing required column.
/// - [`BeneishError::InvalidLabel`] for a target value outside Yes/No/0/1.
/// - [`BeneishError::Load`] if a feature column is not numeric or has blanks.
pub fn validate(df: &DataFrame) -> Result<Dataset> {
    let missing = missing_columns(df);
    if !missing.is_empty() {
        tracing::debug!(?missing, "required columns absent");
        return Err(BeneishError::Schema { missing });
    }

    let features = df.to_matrix(&FEATURE_COLUMNS)?;
    let labels = encode_labels(df.column(TARGET_COLUMN)?)?;

    let dataset = Dataset::new(features, labels)?;
    let [negatives, positives] = dataset.class_counts();
    tracing::info!(
        rows = dataset.n_rows(),
        negatives,
        positives,
        "features and target extracted"
    );
    Ok(dataset)
}

/// Maps the target column to 0/1.
///
/// Text values must be exactly `No` or `Yes` after trimming. Numeric values
/// pass through and must already be 0 or 1.
///
/// # Errors
///
/// Returns [`BeneishError::InvalidLabel`] naming the first offending row.
pub fn encode_labels(column: &Column) -> Result<Vec<usize>> {
    match column {
        Column::Text(values) => values
            .iter()
            .enumerate()
            .map(|(row, raw)| match raw.trim() {
                NEGATIVE_LABEL => Ok(0),
                POSITIVE_LABEL => Ok(1),
                other => Err(BeneishError::InvalidLabel {
                    row,
                    value: other.to_string(),
                }),
            })
            .collect(),
        Column::Numeric(values) => values
            .iter()
            .enumerate()
            .map(|(row, &v)| {
                if v == 0.0 {
                    Ok(0)
                } else if v == 1.0 {
                    Ok(1)
                } else {
                    Err(BeneishError::InvalidLabel {
                        row,
                        value: if v.is_nan() {
                            String::new()
                        } else {
                            v.to_string()
                        },
                    })
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Vector;

    fn frame(columns: &[&str], target: Column) -> DataFrame {
        let n = target.len();
        let mut cols: Vec<(String, Column)> = columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let values: Vec<f32> = (0..n).map(|r| (i * 10 + r) as f32 / 10.0).collect();
                ((*name).to_string(), Column::Numeric(Vector::from_vec(values)))
            })
            .collect();
        cols.push((TARGET_COLUMN.to_string(), target));
        DataFrame::new(cols).expect("valid frame")
    }

    fn text(values: &[&str]) -> Column {
        Column::Text(values.iter().map(|s| (*s).to_string()).collect())
    }

    #[test]
    fn test_validate_text_target() {
        let df = frame(&FEATURE_COLUMNS, text(&["No", "Yes", " No "]));
        let ds = validate(&df).expect("valid");
        assert_eq!(ds.labels(), &[0, 1, 0]);
        assert_eq!(ds.features().shape(), (3, 8));
        assert_eq!(ds.class_counts(), [2, 1]);
    }

    #[test]
    fn test_validate_numeric_target_passes_through() {
        let df = frame(
            &FEATURE_COLUMNS,
            Column::Numeric(Vector::from_slice(&[1.0, 0.0, 1.0])),
        );
        let ds = validate(&df).expect("valid");
        assert_eq!(ds.labels(), &[1, 0, 1]);
    }

    #[test]
    fn test_feature_order_is_fixed() {
        // Reversed column order in the file must not change matrix order.
        let mut reversed = FEATURE_COLUMNS;
        reversed.reverse();
        let df = frame(&reversed, text(&["No", "Yes"]));
        let ds = validate(&df).expect("valid");
        let dsri = df.to_matrix(&["DSRI"]).expect("numeric");
        assert_eq!(ds.features().get(0, 0), dsri.get(0, 0));
        assert_eq!(ds.features().get(1, 0), dsri.get(1, 0));
    }

    #[test]
    fn test_schema_error_names_every_missing_column() {
        let df = DataFrame::new(vec![
            (
                "DSRI".to_string(),
                Column::Numeric(Vector::from_slice(&[1.0])),
            ),
            (
                "LEVI".to_string(),
                Column::Numeric(Vector::from_slice(&[1.0])),
            ),
        ])
        .expect("valid frame");

        match validate(&df) {
            Err(BeneishError::Schema { missing }) => assert_eq!(
                missing,
                vec!["GMI", "AQI", "SGI", "DEPI", "SGAI", "ACCR", "Manipulator"]
            ),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_text_label() {
        let df = frame(&FEATURE_COLUMNS, text(&["No", "Maybe"]));
        match validate(&df) {
            Err(BeneishError::InvalidLabel { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "Maybe");
            }
            other => panic!("expected invalid label, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_numeric_label() {
        let col = Column::Numeric(Vector::from_slice(&[0.0, 2.0]));
        assert!(matches!(
            encode_labels(&col),
            Err(BeneishError::InvalidLabel { row: 1, .. })
        ));
    }

    #[test]
    fn test_label_matching_is_case_sensitive() {
        assert!(encode_labels(&text(&["yes"])).is_err());
    }

    #[test]
    fn test_dataset_new_rejects_mismatch() {
        let x = Matrix::from_vec(2, 1, vec![0.0, 1.0]).expect("matrix");
        assert!(Dataset::new(x, vec![0]).is_err());
    }
}
