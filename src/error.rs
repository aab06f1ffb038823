//! Error types for the detection workflow.
//!
//! Every failure the dashboard can surface is a variant of [`BeneishError`].
//! Area-under-ROC on a single-class partition is deliberately absent: it is
//! resolved locally by the metric record and never becomes an error.

use std::fmt;

/// Main error type for the detection workflow.
///
/// # Examples
///
/// ```
/// use beneish::error::BeneishError;
///
/// let err = BeneishError::Schema {
///     missing: vec!["DSRI".to_string(), "Manipulator".to_string()],
/// };
/// assert!(err.to_string().contains("DSRI, Manipulator"));
/// ```
#[derive(Debug)]
pub enum BeneishError {
    /// Required columns are absent from the uploaded table.
    Schema {
        /// Every missing column, in required order.
        missing: Vec<String>,
    },

    /// A target value cannot be encoded as 0/1.
    InvalidLabel {
        /// Zero-based data row (header excluded).
        row: usize,
        /// Offending raw value.
        value: String,
    },

    /// The spreadsheet could not be read.
    Load {
        /// Source path as given by the user.
        path: String,
        /// Underlying cause.
        message: String,
    },

    /// Explanation requested before a tuned model exists.
    NotReady,

    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid hyperparameter or configuration value.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for BeneishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeneishError::Schema { missing } => {
                write!(
                    f,
                    "The uploaded file is missing required columns: {}",
                    missing.join(", ")
                )
            }
            BeneishError::InvalidLabel { row, value } => {
                write!(
                    f,
                    "Row {row}: target value '{value}' is not one of Yes/No/0/1"
                )
            }
            BeneishError::Load { path, message } => {
                write!(f, "Error loading file {path}: {message}")
            }
            BeneishError::NotReady => {
                write!(
                    f,
                    "Please run hyperparameter tuning first to generate the best model for SHAP analysis"
                )
            }
            BeneishError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Matrix dimension mismatch: expected {expected}, got {actual}"
                )
            }
            BeneishError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            BeneishError::Io(e) => write!(f, "I/O error: {e}"),
            BeneishError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for BeneishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BeneishError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BeneishError {
    fn from(err: std::io::Error) -> Self {
        BeneishError::Io(err)
    }
}

impl From<&str> for BeneishError {
    fn from(msg: &str) -> Self {
        BeneishError::Other(msg.to_string())
    }
}

impl From<String> for BeneishError {
    fn from(msg: String) -> Self {
        BeneishError::Other(msg)
    }
}

impl BeneishError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::Other(format!("empty input: {context}"))
    }

    /// Whether the dashboard should present this as a warning and keep going.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(self, BeneishError::NotReady)
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, BeneishError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_display_lists_every_column() {
        let err = BeneishError::Schema {
            missing: vec!["GMI".to_string(), "LEVI".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("missing required columns"));
        assert!(msg.contains("GMI, LEVI"));
    }

    #[test]
    fn test_invalid_label_display() {
        let err = BeneishError::InvalidLabel {
            row: 7,
            value: "Maybe".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Row 7"));
        assert!(msg.contains("Maybe"));
    }

    #[test]
    fn test_load_display_surfaces_cause() {
        let err = BeneishError::Load {
            path: "data.csv".to_string(),
            message: "No such file".to_string(),
        };
        assert_eq!(err.to_string(), "Error loading file data.csv: No such file");
    }

    #[test]
    fn test_not_ready_is_warning() {
        assert!(BeneishError::NotReady.is_warning());
        assert!(!BeneishError::Other("x".into()).is_warning());
        assert!(BeneishError::NotReady.to_string().contains("tuning first"));
    }

    #[test]
    fn test_invalid_hyperparameter_display() {
        let err = BeneishError::InvalidHyperparameter {
            param: "test_size".to_string(),
            value: "0.7".to_string(),
            constraint: "within [0.1, 0.5]".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("test_size"));
        assert!(msg.contains("0.7"));
        assert!(msg.contains("[0.1, 0.5]"));
    }

    #[test]
    fn test_dimension_mismatch_helper() {
        let err = BeneishError::dimension_mismatch("features", 8, 5);
        assert!(err.to_string().contains("features=8"));
        assert!(err.to_string().contains("got 5"));
    }

    #[test]
    fn test_from_str_and_string() {
        let a: BeneishError = "boom".into();
        let b: BeneishError = String::from("boom").into();
        assert_eq!(a.to_string(), "boom");
        assert_eq!(b.to_string(), "boom");
    }

    #[test]
    fn test_io_source() {
        use std::error::Error;
        let err = BeneishError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("gone"));
    }
}
