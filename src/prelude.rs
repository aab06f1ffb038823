//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use beneish::prelude::*;
//! ```

pub use crate::classification::{GaussianNB, KNearestNeighbors, SVC};
pub use crate::config::{DashboardConfig, Variant};
pub use crate::data::DataFrame;
pub use crate::ensemble::AdaBoostClassifier;
pub use crate::error::{BeneishError, Result};
pub use crate::metrics::{evaluate, MetricRecord};
pub use crate::preprocessing::StandardScaler;
pub use crate::primitives::{Matrix, Vector};
pub use crate::session::Session;
pub use crate::traits::{Classifier, Transformer};
pub use crate::tree::{DecisionTreeClassifier, GradientBoostingClassifier};
