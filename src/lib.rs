//! Beneish: earnings-manipulation screening on the Beneish M-Score ratios.
//!
//! Loads a spreadsheet of the eight Beneish ratios plus a `Manipulator`
//! target, benches a fixed roster of classifiers on a stratified split,
//! grid-searches the boosted-tree family and attributes its predictions with
//! TreeSHAP.
//!
//! # Quick Start
//!
//! ```
//! use beneish::prelude::*;
//!
//! let x = Matrix::from_vec(6, 1, vec![0.0, 0.2, 0.4, 5.0, 5.2, 5.4]).unwrap();
//! let y = vec![0, 0, 0, 1, 1, 1];
//!
//! let mut model = GaussianNB::new();
//! model.fit(&x, &y).unwrap();
//! assert_eq!(model.predict(&x).unwrap(), y);
//!
//! let record = evaluate("Naive Bayes", &y, &model.predict(&x).unwrap(), &model.predict_proba(&x).unwrap()).unwrap();
//! assert_eq!(record.accuracy, 1.0);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`data`]: DataFrame with CSV and workbook loading
//! - [`validation`]: Required columns and target encoding
//! - [`preprocessing`]: Standard scaling and the prepared train/test split
//! - [`model_selection`]: Stratified splitting, K-fold, grid search
//! - [`classification`]: SVM, k-NN, Gaussian naive Bayes
//! - [`tree`]: Decision trees and gradient-boosted trees
//! - [`ensemble`]: AdaBoost
//! - [`metrics`]: Accuracy, precision, recall, F1, ROC AUC
//! - [`interpret`]: TreeSHAP attributions
//! - [`bench`]: The fixed model roster
//! - [`tuning`]: Boosted-tree grid search
//! - [`explain`]: Attributions for the tuned model
//! - [`session`]: Interactive session state
//! - [`config`]: Dashboard configuration
//! - [`report`]: Terminal tables and charts

pub mod bench;
pub mod classification;
pub mod config;
pub mod data;
pub mod ensemble;
pub mod error;
pub mod explain;
pub mod interpret;
pub mod metrics;
pub mod model_selection;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod report;
pub mod session;
pub mod traits;
pub mod tree;
pub mod tuning;
pub mod validation;

pub use error::{BeneishError, Result};
pub use primitives::{Matrix, Vector};
pub use traits::{Classifier, Transformer};
