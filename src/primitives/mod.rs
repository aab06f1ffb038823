//! Core compute primitives (Vector, Matrix).
//!
//! These types carry feature matrices and label vectors between the
//! workflow stages.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
