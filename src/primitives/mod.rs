//! Core compute primitives.
//!
//! The detectors operate on a dense row-major [`Matrix`] built from the
//! dataset's feature columns.

mod matrix;

pub use matrix::Matrix;
