//! Numeric playing field.

pub mod grid;

pub use grid::*;
