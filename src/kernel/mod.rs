//! Kernel functions for SVM

pub mod linear;
pub mod matrix;
pub mod rbf;
pub mod spec;
pub mod traits;

pub use self::linear::*;
pub use self::matrix::*;
pub use self::spec::*;
pub use self::traits::*;
