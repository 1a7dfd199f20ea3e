//! Kernel trait definition

use crate::core::Result;
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Kernel function trait
///
/// A kernel function K(x, y) must satisfy Mercer's condition to be valid for SVM.
/// This trait provides the interface for different kernel implementations.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64;

    /// Evaluate every row of `data` against `reference`, giving one entry per row.
    fn evaluate(&self, data: ArrayView2<f64>, reference: ArrayView1<f64>) -> Array1<f64> {
        data.rows()
            .into_iter()
            .map(|row| self.compute(row, reference))
            .collect()
    }

    /// Whether K(x, y) is the plain dot product, which allows the
    /// decision function to collapse into an explicit weight vector.
    fn is_linear(&self) -> bool {
        false
    }

    /// Reject kernel parameters that cannot produce a valid kernel.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
