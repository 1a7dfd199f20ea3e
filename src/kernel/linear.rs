//! Linear kernel implementation

use crate::kernel::Kernel;
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Linear kernel: K(x, y) = x^T * y
///
/// This is the simplest kernel function, computing the dot product between two vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearKernel;

impl LinearKernel {
    /// Create a new linear kernel
    pub fn new() -> Self {
        Self
    }
}

impl Kernel for LinearKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        x.dot(&y)
    }

    fn evaluate(&self, data: ArrayView2<f64>, reference: ArrayView1<f64>) -> Array1<f64> {
        data.dot(&reference)
    }

    fn is_linear(&self) -> bool {
        true
    }
}
