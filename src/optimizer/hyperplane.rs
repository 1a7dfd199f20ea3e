//! Explicit separating hyperplane for the linear kernel
//!
//! With K(x, y) = x^T y the decision function Σ alpha_i y_i K(x_i, x) + b
//! collapses to w^T x + b with w = Σ alpha_i y_i x_i, so prediction costs one
//! dot product instead of one kernel evaluation per support vector.

use crate::core::{Prediction, Result, SVMError};
use ndarray::{Array1, ArrayView1, ArrayView2};

#[derive(Debug, Clone, PartialEq)]
pub struct Hyperplane {
    weights: Array1<f64>,
    bias: f64,
}

impl Hyperplane {
    pub fn new(weights: Array1<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    /// w = Σ alpha_i * y_i * x_i over the training set
    pub fn from_dual(
        features: ArrayView2<f64>,
        labels: ArrayView1<f64>,
        alpha: ArrayView1<f64>,
        bias: f64,
    ) -> Self {
        let coefficients = &alpha * &labels;
        Self::new(features.t().dot(&coefficients), bias)
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn dim(&self) -> usize {
        self.weights.len()
    }

    /// w^T x + b
    pub fn decision(&self, x: ArrayView1<f64>) -> f64 {
        self.weights.dot(&x) + self.bias
    }

    pub fn try_decision(&self, x: ArrayView1<f64>) -> Result<f64> {
        if x.len() != self.dim() {
            return Err(SVMError::DimensionMismatch {
                expected: self.dim(),
                actual: x.len(),
            });
        }
        Ok(self.decision(x))
    }

    pub fn predict(&self, x: ArrayView1<f64>) -> Prediction {
        Prediction::from_decision(self.decision(x))
    }
}
