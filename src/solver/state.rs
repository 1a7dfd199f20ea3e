//! Mutable record of a single training run
//!
//! The state owns the dual coefficients, the bias, the error cache and the
//! precomputed kernel matrix, and borrows the training data it was built from.
//! Pair selection and pair updates receive it explicitly, so independent runs
//! never share anything.

use crate::cache::ErrorCache;
use crate::core::{OptimizationResult, Result, SVMError};
use crate::kernel::{Kernel, KernelMatrix};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Dual coefficients, bias and caches for one SMO run
#[derive(Debug, Clone)]
pub struct OptimizationState<'a> {
    features: ArrayView2<'a, f64>,
    labels: ArrayView1<'a, f64>,
    c: f64,
    tolerance: f64,
    alpha: Array1<f64>,
    b: f64,
    errors: ErrorCache,
    kernel: KernelMatrix,
}

impl<'a> OptimizationState<'a> {
    /// Validate the inputs and precompute the kernel matrix.
    ///
    /// Checks run from cheapest to most expensive: hyperparameters, kernel
    /// parameters, labels, feature values. The N² kernel evaluations only
    /// happen once everything has passed.
    pub fn new<K: Kernel + ?Sized>(
        features: ArrayView2<'a, f64>,
        labels: ArrayView1<'a, f64>,
        c: f64,
        tolerance: f64,
        kernel: &K,
    ) -> Result<Self> {
        if !(c.is_finite() && c > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "C must be a positive finite number, got {c}"
            )));
        }
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "tolerance must be a positive finite number, got {tolerance}"
            )));
        }
        kernel.validate()?;
        validate_training_data(features, labels)?;

        let n = features.nrows();
        Ok(Self {
            features,
            labels,
            c,
            tolerance,
            alpha: Array1::zeros(n),
            b: 0.0,
            errors: ErrorCache::new(n),
            kernel: KernelMatrix::new(kernel, features),
        })
    }

    /// Number of training examples
    pub fn n(&self) -> usize {
        self.labels.len()
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn features(&self) -> ArrayView2<'a, f64> {
        self.features
    }

    pub fn labels(&self) -> ArrayView1<'a, f64> {
        self.labels
    }

    pub fn label(&self, i: usize) -> f64 {
        self.labels[i]
    }

    pub fn kernel(&self) -> &KernelMatrix {
        &self.kernel
    }

    pub fn alpha(&self, i: usize) -> f64 {
        self.alpha[i]
    }

    pub fn alphas(&self) -> ArrayView1<'_, f64> {
        self.alpha.view()
    }

    pub fn bias(&self) -> f64 {
        self.b
    }

    pub fn error_cache(&self) -> &ErrorCache {
        &self.errors
    }

    pub(crate) fn set_alpha(&mut self, i: usize, value: f64) {
        debug_assert!(
            (0.0..=self.c).contains(&value),
            "alpha[{i}] = {value} outside [0, {}]",
            self.c
        );
        self.alpha[i] = value;
    }

    pub(crate) fn set_bias(&mut self, b: f64) {
        self.b = b;
    }

    /// Decision value for training example `k`, read off kernel column k
    pub fn decision_value(&self, k: usize) -> f64 {
        let column = self.kernel.column(k);
        let sum: f64 = self
            .alpha
            .iter()
            .zip(self.labels.iter())
            .zip(column.iter())
            .map(|((&a, &y), &kv)| a * y * kv)
            .sum();
        sum + self.b
    }

    /// E_k = f(x_k) - y_k under the current alphas and bias
    pub fn error(&self, k: usize) -> f64 {
        self.decision_value(k) - self.labels[k]
    }

    /// Store a known error for `k` and mark the entry valid
    pub(crate) fn record_error(&mut self, k: usize, error: f64) {
        self.errors.set(k, error);
    }

    /// Recompute E_k, store it and return it
    pub(crate) fn refresh_error(&mut self, k: usize) -> f64 {
        let error = self.error(k);
        self.errors.set(k, error);
        error
    }

    /// Whether alpha_i lies strictly inside (0, C)
    pub fn is_unbound(&self, i: usize) -> bool {
        let a = self.alpha[i];
        a > 0.0 && a < self.c
    }

    pub fn unbound_indices(&self) -> Vec<usize> {
        (0..self.n()).filter(|&i| self.is_unbound(i)).collect()
    }

    /// Indices with alpha > 0
    pub fn support_vector_indices(&self) -> Vec<usize> {
        self.alpha
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| (a > 0.0).then_some(i))
            .collect()
    }

    /// Σ alpha_i * y_i, which every pair update leaves unchanged
    pub fn label_weighted_sum(&self) -> f64 {
        self.alpha.dot(&self.labels)
    }

    /// Dual objective Σα - ½ ΣΣ α_i α_j y_i y_j K(i, j)
    pub fn objective(&self) -> f64 {
        let weighted = &self.alpha * &self.labels;
        let quadratic = weighted.dot(&self.kernel.view().dot(&weighted));
        self.alpha.sum() - 0.5 * quadratic
    }

    /// Package the final coefficients
    pub fn into_result(self, iterations: usize, converged: bool) -> OptimizationResult {
        OptimizationResult {
            support_vectors: self.support_vector_indices(),
            objective_value: self.objective(),
            alpha: self.alpha,
            b: self.b,
            iterations,
            converged,
        }
    }
}

/// Check the shape and values of a training set.
///
/// Labels must be exactly -1 or +1 and every feature value finite.
pub fn validate_training_data(features: ArrayView2<f64>, labels: ArrayView1<f64>) -> Result<()> {
    if features.nrows() == 0 {
        return Err(SVMError::EmptyDataset);
    }
    if labels.len() != features.nrows() {
        return Err(SVMError::DimensionMismatch {
            expected: features.nrows(),
            actual: labels.len(),
        });
    }
    if let Some(&bad) = labels.iter().find(|&&y| y != 1.0 && y != -1.0) {
        return Err(SVMError::InvalidLabel(bad));
    }
    if features.nrows() < 2 {
        return Err(SVMError::InvalidDataset(
            "at least two examples are required to optimize a pair".to_string(),
        ));
    }
    if let Some(((row, col), value)) = features.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(SVMError::InvalidDataset(format!(
            "non-finite feature value {value} at row {row}, column {col}"
        )));
    }
    Ok(())
}
