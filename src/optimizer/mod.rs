//! Optimization algorithms for SVM
//!
//! This module ties a kernel to the SMO solver and turns the solved dual
//! into a model that can classify new points.

pub mod hyperplane;

pub use self::hyperplane::*;

use crate::core::{OptimizationResult, OptimizerConfig, Prediction, Result, SVMError, SVMModel};
use crate::data::DenseDataset;
use crate::kernel::Kernel;
use crate::solver::SMOSolver;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::sync::Arc;

/// High-level SVM optimizer that integrates kernel functions and solving algorithms
pub struct SVMOptimizer<K: Kernel> {
    kernel: Arc<K>,
    config: OptimizerConfig,
}

impl<K: Kernel> SVMOptimizer<K> {
    /// Create a new SVM optimizer with the given kernel and configuration
    pub fn new(kernel: K, config: OptimizerConfig) -> Self {
        Self {
            kernel: Arc::new(kernel),
            config,
        }
    }

    /// Create a new SVM optimizer with default configuration
    pub fn with_kernel(kernel: K) -> Self {
        Self::new(kernel, OptimizerConfig::default())
    }

    /// Train an SVM model on the given dataset
    pub fn train(&self, dataset: &DenseDataset) -> Result<TrainedSVM<K>> {
        self.train_arrays(dataset.features(), dataset.labels())
    }

    /// Train on a feature matrix and its ±1 labels
    pub fn train_arrays(
        &self,
        features: ArrayView2<f64>,
        labels: ArrayView1<f64>,
    ) -> Result<TrainedSVM<K>> {
        let solver = SMOSolver::new(Arc::clone(&self.kernel), self.config.clone());
        let result = solver.solve(features, labels)?;

        Ok(TrainedSVM::new(
            Arc::clone(&self.kernel),
            features,
            labels,
            result,
        ))
    }

    /// Get the optimizer configuration
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Get the kernel
    pub fn kernel(&self) -> &K {
        &self.kernel
    }
}

/// A trained SVM model that can make predictions
///
/// Only the support vectors are kept. For the linear kernel the weight vector
/// is also materialized and used for prediction.
pub struct TrainedSVM<K: Kernel> {
    kernel: Arc<K>,
    support_vectors: Array2<f64>,
    /// alpha_i * y_i for each support vector
    dual_coef: Array1<f64>,
    alpha: Array1<f64>,
    bias: f64,
    support_indices: Vec<usize>,
    iterations: usize,
    converged: bool,
    objective_value: f64,
    hyperplane: Option<Hyperplane>,
}

impl<K: Kernel> TrainedSVM<K> {
    pub(crate) fn new(
        kernel: Arc<K>,
        features: ArrayView2<f64>,
        labels: ArrayView1<f64>,
        result: OptimizationResult,
    ) -> Self {
        let indices = &result.support_vectors;
        let support_vectors = features.select(Axis(0), indices);
        let alpha = result.alpha.select(Axis(0), indices);
        let dual_coef = &alpha * &labels.select(Axis(0), indices);

        let hyperplane = kernel
            .is_linear()
            .then(|| Hyperplane::from_dual(features, labels, result.alpha.view(), result.b));

        Self {
            kernel,
            support_vectors,
            dual_coef,
            alpha,
            bias: result.b,
            support_indices: result.support_vectors,
            iterations: result.iterations,
            converged: result.converged,
            objective_value: result.objective_value,
            hyperplane,
        }
    }

    /// Get the decision function value for a feature vector
    pub fn decision_function(&self, x: ArrayView1<f64>) -> f64 {
        match &self.hyperplane {
            Some(plane) => plane.decision(x),
            None => self.kernel_decision_function(x),
        }
    }

    /// Σ alpha_i y_i K(x_i, x) + b over the support vectors
    pub fn kernel_decision_function(&self, x: ArrayView1<f64>) -> f64 {
        if self.support_vectors.nrows() == 0 {
            return self.bias;
        }
        self.kernel
            .evaluate(self.support_vectors.view(), x)
            .dot(&self.dual_coef)
            + self.bias
    }

    /// Decision value with the input length checked against the training data
    pub fn try_decision_function(&self, x: ArrayView1<f64>) -> Result<f64> {
        if x.len() != self.dim() {
            return Err(SVMError::DimensionMismatch {
                expected: self.dim(),
                actual: x.len(),
            });
        }
        Ok(self.decision_function(x))
    }

    /// Feature dimensionality seen during training
    pub fn dim(&self) -> usize {
        self.support_vectors.ncols()
    }

    /// Get the support vectors, one per row
    pub fn support_vectors(&self) -> ArrayView2<'_, f64> {
        self.support_vectors.view()
    }

    /// Get the alpha values for support vectors
    pub fn alpha_values(&self) -> ArrayView1<'_, f64> {
        self.alpha.view()
    }

    /// Get the indices of support vectors in the original training set
    pub fn support_vector_indices(&self) -> &[usize] {
        &self.support_indices
    }

    /// Weight vector, present for the linear kernel only
    pub fn hyperplane(&self) -> Option<&Hyperplane> {
        self.hyperplane.as_ref()
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }
}

impl<K: Kernel> SVMModel for TrainedSVM<K> {
    fn predict(&self, x: ArrayView1<f64>) -> Prediction {
        Prediction::from_decision(self.decision_function(x))
    }

    fn n_support_vectors(&self) -> usize {
        self.support_indices.len()
    }

    fn bias(&self) -> f64 {
        self.bias
    }
}
