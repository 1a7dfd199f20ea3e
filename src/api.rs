//! High-level API for Support Vector Machine operations
//!
//! This module provides a user-friendly interface for common SVM tasks,
//! including training, prediction, and model evaluation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use plattsvm::api::SVM;
//! use plattsvm::KernelSpec;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Train a model on tab-separated data
//! let svm = SVM::with_kernel(KernelSpec::rbf(2.0)?)
//!     .with_c(0.6)
//!     .with_seed(7)
//!     .train_from_file("train.txt")?;
//!
//! println!("Accuracy: {:.2}%", svm.evaluate_from_file("test.txt")? * 100.0);
//! # Ok(())
//! # }
//! ```

use crate::core::{OptimizerConfig, Prediction, Result, SVMError, SVMModel, SmoVariant};
use crate::data::DenseDataset;
use crate::kernel::{Kernel, KernelSpec};
use crate::optimizer::{Hyperplane, SVMOptimizer, TrainedSVM};
use ndarray::{ArrayView1, ArrayView2};
use std::path::Path;

/// High-level SVM interface with builder pattern
pub struct SVM<K: Kernel = KernelSpec> {
    kernel: K,
    config: OptimizerConfig,
}

impl SVM<KernelSpec> {
    /// Create a new SVM with linear kernel and default parameters
    pub fn new() -> Self {
        Self::with_kernel(KernelSpec::Linear)
    }
}

impl Default for SVM<KernelSpec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Kernel> SVM<K> {
    /// Create SVM with custom kernel
    pub fn with_kernel(kernel: K) -> Self {
        Self {
            kernel,
            config: OptimizerConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set KKT tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Set maximum number of passes
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Seed the random pair selection
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_variant(mut self, variant: SmoVariant) -> Self {
        self.config.variant = variant;
        self
    }

    /// Hard cap on passes for the simplified variant
    pub fn with_pass_limit(mut self, pass_limit: usize) -> Self {
        self.config.pass_limit = pass_limit;
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Train on a dataset
    pub fn train(self, dataset: &DenseDataset) -> Result<TrainedModel<K>> {
        self.train_arrays(dataset.features(), dataset.labels())
    }

    /// Train on a feature matrix and its labels
    pub fn train_arrays(
        self,
        features: ArrayView2<f64>,
        labels: ArrayView1<f64>,
    ) -> Result<TrainedModel<K>> {
        let optimizer = SVMOptimizer::new(self.kernel, self.config);
        let model = optimizer.train_arrays(features, labels)?;
        Ok(TrainedModel { model })
    }

    /// Train from a delimited text file
    pub fn train_from_file<P: AsRef<Path>>(self, path: P) -> Result<TrainedModel<K>> {
        let dataset = DenseDataset::from_file(path)?;
        self.train(&dataset)
    }
}

/// Trained SVM model with high-level prediction interface
pub struct TrainedModel<K: Kernel> {
    model: TrainedSVM<K>,
}

impl<K: Kernel> TrainedModel<K> {
    /// Predict a single feature vector
    pub fn predict(&self, x: ArrayView1<f64>) -> Prediction {
        self.model.predict(x)
    }

    /// Predict every row of a feature matrix
    pub fn predict_batch(&self, xs: ArrayView2<f64>) -> Vec<Prediction> {
        self.model.predict_batch(xs)
    }

    /// Predict from dataset
    pub fn predict_dataset(&self, dataset: &DenseDataset) -> Result<Vec<Prediction>> {
        if dataset.dim() != self.model.dim() {
            return Err(SVMError::DimensionMismatch {
                expected: self.model.dim(),
                actual: dataset.dim(),
            });
        }
        Ok(self.predict_batch(dataset.features()))
    }

    /// Predict from a delimited text file
    pub fn predict_from_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Prediction>> {
        let dataset = DenseDataset::from_file(path)?;
        self.predict_dataset(&dataset)
    }

    /// Fraction of examples whose predicted label matches the given one
    pub fn evaluate(&self, dataset: &DenseDataset) -> Result<f64> {
        Ok(self.evaluate_detailed(dataset)?.accuracy())
    }

    /// Evaluate accuracy from a delimited text file
    pub fn evaluate_from_file<P: AsRef<Path>>(&self, path: P) -> Result<f64> {
        let dataset = DenseDataset::from_file(path)?;
        self.evaluate(&dataset)
    }

    /// Get detailed evaluation metrics
    pub fn evaluate_detailed(&self, dataset: &DenseDataset) -> Result<EvaluationMetrics> {
        let predictions = self.predict_dataset(dataset)?;

        let mut tp = 0; // True positives
        let mut tn = 0; // True negatives
        let mut fp = 0; // False positives
        let mut fn_ = 0; // False negatives

        for (pred, &actual) in predictions.iter().zip(dataset.labels().iter()) {
            match (pred.label > 0.0, actual > 0.0) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
            }
        }

        Ok(EvaluationMetrics::new(tp, tn, fp, fn_))
    }

    /// Get model information
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            n_support_vectors: self.model.n_support_vectors(),
            bias: self.model.bias(),
            support_vector_indices: self.model.support_vector_indices().to_vec(),
            alphas: self.model.alpha_values().to_vec(),
            iterations: self.model.iterations(),
            converged: self.model.converged(),
            objective_value: self.model.objective_value(),
            weights: self.hyperplane().map(|plane| plane.weights().to_vec()),
        }
    }

    /// Explicit weight vector, linear kernel only
    pub fn hyperplane(&self) -> Option<&Hyperplane> {
        self.model.hyperplane()
    }

    /// Get the underlying trained model
    pub fn inner(&self) -> &TrainedSVM<K> {
        &self.model
    }
}

/// Detailed evaluation metrics
#[derive(Debug, Clone)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// Misclassified examples: FP + FN
    pub fn errors(&self) -> usize {
        self.false_positives + self.false_negatives
    }

    /// Calculate accuracy: (TP + TN) / (TP + TN + FP + FN)
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.true_positives + self.true_negatives) as f64 / total as f64
        }
    }

    /// Calculate precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        let denominator = self.true_positives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate recall (sensitivity): TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        let denominator = self.true_positives + self.false_negatives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate F1 score: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// Calculate specificity: TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        let denominator = self.true_negatives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_negatives as f64 / denominator as f64
        }
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub n_support_vectors: usize,
    pub bias: f64,
    pub support_vector_indices: Vec<usize>,
    /// Alpha of each support vector, in index order
    pub alphas: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
    pub objective_value: f64,
    /// Present for the linear kernel only
    pub weights: Option<Vec<f64>>,
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;

    /// Train a linear SVM on delimited data with default parameters
    pub fn train_file<P: AsRef<Path>>(path: P) -> Result<TrainedModel<KernelSpec>> {
        SVM::new().train_from_file(path)
    }

    /// Train with custom C parameter
    pub fn train_file_with_c<P: AsRef<Path>>(path: P, c: f64) -> Result<TrainedModel<KernelSpec>> {
        SVM::new().with_c(c).train_from_file(path)
    }

    /// Quick evaluation: train on training file, test on test file
    pub fn evaluate_split<P1: AsRef<Path>, P2: AsRef<Path>>(
        train_path: P1,
        test_path: P2,
    ) -> Result<f64> {
        let model = train_file(train_path)?;
        model.evaluate_from_file(test_path)
    }

    /// Hold-out validation on a sequential split
    pub fn simple_validation(dataset: &DenseDataset, train_ratio: f64, c: f64) -> Result<f64> {
        if train_ratio <= 0.0 || train_ratio >= 1.0 {
            return Err(SVMError::InvalidParameter(format!(
                "Train ratio must be between 0 and 1, got: {train_ratio}"
            )));
        }

        let n = dataset.len();
        let train_size = (n as f64 * train_ratio) as usize;

        // Not shuffled, so callers control the split
        let train: Vec<usize> = (0..train_size).collect();
        let test: Vec<usize> = (train_size..n).collect();

        let model = SVM::new().with_c(c).train(&dataset.select(&train))?;
        model.evaluate(&dataset.select(&test))
    }
}
