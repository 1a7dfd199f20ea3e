//! Core traits for SVM implementation

use crate::core::Prediction;
use ndarray::{ArrayView1, ArrayView2};

/// Trained SVM model
pub trait SVMModel {
    /// Predict a single feature vector
    fn predict(&self, x: ArrayView1<f64>) -> Prediction;

    /// Predict every row of a feature matrix
    fn predict_batch(&self, xs: ArrayView2<f64>) -> Vec<Prediction> {
        xs.rows().into_iter().map(|row| self.predict(row)).collect()
    }

    /// Get the number of support vectors
    fn n_support_vectors(&self) -> usize;

    /// Get the bias term
    fn bias(&self) -> f64;
}
