//! Gaussian RBF (Radial Basis Function) kernel helpers
//!
//! K(x, y) = exp(-||x - y||² / σ²), where σ (the bandwidth) controls how
//! quickly similarity decays with distance. `KernelSpec::GaussianRbf`
//! evaluates through these functions.

use crate::core::{Result, SVMError};
use ndarray::ArrayView1;

pub(crate) fn validate_bandwidth(bandwidth: f64) -> Result<()> {
    if bandwidth.is_finite() && bandwidth > 0.0 {
        Ok(())
    } else {
        Err(SVMError::InvalidParameter(format!(
            "RBF bandwidth must be positive and finite, got {bandwidth}"
        )))
    }
}

pub(crate) fn gaussian(distance_sq: f64, bandwidth: f64) -> f64 {
    (-distance_sq / (bandwidth * bandwidth)).exp()
}

/// Compute squared Euclidean distance ||x - y||² between two dense vectors
pub(crate) fn squared_euclidean_distance(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| {
            let diff = a - b;
            diff * diff
        })
        .sum()
}
