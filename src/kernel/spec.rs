//! Kernel selection as a closed set of variants
//!
//! `KernelSpec` is what configuration and the CLI produce. Parsing a tag is the
//! only place an unknown kernel can appear; once built, the variant dispatches
//! straight to the matching kernel computation.

use crate::core::{Result, SVMError};
use crate::kernel::rbf::{gaussian, squared_euclidean_distance, validate_bandwidth};
use crate::kernel::{Kernel, LinearKernel};
use ndarray::{Array1, ArrayView1, ArrayView2};
use std::fmt;
use std::str::FromStr;

/// Bandwidth used when an RBF kernel is requested without one.
pub const DEFAULT_BANDWIDTH: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum KernelSpec {
    /// K(x, y) = x^T * y
    #[default]
    Linear,
    /// K(x, y) = exp(-||x - y||² / bandwidth²)
    GaussianRbf { bandwidth: f64 },
}

impl KernelSpec {
    /// Gaussian RBF kernel with a checked bandwidth.
    pub fn rbf(bandwidth: f64) -> Result<Self> {
        validate_bandwidth(bandwidth)?;
        Ok(KernelSpec::GaussianRbf { bandwidth })
    }

    /// Build a kernel from its tag and an optional bandwidth.
    ///
    /// The bandwidth is ignored for the linear kernel and defaults to
    /// [`DEFAULT_BANDWIDTH`] for RBF.
    pub fn from_tag(tag: &str, bandwidth: Option<f64>) -> Result<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "linear" | "lin" => Ok(KernelSpec::Linear),
            "rbf" | "gaussian" | "gaussian-rbf" => {
                Self::rbf(bandwidth.unwrap_or(DEFAULT_BANDWIDTH))
            }
            _ => Err(SVMError::UnrecognizedKernel(tag.to_string())),
        }
    }
}

impl FromStr for KernelSpec {
    type Err = SVMError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s, None)
    }
}

impl fmt::Display for KernelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelSpec::Linear => write!(f, "linear"),
            KernelSpec::GaussianRbf { bandwidth } => write!(f, "rbf(bandwidth={bandwidth})"),
        }
    }
}

impl Kernel for KernelSpec {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        match *self {
            KernelSpec::Linear => LinearKernel.compute(x, y),
            KernelSpec::GaussianRbf { bandwidth } => {
                gaussian(squared_euclidean_distance(x, y), bandwidth)
            }
        }
    }

    fn evaluate(&self, data: ArrayView2<f64>, reference: ArrayView1<f64>) -> Array1<f64> {
        match *self {
            KernelSpec::Linear => LinearKernel.evaluate(data, reference),
            KernelSpec::GaussianRbf { bandwidth } => data
                .rows()
                .into_iter()
                .map(|row| gaussian(squared_euclidean_distance(row, reference), bandwidth))
                .collect(),
        }
    }

    fn is_linear(&self) -> bool {
        matches!(self, KernelSpec::Linear)
    }

    fn validate(&self) -> Result<()> {
        match *self {
            KernelSpec::Linear => Ok(()),
            KernelSpec::GaussianRbf { bandwidth } => validate_bandwidth(bandwidth),
        }
    }
}

/// Evaluate `kernel` between every row of `data` and `reference`.
///
/// This is the checked entry point used outside the training hot loop: the
/// kernel parameters and the vector lengths are validated first.
pub fn evaluate(
    data: ArrayView2<f64>,
    reference: ArrayView1<f64>,
    kernel: &KernelSpec,
) -> Result<Array1<f64>> {
    kernel.validate()?;
    if data.ncols() != reference.len() {
        return Err(SVMError::DimensionMismatch {
            expected: data.ncols(),
            actual: reference.len(),
        });
    }
    Ok(kernel.evaluate(data, reference))
}
