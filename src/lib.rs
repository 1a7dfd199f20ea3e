//! Rust implementation of a binary Support Vector Machine (SVM)
//!
//! Based on "Sequential Minimal Optimization: A Fast Algorithm for Training
//! Support Vector Machines" by John C. Platt

pub mod api;
pub mod cache;
pub mod core;
pub mod data;
pub mod kernel;
pub mod optimizer;
pub mod solver;

// Re-export main types for convenience
pub use crate::api::{EvaluationMetrics, ModelInfo, TrainedModel, SVM};
pub use crate::cache::ErrorCache;
pub use crate::core::error::*;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::DenseDataset;
pub use crate::kernel::{Kernel, KernelMatrix, KernelSpec, LinearKernel};
pub use crate::optimizer::{Hyperplane, SVMOptimizer, TrainedSVM};
pub use crate::solver::{OptimizationState, SMOSolver};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
