//! Core type definitions for SVM

use crate::core::{Result, SVMError};
use ndarray::Array1;
use std::fmt;
use std::str::FromStr;

/// Prediction result containing label and decision value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class label (+1 or -1)
    pub label: f64,
    /// Raw decision function value
    pub decision_value: f64,
}

impl Prediction {
    /// Create a prediction from a raw decision value.
    ///
    /// A decision value of exactly zero lies on the separating surface and
    /// is assigned to the positive class.
    pub fn from_decision(decision_value: f64) -> Self {
        let label = if decision_value >= 0.0 { 1.0 } else { -1.0 };
        Self::new(label, decision_value)
    }

    /// Create a new prediction
    pub fn new(label: f64, decision_value: f64) -> Self {
        Self {
            label,
            decision_value,
        }
    }

    /// Get confidence as absolute value of decision value
    pub fn confidence(&self) -> f64 {
        self.decision_value.abs()
    }
}

/// Result of optimization process
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Lagrange multipliers (alpha values)
    pub alpha: Array1<f64>,
    /// Bias term (b)
    pub b: f64,
    /// Indices of support vectors (where alpha > 0)
    pub support_vectors: Vec<usize>,
    /// Number of passes performed
    pub iterations: usize,
    /// Whether the stopping rule was met before the pass ceiling: a full
    /// pass changed no pair (Platt), or enough consecutive idle passes
    /// (simplified). It does not imply every example satisfies KKT.
    pub converged: bool,
    /// Final dual objective value
    pub objective_value: f64,
}

/// Which SMO driver to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoVariant {
    /// Full/unbound alternation with the max |E_i - E_j| second choice.
    #[default]
    Platt,
    /// Full scans with a random second choice; stops after `max_iterations`
    /// consecutive passes without a change.
    Simplified,
}

impl FromStr for SmoVariant {
    type Err = SVMError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "platt" => Ok(SmoVariant::Platt),
            "simplified" | "simple" => Ok(SmoVariant::Simplified),
            other => Err(SVMError::InvalidParameter(format!(
                "unknown SMO variant '{other}', expected 'platt' or 'simplified'"
            ))),
        }
    }
}

impl fmt::Display for SmoVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmoVariant::Platt => write!(f, "platt"),
            SmoVariant::Simplified => write!(f, "simplified"),
        }
    }
}

/// Configuration for optimizer
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Regularization parameter (upper bound for alpha)
    pub c: f64,
    /// Slack allowed on the KKT conditions
    pub tolerance: f64,
    /// Pass ceiling (Platt) or consecutive idle passes (Simplified)
    pub max_iterations: usize,
    /// Driver variant
    pub variant: SmoVariant,
    /// Seed for the fallback random pair selection; entropy when `None`
    pub seed: Option<u64>,
    /// Hard cap on total passes for the simplified variant
    pub pass_limit: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            tolerance: 0.001,
            max_iterations: 40,
            variant: SmoVariant::Platt,
            seed: None,
            pass_limit: 10_000,
        }
    }
}

impl OptimizerConfig {
    /// Check hyperparameters before any data is touched.
    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "C must be a positive finite number, got {}",
                self.c
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "tolerance must be a positive finite number, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(SVMError::InvalidParameter(
                "max_iterations must be positive".to_string(),
            ));
        }
        if self.pass_limit == 0 {
            return Err(SVMError::InvalidParameter(
                "pass_limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction() {
        let pred = Prediction::new(1.0, 2.5);
        assert_eq!(pred.label, 1.0);
        assert_eq!(pred.decision_value, 2.5);
        assert_eq!(pred.confidence(), 2.5);

        let neg_pred = Prediction::new(-1.0, -1.8);
        assert_eq!(neg_pred.confidence(), 1.8);
    }

    #[test]
    fn test_prediction_zero_is_positive() {
        assert_eq!(Prediction::from_decision(0.0).label, 1.0);
        assert_eq!(Prediction::from_decision(-1e-12).label, -1.0);
        assert_eq!(Prediction::from_decision(0.3).label, 1.0);
    }

    #[test]
    fn test_optimizer_config_default() {
        let config = OptimizerConfig::default();
        assert_eq!(config.c, 1.0);
        assert_eq!(config.tolerance, 0.001);
        assert_eq!(config.max_iterations, 40);
        assert_eq!(config.variant, SmoVariant::Platt);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_optimizer_config_rejects_bad_values() {
        let mut config = OptimizerConfig::default();
        config.c = 0.0;
        assert!(matches!(
            config.validate(),
            Err(SVMError::InvalidParameter(_))
        ));

        let mut config = OptimizerConfig::default();
        config.tolerance = -0.1;
        assert!(config.validate().is_err());

        let mut config = OptimizerConfig::default();
        config.max_iterations = 0;
        assert!(config.validate().unwrap_err().is_configuration_error());
    }

    #[test]
    fn test_smo_variant_parsing() {
        assert_eq!("platt".parse::<SmoVariant>().unwrap(), SmoVariant::Platt);
        assert_eq!(
            "Simplified".parse::<SmoVariant>().unwrap(),
            SmoVariant::Simplified
        );
        assert!("greedy".parse::<SmoVariant>().is_err());
        assert_eq!(SmoVariant::Simplified.to_string(), "simplified");
    }
}
