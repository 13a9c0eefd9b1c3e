//! Engine configuration
//!
//! Defaults reproduce the fixed tolerances of the algorithms (1e-10 for
//! pivots and eigenvalue convergence, 1e-6 before eigenvector recovery,
//! 100 QR iterations). They can be overridden from JSON or from the
//! environment.

use linal_core::{LinalError, Tolerance};
use serde::{Deserialize, Serialize};

/// Environment variable overriding `tolerance.zero`
pub const ENV_TOLERANCE: &str = "LINAL_TOLERANCE";
/// Environment variable overriding `tolerance.max_qr_iterations`
pub const ENV_QR_MAX_ITERATIONS: &str = "LINAL_QR_MAX_ITERATIONS";
/// Environment variable enabling derivation traces ("1"/"true"/"yes")
pub const ENV_TRACE: &str = "LINAL_TRACE";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tolerance: Tolerance,
    /// Record derivation steps for every command
    pub trace: bool,
}

impl EngineConfig {
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, LinalError> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| LinalError::config_error(e.to_string()))?;
        config.validate()
    }

    /// Defaults overridden by `LINAL_*` environment variables
    pub fn from_env() -> Result<Self, LinalError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, LinalError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EngineConfig::default();

        if let Some(raw) = lookup(ENV_TOLERANCE) {
            let zero = raw.trim().parse()
                .map_err(|_| LinalError::config_error(format!("{}='{}' is not a number", ENV_TOLERANCE, raw)))?;
            config.tolerance = config.tolerance.with_zero(zero);
        }
        if let Some(raw) = lookup(ENV_QR_MAX_ITERATIONS) {
            let iterations = raw.trim().parse()
                .map_err(|_| LinalError::config_error(format!("{}='{}' is not a count", ENV_QR_MAX_ITERATIONS, raw)))?;
            config.tolerance = config.tolerance.with_max_qr_iterations(iterations);
        }
        if let Some(raw) = lookup(ENV_TRACE) {
            config.trace = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                other => return Err(LinalError::config_error(format!("{}='{}' is not a boolean", ENV_TRACE, other))),
            };
        }

        config.validate()
    }

    fn validate(self) -> Result<Self, LinalError> {
        let tol = &self.tolerance;
        for (name, value) in [("zero", tol.zero), ("eigenvalue", tol.eigenvalue), ("eigenvector", tol.eigenvector)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(LinalError::config_error(format!("tolerance.{} must be positive, got {}", name, value)));
            }
        }
        if tol.max_qr_iterations == 0 {
            return Err(LinalError::config_error("tolerance.max_qr_iterations must be at least 1"));
        }
        Ok(self)
    }
}
