//! Real-number literals and tolerance policy
//!
//! All arithmetic is plain `f64`. This module owns the two places where
//! raw text becomes a number (operand components and counts), the zero
//! tolerance used by every pivot/determinant check, and the display
//! formatting shared by `Vector`, `Matrix`, and `Value`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for number literals
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("Invalid number format: '{0}'")]
    ParseError(String),

    #[error("Number is not finite: '{0}'")]
    NotFinite(String),

    #[error("Invalid count: '{0}'")]
    InvalidCount(String),
}

/// Default magnitude below which a pivot, determinant, or norm counts as zero
pub const DEFAULT_ZERO_TOLERANCE: f64 = 1e-10;

/// Tolerance policy for numerically delicate routines.
///
/// Every engine routine that compares a value against zero takes one of
/// these explicitly; nothing falls back to a hidden global.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Pivots, determinants, and squared norms below this are zero
    pub zero: f64,
    /// QR convergence threshold when only eigenvalues are wanted
    pub eigenvalue: f64,
    /// Looser QR convergence threshold used before eigenvector recovery
    pub eigenvector: f64,
    /// Hard cap on QR iterations
    pub max_qr_iterations: usize,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            zero: DEFAULT_ZERO_TOLERANCE,
            eigenvalue: 1e-10,
            eigenvector: 1e-6,
            max_qr_iterations: 100,
        }
    }
}

impl Tolerance {
    /// Builder: set the zero threshold
    pub fn with_zero(mut self, zero: f64) -> Self {
        self.zero = zero;
        self
    }

    /// Builder: set the QR iteration cap
    pub fn with_max_qr_iterations(mut self, iterations: usize) -> Self {
        self.max_qr_iterations = iterations;
        self
    }

    /// True when `|x|` is below the zero threshold
    pub fn is_zero(&self, x: f64) -> bool {
        x.abs() < self.zero
    }
}

/// Parse one real-number literal.
///
/// Accepts anything `f64::from_str` accepts after trimming, except
/// non-finite results (`inf`, `NaN`, overflowing exponents).
pub fn parse_real(s: &str) -> Result<f64, NumberError> {
    let s = s.trim();
    let value: f64 = s.parse()
        .map_err(|_| NumberError::ParseError(s.to_string()))?;
    if !value.is_finite() {
        return Err(NumberError::NotFinite(s.to_string()));
    }
    Ok(value)
}

/// Parse a non-negative integer count (the `count:` prefix of list payloads)
pub fn parse_count(s: &str) -> Result<usize, NumberError> {
    let s = s.trim();
    s.parse::<usize>()
        .map_err(|_| NumberError::InvalidCount(s.to_string()))
}

/// Render with a fixed number of decimal places, trimming trailing zeros.
///
/// Very small non-zero values keep two significant digits instead of
/// collapsing to `0`.
pub fn format_real(x: f64, places: usize) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    let s = if x.abs() < 1e-6 {
        let log10 = x.abs().log10().floor() as i32;
        let sig_places = ((-log10) + 2) as usize;
        format!("{:.prec$}", x, prec = sig_places)
    } else {
        format!("{:.prec$}", x, prec = places)
    };
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    // "-0" after rounding
    if s == "-0" { "0".to_string() } else { s }
}
