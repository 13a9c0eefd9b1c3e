//! Structured errors
//!
//! Errors never crash a batch. They are values reported against the single
//! command that produced them, with a machine-readable code and enough
//! context to locate the offending line.

use crate::NumberError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const FORMAT_ERROR: &str = "FORMAT_ERROR";
    pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
    pub const SHAPE_MISMATCH: &str = "SHAPE_MISMATCH";
    pub const NOT_SQUARE: &str = "NOT_SQUARE";
    pub const ARITY_ERROR: &str = "ARITY_ERROR";
    pub const UNSUPPORTED_DIMENSION: &str = "UNSUPPORTED_DIMENSION";
    pub const SINGULAR: &str = "SINGULAR";
    pub const PARALLEL: &str = "PARALLEL";
    pub const DEGENERATE: &str = "DEGENERATE";
    pub const UNKNOWN_OPERATION: &str = "UNKNOWN_OPERATION";
    pub const NO_CONVERGENCE: &str = "NO_CONVERGENCE";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Result was produced but is not trustworthy
    Warning,
    /// The command failed
    Error,
    /// The engine itself is misconfigured or broken
    Fatal,
}

/// Where an error occurred
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Operation name as written in the command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,

    /// Raw payload of the command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,

    /// 1-based line in the script
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// Propagation notes
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// Structured error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinalError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Where the error occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    /// Severity level
    pub severity: Severity,
}

impl LinalError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            context: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set operation context
    pub fn in_operation(mut self, operation: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.operation = Some(operation.into());
        self
    }

    /// Builder: set payload context
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.payload = Some(payload.into());
        self
    }

    /// Builder: set line context
    pub fn at_line(mut self, line: usize) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.line = Some(line);
        self
    }

    /// Builder: add propagation note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.notes.push(note.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// True when the error carries `code`
    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    // ========== Common Error Constructors ==========

    pub fn format_error(details: impl Into<String>) -> Self {
        Self::new(codes::FORMAT_ERROR, format!("Format error: {}", details.into()))
            .with_suggestion("Vectors are written (1,2,3), matrices [(1,2),(3,4)], list items separated by ';'")
    }

    pub fn dimension_mismatch(details: impl Into<String>) -> Self {
        Self::new(codes::DIMENSION_MISMATCH, format!("Dimension mismatch: {}", details.into()))
    }

    pub fn shape_mismatch(details: impl Into<String>) -> Self {
        Self::new(codes::SHAPE_MISMATCH, format!("Shape mismatch: {}", details.into()))
    }

    pub fn not_square(func: &str, rows: usize, cols: usize) -> Self {
        Self::new(codes::NOT_SQUARE,
            format!("{} requires a square matrix, got {}×{}", func, rows, cols))
    }

    pub fn arity(func: &str, expected: impl std::fmt::Display, got: usize) -> Self {
        Self::new(codes::ARITY_ERROR,
            format!("{} expects {} operands, got {}", func, expected, got))
    }

    pub fn unsupported_dimension(func: &str, dim: usize) -> Self {
        Self::new(codes::UNSUPPORTED_DIMENSION,
            format!("{} is not defined for dimension {}", func, dim))
            .with_suggestion("Cross and triple products are defined for dimensions 3 and 7")
    }

    pub fn singular(details: impl Into<String>) -> Self {
        Self::new(codes::SINGULAR, format!("Singular: {}", details.into()))
    }

    pub fn parallel(details: impl Into<String>) -> Self {
        Self::new(codes::PARALLEL, format!("Parallel: {}", details.into()))
    }

    pub fn degenerate(details: impl Into<String>) -> Self {
        Self::new(codes::DEGENERATE, format!("Degenerate input: {}", details.into()))
    }

    pub fn unknown_operation(name: &str) -> Self {
        Self::new(codes::UNKNOWN_OPERATION, format!("Unknown operation: {}", name))
            .with_suggestion("Use help() to list available operations")
    }

    pub fn no_convergence(details: impl Into<String>) -> Self {
        Self::new(codes::NO_CONVERGENCE, format!("No convergence: {}", details.into()))
            .with_severity(Severity::Warning)
    }

    pub fn arg_type(func: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(codes::ARG_TYPE,
            format!("{} argument '{}': expected {}, got {}", func, arg, expected, got))
    }

    pub fn config_error(details: impl Into<String>) -> Self {
        Self::new(codes::CONFIG_ERROR, format!("Configuration error: {}", details.into()))
            .with_severity(Severity::Fatal)
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for LinalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for LinalError {}

impl From<NumberError> for LinalError {
    fn from(err: NumberError) -> Self {
        Self::format_error(err.to_string())
    }
}
