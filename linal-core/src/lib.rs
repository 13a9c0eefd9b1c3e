//! Linal Core - Fundamental types
//!
//! This crate provides the core types used throughout Linal:
//! - `Vector`, `Matrix`: immutable real-valued operands
//! - `Value`: computation results (scalars, operands, records, errors)
//! - `LinalError`: structured errors with machine-readable codes
//! - `Tolerance`: the zero/convergence policy shared by every engine

mod number;
mod types;
mod value;
mod error;

pub use number::{
    NumberError, Tolerance, DEFAULT_ZERO_TOLERANCE,
    parse_real, parse_count, format_real,
};
pub use types::{Vector, Matrix};
pub use value::Value;
pub use error::{LinalError, ErrorContext, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Vector, Matrix, Value, LinalError, Severity, Tolerance};
    pub use crate::error::codes;
}
