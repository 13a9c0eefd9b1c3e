//! Linal - Command-driven linear algebra and analytic geometry
//!
//! A script is a sequence of `<operation>:<payload>` lines. Each command is
//! looked up in the operation registry, its payload is split by the
//! operation's grammar into vectors, matrices and scalars, and the handler
//! computes a `Value`. Failures stay local to their command.
//!
//! ```ignore
//! let linal = Linal::with_standard_library();
//! let result = linal.eval("Dot product", "(1,2,3);(4,5,6)");
//! assert_eq!(result.value.as_number(), Some(32.0));
//! ```

mod command;
mod engine;
pub mod grammar;

pub use command::{parse_line, parse_script, Command};
pub use engine::{BatchReport, Evaluation, Linal};

pub use linal_core::{codes, LinalError, Matrix, Severity, Tolerance, Value, Vector};
pub use linal_plugin::{EngineConfig, EvalContext, Grammar, OperationRegistry, TraceStep};

/// Registry with every vector, matrix and geometry operation loaded
pub fn standard_registry() -> OperationRegistry {
    let registry = OperationRegistry::new();
    let registry = linal_matrix::load_matrix_library(registry);
    linal_geometry::load_geometry_library(registry)
}
