//! Linal Plugin System
//!
//! Every operation of the command language is an `OperationPlugin`:
//! - `meta()` names it, lists aliases, and declares its payload `Grammar`
//! - `call()` is a pure handler from typed operands to a `Value`
//!
//! The `OperationRegistry` is the dispatch table from operation name to
//! plugin; `EvalContext` carries tolerances and the derivation trace.

mod traits;
mod grammar;
mod registry;
mod context;
mod config;

pub use traits::{OperationPlugin, OperationMeta, ArgMeta};
pub use grammar::Grammar;
pub use registry::{OperationRegistry, normalize_name};
pub use context::{EvalContext, TraceStep};
pub use config::EngineConfig;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        OperationPlugin, OperationMeta, ArgMeta, Grammar,
        OperationRegistry, EvalContext, TraceStep, EngineConfig,
    };
    pub use linal_core::prelude::*;
}
