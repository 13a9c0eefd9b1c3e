//! Plugin traits

use linal_core::Value;
use crate::{EvalContext, Grammar};
use serde::Serialize;

/// Metadata about an operation argument
#[derive(Debug, Clone, Serialize)]
pub struct ArgMeta {
    pub name: &'static str,
    pub typ: &'static str,
    pub description: &'static str,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

impl ArgMeta {
    pub const fn required(name: &'static str, typ: &'static str, description: &'static str) -> Self {
        Self { name, typ, description, optional: false, default: None }
    }

    pub const fn optional(name: &'static str, typ: &'static str, description: &'static str, default: &'static str) -> Self {
        Self { name, typ, description, optional: true, default: Some(default) }
    }
}

/// Metadata for an operation plugin
#[derive(Debug, Clone, Serialize)]
pub struct OperationMeta {
    /// Canonical name, e.g. "Dot product"
    pub name: &'static str,
    /// Other accepted names (original-language names included)
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    /// How the payload splits into operands
    pub grammar: Grammar,
    pub args: &'static [ArgMeta],
    pub returns: &'static str,
    pub examples: &'static [&'static str],
    pub category: &'static str,
    pub related: &'static [&'static str],
}

/// One operation of the command language.
///
/// `call` receives the operands already produced by the operation's
/// grammar, in grammar order. Failures come back as `Value::Error`.
pub trait OperationPlugin: Send + Sync {
    fn meta(&self) -> OperationMeta;
    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value;
}
