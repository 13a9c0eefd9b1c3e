//! Evaluation Context

use linal_core::{Tolerance, Value};
use crate::EngineConfig;
use serde::Serialize;

/// Evaluation context passed to plugins.
///
/// One context per command; nothing in it is shared across commands.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    pub tolerance: Tolerance,
    pub tracing: bool,
    pub trace: Vec<TraceStep>,
}

/// Single step of a derivation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceStep {
    pub label: String,
    pub value: Value,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            tracing: config.trace,
            trace: Vec::new(),
        }
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.tracing = enabled;
        self
    }

    /// Record a derivation step when tracing is on
    pub fn record(&mut self, label: impl Into<String>, value: impl Into<Value>) {
        if self.tracing {
            self.trace.push(TraceStep { label: label.into(), value: value.into() });
        }
    }

    /// Like `record`, but only builds the value when tracing is on
    pub fn record_with<F>(&mut self, label: impl Into<String>, value: F)
    where
        F: FnOnce() -> Value,
    {
        if self.tracing {
            self.trace.push(TraceStep { label: label.into(), value: value() });
        }
    }

    /// Hand the recorded steps to the caller, leaving the trace empty
    pub fn take_trace(&mut self) -> Vec<TraceStep> {
        std::mem::take(&mut self.trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_only_when_tracing() {
        let mut ctx = EvalContext::new();
        ctx.record("det", 4.0);
        assert!(ctx.trace.is_empty());

        let mut ctx = EvalContext::new().with_tracing(true);
        ctx.record("det", 4.0);
        ctx.record_with("rank", || Value::from(2usize));
        assert_eq!(ctx.trace.len(), 2);
        assert_eq!(ctx.trace[0].label, "det");

        let steps = ctx.take_trace();
        assert_eq!(steps.len(), 2);
        assert!(ctx.trace.is_empty());
    }

    #[test]
    fn test_record_with_is_lazy() {
        let mut ctx = EvalContext::new();
        ctx.record_with("never", || panic!("built while tracing is off"));
        assert!(ctx.trace.is_empty());
    }
}
