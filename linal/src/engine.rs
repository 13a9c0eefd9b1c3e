//! The `Linal` engine: name lookup, payload grammar, handler call

use crate::command::{parse_line, parse_script, Command};
use crate::grammar;
use linal_core::{LinalError, Severity, Value};
use linal_plugin::{EngineConfig, EvalContext, OperationRegistry, TraceStep};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Main Linal engine
#[derive(Clone)]
pub struct Linal {
    registry: Arc<OperationRegistry>,
    config: EngineConfig,
}

/// Outcome of one command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub operation: String,
    pub payload: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceStep>,
}

impl Evaluation {
    pub fn is_ok(&self) -> bool {
        !self.value.is_error()
    }

    pub fn error(&self) -> Option<&LinalError> {
        self.value.as_error()
    }
}

/// Every evaluation of a script, in script order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub evaluations: Vec<Evaluation>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.evaluations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }

    /// Evaluations that failed outright
    pub fn failures(&self) -> Vec<&Evaluation> {
        self.evaluations.iter()
            .filter(|e| e.error().map_or(false, |err| err.severity != Severity::Warning))
            .collect()
    }

    /// Evaluations whose error is only a warning (e.g. no convergence)
    pub fn warnings(&self) -> Vec<&Evaluation> {
        self.evaluations.iter()
            .filter(|e| e.error().map_or(false, |err| err.severity == Severity::Warning))
            .collect()
    }

    pub fn succeeded(&self) -> usize {
        self.evaluations.iter().filter(|e| e.is_ok()).count()
    }

    pub fn to_json(&self) -> Result<String, LinalError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LinalError::internal(format!("cannot serialize report: {}", e)))
    }
}

impl Linal {
    pub fn new(registry: OperationRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            config: EngineConfig::default(),
        }
    }

    pub fn with_standard_library() -> Self {
        Self::new(crate::standard_registry())
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Evaluate one operation on a raw payload
    pub fn eval(&self, name: &str, payload: &str) -> Evaluation {
        self.evaluate(None, name, payload)
    }

    /// Evaluate a `<operation>:<payload>` line
    pub fn eval_line(&self, line: &str) -> Evaluation {
        match parse_line(line) {
            Some((name, payload)) => self.evaluate(None, name, payload),
            None => Evaluation {
                line: None,
                operation: String::new(),
                payload: line.trim().to_string(),
                value: Value::Error(LinalError::format_error(format!(
                    "expected '<operation>:<payload>', got '{}'", line.trim()
                ))),
                trace: Vec::new(),
            },
        }
    }

    pub fn eval_command(&self, command: &Command) -> Evaluation {
        self.evaluate(Some(command.line), &command.name, &command.payload)
    }

    /// Evaluate every command of a script in order
    pub fn eval_script(&self, script: &str) -> BatchReport {
        let evaluations = parse_script(script).iter()
            .map(|c| self.eval_command(c))
            .collect();
        self.report(evaluations)
    }

    /// Like `eval_script`, spreading commands over the rayon pool.
    /// Results keep script order.
    pub fn eval_script_parallel(&self, script: &str) -> BatchReport {
        let commands = parse_script(script);
        let evaluations = commands.par_iter()
            .map(|c| self.eval_command(c))
            .collect();
        self.report(evaluations)
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        self.registry.help(name)
    }

    pub fn list_operations(&self, category: Option<&str>) -> Value {
        self.registry.list_operations(category)
    }

    fn evaluate(&self, line: Option<usize>, name: &str, payload: &str) -> Evaluation {
        let mut ctx = EvalContext::from_config(&self.config);

        let (operation, value) = match self.registry.lookup(name) {
            Ok(op) => {
                let meta = op.meta();
                debug!(operation = meta.name, ?line, "dispatching command");
                let value = match grammar::apply(meta.grammar, payload) {
                    Ok(args) => op.call(&args, &mut ctx),
                    Err(e) => Value::Error(e),
                };
                (meta.name.to_string(), value)
            }
            Err(e) => (name.to_string(), Value::Error(e)),
        };

        let value = match value {
            Value::Error(e) => {
                let mut e = e.in_operation(operation.as_str()).with_payload(payload);
                if let Some(line) = line {
                    e = e.at_line(line);
                }
                warn!(operation = %operation, ?line, code = %e.code, "command failed: {}", e.message);
                Value::Error(e)
            }
            other => other,
        };

        Evaluation {
            line,
            operation,
            payload: payload.to_string(),
            value,
            trace: ctx.take_trace(),
        }
    }

    fn report(&self, evaluations: Vec<Evaluation>) -> BatchReport {
        let report = BatchReport { evaluations };
        debug!(
            commands = report.len(),
            failed = report.failures().len(),
            "script evaluated"
        );
        report
    }
}

impl Default for Linal {
    fn default() -> Self {
        Self::with_standard_library()
    }
}
