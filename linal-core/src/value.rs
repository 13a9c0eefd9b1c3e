//! Computation results
//!
//! A `Value` is what an operation hands back: a scalar, vector, matrix,
//! boolean, a small ordered collection of these, a named record (for
//! operations with several forms such as plane equations), or an error.
//! Errors are values too, so one failing command never aborts a batch.

use crate::{format_real, LinalError, Matrix, Vector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result value of one operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
    Vector(Vector),
    Matrix(Matrix),
    List(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Null,
    Error(LinalError),
}

impl Value {
    /// Build a record from `(field, value)` pairs
    pub fn object<K, I>(fields: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    // ========== Safe Accessors (never panic) ==========

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&Vector> {
        match self {
            Value::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&Matrix> {
        match self {
            Value::Matrix(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&LinalError> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get field from a record. Returns `Null` if absent or not a record.
    pub fn get(&self, key: &str) -> &Value {
        static NULL: Value = Value::Null;
        match self {
            Value::Object(map) => map.get(key).unwrap_or(&NULL),
            _ => &NULL,
        }
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Bool(_) => "Bool",
            Value::Text(_) => "Text",
            Value::Vector(_) => "Vector",
            Value::Matrix(_) => "Matrix",
            Value::List(_) => "List",
            Value::Object(_) => "Object",
            Value::Null => "Null",
            Value::Error(_) => "Error",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_real(*n, 4)),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s),
            Value::Vector(v) => write!(f, "{}", v),
            Value::Matrix(m) => write!(f, "{}", m),
            Value::List(items) => {
                let contents: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", contents.join("; "))
            }
            Value::Object(obj) => {
                let fields: Vec<String> = obj.iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                write!(f, "{{{}}}", fields.join(", "))
            }
            Value::Null => write!(f, "null"),
            Value::Error(e) => write!(f, "#ERROR: {}", e.code),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vector> for Value {
    fn from(v: Vector) -> Self {
        Value::Vector(v)
    }
}

impl From<Matrix> for Value {
    fn from(m: Matrix) -> Self {
        Value::Matrix(m)
    }
}

impl From<Vec<Vector>> for Value {
    fn from(vs: Vec<Vector>) -> Self {
        Value::List(vs.into_iter().map(Value::Vector).collect())
    }
}

impl From<LinalError> for Value {
    fn from(e: LinalError) -> Self {
        Value::Error(e)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Result<T, LinalError>> for Value {
    fn from(result: Result<T, LinalError>) -> Self {
        match result {
            Ok(v) => v.into(),
            Err(e) => Value::Error(e),
        }
    }
}
