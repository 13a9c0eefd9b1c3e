//! Payload grammar descriptors
//!
//! A closed set of payload shapes. Each operation declares one; the
//! dispatcher applies it to turn the raw payload into typed operands
//! before the handler ever runs, so grammars are validated independently
//! of the numeric code.

use serde::Serialize;

/// Shape of an operation payload.
///
/// Top-level fields are separated by `:`, list items by `;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Grammar {
    /// `v1;v2;...` with exactly `count` vectors
    Vectors { count: usize },
    /// `count:v1;v2;...`
    CountedVectors,
    /// `op:count:v1;v2;...`
    OperatorCountedVectors,
    /// `count:target;v1;v2;...`
    SpanMembership,
    /// `M`
    Matrix,
    /// `op:M1;M2` or `op:M1;scalar` (the second separator may also be `:`)
    MatrixArithmetic,
    /// `method:A;b`
    LinearSystem,
    /// `a;b;...` with exactly `count` reals
    Scalars { count: usize },
    /// `s1;...;sN;v1;...;vM` with `scalars` reals followed by `vectors` vectors
    ScalarsThenVectors { scalars: usize, vectors: usize },
}

impl Grammar {
    /// Human-readable template for help output
    pub fn template(&self) -> String {
        match self {
            Grammar::Vectors { count } => {
                (1..=*count).map(|i| format!("v{}", i)).collect::<Vec<_>>().join(";")
            }
            Grammar::CountedVectors => "count:v1;v2;...".to_string(),
            Grammar::OperatorCountedVectors => "op:count:v1;v2;...".to_string(),
            Grammar::SpanMembership => "count:target;v1;v2;...".to_string(),
            Grammar::Matrix => "M".to_string(),
            Grammar::MatrixArithmetic => "op:M1;M2 | op:M1;scalar".to_string(),
            Grammar::LinearSystem => "method:A;b".to_string(),
            Grammar::Scalars { count } => {
                (1..=*count).map(|i| format!("s{}", i)).collect::<Vec<_>>().join(";")
            }
            Grammar::ScalarsThenVectors { scalars, vectors } => {
                let s = (1..=*scalars).map(|i| format!("s{}", i));
                let v = (1..=*vectors).map(|i| format!("v{}", i));
                s.chain(v).collect::<Vec<_>>().join(";")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates() {
        assert_eq!(Grammar::Vectors { count: 3 }.template(), "v1;v2;v3");
        assert_eq!(Grammar::Scalars { count: 2 }.template(), "s1;s2");
        assert_eq!(
            Grammar::ScalarsThenVectors { scalars: 2, vectors: 1 }.template(),
            "s1;s2;v1"
        );
        assert_eq!(Grammar::LinearSystem.template(), "method:A;b");
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(Grammar::Vectors { count: 2 }).unwrap();
        assert_eq!(json["kind"], "vectors");
        assert_eq!(json["count"], 2);
    }
}
