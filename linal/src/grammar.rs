//! Payload grammars
//!
//! Turns the raw payload of a command into the typed operands its
//! operation expects. Top-level fields are split on `:`, list items on
//! `;`; vector and matrix literals never contain either.

use linal_core::{parse_count, parse_real, LinalError, Value, Vector};
use linal_matrix::{parse_matrix, parse_scalars, parse_vector, parse_vector_list, parse_vectors};
use linal_plugin::Grammar;

/// Apply `grammar` to `payload`
pub fn apply(grammar: Grammar, payload: &str) -> Result<Vec<Value>, LinalError> {
    match grammar {
        Grammar::Vectors { count } => Ok(vectors(parse_vectors(payload, count)?)),

        Grammar::CountedVectors => {
            let (count, rest) = field(payload, "count")?;
            Ok(vectors(counted(count, rest)?))
        }

        Grammar::OperatorCountedVectors => {
            let (op, rest) = field(payload, "operator")?;
            let (count, rest) = field(rest, "count")?;
            let mut args = vec![Value::from(op)];
            args.extend(vectors(counted(count, rest)?));
            Ok(args)
        }

        Grammar::SpanMembership => {
            let (count, rest) = field(payload, "count")?;
            let count = parse_count(count)?;
            let all = parse_vector_list(rest)?;
            // The count may name the spanning vectors or every vector
            if all.is_empty() || (count + 1 != all.len() && count != all.len()) {
                return Err(LinalError::format_error(format!(
                    "count {} does not match {} vectors (target plus span)",
                    count, all.len()
                )));
            }
            Ok(vectors(all))
        }

        Grammar::Matrix => Ok(vec![Value::from(parse_matrix(payload)?)]),

        Grammar::MatrixArithmetic => {
            let (op, rest) = field(payload, "operator")?;
            let (left, right) = operand_pair(rest)?;
            let right = match parse_real(right) {
                Ok(k) => Value::Number(k),
                Err(_) => Value::from(parse_matrix(right)?),
            };
            Ok(vec![Value::from(op), Value::from(parse_matrix(left)?), right])
        }

        Grammar::LinearSystem => {
            let (method, rest) = field(payload, "method")?;
            let (a, b) = operand_pair(rest)?;
            Ok(vec![
                Value::from(method),
                Value::from(parse_matrix(a)?),
                Value::from(parse_matrix(b)?),
            ])
        }

        Grammar::Scalars { count } => {
            Ok(parse_scalars(payload, count)?.into_iter().map(Value::Number).collect())
        }

        Grammar::ScalarsThenVectors { scalars, vectors: count } => {
            let groups: Vec<&str> = payload.split(';').map(str::trim).filter(|g| !g.is_empty()).collect();
            if groups.len() != scalars + count {
                return Err(LinalError::format_error(format!(
                    "expected {} coefficients and {} vectors, found {} items",
                    scalars, count, groups.len()
                )));
            }
            let mut args = Vec::with_capacity(groups.len());
            for g in &groups[..scalars] {
                args.push(Value::Number(parse_real(g)?));
            }
            for g in &groups[scalars..] {
                args.push(Value::from(parse_vector(g)?));
            }
            Ok(args)
        }
    }
}

/// Split off the leading `:`-separated field
fn field<'a>(payload: &'a str, what: &str) -> Result<(&'a str, &'a str), LinalError> {
    payload.split_once(':')
        .map(|(head, rest)| (head.trim(), rest.trim()))
        .ok_or_else(|| LinalError::format_error(format!("missing '{}:' field in '{}'", what, payload.trim())))
}

/// Parse the vector list after a count field; the count must match
fn counted(count: &str, rest: &str) -> Result<Vec<Vector>, LinalError> {
    let count = parse_count(count)?;
    let list = parse_vector_list(rest)?;
    if list.len() != count {
        return Err(LinalError::format_error(format!(
            "count says {} vectors, found {}",
            count, list.len()
        )));
    }
    Ok(list)
}

/// `X;Y` or `X:Y`
fn operand_pair(rest: &str) -> Result<(&str, &str), LinalError> {
    let (left, right) = rest.split_once(|c| c == ';' || c == ':')
        .ok_or_else(|| LinalError::format_error(format!("expected two operands in '{}'", rest)))?;
    let (left, right) = (left.trim(), right.trim());
    if left.is_empty() || right.is_empty() {
        return Err(LinalError::format_error(format!("expected two operands in '{}'", rest)));
    }
    Ok((left, right))
}

fn vectors(list: Vec<Vector>) -> Vec<Value> {
    list.into_iter().map(Value::Vector).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use linal_core::codes;

    fn code(result: Result<Vec<Value>, LinalError>) -> String {
        result.unwrap_err().code
    }

    #[test]
    fn test_vectors() {
        let args = apply(Grammar::Vectors { count: 2 }, "(1,2,3);(4,5,6)").unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(code(apply(Grammar::Vectors { count: 2 }, "(1,2)")), codes::FORMAT_ERROR);
    }

    #[test]
    fn test_counted_vectors() {
        let args = apply(Grammar::CountedVectors, "2:(1,0);(0,1)").unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(code(apply(Grammar::CountedVectors, "3:(1,0);(0,1)")), codes::FORMAT_ERROR);
        assert_eq!(code(apply(Grammar::CountedVectors, "(1,0);(0,1)")), codes::FORMAT_ERROR);
        assert_eq!(code(apply(Grammar::CountedVectors, "two:(1,0);(0,1)")), codes::FORMAT_ERROR);
    }

    #[test]
    fn test_operator_counted_vectors() {
        let args = apply(Grammar::OperatorCountedVectors, "-:2:(5,5);(1,2)").unwrap();
        assert_eq!(args[0].as_text(), Some("-"));
        assert_eq!(args[2].as_vector().map(|v| v.to_vec()), Some(vec![1.0, 2.0]));
    }

    #[test]
    fn test_span_membership_counts() {
        // Count as span size
        assert_eq!(apply(Grammar::SpanMembership, "2:(1,1);(1,0);(0,1)").unwrap().len(), 3);
        // Count as total
        assert_eq!(apply(Grammar::SpanMembership, "3:(1,1);(1,0);(0,1)").unwrap().len(), 3);
        assert_eq!(code(apply(Grammar::SpanMembership, "5:(1,1);(1,0);(0,1)")), codes::FORMAT_ERROR);
    }

    #[test]
    fn test_matrix_arithmetic() {
        let args = apply(Grammar::MatrixArithmetic, "+:[(1,2),(3,4)];[(1,1),(1,1)]").unwrap();
        assert_eq!(args[0].as_text(), Some("+"));
        assert!(args[2].as_matrix().is_some());

        let args = apply(Grammar::MatrixArithmetic, "*:[(1,2),(3,4)]:2.5").unwrap();
        assert_eq!(args[2].as_number(), Some(2.5));

        assert_eq!(code(apply(Grammar::MatrixArithmetic, "*:[(1,2),(3,4)]")), codes::FORMAT_ERROR);
    }

    #[test]
    fn test_linear_system() {
        let args = apply(Grammar::LinearSystem, "Gauss:[(2,1),(1,3)];[(5),(10)]").unwrap();
        assert_eq!(args[0].as_text(), Some("Gauss"));
        assert_eq!(args[2].as_matrix().map(|m| (m.rows(), m.cols())), Some((2, 1)));
    }

    #[test]
    fn test_scalars_then_vectors() {
        let grammar = Grammar::ScalarsThenVectors { scalars: 4, vectors: 2 };
        let args = apply(grammar, "0;0;1;0;(0,0,2);(1,0,-1)").unwrap();
        assert_eq!(args.len(), 6);
        assert_eq!(args[2].as_number(), Some(1.0));
        assert!(args[5].as_vector().is_some());
        assert_eq!(code(apply(grammar, "0;0;1;(0,0,2);(1,0,-1)")), codes::FORMAT_ERROR);
    }

    #[test]
    fn test_empty_matrix_parses() {
        let args = apply(Grammar::Matrix, "").unwrap();
        assert!(args[0].as_matrix().map_or(false, |m| m.is_empty()));
    }
}
