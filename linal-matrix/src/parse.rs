//! Operand parser
//!
//! Turns vector literals `(1,2,3)` and matrix literals `[(1,2),(3,4)]`
//! into typed operands. Whitespace inside literals is ignored.

use linal_core::{parse_real, LinalError, Matrix, Vector};

/// Parse a single vector literal such as `(1, 2.5, -3)`.
///
/// Parentheses are optional; at least one component is required.
pub fn parse_vector(literal: &str) -> Result<Vector, LinalError> {
    let inner = literal.trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim();
    if inner.is_empty() {
        return Err(LinalError::format_error(format!("empty vector literal '{}'", literal.trim())));
    }

    let components = inner.split(',')
        .map(|part| parse_real(part).map_err(|e| {
            LinalError::from(e).with_note(format!("in vector literal '{}'", literal.trim()))
        }))
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(Vector::new(components))
}

/// Parse a `;`-separated vector list. Empty groups are ignored.
pub fn parse_vector_list(payload: &str) -> Result<Vec<Vector>, LinalError> {
    non_empty_groups(payload).map(parse_vector).collect()
}

/// Parse exactly `expected` vectors from a `;`-separated list
pub fn parse_vectors(payload: &str, expected: usize) -> Result<Vec<Vector>, LinalError> {
    let groups: Vec<&str> = non_empty_groups(payload).collect();
    if groups.len() != expected {
        return Err(LinalError::format_error(format!(
            "expected {} vector{}, found {} in '{}'",
            expected,
            if expected == 1 { "" } else { "s" },
            groups.len(),
            payload.trim()
        )));
    }
    groups.into_iter().map(parse_vector).collect()
}

/// Parse exactly `expected` reals from a `;`-separated list
pub fn parse_scalars(payload: &str, expected: usize) -> Result<Vec<f64>, LinalError> {
    let groups: Vec<&str> = non_empty_groups(payload).collect();
    if groups.len() != expected {
        return Err(LinalError::format_error(format!(
            "expected {} coefficients, found {} in '{}'",
            expected, groups.len(), payload.trim()
        )));
    }
    groups.into_iter()
        .map(|g| parse_real(g).map_err(LinalError::from))
        .collect()
}

/// Parse a matrix literal `[(r1c1,r1c2),(r2c1,r2c2)]`.
///
/// Rows are split on the `),(` boundary. An empty literal gives the 0×0
/// matrix; ragged rows are a format error.
pub fn parse_matrix(literal: &str) -> Result<Matrix, LinalError> {
    let compact: String = literal.chars().filter(|c| !c.is_whitespace()).collect();
    let inner = compact
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim_start_matches('(')
        .trim_end_matches(')');
    if inner.is_empty() {
        return Ok(Matrix::empty());
    }

    let rows = inner.split("),(")
        .enumerate()
        .map(|(i, row)| {
            if row.is_empty() {
                return Err(LinalError::format_error(format!("matrix row {} is empty", i + 1)));
            }
            row.split(',')
                .map(|entry| parse_real(entry).map_err(|e| {
                    LinalError::from(e).with_note(format!("in matrix row {}", i + 1))
                }))
                .collect::<Result<Vec<f64>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Matrix::from_rows(rows)
}

fn non_empty_groups(payload: &str) -> impl Iterator<Item = &str> {
    payload.split(';').map(str::trim).filter(|g| !g.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linal_core::codes;

    #[test]
    fn test_parse_vector() {
        let v = parse_vector(" ( 1, 2.5 ,-3 ) ").unwrap();
        assert_eq!(v.components(), &[1.0, 2.5, -3.0]);
        assert_eq!(parse_vector("4,5").unwrap().components(), &[4.0, 5.0]);
    }

    #[test]
    fn test_parse_vector_errors() {
        assert_eq!(parse_vector("()").unwrap_err().code, codes::FORMAT_ERROR);
        assert_eq!(parse_vector("(1,,2)").unwrap_err().code, codes::FORMAT_ERROR);
        assert_eq!(parse_vector("(1,x)").unwrap_err().code, codes::FORMAT_ERROR);
        assert_eq!(parse_vector("(inf,1)").unwrap_err().code, codes::FORMAT_ERROR);
    }

    #[test]
    fn test_parse_vectors_count() {
        let vs = parse_vectors("(1,2,3);(4,5,6)", 2).unwrap();
        assert_eq!(vs.len(), 2);
        assert_eq!(vs[1].components(), &[4.0, 5.0, 6.0]);

        // Empty groups are ignored
        assert_eq!(parse_vectors("(1,2);;(3,4);", 2).unwrap().len(), 2);

        let err = parse_vectors("(1,2)", 2).unwrap_err();
        assert_eq!(err.code, codes::FORMAT_ERROR);
        assert!(err.message.contains("expected 2 vectors, found 1"));
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse_scalars("1; -2 ;3.5", 3).unwrap(), vec![1.0, -2.0, 3.5]);
        assert_eq!(parse_scalars("1;2", 3).unwrap_err().code, codes::FORMAT_ERROR);
        assert_eq!(parse_scalars("1;b;3", 3).unwrap_err().code, codes::FORMAT_ERROR);
    }

    #[test]
    fn test_parse_matrix() {
        let m = parse_matrix("[(1, 2), (3, 4)]").unwrap();
        assert_eq!((m.rows(), m.cols()), (2, 2));
        assert_eq!(m[(1, 0)], 3.0);

        let single = parse_matrix("[(5,6,7)]").unwrap();
        assert_eq!((single.rows(), single.cols()), (1, 3));

        let column = parse_matrix("[(5),(10)]").unwrap();
        assert_eq!((column.rows(), column.cols()), (2, 1));
    }

    #[test]
    fn test_parse_matrix_empty() {
        assert!(parse_matrix("").unwrap().is_empty());
        assert!(parse_matrix("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_matrix_errors() {
        assert_eq!(parse_matrix("[(1,2),(3)]").unwrap_err().code, codes::FORMAT_ERROR);
        assert_eq!(parse_matrix("[(1,a),(3,4)]").unwrap_err().code, codes::FORMAT_ERROR);
        assert_eq!(parse_matrix("[(1,2),()]").unwrap_err().code, codes::FORMAT_ERROR);
    }
}
