//! Helper functions for operation plugins

use linal_core::{LinalError, Matrix, Value, Vector};
use std::fmt;

/// Elementwise operator shared by vector and matrix arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
}

impl ArithmeticOp {
    pub fn parse(s: &str) -> Result<Self, LinalError> {
        match s.trim() {
            "+" => Ok(ArithmeticOp::Add),
            "-" => Ok(ArithmeticOp::Sub),
            "*" => Ok(ArithmeticOp::Mul),
            other => Err(LinalError::format_error(format!("unknown operator '{}'", other))
                .with_suggestion("Use one of +, -, *")),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
        }
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Extract a Number from a Value
pub fn extract_number(value: &Value, func: &str, arg: &str) -> Result<f64, LinalError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Error(e) => Err(e.clone()),
        _ => Err(LinalError::arg_type(func, arg, "Number", value.type_name())),
    }
}

/// Extract a Text from a Value
pub fn extract_text<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a str, LinalError> {
    match value {
        Value::Text(s) => Ok(s),
        Value::Error(e) => Err(e.clone()),
        _ => Err(LinalError::arg_type(func, arg, "Text", value.type_name())),
    }
}

/// Extract a vector from a Value
pub fn extract_vector<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a Vector, LinalError> {
    match value {
        Value::Vector(v) => Ok(v),
        Value::Error(e) => Err(e.clone()),
        _ => Err(LinalError::arg_type(func, arg, "Vector", value.type_name())),
    }
}

/// Extract a matrix from a Value, rejecting the 0×0 matrix
pub fn extract_matrix<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a Matrix, LinalError> {
    match value {
        Value::Matrix(m) => {
            check_non_empty(m, func)?;
            Ok(m)
        }
        Value::Error(e) => Err(e.clone()),
        _ => Err(LinalError::arg_type(func, arg, "Matrix", value.type_name())),
    }
}

/// Extract every argument as a vector
pub fn extract_vectors<'a>(args: &'a [Value], func: &str) -> Result<Vec<&'a Vector>, LinalError> {
    args.iter()
        .enumerate()
        .map(|(i, v)| extract_vector(v, func, &format!("v{}", i + 1)))
        .collect()
}

/// Owned copies of every argument as a vector
pub fn extract_owned_vectors(args: &[Value], func: &str) -> Result<Vec<Vector>, LinalError> {
    Ok(extract_vectors(args, func)?.into_iter().cloned().collect())
}

/// Check the argument count
pub fn check_arity(args: &[Value], expected: usize, func: &str) -> Result<(), LinalError> {
    if args.len() != expected {
        return Err(LinalError::arity(func, expected, args.len()));
    }
    Ok(())
}

/// Check that a matrix has at least one entry
pub fn check_non_empty(m: &Matrix, func: &str) -> Result<(), LinalError> {
    if m.is_empty() {
        return Err(LinalError::format_error(format!("{}: matrix is empty", func))
            .with_suggestion("Write matrices as [(a,b),(c,d)]"));
    }
    Ok(())
}

/// Check that a matrix is square
pub fn check_square(m: &Matrix, func: &str) -> Result<(), LinalError> {
    check_non_empty(m, func)?;
    if !m.is_square() {
        return Err(LinalError::not_square(func, m.rows(), m.cols()));
    }
    Ok(())
}

/// Check that two matrices have the same dimensions
pub fn check_same_shape(a: &Matrix, b: &Matrix, func: &str) -> Result<(), LinalError> {
    if a.rows() != b.rows() || a.cols() != b.cols() {
        return Err(LinalError::shape_mismatch(format!(
            "{}: matrices must have same dimensions: {}×{} vs {}×{}",
            func, a.rows(), a.cols(), b.rows(), b.cols()
        )));
    }
    Ok(())
}

/// Check that two vectors have the same dimension
pub fn check_same_dim(a: &Vector, b: &Vector, func: &str) -> Result<(), LinalError> {
    if a.dim() != b.dim() {
        return Err(LinalError::dimension_mismatch(format!(
            "{}: vectors must have same dimension: {} vs {}",
            func, a.dim(), b.dim()
        )));
    }
    Ok(())
}

/// Check that every vector has the dimension of the first
pub fn check_uniform_dim(vectors: &[Vector], func: &str) -> Result<(), LinalError> {
    if let Some(first) = vectors.first() {
        for v in &vectors[1..] {
            check_same_dim(first, v, func)?;
        }
    }
    Ok(())
}

/// Index of the row in `from..rows` with the largest magnitude in `col`
pub(crate) fn pivot_row(m: &Matrix, col: usize, from: usize) -> usize {
    let mut best = from;
    for r in from + 1..m.rows() {
        if m[(r, col)].abs() > m[(best, col)].abs() {
            best = r;
        }
    }
    best
}

/// `row[target] -= factor * row[source]` over columns `from..`
pub(crate) fn eliminate(m: &mut Matrix, target: usize, source: usize, factor: f64, from: usize) {
    for k in from..m.cols() {
        let delta = factor * m[(source, k)];
        m[(target, k)] -= delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linal_core::codes;

    #[test]
    fn test_arithmetic_op() {
        assert_eq!(ArithmeticOp::parse(" + ").unwrap(), ArithmeticOp::Add);
        assert_eq!(ArithmeticOp::parse("*").unwrap().to_string(), "*");
        assert_eq!(ArithmeticOp::parse("/").unwrap_err().code, codes::FORMAT_ERROR);
    }

    #[test]
    fn test_extract_vector() {
        let val = Value::from(Vector::new(vec![1.0, 2.0]));
        assert_eq!(extract_vector(&val, "test", "v").unwrap().dim(), 2);

        let err = extract_vector(&Value::Number(1.0), "test", "v").unwrap_err();
        assert_eq!(err.code, codes::ARG_TYPE);
    }

    #[test]
    fn test_extract_matrix_rejects_empty() {
        let err = extract_matrix(&Value::from(Matrix::empty()), "test", "m").unwrap_err();
        assert_eq!(err.code, codes::FORMAT_ERROR);
    }

    #[test]
    fn test_extract_passes_errors_through() {
        let val = Value::Error(LinalError::singular("boom"));
        assert_eq!(extract_number(&val, "test", "x").unwrap_err().code, codes::SINGULAR);
    }

    #[test]
    fn test_checks() {
        let square = Matrix::identity(2);
        let wide = Matrix::zeros(2, 3);
        assert!(check_square(&square, "test").is_ok());
        assert_eq!(check_square(&wide, "test").unwrap_err().code, codes::NOT_SQUARE);
        assert_eq!(check_same_shape(&square, &wide, "test").unwrap_err().code, codes::SHAPE_MISMATCH);

        let vs = vec![Vector::new(vec![1.0]), Vector::new(vec![1.0, 2.0])];
        assert_eq!(check_uniform_dim(&vs, "test").unwrap_err().code, codes::DIMENSION_MISMATCH);
    }

    #[test]
    fn test_pivot_row() {
        let m = Matrix::from_rows(vec![vec![1.0], vec![-5.0], vec![3.0]]).unwrap();
        assert_eq!(pivot_row(&m, 0, 0), 1);
        assert_eq!(pivot_row(&m, 0, 2), 2);
    }
}
