//! Matrix arithmetic and inverse

use linal_core::{LinalError, Matrix, Tolerance, Value};
use linal_plugin::{ArgMeta, EvalContext, Grammar, OperationMeta, OperationPlugin};
use tracing::debug;
use crate::helpers::{check_arity, check_non_empty, check_same_shape, check_square, extract_matrix, extract_text, ArithmeticOp};
use crate::props::MinorView;

/// Right-hand side of a matrix arithmetic command
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixOperand {
    Matrix(Matrix),
    Scalar(f64),
}

/// `A + B`, `A - B`, `A · B`, or `A · k`
pub fn arithmetic(op: ArithmeticOp, a: &Matrix, rhs: &MatrixOperand) -> Result<Matrix, LinalError> {
    check_non_empty(a, "Matrix arithmetic")?;
    match (op, rhs) {
        (ArithmeticOp::Add, MatrixOperand::Matrix(b)) => {
            check_same_shape(a, b, "Matrix arithmetic")?;
            Ok(Matrix::from_dmatrix(a.as_dmatrix() + b.as_dmatrix()))
        }
        (ArithmeticOp::Sub, MatrixOperand::Matrix(b)) => {
            check_same_shape(a, b, "Matrix arithmetic")?;
            Ok(Matrix::from_dmatrix(a.as_dmatrix() - b.as_dmatrix()))
        }
        (ArithmeticOp::Mul, MatrixOperand::Matrix(b)) => {
            check_non_empty(b, "Matrix arithmetic")?;
            if a.cols() != b.rows() {
                return Err(LinalError::shape_mismatch(format!(
                    "Matrix arithmetic: incompatible dimensions {}×{} and {}×{}",
                    a.rows(), a.cols(), b.rows(), b.cols()
                )));
            }
            Ok(Matrix::from_dmatrix(a.as_dmatrix() * b.as_dmatrix()))
        }
        (ArithmeticOp::Mul, MatrixOperand::Scalar(k)) => Ok(Matrix::from_dmatrix(a.as_dmatrix() * *k)),
        (op, MatrixOperand::Scalar(_)) => Err(LinalError::arity("Matrix arithmetic", "two matrices", 1)
            .with_note(format!("'{}' needs a second matrix, only '*' accepts a scalar", op))),
    }
}

/// Inverse together with the quantities it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct Inverse {
    pub determinant: f64,
    pub adjugate: Matrix,
    pub matrix: Matrix,
}

/// Transpose of the cofactor matrix
pub fn adjugate(m: &Matrix) -> Result<Matrix, LinalError> {
    check_square(m, "Inverse matrix")?;
    let view = MinorView::full(m);
    let n = m.rows();
    let mut adj = Matrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            adj[(j, i)] = view.cofactor(i, j);
        }
    }
    Ok(adj)
}

/// `adj(A) / det(A)`; fails with `SINGULAR` when `|det| < tol.zero`
pub fn inverse(m: &Matrix, tol: &Tolerance) -> Result<Inverse, LinalError> {
    check_square(m, "Inverse matrix")?;
    let determinant = MinorView::full(m).determinant();
    if tol.is_zero(determinant) {
        debug!(determinant, "inverse of singular matrix requested");
        return Err(LinalError::singular(format!("determinant is {}", determinant))
            .with_suggestion("Only matrices with a non-zero determinant are invertible"));
    }
    let adjugate = adjugate(m)?;
    let matrix = Matrix::from_dmatrix(adjugate.as_dmatrix() * (1.0 / determinant));
    Ok(Inverse { determinant, adjugate, matrix })
}

// ============================================================================
// MATRIX ARITHMETIC
// ============================================================================

pub struct MatrixArithmeticFn;

static MARITH_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("op", "Text", "Operator: +, - or *"),
    ArgMeta::required("a", "Matrix", "Left operand"),
    ArgMeta::required("b", "Matrix | Number", "Right operand; a scalar only with *"),
];
static MARITH_EXAMPLES: [&str; 3] = [
    "Matrix arithmetic:+:[(1,2),(3,4)];[(1,1),(1,1)] → [(2, 3), (4, 5)]",
    "Matrix arithmetic:*:[(1,2),(3,4)];[(0,1),(1,0)] → [(2, 1), (4, 3)]",
    "Matrix arithmetic:*:[(1,2),(3,4)];2 → [(2, 4), (6, 8)]",
];
static MARITH_RELATED: [&str; 1] = ["Vector arithmetic"];

impl OperationPlugin for MatrixArithmeticFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Matrix arithmetic",
            aliases: &["Арифметические операции над матрицами"],
            description: "Add, subtract, or multiply two matrices, or scale a matrix by a number",
            usage: "Matrix arithmetic:op:M1;M2 | Matrix arithmetic:*:M1;k",
            grammar: Grammar::MatrixArithmetic,
            args: &MARITH_ARGS,
            returns: "Matrix",
            examples: &MARITH_EXAMPLES,
            category: "matrix",
            related: &MARITH_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &mut EvalContext) -> Value {
        let func = "Matrix arithmetic";
        let result = check_arity(args, 3, func)
            .and_then(|_| extract_text(&args[0], func, "op"))
            .and_then(ArithmeticOp::parse)
            .and_then(|op| {
                let a = extract_matrix(&args[1], func, "a")?;
                let rhs = match &args[2] {
                    Value::Number(k) => MatrixOperand::Scalar(*k),
                    other => MatrixOperand::Matrix(extract_matrix(other, func, "b")?.clone()),
                };
                arithmetic(op, a, &rhs)
            });
        Value::from(result)
    }
}

// ============================================================================
// INVERSE MATRIX
// ============================================================================

pub struct InverseFn;

static INVERSE_ARGS: [ArgMeta; 1] = [ArgMeta::required("matrix", "Matrix", "Square, non-singular matrix")];
static INVERSE_EXAMPLES: [&str; 2] = [
    "Inverse matrix:[(2,0),(0,4)] → [(0.5, 0), (0, 0.25)]",
    "Inverse matrix:[(4,7),(2,6)] → [(0.6, -0.7), (-0.2, 0.4)]",
];
static INVERSE_RELATED: [&str; 2] = ["Determinant", "Solve linear system"];

impl OperationPlugin for InverseFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Inverse matrix",
            aliases: &["Обратная матрица", "Inverse"],
            description: "Inverse via the adjugate (transposed cofactor matrix) divided by the determinant",
            usage: "Inverse matrix:M",
            grammar: Grammar::Matrix,
            args: &INVERSE_ARGS,
            returns: "Matrix",
            examples: &INVERSE_EXAMPLES,
            category: "matrix",
            related: &INVERSE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = check_arity(args, 1, "Inverse matrix")
            .and_then(|_| extract_matrix(&args[0], "Inverse matrix", "matrix"))
            .and_then(|m| inverse(m, &ctx.tolerance));
        match result {
            Ok(inv) => {
                ctx.record("determinant", inv.determinant);
                ctx.record("adjugate", inv.adjugate);
                Value::Matrix(inv.matrix)
            }
            Err(e) => Value::Error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linal_core::codes;
    use proptest::prelude::*;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_add_sub() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = MatrixOperand::Matrix(m(&[&[1.0, 1.0], &[1.0, 1.0]]));
        assert_eq!(arithmetic(ArithmeticOp::Add, &a, &b).unwrap(), m(&[&[2.0, 3.0], &[4.0, 5.0]]));
        assert_eq!(arithmetic(ArithmeticOp::Sub, &a, &b).unwrap(), m(&[&[0.0, 1.0], &[2.0, 3.0]]));

        let wide = MatrixOperand::Matrix(Matrix::zeros(2, 3));
        assert_eq!(arithmetic(ArithmeticOp::Add, &a, &wide).unwrap_err().code, codes::SHAPE_MISMATCH);
    }

    #[test]
    fn test_multiply() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let b = MatrixOperand::Matrix(m(&[&[1.0], &[0.0], &[1.0]]));
        assert_eq!(arithmetic(ArithmeticOp::Mul, &a, &b).unwrap(), m(&[&[4.0], &[10.0]]));

        let bad = MatrixOperand::Matrix(m(&[&[1.0, 2.0]]));
        assert_eq!(arithmetic(ArithmeticOp::Mul, &a, &bad).unwrap_err().code, codes::SHAPE_MISMATCH);
    }

    #[test]
    fn test_scalar() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let k = MatrixOperand::Scalar(2.0);
        assert_eq!(arithmetic(ArithmeticOp::Mul, &a, &k).unwrap(), m(&[&[2.0, 4.0], &[6.0, 8.0]]));
        assert_eq!(arithmetic(ArithmeticOp::Add, &a, &k).unwrap_err().code, codes::ARITY_ERROR);
    }

    #[test]
    fn test_inverse() {
        let a = m(&[&[4.0, 7.0], &[2.0, 6.0]]);
        let inv = inverse(&a, &Tolerance::default()).unwrap();
        assert_eq!(inv.determinant, 10.0);
        assert_eq!(inv.adjugate, m(&[&[6.0, -7.0], &[-2.0, 4.0]]));
        assert!(inv.matrix.approx_eq(&m(&[&[0.6, -0.7], &[-0.2, 0.4]]), 1e-12));

        let one = inverse(&m(&[&[4.0]]), &Tolerance::default()).unwrap();
        assert_eq!(one.matrix, m(&[&[0.25]]));
    }

    #[test]
    fn test_inverse_errors() {
        let tol = Tolerance::default();
        let err = inverse(&m(&[&[1.0, 2.0], &[2.0, 4.0]]), &tol).unwrap_err();
        assert_eq!(err.code, codes::SINGULAR);
        let err = inverse(&Matrix::zeros(2, 3), &tol).unwrap_err();
        assert_eq!(err.code, codes::NOT_SQUARE);
    }

    #[test]
    fn test_plugin_scalar_rhs() {
        let args = [
            Value::from("*"),
            Value::from(m(&[&[1.0, 2.0]])),
            Value::Number(3.0),
        ];
        let out = MatrixArithmeticFn.call(&args, &mut EvalContext::new());
        assert_eq!(out.as_matrix(), Some(&m(&[&[3.0, 6.0]])));
    }

    fn square(n: usize) -> impl Strategy<Value = Matrix> {
        prop::collection::vec(-9i32..=9, n * n).prop_map(move |xs| {
            let values: Vec<f64> = xs.into_iter().map(f64::from).collect();
            Matrix::from_row_slice(n, n, &values)
        })
    }

    proptest! {
        #[test]
        fn prop_inverse_times_matrix_is_identity(a in (1usize..=4).prop_flat_map(square)) {
            let det = MinorView::full(&a).determinant();
            prop_assume!(det.abs() > 0.5);
            let inv = inverse(&a, &Tolerance::default()).unwrap();
            let product = arithmetic(ArithmeticOp::Mul, &a, &MatrixOperand::Matrix(inv.matrix)).unwrap();
            prop_assert!(product.approx_eq(&Matrix::identity(a.rows()), 1e-6));
        }
    }
}
