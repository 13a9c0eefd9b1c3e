//! Linear systems: Gaussian elimination and Gauss-Jordan reduction

use linal_core::{LinalError, Matrix, Tolerance, Value, Vector};
use linal_plugin::{ArgMeta, EvalContext, Grammar, OperationMeta, OperationPlugin};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use crate::helpers::{check_arity, check_square, eliminate, extract_matrix, extract_text, pivot_row};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolveMethod {
    /// Forward elimination, then back-substitution
    Gauss,
    /// Reduction to reduced row-echelon form
    Jordan,
}

impl FromStr for SolveMethod {
    type Err = LinalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gauss" | "гаусс" | "гаусса" => Ok(SolveMethod::Gauss),
            "jordan" | "gauss-jordan" | "жордан" | "жордана" => Ok(SolveMethod::Jordan),
            other => Err(LinalError::format_error(format!("unknown solve method '{}'", other))
                .with_suggestion("Use Gauss or Jordan")),
        }
    }
}

impl fmt::Display for SolveMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveMethod::Gauss => f.write_str("Gauss"),
            SolveMethod::Jordan => f.write_str("Jordan"),
        }
    }
}

/// Solution vector plus the reduced augmented matrix it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub method: SolveMethod,
    pub values: Vector,
    pub augmented: Matrix,
}

/// `[A | b]`
pub fn augment(a: &Matrix, b: &Matrix) -> Matrix {
    let n = a.rows();
    let mut aug = Matrix::zeros(n, a.cols() + b.cols());
    for i in 0..n {
        for j in 0..a.cols() {
            aug[(i, j)] = a[(i, j)];
        }
        for j in 0..b.cols() {
            aug[(i, a.cols() + j)] = b[(i, j)];
        }
    }
    aug
}

/// Solve `A x = b` for square `A` and single-column `b`
pub fn solve_linear_system(
    a: &Matrix,
    b: &Matrix,
    method: SolveMethod,
    tol: &Tolerance,
) -> Result<Solution, LinalError> {
    check_square(a, "Solve linear system")?;
    if a.rows() != b.rows() {
        return Err(LinalError::dimension_mismatch(format!(
            "coefficient matrix has {} rows, constants have {}",
            a.rows(), b.rows()
        )));
    }
    if b.cols() != 1 {
        return Err(LinalError::shape_mismatch(format!(
            "constants must be a single column, got {}×{}",
            b.rows(), b.cols()
        )).with_suggestion("Write constants as [(b1),(b2),...]"));
    }

    let mut aug = augment(a, b);
    let values = match method {
        SolveMethod::Gauss => gauss(&mut aug, tol)?,
        SolveMethod::Jordan => jordan(&mut aug, tol)?,
    };
    Ok(Solution { method, values, augmented: aug })
}

/// Select and swap the pivot for `col`, failing on a near-zero pivot
fn place_pivot(aug: &mut Matrix, col: usize, tol: &Tolerance) -> Result<f64, LinalError> {
    let p = pivot_row(aug, col, col);
    let pivot = aug[(p, col)];
    if tol.is_zero(pivot) {
        debug!(col, pivot, "near-zero pivot");
        return Err(LinalError::singular(format!("no usable pivot in column {}", col + 1))
            .with_note("the system has no unique solution"));
    }
    aug.swap_rows(col, p);
    Ok(pivot)
}

fn gauss(aug: &mut Matrix, tol: &Tolerance) -> Result<Vector, LinalError> {
    let n = aug.rows();
    let last = aug.cols() - 1;

    for col in 0..n {
        let pivot = place_pivot(aug, col, tol)?;
        for r in col + 1..n {
            let factor = aug[(r, col)] / pivot;
            eliminate(aug, r, col, factor, col);
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let tail: f64 = (i + 1..n).map(|j| aug[(i, j)] * x[j]).sum();
        x[i] = (aug[(i, last)] - tail) / aug[(i, i)];
    }
    Ok(Vector::new(x))
}

fn jordan(aug: &mut Matrix, tol: &Tolerance) -> Result<Vector, LinalError> {
    let n = aug.rows();
    let last = aug.cols() - 1;

    for col in 0..n {
        let pivot = place_pivot(aug, col, tol)?;
        for k in col..aug.cols() {
            aug[(col, k)] /= pivot;
        }
        for r in (0..n).filter(|&r| r != col) {
            let factor = aug[(r, col)];
            eliminate(aug, r, col, factor, col);
        }
    }

    Ok(Vector::new((0..n).map(|i| aug[(i, last)]).collect()))
}

// ============================================================================
// SOLVE LINEAR SYSTEM
// ============================================================================

pub struct SolveFn;

static SOLVE_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("method", "Text", "Gauss or Jordan"),
    ArgMeta::required("a", "Matrix", "Square coefficient matrix"),
    ArgMeta::required("b", "Matrix", "Constants as a single column"),
];
static SOLVE_EXAMPLES: [&str; 2] = [
    "Solve linear system:Gauss:[(2,1),(1,3)];[(5),(10)] → (1, 3)",
    "Solve linear system:Jordan:[(1,1),(1,-1)];[(3),(1)] → (2, 1)",
];
static SOLVE_RELATED: [&str; 2] = ["Inverse matrix", "Determinant"];

impl OperationPlugin for SolveFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Solve linear system",
            aliases: &["Решение СЛАУ", "Solve"],
            description: "Solve A·x = b by Gaussian elimination or Gauss-Jordan reduction with partial pivoting",
            usage: "Solve linear system:method:A;b",
            grammar: Grammar::LinearSystem,
            args: &SOLVE_ARGS,
            returns: "Vector",
            examples: &SOLVE_EXAMPLES,
            category: "matrix",
            related: &SOLVE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let func = "Solve linear system";
        let result = check_arity(args, 3, func)
            .and_then(|_| extract_text(&args[0], func, "method"))
            .and_then(SolveMethod::from_str)
            .and_then(|method| {
                let a = extract_matrix(&args[1], func, "a")?;
                let b = extract_matrix(&args[2], func, "b")?;
                if a.rows() == b.rows() {
                    ctx.record_with("augmented", || Value::Matrix(augment(a, b)));
                }
                solve_linear_system(a, b, method, &ctx.tolerance)
            });
        match result {
            Ok(solution) => {
                ctx.record("reduced", solution.augmented);
                Value::Vector(solution.values)
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

    fn solve(a: &Matrix, b: &Matrix, method: SolveMethod) -> Result<Solution, LinalError> {
        solve_linear_system(a, b, method, &Tolerance::default())
    }

    #[test]
    fn test_gauss() {
        let a = m(&[&[2.0, 1.0], &[1.0, 3.0]]);
        let b = m(&[&[5.0], &[10.0]]);
        let x = solve(&a, &b, SolveMethod::Gauss).unwrap().values;
        assert!(x.approx_eq(&Vector::new(vec![1.0, 3.0]), 1e-12));
    }

    #[test]
    fn test_jordan_needs_pivoting() {
        let a = m(&[&[0.0, 1.0, 1.0], &[1.0, 0.0, 1.0], &[1.0, 1.0, 0.0]]);
        let b = m(&[&[5.0], &[4.0], &[3.0]]);
        let solution = solve(&a, &b, SolveMethod::Jordan).unwrap();
        assert!(solution.values.approx_eq(&Vector::new(vec![1.0, 2.0, 3.0]), 1e-12));
        // Reduced row-echelon: identity on the left
        for i in 0..3 {
            assert!((solution.augmented[(i, i)] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_input_untouched() {
        let a = m(&[&[0.0, 1.0], &[1.0, 0.0]]);
        let b = m(&[&[1.0], &[2.0]]);
        let before = a.clone();
        solve(&a, &b, SolveMethod::Gauss).unwrap();
        assert_eq!(a, before);
    }

    #[test]
    fn test_errors() {
        let singular = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
        let b = m(&[&[1.0], &[2.0]]);
        assert_eq!(solve(&singular, &b, SolveMethod::Gauss).unwrap_err().code, codes::SINGULAR);
        assert_eq!(solve(&singular, &b, SolveMethod::Jordan).unwrap_err().code, codes::SINGULAR);

        let wide = Matrix::zeros(2, 3);
        assert_eq!(solve(&wide, &b, SolveMethod::Gauss).unwrap_err().code, codes::NOT_SQUARE);

        let a = Matrix::identity(3);
        assert_eq!(solve(&a, &b, SolveMethod::Gauss).unwrap_err().code, codes::DIMENSION_MISMATCH);

        let two_cols = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let a = Matrix::identity(2);
        assert_eq!(solve(&a, &two_cols, SolveMethod::Gauss).unwrap_err().code, codes::SHAPE_MISMATCH);
    }

    #[test]
    fn test_method_names() {
        assert_eq!("gauss".parse::<SolveMethod>().unwrap(), SolveMethod::Gauss);
        assert_eq!("Гаусс".parse::<SolveMethod>().unwrap(), SolveMethod::Gauss);
        assert_eq!(" JORDAN ".parse::<SolveMethod>().unwrap(), SolveMethod::Jordan);
        assert_eq!("Жордан".parse::<SolveMethod>().unwrap(), SolveMethod::Jordan);
        assert_eq!("Cramer".parse::<SolveMethod>().unwrap_err().code, codes::FORMAT_ERROR);
    }

    #[test]
    fn test_plugin_records_augmented() {
        let mut ctx = EvalContext::new().with_tracing(true);
        let args = [
            Value::from("Gauss"),
            Value::from(m(&[&[2.0, 1.0], &[1.0, 3.0]])),
            Value::from(m(&[&[5.0], &[10.0]])),
        ];
        let out = SolveFn.call(&args, &mut ctx);
        assert!(out.as_vector().is_some());
        let labels: Vec<&str> = ctx.trace.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["augmented", "reduced"]);
    }

    fn system(n: usize) -> impl Strategy<Value = (Matrix, Matrix)> {
        (
            prop::collection::vec(-9i32..=9, n * n),
            prop::collection::vec(-9i32..=9, n),
        ).prop_map(move |(a, b)| {
            let a: Vec<f64> = a.into_iter().map(f64::from).collect();
            let b: Vec<f64> = b.into_iter().map(f64::from).collect();
            (Matrix::from_row_slice(n, n, &a), Matrix::from_row_slice(n, 1, &b))
        })
    }

    proptest! {
        #[test]
        fn prop_gauss_and_jordan_agree((a, b) in (1usize..=4).prop_flat_map(system)) {
            prop_assume!(crate::props::determinant(&a).unwrap().abs() > 0.5);
            let g = solve(&a, &b, SolveMethod::Gauss).unwrap().values;
            let j = solve(&a, &b, SolveMethod::Jordan).unwrap().values;
            for (x, y) in g.iter().zip(j.iter()) {
                prop_assert!((x - y).abs() <= 1e-6 * (1.0 + x.abs()));
            }
        }
    }
}
