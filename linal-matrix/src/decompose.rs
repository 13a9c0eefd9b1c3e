//! Householder QR and the QR eigenvalue iteration

use linal_core::{LinalError, Matrix, Tolerance, Value, Vector};
use linal_plugin::{ArgMeta, EvalContext, Grammar, OperationMeta, OperationPlugin};
use tracing::{debug, warn};
use crate::helpers::{check_arity, check_square, eliminate, extract_matrix, pivot_row};

/// `A = Q·R` by Householder reflections; `Q` orthogonal, `R` upper triangular
pub fn householder_qr(a: &Matrix) -> (Matrix, Matrix) {
    let (m, n) = (a.rows(), a.cols());
    let mut r = a.clone();
    let mut q = Matrix::identity(m);

    for k in 0..n.min(m.saturating_sub(1)) {
        let x: Vec<f64> = (k..m).map(|i| r[(i, k)]).collect();
        let norm_x = x.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm_x == 0.0 {
            continue;
        }
        // Sign of a zero leading entry is taken as +1
        let alpha = if x[0] >= 0.0 { -norm_x } else { norm_x };
        let mut v = x;
        v[0] -= alpha;
        let norm_v = v.iter().map(|t| t * t).sum::<f64>().sqrt();
        if norm_v == 0.0 {
            continue;
        }
        v.iter_mut().for_each(|t| *t /= norm_v);

        // R ← H·R on rows k..m
        for j in 0..n {
            let s: f64 = v.iter().enumerate().map(|(i, vi)| vi * r[(k + i, j)]).sum();
            for (i, vi) in v.iter().enumerate() {
                r[(k + i, j)] -= 2.0 * vi * s;
            }
        }
        // Q ← Q·H on columns k..m
        for row in 0..m {
            let s: f64 = v.iter().enumerate().map(|(i, vi)| q[(row, k + i)] * vi).sum();
            for (i, vi) in v.iter().enumerate() {
                q[(row, k + i)] -= 2.0 * s * vi;
            }
        }
    }

    (q, r)
}

/// Result of the QR iteration
#[derive(Debug, Clone, PartialEq)]
pub struct QrIteration {
    /// Final iterate; its diagonal holds the eigenvalue estimates
    pub matrix: Matrix,
    pub iterations: usize,
    pub converged: bool,
}

impl QrIteration {
    pub fn diagonal(&self) -> Vector {
        Vector::new((0..self.matrix.rows()).map(|i| self.matrix[(i, i)]).collect())
    }
}

fn lower_triangle_below(m: &Matrix, threshold: f64) -> bool {
    (1..m.rows()).all(|i| (0..i).all(|j| m[(i, j)].abs() < threshold))
}

/// `Aₖ₊₁ = Rₖ·Qₖ` until the strictly lower triangle is below `threshold`
/// or `max_iterations` is reached
pub fn qr_iterate(a: &Matrix, threshold: f64, max_iterations: usize) -> QrIteration {
    let mut current = a.clone();
    for iteration in 1..=max_iterations {
        let (q, r) = householder_qr(&current);
        current = Matrix::from_dmatrix(r.as_dmatrix() * q.as_dmatrix());
        if lower_triangle_below(&current, threshold) {
            debug!(iteration, "QR iteration converged");
            return QrIteration { matrix: current, iterations: iteration, converged: true };
        }
    }
    warn!(max_iterations, "QR iteration did not converge, using the last diagonal");
    QrIteration { matrix: current, iterations: max_iterations, converged: false }
}

/// First 2×2 diagonal block of an unconverged iterate whose eigenvalues
/// are a complex-conjugate pair
fn complex_block(m: &Matrix, threshold: f64) -> Option<usize> {
    (0..m.rows().saturating_sub(1)).find(|&i| {
        let (a, b, c, d) = (m[(i, i)], m[(i, i + 1)], m[(i + 1, i)], m[(i + 1, i + 1)]);
        c.abs() >= threshold && (a - d) * (a - d) + 4.0 * b * c < 0.0
    })
}

fn run_qr(a: &Matrix, threshold: f64, tol: &Tolerance, func: &str) -> Result<QrIteration, LinalError> {
    check_square(a, func)?;
    let qr = qr_iterate(a, threshold, tol.max_qr_iterations);
    if !qr.converged {
        if let Some(i) = complex_block(&qr.matrix, threshold) {
            return Err(LinalError::no_convergence(format!(
                "QR iteration did not settle within {} iterations",
                qr.iterations
            )).with_note(format!("rows {} and {} carry a complex eigenvalue pair", i + 1, i + 2)));
        }
    }
    Ok(qr)
}

/// Eigenvalues as the diagonal of the final QR iterate.
///
/// Hitting the iteration cap is not an error on its own: the diagonal of
/// the last iterate is returned and `converged` is false. Only a
/// complex-conjugate block left on the diagonal fails with `NO_CONVERGENCE`.
pub fn eigenvalues(a: &Matrix, tol: &Tolerance) -> Result<QrIteration, LinalError> {
    run_qr(a, tol.eigenvalue, tol, "Eigenvalues")
}

/// One eigenvector per eigenvalue.
///
/// For each `λ`, `A − λI` is reduced with partial pivoting. The last
/// column without a pivot is the free variable and is fixed to 1; when
/// every column has a pivot the last one is treated as free. The rest
/// follow by back-substitution. Each eigenvalue is assumed to have a
/// one-dimensional eigenspace.
pub fn eigenvectors(a: &Matrix, tol: &Tolerance) -> Result<(QrIteration, Vec<Vector>), LinalError> {
    let qr = run_qr(a, tol.eigenvector, tol, "Eigenvectors")?;
    let vectors = qr.diagonal().iter()
        .map(|&lambda| null_vector(a, lambda, tol))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((qr, vectors))
}

fn null_vector(a: &Matrix, lambda: f64, tol: &Tolerance) -> Result<Vector, LinalError> {
    let n = a.rows();
    let mut work = a.clone();
    for i in 0..n {
        work[(i, i)] -= lambda;
    }

    let mut pivots: Vec<usize> = Vec::with_capacity(n);
    for col in 0..n {
        let row = pivots.len();
        if row == n {
            break;
        }
        let p = pivot_row(&work, col, row);
        if tol.is_zero(work[(p, col)]) {
            continue;
        }
        work.swap_rows(row, p);
        let pivot = work[(row, col)];
        for r in row + 1..n {
            let factor = work[(r, col)] / pivot;
            eliminate(&mut work, r, row, factor, col);
        }
        pivots.push(col);
    }

    let free = match (0..n).rev().find(|c| !pivots.contains(c)) {
        Some(c) => c,
        None => {
            pivots.pop();
            n - 1
        }
    };

    let mut x = vec![0.0; n];
    x[free] = 1.0;
    for (row, &col) in pivots.iter().enumerate().rev() {
        let sum: f64 = (col + 1..n).map(|c| work[(row, c)] * x[c]).sum();
        x[col] = -sum / work[(row, col)];
    }

    let norm = x.iter().map(|t| t * t).sum::<f64>().sqrt();
    let v = Vector::new(x.into_iter().map(|t| t / norm).collect());

    let av = a.as_dmatrix() * v.as_dvector();
    let residual = av.iter().zip(v.iter())
        .map(|(y, x)| (y - lambda * x).powi(2))
        .sum::<f64>()
        .sqrt();
    let limit = tol.eigenvector.sqrt() * a.as_dmatrix().amax().max(1.0);
    if residual > limit {
        return Err(LinalError::degenerate(format!(
            "no eigenvector found for eigenvalue {}, residual {:.3e}",
            lambda, residual
        )));
    }
    Ok(v)
}

// ============================================================================
// EIGENVALUES
// ============================================================================

pub struct EigenvaluesFn;

static EIGENVALUES_ARGS: [ArgMeta; 1] = [ArgMeta::required("matrix", "Matrix", "Square matrix with real eigenvalues")];
static EIGENVALUES_EXAMPLES: [&str; 2] = [
    "Eigenvalues:[(2,1),(1,2)] → (3, 1)",
    "Eigenvalues:[(4,0),(0,-1)] → (4, -1)",
];
static EIGENVALUES_RELATED: [&str; 2] = ["Eigenvectors", "Determinant"];

impl OperationPlugin for EigenvaluesFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Eigenvalues",
            aliases: &["Собственные числа", "Собственные значения"],
            description: "Eigenvalues by unshifted QR iteration with Householder reflections",
            usage: "Eigenvalues:M",
            grammar: Grammar::Matrix,
            args: &EIGENVALUES_ARGS,
            returns: "Vector",
            examples: &EIGENVALUES_EXAMPLES,
            category: "matrix",
            related: &EIGENVALUES_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = check_arity(args, 1, "Eigenvalues")
            .and_then(|_| extract_matrix(&args[0], "Eigenvalues", "matrix"))
            .and_then(|m| eigenvalues(m, &ctx.tolerance));
        match result {
            Ok(qr) => {
                ctx.record("iterations", qr.iterations);
                ctx.record("converged", qr.converged);
                let values = qr.diagonal();
                ctx.record("final iterate", qr.matrix);
                Value::Vector(values)
            }
            Err(e) => Value::Error(e),
        }
    }
}

// ============================================================================
// EIGENVECTORS
// ============================================================================

pub struct EigenvectorsFn;

static EIGENVECTORS_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("matrix", "Matrix", "Square matrix with real, distinct eigenvalues"),
];
static EIGENVECTORS_EXAMPLES: [&str; 1] = [
    "Eigenvectors:[(2,1),(1,2)] → (0.7071, 0.7071); (-0.7071, 0.7071)",
];
static EIGENVECTORS_RELATED: [&str; 1] = ["Eigenvalues"];

impl OperationPlugin for EigenvectorsFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Eigenvectors",
            aliases: &["Собственные векторы"],
            description: "Unit eigenvectors, one per eigenvalue, by back-substitution in the reduced A − λI",
            usage: "Eigenvectors:M",
            grammar: Grammar::Matrix,
            args: &EIGENVECTORS_ARGS,
            returns: "List",
            examples: &EIGENVECTORS_EXAMPLES,
            category: "matrix",
            related: &EIGENVECTORS_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = check_arity(args, 1, "Eigenvectors")
            .and_then(|_| extract_matrix(&args[0], "Eigenvectors", "matrix"))
            .and_then(|m| eigenvectors(m, &ctx.tolerance));
        match result {
            Ok((qr, vectors)) => {
                ctx.record("converged", qr.converged);
                ctx.record("eigenvalues", qr.diagonal());
                Value::from(vectors)
            }
            Err(e) => Value::Error(e),
        }
    }
}
