//! Matrix properties: determinant (cofactor expansion) and rank

use linal_core::{LinalError, Matrix, Tolerance, Value};
use linal_plugin::{ArgMeta, EvalContext, Grammar, OperationMeta, OperationPlugin};
use tracing::trace;
use crate::helpers::{check_arity, check_non_empty, check_square, eliminate, extract_matrix, pivot_row};

/// A square submatrix addressed through row/column index lists.
///
/// Minors never copy entries; deleting a row and a column only shrinks
/// the index lists.
#[derive(Debug, Clone)]
pub struct MinorView<'a> {
    source: &'a Matrix,
    rows: Vec<usize>,
    cols: Vec<usize>,
}

impl<'a> MinorView<'a> {
    pub fn full(source: &'a Matrix) -> Self {
        Self {
            source,
            rows: (0..source.rows()).collect(),
            cols: (0..source.cols()).collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.source[(self.rows[i], self.cols[j])]
    }

    /// The view with row `i` and column `j` removed
    pub fn without(&self, i: usize, j: usize) -> MinorView<'a> {
        MinorView {
            source: self.source,
            rows: self.rows.iter().enumerate().filter(|&(k, _)| k != i).map(|(_, &r)| r).collect(),
            cols: self.cols.iter().enumerate().filter(|&(k, _)| k != j).map(|(_, &c)| c).collect(),
        }
    }

    /// Laplace expansion along the first row. The empty view has
    /// determinant 1.
    pub fn determinant(&self) -> f64 {
        match self.size() {
            0 => 1.0,
            1 => self.get(0, 0),
            n => (0..n)
                .map(|j| sign(j) * self.get(0, j) * self.without(0, j).determinant())
                .sum(),
        }
    }

    /// `(-1)^(i+j) · det(minor(i, j))`
    pub fn cofactor(&self, i: usize, j: usize) -> f64 {
        sign(i + j) * self.without(i, j).determinant()
    }
}

fn sign(k: usize) -> f64 {
    if k % 2 == 0 { 1.0 } else { -1.0 }
}

pub fn determinant(m: &Matrix) -> Result<f64, LinalError> {
    check_square(m, "Determinant")?;
    Ok(MinorView::full(m).determinant())
}

/// Signed first-row terms `(-1)^j · a₀ⱼ · det(minor(0, j))`; they sum to
/// the determinant
pub fn cofactor_terms(m: &Matrix) -> Result<Vec<f64>, LinalError> {
    check_square(m, "Determinant")?;
    let view = MinorView::full(m);
    Ok((0..view.size()).map(|j| view.get(0, j) * view.cofactor(0, j)).collect())
}

/// Row-echelon form of a matrix together with its pivot positions
#[derive(Debug, Clone, PartialEq)]
pub struct Echelon {
    pub matrix: Matrix,
    /// `(row, col)` of each pivot, in order
    pub pivots: Vec<(usize, usize)>,
}

impl Echelon {
    pub fn rank(&self) -> usize {
        self.pivots.len()
    }
}

/// Row reduction with partial pivoting on a scratch copy.
///
/// Columns whose best remaining pivot is below `tol.zero` are skipped.
pub fn row_echelon(m: &Matrix, tol: &Tolerance) -> Echelon {
    let mut work = m.clone();
    let mut pivots = Vec::new();
    let mut rank = 0;

    for col in 0..work.cols() {
        if rank == work.rows() {
            break;
        }
        let p = pivot_row(&work, col, rank);
        if tol.is_zero(work[(p, col)]) {
            trace!(col, "no pivot in column");
            continue;
        }
        work.swap_rows(rank, p);
        for r in rank + 1..work.rows() {
            let factor = work[(r, col)] / work[(rank, col)];
            eliminate(&mut work, r, rank, factor, col);
        }
        pivots.push((rank, col));
        rank += 1;
    }

    Echelon { matrix: work, pivots }
}

pub fn rank(m: &Matrix, tol: &Tolerance) -> Result<usize, LinalError> {
    check_non_empty(m, "Matrix rank")?;
    Ok(row_echelon(m, tol).rank())
}

// ============================================================================
// DETERMINANT
// ============================================================================

pub struct DeterminantFn;

static DET_ARGS: [ArgMeta; 1] = [ArgMeta::required("matrix", "Matrix", "Square matrix")];
static DET_EXAMPLES: [&str; 2] = [
    "Determinant:[(2,0),(0,2)] → 4",
    "Determinant:[(1,2),(3,4)] → -2",
];
static DET_RELATED: [&str; 2] = ["Inverse matrix", "Matrix rank"];

impl OperationPlugin for DeterminantFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Determinant",
            aliases: &["Определитель матрицы", "Определитель"],
            description: "Determinant by recursive cofactor expansion along the first row",
            usage: "Determinant:M",
            grammar: Grammar::Matrix,
            args: &DET_ARGS,
            returns: "Number",
            examples: &DET_EXAMPLES,
            category: "matrix",
            related: &DET_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = check_arity(args, 1, "Determinant")
            .and_then(|_| extract_matrix(&args[0], "Determinant", "matrix"))
            .and_then(|m| {
                if ctx.tracing {
                    let terms = cofactor_terms(m)?;
                    ctx.record("cofactor terms", Value::List(terms.iter().map(|t| Value::Number(*t)).collect()));
                    return Ok(terms.into_iter().sum());
                }
                determinant(m)
            });
        Value::from(result)
    }
}

// ============================================================================
// RANK
// ============================================================================

pub struct RankFn;

static RANK_ARGS: [ArgMeta; 1] = [ArgMeta::required("matrix", "Matrix", "Any matrix")];
static RANK_EXAMPLES: [&str; 2] = [
    "Matrix rank:[(1,2),(2,4)] → 1",
    "Matrix rank:[(1,0,0),(0,1,0)] → 2",
];
static RANK_RELATED: [&str; 2] = ["Determinant", "Linear span dimension"];

impl OperationPlugin for RankFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Matrix rank",
            aliases: &["Ранг матрицы", "Rank"],
            description: "Number of pivots found by row reduction with partial pivoting",
            usage: "Matrix rank:M",
            grammar: Grammar::Matrix,
            args: &RANK_ARGS,
            returns: "Number",
            examples: &RANK_EXAMPLES,
            category: "matrix",
            related: &RANK_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = check_arity(args, 1, "Matrix rank")
            .and_then(|_| extract_matrix(&args[0], "Matrix rank", "matrix"))
            .map(|m| {
                let echelon = row_echelon(m, &ctx.tolerance);
                let rank = echelon.rank();
                ctx.record("echelon form", echelon.matrix);
                rank
            });
        Value::from(result)
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
    fn test_determinant() {
        assert_eq!(determinant(&m(&[&[2.0, 0.0], &[0.0, 2.0]])).unwrap(), 4.0);
        assert_eq!(determinant(&m(&[&[1.0, 2.0], &[3.0, 4.0]])).unwrap(), -2.0);
        assert_eq!(determinant(&m(&[&[7.0]])).unwrap(), 7.0);
        let a = m(&[&[6.0, 1.0, 1.0], &[4.0, -2.0, 5.0], &[2.0, 8.0, 7.0]]);
        assert_eq!(determinant(&a).unwrap(), -306.0);
    }

    #[test]
    fn test_determinant_errors() {
        let err = determinant(&Matrix::zeros(2, 3)).unwrap_err();
        assert_eq!(err.code, codes::NOT_SQUARE);
        let err = determinant(&Matrix::empty()).unwrap_err();
        assert_eq!(err.code, codes::FORMAT_ERROR);
    }

    #[test]
    fn test_cofactor_terms_sum_to_determinant() {
        let a = m(&[&[6.0, 1.0, 1.0], &[4.0, -2.0, 5.0], &[2.0, 8.0, 7.0]]);
        let terms = cofactor_terms(&a).unwrap();
        assert_eq!(terms.len(), 3);
        assert_eq!(terms.iter().sum::<f64>(), -306.0);
    }

    #[test]
    fn test_minor_view() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 10.0]]);
        let view = MinorView::full(&a).without(1, 1);
        assert_eq!(view.size(), 2);
        assert_eq!(view.get(1, 1), 10.0);
        assert_eq!(view.determinant(), 1.0 * 10.0 - 3.0 * 7.0);
    }

    #[test]
    fn test_rank() {
        let tol = Tolerance::default();
        assert_eq!(rank(&m(&[&[1.0, 2.0], &[2.0, 4.0]]), &tol).unwrap(), 1);
        assert_eq!(rank(&Matrix::identity(4), &tol).unwrap(), 4);
        assert_eq!(rank(&Matrix::zeros(3, 2), &tol).unwrap(), 0);
        assert_eq!(rank(&m(&[&[0.0, 1.0, 2.0], &[0.0, 2.0, 4.0], &[1.0, 0.0, 0.0]]), &tol).unwrap(), 2);
        assert_eq!(rank(&Matrix::empty(), &tol).unwrap_err().code, codes::FORMAT_ERROR);
    }

    #[test]
    fn test_row_echelon_does_not_touch_input() {
        let a = m(&[&[0.0, 1.0], &[1.0, 0.0]]);
        let before = a.clone();
        let echelon = row_echelon(&a, &Tolerance::default());
        assert_eq!(a, before);
        assert_eq!(echelon.pivots, vec![(0, 0), (1, 1)]);
        assert_eq!(echelon.matrix[(0, 0)], 1.0);
    }

    #[test]
    fn test_determinant_plugin_trace() {
        let mut ctx = EvalContext::new().with_tracing(true);
        let args = [Value::from(m(&[&[1.0, 2.0], &[3.0, 4.0]]))];
        assert_eq!(DeterminantFn.call(&args, &mut ctx).as_number(), Some(-2.0));
        assert_eq!(ctx.trace[0].label, "cofactor terms");
    }

    fn square(n: usize) -> impl Strategy<Value = Matrix> {
        prop::collection::vec(-9i32..=9, n * n).prop_map(move |xs| {
            let values: Vec<f64> = xs.into_iter().map(f64::from).collect();
            Matrix::from_row_slice(n, n, &values)
        })
    }

    proptest! {
        #[test]
        fn prop_det_equals_det_of_transpose(a in (1usize..=4).prop_flat_map(square)) {
            let d = determinant(&a).unwrap();
            let dt = determinant(&a.transpose()).unwrap();
            prop_assert!((d - dt).abs() <= 1e-9 * (1.0 + d.abs()));
        }

        #[test]
        fn prop_rank_of_identity_and_zeros(n in 1usize..=6, cols in 1usize..=6) {
            let tol = Tolerance::default();
            prop_assert_eq!(rank(&Matrix::identity(n), &tol).unwrap(), n);
            prop_assert_eq!(rank(&Matrix::zeros(n, cols), &tol).unwrap(), 0);
        }
    }
}
