//! Linear span dimension and membership, both via rank

use linal_core::{LinalError, Matrix, Tolerance, Value, Vector};
use linal_plugin::{ArgMeta, EvalContext, Grammar, OperationMeta, OperationPlugin};
use crate::helpers::{check_same_dim, extract_owned_vectors, extract_vector};
use crate::props::{row_echelon, Echelon};

/// Stack the vectors as columns and reduce
pub fn span_echelon(vectors: &[Vector], tol: &Tolerance) -> Result<Echelon, LinalError> {
    if vectors.is_empty() {
        return Err(LinalError::arity("Linear span dimension", "at least 1", 0));
    }
    let m = Matrix::from_columns(vectors)?;
    Ok(row_echelon(&m, tol))
}

/// Dimension of the span = rank of the column matrix
pub fn linear_span_dimension(vectors: &[Vector], tol: &Tolerance) -> Result<usize, LinalError> {
    Ok(span_echelon(vectors, tol)?.rank())
}

/// Outcome of a span membership test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub member: bool,
    pub rank_before: usize,
    pub rank_after: usize,
}

/// `target` lies in the span iff appending it leaves the rank unchanged
pub fn check_span_membership(target: &Vector, span: &[Vector], tol: &Tolerance) -> Result<Membership, LinalError> {
    if span.is_empty() {
        return Err(LinalError::arity("Span membership", "at least 1 spanning vector", 0));
    }
    check_same_dim(&span[0], target, "Span membership")?;

    let rank_before = linear_span_dimension(span, tol)?;
    let mut augmented = span.to_vec();
    augmented.push(target.clone());
    let rank_after = linear_span_dimension(&augmented, tol)?;

    Ok(Membership { member: rank_before == rank_after, rank_before, rank_after })
}

// ============================================================================
// LINEAR SPAN DIMENSION
// ============================================================================

pub struct SpanDimensionFn;

static SPAN_DIM_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("vectors", "Vector...", "Vectors of equal dimension"),
];
static SPAN_DIM_EXAMPLES: [&str; 2] = [
    "Linear span dimension:3:(1,0,0);(0,1,0);(1,1,0) → 2",
    "Linear span dimension:2:(1,2);(2,4) → 1",
];
static SPAN_DIM_RELATED: [&str; 2] = ["Matrix rank", "Span membership"];

impl OperationPlugin for SpanDimensionFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Linear span dimension",
            aliases: &["Размер линейной оболочки", "Размерность линейной оболочки"],
            description: "Dimension of the span of the vectors (rank of the matrix with them as columns)",
            usage: "Linear span dimension:count:v1;v2;...",
            grammar: Grammar::CountedVectors,
            args: &SPAN_DIM_ARGS,
            returns: "Number",
            examples: &SPAN_DIM_EXAMPLES,
            category: "matrix",
            related: &SPAN_DIM_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = extract_owned_vectors(args, "Linear span dimension")
            .and_then(|vs| span_echelon(&vs, &ctx.tolerance));
        match result {
            Ok(echelon) => {
                let rank = echelon.rank();
                ctx.record("echelon form", echelon.matrix);
                Value::from(rank)
            }
            Err(e) => Value::Error(e),
        }
    }
}

// ============================================================================
// SPAN MEMBERSHIP
// ============================================================================

pub struct SpanMembershipFn;

static MEMBERSHIP_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("target", "Vector", "Vector to test"),
    ArgMeta::required("span", "Vector...", "Spanning vectors"),
];
static MEMBERSHIP_EXAMPLES: [&str; 2] = [
    "Span membership:2:(1,1,0);(1,0,0);(0,1,0) → true",
    "Span membership:2:(0,0,1);(1,0,0);(0,1,0) → false",
];
static MEMBERSHIP_RELATED: [&str; 1] = ["Linear span dimension"];

impl OperationPlugin for SpanMembershipFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Span membership",
            aliases: &["Принадлежность линейной оболочке"],
            description: "Whether the target vector is a linear combination of the spanning vectors",
            usage: "Span membership:count:target;v1;v2;...",
            grammar: Grammar::SpanMembership,
            args: &MEMBERSHIP_ARGS,
            returns: "Bool",
            examples: &MEMBERSHIP_EXAMPLES,
            category: "matrix",
            related: &MEMBERSHIP_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let func = "Span membership";
        let Some((target, span)) = args.split_first() else {
            return Value::Error(LinalError::arity(func, "at least 2", 0));
        };
        let result = extract_vector(target, func, "target")
            .and_then(|t| {
                let span = extract_owned_vectors(span, func)?;
                check_span_membership(t, &span, &ctx.tolerance)
            });
        match result {
            Ok(m) => {
                ctx.record("rank of span", m.rank_before);
                ctx.record("rank with target", m.rank_after);
                Value::Bool(m.member)
            }
            Err(e) => Value::Error(e),
        }
    }
}
