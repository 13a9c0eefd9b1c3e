//! Vector algebra: products, arithmetic, magnitude, orthogonalization

use linal_core::{LinalError, Tolerance, Value, Vector};
use linal_plugin::{ArgMeta, EvalContext, Grammar, OperationMeta, OperationPlugin};
use crate::helpers::{
    check_arity, check_same_dim, check_uniform_dim, extract_owned_vectors, extract_text,
    extract_vector, extract_vectors, ArithmeticOp,
};

/// Basis triples `(i, j, k)` with `e_i × e_j = e_k`, cyclic
const CROSS_3D: [(usize, usize, usize); 1] = [(0, 1, 2)];

/// Octonion structure constants: `(i, i+1, i+3) mod 7`
const CROSS_7D: [(usize, usize, usize); 7] = [
    (0, 1, 3),
    (1, 2, 4),
    (2, 3, 5),
    (3, 4, 6),
    (4, 5, 0),
    (5, 6, 1),
    (6, 0, 2),
];

pub fn dot(a: &Vector, b: &Vector) -> Result<f64, LinalError> {
    check_same_dim(a, b, "Dot product")?;
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}

/// Cross product in dimension 3 or 7
pub fn cross(a: &Vector, b: &Vector) -> Result<Vector, LinalError> {
    check_same_dim(a, b, "Cross product")?;
    let triples: &[(usize, usize, usize)] = match a.dim() {
        3 => &CROSS_3D,
        7 => &CROSS_7D,
        d => return Err(LinalError::unsupported_dimension("Cross product", d)),
    };

    let mut out = vec![0.0; a.dim()];
    for &(i, j, k) in triples {
        out[k] += a[i] * b[j] - a[j] * b[i];
        out[i] += a[j] * b[k] - a[k] * b[j];
        out[j] += a[k] * b[i] - a[i] * b[k];
    }
    Ok(Vector::new(out))
}

/// `dot(cross(a, b), c)`
pub fn triple_product(a: &Vector, b: &Vector, c: &Vector) -> Result<f64, LinalError> {
    check_same_dim(a, c, "Triple product")?;
    dot(&cross(a, b)?, c)
}

/// `+`/`-` combine the first two operands elementwise. `*` scales the
/// first operand by the first component of the second.
pub fn arithmetic(op: ArithmeticOp, vectors: &[Vector]) -> Result<Vector, LinalError> {
    if vectors.len() < 2 {
        return Err(LinalError::arity("Vector arithmetic", "at least 2", vectors.len()));
    }
    let (a, b) = (&vectors[0], &vectors[1]);
    if a.is_empty() || b.is_empty() {
        return Err(LinalError::degenerate("vector arithmetic needs operands of dimension at least 1"));
    }

    let out: Vec<f64> = match op {
        ArithmeticOp::Add => {
            check_same_dim(a, b, "Vector arithmetic")?;
            a.iter().zip(b.iter()).map(|(x, y)| x + y).collect()
        }
        ArithmeticOp::Sub => {
            check_same_dim(a, b, "Vector arithmetic")?;
            a.iter().zip(b.iter()).map(|(x, y)| x - y).collect()
        }
        ArithmeticOp::Mul => {
            let factor = b[0];
            a.iter().map(|x| x * factor).collect()
        }
    };
    Ok(Vector::new(out))
}

/// Euclidean norm
pub fn magnitude(v: &Vector) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Classical Gram-Schmidt.
///
/// Each vector loses its projection onto every previously produced
/// vector. Any produced vector with squared norm below `tol.zero` means
/// the input is linearly dependent and fails with `DEGENERATE`.
pub fn gram_schmidt(vectors: &[Vector], tol: &Tolerance) -> Result<Vec<Vector>, LinalError> {
    if vectors.is_empty() {
        return Err(LinalError::arity("Orthogonalization", "at least 1", 0));
    }
    check_uniform_dim(vectors, "Orthogonalization")?;

    let mut basis: Vec<Vector> = Vec::with_capacity(vectors.len());
    for (i, v) in vectors.iter().enumerate() {
        let mut u = v.to_vec();
        for prev in &basis {
            let coeff = dot(v, prev)? / dot(prev, prev)?;
            for (x, p) in u.iter_mut().zip(prev.iter()) {
                *x -= coeff * p;
            }
        }
        let u = Vector::new(u);
        if tol.is_zero(dot(&u, &u)?) {
            return Err(LinalError::degenerate(format!(
                "orthogonalized vector {} is zero, vectors are linearly dependent",
                i + 1
            )));
        }
        basis.push(u);
    }
    Ok(basis)
}

// ============================================================================
// DOT PRODUCT
// ============================================================================

pub struct DotProductFn;

static DOT_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("a", "Vector", "First vector"),
    ArgMeta::required("b", "Vector", "Second vector"),
];
static DOT_EXAMPLES: [&str; 2] = [
    "Dot product:(1,2,3);(4,5,6) → 32",
    "Dot product:(1,0);(0,1) → 0",
];
static DOT_RELATED: [&str; 2] = ["Cross product", "Vector magnitude"];

impl OperationPlugin for DotProductFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Dot product",
            aliases: &["Скалярное произведение"],
            description: "Sum of elementwise products of two vectors of equal dimension",
            usage: "Dot product:a;b",
            grammar: Grammar::Vectors { count: 2 },
            args: &DOT_ARGS,
            returns: "Number",
            examples: &DOT_EXAMPLES,
            category: "vector",
            related: &DOT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &mut EvalContext) -> Value {
        let result = check_arity(args, 2, "Dot product")
            .and_then(|_| extract_vectors(args, "Dot product"))
            .and_then(|vs| dot(vs[0], vs[1]));
        Value::from(result)
    }
}

// ============================================================================
// CROSS PRODUCT
// ============================================================================

pub struct CrossProductFn;

static CROSS_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("a", "Vector", "First vector (dimension 3 or 7)"),
    ArgMeta::required("b", "Vector", "Second vector (same dimension)"),
];
static CROSS_EXAMPLES: [&str; 2] = [
    "Cross product:(1,0,0);(0,1,0) → (0, 0, 1)",
    "Cross product:(1,0,0,0,0,0,0);(0,1,0,0,0,0,0) → (0, 0, 0, 1, 0, 0, 0)",
];
static CROSS_RELATED: [&str; 2] = ["Dot product", "Triple product"];

impl OperationPlugin for CrossProductFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Cross product",
            aliases: &["Векторное произведение"],
            description: "Cross product of two 3-D vectors, or of two 7-D vectors via octonion structure constants",
            usage: "Cross product:a;b",
            grammar: Grammar::Vectors { count: 2 },
            args: &CROSS_ARGS,
            returns: "Vector",
            examples: &CROSS_EXAMPLES,
            category: "vector",
            related: &CROSS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &mut EvalContext) -> Value {
        let result = check_arity(args, 2, "Cross product")
            .and_then(|_| extract_vectors(args, "Cross product"))
            .and_then(|vs| cross(vs[0], vs[1]));
        Value::from(result)
    }
}

// ============================================================================
// TRIPLE PRODUCT
// ============================================================================

pub struct TripleProductFn;

static TRIPLE_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("a", "Vector", "First vector"),
    ArgMeta::required("b", "Vector", "Second vector"),
    ArgMeta::required("c", "Vector", "Third vector"),
];
static TRIPLE_EXAMPLES: [&str; 1] = ["Triple product:(1,0,0);(0,1,0);(0,0,1) → 1"];
static TRIPLE_RELATED: [&str; 2] = ["Cross product", "Determinant"];

impl OperationPlugin for TripleProductFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Triple product",
            aliases: &["Смешанное произведение"],
            description: "Scalar triple product dot(cross(a, b), c)",
            usage: "Triple product:a;b;c",
            grammar: Grammar::Vectors { count: 3 },
            args: &TRIPLE_ARGS,
            returns: "Number",
            examples: &TRIPLE_EXAMPLES,
            category: "vector",
            related: &TRIPLE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = check_arity(args, 3, "Triple product")
            .and_then(|_| extract_vectors(args, "Triple product"))
            .and_then(|vs| {
                let ab = cross(vs[0], vs[1])?;
                ctx.record("a × b", ab.clone());
                dot(&ab, vs[2])
            });
        Value::from(result)
    }
}

// ============================================================================
// VECTOR ARITHMETIC
// ============================================================================

pub struct VectorArithmeticFn;

static VARITH_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("op", "Text", "Operator: +, - or *"),
    ArgMeta::required("vectors", "Vector...", "At least two vectors"),
];
static VARITH_EXAMPLES: [&str; 3] = [
    "Vector arithmetic:+:2:(1,2);(3,4) → (4, 6)",
    "Vector arithmetic:-:2:(5,5);(1,2) → (4, 3)",
    "Vector arithmetic:*:2:(1,2,3);(2,9,9) → (2, 4, 6)",
];
static VARITH_RELATED: [&str; 1] = ["Matrix arithmetic"];

impl OperationPlugin for VectorArithmeticFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Vector arithmetic",
            aliases: &["Арифметические операции над векторами"],
            description: "Elementwise + or - of the first two vectors; * scales the first vector by the first component of the second",
            usage: "Vector arithmetic:op:count:v1;v2;...",
            grammar: Grammar::OperatorCountedVectors,
            args: &VARITH_ARGS,
            returns: "Vector",
            examples: &VARITH_EXAMPLES,
            category: "vector",
            related: &VARITH_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &mut EvalContext) -> Value {
        let Some((op, rest)) = args.split_first() else {
            return Value::Error(LinalError::arity("Vector arithmetic", "at least 3", 0));
        };
        let result = extract_text(op, "Vector arithmetic", "op")
            .and_then(ArithmeticOp::parse)
            .and_then(|op| {
                let vectors = extract_owned_vectors(rest, "Vector arithmetic")?;
                arithmetic(op, &vectors)
            });
        Value::from(result)
    }
}

// ============================================================================
// VECTOR MAGNITUDE
// ============================================================================

pub struct MagnitudeFn;

static MAGNITUDE_ARGS: [ArgMeta; 1] = [ArgMeta::required("v", "Vector", "Vector to measure")];
static MAGNITUDE_EXAMPLES: [&str; 1] = ["Vector magnitude:(3,4) → 5"];
static MAGNITUDE_RELATED: [&str; 1] = ["Dot product"];

impl OperationPlugin for MagnitudeFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Vector magnitude",
            aliases: &["Модуль вектора", "Длина вектора"],
            description: "Euclidean norm sqrt(Σ vᵢ²)",
            usage: "Vector magnitude:v",
            grammar: Grammar::Vectors { count: 1 },
            args: &MAGNITUDE_ARGS,
            returns: "Number",
            examples: &MAGNITUDE_EXAMPLES,
            category: "vector",
            related: &MAGNITUDE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &mut EvalContext) -> Value {
        let result = check_arity(args, 1, "Vector magnitude")
            .and_then(|_| extract_vector(&args[0], "Vector magnitude", "v"))
            .map(magnitude);
        Value::from(result)
    }
}

// ============================================================================
// ORTHOGONALIZATION
// ============================================================================

pub struct OrthogonalizationFn;

static ORTHO_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("vectors", "Vector...", "Linearly independent vectors of equal dimension"),
];
static ORTHO_EXAMPLES: [&str; 1] = [
    "Orthogonalization:2:(1,1,0);(1,0,1) → (1, 1, 0); (0.5, -0.5, 1)",
];
static ORTHO_RELATED: [&str; 2] = ["Dot product", "Linear span dimension"];

impl OperationPlugin for OrthogonalizationFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Orthogonalization",
            aliases: &["Процесс ортогонализации", "Gram-Schmidt"],
            description: "Classical Gram-Schmidt orthogonalization",
            usage: "Orthogonalization:count:v1;v2;...",
            grammar: Grammar::CountedVectors,
            args: &ORTHO_ARGS,
            returns: "List",
            examples: &ORTHO_EXAMPLES,
            category: "vector",
            related: &ORTHO_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = extract_owned_vectors(args, "Orthogonalization")
            .and_then(|vs| gram_schmidt(&vs, &ctx.tolerance));
        if let Ok(basis) = &result {
            for (i, u) in basis.iter().enumerate() {
                ctx.record(format!("u{}", i + 1), u.clone());
            }
        }
        Value::from(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linal_core::codes;
    use proptest::prelude::*;

    fn v(xs: &[f64]) -> Vector {
        Vector::from_slice(xs)
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_dot() {
        assert_eq!(dot(&v(&[1.0, 2.0, 3.0]), &v(&[4.0, 5.0, 6.0])).unwrap(), 32.0);
        assert_eq!(dot(&v(&[1.0]), &v(&[1.0, 2.0])).unwrap_err().code, codes::DIMENSION_MISMATCH);
    }

    #[test]
    fn test_cross_3d() {
        let c = cross(&v(&[1.0, 0.0, 0.0]), &v(&[0.0, 1.0, 0.0])).unwrap();
        assert_eq!(c.components(), &[0.0, 0.0, 1.0]);

        let c = cross(&v(&[1.0, 2.0, 3.0]), &v(&[4.0, 5.0, 6.0])).unwrap();
        assert_eq!(c.components(), &[-3.0, 6.0, -3.0]);
    }

    #[test]
    fn test_cross_7d_basis() {
        let mut e0 = vec![0.0; 7];
        let mut e1 = vec![0.0; 7];
        e0[0] = 1.0;
        e1[1] = 1.0;
        let c = cross(&Vector::new(e0), &Vector::new(e1)).unwrap();
        let mut expected = vec![0.0; 7];
        expected[3] = 1.0;
        assert_eq!(c.components(), expected.as_slice());
    }

    #[test]
    fn test_cross_unsupported() {
        let err = cross(&v(&[1.0, 0.0]), &v(&[0.0, 1.0])).unwrap_err();
        assert_eq!(err.code, codes::UNSUPPORTED_DIMENSION);
        let err = cross(&v(&[1.0, 0.0, 0.0]), &v(&[0.0, 1.0])).unwrap_err();
        assert_eq!(err.code, codes::DIMENSION_MISMATCH);
    }

    #[test]
    fn test_triple_product() {
        let t = triple_product(&v(&[1.0, 0.0, 0.0]), &v(&[0.0, 1.0, 0.0]), &v(&[0.0, 0.0, 1.0])).unwrap();
        assert_eq!(t, 1.0);
        let t = triple_product(&v(&[1.0, 2.0, 3.0]), &v(&[2.0, 4.0, 6.0]), &v(&[7.0, 8.0, 9.0])).unwrap();
        assert_eq!(t, 0.0);
    }

    #[test]
    fn test_arithmetic() {
        let vs = vec![v(&[1.0, 2.0]), v(&[3.0, 4.0])];
        assert_eq!(arithmetic(ArithmeticOp::Add, &vs).unwrap().components(), &[4.0, 6.0]);
        assert_eq!(arithmetic(ArithmeticOp::Sub, &vs).unwrap().components(), &[-2.0, -2.0]);
        // Scales by the first component of the second operand only
        assert_eq!(arithmetic(ArithmeticOp::Mul, &vs).unwrap().components(), &[3.0, 6.0]);
    }

    #[test]
    fn test_arithmetic_errors() {
        let err = arithmetic(ArithmeticOp::Add, &[v(&[1.0])]).unwrap_err();
        assert_eq!(err.code, codes::ARITY_ERROR);
        let err = arithmetic(ArithmeticOp::Sub, &[v(&[1.0]), v(&[1.0, 2.0])]).unwrap_err();
        assert_eq!(err.code, codes::DIMENSION_MISMATCH);
        // Scaling does not need matching dimensions
        let scaled = arithmetic(ArithmeticOp::Mul, &[v(&[1.0, 1.0, 1.0]), v(&[2.0])]).unwrap();
        assert_eq!(scaled.components(), &[2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_arithmetic_rejects_empty_operand() {
        let err = arithmetic(ArithmeticOp::Mul, &[v(&[1.0, 2.0]), Vector::new(vec![])]).unwrap_err();
        assert_eq!(err.code, codes::DEGENERATE);
        let err = arithmetic(ArithmeticOp::Add, &[Vector::new(vec![]), Vector::new(vec![])]).unwrap_err();
        assert_eq!(err.code, codes::DEGENERATE);
    }

    #[test]
    fn test_magnitude() {
        assert_eq!(magnitude(&v(&[3.0, 4.0])), 5.0);
    }

    #[test]
    fn test_gram_schmidt() {
        let tol = Tolerance::default();
        let basis = gram_schmidt(&[v(&[1.0, 1.0, 0.0]), v(&[1.0, 0.0, 1.0])], &tol).unwrap();
        assert_eq!(basis[0].components(), &[1.0, 1.0, 0.0]);
        assert!(basis[1].approx_eq(&v(&[0.5, -0.5, 1.0]), 1e-12));
        assert_close(dot(&basis[0], &basis[1]).unwrap(), 0.0);
    }

    #[test]
    fn test_gram_schmidt_degenerate() {
        let tol = Tolerance::default();
        let err = gram_schmidt(&[v(&[0.0, 0.0]), v(&[1.0, 0.0])], &tol).unwrap_err();
        assert_eq!(err.code, codes::DEGENERATE);

        let err = gram_schmidt(&[v(&[1.0, 2.0]), v(&[2.0, 4.0]), v(&[0.0, 1.0])], &tol).unwrap_err();
        assert_eq!(err.code, codes::DEGENERATE);
    }

    #[test]
    fn test_gram_schmidt_trailing_dependent_vector() {
        let tol = Tolerance::default();
        let err = gram_schmidt(&[v(&[1.0, 0.0]), v(&[2.0, 0.0])], &tol).unwrap_err();
        assert_eq!(err.code, codes::DEGENERATE);
        assert!(err.message.contains("vector 2"));

        let mut ctx = EvalContext::new();
        let args = vec![Value::from(v(&[1.0, 0.0])), Value::from(v(&[2.0, 0.0]))];
        assert!(OrthogonalizationFn.call(&args, &mut ctx).is_error());
    }

    #[test]
    fn test_plugins() {
        let mut ctx = EvalContext::new().with_tracing(true);
        let args = vec![Value::from(v(&[1.0, 2.0, 3.0])), Value::from(v(&[4.0, 5.0, 6.0]))];
        assert_eq!(DotProductFn.call(&args, &mut ctx).as_number(), Some(32.0));

        let args = vec![Value::from("*"), Value::from(v(&[1.0, 2.0])), Value::from(v(&[3.0, 0.0]))];
        let out = VectorArithmeticFn.call(&args, &mut ctx);
        assert_eq!(out.as_vector().map(|v| v.to_vec()), Some(vec![3.0, 6.0]));

        let args = vec![Value::from(v(&[1.0, 0.0])), Value::from(v(&[1.0, 1.0]))];
        let out = OrthogonalizationFn.call(&args, &mut ctx);
        assert_eq!(out.as_list().map(|l| l.len()), Some(2));
        assert_eq!(ctx.trace.len(), 2);

        let out = DotProductFn.call(&args[..1], &mut ctx);
        assert_eq!(out.as_error().map(|e| e.code.as_str()), Some(codes::ARITY_ERROR));
    }

    fn small_vec(dim: usize) -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(-9i32..=9, dim).prop_map(|xs| xs.into_iter().map(f64::from).collect())
    }

    proptest! {
        #[test]
        fn prop_cross_is_orthogonal(a in small_vec(7), b in small_vec(7)) {
            let a = Vector::new(a);
            let b = Vector::new(b);
            let c = cross(&a, &b).unwrap();
            prop_assert!(dot(&c, &a).unwrap().abs() < 1e-9);
            prop_assert!(dot(&c, &b).unwrap().abs() < 1e-9);
        }

        #[test]
        fn prop_gram_schmidt_pairwise_orthogonal(rows in prop::collection::vec(small_vec(3), 1..=3)) {
            let vectors: Vec<Vector> = rows.into_iter().map(Vector::new).collect();
            if let Ok(basis) = gram_schmidt(&vectors, &Tolerance::default()) {
                for i in 0..basis.len() {
                    for j in 0..i {
                        let scale = magnitude(&basis[i]) * magnitude(&basis[j]) + 1.0;
                        prop_assert!(dot(&basis[i], &basis[j]).unwrap().abs() < 1e-6 * scale);
                    }
                }
            }
        }
    }
}
