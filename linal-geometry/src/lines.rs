//! Lines in the plane and in n-dimensional space

use linal_core::{LinalError, Tolerance, Value, Vector};
use linal_matrix::vector_ops::{cross, dot, magnitude};
use linal_plugin::{ArgMeta, EvalContext, Grammar, OperationMeta, OperationPlugin};
use serde::Serialize;
use crate::helpers::{add_scaled, extract_coefficients, extract_points, scale, sub};

/// Forms of the line `Ax + By + C = 0`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineEquations2d {
    /// `(A, B, C)`
    pub general: [f64; 3],
    /// `y = kx + b`, when `B ≠ 0`
    pub slope_intercept: Option<(f64, f64)>,
    /// Point and direction `(B, -A)`, when `A` or `B` is non-zero
    pub parametric: Option<(Vector, Vector)>,
}

pub fn line_equations_2d(a: f64, b: f64, c: f64, tol: &Tolerance) -> LineEquations2d {
    let slope_intercept = (!tol.is_zero(b)).then(|| (-a / b, -c / b));
    let parametric = if !tol.is_zero(b) {
        Some((Vector::new(vec![0.0, -c / b]), Vector::new(vec![b, -a])))
    } else if !tol.is_zero(a) {
        Some((Vector::new(vec![-c / a, 0.0]), Vector::new(vec![b, -a])))
    } else {
        None
    };
    LineEquations2d { general: [a, b, c], slope_intercept, parametric }
}

/// Cramer's rule on `A1x + B1y = -C1`, `A2x + B2y = -C2`
pub fn lines_intersection_2d(l1: [f64; 3], l2: [f64; 3], tol: &Tolerance) -> Result<Vector, LinalError> {
    let [a1, b1, c1] = l1;
    let [a2, b2, c2] = l2;
    let det = a1 * b2 - a2 * b1;
    if tol.is_zero(det) {
        return Err(LinalError::parallel("the lines are parallel or coincide"));
    }
    Ok(Vector::new(vec![(b1 * c2 - b2 * c1) / det, (a2 * c1 - a1 * c2) / det]))
}

fn check_line(p0: &Vector, dir: &Vector, p: &Vector, func: &str, tol: &Tolerance) -> Result<(), LinalError> {
    if p0.dim() != dir.dim() || p0.dim() != p.dim() {
        return Err(LinalError::dimension_mismatch(format!(
            "{}: point, direction and target have dimensions {}, {}, {}",
            func, p0.dim(), dir.dim(), p.dim()
        )));
    }
    if tol.is_zero(dot(dir, dir)?) {
        return Err(LinalError::degenerate(format!("{}: direction vector is zero", func)));
    }
    Ok(())
}

/// `|P0P × dir| / |dir|`; the cross product limits this to dimension 3 (or 7)
pub fn point_to_line_distance(p0: &Vector, dir: &Vector, p: &Vector, tol: &Tolerance) -> Result<f64, LinalError> {
    check_line(p0, dir, p, "Point to line distance", tol)?;
    let p0p = sub(p, p0);
    Ok(magnitude(&cross(&p0p, dir)?) / magnitude(dir))
}

/// Foot of the perpendicular and the mirror image of a point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reflection {
    pub projection: Vector,
    pub symmetric: Vector,
}

/// Reflect `p` across the line through `p0` along `dir`
pub fn symmetric_point(p0: &Vector, dir: &Vector, p: &Vector, tol: &Tolerance) -> Result<Reflection, LinalError> {
    check_line(p0, dir, p, "Symmetric point", tol)?;
    let p0p = sub(p, p0);
    let t = dot(&p0p, dir)? / dot(dir, dir)?;
    let projection = add_scaled(p0, dir, t);
    let symmetric = sub(&scale(&projection, 2.0), p);
    Ok(Reflection { projection, symmetric })
}

/// `xᵢ = pᵢ + dᵢ·t` for every coordinate, plus the canonical form
/// `(x - p₁)/d₁ = (y - p₂)/d₂ = (z - p₃)/d₃` in three dimensions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineEquationsNd {
    pub point: Vector,
    pub direction: Vector,
    pub canonical: bool,
}

pub fn line_equations_nd(point: &Vector, direction: &Vector, tol: &Tolerance) -> Result<LineEquationsNd, LinalError> {
    if point.dim() != direction.dim() {
        return Err(LinalError::dimension_mismatch(format!(
            "Line equations ND: point has dimension {}, direction {}",
            point.dim(), direction.dim()
        )));
    }
    if tol.is_zero(dot(direction, direction)?) {
        return Err(LinalError::degenerate("Line equations ND: direction vector is zero"));
    }
    Ok(LineEquationsNd {
        point: point.clone(),
        direction: direction.clone(),
        canonical: point.dim() == 3,
    })
}

impl From<LineEquations2d> for Value {
    fn from(eq: LineEquations2d) -> Self {
        let [a, b, c] = eq.general;
        Value::object([
            ("general", Value::object([("a", Value::from(a)), ("b", Value::from(b)), ("c", Value::from(c))])),
            ("slope_intercept", eq.slope_intercept.map_or(Value::Null, |(k, b)| {
                Value::object([("k", Value::from(k)), ("b", Value::from(b))])
            })),
            ("parametric", eq.parametric.map_or(Value::Null, |(point, direction)| {
                Value::object([("point", Value::from(point)), ("direction", Value::from(direction))])
            })),
        ])
    }
}

impl From<Reflection> for Value {
    fn from(r: Reflection) -> Self {
        Value::object([
            ("projection", Value::from(r.projection)),
            ("symmetric", Value::from(r.symmetric)),
        ])
    }
}

impl From<LineEquationsNd> for Value {
    fn from(eq: LineEquationsNd) -> Self {
        let parametric: Vec<Value> = eq.point.iter().zip(eq.direction.iter())
            .enumerate()
            .map(|(i, (p, d))| Value::object([
                ("coordinate", Value::from(i + 1)),
                ("offset", Value::from(*p)),
                ("coefficient", Value::from(*d)),
            ]))
            .collect();
        let canonical = if eq.canonical {
            Value::object([
                ("point", Value::from(eq.point.clone())),
                ("direction", Value::from(eq.direction.clone())),
            ])
        } else {
            Value::Null
        };
        Value::object([
            ("point", Value::from(eq.point)),
            ("direction", Value::from(eq.direction)),
            ("parametric", Value::List(parametric)),
            ("canonical", canonical),
        ])
    }
}

// ============================================================================
// LINE EQUATIONS 2D
// ============================================================================

pub struct LineEquations2dFn;

static LINE2D_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("A", "Number", "Coefficient of x"),
    ArgMeta::required("B", "Number", "Coefficient of y"),
    ArgMeta::required("C", "Number", "Free term"),
];
static LINE2D_EXAMPLES: [&str; 1] = [
    "Line equations 2D:2;-1;3 → y = 2x + 3, point (0, 3), direction (-1, -2)",
];
static LINE2D_RELATED: [&str; 2] = ["Lines intersection", "Line equations ND"];

impl OperationPlugin for LineEquations2dFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Line equations 2D",
            aliases: &["Уравнения прямой на плоскости"],
            description: "General, slope-intercept and parametric forms of Ax + By + C = 0",
            usage: "Line equations 2D:A;B;C",
            grammar: Grammar::Scalars { count: 3 },
            args: &LINE2D_ARGS,
            returns: "Object",
            examples: &LINE2D_EXAMPLES,
            category: "geometry",
            related: &LINE2D_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = extract_coefficients(args, 3, "Line equations 2D")
            .map(|c| line_equations_2d(c[0], c[1], c[2], &ctx.tolerance));
        Value::from(result)
    }
}

// ============================================================================
// LINES INTERSECTION
// ============================================================================

pub struct LinesIntersectionFn;

static INTERSECT_ARGS: [ArgMeta; 6] = [
    ArgMeta::required("A1", "Number", "First line, coefficient of x"),
    ArgMeta::required("B1", "Number", "First line, coefficient of y"),
    ArgMeta::required("C1", "Number", "First line, free term"),
    ArgMeta::required("A2", "Number", "Second line, coefficient of x"),
    ArgMeta::required("B2", "Number", "Second line, coefficient of y"),
    ArgMeta::required("C2", "Number", "Second line, free term"),
];
static INTERSECT_EXAMPLES: [&str; 1] = ["Lines intersection:1;-1;0;1;1;-2 → (1, 1)"];
static INTERSECT_RELATED: [&str; 2] = ["Line equations 2D", "Planes intersection"];

impl OperationPlugin for LinesIntersectionFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Lines intersection",
            aliases: &["Точка пересечения прямых", "Пересечение прямых"],
            description: "Intersection point of two lines in the plane by Cramer's rule",
            usage: "Lines intersection:A1;B1;C1;A2;B2;C2",
            grammar: Grammar::Scalars { count: 6 },
            args: &INTERSECT_ARGS,
            returns: "Object",
            examples: &INTERSECT_EXAMPLES,
            category: "geometry",
            related: &INTERSECT_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = extract_coefficients(args, 6, "Lines intersection")
            .and_then(|c| {
                ctx.record("determinant", c[0] * c[4] - c[3] * c[1]);
                lines_intersection_2d([c[0], c[1], c[2]], [c[3], c[4], c[5]], &ctx.tolerance)
            })
            .map(|p| Value::object([("point", Value::from(p))]));
        Value::from(result)
    }
}

// ============================================================================
// POINT TO LINE DISTANCE
// ============================================================================

pub struct PointToLineDistanceFn;

static DISTANCE_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("P0", "Vector", "Point on the line"),
    ArgMeta::required("dir", "Vector", "Direction of the line"),
    ArgMeta::required("P", "Vector", "Point to measure from"),
];
static DISTANCE_EXAMPLES: [&str; 1] = ["Point to line distance:(0,0,0);(1,0,0);(0,3,4) → 5"];
static DISTANCE_RELATED: [&str; 1] = ["Symmetric point"];

impl OperationPlugin for PointToLineDistanceFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Point to line distance",
            aliases: &["Расстояние от точки до прямой"],
            description: "Distance |P0P × dir| / |dir| from a point to a line in space",
            usage: "Point to line distance:P0;dir;P",
            grammar: Grammar::Vectors { count: 3 },
            args: &DISTANCE_ARGS,
            returns: "Number",
            examples: &DISTANCE_EXAMPLES,
            category: "geometry",
            related: &DISTANCE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = extract_points(args, 0, 3, "Point to line distance")
            .and_then(|v| {
                ctx.record_with("P0P", || Value::from(sub(v[2], v[0])));
                point_to_line_distance(v[0], v[1], v[2], &ctx.tolerance)
            });
        Value::from(result)
    }
}

// ============================================================================
// SYMMETRIC POINT
// ============================================================================

pub struct SymmetricPointFn;

static SYMMETRIC_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("P0", "Vector", "Point on the line"),
    ArgMeta::required("dir", "Vector", "Direction of the line"),
    ArgMeta::required("P", "Vector", "Point to reflect"),
];
static SYMMETRIC_EXAMPLES: [&str; 1] = [
    "Symmetric point:(0,0);(1,1);(1,0) → projection (0.5, 0.5), symmetric (0, 1)",
];
static SYMMETRIC_RELATED: [&str; 1] = ["Point to line distance"];

impl OperationPlugin for SymmetricPointFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Symmetric point",
            aliases: &["Симметричная точка относительно прямой", "Симметричная точка"],
            description: "Projection of a point onto a line and its reflection across it",
            usage: "Symmetric point:P0;dir;P",
            grammar: Grammar::Vectors { count: 3 },
            args: &SYMMETRIC_ARGS,
            returns: "Object",
            examples: &SYMMETRIC_EXAMPLES,
            category: "geometry",
            related: &SYMMETRIC_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = extract_points(args, 0, 3, "Symmetric point")
            .and_then(|v| symmetric_point(v[0], v[1], v[2], &ctx.tolerance));
        if let Ok(r) = &result {
            ctx.record("projection", r.projection.clone());
        }
        Value::from(result)
    }
}

// ============================================================================
// LINE EQUATIONS ND
// ============================================================================

pub struct LineEquationsNdFn;

static LINEND_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("point", "Vector", "Point on the line"),
    ArgMeta::required("direction", "Vector", "Direction of the line"),
];
static LINEND_EXAMPLES: [&str; 1] = [
    "Line equations ND:(1,2,3);(4,5,6) → x₁ = 1 + 4t, x₂ = 2 + 5t, x₃ = 3 + 6t",
];
static LINEND_RELATED: [&str; 1] = ["Line equations 2D"];

impl OperationPlugin for LineEquationsNdFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Line equations ND",
            aliases: &["Уравнения прямой в n-мерном пространстве"],
            description: "Parametric equations of a line in any dimension; canonical form in 3-D",
            usage: "Line equations ND:point;direction",
            grammar: Grammar::Vectors { count: 2 },
            args: &LINEND_ARGS,
            returns: "Object",
            examples: &LINEND_EXAMPLES,
            category: "geometry",
            related: &LINEND_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = extract_points(args, 0, 2, "Line equations ND")
            .and_then(|v| line_equations_nd(v[0], v[1], &ctx.tolerance));
        Value::from(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linal_core::codes;

    fn v(xs: &[f64]) -> Vector {
        Vector::from_slice(xs)
    }

    #[test]
    fn test_line_equations_2d() {
        let tol = Tolerance::default();
        let eq = line_equations_2d(2.0, -1.0, 3.0, &tol);
        assert_eq!(eq.slope_intercept, Some((2.0, 3.0)));
        let (point, direction) = eq.parametric.unwrap();
        assert_eq!(point.components(), &[0.0, 3.0]);
        assert_eq!(direction.components(), &[-1.0, -2.0]);
    }

    #[test]
    fn test_line_equations_2d_vertical() {
        let tol = Tolerance::default();
        let eq = line_equations_2d(1.0, 0.0, -4.0, &tol);
        assert!(eq.slope_intercept.is_none());
        let (point, _) = eq.parametric.unwrap();
        assert_eq!(point.components(), &[4.0, 0.0]);

        let eq = line_equations_2d(0.0, 0.0, 1.0, &tol);
        assert!(eq.slope_intercept.is_none());
        assert!(eq.parametric.is_none());
    }

    #[test]
    fn test_lines_intersection() {
        let tol = Tolerance::default();
        let p = lines_intersection_2d([1.0, -1.0, 0.0], [1.0, 1.0, -2.0], &tol).unwrap();
        assert_eq!(p.components(), &[1.0, 1.0]);

        let err = lines_intersection_2d([1.0, 1.0, 0.0], [2.0, 2.0, 5.0], &tol).unwrap_err();
        assert_eq!(err.code, codes::PARALLEL);
    }

    #[test]
    fn test_point_to_line_distance() {
        let tol = Tolerance::default();
        let d = point_to_line_distance(&v(&[0.0, 0.0, 0.0]), &v(&[1.0, 0.0, 0.0]), &v(&[0.0, 3.0, 4.0]), &tol).unwrap();
        assert!((d - 5.0).abs() < 1e-12);

        let d = point_to_line_distance(&v(&[1.0, 1.0, 1.0]), &v(&[0.0, 0.0, 2.0]), &v(&[1.0, 1.0, 9.0]), &tol).unwrap();
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_point_to_line_distance_errors() {
        let tol = Tolerance::default();
        let err = point_to_line_distance(&v(&[0.0, 0.0]), &v(&[1.0, 0.0]), &v(&[0.0, 1.0]), &tol).unwrap_err();
        assert_eq!(err.code, codes::UNSUPPORTED_DIMENSION);

        let err = point_to_line_distance(&v(&[0.0, 0.0, 0.0]), &v(&[0.0, 0.0, 0.0]), &v(&[0.0, 1.0, 0.0]), &tol).unwrap_err();
        assert_eq!(err.code, codes::DEGENERATE);

        let err = point_to_line_distance(&v(&[0.0, 0.0, 0.0]), &v(&[1.0, 0.0]), &v(&[0.0, 1.0, 0.0]), &tol).unwrap_err();
        assert_eq!(err.code, codes::DIMENSION_MISMATCH);
    }

    #[test]
    fn test_symmetric_point() {
        let tol = Tolerance::default();
        let r = symmetric_point(&v(&[0.0, 0.0]), &v(&[1.0, 1.0]), &v(&[1.0, 0.0]), &tol).unwrap();
        assert!(r.projection.approx_eq(&v(&[0.5, 0.5]), 1e-12));
        assert!(r.symmetric.approx_eq(&v(&[0.0, 1.0]), 1e-12));

        let r = symmetric_point(&v(&[0.0, 0.0, 1.0]), &v(&[1.0, 0.0, 0.0]), &v(&[3.0, 2.0, 1.0]), &tol).unwrap();
        assert!(r.symmetric.approx_eq(&v(&[3.0, -2.0, 1.0]), 1e-12));
    }

    #[test]
    fn test_line_equations_nd() {
        let tol = Tolerance::default();
        let eq = line_equations_nd(&v(&[1.0, 2.0, 3.0]), &v(&[4.0, 5.0, 6.0]), &tol).unwrap();
        assert!(eq.canonical);
        let eq = line_equations_nd(&v(&[1.0, 2.0, 3.0, 4.0]), &v(&[1.0, 0.0, 0.0, 0.0]), &tol).unwrap();
        assert!(!eq.canonical);

        let value = Value::from(eq);
        assert_eq!(value.get("parametric").as_list().map(|l| l.len()), Some(4));
        assert!(value.get("canonical").is_null());

        let err = line_equations_nd(&v(&[1.0, 2.0]), &v(&[1.0]), &tol).unwrap_err();
        assert_eq!(err.code, codes::DIMENSION_MISMATCH);
    }

    #[test]
    fn test_plugin_values() {
        let mut ctx = EvalContext::new();
        let args = [Value::Number(2.0), Value::Number(-1.0), Value::Number(3.0)];
        let out = LineEquations2dFn.call(&args, &mut ctx);
        assert_eq!(out.get("slope_intercept").get("k").as_number(), Some(2.0));

        let args: Vec<Value> = [1.0, 1.0, 0.0, 2.0, 2.0, 5.0].into_iter().map(Value::Number).collect();
        let out = LinesIntersectionFn.call(&args, &mut ctx);
        assert_eq!(out.as_error().map(|e| e.code.as_str()), Some(codes::PARALLEL));
    }
}
