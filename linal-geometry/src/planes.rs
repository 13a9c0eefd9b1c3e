//! Planes `Ax + By + Cz + D = 0` in three dimensions

use linal_core::{LinalError, Tolerance, Value, Vector};
use linal_matrix::vector_ops::{cross, dot, magnitude};
use linal_plugin::{ArgMeta, EvalContext, Grammar, OperationMeta, OperationPlugin};
use serde::Serialize;
use tracing::debug;
use crate::helpers::{add_scaled, extract_coefficients, extract_points, scale, sub};

/// Plane coefficients `(A, B, C, D)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Plane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Plane {
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    pub fn from_slice(coefficients: &[f64]) -> Self {
        Self::new(coefficients[0], coefficients[1], coefficients[2], coefficients[3])
    }

    pub fn normal(&self) -> Vector {
        Vector::new(vec![self.a, self.b, self.c])
    }

    /// `A·x + B·y + C·z + D`
    pub fn evaluate(&self, p: &Vector) -> f64 {
        self.a * p[0] + self.b * p[1] + self.c * p[2] + self.d
    }

    fn check_normal(&self, func: &str, tol: &Tolerance) -> Result<(), LinalError> {
        if tol.is_zero(self.a * self.a + self.b * self.b + self.c * self.c) {
            return Err(LinalError::degenerate(format!("{}: plane normal (A, B, C) is zero", func)));
        }
        Ok(())
    }
}

/// General, intercept and normal (Hessian) forms of a plane
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaneEquations {
    pub general: Plane,
    /// `x/p + y/q + z/r = 1`, when `A·B·C·D ≠ 0`
    pub intercepts: Option<(f64, f64, f64)>,
    /// `sqrt(A² + B² + C²)`
    pub norm: f64,
    /// Unit normal and signed distance from the origin
    pub unit_normal: Vector,
    pub offset: f64,
}

pub fn plane_equations(plane: Plane, tol: &Tolerance) -> Result<PlaneEquations, LinalError> {
    plane.check_normal("Plane equations", tol)?;
    let Plane { a, b, c, d } = plane;
    let intercepts = (!tol.is_zero(a * b * c * d)).then(|| (-d / a, -d / b, -d / c));
    let norm = magnitude(&plane.normal());
    Ok(PlaneEquations {
        general: plane,
        intercepts,
        norm,
        unit_normal: scale(&plane.normal(), 1.0 / norm),
        offset: d / norm,
    })
}

/// Line of intersection of two planes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanesIntersection {
    pub point: Vector,
    pub direction: Vector,
}

/// The direction is `n₁ × n₂`. The point is taken at `z = 0` from the
/// `(A, B)` subsystem, which needs `A1·B2 − A2·B1 ≠ 0`.
pub fn planes_intersection(p1: Plane, p2: Plane, tol: &Tolerance) -> Result<PlanesIntersection, LinalError> {
    p1.check_normal("Planes intersection", tol)?;
    p2.check_normal("Planes intersection", tol)?;

    let direction = cross(&p1.normal(), &p2.normal())?;
    if tol.is_zero(dot(&direction, &direction)?) {
        return Err(LinalError::parallel("the planes are parallel or coincide"));
    }

    let det = p1.a * p2.b - p2.a * p1.b;
    if tol.is_zero(det) {
        debug!(det, "planes intersection: z = 0 subsystem is singular");
        return Err(LinalError::degenerate("A1·B2 − A2·B1 is zero, the intersection line has no point at z = 0 from the (A, B) subsystem")
            .with_suggestion("Reorder the coordinates so that the first two coefficients form a non-singular system"));
    }
    let x0 = (p1.b * p2.d - p2.b * p1.d) / det;
    let y0 = (p2.a * p1.d - p1.a * p2.d) / det;

    Ok(PlanesIntersection { point: Vector::new(vec![x0, y0, 0.0]), direction })
}

/// Projection of a line onto a plane
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineProjection {
    /// Where the line meets the plane
    pub point: Vector,
    /// Direction with its normal component removed
    pub direction: Vector,
    /// Line parameter of `point`
    pub t: f64,
}

pub fn line_projection_on_plane(
    plane: Plane,
    point: &Vector,
    direction: &Vector,
    tol: &Tolerance,
) -> Result<LineProjection, LinalError> {
    let func = "Line projection on plane";
    if point.dim() != 3 || direction.dim() != 3 {
        return Err(LinalError::dimension_mismatch(format!(
            "{}: point and direction must be 3-dimensional, got {} and {}",
            func, point.dim(), direction.dim()
        )));
    }
    plane.check_normal(func, tol)?;

    let normal = plane.normal();
    let along = dot(direction, &normal)?;
    if tol.is_zero(along) {
        return Err(LinalError::degenerate("the line is parallel to the plane, dot(direction, normal) is zero"));
    }

    let projected = sub(direction, &scale(&normal, along / dot(&normal, &normal)?));
    let t = -plane.evaluate(point) / along;
    let meet = add_scaled(point, direction, t);

    Ok(LineProjection { point: meet, direction: projected, t })
}

impl From<Plane> for Value {
    fn from(p: Plane) -> Self {
        Value::object([
            ("a", Value::from(p.a)),
            ("b", Value::from(p.b)),
            ("c", Value::from(p.c)),
            ("d", Value::from(p.d)),
        ])
    }
}

impl From<PlaneEquations> for Value {
    fn from(eq: PlaneEquations) -> Self {
        Value::object([
            ("general", Value::from(eq.general)),
            ("intercepts", eq.intercepts.map_or(Value::Null, |(x, y, z)| {
                Value::object([("x", Value::from(x)), ("y", Value::from(y)), ("z", Value::from(z))])
            })),
            ("normal", Value::object([
                ("norm", Value::from(eq.norm)),
                ("unit_normal", Value::from(eq.unit_normal)),
                ("offset", Value::from(eq.offset)),
            ])),
        ])
    }
}

impl From<PlanesIntersection> for Value {
    fn from(line: PlanesIntersection) -> Self {
        Value::object([
            ("point", Value::from(line.point)),
            ("direction", Value::from(line.direction)),
        ])
    }
}

impl From<LineProjection> for Value {
    fn from(p: LineProjection) -> Self {
        Value::object([
            ("point", Value::from(p.point)),
            ("direction", Value::from(p.direction)),
            ("t", Value::from(p.t)),
        ])
    }
}

// ============================================================================
// PLANE EQUATIONS
// ============================================================================

pub struct PlaneEquationsFn;

static PLANE_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("A", "Number", "Coefficient of x"),
    ArgMeta::required("B", "Number", "Coefficient of y"),
    ArgMeta::required("C", "Number", "Coefficient of z"),
    ArgMeta::required("D", "Number", "Free term"),
];
static PLANE_EXAMPLES: [&str; 1] = [
    "Plane equations:1;2;2;-6 → intercepts (6, 3, 3), norm 3",
];
static PLANE_RELATED: [&str; 2] = ["Planes intersection", "Line projection on plane"];

impl OperationPlugin for PlaneEquationsFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Plane equations",
            aliases: &["Уравнения плоскости"],
            description: "General, intercept and normal forms of Ax + By + Cz + D = 0",
            usage: "Plane equations:A;B;C;D",
            grammar: Grammar::Scalars { count: 4 },
            args: &PLANE_ARGS,
            returns: "Object",
            examples: &PLANE_EXAMPLES,
            category: "geometry",
            related: &PLANE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = extract_coefficients(args, 4, "Plane equations")
            .and_then(|c| plane_equations(Plane::from_slice(&c), &ctx.tolerance));
        Value::from(result)
    }
}

// ============================================================================
// PLANES INTERSECTION
// ============================================================================

pub struct PlanesIntersectionFn;

static PLANES_ARGS: [ArgMeta; 8] = [
    ArgMeta::required("A1", "Number", "First plane, coefficient of x"),
    ArgMeta::required("B1", "Number", "First plane, coefficient of y"),
    ArgMeta::required("C1", "Number", "First plane, coefficient of z"),
    ArgMeta::required("D1", "Number", "First plane, free term"),
    ArgMeta::required("A2", "Number", "Second plane, coefficient of x"),
    ArgMeta::required("B2", "Number", "Second plane, coefficient of y"),
    ArgMeta::required("C2", "Number", "Second plane, coefficient of z"),
    ArgMeta::required("D2", "Number", "Second plane, free term"),
];
static PLANES_EXAMPLES: [&str; 1] = [
    "Planes intersection:1;0;0;-1;0;1;0;-2 → point (1, 2, 0), direction (0, 0, 1)",
];
static PLANES_RELATED: [&str; 2] = ["Plane equations", "Lines intersection"];

impl OperationPlugin for PlanesIntersectionFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Planes intersection",
            aliases: &["Пересечение плоскостей"],
            description: "Line of intersection of two planes: a point at z = 0 and the direction n₁ × n₂",
            usage: "Planes intersection:A1;B1;C1;D1;A2;B2;C2;D2",
            grammar: Grammar::Scalars { count: 8 },
            args: &PLANES_ARGS,
            returns: "Object",
            examples: &PLANES_EXAMPLES,
            category: "geometry",
            related: &PLANES_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = extract_coefficients(args, 8, "Planes intersection")
            .and_then(|c| planes_intersection(Plane::from_slice(&c[..4]), Plane::from_slice(&c[4..]), &ctx.tolerance));
        Value::from(result)
    }
}

// ============================================================================
// LINE PROJECTION ON PLANE
// ============================================================================

pub struct LineProjectionFn;

static PROJECTION_ARGS: [ArgMeta; 6] = [
    ArgMeta::required("A", "Number", "Plane, coefficient of x"),
    ArgMeta::required("B", "Number", "Plane, coefficient of y"),
    ArgMeta::required("C", "Number", "Plane, coefficient of z"),
    ArgMeta::required("D", "Number", "Plane, free term"),
    ArgMeta::required("point", "Vector", "Point on the line"),
    ArgMeta::required("direction", "Vector", "Direction of the line"),
];
static PROJECTION_EXAMPLES: [&str; 1] = [
    "Line projection on plane:0;0;1;0;(0,0,2);(1,0,-1) → point (2, 0, 0), direction (1, 0, 0)",
];
static PROJECTION_RELATED: [&str; 1] = ["Plane equations"];

impl OperationPlugin for LineProjectionFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "Line projection on plane",
            aliases: &["Проекция прямой на плоскость"],
            description: "Projected direction of a line and the point where it meets the plane",
            usage: "Line projection on plane:A;B;C;D;point;direction",
            grammar: Grammar::ScalarsThenVectors { scalars: 4, vectors: 2 },
            args: &PROJECTION_ARGS,
            returns: "Object",
            examples: &PROJECTION_EXAMPLES,
            category: "geometry",
            related: &PROJECTION_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &mut EvalContext) -> Value {
        let func = "Line projection on plane";
        if args.len() != 6 {
            return Value::Error(LinalError::arity(func, 6, args.len()));
        }
        let result = extract_coefficients(&args[..4], 4, func)
            .and_then(|c| {
                let v = extract_points(args, 4, 2, func)?;
                ctx.record_with("dot(direction, normal)", || {
                    let plane = Plane::from_slice(&c);
                    Value::from(dot(v[1], &plane.normal()))
                });
                line_projection_on_plane(Plane::from_slice(&c), v[0], v[1], &ctx.tolerance)
            });
        Value::from(result)
    }
}
