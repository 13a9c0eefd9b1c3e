//! Vector arithmetic and argument extraction shared by the geometry routines

use linal_core::{LinalError, Value, Vector};
use linal_matrix::{extract_number, extract_vector};

/// `a - b`; callers check dimensions first
pub(crate) fn sub(a: &Vector, b: &Vector) -> Vector {
    Vector::from_dvector(a.as_dvector() - b.as_dvector())
}

/// `p + t·d`
pub(crate) fn add_scaled(p: &Vector, d: &Vector, t: f64) -> Vector {
    Vector::from_dvector(p.as_dvector() + d.as_dvector() * t)
}

pub(crate) fn scale(v: &Vector, k: f64) -> Vector {
    Vector::from_dvector(v.as_dvector() * k)
}

/// Every argument as a real coefficient
pub(crate) fn extract_coefficients(args: &[Value], expected: usize, func: &str) -> Result<Vec<f64>, LinalError> {
    if args.len() != expected {
        return Err(LinalError::arity(func, expected, args.len()));
    }
    args.iter()
        .enumerate()
        .map(|(i, a)| extract_number(a, func, &format!("s{}", i + 1)))
        .collect()
}

/// Exactly `expected` vector arguments starting at `offset`
pub(crate) fn extract_points<'a>(
    args: &'a [Value],
    offset: usize,
    expected: usize,
    func: &str,
) -> Result<Vec<&'a Vector>, LinalError> {
    if args.len() != offset + expected {
        return Err(LinalError::arity(func, offset + expected, args.len()));
    }
    args[offset..].iter()
        .enumerate()
        .map(|(i, a)| extract_vector(a, func, &format!("v{}", i + 1)))
        .collect()
}
