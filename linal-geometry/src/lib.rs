//! Linal Geometry - Lines and planes
//!
//! Built on the vector algebra of `linal-matrix`:
//! - 2-D lines: equation forms, intersection
//! - Lines in space: point distance, reflection, n-D equations
//! - Planes: equation forms, intersection line, line projection

mod helpers;
pub mod lines;
pub mod planes;

pub use lines::{LineEquations2d, LineEquationsNd, Reflection};
pub use planes::{LineProjection, Plane, PlaneEquations, PlanesIntersection};

use linal_plugin::OperationRegistry;

/// Load geometry operations into registry
pub fn load_geometry_library(registry: OperationRegistry) -> OperationRegistry {
    registry
        // Lines (5 operations)
        .with_operation(lines::LineEquations2dFn)
        .with_operation(lines::LinesIntersectionFn)
        .with_operation(lines::PointToLineDistanceFn)
        .with_operation(lines::SymmetricPointFn)
        .with_operation(lines::LineEquationsNdFn)

        // Planes (3 operations)
        .with_operation(planes::PlaneEquationsFn)
        .with_operation(planes::PlanesIntersectionFn)
        .with_operation(planes::LineProjectionFn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_geometry_library() {
        let registry = load_geometry_library(OperationRegistry::new());

        assert_eq!(registry.len(), 8);
        assert!(registry.get("Line equations 2D").is_some());
        assert!(registry.get("Пересечение плоскостей").is_some());
        assert!(registry.get("line_projection_on_plane").is_some());
    }
}
