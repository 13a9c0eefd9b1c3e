//! Linal Matrix - Operand parsing, vector algebra and matrix algebra
//!
//! Provides:
//! - Operand parser (vector and matrix literals)
//! - Vector operations (dot, cross, triple product, arithmetic, magnitude, Gram-Schmidt)
//! - Matrix operations (arithmetic, inverse)
//! - Matrix properties (determinant by cofactor expansion, rank)
//! - Linear systems (Gauss, Jordan)
//! - Eigenvalues and eigenvectors (QR iteration)
//! - Linear span dimension and membership
//!
//! All arithmetic is `f64`. Every zero test goes through the caller's
//! `Tolerance`.

pub mod parse;
mod helpers;
pub mod vector_ops;
pub mod ops;
pub mod props;
pub mod solve;
pub mod span;
pub mod decompose;

pub use helpers::{ArithmeticOp, extract_matrix, extract_number, extract_text, extract_vector};
pub use parse::{parse_matrix, parse_scalars, parse_vector, parse_vector_list, parse_vectors};
pub use ops::MatrixOperand;
pub use solve::{SolveMethod, Solution};

use linal_plugin::OperationRegistry;

/// Load vector and matrix operations into registry
pub fn load_matrix_library(registry: OperationRegistry) -> OperationRegistry {
    registry
        // Vector algebra (6 operations)
        .with_operation(vector_ops::DotProductFn)
        .with_operation(vector_ops::CrossProductFn)
        .with_operation(vector_ops::TripleProductFn)
        .with_operation(vector_ops::VectorArithmeticFn)
        .with_operation(vector_ops::MagnitudeFn)
        .with_operation(vector_ops::OrthogonalizationFn)

        // Matrix algebra (9 operations)
        .with_operation(ops::MatrixArithmeticFn)
        .with_operation(props::DeterminantFn)
        .with_operation(ops::InverseFn)
        .with_operation(props::RankFn)
        .with_operation(solve::SolveFn)
        .with_operation(decompose::EigenvaluesFn)
        .with_operation(decompose::EigenvectorsFn)
        .with_operation(span::SpanDimensionFn)
        .with_operation(span::SpanMembershipFn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_matrix_library() {
        let registry = load_matrix_library(OperationRegistry::new());

        assert_eq!(registry.len(), 15);
        assert!(registry.get("Dot product").is_some());
        assert!(registry.get("Скалярное произведение").is_some());
        assert!(registry.get("determinant").is_some());
        assert!(registry.get("Решение СЛАУ").is_some());
        assert!(registry.get("Eigenvectors").is_some());
        assert!(registry.get("span membership").is_some());
    }
}
