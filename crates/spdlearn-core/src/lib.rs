//! Core types for Riemannian learning on SPD matrices.
//!
//! This crate provides the scalar trait and the error taxonomy shared by
//! the geometry primitives (`spdlearn-geometry`) and the MDM classifier
//! (`spdlearn-classify`).

pub mod error;
pub mod types;

pub use error::{ClassifyError, ClassifyResult, GeometryError, GeometryResult};
pub use types::Scalar;
