//! SPD manifold primitives for Riemannian machine learning.
//!
//! This crate implements the geometry the MDM classifier builds on:
//! symmetric matrix functions, a closed set of metrics on the SPD cone,
//! per-metric squared geodesic distances, and weighted means (closed-form
//! where available, iterative fixed-point solvers for the Fisher,
//! logdet-zero and Wasserstein families).

pub mod distance;
pub mod functions;
pub mod mean;
pub mod metric;
pub mod random;
pub mod weights;

pub use distance::{distance, distance_squared};
pub use mean::{closed_form_mean, geometric_mean, iterative_mean, MeanOutcome};
pub use metric::Metric;
pub use random::{random_spd, random_spd_cloud};
pub use weights::normalize_weights;
