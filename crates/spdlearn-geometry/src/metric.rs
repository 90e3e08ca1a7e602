//! Metric choices on the SPD manifold.
//!
//! A `Metric` selects both the squared-distance formula and the mean
//! algorithm used by every downstream consumer. The set is closed by
//! design: adding a metric means extending the dispatch in
//! [`crate::distance`] and [`crate::mean`], and the compiler enforces
//! exhaustiveness at each site.

use std::fmt;

/// Available metrics on the manifold of SPD matrices.
///
/// Three families require iterative fixed-point mean solvers
/// ([`Metric::Fisher`], [`Metric::LogDet0`], [`Metric::Wasserstein`]);
/// the rest have closed-form means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Metric {
    /// Euclidean metric: d²(P,Q) = ‖P−Q‖²_F, arithmetic mean.
    Euclidean,
    /// Inverse Euclidean metric: d²(P,Q) = ‖P⁻¹−Q⁻¹‖²_F, harmonic mean.
    InvEuclidean,
    /// Cholesky-Euclidean metric: d²(P,Q) = ‖L_P−L_Q‖²_F on lower
    /// Cholesky factors.
    ChoEuclidean,
    /// Log-Euclidean metric: d²(P,Q) = ‖log P − log Q‖²_F.
    LogEuclidean,
    /// Fisher (affine-invariant) metric:
    /// d²(P,Q) = ‖log(P^{-1/2} Q P^{-1/2})‖²_F; Karcher mean.
    Fisher,
    /// LogDet zero (S-divergence) metric:
    /// d²(P,Q) = log det((P+Q)/2) − ½ log det(PQ).
    LogDet0,
    /// Jeffrey (symmetrized Kullback-Leibler) metric:
    /// d²(P,Q) = ½ tr(P⁻¹Q + Q⁻¹P) − n.
    Jeffrey,
    /// Bures-Wasserstein metric:
    /// d²(P,Q) = tr(P + Q − 2(P^{1/2} Q P^{1/2})^{1/2}).
    Wasserstein,
}

impl Metric {
    /// Returns true when the mean under this metric requires an iterative
    /// fixed-point solver.
    #[inline]
    pub fn is_iterative(self) -> bool {
        matches!(self, Self::Fisher | Self::LogDet0 | Self::Wasserstein)
    }

    /// All supported metrics, in declaration order.
    pub const ALL: [Metric; 8] = [
        Metric::Euclidean,
        Metric::InvEuclidean,
        Metric::ChoEuclidean,
        Metric::LogEuclidean,
        Metric::Fisher,
        Metric::LogDet0,
        Metric::Jeffrey,
        Metric::Wasserstein,
    ];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Euclidean => "Euclidean",
            Self::InvEuclidean => "inverse Euclidean",
            Self::ChoEuclidean => "Cholesky-Euclidean",
            Self::LogEuclidean => "log-Euclidean",
            Self::Fisher => "Fisher",
            Self::LogDet0 => "logdet-zero",
            Self::Jeffrey => "Jeffrey",
            Self::Wasserstein => "Wasserstein",
        };
        write!(f, "{}", name)
    }
}
