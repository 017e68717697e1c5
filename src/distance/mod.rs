//! Distances between time series and batch distance matrices.
//!
//! # Example
//!
//! ```
//! use tsbatch::core::{Batch, ComputeContext};
//! use tsbatch::distance::{compute, Metric};
//!
//! let ctx = ComputeContext::new();
//! let batch = Batch::from_series(&[
//!     vec![0.0, 1.0, 0.0, -1.0, 0.0, 1.0],
//!     vec![1.0, 0.0, -1.0, 0.0, 1.0, 0.0],
//!     vec![5.0, 5.0, 5.0, 6.0, 6.0, 6.0],
//! ])
//! .unwrap();
//!
//! let m = compute(&ctx, &Metric::Sbd, &batch, None).unwrap();
//! assert_eq!(m.shape(), (3, 3));
//! assert_eq!(m[(1, 1)], 0.0);
//! assert!(m[(0, 1)] < m[(0, 2)]);
//! ```

pub mod dtw;
pub mod elementwise;
pub mod matrix;
pub mod metric;
pub mod sbd;

pub use dtw::dtw_distance;
pub use elementwise::{
    chebyshev_distance, euclidean_distance, manhattan_distance, minkowski_distance,
    squared_euclidean_distance,
};
pub use matrix::DistanceMatrix;
pub use metric::Metric;
pub use sbd::{
    ncc, sbd, sbd_matrix, sbd_normalized, sbd_to_reference, shift_zero_fill, ShapeDistance,
};

use crate::core::{Batch, ComputeContext};
use crate::error::{Result, TsError};
use tracing::debug;

/// Distance matrix for `metric` between the series of `a` and `b`, or
/// within `a` when `b` is `None`.
///
/// Configuration is checked before anything is computed. Within one batch,
/// symmetric metrics are evaluated once per unordered pair.
pub fn compute(
    ctx: &ComputeContext,
    metric: &Metric,
    a: &Batch,
    b: Option<&Batch>,
) -> Result<DistanceMatrix> {
    metric.validate()?;
    check_batch(a)?;
    if let Some(b) = b {
        check_batch(b)?;
        if metric.requires_equal_length() && a.series_len() != b.series_len() {
            return Err(TsError::DimensionMismatch {
                expected: a.series_len(),
                got: b.series_len(),
            });
        }
    }
    debug!(
        metric = %metric,
        rows = a.count(),
        cols = b.map_or(a.count(), Batch::count),
        "computing distance matrix"
    );

    match (metric, b) {
        (Metric::Sbd, _) => sbd_matrix(ctx, a, b),
        (m, None) if m.is_symmetric() => Ok(DistanceMatrix::build_symmetric(
            ctx,
            a.count(),
            |i, j| m.eval(a.series(i), a.series(j)),
        )),
        (m, None) => Ok(DistanceMatrix::build(ctx, a.count(), a.count(), |i, j| {
            m.eval(a.series(i), a.series(j))
        })),
        (m, Some(b)) => Ok(DistanceMatrix::build(ctx, a.count(), b.count(), |i, j| {
            m.eval(a.series(i), b.series(j))
        })),
    }
}

/// Pairwise distances within one batch.
pub fn pairwise(ctx: &ComputeContext, metric: &Metric, batch: &Batch) -> Result<DistanceMatrix> {
    compute(ctx, metric, batch, None)
}

/// Distances from every series of `a` to every series of `b`.
pub fn cross(
    ctx: &ComputeContext,
    metric: &Metric,
    a: &Batch,
    b: &Batch,
) -> Result<DistanceMatrix> {
    compute(ctx, metric, a, Some(b))
}

fn check_batch(batch: &Batch) -> Result<()> {
    if batch.count() == 0 || batch.series_len() == 0 {
        return Err(TsError::EmptyData);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Backend;
    use approx::assert_relative_eq;

    fn sample() -> Batch {
        Batch::from_series(&[
            vec![1.0, 2.0, 3.0, 4.0],
            vec![2.0, 2.0, 2.0, 2.0],
            vec![0.0, 4.0, 0.0, 4.0],
        ])
        .unwrap()
    }

    // ==================== compute ====================

    #[test]
    fn compute_pairwise_euclidean() {
        let ctx = ComputeContext::new();
        let m = compute(&ctx, &Metric::Euclidean, &sample(), None).unwrap();

        assert_eq!(m.shape(), (3, 3));
        assert!(m.is_symmetric(0.0));
        // (1,2,3,4) vs (2,2,2,2): sqrt(1 + 0 + 1 + 4)
        assert_relative_eq!(m[(0, 1)], 6.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(m[(1, 2)], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn compute_cross_counts_may_differ() {
        let ctx = ComputeContext::new();
        let b = Batch::from_series(&[vec![1.0, 2.0, 3.0, 4.0]]).unwrap();
        let m = compute(&ctx, &Metric::Manhattan, &sample(), Some(&b)).unwrap();

        assert_eq!(m.shape(), (3, 1));
        assert_eq!(m[(0, 0)], 0.0);
        assert_relative_eq!(m[(2, 0)], 8.0, epsilon = 1e-12);
    }

    #[test]
    fn compute_backends_agree() {
        let batch = sample();
        let parallel = ComputeContext::new().with_backend(Backend::Parallel);
        let sequential = ComputeContext::new().with_backend(Backend::Sequential);

        for metric in [Metric::Sbd, Metric::Dtw { window: None }, Metric::Chebyshev] {
            let p = compute(&parallel, &metric, &batch, None).unwrap();
            let s = compute(&sequential, &metric, &batch, None).unwrap();
            assert_eq!(p, s);
        }
    }

    #[test]
    fn compute_sbd_matches_pair_function() {
        let ctx = ComputeContext::new();
        let batch = sample();
        let m = pairwise(&ctx, &Metric::Sbd, &batch).unwrap();

        assert_relative_eq!(
            m[(0, 2)],
            sbd(batch.series(0), batch.series(2)).unwrap().distance,
            epsilon = 1e-10
        );
        // constant series is degenerate against everything
        assert_relative_eq!(m[(0, 1)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn compute_rejects_configuration_errors_first() {
        let ctx = ComputeContext::new();
        let empty = Batch::from_series(&[]).unwrap();
        assert_eq!(
            compute(&ctx, &Metric::Sbd, &empty, None).unwrap_err(),
            TsError::EmptyData
        );

        let bad = Metric::Minkowski { p: 0.0 };
        assert!(compute(&ctx, &bad, &sample(), None)
            .unwrap_err()
            .is_configuration());

        let short = Batch::from_series(&[vec![1.0, 2.0]]).unwrap();
        assert_eq!(
            cross(&ctx, &Metric::Euclidean, &sample(), &short).unwrap_err(),
            TsError::DimensionMismatch {
                expected: 4,
                got: 2
            }
        );
    }

    #[test]
    fn compute_dtw_accepts_different_lengths() {
        let ctx = ComputeContext::new();
        let short = Batch::from_series(&[vec![1.0, 2.0]]).unwrap();
        let m = cross(&ctx, &Metric::Dtw { window: None }, &sample(), &short).unwrap();
        assert_eq!(m.shape(), (3, 1));
        assert!(m.as_slice().iter().all(|d| d.is_finite()));
    }
}
