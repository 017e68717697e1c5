//! Shape extraction: the k-Shape centroid update.
//!
//! The centroid of a cluster is the series that maximizes the sum of squared
//! normalized correlations with the cluster members. After aligning every
//! member to a reference by its SBD-optimal shift, that maximizer is the
//! leading eigenvector of
//!
//! M = P · S · Sᵀ · P,   P = I - J / n
//!
//! where `S` holds the aligned, z-normalized members as columns and `J` is
//! the all-ones matrix.

use crate::compute::{centering_matrix, leading_eigenvector};
use crate::core::{Batch, ComputeContext};
use crate::distance::{sbd_to_reference, shift_zero_fill};
use crate::error::{Result, TsError};
use crate::transform::normalize::znorm_slice;
use crate::transform::ZNorm;
use nalgebra::DMatrix;
use tracing::debug;

/// Extract the shape centroid of `members`.
///
/// `reference` is the previous centroid of the cluster (z-normalized) and
/// serves as the alignment target. Without one, the first member is used.
/// The returned centroid is z-normalized and its sign is chosen so that it
/// correlates non-negatively with the reference.
///
/// If every member is constant there is no shape to extract and an all-zero
/// centroid is returned.
pub fn extract_shape(
    ctx: &ComputeContext,
    members: &Batch,
    reference: Option<&[f64]>,
) -> Result<Vec<f64>> {
    if members.count() == 0 || members.series_len() == 0 {
        return Err(TsError::EmptyData);
    }
    let n = members.series_len();
    let eps = members.precision().epsilon();
    let normalized = ZNorm::default().apply(members)?;

    let reference = match reference {
        Some(r) if r.len() != n => {
            return Err(TsError::DimensionMismatch {
                expected: n,
                got: r.len(),
            })
        }
        Some(r) => r.to_vec(),
        None => normalized.series(0).to_vec(),
    };

    let alignments = sbd_to_reference(ctx, &reference, &normalized)?;
    let mut aligned = DMatrix::zeros(n, normalized.count());
    for (j, (series, alignment)) in normalized.iter().zip(alignments.iter()).enumerate() {
        let shifted = shift_zero_fill(series, alignment.shift);
        aligned.column_mut(j).copy_from_slice(&shifted);
    }

    let p = centering_matrix(n);
    let gram = &aligned * aligned.transpose();
    let m = &p * gram * &p;

    let (value, vector) = leading_eigenvector(m)?;
    if value <= eps {
        debug!(members = members.count(), "degenerate cluster, zero centroid");
        return Ok(vec![0.0; n]);
    }

    let orientation: f64 = vector.iter().zip(reference.iter()).map(|(a, b)| a * b).sum();
    let centroid: Vec<f64> = if orientation < 0.0 {
        vector.iter().map(|v| -v).collect()
    } else {
        vector.iter().copied().collect()
    };

    Ok(znorm_slice(&centroid, 0, eps))
}
