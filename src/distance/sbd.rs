//! Shape-based distance (SBD).
//!
//! SBD compares z-normalized series through their normalized cross-correlation
//! (NCC) over every relative lag:
//!
//! SBD(x, y) = 1 - max_w NCC_w(x, y),   NCC_w = CC_w / sqrt(‖x‖² ‖y‖²)
//!
//! so it is invariant to offset and amplitude (through normalization) and to
//! time shift (through the lag search). Values lie in `[0, 2]`.
//!
//! All cross-correlations are computed in the frequency domain. Batch entry
//! points transform every series in one bulk FFT and then only pay one
//! spectral product and inverse transform per pair.

use super::matrix::DistanceMatrix;
use crate::compute::{map_indices, CrossCorrelator, Spectra};
use crate::core::{Batch, ComputeContext, Precision};
use crate::error::{Result, TsError};
use crate::transform::normalize::znorm_slice;
use crate::transform::ZNorm;

/// Distance and optimal alignment between two series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDistance {
    /// `1 - max NCC`, clamped to `[0, 2]`.
    pub distance: f64,
    /// Lag of the maximum. Shifting the second series right by `shift`
    /// samples (zero-filled) aligns it with the first.
    pub shift: isize,
}

impl ShapeDistance {
    /// Result reported when either series has (near) zero energy.
    pub const DEGENERATE: ShapeDistance = ShapeDistance {
        distance: 1.0,
        shift: 0,
    };
}

/// Shape-based distance between two series.
///
/// Both series are z-normalized first. Series of different lengths are
/// compared by zero-padding the shorter one.
///
/// # Example
///
/// ```
/// use tsbatch::distance::sbd;
///
/// let x = vec![0.0, 1.0, 3.0, 1.0, 0.0, 0.0];
/// let y = vec![0.0, 0.0, 10.0, 30.0, 10.0, 0.0]; // shifted and rescaled
/// let result = sbd(&x, &y).unwrap();
/// assert!(result.distance < 0.15);
/// assert_eq!(result.shift, -1);
/// ```
pub fn sbd(x: &[f64], y: &[f64]) -> Result<ShapeDistance> {
    if x.is_empty() || y.is_empty() {
        return Err(TsError::EmptyData);
    }
    let eps = Precision::Double.epsilon();
    let nx = znorm_slice(x, 0, eps);
    let ny = znorm_slice(y, 0, eps);
    sbd_normalized(&nx, &ny, eps)
}

/// Shape-based distance for series the caller has already z-normalized.
///
/// `epsilon` guards the NCC denominator: when `‖x‖·‖y‖ < epsilon` the result
/// is [`ShapeDistance::DEGENERATE`].
pub fn sbd_normalized(x: &[f64], y: &[f64], epsilon: f64) -> Result<ShapeDistance> {
    if x.is_empty() || y.is_empty() {
        return Err(TsError::EmptyData);
    }
    let correlator = CrossCorrelator::new(x.len().max(y.len()));
    let cc = correlator.correlate(x, y)?;
    Ok(shape_distance(
        &cc,
        energy(x),
        energy(y),
        correlator.len(),
        epsilon,
    ))
}

/// Normalized cross-correlation sequence of two series, lags
/// `-(n - 1)..=n - 1` in order. The denominator is floored at `epsilon`.
pub fn ncc(x: &[f64], y: &[f64], epsilon: f64) -> Result<Vec<f64>> {
    if x.is_empty() || y.is_empty() {
        return Err(TsError::EmptyData);
    }
    let correlator = CrossCorrelator::new(x.len().max(y.len()));
    let den = (energy(x) * energy(y)).sqrt().max(epsilon);
    Ok(correlator
        .correlate(x, y)?
        .into_iter()
        .map(|c| c / den)
        .collect())
}

/// SBD from `reference` to every series of `batch`, both already z-normalized.
///
/// The batch is transformed with one bulk FFT. Entry `j` of the result
/// carries the shift that aligns series `j` to `reference`.
pub fn sbd_to_reference(
    ctx: &ComputeContext,
    reference: &[f64],
    batch: &Batch,
) -> Result<Vec<ShapeDistance>> {
    if batch.count() == 0 {
        return Ok(Vec::new());
    }
    if reference.is_empty() || batch.series_len() == 0 {
        return Err(TsError::EmptyData);
    }

    let eps = batch.precision().epsilon();
    let correlator = CrossCorrelator::new(reference.len().max(batch.series_len()));
    let reference_spectrum = correlator.spectrum(reference)?;
    let reference_energy = energy(reference);
    let prepared = Prepared::new(ctx, &correlator, batch)?;

    Ok(map_indices(ctx, batch.count(), |j| {
        let cc = correlator.correlate_spectra(&reference_spectrum, prepared.spectra.column(j));
        shape_distance(
            &cc,
            reference_energy,
            prepared.energies[j],
            correlator.len(),
            eps,
        )
    }))
}

/// SBD matrix between the series of `a` and `b`, or within `a` when `b` is
/// `None`. Inputs are z-normalized here.
pub fn sbd_matrix(ctx: &ComputeContext, a: &Batch, b: Option<&Batch>) -> Result<DistanceMatrix> {
    let norm = ZNorm::default();
    check_non_empty(a)?;
    let na = norm.apply(a)?;

    match b {
        None => {
            let eps = a.precision().epsilon();
            let correlator = CrossCorrelator::new(a.series_len());
            let pa = Prepared::new(ctx, &correlator, &na)?;
            Ok(DistanceMatrix::build_symmetric(ctx, a.count(), |i, j| {
                pa.distance(&correlator, i, &pa, j, eps).distance
            }))
        }
        Some(b) => {
            check_non_empty(b)?;
            let nb = norm.apply(b)?;
            let eps = a.precision().epsilon().max(b.precision().epsilon());
            let correlator = CrossCorrelator::new(a.series_len().max(b.series_len()));
            let pa = Prepared::new(ctx, &correlator, &na)?;
            let pb = Prepared::new(ctx, &correlator, &nb)?;
            Ok(DistanceMatrix::build(ctx, a.count(), b.count(), |i, j| {
                pa.distance(&correlator, i, &pb, j, eps).distance
            }))
        }
    }
}

/// Shift `series` right by `shift` samples (left when negative), filling the
/// exposed end with zeros. Values shifted past either end are dropped.
pub fn shift_zero_fill(series: &[f64], shift: isize) -> Vec<f64> {
    let n = series.len();
    let mut out = vec![0.0; n];
    let magnitude = shift.unsigned_abs();
    if magnitude >= n {
        return out;
    }
    if shift >= 0 {
        out[magnitude..].copy_from_slice(&series[..n - magnitude]);
    } else {
        out[..n - magnitude].copy_from_slice(&series[magnitude..]);
    }
    out
}

/// Spectra and energies of a normalized batch.
struct Prepared {
    spectra: Spectra,
    energies: Vec<f64>,
}

impl Prepared {
    fn new(ctx: &ComputeContext, correlator: &CrossCorrelator, batch: &Batch) -> Result<Self> {
        Ok(Self {
            spectra: correlator.spectra(ctx, batch.iter())?,
            energies: batch.iter().map(energy).collect(),
        })
    }

    fn distance(
        &self,
        correlator: &CrossCorrelator,
        i: usize,
        other: &Prepared,
        j: usize,
        eps: f64,
    ) -> ShapeDistance {
        let cc = correlator.correlate_spectra(self.spectra.column(i), other.spectra.column(j));
        shape_distance(
            &cc,
            self.energies[i],
            other.energies[j],
            correlator.len(),
            eps,
        )
    }
}

fn check_non_empty(batch: &Batch) -> Result<()> {
    if batch.count() == 0 || batch.series_len() == 0 {
        return Err(TsError::EmptyData);
    }
    Ok(())
}

fn energy(series: &[f64]) -> f64 {
    series.iter().map(|v| v * v).sum()
}

/// Pick the best lag of a cross-correlation sequence. Ties resolve to the
/// smallest absolute lag, and between `-l` and `+l` to `-l`.
fn shape_distance(cc: &[f64], energy_x: f64, energy_y: f64, len: usize, eps: f64) -> ShapeDistance {
    let den = (energy_x * energy_y).sqrt();
    if den < eps {
        return ShapeDistance::DEGENERATE;
    }

    let lag = |i: usize| i as isize - (len as isize - 1);
    let mut best = 0;
    for (i, &v) in cc.iter().enumerate().skip(1) {
        if v > cc[best] || (v == cc[best] && lag(i).abs() < lag(best).abs()) {
            best = i;
        }
    }

    ShapeDistance {
        distance: (1.0 - cc[best] / den).clamp(0.0, 2.0),
        shift: lag(best),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn wave(n: usize, freq: f64, phase: f64) -> Vec<f64> {
        (0..n)
            .map(|t| (2.0 * PI * freq * t as f64 / n as f64 + phase).sin())
            .collect()
    }

    // ==================== sbd ====================

    #[test]
    fn sbd_self_distance_is_zero() {
        let x = vec![1.0, 3.0, -2.0, 0.5, 4.0, 2.0];
        let result = sbd(&x, &x).unwrap();
        assert_relative_eq!(result.distance, 0.0, epsilon = 1e-10);
        assert_eq!(result.shift, 0);
    }

    #[test]
    fn sbd_is_symmetric_with_negated_shift() {
        let x = vec![0.0, 1.0, 4.0, 2.0, 0.5, 0.0, -1.0];
        let y = vec![2.0, 0.0, 0.0, 1.0, 3.0, 1.5, 0.0];
        let xy = sbd(&x, &y).unwrap();
        let yx = sbd(&y, &x).unwrap();

        assert_relative_eq!(xy.distance, yx.distance, epsilon = 1e-10);
        assert_eq!(xy.shift, -yx.shift);
    }

    #[test]
    fn sbd_ignores_offset_and_scale() {
        let x = vec![0.3, 1.0, 4.0, 2.0, 0.5, 0.0, -1.0];
        let y = vec![2.0, 0.0, 0.0, 1.0, 3.0, 1.5, 0.0];
        let scaled: Vec<f64> = y.iter().map(|v| 7.5 * v - 20.0).collect();

        let base = sbd(&x, &y).unwrap();
        let transformed = sbd(&x, &scaled).unwrap();
        assert_relative_eq!(base.distance, transformed.distance, epsilon = 1e-10);
        assert_eq!(base.shift, transformed.shift);
    }

    #[test]
    fn sbd_finds_shift_of_pulse() {
        let x = vec![0.0, 0.0, 0.0, 0.0, 1.0, 3.0, 1.0, 0.0, 0.0, 0.0];
        let y = vec![0.0, 1.0, 3.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let result = sbd(&x, &y).unwrap();

        // y moved right by three samples lines up with x
        assert_eq!(result.shift, 3);
        assert!(result.distance < 0.1);
        let aligned = shift_zero_fill(&y, result.shift);
        assert_eq!(aligned, x);
    }

    #[test]
    fn sbd_is_bounded() {
        let x = wave(16, 1.0, 0.0);
        let y: Vec<f64> = x.iter().map(|v| -v).collect();
        let result = sbd(&x, &y).unwrap();
        assert!(result.distance >= 0.0 && result.distance <= 2.0);
    }

    #[test]
    fn sbd_constant_input_is_degenerate() {
        let x = vec![3.0; 8];
        let y = wave(8, 1.0, 0.0);
        assert_eq!(sbd(&x, &y).unwrap(), ShapeDistance::DEGENERATE);
        assert_eq!(
            sbd_normalized(&[0.0; 4], &[0.0; 4], f64::EPSILON).unwrap(),
            ShapeDistance::DEGENERATE
        );
    }

    #[test]
    fn sbd_inexact_constant_is_degenerate() {
        let x = vec![0.1; 8];
        let y = wave(8, 1.0, 0.0);
        assert_eq!(sbd(&x, &y).unwrap(), ShapeDistance::DEGENERATE);
        assert_eq!(sbd(&y, &x).unwrap(), ShapeDistance::DEGENERATE);

        let ctx = ComputeContext::new();
        let batch = Batch::from_series(&[x, y]).unwrap();
        let m = sbd_matrix(&ctx, &batch, None).unwrap();
        assert_eq!(m[(0, 1)], 1.0);
        assert_eq!(m[(1, 0)], 1.0);
    }

    #[test]
    fn tied_lags_prefer_smallest_shift() {
        // lags -2..=2; -2 and +1 tie at the maximum
        let cc = [2.0, 0.0, 1.0, 2.0, 0.0];
        let result = shape_distance(&cc, 4.0, 1.0, 3, f64::EPSILON);
        assert_eq!(result.shift, 1);
        assert_relative_eq!(result.distance, 0.0);

        // -1 and +1 tie: the pair is only symmetric in distance
        let x = [1.0, -1.0];
        let y = [-1.0, 1.0];
        let xy = sbd(&x, &y).unwrap();
        let yx = sbd(&y, &x).unwrap();
        assert_eq!(xy.shift.abs(), 1);
        assert_eq!(yx.shift.abs(), 1);
        assert_relative_eq!(xy.distance, 0.5, epsilon = 1e-12);
        assert_relative_eq!(yx.distance, xy.distance, epsilon = 1e-12);
    }

    #[test]
    fn sbd_accepts_different_lengths() {
        let x = vec![0.0, 1.0, 3.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        let y = vec![0.0, 1.0, 3.0, 1.0, 0.0];
        let result = sbd(&x, &y).unwrap();
        assert!(result.distance < 0.2);
        assert_eq!(result.shift, 0);
    }

    #[test]
    fn sbd_rejects_empty() {
        assert_eq!(sbd(&[], &[1.0]).unwrap_err(), TsError::EmptyData);
    }

    // ==================== ncc ====================

    #[test]
    fn ncc_peaks_at_one_for_identical_input() {
        let x = vec![1.0, -1.0, 2.0, -2.0];
        let seq = ncc(&x, &x, f64::EPSILON).unwrap();
        assert_eq!(seq.len(), 7);
        assert_relative_eq!(seq[3], 1.0, epsilon = 1e-12);
        assert!(seq.iter().all(|&v| v <= 1.0 + 1e-12));
    }

    // ==================== batch entry points ====================

    #[test]
    fn sbd_to_reference_matches_pairwise_calls() {
        let ctx = ComputeContext::new();
        let series = vec![wave(12, 1.0, 0.3), wave(12, 2.0, 0.0), wave(12, 1.0, 1.4)];
        let batch = crate::transform::znorm(&Batch::from_series(&series).unwrap()).unwrap();
        let reference = batch.series(0).to_vec();

        let bulk = sbd_to_reference(&ctx, &reference, &batch).unwrap();
        for (j, s) in batch.iter().enumerate() {
            let single = sbd_normalized(&reference, s, f64::EPSILON).unwrap();
            assert_relative_eq!(bulk[j].distance, single.distance, epsilon = 1e-10);
            assert_eq!(bulk[j].shift, single.shift);
        }
    }

    #[test]
    fn sbd_matrix_within_batch() {
        let ctx = ComputeContext::new();
        let batch = Batch::from_series(&[wave(10, 1.0, 0.0), wave(10, 1.0, 0.9), wave(10, 3.0, 0.0)])
            .unwrap();
        let m = sbd_matrix(&ctx, &batch, None).unwrap();

        assert_eq!(m.shape(), (3, 3));
        assert!(m.is_symmetric(1e-12));
        for i in 0..3 {
            assert_eq!(m[(i, i)], 0.0);
        }
        assert!(m[(0, 1)] < m[(0, 2)]);
        assert_relative_eq!(
            m[(0, 2)],
            sbd(batch.series(0), batch.series(2)).unwrap().distance,
            epsilon = 1e-10
        );
    }

    #[test]
    fn sbd_matrix_across_batches_of_different_lengths() {
        let ctx = ComputeContext::new();
        let a = Batch::from_series(&[wave(10, 1.0, 0.0), wave(10, 2.0, 0.0)]).unwrap();
        let b = Batch::from_series(&[wave(6, 1.0, 0.0), wave(6, 2.0, 0.5), wave(6, 1.0, 0.1)])
            .unwrap();
        let m = sbd_matrix(&ctx, &a, Some(&b)).unwrap();

        assert_eq!(m.shape(), (2, 3));
        assert_relative_eq!(
            m[(1, 2)],
            sbd(a.series(1), b.series(2)).unwrap().distance,
            epsilon = 1e-10
        );
    }

    // ==================== shift_zero_fill ====================

    #[test]
    fn shift_zero_fill_directions() {
        let s = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(shift_zero_fill(&s, 1), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(shift_zero_fill(&s, -2), vec![3.0, 4.0, 0.0, 0.0]);
        assert_eq!(shift_zero_fill(&s, 0), s);
        assert_eq!(shift_zero_fill(&s, 9), vec![0.0; 4]);
    }
}
