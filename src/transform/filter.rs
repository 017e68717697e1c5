//! Savitzky-Golay smoothing filter.
//!
//! Fits a least-squares polynomial over a sliding window and evaluates it
//! (or one of its derivatives) at the window center. The first and last
//! `window / 2` points are evaluated on the polynomial fitted to the first
//! and last full window.

use crate::core::Batch;
use crate::error::{Result, TsError};
use nalgebra::DMatrix;

/// Apply a Savitzky-Golay filter to one series.
///
/// # Arguments
/// * `series` - Input series (unit sample spacing)
/// * `window` - Odd window length, at most the series length
/// * `polyorder` - Polynomial order, less than `window`
/// * `deriv` - Derivative order to evaluate (0 smooths)
///
/// # Example
///
/// ```
/// use tsbatch::transform::savitzky_golay;
///
/// // A quadratic passes through a quadratic filter unchanged
/// let y: Vec<f64> = (0..9).map(|t| (t * t) as f64).collect();
/// let smoothed = savitzky_golay(&y, 5, 2, 0).unwrap();
/// assert!((smoothed[4] - 16.0).abs() < 1e-9);
/// ```
pub fn savitzky_golay(
    series: &[f64],
    window: usize,
    polyorder: usize,
    deriv: usize,
) -> Result<Vec<f64>> {
    let projection = fit_projection(series.len(), window, polyorder)?;
    let n = series.len();
    let half = window / 2;

    let center = evaluation_weights(&projection, 0.0, deriv);
    let mut out = Vec::with_capacity(n);

    for i in 0..n {
        let value = if i < half {
            let weights = evaluation_weights(&projection, i as f64 - half as f64, deriv);
            dot(&weights, &series[..window])
        } else if i + half >= n {
            let offset = i as f64 - (n - 1 - half) as f64;
            let weights = evaluation_weights(&projection, offset, deriv);
            dot(&weights, &series[n - window..])
        } else {
            dot(&center, &series[i - half..=i + half])
        };
        out.push(value);
    }

    Ok(out)
}

/// Apply [`savitzky_golay`] to every series of a batch.
pub fn savitzky_golay_batch(
    batch: &Batch,
    window: usize,
    polyorder: usize,
    deriv: usize,
) -> Result<Batch> {
    let mut data = Vec::with_capacity(batch.as_slice().len());
    for s in batch.iter() {
        data.extend(savitzky_golay(s, window, polyorder, deriv)?);
    }
    Ok(Batch::from_column_major(data, batch.series_len(), batch.count())?
        .with_precision(batch.precision()))
}

/// Least-squares projection from window samples to polynomial coefficients
/// (`(polyorder + 1) x window`), positions centered on the window middle.
fn fit_projection(len: usize, window: usize, polyorder: usize) -> Result<DMatrix<f64>> {
    if window == 0 || window % 2 == 0 {
        return Err(TsError::InvalidParameter(format!(
            "window must be a positive odd number, got {}",
            window
        )));
    }
    if polyorder >= window {
        return Err(TsError::InvalidParameter(format!(
            "polyorder ({}) must be less than window ({})",
            polyorder, window
        )));
    }
    if len < window {
        return Err(TsError::InsufficientData {
            needed: window,
            got: len,
        });
    }

    let half = (window / 2) as f64;
    let vandermonde = DMatrix::from_fn(window, polyorder + 1, |i, k| {
        (i as f64 - half).powi(k as i32)
    });
    vandermonde
        .pseudo_inverse(1e-12)
        .map_err(|e| TsError::ComputationError(e.to_string()))
}

/// Weights that evaluate the `deriv`-th derivative of the fitted polynomial
/// at `offset` from the window center.
fn evaluation_weights(projection: &DMatrix<f64>, offset: f64, deriv: usize) -> Vec<f64> {
    let (terms, window) = projection.shape();
    let mut weights = vec![0.0; window];

    for k in deriv..terms {
        // d^deriv/dt^deriv t^k = k! / (k - deriv)! * t^(k - deriv)
        let falling: f64 = ((k - deriv + 1)..=k).map(|v| v as f64).product();
        let factor = falling * offset.powi((k - deriv) as i32);
        for (i, w) in weights.iter_mut().enumerate() {
            *w += projection[(k, i)] * factor;
        }
    }

    weights
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
