//! Per-series normalization of batches.
//!
//! Every function transforms each series of a batch independently and
//! returns a new batch of the same shape.

use crate::core::{Batch, Precision};
use crate::error::{Result, TsError};

/// Z-normalization settings.
///
/// x_scaled = (x - mean) / std
///
/// The standard deviation uses divisor `len - ddof`. When it falls below
/// `epsilon` (by default the machine epsilon of the batch precision) the
/// series is treated as constant and maps to all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZNorm {
    /// Delta degrees of freedom subtracted from the divisor.
    pub ddof: usize,
    /// Standard deviation floor; `None` uses the precision's machine epsilon.
    pub epsilon: Option<f64>,
}

impl ZNorm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set delta degrees of freedom (0 = population, 1 = sample).
    pub fn ddof(mut self, ddof: usize) -> Self {
        self.ddof = ddof;
        self
    }

    /// Override the standard deviation floor.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    fn resolve_epsilon(&self, precision: Precision) -> f64 {
        self.epsilon.unwrap_or_else(|| precision.epsilon())
    }

    /// Z-normalize every series of `batch`.
    pub fn apply(&self, batch: &Batch) -> Result<Batch> {
        if batch.count() == 0 {
            return Ok(batch.clone());
        }
        self.check_len(batch.series_len())?;
        let eps = self.resolve_epsilon(batch.precision());
        Ok(batch.map_series(|s| znorm_slice(s, self.ddof, eps)))
    }

    /// Z-normalize a single series.
    pub fn apply_series(&self, series: &[f64], precision: Precision) -> Result<Vec<f64>> {
        self.check_len(series.len())?;
        Ok(znorm_slice(
            series,
            self.ddof,
            self.resolve_epsilon(precision),
        ))
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len <= self.ddof {
            return Err(TsError::InsufficientData {
                needed: self.ddof + 1,
                got: len,
            });
        }
        Ok(())
    }
}

/// Z-normalize every series with population standard deviation.
///
/// # Example
///
/// ```
/// use tsbatch::core::Batch;
/// use tsbatch::transform::znorm;
///
/// let batch = Batch::from_series(&[vec![0.0, 1.0, 2.0, 3.0, 4.0]]).unwrap();
/// let normalized = znorm(&batch).unwrap();
/// let mean: f64 = normalized.series(0).iter().sum::<f64>() / 5.0;
/// assert!(mean.abs() < 1e-12);
/// ```
pub fn znorm(batch: &Batch) -> Result<Batch> {
    ZNorm::default().apply(batch)
}

/// Z-normalization kernel. Callers guarantee `series.len() > ddof`.
pub(crate) fn znorm_slice(series: &[f64], ddof: usize, epsilon: f64) -> Vec<f64> {
    let n = series.len() as f64;
    let mean = series.iter().sum::<f64>() / n;
    let variance = series.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - ddof as f64);
    let std = variance.sqrt();
    // Rounding in the mean leaves a residue on constant series
    if std < epsilon {
        return vec![0.0; series.len()];
    }
    series.iter().map(|&x| (x - mean) / std).collect()
}

/// Rescale every series into `[low, high]`.
///
/// x_scaled = (x - min) / (max - min) * (high - low) + low
///
/// A range below `epsilon` is replaced by `epsilon`.
pub fn max_min_norm(batch: &Batch, high: f64, low: f64, epsilon: Option<f64>) -> Result<Batch> {
    if !(high > low) {
        return Err(TsError::InvalidParameter(format!(
            "high ({}) must be greater than low ({})",
            high, low
        )));
    }
    let eps = epsilon.unwrap_or_else(|| batch.precision().epsilon());
    let span = high - low;

    Ok(batch.map_series(|s| {
        let min = s.iter().copied().fold(f64::INFINITY, f64::min);
        let max = s.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = (max - min).max(eps);
        s.iter().map(|&x| (x - min) / range * span + low).collect()
    }))
}

/// Scale every series by a power of ten so that all values fall in `[-1, 1]`.
///
/// x_scaled = x / 10^ceil(log10(max |x|))
pub fn decimal_scaling_norm(batch: &Batch) -> Batch {
    batch.map_series(|s| {
        let max_abs = s.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
        if max_abs == 0.0 {
            return s.to_vec();
        }
        let divisor = 10f64.powf(max_abs.log10().ceil());
        s.iter().map(|&x| x / divisor).collect()
    })
}

/// Center every series and divide by its range.
///
/// x_scaled = (x - mean) / (max - min)
pub fn mean_norm(batch: &Batch) -> Batch {
    let eps = batch.precision().epsilon();
    batch.map_series(|s| {
        if s.is_empty() {
            return Vec::new();
        }
        let mean = s.iter().sum::<f64>() / s.len() as f64;
        let min = s.iter().copied().fold(f64::INFINITY, f64::min);
        let max = s.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = (max - min).max(eps);
        s.iter().map(|&x| (x - mean) / range).collect()
    })
}
