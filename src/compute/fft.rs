//! FFT-based cross-correlation.
//!
//! Series are zero-padded to a power-of-two transform length of at least
//! `2 * len - 1`, so the circular correlation computed in the frequency
//! domain equals the linear one over every lag in `-(len - 1)..=len - 1`.

use crate::core::ComputeContext;
use crate::error::{Result, TsError};
use rustfft::{num_complex::Complex64, Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Transform length used to correlate series of length `len`.
pub fn fft_size(len: usize) -> usize {
    (2 * len).saturating_sub(1).max(1).next_power_of_two()
}

/// Planned forward/inverse transforms for correlating series up to `len` long.
#[derive(Clone)]
pub struct CrossCorrelator {
    len: usize,
    fft_len: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for CrossCorrelator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossCorrelator")
            .field("len", &self.len)
            .field("fft_len", &self.fft_len)
            .finish()
    }
}

impl CrossCorrelator {
    /// Plan transforms for series of length `len` (shorter series are zero-padded).
    pub fn new(len: usize) -> Self {
        let fft_len = fft_size(len);
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(fft_len);
        let inverse = planner.plan_fft_inverse(fft_len);
        Self {
            len,
            fft_len,
            forward,
            inverse,
        }
    }

    /// Longest series this correlator accepts.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Padded transform length.
    #[inline]
    pub fn fft_len(&self) -> usize {
        self.fft_len
    }

    /// Number of lags in a correlation sequence (`2 * len - 1`).
    #[inline]
    pub fn lags(&self) -> usize {
        (2 * self.len).saturating_sub(1)
    }

    /// Zero-padded spectrum of a single series.
    pub fn spectrum(&self, series: &[f64]) -> Result<Vec<Complex64>> {
        let mut buffer = vec![Complex64::new(0.0, 0.0); self.fft_len];
        self.load(&mut buffer, series)?;
        self.forward.process(&mut buffer);
        Ok(buffer)
    }

    /// Spectra of many series computed as one bulk transform of shape
    /// `(fft_len, count)`.
    pub fn spectra<'a, I>(&self, ctx: &ComputeContext, series: I) -> Result<Spectra>
    where
        I: ExactSizeIterator<Item = &'a [f64]>,
    {
        let count = series.len();
        let total = self.fft_len * count;
        ctx.ensure_fits(total * std::mem::size_of::<Complex64>())?;

        let mut buffer = vec![Complex64::new(0.0, 0.0); total];
        for (chunk, s) in buffer.chunks_exact_mut(self.fft_len).zip(series) {
            self.load(chunk, s)?;
        }
        if !buffer.is_empty() {
            // rustfft transforms every fft_len-sized chunk of the buffer in turn
            self.forward.process(&mut buffer);
        }
        trace!(fft_len = self.fft_len, count, "bulk forward transform");

        Ok(Spectra {
            data: buffer,
            fft_len: self.fft_len,
            count,
        })
    }

    /// Cross-correlation sequence from two spectra.
    ///
    /// Index `i` of the result holds lag `i - (len - 1)`, where lag `l` is
    /// `sum_t x[t + l] * y[t]`.
    pub fn correlate_spectra(&self, fx: &[Complex64], fy: &[Complex64]) -> Vec<f64> {
        let mut product: Vec<Complex64> = fx
            .iter()
            .zip(fy.iter())
            .map(|(a, b)| a * b.conj())
            .collect();
        self.inverse.process(&mut product);

        let scale = 1.0 / self.fft_len as f64;
        let negative = self.len.saturating_sub(1);
        let mut cc = Vec::with_capacity(self.lags());
        cc.extend(
            product[self.fft_len - negative..]
                .iter()
                .map(|c| c.re * scale),
        );
        cc.extend(product[..self.len].iter().map(|c| c.re * scale));
        cc
    }

    /// Cross-correlation sequence of two series.
    pub fn correlate(&self, x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
        let fx = self.spectrum(x)?;
        let fy = self.spectrum(y)?;
        Ok(self.correlate_spectra(&fx, &fy))
    }

    fn load(&self, chunk: &mut [Complex64], series: &[f64]) -> Result<()> {
        if series.len() > self.len {
            return Err(TsError::DimensionMismatch {
                expected: self.len,
                got: series.len(),
            });
        }
        for (c, &v) in chunk.iter_mut().zip(series.iter()) {
            *c = Complex64::new(v, 0.0);
        }
        Ok(())
    }
}

/// Spectra of a batch, one `fft_len` chunk per series.
#[derive(Debug, Clone)]
pub struct Spectra {
    data: Vec<Complex64>,
    fft_len: usize,
    count: usize,
}

impl Spectra {
    /// Spectrum of series `j`.
    ///
    /// # Panics
    /// Panics if `j >= count`.
    #[inline]
    pub fn column(&self, j: usize) -> &[Complex64] {
        let start = j * self.fft_len;
        &self.data[start..start + self.fft_len]
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }
}
