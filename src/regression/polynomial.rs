//! Polynomial fitting, evaluation and root finding.
//!
//! Coefficients are ordered from the highest power down to the constant
//! term, so `[a, b, c]` is `a x² + b x + c`.

use crate::core::Batch;
use crate::error::{Result, TsError};
use nalgebra::{DMatrix, DVector};
use rustfft::num_complex::Complex64;

/// Least-squares polynomial of the given degree through `(x, y)`.
///
/// Solved with an SVD of the column-scaled Vandermonde matrix. Needs more
/// points than `degree`.
///
/// # Example
///
/// ```
/// use tsbatch::regression::polyfit;
///
/// let x = vec![0.0, 1.0, 2.0, 3.0];
/// let y = vec![1.0, 2.0, 5.0, 10.0]; // x^2 + 1
/// let coeffs = polyfit(&x, &y, 2).unwrap();
/// assert!((coeffs[0] - 1.0).abs() < 1e-10);
/// assert!(coeffs[1].abs() < 1e-10);
/// assert!((coeffs[2] - 1.0).abs() < 1e-10);
/// ```
pub fn polyfit(x: &[f64], y: &[f64], degree: usize) -> Result<Vec<f64>> {
    if x.len() != y.len() {
        return Err(TsError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }
    let n = x.len();
    if n <= degree {
        return Err(TsError::InsufficientData {
            needed: degree + 1,
            got: n,
        });
    }

    let terms = degree + 1;
    let mut vandermonde = DMatrix::from_fn(n, terms, |i, k| x[i].powi((degree - k) as i32));

    // Column scaling keeps high powers from dominating the conditioning
    let scales: Vec<f64> = (0..terms)
        .map(|k| {
            let norm = vandermonde.column(k).norm();
            if norm > 0.0 {
                norm
            } else {
                1.0
            }
        })
        .collect();
    for (k, &s) in scales.iter().enumerate() {
        vandermonde.column_mut(k).unscale_mut(s);
    }

    let rhs = DVector::from_column_slice(y);
    let solution = vandermonde
        .svd(true, true)
        .solve(&rhs, 1e-14)
        .map_err(|e| TsError::ComputationError(format!("polyfit: {}", e)))?;

    Ok(solution
        .iter()
        .zip(scales.iter())
        .map(|(c, s)| c / s)
        .collect())
}

/// Fit one polynomial per series of `y`. `x` is either one series shared
/// by all of `y` or one series per series of `y`.
///
/// The result holds the coefficients of fit `j` as series `j`.
pub fn polyfit_batch(x: &Batch, y: &Batch, degree: usize) -> Result<Batch> {
    if x.count() == 0 || y.count() == 0 {
        return Err(TsError::EmptyData);
    }
    if x.count() != 1 && x.count() != y.count() {
        return Err(TsError::DimensionMismatch {
            expected: y.count(),
            got: x.count(),
        });
    }

    let fits = (0..y.count())
        .map(|j| {
            let xs = if x.count() == 1 { x.series(0) } else { x.series(j) };
            polyfit(xs, y.series(j), degree)
        })
        .collect::<Result<Vec<_>>>()?;
    Batch::from_series(&fits)
}

/// Evaluate a polynomial at `x` (Horner's scheme).
pub fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Roots of a polynomial, as eigenvalues of its companion matrix.
///
/// Leading zero coefficients are ignored; every trailing zero adds a root
/// at zero. A constant polynomial has no roots.
///
/// ```
/// use tsbatch::regression::roots;
///
/// // x^2 - 3x + 2 = (x - 1)(x - 2)
/// let mut r: Vec<f64> = roots(&[1.0, -3.0, 2.0]).unwrap().iter().map(|z| z.re).collect();
/// r.sort_by(|a, b| a.partial_cmp(b).unwrap());
/// assert!((r[0] - 1.0).abs() < 1e-10);
/// assert!((r[1] - 2.0).abs() < 1e-10);
/// ```
pub fn roots(coefficients: &[f64]) -> Result<Vec<Complex64>> {
    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(TsError::InvalidParameter(
            "polynomial coefficients must be finite".into(),
        ));
    }

    let start = coefficients
        .iter()
        .position(|&c| c != 0.0)
        .unwrap_or(coefficients.len());
    let end = coefficients
        .iter()
        .rposition(|&c| c != 0.0)
        .map_or(start, |i| i + 1);
    let trimmed = &coefficients[start..end];
    let zero_roots = coefficients.len() - end;

    let mut out = Vec::with_capacity(coefficients.len());
    if trimmed.len() > 1 {
        let degree = trimmed.len() - 1;
        let lead = trimmed[0];
        let companion = DMatrix::from_fn(degree, degree, |i, j| {
            if i == 0 {
                -trimmed[j + 1] / lead
            } else if i == j + 1 {
                1.0
            } else {
                0.0
            }
        });
        out.extend(companion.complex_eigenvalues().iter().copied());
    }
    out.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(zero_roots));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sorted_real_parts(roots: &[Complex64]) -> Vec<f64> {
        let mut r: Vec<f64> = roots.iter().map(|z| z.re).collect();
        r.sort_by(|a, b| a.partial_cmp(b).unwrap());
        r
    }

    // ==================== polyfit ====================

    #[test]
    fn polyfit_recovers_cubic() {
        let x: Vec<f64> = (0..10).map(|i| i as f64 * 0.5 - 2.0).collect();
        let y: Vec<f64> = x.iter().map(|&t| polyval(&[0.5, -1.0, 2.0, 3.0], t)).collect();
        let coeffs = polyfit(&x, &y, 3).unwrap();

        for (c, e) in coeffs.iter().zip([0.5, -1.0, 2.0, 3.0].iter()) {
            assert_relative_eq!(c, e, epsilon = 1e-9);
        }
    }

    #[test]
    fn polyfit_line_matches_least_squares() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let coeffs = polyfit(&x, &y, 1).unwrap();
        assert_relative_eq!(coeffs[0], 0.6, epsilon = 1e-12);
        assert_relative_eq!(coeffs[1], 2.2, epsilon = 1e-12);
    }

    #[test]
    fn polyfit_needs_enough_points() {
        assert_eq!(
            polyfit(&[1.0, 2.0], &[1.0, 2.0], 2).unwrap_err(),
            TsError::InsufficientData { needed: 3, got: 2 }
        );
        assert!(polyfit(&[1.0, 2.0], &[1.0], 1).is_err());
    }

    #[test]
    fn polyfit_batch_broadcasts_x() {
        let x = Batch::from_series(&[vec![0.0, 1.0, 2.0]]).unwrap();
        let y = Batch::from_series(&[vec![1.0, 3.0, 5.0], vec![0.0, -1.0, -2.0]]).unwrap();
        let fits = polyfit_batch(&x, &y, 1).unwrap();

        assert_eq!(fits.series_len(), 2);
        assert_eq!(fits.count(), 2);
        assert_relative_eq!(fits.series(0)[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(fits.series(1)[0], -1.0, epsilon = 1e-12);
    }

    // ==================== polyval ====================

    #[test]
    fn polyval_horner() {
        assert_eq!(polyval(&[2.0, -3.0, 1.0], 2.0), 3.0);
        assert_eq!(polyval(&[7.0], 10.0), 7.0);
        assert_eq!(polyval(&[], 1.0), 0.0);
    }

    // ==================== roots ====================

    #[test]
    fn roots_of_quadratic() {
        let r = roots(&[1.0, -3.0, 2.0]).unwrap();
        let re = sorted_real_parts(&r);
        assert_relative_eq!(re[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(re[1], 2.0, epsilon = 1e-10);
        assert!(r.iter().all(|z| z.im.abs() < 1e-10));
    }

    #[test]
    fn roots_complex_pair() {
        // x^2 + 1
        let r = roots(&[1.0, 0.0, 1.0]).unwrap();
        assert_eq!(r.len(), 2);
        for z in &r {
            assert_relative_eq!(z.re, 0.0, epsilon = 1e-10);
            assert_relative_eq!(z.im.abs(), 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn roots_strip_zeros() {
        // leading zeros are ignored, the trailing zero is a root: x (x - 1)(x + 1)
        let r = roots(&[0.0, 1.0, 0.0, -1.0, 0.0]).unwrap();
        assert_eq!(r.len(), 3);
        let re = sorted_real_parts(&r);
        assert_relative_eq!(re[0], -1.0, epsilon = 1e-10);
        assert_relative_eq!(re[1], 0.0, epsilon = 1e-10);
        assert_relative_eq!(re[2], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn roots_of_constant() {
        assert!(roots(&[5.0]).unwrap().is_empty());
        assert!(roots(&[0.0, 0.0]).unwrap().is_empty());
        assert!(roots(&[]).unwrap().is_empty());
        assert!(roots(&[1.0, f64::NAN]).is_err());
    }
}
