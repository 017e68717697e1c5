//! Simple linear regression with inference statistics.

use crate::core::Batch;
use crate::error::{Result, TsError};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Least-squares line `y = slope * x + intercept` with fit statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient.
    pub r_value: f64,
    /// Two-sided p-value of the null hypothesis `slope == 0`
    /// (t-test with `n - 2` degrees of freedom).
    pub p_value: f64,
    /// Standard error of the slope.
    pub std_err: f64,
}

/// Fit one line per series of `y`.
///
/// `x` holds either a single series, shared by every series of `y`, or
/// one series per series of `y`. At least three points are required.
///
/// # Example
///
/// ```
/// use tsbatch::core::Batch;
/// use tsbatch::regression::linear;
///
/// let x = Batch::from_series(&[vec![1.0, 2.0, 3.0, 4.0, 5.0]]).unwrap();
/// let y = Batch::from_series(&[vec![2.0, 4.0, 5.0, 4.0, 5.0]]).unwrap();
/// let fit = linear(&x, &y).unwrap()[0];
/// assert!((fit.slope - 0.6).abs() < 1e-12);
/// assert!((fit.intercept - 2.2).abs() < 1e-12);
/// ```
pub fn linear(x: &Batch, y: &Batch) -> Result<Vec<LinearFit>> {
    if x.count() == 0 || y.count() == 0 {
        return Err(TsError::EmptyData);
    }
    if x.count() != 1 && x.count() != y.count() {
        return Err(TsError::DimensionMismatch {
            expected: y.count(),
            got: x.count(),
        });
    }
    if x.series_len() != y.series_len() {
        return Err(TsError::DimensionMismatch {
            expected: y.series_len(),
            got: x.series_len(),
        });
    }

    (0..y.count())
        .map(|j| {
            let xs = if x.count() == 1 { x.series(0) } else { x.series(j) };
            linear_fit(xs, y.series(j))
        })
        .collect()
}

/// Fit a line to a single pair of series.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    if x.len() != y.len() {
        return Err(TsError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }
    let n = x.len();
    if n < 3 {
        return Err(TsError::InsufficientData { needed: 3, got: n });
    }

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if x.iter().all(|&v| v == x[0]) {
        return Err(TsError::InvalidParameter(
            "regressor is constant, slope is undefined".into(),
        ));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r_value = if syy == 0.0 {
        0.0
    } else {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    };

    let df = nf - 2.0;
    let (p_value, std_err) = if 1.0 - r_value.abs() < 1e-12 {
        (0.0, 0.0)
    } else {
        let t = r_value * (df / ((1.0 - r_value) * (1.0 + r_value))).sqrt();
        let dist = StudentsT::new(0.0, 1.0, df)
            .map_err(|e| TsError::ComputationError(format!("t distribution: {}", e)))?;
        let p = 2.0 * (1.0 - dist.cdf(t.abs()));
        let se = ((1.0 - r_value * r_value) * syy / sxx / df).sqrt();
        (p, se)
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_value,
        p_value,
        std_err,
    })
}
