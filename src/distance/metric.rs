//! Registry of distance metrics.

use super::dtw::dtw_distance;
use super::elementwise::{
    chebyshev_distance, euclidean_distance, manhattan_distance, minkowski_distance,
    squared_euclidean_distance,
};
use super::sbd::sbd;
use crate::error::{Result, TsError};
use std::fmt;

/// Distance metric between two series.
///
/// Each variant carries its own parameters. Dispatch is a plain `match`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Metric {
    /// Shape-based distance (z-normalized cross-correlation).
    #[default]
    Sbd,
    /// Euclidean (L2) distance.
    Euclidean,
    /// Sum of squared differences.
    SquaredEuclidean,
    /// Manhattan (L1) distance.
    Manhattan,
    /// Chebyshev (L-infinity) distance.
    Chebyshev,
    /// Minkowski distance of order `p` (`p >= 1`).
    Minkowski { p: f64 },
    /// Dynamic time warping with an optional Sakoe-Chiba band.
    Dtw { window: Option<usize> },
}

impl Metric {
    /// Look a metric up by name (case-insensitive).
    ///
    /// `param` is the Minkowski order or the DTW window. Minkowski without
    /// a parameter fails with [`TsError::MissingParameter`].
    ///
    /// ```
    /// use tsbatch::distance::Metric;
    ///
    /// assert_eq!(Metric::from_name("SBD", None).unwrap(), Metric::Sbd);
    /// assert_eq!(
    ///     Metric::from_name("minkowski", Some(3.0)).unwrap(),
    ///     Metric::Minkowski { p: 3.0 }
    /// );
    /// assert!(Metric::from_name("minkowski", None).is_err());
    /// ```
    pub fn from_name(name: &str, param: Option<f64>) -> Result<Self> {
        let metric = match name.to_ascii_lowercase().as_str() {
            "sbd" => Metric::Sbd,
            "euclidean" => Metric::Euclidean,
            "squared_euclidean" => Metric::SquaredEuclidean,
            "manhattan" => Metric::Manhattan,
            "chebyshev" => Metric::Chebyshev,
            "minkowski" => {
                let p = param.ok_or(TsError::MissingParameter {
                    metric: "minkowski",
                    parameter: "p",
                })?;
                Metric::Minkowski { p }
            }
            "dtw" => {
                let window = match param {
                    None => None,
                    Some(w) if w.is_finite() && w >= 0.0 && w.fract() == 0.0 => {
                        Some(w as usize)
                    }
                    Some(w) => {
                        return Err(TsError::InvalidParameter(format!(
                            "dtw window must be a non-negative integer, got {}",
                            w
                        )))
                    }
                };
                Metric::Dtw { window }
            }
            _ => return Err(TsError::UnknownMetric(name.to_string())),
        };
        metric.validate()?;
        Ok(metric)
    }

    /// Minkowski metric of order `p`, validated.
    pub fn minkowski(p: f64) -> Result<Self> {
        let metric = Metric::Minkowski { p };
        metric.validate()?;
        Ok(metric)
    }

    /// Registry name.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Sbd => "sbd",
            Metric::Euclidean => "euclidean",
            Metric::SquaredEuclidean => "squared_euclidean",
            Metric::Manhattan => "manhattan",
            Metric::Chebyshev => "chebyshev",
            Metric::Minkowski { .. } => "minkowski",
            Metric::Dtw { .. } => "dtw",
        }
    }

    /// Whether both series must have the same length.
    pub fn requires_equal_length(&self) -> bool {
        !matches!(self, Metric::Sbd | Metric::Dtw { .. })
    }

    /// Whether `d(x, y) == d(y, x)`.
    pub fn is_symmetric(&self) -> bool {
        true
    }

    /// Check the metric's parameters.
    pub fn validate(&self) -> Result<()> {
        if let Metric::Minkowski { p } = *self {
            if !p.is_finite() || p < 1.0 {
                return Err(TsError::InvalidParameter(format!(
                    "minkowski order must be finite and >= 1, got {}",
                    p
                )));
            }
        }
        Ok(())
    }

    /// Distance between two series.
    pub fn distance(&self, x: &[f64], y: &[f64]) -> Result<f64> {
        if x.is_empty() || y.is_empty() {
            return Err(TsError::EmptyData);
        }
        if self.requires_equal_length() && x.len() != y.len() {
            return Err(TsError::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }
        self.validate()?;
        match self {
            Metric::Sbd => Ok(sbd(x, y)?.distance),
            other => Ok(other.eval(x, y)),
        }
    }

    /// Distance for non-empty inputs that already passed validation.
    pub(crate) fn eval(&self, x: &[f64], y: &[f64]) -> f64 {
        match *self {
            Metric::Sbd => sbd(x, y).map_or(f64::NAN, |r| r.distance),
            Metric::Euclidean => euclidean_distance(x, y),
            Metric::SquaredEuclidean => squared_euclidean_distance(x, y),
            Metric::Manhattan => manhattan_distance(x, y),
            Metric::Chebyshev => chebyshev_distance(x, y),
            Metric::Minkowski { p } => minkowski_distance(x, y, p),
            Metric::Dtw { window } => dtw_distance(x, y, window),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Minkowski { p } => write!(f, "minkowski(p={})", p),
            Metric::Dtw { window: Some(w) } => write!(f, "dtw(window={})", w),
            other => f.write_str(other.name()),
        }
    }
}
