//! Batch data structure holding many equal-length series.

use crate::error::{Result, TsError};
use nalgebra::DMatrix;
use std::ops::Index;

/// Floating point precision the series were supplied in.
///
/// Values are always stored as `f64`; the precision only decides which
/// machine epsilon guards divisions in normalization and distance code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// 32-bit input.
    Single,
    /// 64-bit input.
    #[default]
    Double,
}

impl Precision {
    /// Machine epsilon of the input type.
    pub fn epsilon(self) -> f64 {
        match self {
            Precision::Single => f32::EPSILON as f64,
            Precision::Double => f64::EPSILON,
        }
    }
}

/// Layout of nested input vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueLayout {
    /// Each inner vector is one series.
    #[default]
    Column,
    /// Each inner vector is one time step across all series.
    Row,
}

/// A batch of `count` real-valued series sharing the same length.
///
/// Stored column-major (length × count): series `j` occupies the
/// contiguous range `j * series_len .. (j + 1) * series_len`.
///
/// # Examples
///
/// ```
/// use tsbatch::core::Batch;
///
/// let batch = Batch::from_series(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
/// assert_eq!(batch.series_len(), 3);
/// assert_eq!(batch.count(), 2);
/// assert_eq!(batch.series(1), &[4.0, 5.0, 6.0]);
/// assert_eq!(batch[(2, 0)], 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    data: Vec<f64>,
    series_len: usize,
    count: usize,
    precision: Precision,
}

impl Batch {
    /// Create from flat column-major data.
    pub fn from_column_major(data: Vec<f64>, series_len: usize, count: usize) -> Result<Self> {
        if data.len() != series_len * count {
            return Err(TsError::DimensionMismatch {
                expected: series_len * count,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            series_len,
            count,
            precision: Precision::Double,
        })
    }

    /// Create from one vector per series. All series must share a length.
    pub fn from_series(series: &[Vec<f64>]) -> Result<Self> {
        let series_len = series.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(series_len * series.len());
        for s in series {
            if s.len() != series_len {
                return Err(TsError::DimensionMismatch {
                    expected: series_len,
                    got: s.len(),
                });
            }
            data.extend_from_slice(s);
        }
        Self::from_column_major(data, series_len, series.len())
    }

    /// Create from single precision series.
    pub fn from_f32_series(series: &[Vec<f32>]) -> Result<Self> {
        let widened: Vec<Vec<f64>> = series
            .iter()
            .map(|s| s.iter().map(|&x| x as f64).collect())
            .collect();
        Ok(Self::from_series(&widened)?.with_precision(Precision::Single))
    }

    /// Create from nested vectors in the given layout.
    pub fn from_nested(values: &[Vec<f64>], layout: ValueLayout) -> Result<Self> {
        match layout {
            ValueLayout::Column => Self::from_series(values),
            ValueLayout::Row => {
                let count = values.first().map_or(0, Vec::len);
                let mut series = vec![Vec::with_capacity(values.len()); count];
                for row in values {
                    if row.len() != count {
                        return Err(TsError::DimensionMismatch {
                            expected: count,
                            got: row.len(),
                        });
                    }
                    for (j, &v) in row.iter().enumerate() {
                        series[j].push(v);
                    }
                }
                Self::from_series(&series)
            }
        }
    }

    /// Create a zero-filled batch.
    pub fn zeros(series_len: usize, count: usize) -> Self {
        Self {
            data: vec![0.0; series_len * count],
            series_len,
            count,
            precision: Precision::Double,
        }
    }

    /// Tag the batch with the precision of its source data.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Length shared by every series.
    #[inline]
    pub fn series_len(&self) -> usize {
        self.series_len
    }

    /// Number of series.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the batch holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Contiguous slice of series `j`.
    ///
    /// # Panics
    /// Panics if `j >= count`.
    #[inline]
    pub fn series(&self, j: usize) -> &[f64] {
        let start = j * self.series_len;
        &self.data[start..start + self.series_len]
    }

    /// Mutable slice of series `j`.
    ///
    /// # Panics
    /// Panics if `j >= count`.
    #[inline]
    pub fn series_mut(&mut self, j: usize) -> &mut [f64] {
        let start = j * self.series_len;
        &mut self.data[start..start + self.series_len]
    }

    /// Iterate over the series in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        (0..self.count).map(move |j| self.series(j))
    }

    /// Copy the series out as owned vectors.
    pub fn to_series(&self) -> Vec<Vec<f64>> {
        self.iter().map(<[f64]>::to_vec).collect()
    }

    /// Flat column-major data.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume and return the column-major data.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// New batch holding the series at `indices`, in that order.
    ///
    /// # Panics
    /// Panics if an index is out of range.
    pub fn select(&self, indices: &[usize]) -> Batch {
        let mut data = Vec::with_capacity(indices.len() * self.series_len);
        for &j in indices {
            data.extend_from_slice(self.series(j));
        }
        Batch {
            data,
            series_len: self.series_len,
            count: indices.len(),
            precision: self.precision,
        }
    }

    /// Apply `f` to every series, producing a batch of the same shape.
    pub fn map_series<F>(&self, mut f: F) -> Batch
    where
        F: FnMut(&[f64]) -> Vec<f64>,
    {
        let mut data = Vec::with_capacity(self.data.len());
        for s in self.iter() {
            data.extend(f(s));
        }
        Batch {
            data,
            series_len: self.series_len,
            count: self.count,
            precision: self.precision,
        }
    }

    /// Copy into a nalgebra matrix with one column per series.
    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_column_slice(self.series_len, self.count, &self.data)
    }

    /// Create from a nalgebra matrix, one series per column.
    pub fn from_dmatrix(mat: &DMatrix<f64>) -> Self {
        let (series_len, count) = mat.shape();
        Self {
            data: mat.as_slice().to_vec(),
            series_len,
            count,
            precision: Precision::Double,
        }
    }
}

impl Index<(usize, usize)> for Batch {
    type Output = f64;

    /// Element at time step `t` of series `j`.
    #[inline]
    fn index(&self, (t, j): (usize, usize)) -> &f64 {
        &self.data[t + j * self.series_len]
    }
}
