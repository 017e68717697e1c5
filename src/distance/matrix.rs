//! Dense distance matrix.

use crate::compute::map_indices;
use crate::core::ComputeContext;
use nalgebra::DMatrix;
use std::ops::Index;

/// Distances between the series of two batches, row-major.
///
/// Entry `(i, j)` is the distance from series `i` of the first batch to
/// series `j` of the second. A matrix computed within one batch is square,
/// symmetric and has a zero diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    nrows: usize,
    ncols: usize,
}

impl DistanceMatrix {
    /// Create a zero-filled matrix.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![0.0; nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Evaluate `f(i, j)` for every entry, rows in parallel per the context.
    pub(crate) fn build<F>(ctx: &ComputeContext, nrows: usize, ncols: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> f64 + Sync + Send,
    {
        let rows = map_indices(ctx, nrows, |i| (0..ncols).map(|j| f(i, j)).collect::<Vec<_>>());
        Self {
            data: rows.into_iter().flatten().collect(),
            nrows,
            ncols,
        }
    }

    /// Evaluate `f(i, j)` once per unordered pair `i < j` and mirror it.
    /// The diagonal is zero.
    pub(crate) fn build_symmetric<F>(ctx: &ComputeContext, n: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> f64 + Sync + Send,
    {
        let upper = map_indices(ctx, n, |i| ((i + 1)..n).map(|j| f(i, j)).collect::<Vec<_>>());
        let mut matrix = Self::zeros(n, n);
        for (i, row) in upper.into_iter().enumerate() {
            for (offset, d) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                matrix.data[i * n + j] = d;
                matrix.data[j * n + i] = d;
            }
        }
        matrix
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Dimensions as `(nrows, ncols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Entry at `(i, j)` with bounds checking.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.nrows && j < self.ncols {
            Some(self.data[i * self.ncols + j])
        } else {
            None
        }
    }

    /// Distances from series `i` of the first batch.
    ///
    /// # Panics
    /// Panics if `i >= nrows`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    /// Flat row-major data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Whether the matrix is square and symmetric within `tol`.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        self.nrows == self.ncols
            && (0..self.nrows).all(|i| {
                (0..i).all(|j| (self.data[i * self.ncols + j] - self.data[j * self.ncols + i]).abs() <= tol)
            })
    }

    /// Copy into a nalgebra matrix.
    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.nrows, self.ncols, &self.data)
    }
}

impl Index<(usize, usize)> for DistanceMatrix {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.ncols + j]
    }
}
