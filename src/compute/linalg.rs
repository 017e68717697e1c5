//! Dense linear algebra primitives backed by nalgebra.

use crate::error::{Result, TsError};
use nalgebra::{DMatrix, DVector, SymmetricEigen};

/// Eigenvalues and eigenvectors of a symmetric matrix.
///
/// Column `i` of `vectors` belongs to `values[i]`. No ordering of the
/// eigenvalues is guaranteed.
#[derive(Debug, Clone)]
pub struct Eigen {
    pub values: DVector<f64>,
    pub vectors: DMatrix<f64>,
}

/// Eigendecomposition of a real symmetric matrix.
pub fn symmetric_eigendecomposition(matrix: DMatrix<f64>) -> Result<Eigen> {
    let (nrows, ncols) = matrix.shape();
    if nrows != ncols {
        return Err(TsError::DimensionMismatch {
            expected: nrows,
            got: ncols,
        });
    }
    if nrows == 0 {
        return Err(TsError::EmptyData);
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(TsError::ComputationError(
            "eigendecomposition input contains non-finite values".into(),
        ));
    }

    // max_niter = 0 iterates until convergence
    let eigen = SymmetricEigen::try_new(matrix, f64::EPSILON, 0).ok_or_else(|| {
        TsError::ComputationError("symmetric eigendecomposition did not converge".into())
    })?;

    Ok(Eigen {
        values: eigen.eigenvalues,
        vectors: eigen.eigenvectors,
    })
}

/// Eigenvector belonging to the largest eigenvalue, with that eigenvalue.
///
/// The maximum is searched explicitly rather than read from a fixed position.
pub fn leading_eigenvector(matrix: DMatrix<f64>) -> Result<(f64, DVector<f64>)> {
    let eigen = symmetric_eigendecomposition(matrix)?;

    let mut best = 0;
    for (i, &value) in eigen.values.iter().enumerate() {
        if value > eigen.values[best] {
            best = i;
        }
    }

    Ok((eigen.values[best], eigen.vectors.column(best).into_owned()))
}

/// Centering projection `I - J / n`, where `J` is the all-ones matrix.
pub fn centering_matrix(n: usize) -> DMatrix<f64> {
    let off = if n == 0 { 0.0 } else { 1.0 / n as f64 };
    DMatrix::from_fn(n, n, |i, j| if i == j { 1.0 - off } else { -off })
}
