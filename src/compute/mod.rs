//! Array-compute primitives.
//!
//! Bulk FFT cross-correlation (rustfft), symmetric eigendecomposition
//! (nalgebra) and backend-dispatched data parallelism (rayon). Higher level
//! modules orchestrate these primitives and never implement their own
//! transforms or solvers.

pub mod fft;
pub mod linalg;
pub mod parallel;

pub use fft::{fft_size, CrossCorrelator, Spectra};
pub use linalg::{centering_matrix, leading_eigenvector, symmetric_eigendecomposition, Eigen};
pub use parallel::{map_indices, try_map_indices};
