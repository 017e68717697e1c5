//! Regression: linear fits with inference statistics and polynomials.

pub mod linear;
pub mod polynomial;

pub use linear::{linear, linear_fit, LinearFit};
pub use polynomial::{polyfit, polyfit_batch, polyval, roots};
