//! # tsbatch
//!
//! Batch-oriented time series analytics.
//!
//! Series are processed in batches of equal-length series stored column-major
//! ([`core::Batch`]). The centerpiece is shape-based clustering with k-Shape:
//! the shape-based distance (SBD) computed through FFT cross-correlation, and
//! centroid extraction as a leading-eigenvector problem. Around it sit
//! normalization and filtering, a registry of distance metrics, linear and
//! polynomial regression, and group-by aggregation.
//!
//! All batch work takes a [`core::ComputeContext`] that selects the parallel
//! or sequential backend and an optional memory budget.
//!
//! # Example
//!
//! ```
//! use tsbatch::prelude::*;
//!
//! let ctx = ComputeContext::new();
//! let data = Batch::from_series(&[
//!     vec![0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0],
//!     vec![0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0],
//!     vec![1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0],
//!     vec![0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
//! ])
//! .unwrap();
//!
//! let result = calibrate(&ctx, &data, &KShapeConfig::default().k(2).seed(1)).unwrap();
//! assert_eq!(result.labels.len(), 4);
//! ```

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::needless_range_loop)]

pub mod aggregate;
pub mod clustering;
pub mod compute;
pub mod core;
pub mod distance;
pub mod error;
pub mod regression;
pub mod transform;

pub use clustering::{calibrate, classify};
pub use error::{Result, TsError};

pub mod prelude {
    pub use crate::clustering::{
        calibrate, classify, extract_shape, KShapeConfig, KShapeResult, KShapeStatus,
    };
    pub use crate::core::{Backend, Batch, ComputeContext, Precision};
    pub use crate::distance::{compute, sbd, DistanceMatrix, Metric, ShapeDistance};
    pub use crate::error::{Result, TsError};
    pub use crate::transform::{znorm, ZNorm};
}
