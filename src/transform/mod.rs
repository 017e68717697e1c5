//! Batch transformations for time series.
//!
//! Provides z-normalization, min-max, decimal scaling and mean
//! normalization, plus Savitzky-Golay filtering.
//!
//! # Example
//!
//! ```
//! use tsbatch::core::Batch;
//! use tsbatch::transform::{max_min_norm, savitzky_golay_batch, znorm, ZNorm};
//!
//! let batch = Batch::from_series(&[
//!     vec![1.0, 2.0, 3.0, 4.0, 5.0],
//!     vec![2.0, 4.0, 6.0, 8.0, 10.0],
//! ])
//! .unwrap();
//!
//! // Zero mean, unit (population) standard deviation per series
//! let z = znorm(&batch).unwrap();
//!
//! // Sample standard deviation instead
//! let z_sample = ZNorm::new().ddof(1).apply(&batch).unwrap();
//!
//! // Rescale into [0, 1]
//! let unit = max_min_norm(&batch, 1.0, 0.0, None).unwrap();
//!
//! // Smooth with a 3-point linear Savitzky-Golay filter
//! let smooth = savitzky_golay_batch(&batch, 3, 1, 0).unwrap();
//! ```

pub mod filter;
pub mod normalize;

pub use filter::{savitzky_golay, savitzky_golay_batch};
pub use normalize::{decimal_scaling_norm, max_min_norm, mean_norm, znorm, ZNorm};
