//! Shape-based time series clustering.
//!
//! Provides k-Shape ([`calibrate`], [`classify`]) and its centroid update,
//! [`extract_shape`].
//!
//! # Example
//!
//! ```
//! use tsbatch::clustering::{calibrate, KShapeConfig};
//! use tsbatch::core::{Batch, ComputeContext};
//!
//! let ctx = ComputeContext::new();
//! let series: Vec<Vec<f64>> = (0..4)
//!     .map(|i| {
//!         let cycles = if i % 2 == 0 { 1.0 } else { 3.0 };
//!         (0..16)
//!             .map(|t| (2.0 * std::f64::consts::PI * cycles * (t + i) as f64 / 16.0).sin())
//!             .collect()
//!     })
//!     .collect();
//! let data = Batch::from_series(&series).unwrap();
//!
//! let config = KShapeConfig::default().k(2).seed(42);
//! let result = calibrate(&ctx, &data, &config).unwrap();
//! assert_eq!(result.labels.len(), 4);
//! assert_eq!(result.centroids.count(), 2);
//! ```

pub mod kshape;
pub mod shape;

pub use kshape::{calibrate, classify, KShapeConfig, KShapeResult, KShapeStatus};
pub use shape::extract_shape;
