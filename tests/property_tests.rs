//! Property-based tests for shape-based distance and k-Shape.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated series.

use proptest::prelude::*;
use tsbatch::clustering::{calibrate, classify, KShapeConfig};
use tsbatch::core::{Batch, ComputeContext};
use tsbatch::distance::{compute, sbd, Metric};

/// Strategy for a single non-constant series.
fn series_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        prop::collection::vec(-100.0..100.0_f64, len).prop_map(|mut v| {
            // Add a ramp so that no series is constant
            for (i, val) in v.iter_mut().enumerate() {
                *val += i as f64 * 0.01;
            }
            v
        })
    })
}

/// Strategy for two series of the same length.
fn pair_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (min_len..max_len).prop_flat_map(|len| {
        (
            prop::collection::vec(-100.0..100.0_f64, len),
            prop::collection::vec(-100.0..100.0_f64, len),
        )
    })
}

/// Strategy for a batch of `2..8` series sharing a length.
fn batch_strategy() -> impl Strategy<Value = Batch> {
    (2usize..8, 4usize..16).prop_flat_map(|(count, len)| {
        prop::collection::vec(prop::collection::vec(-10.0..10.0_f64, len), count)
            .prop_map(|series| Batch::from_series(&series).unwrap())
    })
}

// =============================================================================
// Property: shape-based distance
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn sbd_self_distance_is_zero(x in series_strategy(2, 64)) {
        let result = sbd(&x, &x).unwrap();
        prop_assert!(result.distance.abs() < 1e-9, "self distance {}", result.distance);
    }

    #[test]
    fn sbd_is_symmetric((x, y) in pair_strategy(8, 64)) {
        let xy = sbd(&x, &y).unwrap();
        let yx = sbd(&y, &x).unwrap();
        prop_assert!((xy.distance - yx.distance).abs() < 1e-9);
        prop_assert_eq!(xy.shift, -yx.shift);
    }

    #[test]
    fn sbd_is_bounded((x, y) in pair_strategy(1, 64)) {
        let d = sbd(&x, &y).unwrap().distance;
        prop_assert!((0.0..=2.0).contains(&d), "distance {} out of range", d);
    }

    #[test]
    fn sbd_ignores_affine_rescaling(
        (x, y) in pair_strategy(2, 64),
        scale in 0.01..100.0_f64,
        offset in -1000.0..1000.0_f64
    ) {
        let rescaled: Vec<f64> = y.iter().map(|v| scale * v + offset).collect();
        let base = sbd(&x, &y).unwrap().distance;
        let moved = sbd(&x, &rescaled).unwrap().distance;
        prop_assert!((base - moved).abs() < 1e-7, "{} vs {}", base, moved);
    }

    #[test]
    fn sbd_matrix_is_symmetric_with_zero_diagonal(batch in batch_strategy()) {
        let ctx = ComputeContext::new();
        let m = compute(&ctx, &Metric::Sbd, &batch, None).unwrap();
        prop_assert!(m.is_symmetric(0.0));
        for i in 0..batch.count() {
            prop_assert_eq!(m[(i, i)], 0.0);
        }
    }
}

// =============================================================================
// Property: k-Shape output shape and entry-point consistency
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn calibrate_returns_k_centroids_and_all_labels(
        batch in batch_strategy(),
        k_seed in 0usize..8,
        seed in any::<u64>()
    ) {
        let ctx = ComputeContext::new();
        let k = 1 + k_seed % batch.count();
        let config = KShapeConfig::default().k(k).max_iter(20).seed(seed);
        let result = calibrate(&ctx, &batch, &config).unwrap();

        prop_assert_eq!(result.labels.len(), batch.count());
        prop_assert!(result.labels.iter().all(|&l| l < k));
        prop_assert_eq!(result.centroids.count(), k);
        prop_assert_eq!(result.centroids.series_len(), batch.series_len());
        prop_assert!(result.n_iter >= 1 && result.n_iter <= 20);
    }

    #[test]
    fn classify_reproduces_calibrated_labels(
        batch in batch_strategy(),
        seed in any::<u64>()
    ) {
        let ctx = ComputeContext::new();
        let config = KShapeConfig::default().k(2).max_iter(20).seed(seed);
        let result = calibrate(&ctx, &batch, &config).unwrap();

        let labels = classify(&ctx, &batch, &result.centroids).unwrap();
        prop_assert_eq!(labels, result.labels);
    }

    #[test]
    fn calibrate_result_is_a_fixed_point(
        batch in batch_strategy(),
        k_seed in 0usize..2,
        seed in any::<u64>()
    ) {
        let ctx = ComputeContext::new();
        let k = 2 + k_seed;
        prop_assume!(k <= batch.count());

        let first = calibrate(&ctx, &batch, &KShapeConfig::default().k(k).max_iter(20).seed(seed))
            .unwrap();
        prop_assume!(first.cluster_sizes().iter().all(|&s| s > 0));

        let config = KShapeConfig::default()
            .k(k)
            .initial_labels(first.labels.clone())
            .initial_centroids(first.centroids.clone());
        let again = calibrate(&ctx, &batch, &config).unwrap();

        prop_assert!(again.converged());
        prop_assert_eq!(again.n_iter, 1);
        prop_assert_eq!(again.reseeds, 0);
        prop_assert_eq!(again.labels, first.labels);
    }
}
