//! k-Shape Clustering Example
//!
//! This example clusters time series by shape with k-Shape, then scores new
//! series against the calibrated centroids.
//!
//! Run with: cargo run --example kshape_clustering

use std::f64::consts::PI;
use tsbatch::clustering::{calibrate, classify, extract_shape, KShapeConfig};
use tsbatch::core::{Batch, ComputeContext};
use tsbatch::distance::sbd;

fn wave(len: usize, cycles: f64, phase: f64, amplitude: f64, offset: f64) -> Vec<f64> {
    (0..len)
        .map(|t| offset + amplitude * (2.0 * PI * cycles * t as f64 / len as f64 + phase).sin())
        .collect()
}

fn main() -> tsbatch::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== k-Shape Clustering Example ===\n");

    let ctx = ComputeContext::new();
    println!("Compute context: {}\n", ctx.info());

    // =========================================================================
    // Data: three shapes at different phases, amplitudes and offsets
    // =========================================================================
    let len = 32;
    let series = vec![
        wave(len, 1.0, 0.0, 1.0, 0.0),
        wave(len, 1.0, 0.8, 5.0, 10.0),
        wave(len, 1.0, 1.6, 0.5, -3.0),
        wave(len, 3.0, 0.0, 2.0, 0.0),
        wave(len, 3.0, 0.5, 1.0, 4.0),
        wave(len, 3.0, 1.0, 8.0, 1.0),
        wave(len, 5.0, 0.0, 1.0, 0.0),
        wave(len, 5.0, 0.3, 3.0, -2.0),
        wave(len, 5.0, 0.9, 1.5, 7.0),
    ];
    let data = Batch::from_series(&series)?;
    println!("{} series of length {}\n", data.count(), data.series_len());

    // =========================================================================
    // Calibrate
    // =========================================================================
    println!("--- Calibrate (k = 3) ---\n");

    let config = KShapeConfig::default().k(3).max_iter(50).seed(42);
    let result = calibrate(&ctx, &data, &config)?;

    println!("Status:      {:?}", result.status);
    println!("Iterations:  {}", result.n_iter);
    println!("Reseeds:     {}", result.reseeds);
    println!("Labels:      {:?}", result.labels);
    println!("Sizes:       {:?}", result.cluster_sizes());
    for c in 0..3 {
        println!("  cluster {}: {:?}", c, result.cluster_members(c));
    }

    // =========================================================================
    // Distance of every series to its centroid
    // =========================================================================
    println!("\n--- Member distances ---\n");
    for (i, s) in data.iter().enumerate() {
        let centroid = result.centroids.series(result.labels[i]);
        let d = sbd(centroid, s)?;
        println!(
            "  series {} -> cluster {}: sbd = {:.4}, shift = {}",
            i, result.labels[i], d.distance, d.shift
        );
    }

    // =========================================================================
    // Classify new data
    // =========================================================================
    println!("\n--- Classify ---\n");
    let fresh = Batch::from_series(&[
        wave(len, 1.0, 2.5, 4.0, 1.0),
        wave(len, 5.0, 1.2, 0.2, 0.0),
        wave(len, 3.0, 2.0, 1.0, -1.0),
    ])?;
    let labels = classify(&ctx, &fresh, &result.centroids)?;
    println!("New series labels: {:?}", labels);

    // =========================================================================
    // Shape extraction on its own
    // =========================================================================
    println!("\n--- Shape extraction ---\n");
    let members = data.select(&result.cluster_members(result.labels[0]));
    let centroid = extract_shape(&ctx, &members, None)?;
    let preview: Vec<String> = centroid.iter().take(8).map(|v| format!("{:.3}", v)).collect();
    println!("Centroid of series 0's cluster (first 8): [{}]", preview.join(", "));

    Ok(())
}
