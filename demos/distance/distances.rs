//! Distance Metrics Example
//!
//! This example compares shape-based distance with lock-step and elastic
//! metrics, and computes batch distance matrices.
//!
//! Run with: cargo run --example distances

use tsbatch::core::{Batch, ComputeContext};
use tsbatch::distance::{compute, dtw_distance, euclidean_distance, sbd, shift_zero_fill, Metric};

fn main() -> tsbatch::Result<()> {
    tracing_subscriber::fmt().init();

    println!("=== Distance Metrics Example ===\n");

    // =========================================================================
    // Shape-based distance
    // =========================================================================
    println!("--- Shape-Based Distance (SBD) ---\n");

    let pulse = vec![0.0, 0.0, 1.0, 4.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let shifted = vec![0.0, 0.0, 0.0, 0.0, 0.0, 10.0, 40.0, 10.0, 0.0, 0.0];

    println!("Pulse:   {:?}", pulse);
    println!("Shifted: {:?} (moved right, scaled by 10)", shifted);

    let result = sbd(&pulse, &shifted)?;
    println!(
        "\nsbd = {:.4}, shift = {} (SBD ignores scale and finds the lag)",
        result.distance, result.shift
    );
    println!("Aligned: {:?}", shift_zero_fill(&shifted, result.shift));
    println!(
        "euclidean = {:.4}, dtw = {:.4}",
        euclidean_distance(&pulse, &shifted),
        dtw_distance(&pulse, &shifted, None)
    );

    // =========================================================================
    // Metric registry
    // =========================================================================
    println!("\n--- Metric registry ---\n");

    for (name, param) in [
        ("sbd", None),
        ("euclidean", None),
        ("minkowski", Some(3.0)),
        ("dtw", Some(2.0)),
        ("minkowski", None),
        ("cosine", None),
    ] {
        match Metric::from_name(name, param) {
            Ok(metric) => println!(
                "  {:<12} -> {} (equal length: {})",
                name,
                metric,
                metric.requires_equal_length()
            ),
            Err(e) => println!("  {:<12} -> error: {}", name, e),
        }
    }

    // =========================================================================
    // Distance matrices
    // =========================================================================
    println!("\n--- Distance matrices ---\n");

    let ctx = ComputeContext::new();
    let batch = Batch::from_series(&[
        vec![0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0],
        vec![1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0],
        vec![0.0, 0.0, 0.0, 3.0, 3.0, 3.0, 0.0, 0.0],
    ])?;

    for metric in [Metric::Sbd, Metric::Euclidean, Metric::Dtw { window: None }] {
        let m = compute(&ctx, &metric, &batch, None)?;
        println!("{}:", metric);
        for i in 0..m.nrows() {
            let row: Vec<String> = m.row(i).iter().map(|d| format!("{:7.4}", d)).collect();
            println!("  [{}]", row.join(", "));
        }
    }

    Ok(())
}
