//! Preprocessing Example
//!
//! This example shows batch normalization, Savitzky-Golay smoothing,
//! regression and group-by aggregation.
//!
//! Run with: cargo run --example preprocessing

use tsbatch::aggregate::{group_by, Aggregation};
use tsbatch::core::{Batch, Precision};
use tsbatch::regression::{linear, polyfit, polyval, roots};
use tsbatch::transform::{
    decimal_scaling_norm, max_min_norm, mean_norm, savitzky_golay, znorm, ZNorm,
};

fn fmt(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{:.3}", v)).collect();
    format!("[{}]", parts.join(", "))
}

fn main() -> tsbatch::Result<()> {
    tracing_subscriber::fmt().init();

    println!("=== Preprocessing Example ===\n");

    let batch = Batch::from_series(&[
        vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0],
        vec![120.0, -45.0, 999.0, 10.0, 0.0, 3.5],
    ])?;

    // =========================================================================
    // Normalization
    // =========================================================================
    println!("--- Normalization ---\n");

    let z = znorm(&batch)?;
    let z_sample = ZNorm::new().ddof(1).apply(&batch)?;
    let unit = max_min_norm(&batch, 1.0, 0.0, None)?;
    let decimal = decimal_scaling_norm(&batch);
    let centered = mean_norm(&batch);

    for j in 0..batch.count() {
        println!("Series {}: {}", j, fmt(batch.series(j)));
        println!("  znorm (ddof 0): {}", fmt(z.series(j)));
        println!("  znorm (ddof 1): {}", fmt(z_sample.series(j)));
        println!("  max-min:        {}", fmt(unit.series(j)));
        println!("  decimal:        {}", fmt(decimal.series(j)));
        println!("  mean:           {}", fmt(centered.series(j)));
    }

    let single = Batch::from_f32_series(&[vec![1.0f32, 1.0, 1.0, 1.0]])?;
    assert_eq!(single.precision(), Precision::Single);
    println!("\nConstant f32 series normalizes to {}", fmt(znorm(&single)?.series(0)));

    // =========================================================================
    // Savitzky-Golay
    // =========================================================================
    println!("\n--- Savitzky-Golay ---\n");

    let noisy: Vec<f64> = (0..15)
        .map(|t| (t as f64 * 0.4).sin() + if t % 2 == 0 { 0.1 } else { -0.1 })
        .collect();
    println!("Noisy:      {}", fmt(&noisy));
    println!("Smoothed:   {}", fmt(&savitzky_golay(&noisy, 5, 2, 0)?));
    println!("Derivative: {}", fmt(&savitzky_golay(&noisy, 5, 2, 1)?));

    // =========================================================================
    // Regression
    // =========================================================================
    println!("\n--- Regression ---\n");

    let x = Batch::from_series(&[vec![1.0, 2.0, 3.0, 4.0, 5.0]])?;
    let y = Batch::from_series(&[vec![2.0, 4.0, 5.0, 4.0, 5.0], vec![1.0, 3.0, 5.0, 7.0, 9.5]])?;
    for (j, fit) in linear(&x, &y)?.iter().enumerate() {
        println!(
            "  y{}: slope = {:.4}, intercept = {:.4}, r = {:.4}, p = {:.4}, stderr = {:.4}",
            j, fit.slope, fit.intercept, fit.r_value, fit.p_value, fit.std_err
        );
    }

    let coeffs = polyfit(x.series(0), &[2.0, 5.0, 10.0, 17.0, 26.0], 2)?;
    println!("  polyfit degree 2: {}", fmt(&coeffs));
    println!("  p(6) = {:.4}", polyval(&coeffs, 6.0));
    for r in roots(&[1.0, -6.0, 11.0, -6.0])? {
        println!("  root of x^3 - 6x^2 + 11x - 6: {:.4}", r);
    }

    // =========================================================================
    // Group-by
    // =========================================================================
    println!("\n--- Group-by ---\n");

    let keys = ["a", "a", "b", "b", "b", "c"];
    for aggregation in [Aggregation::Sum, Aggregation::Mean, Aggregation::Max] {
        let grouped = group_by(&keys, &batch, aggregation)?;
        println!(
            "  {:?} over {:?}: {}",
            aggregation,
            grouped.keys,
            fmt(grouped.values.series(0))
        );
    }

    Ok(())
}
