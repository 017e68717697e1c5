//! Dynamic Time Warping (DTW) distance for time series.
//!
//! DTW allows elastic alignment between series, so it also accepts series
//! of different lengths.

/// Compute the DTW distance between two series with absolute-difference cost.
///
/// # Arguments
/// * `a` - First series
/// * `b` - Second series
/// * `window` - Optional Sakoe-Chiba band; widened to at least `|len(a) - len(b)|`
///
/// # Returns
/// DTW distance (lower is more similar), `f64::INFINITY` if either is empty.
pub fn dtw_distance(a: &[f64], b: &[f64], window: Option<usize>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return f64::INFINITY;
    }

    let n = a.len();
    let m = b.len();
    let window = window.map_or(n.max(m), |w| w.max(n.abs_diff(m)));

    // Two rolling rows of the (n + 1) x (m + 1) cost matrix
    let mut prev = vec![f64::INFINITY; m + 1];
    let mut curr = vec![f64::INFINITY; m + 1];
    prev[0] = 0.0;

    for i in 1..=n {
        curr.fill(f64::INFINITY);
        let j_start = 1.max(i.saturating_sub(window));
        let j_end = m.min(i + window);

        for j in j_start..=j_end {
            let cost = (a[i - 1] - b[j - 1]).abs();
            curr[j] = cost + prev[j].min(curr[j - 1]).min(prev[j - 1]);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::euclidean_distance;
    use approx::assert_relative_eq;

    #[test]
    fn dtw_identical_series() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(dtw_distance(&a, &a, None), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn dtw_shifted_series() {
        let a = vec![0.0, 0.0, 1.0, 2.0, 1.0, 0.0];
        let b = vec![0.0, 1.0, 2.0, 1.0, 0.0, 0.0];

        // DTW aligns the peaks, Euclidean cannot
        assert_relative_eq!(dtw_distance(&a, &b, None), 0.0, epsilon = 1e-10);
        assert!(euclidean_distance(&a, &b) > 0.0);
    }

    #[test]
    fn dtw_different_lengths() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![1.0, 2.0, 3.0, 4.0, 5.0];

        let dist = dtw_distance(&a, &b, None);
        assert!(!dist.is_nan());
        assert_relative_eq!(dist, 3.0, epsilon = 1e-10);
    }

    #[test]
    fn dtw_empty() {
        assert_eq!(dtw_distance(&[], &[1.0, 2.0], None), f64::INFINITY);
        assert_eq!(dtw_distance(&[1.0, 2.0], &[], None), f64::INFINITY);
    }

    #[test]
    fn dtw_single_element() {
        assert_relative_eq!(dtw_distance(&[5.0], &[3.0], None), 2.0, epsilon = 1e-10);
    }

    #[test]
    fn dtw_window_is_more_constrained() {
        let a = vec![0.0, 0.0, 0.0, 1.0, 2.0, 1.0];
        let b = vec![1.0, 2.0, 1.0, 0.0, 0.0, 0.0];

        let full = dtw_distance(&a, &b, None);
        let narrow = dtw_distance(&a, &b, Some(1));
        assert!(narrow >= full - 1e-10);
        assert!(narrow > full);
    }

    #[test]
    fn dtw_zero_window_is_lock_step() {
        let a = vec![1.0, 3.0, 2.0];
        let b = vec![2.0, 1.0, 2.0];
        assert_relative_eq!(dtw_distance(&a, &b, Some(0)), 3.0, epsilon = 1e-10);
    }
}
