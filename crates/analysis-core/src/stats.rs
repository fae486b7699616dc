//! Small statistics helpers shared by the aggregation code.

/// Compute the mean of a data slice. Empty input yields 0.0.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// `100 * part / total`, or 0.0 when `total` is zero.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / total as f64
}

/// Trailing rolling mean with `min_periods = 1`: the first `window - 1`
/// entries average over however many values are available.
pub fn rolling_mean(data: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..data.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            mean(&data[start..=i])
        })
        .collect()
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
