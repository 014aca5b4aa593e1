//! Simple moving average over a sliding window.

/// Right-aligned moving average: output `i` is the mean of
/// `values[i..i + window]`, so the result has `n - window + 1` entries and
/// lines up with the input starting at index `window - 1`.
///
/// Returns an empty vector when `window` is zero or longer than the input.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(values.len() - window + 1);
    let mut sum: f64 = values[..window].iter().sum();
    out.push(sum / window as f64);

    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out.push(sum / window as f64);
    }

    out
}
