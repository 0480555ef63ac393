//! Simple and exponential moving averages.

use super::error::{IndicatorError, check_window};

/// Arithmetic mean of every `period`-wide window.
///
/// Output has `values.len() - period + 1` entries; entry `i` is the mean of
/// `values[i..i + period]`.
pub fn sma(values: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    check_window(values, period, period)?;

    let divisor = period as f64;
    // Every window is summed afresh, never from a running total.
    Ok(values
        .windows(period)
        .map(|window| window.iter().sum::<f64>() / divisor)
        .collect())
}

/// Exponential moving average seeded with the SMA of the first `period` values.
///
/// `ema[i] = value * k + ema[i - 1] * (1 - k)` with `k = 2 / (period + 1)`.
/// Output length matches [`sma`].
pub fn ema(values: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    check_window(values, period, period)?;

    let k = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len() - period + 1);

    let seed = values[..period].iter().sum::<f64>() / period as f64;
    result.push(seed);

    let mut prev = seed;
    for &value in &values[period..] {
        prev = value * k + prev * (1.0 - k);
        result.push(prev);
    }

    Ok(result)
}
