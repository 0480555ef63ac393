//! Relative Strength Index with Wilder smoothing.
//!
//! ```text
//! RS  = average gain / average loss
//! RSI = 100 - 100 / (1 + RS)
//! ```
//!
//! The averages are seeded with the plain mean of the first `period` steps and
//! then smoothed as `avg = (avg * (period - 1) + step) / period`.

use itertools::Itertools;

use super::error::{IndicatorError, check_window};

/// RSI over `values`. Output has `values.len() - period` entries; entry `i`
/// belongs to `values[i + period]`.
///
/// A window with no losses has an infinite RS and reads exactly 100.
pub fn rsi(values: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    check_window(values, period, period + 1)?;

    let (gains, losses): (Vec<f64>, Vec<f64>) = values
        .iter()
        .tuple_windows()
        .map(|(prev, next)| {
            let change = next - prev;
            if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, -change)
            }
        })
        .unzip();

    let p = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / p;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / p;

    let mut result = Vec::with_capacity(gains.len() - period + 1);
    result.push(rsi_value(avg_gain, avg_loss));

    for (gain, loss) in gains[period..].iter().zip(&losses[period..]) {
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        result.push(rsi_value(avg_gain, avg_loss));
    }

    Ok(result)
}

#[inline]
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
