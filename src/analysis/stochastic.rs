//! Stochastic oscillator (%K / %D).

use serde::{Deserialize, Serialize};

use super::error::IndicatorError;
use super::moving_average::sma;
use crate::utils::maths_utils::{get_max, get_min};

/// %K is `close.len() - k_period + 1` long; %D is the SMA of %K and is
/// aligned to its tail (`k.len() - d_period + 1` long).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochasticOutput {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

pub fn stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    k_period: usize,
    d_period: usize,
) -> Result<StochasticOutput, IndicatorError> {
    if k_period == 0 || d_period == 0 {
        return Err(IndicatorError::invalid_input(
            "stochastic periods must be greater than 0",
        ));
    }
    if close.is_empty() {
        return Err(IndicatorError::invalid_input("input series is empty"));
    }
    if high.len() != low.len() || low.len() != close.len() {
        return Err(IndicatorError::invalid_input(format!(
            "high/low/close lengths differ ({}/{}/{})",
            high.len(),
            low.len(),
            close.len()
        )));
    }
    if close.len() < k_period {
        return Err(IndicatorError::invalid_input(format!(
            "need at least {k_period} bars for %K, got {}",
            close.len()
        )));
    }

    let k: Vec<f64> = (k_period - 1..close.len())
        .map(|i| {
            let start = i + 1 - k_period;
            let highest = get_max(&high[start..=i]);
            let lowest = get_min(&low[start..=i]);
            let range = highest - lowest;
            if range == 0.0 {
                // Flat window: no position within the range to report.
                50.0
            } else {
                (close[i] - lowest) / range * 100.0
            }
        })
        .collect();

    let d = sma(&k, d_period)?;

    Ok(StochasticOutput { k, d })
}
