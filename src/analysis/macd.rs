//! Moving Average Convergence Divergence.
//!
//! - **MACD line**: fast EMA - slow EMA
//! - **Signal line**: EMA of the MACD line
//! - **Histogram**: MACD line - signal line

use serde::{Deserialize, Serialize};

use super::error::{IndicatorError, check_window};
use super::moving_average::ema;

/// The three MACD lines, all of equal length and aligned to the tail of the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdOutput {
    pub fn len(&self) -> usize {
        self.signal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal.is_empty()
    }
}

/// MACD with the usual 12/26/9 shape when called with those spans.
///
/// The fast EMA is longer than the slow one; its leading `slow - fast`
/// entries are dropped so both start on the same input index. Output length
/// is `values.len() - slow - signal + 2`.
pub fn macd(
    values: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<MacdOutput, IndicatorError> {
    if fast == 0 || slow == 0 || signal == 0 {
        return Err(IndicatorError::invalid_input(
            "all MACD periods must be greater than 0",
        ));
    }
    if fast >= slow {
        return Err(IndicatorError::invalid_input(format!(
            "fast period ({fast}) must be less than slow period ({slow})"
        )));
    }
    check_window(values, slow, slow + signal - 1)?;

    let fast_ema = ema(values, fast)?;
    let slow_ema = ema(values, slow)?;

    let offset = slow - fast;
    let macd_line: Vec<f64> = slow_ema
        .iter()
        .zip(&fast_ema[offset..])
        .map(|(s, f)| f - s)
        .collect();

    let signal_line = ema(&macd_line, signal)?;
    let macd_tail = macd_line[signal - 1..].to_vec();

    let histogram = macd_tail
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    Ok(MacdOutput {
        macd: macd_tail,
        signal: signal_line,
        histogram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn lines_share_length_and_tail_alignment() {
        let values = wave(80);
        let out = macd(&values, 12, 26, 9).unwrap();

        assert_eq!(out.macd.len(), 80 - 26 - 9 + 2);
        assert_eq!(out.signal.len(), out.macd.len());
        assert_eq!(out.histogram.len(), out.macd.len());

        // Last MACD value is the difference of the two EMAs' last values.
        let fast = ema(&values, 12).unwrap();
        let slow = ema(&values, 26).unwrap();
        assert_relative_eq!(
            out.macd[out.len() - 1],
            fast[fast.len() - 1] - slow[slow.len() - 1],
            epsilon = 1e-12
        );
    }

    #[test]
    fn histogram_is_macd_minus_signal() {
        let out = macd(&wave(60), 5, 10, 4).unwrap();
        for i in 0..out.len() {
            assert_relative_eq!(out.histogram[i], out.macd[i] - out.signal[i]);
        }
    }

    #[test]
    fn constant_input_is_flat_zero() {
        let out = macd(&[42.0; 50], 12, 26, 9).unwrap();
        assert!(out.macd.iter().all(|v| v.abs() < 1e-12));
        assert!(out.histogram.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn minimum_input_yields_single_point() {
        let out = macd(&wave(34), 12, 26, 9).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(
            macd(&wave(33), 12, 26, 9),
            Err(IndicatorError::InsufficientData {
                required: 34,
                actual: 33
            })
        );
    }

    #[test]
    fn rejects_inverted_periods() {
        assert!(matches!(
            macd(&wave(60), 26, 12, 9),
            Err(IndicatorError::InvalidInput(_))
        ));
        assert!(matches!(
            macd(&wave(60), 12, 26, 0),
            Err(IndicatorError::InvalidInput(_))
        ));
    }
}
