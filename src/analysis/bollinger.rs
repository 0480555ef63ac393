//! Bollinger Bands: SMA middle band with population standard deviation bands.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use super::error::{IndicatorError, check_window};
use super::moving_average::sma;

/// Upper, middle and lower band, each `values.len() - period + 1` long.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger_bands(
    values: &[f64],
    period: usize,
    std_dev: f64,
) -> Result<BollingerBands, IndicatorError> {
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(IndicatorError::invalid_input(format!(
            "standard deviation multiplier must be finite and non-negative, got {std_dev}"
        )));
    }
    check_window(values, period, period)?;

    let middle = sma(values, period)?;
    let mut upper = Vec::with_capacity(middle.len());
    let mut lower = Vec::with_capacity(middle.len());

    for (window, &mid) in values.windows(period).zip(&middle) {
        // Divides by `period`, not `period - 1`.
        let sigma = window.iter().population_std_dev();
        upper.push(mid + std_dev * sigma);
        lower.push(mid - std_dev * sigma);
    }

    Ok(BollingerBands {
        upper,
        middle,
        lower,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn bands_are_symmetric_around_middle() {
        let values: Vec<f64> = (0..50)
            .map(|i| 200.0 + ((i * 13) % 7) as f64 * 1.5)
            .collect();
        let bb = bollinger_bands(&values, 20, 2.0).unwrap();

        assert_eq!(bb.middle.len(), 31);
        for i in 0..bb.middle.len() {
            assert_abs_diff_eq!(
                bb.upper[i] - bb.middle[i],
                bb.middle[i] - bb.lower[i],
                epsilon = 1e-9
            );
            assert!(bb.upper[i] >= bb.lower[i]);
        }
    }

    #[test]
    fn uses_population_deviation() {
        // mean 5, population variance 4 -> sigma 2
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let bb = bollinger_bands(&values, 8, 2.0).unwrap();

        assert_relative_eq!(bb.middle[0], 5.0);
        assert_relative_eq!(bb.upper[0], 9.0, epsilon = 1e-9);
        assert_relative_eq!(bb.lower[0], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn flat_prices_collapse_the_bands() {
        let bb = bollinger_bands(&[10.0; 25], 20, 2.0).unwrap();
        assert!(bb.upper.iter().zip(&bb.lower).all(|(u, l)| u == l));
    }

    #[test]
    fn rejects_bad_multiplier() {
        assert!(matches!(
            bollinger_bands(&[1.0; 30], 20, -1.0),
            Err(IndicatorError::InvalidInput(_))
        ));
        assert!(matches!(
            bollinger_bands(&[1.0; 30], 20, f64::NAN),
            Err(IndicatorError::InvalidInput(_))
        ));
    }
}
