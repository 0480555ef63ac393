//! Technical indicator defaults, presets and styling

/// Default parameters used when an indicator is added without explicit values
pub struct DefaultParams {
    pub sma_period: usize,
    pub ema_period: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
}

/// Default overlay colours, one entry per output line
pub struct DefaultColors {
    pub sma: &'static [&'static str],
    pub ema: &'static [&'static str],
    pub rsi: &'static [&'static str],
    pub macd: &'static [&'static str],
    pub bollinger: &'static [&'static str],
}

/// Overlay styling shared by every indicator line
pub struct OverlayStyleConfig {
    pub average_line_width: u32,
    pub band_line_width: u32,
    /// Separate price scale for oscillators bounded to [0, 100]
    pub rsi_price_scale: &'static str,
    pub macd_price_scale: &'static str,
}

/// Decimal places used at the presentation boundary only
pub struct PrecisionConfig {
    pub price: usize,
    pub macd: usize,
}

/// The Master Indicator Configuration
pub struct IndicatorDefaults {
    pub params: DefaultParams,
    pub colors: DefaultColors,
    pub style: OverlayStyleConfig,
    pub precision: PrecisionConfig,
}

pub const INDICATORS: IndicatorDefaults = IndicatorDefaults {
    params: DefaultParams {
        sma_period: 20,
        ema_period: 20,
        rsi_period: 14,
        macd_fast: 12,
        macd_slow: 26,
        macd_signal: 9,
        bollinger_period: 20,
        bollinger_std_dev: 2.0,
    },

    colors: DefaultColors {
        sma: &["#FF6B6B"],
        ema: &["#4ECDC4"],
        rsi: &["#9B59B6"],
        // MACD line, signal, histogram
        macd: &["#2962FF", "#FF6D00", "#26A69A"],
        // Upper, middle, lower
        bollinger: &["#E74C3C", "#F39C12", "#27AE60"],
    },

    style: OverlayStyleConfig {
        average_line_width: 2,
        band_line_width: 1,
        rsi_price_scale: "rsi",
        macd_price_scale: "macd",
    },

    precision: PrecisionConfig { price: 2, macd: 4 },
};
