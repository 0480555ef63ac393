//! Chart and sample-data configuration

/// Colours of the primary series drawn for each view
pub struct SeriesPalette {
    pub up_color: &'static str,
    pub down_color: &'static str,
    pub line_color: &'static str,
    pub area_top_color: &'static str,
    pub area_bottom_color: &'static str,
    pub histogram_color: &'static str,
}

/// Parameters of the synthetic data generator
pub struct SampleDataConfig {
    /// Number of bars generated on every view load
    pub bar_count: usize,
    /// Starting price of every generated random walk
    pub base_price: f64,
    /// Full width of the uniform jitter applied to the open (and line values)
    pub open_spread: f64,
    /// Maximum distance of high/low from the open
    pub wick_spread: f64,
    /// Mean of the generated volume bars
    pub base_volume: f64,
    /// Full width of the uniform jitter applied to volume
    pub volume_spread: f64,
    /// Seed used when none is supplied on the command line
    pub default_seed: u64,
}

/// The Master Chart Configuration
pub struct ChartConfig {
    pub default_symbol: &'static str,
    pub palette: SeriesPalette,
    pub sample: SampleDataConfig,
    /// Price scale id of the volume histogram drawn under the candles
    pub volume_price_scale: &'static str,
}

pub const CHART: ChartConfig = ChartConfig {
    default_symbol: "BTC/USDT",

    palette: SeriesPalette {
        up_color: "#26a69a",
        down_color: "#ef5350",
        line_color: "#2196F3",
        area_top_color: "rgba(33, 150, 243, 0.56)",
        area_bottom_color: "rgba(33, 150, 243, 0.04)",
        histogram_color: "#26a69a",
    },

    sample: SampleDataConfig {
        bar_count: 100,
        base_price: 50_000.0,
        open_spread: 1_000.0,
        wick_spread: 500.0,
        base_volume: 1_000.0,
        volume_spread: 500.0,
        default_seed: 42,
    },

    volume_price_scale: "volume",
};
