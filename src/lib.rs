#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod models;
pub mod render;
pub mod utils;

// The session and its realtime driver
pub mod engine;

// Re-export commonly used types
pub use data::{PriceFeed, SampleGenerator, SeriesStore};
pub use domain::{Bar, Candle, ChartView, Market, Series, Timeframe};
pub use engine::{ChartSession, TickerSummary, run_realtime};
pub use error::ChartError;
pub use models::{IndicatorId, IndicatorKind, IndicatorRegistry, IndicatorSpec, Legend, Preset};
pub use render::{ChartRenderer, CrosshairEvent, HeadlessRenderer};

// CLI argument parsing
use clap::Parser;

use crate::config::CHART;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Trading pair shown in the legend header
    #[arg(long, default_value = CHART.default_symbol)]
    pub symbol: String,

    /// Candle spacing: 1m, 5m, 15m, 1H, 4H or 1D
    #[arg(long, default_value = "1H")]
    pub timeframe: Timeframe,

    /// Chart tab to load: candlestick, line, area, histogram or realtime
    #[arg(long, default_value = "candlestick")]
    pub view: ChartView,

    /// Indicator to add, repeatable. A preset (sma20, sma50, ema12, rsi14,
    /// bollinger) or KIND[:p1[:p2[:p3]]], e.g. MACD:12:26:9 or BB:20:2.5
    #[arg(long = "indicator", value_name = "SPEC")]
    pub indicators: Vec<IndicatorSpec>,

    /// Number of sample bars generated for the view
    #[arg(long, default_value_t = CHART.sample.bar_count)]
    pub bars: usize,

    /// Seed of the sample data and realtime generators
    #[arg(long, default_value_t = CHART.sample.default_seed)]
    pub seed: u64,

    /// Run the realtime feed for this many ticks before printing the legend
    #[arg(long, default_value_t = 0)]
    pub realtime_ticks: usize,

    /// Refresh indicators after every realtime tick
    #[arg(long, default_value_t = false)]
    pub live_indicators: bool,

    /// Print the legend as seen with the cursor over this bar index
    /// instead of the latest bar
    #[arg(long)]
    pub cursor_bar: Option<usize>,

    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_repeated_indicators() {
        let cli = Cli::try_parse_from([
            "tickboard",
            "--view",
            "line",
            "--timeframe",
            "15m",
            "--indicator",
            "sma20",
            "--indicator",
            "MACD:5:10:3",
        ])
        .unwrap();

        assert_eq!(cli.view, ChartView::Line);
        assert_eq!(cli.timeframe, Timeframe::FifteenMinutes);
        assert_eq!(cli.indicators.len(), 2);
        assert_eq!(cli.indicators[1].kind, IndicatorKind::Macd);
        assert_eq!(cli.symbol, "BTC/USDT");
        assert_eq!(cli.bars, 100);
    }

    #[test]
    fn cli_rejects_unknown_indicator() {
        assert!(Cli::try_parse_from(["tickboard", "--indicator", "WMA:3"]).is_err());
    }
}
