use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use super::series::SeriesKind;

/// The chart tabs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ChartView {
    #[default]
    Candlestick,
    Line,
    Area,
    Histogram,
    /// Candlestick view with the simulated feed running.
    Realtime,
}

impl ChartView {
    /// Flavour of the series the store holds while this view is shown.
    pub fn series_kind(self) -> SeriesKind {
        match self {
            ChartView::Candlestick | ChartView::Realtime => SeriesKind::Candles,
            ChartView::Line | ChartView::Area => SeriesKind::Values,
            ChartView::Histogram => SeriesKind::Histogram,
        }
    }

    /// Candle views also draw a volume histogram under the price.
    pub fn has_volume(self) -> bool {
        self.series_kind() == SeriesKind::Candles
    }
}
