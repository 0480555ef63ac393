use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::config::CHART;
use crate::utils::TimeUtils;

/// Candle spacing selectable from the timeframe picker.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, AsRefStr, EnumString, EnumIter,
    Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Timeframe {
    #[strum(serialize = "1m")]
    OneMinute,
    #[strum(serialize = "5m")]
    FiveMinutes,
    #[strum(serialize = "15m")]
    FifteenMinutes,
    #[default]
    #[strum(serialize = "1H")]
    OneHour,
    #[strum(serialize = "4H")]
    FourHours,
    #[strum(serialize = "1D")]
    OneDay,
}

impl Timeframe {
    pub fn seconds(self) -> i64 {
        match self {
            Timeframe::OneMinute => TimeUtils::S_IN_MIN,
            Timeframe::FiveMinutes => TimeUtils::S_IN_5_MIN,
            Timeframe::FifteenMinutes => TimeUtils::S_IN_15_MIN,
            Timeframe::OneHour => TimeUtils::S_IN_H,
            Timeframe::FourHours => TimeUtils::S_IN_4_H,
            Timeframe::OneDay => TimeUtils::S_IN_D,
        }
    }
}

/// The instrument on screen: a symbol such as `BTC/USDT` and a timeframe.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct Market {
    pub symbol: String,
    pub timeframe: Timeframe,
}

impl Market {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
        }
    }
}

impl Default for Market {
    fn default() -> Self {
        Self::new(CHART.default_symbol, Timeframe::default())
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}, {}", self.symbol, self.timeframe)
    }
}
