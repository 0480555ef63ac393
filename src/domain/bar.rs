use serde::{Deserialize, Serialize};

use super::candle::Candle;

/// Single-value bar used by line and area series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueBar {
    pub time: i64,
    pub value: f64,
}

/// Histogram (volume) bar with its own colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBar {
    pub time: i64,
    pub value: f64,
    pub color: String,
}

/// A single time-stamped point of any series flavour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Bar {
    Candle(Candle),
    Value(ValueBar),
    Histogram(HistogramBar),
}

impl Bar {
    pub fn time(&self) -> i64 {
        match self {
            Bar::Candle(c) => c.time,
            Bar::Value(v) => v.time,
            Bar::Histogram(h) => h.time,
        }
    }

    /// The price a derived indicator reads from this bar, if any.
    /// Volume is not a price, so histogram bars have none.
    pub fn price(&self) -> Option<f64> {
        match self {
            Bar::Candle(c) => Some(c.close),
            Bar::Value(v) => Some(v.value),
            Bar::Histogram(_) => None,
        }
    }
}

/// Time-stamped point of an indicator output line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub time: i64,
    pub value: f64,
}
