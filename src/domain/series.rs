use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use super::bar::{Bar, HistogramBar, ValueBar};
use super::candle::Candle;
use crate::error::ChartError;

/// Which bar flavour a series holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum SeriesKind {
    Candles,
    Values,
    Histogram,
}

/// An ordered run of bars of a single flavour.
/// Bar times are strictly increasing; every constructor path validates that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Series {
    Candles(Vec<Candle>),
    Values(Vec<ValueBar>),
    Histogram(Vec<HistogramBar>),
}

impl Series {
    pub fn empty(kind: SeriesKind) -> Self {
        match kind {
            SeriesKind::Candles => Series::Candles(Vec::new()),
            SeriesKind::Values => Series::Values(Vec::new()),
            SeriesKind::Histogram => Series::Histogram(Vec::new()),
        }
    }

    pub fn kind(&self) -> SeriesKind {
        match self {
            Series::Candles(_) => SeriesKind::Candles,
            Series::Values(_) => SeriesKind::Values,
            Series::Histogram(_) => SeriesKind::Histogram,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Series::Candles(v) => v.len(),
            Series::Values(v) => v.len(),
            Series::Histogram(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn time_at(&self, idx: usize) -> Option<i64> {
        match self {
            Series::Candles(v) => v.get(idx).map(|c| c.time),
            Series::Values(v) => v.get(idx).map(|b| b.time),
            Series::Histogram(v) => v.get(idx).map(|b| b.time),
        }
    }

    pub fn times(&self) -> Vec<i64> {
        (0..self.len()).filter_map(|i| self.time_at(i)).collect()
    }

    pub fn last_time(&self) -> Option<i64> {
        self.len().checked_sub(1).and_then(|i| self.time_at(i))
    }

    pub fn bar_at(&self, idx: usize) -> Option<Bar> {
        match self {
            Series::Candles(v) => v.get(idx).copied().map(Bar::Candle),
            Series::Values(v) => v.get(idx).copied().map(Bar::Value),
            Series::Histogram(v) => v.get(idx).cloned().map(Bar::Histogram),
        }
    }

    pub fn last(&self) -> Option<Bar> {
        self.len().checked_sub(1).and_then(|i| self.bar_at(i))
    }

    /// Index of the bar stamped exactly `time`.
    pub fn position_of(&self, time: i64) -> Option<usize> {
        match self {
            Series::Candles(v) => v.binary_search_by_key(&time, |c| c.time),
            Series::Values(v) => v.binary_search_by_key(&time, |b| b.time),
            Series::Histogram(v) => v.binary_search_by_key(&time, |b| b.time),
        }
        .ok()
    }

    /// Closing prices (candles) or values (line/area). `None` for volume
    /// histograms, which carry no price an indicator could read.
    pub fn closes(&self) -> Option<Vec<f64>> {
        match self {
            Series::Candles(v) => Some(v.iter().map(|c| c.close).collect()),
            Series::Values(v) => Some(v.iter().map(|b| b.value).collect()),
            Series::Histogram(_) => None,
        }
    }

    /// Checks the strictly-increasing time invariant over the whole series.
    pub fn validate(&self) -> Result<(), ChartError> {
        let times = self.times();
        match times.windows(2).find(|w| w[1] <= w[0]) {
            Some(w) => Err(ChartError::InvalidInput(format!(
                "series times must be strictly increasing ({} followed by {})",
                w[0], w[1]
            ))),
            None => Ok(()),
        }
    }

    /// Appends a bar of the matching flavour, newer than the current last bar.
    pub fn push(&mut self, bar: Bar) -> Result<(), ChartError> {
        if let Some(last) = self.last_time() {
            if bar.time() <= last {
                return Err(ChartError::OutOfOrder {
                    last,
                    attempted: bar.time(),
                });
            }
        }

        match (self, bar) {
            (Series::Candles(v), Bar::Candle(c)) => v.push(c),
            (Series::Values(v), Bar::Value(b)) => v.push(b),
            (Series::Histogram(v), Bar::Histogram(b)) => v.push(b),
            (series, bar) => {
                return Err(ChartError::InvalidInput(format!(
                    "cannot append a {:?} bar to a {} series",
                    bar,
                    series.kind()
                )));
            }
        }
        Ok(())
    }

    /// Removes and returns the newest bar.
    pub fn pop(&mut self) -> Option<Bar> {
        match self {
            Series::Candles(v) => v.pop().map(Bar::Candle),
            Series::Values(v) => v.pop().map(Bar::Value),
            Series::Histogram(v) => v.pop().map(Bar::Histogram),
        }
    }
}
