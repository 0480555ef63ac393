//! The charting widget, seen from the session: a capability interface.
//!
//! The session never draws. It asks a [`ChartRenderer`] to create, fill and
//! remove series and overlays, and it reads crosshair payloads back as
//! [`CrosshairEvent`]s.

pub mod headless;

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::domain::{Bar, Point, Series};

pub use headless::{HeadlessRenderer, RenderStats};

/// Opaque handle to a series or overlay living inside the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesHandle(pub u64);

/// The primary (non-indicator) series a view can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum PrimaryKind {
    Candlestick,
    Volume,
    Line,
    Area,
    Histogram,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesOptions {
    pub kind: PrimaryKind,
    /// Main colour, or up colour for candles.
    pub color: String,
    /// Secondary colour: down colour for candles, fill for areas.
    pub secondary_color: Option<String>,
    pub price_scale_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum OverlayStyle {
    Line,
    Histogram,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayOptions {
    pub title: String,
    pub color: String,
    pub line_width: u32,
    pub price_scale_id: Option<String>,
    pub style: OverlayStyle,
}

/// Value of one series under the crosshair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SeriesValue {
    Ohlc {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },
    Value(f64),
}

impl SeriesValue {
    pub fn from_bar(bar: &Bar) -> Self {
        match bar {
            Bar::Candle(c) => SeriesValue::Ohlc {
                open: c.open,
                high: c.high,
                low: c.low,
                close: c.close,
            },
            Bar::Value(v) => SeriesValue::Value(v.value),
            Bar::Histogram(h) => SeriesValue::Value(h.value),
        }
    }

    /// Single value of the point; the close for OHLC.
    pub fn value(&self) -> f64 {
        match *self {
            SeriesValue::Ohlc { close, .. } => close,
            SeriesValue::Value(v) => v,
        }
    }
}

/// Crosshair payload: the time under the cursor (if the cursor is over the
/// plot) and the value of every series that has a point at that time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrosshairEvent {
    pub time: Option<i64>,
    pub values: HashMap<SeriesHandle, SeriesValue>,
}

impl CrosshairEvent {
    /// Cursor left the plot.
    pub fn outside() -> Self {
        Self::default()
    }
}

/// Handles of the primary series the current view draws.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimarySeries {
    pub candlestick: Option<SeriesHandle>,
    pub volume: Option<SeriesHandle>,
    pub line: Option<SeriesHandle>,
    pub area: Option<SeriesHandle>,
    pub histogram: Option<SeriesHandle>,
}

impl PrimarySeries {
    /// Price series the legend may resolve a cursor against, in lookup order.
    pub fn price_handles(&self) -> impl Iterator<Item = SeriesHandle> + '_ {
        [self.candlestick, self.line, self.area].into_iter().flatten()
    }

    /// Removes every primary series from the renderer and forgets the handles.
    pub fn release<R: ChartRenderer + ?Sized>(&mut self, renderer: &mut R) {
        let handles = [
            self.candlestick.take(),
            self.line.take(),
            self.area.take(),
            self.histogram.take(),
            self.volume.take(),
        ];
        for handle in handles.into_iter().flatten() {
            renderer.remove_series(handle);
        }
    }
}

/// Operations the session needs from the charting widget.
///
/// Creation and data calls may fail; removal is infallible so teardown
/// always completes.
pub trait ChartRenderer {
    fn create_series(&mut self, options: &SeriesOptions) -> Result<SeriesHandle>;
    fn remove_series(&mut self, handle: SeriesHandle);
    fn set_series_data(&mut self, handle: SeriesHandle, data: &Series) -> Result<()>;
    /// Appends or replaces the last bar of a primary series.
    fn update_series(&mut self, handle: SeriesHandle, bar: &Bar) -> Result<()>;

    fn create_overlay(&mut self, options: &OverlayOptions) -> Result<SeriesHandle>;
    fn remove_overlay(&mut self, handle: SeriesHandle);
    fn set_overlay_data(&mut self, handle: SeriesHandle, points: &[Point]) -> Result<()>;
}
