//! Legend readout: the values shown above the chart for the cursor position
//! or, without a cursor, for the latest bar.

use std::fmt;

use serde::Serialize;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::INDICATORS;
use crate::data::SeriesStore;
use crate::domain::{Bar, Market};
use crate::render::{CrosshairEvent, PrimarySeries, SeriesValue};
use crate::utils::maths_utils::round_to;

use super::registry::IndicatorRegistry;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum LegendRow {
    Ohlc {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },
    Value {
        value: f64,
    },
    Indicator {
        label: String,
        color: String,
        value: f64,
        #[serde(skip)]
        precision: usize,
    },
}

impl LegendRow {
    fn from_price(value: SeriesValue) -> Self {
        let p = INDICATORS.precision.price;
        match value {
            SeriesValue::Ohlc {
                open,
                high,
                low,
                close,
            } => LegendRow::Ohlc {
                open: round_to(open, p),
                high: round_to(high, p),
                low: round_to(low, p),
                close: round_to(close, p),
            },
            SeriesValue::Value(value) => LegendRow::Value {
                value: round_to(value, p),
            },
        }
    }
}

impl fmt::Display for LegendRow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let p = INDICATORS.precision.price;
        match self {
            LegendRow::Ohlc {
                open,
                high,
                low,
                close,
            } => write!(f, "O:{open:.p$} H:{high:.p$} L:{low:.p$} C:{close:.p$}"),
            LegendRow::Value { value } => write!(f, "Value: {value:.p$}"),
            LegendRow::Indicator {
                label,
                value,
                precision,
                ..
            } => write!(f, "{label}: {value:.precision$}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub header: String,
    pub rows: Vec<LegendRow>,
}

impl Legend {
    fn empty(market: &Market) -> Self {
        Self {
            header: market.to_string(),
            rows: Vec::new(),
        }
    }
}

impl fmt::Display for Legend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.header)?;
        for row in &self.rows {
            write!(f, " | {row}")?;
        }
        Ok(())
    }
}

/// Everything a legend is projected from. Borrowing only: projecting never
/// mutates the session.
pub struct LegendProjector<'a> {
    pub market: &'a Market,
    pub primaries: &'a PrimarySeries,
    pub store: &'a SeriesStore,
    pub registry: &'a IndicatorRegistry,
}

impl LegendProjector<'_> {
    pub fn project(&self, cursor: Option<&CrosshairEvent>) -> Legend {
        let legend = match cursor {
            Some(event) => self.at_cursor(event),
            None => self.latest(),
        };

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_legend_updates {
            log::info!("Legend projected with {} row(s)", legend.rows.len());
        }

        legend
    }

    fn at_cursor(&self, event: &CrosshairEvent) -> Legend {
        let mut legend = Legend::empty(self.market);
        if event.time.is_none() {
            return legend;
        }

        let Some(price) = self
            .primaries
            .price_handles()
            .find_map(|handle| event.values.get(&handle).copied())
        else {
            return legend;
        };
        legend.rows.push(LegendRow::from_price(price));

        for line in self.registry.all().flat_map(|instance| &instance.lines) {
            if let Some(value) = event.values.get(&line.handle) {
                legend.rows.push(LegendRow::Indicator {
                    label: line.label.clone(),
                    color: line.color.clone(),
                    value: round_to(value.value(), line.precision),
                    precision: line.precision,
                });
            }
        }
        legend
    }

    fn latest(&self) -> Legend {
        let mut legend = Legend::empty(self.market);

        match self.store.latest() {
            Some(bar @ (Bar::Candle(_) | Bar::Value(_))) => {
                legend.rows.push(LegendRow::from_price(SeriesValue::from_bar(&bar)));
            }
            // Volume carries no price readout.
            Some(Bar::Histogram(_)) | None => return legend,
        }

        for line in self.registry.all().flat_map(|instance| &instance.lines) {
            if let Some(value) = line.last_value() {
                legend.rows.push(LegendRow::Indicator {
                    label: line.label.clone(),
                    color: line.color.clone(),
                    value: round_to(value, line.precision),
                    precision: line.precision,
                });
            }
        }
        legend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candle, HistogramBar, Series, SeriesKind, Timeframe};
    use crate::models::indicator::IndicatorSpec;
    use crate::render::{ChartRenderer, HeadlessRenderer, PrimaryKind, SeriesOptions};

    struct Fixture {
        market: Market,
        primaries: PrimarySeries,
        store: SeriesStore,
        registry: IndicatorRegistry,
        renderer: HeadlessRenderer,
    }

    impl Fixture {
        fn candles(n: usize) -> Self {
            let series = Series::Candles(
                (0..n)
                    .map(|i| {
                        let c = 100.0 + i as f64;
                        Candle::new(i as i64 * 60, c - 0.5, c + 1.0, c - 1.0, c)
                    })
                    .collect(),
            );

            let mut renderer = HeadlessRenderer::new();
            let handle = renderer
                .create_series(&SeriesOptions {
                    kind: PrimaryKind::Candlestick,
                    color: "#26a69a".to_string(),
                    secondary_color: None,
                    price_scale_id: None,
                })
                .unwrap();
            renderer.set_series_data(handle, &series).unwrap();

            let mut store = SeriesStore::default();
            store.replace(series, || {}).unwrap();

            Self {
                market: Market::new("ETH/USDT", Timeframe::FiveMinutes),
                primaries: PrimarySeries {
                    candlestick: Some(handle),
                    ..Default::default()
                },
                store,
                registry: IndicatorRegistry::new(),
                renderer,
            }
        }

        fn add(&mut self, spec: IndicatorSpec) {
            let snapshot = self.store.snapshot();
            self.registry
                .add(spec, &snapshot, &mut self.renderer)
                .unwrap();
        }

        fn project(&self, cursor: Option<&CrosshairEvent>) -> Legend {
            LegendProjector {
                market: &self.market,
                primaries: &self.primaries,
                store: &self.store,
                registry: &self.registry,
            }
            .project(cursor)
        }
    }

    #[test]
    fn latest_mode_reads_last_bar_and_cached_outputs() {
        let mut fx = Fixture::candles(10);
        fx.add(IndicatorSpec::sma(4));

        let legend = fx.project(None);
        assert_eq!(legend.header, "ETH/USDT, 5m");
        assert_eq!(legend.rows.len(), 2);
        assert_eq!(legend.rows[0].to_string(), "O:108.50 H:110.00 L:108.00 C:109.00");
        assert_eq!(legend.rows[1].to_string(), "SMA(4): 107.50");
    }

    #[test]
    fn cursor_mode_omits_indicators_without_a_point() {
        let mut fx = Fixture::candles(10);
        fx.add(IndicatorSpec::sma(5));

        // Bar 2 is inside the SMA warm-up window.
        let early = fx.renderer.crosshair_at(120);
        let legend = fx.project(Some(&early));
        assert_eq!(legend.rows.len(), 1);
        assert!(matches!(legend.rows[0], LegendRow::Ohlc { close, .. } if close == 102.0));

        let late = fx.renderer.crosshair_at(6 * 60);
        let legend = fx.project(Some(&late));
        assert_eq!(legend.rows.len(), 2);
        assert!(matches!(
            &legend.rows[1],
            LegendRow::Indicator { label, value, .. } if label == "SMA(5)" && *value == 104.0
        ));
    }

    #[test]
    fn cursor_outside_or_unresolved_gives_header_only() {
        let mut fx = Fixture::candles(5);
        fx.add(IndicatorSpec::sma(2));

        assert!(fx.project(Some(&CrosshairEvent::outside())).rows.is_empty());

        // A time with no primary point resolves nothing, not an error.
        let gap = fx.renderer.crosshair_at(10_000);
        let legend = fx.project(Some(&gap));
        assert!(legend.rows.is_empty());
        assert_eq!(legend.to_string(), "ETH/USDT, 5m");
    }

    #[test]
    fn histogram_store_has_no_price_row() {
        let mut fx = Fixture::candles(3);
        let volume = Series::Histogram(vec![HistogramBar {
            time: 1,
            value: 900.0,
            color: "#ef5350".to_string(),
        }]);
        fx.store = SeriesStore::new(SeriesKind::Histogram);
        fx.store.replace(volume, || {}).unwrap();

        assert!(fx.project(None).rows.is_empty());
    }

    #[test]
    fn macd_rows_use_four_decimals() {
        let mut fx = Fixture::candles(40);
        fx.add(IndicatorSpec::macd(3, 6, 2));

        let legend = fx.project(None);
        let rendered = legend.rows[1].to_string();
        let decimals = rendered.rsplit('.').next().unwrap();
        assert!(rendered.starts_with("MACD(3,6,2): "));
        assert_eq!(decimals.len(), 4);
    }
}
