//! Synthetic market data. Every view load draws a fresh random walk from a
//! seeded generator, so a given seed always yields the same chart.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::CHART;
use crate::domain::{Candle, CandleType, ChartView, HistogramBar, Series, Timeframe, ValueBar};
use crate::utils::maths_utils::round_to;

pub struct SampleGenerator {
    rng: StdRng,
}

impl SampleGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `count` bar times spaced by `timeframe`, the last one a full step
    /// before `end_time`.
    fn times(count: usize, end_time: i64, timeframe: Timeframe) -> impl Iterator<Item = i64> {
        let step = timeframe.seconds();
        (0..count).map(move |i| end_time - (count - i) as i64 * step)
    }

    /// Uniform draw in `[-width/2, width/2)`.
    fn jitter(&mut self, width: f64) -> f64 {
        (self.rng.r#gen::<f64>() - 0.5) * width
    }

    /// Random-walk candles: each open jitters around the previous close.
    pub fn candles(&mut self, count: usize, end_time: i64, timeframe: Timeframe) -> Vec<Candle> {
        let cfg = &CHART.sample;
        let mut base = cfg.base_price;

        Self::times(count, end_time, timeframe)
            .map(|time| {
                let open = base + self.jitter(cfg.open_spread);
                let high = open + self.rng.gen_range(0.0..cfg.wick_spread);
                let low = open - self.rng.gen_range(0.0..cfg.wick_spread);
                let close = low + self.rng.r#gen::<f64>() * (high - low);
                base = close;
                Candle::new(
                    time,
                    round_to(open, 2),
                    round_to(high, 2),
                    round_to(low, 2),
                    round_to(close, 2),
                )
            })
            .collect()
    }

    /// Random-walk single values for line and area views.
    pub fn values(&mut self, count: usize, end_time: i64, timeframe: Timeframe) -> Vec<ValueBar> {
        let cfg = &CHART.sample;
        let mut base = cfg.base_price;

        Self::times(count, end_time, timeframe)
            .map(|time| {
                base += self.jitter(cfg.open_spread);
                ValueBar {
                    time,
                    value: round_to(base, 2),
                }
            })
            .collect()
    }

    fn volume(&mut self) -> f64 {
        let cfg = &CHART.sample;
        round_to(cfg.base_volume + self.jitter(cfg.volume_spread), 0)
    }

    /// Stand-alone volume bars for the histogram view, randomly coloured.
    pub fn histogram(
        &mut self,
        count: usize,
        end_time: i64,
        timeframe: Timeframe,
    ) -> Vec<HistogramBar> {
        let palette = &CHART.palette;
        Self::times(count, end_time, timeframe)
            .map(|time| {
                let value = self.volume();
                let color = if self.rng.gen_bool(0.5) {
                    palette.up_color
                } else {
                    palette.down_color
                };
                HistogramBar {
                    time,
                    value,
                    color: color.to_string(),
                }
            })
            .collect()
    }

    /// Volume bars under a candle series, coloured by candle direction.
    pub fn volume_for(&mut self, candles: &[Candle]) -> Vec<HistogramBar> {
        let palette = &CHART.palette;
        candles
            .iter()
            .map(|candle| HistogramBar {
                time: candle.time,
                value: self.volume(),
                color: match candle.get_type() {
                    CandleType::Bullish => palette.up_color,
                    CandleType::Bearish => palette.down_color,
                }
                .to_string(),
            })
            .collect()
    }

    /// The primary series a view loads.
    pub fn series_for(
        &mut self,
        view: ChartView,
        count: usize,
        end_time: i64,
        timeframe: Timeframe,
    ) -> Series {
        match view {
            ChartView::Candlestick | ChartView::Realtime => {
                Series::Candles(self.candles(count, end_time, timeframe))
            }
            ChartView::Line | ChartView::Area => {
                Series::Values(self.values(count, end_time, timeframe))
            }
            ChartView::Histogram => Series::Histogram(self.histogram(count, end_time, timeframe)),
        }
    }
}
