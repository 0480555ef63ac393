use std::sync::Arc;

use crate::config::{CHART, REALTIME};
use crate::data::{PriceFeed, SampleGenerator, SeriesStore};
use crate::domain::{Bar, Candle, ChartView, Market, Series};
use crate::error::ChartError;
use crate::models::{
    IndicatorId, IndicatorInstance, IndicatorRegistry, IndicatorSpec, Legend, LegendProjector,
    Preset,
};
use crate::render::{
    ChartRenderer, CrosshairEvent, PrimaryKind, PrimarySeries, SeriesHandle, SeriesOptions,
};

/// One chart on screen: the price series, its indicators, the primary series
/// drawn for the current view and the simulated feed.
///
/// Every event handler takes `&mut self`, so handlers run one at a time and
/// each runs to completion.
pub struct ChartSession<R: ChartRenderer> {
    renderer: R,
    market: Market,
    view: ChartView,
    store: SeriesStore,
    registry: IndicatorRegistry,
    primaries: PrimarySeries,
    generator: SampleGenerator,
    feed: PriceFeed,
    /// Bars generated on every view load.
    bar_count: usize,
    /// Refresh indicators after every accepted realtime tick.
    live_indicators: bool,
}

impl<R: ChartRenderer> ChartSession<R> {
    /// An empty session. Nothing is drawn until the first `switch_view`.
    pub fn new(renderer: R, market: Market, seed: u64) -> Self {
        Self {
            renderer,
            market,
            view: ChartView::default(),
            store: SeriesStore::default(),
            registry: IndicatorRegistry::new(),
            primaries: PrimarySeries::default(),
            generator: SampleGenerator::new(seed),
            feed: PriceFeed::new(seed.wrapping_add(1)),
            bar_count: CHART.sample.bar_count,
            live_indicators: REALTIME.recompute_indicators_on_tick,
        }
    }

    pub fn with_bar_count(mut self, bar_count: usize) -> Self {
        self.bar_count = bar_count;
        self
    }

    pub fn with_live_indicators(mut self, enabled: bool) -> Self {
        self.live_indicators = enabled;
        self
    }

    /// Loads `view` with fresh sample data ending at `now`.
    ///
    /// Order: stop the feed, replace the series (the replace hook tears down
    /// every indicator first), release the old primary series, then create
    /// and fill the new ones.
    pub fn switch_view(&mut self, view: ChartView, now: i64) -> Result<(), ChartError> {
        self.stop_realtime();

        let series = self
            .generator
            .series_for(view, self.bar_count, now, self.market.timeframe);
        let volume = match &series {
            Series::Candles(candles) if view.has_volume() => {
                Some(Series::Histogram(self.generator.volume_for(candles)))
            }
            _ => None,
        };

        let registry = &mut self.registry;
        let renderer = &mut self.renderer;
        self.store.replace(series, || {
            registry.clear(renderer);
        })?;
        self.primaries.release(&mut self.renderer);
        self.view = view;

        let snapshot = self.store.snapshot();
        self.draw_primaries(view, &snapshot, volume.as_ref())?;

        log::info!("Switched to {view} view for {}", self.market);

        if view == ChartView::Realtime {
            self.start_realtime();
        }
        Ok(())
    }

    fn draw_primaries(
        &mut self,
        view: ChartView,
        series: &Series,
        volume: Option<&Series>,
    ) -> Result<(), ChartError> {
        let palette = &CHART.palette;

        let (kind, color, secondary) = match view {
            ChartView::Candlestick | ChartView::Realtime => (
                PrimaryKind::Candlestick,
                palette.up_color,
                Some(palette.down_color),
            ),
            ChartView::Line => (PrimaryKind::Line, palette.line_color, None),
            ChartView::Area => (
                PrimaryKind::Area,
                palette.area_top_color,
                Some(palette.area_bottom_color),
            ),
            ChartView::Histogram => (PrimaryKind::Histogram, palette.histogram_color, None),
        };

        let handle = self.create_primary(
            SeriesOptions {
                kind,
                color: color.to_string(),
                secondary_color: secondary.map(str::to_string),
                price_scale_id: None,
            },
            series,
        )?;
        match kind {
            PrimaryKind::Candlestick => self.primaries.candlestick = Some(handle),
            PrimaryKind::Line => self.primaries.line = Some(handle),
            PrimaryKind::Area => self.primaries.area = Some(handle),
            PrimaryKind::Histogram | PrimaryKind::Volume => self.primaries.histogram = Some(handle),
        }

        if let Some(volume) = volume {
            let handle = self.create_primary(
                SeriesOptions {
                    kind: PrimaryKind::Volume,
                    color: palette.histogram_color.to_string(),
                    secondary_color: None,
                    price_scale_id: Some(CHART.volume_price_scale.to_string()),
                },
                volume,
            )?;
            self.primaries.volume = Some(handle);
        }
        Ok(())
    }

    fn create_primary(
        &mut self,
        options: SeriesOptions,
        data: &Series,
    ) -> Result<SeriesHandle, ChartError> {
        let handle = self
            .renderer
            .create_series(&options)
            .map_err(ChartError::render)?;
        if let Err(err) = self.renderer.set_series_data(handle, data) {
            self.renderer.remove_series(handle);
            return Err(ChartError::render(err));
        }
        Ok(handle)
    }

    /// Changes symbol and/or timeframe and reloads the current view.
    pub fn set_market(&mut self, market: Market, now: i64) -> Result<(), ChartError> {
        log::info!("Market changed: {} -> {market}", self.market);
        self.market = market;
        self.switch_view(self.view, now)
    }

    pub fn add_indicator(&mut self, spec: IndicatorSpec) -> Result<IndicatorId, ChartError> {
        let snapshot = self.store.snapshot();
        self.registry.add(spec, &snapshot, &mut self.renderer)
    }

    pub fn add_preset(&mut self, preset: Preset) -> Result<IndicatorId, ChartError> {
        self.add_indicator(preset.spec())
    }

    pub fn remove_indicator(&mut self, id: IndicatorId) -> bool {
        self.registry.remove(id, &mut self.renderer)
    }

    pub fn clear_indicators(&mut self) -> usize {
        self.registry.clear(&mut self.renderer)
    }

    pub fn indicator(&self, id: IndicatorId) -> Option<&IndicatorInstance> {
        self.registry.get(id)
    }

    /// Active indicators in the order they were added.
    pub fn indicators(&self) -> impl Iterator<Item = &IndicatorInstance> {
        self.registry.all()
    }

    pub fn indicator_count(&self) -> usize {
        self.registry.len()
    }

    /// Drops every indicator and adds the same specs back, in the same order,
    /// against the current series. Specs that no longer compute are logged
    /// and dropped; the rest are re-added.
    pub fn recompute_indicators(&mut self) -> Vec<IndicatorId> {
        let specs: Vec<IndicatorSpec> = self.registry.all().map(|i| i.spec.clone()).collect();
        self.registry.clear(&mut self.renderer);

        specs
            .into_iter()
            .filter_map(|spec| {
                let label = spec.to_string();
                self.add_indicator(spec)
                    .map_err(|err| log::warn!("Dropped {label} on refresh: {err}"))
                    .ok()
            })
            .collect()
    }

    pub fn start_realtime(&mut self) -> bool {
        self.feed.start()
    }

    pub fn stop_realtime(&mut self) -> bool {
        self.feed.stop()
    }

    pub fn is_realtime(&self) -> bool {
        self.feed.is_active()
    }

    /// One realtime timer firing. Appends a simulated candle stamped `now`
    /// and pushes it to the candlestick series.
    ///
    /// Returns `Ok(None)` when the feed is off or the view has no candles.
    /// On error the tick is skipped and nothing changed: an `OutOfOrder` bar is
    /// never stored, and a bar the renderer refused is taken back out.
    pub fn on_tick(&mut self, now: i64) -> Result<Option<Candle>, ChartError> {
        if !self.feed.is_active() {
            return Ok(None);
        }
        let (Some(Bar::Candle(last)), Some(handle)) =
            (self.store.latest(), self.primaries.candlestick)
        else {
            return Ok(None);
        };

        let candle = self.feed.next_candle(&last, now);
        self.store.append(Bar::Candle(candle))?;
        if let Err(err) = self.renderer.update_series(handle, &Bar::Candle(candle)) {
            self.store.discard_last();
            return Err(ChartError::render(err));
        }

        if self.live_indicators && !self.registry.is_empty() {
            self.recompute_indicators();
        }
        Ok(Some(candle))
    }

    /// Legend for the crosshair position, or for the latest bar when `cursor`
    /// is `None`.
    pub fn legend(&self, cursor: Option<&CrosshairEvent>) -> Legend {
        LegendProjector {
            market: &self.market,
            primaries: &self.primaries,
            store: &self.store,
            registry: &self.registry,
        }
        .project(cursor)
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    pub fn view(&self) -> ChartView {
        self.view
    }

    pub fn snapshot(&self) -> Arc<Series> {
        self.store.snapshot()
    }

    pub fn primaries(&self) -> &PrimarySeries {
        &self.primaries
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SeriesKind, Timeframe};
    use crate::models::IndicatorKind;
    use crate::render::HeadlessRenderer;

    const NOW: i64 = 1_700_000_000;

    fn session(view: ChartView) -> ChartSession<HeadlessRenderer> {
        let mut session = ChartSession::new(HeadlessRenderer::new(), Market::default(), 42);
        session.switch_view(view, NOW).unwrap();
        session
    }

    #[test]
    fn candlestick_view_draws_candles_and_volume() {
        let s = session(ChartView::Candlestick);
        let candles = s.primaries().candlestick.unwrap();
        let volume = s.primaries().volume.unwrap();

        assert_eq!(s.snapshot().len(), CHART.sample.bar_count);
        assert_eq!(
            s.renderer().series_data(candles).unwrap().len(),
            CHART.sample.bar_count
        );
        assert_eq!(
            s.renderer()
                .series_options(volume)
                .unwrap()
                .price_scale_id
                .as_deref(),
            Some("volume")
        );
        assert_eq!(s.renderer().series_count(), 2);
    }

    #[test]
    fn switching_view_tears_indicators_down_before_reload() {
        let mut s = session(ChartView::Candlestick);
        s.add_indicator(IndicatorSpec::sma(20)).unwrap();
        s.add_preset(Preset::Bollinger).unwrap();
        let old_candles = s.primaries().candlestick.unwrap();

        s.switch_view(ChartView::Line, NOW).unwrap();

        assert_eq!(s.indicator_count(), 0);
        assert_eq!(s.renderer().overlay_count(), 0);
        let stats = s.renderer().stats();
        assert_eq!(stats.overlays_removed, stats.overlays_created);

        // Every overlay removal happens before the old price series goes away.
        let journal = s.renderer().journal();
        let last_overlay_removal = journal
            .iter()
            .rposition(|(call, _)| *call == "remove_overlay")
            .unwrap();
        let series_removal = journal
            .iter()
            .position(|entry| *entry == ("remove_series", old_candles))
            .unwrap();
        assert!(last_overlay_removal < series_removal);

        assert_eq!(s.snapshot().kind(), SeriesKind::Values);
        assert!(s.primaries().line.is_some());
        assert_eq!(s.renderer().series_count(), 1);
    }

    #[test]
    fn histogram_view_has_no_price_for_indicators() {
        let mut s = session(ChartView::Histogram);
        assert!(matches!(
            s.add_indicator(IndicatorSpec::sma(5)),
            Err(ChartError::NoData)
        ));
        assert_eq!(s.indicator_count(), 0);
        assert!(s.legend(None).rows.is_empty());
    }

    #[test]
    fn failed_add_leaves_session_usable() {
        let mut s = session(ChartView::Candlestick);
        assert!(matches!(
            s.add_indicator(IndicatorSpec::sma(500)),
            Err(ChartError::Computation { .. })
        ));
        assert!(s.add_indicator(IndicatorSpec::rsi(14)).is_ok());
        assert_eq!(s.indicator_count(), 1);
    }

    #[test]
    fn realtime_view_starts_feed_and_ticks_append() {
        let mut s = session(ChartView::Realtime);
        assert!(s.is_realtime());

        let last = s.snapshot().last_time().unwrap();
        let candle = s.on_tick(NOW).unwrap().unwrap();
        assert!(candle.time > last);

        let handle = s.primaries().candlestick.unwrap();
        assert_eq!(s.snapshot().len(), CHART.sample.bar_count + 1);
        assert_eq!(
            s.renderer().series_data(handle).unwrap().last_time(),
            Some(NOW)
        );

        s.switch_view(ChartView::Candlestick, NOW).unwrap();
        assert!(!s.is_realtime());
        assert_eq!(s.on_tick(NOW + 1).unwrap(), None);
    }

    #[test]
    fn stale_tick_is_skipped_without_side_effects() {
        let mut s = session(ChartView::Realtime);
        let id = s.add_indicator(IndicatorSpec::ema(12)).unwrap();
        let before = s.snapshot();
        let stats = s.renderer().stats();

        let stale = before.last_time().unwrap();
        assert!(matches!(
            s.on_tick(stale),
            Err(ChartError::OutOfOrder { .. })
        ));

        assert_eq!(*s.snapshot(), *before);
        assert_eq!(s.renderer().stats(), stats);
        assert!(s.indicator(id).is_some());

        // The next, properly timed tick still goes through.
        assert!(s.on_tick(NOW).unwrap().is_some());
    }

    #[test]
    fn refused_update_takes_the_bar_back_out() {
        let renderer = HeadlessRenderer::new().reject_updates();
        let mut s = ChartSession::new(renderer, Market::default(), 42);
        s.switch_view(ChartView::Realtime, NOW).unwrap();
        let before = s.snapshot();
        let handle = s.primaries().candlestick.unwrap();

        assert!(matches!(s.on_tick(NOW), Err(ChartError::Render(_))));

        assert_eq!(*s.snapshot(), *before);
        assert_eq!(s.renderer().series_data(handle), Some(&*before));
        assert!(s.is_realtime());
    }

    #[test]
    fn live_indicators_refresh_after_each_tick() {
        let mut s = ChartSession::new(HeadlessRenderer::new(), Market::default(), 7)
            .with_live_indicators(true);
        s.switch_view(ChartView::Realtime, NOW).unwrap();
        s.add_indicator(IndicatorSpec::sma(10)).unwrap();
        s.add_indicator(IndicatorSpec::with_defaults(IndicatorKind::Macd))
            .unwrap();

        s.on_tick(NOW).unwrap();

        let kinds: Vec<IndicatorKind> = s.indicators().map(|i| i.spec.kind).collect();
        assert_eq!(kinds, vec![IndicatorKind::Sma, IndicatorKind::Macd]);
        let sma = s.indicators().next().unwrap();
        assert_eq!(sma.lines[0].points.len(), CHART.sample.bar_count + 1 - 9);
        assert_eq!(sma.lines[0].points.last().unwrap().time, NOW);
        assert_eq!(s.renderer().overlay_count(), 4);
    }

    #[test]
    fn market_change_reloads_with_new_header() {
        let mut s = session(ChartView::Candlestick);
        s.add_preset(Preset::Sma20).unwrap();

        s.set_market(Market::new("ETH/USDT", Timeframe::FifteenMinutes), NOW)
            .unwrap();

        assert_eq!(s.indicator_count(), 0);
        assert_eq!(s.view(), ChartView::Candlestick);
        let snapshot = s.snapshot();
        assert_eq!(snapshot.time_at(1).unwrap() - snapshot.time_at(0).unwrap(), 900);
        assert_eq!(s.legend(None).header, "ETH/USDT, 15m");
    }

    #[test]
    fn legend_follows_cursor_and_latest() {
        let mut s = session(ChartView::Candlestick);
        s.add_preset(Preset::Sma20).unwrap();
        s.add_preset(Preset::Rsi14).unwrap();

        let latest = s.legend(None);
        assert_eq!(latest.rows.len(), 3);
        assert!(latest.rows[0].to_string().starts_with("O:"));

        // Bar 5 is inside both warm-up windows.
        let early = s.snapshot().time_at(5).unwrap();
        let legend = s.legend(Some(&s.renderer().crosshair_at(early)));
        assert_eq!(legend.rows.len(), 1);

        let late = s.snapshot().time_at(50).unwrap();
        let legend = s.legend(Some(&s.renderer().crosshair_at(late)));
        assert_eq!(legend.rows.len(), 3);
        assert!(legend.rows[1].to_string().starts_with("SMA(20): "));
    }

    #[test]
    fn bar_count_override_applies_on_reload() {
        let mut s = ChartSession::new(HeadlessRenderer::new(), Market::default(), 3)
            .with_bar_count(40);
        s.switch_view(ChartView::Line, NOW).unwrap();
        assert_eq!(s.snapshot().len(), 40);
        assert_eq!(s.snapshot().last_time(), Some(NOW - 3600));
    }

    #[test]
    fn line_view_latest_legend_shows_value() {
        let s = session(ChartView::Area);
        let legend = s.legend(None);
        assert_eq!(legend.rows.len(), 1);
        assert!(legend.rows[0].to_string().starts_with("Value: "));
    }
}
