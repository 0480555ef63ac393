use std::collections::BTreeMap;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::domain::{Point, Series};
use crate::error::ChartError;
use crate::render::{ChartRenderer, SeriesHandle};

use super::indicator::{IndicatorId, IndicatorInstance, IndicatorSpec, OverlayLine};

/// Owns every active indicator and the overlays drawn for it.
///
/// Ids are handed out monotonically and never reused, so iterating the map
/// yields indicators in the order they were added.
#[derive(Debug, Default)]
pub struct IndicatorRegistry {
    instances: BTreeMap<IndicatorId, IndicatorInstance>,
    next_id: u64,
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes `spec` over `snapshot` and draws one overlay per output line.
    ///
    /// All-or-nothing: on any failure nothing is registered and every overlay
    /// created along the way has been removed again.
    pub fn add<R: ChartRenderer + ?Sized>(
        &mut self,
        spec: IndicatorSpec,
        snapshot: &Series,
        renderer: &mut R,
    ) -> Result<IndicatorId, ChartError> {
        spec.validate()?;

        let closes = match snapshot.closes() {
            Some(closes) if !closes.is_empty() => closes,
            _ => {
                log::warn!("No price data available for {spec}");
                return Err(ChartError::NoData);
            }
        };

        let outputs = spec.compute(&closes).map_err(|source| {
            log::error!("Error calculating {spec}: {source}");
            ChartError::Computation {
                kind: spec.kind,
                source,
            }
        })?;

        let times = snapshot.times();
        let lines = spec
            .line_specs()
            .into_iter()
            .zip(outputs)
            .map(|(line, values)| (line, align_to_times(&times, &values)))
            .collect::<Vec<_>>();

        let mut drawn: Vec<OverlayLine> = Vec::with_capacity(lines.len());
        for (line, points) in lines {
            let created = renderer.create_overlay(&line.options).and_then(|handle| {
                match renderer.set_overlay_data(handle, &points) {
                    Ok(()) => Ok(handle),
                    Err(err) => {
                        renderer.remove_overlay(handle);
                        Err(err)
                    }
                }
            });

            match created {
                Ok(handle) => drawn.push(OverlayLine {
                    handle,
                    label: line.label,
                    color: line.color,
                    precision: line.precision,
                    points,
                }),
                Err(err) => {
                    log::error!("Error drawing {spec}: {err:#}");
                    for done in &drawn {
                        renderer.remove_overlay(done.handle);
                    }
                    return Err(ChartError::render(err));
                }
            }
        }

        self.next_id += 1;
        let id = IndicatorId::new(self.next_id);

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_indicator_events {
            let handles: Vec<SeriesHandle> = drawn.iter().map(|l| l.handle).collect();
            log::info!(
                "Added {spec} as {id}: {} line(s), handles {:?}, {} point(s) each",
                drawn.len(),
                handles,
                drawn.first().map(|l| l.points.len()).unwrap_or_default()
            );
        }

        self.instances.insert(
            id,
            IndicatorInstance {
                id,
                spec,
                lines: drawn,
            },
        );
        Ok(id)
    }

    /// Removes the indicator and all of its overlays. Unknown ids are a
    /// logged no-op and return `false`.
    pub fn remove<R: ChartRenderer + ?Sized>(&mut self, id: IndicatorId, renderer: &mut R) -> bool {
        let Some(instance) = self.instances.remove(&id) else {
            log::warn!("Indicator {id} not found");
            return false;
        };

        for handle in instance.handles() {
            renderer.remove_overlay(handle);
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_indicator_events {
            log::info!("Removed {} ({id})", instance.spec);
        }
        true
    }

    /// Removes every indicator. Returns how many were removed.
    pub fn clear<R: ChartRenderer + ?Sized>(&mut self, renderer: &mut R) -> usize {
        // Snapshot the ids so removal never walks a map it is mutating.
        let mut removed = 0;
        for id in self.ids() {
            if self.remove(id, renderer) {
                removed += 1;
            }
        }
        if removed > 0 {
            log::info!("Cleared {removed} indicator(s)");
        }
        removed
    }

    pub fn get(&self, id: IndicatorId) -> Option<&IndicatorInstance> {
        self.instances.get(&id)
    }

    /// Like [`get`](Self::get) but reports the miss as an error.
    pub fn require(&self, id: IndicatorId) -> Result<&IndicatorInstance, ChartError> {
        self.get(id).ok_or(ChartError::NotFound(id))
    }

    /// Active indicators in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &IndicatorInstance> {
        self.instances.values()
    }

    pub fn ids(&self) -> Vec<IndicatorId> {
        self.instances.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Finds the overlay line behind a renderer handle.
    pub fn line_for(&self, handle: SeriesHandle) -> Option<&OverlayLine> {
        self.all().find_map(|instance| instance.line_for(handle))
    }
}

/// Pairs an output line with the times of the bars it ends on. The line is
/// shorter than the input by its warm-up, so it aligns with the tail.
fn align_to_times(times: &[i64], values: &[f64]) -> Vec<Point> {
    let offset = times.len().saturating_sub(values.len());
    times[offset..]
        .iter()
        .zip(values)
        .map(|(&time, &value)| Point { time, value })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candle, HistogramBar, ValueBar};
    use crate::models::indicator::{IndicatorKind, Preset};
    use crate::render::HeadlessRenderer;

    fn candles(closes: &[f64]) -> Series {
        Series::Candles(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| Candle::new(1_000 + i as i64 * 60, c, c + 1.0, c - 1.0, c))
                .collect(),
        )
    }

    fn ramp(n: usize) -> Series {
        let closes: Vec<f64> = (0..n).map(|i| 50_000.0 + 10.0 * i as f64).collect();
        candles(&closes)
    }

    #[test]
    fn sma_overlay_is_tail_aligned() {
        let snapshot = ramp(30);
        let mut renderer = HeadlessRenderer::new();
        let mut registry = IndicatorRegistry::new();

        let id = registry
            .add(IndicatorSpec::sma(20), &snapshot, &mut renderer)
            .unwrap();

        let instance = registry.get(id).unwrap();
        let line = &instance.lines[0];
        assert_eq!(line.points.len(), 11);
        assert_eq!(line.points[0].time, snapshot.time_at(19).unwrap());
        assert_eq!(line.points[0].value, 50_095.0);
        assert_eq!(line.points[10].time, snapshot.last_time().unwrap());
        assert_eq!(renderer.overlay_points(line.handle).unwrap(), line.points.as_slice());
    }

    #[test]
    fn add_then_remove_leaves_no_overlays() {
        let snapshot = ramp(60);
        let mut renderer = HeadlessRenderer::new();
        let mut registry = IndicatorRegistry::new();

        let id = registry
            .add(Preset::Bollinger.spec(), &snapshot, &mut renderer)
            .unwrap();
        assert_eq!(renderer.overlay_count(), 3);

        assert!(registry.remove(id, &mut renderer));
        assert!(registry.is_empty());
        let stats = renderer.stats();
        assert_eq!(stats.overlays_created, stats.overlays_removed);
        assert_eq!(renderer.overlay_count(), 0);

        assert!(!registry.remove(id, &mut renderer));
        assert!(matches!(registry.require(id), Err(ChartError::NotFound(_))));
    }

    #[test]
    fn clear_removes_everything_in_one_pass() {
        let snapshot = ramp(60);
        let mut renderer = HeadlessRenderer::new();
        let mut registry = IndicatorRegistry::new();

        for spec in [
            IndicatorSpec::sma(5),
            IndicatorSpec::ema(10),
            IndicatorSpec::with_defaults(IndicatorKind::Macd),
        ] {
            registry.add(spec, &snapshot, &mut renderer).unwrap();
        }
        assert_eq!(renderer.overlay_count(), 5);

        assert_eq!(registry.clear(&mut renderer), 3);
        assert!(registry.is_empty());
        assert_eq!(renderer.stats().overlays_removed, 5);
        assert_eq!(registry.clear(&mut renderer), 0);
    }

    #[test]
    fn ids_are_unique_and_ordered() {
        let snapshot = ramp(30);
        let mut renderer = HeadlessRenderer::new();
        let mut registry = IndicatorRegistry::new();

        let a = registry.add(IndicatorSpec::sma(5), &snapshot, &mut renderer).unwrap();
        let b = registry.add(IndicatorSpec::sma(5), &snapshot, &mut renderer).unwrap();
        registry.remove(a, &mut renderer);
        let c = registry.add(IndicatorSpec::rsi(14), &snapshot, &mut renderer).unwrap();

        assert_ne!(a, b);
        assert!(c > b);
        let order: Vec<IndicatorId> = registry.all().map(|i| i.id).collect();
        assert_eq!(order, vec![b, c]);
    }

    #[test]
    fn renderer_failure_rolls_back_created_overlays() {
        let snapshot = ramp(60);
        let mut renderer = HeadlessRenderer::new().fail_overlay_after(2);
        let mut registry = IndicatorRegistry::new();

        let err = registry
            .add(Preset::Bollinger.spec(), &snapshot, &mut renderer)
            .unwrap_err();

        assert!(matches!(err, ChartError::Render(_)));
        assert!(registry.is_empty());
        assert_eq!(renderer.overlay_count(), 0);
        assert_eq!(renderer.stats().overlays_removed, 2);
    }

    #[test]
    fn short_snapshot_is_a_computation_error() {
        let mut renderer = HeadlessRenderer::new();
        let mut registry = IndicatorRegistry::new();

        let err = registry
            .add(IndicatorSpec::sma(20), &ramp(10), &mut renderer)
            .unwrap_err();

        assert!(matches!(
            err,
            ChartError::Computation {
                kind: IndicatorKind::Sma,
                ..
            }
        ));
        assert_eq!(renderer.stats().overlays_created, 0);
    }

    #[test]
    fn empty_or_priceless_snapshot_has_no_data() {
        let mut renderer = HeadlessRenderer::new();
        let mut registry = IndicatorRegistry::new();

        let empty = Series::Candles(Vec::new());
        assert!(matches!(
            registry.add(IndicatorSpec::sma(5), &empty, &mut renderer),
            Err(ChartError::NoData)
        ));

        let volume = Series::Histogram(vec![HistogramBar {
            time: 1,
            value: 10.0,
            color: "#26a69a".to_string(),
        }]);
        assert!(matches!(
            registry.add(IndicatorSpec::sma(1), &volume, &mut renderer),
            Err(ChartError::NoData)
        ));
    }

    #[test]
    fn line_series_feed_indicators_too() {
        let snapshot = Series::Values(
            (0..25)
                .map(|i| ValueBar {
                    time: i,
                    value: 100.0 + i as f64,
                })
                .collect(),
        );
        let mut renderer = HeadlessRenderer::new();
        let mut registry = IndicatorRegistry::new();

        let id = registry
            .add(IndicatorSpec::ema(5), &snapshot, &mut renderer)
            .unwrap();
        let handle = registry.get(id).unwrap().lines[0].handle;
        assert_eq!(registry.line_for(handle).unwrap().points.len(), 21);
    }
}
