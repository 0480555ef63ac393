//! In-memory renderer: keeps whatever the session hands it and counts calls.
//! Used by the CLI and by every session test.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use serde::Serialize;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::domain::{Bar, Point, Series, SeriesKind};

use super::{
    ChartRenderer, CrosshairEvent, OverlayOptions, PrimaryKind, SeriesHandle, SeriesOptions,
    SeriesValue,
};

/// Call counters, for asserting that nothing leaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    pub series_created: usize,
    pub series_removed: usize,
    pub overlays_created: usize,
    pub overlays_removed: usize,
    pub data_sets: usize,
    pub updates: usize,
}

#[derive(Debug, Clone)]
struct PrimaryEntry {
    options: SeriesOptions,
    data: Series,
}

#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    next_handle: u64,
    series: HashMap<SeriesHandle, PrimaryEntry>,
    overlays: HashMap<SeriesHandle, Vec<Point>>,
    stats: RenderStats,
    /// Remaining overlay creations before the renderer starts refusing them.
    overlay_budget: Option<usize>,
    reject_updates: bool,
    journal: Vec<(&'static str, SeriesHandle)>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `create_overlay` after the first `n` successful ones fail.
    pub fn fail_overlay_after(mut self, n: usize) -> Self {
        self.overlay_budget = Some(n);
        self
    }

    /// Makes every `update_series` fail.
    pub fn reject_updates(mut self) -> Self {
        self.reject_updates = true;
        self
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Every call received so far, in order.
    pub fn journal(&self) -> &[(&'static str, SeriesHandle)] {
        &self.journal
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn series_data(&self, handle: SeriesHandle) -> Option<&Series> {
        self.series.get(&handle).map(|entry| &entry.data)
    }

    pub fn series_options(&self, handle: SeriesHandle) -> Option<&SeriesOptions> {
        self.series.get(&handle).map(|entry| &entry.options)
    }

    pub fn overlay_points(&self, handle: SeriesHandle) -> Option<&[Point]> {
        self.overlays.get(&handle).map(Vec::as_slice)
    }

    /// Builds the payload a widget would emit with the cursor over `time`:
    /// every series and overlay holding a point stamped exactly `time`.
    pub fn crosshair_at(&self, time: i64) -> CrosshairEvent {
        let mut values = HashMap::new();

        for (&handle, entry) in &self.series {
            if let Some(bar) = entry
                .data
                .position_of(time)
                .and_then(|idx| entry.data.bar_at(idx))
            {
                values.insert(handle, SeriesValue::from_bar(&bar));
            }
        }

        for (&handle, points) in &self.overlays {
            if let Ok(idx) = points.binary_search_by_key(&time, |p| p.time) {
                values.insert(handle, SeriesValue::Value(points[idx].value));
            }
        }

        CrosshairEvent {
            time: Some(time),
            values,
        }
    }

    fn allocate(&mut self) -> SeriesHandle {
        self.next_handle += 1;
        SeriesHandle(self.next_handle)
    }

    fn trace(&mut self, call: &'static str, handle: SeriesHandle) {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_render_calls {
            log::info!("render: {call} #{}", handle.0);
        }
        self.journal.push((call, handle));
    }
}

impl ChartRenderer for HeadlessRenderer {
    fn create_series(&mut self, options: &SeriesOptions) -> Result<SeriesHandle> {
        let handle = self.allocate();
        let data = match options.kind {
            PrimaryKind::Candlestick => Series::empty(SeriesKind::Candles),
            PrimaryKind::Line | PrimaryKind::Area => Series::empty(SeriesKind::Values),
            PrimaryKind::Volume | PrimaryKind::Histogram => Series::empty(SeriesKind::Histogram),
        };
        self.series.insert(
            handle,
            PrimaryEntry {
                options: options.clone(),
                data,
            },
        );
        self.stats.series_created += 1;
        self.trace("create_series", handle);
        Ok(handle)
    }

    fn remove_series(&mut self, handle: SeriesHandle) {
        if self.series.remove(&handle).is_some() {
            self.stats.series_removed += 1;
            self.trace("remove_series", handle);
        }
    }

    fn set_series_data(&mut self, handle: SeriesHandle, data: &Series) -> Result<()> {
        let entry = self
            .series
            .get_mut(&handle)
            .with_context(|| format!("unknown series handle #{}", handle.0))?;
        entry.data = data.clone();
        self.stats.data_sets += 1;
        self.trace("set_series_data", handle);
        Ok(())
    }

    fn update_series(&mut self, handle: SeriesHandle, bar: &Bar) -> Result<()> {
        if self.reject_updates {
            bail!("series #{} refused the update", handle.0);
        }
        let entry = self
            .series
            .get_mut(&handle)
            .with_context(|| format!("unknown series handle #{}", handle.0))?;

        // Same time replaces the last bar; a newer one appends.
        if entry.data.last_time() == Some(bar.time()) {
            let mut bars: Vec<Bar> = (0..entry.data.len())
                .filter_map(|i| entry.data.bar_at(i))
                .collect();
            bars.pop();
            bars.push(bar.clone());
            let mut rebuilt = Series::empty(entry.data.kind());
            for b in bars {
                rebuilt.push(b)?;
            }
            entry.data = rebuilt;
        } else {
            entry.data.push(bar.clone())?;
        }

        self.stats.updates += 1;
        self.trace("update_series", handle);
        Ok(())
    }

    fn create_overlay(&mut self, options: &OverlayOptions) -> Result<SeriesHandle> {
        if let Some(budget) = self.overlay_budget.as_mut() {
            if *budget == 0 {
                bail!("overlay limit reached while creating `{}`", options.title);
            }
            *budget -= 1;
        }

        let handle = self.allocate();
        self.overlays.insert(handle, Vec::new());
        self.stats.overlays_created += 1;
        self.trace("create_overlay", handle);
        Ok(handle)
    }

    fn remove_overlay(&mut self, handle: SeriesHandle) {
        if self.overlays.remove(&handle).is_some() {
            self.stats.overlays_removed += 1;
            self.trace("remove_overlay", handle);
        }
    }

    fn set_overlay_data(&mut self, handle: SeriesHandle, points: &[Point]) -> Result<()> {
        let stored = self
            .overlays
            .get_mut(&handle)
            .with_context(|| format!("unknown overlay handle #{}", handle.0))?;
        *stored = points.to_vec();
        self.stats.data_sets += 1;
        self.trace("set_overlay_data", handle);
        Ok(())
    }
}
