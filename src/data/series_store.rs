use std::sync::Arc;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::domain::{Bar, Series, SeriesKind};
use crate::error::ChartError;

/// Holds the one price series the chart is showing.
///
/// The series lives behind an `Arc`: a snapshot is a cheap clone of the
/// pointer, and `append` copies on write if a snapshot is still alive, so
/// indicator math never sees a series change under it.
#[derive(Debug, Clone)]
pub struct SeriesStore {
    series: Arc<Series>,
}

impl SeriesStore {
    pub fn new(kind: SeriesKind) -> Self {
        Self {
            series: Arc::new(Series::empty(kind)),
        }
    }

    /// Full reset. `teardown` runs after `series` is validated and before the
    /// swap, so anything derived from the old series is gone before the new
    /// one becomes visible. A rejected series leaves the store untouched and
    /// does not run the hook.
    pub fn replace<F>(&mut self, series: Series, teardown: F) -> Result<(), ChartError>
    where
        F: FnOnce(),
    {
        series.validate()?;
        teardown();
        log::info!("Loaded {} {} bar(s)", series.len(), series.kind());
        self.series = Arc::new(series);
        Ok(())
    }

    /// Realtime append. Rejects a bar that is not strictly newer than the
    /// current last bar and leaves the series unchanged.
    pub fn append(&mut self, bar: Bar) -> Result<(), ChartError> {
        let time = bar.time();
        match Arc::make_mut(&mut self.series).push(bar) {
            Err(err @ ChartError::OutOfOrder { last, .. }) => {
                log::warn!("Skipping out of order bar at {time} (last bar at {last})");
                Err(err)
            }
            Err(err) => Err(err),
            Ok(()) => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_realtime_ticks {
                    log::info!(
                        "Appended bar at {time} ({:?})",
                        self.series.last().and_then(|b| b.price())
                    );
                }
                Ok(())
            }
        }
    }

    /// Drops the newest bar, undoing an `append` the chart could not draw.
    pub fn discard_last(&mut self) -> Option<Bar> {
        Arc::make_mut(&mut self.series).pop()
    }

    pub fn latest(&self) -> Option<Bar> {
        self.series.last()
    }

    /// Read-only view of the series as it is now. Later appends do not show
    /// through it.
    pub fn snapshot(&self) -> Arc<Series> {
        Arc::clone(&self.series)
    }

    pub fn kind(&self) -> SeriesKind {
        self.series.kind()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl Default for SeriesStore {
    fn default() -> Self {
        Self::new(SeriesKind::Candles)
    }
}
