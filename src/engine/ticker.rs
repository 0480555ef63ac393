use std::future::Future;

use serde::Serialize;
use tokio::time::{self, MissedTickBehavior};

use crate::config::REALTIME;
use crate::error::ChartError;
use crate::render::ChartRenderer;

use super::session::ChartSession;

/// What a realtime run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickerSummary {
    pub ticks: usize,
    pub accepted: usize,
    pub skipped: usize,
}

/// Drives the session's realtime feed on a fixed interval.
///
/// The session is borrowed for the whole run, so this task is its only
/// writer. The loop ends when the feed is stopped, `max_ticks` firings have
/// happened, or `shutdown` resolves. A failed tick is logged and skipped;
/// the timer keeps running.
pub async fn run_realtime<R, C, S>(
    session: &mut ChartSession<R>,
    mut clock: C,
    max_ticks: Option<usize>,
    shutdown: S,
) -> TickerSummary
where
    R: ChartRenderer,
    C: FnMut() -> i64,
    S: Future<Output = ()>,
{
    let mut summary = TickerSummary::default();
    let mut interval = time::interval(REALTIME.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the feed fires one period later.
    interval.tick().await;

    tokio::pin!(shutdown);

    while session.is_realtime() && max_ticks.is_none_or(|max| summary.ticks < max) {
        tokio::select! {
            _ = &mut shutdown => {
                log::info!("Realtime ticker shutting down");
                break;
            }
            _ = interval.tick() => {
                summary.ticks += 1;
                match session.on_tick(clock()) {
                    Ok(Some(_)) => summary.accepted += 1,
                    Ok(None) => {}
                    // Already logged by the store.
                    Err(ChartError::OutOfOrder { .. }) => summary.skipped += 1,
                    Err(err) => {
                        log::error!("Realtime tick failed: {err}");
                        summary.skipped += 1;
                    }
                }
            }
        }
    }

    log::info!(
        "Realtime run finished: {} tick(s), {} accepted, {} skipped",
        summary.ticks,
        summary.accepted,
        summary.skipped
    );
    summary
}
