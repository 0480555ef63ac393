//! Realtime (simulated) feed configuration

use std::time::Duration;

pub struct RealtimeConfig {
    /// Timer period between two simulated ticks
    pub tick_interval: Duration,
    /// Full width of the uniform move applied to the last close on each tick
    pub price_jitter: f64,
    /// Maximum wick added above/below the body of a tick candle
    pub wick_jitter: f64,
    /// Refresh active indicators (remove + re-add) after every accepted tick
    pub recompute_indicators_on_tick: bool,
}

pub const REALTIME: RealtimeConfig = RealtimeConfig {
    tick_interval: Duration::from_secs(1),
    price_jitter: 100.0,
    wick_jitter: 50.0,
    recompute_indicators_on_tick: false,
};
