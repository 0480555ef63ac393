use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::REALTIME;
use crate::domain::Candle;

/// Simulated live price feed.
///
/// The feed only produces candles; the ticker drives it and the session
/// decides whether a produced candle is accepted.
#[derive(Debug)]
pub struct PriceFeed {
    rng: StdRng,
    active: bool,
}

impl PriceFeed {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            active: false,
        }
    }

    /// Returns `false` if the feed was already running.
    pub fn start(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        log::info!("Realtime feed started");
        true
    }

    /// Returns `false` if the feed was not running.
    pub fn stop(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        log::info!("Realtime feed stopped");
        true
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Next tick candle: opens at the last close, moves the price by a
    /// uniform step and adds a wick on either side of the body.
    pub fn next_candle(&mut self, last: &Candle, now: i64) -> Candle {
        let cfg = &REALTIME;
        let open = last.close;
        let close = open + (self.rng.r#gen::<f64>() - 0.5) * cfg.price_jitter;
        let high = open.max(close) + self.rng.gen_range(0.0..cfg.wick_jitter);
        let low = open.min(close) - self.rng.gen_range(0.0..cfg.wick_jitter);
        Candle::new(now, open, high, low, close)
    }
}
