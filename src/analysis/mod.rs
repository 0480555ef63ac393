//! Indicator math: pure functions over a price sequence.
//!
//! Every function works in `f64` end to end and returns its lines aligned to
//! the tail of the input. Rounding belongs to the presentation layer.

pub mod bollinger;
pub mod error;
pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod stochastic;

pub use bollinger::{BollingerBands, bollinger_bands};
pub use error::IndicatorError;
pub use macd::{MacdOutput, macd};
pub use moving_average::{ema, sma};
pub use rsi::rsi;
pub use stochastic::{StochasticOutput, stochastic};
