//! Configuration module for the tickboard chart session.

pub mod chart;
pub mod indicators;
pub mod realtime;

mod debug; // Private: use crate::config::DEBUG_FLAGS, not crate::config::debug::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

// Re-export commonly used items
pub use chart::{CHART, ChartConfig};
pub use indicators::{INDICATORS, IndicatorDefaults};
pub use realtime::{REALTIME, RealtimeConfig};
