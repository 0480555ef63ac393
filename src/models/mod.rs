// Indicator bookkeeping and the legend built on top of it
// Pure state: no rendering happens here, only calls through ChartRenderer

pub mod indicator;
pub mod legend;
pub mod registry;

// Re-export key types for convenience
pub use indicator::{
    IndicatorId, IndicatorInstance, IndicatorKind, IndicatorParams, IndicatorSpec, LineSpec,
    OverlayLine, Preset,
};
pub use legend::{Legend, LegendProjector, LegendRow};
pub use registry::IndicatorRegistry;
