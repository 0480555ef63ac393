// Domain types and value objects
pub mod bar;
pub mod candle;
pub mod market;
pub mod series;
pub mod view;

// Re-export commonly used types
pub use bar::{Bar, HistogramBar, Point, ValueBar};
pub use candle::{Candle, CandleType};
pub use market::{Market, Timeframe};
pub use series::{Series, SeriesKind};
pub use view::ChartView;
