pub mod session;
pub mod ticker;

// Re-export key components
pub use session::ChartSession;
pub use ticker::{TickerSummary, run_realtime};
