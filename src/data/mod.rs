// Price data: the store, the synthetic generator and the simulated feed
pub mod price_stream;
pub mod sample_data;
pub mod series_store;

// Re-export commonly used types
pub use price_stream::PriceFeed;
pub use sample_data::SampleGenerator;
pub use series_store::SeriesStore;
