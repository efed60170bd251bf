//! Ports Layer - trait definitions for external dependencies
//!
//! The engine is pure and synchronous; the only external dependency is
//! historical market data, abstracted behind [`TimeSeriesProvider`].
//! Adapters implement the trait; tests use the in-memory mock.

pub mod market_data;
pub mod mocks;

pub use market_data::{MarketDataError, TimeSeriesProvider, Timeframe};
pub use mocks::StaticProvider;
