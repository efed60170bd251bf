//! In-memory providers for tests, recording calls and serving canned
//! series per instrument.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::series::PriceSeries;
use crate::ports::market_data::{MarketDataError, TimeSeriesProvider, Timeframe};

/// Serves pre-loaded series and records every fetch.
#[derive(Debug, Default)]
pub struct StaticProvider {
    calls: Arc<Mutex<Vec<String>>>,
    series: HashMap<String, PriceSeries>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: serve `series` for its instrument name.
    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.series.insert(series.instrument().to_string(), series);
        self
    }

    /// Instruments fetched so far, in call order.
    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl TimeSeriesProvider for StaticProvider {
    async fn fetch(
        &self,
        instrument: &str,
        _timeframe: Timeframe,
        bar_count: usize,
    ) -> Result<PriceSeries, MarketDataError> {
        self.calls
            .lock()
            .expect("mock lock poisoned")
            .push(instrument.to_string());

        let series = self
            .series
            .get(instrument)
            .ok_or_else(|| MarketDataError::Unavailable(instrument.to_string()))?;

        if series.is_empty() || bar_count == 0 {
            return Err(MarketDataError::Unavailable(instrument.to_string()));
        }
        Ok(series.clone())
    }
}
