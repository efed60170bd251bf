//! Optimization Session
//!
//! Wires config, market data, grid search, and ranking into one run per
//! strategy variant: fetch each instrument once, derive returns and the
//! signal series, sweep the grid in parallel, rank the survivors.

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::loader::{Config, ConfigError};
use crate::domain::run_result::RunResult;
use crate::domain::series::{DataError, ReturnSeries};
use crate::engine::grid::{search_dual, search_pair, search_triangular};
use crate::ports::market_data::{MarketDataError, TimeSeriesProvider};
use crate::strategy::params::{DualParams, PairParams, ParamError, TriangularParams};
use crate::strategy::spread::{linear_spread, return_triplets};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Params(#[from] ParamError),
}

/// One optimization run over one data set.
pub struct OptimizationSession<D> {
    provider: D,
    config: Config,
}

impl<D: TimeSeriesProvider> OptimizationSession<D> {
    pub fn new(provider: D, config: Config) -> Self {
        Self { provider, config }
    }

    async fn fetch_returns(&self, instrument: &str) -> Result<ReturnSeries, SessionError> {
        let series = self
            .provider
            .fetch(
                instrument,
                self.config.data.timeframe,
                self.config.data.bar_count,
            )
            .await?;
        debug!(instrument, bars = series.len(), "fetched series");
        Ok(series.returns()?)
    }

    /// Run the two-asset z-score sweep and return the ranked table.
    pub async fn run_pair(&self) -> Result<Vec<RunResult<PairParams>>, SessionError> {
        let section = self.config.pair()?;
        let grid = section.grid()?;

        let long_leg = self.fetch_returns(&section.instruments[0]).await?;
        let short_leg = self.fetch_returns(&section.instruments[1]).await?;
        let spread = linear_spread(&long_leg, &short_leg)?;

        let started = Instant::now();
        let results = search_pair(&spread, &grid, self.config.simulation.entry_timing);
        let ranked = section.ranking.rank(results);
        info!(
            combinations = grid.len(),
            bars = spread.len(),
            kept = ranked.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pair sweep complete"
        );
        Ok(ranked)
    }

    /// Run the dual-horizon sweep and return the ranked table.
    pub async fn run_dual(&self) -> Result<Vec<RunResult<DualParams>>, SessionError> {
        let section = self.config.dual()?;
        let grid = section.grid()?;

        let long_leg = self.fetch_returns(&section.instruments[0]).await?;
        let short_leg = self.fetch_returns(&section.instruments[1]).await?;
        let spread = linear_spread(&long_leg, &short_leg)?;

        let started = Instant::now();
        let results = search_dual(&spread, &grid, self.config.simulation.entry_timing);
        let ranked = section.ranking.rank(results);
        info!(
            combinations = grid.len(),
            bars = spread.len(),
            kept = ranked.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dual sweep complete"
        );
        Ok(ranked)
    }

    /// Run the triangular divergence sweep and return the ranked table.
    pub async fn run_triangular(
        &self,
    ) -> Result<Vec<RunResult<TriangularParams>>, SessionError> {
        let section = self.config.triangular()?;
        let grid = section.grid()?;

        let first = self.fetch_returns(&section.instruments[0]).await?;
        let second = self.fetch_returns(&section.instruments[1]).await?;
        let third = self.fetch_returns(&section.instruments[2]).await?;
        let bars = return_triplets([&first, &second, &third])?;

        let started = Instant::now();
        let results = search_triangular(&bars, &grid, self.config.simulation.entry_timing);
        let ranked = section.ranking.rank(results);
        info!(
            combinations = grid.len(),
            bars = bars.len(),
            kept = ranked.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "triangular sweep complete"
        );
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::PriceSeries;
    use crate::ports::mocks::StaticProvider;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn series_from_returns(instrument: &str, returns: &[f64]) -> PriceSeries {
        let mut closes = vec![100.0];
        for r in returns {
            let last = *closes.last().unwrap();
            closes.push(last * (1.0 + r));
        }
        let timestamps = (0..closes.len() as i64)
            .map(|i| Utc.timestamp_opt(1_700_000_000 + i * 3600, 0).unwrap())
            .collect();
        PriceSeries::new(instrument.to_string(), timestamps, closes).unwrap()
    }

    fn config(body: &str) -> Config {
        let config: Config = toml::from_str(body).unwrap();
        config.validate().unwrap();
        config
    }

    const PAIR_CONFIG: &str = r#"
        [data]
        csv_dir = "unused"
        bar_count = 100

        [pair]
        instruments = ["alpha", "beta"]
        entry_z = { start = 0.5, stop = 0.6, step = 0.5 }
        exit_threshold = { start = 0.015, stop = 0.016, step = 0.01 }
        stop_loss = { start = 0.015, stop = 0.016, step = 0.01 }
        windows = [2]

        [pair.ranking]
        trade_floor = 0
        top_k = 5
    "#;

    #[tokio::test]
    async fn test_pair_session_end_to_end() {
        // beta is flat, so the spread equals alpha's returns: the
        // alternating fixture whose single-combination sweep realizes one
        // 2% winner and discards a second open trade.
        let provider = StaticProvider::new()
            .with_series(series_from_returns(
                "alpha",
                &[0.01, -0.01, 0.02, -0.02, 0.01, -0.01],
            ))
            .with_series(series_from_returns("beta", &[0.0; 6]));

        let session = OptimizationSession::new(provider, config(PAIR_CONFIG));
        let ranked = session.run_pair().await.unwrap();

        assert_eq!(ranked.len(), 1);
        let row = &ranked[0];
        assert_eq!(row.metrics.trade_count, 2);
        assert_relative_eq!(row.metrics.final_return_pct, 2.0, epsilon = 1e-9);
        assert_relative_eq!(row.metrics.win_rate_pct, 50.0, epsilon = 1e-9);
    }

    #[tokio::test]
    async fn test_missing_section_surfaces_config_error() {
        let provider = StaticProvider::new();
        let session = OptimizationSession::new(provider, config(PAIR_CONFIG));
        let err = session.run_dual().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Config(ConfigError::MissingSection("dual"))
        ));
    }

    #[tokio::test]
    async fn test_misaligned_series_surface_data_error() {
        let provider = StaticProvider::new()
            .with_series(series_from_returns("alpha", &[0.01, -0.01, 0.02]))
            .with_series(series_from_returns("beta", &[0.0; 6]));

        let session = OptimizationSession::new(provider, config(PAIR_CONFIG));
        let err = session.run_pair().await.unwrap_err();
        assert!(matches!(err, SessionError::Data(_)));
    }

    #[tokio::test]
    async fn test_unknown_instrument_surfaces_market_data_error() {
        let provider = StaticProvider::new();
        let session = OptimizationSession::new(provider, config(PAIR_CONFIG));
        let err = session.run_pair().await.unwrap_err();
        assert!(matches!(err, SessionError::MarketData(_)));
    }
}
