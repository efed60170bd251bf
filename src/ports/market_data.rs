//! Market data port: the one async seam between the batch engine and the
//! outside world. An optimization session fetches each instrument's series
//! once through this trait before any simulation starts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::series::PriceSeries;

/// Market data errors.
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("instrument `{0}` unavailable or returned no bars")]
    Unavailable(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed bar data in {path} at line {line}: {reason}")]
    Parse {
        path: String,
        line: usize,
        reason: String,
    },
}

/// Bar timeframe of a fetched series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    M15,
    #[default]
    H1,
    D1,
}

impl Timeframe {
    /// Suffix used in data file names, e.g. `eurusd_h1.csv`.
    pub fn as_suffix(&self) -> &'static str {
        match self {
            Timeframe::M15 => "m15",
            Timeframe::H1 => "h1",
            Timeframe::D1 => "d1",
        }
    }
}

/// Provider of historical close series.
#[async_trait]
pub trait TimeSeriesProvider: Send + Sync {
    /// Fetch up to `bar_count` most recent closes for one instrument.
    async fn fetch(
        &self,
        instrument: &str,
        timeframe: Timeframe,
        bar_count: usize,
    ) -> Result<PriceSeries, MarketDataError>;
}
