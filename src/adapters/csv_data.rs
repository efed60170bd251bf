//! CSV Market Data Adapter
//!
//! Reads historical close series from flat CSV files named
//! `<instrument>_<timeframe>.csv` under a data directory. Each row is
//! `unix_seconds,close`; a single non-numeric header row is tolerated.
//! Only the most recent `bar_count` rows are kept.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::series::PriceSeries;
use crate::ports::market_data::{MarketDataError, TimeSeriesProvider, Timeframe};

pub struct CsvBarProvider {
    dir: PathBuf,
}

impl CsvBarProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_path(&self, instrument: &str, timeframe: Timeframe) -> PathBuf {
        self.dir
            .join(format!("{}_{}.csv", instrument, timeframe.as_suffix()))
    }
}

fn parse_row(
    row: &str,
    path: &Path,
    line: usize,
) -> Result<(DateTime<Utc>, f64), MarketDataError> {
    let parse_err = |reason: String| MarketDataError::Parse {
        path: path.display().to_string(),
        line,
        reason,
    };

    let (ts_field, close_field) = row
        .split_once(',')
        .ok_or_else(|| parse_err("expected `unix_seconds,close`".to_string()))?;

    let unix_seconds: i64 = ts_field
        .trim()
        .parse()
        .map_err(|e| parse_err(format!("bad timestamp `{}`: {e}", ts_field.trim())))?;
    let timestamp = Utc
        .timestamp_opt(unix_seconds, 0)
        .single()
        .ok_or_else(|| parse_err(format!("timestamp {unix_seconds} out of range")))?;

    let close: f64 = close_field
        .trim()
        .parse()
        .map_err(|e| parse_err(format!("bad close `{}`: {e}", close_field.trim())))?;

    Ok((timestamp, close))
}

#[async_trait]
impl TimeSeriesProvider for CsvBarProvider {
    async fn fetch(
        &self,
        instrument: &str,
        timeframe: Timeframe,
        bar_count: usize,
    ) -> Result<PriceSeries, MarketDataError> {
        let path = self.file_path(instrument, timeframe);

        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MarketDataError::Unavailable(instrument.to_string())
            } else {
                MarketDataError::Io {
                    path: path.display().to_string(),
                    source: e,
                }
            }
        })?;

        let mut timestamps = Vec::new();
        let mut closes = Vec::new();
        for (i, row) in raw.lines().enumerate() {
            let row = row.trim();
            if row.is_empty() {
                continue;
            }
            match parse_row(row, &path, i + 1) {
                Ok((timestamp, close)) => {
                    timestamps.push(timestamp);
                    closes.push(close);
                }
                // Tolerate one header row at the top of the file.
                Err(_) if i == 0 => continue,
                Err(e) => return Err(e),
            }
        }

        if timestamps.is_empty() {
            return Err(MarketDataError::Unavailable(instrument.to_string()));
        }

        // Keep the most recent bars only.
        if bar_count > 0 && timestamps.len() > bar_count {
            let skip = timestamps.len() - bar_count;
            timestamps.drain(..skip);
            closes.drain(..skip);
        }

        PriceSeries::new(instrument.to_string(), timestamps, closes).map_err(|e| {
            MarketDataError::Parse {
                path: path.display().to_string(),
                line: 0,
                reason: e.to_string(),
            }
        })
    }
}
