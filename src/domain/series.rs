//! Price and Return Series
//!
//! Immutable, timestamp-indexed input series. Construction validates the
//! invariants the simulation core relies on (strictly increasing timestamps,
//! non-empty data, cross-instrument alignment) so every failure happens
//! before a single bar is simulated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input data errors. All of these fail fast, before any simulation starts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no data available for instrument '{0}'")]
    Unavailable(String),

    #[error("instrument '{instrument}' has {closes} closes but {timestamps} timestamps")]
    LengthMismatch {
        instrument: String,
        closes: usize,
        timestamps: usize,
    },

    #[error("timestamps for instrument '{0}' are not strictly increasing at index {1}")]
    NonMonotonicTimestamps(String, usize),

    #[error("series '{a}' and '{b}' are not aligned (differing timestamps)")]
    Misaligned { a: String, b: String },

    #[error("instrument '{instrument}' has {len} bars, need at least {min}")]
    TooShort {
        instrument: String,
        len: usize,
        min: usize,
    },
}

/// An ordered close-price series for one instrument, immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    instrument: String,
    timestamps: Vec<DateTime<Utc>>,
    closes: Vec<f64>,
}

impl PriceSeries {
    /// Build a validated price series.
    ///
    /// Fails when the series is empty, lengths differ, or timestamps are not
    /// strictly increasing.
    pub fn new(
        instrument: impl Into<String>,
        timestamps: Vec<DateTime<Utc>>,
        closes: Vec<f64>,
    ) -> Result<Self, DataError> {
        let instrument = instrument.into();

        if closes.is_empty() {
            return Err(DataError::Unavailable(instrument));
        }
        if closes.len() != timestamps.len() {
            return Err(DataError::LengthMismatch {
                instrument,
                closes: closes.len(),
                timestamps: timestamps.len(),
            });
        }
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(DataError::NonMonotonicTimestamps(instrument, i));
            }
        }

        Ok(Self {
            instrument,
            timestamps,
            closes,
        })
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Percentage-change returns. Length is `len() - 1`; the timestamp of
    /// each return is the bar it closes on.
    pub fn returns(&self) -> Result<ReturnSeries, DataError> {
        if self.closes.len() < 2 {
            return Err(DataError::TooShort {
                instrument: self.instrument.clone(),
                len: self.closes.len(),
                min: 2,
            });
        }

        let values = self
            .closes
            .windows(2)
            .map(|w| (w[1] - w[0]) / w[0])
            .collect();

        Ok(ReturnSeries {
            instrument: self.instrument.clone(),
            timestamps: self.timestamps[1..].to_vec(),
            values,
        })
    }
}

/// Per-bar percentage returns derived from a [`PriceSeries`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnSeries {
    instrument: String,
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl ReturnSeries {
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Check that two return series share identical timestamps.
    pub fn check_aligned(&self, other: &ReturnSeries) -> Result<(), DataError> {
        if self.timestamps != other.timestamps {
            return Err(DataError::Misaligned {
                a: self.instrument.clone(),
                b: other.instrument.clone(),
            });
        }
        Ok(())
    }
}

/// Verify pairwise alignment of a set of return series.
pub fn check_all_aligned(series: &[&ReturnSeries]) -> Result<(), DataError> {
    for pair in series.windows(2) {
        pair[0].check_aligned(pair[1])?;
    }
    Ok(())
}
