//! Configuration Loader
//!
//! Loads and validates optimizer configuration from TOML. Each strategy
//! variant has its own optional section; a run only needs the section of
//! the variant it executes. Ranking tables default to the variant's preset
//! when omitted.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::engine::grid::{DualGrid, PairGrid, TriangularGrid, ValueRange};
use crate::engine::ranker::RankerConfig;
use crate::ports::market_data::Timeframe;
use crate::strategy::params::{EntryTiming, ParamError};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Config has no [{0}] section")]
    MissingSection(&'static str),
}

/// Top-level optimizer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataSection,
    #[serde(default)]
    pub simulation: SimulationSection,
    pub pair: Option<PairSection>,
    pub dual: Option<DualSection>,
    pub triangular: Option<TriangularSection>,
}

/// Where historical bars come from.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSection {
    /// Directory of `<instrument>_<timeframe>.csv` files
    pub csv_dir: String,
    #[serde(default)]
    pub timeframe: Timeframe,
    /// Most recent bars to keep per instrument
    pub bar_count: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulationSection {
    /// When a fresh trade starts accruing PnL
    #[serde(default)]
    pub entry_timing: EntryTiming,
}

/// Two-asset z-score grid section.
#[derive(Debug, Clone, Deserialize)]
pub struct PairSection {
    /// Exactly two instruments: long leg, short leg
    pub instruments: Vec<String>,
    pub entry_z: ValueRange,
    pub exit_threshold: ValueRange,
    pub stop_loss: ValueRange,
    pub windows: Vec<usize>,
    #[serde(default = "RankerConfig::pair")]
    pub ranking: RankerConfig,
}

impl PairSection {
    pub fn grid(&self) -> Result<PairGrid, ParamError> {
        PairGrid::new(
            self.entry_z.expand(),
            self.exit_threshold.expand(),
            self.stop_loss.expand(),
            self.windows.clone(),
        )
    }
}

/// Dual-horizon grid section.
#[derive(Debug, Clone, Deserialize)]
pub struct DualSection {
    pub instruments: Vec<String>,
    pub entry_z_near: ValueRange,
    pub entry_z_far: ValueRange,
    pub exit_threshold: ValueRange,
    pub stop_loss: ValueRange,
    pub windows_near: Vec<usize>,
    pub windows_far: Vec<usize>,
    #[serde(default = "RankerConfig::dual")]
    pub ranking: RankerConfig,
}

impl DualSection {
    pub fn grid(&self) -> Result<DualGrid, ParamError> {
        DualGrid::new(
            self.entry_z_near.expand(),
            self.entry_z_far.expand(),
            self.exit_threshold.expand(),
            self.stop_loss.expand(),
            self.windows_near.clone(),
            self.windows_far.clone(),
        )
    }
}

/// Triangular divergence grid section. Threshold axes are in percent.
#[derive(Debug, Clone, Deserialize)]
pub struct TriangularSection {
    /// Exactly three instruments forming the triangle
    pub instruments: Vec<String>,
    pub exit_pct: ValueRange,
    pub stop_loss_pct: ValueRange,
    pub ratio: ValueRange,
    #[serde(default = "RankerConfig::triangular")]
    pub ranking: RankerConfig,
}

impl TriangularSection {
    pub fn grid(&self) -> Result<TriangularGrid, ParamError> {
        TriangularGrid::new(
            self.exit_pct.expand(),
            self.stop_loss_pct.expand(),
            self.ratio.expand(),
        )
    }
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

fn check_instruments(section: &str, instruments: &[String], expected: usize) -> Result<(), ConfigError> {
    if instruments.len() != expected {
        return Err(ConfigError::ValidationError(format!(
            "[{section}] needs exactly {expected} instruments, got {}",
            instruments.len()
        )));
    }
    if instruments.iter().any(|name| name.trim().is_empty()) {
        return Err(ConfigError::ValidationError(format!(
            "[{section}] has an empty instrument name"
        )));
    }
    Ok(())
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.csv_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "csv_dir cannot be empty".to_string(),
            ));
        }
        if self.data.bar_count == 0 {
            return Err(ConfigError::ValidationError(
                "bar_count must be > 0".to_string(),
            ));
        }

        if let Some(pair) = &self.pair {
            check_instruments("pair", &pair.instruments, 2)?;
            pair.grid()
                .map_err(|e| ConfigError::ValidationError(format!("[pair] {e}")))?;
        }
        if let Some(dual) = &self.dual {
            check_instruments("dual", &dual.instruments, 2)?;
            dual.grid()
                .map_err(|e| ConfigError::ValidationError(format!("[dual] {e}")))?;
        }
        if let Some(triangular) = &self.triangular {
            check_instruments("triangular", &triangular.instruments, 3)?;
            triangular
                .grid()
                .map_err(|e| ConfigError::ValidationError(format!("[triangular] {e}")))?;
        }

        Ok(())
    }

    pub fn pair(&self) -> Result<&PairSection, ConfigError> {
        self.pair.as_ref().ok_or(ConfigError::MissingSection("pair"))
    }

    pub fn dual(&self) -> Result<&DualSection, ConfigError> {
        self.dual.as_ref().ok_or(ConfigError::MissingSection("dual"))
    }

    pub fn triangular(&self) -> Result<&TriangularSection, ConfigError> {
        self.triangular
            .as_ref()
            .ok_or(ConfigError::MissingSection("triangular"))
    }
}
