//! Spreadlab - Mean-Reversion Spread Backtest and Grid Optimizer
//!
//! Sweeps strategy parameter grids over historical spread series,
//! backtests every combination in parallel, and ranks the survivors.
//!
//! # Modules
//!
//! - `domain`: Core model (series, positions, trade tallies, run results)
//! - `strategy`: Signal derivation (rolling z-scores, spreads, parameters)
//! - `engine`: Simulators, parameter grids, results ranker
//! - `ports`: Trait abstractions (TimeSeriesProvider)
//! - `adapters`: External implementations (CSV data, CLI, report rendering)
//! - `config`: Configuration loading and validation
//! - `application`: Optimization session orchestration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod engine;
pub mod ports;
pub mod strategy;
