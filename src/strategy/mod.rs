//! Strategy Layer - Signal Derivation
//!
//! Rolling statistics, spread models and validated parameter sets for the
//! three mean-reversion variants:
//! - pair: single z-score over a two-asset return spread
//! - dual-horizon: near and far z-scores that must agree before entry
//! - triangular: per-bar extremal role ranking over three assets

pub mod params;
pub mod rolling;
pub mod spread;

pub use params::{DualParams, EntryTiming, PairParams, ParamError, TriangularParams};
pub use rolling::{rolling_stats, zscore, RollingStats, ZERO_STDEV};
pub use spread::{linear_spread, return_triplets, DivergenceBar};
