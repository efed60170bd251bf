//! Domain Layer - Core Simulation Types
//!
//! Input series, position state machines, role ranking and run-level
//! accounting. Nothing in this layer performs I/O.

pub mod position;
pub mod roles;
pub mod run_result;
pub mod series;

pub use position::{PairPosition, PairState, TradeTally, TriangularPosition};
pub use roles::{Role, RoleAssignment};
pub use run_result::{ParamSet, RunMetrics, RunResult};
pub use series::{check_all_aligned, DataError, PriceSeries, ReturnSeries};
