//! Simulation, grid search, and ranking.

pub mod grid;
pub mod ranker;
pub mod simulator;

pub use grid::{
    search_dual, search_pair, search_triangular, DualGrid, PairGrid, TriangularGrid, ValueRange,
    WindowRange,
};
pub use ranker::{RankMetric, RankerConfig};
pub use simulator::{simulate_dual, simulate_pair, simulate_triangular};
