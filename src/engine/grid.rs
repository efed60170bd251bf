//! Parameter Grid Search
//!
//! Cartesian grids over strategy parameter axes. A grid holds the expanded
//! candidate vector per axis and decodes a flat index into a parameter set
//! on demand, so the cross product is never materialized. Every candidate
//! value is validated at construction; `get` cannot produce a parameter set
//! that `new` would reject.
//!
//! Search dispatches over `0..len()` with rayon. Runs are independent and
//! read-only over the input series, so the collected results are identical
//! regardless of evaluation order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::run_result::RunResult;
use crate::engine::simulator::{simulate_dual, simulate_pair, simulate_triangular};
use crate::strategy::params::{DualParams, EntryTiming, PairParams, ParamError, TriangularParams};

/// A half-open float range `[start, stop)` sampled every `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl ValueRange {
    /// Expand to the candidate vector. Degenerate ranges (non-positive step,
    /// `stop <= start`) expand to nothing; the owning grid reports the
    /// empty axis by name.
    pub fn expand(&self) -> Vec<f64> {
        if self.step <= 0.0 || self.stop <= self.start {
            return Vec::new();
        }
        let count = ((self.stop - self.start) / self.step).ceil() as usize;
        (0..count)
            .map(|i| self.start + i as f64 * self.step)
            .collect()
    }
}

/// A half-open window range `[start, stop)` stepped by `step` bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRange {
    pub start: usize,
    pub stop: usize,
    pub step: usize,
}

impl WindowRange {
    pub fn expand(&self) -> Vec<usize> {
        if self.step == 0 || self.stop <= self.start {
            return Vec::new();
        }
        (self.start..self.stop).step_by(self.step).collect()
    }
}

fn non_empty<T>(axis: &'static str, values: Vec<T>) -> Result<Vec<T>, ParamError> {
    if values.is_empty() {
        return Err(ParamError::EmptyRange(axis));
    }
    Ok(values)
}

/// Grid over the two-asset z-score strategy. Axis order, slowest to
/// fastest: entry, exit, stop, window.
#[derive(Debug, Clone)]
pub struct PairGrid {
    entry_z: Vec<f64>,
    exit_threshold: Vec<f64>,
    stop_loss: Vec<f64>,
    windows: Vec<usize>,
}

impl PairGrid {
    pub fn new(
        entry_z: Vec<f64>,
        exit_threshold: Vec<f64>,
        stop_loss: Vec<f64>,
        windows: Vec<usize>,
    ) -> Result<Self, ParamError> {
        let entry_z = non_empty("entry_z", entry_z)?;
        let exit_threshold = non_empty("exit_threshold", exit_threshold)?;
        let stop_loss = non_empty("stop_loss", stop_loss)?;
        let windows = non_empty("window", windows)?;

        // Each validation rule involves a single axis, so checking every
        // candidate per axis covers every combination.
        for &entry in &entry_z {
            if entry <= 0.0 {
                return Err(ParamError::InvalidEntry(entry));
            }
        }
        for &exit in &exit_threshold {
            if exit <= 0.0 {
                return Err(ParamError::InvalidExit(exit));
            }
        }
        for &stop in &stop_loss {
            if stop <= 0.0 {
                return Err(ParamError::InvalidStopLoss(stop));
            }
        }
        for &window in &windows {
            if window == 0 {
                return Err(ParamError::InvalidWindow(window));
            }
        }

        Ok(Self {
            entry_z,
            exit_threshold,
            stop_loss,
            windows,
        })
    }

    pub fn len(&self) -> usize {
        self.entry_z.len() * self.exit_threshold.len() * self.stop_loss.len() * self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode a flat index into the parameter set at that grid coordinate.
    pub fn get(&self, index: usize) -> PairParams {
        debug_assert!(index < self.len());
        let window = self.windows[index % self.windows.len()];
        let index = index / self.windows.len();
        let stop_loss = self.stop_loss[index % self.stop_loss.len()];
        let index = index / self.stop_loss.len();
        let exit_threshold = self.exit_threshold[index % self.exit_threshold.len()];
        let index = index / self.exit_threshold.len();
        let entry_z = self.entry_z[index];

        PairParams {
            entry_z,
            exit_threshold,
            stop_loss,
            window,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = PairParams> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

/// Grid over the dual-horizon strategy. Window axes are whole candidate
/// lists; construction rejects any near/far pair that would invert.
#[derive(Debug, Clone)]
pub struct DualGrid {
    entry_z_near: Vec<f64>,
    entry_z_far: Vec<f64>,
    exit_threshold: Vec<f64>,
    stop_loss: Vec<f64>,
    windows_near: Vec<usize>,
    windows_far: Vec<usize>,
}

impl DualGrid {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entry_z_near: Vec<f64>,
        entry_z_far: Vec<f64>,
        exit_threshold: Vec<f64>,
        stop_loss: Vec<f64>,
        windows_near: Vec<usize>,
        windows_far: Vec<usize>,
    ) -> Result<Self, ParamError> {
        let entry_z_near = non_empty("entry_z_near", entry_z_near)?;
        let entry_z_far = non_empty("entry_z_far", entry_z_far)?;
        let exit_threshold = non_empty("exit_threshold", exit_threshold)?;
        let stop_loss = non_empty("stop_loss", stop_loss)?;
        let windows_near = non_empty("window_near", windows_near)?;
        let windows_far = non_empty("window_far", windows_far)?;

        for &entry in entry_z_near.iter().chain(entry_z_far.iter()) {
            if entry <= 0.0 {
                return Err(ParamError::InvalidEntry(entry));
            }
        }
        for &exit in &exit_threshold {
            if exit <= 0.0 {
                return Err(ParamError::InvalidExit(exit));
            }
        }
        for &stop in &stop_loss {
            if stop <= 0.0 {
                return Err(ParamError::InvalidStopLoss(stop));
            }
        }
        for &window in &windows_near {
            if window == 0 {
                return Err(ParamError::InvalidWindow(window));
            }
        }

        // Every near candidate must sit strictly below every far candidate.
        let max_near = windows_near.iter().copied().max().unwrap_or(0);
        let min_far = windows_far.iter().copied().min().unwrap_or(0);
        if max_near >= min_far {
            return Err(ParamError::NonMonotonicWindows {
                near: max_near,
                far: min_far,
            });
        }

        Ok(Self {
            entry_z_near,
            entry_z_far,
            exit_threshold,
            stop_loss,
            windows_near,
            windows_far,
        })
    }

    pub fn len(&self) -> usize {
        self.entry_z_near.len()
            * self.entry_z_far.len()
            * self.exit_threshold.len()
            * self.stop_loss.len()
            * self.windows_near.len()
            * self.windows_far.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> DualParams {
        debug_assert!(index < self.len());
        let window_far = self.windows_far[index % self.windows_far.len()];
        let index = index / self.windows_far.len();
        let window_near = self.windows_near[index % self.windows_near.len()];
        let index = index / self.windows_near.len();
        let stop_loss = self.stop_loss[index % self.stop_loss.len()];
        let index = index / self.stop_loss.len();
        let exit_threshold = self.exit_threshold[index % self.exit_threshold.len()];
        let index = index / self.exit_threshold.len();
        let entry_z_far = self.entry_z_far[index % self.entry_z_far.len()];
        let index = index / self.entry_z_far.len();
        let entry_z_near = self.entry_z_near[index];

        DualParams {
            entry_z_near,
            entry_z_far,
            exit_threshold,
            stop_loss,
            window_near,
            window_far,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = DualParams> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

/// Grid over the triangular divergence strategy. Exit and stop axes are in
/// percent, matching how the parameter set stores them.
#[derive(Debug, Clone)]
pub struct TriangularGrid {
    exit_pct: Vec<f64>,
    stop_loss_pct: Vec<f64>,
    ratio: Vec<f64>,
}

impl TriangularGrid {
    pub fn new(
        exit_pct: Vec<f64>,
        stop_loss_pct: Vec<f64>,
        ratio: Vec<f64>,
    ) -> Result<Self, ParamError> {
        let exit_pct = non_empty("exit_pct", exit_pct)?;
        let stop_loss_pct = non_empty("stop_loss_pct", stop_loss_pct)?;
        let ratio = non_empty("ratio", ratio)?;

        for &exit in &exit_pct {
            if exit <= 0.0 {
                return Err(ParamError::InvalidExit(exit));
            }
        }
        for &stop in &stop_loss_pct {
            if stop <= 0.0 {
                return Err(ParamError::InvalidStopLoss(stop));
            }
        }
        for &r in &ratio {
            if r <= 0.0 {
                return Err(ParamError::InvalidRatio(r));
            }
        }

        Ok(Self {
            exit_pct,
            stop_loss_pct,
            ratio,
        })
    }

    pub fn len(&self) -> usize {
        self.exit_pct.len() * self.stop_loss_pct.len() * self.ratio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> TriangularParams {
        debug_assert!(index < self.len());
        let ratio = self.ratio[index % self.ratio.len()];
        let index = index / self.ratio.len();
        let stop_loss_pct = self.stop_loss_pct[index % self.stop_loss_pct.len()];
        let index = index / self.stop_loss_pct.len();
        let exit_pct = self.exit_pct[index];

        TriangularParams {
            exit_pct,
            stop_loss_pct,
            ratio,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = TriangularParams> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

/// Evaluate every pair-strategy combination in parallel.
pub fn search_pair(
    spread: &[f64],
    grid: &PairGrid,
    timing: EntryTiming,
) -> Vec<RunResult<PairParams>> {
    (0..grid.len())
        .into_par_iter()
        .map(|i| {
            let params = grid.get(i);
            let metrics = simulate_pair(spread, &params, timing);
            RunResult::new(params, metrics)
        })
        .collect()
}

/// Evaluate every dual-horizon combination in parallel.
pub fn search_dual(
    spread: &[f64],
    grid: &DualGrid,
    timing: EntryTiming,
) -> Vec<RunResult<DualParams>> {
    (0..grid.len())
        .into_par_iter()
        .map(|i| {
            let params = grid.get(i);
            let metrics = simulate_dual(spread, &params, timing);
            RunResult::new(params, metrics)
        })
        .collect()
}

/// Evaluate every triangular combination in parallel.
pub fn search_triangular(
    bars: &[[f64; 3]],
    grid: &TriangularGrid,
    timing: EntryTiming,
) -> Vec<RunResult<TriangularParams>> {
    (0..grid.len())
        .into_par_iter()
        .map(|i| {
            let params = grid.get(i);
            let metrics = simulate_triangular(bars, &params, timing);
            RunResult::new(params, metrics)
        })
        .collect()
}
