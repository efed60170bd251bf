//! Simulation Engine
//!
//! Deterministic single-pass backtests. Each simulator walks the derived
//! signal series chronologically exactly once, drives the exclusive position
//! state machine, and returns aggregate metrics. Input series are never
//! mutated, so the same inputs and parameters always reproduce the same
//! result.
//!
//! Absent signals (rolling statistics not yet defined, or zero stdev) never
//! cause a transition; an open position still accrues PnL on every bar
//! because the raw spread is always defined.

use crate::domain::position::{PairPosition, TradeTally, TriangularPosition};
use crate::domain::run_result::RunMetrics;
use crate::strategy::params::{DualParams, EntryTiming, PairParams, TriangularParams};
use crate::strategy::rolling::zscore;
use crate::strategy::spread::DivergenceBar;

/// Accrue one bar into an open pair position and close it if a threshold is
/// hit. Returns nothing; closed trades fold into the tally.
fn accrue_pair(
    position: &mut PairPosition,
    tally: &mut TradeTally,
    spread: f64,
    exit_threshold: f64,
    stop_loss: f64,
) {
    position.accrue(spread);
    if position.hit_exit(exit_threshold, stop_loss) {
        tally.record_close(position.close());
    }
}

/// Backtest the two-asset z-score strategy over a spread series.
pub fn simulate_pair(spread: &[f64], params: &PairParams, timing: EntryTiming) -> RunMetrics {
    let z = zscore(spread, params.window);

    let mut position = PairPosition::new();
    let mut tally = TradeTally::new();

    for (i, &bar_spread) in spread.iter().enumerate() {
        if position.is_open() {
            accrue_pair(
                &mut position,
                &mut tally,
                bar_spread,
                params.exit_threshold,
                params.stop_loss,
            );
            continue;
        }

        let opened = match z[i] {
            Some(value) if value > params.entry_z => {
                position.open_short();
                true
            }
            Some(value) if value < -params.entry_z => {
                position.open_long();
                true
            }
            _ => false,
        };

        if opened {
            tally.record_entry();
            if timing == EntryTiming::EntryBar {
                accrue_pair(
                    &mut position,
                    &mut tally,
                    bar_spread,
                    params.exit_threshold,
                    params.stop_loss,
                );
            }
        }
    }

    // A trade still open here is discarded, never force-closed.
    tally.metrics()
}

/// Backtest the dual-horizon variant: entry requires the near and far
/// z-scores to exceed their thresholds with matching sign, as a conjunction.
pub fn simulate_dual(spread: &[f64], params: &DualParams, timing: EntryTiming) -> RunMetrics {
    let z_near = zscore(spread, params.window_near);
    let z_far = zscore(spread, params.window_far);

    let mut position = PairPosition::new();
    let mut tally = TradeTally::new();

    for (i, &bar_spread) in spread.iter().enumerate() {
        if position.is_open() {
            accrue_pair(
                &mut position,
                &mut tally,
                bar_spread,
                params.exit_threshold,
                params.stop_loss,
            );
            continue;
        }

        let opened = match (z_near[i], z_far[i]) {
            (Some(near), Some(far))
                if near > params.entry_z_near && far > params.entry_z_far =>
            {
                position.open_short();
                true
            }
            (Some(near), Some(far))
                if near < -params.entry_z_near && far < -params.entry_z_far =>
            {
                position.open_long();
                true
            }
            _ => false,
        };

        if opened {
            tally.record_entry();
            if timing == EntryTiming::EntryBar {
                accrue_pair(
                    &mut position,
                    &mut tally,
                    bar_spread,
                    params.exit_threshold,
                    params.stop_loss,
                );
            }
        }
    }

    tally.metrics()
}

fn accrue_triangular(
    position: &mut TriangularPosition,
    tally: &mut TradeTally,
    bar: [f64; 3],
    exit_threshold: f64,
    stop_loss: f64,
) {
    position.accrue(bar);
    if position.hit_exit(exit_threshold, stop_loss) {
        tally.record_close(position.close());
    }
}

/// Backtest the triangular divergence variant over per-bar return triplets.
pub fn simulate_triangular(
    bars: &[[f64; 3]],
    params: &TriangularParams,
    timing: EntryTiming,
) -> RunMetrics {
    let exit_threshold = params.exit_fraction();
    let stop_loss = params.stop_loss_fraction();

    let mut position = TriangularPosition::new();
    let mut tally = TradeTally::new();

    for &bar in bars {
        if position.is_open() {
            accrue_triangular(&mut position, &mut tally, bar, exit_threshold, stop_loss);
            continue;
        }

        let divergence = DivergenceBar::new(bar);
        if divergence.is_divergent(params.ratio) {
            // Buy the laggard, sell the leader; roles stay fixed until exit.
            position.open(divergence.assignment.low, divergence.assignment.high);
            tally.record_entry();
            if timing == EntryTiming::EntryBar {
                accrue_triangular(&mut position, &mut tally, bar, exit_threshold, stop_loss);
            }
        }
    }

    tally.metrics()
}
