//! Strategy Parameter Sets
//!
//! Immutable per-variant parameter tuples with fail-fast validation.
//! A parameter set that would produce a degenerate run (zero window,
//! non-positive threshold, inverted dual windows) is rejected at
//! construction time, never silently simulated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::run_result::ParamSet;

/// Parameter validation errors.
#[derive(Debug, Clone, Error)]
pub enum ParamError {
    #[error("entry threshold must be > 0, got {0}")]
    InvalidEntry(f64),
    #[error("exit threshold must be > 0, got {0}")]
    InvalidExit(f64),
    #[error("stop loss must be > 0, got {0}")]
    InvalidStopLoss(f64),
    #[error("window must be >= 1, got {0}")]
    InvalidWindow(usize),
    #[error("near window {near} must be smaller than far window {far}")]
    NonMonotonicWindows { near: usize, far: usize },
    #[error("divergence ratio must be > 0, got {0}")]
    InvalidRatio(f64),
    #[error("parameter axis `{0}` expands to no values")]
    EmptyRange(&'static str),
}

/// When the first PnL accrual of a freshly opened trade happens.
///
/// `NextBar` opens on the signal bar and starts accruing on the following
/// bar. `EntryBar` accrues the entry bar itself, reusing the spread that
/// triggered the signal (a deliberate look-ahead). Fixtures pin each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryTiming {
    #[default]
    NextBar,
    EntryBar,
}

/// Two-asset z-score strategy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairParams {
    pub entry_z: f64,
    pub exit_threshold: f64,
    pub stop_loss: f64,
    pub window: usize,
}

impl PairParams {
    pub fn new(
        entry_z: f64,
        exit_threshold: f64,
        stop_loss: f64,
        window: usize,
    ) -> Result<Self, ParamError> {
        if entry_z <= 0.0 {
            return Err(ParamError::InvalidEntry(entry_z));
        }
        if exit_threshold <= 0.0 {
            return Err(ParamError::InvalidExit(exit_threshold));
        }
        if stop_loss <= 0.0 {
            return Err(ParamError::InvalidStopLoss(stop_loss));
        }
        if window == 0 {
            return Err(ParamError::InvalidWindow(window));
        }

        Ok(Self {
            entry_z,
            exit_threshold,
            stop_loss,
            window,
        })
    }
}

impl ParamSet for PairParams {
    fn field_labels() -> &'static [&'static str] {
        &["Entry - z", "Exit Threshold", "Stop Loss", "Window"]
    }

    fn field_values(&self) -> Vec<f64> {
        vec![
            self.entry_z,
            self.exit_threshold,
            self.stop_loss,
            self.window as f64,
        ]
    }
}

/// Dual-horizon strategy knobs: independent near and far z-score gates that
/// must agree (a conjunction) before a trade opens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DualParams {
    pub entry_z_near: f64,
    pub entry_z_far: f64,
    pub exit_threshold: f64,
    pub stop_loss: f64,
    pub window_near: usize,
    pub window_far: usize,
}

impl DualParams {
    pub fn new(
        entry_z_near: f64,
        entry_z_far: f64,
        exit_threshold: f64,
        stop_loss: f64,
        window_near: usize,
        window_far: usize,
    ) -> Result<Self, ParamError> {
        if entry_z_near <= 0.0 {
            return Err(ParamError::InvalidEntry(entry_z_near));
        }
        if entry_z_far <= 0.0 {
            return Err(ParamError::InvalidEntry(entry_z_far));
        }
        if exit_threshold <= 0.0 {
            return Err(ParamError::InvalidExit(exit_threshold));
        }
        if stop_loss <= 0.0 {
            return Err(ParamError::InvalidStopLoss(stop_loss));
        }
        if window_near == 0 {
            return Err(ParamError::InvalidWindow(window_near));
        }
        if window_near >= window_far {
            return Err(ParamError::NonMonotonicWindows {
                near: window_near,
                far: window_far,
            });
        }

        Ok(Self {
            entry_z_near,
            entry_z_far,
            exit_threshold,
            stop_loss,
            window_near,
            window_far,
        })
    }
}

impl ParamSet for DualParams {
    fn field_labels() -> &'static [&'static str] {
        &[
            "Entry - z Near",
            "Entry - z Far",
            "Exit Threshold",
            "Stop Loss",
            "Window - Near",
            "Window - Far",
        ]
    }

    fn field_values(&self) -> Vec<f64> {
        vec![
            self.entry_z_near,
            self.entry_z_far,
            self.exit_threshold,
            self.stop_loss,
            self.window_near as f64,
            self.window_far as f64,
        ]
    }
}

/// Triangular divergence strategy knobs. Exit and stop are configured in
/// percent and converted to fractions for the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TriangularParams {
    pub exit_pct: f64,
    pub stop_loss_pct: f64,
    pub ratio: f64,
}

impl TriangularParams {
    pub fn new(exit_pct: f64, stop_loss_pct: f64, ratio: f64) -> Result<Self, ParamError> {
        if exit_pct <= 0.0 {
            return Err(ParamError::InvalidExit(exit_pct));
        }
        if stop_loss_pct <= 0.0 {
            return Err(ParamError::InvalidStopLoss(stop_loss_pct));
        }
        if ratio <= 0.0 {
            return Err(ParamError::InvalidRatio(ratio));
        }

        Ok(Self {
            exit_pct,
            stop_loss_pct,
            ratio,
        })
    }

    /// Exit threshold as a fraction of trade PnL.
    pub fn exit_fraction(&self) -> f64 {
        self.exit_pct / 100.0
    }

    /// Stop loss as a fraction of trade PnL.
    pub fn stop_loss_fraction(&self) -> f64 {
        self.stop_loss_pct / 100.0
    }
}

impl ParamSet for TriangularParams {
    fn field_labels() -> &'static [&'static str] {
        &["Exit Threshold", "Stop Loss", "Ratio"]
    }

    fn field_values(&self) -> Vec<f64> {
        vec![self.exit_pct, self.stop_loss_pct, self.ratio]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pair_params() {
        let params = PairParams::new(1.5, 0.004, 0.003, 50).unwrap();
        assert_eq!(params.window, 50);
        assert_eq!(
            PairParams::field_labels().len(),
            params.field_values().len()
        );
    }

    #[test]
    fn test_pair_params_reject_bad_values() {
        assert!(matches!(
            PairParams::new(0.0, 0.004, 0.003, 50),
            Err(ParamError::InvalidEntry(_))
        ));
        assert!(matches!(
            PairParams::new(1.5, -0.004, 0.003, 50),
            Err(ParamError::InvalidExit(_))
        ));
        assert!(matches!(
            PairParams::new(1.5, 0.004, 0.0, 50),
            Err(ParamError::InvalidStopLoss(_))
        ));
        assert!(matches!(
            PairParams::new(1.5, 0.004, 0.003, 0),
            Err(ParamError::InvalidWindow(0))
        ));
    }

    #[test]
    fn test_dual_params_window_ordering() {
        assert!(DualParams::new(0.4, 0.8, 0.003, 0.003, 20, 200).is_ok());
        assert!(matches!(
            DualParams::new(0.4, 0.8, 0.003, 0.003, 200, 20),
            Err(ParamError::NonMonotonicWindows { near: 200, far: 20 })
        ));
        assert!(matches!(
            DualParams::new(0.4, 0.8, 0.003, 0.003, 50, 50),
            Err(ParamError::NonMonotonicWindows { .. })
        ));
    }

    #[test]
    fn test_triangular_percent_conversion() {
        let params = TriangularParams::new(0.08, 0.05, 3.0).unwrap();
        assert!((params.exit_fraction() - 0.0008).abs() < 1e-15);
        assert!((params.stop_loss_fraction() - 0.0005).abs() < 1e-15);
    }

    #[test]
    fn test_triangular_rejects_zero_ratio() {
        assert!(matches!(
            TriangularParams::new(0.08, 0.05, 0.0),
            Err(ParamError::InvalidRatio(_))
        ));
    }

    #[test]
    fn test_entry_timing_default() {
        assert_eq!(EntryTiming::default(), EntryTiming::NextBar);
    }
}
