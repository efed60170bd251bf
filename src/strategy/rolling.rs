//! Rolling Statistics
//!
//! Trailing mean and standard deviation over a fixed window. Index `i` is
//! defined only once a full window is available (`i >= window - 1`); earlier
//! indices are `None`, never NaN and never a panic. The standard deviation
//! is the sample estimate (n - 1 denominator).
//!
//! Each window is computed with a plain two-pass sum so that a constant
//! window yields an exactly-zero standard deviation.

/// Standard deviations at or below this are treated as zero: the z-score is
/// undefined there rather than exploding.
pub const ZERO_STDEV: f64 = 1e-10;

/// Aligned trailing mean/stdev series over a spread.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingStats {
    pub mean: Vec<Option<f64>>,
    pub stdev: Vec<Option<f64>>,
}

/// Compute trailing window statistics for every index of `series`.
///
/// A window larger than the series (or a zero window) produces all-`None`
/// output. `window == 1` defines the mean everywhere but leaves the sample
/// stdev undefined.
pub fn rolling_stats(series: &[f64], window: usize) -> RollingStats {
    let mut mean = vec![None; series.len()];
    let mut stdev = vec![None; series.len()];

    if window == 0 || window > series.len() {
        return RollingStats { mean, stdev };
    }

    for i in (window - 1)..series.len() {
        let slice = &series[i + 1 - window..=i];
        let m = slice.iter().sum::<f64>() / window as f64;
        mean[i] = Some(m);

        if window > 1 {
            let var = slice.iter().map(|x| (x - m) * (x - m)).sum::<f64>()
                / (window - 1) as f64;
            stdev[i] = Some(var.sqrt());
        }
    }

    RollingStats { mean, stdev }
}

/// Rolling z-score of a spread: `(spread[i] - mean[i]) / stdev[i]`.
///
/// `None` wherever the rolling statistics are undefined or the stdev is
/// numerically zero. An absent z-score is a distinct signal state, not an
/// error: the state machine simply does not transition on it.
pub fn zscore(series: &[f64], window: usize) -> Vec<Option<f64>> {
    let stats = rolling_stats(series, window);

    series
        .iter()
        .enumerate()
        .map(|(i, &value)| match (stats.mean[i], stats.stdev[i]) {
            (Some(mean), Some(stdev)) if stdev > ZERO_STDEV => Some((value - mean) / stdev),
            _ => None,
        })
        .collect()
}
