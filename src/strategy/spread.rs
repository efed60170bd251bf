//! Spread Models
//!
//! Converts raw return series into the scalar series the simulators consume:
//! the linear two-asset spread, and the per-bar divergence view of the
//! three-asset variant.

use crate::domain::roles::RoleAssignment;
use crate::domain::series::{check_all_aligned, DataError, ReturnSeries};

/// Linear spread between two aligned return series:
/// `spread[i] = a[i] - b[i]`.
pub fn linear_spread(a: &ReturnSeries, b: &ReturnSeries) -> Result<Vec<f64>, DataError> {
    a.check_aligned(b)?;

    Ok(a.values()
        .iter()
        .zip(b.values())
        .map(|(x, y)| x - y)
        .collect())
}

/// Three aligned return series zipped into per-bar triplets for the
/// triangular strategy. Instrument order is preserved; index `k` in every
/// triplet refers to `series[k]`.
pub fn return_triplets(series: [&ReturnSeries; 3]) -> Result<Vec<[f64; 3]>, DataError> {
    check_all_aligned(&series)?;

    let (a, b, c) = (series[0].values(), series[1].values(), series[2].values());
    Ok((0..a.len()).map(|i| [a[i], b[i], c[i]]).collect())
}

/// One bar of the triangular divergence model: the role assignment plus the
/// near-equilateral entry test.
#[derive(Debug, Clone, Copy)]
pub struct DivergenceBar {
    pub assignment: RoleAssignment,
}

impl DivergenceBar {
    pub fn new(bar_returns: [f64; 3]) -> Self {
        Self {
            assignment: RoleAssignment::rank(bar_returns),
        }
    }

    /// Entry condition: both secondary ranges reach `range_high_low / ratio`.
    /// A bar with no divergence at all (`range_high_low == 0`) never
    /// qualifies; it would open a trade whose legs coincide.
    pub fn is_divergent(&self, ratio: f64) -> bool {
        let range_hl = self.assignment.range_high_low();
        if range_hl <= 0.0 {
            return false;
        }
        let floor = range_hl / ratio;
        self.assignment.range_high_neutral() >= floor
            && self.assignment.range_neutral_low() >= floor
    }
}
