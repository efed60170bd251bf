//! Run Results
//!
//! Aggregate output of one simulation run: the parameter set that produced
//! it plus the four run-level metrics. Individual trades are not retained.

use std::cmp::Ordering;

use serde::Serialize;

/// Aggregate metrics of one backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunMetrics {
    /// Compounded run return, `(final - 1) * 100`.
    pub final_return_pct: f64,
    /// Winning trades over opened trades, in percent. Zero when no trades.
    pub win_rate_pct: f64,
    /// Compounded run return divided by trade count, in percent.
    pub return_per_trade_pct: f64,
    /// Number of opened trades (including one left open at end of data).
    pub trade_count: u32,
}

/// A strategy parameter set as seen by the ranker and the report layer:
/// a fixed list of labelled numeric fields. Field order defines the
/// deterministic tie-break identity.
pub trait ParamSet: Clone + Send + Sync {
    fn field_labels() -> &'static [&'static str];
    fn field_values(&self) -> Vec<f64>;

    /// Total order over parameter identity, for reproducible tie-breaking.
    fn identity_cmp(&self, other: &Self) -> Ordering {
        let a = self.field_values();
        let b = other.field_values();
        for (x, y) in a.iter().zip(b.iter()) {
            match x.total_cmp(y) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        Ordering::Equal
    }
}

/// One parameter set paired with its run metrics, immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult<P: ParamSet> {
    pub params: P,
    pub metrics: RunMetrics,
}

impl<P: ParamSet> RunResult<P> {
    pub fn new(params: P, metrics: RunMetrics) -> Self {
        Self { params, metrics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize)]
    struct FakeParams {
        a: f64,
        b: f64,
    }

    impl ParamSet for FakeParams {
        fn field_labels() -> &'static [&'static str] {
            &["a", "b"]
        }

        fn field_values(&self) -> Vec<f64> {
            vec![self.a, self.b]
        }
    }

    #[test]
    fn test_identity_cmp_lexicographic() {
        let x = FakeParams { a: 1.0, b: 2.0 };
        let y = FakeParams { a: 1.0, b: 3.0 };
        let z = FakeParams { a: 1.0, b: 2.0 };

        assert_eq!(x.identity_cmp(&y), Ordering::Less);
        assert_eq!(y.identity_cmp(&x), Ordering::Greater);
        assert_eq!(x.identity_cmp(&z), Ordering::Equal);
    }

    #[test]
    fn test_identity_cmp_total_on_negative_zero() {
        // total_cmp gives a stable order even for -0.0 vs 0.0.
        let x = FakeParams { a: -0.0, b: 0.0 };
        let y = FakeParams { a: 0.0, b: 0.0 };
        assert_eq!(x.identity_cmp(&y), Ordering::Less);
    }
}
