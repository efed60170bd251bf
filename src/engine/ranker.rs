//! Results Ranker
//!
//! Filters and orders the raw grid-search output into the ranked table the
//! report layer prints. Filtering and sorting are pure functions of the
//! result set, so the ranking is identical no matter what order the
//! parallel search produced the rows in.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::run_result::{ParamSet, RunResult};

/// Metric a ranked table is sorted by, descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMetric {
    #[default]
    FinalReturn,
    WinRate,
    ReturnPerTrade,
}

impl RankMetric {
    fn value_of(&self, result: &RunResult<impl ParamSet>) -> f64 {
        match self {
            RankMetric::FinalReturn => result.metrics.final_return_pct,
            RankMetric::WinRate => result.metrics.win_rate_pct,
            RankMetric::ReturnPerTrade => result.metrics.return_per_trade_pct,
        }
    }
}

/// Filter and ordering rules for one ranked table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankerConfig {
    /// Keep rows whose trade count is strictly above this. Zero disables
    /// the filter.
    #[serde(default)]
    pub trade_floor: u32,
    /// Keep only rows with a positive compounded return.
    #[serde(default)]
    pub require_positive_return: bool,
    /// Keep rows whose return per trade is strictly above this, when set.
    #[serde(default)]
    pub min_return_per_trade: Option<f64>,
    #[serde(default)]
    pub sort_by: RankMetric,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    10
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self::pair()
    }
}

impl RankerConfig {
    /// Two-asset preset: active setups with a positive run, best compounded
    /// return first.
    pub fn pair() -> Self {
        Self {
            trade_floor: 10,
            require_positive_return: true,
            min_return_per_trade: None,
            sort_by: RankMetric::FinalReturn,
            top_k: 10,
        }
    }

    /// Dual-horizon preset: pair rules plus a per-trade quality floor.
    pub fn dual() -> Self {
        Self {
            min_return_per_trade: Some(0.1),
            ..Self::pair()
        }
    }

    /// Triangular preset: no filters, widest table, per-trade quality first.
    pub fn triangular() -> Self {
        Self {
            trade_floor: 0,
            require_positive_return: false,
            min_return_per_trade: None,
            sort_by: RankMetric::ReturnPerTrade,
            top_k: 40,
        }
    }

    fn keeps(&self, result: &RunResult<impl ParamSet>) -> bool {
        if self.trade_floor > 0 && result.metrics.trade_count <= self.trade_floor {
            return false;
        }
        if self.require_positive_return && result.metrics.final_return_pct <= 0.0 {
            return false;
        }
        if let Some(floor) = self.min_return_per_trade {
            if result.metrics.return_per_trade_pct <= floor {
                return false;
            }
        }
        true
    }

    /// Produce the ranked table: filter, sort descending by the configured
    /// metric (parameter identity breaks ties), truncate to `top_k`.
    pub fn rank<P: ParamSet>(&self, results: Vec<RunResult<P>>) -> Vec<RunResult<P>> {
        let mut kept: Vec<RunResult<P>> = results
            .into_iter()
            .filter(|result| self.keeps(result))
            .collect();

        kept.sort_by(|a, b| {
            match self
                .sort_by
                .value_of(b)
                .total_cmp(&self.sort_by.value_of(a))
            {
                Ordering::Equal => a.params.identity_cmp(&b.params),
                ordering => ordering,
            }
        });
        kept.truncate(self.top_k);
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::run_result::RunMetrics;
    use serde::Serialize;

    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    struct Knob {
        value: f64,
    }

    impl ParamSet for Knob {
        fn field_labels() -> &'static [&'static str] {
            &["Knob"]
        }

        fn field_values(&self) -> Vec<f64> {
            vec![self.value]
        }
    }

    fn row(value: f64, final_return: f64, win_rate: f64, per_trade: f64, trades: u32) -> RunResult<Knob> {
        RunResult::new(
            Knob { value },
            RunMetrics {
                final_return_pct: final_return,
                win_rate_pct: win_rate,
                return_per_trade_pct: per_trade,
                trade_count: trades,
            },
        )
    }

    #[test]
    fn test_trade_floor_is_strict() {
        let config = RankerConfig::pair();
        let rows = vec![
            row(1.0, 5.0, 50.0, 0.5, 10),
            row(2.0, 4.0, 50.0, 0.4, 11),
        ];
        let ranked = config.rank(rows);
        // Exactly 10 trades is not strictly above the floor of 10.
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].params.value, 2.0);
    }

    #[test]
    fn test_zero_floor_disables_trade_filter() {
        let config = RankerConfig::triangular();
        let rows = vec![row(1.0, -3.0, 0.0, -3.0, 0), row(2.0, 1.0, 100.0, 1.0, 1)];
        let ranked = config.rank(rows);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_positive_return_filter() {
        let config = RankerConfig::pair();
        let rows = vec![
            row(1.0, -0.5, 40.0, -0.02, 20),
            row(2.0, 0.0, 50.0, 0.0, 20),
            row(3.0, 0.5, 60.0, 0.02, 20),
        ];
        let ranked = config.rank(rows);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].params.value, 3.0);
    }

    #[test]
    fn test_dual_preset_per_trade_floor() {
        let config = RankerConfig::dual();
        let rows = vec![
            row(1.0, 5.0, 50.0, 0.1, 20),
            row(2.0, 5.0, 50.0, 0.11, 20),
        ];
        let ranked = config.rank(rows);
        // 0.1 is not strictly above the 0.1 floor.
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].params.value, 2.0);
    }

    #[test]
    fn test_sort_descending_and_truncate() {
        let config = RankerConfig {
            trade_floor: 0,
            require_positive_return: false,
            min_return_per_trade: None,
            sort_by: RankMetric::WinRate,
            top_k: 2,
        };
        let rows = vec![
            row(1.0, 1.0, 30.0, 0.1, 5),
            row(2.0, 1.0, 70.0, 0.1, 5),
            row(3.0, 1.0, 50.0, 0.1, 5),
        ];
        let ranked = config.rank(rows);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].params.value, 2.0);
        assert_eq!(ranked[1].params.value, 3.0);
    }

    #[test]
    fn test_ranking_is_order_independent() {
        let config = RankerConfig::triangular();
        let rows = vec![
            row(3.0, 1.0, 50.0, 0.5, 4),
            row(1.0, 2.0, 50.0, 0.5, 4),
            row(2.0, 3.0, 50.0, 0.7, 4),
            row(4.0, 0.5, 25.0, 0.1, 4),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();

        let forward = config.rank(rows);
        let backward = config.rank(reversed);

        let order = |ranked: &[RunResult<Knob>]| {
            ranked.iter().map(|r| r.params.value).collect::<Vec<_>>()
        };
        assert_eq!(order(&forward), order(&backward));
        // Ties on the sort metric fall back to parameter identity.
        assert_eq!(order(&forward), vec![2.0, 1.0, 3.0, 4.0]);
    }
}
