//! Position State Machines and Trade Accounting
//!
//! One position exists per simulation run and it is exclusive: a new trade
//! can only open once the previous one has closed. PnL compounds
//! multiplicatively within a trade; closed trades fold multiplicatively into
//! the run-level tally.

use crate::domain::run_result::RunMetrics;

/// State of the two-asset spread position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairState {
    Flat,
    Long,
    Short,
}

/// Exclusive single position for the pair and dual-horizon variants.
///
/// Long bets the spread rises (`pnl *= 1 + spread`), short bets it falls
/// (`pnl *= 1 - spread`).
#[derive(Debug, Clone)]
pub struct PairPosition {
    state: PairState,
    pnl: f64,
}

impl PairPosition {
    pub fn new() -> Self {
        Self {
            state: PairState::Flat,
            pnl: 1.0,
        }
    }

    pub fn state(&self) -> PairState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != PairState::Flat
    }

    pub fn open_long(&mut self) {
        debug_assert_eq!(self.state, PairState::Flat);
        self.state = PairState::Long;
        self.pnl = 1.0;
    }

    pub fn open_short(&mut self) {
        debug_assert_eq!(self.state, PairState::Flat);
        self.state = PairState::Short;
        self.pnl = 1.0;
    }

    /// Compound one bar of spread movement into the open trade.
    pub fn accrue(&mut self, spread: f64) {
        match self.state {
            PairState::Long => self.pnl *= 1.0 + spread,
            PairState::Short => self.pnl *= 1.0 - spread,
            PairState::Flat => {}
        }
    }

    /// Trade return so far, as a fraction (`pnl - 1`).
    pub fn unrealized(&self) -> f64 {
        self.pnl - 1.0
    }

    pub fn hit_exit(&self, exit_threshold: f64, stop_loss: f64) -> bool {
        let ret = self.unrealized();
        ret >= exit_threshold || ret <= -stop_loss
    }

    /// Close the trade, returning its multiplicative return and resetting
    /// to flat.
    pub fn close(&mut self) -> f64 {
        let pnl = self.pnl;
        self.state = PairState::Flat;
        self.pnl = 1.0;
        pnl
    }
}

impl Default for PairPosition {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive single position for the triangular variant. The bought (Low
/// role) and sold (High role) instrument indices are fixed at entry and are
/// not re-evaluated per bar.
#[derive(Debug, Clone)]
pub struct TriangularPosition {
    legs: Option<(usize, usize)>,
    pnl: f64,
}

impl TriangularPosition {
    pub fn new() -> Self {
        Self { legs: None, pnl: 1.0 }
    }

    pub fn is_open(&self) -> bool {
        self.legs.is_some()
    }

    pub fn open(&mut self, bought: usize, sold: usize) {
        debug_assert!(self.legs.is_none());
        self.legs = Some((bought, sold));
        self.pnl = 1.0;
    }

    /// Compound one bar using the fixed entry legs.
    pub fn accrue(&mut self, bar_returns: [f64; 3]) {
        if let Some((bought, sold)) = self.legs {
            let spread = bar_returns[bought] - bar_returns[sold];
            self.pnl *= 1.0 + spread;
        }
    }

    pub fn unrealized(&self) -> f64 {
        self.pnl - 1.0
    }

    pub fn hit_exit(&self, exit_threshold: f64, stop_loss: f64) -> bool {
        let ret = self.unrealized();
        ret >= exit_threshold || ret <= -stop_loss
    }

    pub fn close(&mut self) -> f64 {
        let pnl = self.pnl;
        self.legs = None;
        self.pnl = 1.0;
        pnl
    }
}

impl Default for TriangularPosition {
    fn default() -> Self {
        Self::new()
    }
}

/// Run-level trade accounting. Closed trades compound multiplicatively into
/// `compounded`; a trade still open when data runs out never reaches
/// [`TradeTally::record_close`], so its unrealized PnL is discarded.
#[derive(Debug, Clone)]
pub struct TradeTally {
    trades: u32,
    wins: u32,
    compounded: f64,
}

impl TradeTally {
    pub fn new() -> Self {
        Self {
            trades: 0,
            wins: 0,
            compounded: 1.0,
        }
    }

    /// Count a flat -> open transition.
    pub fn record_entry(&mut self) {
        self.trades += 1;
    }

    /// Fold a closed trade's multiplicative return into the run total.
    pub fn record_close(&mut self, trade_pnl: f64) {
        self.compounded *= trade_pnl;
        if trade_pnl - 1.0 > 0.0 {
            self.wins += 1;
        }
    }

    pub fn trade_count(&self) -> u32 {
        self.trades
    }

    /// Aggregate metrics with guarded division: zero trades reports zero
    /// rates rather than an error.
    pub fn metrics(&self) -> RunMetrics {
        let final_return_pct = (self.compounded - 1.0) * 100.0;
        let (win_rate_pct, return_per_trade_pct) = if self.trades > 0 {
            (
                f64::from(self.wins) / f64::from(self.trades) * 100.0,
                (self.compounded - 1.0) / f64::from(self.trades) * 100.0,
            )
        } else {
            (0.0, 0.0)
        };

        RunMetrics {
            final_return_pct,
            win_rate_pct,
            return_per_trade_pct,
            trade_count: self.trades,
        }
    }
}

impl Default for TradeTally {
    fn default() -> Self {
        Self::new()
    }
}
