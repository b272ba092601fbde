//! Engine configuration, per-run simulation state, and run result types.

use crate::domain::{ClosedTrade, OpenTrade};
use serde::{Deserialize, Serialize};

use super::accounting::EquityTracker;
use super::daily_limit::{DailyTradeLimiter, DEFAULT_MAX_TRADES_PER_DAY};
use super::loop_runner::BacktestError;

/// Default starting balance.
pub const DEFAULT_INITIAL_BALANCE: f64 = 10_000.0;
/// Runs on fewer candles than this are refused.
pub const DEFAULT_MIN_CANDLES: usize = 10;
pub const DEFAULT_EMA_SPAN: usize = 21;
pub const DEFAULT_RSI_LENGTH: usize = 14;
pub const DEFAULT_PROFIT_TARGET_PERCENT: f64 = 4.0;
pub const DEFAULT_STOP_LOSS_PERCENT: f64 = 10.0;

/// Configuration for a single backtest run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub initial_balance: f64,
    pub max_trades_per_day: u32,
    pub min_candles: usize,
    pub ema_span: usize,
    pub rsi_length: usize,
    pub profit_target_percent: f64,
    pub stop_loss_percent: f64,
}

impl EngineConfig {
    /// Default strategy constants with explicit exit thresholds.
    pub fn new(profit_target_percent: f64, stop_loss_percent: f64) -> Self {
        Self {
            profit_target_percent,
            stop_loss_percent,
            ..Self::default()
        }
    }

    /// Reject values that would misplace the stop or target, or that the
    /// indicators cannot be built with.
    ///
    /// A non-positive target puts a LONG target below entry, so a losing
    /// close would be logged as a win. A stop at or above 100% puts a LONG
    /// stop at or below zero.
    pub fn validate(&self) -> Result<(), BacktestError> {
        positive("profit_target_percent", self.profit_target_percent)?;
        positive("stop_loss_percent", self.stop_loss_percent)?;
        if self.stop_loss_percent >= 100.0 {
            return Err(invalid("stop_loss_percent", "must be below 100"));
        }
        positive("initial_balance", self.initial_balance)?;
        if self.ema_span == 0 {
            return Err(invalid("ema_span", "must be >= 1"));
        }
        if self.rsi_length == 0 {
            return Err(invalid("rsi_length", "must be >= 1"));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), BacktestError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be finite and > 0"))
    }
}

fn invalid(field: &'static str, reason: &str) -> BacktestError {
    BacktestError::InvalidParameter {
        field,
        reason: reason.to_string(),
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_balance: DEFAULT_INITIAL_BALANCE,
            max_trades_per_day: DEFAULT_MAX_TRADES_PER_DAY,
            min_candles: DEFAULT_MIN_CANDLES,
            ema_span: DEFAULT_EMA_SPAN,
            rsi_length: DEFAULT_RSI_LENGTH,
            profit_target_percent: DEFAULT_PROFIT_TARGET_PERCENT,
            stop_loss_percent: DEFAULT_STOP_LOSS_PERCENT,
        }
    }
}

/// Signal diagnostics gathered during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalStats {
    /// Signals that fired while flat and under the daily cap.
    pub fired: usize,
    /// Signals rejected by the support/resistance filter.
    pub filtered: usize,
    /// Signals skipped because EMA or RSI was undefined at the bar.
    pub indicator_gated: usize,
}

/// State threaded through the bar loop. Created fresh per run, never shared.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub equity: EquityTracker,
    pub open_trade: Option<OpenTrade>,
    pub trades_per_day: DailyTradeLimiter,
    pub closed_trades: Vec<ClosedTrade>,
    pub stats: SignalStats,
}

impl SimulationState {
    pub fn new(initial_balance: f64, max_trades_per_day: u32) -> Self {
        Self {
            equity: EquityTracker::new(initial_balance),
            open_trade: None,
            trades_per_day: DailyTradeLimiter::new(max_trades_per_day),
            closed_trades: Vec::new(),
            stats: SignalStats::default(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.initial_balance, config.max_trades_per_day)
    }

    pub fn balance(&self) -> f64 {
        self.equity.balance()
    }

    pub fn is_flat(&self) -> bool {
        self.open_trade.is_none()
    }

    /// Log a closed trade and compound it into the balance.
    pub(crate) fn record_close(&mut self, trade: ClosedTrade) {
        self.equity.apply_trade(&trade);
        self.closed_trades.push(trade);
    }
}

/// Result of a complete backtest run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Closed trades in closure order.
    pub trades: Vec<ClosedTrade>,
    /// Unrounded final balance.
    pub final_balance: f64,
    /// Balance after each closed trade, starting with the initial balance.
    pub balance_history: Vec<f64>,
    pub initial_balance: f64,
    /// Total candles in the input.
    pub bar_count: usize,
    pub stats: SignalStats,
}

impl RunResult {
    pub(crate) fn from_state(state: SimulationState, bar_count: usize) -> Self {
        Self {
            final_balance: state.equity.balance(),
            balance_history: state.equity.balance_history().to_vec(),
            initial_balance: state.equity.initial_balance(),
            trades: state.closed_trades,
            bar_count,
            stats: state.stats,
        }
    }
}
