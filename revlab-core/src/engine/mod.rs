//! Backtesting engine — indicator precompute, trade state machine, bar loop.
//!
//! The engine consumes an ordered candle series, precomputes EMA and RSI once,
//! then folds a pure per-bar `step` over the series:
//!
//! 1. Exit check against the open trade's stop and target
//! 2. Entry check: daily cap, reversal signal, support/resistance filter,
//!    indicator availability
//!
//! Any trade still open after the last bar is force-closed at its close.

pub mod accounting;
pub mod daily_limit;
pub mod loop_runner;
pub mod precompute;
pub mod state;
pub mod step;

pub use accounting::{round_cents, EquityTracker};
pub use daily_limit::{DailyTradeLimiter, DEFAULT_MAX_TRADES_PER_DAY};
pub use loop_runner::{run_backtest, BacktestError};
pub use precompute::{precompute_indicators, IndicatorFrame};
pub use state::{EngineConfig, RunResult, SignalStats, SimulationState};
pub use step::{close_open_trade, step, BarContext};
