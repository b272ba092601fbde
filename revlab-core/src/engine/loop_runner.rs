//! Bar-by-bar loop — the heart of the backtesting engine.
//!
//! 1. Refuse exit thresholds that cannot place a stop and target, and series
//!    shorter than `min_candles`
//! 2. Precompute EMA and RSI over the whole series
//! 3. Fold `step` over every bar from the signal's warmup onward
//! 4. Force-close any trade still open at the final candle

use crate::components::filter::SignalFilter;
use crate::components::signal::SignalGenerator;
use crate::domain::Candle;
use crate::indicators::{Ema, Rsi};
use thiserror::Error;
use tracing::info;

use super::precompute::precompute_indicators;
use super::state::{EngineConfig, RunResult, SimulationState};
use super::step::{close_open_trade, step, BarContext};

/// Hard refusals at the engine boundary.
///
/// Per-bar numeric edge cases never surface here; they resolve to a skip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BacktestError {
    #[error("Insufficient candle data")]
    InputTooShort { got: usize, required: usize },

    #[error("invalid parameter: {field} {reason}")]
    InvalidParameter { field: &'static str, reason: String },
}

/// Run a backtest over an ordered candle series.
///
/// Deterministic: the same candles, config and components always produce
/// the same trade log and balance.
pub fn run_backtest(
    candles: &[Candle],
    config: &EngineConfig,
    signal_generator: &dyn SignalGenerator,
    signal_filter: &dyn SignalFilter,
) -> Result<RunResult, BacktestError> {
    config.validate()?;
    if candles.len() < config.min_candles {
        return Err(BacktestError::InputTooShort {
            got: candles.len(),
            required: config.min_candles,
        });
    }

    let frame = precompute_indicators(
        candles,
        &Ema::new(config.ema_span),
        &Rsi::new(config.rsi_length),
    );

    let mut state = SimulationState::from_config(config);
    for index in signal_generator.warmup_bars()..candles.len() {
        let ctx = BarContext {
            candles,
            index,
            frame: &frame,
            config,
            signal: signal_generator,
            filter: signal_filter,
        };
        state = step(state, &ctx);
    }

    if let Some(last) = candles.last() {
        state = close_open_trade(state, last);
    }

    let result = RunResult::from_state(state, candles.len());
    info!(
        signal = signal_generator.name(),
        filter = signal_filter.name(),
        bars = result.bar_count,
        trades = result.trades.len(),
        signals = result.stats.fired,
        filtered = result.stats.filtered,
        final_balance = result.final_balance,
        "backtest complete"
    );
    Ok(result)
}
