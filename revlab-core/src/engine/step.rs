//! Trade state machine — one pure step per bar.
//!
//! The state is taken by value and returned updated, so each bar is a
//! function `SimulationState -> SimulationState` that can be tested on its
//! own. Per bar, in order:
//!
//! 1. Exit check (in a trade): stop first, then target, against the close.
//!    A bar that is in a trade never enters, whether or not it exits.
//! 2. Entry check (flat, under the daily cap): signal → support/resistance
//!    filter → indicator availability gate → open with stop/target levels.

use crate::components::filter::{FilterVerdict, SignalFilter};
use crate::components::signal::SignalGenerator;
use crate::domain::{Candle, OpenTrade, TradeStatus};
use tracing::debug;

use super::precompute::IndicatorFrame;
use super::state::{EngineConfig, SimulationState};

/// Everything a step may read. Nothing in it is mutated.
pub struct BarContext<'a> {
    pub candles: &'a [Candle],
    pub index: usize,
    pub frame: &'a IndicatorFrame,
    pub config: &'a EngineConfig,
    pub signal: &'a dyn SignalGenerator,
    pub filter: &'a dyn SignalFilter,
}

impl BarContext<'_> {
    pub fn candle(&self) -> &Candle {
        &self.candles[self.index]
    }
}

/// Advance the simulation by one bar.
pub fn step(mut state: SimulationState, ctx: &BarContext<'_>) -> SimulationState {
    let candle = *ctx.candle();

    if let Some(open) = state.open_trade {
        if let Some(status) = open.exit_status(candle.close) {
            let closed = open.close(candle.close, candle.time, status);
            debug!(
                bar = ctx.index,
                direction = ?closed.direction,
                status = ?closed.status,
                exit_price = closed.exit_price,
                pnl_percent = closed.pnl_percent,
                "trade exited"
            );
            state.open_trade = None;
            state.record_close(closed);
        }
        return state;
    }

    let day = candle.day_key();
    if !state.trades_per_day.allows_entry(day) {
        return state;
    }

    let Some(signal) = ctx.signal.evaluate(ctx.candles, ctx.index) else {
        return state;
    };
    state.stats.fired += 1;

    if let FilterVerdict::NearSupportResistance { level } = ctx.filter.evaluate(&signal, ctx.candles)
    {
        debug!(
            bar = ctx.index,
            direction = ?signal.direction,
            price = signal.price,
            sr_level = level,
            "signal rejected near support/resistance"
        );
        state.stats.filtered += 1;
        return state;
    }

    if !ctx.frame.is_defined(ctx.index) {
        debug!(bar = ctx.index, "signal skipped: indicators undefined");
        state.stats.indicator_gated += 1;
        return state;
    }

    let trade = OpenTrade::open(
        signal.direction,
        signal.price,
        signal.time,
        ctx.config.profit_target_percent,
        ctx.config.stop_loss_percent,
    );
    debug!(
        bar = ctx.index,
        day = %day,
        direction = ?trade.direction,
        entry_price = trade.entry_price,
        stop_price = trade.stop_price,
        target_price = trade.target_price,
        "trade entered"
    );
    state.trades_per_day.record_entry(day);
    state.open_trade = Some(trade);
    state
}

/// Close any trade still open at the final candle, at its close.
pub fn close_open_trade(mut state: SimulationState, last: &Candle) -> SimulationState {
    if let Some(open) = state.open_trade.take() {
        let closed = open.close(last.close, last.time, TradeStatus::Closed);
        debug!(
            direction = ?closed.direction,
            exit_price = closed.exit_price,
            pnl_percent = closed.pnl_percent,
            "open trade force-closed at final candle"
        );
        state.record_close(closed);
    }
    state
}
