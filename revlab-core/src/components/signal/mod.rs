//! Signal generation — detects candle patterns, emits directional intent.
//!
//! Signals are position-agnostic: they receive candle history only, never the
//! open trade or the balance. Signal events are immutable once emitted; they
//! describe a market event, not a downstream decision.

pub mod reversal;

pub use reversal::ReversalSignal;

use crate::domain::{Candle, Direction};

/// An immutable market event emitted by a signal generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalEvent {
    pub bar_index: usize,
    pub time: i64,
    pub direction: Direction,
    /// Candidate entry price (the signal bar's close).
    pub price: f64,
}

/// Trait for signal generators.
///
/// # Architecture invariant
/// Signals must never reference trade state. If an implementation needs the
/// open trade or the balance, it belongs in the engine, not here.
pub trait SignalGenerator: Send + Sync {
    /// Human-readable name (e.g., "candle_reversal").
    fn name(&self) -> &str;

    /// First bar index at which this signal may be evaluated.
    fn warmup_bars(&self) -> usize;

    /// Evaluate the signal at `bar_index`.
    ///
    /// The implementation must only use data from `candles[0..=bar_index]`.
    fn evaluate(&self, candles: &[Candle], bar_index: usize) -> Option<SignalEvent>;
}

/// Signal that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSignal;

impl SignalGenerator for NullSignal {
    fn name(&self) -> &str {
        "null"
    }

    fn warmup_bars(&self) -> usize {
        0
    }

    fn evaluate(&self, _candles: &[Candle], _bar_index: usize) -> Option<SignalEvent> {
        None
    }
}
