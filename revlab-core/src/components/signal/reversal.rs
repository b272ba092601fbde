//! Candle reversal signal — a bar that closes against the previous bar's color
//! and clears its extreme (or its close by a small margin).
//!
//! Long: previous bearish, current bullish, and current close above the
//! previous high or above previous close * (1 + margin).
//! Short: previous bullish, current bearish, and current close below the
//! previous low or below previous close * (1 - margin).
//! Long is checked first; at most one direction fires per bar.

use crate::domain::{Candle, Direction};

use super::{SignalEvent, SignalGenerator};

/// Default close-to-close margin (0.03%).
pub const DEFAULT_REVERSAL_MARGIN: f64 = 0.0003;

/// Two-candle reversal pattern detector.
#[derive(Debug, Clone)]
pub struct ReversalSignal {
    pub margin: f64,
}

impl ReversalSignal {
    pub fn new(margin: f64) -> Self {
        assert!(
            margin.is_finite() && margin >= 0.0,
            "reversal margin must be finite and >= 0"
        );
        Self { margin }
    }

    pub fn default_params() -> Self {
        Self::new(DEFAULT_REVERSAL_MARGIN)
    }

    /// Direction of the pattern formed by `prev` → `cur`, if any.
    pub fn detect(&self, prev: &Candle, cur: &Candle) -> Option<Direction> {
        let bullish_reversal = prev.is_bearish()
            && cur.is_bullish()
            && (cur.close > prev.high || cur.close > prev.close * (1.0 + self.margin));
        if bullish_reversal {
            return Some(Direction::Long);
        }

        let bearish_reversal = prev.is_bullish()
            && cur.is_bearish()
            && (cur.close < prev.low || cur.close < prev.close * (1.0 - self.margin));
        if bearish_reversal {
            return Some(Direction::Short);
        }

        None
    }
}

impl Default for ReversalSignal {
    fn default() -> Self {
        Self::default_params()
    }
}

impl SignalGenerator for ReversalSignal {
    fn name(&self) -> &str {
        "candle_reversal"
    }

    fn warmup_bars(&self) -> usize {
        2
    }

    fn evaluate(&self, candles: &[Candle], bar_index: usize) -> Option<SignalEvent> {
        if bar_index < self.warmup_bars() || bar_index >= candles.len() {
            return None;
        }

        let prev = &candles[bar_index - 1];
        let cur = &candles[bar_index];
        let direction = self.detect(prev, cur)?;

        Some(SignalEvent {
            bar_index,
            time: cur.time,
            direction,
            price: cur.close,
        })
    }
}
