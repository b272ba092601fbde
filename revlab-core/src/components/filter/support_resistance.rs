//! Support/resistance proximity filter.
//!
//! Rejects a candidate entry whose price lies within `tolerance` (fractional
//! distance) of any high or low among the `lookback` candles strictly before
//! the signal bar. The signal bar itself is never part of the window.

use crate::components::signal::SignalEvent;
use crate::domain::Candle;

use super::{FilterVerdict, SignalFilter};

pub const DEFAULT_SR_LOOKBACK: usize = 5;
pub const DEFAULT_SR_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct SupportResistanceFilter {
    pub lookback: usize,
    pub tolerance: f64,
}

impl SupportResistanceFilter {
    pub fn new(lookback: usize, tolerance: f64) -> Self {
        assert!(
            tolerance.is_finite() && tolerance >= 0.0,
            "tolerance must be finite and >= 0"
        );
        Self {
            lookback,
            tolerance,
        }
    }

    pub fn default_params() -> Self {
        Self::new(DEFAULT_SR_LOOKBACK, DEFAULT_SR_TOLERANCE)
    }

    /// First recent level within tolerance of `price`, if any.
    ///
    /// Window: `candles[index.saturating_sub(lookback)..index]`, fewer candles
    /// near the start of the series. Highs are checked before lows per candle.
    pub fn nearby_level(&self, candles: &[Candle], index: usize, price: f64) -> Option<f64> {
        let end = index.min(candles.len());
        let start = end.saturating_sub(self.lookback);
        candles[start..end]
            .iter()
            .flat_map(|c| [c.high, c.low])
            .find(|&level| (price - level).abs() / level <= self.tolerance)
    }

    /// True when the entry should be rejected.
    pub fn near(&self, candles: &[Candle], index: usize, price: f64) -> bool {
        self.nearby_level(candles, index, price).is_some()
    }
}

impl Default for SupportResistanceFilter {
    fn default() -> Self {
        Self::default_params()
    }
}

impl SignalFilter for SupportResistanceFilter {
    fn name(&self) -> &str {
        "support_resistance"
    }

    fn evaluate(&self, signal: &SignalEvent, candles: &[Candle]) -> FilterVerdict {
        match self.nearby_level(candles, signal.bar_index, signal.price) {
            Some(level) => FilterVerdict::NearSupportResistance { level },
            None => FilterVerdict::Passed,
        }
    }
}
