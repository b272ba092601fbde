//! Indicator precomputation.
//!
//! Both indicator series are computed once before the bar loop, as a forward
//! scan over the whole candle series. The frame has no dependency on trade
//! state.

use crate::components::indicator::Indicator;
use crate::domain::Candle;

/// Trend and momentum series aligned 1:1 with the candles.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    /// EMA of closes (defined from index 0).
    pub ema: Vec<f64>,
    /// RSI of closes (NaN at index 0).
    pub rsi: Vec<f64>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.ema.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ema.is_empty()
    }

    /// Both series hold a number at `index`.
    ///
    /// This is a data-availability gate only; the values are not used as
    /// entry conditions.
    pub fn is_defined(&self, index: usize) -> bool {
        matches!(
            (self.ema.get(index), self.rsi.get(index)),
            (Some(ema), Some(rsi)) if !ema.is_nan() && !rsi.is_nan()
        )
    }
}

/// Precompute the trend and momentum indicators for one candle series.
pub fn precompute_indicators(
    candles: &[Candle],
    trend: &dyn Indicator,
    momentum: &dyn Indicator,
) -> IndicatorFrame {
    let ema = trend.compute(candles);
    let rsi = momentum.compute(candles);
    debug_assert_eq!(
        ema.len(),
        candles.len(),
        "indicator '{}' produced {} values for {} candles",
        trend.name(),
        ema.len(),
        candles.len()
    );
    debug_assert_eq!(
        rsi.len(),
        candles.len(),
        "indicator '{}' produced {} values for {} candles",
        momentum.name(),
        rsi.len(),
        candles.len()
    );
    IndicatorFrame { ema, rsi }
}
