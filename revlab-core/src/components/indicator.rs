//! Indicator trait.
//!
//! Indicators are pure functions: candle history in, numeric series out.
//! They are precomputed once before the bar loop and read by index during
//! the loop. No recomputation on each bar.

use crate::domain::Candle;

/// Trait for indicators.
///
/// Indicators take a full candle series and produce a numeric output series
/// of the same length. Values that are not yet defined are `f64::NAN`.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_21", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading bars whose output is NaN.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire candle series.
    fn compute(&self, candles: &[Candle]) -> Vec<f64>;
}

/// Extract closing prices.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}
