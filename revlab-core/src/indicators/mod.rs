//! Concrete indicator implementations.
//!
//! Both indicators implement the `Indicator` trait from `components::indicator`
//! and are precomputed once before the bar loop into an `IndicatorFrame`.

pub mod ema;
pub mod rsi;

pub use ema::{ema_of_series, Ema};
pub use rsi::{rsi_of_series, Rsi, NEUTRAL_RSI};

/// Create synthetic candles from close prices for testing.
///
/// open = prev_close (or close for the first candle),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1.0,
/// one candle per hour from 2024-01-01T00:00:00Z.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<crate::domain::Candle> {
    use crate::domain::Candle;
    const BASE_TIME: i64 = 1_704_067_200;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                time: BASE_TIME + i as i64 * 3_600,
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
