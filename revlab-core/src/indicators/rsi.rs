//! Relative Strength Index (RSI).
//!
//! Wilder smoothing (alpha = 1 / length) of average gains and average losses,
//! seeded recursively from the first close-to-close change at index 1.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: 1 (index 0 has no prior close).
//! Edge case: avg_loss == 0 → RSI = 50 (ratio undefined, reported neutral).

use super::ema::ewm_of_series;
use crate::components::indicator::{closes, Indicator};
use crate::domain::Candle;

/// RSI reported when the average loss is zero.
pub const NEUTRAL_RSI: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct Rsi {
    length: usize,
    name: String,
}

impl Rsi {
    pub fn new(length: usize) -> Self {
        assert!(length >= 1, "RSI length must be >= 1");
        Self {
            length,
            name: format!("rsi_{length}"),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        rsi_of_series(&closes(candles), self.length)
    }
}

/// RSI of an arbitrary series.
pub fn rsi_of_series(values: &[f64], length: usize) -> Vec<f64> {
    let n = values.len();
    if length == 0 {
        return vec![f64::NAN; n];
    }

    let mut gains = vec![f64::NAN; n];
    let mut losses = vec![f64::NAN; n];
    for i in 1..n {
        let change = values[i] - values[i - 1];
        if change.is_nan() {
            continue;
        }
        gains[i] = change.max(0.0);
        losses[i] = (-change).max(0.0);
    }

    let alpha = 1.0 / length as f64;
    let avg_gain = ewm_of_series(&gains, alpha);
    let avg_loss = ewm_of_series(&losses, alpha);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&gain, &loss)| compute_rsi(gain, loss))
        .collect()
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain.is_nan() || avg_loss.is_nan() {
        f64::NAN
    } else if avg_loss == 0.0 {
        NEUTRAL_RSI
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
