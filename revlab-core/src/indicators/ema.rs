//! Exponential Moving Average (EMA).
//!
//! Recursive, no bias correction: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1]
//! with alpha = 2 / (span + 1).
//! Seed: EMA[0] = close[0]. Lookback: 0.

use crate::components::indicator::{closes, Indicator};
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("ema_{span}"),
        }
    }

    pub fn span(&self) -> usize {
        self.span
    }

    pub fn alpha(&self) -> f64 {
        2.0 / (self.span as f64 + 1.0)
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        ema_of_series(&closes(candles), self.span)
    }
}

/// EMA of an arbitrary series.
///
/// Leading NaN values are skipped: the first defined value seeds the
/// recursion. A NaN after the seed repeats the previous value and leaves the
/// recursion untouched, so later inputs pick up where it left off.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return vec![f64::NAN; values.len()];
    }
    ewm_of_series(values, 2.0 / (span as f64 + 1.0))
}

/// Recursive exponential weighting with an explicit smoothing factor.
pub(crate) fn ewm_of_series(values: &[f64], alpha: f64) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    let Some(start) = values.iter().position(|v| !v.is_nan()) else {
        return result;
    };

    let mut prev = values[start];
    result[start] = prev;
    for i in (start + 1)..n {
        if values[i].is_nan() {
            result[i] = prev;
            continue;
        }
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}
