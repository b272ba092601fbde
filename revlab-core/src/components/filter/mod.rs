//! Signal filter — gates entry signals based on market structure.
//!
//! Filters evaluate signal events and return a `FilterVerdict`.
//! A pass-through "no filter" is provided for isolating the signal.

pub mod support_resistance;

pub use support_resistance::SupportResistanceFilter;

use crate::domain::Candle;

use super::signal::SignalEvent;

/// Outcome of a signal filter evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterVerdict {
    Passed,
    /// Entry price sits within tolerance of a recent high or low.
    NearSupportResistance { level: f64 },
}

impl FilterVerdict {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Trait for signal filters.
///
/// # Architecture invariant
/// Filters must not reference trade state; they evaluate market conditions only.
pub trait SignalFilter: Send + Sync {
    /// Human-readable name (e.g., "support_resistance", "no_filter").
    fn name(&self) -> &str;

    /// Evaluate whether a signal should be allowed through.
    fn evaluate(&self, signal: &SignalEvent, candles: &[Candle]) -> FilterVerdict;
}

/// Pass-through filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFilter;

impl SignalFilter for NoFilter {
    fn name(&self) -> &str {
        "no_filter"
    }

    fn evaluate(&self, _signal: &SignalEvent, _candles: &[Candle]) -> FilterVerdict {
        FilterVerdict::Passed
    }
}
