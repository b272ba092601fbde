//! Component traits — the strategy composition model.
//!
//! A strategy is composed of two independent market-facing components:
//! - Signal generator: detects candle patterns, emits directional intent
//! - Signal filter: gates entry signals based on market structure
//!
//! Plus the indicator trait for precomputed numeric series.

pub mod filter;
pub mod indicator;
pub mod signal;

pub use filter::{FilterVerdict, NoFilter, SignalFilter, SupportResistanceFilter};
pub use indicator::Indicator;
pub use signal::{NullSignal, ReversalSignal, SignalEvent, SignalGenerator};
