//! RevLab Core — deterministic candle-reversal backtesting.
//!
//! - Domain types (candles, day keys, open and closed trades)
//! - Interval normalization
//! - EMA and RSI indicators, precomputed once per run
//! - Reversal signal and support/resistance filter components
//! - Bar-by-bar trade state machine with a daily entry cap and compounding
//! - Candle sources (Binance REST, CSV, seeded synthetic)
//! - TOML configuration, parameter sweeps and run fingerprints

pub mod components;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod fingerprint;
pub mod indicators;
pub mod interval;
pub mod runner;
pub mod sweep;

pub use config::{BacktestConfig, ConfigError};
pub use engine::{run_backtest, BacktestError};
pub use interval::{normalize_interval, Interval};
pub use runner::{run_configured, run_single_backtest, BacktestResult, RunSummary};
