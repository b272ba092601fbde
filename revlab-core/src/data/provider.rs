//! Candle source trait and structured error types.
//!
//! The `CandleSource` trait abstracts over where candles come from (exchange
//! REST API, CSV file, synthetic generator) so the engine never depends on a
//! concrete source and tests can swap in fixtures.

use crate::domain::Candle;
use crate::interval::Interval;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Epoch values at or above this are taken to be milliseconds.
///
/// 10^11 seconds is in the year 5138; 10^11 milliseconds is March 1973.
pub const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Structured error types for candle sources.
///
/// Malformed upstream data is the source's concern: the engine assumes
/// well-formed candles once it receives them.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited by exchange (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("exchange has banned this client (HTTP 418)")]
    Banned,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("unexpected response format: {0}")]
    ResponseFormat(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid candle at index {index}: {reason}")]
    InvalidCandle { index: usize, reason: String },

    #[error("no candles returned for {symbol}")]
    Empty { symbol: String },
}

impl DataError {
    /// Worth retrying after a delay.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::RateLimited { .. })
            || matches!(self, Self::Http { status, .. } if *status >= 500)
    }
}

/// What to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandleRequest {
    pub symbol: String,
    pub interval: Interval,
    /// Most recent candles to return.
    pub limit: usize,
}

impl CandleRequest {
    pub fn new(symbol: impl Into<String>, interval: Interval, limit: usize) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            limit,
        }
    }
}

/// Where the candles came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Binance,
    Csv,
    Synthetic,
}

/// Trait for candle sources.
///
/// Implementations return candles ascending by time with no duplicate
/// timestamps, times in unix seconds.
pub trait CandleSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    fn kind(&self) -> SourceKind;

    fn fetch(&self, request: &CandleRequest) -> Result<Vec<Candle>, DataError>;
}

/// Convert an epoch value in seconds or milliseconds to seconds.
pub fn epoch_to_seconds(value: i64) -> i64 {
    if value.abs() >= MILLIS_THRESHOLD {
        value.div_euclid(1_000)
    } else {
        value
    }
}

/// Check that candles are finite and strictly ascending by time.
pub fn validate_candles(candles: &[Candle]) -> Result<(), DataError> {
    for (index, candle) in candles.iter().enumerate() {
        if candle.is_void() {
            return Err(DataError::InvalidCandle {
                index,
                reason: "non-finite OHLCV value".into(),
            });
        }
        if index > 0 && candle.time <= candles[index - 1].time {
            return Err(DataError::InvalidCandle {
                index,
                reason: format!(
                    "time {} does not follow {}",
                    candle.time,
                    candles[index - 1].time
                ),
            });
        }
    }
    Ok(())
}

/// Keep only the most recent `limit` candles. A limit of zero keeps all.
pub(crate) fn keep_latest(mut candles: Vec<Candle>, limit: usize) -> Vec<Candle> {
    if limit > 0 && candles.len() > limit {
        candles.drain(..candles.len() - limit);
    }
    candles
}
