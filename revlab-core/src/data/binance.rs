//! Binance spot kline source.
//!
//! Fetches OHLCV candles from the public `/api/v3/klines` endpoint. No
//! authentication. Retries transient failures with exponential backoff.
//!
//! Each kline is an array: `[open_time_ms, "open", "high", "low", "close",
//! "volume", close_time_ms, ...]` with prices as decimal strings.

use super::provider::{
    epoch_to_seconds, keep_latest, validate_candles, CandleRequest, CandleSource, DataError,
    SourceKind,
};
use crate::domain::Candle;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";
/// Largest page the klines endpoint serves.
pub const MAX_LIMIT: usize = 1000;
/// Page size requested when the caller sets no limit.
pub const DEFAULT_LIMIT: usize = 500;

/// Binance kline source.
pub struct BinanceSource {
    client: reqwest::blocking::Client,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl BinanceSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("revlab/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    pub fn with_retries(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_delay = base_delay;
        self
    }

    /// Build the klines URL for a request.
    pub fn klines_url(&self, request: &CandleRequest) -> String {
        let limit = match request.limit {
            0 => DEFAULT_LIMIT,
            n => n.min(MAX_LIMIT),
        };
        format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={limit}",
            self.base_url,
            request.symbol.to_uppercase(),
            request.interval.as_str(),
        )
    }

    fn fetch_once(&self, url: &str) -> Result<Value, DataError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::Network(e.to_string()))?;
        let status = resp.status();

        if status == reqwest::StatusCode::IM_A_TEAPOT {
            return Err(DataError::Banned);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(DataError::Http {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<Value>()
            .map_err(|e| DataError::ResponseFormat(format!("body is not JSON: {e}")))
    }

    fn fetch_with_retry(&self, url: &str) -> Result<Value, DataError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url) {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.base_delay * 2u32.pow(attempt - 1);
                    warn!(error = %e, attempt, ?delay, "kline request failed, retrying");
                    std::thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl CandleSource for BinanceSource {
    fn name(&self) -> &str {
        "binance"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Binance
    }

    fn fetch(&self, request: &CandleRequest) -> Result<Vec<Candle>, DataError> {
        let url = self.klines_url(request);
        debug!(%url, "fetching klines");
        let body = self.fetch_with_retry(&url)?;
        let candles = parse_klines(&body)?;
        if candles.is_empty() {
            return Err(DataError::Empty {
                symbol: request.symbol.clone(),
            });
        }
        validate_candles(&candles)?;
        Ok(keep_latest(candles, request.limit))
    }
}

/// Parse a klines response body into candles sorted by time.
pub fn parse_klines(body: &Value) -> Result<Vec<Candle>, DataError> {
    let rows = match body {
        Value::Array(rows) => rows,
        Value::Object(obj) => {
            let msg = obj
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or("object instead of kline array");
            return Err(DataError::ResponseFormat(msg.to_string()));
        }
        other => {
            return Err(DataError::ResponseFormat(format!(
                "expected kline array, got {other}"
            )))
        }
    };

    let mut candles = rows
        .iter()
        .enumerate()
        .map(|(i, row)| parse_row(i, row))
        .collect::<Result<Vec<_>, _>>()?;
    candles.sort_by_key(|c| c.time);
    Ok(candles)
}

fn parse_row(index: usize, row: &Value) -> Result<Candle, DataError> {
    let fields = row
        .as_array()
        .filter(|f| f.len() >= 6)
        .ok_or_else(|| DataError::ResponseFormat(format!("kline {index} is not a 6+ field array")))?;

    let open_time = fields[0]
        .as_i64()
        .ok_or_else(|| DataError::ResponseFormat(format!("kline {index}: bad open time")))?;

    let number = |pos: usize, name: &str| -> Result<f64, DataError> {
        let value = match &fields[pos] {
            Value::String(s) => s.parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        };
        value.ok_or_else(|| DataError::ResponseFormat(format!("kline {index}: bad {name}")))
    };

    Ok(Candle {
        time: epoch_to_seconds(open_time),
        open: number(1, "open")?,
        high: number(2, "high")?,
        low: number(3, "low")?,
        close: number(4, "close")?,
        volume: number(5, "volume")?,
    })
}
