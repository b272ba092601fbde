//! TOML run configuration.
//!
//! Every section and field has a default, so an empty file is a valid
//! configuration that reproduces the stock strategy.

use crate::components::{ReversalSignal, SupportResistanceFilter};
use crate::components::filter::support_resistance::{DEFAULT_SR_LOOKBACK, DEFAULT_SR_TOLERANCE};
use crate::components::signal::reversal::DEFAULT_REVERSAL_MARGIN;
use crate::data::binance::DEFAULT_BASE_URL;
use crate::data::{CandleRequest, SourceKind};
use crate::engine::state::{
    DEFAULT_EMA_SPAN, DEFAULT_INITIAL_BALANCE, DEFAULT_MIN_CANDLES, DEFAULT_PROFIT_TARGET_PERCENT,
    DEFAULT_RSI_LENGTH, DEFAULT_STOP_LOSS_PERCENT,
};
use crate::engine::{EngineConfig, DEFAULT_MAX_TRADES_PER_DAY};
use crate::interval::Interval;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Full run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    pub strategy: StrategySection,
    pub source: SourceSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSection {
    /// Any token; normalized before use.
    pub interval: String,
    pub profit_target_percent: f64,
    pub stop_loss_percent: f64,
}

impl Default for BacktestSection {
    fn default() -> Self {
        Self {
            interval: Interval::default().as_str().to_string(),
            profit_target_percent: DEFAULT_PROFIT_TARGET_PERCENT,
            stop_loss_percent: DEFAULT_STOP_LOSS_PERCENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySection {
    pub initial_balance: f64,
    pub max_trades_per_day: u32,
    pub min_candles: usize,
    pub ema_span: usize,
    pub rsi_length: usize,
    pub sr_lookback: usize,
    pub sr_tolerance: f64,
    pub reversal_margin: f64,
}

impl Default for StrategySection {
    fn default() -> Self {
        Self {
            initial_balance: DEFAULT_INITIAL_BALANCE,
            max_trades_per_day: DEFAULT_MAX_TRADES_PER_DAY,
            min_candles: DEFAULT_MIN_CANDLES,
            ema_span: DEFAULT_EMA_SPAN,
            rsi_length: DEFAULT_RSI_LENGTH,
            sr_lookback: DEFAULT_SR_LOOKBACK,
            sr_tolerance: DEFAULT_SR_TOLERANCE,
            reversal_margin: DEFAULT_REVERSAL_MARGIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    pub kind: SourceKind,
    pub symbol: String,
    pub limit: usize,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Required when `kind = "csv"`.
    pub csv_path: Option<PathBuf>,
    /// Seed for `kind = "synthetic"`.
    pub seed: u64,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            kind: SourceKind::Binance,
            symbol: "BTCUSDT".to_string(),
            limit: 500,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            csv_path: None,
            seed: 42,
        }
    }
}

impl BacktestConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let bt = &self.backtest;
        let st = &self.strategy;
        positive("backtest.profit_target_percent", bt.profit_target_percent)?;
        positive("backtest.stop_loss_percent", bt.stop_loss_percent)?;
        if bt.stop_loss_percent >= 100.0 {
            return Err(invalid("backtest.stop_loss_percent", "must be below 100"));
        }
        positive("strategy.initial_balance", st.initial_balance)?;
        if st.max_trades_per_day == 0 {
            return Err(invalid("strategy.max_trades_per_day", "must be at least 1"));
        }
        if st.min_candles < 3 {
            return Err(invalid("strategy.min_candles", "must be at least 3"));
        }
        if st.ema_span == 0 {
            return Err(invalid("strategy.ema_span", "must be at least 1"));
        }
        if st.rsi_length == 0 {
            return Err(invalid("strategy.rsi_length", "must be at least 1"));
        }
        if !st.sr_tolerance.is_finite() || st.sr_tolerance < 0.0 {
            return Err(invalid("strategy.sr_tolerance", "must be finite and >= 0"));
        }
        if !st.reversal_margin.is_finite() || st.reversal_margin < 0.0 {
            return Err(invalid("strategy.reversal_margin", "must be finite and >= 0"));
        }
        if self.source.kind == SourceKind::Csv && self.source.csv_path.is_none() {
            return Err(invalid("source.csv_path", "is required for the csv source"));
        }
        Ok(())
    }

    pub fn interval(&self) -> Interval {
        Interval::normalize(&self.backtest.interval)
    }

    pub fn engine_config(&self) -> EngineConfig {
        let st = &self.strategy;
        EngineConfig {
            initial_balance: st.initial_balance,
            max_trades_per_day: st.max_trades_per_day,
            min_candles: st.min_candles,
            ema_span: st.ema_span,
            rsi_length: st.rsi_length,
            profit_target_percent: self.backtest.profit_target_percent,
            stop_loss_percent: self.backtest.stop_loss_percent,
        }
    }

    pub fn signal(&self) -> ReversalSignal {
        ReversalSignal::new(self.strategy.reversal_margin)
    }

    pub fn filter(&self) -> SupportResistanceFilter {
        SupportResistanceFilter::new(self.strategy.sr_lookback, self.strategy.sr_tolerance)
    }

    pub fn candle_request(&self) -> CandleRequest {
        CandleRequest::new(self.source.symbol.clone(), self.interval(), self.source.limit)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be finite and > 0"))
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
