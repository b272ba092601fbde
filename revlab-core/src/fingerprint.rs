//! Run fingerprinting: content hashes that identify a backtest's inputs and
//! outputs.
//!
//! - `dataset_hash`: the candle series.
//! - `params_hash`: interval, exit thresholds and strategy constants.
//! - `result_hash`: the trade log and final balance.
//!
//! Each is the BLAKE3 hex digest of canonical JSON, so two runs with equal
//! fingerprints are interchangeable.

use crate::config::{BacktestConfig, StrategySection};
use crate::domain::{Candle, ClosedTrade};
use crate::interval::Interval;
use crate::runner::BacktestResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunFingerprint {
    pub dataset_hash: String,
    pub params_hash: String,
    pub result_hash: String,
}

#[derive(Serialize)]
struct EffectiveParams<'a> {
    interval: Interval,
    profit_target_percent: f64,
    stop_loss_percent: f64,
    strategy: &'a StrategySection,
}

#[derive(Serialize)]
struct Outcome<'a> {
    trades: &'a [ClosedTrade],
    final_balance: f64,
}

impl RunFingerprint {
    pub fn compute(
        result: &BacktestResult,
        config: &BacktestConfig,
    ) -> Result<Self, serde_json::Error> {
        let params = EffectiveParams {
            interval: result.interval,
            profit_target_percent: config.backtest.profit_target_percent,
            stop_loss_percent: config.backtest.stop_loss_percent,
            strategy: &config.strategy,
        };
        let outcome = Outcome {
            trades: &result.trades,
            final_balance: result.final_balance,
        };
        Ok(Self {
            dataset_hash: dataset_hash(&result.candles)?,
            params_hash: hash_json(&params)?,
            result_hash: hash_json(&outcome)?,
        })
    }

    /// First 16 hex characters of each hash, for display.
    pub fn short(&self) -> String {
        format!(
            "{}-{}-{}",
            &self.dataset_hash[..16],
            &self.params_hash[..16],
            &self.result_hash[..16]
        )
    }
}

pub fn dataset_hash(candles: &[Candle]) -> Result<String, serde_json::Error> {
    hash_json(&candles)
}

fn hash_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(value)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}
