//! Single-run entry points and the serialized backtest result.

use crate::components::{ReversalSignal, SupportResistanceFilter};
use crate::config::BacktestConfig;
use crate::domain::{Candle, ClosedTrade, TradeStatus};
use crate::engine::{round_cents, run_backtest, BacktestError, EngineConfig, RunResult};
use crate::interval::Interval;
use serde::{Deserialize, Serialize};

/// Outcome of one backtest, in output field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Normalized interval code.
    pub interval: Interval,
    pub candles: Vec<Candle>,
    pub trades: Vec<ClosedTrade>,
    /// Rounded to cents.
    pub final_balance: f64,
    pub n_trades: usize,
}

/// Trade-log statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub wins: usize,
    pub losses: usize,
    /// Trades closed at the last candle.
    pub forced: usize,
    /// `wins / n_trades`, 0 with no trades.
    pub win_rate: f64,
    pub total_return_percent: f64,
}

impl BacktestResult {
    pub fn from_run(interval: Interval, candles: Vec<Candle>, run: RunResult) -> Self {
        Self {
            interval,
            candles,
            n_trades: run.trades.len(),
            final_balance: round_cents(run.final_balance),
            trades: run.trades,
        }
    }

    pub fn summary(&self) -> RunSummary {
        let count = |status: TradeStatus| self.trades.iter().filter(|t| t.status == status).count();
        let wins = count(TradeStatus::Win);
        let growth: f64 = self.trades.iter().map(ClosedTrade::growth_factor).product();
        RunSummary {
            wins,
            losses: count(TradeStatus::Loss),
            forced: count(TradeStatus::Closed),
            win_rate: if self.trades.is_empty() {
                0.0
            } else {
                wins as f64 / self.trades.len() as f64
            },
            total_return_percent: (growth - 1.0) * 100.0,
        }
    }
}

/// Run the stock strategy with explicit exit thresholds.
///
/// `interval` is any token; it is normalized and echoed in the result.
/// Thresholds are validated by the engine before the length check.
pub fn run_single_backtest(
    candles: Vec<Candle>,
    interval: &str,
    profit_target_percent: f64,
    stop_loss_percent: f64,
) -> Result<BacktestResult, BacktestError> {
    let config = EngineConfig::new(profit_target_percent, stop_loss_percent);
    let run = run_backtest(
        &candles,
        &config,
        &ReversalSignal::default_params(),
        &SupportResistanceFilter::default_params(),
    )?;
    Ok(BacktestResult::from_run(
        Interval::normalize(interval),
        candles,
        run,
    ))
}

/// Run with every parameter taken from a loaded configuration.
pub fn run_configured(
    candles: Vec<Candle>,
    config: &BacktestConfig,
) -> Result<BacktestResult, BacktestError> {
    let run = run_backtest(
        &candles,
        &config.engine_config(),
        &config.signal(),
        &config.filter(),
    )?;
    Ok(BacktestResult::from_run(config.interval(), candles, run))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;

    const T0: i64 = 1_704_067_200;

    fn flat(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle {
                time: T0 + i as i64 * 900,
                open: 100.0,
                high: 100.5,
                low: 99.5,
                close: 100.0,
                volume: 1.0,
            })
            .collect()
    }

    fn trade(status: TradeStatus, pnl_percent: f64) -> ClosedTrade {
        ClosedTrade {
            entry_time: T0,
            exit_time: T0 + 900,
            entry_price: 100.0,
            exit_price: 100.0 + pnl_percent,
            pnl_percent,
            status,
            direction: Direction::Long,
        }
    }

    #[test]
    fn too_short_is_refused() {
        let err = run_single_backtest(flat(9), "15m", 4.0, 10.0).unwrap_err();
        assert_eq!(err.to_string(), "Insufficient candle data");
    }

    #[test]
    fn negative_target_is_refused() {
        let err = run_single_backtest(flat(20), "15m", -5.0, 10.0).unwrap_err();
        assert!(matches!(
            err,
            BacktestError::InvalidParameter {
                field: "profit_target_percent",
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "invalid parameter: profit_target_percent must be finite and > 0"
        );
    }

    #[test]
    fn flat_series_has_no_trades() {
        let result = run_single_backtest(flat(20), "60m", 4.0, 10.0).unwrap();
        assert_eq!(result.interval, Interval::H1);
        assert_eq!(result.n_trades, 0);
        assert_eq!(result.final_balance, 10_000.0);
        assert_eq!(result.candles.len(), 20);
    }

    #[test]
    fn json_field_order() {
        let result = run_single_backtest(flat(10), "weird", 4.0, 10.0).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.starts_with(r#"{"interval":"15m","candles":[{"time":"#));
        let trades = json.find(r#""trades""#).unwrap();
        let balance = json.find(r#""final_balance""#).unwrap();
        let n = json.find(r#""n_trades""#).unwrap();
        assert!(trades < balance && balance < n);
    }

    #[test]
    fn configured_run_uses_config_interval() {
        let mut config = BacktestConfig::default();
        config.backtest.interval = "4h".into();
        let result = run_configured(flat(12), &config).unwrap();
        assert_eq!(result.interval, Interval::H4);
    }

    #[test]
    fn summary_counts_statuses() {
        let result = BacktestResult {
            interval: Interval::M15,
            candles: Vec::new(),
            trades: vec![
                trade(TradeStatus::Win, 4.0),
                trade(TradeStatus::Loss, -10.0),
                trade(TradeStatus::Win, 4.0),
                trade(TradeStatus::Closed, 1.0),
            ],
            final_balance: 0.0,
            n_trades: 4,
        };
        let summary = result.summary();
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.forced, 1);
        assert!((summary.win_rate - 0.5).abs() < 1e-12);
        let expected = (1.04 * 0.90 * 1.04 * 1.01 - 1.0) * 100.0;
        assert!((summary.total_return_percent - expected).abs() < 1e-9);
    }

    #[test]
    fn summary_of_empty_log() {
        let result = run_single_backtest(flat(10), "15m", 4.0, 10.0).unwrap();
        let summary = result.summary();
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.total_return_percent, 0.0);
    }
}
