//! Exit-threshold grid sweep over one candle series.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::BacktestConfig;
use crate::domain::{Candle, TradeStatus};
use crate::engine::{round_cents, run_backtest, BacktestError, EngineConfig};

/// Profit-target and stop-loss values to cross.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    pub profit_targets: Vec<f64>,
    pub stop_losses: Vec<f64>,
}

impl SweepGrid {
    pub fn new(profit_targets: Vec<f64>, stop_losses: Vec<f64>) -> Self {
        Self {
            profit_targets,
            stop_losses,
        }
    }

    /// Number of runs in the grid.
    pub fn size(&self) -> usize {
        self.profit_targets.len() * self.stop_losses.len()
    }

    /// `(profit_target, stop_loss)` pairs, profit target outer.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.profit_targets
            .iter()
            .flat_map(|&tp| self.stop_losses.iter().map(move |&sl| (tp, sl)))
            .collect()
    }
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self::new(vec![2.0, 4.0, 6.0], vec![5.0, 10.0])
    }
}

/// One grid point's outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepEntry {
    pub profit_target_percent: f64,
    pub stop_loss_percent: f64,
    pub final_balance: f64,
    pub n_trades: usize,
    pub win_rate: f64,
}

/// Run every grid point in parallel. Results keep grid order.
///
/// All other parameters come from `base`. Every point is validated before
/// the first run starts. The candle slice is shared read-only; each run owns
/// its own state.
pub fn run_sweep(
    candles: &[Candle],
    base: &BacktestConfig,
    grid: &SweepGrid,
) -> Result<Vec<SweepEntry>, BacktestError> {
    let configs = grid
        .points()
        .into_iter()
        .map(|(tp, sl)| {
            let mut config = base.engine_config();
            config.profit_target_percent = tp;
            config.stop_loss_percent = sl;
            config.validate().map(|()| config)
        })
        .collect::<Result<Vec<EngineConfig>, _>>()?;

    let signal = base.signal();
    let filter = base.filter();
    configs
        .par_iter()
        .map(|config| {
            let tp = config.profit_target_percent;
            let sl = config.stop_loss_percent;
            let run = run_backtest(candles, config, &signal, &filter)?;
            let wins = run
                .trades
                .iter()
                .filter(|t| t.status == TradeStatus::Win)
                .count();
            Ok(SweepEntry {
                profit_target_percent: tp,
                stop_loss_percent: sl,
                final_balance: round_cents(run.final_balance),
                n_trades: run.trades.len(),
                win_rate: if run.trades.is_empty() {
                    0.0
                } else {
                    wins as f64 / run.trades.len() as f64
                },
            })
        })
        .collect()
}

/// Sort entries best final balance first; ties keep grid order.
pub fn rank_entries(entries: &mut [SweepEntry]) {
    entries.sort_by(|a, b| b.final_balance.total_cmp(&a.final_balance));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CandleRequest, SyntheticSource};
    use crate::interval::Interval;
    use crate::runner::run_configured;

    fn candles() -> Vec<Candle> {
        SyntheticSource::new(3).generate(&CandleRequest::new("BTCUSDT", Interval::M15, 400))
    }

    #[test]
    fn grid_order_is_profit_target_outer() {
        let grid = SweepGrid::new(vec![1.0, 2.0], vec![5.0, 10.0, 15.0]);
        assert_eq!(grid.size(), 6);
        assert_eq!(
            grid.points(),
            vec![(1.0, 5.0), (1.0, 10.0), (1.0, 15.0), (2.0, 5.0), (2.0, 10.0), (2.0, 15.0)]
        );
    }

    #[test]
    fn sweep_matches_single_runs() {
        let candles = candles();
        let base = BacktestConfig::default();
        let grid = SweepGrid::default();
        let entries = run_sweep(&candles, &base, &grid).unwrap();
        assert_eq!(entries.len(), grid.size());

        for entry in &entries {
            let mut config = base.clone();
            config.backtest.profit_target_percent = entry.profit_target_percent;
            config.backtest.stop_loss_percent = entry.stop_loss_percent;
            let single = run_configured(candles.clone(), &config).unwrap();
            assert_eq!(entry.final_balance, single.final_balance);
            assert_eq!(entry.n_trades, single.n_trades);
        }
    }

    #[test]
    fn sweep_propagates_short_input() {
        let short = &candles()[..5];
        let err = run_sweep(short, &BacktestConfig::default(), &SweepGrid::default()).unwrap_err();
        assert!(matches!(err, BacktestError::InputTooShort { got: 5, .. }));
    }

    #[test]
    fn sweep_rejects_negative_target() {
        let grid = SweepGrid::new(vec![-5.0], vec![10.0]);
        let err = run_sweep(&candles(), &BacktestConfig::default(), &grid).unwrap_err();
        assert!(matches!(
            err,
            BacktestError::InvalidParameter {
                field: "profit_target_percent",
                ..
            }
        ));
    }

    #[test]
    fn sweep_rejects_stop_at_or_above_100() {
        let grid = SweepGrid::new(vec![2.0, 4.0], vec![10.0, 100.0]);
        let err = run_sweep(&candles(), &BacktestConfig::default(), &grid).unwrap_err();
        assert_eq!(
            err,
            BacktestError::InvalidParameter {
                field: "stop_loss_percent",
                reason: "must be below 100".into(),
            }
        );
    }

    #[test]
    fn bad_point_fails_before_short_input() {
        let short = &candles()[..5];
        let grid = SweepGrid::new(vec![4.0, 0.0], vec![10.0]);
        let err = run_sweep(short, &BacktestConfig::default(), &grid).unwrap_err();
        assert!(matches!(err, BacktestError::InvalidParameter { .. }));
    }

    #[test]
    fn rank_puts_best_first() {
        let entry = |balance: f64| SweepEntry {
            profit_target_percent: 1.0,
            stop_loss_percent: 1.0,
            final_balance: balance,
            n_trades: 0,
            win_rate: 0.0,
        };
        let mut entries = vec![entry(9_000.0), entry(11_000.0), entry(10_000.0)];
        rank_entries(&mut entries);
        let balances: Vec<f64> = entries.iter().map(|e| e.final_balance).collect();
        assert_eq!(balances, vec![11_000.0, 10_000.0, 9_000.0]);
    }
}
