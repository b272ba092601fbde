//! Property tests for engine invariants.
//!
//! Uses proptest to verify, over random candle series and thresholds:
//! 1. Single open trade — trades never overlap in time
//! 2. Daily cap — at most `max_trades_per_day` entries per UTC day
//! 3. Compounding — final balance is the ordered product of growth factors
//! 4. Exit status agrees with the sign of pnl, for any threshold the engine
//!    accepts
//! 5. Determinism — the same input gives the same result
//! 6. Indicator bounds and recursion

use proptest::prelude::*;
use std::collections::BTreeMap;
use revlab_core::components::filter::SupportResistanceFilter;
use revlab_core::components::signal::ReversalSignal;
use revlab_core::domain::{Candle, DayKey, TradeStatus};
use revlab_core::engine::{run_backtest, BacktestError, EngineConfig, RunResult};
use revlab_core::indicators::{ema_of_series, rsi_of_series};
use revlab_core::normalize_interval;

const T0: i64 = 1_704_067_200;

// ── Strategies (proptest) ────────────────────────────────────────────

/// Hourly random walk: (close-to-close return, upper wick, lower wick).
fn arb_candles() -> impl Strategy<Value = Vec<Candle>> {
    prop::collection::vec((-0.03..0.03_f64, 0.0..0.01_f64, 0.0..0.01_f64), 10..250).prop_map(
        |steps| {
            let mut open = 100.0;
            steps
                .into_iter()
                .enumerate()
                .map(|(i, (ret, up, down))| {
                    let close = open * (1.0 + ret);
                    let candle = Candle {
                        time: T0 + i as i64 * 3_600,
                        open,
                        high: open.max(close) * (1.0 + up),
                        low: open.min(close) * (1.0 - down),
                        close,
                        volume: 1.0,
                    };
                    open = close;
                    candle
                })
                .collect()
        },
    )
}

fn arb_threshold() -> impl Strategy<Value = f64> {
    (0.5..10.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn run(candles: &[Candle], tp: f64, sl: f64) -> RunResult {
    run_backtest(
        candles,
        &EngineConfig::new(tp, sl),
        &ReversalSignal::default(),
        &SupportResistanceFilter::default(),
    )
    .unwrap()
}

// ── Engine invariants ────────────────────────────────────────────────

proptest! {
    /// A new trade opens strictly after the previous one closed.
    #[test]
    fn trades_never_overlap(candles in arb_candles(), tp in arb_threshold(), sl in arb_threshold()) {
        let result = run(&candles, tp, sl);
        for pair in result.trades.windows(2) {
            prop_assert!(pair[1].entry_time > pair[0].exit_time);
        }
        for trade in &result.trades {
            prop_assert!(trade.exit_time >= trade.entry_time);
        }
        // Only the final trade may be a forced closure.
        let forced = result.trades.iter().filter(|t| t.status == TradeStatus::Closed).count();
        prop_assert!(forced <= 1);
        if forced == 1 {
            prop_assert_eq!(result.trades.last().map(|t| t.status), Some(TradeStatus::Closed));
        }
    }

    /// Entries per UTC day never exceed the cap.
    #[test]
    fn daily_cap_holds(candles in arb_candles(), tp in arb_threshold(), sl in arb_threshold()) {
        let result = run(&candles, tp, sl);
        let mut per_day: BTreeMap<DayKey, u32> = BTreeMap::new();
        for trade in &result.trades {
            *per_day.entry(DayKey::from_unix_seconds(trade.entry_time)).or_default() += 1;
        }
        prop_assert!(per_day.values().all(|&n| n <= 2));
    }

    /// Balance is multiplied once per closed trade, in closure order.
    #[test]
    fn balance_compounds(candles in arb_candles(), tp in arb_threshold(), sl in arb_threshold()) {
        let result = run(&candles, tp, sl);
        let expected = result
            .trades
            .iter()
            .fold(10_000.0, |balance, t| balance * (1.0 + t.pnl_percent / 100.0));
        prop_assert_eq!(result.final_balance, expected);
    }

    /// Targets pay, stops cost.
    #[test]
    fn status_matches_pnl_sign(candles in arb_candles(), tp in arb_threshold(), sl in arb_threshold()) {
        let result = run(&candles, tp, sl);
        for trade in &result.trades {
            match trade.status {
                TradeStatus::Win => prop_assert!(trade.pnl_percent >= 0.0),
                TradeStatus::Loss => prop_assert!(trade.pnl_percent <= 0.0),
                TradeStatus::Closed => {}
            }
        }
    }

    /// Out-of-range thresholds are refused rather than logged as inverted exits.
    #[test]
    fn accepted_thresholds_keep_status_sign(
        candles in arb_candles(),
        tp in -20.0..20.0_f64,
        sl in -20.0..150.0_f64,
    ) {
        let outcome = run_backtest(
            &candles,
            &EngineConfig::new(tp, sl),
            &ReversalSignal::default(),
            &SupportResistanceFilter::default(),
        );
        match outcome {
            Ok(result) => {
                prop_assert!(tp > 0.0 && sl > 0.0 && sl < 100.0);
                for trade in &result.trades {
                    match trade.status {
                        TradeStatus::Win => prop_assert!(trade.pnl_percent >= 0.0),
                        TradeStatus::Loss => prop_assert!(trade.pnl_percent <= 0.0),
                        TradeStatus::Closed => {}
                    }
                }
            }
            Err(err) => {
                prop_assert!(matches!(err, BacktestError::InvalidParameter { .. }), "unexpected error: {:?}", err);
                prop_assert!(tp <= 0.0 || sl <= 0.0 || sl >= 100.0);
            }
        }
    }

    #[test]
    fn runs_are_deterministic(candles in arb_candles(), tp in arb_threshold(), sl in arb_threshold()) {
        let a = run(&candles, tp, sl);
        let b = run(&candles, tp, sl);
        prop_assert_eq!(a.trades, b.trades);
        prop_assert_eq!(a.final_balance, b.final_balance);
    }
}

// ── Indicators ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_is_bounded(closes in prop::collection::vec(1.0..1000.0_f64, 2..200)) {
        let rsi = rsi_of_series(&closes, 14);
        prop_assert!(rsi[0].is_nan());
        for &v in &rsi[1..] {
            prop_assert!((0.0..=100.0).contains(&v), "rsi out of range: {}", v);
        }
    }

    #[test]
    fn ema_follows_recursion(closes in prop::collection::vec(1.0..1000.0_f64, 1..200)) {
        let ema = ema_of_series(&closes, 21);
        let alpha = 2.0 / 22.0;
        prop_assert_eq!(ema[0], closes[0]);
        for t in 1..closes.len() {
            let expected = alpha * closes[t] + (1.0 - alpha) * ema[t - 1];
            prop_assert!((ema[t] - expected).abs() < 1e-9);
        }
    }

    /// Normalization is total and lands on a whitelisted code.
    #[test]
    fn interval_normalization_is_total(token in ".{0,8}") {
        let code = normalize_interval(&token);
        prop_assert!(code.parse::<revlab_core::Interval>().is_ok());
    }
}
