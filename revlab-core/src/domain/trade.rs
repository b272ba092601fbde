//! Open and closed trade records.

use serde::{Deserialize, Serialize};

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Percentage return of moving from `entry` to `exit` on this side.
    pub fn pnl_percent(self, entry: f64, exit: f64) -> f64 {
        match self {
            Direction::Long => (exit - entry) / entry * 100.0,
            Direction::Short => (entry - exit) / entry * 100.0,
        }
    }
}

/// How a trade ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    /// Target reached.
    Win,
    /// Stop reached.
    Loss,
    /// Still open at the last candle; closed at its close.
    Closed,
}

/// The single open position slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenTrade {
    pub direction: Direction,
    pub entry_price: f64,
    pub entry_time: i64,
    pub stop_price: f64,
    pub target_price: f64,
}

impl OpenTrade {
    /// Open a trade at `entry_price`, placing stop and target as percentages away from it.
    pub fn open(
        direction: Direction,
        entry_price: f64,
        entry_time: i64,
        profit_target_percent: f64,
        stop_loss_percent: f64,
    ) -> Self {
        let (stop_price, target_price) = match direction {
            Direction::Long => (
                entry_price * (1.0 - stop_loss_percent / 100.0),
                entry_price * (1.0 + profit_target_percent / 100.0),
            ),
            Direction::Short => (
                entry_price * (1.0 + stop_loss_percent / 100.0),
                entry_price * (1.0 - profit_target_percent / 100.0),
            ),
        };
        Self {
            direction,
            entry_price,
            entry_time,
            stop_price,
            target_price,
        }
    }

    /// Exit status triggered by a bar closing at `close`, if any.
    ///
    /// The stop is checked before the target.
    pub fn exit_status(&self, close: f64) -> Option<TradeStatus> {
        match self.direction {
            Direction::Long if close <= self.stop_price => Some(TradeStatus::Loss),
            Direction::Long if close >= self.target_price => Some(TradeStatus::Win),
            Direction::Short if close >= self.stop_price => Some(TradeStatus::Loss),
            Direction::Short if close <= self.target_price => Some(TradeStatus::Win),
            _ => None,
        }
    }

    /// Convert into a closed record.
    pub fn close(self, exit_price: f64, exit_time: i64, status: TradeStatus) -> ClosedTrade {
        ClosedTrade {
            entry_time: self.entry_time,
            exit_time,
            entry_price: self.entry_price,
            exit_price,
            pnl_percent: self.direction.pnl_percent(self.entry_price, exit_price),
            status,
            direction: self.direction,
        }
    }
}

/// A completed round-trip trade. Never mutated once logged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub entry_time: i64,
    pub exit_time: i64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub pnl_percent: f64,
    pub status: TradeStatus,
    pub direction: Direction,
}

impl ClosedTrade {
    pub fn is_winner(&self) -> bool {
        self.pnl_percent > 0.0
    }

    /// Balance multiplier this trade applies when compounded.
    pub fn growth_factor(&self) -> f64 {
        1.0 + self.pnl_percent / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_levels_from_percentages() {
        let trade = OpenTrade::open(Direction::Long, 100.0, 0, 4.0, 10.0);
        assert!((trade.stop_price - 90.0).abs() < 1e-10);
        assert!((trade.target_price - 104.0).abs() < 1e-10);
    }

    #[test]
    fn short_levels_from_percentages() {
        let trade = OpenTrade::open(Direction::Short, 100.0, 0, 4.0, 10.0);
        assert!((trade.stop_price - 110.0).abs() < 1e-10);
        assert!((trade.target_price - 96.0).abs() < 1e-10);
    }

    #[test]
    fn long_exit_status() {
        let trade = OpenTrade::open(Direction::Long, 100.0, 0, 4.0, 10.0);
        assert_eq!(trade.exit_status(100.0), None);
        assert_eq!(trade.exit_status(90.0), Some(TradeStatus::Loss));
        assert_eq!(trade.exit_status(105.0), Some(TradeStatus::Win));
    }

    #[test]
    fn short_exit_status() {
        let trade = OpenTrade::open(Direction::Short, 100.0, 0, 4.0, 10.0);
        assert_eq!(trade.exit_status(101.0), None);
        assert_eq!(trade.exit_status(111.0), Some(TradeStatus::Loss));
        assert_eq!(trade.exit_status(95.0), Some(TradeStatus::Win));
    }

    #[test]
    fn short_pnl_sign_follows_direction() {
        let trade = OpenTrade::open(Direction::Short, 200.0, 10, 4.0, 10.0);
        let closed = trade.close(190.0, 20, TradeStatus::Win);
        assert!((closed.pnl_percent - 5.0).abs() < 1e-10);
        assert!(closed.is_winner());
        assert!((closed.growth_factor() - 1.05).abs() < 1e-12);
    }

    #[test]
    fn status_serializes_upper_case() {
        let trade = OpenTrade::open(Direction::Long, 100.0, 1, 4.0, 10.0);
        let json = serde_json::to_string(&trade.close(101.0, 2, TradeStatus::Closed)).unwrap();
        assert!(json.contains(r#""status":"CLOSED""#));
        assert!(json.contains(r#""direction":"LONG""#));
    }
}
