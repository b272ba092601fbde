//! Domain types for RevLab

pub mod candle;
pub mod trade;

pub use candle::{Candle, DayKey};
pub use trade::{ClosedTrade, Direction, OpenTrade, TradeStatus};
