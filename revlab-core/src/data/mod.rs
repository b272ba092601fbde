//! Candle sources: exchange REST, CSV files and a seeded generator.

pub mod binance;
pub mod csv_file;
pub mod provider;
pub mod synthetic;

pub use binance::BinanceSource;
pub use csv_file::CsvSource;
pub use provider::{
    epoch_to_seconds, validate_candles, CandleRequest, CandleSource, DataError, SourceKind,
};
pub use synthetic::SyntheticSource;
