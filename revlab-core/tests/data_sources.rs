//! Integration tests for candle sources feeding the engine.
//!
//! Network access is never used: Binance coverage is limited to URL
//! construction and payload parsing.

use std::io::Write;
use std::time::Duration;

use revlab_core::data::binance::parse_klines;
use revlab_core::data::csv_file::write_candles;
use revlab_core::data::{
    BinanceSource, CandleRequest, CandleSource, CsvSource, DataError, SyntheticSource,
};
use revlab_core::{run_configured, BacktestConfig, Interval};
use tempfile::NamedTempFile;

fn request(limit: usize) -> CandleRequest {
    CandleRequest::new("BTCUSDT", Interval::M15, limit)
}

fn csv_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn csv_source_keeps_latest_candles() {
    let mut body = String::from("time,open,high,low,close,volume\n");
    for i in 0..20 {
        body.push_str(&format!("{},100,101,99,100,1\n", 1_704_067_200_000_i64 + i * 900_000));
    }
    let file = csv_file(&body);

    let candles = CsvSource::new(file.path()).fetch(&request(5)).unwrap();
    assert_eq!(candles.len(), 5);
    assert_eq!(candles[0].time, 1_704_067_200 + 15 * 900);
    assert_eq!(candles[4].time, 1_704_067_200 + 19 * 900);
}

#[test]
fn csv_source_missing_file_is_io_error() {
    let source = CsvSource::new("/definitely/not/here.csv");
    assert!(matches!(source.fetch(&request(10)), Err(DataError::Io(_))));
}

#[test]
fn csv_source_header_only_is_empty() {
    let file = csv_file("time,open,high,low,close,volume\n");
    let err = CsvSource::new(file.path()).fetch(&request(10)).unwrap_err();
    assert!(matches!(err, DataError::Empty { ref symbol } if symbol == "BTCUSDT"));
}

#[test]
fn synthetic_csv_backtest_matches_direct_backtest() {
    let candles = SyntheticSource::new(5).generate(&request(600));
    let mut file = NamedTempFile::new().unwrap();
    write_candles(&mut file, &candles).unwrap();

    let loaded = CsvSource::new(file.path()).fetch(&request(0)).unwrap();
    assert_eq!(loaded.len(), candles.len());

    let config = BacktestConfig::default();
    let direct = run_configured(candles, &config).unwrap();
    let via_csv = run_configured(loaded, &config).unwrap();
    assert_eq!(direct.trades.len(), via_csv.trades.len());
    assert_eq!(direct.final_balance, via_csv.final_balance);
}

#[test]
fn binance_url_and_payload() {
    let source = BinanceSource::new("https://api.binance.com/", Duration::from_secs(15)).unwrap();
    assert_eq!(
        source.klines_url(&CandleRequest::new("btcusdt", Interval::H1, 500)),
        "https://api.binance.com/api/v3/klines?symbol=BTCUSDT&interval=1h&limit=500"
    );

    let body = serde_json::json!([
        [1704067200000_i64, "42000.0", "42100.5", "41900.0", "42050.25", "12.5", 1704070799999_i64],
        [1704070800000_i64, "42050.25", "42200.0", "42000.0", "42180.0", "8.0", 1704074399999_i64]
    ]);
    let candles = parse_klines(&body).unwrap();
    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].time, 1_704_067_200);
    assert_eq!(candles[1].close, 42_180.0);
}

#[test]
fn config_file_drives_a_synthetic_run() {
    let file = csv_file(
        r#"
        [backtest]
        interval = "60"
        profit_target_percent = 2.0

        [source]
        kind = "synthetic"
        limit = 300
        seed = 9
        "#,
    );
    let config = BacktestConfig::from_file(file.path()).unwrap();
    let candles = SyntheticSource::new(config.source.seed)
        .fetch(&config.candle_request())
        .unwrap();
    assert_eq!(candles.len(), 300);
    assert_eq!(candles[1].time - candles[0].time, 3_600);

    let result = run_configured(candles, &config).unwrap();
    assert_eq!(result.interval, Interval::H1);
}
