//! CSV candle source.
//!
//! Expects a header row with `time,open,high,low,close,volume`. `time` may be
//! unix seconds or milliseconds. The file holds a single instrument; the
//! request's symbol is not checked against it.

use super::provider::{
    epoch_to_seconds, keep_latest, validate_candles, CandleRequest, CandleSource, DataError,
    SourceKind,
};
use crate::domain::Candle;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CandleSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Csv
    }

    fn fetch(&self, request: &CandleRequest) -> Result<Vec<Candle>, DataError> {
        let file = std::fs::File::open(&self.path)?;
        let candles = read_candles(file)?;
        if candles.is_empty() {
            return Err(DataError::Empty {
                symbol: request.symbol.clone(),
            });
        }
        Ok(keep_latest(candles, request.limit))
    }
}

/// Read, sort and validate candles from CSV.
pub fn read_candles<R: Read>(reader: R) -> Result<Vec<Candle>, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut candles = Vec::new();
    for row in rdr.deserialize::<CsvRow>() {
        let row = row?;
        candles.push(Candle {
            time: epoch_to_seconds(row.time),
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }
    candles.sort_by_key(|c| c.time);
    validate_candles(&candles)?;
    Ok(candles)
}

/// Write candles as CSV with a header row, times in seconds.
pub fn write_candles<W: std::io::Write>(writer: W, candles: &[Candle]) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for candle in candles {
        wtr.serialize(candle)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_seconds_and_sorts() {
        let data = "time,open,high,low,close,volume\n\
                    1704070800,2,3,1,2.5,10\n\
                    1704067200,1,2,0.5,1.5,5\n";
        let candles = read_candles(data.as_bytes()).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].time, 1_704_067_200);
        assert_eq!(candles[1].close, 2.5);
    }

    #[test]
    fn converts_millisecond_times() {
        let data = "time,open,high,low,close,volume\n1704067200000,1,2,0.5,1.5,5\n";
        let candles = read_candles(data.as_bytes()).unwrap();
        assert_eq!(candles[0].time, 1_704_067_200);
    }

    #[test]
    fn rejects_duplicate_times() {
        let data = "time,open,high,low,close,volume\n\
                    1704067200,1,2,0.5,1.5,5\n\
                    1704067200,1,2,0.5,1.5,5\n";
        assert!(matches!(
            read_candles(data.as_bytes()),
            Err(DataError::InvalidCandle { .. })
        ));
    }

    #[test]
    fn rejects_malformed_rows() {
        let data = "time,open,high,low,close,volume\n1704067200,x,2,0.5,1.5,5\n";
        assert!(matches!(read_candles(data.as_bytes()), Err(DataError::Csv(_))));
    }

    #[test]
    fn write_then_read_preserves_candles() {
        let candles = vec![Candle {
            time: 1_704_067_200,
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 5.0,
        }];
        let mut buf = Vec::new();
        write_candles(&mut buf, &candles).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("time,open,high,low,close,volume"));
        assert_eq!(read_candles(buf.as_slice()).unwrap(), candles);
    }
}
