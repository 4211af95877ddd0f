//! CSV candle files on disk.
//!
//! One file per `(symbol, timeframe)` at `<root>/<SYMBOL>_<tf>.csv` with the
//! header `timestamp,open,high,low,close,volume`. Timestamps are RFC 3339.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use confluence_core::domain::{Candle, CandleWindow, Timeframe};
use confluence_core::provider::{CandleProvider, ProviderError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CandleRecord {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl From<CandleRecord> for Candle {
    fn from(r: CandleRecord) -> Self {
        Candle::new(r.timestamp, r.open, r.high, r.low, r.close, r.volume)
    }
}

#[derive(Debug, Clone)]
pub struct CsvCandleProvider {
    root: PathBuf,
}

impl CsvCandleProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `(symbol, timeframe)`.
    pub fn path_for(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.root.join(format!("{symbol}_{}.csv", timeframe.label()))
    }
}

impl CandleProvider for CsvCandleProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        max_bars: usize,
    ) -> Result<CandleWindow, ProviderError> {
        let path = self.path_for(symbol, timeframe);
        if !path.exists() {
            return Err(ProviderError::NotFound {
                symbol: symbol.to_string(),
                timeframe,
            });
        }

        let parse_err = |e: csv::Error| ProviderError::Parse {
            source_name: path.display().to_string(),
            message: e.to_string(),
        };
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(parse_err)?;

        let mut candles = Vec::new();
        for (row, record) in reader.deserialize::<CandleRecord>().enumerate() {
            let candle = Candle::from(record.map_err(parse_err)?);
            if !candle.is_sane() {
                return Err(ProviderError::Parse {
                    source_name: path.display().to_string(),
                    // header is line 1
                    message: format!("line {}: inconsistent OHLCV values", row + 2),
                });
            }
            candles.push(candle);
        }

        Ok(CandleWindow::new(symbol, timeframe, candles)?.truncated(max_bars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str = "timestamp,open,high,low,close,volume\n";

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), format!("{HEADER}{body}")).unwrap();
    }

    #[test]
    fn reads_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "BTC_1h.csv",
            "2024-01-02T00:00:00Z,100,101,99,100.5,10\n\
             2024-01-02T01:00:00Z,100.5,102,100,101.5,12\n\
             2024-01-02T02:00:00Z,101.5,103,101,102.5,14\n",
        );
        let provider = CsvCandleProvider::new(dir.path());
        let window = provider.fetch("BTC", Timeframe::H1, 2).unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window.candles()[0].close, 101.5);
        assert_eq!(window.last().unwrap().volume, 14.0);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvCandleProvider::new(dir.path())
            .fetch("ETH", Timeframe::M15, 100)
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotFound { .. }));
    }

    #[test]
    fn malformed_row_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "BTC_4h.csv", "yesterday,1,2,0.5,1.5,10\n");
        let err = CsvCandleProvider::new(dir.path())
            .fetch("BTC", Timeframe::H4, 100)
            .unwrap_err();
        assert!(matches!(err, ProviderError::Parse { .. }));
    }

    #[test]
    fn inconsistent_ohlc_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "BTC_1h.csv",
            "2024-01-02T00:00:00Z,100,101,99,100.5,10\n\
             2024-01-02T01:00:00Z,100.5,99,102,101,12\n",
        );
        match CsvCandleProvider::new(dir.path()).fetch("BTC", Timeframe::H1, 100) {
            Err(ProviderError::Parse { message, .. }) => assert!(message.starts_with("line 3")),
            other => panic!("expected Parse, got {other:?}"),
        }

        write(dir.path(), "ETH_1h.csv", "2024-01-02T00:00:00Z,1,2,0.5,1.5,-4\n");
        let err = CsvCandleProvider::new(dir.path())
            .fetch("ETH", Timeframe::H1, 100)
            .unwrap_err();
        assert!(matches!(err, ProviderError::Parse { .. }));
    }

    #[test]
    fn unordered_rows_are_invalid_window() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "BTC_1d.csv",
            "2024-01-03T00:00:00Z,1,2,0.5,1.5,10\n\
             2024-01-02T00:00:00Z,1,2,0.5,1.5,10\n",
        );
        let err = CsvCandleProvider::new(dir.path())
            .fetch("BTC", Timeframe::D1, 100)
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidWindow(_)));
    }
}
