//! Confluence Runner — scan orchestration around `confluence-core`.
//!
//! This crate provides:
//! - TOML scan configuration
//! - Candle providers: CSV files, deterministic synthetic walks, in-memory
//! - A rayon-parallel scanner with per-symbol signal caps
//! - JSON, JSON Lines and CSV export

pub mod config;
pub mod csv_provider;
pub mod export;
pub mod memory;
pub mod scanner;
pub mod synthetic;

pub use config::{ConfigError, DataSourceConfig, ScanConfig};
pub use csv_provider::CsvCandleProvider;
pub use export::{export_json, export_signals_csv, write_json, write_jsonl, ExportError};
pub use memory::InMemoryProvider;
pub use scanner::{ScanError, ScanReport, ScanTotals, Scanner, Suppression, SymbolReport};
pub use synthetic::SyntheticProvider;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn scanner_is_send_sync() {
        assert_send::<Scanner>();
        assert_sync::<Scanner>();
    }

    #[test]
    fn reports_are_send_sync() {
        assert_send::<ScanReport>();
        assert_sync::<ScanReport>();
        assert_send::<SymbolReport>();
        assert_sync::<SymbolReport>();
    }

    #[test]
    fn providers_are_send_sync() {
        assert_send::<CsvCandleProvider>();
        assert_sync::<CsvCandleProvider>();
        assert_send::<SyntheticProvider>();
        assert_sync::<SyntheticProvider>();
        assert_send::<InMemoryProvider>();
        assert_sync::<InMemoryProvider>();
    }

    #[test]
    fn config_is_send_sync() {
        assert_send::<ScanConfig>();
        assert_sync::<ScanConfig>();
    }
}
