//! Report export: pretty JSON, JSON Lines, and a flat CSV of signals.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use confluence_core::signal::Signal;
use thiserror::Error;

use crate::scanner::ScanReport;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(report: &ScanReport) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Write the full report as pretty JSON.
pub fn write_json(report: &ScanReport, path: &Path) -> Result<(), ExportError> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, report)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// One signal per line.
pub fn write_jsonl<'a>(
    signals: impl IntoIterator<Item = &'a Signal>,
    path: &Path,
) -> Result<usize, ExportError> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut written = 0;
    for signal in signals {
        serde_json::to_writer(&mut out, signal)?;
        out.write_all(b"\n")?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Signals as CSV, one row each. Pattern labels are joined with `;`.
pub fn export_signals_csv<'a>(
    signals: impl IntoIterator<Item = &'a Signal>,
) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "id",
        "symbol",
        "timeframe",
        "direction",
        "entry_price",
        "stop_loss",
        "take_profit",
        "trailing_stop",
        "position_size",
        "confidence",
        "risk_reward",
        "signal_score",
        "patterns",
        "timestamp",
    ])?;
    for s in signals {
        wtr.write_record([
            s.id().to_string(),
            s.symbol().to_string(),
            s.timeframe().label().to_string(),
            s.direction().as_str().to_string(),
            s.entry_price().to_string(),
            s.stop_loss().to_string(),
            s.take_profit().to_string(),
            s.trailing_stop().to_string(),
            s.position_size().to_string(),
            format!("{:.1}", s.confidence()),
            format!("{:.4}", s.risk_reward()),
            format!("{:.4}", s.signal_score()),
            s.pattern_summary().join(";"),
            s.timestamp().to_rfc3339(),
        ])?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
