// src/export/mod.rs

mod fs_utils;
mod json_csv;
mod model;
mod xlsx;
mod xml;

pub use model::EventExport;
pub use xml::to_xml;

use crate::errors::{AppError, AppResult};
use crate::models::event::EventRecord;
use crate::ui::messages::success;
use chrono::Local;
use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// Common completion message for every export.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
    Xml,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Xml => "xml",
        }
    }
}

/// Write `records` (already in id-descending order) to `path`.
///
/// An existing file is only replaced with `force` or after confirmation.
pub fn export_records(
    records: &[EventRecord],
    format: ExportFormat,
    path: &Path,
    force: bool,
) -> AppResult<()> {
    fs_utils::ensure_writable(path, force)?;

    let rows: Vec<EventExport> = records.iter().map(EventExport::from).collect();

    match format {
        ExportFormat::Csv => json_csv::export_csv(&rows, path),
        ExportFormat::Json => json_csv::export_json(&rows, path),
        ExportFormat::Xlsx => xlsx::export_xlsx(&rows, path),
        ExportFormat::Xml => {
            std::fs::write(path, to_xml(&rows))
                .map_err(|e| AppError::Export(format!("XML write error: {e}")))?;
            notify_export_success("XML", path);
            Ok(())
        }
    }
}

/// Timestamped spreadsheet name used by the in-session "export logs" command.
pub fn session_export_path(dir: &Path) -> PathBuf {
    dir.join(format!(
        "ACLS_logs_{}.xlsx",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}
