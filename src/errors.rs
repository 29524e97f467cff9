//! Unified application error type.
//! Store, timers, classifier, export and cli all return AppError so that the
//! session loop can decide in one place what is fatal and what is reported.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Classifier
    // ---------------------------
    #[error("Classification error: {0}")]
    Classification(String),

    // ---------------------------
    // Timers
    // ---------------------------
    #[error("Timer callback failed: {0}")]
    Callback(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export format not supported: {0}")]
    InvalidExportFormat(String),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// True for failures of the persistent store (including migrations).
    pub fn is_storage(&self) -> bool {
        matches!(self, AppError::Storage(_) | AppError::Migration(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Classification(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
