//! FILENAME: core/table-export/src/result.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one export call. Callers branch on `success`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportResult {
    pub success: bool,
    /// Format tag (`csv`, `excel`, `json`, `pdf`, or the unsupported tag given).
    pub format: String,
    pub row_count: usize,
    pub filename: String,
    pub timestamp: DateTime<Utc>,
    pub error: Option<String>,
}

impl ExportResult {
    pub fn succeeded(format: &str, row_count: usize, filename: String) -> Self {
        ExportResult {
            success: true,
            format: format.to_string(),
            row_count,
            filename,
            timestamp: Utc::now(),
            error: None,
        }
    }

    pub fn failed(format: &str, filename: String, error: String) -> Self {
        ExportResult {
            success: false,
            format: format.to_string(),
            row_count: 0,
            filename,
            timestamp: Utc::now(),
            error: Some(error),
        }
    }
}
