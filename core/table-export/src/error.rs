//! FILENAME: core/table-export/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid export options: {0}")]
    InvalidOptions(String),

    #[error("Data transform failed: {0}")]
    Transform(String),

    #[error("Print window could not be opened; it was probably blocked by a popup blocker")]
    PopupBlocked,

    #[error("Delivery failed: {0}")]
    Delivery(String),
}
