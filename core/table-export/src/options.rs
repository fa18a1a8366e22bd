//! FILENAME: core/table-export/src/options.rs
//! Export configuration.
//!
//! Every option struct derives serde with defaults, so a partial JSON object
//! is a valid configuration. The data transformer is code-only and skipped.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dataset::Record;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::format::ExportFormat;

// ============================================================================
// DATA TRANSFORMER
// ============================================================================

type TransformFn = dyn Fn(Vec<Record>) -> Result<Vec<Record>, String> + Send + Sync;

/// Reshapes the full record collection before anything is exported.
/// Its output determines the reported row count. Returning `Err` aborts
/// the export with [`ExportError::Transform`].
#[derive(Clone)]
pub struct DataTransformer(Arc<TransformFn>);

impl DataTransformer {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Vec<Record>) -> Result<Vec<Record>, String> + Send + Sync + 'static,
    {
        DataTransformer(Arc::new(f))
    }

    /// Wraps a transform that cannot fail.
    pub fn infallible<F>(f: F) -> Self
    where
        F: Fn(Vec<Record>) -> Vec<Record> + Send + Sync + 'static,
    {
        Self::new(move |records| Ok(f(records)))
    }

    pub fn apply(&self, records: Vec<Record>) -> Result<Vec<Record>, ExportError> {
        (self.0)(records).map_err(ExportError::Transform)
    }
}

impl fmt::Debug for DataTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DataTransformer(..)")
    }
}

// ============================================================================
// EXPORT OPTIONS
// ============================================================================

/// Options shared by every export format plus per-format sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Output filename without extension.
    pub filename: String,

    /// Whether to emit a header row.
    pub include_headers: bool,

    /// Header overrides keyed by column id.
    pub custom_headers: HashMap<String, String>,

    /// When non-empty, only these column ids are exported.
    pub include_columns: Vec<String>,

    /// Column ids dropped after `include_columns` is applied.
    pub exclude_columns: Vec<String>,

    #[serde(skip)]
    pub transform: Option<DataTransformer>,

    pub csv: CsvOptions,
    pub excel: ExcelOptions,
    pub print: PrintOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            filename: "export".to_string(),
            include_headers: true,
            custom_headers: HashMap::new(),
            include_columns: Vec::new(),
            exclude_columns: Vec::new(),
            transform: None,
            csv: CsvOptions::default(),
            excel: ExcelOptions::default(),
            print: PrintOptions::default(),
        }
    }
}

impl ExportOptions {
    /// Loads options from JSON text; absent keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether an include or exclude list narrows the column set.
    pub fn filters_columns(&self) -> bool {
        !self.include_columns.is_empty() || !self.exclude_columns.is_empty()
    }

    /// The generated output filename for `format`, e.g. `report.csv`.
    pub fn filename_for(&self, format: ExportFormat) -> String {
        format!("{}.{}", self.filename, format.extension())
    }
}

// ============================================================================
// CSV
// ============================================================================

/// Delimited-text options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub delimiter: char,
    pub quote: char,
    /// Quote every field, not only the ones that need it.
    pub quote_all: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: ',',
            quote: '"',
            quote_all: false,
        }
    }
}

impl CsvOptions {
    /// Rejects combinations that would make the output unparseable.
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.delimiter == self.quote {
            return Err(ExportError::InvalidOptions(format!(
                "delimiter and quote character are both {:?}",
                self.delimiter
            )));
        }
        for (name, c) in [("delimiter", self.delimiter), ("quote character", self.quote)] {
            if c == '\n' || c == '\r' {
                return Err(ExportError::InvalidOptions(format!(
                    "{} cannot be a line break",
                    name
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// EXCEL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcelOptions {
    pub sheet_name: String,
}

impl Default for ExcelOptions {
    fn default() -> Self {
        ExcelOptions {
            sheet_name: "Sheet1".to_string(),
        }
    }
}

// ============================================================================
// PRINT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    Letter,
    Legal,
}

impl PaperSize {
    /// CSS `@page` size keyword.
    pub fn css_name(&self) -> &'static str {
        match self {
            PaperSize::A4 => "A4",
            PaperSize::A3 => "A3",
            PaperSize::Letter => "letter",
            PaperSize::Legal => "legal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn css_name(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// Print-document options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    pub title: Option<String>,
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    /// Show a "Generated on" line in the banner.
    pub show_timestamp: bool,
    /// Add page-number footer markup.
    pub show_page_numbers: bool,
    /// Extra CSS appended verbatim after the built-in styles.
    pub additional_css: String,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            title: None,
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            show_timestamp: true,
            show_page_numbers: true,
            additional_css: String::new(),
        }
    }
}
