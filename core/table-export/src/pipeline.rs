//! FILENAME: core/table-export/src/pipeline.rs
//! The shared pre-processing applied before any format is rendered.
//!
//! 1. Column filtering (include list, then exclude list)
//! 2. Data transform over the whole record collection
//! 3. Cell extraction (accessor fn -> accessor key -> id -> empty)
//! 4. Header resolution (custom header -> column header -> id)

use dataset::{ColumnDef, Record};
use log::debug;

use crate::error::ExportError;
use crate::options::ExportOptions;

/// Records and columns after the shared pipeline ran.
#[derive(Debug)]
pub struct PreparedTable<'c> {
    pub columns: Vec<&'c ColumnDef>,
    pub headers: Vec<String>,
    pub records: Vec<Record>,
    /// Whether an include/exclude list narrowed the columns.
    pub columns_filtered: bool,
}

impl<'c> PreparedTable<'c> {
    pub fn new(
        records: &[Record],
        columns: &'c [ColumnDef],
        options: &ExportOptions,
    ) -> Result<Self, ExportError> {
        let columns = filter_columns(columns, &options.include_columns, &options.exclude_columns);

        let records = match &options.transform {
            Some(transform) => transform.apply(records.to_vec())?,
            None => records.to_vec(),
        };

        let headers = columns
            .iter()
            .map(|column| resolve_header(column, options))
            .collect();

        debug!(
            "export pipeline: {} columns, {} records after transform",
            columns.len(),
            records.len()
        );

        Ok(PreparedTable {
            columns,
            headers,
            records,
            columns_filtered: options.filters_columns(),
        })
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Display text of every cell, row by row.
    pub fn text_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.records.iter().map(move |record| {
            self.columns
                .iter()
                .map(|column| column.cell_text(record))
                .collect()
        })
    }
}

/// Applies the include list (when non-empty) and then the exclude list.
pub fn filter_columns<'c>(
    columns: &'c [ColumnDef],
    include: &[String],
    exclude: &[String],
) -> Vec<&'c ColumnDef> {
    columns
        .iter()
        .filter(|column| include.is_empty() || include.contains(&column.id))
        .filter(|column| !exclude.contains(&column.id))
        .collect()
}

/// Custom header override, else the column's header, else its id.
pub fn resolve_header(column: &ColumnDef, options: &ExportOptions) -> String {
    options
        .custom_headers
        .get(&column.id)
        .cloned()
        .unwrap_or_else(|| column.display_header().to_string())
}
