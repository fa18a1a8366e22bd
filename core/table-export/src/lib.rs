//! FILENAME: core/table-export/src/lib.rs
//! Tabular export.
//!
//! Renders records + column metadata as CSV, XLSX, JSON or a print-ready
//! HTML document. Every format runs the same pipeline (column filtering,
//! data transform, cell extraction, header resolution) before rendering.
//!
//! The `export_*` entry points never return `Err`: any failure is reported
//! as an [`ExportResult`] with `success == false`.

mod delimited;
mod error;
mod format;
mod json;
mod options;
mod pipeline;
mod print;
mod result;
mod table;
mod target;
mod xlsx_writer;

pub use delimited::escape_field;
pub use error::ExportError;
pub use format::ExportFormat;
pub use options::{
    CsvOptions, DataTransformer, ExcelOptions, ExportOptions, Orientation, PaperSize, PrintOptions,
};
pub use pipeline::{filter_columns, resolve_header, PreparedTable};
pub use print::escape_html;
pub use result::ExportResult;
pub use table::{StaticTable, TableSource};
pub use target::{DirectoryTarget, ExportTarget, MemoryTarget, PrintedDocument, SavedFile};
pub use xlsx_writer::{MatrixCell, MatrixSheet, WorkbookMatrix};

use chrono::{DateTime, Utc};
use dataset::{ColumnDef, Record};
use log::{info, warn};

// ============================================================================
// PURE RENDERERS
// ============================================================================

/// Renders delimited text (no trailing newline).
pub fn render_csv(
    records: &[Record],
    columns: &[ColumnDef],
    options: &ExportOptions,
) -> Result<String, ExportError> {
    options.csv.validate()?;
    let table = PreparedTable::new(records, columns, options)?;
    Ok(delimited::write_csv(&table, options.include_headers, &options.csv))
}

/// Builds the one-sheet spreadsheet matrix.
pub fn build_matrix(
    records: &[Record],
    columns: &[ColumnDef],
    options: &ExportOptions,
) -> Result<WorkbookMatrix, ExportError> {
    let table = PreparedTable::new(records, columns, options)?;
    Ok(xlsx_writer::build_matrix(&table, options.include_headers, &options.excel.sheet_name))
}

/// Renders an .xlsx workbook.
pub fn render_xlsx(
    records: &[Record],
    columns: &[ColumnDef],
    options: &ExportOptions,
) -> Result<Vec<u8>, ExportError> {
    xlsx_writer::save_xlsx_to_buffer(&build_matrix(records, columns, options)?)
}

/// Renders indented JSON.
pub fn render_json(
    records: &[Record],
    columns: &[ColumnDef],
    options: &ExportOptions,
) -> Result<String, ExportError> {
    let table = PreparedTable::new(records, columns, options)?;
    json::write_json(&table)
}

/// Renders the print document with `generated_at` in its banner.
pub fn render_print_document(
    records: &[Record],
    columns: &[ColumnDef],
    options: &ExportOptions,
    generated_at: DateTime<Utc>,
) -> Result<String, ExportError> {
    let table = PreparedTable::new(records, columns, options)?;
    Ok(print::write_print_document(&table, options.include_headers, &options.print, generated_at))
}

// ============================================================================
// EXPORT ENTRY POINTS
// ============================================================================

/// Runs one export and folds its outcome into an [`ExportResult`].
fn run_export<F>(format: ExportFormat, options: &ExportOptions, export: F) -> ExportResult
where
    F: FnOnce(&str) -> Result<usize, ExportError>,
{
    let filename = options.filename_for(format);
    match export(&filename) {
        Ok(row_count) => {
            info!("exported {} rows as {} to {}", row_count, format, filename);
            ExportResult::succeeded(format.tag(), row_count, filename)
        }
        Err(e) => {
            warn!("{} export of {} failed: {}", format, filename, e);
            ExportResult::failed(format.tag(), filename, e.to_string())
        }
    }
}

/// Exports delimited text and saves it through `target`.
pub fn export_csv(
    records: &[Record],
    columns: &[ColumnDef],
    options: &ExportOptions,
    target: &mut dyn ExportTarget,
) -> ExportResult {
    run_export(ExportFormat::Csv, options, |filename| {
        options.csv.validate()?;
        let table = PreparedTable::new(records, columns, options)?;
        let text = delimited::write_csv(&table, options.include_headers, &options.csv);
        target.save_file(filename, ExportFormat::Csv.mime_type(), text.as_bytes())?;
        Ok(table.row_count())
    })
}

/// Exports an .xlsx workbook and saves it through `target`.
pub fn export_excel(
    records: &[Record],
    columns: &[ColumnDef],
    options: &ExportOptions,
    target: &mut dyn ExportTarget,
) -> ExportResult {
    run_export(ExportFormat::Excel, options, |filename| {
        let table = PreparedTable::new(records, columns, options)?;
        let matrix = xlsx_writer::build_matrix(&table, options.include_headers, &options.excel.sheet_name);
        let bytes = xlsx_writer::save_xlsx_to_buffer(&matrix)?;
        target.save_file(filename, ExportFormat::Excel.mime_type(), &bytes)?;
        Ok(table.row_count())
    })
}

/// Exports indented JSON and saves it through `target`.
pub fn export_json(
    records: &[Record],
    columns: &[ColumnDef],
    options: &ExportOptions,
    target: &mut dyn ExportTarget,
) -> ExportResult {
    run_export(ExportFormat::Json, options, |filename| {
        let table = PreparedTable::new(records, columns, options)?;
        let text = json::write_json(&table)?;
        target.save_file(filename, ExportFormat::Json.mime_type(), text.as_bytes())?;
        Ok(table.row_count())
    })
}

/// Builds the print document and hands it to `target`'s print surface.
pub fn export_print(
    records: &[Record],
    columns: &[ColumnDef],
    options: &ExportOptions,
    target: &mut dyn ExportTarget,
) -> ExportResult {
    run_export(ExportFormat::Pdf, options, |filename| {
        let table = PreparedTable::new(records, columns, options)?;
        let html = print::write_print_document(&table, options.include_headers, &options.print, Utc::now());
        target.print_document(filename, &html)?;
        Ok(table.row_count())
    })
}

/// Exports a table source in the format named by `format_tag`.
///
/// Unknown tags fail immediately without generating anything.
pub fn export_table(
    source: &dyn TableSource,
    format_tag: &str,
    options: &ExportOptions,
    target: &mut dyn ExportTarget,
) -> ExportResult {
    let format = match format_tag.parse::<ExportFormat>() {
        Ok(format) => format,
        Err(e) => {
            warn!("export rejected: {}", e);
            return ExportResult::failed(format_tag, options.filename.clone(), e.to_string());
        }
    };

    let rows = source.rows();
    let columns = source.columns();

    match format {
        ExportFormat::Csv => export_csv(&rows, &columns, options, target),
        ExportFormat::Excel => export_excel(&rows, &columns, options, target),
        ExportFormat::Json => export_json(&rows, &columns, options, target),
        ExportFormat::Pdf => export_print(&rows, &columns, options, target),
    }
}
