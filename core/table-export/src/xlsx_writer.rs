//! FILENAME: core/table-export/src/xlsx_writer.rs
//! Spreadsheet export: a cell matrix wrapped in a one-sheet workbook,
//! encoded as a real .xlsx file.

use dataset::{display_text, ColumnDef, Record};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};
use serde::Serialize;
use serde_json::Value;

use crate::delimited::write_lines;
use crate::error::ExportError;
use crate::options::CsvOptions;
use crate::pipeline::PreparedTable;

// ============================================================================
// MATRIX
// ============================================================================

/// A typed spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MatrixCell {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl MatrixCell {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => MatrixCell::Empty,
            Some(Value::Bool(b)) => MatrixCell::Boolean(*b),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) if f.is_finite() => MatrixCell::Number(f),
                _ => MatrixCell::Text(n.to_string()),
            },
            Some(other) => MatrixCell::Text(display_text(Some(other))),
        }
    }

    /// Display text, matching what the CSV exporter would write.
    pub fn text(&self) -> String {
        match self {
            MatrixCell::Empty => String::new(),
            MatrixCell::Number(n) => dataset::format_number(*n),
            MatrixCell::Text(s) => s.clone(),
            MatrixCell::Boolean(b) => b.to_string(),
        }
    }
}

/// One named sheet: optional header row, then one row per record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixSheet {
    pub name: String,
    pub has_header: bool,
    pub rows: Vec<Vec<MatrixCell>>,
}

/// A minimal workbook: a list of sheets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkbookMatrix {
    pub sheets: Vec<MatrixSheet>,
}

impl WorkbookMatrix {
    /// Degrades the first sheet to delimited text.
    pub fn to_csv(&self, options: &CsvOptions) -> String {
        let rows: Vec<Vec<String>> = self
            .sheets
            .first()
            .map(|sheet| {
                sheet
                    .rows
                    .iter()
                    .map(|row| row.iter().map(MatrixCell::text).collect())
                    .collect()
            })
            .unwrap_or_default();
        write_lines(&rows, options)
    }
}

fn record_row(record: &Record, columns: &[&ColumnDef]) -> Vec<MatrixCell> {
    columns
        .iter()
        .map(|column| MatrixCell::from_value(column.resolve(record).as_deref()))
        .collect()
}

/// Builds the cell matrix of a prepared table.
pub fn build_matrix(table: &PreparedTable, include_headers: bool, sheet_name: &str) -> WorkbookMatrix {
    let mut rows = Vec::with_capacity(table.row_count() + 1);
    if include_headers {
        rows.push(table.headers.iter().cloned().map(MatrixCell::Text).collect());
    }
    for record in &table.records {
        rows.push(record_row(record, &table.columns));
    }

    WorkbookMatrix {
        sheets: vec![MatrixSheet {
            name: sheet_name.to_string(),
            has_header: include_headers,
            rows,
        }],
    }
}

// ============================================================================
// XLSX ENCODING
// ============================================================================

/// Encodes the workbook as .xlsx bytes. Header rows are written bold.
pub fn save_xlsx_to_buffer(matrix: &WorkbookMatrix) -> Result<Vec<u8>, ExportError> {
    let mut xlsx = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();

    for sheet in &matrix.sheets {
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_num = u32::try_from(row_idx).map_err(|_| {
                ExportError::InvalidOptions(format!("too many rows for a worksheet: {}", row_idx))
            })?;
            let is_header = sheet.has_header && row_idx == 0;

            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = u16::try_from(col_idx).map_err(|_| {
                    ExportError::InvalidOptions(format!("too many columns for a worksheet: {}", col_idx))
                })?;

                match cell {
                    MatrixCell::Empty => {}
                    MatrixCell::Number(n) => {
                        worksheet.write_number(row_num, col_num, *n)?;
                    }
                    MatrixCell::Text(s) => {
                        if is_header {
                            worksheet.write_string_with_format(row_num, col_num, s, &header_format)?;
                        } else {
                            worksheet.write_string(row_num, col_num, s)?;
                        }
                    }
                    MatrixCell::Boolean(b) => {
                        worksheet.write_boolean(row_num, col_num, *b)?;
                    }
                }
            }
        }

        worksheet.autofit();
    }

    Ok(xlsx.save_to_buffer()?)
}
