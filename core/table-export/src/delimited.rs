//! FILENAME: core/table-export/src/delimited.rs
//! Delimited-text (CSV) rendering.

use crate::options::CsvOptions;
use crate::pipeline::PreparedTable;

/// Quotes a field when `quote_all` is set or when it contains the delimiter,
/// the quote character or a line break. Embedded quotes are doubled.
pub fn escape_field(field: &str, options: &CsvOptions) -> String {
    let needs_quotes = options.quote_all
        || field.contains(options.delimiter)
        || field.contains(options.quote)
        || field.contains('\n')
        || field.contains('\r');

    if !needs_quotes {
        return field.to_string();
    }

    let quote = options.quote.to_string();
    let doubled = format!("{}{}", quote, quote);
    format!("{}{}{}", quote, field.replace(&quote, &doubled), quote)
}

fn join_line<S: AsRef<str>>(fields: &[S], options: &CsvOptions) -> String {
    let delimiter = options.delimiter.to_string();
    fields
        .iter()
        .map(|field| escape_field(field.as_ref(), options))
        .collect::<Vec<_>>()
        .join(&delimiter)
}

/// Joins an already-extracted text matrix into delimited lines.
/// Lines are separated by `\n` with no trailing newline.
pub fn write_lines<S: AsRef<str>>(rows: &[Vec<S>], options: &CsvOptions) -> String {
    rows.iter()
        .map(|row| join_line(row, options))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a prepared table as delimited text.
pub fn write_csv(table: &PreparedTable, include_headers: bool, options: &CsvOptions) -> String {
    let mut lines = Vec::with_capacity(table.row_count() + 1);
    if include_headers {
        lines.push(join_line(&table.headers, options));
    }
    for row in table.text_rows() {
        lines.push(join_line(&row, options));
    }
    lines.join("\n")
}
